//! Game HUD rendered via egui on top of the 3D scene: title/start screen,
//! loading bar, score text, countdown and cutscene messages, end screen, and
//! an optional F3 debug panel.
//!
//! Integration pattern: egui requires a three-phase render split because
//! `egui_wgpu::Renderer::render()` needs a `RenderPass<'static>`, while
//! `begin_render_pass` borrows the encoder. The phases are:
//!
//!   1. `prepare()` -- run egui UI logic, produce tessellated primitives
//!   2. `upload()`  -- upload textures and update GPU buffers
//!   3. `paint()`   -- render into a new render pass with `forget_lifetime()`
//!   4. `cleanup()` -- free textures egui no longer references

use lunar_core::time::TimeState;
use winit::window::Window;

/// Everything the HUD needs to draw one frame, read from the session.
#[derive(Debug, Clone, Default)]
pub struct HudState {
    /// Show the title screen with the start button.
    pub show_start: bool,
    pub loading_visible: bool,
    /// Loading bar fraction in [0, 1].
    pub loading_fraction: f32,
    /// Bootstrap failure text shown on the loading screen.
    pub loading_error: Option<String>,
    /// Score shown top-left while a run is live.
    pub score: Option<u32>,
    /// Large centered text (countdown digits, cutscene messages).
    pub center_text: Option<String>,
    /// Alpha for the center text, driven by the fade tween.
    pub center_alpha: f32,
    /// Terminal end screen ("Game Over!" / "Game Won!").
    pub end_message: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct HudActions {
    /// User clicked the start button on the title screen.
    pub start_clicked: bool,
}

#[derive(Debug, Clone, Default)]
pub struct DebugStats {
    pub phase_label: String,
    pub barrier_count: u32,
    pub draw_calls: u32,
    pub speed: f32,
}

pub struct HudOverlay {
    pub egui_ctx: egui::Context,
    pub egui_winit_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,
    pub debug_visible: bool,
}

impl HudOverlay {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat, window: &Window) -> Self {
        let egui_ctx = egui::Context::default();
        let egui_winit_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);

        Self {
            egui_ctx,
            egui_winit_state,
            egui_renderer,
            debug_visible: false,
        }
    }

    pub fn handle_window_event(
        &mut self,
        window: &Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        let response = self.egui_winit_state.on_window_event(window, event);
        response.consumed
    }

    pub fn toggle_debug(&mut self) {
        self.debug_visible = !self.debug_visible;
        log::info!(
            "Debug panel: {}",
            if self.debug_visible { "ON" } else { "OFF" }
        );
    }

    pub fn prepare(
        &mut self,
        window: &Window,
        time: &TimeState,
        state: &HudState,
        stats: Option<DebugStats>,
    ) -> (
        Vec<egui::ClippedPrimitive>,
        egui::TexturesDelta,
        HudActions,
    ) {
        let mut actions = HudActions::default();
        let raw_input = self.egui_winit_state.take_egui_input(window);
        let debug_visible = self.debug_visible;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            draw_hud(ctx, state, &mut actions);
            if debug_visible {
                draw_debug_panel(ctx, time, stats.as_ref());
            }
        });

        self.egui_winit_state
            .handle_platform_output(window, full_output.platform_output);

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        (primitives, full_output.textures_delta, actions)
    }

    /// Upload textures and update buffers. Call before creating the egui render pass.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        primitives: &[egui::ClippedPrimitive],
        textures_delta: &egui::TexturesDelta,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, primitives, screen_descriptor);
    }

    /// Render into an existing render pass. Call after `upload()`.
    pub fn paint(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        primitives: &[egui::ClippedPrimitive],
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        self.egui_renderer
            .render(render_pass, primitives, screen_descriptor);
    }

    /// Free textures that egui no longer needs. Call after rendering.
    pub fn cleanup(&mut self, textures_delta: &egui::TexturesDelta) {
        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

fn draw_hud(ctx: &egui::Context, state: &HudState, actions: &mut HudActions) {
    if state.show_start {
        egui::Area::new(egui::Id::new("start_screen"))
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(
                        egui::RichText::new("LUNAR RUNNER")
                            .size(72.0)
                            .strong()
                            .color(egui::Color32::WHITE),
                    );
                    ui.add_space(24.0);
                    let start = egui::Button::new(
                        egui::RichText::new("START").size(32.0).strong(),
                    )
                    .min_size(egui::vec2(220.0, 64.0));
                    if ui.add(start).clicked() {
                        actions.start_clicked = true;
                    }
                });
            });
        return;
    }

    if state.loading_visible {
        egui::Area::new(egui::Id::new("loading_screen"))
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.set_width(420.0);
                ui.vertical_centered(|ui| {
                    ui.label(
                        egui::RichText::new("Loading...")
                            .size(28.0)
                            .color(egui::Color32::WHITE),
                    );
                    ui.add_space(12.0);
                    ui.add(egui::ProgressBar::new(state.loading_fraction).show_percentage());
                    if let Some(err) = &state.loading_error {
                        ui.add_space(12.0);
                        ui.label(
                            egui::RichText::new(err)
                                .size(18.0)
                                .color(egui::Color32::LIGHT_RED),
                        );
                    }
                });
            });
        return;
    }

    if let Some(message) = &state.end_message {
        egui::Area::new(egui::Id::new("end_screen"))
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(
                        egui::RichText::new(message)
                            .size(64.0)
                            .strong()
                            .color(egui::Color32::WHITE),
                    );
                    ui.add_space(24.0);
                    let again = egui::Button::new(
                        egui::RichText::new("PLAY AGAIN").size(28.0).strong(),
                    )
                    .min_size(egui::vec2(220.0, 56.0));
                    if ui.add(again).clicked() {
                        actions.start_clicked = true;
                    }
                });
            });
        return;
    }

    if let Some(score) = state.score {
        egui::Area::new(egui::Id::new("hud_score"))
            .anchor(egui::Align2::LEFT_TOP, [10.0, 10.0])
            .show(ctx, |ui| {
                ui.label(
                    egui::RichText::new(format!("Score: {}", score))
                        .size(36.0)
                        .color(egui::Color32::WHITE),
                );
            });
    }

    if let Some(text) = &state.center_text {
        let alpha = (state.center_alpha.clamp(0.0, 1.0) * 255.0) as u8;
        egui::Area::new(egui::Id::new("hud_center_text"))
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(
                    egui::RichText::new(text)
                        .size(96.0)
                        .strong()
                        .color(egui::Color32::from_rgba_unmultiplied(255, 255, 255, alpha)),
                );
            });
    }
}

fn draw_debug_panel(ctx: &egui::Context, time: &TimeState, stats: Option<&DebugStats>) {
    egui::Window::new("Debug")
        .default_pos([10.0, 80.0])
        .show(ctx, |ui| {
            ui.label(format!("FPS: {:.1}", time.smoothed_fps));
            ui.label(format!("Frame time: {:.2} ms", time.smoothed_frame_time_ms));
            ui.label(format!("Frame: {}", time.frame_count));
            if let Some(stats) = stats {
                ui.separator();
                ui.label(format!("Phase: {}", stats.phase_label));
                ui.label(format!("Barriers: {}", stats.barrier_count));
                ui.label(format!("Draw calls: {}", stats.draw_calls));
                ui.label(format!("Speed: {:.1}", stats.speed));
            }
        });
}
