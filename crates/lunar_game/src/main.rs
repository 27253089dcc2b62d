//! Lunar Runner -- main loop and application entry point.
//!
//! Architecture: winit drives the event loop via `ApplicationHandler`. All
//! simulation runs inside `RedrawRequested` on a variable timestep clamped by
//! `TimeState` (one slow frame never teleports the track):
//!
//!   1. `begin_frame()` -- measure wall-clock delta, clamp it
//!   2. feed input edges to the session, advance the session one step
//!   3. Rebuild the world mesh from session state
//!   4. Upload camera uniform, issue draw calls, composite the egui HUD
//!
//! The session owns the whole run (phase machine, track, barriers, player,
//! cutscenes); this file only wires it to the window, GPU, and HUD.

mod assets;
mod barrier;
mod collision;
mod config;
mod cutscene;
mod loading;
mod player;
mod session;
mod sound;
mod track;

use std::collections::HashMap;
use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use assets::{load_manifest_from_path, load_texture_or_fallback, AssetManifest};
use config::{load_tuning_from_path, Tuning};
use loading::LoadingScreen;
use lunar_core::action::ActionKind;
use lunar_core::input::{InputState, Key};
use lunar_core::rig::{load_rig_from_path, ActionClip, ActionRig};
use lunar_core::time::TimeState;
use lunar_core::tween::{Ease, Tween};
use lunar_overlay::{DebugStats, HudOverlay, HudState};
use lunar_platform::window::PlatformConfig;
use lunar_render::{FollowCamera, GpuContext, MeshVertex, ScenePipeline, Texture};
use player::Player;
use session::{GameSession, Phase};
use sound::{MusicPlayer, MUSIC_VOLUME};

const MANIFEST_PATH: &str = "assets/manifest.json";

const GROUND_WIDTH: f32 = 3.2;
const ROAD_WIDTH: f32 = 2.9;
const BARRIER_HALF: [f32; 3] = [0.37, 0.16, 0.1];
const PLAYER_HALF: [f32; 3] = [0.165, 0.15, 0.15];
const EARTH_CENTER: [f32; 3] = [0.0, 4.0, 90.0];
const EARTH_HALF_SIZE: f32 = 30.0;
const EARTH_SPIN_SECS: f32 = 10.0;

// Tints keep the scene readable even when every texture fell back to white.
const GROUND_COLOR: [f32; 4] = [0.23, 0.23, 0.27, 1.0];
const ROAD_COLOR: [f32; 4] = [0.42, 0.42, 0.48, 1.0];
const BARRIER_COLOR: [f32; 4] = [0.78, 0.22, 0.2, 1.0];
const PLAYER_COLOR: [f32; 4] = [0.9, 0.78, 0.35, 1.0];
const EARTH_COLOR: [f32; 4] = [0.35, 0.55, 0.9, 1.0];

/// A contiguous run of indices that share the same texture binding.
/// Draw calls are merged when consecutive faces use the same texture,
/// minimizing GPU bind-group switches during the render pass.
#[derive(Debug, Clone)]
struct DrawCall {
    texture_key: Arc<str>,
    index_start: u32,
    index_count: u32,
}

struct GpuWorldTexture {
    _texture: Texture,
    bind_group: wgpu::BindGroup,
}

/// All mutable game state. Constructed lazily in `ApplicationHandler::resumed`
/// once the window and GPU surface are available.
///
/// Ownership is split into three conceptual groups:
///  - **Core systems** (time, input, camera) -- updated every frame
///  - **Session** (phase machine, track, barriers, player) -- the game itself
///  - **GPU resources** (vertex/index/camera buffers, draw calls) -- rebuilt
///    from session state each frame
struct GameState {
    window: Arc<Window>,
    gpu: GpuContext,
    time: TimeState,
    input: InputState,
    camera: FollowCamera,
    scene_pipeline: ScenePipeline,
    hud: HudOverlay,
    loading: LoadingScreen,
    session: GameSession,
    music: MusicPlayer,
    earth_spin: Tween,
    textures: HashMap<Arc<str>, GpuWorldTexture>,

    // --- Per-frame GPU mesh state ---------------------------------------
    // The world mesh is rebuilt on the CPU each frame, then streamed into
    // these GPU buffers. Buffers grow (power-of-two) but never shrink.
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    mesh_vertex_capacity: usize,
    mesh_index_capacity: usize,
    draw_calls: Vec<DrawCall>,
}

impl GameState {
    fn new(window: Arc<Window>) -> Self {
        let gpu = GpuContext::new(window.clone());
        let time = TimeState::new();
        let input = InputState::new();
        let scene_pipeline = ScenePipeline::new(&gpu.device, gpu.surface_format);
        let hud = HudOverlay::new(&gpu.device, gpu.surface_format, &window);

        let mut loading = LoadingScreen::new();
        loading.show();

        let manifest_path = std::path::Path::new(MANIFEST_PATH);
        let manifest = match load_manifest_from_path(manifest_path) {
            Ok(manifest) => manifest,
            Err(err) => {
                loading.fail(err);
                fallback_manifest()
            }
        };

        let total_steps = manifest.step_count();
        let mut completed_steps = 0usize;
        let mut step_done = |loading: &mut LoadingScreen| {
            completed_steps += 1;
            loading.update_progress(100.0 * completed_steps as f32 / total_steps as f32);
        };

        let tuning = match load_tuning_from_path(&manifest.tuning) {
            Ok(tuning) => tuning,
            Err(err) => {
                loading.fail(err);
                Tuning::default()
            }
        };
        step_done(&mut loading);

        let rig = match load_rig_from_path(&manifest.rig) {
            Ok(rig) => rig,
            Err(err) => {
                loading.fail(err);
                fallback_rig()
            }
        };
        step_done(&mut loading);

        let mut textures = HashMap::new();
        for (name, path) in &manifest.textures {
            let texture = load_texture_or_fallback(&gpu.device, &gpu.queue, path, name);
            let bind_group = scene_pipeline.create_texture_bind_group(&gpu.device, &texture);
            textures.insert(
                Arc::<str>::from(name.as_str()),
                GpuWorldTexture {
                    _texture: texture,
                    bind_group,
                },
            );
            step_done(&mut loading);
        }

        let music = match &manifest.music {
            Some(path) => MusicPlayer::play_looped(path, MUSIC_VOLUME),
            None => MusicPlayer::silent(),
        };

        if loading.error().is_none() {
            loading.hide();
        }

        let session = GameSession::new(tuning, rig);
        let camera = FollowCamera::new(gpu.size.0, gpu.size.1);
        let earth_spin =
            Tween::new(0.0, std::f32::consts::TAU, EARTH_SPIN_SECS, Ease::Linear).repeating();

        let camera_uniform = camera.build_uniform();
        let camera_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Uniform Buffer"),
                contents: bytemuck::cast_slice(&[camera_uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group =
            scene_pipeline.create_camera_bind_group(&gpu.device, &camera_buffer);
        let vertex_buffer = create_vertex_buffer(&gpu.device, 1);
        let index_buffer = create_index_buffer(&gpu.device, 1);

        let mut state = Self {
            window,
            gpu,
            time,
            input,
            camera,
            scene_pipeline,
            hud,
            loading,
            session,
            music,
            earth_spin,
            textures,
            vertex_buffer,
            index_buffer,
            camera_buffer,
            camera_bind_group,
            mesh_vertex_capacity: 0,
            mesh_index_capacity: 0,
            draw_calls: Vec::new(),
        };

        state.rebuild_world_mesh();
        state
    }

    fn rebuild_world_mesh(&mut self) {
        // Build a single CPU-side mesh each frame from session state, then
        // stream it into GPU buffers.
        let (vertices, indices, draw_calls) = self.build_mesh();
        self.ensure_mesh_capacity(vertices.len(), indices.len());
        self.draw_calls = draw_calls;

        if !vertices.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
        }
        if !indices.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&indices));
        }
    }

    fn build_mesh(&self) -> (Vec<MeshVertex>, Vec<u32>, Vec<DrawCall>) {
        let tuning = self.session.tuning();
        let quad_estimate = tuning.ground_count
            + tuning.road_count
            + self.session.barriers.barriers().len() * 6
            + 8;
        let mut vertices = Vec::with_capacity(quad_estimate * 4);
        let mut indices = Vec::with_capacity(quad_estimate * 6);
        let mut draw_calls = Vec::with_capacity(8);

        // Track surfaces: each band position is the segment's rear edge.
        for &z0 in self.session.grounds.positions() {
            add_horizontal_quad(
                &mut vertices,
                &mut indices,
                &mut draw_calls,
                "ground",
                [0.0, 0.0, z0 + tuning.ground_length * 0.5],
                GROUND_WIDTH,
                tuning.ground_length,
                [1.0, tuning.ground_length / GROUND_WIDTH],
                GROUND_COLOR,
            );
        }
        for &z0 in self.session.roads.positions() {
            add_horizontal_quad(
                &mut vertices,
                &mut indices,
                &mut draw_calls,
                "road",
                [0.0, 0.01, z0 + tuning.road_length * 0.5],
                ROAD_WIDTH,
                tuning.road_length,
                [1.0, 1.0],
                ROAD_COLOR,
            );
        }

        for barrier in self.session.barriers.barriers() {
            let x = tuning.lane_offsets[barrier.lane];
            add_box(
                &mut vertices,
                &mut indices,
                &mut draw_calls,
                "barrier",
                [x, BARRIER_HALF[1], barrier.z],
                BARRIER_HALF,
                BARRIER_COLOR,
            );
        }

        let player = &self.session.player;
        add_box(
            &mut vertices,
            &mut indices,
            &mut draw_calls,
            "player",
            [
                player.x,
                PLAYER_HALF[1] + player.height,
                collision::PLAYER_Z,
            ],
            player_render_half(player),
            PLAYER_COLOR,
        );

        if self.session.descending() {
            add_spinning_quad(
                &mut vertices,
                &mut indices,
                &mut draw_calls,
                "earth",
                EARTH_CENTER,
                EARTH_HALF_SIZE,
                self.earth_spin.value(),
                EARTH_COLOR,
            );
        }

        (vertices, indices, draw_calls)
    }

    fn ensure_mesh_capacity(&mut self, vertex_count: usize, index_count: usize) {
        if vertex_count > self.mesh_vertex_capacity {
            let new_capacity = vertex_count.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.gpu.device, new_capacity);
            self.mesh_vertex_capacity = new_capacity;
        }
        if index_count > self.mesh_index_capacity {
            let new_capacity = index_count.next_power_of_two();
            self.index_buffer = create_index_buffer(&self.gpu.device, new_capacity);
            self.mesh_index_capacity = new_capacity;
        }
    }

    fn apply_input(&mut self) {
        if self.input.is_just_pressed(Key::Left) || self.input.is_just_pressed(Key::A) {
            self.session.steer_left();
        }
        if self.input.is_just_pressed(Key::Right) || self.input.is_just_pressed(Key::D) {
            self.session.steer_right();
        }
        if self.input.is_just_pressed(Key::Space) {
            self.session.jump();
        }
    }

    fn hud_state(&self) -> HudState {
        let show_score = score_visible(self.session.phase(), self.session.halted());
        HudState {
            show_start: self.session.phase() == Phase::NotStarted && !self.loading.is_visible(),
            loading_visible: self.loading.is_visible(),
            loading_fraction: self.loading.fraction(),
            loading_error: self.loading.error().map(str::to_string),
            score: show_score.then(|| self.session.score()),
            center_text: self.session.center_text().map(str::to_string),
            center_alpha: self.session.center_alpha(),
            end_message: self.session.end_message().map(str::to_string),
        }
    }
}

struct App {
    config: PlatformConfig,
    state: Option<GameState>,
}

impl App {
    fn new() -> Self {
        Self {
            config: PlatformConfig::default(),
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window = lunar_platform::window::create_window(event_loop, &self.config);
        self.state = Some(GameState::new(window));
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        let egui_consumed = state.hud.handle_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                state.music.stop();
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    state.gpu.resize(w, h);
                    state.camera.viewport = (w, h);
                    log::info!("Resized to {}x{}", w, h);
                }
            }

            WindowEvent::KeyboardInput { event, .. } if !egui_consumed => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(game_key) = map_key(key_code) {
                        match event.state {
                            ElementState::Pressed => state.input.key_down(game_key),
                            ElementState::Released => state.input.key_up(game_key),
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if state.gpu.size.0 == 0 || state.gpu.size.1 == 0 {
                    return;
                }

                state.time.begin_frame();
                let dt = state.time.frame_dt as f32;

                if state.input.is_just_pressed(Key::Escape) {
                    state.music.stop();
                    event_loop.exit();
                    return;
                }
                if state.input.is_just_pressed(Key::F3) {
                    state.hud.toggle_debug();
                }

                state.apply_input();
                state.session.update(dt);
                if state.session.descending() {
                    state.earth_spin.advance(dt);
                }
                state.camera.radius = state.session.camera_radius();

                state.rebuild_world_mesh();

                // Render phase reads finalized session state from this frame.
                let camera_uniform = state.camera.build_uniform();
                state.gpu.queue.write_buffer(
                    &state.camera_buffer,
                    0,
                    bytemuck::cast_slice(&[camera_uniform]),
                );

                let Some((output, view)) = state.gpu.begin_frame() else {
                    return;
                };

                let hud_state = state.hud_state();
                let (hud_primitives, hud_textures_delta, hud_actions) = state.hud.prepare(
                    &state.window,
                    &state.time,
                    &hud_state,
                    Some(DebugStats {
                        phase_label: state.session.phase().label().to_string(),
                        barrier_count: state.session.barriers.barriers().len() as u32,
                        draw_calls: state.draw_calls.len() as u32,
                        speed: state.session.player.speed,
                    }),
                );

                if hud_actions.start_clicked {
                    state.session.start();
                }

                let screen_descriptor = egui_wgpu::ScreenDescriptor {
                    size_in_pixels: [state.gpu.size.0, state.gpu.size.1],
                    pixels_per_point: state.window.scale_factor() as f32,
                };

                let mut encoder =
                    state
                        .gpu
                        .device
                        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("Render Encoder"),
                        });

                {
                    // Fog color: the clear color is the fog color, so distant
                    // geometry blends into the background.
                    let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("World Render Pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                                store: wgpu::StoreOp::Store,
                            },
                        })],
                        depth_stencil_attachment: Some(
                            wgpu::RenderPassDepthStencilAttachment {
                                view: &state.gpu.depth_view,
                                depth_ops: Some(wgpu::Operations {
                                    load: wgpu::LoadOp::Clear(1.0),
                                    store: wgpu::StoreOp::Store,
                                }),
                                stencil_ops: None,
                            },
                        ),
                        ..Default::default()
                    });

                    render_pass.set_pipeline(&state.scene_pipeline.render_pipeline);
                    render_pass.set_bind_group(0, &state.camera_bind_group, &[]);
                    render_pass.set_vertex_buffer(0, state.vertex_buffer.slice(..));
                    render_pass
                        .set_index_buffer(state.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

                    let mut last_bound_texture_key: Option<&Arc<str>> = None;
                    for draw in &state.draw_calls {
                        if let Some(texture) = state.textures.get(&draw.texture_key) {
                            let need_rebind = match last_bound_texture_key {
                                Some(last) => **last != *draw.texture_key,
                                None => true,
                            };
                            if need_rebind {
                                render_pass.set_bind_group(1, &texture.bind_group, &[]);
                                last_bound_texture_key = Some(&draw.texture_key);
                            }
                            render_pass.draw_indexed(
                                draw.index_start..(draw.index_start + draw.index_count),
                                0,
                                0..1,
                            );
                        }
                    }
                }

                state.hud.upload(
                    &state.gpu.device,
                    &state.gpu.queue,
                    &mut encoder,
                    &hud_primitives,
                    &hud_textures_delta,
                    &screen_descriptor,
                );

                {
                    let mut hud_pass = encoder
                        .begin_render_pass(&wgpu::RenderPassDescriptor {
                            label: Some("HUD Render Pass"),
                            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                                view: &view,
                                resolve_target: None,
                                ops: wgpu::Operations {
                                    load: wgpu::LoadOp::Load,
                                    store: wgpu::StoreOp::Store,
                                },
                            })],
                            depth_stencil_attachment: None,
                            ..Default::default()
                        })
                        .forget_lifetime();

                    state
                        .hud
                        .paint(&mut hud_pass, &hud_primitives, &screen_descriptor);
                }

                state.hud.cleanup(&hud_textures_delta);

                state.gpu.queue.submit(std::iter::once(encoder.finish()));
                output.present();

                state.input.end_frame();
            }

            _ => {}
        }
    }
}

fn create_vertex_buffer(device: &wgpu::Device, vertex_capacity: usize) -> wgpu::Buffer {
    let byte_len = (vertex_capacity * std::mem::size_of::<MeshVertex>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("World Vertex Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, index_capacity: usize) -> wgpu::Buffer {
    let byte_len = (index_capacity * std::mem::size_of::<u32>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("World Index Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// The score stays on screen through the ending sequence and only leaves
/// when the scene halts for the final overlay.
fn score_visible(phase: Phase, halted: bool) -> bool {
    match phase {
        Phase::Running => true,
        Phase::GameOver(_) => !halted,
        _ => false,
    }
}

/// While the jump clip plays the runner tucks in slightly.
fn player_render_half(player: &Player) -> [f32; 3] {
    if player.jumping {
        [PLAYER_HALF[0], PLAYER_HALF[1] * 0.85, PLAYER_HALF[2]]
    } else {
        PLAYER_HALF
    }
}

fn add_face(
    vertices: &mut Vec<MeshVertex>,
    indices: &mut Vec<u32>,
    draw_calls: &mut Vec<DrawCall>,
    texture_key: &str,
    corners: [[f32; 3]; 4],
    uvs: [[f32; 2]; 4],
    color: [f32; 4],
) {
    let base_index = vertices.len() as u32;
    for (corner, uv) in corners.iter().zip(uvs.iter()) {
        vertices.push(MeshVertex {
            position: *corner,
            tex_coords: *uv,
            color,
        });
    }

    let draw_start = indices.len() as u32;
    indices.extend_from_slice(&[
        base_index,
        base_index + 1,
        base_index + 2,
        base_index,
        base_index + 2,
        base_index + 3,
    ]);

    push_draw_call(draw_calls, Arc::from(texture_key), draw_start, 6);
}

/// Flat quad in the ground plane, UVs tiled by `uv_scale`.
fn add_horizontal_quad(
    vertices: &mut Vec<MeshVertex>,
    indices: &mut Vec<u32>,
    draw_calls: &mut Vec<DrawCall>,
    texture_key: &str,
    center: [f32; 3],
    width: f32,
    depth: f32,
    uv_scale: [f32; 2],
    color: [f32; 4],
) {
    let hw = width * 0.5;
    let hd = depth * 0.5;
    let [cx, cy, cz] = center;
    add_face(
        vertices,
        indices,
        draw_calls,
        texture_key,
        [
            [cx - hw, cy, cz - hd],
            [cx + hw, cy, cz - hd],
            [cx + hw, cy, cz + hd],
            [cx - hw, cy, cz + hd],
        ],
        [
            [0.0, uv_scale[1]],
            [uv_scale[0], uv_scale[1]],
            [uv_scale[0], 0.0],
            [0.0, 0.0],
        ],
        color,
    );
}

/// Axis-aligned box from six faces. Winding is irrelevant (no culling);
/// the depth buffer sorts the faces.
fn add_box(
    vertices: &mut Vec<MeshVertex>,
    indices: &mut Vec<u32>,
    draw_calls: &mut Vec<DrawCall>,
    texture_key: &str,
    center: [f32; 3],
    half: [f32; 3],
    color: [f32; 4],
) {
    let [cx, cy, cz] = center;
    let [hx, hy, hz] = half;
    let uv = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

    // Front and back (z faces).
    for &z in &[cz - hz, cz + hz] {
        add_face(
            vertices,
            indices,
            draw_calls,
            texture_key,
            [
                [cx - hx, cy - hy, z],
                [cx + hx, cy - hy, z],
                [cx + hx, cy + hy, z],
                [cx - hx, cy + hy, z],
            ],
            uv,
            color,
        );
    }
    // Left and right (x faces).
    for &x in &[cx - hx, cx + hx] {
        add_face(
            vertices,
            indices,
            draw_calls,
            texture_key,
            [
                [x, cy - hy, cz - hz],
                [x, cy - hy, cz + hz],
                [x, cy + hy, cz + hz],
                [x, cy + hy, cz - hz],
            ],
            uv,
            color,
        );
    }
    // Top and bottom (y faces).
    for &y in &[cy - hy, cy + hy] {
        add_face(
            vertices,
            indices,
            draw_calls,
            texture_key,
            [
                [cx - hx, y, cz - hz],
                [cx + hx, y, cz - hz],
                [cx + hx, y, cz + hz],
                [cx - hx, y, cz + hz],
            ],
            uv,
            color,
        );
    }
}

/// Camera-facing quad rotated by `angle` radians around the view axis.
/// This is the earth disc seen during the win descent.
fn add_spinning_quad(
    vertices: &mut Vec<MeshVertex>,
    indices: &mut Vec<u32>,
    draw_calls: &mut Vec<DrawCall>,
    texture_key: &str,
    center: [f32; 3],
    half_size: f32,
    angle: f32,
    color: [f32; 4],
) {
    let (sin_a, cos_a) = angle.sin_cos();
    let rotate = |x: f32, y: f32| [x * cos_a - y * sin_a, x * sin_a + y * cos_a];
    let offsets = [
        rotate(-half_size, -half_size),
        rotate(half_size, -half_size),
        rotate(half_size, half_size),
        rotate(-half_size, half_size),
    ];
    let [cx, cy, cz] = center;
    let corners = [
        [cx + offsets[0][0], cy + offsets[0][1], cz],
        [cx + offsets[1][0], cy + offsets[1][1], cz],
        [cx + offsets[2][0], cy + offsets[2][1], cz],
        [cx + offsets[3][0], cy + offsets[3][1], cz],
    ];
    add_face(
        vertices,
        indices,
        draw_calls,
        texture_key,
        corners,
        [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]],
        color,
    );
}

/// Append a draw call, merging with the previous one when the texture matches
/// and indices are contiguous. World geometry is emitted grouped by texture,
/// so each group collapses into a single `draw_indexed` call.
fn push_draw_call(
    draw_calls: &mut Vec<DrawCall>,
    texture_key: Arc<str>,
    index_start: u32,
    index_count: u32,
) {
    if let Some(last) = draw_calls.last_mut() {
        let contiguous = last.index_start + last.index_count == index_start;
        if *last.texture_key == *texture_key && contiguous {
            last.index_count += index_count;
            return;
        }
    }
    draw_calls.push(DrawCall {
        texture_key,
        index_start,
        index_count,
    });
}

/// Manifest used when the real one fails to load; every texture path will
/// miss and fall back to white, but the game still boots.
fn fallback_manifest() -> AssetManifest {
    use std::path::PathBuf;
    let mut textures = std::collections::BTreeMap::new();
    for &name in assets::REQUIRED_TEXTURES {
        textures.insert(
            name.to_string(),
            PathBuf::from(format!("assets/textures/{name}.png")),
        );
    }
    AssetManifest {
        version: "0.1".to_string(),
        textures,
        rig: PathBuf::from("assets/animations/player_actions.json"),
        tuning: PathBuf::from("assets/config/game.json"),
        music: None,
    }
}

/// In-code rig used when the rig file fails validation.
fn fallback_rig() -> ActionRig {
    let mut clips = HashMap::new();
    let clip = |duration_ms: u64, looping: bool| ActionClip {
        duration_us: duration_ms * 1000,
        looping,
    };
    clips.insert(ActionKind::Idle, clip(2000, true));
    clips.insert(ActionKind::Run, clip(800, true));
    clips.insert(ActionKind::Jump, clip(750, false));
    clips.insert(ActionKind::Death, clip(1000, false));
    clips.insert(ActionKind::Victory, clip(1800, false));
    clips.insert(ActionKind::Flying, clip(1200, true));
    ActionRig::from_clips("fallback", clips).unwrap_or_else(|err| {
        panic!("Fallback rig is incomplete: {err}");
    })
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::Space => Some(Key::Space),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::F3 => Some(Key::F3),
        KeyCode::KeyA => Some(Key::A),
        KeyCode::KeyD => Some(Key::D),
        _ => None,
    }
}


fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Lunar Runner starting...");

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app).expect("Event loop error");
}
