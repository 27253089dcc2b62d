//! Loading overlay state shown while assets are prepared.

/// Tracks what the loading overlay should display. The overlay itself is
/// drawn by the HUD; this only owns the numbers.
pub struct LoadingScreen {
    visible: bool,
    percent: f32,
    error: Option<String>,
}

impl LoadingScreen {
    pub fn new() -> Self {
        LoadingScreen {
            visible: false,
            percent: 0.0,
            error: None,
        }
    }

    pub fn show(&mut self) {
        self.visible = true;
        self.percent = 0.0;
        self.error = None;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Update the displayed percentage, clamped to 0-100.
    pub fn update_progress(&mut self, percent: f32) {
        self.percent = percent.clamp(0.0, 100.0);
    }

    /// Record a load failure. The overlay stays up showing the message.
    pub fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::error!("Asset loading failed: {message}");
        self.visible = true;
        self.error = Some(message);
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn fraction(&self) -> f32 {
        self.percent / 100.0
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl Default for LoadingScreen {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_clamped_to_percent_range() {
        let mut screen = LoadingScreen::new();
        screen.show();
        screen.update_progress(-20.0);
        assert_eq!(screen.fraction(), 0.0);
        screen.update_progress(350.0);
        assert_eq!(screen.fraction(), 1.0);
        screen.update_progress(45.0);
        assert!((screen.fraction() - 0.45).abs() < 1e-6);
    }

    #[test]
    fn failure_keeps_overlay_visible_with_message() {
        let mut screen = LoadingScreen::new();
        screen.show();
        screen.fail("missing rig file");
        screen.hide();
        // hide() is honored, but a fresh failure re-raises the overlay.
        assert!(!screen.is_visible());
        screen.fail("missing rig file");
        assert!(screen.is_visible());
        assert_eq!(screen.error(), Some("missing rig file"));
    }

    #[test]
    fn show_resets_previous_state() {
        let mut screen = LoadingScreen::new();
        screen.show();
        screen.update_progress(80.0);
        screen.fail("boom");
        screen.show();
        assert_eq!(screen.fraction(), 0.0);
        assert_eq!(screen.error(), None);
    }
}
