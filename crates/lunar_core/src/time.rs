use std::time::Instant;

const FPS_SAMPLE_COUNT: usize = 60;

/// Clamp a raw frame delta so one slow frame cannot teleport the track.
/// Simulation consumers always receive a value in `(0, max]`.
pub fn clamp_frame_dt(real_dt: f64, max_frame_dt: f64) -> f64 {
    if real_dt > max_frame_dt {
        max_frame_dt
    } else {
        real_dt
    }
}

/// Per-frame wall-clock bookkeeping. The game simulates with a variable
/// per-frame delta capped at `max_frame_dt` (50ms), so a stall behind the
/// compositor slows the world down instead of jumping it forward.
pub struct TimeState {
    pub max_frame_dt: f64,
    pub real_dt: f64,
    pub frame_dt: f64,
    pub total_time: f64,
    pub frame_count: u64,
    last_instant: Instant,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl TimeState {
    pub fn new() -> Self {
        Self {
            max_frame_dt: 0.05,
            real_dt: 0.0,
            frame_dt: 0.0,
            total_time: 0.0,
            frame_count: 0,
            last_instant: Instant::now(),
            fps_samples: [1.0 / 60.0; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 60.0,
            smoothed_frame_time_ms: 16.667,
        }
    }

    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        self.real_dt = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;

        if self.real_dt > self.max_frame_dt {
            log::debug!(
                "Frame took {:.1}ms, clamping dt to {}ms",
                self.real_dt * 1000.0,
                self.max_frame_dt * 1000.0
            );
        }
        self.frame_dt = clamp_frame_dt(self.real_dt, self.max_frame_dt);

        self.total_time += self.frame_dt;
        self.frame_count += 1;

        // FPS smoothing over real (unclamped) frame times.
        self.fps_samples[self.fps_sample_index] = self.real_dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
    }
}

impl Default for TimeState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_passes_small_deltas_through() {
        assert_eq!(clamp_frame_dt(0.016, 0.05), 0.016);
        assert_eq!(clamp_frame_dt(0.05, 0.05), 0.05);
    }

    #[test]
    fn clamp_caps_large_deltas() {
        assert_eq!(clamp_frame_dt(0.3, 0.05), 0.05);
        assert_eq!(clamp_frame_dt(10.0, 0.05), 0.05);
    }

    #[test]
    fn begin_frame_advances_counters() {
        let mut time = TimeState::new();
        time.begin_frame();
        time.begin_frame();
        assert_eq!(time.frame_count, 2);
        assert!(time.frame_dt <= time.max_frame_dt);
        assert!(time.total_time >= 0.0);
    }
}
