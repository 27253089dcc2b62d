//! Minimal scalar tweens for presentation effects: the win-sequence camera
//! zoom, the spinning earth, and the congratulations text fade. Tweens never
//! drive simulation state.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ease {
    Linear,
    /// Quadratic ease-in-out.
    PowerInOut,
}

impl Ease {
    fn apply(self, t: f32) -> f32 {
        match self {
            Self::Linear => t,
            Self::PowerInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u / 2.0
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Tween {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
    ease: Ease,
    repeating: bool,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration: f32, ease: Ease) -> Self {
        Self {
            from,
            to,
            duration: duration.max(f32::EPSILON),
            elapsed: 0.0,
            ease,
            repeating: false,
        }
    }

    /// Restart from the beginning when the end is reached (earth spin).
    pub fn repeating(mut self) -> Self {
        self.repeating = true;
        self
    }

    /// Advance by `dt` seconds and return the current value.
    pub fn advance(&mut self, dt: f32) -> f32 {
        self.elapsed += dt;
        if self.repeating && self.elapsed >= self.duration {
            self.elapsed %= self.duration;
        }
        self.value()
    }

    pub fn value(&self) -> f32 {
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * self.ease.apply(t)
    }

    pub fn finished(&self) -> bool {
        !self.repeating && self.elapsed >= self.duration
    }
}
