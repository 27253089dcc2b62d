//! Runner state: lane steering, jump physics, and action clip playback.

use lunar_core::action::ActionKind;
use lunar_core::rig::{ActionRig, ActionState};

use crate::config::Tuning;

/// The player-controlled runner.
///
/// Lane index is the authoritative horizontal position; `x` eases toward
/// the lane offset a fraction per frame so lane changes read smoothly.
pub struct Player {
    pub lane: usize,
    pub x: f32,
    pub height: f32,
    pub vertical_velocity: f32,
    pub jumping: bool,
    /// Current forward speed, reduced while airborne.
    pub speed: f32,
    base_speed: f32,
    pub action: ActionState,
    rig: ActionRig,
}

impl Player {
    pub fn new(tuning: &Tuning, rig: ActionRig) -> Self {
        Player {
            lane: 1,
            x: tuning.lane_offsets[1],
            height: 0.0,
            vertical_velocity: 0.0,
            jumping: false,
            speed: tuning.speed,
            base_speed: tuning.speed,
            action: ActionState::new(ActionKind::Idle),
            rig,
        }
    }

    /// Reset to the center lane standing still, playing the given action.
    pub fn reset(&mut self, tuning: &Tuning, action: ActionKind) {
        self.lane = 1;
        self.x = tuning.lane_offsets[1];
        self.height = 0.0;
        self.vertical_velocity = 0.0;
        self.jumping = false;
        self.speed = tuning.speed;
        self.base_speed = tuning.speed;
        self.action = ActionState::new(action);
    }

    pub fn play(&mut self, kind: ActionKind) {
        if self.action.kind != kind {
            self.action = ActionState::new(kind);
        }
    }

    /// Move one lane toward negative x. Returns false at the edge lane.
    pub fn steer_left(&mut self) -> bool {
        if self.lane == 0 {
            return false;
        }
        self.lane -= 1;
        true
    }

    /// Move one lane toward positive x. Returns false at the edge lane.
    pub fn steer_right(&mut self, lane_count: usize) -> bool {
        if self.lane + 1 >= lane_count {
            return false;
        }
        self.lane += 1;
        true
    }

    /// Launch a jump. Ignored while already airborne.
    pub fn jump(&mut self, tuning: &Tuning) -> bool {
        if self.jumping {
            return false;
        }
        self.jumping = true;
        self.vertical_velocity = tuning.jump_impulse;
        self.speed = self.base_speed * tuning.jump_speed_factor;
        self.play(ActionKind::Jump);
        true
    }

    pub fn update(&mut self, dt: f32, tuning: &Tuning) {
        // Ease toward the lane offset by a fixed fraction of the gap.
        let target = tuning.lane_offsets[self.lane];
        self.x += (target - self.x) * tuning.lane_follow;

        if self.jumping {
            self.vertical_velocity -= tuning.gravity * dt;
            self.height += self.vertical_velocity * dt;
            if self.height <= 0.0 {
                self.height = 0.0;
                self.vertical_velocity = 0.0;
                self.jumping = false;
            }
        }

        let clip = self.rig.clip(self.action.kind);
        self.action.tick((dt as f64 * 1_000_000.0) as u64, clip);
        if self.action.kind == ActionKind::Jump && self.action.finished {
            self.speed = self.base_speed;
            self.play(ActionKind::Run);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lunar_core::rig::ActionClip;
    use std::collections::HashMap;

    fn test_rig() -> ActionRig {
        let mut clips = HashMap::new();
        for &kind in ActionKind::ALL {
            let looping = matches!(kind, ActionKind::Idle | ActionKind::Run | ActionKind::Flying);
            clips.insert(
                kind,
                ActionClip {
                    duration_us: 500_000,
                    looping,
                },
            );
        }
        ActionRig::from_clips("test", clips).expect("complete test rig")
    }

    fn player() -> (Player, Tuning) {
        let tuning = Tuning::default();
        (Player::new(&tuning, test_rig()), tuning)
    }

    #[test]
    fn starts_in_center_lane() {
        let (player, tuning) = player();
        assert_eq!(player.lane, 1);
        assert_eq!(player.x, tuning.lane_offsets[1]);
    }

    #[test]
    fn steering_clamps_at_edge_lanes() {
        let (mut player, tuning) = player();
        assert!(player.steer_left());
        assert!(!player.steer_left());
        assert_eq!(player.lane, 0);

        assert!(player.steer_right(tuning.lane_offsets.len()));
        assert!(player.steer_right(tuning.lane_offsets.len()));
        assert!(!player.steer_right(tuning.lane_offsets.len()));
        assert_eq!(player.lane, 2);
    }

    #[test]
    fn x_converges_to_lane_offset() {
        let (mut player, tuning) = player();
        player.steer_left();
        for _ in 0..200 {
            player.update(1.0 / 60.0, &tuning);
        }
        assert!((player.x - tuning.lane_offsets[0]).abs() < 1e-3);
    }

    #[test]
    fn jump_slows_runner_until_clip_finishes() {
        let (mut player, tuning) = player();
        player.play(ActionKind::Run);
        assert!(player.jump(&tuning));
        assert!((player.speed - tuning.speed * tuning.jump_speed_factor).abs() < 1e-6);
        assert!(!player.jump(&tuning));

        // Jump clip lasts 0.5s in the test rig.
        for _ in 0..60 {
            player.update(1.0 / 60.0, &tuning);
        }
        assert_eq!(player.action.kind, ActionKind::Run);
        assert!((player.speed - tuning.speed).abs() < 1e-6);
    }

    #[test]
    fn jump_rises_then_lands_at_ground() {
        let (mut player, tuning) = player();
        assert!(player.jump(&tuning));
        let mut apex = 0.0f32;
        for _ in 0..240 {
            player.update(1.0 / 60.0, &tuning);
            apex = apex.max(player.height);
        }
        let expected = tuning.jump_impulse * tuning.jump_impulse / (2.0 * tuning.gravity);
        assert!(apex > expected * 0.8 && apex < expected * 1.2);
        assert_eq!(player.height, 0.0);
        assert!(!player.jumping);
    }

    #[test]
    fn reset_returns_to_center_with_requested_action() {
        let (mut player, tuning) = player();
        player.steer_left();
        player.jump(&tuning);
        player.update(0.01, &tuning);
        player.reset(&tuning, ActionKind::Run);
        assert_eq!(player.lane, 1);
        assert_eq!(player.height, 0.0);
        assert!(!player.jumping);
        assert_eq!(player.action.kind, ActionKind::Run);
    }
}
