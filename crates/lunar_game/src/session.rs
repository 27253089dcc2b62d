//! The game session: one explicit state machine owning every piece of
//! per-run state, updated once per frame.

use lunar_core::action::ActionKind;
use lunar_core::rig::ActionRig;
use lunar_core::tween::{Ease, Tween};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::barrier::BarrierField;
use crate::collision::{barrier_collider, player_collider};
use crate::config::Tuning;
use crate::cutscene::{Cutscene, CutsceneEvent};
use crate::player::Player;
use crate::track::TrackBand;

const CAMERA_RADIUS: f32 = 10.0;
const DESCENT_RADIUS: f32 = 55.0;
const DESCENT_DURATION: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Lost,
    Won,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Countdown,
    Running,
    GameOver(Outcome),
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::NotStarted => "not started",
            Phase::Countdown => "countdown",
            Phase::Running => "running",
            Phase::GameOver(Outcome::Lost) => "lost",
            Phase::GameOver(Outcome::Won) => "won",
        }
    }
}

pub struct GameSession {
    tuning: Tuning,
    phase: Phase,
    score: u32,
    pub player: Player,
    pub grounds: TrackBand,
    pub roads: TrackBand,
    pub barriers: BarrierField,
    cutscene: Option<Cutscene>,
    rng: StdRng,
    center_text: Option<String>,
    center_fade: Option<Tween>,
    end_message: Option<String>,
    halted: bool,
    descending: bool,
    camera_zoom: Option<Tween>,
}

impl GameSession {
    pub fn new(tuning: Tuning, rig: ActionRig) -> Self {
        Self::with_rng(tuning, rig, StdRng::from_entropy())
    }

    pub fn with_rng(tuning: Tuning, rig: ActionRig, rng: StdRng) -> Self {
        let player = Player::new(&tuning, rig);
        let grounds = Self::ground_band(&tuning);
        let roads = Self::road_band(&tuning);
        let barriers = BarrierField::new(
            tuning.barrier_spawn_interval,
            tuning.barrier_spawn_z,
            tuning.barrier_cull_z,
        );
        GameSession {
            tuning,
            phase: Phase::NotStarted,
            score: 0,
            player,
            grounds,
            roads,
            barriers,
            cutscene: None,
            rng,
            center_text: None,
            center_fade: None,
            end_message: None,
            halted: false,
            descending: false,
            camera_zoom: None,
        }
    }

    fn ground_band(tuning: &Tuning) -> TrackBand {
        TrackBand::new(
            tuning.ground_count,
            tuning.ground_length,
            -tuning.ground_length,
            0.0,
        )
    }

    fn road_band(tuning: &Tuning) -> TrackBand {
        TrackBand::new(
            tuning.road_count,
            tuning.road_length,
            -2.0 * tuning.road_length,
            -tuning.road_length,
        )
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn center_text(&self) -> Option<&str> {
        self.center_text.as_deref()
    }

    /// Opacity of the center text, 0.0 when fully faded out.
    pub fn center_alpha(&self) -> f32 {
        match &self.center_fade {
            Some(fade) => fade.value(),
            None => 1.0,
        }
    }

    pub fn end_message(&self) -> Option<&str> {
        self.end_message.as_deref()
    }

    pub fn halted(&self) -> bool {
        self.halted
    }

    /// True once the win sequence has revealed the earth.
    pub fn descending(&self) -> bool {
        self.descending
    }

    pub fn camera_radius(&self) -> f32 {
        match &self.camera_zoom {
            Some(zoom) => zoom.value(),
            None => CAMERA_RADIUS,
        }
    }

    /// Begin a run from the start screen, or restart after a game over.
    pub fn start(&mut self) -> bool {
        match self.phase {
            Phase::NotStarted | Phase::GameOver(_) => {
                self.phase = Phase::Countdown;
                self.score = 0;
                self.halted = false;
                self.descending = false;
                self.camera_zoom = None;
                self.end_message = None;
                self.center_text = None;
                self.center_fade = None;
                self.player.reset(&self.tuning, ActionKind::Idle);
                self.grounds = Self::ground_band(&self.tuning);
                self.roads = Self::road_band(&self.tuning);
                self.barriers.clear();
                log::info!("Starting run countdown");
                self.start_cutscene(Cutscene::countdown());
                true
            }
            _ => false,
        }
    }

    pub fn steer_left(&mut self) -> bool {
        self.phase == Phase::Running && self.player.steer_left()
    }

    pub fn steer_right(&mut self) -> bool {
        let lanes = self.tuning.lane_offsets.len();
        self.phase == Phase::Running && self.player.steer_right(lanes)
    }

    pub fn jump(&mut self) -> bool {
        self.phase == Phase::Running && self.player.jump(&self.tuning)
    }

    pub fn update(&mut self, dt: f32) {
        if let Some(mut script) = self.cutscene.take() {
            let events = script.advance(dt);
            if !script.finished() {
                self.cutscene = Some(script);
            }
            for event in events {
                self.apply(event);
            }
        }

        if let Some(fade) = &mut self.center_fade {
            fade.advance(dt);
            if fade.finished() {
                self.center_text = None;
                self.center_fade = None;
            }
        }
        if let Some(zoom) = &mut self.camera_zoom {
            zoom.advance(dt);
        }

        if self.halted {
            return;
        }

        if self.phase == Phase::Running {
            self.step_world(dt);
        } else {
            // Keep action playback alive through the countdown and endings.
            self.player.update(dt, &self.tuning);
        }
    }

    fn step_world(&mut self, dt: f32) {
        self.player.update(dt, &self.tuning);
        let speed = self.player.speed;
        self.grounds.advance(speed, dt);
        self.roads.advance(speed, dt);

        let update = self.barriers.advance(speed, dt, &mut self.rng);
        if update.score_gain > 0 {
            self.score += update.score_gain;
            if self.score >= self.tuning.win_score {
                self.enter_won();
                return;
            }
        }

        let runner = player_collider(self.player.x, self.player.height);
        let hit = self.barriers.barriers().iter().any(|barrier| {
            let x = self.tuning.lane_offsets[barrier.lane];
            runner.intersects(&barrier_collider(x, barrier.z))
        });
        if hit {
            self.enter_lost();
        }
    }

    fn enter_won(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        self.phase = Phase::GameOver(Outcome::Won);
        log::info!("Run won with score {}", self.score);
        self.start_cutscene(Cutscene::win_sequence());
    }

    fn enter_lost(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        self.phase = Phase::GameOver(Outcome::Lost);
        log::info!("Run lost with score {}", self.score);
        self.start_cutscene(Cutscene::lose_sequence(self.score));
    }

    /// Replace any pending sequence, cancelling its remaining steps, and
    /// fire the new script's zero-time steps immediately.
    fn start_cutscene(&mut self, mut script: Cutscene) {
        for event in script.advance(0.0) {
            self.apply(event);
        }
        self.cutscene = if script.finished() { None } else { Some(script) };
    }

    fn apply(&mut self, event: CutsceneEvent) {
        match event {
            CutsceneEvent::ShowCenterText(text) => {
                self.center_text = Some(text);
                self.center_fade = None;
            }
            CutsceneEvent::ClearCenterText => {
                self.center_text = None;
                self.center_fade = None;
            }
            CutsceneEvent::FadeCenterText { text, duration } => {
                self.center_text = Some(text);
                self.center_fade = Some(Tween::new(1.0, 0.0, duration, Ease::Linear));
            }
            CutsceneEvent::PlayAction(kind) => self.player.play(kind),
            CutsceneEvent::StartRun => {
                if self.phase == Phase::Countdown {
                    self.score = 0;
                    self.phase = Phase::Running;
                }
            }
            CutsceneEvent::BeginDescent => {
                self.descending = true;
                self.camera_zoom = Some(Tween::new(
                    CAMERA_RADIUS,
                    DESCENT_RADIUS,
                    DESCENT_DURATION,
                    Ease::PowerInOut,
                ));
            }
            CutsceneEvent::EndGame { message } => {
                self.halted = true;
                self.center_text = None;
                self.center_fade = None;
                self.end_message = Some(message);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::barrier::Barrier;
    use lunar_core::rig::ActionClip;
    use std::collections::HashMap;

    fn test_rig() -> ActionRig {
        let mut clips = HashMap::new();
        for &kind in ActionKind::ALL {
            let looping = matches!(kind, ActionKind::Idle | ActionKind::Run | ActionKind::Flying);
            clips.insert(
                kind,
                ActionClip {
                    duration_us: 400_000,
                    looping,
                },
            );
        }
        ActionRig::from_clips("test", clips).expect("complete test rig")
    }

    fn session() -> GameSession {
        GameSession::with_rng(Tuning::default(), test_rig(), StdRng::seed_from_u64(7))
    }

    fn run_until_running(session: &mut GameSession) {
        session.start();
        for _ in 0..300 {
            session.update(1.0 / 60.0);
            if session.phase() == Phase::Running {
                return;
            }
        }
        panic!("countdown never reached the running phase");
    }

    #[test]
    fn countdown_shows_beats_then_starts_run() {
        let mut session = session();
        assert!(session.start());
        assert_eq!(session.phase(), Phase::Countdown);
        assert_eq!(session.center_text(), Some("3"));

        session.update(1.05);
        assert_eq!(session.center_text(), Some("2"));
        session.update(1.0);
        assert_eq!(session.center_text(), Some("1"));
        session.update(1.0);
        assert_eq!(session.center_text(), Some("READY!"));
        session.update(1.0);
        assert_eq!(session.center_text(), None);
        assert_eq!(session.phase(), Phase::Running);
        assert_eq!(session.score(), 0);
        assert_eq!(session.player.action.kind, ActionKind::Run);
    }

    #[test]
    fn start_is_rejected_while_a_run_is_live() {
        let mut session = session();
        assert!(session.start());
        assert!(!session.start());
    }

    #[test]
    fn steering_only_works_while_running() {
        let mut session = session();
        assert!(!session.steer_left());
        run_until_running(&mut session);
        assert!(session.steer_left());
    }

    #[test]
    fn collision_enters_lost_then_shows_final_score() {
        let mut session = session();
        run_until_running(&mut session);
        session.score = 42;

        // Drop a barrier directly onto the runner's lane and depth.
        session.barriers.barriers.push(Barrier {
            lane: session.player.lane,
            z: crate::collision::PLAYER_Z,
        });
        session.update(1.0 / 60.0);
        assert_eq!(session.phase(), Phase::GameOver(Outcome::Lost));
        assert_eq!(session.player.action.kind, ActionKind::Death);
        assert!(session.end_message().is_none());

        session.update(1.3);
        assert!(session.halted());
        assert_eq!(
            session.end_message(),
            Some("Game Over!\nYour Score: 42")
        );
    }

    #[test]
    fn reaching_win_score_enters_won_and_descends() {
        let mut session = session();
        run_until_running(&mut session);
        session.score = session.tuning().win_score - 1;

        // Park a barrier just past the cull line so the next frame scores it.
        session.barriers.barriers.push(Barrier {
            lane: 0,
            z: session.tuning().barrier_cull_z + 0.05,
        });
        session.update(1.0 / 60.0);
        assert_eq!(session.phase(), Phase::GameOver(Outcome::Won));
        assert_eq!(session.player.action.kind, ActionKind::Victory);
        assert!(!session.descending());

        session.update(3.1);
        assert!(session.descending());
        assert_eq!(session.player.action.kind, ActionKind::Flying);
        assert_eq!(session.center_text(), Some("You are falling on the earth!"));

        session.update(5.0);
        assert!(session.halted());
        assert_eq!(session.end_message(), Some("Game Won!\nYou are on the earth!"));
        assert!((session.camera_radius() - DESCENT_RADIUS).abs() < 1e-3);
    }

    #[test]
    fn simultaneous_win_and_collision_resolves_to_won() {
        let mut session = session();
        run_until_running(&mut session);
        session.score = session.tuning().win_score - 1;

        // One frame delivers both triggers: a barrier about to cull (scoring
        // past the win threshold) and a barrier already on the runner. The
        // score check runs first, so the run must end as a win.
        session.barriers.barriers.push(Barrier {
            lane: 0,
            z: session.tuning().barrier_cull_z + 0.05,
        });
        session.barriers.barriers.push(Barrier {
            lane: session.player.lane,
            z: crate::collision::PLAYER_Z,
        });
        session.update(1.0 / 60.0);
        assert_eq!(session.phase(), Phase::GameOver(Outcome::Won));
        assert_eq!(session.player.action.kind, ActionKind::Victory);

        // The win ending plays out; the loss ending never fires.
        session.update(8.0);
        assert_eq!(session.phase(), Phase::GameOver(Outcome::Won));
        assert_ne!(session.player.action.kind, ActionKind::Death);
        assert_eq!(session.end_message(), Some("Game Won!\nYou are on the earth!"));
    }

    #[test]
    fn restart_during_the_ending_sequence_drops_pending_steps() {
        let mut session = session();
        run_until_running(&mut session);
        session.score = 17;
        session.barriers.barriers.push(Barrier {
            lane: session.player.lane,
            z: crate::collision::PLAYER_Z,
        });
        session.update(1.0 / 60.0);
        assert_eq!(session.phase(), Phase::GameOver(Outcome::Lost));
        assert!(!session.halted());

        // Restart while the loss sequence is still counting down its delay.
        assert!(session.start());
        assert_eq!(session.phase(), Phase::Countdown);
        assert_eq!(session.center_text(), Some("3"));

        // Well past the cancelled sequence's fire time, the stale ending
        // must never surface and the countdown proceeds normally.
        session.update(1.5);
        assert!(session.end_message().is_none());
        assert!(!session.halted());
        assert_eq!(session.center_text(), Some("2"));
    }

    #[test]
    fn world_freezes_once_the_run_ends() {
        let mut session = session();
        run_until_running(&mut session);
        session.barriers.barriers.push(Barrier {
            lane: session.player.lane,
            z: crate::collision::PLAYER_Z,
        });
        session.update(1.0 / 60.0);
        let frozen = session.grounds.positions().to_vec();
        session.update(0.5);
        assert_eq!(session.grounds.positions(), frozen.as_slice());
    }

    #[test]
    fn restart_after_loss_clears_the_previous_run() {
        let mut session = session();
        run_until_running(&mut session);
        session.score = 17;
        session.barriers.barriers.push(Barrier {
            lane: session.player.lane,
            z: crate::collision::PLAYER_Z,
        });
        session.update(1.0 / 60.0);
        session.update(1.3);
        assert!(session.halted());

        assert!(session.start());
        assert_eq!(session.phase(), Phase::Countdown);
        assert_eq!(session.score(), 0);
        assert!(session.barriers.barriers().is_empty());
        assert!(session.end_message().is_none());
        assert!(!session.halted());

        // The stale ending must never resurface after the restart.
        session.update(0.1);
        assert!(session.end_message().is_none());
    }

    #[test]
    fn long_run_with_jumping_survives_without_panic() {
        let mut session = session();
        run_until_running(&mut session);
        for frame in 0..3600 {
            if frame % 40 == 0 {
                session.jump();
            }
            session.update(1.0 / 60.0);
            if session.phase() != Phase::Running {
                break;
            }
        }
    }
}
