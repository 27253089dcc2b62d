//! Timed scripted sequences: the start countdown and both endings.
//!
//! A sequence is a flat list of timestamped events. The session owns at most
//! one sequence at a time and drops it to cancel; there are no detached
//! timers that could fire after the game state has moved on.

use lunar_core::action::ActionKind;

#[derive(Debug, Clone, PartialEq)]
pub enum CutsceneEvent {
    /// Show large center text at full opacity.
    ShowCenterText(String),
    ClearCenterText,
    /// Show center text that fades out over the given duration in seconds.
    FadeCenterText { text: String, duration: f32 },
    PlayAction(ActionKind),
    /// Countdown finished: zero the score and start the run.
    StartRun,
    /// Win sequence midpoint: reveal the earth and begin the camera pull-out.
    BeginDescent,
    /// Halt the world and show the final overlay.
    EndGame { message: String },
}

#[derive(Debug, Clone)]
struct Step {
    at: f32,
    event: CutsceneEvent,
}

/// A running scripted sequence. Steps fire in order as time passes.
pub struct Cutscene {
    steps: Vec<Step>,
    elapsed: f32,
    next: usize,
}

impl Cutscene {
    fn from_steps(steps: Vec<Step>) -> Self {
        debug_assert!(steps.windows(2).all(|w| w[0].at <= w[1].at));
        Cutscene {
            steps,
            elapsed: 0.0,
            next: 0,
        }
    }

    /// "3", "2", "1", "READY!" at one-second intervals, then the run starts.
    pub fn countdown() -> Self {
        Self::from_steps(vec![
            Step {
                at: 0.0,
                event: CutsceneEvent::ShowCenterText("3".to_string()),
            },
            Step {
                at: 1.0,
                event: CutsceneEvent::ShowCenterText("2".to_string()),
            },
            Step {
                at: 2.0,
                event: CutsceneEvent::ShowCenterText("1".to_string()),
            },
            Step {
                at: 3.0,
                event: CutsceneEvent::ShowCenterText("READY!".to_string()),
            },
            Step {
                at: 4.0,
                event: CutsceneEvent::ClearCenterText,
            },
            Step {
                at: 4.0,
                event: CutsceneEvent::PlayAction(ActionKind::Run),
            },
            Step {
                at: 4.0,
                event: CutsceneEvent::StartRun,
            },
        ])
    }

    /// Death animation, then the game-over overlay.
    pub fn lose_sequence(score: u32) -> Self {
        Self::from_steps(vec![
            Step {
                at: 0.0,
                event: CutsceneEvent::PlayAction(ActionKind::Death),
            },
            Step {
                at: 1.2,
                event: CutsceneEvent::EndGame {
                    message: format!("Game Over!\nYour Score: {score}"),
                },
            },
        ])
    }

    /// Victory pose, then the descent to earth, then the closing overlay.
    pub fn win_sequence() -> Self {
        Self::from_steps(vec![
            Step {
                at: 0.0,
                event: CutsceneEvent::PlayAction(ActionKind::Victory),
            },
            Step {
                at: 3.0,
                event: CutsceneEvent::PlayAction(ActionKind::Flying),
            },
            Step {
                at: 3.0,
                event: CutsceneEvent::BeginDescent,
            },
            Step {
                at: 3.0,
                event: CutsceneEvent::ShowCenterText("You are falling on the earth!".to_string()),
            },
            Step {
                at: 5.4,
                event: CutsceneEvent::FadeCenterText {
                    text: "Congratulations!".to_string(),
                    duration: 2.0,
                },
            },
            Step {
                at: 6.9,
                event: CutsceneEvent::EndGame {
                    message: "Game Won!\nYou are on the earth!".to_string(),
                },
            },
        ])
    }

    /// Advance by `dt` seconds and return every event whose time has come,
    /// in script order.
    pub fn advance(&mut self, dt: f32) -> Vec<CutsceneEvent> {
        self.elapsed += dt;
        let mut fired = Vec::new();
        while self.next < self.steps.len() && self.steps[self.next].at <= self.elapsed {
            fired.push(self.steps[self.next].event.clone());
            self.next += 1;
        }
        fired
    }

    pub fn finished(&self) -> bool {
        self.next >= self.steps.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_fires_in_one_second_beats() {
        let mut script = Cutscene::countdown();
        assert_eq!(
            script.advance(0.0),
            vec![CutsceneEvent::ShowCenterText("3".to_string())]
        );
        assert_eq!(
            script.advance(1.0),
            vec![CutsceneEvent::ShowCenterText("2".to_string())]
        );
        assert_eq!(script.advance(0.5), vec![]);
        assert_eq!(
            script.advance(0.5),
            vec![CutsceneEvent::ShowCenterText("1".to_string())]
        );
        assert_eq!(
            script.advance(1.0),
            vec![CutsceneEvent::ShowCenterText("READY!".to_string())]
        );
        let last = script.advance(1.0);
        assert!(last.contains(&CutsceneEvent::StartRun));
        assert!(last.contains(&CutsceneEvent::ClearCenterText));
        assert!(script.finished());
    }

    #[test]
    fn long_frame_delivers_skipped_steps_in_order() {
        let mut script = Cutscene::countdown();
        let fired = script.advance(10.0);
        assert_eq!(fired.len(), 7);
        assert_eq!(
            fired[0],
            CutsceneEvent::ShowCenterText("3".to_string())
        );
        assert_eq!(fired[6], CutsceneEvent::StartRun);
        assert!(script.finished());
    }

    #[test]
    fn lose_sequence_ends_with_score_in_message() {
        let mut script = Cutscene::lose_sequence(137);
        assert_eq!(
            script.advance(0.0),
            vec![CutsceneEvent::PlayAction(ActionKind::Death)]
        );
        let fired = script.advance(1.2);
        assert_eq!(
            fired,
            vec![CutsceneEvent::EndGame {
                message: "Game Over!\nYour Score: 137".to_string(),
            }]
        );
    }

    #[test]
    fn win_sequence_descends_before_ending() {
        let mut script = Cutscene::win_sequence();
        let opening = script.advance(0.0);
        assert_eq!(opening, vec![CutsceneEvent::PlayAction(ActionKind::Victory)]);

        let midpoint = script.advance(3.0);
        assert!(midpoint.contains(&CutsceneEvent::BeginDescent));
        assert!(midpoint.contains(&CutsceneEvent::PlayAction(ActionKind::Flying)));

        let fade = script.advance(2.4);
        assert!(matches!(
            fade.as_slice(),
            [CutsceneEvent::FadeCenterText { .. }]
        ));

        let ending = script.advance(1.5);
        assert!(matches!(ending.as_slice(), [CutsceneEvent::EndGame { .. }]));
        assert!(script.finished());
    }

    #[test]
    fn dropping_a_script_cancels_remaining_steps() {
        let mut script = Some(Cutscene::lose_sequence(5));
        script.as_mut().map(|s| s.advance(0.0));
        // Restart while the ending is pending: the pending step never fires.
        script = Some(Cutscene::countdown());
        let fired = script.as_mut().map(|s| s.advance(0.0)).unwrap_or_default();
        assert_eq!(
            fired,
            vec![CutsceneEvent::ShowCenterText("3".to_string())]
        );
    }
}
