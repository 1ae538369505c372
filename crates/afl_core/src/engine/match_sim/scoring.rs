//! Score registration for MatchEngine.

use rand::Rng;

use super::MatchEngine;
use crate::engine::constants::clock::SCORE_STOPPAGE_SECS;
use crate::engine::constants::umpire::REVIEW_FLIP_CHANCE;
use crate::engine::field::FieldPos;
use crate::engine::umpire::CallKind;
use crate::models::{ScoreKind, SimEvent, StoppageReason, TeamId};

impl MatchEngine {
    /// Register a score the ball reported at `position`.
    ///
    /// The umpire reviews the claim first; a wrong call flips GOAL and BEHIND
    /// half the time. Points land only after the review. Returns the kind
    /// awarded, or `None` outside a quarter.
    pub fn register_score(&mut self, team: TeamId, claimed: ScoreKind, position: FieldPos) -> Option<ScoreKind> {
        if !self.controller.phase().is_quarter() || self.controller.is_quarter_ending() {
            log::debug!("score by team {} ignored outside live play", team.0);
            return None;
        }

        let margin_before = self.controller.scoreboard().margin_for(team);
        let sim_speed = self.controller.speed();
        let crowd = self.momentum.crowd_noise();
        let review_correct =
            self.umpires.make_call(CallKind::ScoringReview, position, sim_speed, crowd, &mut self.rng);
        let awarded = if !review_correct && self.rng.gen_bool(REVIEW_FLIP_CHANCE) {
            claimed.flipped()
        } else {
            claimed
        };

        self.controller.scoreboard_mut().add(team, awarded);
        let totals = self.controller.scoreboard().totals();
        log::info!(
            "team {} scores {:?} (claimed {:?}, review correct {}): {}-{}",
            team.0,
            awarded,
            claimed,
            review_correct,
            totals[0],
            totals[1]
        );
        self.emit(SimEvent::ScoreRegistered { team, claimed, awarded, review_correct, totals });

        if let Some(shift) = self.momentum.update_momentum(team, awarded, margin_before) {
            self.emit(SimEvent::MomentumShifted {
                shift,
                momentum: self.momentum.value(),
                crowd_noise: self.momentum.crowd_noise(),
            });
            self.schedule_momentum_unlock();
        }

        self.ball.reset_to_center(&self.field);
        self.begin_stoppage(StoppageReason::Score, SCORE_STOPPAGE_SECS);
        Some(awarded)
    }
}
