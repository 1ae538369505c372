//! Match/Quarter Controller state: phase, quarter clock, score, tactical plans
//! and the global speed with its dynamic time dilation.
//!
//! Only `MatchEngine` mutates this, and only through these methods.

use serde::Serialize;

use crate::engine::constants::clock::STOPPAGE_SPEED;
use crate::engine::constants::dilation::*;
use crate::engine::match_phase::MatchPhase;
use crate::models::{MatchOutcome, Scoreboard, StoppageReason, TacticalPlan, TeamId};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stoppage {
    pub reason: StoppageReason,
    /// Speed to restore when play resumes.
    pub saved_speed: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchController {
    phase: MatchPhase,
    remaining_secs: f32,
    clock_armed: bool,
    /// Siren has gone; waiting out the pause before the break.
    quarter_ending: bool,
    stoppage: Option<Stoppage>,
    scoreboard: Scoreboard,
    plans: [TacticalPlan; 2],
    speed: f32,
    outcome: Option<MatchOutcome>,
}

impl Default for MatchController {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchController {
    pub fn new() -> Self {
        Self {
            phase: MatchPhase::PreMatch,
            remaining_secs: 0.0,
            clock_armed: false,
            quarter_ending: false,
            stoppage: None,
            scoreboard: Scoreboard::new(),
            plans: [TacticalPlan::Balanced; 2],
            speed: NORMAL_SPEED,
            outcome: None,
        }
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub(super) fn set_phase(&mut self, phase: MatchPhase) {
        self.phase = phase;
    }

    pub fn quarter(&self) -> Option<u8> {
        self.phase.quarter_number()
    }

    pub fn remaining_secs(&self) -> f32 {
        self.remaining_secs
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    pub(super) fn scoreboard_mut(&mut self) -> &mut Scoreboard {
        &mut self.scoreboard
    }

    pub fn plan(&self, team: TeamId) -> TacticalPlan {
        self.plans[team.index()]
    }

    pub fn set_plan(&mut self, team: TeamId, plan: TacticalPlan) {
        self.plans[team.index()] = plan;
    }

    pub fn outcome(&self) -> Option<MatchOutcome> {
        self.outcome
    }

    pub(super) fn set_outcome(&mut self, outcome: MatchOutcome) {
        self.outcome = Some(outcome);
    }

    pub fn stoppage(&self) -> Option<Stoppage> {
        self.stoppage
    }

    pub fn in_stoppage(&self) -> bool {
        self.stoppage.is_some()
    }

    pub fn is_quarter_ending(&self) -> bool {
        self.quarter_ending
    }

    /// Quarter in progress, clock armed, no siren, no stoppage.
    pub fn is_clock_running(&self) -> bool {
        self.phase.is_quarter() && self.clock_armed && !self.quarter_ending && self.stoppage.is_none()
    }

    pub(super) fn arm_clock(&mut self, length_secs: f32) {
        self.remaining_secs = length_secs;
        self.clock_armed = true;
        self.quarter_ending = false;
        self.stoppage = None;
        self.speed = NORMAL_SPEED;
    }

    pub(super) fn disarm_clock(&mut self) {
        self.clock_armed = false;
        self.quarter_ending = false;
        self.remaining_secs = 0.0;
    }

    /// Run the quarter clock down. Returns true exactly once per quarter, on
    /// the tick the clock reaches zero.
    pub(super) fn advance_clock(&mut self, sim_secs: f32) -> bool {
        if !self.is_clock_running() {
            return false;
        }
        self.remaining_secs -= sim_secs.max(0.0);
        if self.remaining_secs > 0.0 {
            return false;
        }
        self.remaining_secs = 0.0;
        self.quarter_ending = true;
        true
    }

    /// Suspend the clock and slow play. Ignored if a stoppage is already running.
    pub(super) fn begin_stoppage(&mut self, reason: StoppageReason) -> bool {
        if self.stoppage.is_some() {
            return false;
        }
        self.stoppage = Some(Stoppage { reason, saved_speed: self.speed });
        self.speed = STOPPAGE_SPEED;
        true
    }

    pub(super) fn end_stoppage(&mut self) -> Option<StoppageReason> {
        let stoppage = self.stoppage.take()?;
        self.speed = stoppage.saved_speed;
        Some(stoppage.reason)
    }

    /// Speed play should settle toward this tick.
    pub fn dilation_target(&self, ball_loose_in_scoring_zone: bool) -> f32 {
        if ball_loose_in_scoring_zone {
            SCORING_ZONE_SPEED
        } else if self.phase == MatchPhase::Q4
            && self.remaining_secs <= CLOSE_FINISH_WINDOW_SECS
            && self.scoreboard.gap() <= CLOSE_FINISH_MARGIN
        {
            CLOSE_FINISH_SPEED
        } else {
            NORMAL_SPEED
        }
    }

    /// Exponential approach to `target`. Frozen during stoppages.
    pub(super) fn update_speed(&mut self, target: f32) {
        if self.stoppage.is_some() {
            return;
        }
        self.speed += (target - self.speed) * SMOOTHING;
    }

    /// Back to a fresh PRE_MATCH controller.
    pub(super) fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScoreKind;

    fn in_quarter(phase: MatchPhase) -> MatchController {
        let mut c = MatchController::new();
        c.set_phase(phase);
        c.arm_clock(phase.quarter_length_secs().unwrap());
        c
    }

    #[test]
    fn test_clock_expires_exactly_once() {
        let mut c = in_quarter(MatchPhase::Q1);
        let mut last = c.remaining_secs();
        let mut expiries = 0;
        for _ in 0..400 {
            if c.advance_clock(1.0) {
                expiries += 1;
            }
            if c.is_clock_running() {
                assert!(c.remaining_secs() < last);
                last = c.remaining_secs();
            }
        }
        assert_eq!(expiries, 1);
        assert_eq!(c.remaining_secs(), 0.0);
        assert!(c.is_quarter_ending());
    }

    #[test]
    fn test_stoppage_freezes_clock_and_restores_speed() {
        let mut c = in_quarter(MatchPhase::Q2);
        c.update_speed(0.5);
        let before = c.speed();

        assert!(c.begin_stoppage(StoppageReason::Score));
        assert!(!c.begin_stoppage(StoppageReason::FreeKick));
        assert_eq!(c.speed(), STOPPAGE_SPEED);
        assert!(!c.advance_clock(1000.0));
        assert_eq!(c.remaining_secs(), 360.0);

        c.update_speed(1.0);
        assert_eq!(c.speed(), STOPPAGE_SPEED);
        assert_eq!(c.end_stoppage(), Some(StoppageReason::Score));
        assert_eq!(c.speed(), before);
        assert!(c.is_clock_running());
    }

    #[test]
    fn test_speed_smoothing() {
        let mut c = in_quarter(MatchPhase::Q1);
        c.update_speed(0.5);
        assert!((c.speed() - 0.975).abs() < 1e-6);
        for _ in 0..500 {
            c.update_speed(0.5);
        }
        assert!((c.speed() - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_dilation_targets() {
        let mut c = in_quarter(MatchPhase::Q4);
        assert_eq!(c.dilation_target(true), SCORING_ZONE_SPEED);
        assert_eq!(c.dilation_target(false), NORMAL_SPEED);

        c.advance_clock(300.0);
        assert_eq!(c.dilation_target(false), CLOSE_FINISH_SPEED);

        for _ in 0..3 {
            c.scoreboard_mut().add(TeamId::HOME, ScoreKind::Goal);
        }
        assert_eq!(c.dilation_target(false), NORMAL_SPEED);

        // Only the final quarter slows for a close finish.
        let mut q2 = in_quarter(MatchPhase::Q2);
        q2.advance_clock(320.0);
        assert_eq!(q2.dilation_target(false), NORMAL_SPEED);
    }

    #[test]
    fn test_plans_are_per_team() {
        let mut c = MatchController::new();
        c.set_plan(TeamId::AWAY, TacticalPlan::Attacking);
        assert_eq!(c.plan(TeamId::HOME), TacticalPlan::Balanced);
        assert_eq!(c.plan(TeamId::AWAY), TacticalPlan::Attacking);
        c.reset();
        assert_eq!(c.plan(TeamId::AWAY), TacticalPlan::Balanced);
    }
}
