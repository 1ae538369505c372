//! Commands, phase transitions and timer handling for MatchEngine.
//!
//! ## Commands
//! - `start_match()` - PRE_MATCH only; enters Q1 and starts running
//! - `start()` / `pause()` / `stop()` - run state
//! - `fast_forward(factor)` - multiply virtual time
//! - `register_unit(spec)` - rejected while a quarter is being played
//! - `reset()` - back to a freshly built engine, roster emptied
//! - `ui_command(token)` - text tokens from a front-end

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use validator::Validate;

use super::{MatchEngine, RunState};
use crate::engine::constants::clock::{MAX_FAST_FORWARD, QUARTER_END_PAUSE_SECS};
use crate::engine::constants::momentum::LOCK_SECS;
use crate::engine::ball::Ball;
use crate::engine::match_phase::{next_phase, MatchPhase};
use crate::engine::roster::UnitId;
use crate::engine::timers::TimerAction;
use crate::error::{Result, SimError};
use crate::models::{SimEvent, StoppageReason, UnitSpec};

pub(crate) fn secs_to_ms(secs: f32) -> u64 {
    (secs.max(0.0) * 1000.0).round() as u64
}

impl MatchEngine {
    // ========================
    // Commands
    // ========================

    pub fn start_match(&mut self) -> Result<()> {
        if self.controller.phase() != MatchPhase::PreMatch {
            return Err(self.reject("start match", self.controller.phase().label()));
        }
        log::info!("match starting with {} units", self.roster.len());
        self.env = Self::initial_environment(&self.config);
        self.roster.restore_condition();
        self.set_run_state(RunState::Running);
        self.enter_phase(MatchPhase::Q1);
        Ok(())
    }

    /// Start from PRE_MATCH or resume from a pause.
    pub fn start(&mut self) -> Result<()> {
        match (self.run_state, self.controller.phase()) {
            (_, MatchPhase::PreMatch) => self.start_match(),
            (_, MatchPhase::PostMatch) => Err(self.reject("start", "POST_MATCH")),
            (RunState::Running, _) => Err(self.reject("start", "running")),
            _ => {
                self.set_run_state(RunState::Running);
                Ok(())
            }
        }
    }

    pub fn pause(&mut self) -> Result<()> {
        if self.run_state != RunState::Running {
            return Err(self.reject("pause", self.run_state_label()));
        }
        self.set_run_state(RunState::Paused);
        Ok(())
    }

    /// Abandon the match: back to PRE_MATCH with scores zeroed and every
    /// pending timer discarded. Active random effects revert immediately.
    pub fn stop(&mut self) -> Result<()> {
        for action in self.timers.drain() {
            if let TimerAction::RevertEffect { event, revert } = action {
                self.revert_effect(event, revert);
            }
        }

        let from = self.controller.phase();
        self.controller.reset();
        self.momentum.reset();
        self.fast_forward = 1.0;
        self.env = Self::initial_environment(&self.config);
        self.ball.reset_to_center(&self.field);
        self.umpires.reset(self.config.umpire_count, &self.field);
        self.roster.return_home();
        self.roster.restore_condition();

        if from != MatchPhase::PreMatch {
            self.emit(SimEvent::PhaseChanged { from, to: MatchPhase::PreMatch });
        }
        self.set_run_state(RunState::Stopped);
        log::info!("match stopped");
        Ok(())
    }

    /// `factor` of 1.0 returns to normal speed.
    pub fn fast_forward(&mut self, factor: f32) -> Result<()> {
        if !factor.is_finite() || factor < 1.0 {
            return Err(self.reject("fast forward", "factor below 1"));
        }
        self.fast_forward = factor.min(MAX_FAST_FORWARD);
        log::info!("fast forward x{}", self.fast_forward);
        Ok(())
    }

    pub fn register_unit(&mut self, spec: UnitSpec) -> Result<UnitId> {
        if self.run_state == RunState::Running && self.controller.phase().is_quarter() {
            log::warn!("registration of {} rejected: match clock running", spec.name);
            return Err(SimError::RegistrationRejected(format!(
                "{} cannot join while {} is being played",
                spec.name,
                self.controller.phase().label()
            )));
        }
        if let Err(e) = spec.validate() {
            log::warn!("registration of {} rejected: {}", spec.name, e);
            return Err(SimError::InvalidUnit { name: spec.name, reason: e.to_string() });
        }

        let name = spec.name.clone();
        let team = spec.team;
        let id = self.roster.register(spec, &self.field).map_err(|e| {
            log::warn!("{e}");
            e
        })?;
        self.emit(SimEvent::UnitRegistered { unit: id, name, team });
        Ok(id)
    }

    /// Full reset: as if freshly built from the same config. Subscribers stay.
    pub fn reset(&mut self) -> Result<()> {
        self.stop()?;
        let removed = self.roster.clear();
        self.rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.random_events.reset(&mut self.rng);
        self.ball = Ball::new(self.field.center());
        self.tick = 0;
        self.sim_ms = 0;
        self.bus.clear_log();
        self.emit(SimEvent::RosterCleared { removed });
        Ok(())
    }

    /// Map a front-end token to a command. `fast_forward` toggles.
    pub fn ui_command(&mut self, token: &str) -> Result<()> {
        match token.trim() {
            "start" => self.start(),
            "pause" => self.pause(),
            "stop" => self.stop(),
            "fast_forward" => {
                let factor = if self.fast_forward > 1.0 { 1.0 } else { self.config.fast_forward_factor };
                self.fast_forward(factor)
            }
            other => {
                log::warn!("unknown command token '{other}'");
                Err(SimError::UnknownCommand(other.to_string()))
            }
        }
    }

    fn reject(&self, action: &'static str, state: &str) -> SimError {
        log::warn!("cannot {action} while {state}");
        SimError::InvalidTransition { action, state: state.to_string() }
    }

    fn run_state_label(&self) -> &'static str {
        match self.run_state {
            RunState::Stopped => "stopped",
            RunState::Running => "running",
            RunState::Paused => "paused",
        }
    }

    fn set_run_state(&mut self, to: RunState) {
        let from = self.run_state;
        if from != to {
            self.run_state = to;
            self.emit(SimEvent::RunStateChanged { from, to });
        }
    }

    // ========================
    // Phases
    // ========================

    pub(crate) fn enter_phase(&mut self, to: MatchPhase) {
        let from = self.controller.phase();
        self.controller.set_phase(to);
        log::info!("phase {} -> {}", from.label(), to.label());
        self.emit(SimEvent::PhaseChanged { from, to });

        if let (Some(quarter), Some(length_secs)) = (to.quarter_number(), to.quarter_length_secs()) {
            self.controller.arm_clock(length_secs);
            self.ball.reset_to_center(&self.field);
            self.roster.return_home();
            self.emit(SimEvent::QuarterStarted { quarter, length_secs });
        } else if let Some(break_secs) = to.break_length_secs() {
            self.controller.disarm_clock();
            self.ball.make_dead();
            self.timers.schedule(self.sim_ms + secs_to_ms(break_secs), TimerAction::AdvancePhase);
        } else if to == MatchPhase::PostMatch {
            self.controller.disarm_clock();
            self.ball.make_dead();
            let outcome = self.controller.scoreboard().outcome();
            self.controller.set_outcome(outcome);
            let totals = self.controller.scoreboard().totals();
            log::info!("match ended {}-{}: {:?}", totals[0], totals[1], outcome);
            self.emit(SimEvent::MatchEnded { outcome, totals });
            self.set_run_state(RunState::Stopped);
        }
    }

    /// Siren: suspend play, settle momentum, then advance after a short pause.
    pub(crate) fn end_quarter(&mut self) {
        let quarter = self.controller.quarter().unwrap_or(0);
        self.momentum.halve();
        let totals = self.controller.scoreboard().totals();
        log::info!("end of quarter {quarter}: {}-{}", totals[0], totals[1]);
        self.emit(SimEvent::QuarterEnded { quarter, totals });
        self.timers
            .schedule(self.sim_ms + secs_to_ms(QUARTER_END_PAUSE_SECS), TimerAction::AdvancePhase);
    }

    pub(crate) fn advance_phase(&mut self) {
        let current = self.controller.phase();
        if current == MatchPhase::PostMatch {
            return;
        }
        self.enter_phase(next_phase(current));
    }

    // ========================
    // Timers
    // ========================

    pub(crate) fn begin_stoppage(&mut self, reason: StoppageReason, secs: f32) {
        if self.controller.begin_stoppage(reason) {
            self.emit(SimEvent::StoppageStarted { reason, secs });
            self.timers.schedule(self.sim_ms + secs_to_ms(secs), TimerAction::EndStoppage);
        }
    }

    pub(crate) fn schedule_momentum_unlock(&mut self) {
        self.timers.schedule(self.sim_ms + secs_to_ms(LOCK_SECS), TimerAction::MomentumUnlock);
    }

    pub(crate) fn handle_timer(&mut self, action: TimerAction) {
        match action {
            TimerAction::AdvancePhase => self.advance_phase(),
            TimerAction::EndStoppage => {
                if self.controller.end_stoppage().is_some() {
                    self.emit(SimEvent::StoppageEnded);
                }
            }
            TimerAction::MomentumUnlock => self.momentum.unlock(),
            TimerAction::RevertEffect { event, revert } => self.revert_effect(event, revert),
        }
    }
}
