//! Match Simulation Engine
//!
//! `MatchEngine` owns every service of a match: ball, roster, environment,
//! umpires, momentum, random events, the timer queue and the event bus.
//! Nothing is global; collaborators read snapshots and issue commands.
//!
//! ## Tick order
//!
//! ```text
//! advance virtual time
//!   -> fire due timers (breaks, stoppages, momentum lock, effect reverts)
//!   -> turn: each live unit picks and executes one action
//!   -> ball natural motion
//!   -> quarter clock, siren
//!   -> umpire drift, speed dilation
//!   -> random events, moisture drift
//! ```
//!
//! Orchestration is split across files as `impl MatchEngine` blocks:
//! - `lifecycle.rs` - commands, phase transitions, timers
//! - `turn.rs` - per-unit action execution and ball updates
//! - `scoring.rs` - score registration
//! - `infractions.rs` - infraction review and free kicks
//! - `random_effects.rs` - applying and reverting random events
//! - `queries.rs` - read-only accessors and snapshots

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::ball::{Ball, BallContext};
use super::config::SimConfig;
use super::environment::Environment;
use super::event_bus::EventBus;
use super::field::Field;
use super::momentum::MomentumTracker;
use super::random_events::RandomEventScheduler;
use super::roster::Roster;
use super::timers::TimerQueue;
use super::umpire::UmpirePanel;
use crate::error::Result;
use crate::models::{SimEvent, TimedEvent};

pub mod controller;
mod infractions;
mod lifecycle;
mod queries;
mod random_effects;
mod scoring;
mod turn;

#[cfg(test)]
pub mod test_fixtures;

pub use controller::{MatchController, Stoppage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    #[default]
    Stopped,
    Running,
    Paused,
}

#[derive(Debug)]
pub struct MatchEngine {
    config: SimConfig,
    rng: ChaCha8Rng,
    field: Field,
    env: Environment,
    ball: Ball,
    roster: Roster,
    umpires: UmpirePanel,
    momentum: MomentumTracker,
    random_events: RandomEventScheduler,
    controller: MatchController,
    timers: TimerQueue,
    bus: EventBus,
    run_state: RunState,
    /// 1.0 unless fast-forwarding.
    fast_forward: f32,
    tick: u64,
    /// Virtual time in milliseconds; timers are keyed on this.
    sim_ms: u64,
}

impl MatchEngine {
    /// Build an engine in PRE_MATCH from a validated config.
    pub fn new(config: SimConfig) -> Result<Self> {
        Ok(Self::build(config.validated()?))
    }

    /// Default configuration with the given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::build(SimConfig::default().with_seed(seed))
    }

    fn build(config: SimConfig) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let field = Field::new(config.field_width, config.field_height);
        Self {
            env: Self::initial_environment(&config),
            ball: Ball::new(field.center()),
            roster: Roster::new(),
            umpires: UmpirePanel::new(
                config.umpire_count,
                config.umpire_vision_range,
                config.umpire_base_accuracy,
                &field,
            ),
            momentum: MomentumTracker::new(),
            random_events: RandomEventScheduler::new(&mut rng),
            controller: MatchController::new(),
            timers: TimerQueue::new(),
            bus: EventBus::new(),
            run_state: RunState::Stopped,
            fast_forward: 1.0,
            tick: 0,
            sim_ms: 0,
            field,
            rng,
            config,
        }
    }

    fn initial_environment(config: &SimConfig) -> Environment {
        Environment::new(config.humidity, config.wind_speed, config.wind_angle_deg)
    }

    /// Subscribe to every event the engine publishes, in registration order.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&TimedEvent) + 'static) {
        self.bus.subscribe(subscriber);
    }

    pub(crate) fn emit(&mut self, event: SimEvent) {
        self.bus.publish(self.tick, self.sim_ms, event);
    }

    pub(crate) fn take_event_log(&mut self) -> Vec<TimedEvent> {
        self.bus.take_log()
    }

    /// Run `f` with the ball and a context borrowed from the rest of the engine.
    pub(crate) fn with_ball<R>(
        &mut self,
        f: impl FnOnce(&mut Ball, &Roster, &mut BallContext<'_>) -> R,
    ) -> R {
        let mut ctx = BallContext {
            env: &self.env,
            field: &self.field,
            momentum: self.momentum.value(),
            crowd_noise: self.momentum.crowd_noise(),
            rng: &mut self.rng,
        };
        f(&mut self.ball, &self.roster, &mut ctx)
    }

    /// Advance one tick of `config.real_delta_secs` real time.
    pub fn tick(&mut self) {
        self.tick_with_delta(self.config.real_delta_secs);
    }

    /// Advance one tick covering `real_delta` real seconds. Does nothing
    /// unless the engine is running.
    pub fn tick_with_delta(&mut self, real_delta: f32) {
        if self.run_state != RunState::Running {
            return;
        }
        self.tick += 1;

        let sim_secs =
            real_delta.max(0.0) * self.fast_forward * self.config.time_scale * self.controller.speed();
        self.sim_ms += (sim_secs * 1000.0).round() as u64;

        while let Some(action) = self.timers.pop_due(self.sim_ms) {
            self.handle_timer(action);
        }

        if self.controller.is_clock_running() {
            self.run_turn();
        }
        if self.controller.phase().is_quarter() {
            let update = self.with_ball(|ball, roster, ctx| ball.tick_natural_motion(roster, ctx));
            self.handle_ball_update(update);
        }

        if self.controller.advance_clock(sim_secs) {
            self.end_quarter();
        }

        if self.controller.phase().is_quarter() {
            let ball_pos = self.ball.position();
            self.umpires.drift_toward(ball_pos, &self.field, &mut self.rng);
            let hot = self.ball.is_loose() && self.field.in_scoring_zone(ball_pos);
            let target = self.controller.dilation_target(hot);
            self.controller.update_speed(target);
        }

        if self.controller.is_clock_running() && self.random_events.advance(sim_secs, &mut self.rng) {
            self.fire_random_event();
        }
        self.env.drift_moisture(sim_secs);
    }
}
