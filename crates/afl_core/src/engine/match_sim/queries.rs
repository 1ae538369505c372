//! Read-only accessors for MatchEngine.
//!
//! Collaborators (renderers, overlays, the JSON API) only ever see the engine
//! through these and through `snapshot()`.

use super::{MatchController, MatchEngine, RunState};
use crate::api::snapshot::MatchSnapshot;
use crate::engine::ball::Ball;
use crate::engine::config::SimConfig;
use crate::engine::environment::Environment;
use crate::engine::field::Field;
use crate::engine::match_phase::MatchPhase;
use crate::engine::random_events::RandomEventScheduler;
use crate::engine::roster::{Roster, UnitId};
use crate::engine::umpire::UmpirePanel;
use crate::models::{MatchOutcome, Scoreboard, TimedEvent, Unit};

impl MatchEngine {
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn phase(&self) -> MatchPhase {
        self.controller.phase()
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    /// Seconds left in the current quarter; zero outside quarters.
    pub fn remaining_secs(&self) -> f32 {
        self.controller.remaining_secs()
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        self.controller.scoreboard()
    }

    pub fn outcome(&self) -> Option<MatchOutcome> {
        self.controller.outcome()
    }

    pub fn momentum(&self) -> f32 {
        self.momentum.value()
    }

    pub fn crowd_noise(&self) -> f32 {
        self.momentum.crowd_noise()
    }

    pub fn controller(&self) -> &MatchController {
        &self.controller
    }

    pub fn current_speed(&self) -> f32 {
        self.controller.speed()
    }

    pub fn fast_forward_factor(&self) -> f32 {
        self.fast_forward
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Virtual milliseconds since the engine was built or reset.
    pub fn sim_ms(&self) -> u64 {
        self.sim_ms
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn umpires(&self) -> &UmpirePanel {
        &self.umpires
    }

    pub fn random_events(&self) -> &RandomEventScheduler {
        &self.random_events
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn unit_count(&self) -> usize {
        self.roster.len()
    }

    /// Live unit ids in turn order.
    pub fn unit_ids(&self) -> &[UnitId] {
        self.roster.ids()
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.roster.get(id)
    }

    pub fn units(&self) -> impl Iterator<Item = &Unit> + '_ {
        self.roster.iter().map(|(_, unit)| unit)
    }

    /// Every event published since the last reset, oldest first.
    pub fn event_log(&self) -> &[TimedEvent] {
        self.bus.log()
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot::capture(self)
    }

    #[cfg(test)]
    pub(crate) fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }
}
