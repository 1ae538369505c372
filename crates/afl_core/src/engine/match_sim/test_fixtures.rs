//! Shared fixtures for MatchEngine tests.

use super::MatchEngine;
use crate::models::{Role, TeamId, UnitSpec};

const LINE_ORDER: [Role; 3] = [Role::Midfielder, Role::Defender, Role::Forward];

/// Role for the `index`-th unit of a squad.
pub fn squad_role(index: usize) -> Role {
    LINE_ORDER[index % LINE_ORDER.len()]
}

pub fn squad_spec(engine: &MatchEngine, team: TeamId, index: usize) -> UnitSpec {
    let role = squad_role(index);
    let cell = engine.field().formation_cell(team, role, index / LINE_ORDER.len());
    UnitSpec::new(format!("T{}-{}", team.0, index + 1), team, role, cell)
}

/// Seeded engine in PRE_MATCH with `per_team` average units on each side,
/// registered home then away in formation.
pub fn engine_with_squads(seed: u64, per_team: usize) -> MatchEngine {
    let mut engine = MatchEngine::with_seed(seed);
    for team in TeamId::both() {
        for index in 0..per_team {
            let spec = squad_spec(&engine, team, index);
            engine.register_unit(spec).expect("fixture unit registers");
        }
    }
    engine
}

/// Tick until `done` holds or `max_ticks` pass. Returns the ticks taken.
pub fn run_until(engine: &mut MatchEngine, max_ticks: usize, done: impl Fn(&MatchEngine) -> bool) -> usize {
    for ticks in 0..max_ticks {
        if done(engine) {
            return ticks;
        }
        engine.tick();
    }
    max_ticks
}
