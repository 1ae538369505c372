//! Read-only snapshot DTOs for renderers, overlays and tooling.
//!
//! A snapshot is a copy: holding one never borrows the engine.

use serde::Serialize;

use crate::engine::ball::PossessionSnapshot;
use crate::engine::field::FieldPos;
use crate::engine::match_phase::MatchPhase;
use crate::engine::match_sim::{MatchEngine, RunState};
use crate::engine::roster::UnitId;
use crate::models::{Score, TacticalPlan, TeamId};

fn xy(pos: FieldPos) -> [f32; 2] {
    [pos.x, pos.y]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BallSnapshot {
    pub position: [f32; 2],
    /// SCREAMING_SNAKE state label, e.g. `LOOSE_AIR`.
    pub state: &'static str,
    pub possession: PossessionSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitSnapshot {
    pub id: UnitId,
    pub name: String,
    pub team: TeamId,
    pub cell: [i32; 2],
    pub stamina: f32,
    pub consciousness: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UmpireSnapshot {
    pub positions: Vec<[f32; 2]>,
    pub vision_range: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvironmentSnapshot {
    pub wind_speed: f32,
    pub wind_direction: [f32; 2],
    pub humidity: f32,
    pub moisture: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSnapshot {
    pub tick: u64,
    pub sim_ms: u64,
    pub run_state: RunState,
    pub phase: MatchPhase,
    pub quarter: Option<u8>,
    pub remaining_secs: f32,
    pub speed: f32,
    pub scores: [Score; 2],
    pub plans: [TacticalPlan; 2],
    pub momentum: f32,
    pub crowd_noise: f32,
    pub ball: BallSnapshot,
    pub umpires: UmpireSnapshot,
    pub environment: EnvironmentSnapshot,
    pub units: Vec<UnitSnapshot>,
}

impl MatchSnapshot {
    pub fn capture(engine: &MatchEngine) -> Self {
        let ball = engine.ball();
        let env = engine.environment();
        let board = engine.scoreboard();
        let controller = engine.controller();

        Self {
            tick: engine.current_tick(),
            sim_ms: engine.sim_ms(),
            run_state: engine.run_state(),
            phase: engine.phase(),
            quarter: controller.quarter(),
            remaining_secs: engine.remaining_secs(),
            speed: engine.current_speed(),
            scores: TeamId::both().map(|team| board.score(team)),
            plans: TeamId::both().map(|team| controller.plan(team)),
            momentum: engine.momentum(),
            crowd_noise: engine.crowd_noise(),
            ball: BallSnapshot {
                position: xy(ball.position()),
                state: ball.state().label(),
                possession: ball.possession(),
            },
            umpires: UmpireSnapshot {
                positions: engine.umpires().positions().iter().copied().map(xy).collect(),
                vision_range: engine.umpires().vision_range(),
            },
            environment: EnvironmentSnapshot {
                wind_speed: env.wind_speed(),
                wind_direction: xy(env.wind_direction()),
                humidity: env.humidity(),
                moisture: env.moisture(),
            },
            units: engine
                .roster()
                .iter()
                .map(|(id, unit)| UnitSnapshot {
                    id,
                    name: unit.name.clone(),
                    team: unit.team,
                    cell: [unit.cell.x, unit.cell.y],
                    stamina: unit.stamina,
                    consciousness: unit.consciousness,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::match_sim::test_fixtures::engine_with_squads;

    #[test]
    fn test_snapshot_of_fresh_engine() {
        let engine = engine_with_squads(1, 3);
        let snap = engine.snapshot();
        assert_eq!(snap.phase, MatchPhase::PreMatch);
        assert_eq!(snap.run_state, RunState::Stopped);
        assert_eq!(snap.units.len(), 6);
        assert_eq!(snap.umpires.positions.len(), 3);
        assert_eq!(snap.ball.state, "DEAD");
        assert_eq!(snap.ball.possession.unit, None);
        assert_eq!(snap.crowd_noise, 0.5);
    }

    #[test]
    fn test_snapshot_tracks_play() {
        let mut engine = engine_with_squads(2, 3);
        engine.start_match().unwrap();
        for _ in 0..20 {
            engine.tick();
        }
        let snap = engine.snapshot();
        assert_eq!(snap.quarter, Some(1));
        assert_eq!(snap.tick, 20);
        assert!(snap.remaining_secs < 300.0);

        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["phase"], "Q1");
        assert_eq!(json["run_state"], "running");
        assert!(json["units"][0]["stamina"].is_number());
    }
}
