//! Typed simulation events, delivered through the engine's event bus.

use serde::Serialize;

use super::team::{MatchOutcome, ScoreKind, TeamId};
use crate::engine::ball::PossessionQuality;
use crate::engine::field::FieldPos;
use crate::engine::match_phase::MatchPhase;
use crate::engine::match_sim::RunState;
use crate::engine::random_events::RandomEventKind;
use crate::engine::roster::UnitId;
use crate::engine::umpire::InfractionKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisposalKind {
    Kick,
    Handball,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TackleOutcome {
    /// Ball knocked loose.
    Dislodged,
    /// Holder kept the ball, possession now contested.
    Broken,
    /// Ruled high; the tackle never happened.
    HighTackleAborted,
    /// Holder pinged for holding the ball.
    HoldingTheBall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoppageReason {
    Score,
    FreeKick,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    RunStateChanged { from: RunState, to: RunState },
    PhaseChanged { from: MatchPhase, to: MatchPhase },
    QuarterStarted { quarter: u8, length_secs: f32 },
    QuarterEnded { quarter: u8, totals: [u16; 2] },
    MatchEnded { outcome: MatchOutcome, totals: [u16; 2] },
    UnitRegistered { unit: UnitId, name: String, team: TeamId },
    RosterCleared { removed: usize },
    Disposal { unit: UnitId, kind: DisposalKind, landing: FieldPos, accuracy: f32 },
    PossessionGained { unit: UnitId, team: TeamId, quality: PossessionQuality },
    BallSpilled { unit: UnitId, position: FieldPos },
    Tackle { tackler: UnitId, target: UnitId, outcome: TackleOutcome },
    BallOutOfBounds { position: FieldPos },
    BallUp { position: FieldPos },
    ScoreRegistered {
        team: TeamId,
        claimed: ScoreKind,
        awarded: ScoreKind,
        review_correct: bool,
        totals: [u16; 2],
    },
    InfractionReviewed {
        unit: UnitId,
        kind: InfractionKind,
        call_correct: bool,
        free_kick_to: Option<TeamId>,
    },
    FreeKickAwarded { team: TeamId, position: FieldPos, recipient: Option<UnitId> },
    MomentumShifted { shift: f32, momentum: f32, crowd_noise: f32 },
    StoppageStarted { reason: StoppageReason, secs: f32 },
    StoppageEnded,
    RandomEventFired { event: RandomEventKind },
    RandomEventExpired { event: RandomEventKind },
}

/// An event stamped with the tick and virtual time it was published at.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimedEvent {
    pub tick: u64,
    pub sim_ms: u64,
    #[serde(flatten)]
    pub event: SimEvent,
}
