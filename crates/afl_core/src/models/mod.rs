//! Plain data shared between the engine, the API layer and collaborators.

pub mod events;
pub mod team;
pub mod unit;

pub use events::{DisposalKind, SimEvent, StoppageReason, TackleOutcome, TimedEvent};
pub use team::{MatchOutcome, Score, ScoreKind, Scoreboard, TacticalPlan, TeamId};
pub use unit::{Role, SkillAttributes, Unit, UnitSpec};
