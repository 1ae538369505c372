pub mod ball;
pub mod config;
pub mod constants;
pub mod environment;
pub mod event_bus;
pub mod field;
pub mod match_phase;
pub mod match_sim;
pub mod momentum;
pub mod random_events; // Conditional pool + revert baselines
pub mod resolver; // Weighted action policy
pub mod roster;
pub mod timers; // Virtual-time scheduled events
pub mod umpire;

pub use ball::{Ball, BallState, PossessionQuality, PossessionSnapshot};
pub use config::SimConfig;
pub use environment::Environment;
pub use event_bus::EventBus;
pub use field::{Direction, Field, FieldPos, GridCell};
pub use match_phase::{next_phase, MatchPhase};
pub use match_sim::{MatchController, MatchEngine, RunState, Stoppage};
pub use momentum::MomentumTracker;
pub use random_events::{RandomEventKind, RandomEventScheduler};
pub use resolver::{Action, ActionKind};
pub use roster::{Roster, UnitId};
pub use timers::{TimerAction, TimerQueue};
pub use umpire::{CallKind, InfractionKind, UmpirePanel};
