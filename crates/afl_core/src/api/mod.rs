//! Outer surface: snapshot DTOs and the JSON match API.

pub mod json_api;
pub mod snapshot;

pub use json_api::{
    event_log_fingerprint, simulate_match, simulate_match_json, team_specs, MatchRequest,
    MatchResponse, TeamResult, TeamSheet, UnitEntry,
};
pub use snapshot::{BallSnapshot, EnvironmentSnapshot, MatchSnapshot, UmpireSnapshot, UnitSnapshot};
