//! JSON match API: team sheets in, a finished match out.
//!
//! One request is one seeded match run from PRE_MATCH to POST_MATCH. The
//! response carries the full event log and a SHA-256 fingerprint of it, so
//! callers can compare runs without diffing logs.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, info_span, warn};

use crate::engine::config::SimConfig;
use crate::engine::field::GridCell;
use crate::engine::match_phase::MatchPhase;
use crate::engine::match_sim::MatchEngine;
use crate::error::{Result, SimError};
use crate::models::{MatchOutcome, Role, Score, SkillAttributes, TeamId, TimedEvent, UnitSpec};
use crate::SCHEMA_VERSION;

/// Hard stop for a request that never reaches POST_MATCH.
pub const DEFAULT_MAX_TICKS: u64 = 200_000;

fn default_fast_forward() -> f32 {
    1.0
}

fn default_max_ticks() -> u64 {
    DEFAULT_MAX_TICKS
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchRequest {
    pub schema_version: u8,
    pub seed: u64,
    /// Overrides for the simulation config. The request seed always wins.
    #[serde(default)]
    pub config: Option<SimConfig>,
    pub home_team: TeamSheet,
    pub away_team: TeamSheet,
    #[serde(default = "default_fast_forward")]
    pub fast_forward: f32,
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,
    /// Leave the event log out of the response; the fingerprint is kept.
    #[serde(default)]
    pub omit_events: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamSheet {
    pub name: String,
    pub units: Vec<UnitEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitEntry {
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub attributes: SkillAttributes,
    /// Spawn cell; omitted entries line up in formation.
    #[serde(default)]
    pub cell: Option<GridCell>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamResult {
    pub name: String,
    pub score: Score,
    pub points: u16,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchResponse {
    pub schema_version: u8,
    pub seed: u64,
    pub home: TeamResult,
    pub away: TeamResult,
    pub outcome: Option<MatchOutcome>,
    /// Name of the winning side, if any.
    pub winner: Option<String>,
    /// False when `max_ticks` ran out before the final siren.
    pub completed: bool,
    pub ticks: u64,
    pub sim_ms: u64,
    pub event_count: usize,
    pub fingerprint: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<TimedEvent>,
}

/// Hex SHA-256 over the JSON encoding of an event log.
pub fn event_log_fingerprint(events: &[TimedEvent]) -> Result<String> {
    let bytes = serde_json::to_vec(events)?;
    let digest = Sha256::digest(&bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    Ok(out)
}

/// Turn a team sheet into registration requests for `team`.
pub fn team_specs(engine: &MatchEngine, team: TeamId, sheet: &TeamSheet) -> Vec<UnitSpec> {
    let mut line_slots = [0usize; 3];
    sheet
        .units
        .iter()
        .map(|entry| {
            let line = match entry.role {
                Role::Forward => 0,
                Role::Midfielder => 1,
                Role::Defender => 2,
            };
            let slot = line_slots[line];
            line_slots[line] += 1;
            let cell = entry
                .cell
                .unwrap_or_else(|| engine.field().formation_cell(team, entry.role, slot));
            UnitSpec::new(entry.name.clone(), team, entry.role, cell).with_attributes(entry.attributes)
        })
        .collect()
}

/// Run one match described by `request` to completion.
pub fn simulate_match(request: &MatchRequest) -> Result<MatchResponse> {
    let span = info_span!("simulate_match", seed = request.seed);
    let _guard = span.enter();

    if request.schema_version != SCHEMA_VERSION {
        return Err(SimError::InvalidRequest(format!(
            "unsupported schema version {}",
            request.schema_version
        )));
    }
    for (label, sheet) in [("home", &request.home_team), ("away", &request.away_team)] {
        if sheet.units.is_empty() {
            return Err(SimError::InvalidRequest(format!("{label} team '{}' has no units", sheet.name)));
        }
    }

    let config = request.config.clone().unwrap_or_default().with_seed(request.seed);
    let mut engine = MatchEngine::new(config)?;
    for (team, sheet) in [(TeamId::HOME, &request.home_team), (TeamId::AWAY, &request.away_team)] {
        for spec in team_specs(&engine, team, sheet) {
            engine.register_unit(spec)?;
        }
    }
    debug!(units = engine.unit_count(), "rosters registered");

    engine.start_match()?;
    engine.fast_forward(request.fast_forward)?;
    while engine.is_running() && engine.current_tick() < request.max_ticks {
        engine.tick();
    }
    let completed = engine.phase() == MatchPhase::PostMatch;
    if !completed {
        warn!(ticks = engine.current_tick(), phase = engine.phase().label(), "match cut short");
    }

    let board = *engine.scoreboard();
    let outcome = engine.outcome();
    let winner = match outcome {
        Some(MatchOutcome::Winner(team)) if team.is_home() => Some(request.home_team.name.clone()),
        Some(MatchOutcome::Winner(_)) => Some(request.away_team.name.clone()),
        _ => None,
    };
    let ticks = engine.current_tick();
    let sim_ms = engine.sim_ms();

    let events = engine.take_event_log();
    let fingerprint = event_log_fingerprint(&events)?;
    info!(
        home = board.points(TeamId::HOME),
        away = board.points(TeamId::AWAY),
        ticks,
        events = events.len(),
        "match simulated"
    );

    Ok(MatchResponse {
        schema_version: SCHEMA_VERSION,
        seed: request.seed,
        home: TeamResult {
            name: request.home_team.name.clone(),
            score: board.score(TeamId::HOME),
            points: board.points(TeamId::HOME),
        },
        away: TeamResult {
            name: request.away_team.name.clone(),
            score: board.score(TeamId::AWAY),
            points: board.points(TeamId::AWAY),
        },
        outcome,
        winner,
        completed,
        ticks,
        sim_ms,
        event_count: events.len(),
        fingerprint,
        events: if request.omit_events { Vec::new() } else { events },
    })
}

/// JSON in, JSON out wrapper over [`simulate_match`].
pub fn simulate_match_json(request_json: &str) -> Result<String> {
    let request: MatchRequest = serde_json::from_str(request_json)?;
    let response = simulate_match(&request)?;
    Ok(serde_json::to_string(&response)?)
}
