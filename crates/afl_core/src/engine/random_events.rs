//! Random Event Scheduler
//!
//! Counts down in simulated minutes and fires one event from the eligible pool
//! when the countdown runs out. The scheduler only picks; applying effects and
//! scheduling their reverts belongs to the match engine.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::constants::random_events::*;
use super::roster::UnitId;
use crate::models::{TacticalPlan, TeamId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RandomEventKind {
    HeavyDew,
    GustingWind,
    FatigueSettingIn,
    CrowdErupts,
    ComfortableLead,
    BallGoesFlat,
    MinorScuffle,
    BrilliantSoloEffort,
    TacticalShift,
}

impl RandomEventKind {
    pub const ALWAYS_ELIGIBLE: [RandomEventKind; 4] = [
        RandomEventKind::BallGoesFlat,
        RandomEventKind::MinorScuffle,
        RandomEventKind::BrilliantSoloEffort,
        RandomEventKind::TacticalShift,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RandomEventKind::HeavyDew => "heavy dew",
            RandomEventKind::GustingWind => "gusting wind",
            RandomEventKind::FatigueSettingIn => "fatigue setting in",
            RandomEventKind::CrowdErupts => "crowd erupts",
            RandomEventKind::ComfortableLead => "comfortable lead",
            RandomEventKind::BallGoesFlat => "ball goes flat",
            RandomEventKind::MinorScuffle => "minor scuffle",
            RandomEventKind::BrilliantSoloEffort => "brilliant solo effort",
            RandomEventKind::TacticalShift => "tactical shift",
        }
    }

    /// How long the effect lasts before reverting (simulated seconds).
    pub fn duration_secs(self) -> f32 {
        match self {
            RandomEventKind::HeavyDew
            | RandomEventKind::ComfortableLead
            | RandomEventKind::TacticalShift => 120.0,
            RandomEventKind::FatigueSettingIn => 90.0,
            RandomEventKind::GustingWind | RandomEventKind::BallGoesFlat => 60.0,
            RandomEventKind::CrowdErupts | RandomEventKind::BrilliantSoloEffort => 30.0,
            RandomEventKind::MinorScuffle => 20.0,
        }
    }
}

/// Match state the conditional events are gated on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventConditions {
    pub moisture: f32,
    pub wind_speed: f32,
    pub units_below_fatigue: usize,
    pub momentum: f32,
    /// Points gap between the teams.
    pub lead: i32,
}

/// Conditional events whose trigger holds, followed by the always-eligible ones.
pub fn candidate_pool(conditions: &EventConditions) -> Vec<RandomEventKind> {
    let mut pool = Vec::with_capacity(9);
    if conditions.moisture > HEAVY_DEW_MOISTURE {
        pool.push(RandomEventKind::HeavyDew);
    }
    if conditions.wind_speed > GUSTING_WIND_SPEED {
        pool.push(RandomEventKind::GustingWind);
    }
    if conditions.units_below_fatigue >= FATIGUE_MIN_UNITS {
        pool.push(RandomEventKind::FatigueSettingIn);
    }
    if conditions.momentum.abs() > CROWD_ERUPTS_MOMENTUM {
        pool.push(RandomEventKind::CrowdErupts);
    }
    if conditions.lead > COMFORTABLE_LEAD {
        pool.push(RandomEventKind::ComfortableLead);
    }
    pool.extend_from_slice(&RandomEventKind::ALWAYS_ELIGIBLE);
    pool
}

/// Baseline an effect returns to when its duration runs out.
#[derive(Debug, Clone, PartialEq)]
pub enum EffectRevert {
    Moisture(f32),
    WindSpeed(f32),
    StaminaDrain(f32),
    CrowdBonus(f32),
    Plan { team: TeamId, plan: TacticalPlan },
    Liveliness(f32),
    Consciousness { units: Vec<UnitId>, value: f32 },
    FormBonus { unit: UnitId, value: f32 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RandomEventScheduler {
    countdown_minutes: f32,
    fired: u32,
}

impl RandomEventScheduler {
    pub fn new(rng: &mut ChaCha8Rng) -> Self {
        Self { countdown_minutes: Self::draw_interval(rng), fired: 0 }
    }

    fn draw_interval(rng: &mut ChaCha8Rng) -> f32 {
        rng.gen_range(MIN_INTERVAL_MINUTES..=MAX_INTERVAL_MINUTES)
    }

    pub fn countdown_minutes(&self) -> f32 {
        self.countdown_minutes
    }

    pub fn fired(&self) -> u32 {
        self.fired
    }

    /// Run the countdown down by `sim_secs`. Returns true when an event is due;
    /// the countdown is redrawn immediately.
    pub fn advance(&mut self, sim_secs: f32, rng: &mut ChaCha8Rng) -> bool {
        self.countdown_minutes -= sim_secs / 60.0;
        if self.countdown_minutes > 0.0 {
            return false;
        }
        self.countdown_minutes = Self::draw_interval(rng);
        self.fired += 1;
        true
    }

    /// Uniform choice from the eligible pool.
    pub fn pick(&self, conditions: &EventConditions, rng: &mut ChaCha8Rng) -> RandomEventKind {
        let pool = candidate_pool(conditions);
        pool.choose(rng).copied().unwrap_or(RandomEventKind::BallGoesFlat)
    }

    pub fn reset(&mut self, rng: &mut ChaCha8Rng) {
        *self = Self::new(rng);
    }
}
