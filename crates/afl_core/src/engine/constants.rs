//! Tuning constants for the match simulation.
//!
//! Grouped by subsystem. Values that a deployment may want to change live in
//! `SimConfig`; everything here is part of the model itself.

// ============================================================
// Match clock and stoppages (simulated seconds)
// ============================================================
pub mod clock {
    /// Simulated seconds per real second at speed 1.0.
    pub const TIME_SCALE: f32 = 10.0;

    /// Quarters 1 and 3.
    pub const SHORT_QUARTER_SECS: f32 = 300.0;
    /// Quarters 2 and 4.
    pub const LONG_QUARTER_SECS: f32 = 360.0;

    pub const QUARTER_BREAK_SECS: f32 = 30.0;
    pub const HALF_TIME_SECS: f32 = 90.0;

    /// Pause between the siren and the break.
    pub const QUARTER_END_PAUSE_SECS: f32 = 3.0;

    pub const SCORE_STOPPAGE_SECS: f32 = 5.0;
    pub const FREE_KICK_STOPPAGE_SECS: f32 = 2.0;

    /// Global speed while a post-score stoppage runs.
    pub const STOPPAGE_SPEED: f32 = 0.3;

    pub const MAX_FAST_FORWARD: f32 = 16.0;
}

// ============================================================
// Dynamic time dilation
// ============================================================
pub mod dilation {
    pub const NORMAL_SPEED: f32 = 1.0;
    /// Ball loose inside a scoring zone.
    pub const SCORING_ZONE_SPEED: f32 = 0.5;
    /// Last minute of a close final quarter.
    pub const CLOSE_FINISH_SPEED: f32 = 0.75;
    pub const CLOSE_FINISH_WINDOW_SECS: f32 = 60.0;
    pub const CLOSE_FINISH_MARGIN: u16 = 12;
    /// Exponential smoothing factor per tick.
    pub const SMOOTHING: f32 = 0.05;
}

// ============================================================
// Ball physics (grid units per tick)
// ============================================================
pub mod ball {
    pub const KICK_MOMENTUM_WEIGHT: f32 = 0.1;
    pub const KICK_MOISTURE_PENALTY: f32 = 0.3;
    /// Landing variance at zero accuracy.
    pub const LANDING_VARIANCE_SCALE: f32 = 10.0;
    /// Ticks a full-power kick needs to cover the distance to its landing.
    pub const KICK_FLIGHT_TICKS: f32 = 4.0;
    pub const KICK_HEIGHT: f32 = 3.0;
    pub const MAX_SPIN: f32 = 1.0;
    /// Heading change per tick per unit of spin while airborne (radians).
    pub const SPIN_CURL: f32 = 0.03;

    pub const HANDBALL_VARIANCE_SCALE: f32 = 3.0;
    pub const HANDBALL_HEIGHT: f32 = 1.0;
    pub const HANDBALL_FLIGHT_TICKS: f32 = 2.0;

    pub const POSSESSION_MOISTURE_PENALTY: f32 = 0.4;
    pub const POSSESSION_CROWD_PENALTY: f32 = 0.2;
    pub const SPILL_MIN: f32 = 0.5;
    pub const SPILL_MAX: f32 = 2.0;

    pub const WIND_DRIFT_SCALE: f32 = 0.5;

    /// Per-tick chance an airborne ball comes to ground.
    pub const AIR_LANDING_CHANCE: f32 = 0.3;
    /// Height lost per tick before the moisture factor.
    pub const AIR_DROP_PER_TICK: f32 = 0.6;

    pub const GROUND_FRICTION: f32 = 0.8;
    pub const GROUND_FRICTION_MOISTURE: f32 = 0.2;
    /// Below this speed a rolling ball stops.
    pub const REST_SPEED: f32 = 0.05;

    pub const BOUNCE_UP_HEIGHT: f32 = 2.0;
    pub const BOUNCE_UP_SPEED: f32 = 0.5;
    pub const THROW_IN_SPEED: f32 = 0.8;
}

// ============================================================
// Field geometry (grid units)
// ============================================================
pub mod field {
    pub const DEFAULT_WIDTH: f32 = 48.0;
    pub const DEFAULT_HEIGHT: f32 = 32.0;
    /// Depth of the goal-face strip at each end.
    pub const GOAL_DEPTH: f32 = 1.5;
    /// Half the distance between the goal posts.
    pub const GOAL_HALF_WIDTH: f32 = 3.0;
    /// Half the distance between the behind posts.
    pub const BEHIND_HALF_WIDTH: f32 = 6.0;
    /// Radius around each goal that counts as a scoring zone for dilation.
    pub const SCORING_ZONE_RADIUS: f32 = 10.0;
    pub const THROW_IN_INSET: f32 = 1.0;
}

// ============================================================
// Umpires
// ============================================================
pub mod umpire {
    pub const BASE_ACCURACY: f32 = 0.85;
    pub const DISTANCE_PENALTY: f32 = 0.4;
    pub const SPEED_PENALTY: f32 = 0.1;
    pub const CROWD_PENALTY: f32 = 0.05;
    pub const DEFAULT_VISION_RANGE: f32 = 15.0;
    pub const DEFAULT_COUNT: u8 = 3;
    /// Maximum movement per tick.
    pub const DRIFT_STEP: f32 = 0.3;
    /// Half-width of the random offset around the ball an umpire aims for.
    pub const JITTER: f32 = 3.0;
    /// Chance an incorrect scoring review flips GOAL <-> BEHIND.
    pub const REVIEW_FLIP_CHANCE: f64 = 0.5;
}

// ============================================================
// Momentum and crowd
// ============================================================
pub mod momentum {
    pub const GOAL_SHIFT: f32 = 0.15;
    pub const BEHIND_SHIFT: f32 = 0.05;
    pub const COMEBACK_MULTIPLIER: f32 = 1.5;
    pub const BLOWOUT_MARGIN: i32 = 18;
    pub const BLOWOUT_MULTIPLIER: f32 = 0.5;
    pub const LOCK_SECS: f32 = 2.0;

    pub const CROWD_BASE: f32 = 0.5;
    pub const CROWD_WEIGHT: f32 = 0.3;
    pub const CROWD_MIN: f32 = 0.2;
    pub const CROWD_MAX: f32 = 0.8;
}

// ============================================================
// Random events
// ============================================================
pub mod random_events {
    pub const MIN_INTERVAL_MINUTES: f32 = 2.0;
    pub const MAX_INTERVAL_MINUTES: f32 = 4.0;

    pub const HEAVY_DEW_MOISTURE: f32 = 0.6;
    pub const GUSTING_WIND_SPEED: f32 = 0.6;
    pub const FATIGUE_STAMINA: f32 = 20.0;
    pub const FATIGUE_MIN_UNITS: usize = 3;
    pub const CROWD_ERUPTS_MOMENTUM: f32 = 0.7;
    pub const COMFORTABLE_LEAD: i32 = 24;

    pub const DEW_MOISTURE: f32 = 0.9;
    pub const DEW_BASELINE: f32 = 0.5;
    pub const GUST_SPEED: f32 = 0.8;
    pub const GUST_BASELINE: f32 = 0.3;
    pub const FATIGUE_DRAIN: f32 = 1.5;
    pub const CROWD_BONUS: f32 = 0.15;
    pub const FLAT_LIVELINESS: f32 = 0.7;
    pub const SCUFFLE_CONSCIOUSNESS: f32 = 70.0;
    pub const SOLO_FORM_BONUS: f32 = 15.0;
}

// ============================================================
// Unit actions
// ============================================================
pub mod actions {
    pub const MARK_REACH: f32 = 1.5;
    pub const TACKLE_REACH: f32 = 1.5;
    pub const CHASE_RADIUS: f32 = 8.0;
    pub const HANDBALL_RANGE: f32 = 6.0;
    pub const KICK_PASS_RANGE: f32 = 20.0;
    /// Upfield distance of a speculative clearing kick.
    pub const CLEARING_KICK_DISTANCE: f32 = 15.0;
    /// Distance a leading unit runs ahead of the ball.
    pub const LEAD_DISTANCE: f32 = 6.0;
    /// IQ - stress above which the smarter option unlocks.
    pub const SMART_MARGIN: i16 = 70;
    pub const FATIGUED_STAMINA: f32 = 20.0;

    pub const KICK_POWER_SHOT: f32 = 1.0;
    pub const KICK_POWER_PASS: f32 = 0.8;

    pub const HIGH_TACKLE_CHANCE: f64 = 0.1;
    pub const HIGH_TACKLE_CONSCIOUSNESS_LOSS: f32 = 25.0;
    pub const HOLDING_THE_BALL_TICKS: u32 = 3;
    pub const CONSCIOUSNESS_RECOVERY: f32 = 2.0;
}

// ============================================================
// Stamina cost table
// ============================================================
pub mod stamina {
    pub const MAX: f32 = 100.0;
    pub const MOVE: f32 = -15.0;
    pub const KICK: f32 = -25.0;
    pub const HANDBALL: f32 = -10.0;
    pub const MARK: f32 = -20.0;
    pub const TACKLE: f32 = -30.0;
    pub const STAND: f32 = 5.0;
}

// ============================================================
// Environment
// ============================================================
pub mod environment {
    pub const DEFAULT_HUMIDITY: f32 = 0.4;
    pub const DEFAULT_WIND_SPEED: f32 = 0.3;
    /// Maximum moisture change per simulated second while drifting to humidity.
    pub const MOISTURE_DRIFT_PER_SEC: f32 = 0.002;
}

pub mod roster {
    /// Search radius (cells) around a requested spawn cell.
    pub const PLACEMENT_RADIUS: i32 = 2;
}
