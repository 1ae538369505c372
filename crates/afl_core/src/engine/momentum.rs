//! Momentum & Crowd Tracker
//!
//! A single signed value shared by both teams:
//! - positive favours team 0, negative favours team 1
//! - big plays push it toward the scoring team
//! - a short lock stops back-to-back plays stacking
//!
//! Crowd noise is derived from momentum and read by possession and umpiring.

use serde::Serialize;

use super::constants::momentum::*;
use crate::models::{ScoreKind, TeamId};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MomentumTracker {
    /// [-1, 1]
    value: f32,
    /// Set by an update, cleared by the unlock timer.
    locked: bool,
    /// Temporary bonus from the crowd-erupts event.
    crowd_bonus: f32,
}

impl Default for MomentumTracker {
    fn default() -> Self {
        Self { value: 0.0, locked: false, crowd_bonus: 0.0 }
    }
}

impl MomentumTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn crowd_bonus(&self) -> f32 {
        self.crowd_bonus
    }

    /// Magnitude of the swing for a score, before direction is applied.
    ///
    /// `margin_before` is the scoring team's margin before the points land:
    /// trailing teams get a comeback boost, blowouts are dampened.
    pub fn shift_for(kind: ScoreKind, margin_before: i32) -> f32 {
        let base = match kind {
            ScoreKind::Goal => GOAL_SHIFT,
            ScoreKind::Behind => BEHIND_SHIFT,
        };
        if margin_before < 0 {
            base * COMEBACK_MULTIPLIER
        } else if margin_before > BLOWOUT_MARGIN {
            base * BLOWOUT_MULTIPLIER
        } else {
            base
        }
    }

    /// Push momentum toward `team`. Returns the signed shift applied, or `None`
    /// while the lock is held. The caller schedules [`Self::unlock`].
    pub fn update_momentum(&mut self, team: TeamId, kind: ScoreKind, margin_before: i32) -> Option<f32> {
        if self.locked {
            log::debug!("momentum update for team {} suppressed by lock", team.0);
            return None;
        }
        let shift = Self::shift_for(kind, margin_before) * team.momentum_sign();
        self.value = (self.value + shift).clamp(-1.0, 1.0);
        self.locked = true;
        log::debug!("momentum {:+.3} -> {:.3} (crowd {:.2})", shift, self.value, self.crowd_noise());
        Some(shift)
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    /// Quarter-end settling.
    pub fn halve(&mut self) {
        self.value *= 0.5;
    }

    pub fn crowd_noise(&self) -> f32 {
        (CROWD_BASE + self.value * CROWD_WEIGHT + self.crowd_bonus).clamp(CROWD_MIN, CROWD_MAX)
    }

    pub fn set_crowd_bonus(&mut self, bonus: f32) {
        self.crowd_bonus = bonus;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_start() {
        let m = MomentumTracker::new();
        assert_eq!(m.value(), 0.0);
        assert!((m.crowd_noise() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_trailing_team_goal_example() {
        // Team 1 trails 6-10 and kicks a goal.
        let mut m = MomentumTracker::new();
        let shift = m.update_momentum(TeamId::AWAY, ScoreKind::Goal, -4).unwrap();
        assert!((shift + 0.225).abs() < 1e-6);
        assert!((m.value() + 0.225).abs() < 1e-6);
        assert!((m.crowd_noise() - (0.5 - 0.0675)).abs() < 1e-5);
    }

    #[test]
    fn test_blowout_dampens_shift() {
        assert!((MomentumTracker::shift_for(ScoreKind::Goal, 30) - 0.075).abs() < 1e-6);
        assert!((MomentumTracker::shift_for(ScoreKind::Behind, 18) - 0.05).abs() < 1e-6);
        assert!((MomentumTracker::shift_for(ScoreKind::Behind, 0) - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_lock_suppresses_second_update() {
        let mut m = MomentumTracker::new();
        assert!(m.update_momentum(TeamId::HOME, ScoreKind::Goal, 0).is_some());
        assert!(m.update_momentum(TeamId::HOME, ScoreKind::Goal, 0).is_none());
        assert!((m.value() - 0.15).abs() < 1e-6);

        m.unlock();
        assert!(m.update_momentum(TeamId::HOME, ScoreKind::Goal, 0).is_some());
        assert!((m.value() - 0.30).abs() < 1e-6);
    }

    #[test]
    fn test_halve_and_crowd_bonus() {
        let mut m = MomentumTracker::new();
        m.update_momentum(TeamId::HOME, ScoreKind::Goal, -1);
        m.halve();
        assert!((m.value() - 0.1125).abs() < 1e-6);

        m.set_crowd_bonus(0.15);
        assert!((m.crowd_noise() - (0.5 + 0.1125 * 0.3 + 0.15)).abs() < 1e-5);
        m.set_crowd_bonus(1.0);
        assert_eq!(m.crowd_noise(), CROWD_MAX);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_momentum_and_crowd_stay_bounded(
                plays in prop::collection::vec((any::<bool>(), any::<bool>(), -60i32..60), 0..200),
                bonus in 0.0f32..0.5,
            ) {
                let mut m = MomentumTracker::new();
                m.set_crowd_bonus(bonus);
                for (home, goal, margin) in plays {
                    let team = if home { TeamId::HOME } else { TeamId::AWAY };
                    let kind = if goal { ScoreKind::Goal } else { ScoreKind::Behind };
                    m.update_momentum(team, kind, margin);
                    m.unlock();
                    prop_assert!((-1.0..=1.0).contains(&m.value()));
                    prop_assert!((CROWD_MIN..=CROWD_MAX).contains(&m.crowd_noise()));
                }
            }
        }
    }
}
