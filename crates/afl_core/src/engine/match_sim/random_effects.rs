//! Applying and reverting random events for MatchEngine.
//!
//! Every effect captures the baseline it returns to and schedules the revert
//! on the timer queue at fire time. Stop drains the queue and applies pending
//! reverts immediately, so no effect outlives the match that started it.

use rand::seq::SliceRandom;
use rand::Rng;

use super::lifecycle::secs_to_ms;
use super::MatchEngine;
use crate::engine::constants::random_events::*;
use crate::engine::random_events::{EffectRevert, EventConditions, RandomEventKind};
use crate::engine::roster::UnitId;
use crate::engine::timers::TimerAction;
use crate::models::{SimEvent, TacticalPlan, TeamId};

impl MatchEngine {
    fn event_conditions(&self) -> EventConditions {
        EventConditions {
            moisture: self.env.moisture(),
            wind_speed: self.env.wind_speed(),
            units_below_fatigue: self.roster.count_below_stamina(FATIGUE_STAMINA),
            momentum: self.momentum.value(),
            lead: i32::from(self.controller.scoreboard().gap()),
        }
    }

    /// Pick an eligible event and apply it.
    pub(crate) fn fire_random_event(&mut self) {
        let conditions = self.event_conditions();
        let kind = self.random_events.pick(&conditions, &mut self.rng);
        self.apply_random_event(kind);
    }

    /// Apply `kind` now and schedule its revert after the event's duration.
    pub(crate) fn apply_random_event(&mut self, kind: RandomEventKind) {
        let revert = match kind {
            RandomEventKind::HeavyDew => {
                self.env.set_moisture(DEW_MOISTURE);
                Some(EffectRevert::Moisture(DEW_BASELINE))
            }
            RandomEventKind::GustingWind => {
                let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
                self.env.set_wind(GUST_SPEED, angle);
                Some(EffectRevert::WindSpeed(GUST_BASELINE))
            }
            RandomEventKind::FatigueSettingIn => {
                self.roster.set_stamina_drain(FATIGUE_DRAIN);
                Some(EffectRevert::StaminaDrain(1.0))
            }
            RandomEventKind::CrowdErupts => {
                self.momentum.set_crowd_bonus(CROWD_BONUS);
                Some(EffectRevert::CrowdBonus(0.0))
            }
            RandomEventKind::ComfortableLead => self.controller.scoreboard().leader().map(|team| {
                self.controller.set_plan(team, TacticalPlan::Defensive);
                EffectRevert::Plan { team, plan: TacticalPlan::Balanced }
            }),
            RandomEventKind::BallGoesFlat => {
                self.env.set_liveliness(FLAT_LIVELINESS);
                Some(EffectRevert::Liveliness(1.0))
            }
            RandomEventKind::MinorScuffle => {
                let units: Vec<UnitId> = TeamId::both()
                    .into_iter()
                    .filter_map(|team| self.random_unit_of(Some(team)))
                    .collect();
                for &id in &units {
                    self.roster.set_consciousness(id, SCUFFLE_CONSCIOUSNESS);
                }
                Some(EffectRevert::Consciousness { units, value: 100.0 })
            }
            RandomEventKind::BrilliantSoloEffort => self.random_unit_of(None).map(|unit| {
                self.roster.set_form_bonus(unit, SOLO_FORM_BONUS);
                EffectRevert::FormBonus { unit, value: 0.0 }
            }),
            RandomEventKind::TacticalShift => {
                let team = if self.rng.gen_bool(0.5) { TeamId::HOME } else { TeamId::AWAY };
                let plan = if self.rng.gen_bool(0.5) { TacticalPlan::Attacking } else { TacticalPlan::Defensive };
                self.controller.set_plan(team, plan);
                Some(EffectRevert::Plan { team, plan: TacticalPlan::Balanced })
            }
        };

        log::info!("random event: {}", kind.label());
        self.emit(SimEvent::RandomEventFired { event: kind });
        match revert {
            Some(revert) => {
                let due = self.sim_ms + secs_to_ms(kind.duration_secs());
                self.timers.schedule(due, TimerAction::RevertEffect { event: kind, revert });
            }
            None => log::debug!("{} had nobody to affect", kind.label()),
        }
    }

    /// Put the mutated value back to its baseline.
    pub(crate) fn revert_effect(&mut self, event: RandomEventKind, revert: EffectRevert) {
        match revert {
            EffectRevert::Moisture(value) => self.env.set_moisture(value),
            EffectRevert::WindSpeed(value) => self.env.set_wind_speed(value),
            EffectRevert::StaminaDrain(value) => self.roster.set_stamina_drain(value),
            EffectRevert::CrowdBonus(value) => self.momentum.set_crowd_bonus(value),
            EffectRevert::Plan { team, plan } => self.controller.set_plan(team, plan),
            EffectRevert::Liveliness(value) => self.env.set_liveliness(value),
            EffectRevert::Consciousness { units, value } => {
                // Units removed since the scuffle are simply skipped.
                for id in units {
                    self.roster.set_consciousness(id, value);
                }
            }
            EffectRevert::FormBonus { unit, value } => {
                self.roster.set_form_bonus(unit, value);
            }
        }
        log::debug!("random event expired: {}", event.label());
        self.emit(SimEvent::RandomEventExpired { event });
    }

    fn random_unit_of(&mut self, team: Option<TeamId>) -> Option<UnitId> {
        let candidates: Vec<UnitId> = self
            .roster
            .iter()
            .filter(|(_, unit)| team.map_or(true, |t| unit.team == t))
            .map(|(id, _)| id)
            .collect();
        candidates.choose(&mut self.rng).copied()
    }
}
