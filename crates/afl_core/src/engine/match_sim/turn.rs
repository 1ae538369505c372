//! Turn Scheduler: one action per live unit per tick.
//!
//! The resolver picks; this file carries the action out against the ball and
//! roster, publishes what happened and charges stamina for what was actually
//! executed (a refused move costs nothing and counts as standing).

use rand::Rng;

use super::MatchEngine;
use crate::engine::ball::{BallState, BallUpdate, PossessionQuality};
use crate::engine::constants::actions::*;
use crate::engine::field::{Direction, FieldPos};
use crate::engine::resolver::{self, Action, ActionContext, ActionKind, BallControl};
use crate::engine::roster::UnitId;
use crate::engine::umpire::InfractionKind;
use crate::models::{DisposalKind, SimEvent, TackleOutcome};

impl MatchEngine {
    /// Every live unit acts once, in registration order. A stoppage or the
    /// siren ends the turn early.
    pub(crate) fn run_turn(&mut self) {
        self.restart_play();

        let order = self.roster.ids().to_vec();
        for id in order {
            if !self.controller.is_clock_running() {
                break;
            }
            let Some(conscious) = self.roster.get(id).map(|u| u.is_conscious()) else {
                continue;
            };
            if !conscious {
                self.roster.adjust_consciousness(id, CONSCIOUSNESS_RECOVERY);
                continue;
            }
            let Some(ctx) = self.action_context(id) else {
                continue;
            };

            let action = resolver::choose_action(&ctx, &mut self.rng);
            let executed = self.execute_action(id, action);
            self.roster.apply_stamina(id, executed.stamina_cost());
        }
    }

    /// Put a stopped ball back into play.
    fn restart_play(&mut self) {
        match self.ball.state() {
            BallState::WithOfficial => {
                self.ball.bounce_up(&mut self.rng);
                self.emit(SimEvent::BallUp { position: self.ball.position() });
            }
            BallState::OutOfBounds => {
                self.ball.throw_in(&self.field, &mut self.rng);
                self.emit(SimEvent::BallUp { position: self.ball.position() });
            }
            BallState::Dead => self.ball.reset_to_center(&self.field),
            _ => {}
        }
    }

    pub(crate) fn action_context(&self, id: UnitId) -> Option<ActionContext> {
        let unit = self.roster.get(id)?;
        let team = unit.team;
        let pos = unit.position();
        let dir = team.attack_direction();
        let plan = self.controller.plan(team);

        let ball_pos = self.ball.position();
        let holder = self.ball.holder().zip(self.ball.holder_team());
        let control = BallControl::classify(self.ball.state(), holder, id, team);

        let attacking_goal = self.field.attacking_goal(team);
        let dist_to_goal = (attacking_goal - pos).norm();
        let to_goal = attacking_goal - pos;
        let heading = if to_goal.norm() > f32::EPSILON { to_goal.normalize() } else { FieldPos::new(dir, 0.0) };

        let home = unit.home_cell.to_field_pos();
        let home_target =
            self.field.clamp(home + FieldPos::new(dir * plan.push_up() * self.field.width(), 0.0));
        let lead_target =
            self.field.clamp(ball_pos + FieldPos::new(dir * LEAD_DISTANCE, (pos.y - ball_pos.y) * 0.5));
        let clearing_target = self.field.clamp(pos + heading * CLEARING_KICK_DISTANCE);

        let mut teammate_ahead: Option<(UnitId, FieldPos, f32)> = None;
        let mut teammate_near: Option<(UnitId, FieldPos, f32)> = None;
        for (other, mate) in self.roster.iter() {
            if other == id || mate.team != team {
                continue;
            }
            let mate_pos = mate.position();
            let apart = (mate_pos - pos).norm();
            let mate_to_goal = (attacking_goal - mate_pos).norm();

            if apart <= KICK_PASS_RANGE
                && mate_to_goal + 2.0 < dist_to_goal
                && teammate_ahead.map_or(true, |(_, _, best)| mate_to_goal < best)
            {
                teammate_ahead = Some((other, mate_pos, mate_to_goal));
            }
            if apart <= HANDBALL_RANGE && teammate_near.map_or(true, |(_, _, best)| apart < best) {
                teammate_near = Some((other, mate_pos, apart));
            }
        }

        Some(ActionContext {
            unit: id,
            team,
            role: unit.role,
            cell: unit.cell,
            stamina: unit.stamina,
            smart: unit.thinks_ahead(),
            plan,
            control,
            ball_pos,
            dist_to_ball: (ball_pos - pos).norm(),
            attacking_goal,
            dist_to_goal,
            home_target,
            lead_target,
            clearing_target,
            teammate_ahead: teammate_ahead.map(|(id, pos, _)| (id, pos)),
            teammate_near: teammate_near.map(|(id, pos, _)| (id, pos)),
        })
    }

    /// Carry out `action` and report what was actually done.
    pub(crate) fn execute_action(&mut self, id: UnitId, action: Action) -> ActionKind {
        match action {
            Action::Move { toward } => {
                if self.step_toward(id, toward) {
                    ActionKind::Move
                } else {
                    ActionKind::Stand
                }
            }
            Action::Kick { target, power } => {
                if self.ball.holder() != Some(id) {
                    return ActionKind::Stand;
                }
                let report =
                    self.with_ball(|ball, roster, ctx| ball.kick(roster, id, target, power, ctx));
                match report {
                    Some(report) => {
                        self.emit(SimEvent::Disposal {
                            unit: id,
                            kind: DisposalKind::Kick,
                            landing: report.landing,
                            accuracy: report.accuracy,
                        });
                        ActionKind::Kick
                    }
                    None => ActionKind::Stand,
                }
            }
            Action::Handball { target } => {
                if self.ball.holder() != Some(id) {
                    return ActionKind::Stand;
                }
                let report = self.with_ball(|ball, roster, ctx| ball.handball(roster, id, target, ctx));
                match report {
                    Some(report) => {
                        self.emit(SimEvent::Disposal {
                            unit: id,
                            kind: DisposalKind::Handball,
                            landing: report.landing,
                            accuracy: report.accuracy,
                        });
                        ActionKind::Handball
                    }
                    None => ActionKind::Stand,
                }
            }
            Action::Mark => self.execute_mark(id),
            Action::Tackle { target } => self.execute_tackle(id, target),
            Action::Stand => ActionKind::Stand,
        }
    }

    /// Try the cardinal neighbours in fixed order and take the first free
    /// in-bounds cell. A unit already on its target stays put.
    fn step_toward(&mut self, id: UnitId, toward: FieldPos) -> bool {
        let Some(cell) = self.roster.get(id).map(|u| u.cell) else {
            return false;
        };
        if cell.distance_to(toward) < 0.5 {
            return false;
        }

        Direction::CARDINAL_ORDER
            .iter()
            .any(|&dir| self.roster.move_unit(id, cell.step(dir), &self.field))
    }

    fn execute_mark(&mut self, id: UnitId) -> ActionKind {
        let Some(pos) = self.roster.get(id).map(|u| u.position()) else {
            return ActionKind::Stand;
        };
        if !self.ball.is_loose() || (self.ball.position() - pos).norm() > MARK_REACH {
            return ActionKind::Stand;
        }

        let attempt = self.with_ball(|ball, roster, ctx| ball.attempt_possession(roster, id, ctx));
        if attempt.gained {
            if let Some(team) = self.ball.holder_team() {
                self.emit(SimEvent::PossessionGained { unit: id, team, quality: self.ball.quality() });
            }
        } else {
            self.emit(SimEvent::BallSpilled { unit: id, position: self.ball.position() });
        }
        self.handle_ball_update(attempt.update);
        ActionKind::Mark
    }

    fn execute_tackle(&mut self, tackler: UnitId, target: UnitId) -> ActionKind {
        let (Some(t), Some(h)) = (self.roster.get(tackler), self.roster.get(target)) else {
            return ActionKind::Stand;
        };
        if self.ball.holder() != Some(target)
            || t.team == h.team
            || (t.position() - h.position()).norm() > TACKLE_REACH
        {
            return ActionKind::Stand;
        }
        let tackle_strength = f32::from(t.attributes.physical);
        let hold_strength = f32::from(h.attributes.physical);

        if self.rng.gen_bool(HIGH_TACKLE_CHANCE) {
            self.roster.adjust_consciousness(target, -HIGH_TACKLE_CONSCIOUSNESS_LOSS);
            if self.check_for_infraction(tackler, InfractionKind::HighTackle) {
                self.emit(SimEvent::Tackle { tackler, target, outcome: TackleOutcome::HighTackleAborted });
                return ActionKind::Tackle;
            }
        }

        if self.ball.held_ticks() >= HOLDING_THE_BALL_TICKS
            && self.check_for_infraction(target, InfractionKind::HoldingTheBall)
        {
            self.emit(SimEvent::Tackle { tackler, target, outcome: TackleOutcome::HoldingTheBall });
            return ActionKind::Tackle;
        }

        let total = tackle_strength + hold_strength;
        let dislodge_chance = if total > 0.0 { tackle_strength / total } else { 0.5 };
        if self.rng.gen::<f32>() < dislodge_chance {
            self.emit(SimEvent::Tackle { tackler, target, outcome: TackleOutcome::Dislodged });
            if !self.check_for_infraction(tackler, InfractionKind::LegalTackle) {
                let update = self.with_ball(|ball, _, ctx| ball.spill(PossessionQuality::Poor, ctx));
                self.emit(SimEvent::BallSpilled { unit: target, position: self.ball.position() });
                self.handle_ball_update(update);
            }
        } else {
            self.ball.contest();
            self.emit(SimEvent::Tackle { tackler, target, outcome: TackleOutcome::Broken });
        }
        ActionKind::Tackle
    }

    pub(crate) fn handle_ball_update(&mut self, update: BallUpdate) {
        match update {
            BallUpdate::Scored { team, kind } => {
                let position = self.ball.position();
                if self.register_score(team, kind, position).is_none() {
                    // Siren already went; the ball is dead where it crossed.
                    self.ball.make_dead();
                }
            }
            BallUpdate::OutOfBounds => {
                self.emit(SimEvent::BallOutOfBounds { position: self.ball.position() });
            }
            BallUpdate::Moved | BallUpdate::Idle => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_fixtures::*;
    use super::*;
    use crate::engine::field::GridCell;
    use crate::models::{Role, ScoreKind, SkillAttributes, TeamId, UnitSpec};

    fn duo() -> (MatchEngine, UnitId, UnitId) {
        let mut engine = MatchEngine::with_seed(21);
        let home = engine
            .register_unit(
                UnitSpec::new("Home", TeamId::HOME, Role::Midfielder, GridCell::new(20, 16))
                    .with_attributes(SkillAttributes::uniform(70)),
            )
            .unwrap();
        let away = engine
            .register_unit(
                UnitSpec::new("Away", TeamId::AWAY, Role::Midfielder, GridCell::new(21, 16))
                    .with_attributes(SkillAttributes::uniform(70)),
            )
            .unwrap();
        (engine, home, away)
    }

    #[test]
    fn test_step_uses_fixed_cardinal_order() {
        let (mut engine, home, _) = duo();
        // Target lies south, but north is tried first and is free.
        assert!(engine.step_toward(home, FieldPos::new(20.0, 30.0)));
        assert_eq!(engine.unit(home).unwrap().cell, GridCell::new(20, 15));
    }

    #[test]
    fn test_step_falls_back_when_blocked() {
        let (mut engine, home, _) = duo();
        engine
            .register_unit(UnitSpec::new("Block", TeamId::AWAY, Role::Defender, GridCell::new(20, 15)))
            .unwrap();
        // North is taken and east holds the away unit; south is next.
        assert!(engine.step_toward(home, FieldPos::new(30.0, 16.0)));
        assert_eq!(engine.unit(home).unwrap().cell, GridCell::new(20, 17));
        // Already there: no move.
        assert!(!engine.step_toward(home, FieldPos::new(20.0, 17.0)));
    }

    #[test]
    fn test_kick_requires_possession() {
        let (mut engine, home, away) = duo();
        let kind = engine.execute_action(home, Action::Kick { target: FieldPos::new(40.0, 16.0), power: 1.0 });
        assert_eq!(kind, ActionKind::Stand);

        engine.award_free_kick(TeamId::HOME, FieldPos::new(20.0, 16.0));
        assert_eq!(engine.ball().holder(), Some(home));
        let kind = engine.execute_action(home, Action::Kick { target: FieldPos::new(40.0, 16.0), power: 1.0 });
        assert_eq!(kind, ActionKind::Kick);
        assert_eq!(engine.ball().state(), BallState::LooseAir);
        assert_eq!(engine.ball().holder(), None);

        let kind = engine.execute_action(away, Action::Tackle { target: home });
        assert_eq!(kind, ActionKind::Stand);
    }

    #[test]
    fn test_tackle_resolves_with_an_outcome() {
        for seed in 0..40 {
            let mut engine = MatchEngine::with_seed(seed);
            let home = engine
                .register_unit(UnitSpec::new("H", TeamId::HOME, Role::Forward, GridCell::new(20, 16)))
                .unwrap();
            let away = engine
                .register_unit(UnitSpec::new("A", TeamId::AWAY, Role::Defender, GridCell::new(21, 16)))
                .unwrap();
            engine.start_match().unwrap();
            engine.award_free_kick(TeamId::HOME, FieldPos::new(20.0, 16.0));

            let kind = engine.execute_action(away, Action::Tackle { target: home });
            assert_eq!(kind, ActionKind::Tackle);
            let outcome = engine.event_log().iter().rev().find_map(|e| match &e.event {
                SimEvent::Tackle { outcome, .. } => Some(*outcome),
                _ => None,
            });
            assert!(outcome.is_some(), "seed {seed}");
            let holder = engine.ball().holder();
            assert_eq!(holder.is_some(), engine.ball().state().is_held());
        }
    }

    #[test]
    fn test_score_after_siren_leaves_ball_dead() {
        let (mut engine, _, _) = duo();
        engine.handle_ball_update(BallUpdate::Scored { team: TeamId::HOME, kind: ScoreKind::Goal });
        assert_eq!(engine.ball().state(), BallState::Dead);
        assert_eq!(engine.scoreboard().totals(), [0, 0]);
    }

    #[test]
    fn test_unconscious_unit_skips_and_recovers() {
        let mut engine = engine_with_squads(22, 2);
        let id = engine.unit_ids()[0];
        engine.start_match().unwrap();
        engine.roster_mut().set_consciousness(id, 0.0);
        engine.tick();
        let unit = engine.unit(id).unwrap();
        assert_eq!(unit.consciousness, CONSCIOUSNESS_RECOVERY);
        assert_eq!(unit.stamina, 100.0);
    }

    #[test]
    fn test_turn_charges_stamina() {
        let mut engine = engine_with_squads(23, 4);
        engine.start_match().unwrap();
        engine.tick();
        let changed = engine.units().any(|u| u.stamina != 100.0);
        assert!(changed);
        for unit in engine.units() {
            assert!((0.0..=100.0).contains(&unit.stamina));
        }
    }
}
