//! Possession/Action Resolver
//!
//! Pure decision policy: given a unit's view of the play, build a weighted
//! candidate list conditioned on distance to the ball and pick one by roulette
//! wheel. Executing the action is the match engine's job (`match_sim::turn`).

use rand::Rng;
use serde::Serialize;

use super::ball::BallState;
use super::constants::actions::*;
use super::constants::stamina;
use super::field::{FieldPos, GridCell};
use super::roster::UnitId;
use crate::models::{Role, TacticalPlan, TeamId};

/// Who controls the ball from this unit's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallControl {
    Mine,
    Teammate,
    Opponent(UnitId),
    Loose,
    /// With the official, out of bounds or dead.
    Stopped,
}

impl BallControl {
    pub fn classify(state: BallState, holder: Option<(UnitId, TeamId)>, me: UnitId, team: TeamId) -> Self {
        match holder {
            Some((id, _)) if id == me => BallControl::Mine,
            Some((_, t)) if t == team => BallControl::Teammate,
            Some((id, _)) => BallControl::Opponent(id),
            None if state.is_loose() => BallControl::Loose,
            None => BallControl::Stopped,
        }
    }
}

/// Everything the policy needs, precomputed by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionContext {
    pub unit: UnitId,
    pub team: TeamId,
    pub role: Role,
    pub cell: GridCell,
    pub stamina: f32,
    /// IQ - stress above the smart margin.
    pub smart: bool,
    pub plan: TacticalPlan,
    pub control: BallControl,
    pub ball_pos: FieldPos,
    pub dist_to_ball: f32,
    pub attacking_goal: FieldPos,
    pub dist_to_goal: f32,
    /// Home position shifted by the tactical plan.
    pub home_target: FieldPos,
    /// Space ahead of the ball to lead into.
    pub lead_target: FieldPos,
    /// Speculative upfield kick target.
    pub clearing_target: FieldPos,
    /// Teammate closer to goal and within kicking range.
    pub teammate_ahead: Option<(UnitId, FieldPos)>,
    /// Nearest teammate within handball range.
    pub teammate_near: Option<(UnitId, FieldPos)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Move { toward: FieldPos },
    Kick { target: FieldPos, power: f32 },
    Handball { target: FieldPos },
    Mark,
    Tackle { target: UnitId },
    Stand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Move,
    Kick,
    Handball,
    Mark,
    Tackle,
    Stand,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Move { .. } => ActionKind::Move,
            Action::Kick { .. } => ActionKind::Kick,
            Action::Handball { .. } => ActionKind::Handball,
            Action::Mark => ActionKind::Mark,
            Action::Tackle { .. } => ActionKind::Tackle,
            Action::Stand => ActionKind::Stand,
        }
    }
}

impl ActionKind {
    /// Stamina delta applied after execution.
    pub fn stamina_cost(self) -> f32 {
        match self {
            ActionKind::Move => stamina::MOVE,
            ActionKind::Kick => stamina::KICK,
            ActionKind::Handball => stamina::HANDBALL,
            ActionKind::Mark => stamina::MARK,
            ActionKind::Tackle => stamina::TACKLE,
            ActionKind::Stand => stamina::STAND,
        }
    }
}

/// Weighted options for this unit.
pub fn candidates(ctx: &ActionContext) -> Vec<(Action, u32)> {
    let mut list = match ctx.control {
        BallControl::Mine => with_ball(ctx),
        BallControl::Loose => chasing(ctx, ctx.dist_to_ball <= MARK_REACH, Action::Mark),
        BallControl::Opponent(holder) => {
            chasing(ctx, ctx.dist_to_ball <= TACKLE_REACH, Action::Tackle { target: holder })
        }
        BallControl::Teammate => supporting(ctx),
        BallControl::Stopped => vec![
            (Action::Move { toward: ctx.home_target }, 3),
            (Action::Stand, 3),
        ],
    };

    if ctx.stamina < FATIGUED_STAMINA && ctx.control != BallControl::Mine {
        match list.iter_mut().find(|(action, _)| *action == Action::Stand) {
            Some((_, weight)) => *weight += 4,
            None => list.push((Action::Stand, 4)),
        }
    }
    list
}

fn with_ball(ctx: &ActionContext) -> Vec<(Action, u32)> {
    let mut list = Vec::with_capacity(4);
    if ctx.dist_to_goal <= ctx.plan.shot_range() {
        list.push((Action::Kick { target: ctx.attacking_goal, power: KICK_POWER_SHOT }, 6));
        if let Some((_, target)) = ctx.teammate_near {
            list.push((Action::Handball { target }, 1));
        }
        list.push((Action::Move { toward: ctx.attacking_goal }, 1));
        return list;
    }

    match (ctx.smart, ctx.teammate_ahead) {
        (true, Some((_, target))) => {
            list.push((Action::Kick { target, power: KICK_POWER_PASS }, 5));
            list.push((Action::Kick { target: ctx.clearing_target, power: KICK_POWER_PASS }, 1));
        }
        _ => list.push((Action::Kick { target: ctx.clearing_target, power: KICK_POWER_PASS }, 4)),
    }
    if let Some((_, target)) = ctx.teammate_near {
        list.push((Action::Handball { target }, if ctx.smart { 3 } else { 2 }));
    }
    list.push((Action::Move { toward: ctx.attacking_goal }, 2));
    list
}

fn chasing(ctx: &ActionContext, in_reach: bool, contest: Action) -> Vec<(Action, u32)> {
    let at_ball = Action::Move { toward: ctx.ball_pos };
    if in_reach {
        vec![(contest, 8), (at_ball, 1)]
    } else if ctx.dist_to_ball <= CHASE_RADIUS {
        vec![(at_ball, 6), (Action::Stand, 1)]
    } else if ctx.smart {
        // Drift between the ball and home rather than straight back.
        let cover = (ctx.home_target + ctx.ball_pos) * 0.5;
        vec![(Action::Move { toward: cover }, 4), (Action::Move { toward: ctx.home_target }, 1), (Action::Stand, 1)]
    } else {
        vec![(Action::Move { toward: ctx.home_target }, 3), (Action::Stand, 2)]
    }
}

fn supporting(ctx: &ActionContext) -> Vec<(Action, u32)> {
    let lead_weight = match ctx.role {
        Role::Forward => 3,
        Role::Midfielder => 2,
        Role::Defender => 1,
    };
    if ctx.smart {
        vec![
            (Action::Move { toward: ctx.lead_target }, 3 + lead_weight),
            (Action::Move { toward: ctx.home_target }, 2),
            (Action::Stand, 1),
        ]
    } else {
        vec![
            (Action::Move { toward: ctx.lead_target }, lead_weight),
            (Action::Move { toward: ctx.home_target }, 3),
            (Action::Stand, 2),
        ]
    }
}

/// Roulette-wheel pick over integer weights. Falls back to standing.
pub fn choose_action(ctx: &ActionContext, rng: &mut impl Rng) -> Action {
    let list = candidates(ctx);
    let total: u32 = list.iter().map(|(_, w)| *w).sum();
    if total == 0 {
        return Action::Stand;
    }
    let mut pick = rng.gen_range(0..total);
    for (action, weight) in &list {
        if pick < *weight {
            return *action;
        }
        pick -= weight;
    }
    Action::Stand
}
