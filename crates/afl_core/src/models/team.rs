//! Teams, scores and tactical plans.

use serde::{Deserialize, Serialize};

/// Team identifier (0 or 1).
///
/// Team 0 attacks toward the high-x goal and is favoured by positive momentum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamId(pub u8);

impl TeamId {
    pub const HOME: Self = Self(0);
    pub const AWAY: Self = Self(1);

    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::HOME),
            1 => Some(Self::AWAY),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        usize::from(self.0.min(1))
    }

    pub fn is_home(self) -> bool {
        self.index() == 0
    }

    pub fn opponent(self) -> Self {
        if self.is_home() {
            Self::AWAY
        } else {
            Self::HOME
        }
    }

    /// Sign applied to momentum shifts: +1 for team 0, -1 for team 1.
    pub fn momentum_sign(self) -> f32 {
        if self.is_home() {
            1.0
        } else {
            -1.0
        }
    }

    /// Direction of attack along the x axis.
    pub fn attack_direction(self) -> f32 {
        self.momentum_sign()
    }

    pub fn both() -> [TeamId; 2] {
        [Self::HOME, Self::AWAY]
    }
}

/// Kind of score registered through the goal face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreKind {
    Goal,
    Behind,
}

impl ScoreKind {
    pub fn points(self) -> u16 {
        match self {
            ScoreKind::Goal => 6,
            ScoreKind::Behind => 1,
        }
    }

    /// GOAL <-> BEHIND, used when an umpire review is overturned.
    pub fn flipped(self) -> Self {
        match self {
            ScoreKind::Goal => ScoreKind::Behind,
            ScoreKind::Behind => ScoreKind::Goal,
        }
    }
}

/// Goals and behinds for one team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score {
    pub goals: u16,
    pub behinds: u16,
}

impl Score {
    pub fn points(&self) -> u16 {
        self.goals * ScoreKind::Goal.points() + self.behinds * ScoreKind::Behind.points()
    }

    pub fn add(&mut self, kind: ScoreKind) {
        match kind {
            ScoreKind::Goal => self.goals += 1,
            ScoreKind::Behind => self.behinds += 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Scoreboard {
    scores: [Score; 2],
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self, team: TeamId) -> Score {
        self.scores[team.index()]
    }

    pub fn points(&self, team: TeamId) -> u16 {
        self.scores[team.index()].points()
    }

    pub fn totals(&self) -> [u16; 2] {
        [self.points(TeamId::HOME), self.points(TeamId::AWAY)]
    }

    pub fn add(&mut self, team: TeamId, kind: ScoreKind) {
        self.scores[team.index()].add(kind);
    }

    /// Points ahead (positive) or behind (negative) for `team`.
    pub fn margin_for(&self, team: TeamId) -> i32 {
        i32::from(self.points(team)) - i32::from(self.points(team.opponent()))
    }

    pub fn gap(&self) -> u16 {
        self.points(TeamId::HOME).abs_diff(self.points(TeamId::AWAY))
    }

    pub fn leader(&self) -> Option<TeamId> {
        match self.margin_for(TeamId::HOME) {
            m if m > 0 => Some(TeamId::HOME),
            m if m < 0 => Some(TeamId::AWAY),
            _ => None,
        }
    }

    pub fn outcome(&self) -> MatchOutcome {
        self.leader().map_or(MatchOutcome::Draw, MatchOutcome::Winner)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    Winner(TeamId),
    Draw,
}

/// Team-wide tactical plan. Shifts where units settle and how far out they shoot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TacticalPlan {
    #[default]
    Balanced,
    Attacking,
    Defensive,
}

impl TacticalPlan {
    /// Fraction of field width the whole team pushes toward its attacking goal.
    pub fn push_up(self) -> f32 {
        match self {
            TacticalPlan::Balanced => 0.0,
            TacticalPlan::Attacking => 0.1,
            TacticalPlan::Defensive => -0.1,
        }
    }

    /// Distance to goal inside which a holder takes a shot.
    pub fn shot_range(self) -> f32 {
        match self {
            TacticalPlan::Balanced => 12.0,
            TacticalPlan::Attacking => 15.0,
            TacticalPlan::Defensive => 10.0,
        }
    }
}
