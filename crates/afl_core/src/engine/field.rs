//! Field geometry: continuous ball coordinates, integer unit cells, goal faces.
//!
//! Team 0 attacks the high-x end and scores through the goal face at
//! `x = width`; team 1 attacks the low-x end and scores at `x = 0`.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use super::constants::field::{
    BEHIND_HALF_WIDTH, GOAL_DEPTH, GOAL_HALF_WIDTH, SCORING_ZONE_RADIUS, THROW_IN_INSET,
};
use crate::models::{Role, ScoreKind, TeamId};

/// Continuous field coordinate in grid units.
pub type FieldPos = Vector2<f32>;

/// Integer cell a unit stands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridCell {
    pub x: i32,
    pub y: i32,
}

impl GridCell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn to_field_pos(self) -> FieldPos {
        FieldPos::new(self.x as f32, self.y as f32)
    }

    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance_to(self, pos: FieldPos) -> f32 {
        (self.to_field_pos() - pos).norm()
    }

    pub fn nearest_to(pos: FieldPos) -> Self {
        Self::new(pos.x.round() as i32, pos.y.round() as i32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Order in which a moving unit tries its neighbours.
    pub const CARDINAL_ORDER: [Direction; 4] =
        [Direction::North, Direction::East, Direction::South, Direction::West];

    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field {
    width: f32,
    height: f32,
}

impl Field {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn center(&self) -> FieldPos {
        FieldPos::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn contains(&self, pos: FieldPos) -> bool {
        pos.x >= 0.0 && pos.x <= self.width && pos.y >= 0.0 && pos.y <= self.height
    }

    /// Cells run `0..width` by `0..height`.
    pub fn contains_cell(&self, cell: GridCell) -> bool {
        cell.x >= 0
            && cell.y >= 0
            && (cell.x as f32) < self.width
            && (cell.y as f32) < self.height
    }

    /// Point a team aims at when shooting: middle of the opposing goal face.
    pub fn attacking_goal(&self, team: TeamId) -> FieldPos {
        let x = if team.is_home() { self.width - GOAL_DEPTH / 2.0 } else { GOAL_DEPTH / 2.0 };
        FieldPos::new(x, self.height / 2.0)
    }

    pub fn in_scoring_zone(&self, pos: FieldPos) -> bool {
        TeamId::both()
            .iter()
            .any(|&team| (self.attacking_goal(team) - pos).norm() <= SCORING_ZONE_RADIUS)
    }

    /// Classify a ball movement against both goal faces.
    ///
    /// Landing inside a goal strip counts, and so does crossing the end line
    /// between the behind posts on the way out.
    pub fn score_check(&self, from: FieldPos, to: FieldPos) -> Option<(TeamId, ScoreKind)> {
        if self.contains(to) {
            if let Some(hit) = self.goal_strip_at(to) {
                return Some(hit);
            }
        }
        self.end_line_crossing(from, to)
    }

    fn goal_strip_at(&self, pos: FieldPos) -> Option<(TeamId, ScoreKind)> {
        let kind = self.kind_at_offset(pos.y)?;
        if pos.x >= self.width - GOAL_DEPTH {
            Some((TeamId::HOME, kind))
        } else if pos.x <= GOAL_DEPTH {
            Some((TeamId::AWAY, kind))
        } else {
            None
        }
    }

    fn end_line_crossing(&self, from: FieldPos, to: FieldPos) -> Option<(TeamId, ScoreKind)> {
        let (line_x, team) = if to.x > self.width && from.x <= self.width {
            (self.width, TeamId::HOME)
        } else if to.x < 0.0 && from.x >= 0.0 {
            (0.0, TeamId::AWAY)
        } else {
            return None;
        };
        let dx = to.x - from.x;
        if dx.abs() < f32::EPSILON {
            return None;
        }
        let t = (line_x - from.x) / dx;
        let y = from.y + t * (to.y - from.y);
        self.kind_at_offset(y).map(|kind| (team, kind))
    }

    fn kind_at_offset(&self, y: f32) -> Option<ScoreKind> {
        let offset = (y - self.height / 2.0).abs();
        if offset <= GOAL_HALF_WIDTH {
            Some(ScoreKind::Goal)
        } else if offset <= BEHIND_HALF_WIDTH {
            Some(ScoreKind::Behind)
        } else {
            None
        }
    }

    /// Nearest in-bounds point, pulled `THROW_IN_INSET` away from the line.
    pub fn throw_in_point(&self, pos: FieldPos) -> FieldPos {
        FieldPos::new(
            pos.x.clamp(THROW_IN_INSET, self.width - THROW_IN_INSET),
            pos.y.clamp(THROW_IN_INSET, self.height - THROW_IN_INSET),
        )
    }

    pub fn clamp(&self, pos: FieldPos) -> FieldPos {
        FieldPos::new(pos.x.clamp(0.0, self.width), pos.y.clamp(0.0, self.height))
    }

    /// Kick-off cell for the `slot`-th unit of a role line.
    ///
    /// Lines sit at the role's depth from the team's own goal and fan out
    /// from the centre line in alternating steps of three cells. Team 1 is
    /// offset one row so opposing lines interleave instead of colliding.
    pub fn formation_cell(&self, team: TeamId, role: Role, slot: usize) -> GridCell {
        const FAN: usize = 9;
        let depth = role.depth_fraction() * self.width - (slot / FAN) as f32 * 2.0;
        let x = if team.is_home() { depth } else { self.width - depth };

        let step = slot % FAN;
        let rank = ((step + 1) / 2) as f32 * 3.0;
        let offset = if step % 2 == 1 { rank } else { -rank };
        let y = self.height / 2.0 + offset + f32::from(team.0);

        let cell = GridCell::nearest_to(FieldPos::new(x, y));
        GridCell::new(
            cell.x.clamp(0, self.width as i32 - 1),
            cell.y.clamp(0, self.height as i32 - 1),
        )
    }
}

impl Default for Field {
    fn default() -> Self {
        use super::constants::field::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}
