//! Umpire Decision Model
//!
//! Officials are fallible: every call is a draw against an accuracy that falls
//! off with distance from the nearest umpire, simulation speed and crowd noise.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::constants::umpire::*;
use super::field::{Field, FieldPos};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfractionKind {
    HighTackle,
    HoldingTheBall,
    /// Reviewed but legal.
    LegalTackle,
}

impl InfractionKind {
    pub fn is_foul(self) -> bool {
        !matches!(self, InfractionKind::LegalTackle)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    ScoringReview,
    Infraction(InfractionKind),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UmpirePanel {
    positions: Vec<FieldPos>,
    vision_range: f32,
    base_accuracy: f32,
}

impl UmpirePanel {
    /// Umpires start spaced evenly along the centre line.
    pub fn new(count: u8, vision_range: f32, base_accuracy: f32, field: &Field) -> Self {
        let mut panel = Self {
            positions: Vec::with_capacity(usize::from(count)),
            vision_range: vision_range.max(f32::EPSILON),
            base_accuracy: base_accuracy.clamp(0.0, 1.0),
        };
        panel.reset(count, field);
        panel
    }

    pub fn positions(&self) -> &[FieldPos] {
        &self.positions
    }

    pub fn vision_range(&self) -> f32 {
        self.vision_range
    }

    pub fn base_accuracy(&self) -> f32 {
        self.base_accuracy
    }

    /// Distance from `pos` to the closest umpire; infinite with no umpires.
    pub fn nearest_distance(&self, pos: FieldPos) -> f32 {
        self.positions.iter().map(|u| (u - pos).norm()).fold(f32::INFINITY, f32::min)
    }

    /// Each penalty stays in [0, 1]; `sim_speed` is the clock's current speed.
    pub fn accuracy_at(&self, pos: FieldPos, sim_speed: f32, crowd_noise: f32) -> f32 {
        let distance_pen = (self.nearest_distance(pos) / self.vision_range).min(1.0) * DISTANCE_PENALTY;
        let speed_pen = (sim_speed * SPEED_PENALTY).clamp(0.0, 1.0);
        let crowd_pen = (crowd_noise * CROWD_PENALTY).clamp(0.0, 1.0);
        (self.base_accuracy * (1.0 - distance_pen) * (1.0 - speed_pen) * (1.0 - crowd_pen)).clamp(0.0, 1.0)
    }

    /// Whether the call at `pos` was correct.
    pub fn make_call(
        &self,
        kind: CallKind,
        pos: FieldPos,
        sim_speed: f32,
        crowd_noise: f32,
        rng: &mut ChaCha8Rng,
    ) -> bool {
        let accuracy = self.accuracy_at(pos, sim_speed, crowd_noise);
        let correct = rng.gen::<f32>() < accuracy;
        log::debug!(
            "umpire call {:?} at ({:.1}, {:.1}): accuracy {:.3}, correct {}",
            kind,
            pos.x,
            pos.y,
            accuracy,
            correct
        );
        correct
    }

    /// Step each umpire toward a jittered point around the ball.
    pub fn drift_toward(&mut self, ball: FieldPos, field: &Field, rng: &mut ChaCha8Rng) {
        for pos in &mut self.positions {
            let aim = ball + FieldPos::new(rng.gen_range(-JITTER..=JITTER), rng.gen_range(-JITTER..=JITTER));
            let delta = aim - *pos;
            let distance = delta.norm();
            let step = if distance > DRIFT_STEP { delta * (DRIFT_STEP / distance) } else { delta };
            *pos = field.clamp(*pos + step);
        }
    }

    pub fn reset(&mut self, count: u8, field: &Field) {
        let slots = f32::from(count) + 1.0;
        self.positions = (1..=count)
            .map(|i| FieldPos::new(field.width() * f32::from(i) / slots, field.height() / 2.0))
            .collect();
    }
}
