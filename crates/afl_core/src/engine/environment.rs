//! Weather state consumed by ball physics and kick accuracy.

use serde::Serialize;

use super::constants::ball::{KICK_MOISTURE_PENALTY, WIND_DRIFT_SCALE};
use super::constants::environment::MOISTURE_DRIFT_PER_SEC;
use super::field::FieldPos;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Environment {
    /// [0, 1]
    wind_speed: f32,
    /// Unit vector.
    wind_direction: FieldPos,
    /// [0, 1]
    humidity: f32,
    /// [0, 1], drifts toward humidity.
    moisture: f32,
    /// Multiplier on kick power; 1.0 for a well-pumped ball.
    liveliness: f32,
}

impl Environment {
    pub fn new(humidity: f32, wind_speed: f32, wind_angle_deg: f32) -> Self {
        let humidity = humidity.clamp(0.0, 1.0);
        let mut env = Self {
            wind_speed: 0.0,
            wind_direction: FieldPos::new(1.0, 0.0),
            humidity,
            moisture: humidity,
            liveliness: 1.0,
        };
        env.set_wind(wind_speed, wind_angle_deg.to_radians());
        env
    }

    pub fn wind_speed(&self) -> f32 {
        self.wind_speed
    }

    pub fn wind_direction(&self) -> FieldPos {
        self.wind_direction
    }

    pub fn humidity(&self) -> f32 {
        self.humidity
    }

    pub fn moisture(&self) -> f32 {
        self.moisture
    }

    pub fn liveliness(&self) -> f32 {
        self.liveliness
    }

    /// Displacement added to a loose ball each time it is repositioned.
    pub fn wind_drift(&self) -> FieldPos {
        self.wind_direction * self.wind_speed * WIND_DRIFT_SCALE
    }

    pub fn kick_moisture_penalty(&self) -> f32 {
        1.0 - self.moisture * KICK_MOISTURE_PENALTY
    }

    pub fn set_wind(&mut self, speed: f32, angle_rad: f32) {
        self.wind_speed = speed.clamp(0.0, 1.0);
        self.wind_direction = FieldPos::new(angle_rad.cos(), angle_rad.sin());
    }

    pub fn set_wind_speed(&mut self, speed: f32) {
        self.wind_speed = speed.clamp(0.0, 1.0);
    }

    pub fn set_moisture(&mut self, moisture: f32) {
        self.moisture = moisture.clamp(0.0, 1.0);
    }

    pub fn set_liveliness(&mut self, liveliness: f32) {
        self.liveliness = liveliness.clamp(0.1, 1.5);
    }

    /// Move moisture toward humidity by at most `MOISTURE_DRIFT_PER_SEC` per second.
    pub fn drift_moisture(&mut self, sim_secs: f32) {
        let max_step = MOISTURE_DRIFT_PER_SEC * sim_secs.max(0.0);
        let gap = self.humidity - self.moisture;
        self.moisture += gap.clamp(-max_step, max_step);
    }
}
