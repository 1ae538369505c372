//! Player units: static skills from the factory, dynamic match condition.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::team::TeamId;
use crate::engine::constants::actions::SMART_MARGIN;
use crate::engine::field::{FieldPos, GridCell};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Forward,
    Midfielder,
    Defender,
}

impl Role {
    /// Where the role settles along the attack axis, as a fraction of field
    /// width measured from the team's own goal.
    pub fn depth_fraction(self) -> f32 {
        match self {
            Role::Forward => 0.72,
            Role::Midfielder => 0.5,
            Role::Defender => 0.28,
        }
    }
}

/// Static skill ratings, each in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SkillAttributes {
    #[validate(range(max = 100))]
    pub kick_accuracy: u8,
    #[validate(range(max = 100))]
    pub marking: u8,
    #[validate(range(max = 100))]
    pub hands: u8,
    #[validate(range(max = 100))]
    pub leap: u8,
    #[validate(range(max = 100))]
    pub iq: u8,
    #[validate(range(max = 100))]
    pub physical: u8,
    #[validate(range(max = 100))]
    pub stress: u8,
}

impl SkillAttributes {
    /// Every rating set to `level` except stress, which is its mirror.
    pub fn uniform(level: u8) -> Self {
        let level = level.min(100);
        Self {
            kick_accuracy: level,
            marking: level,
            hands: level,
            leap: level,
            iq: level,
            physical: level,
            stress: 100 - level,
        }
    }

    /// IQ minus stress; above the smart margin a unit considers an extra option.
    pub fn composure_margin(&self) -> i16 {
        i16::from(self.iq) - i16::from(self.stress)
    }
}

impl Default for SkillAttributes {
    fn default() -> Self {
        Self::uniform(60)
    }
}

/// Registration request produced by the external unit factory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct UnitSpec {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    pub team: TeamId,
    pub role: Role,
    #[validate]
    pub attributes: SkillAttributes,
    /// Requested spawn cell; the roster settles the unit on the nearest free cell.
    pub cell: GridCell,
}

impl UnitSpec {
    pub fn new(name: impl Into<String>, team: TeamId, role: Role, cell: GridCell) -> Self {
        Self { name: name.into(), team, role, attributes: SkillAttributes::default(), cell }
    }

    pub fn with_attributes(mut self, attributes: SkillAttributes) -> Self {
        self.attributes = attributes;
        self
    }
}

/// A registered unit as owned by the roster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Unit {
    pub name: String,
    pub team: TeamId,
    pub role: Role,
    pub attributes: SkillAttributes,
    /// [0, 100]
    pub stamina: f32,
    /// [0, 100]; a unit at zero skips its action.
    pub consciousness: f32,
    pub cell: GridCell,
    /// Cell the unit was placed on; its positional anchor for the match.
    pub home_cell: GridCell,
    /// Temporary boost on kick accuracy from random events.
    pub form_bonus: f32,
    /// Set once stamina reaches zero. Informational only.
    pub exhausted: bool,
}

impl Unit {
    pub fn from_spec(spec: UnitSpec, cell: GridCell) -> Self {
        Self {
            name: spec.name,
            team: spec.team,
            role: spec.role,
            attributes: spec.attributes,
            stamina: 100.0,
            consciousness: 100.0,
            cell,
            home_cell: cell,
            form_bonus: 0.0,
            exhausted: false,
        }
    }

    pub fn position(&self) -> FieldPos {
        self.cell.to_field_pos()
    }

    pub fn effective_kick_accuracy(&self) -> f32 {
        (f32::from(self.attributes.kick_accuracy) + self.form_bonus).clamp(0.0, 100.0)
    }

    pub fn thinks_ahead(&self) -> bool {
        self.attributes.composure_margin() > SMART_MARGIN
    }

    pub fn is_conscious(&self) -> bool {
        self.consciousness > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_validation_rejects_out_of_range_skill() {
        let mut spec = UnitSpec::new("Ruckman", TeamId::HOME, Role::Midfielder, GridCell::new(4, 4));
        assert!(spec.validate().is_ok());

        spec.attributes.marking = 140;
        assert!(spec.validate().is_err());
    }

    #[test]
    fn test_spec_validation_rejects_empty_name() {
        let spec = UnitSpec::new("", TeamId::AWAY, Role::Forward, GridCell::new(1, 1));
        assert!(spec.validate().is_err());
    }

    #[test]
    fn test_smart_margin() {
        let mut attributes = SkillAttributes::uniform(90);
        assert_eq!(attributes.composure_margin(), 80);
        let unit = Unit::from_spec(
            UnitSpec::new("Rover", TeamId::HOME, Role::Midfielder, GridCell::new(0, 0))
                .with_attributes(attributes),
            GridCell::new(0, 0),
        );
        assert!(unit.thinks_ahead());

        attributes.stress = 30;
        assert_eq!(attributes.composure_margin(), 60);
    }

    #[test]
    fn test_form_bonus_caps_kick_accuracy() {
        let mut unit = Unit::from_spec(
            UnitSpec::new("Sharpshooter", TeamId::HOME, Role::Forward, GridCell::new(0, 0))
                .with_attributes(SkillAttributes::uniform(95)),
            GridCell::new(0, 0),
        );
        unit.form_bonus = 15.0;
        assert_eq!(unit.effective_kick_accuracy(), 100.0);
    }
}
