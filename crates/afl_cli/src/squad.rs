//! Seeded squad factory. Stands in for the unit-creation pipeline a real
//! front-end would own.

use afl_core::api::{TeamSheet, UnitEntry};
use afl_core::{Role, SkillAttributes};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const LINES: [Role; 3] = [Role::Midfielder, Role::Defender, Role::Forward];

/// Ratings spread around `base`, stress mirrored against IQ.
fn roll_attributes(rng: &mut ChaCha8Rng, base: u8) -> SkillAttributes {
    let mut roll = |spread: i16| -> u8 {
        let value = i16::from(base) + rng.gen_range(-spread..=spread);
        value.clamp(1, 99) as u8
    };
    let iq = roll(15);
    SkillAttributes {
        kick_accuracy: roll(15),
        marking: roll(15),
        hands: roll(15),
        leap: roll(15),
        iq,
        physical: roll(15),
        stress: 100 - iq,
    }
}

/// Team sheet of `size` units cycling through the role lines. The same
/// `seed` always produces the same sheet.
pub fn team_sheet(name: &str, size: usize, seed: u64) -> TeamSheet {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let base = rng.gen_range(50..=70);
    let units = (0..size)
        .map(|i| UnitEntry {
            name: format!("{name} #{}", i + 1),
            role: LINES[i % LINES.len()],
            attributes: roll_attributes(&mut rng, base),
            cell: None,
        })
        .collect();
    TeamSheet { name: name.to_string(), units }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_is_seeded() {
        let a = team_sheet("Hawks", 9, 3);
        let b = team_sheet("Hawks", 9, 3);
        assert_eq!(a.units.len(), 9);
        assert_eq!(
            a.units.iter().map(|u| u.attributes).collect::<Vec<_>>(),
            b.units.iter().map(|u| u.attributes).collect::<Vec<_>>()
        );
        assert_eq!(a.units[1].role, Role::Defender);
    }

    #[test]
    fn test_ratings_in_range() {
        for seed in 0..20 {
            for unit in team_sheet("Cats", 12, seed).units {
                let a = unit.attributes;
                for v in [a.kick_accuracy, a.marking, a.hands, a.leap, a.iq, a.physical, a.stress] {
                    assert!((1..=99).contains(&v));
                }
            }
        }
    }
}
