//! Quarter and break sequencing.

use serde::{Deserialize, Serialize};

use super::constants::clock::{
    HALF_TIME_SECS, LONG_QUARTER_SECS, QUARTER_BREAK_SECS, SHORT_QUARTER_SECS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchPhase {
    #[default]
    PreMatch,
    Q1,
    #[serde(rename = "BREAK_1")]
    Break1,
    Q2,
    HalfTime,
    Q3,
    #[serde(rename = "BREAK_3")]
    Break3,
    Q4,
    PostMatch,
}

impl MatchPhase {
    pub fn is_quarter(self) -> bool {
        self.quarter_number().is_some()
    }

    pub fn is_break(self) -> bool {
        self.break_length_secs().is_some()
    }

    pub fn quarter_number(self) -> Option<u8> {
        match self {
            MatchPhase::Q1 => Some(1),
            MatchPhase::Q2 => Some(2),
            MatchPhase::Q3 => Some(3),
            MatchPhase::Q4 => Some(4),
            _ => None,
        }
    }

    /// Clock length for a quarter phase.
    pub fn quarter_length_secs(self) -> Option<f32> {
        match self {
            MatchPhase::Q1 | MatchPhase::Q3 => Some(SHORT_QUARTER_SECS),
            MatchPhase::Q2 | MatchPhase::Q4 => Some(LONG_QUARTER_SECS),
            _ => None,
        }
    }

    pub fn break_length_secs(self) -> Option<f32> {
        match self {
            MatchPhase::Break1 | MatchPhase::Break3 => Some(QUARTER_BREAK_SECS),
            MatchPhase::HalfTime => Some(HALF_TIME_SECS),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MatchPhase::PreMatch => "PRE_MATCH",
            MatchPhase::Q1 => "Q1",
            MatchPhase::Break1 => "BREAK_1",
            MatchPhase::Q2 => "Q2",
            MatchPhase::HalfTime => "HALF_TIME",
            MatchPhase::Q3 => "Q3",
            MatchPhase::Break3 => "BREAK_3",
            MatchPhase::Q4 => "Q4",
            MatchPhase::PostMatch => "POST_MATCH",
        }
    }
}

/// The phase that follows `current`. POST_MATCH is terminal.
pub fn next_phase(current: MatchPhase) -> MatchPhase {
    match current {
        MatchPhase::PreMatch => MatchPhase::Q1,
        MatchPhase::Q1 => MatchPhase::Break1,
        MatchPhase::Break1 => MatchPhase::Q2,
        MatchPhase::Q2 => MatchPhase::HalfTime,
        MatchPhase::HalfTime => MatchPhase::Q3,
        MatchPhase::Q3 => MatchPhase::Break3,
        MatchPhase::Break3 => MatchPhase::Q4,
        MatchPhase::Q4 => MatchPhase::PostMatch,
        MatchPhase::PostMatch => MatchPhase::PostMatch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_sequence() {
        let mut phase = MatchPhase::PreMatch;
        let mut seen = vec![phase];
        while phase != MatchPhase::PostMatch {
            phase = next_phase(phase);
            seen.push(phase);
        }
        assert_eq!(
            seen.iter().map(|p| p.label()).collect::<Vec<_>>(),
            ["PRE_MATCH", "Q1", "BREAK_1", "Q2", "HALF_TIME", "Q3", "BREAK_3", "Q4", "POST_MATCH"]
        );
        assert_eq!(next_phase(MatchPhase::PostMatch), MatchPhase::PostMatch);
    }

    #[test]
    fn test_quarter_lengths() {
        assert_eq!(MatchPhase::Q1.quarter_length_secs(), Some(300.0));
        assert_eq!(MatchPhase::Q2.quarter_length_secs(), Some(360.0));
        assert_eq!(MatchPhase::Q3.quarter_length_secs(), Some(300.0));
        assert_eq!(MatchPhase::Q4.quarter_length_secs(), Some(360.0));
        assert_eq!(MatchPhase::HalfTime.quarter_length_secs(), None);
    }

    #[test]
    fn test_break_lengths() {
        assert_eq!(MatchPhase::Break1.break_length_secs(), Some(30.0));
        assert_eq!(MatchPhase::HalfTime.break_length_secs(), Some(90.0));
        assert_eq!(MatchPhase::Break3.break_length_secs(), Some(30.0));
        assert!(!MatchPhase::PreMatch.is_break());
        assert!(!MatchPhase::PostMatch.is_quarter());
    }

    #[test]
    fn test_serialized_names_match_labels() {
        for phase in [MatchPhase::Break1, MatchPhase::HalfTime, MatchPhase::PostMatch] {
            let json = serde_json::to_string(&phase).unwrap();
            assert_eq!(json, format!("\"{}\"", phase.label()));
        }
    }
}
