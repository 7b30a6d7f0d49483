//! Grade domain types for scoring outcomes.

use serde::{Deserialize, Serialize};

/// Lowest score any field can carry.
pub const MIN_SCORE: u8 = 1;
/// Highest score any field can carry.
pub const MAX_SCORE: u8 = 10;
/// Score substituted for a sub-score the scoring service left out.
pub const NEUTRAL_SCORE: u8 = 5;

/// Coerce a raw numeric score into an integer in `[MIN_SCORE, MAX_SCORE]`.
pub fn clamp_score(raw: f64) -> u8 {
    raw.round().clamp(MIN_SCORE as f64, MAX_SCORE as f64) as u8
}

/// The five per-dimension sub-scores of a grade, each in 1-10.
///
/// Field names follow the wire format the exam frontend consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoints {
    pub grammar: u8,
    pub coherence: u8,
    pub topic_relevance: u8,
    pub creativity: u8,
    pub structure: u8,
}

impl Default for Checkpoints {
    fn default() -> Self {
        Self {
            grammar: NEUTRAL_SCORE,
            coherence: NEUTRAL_SCORE,
            topic_relevance: NEUTRAL_SCORE,
            creativity: NEUTRAL_SCORE,
            structure: NEUTRAL_SCORE,
        }
    }
}

/// A validated grade for one essay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeResult {
    /// Overall score, 1-10.
    pub score: u8,
    /// Constructive feedback text.
    pub feedback: String,
    /// Per-dimension sub-scores.
    pub checkpoints: Checkpoints,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_score_bounds_and_rounds() {
        assert_eq!(clamp_score(7.0), 7);
        assert_eq!(clamp_score(7.5), 8);
        assert_eq!(clamp_score(0.0), 1);
        assert_eq!(clamp_score(-3.0), 1);
        assert_eq!(clamp_score(15.7), 10);
    }

    #[test]
    fn checkpoints_serialize_with_wire_names() {
        let json = serde_json::to_value(Checkpoints::default()).unwrap();
        assert!(json.get("topicRelevance").is_some());
        assert!(json.get("topic_relevance").is_none());
    }
}
