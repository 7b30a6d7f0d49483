//! Reply parsing and validation.
//!
//! The scoring service is asked for strict JSON, but replies sometimes
//! arrive wrapped in prose or code fences. Decoding first tries the whole
//! reply, then falls back to the first balanced brace block. The fallback
//! is isolated in [`extract_braced_block`] so it can be swapped out
//! without touching the rest of the grader.

use serde::Deserialize;
use tracing::debug;

use grading_core::{Checkpoints, GradeError, GradeResult, NEUTRAL_SCORE, clamp_score};

/// Feedback substituted when the scoring service omits it.
const DEFAULT_FEEDBACK: &str = "Essay graded successfully.";

/// Grade reply as the service sends it, before validation.
#[derive(Debug, Deserialize)]
struct RawGrade {
    score: f64,
    feedback: Option<String>,
    checkpoints: Option<RawCheckpoints>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCheckpoints {
    grammar: Option<f64>,
    coherence: Option<f64>,
    topic_relevance: Option<f64>,
    creativity: Option<f64>,
    structure: Option<f64>,
}

/// Decode a raw scoring reply into a validated [`GradeResult`].
///
/// Fails with [`GradeError::Parse`] when no decodable block exists; that
/// failure is terminal for the job and is never retried.
pub fn parse_grade_reply(reply: &str) -> Result<GradeResult, GradeError> {
    let trimmed = reply.trim();

    let raw: RawGrade = match serde_json::from_str(trimmed) {
        Ok(raw) => raw,
        Err(_) => {
            let block = extract_braced_block(trimmed).ok_or(GradeError::Parse)?;
            serde_json::from_str(block).map_err(|e| {
                debug!("grading reply block did not decode: {}", e);
                GradeError::Parse
            })?
        }
    };

    Ok(validate(raw))
}

/// Clamp, round and default the raw fields into a well-formed grade.
fn validate(raw: RawGrade) -> GradeResult {
    let checkpoints = raw.checkpoints.unwrap_or_default();

    GradeResult {
        score: clamp_score(raw.score),
        feedback: raw
            .feedback
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FEEDBACK.to_string()),
        checkpoints: Checkpoints {
            grammar: clamp_or_neutral(checkpoints.grammar),
            coherence: clamp_or_neutral(checkpoints.coherence),
            topic_relevance: clamp_or_neutral(checkpoints.topic_relevance),
            creativity: clamp_or_neutral(checkpoints.creativity),
            structure: clamp_or_neutral(checkpoints.structure),
        },
    }
}

fn clamp_or_neutral(raw: Option<f64>) -> u8 {
    raw.map(clamp_score).unwrap_or(NEUTRAL_SCORE)
}

/// Locate the first balanced `{ ... }` block in free-form text.
///
/// Braces inside JSON string literals do not count toward the balance, so
/// feedback text containing `{` cannot derail the scan.
fn extract_braced_block(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}
