//! Grading prompt construction.

use grading_core::EssaySubmission;

/// Build the instruction prompt for one submission.
///
/// The reply format is pinned to strict JSON; parsing still tolerates
/// wrapped replies, see [`crate::parse_grade_reply`].
pub fn build_grading_prompt(submission: &EssaySubmission) -> String {
    format!(
        r#"You are an essay grading assistant. Grade the following essay on a scale of 1-10.

Topic: "{topic}"
Character Count: {char_count} characters (Required: 1000-5000 characters)

Essay:
"""
{essay}
"""

Provide your evaluation in the following JSON format ONLY (no additional text):
{{
  "score": <number 1-10>,
  "feedback": "<2-3 sentence constructive feedback>",
  "checkpoints": {{
    "grammar": <number 1-10>,
    "coherence": <number 1-10>,
    "topicRelevance": <number 1-10>,
    "creativity": <number 1-10>,
    "structure": <number 1-10>
  }}
}}

Consider:
- Grammar and spelling (grammar)
- Logical flow and coherence (coherence)
- Relevance to the given topic (topicRelevance)
- Originality and creativity (creativity)
- Essay structure and organization (structure)
- Character count compliance (penalize if outside 1000-5000 range)"#,
        topic = submission.topic,
        char_count = submission.char_count,
        essay = submission.essay,
    )
}
