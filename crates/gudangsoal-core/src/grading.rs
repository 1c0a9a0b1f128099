//! Grading engine.
//!
//! A pure function from (answer key, submission) to a verdict. The answer key
//! carries the question type, so adding a type without a grading rule does
//! not compile.

use crate::model::{Answer, AnswerKey};

/// Absolute tolerance for numerical answers.
pub const NUMERIC_TOLERANCE: f64 = 1e-6;

/// Grade a submission against the expected answer.
///
/// The caller must reject empty submissions before calling this. A numeric
/// answer that does not parse is graded incorrect, not treated as an error.
/// A submission whose shape does not fit the question type is incorrect.
pub fn grade(expected: &AnswerKey, submitted: &Answer) -> bool {
    match expected {
        AnswerKey::MultipleChoice(key) | AnswerKey::TrueFalse(key) => {
            matches!(submitted, Answer::Choice(given) if given == key)
        }
        AnswerKey::MultipleAnswer(keys) => {
            matches!(submitted, Answer::Choices(given) if given == keys)
        }
        AnswerKey::NumericalInput { value, .. } => match submitted {
            Answer::Text(text) => parse_number(text)
                .map(|given| (given - value).abs() < NUMERIC_TOLERANCE)
                .unwrap_or(false),
            _ => false,
        },
        AnswerKey::ShortAnswer(text) => match submitted {
            Answer::Text(given) => normalize_text(given) == normalize_text(text),
            _ => false,
        },
    }
}

/// Parse a submitted number. Surrounding whitespace is ignored.
pub fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok()
}

/// Trim and case-fold free text for comparison.
pub fn normalize_text(text: &str) -> String {
    text.trim().to_lowercase()
}
