//! Attempt state machine.
//!
//! One [`Attempt`] tracks a single student's interaction with one question:
//! `Unanswered -> Answered -> Checked`. Checked is terminal; the only way out
//! is to build a fresh attempt for the next question.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AttemptError;
use crate::grading::grade;
use crate::model::{Answer, AnswerKey, Question, QuestionOption, QuestionType};
use crate::report::AttemptRecord;

/// Lifecycle state of an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    Unanswered,
    Answered,
    Checked,
}

impl fmt::Display for AttemptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptStatus::Unanswered => write!(f, "unanswered"),
            AttemptStatus::Answered => write!(f, "answered"),
            AttemptStatus::Checked => write!(f, "checked"),
        }
    }
}

/// How an option should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionMark {
    /// Not checked yet, not selected.
    Unselected,
    /// Not checked yet, selected.
    Selected,
    /// Checked; this option is (one of) the correct answer(s).
    Correct,
    /// Checked; selected but wrong.
    Incorrect,
    /// Checked; neither selected nor correct.
    Neutral,
}

/// What becomes visible once an attempt is checked.
#[derive(Debug, Clone, PartialEq)]
pub struct Reveal<'a> {
    pub correct: bool,
    pub answer_key: &'a AnswerKey,
    pub explanation: &'a str,
}

/// One question attempt, exclusively owned by the view showing it.
#[derive(Debug, Clone)]
pub struct Attempt {
    question: Arc<Question>,
    status: AttemptStatus,
    submitted: Option<Answer>,
    verdict: Option<bool>,
    checked_at: Option<DateTime<Utc>>,
}

impl Attempt {
    /// Start a fresh attempt: unanswered, nothing submitted, no verdict.
    pub fn new(question: Arc<Question>) -> Self {
        Self {
            question,
            status: AttemptStatus::Unanswered,
            submitted: None,
            verdict: None,
            checked_at: None,
        }
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    pub fn status(&self) -> AttemptStatus {
        self.status
    }

    pub fn submitted(&self) -> Option<&Answer> {
        self.submitted.as_ref()
    }

    /// Present only once checked.
    pub fn verdict(&self) -> Option<bool> {
        self.verdict
    }

    pub fn checked_at(&self) -> Option<DateTime<Utc>> {
        self.checked_at
    }

    pub fn is_locked(&self) -> bool {
        self.status == AttemptStatus::Checked
    }

    /// Whether the check action should be enabled.
    pub fn can_check(&self) -> bool {
        self.status == AttemptStatus::Answered
    }

    /// Set a single-valued answer: an option key for multiple choice and
    /// true/false, free text for numerical and short answer questions.
    /// A blank value clears the answer.
    pub fn set_answer(&mut self, value: impl Into<String>) -> Result<AttemptStatus, AttemptError> {
        self.ensure_unlocked("set_answer")?;
        let value = value.into();
        let question_type = self.question.question_type();

        if value.trim().is_empty() {
            return Ok(self.store(None));
        }

        let answer = match question_type {
            QuestionType::MultipleAnswer => {
                return Err(AttemptError::WrongInputMode { question_type })
            }
            QuestionType::MultipleChoice | QuestionType::TrueFalse => {
                let key = value.trim();
                if !self.question.has_option(key) {
                    return Err(AttemptError::UnknownOption(key.to_string()));
                }
                Answer::Choice(key.to_string())
            }
            QuestionType::NumericalInput | QuestionType::ShortAnswer => Answer::Text(value),
        };

        Ok(self.store(Some(answer)))
    }

    /// Add `key` to, or remove it from, a multiple-answer selection.
    pub fn toggle_option(&mut self, key: &str) -> Result<AttemptStatus, AttemptError> {
        self.ensure_unlocked("toggle_option")?;
        let question_type = self.question.question_type();
        if question_type != QuestionType::MultipleAnswer {
            return Err(AttemptError::WrongInputMode { question_type });
        }
        let key = key.trim();
        if !self.question.has_option(key) {
            return Err(AttemptError::UnknownOption(key.to_string()));
        }

        let mut keys = match self.submitted.take() {
            Some(Answer::Choices(keys)) => keys,
            _ => BTreeSet::new(),
        };
        if !keys.remove(key) {
            keys.insert(key.to_string());
        }

        Ok(self.store(Some(Answer::Choices(keys))))
    }

    /// Clear whatever has been entered.
    pub fn clear(&mut self) -> Result<AttemptStatus, AttemptError> {
        self.ensure_unlocked("clear")?;
        Ok(self.store(None))
    }

    /// Grade the current answer exactly once and lock the attempt.
    pub fn check(&mut self) -> Result<bool, AttemptError> {
        self.ensure_unlocked("check")?;
        let Some(answer) = self.submitted.as_ref().filter(|a| !a.is_empty()) else {
            tracing::debug!(question = %self.question.id, "check rejected: no answer");
            return Err(AttemptError::EmptyAnswer);
        };

        let correct = grade(&self.question.answer_key, answer);
        self.verdict = Some(correct);
        self.checked_at = Some(Utc::now());
        self.status = AttemptStatus::Checked;

        tracing::debug!(
            question = %self.question.id,
            question_type = %self.question.question_type(),
            correct,
            "attempt checked"
        );
        Ok(correct)
    }

    /// Explanation and correct answer; `None` until checked.
    pub fn reveal(&self) -> Option<Reveal<'_>> {
        self.verdict.map(|correct| Reveal {
            correct,
            answer_key: &self.question.answer_key,
            explanation: &self.question.explanation,
        })
    }

    /// Each option paired with how it should be rendered right now.
    pub fn option_marks(&self) -> Vec<(&QuestionOption, OptionMark)> {
        let key = &self.question.answer_key;
        self.question
            .options
            .iter()
            .map(|option| {
                let selected = self
                    .submitted
                    .as_ref()
                    .is_some_and(|a| a.selects(&option.key));
                let mark = match (self.is_locked(), selected) {
                    (false, true) => OptionMark::Selected,
                    (false, false) => OptionMark::Unselected,
                    (true, _) if key.is_correct_option(&option.key) => OptionMark::Correct,
                    (true, true) => OptionMark::Incorrect,
                    (true, false) => OptionMark::Neutral,
                };
                (option, mark)
            })
            .collect()
    }

    /// Summary of a checked attempt; `None` until checked.
    pub fn record(&self) -> Option<AttemptRecord> {
        let (correct, checked_at) = (self.verdict?, self.checked_at?);
        Some(AttemptRecord {
            question_id: self.question.id.clone(),
            question_type: self.question.question_type(),
            submitted: self
                .submitted
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            correct_answer: self.question.answer_key.to_string(),
            correct,
            checked_at,
        })
    }

    fn ensure_unlocked(&self, operation: &str) -> Result<(), AttemptError> {
        if self.is_locked() {
            tracing::warn!(
                question = %self.question.id,
                operation,
                "mutation attempted on a checked attempt (caller bug)"
            );
            return Err(AttemptError::AttemptLocked);
        }
        Ok(())
    }

    fn store(&mut self, answer: Option<Answer>) -> AttemptStatus {
        let answer = answer.filter(|a| !a.is_empty());
        self.status = if answer.is_some() {
            AttemptStatus::Answered
        } else {
            AttemptStatus::Unanswered
        };
        self.submitted = answer;
        tracing::debug!(question = %self.question.id, status = %self.status, "answer updated");
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{QuestionId, RawAnswerKey, RawQuestion};
    use crate::validator::classify;

    fn question(question_type: &str, keys: &[&str], answer: RawAnswerKey) -> Arc<Question> {
        let options = keys
            .iter()
            .map(|k| QuestionOption {
                key: k.to_string(),
                text: format!("option {k}"),
            })
            .collect();
        let raw = RawQuestion {
            id: QuestionId::new("q-1"),
            question_type: question_type.into(),
            text: "Prompt".into(),
            options: Some(options),
            answer_key: Some(answer),
            explanation: Some("Worked solution.".into()),
            difficulty: None,
            subchapter_id: None,
            chapter: None,
            subchapter: None,
        };
        Arc::new(classify(&raw).unwrap())
    }

    fn mc() -> Attempt {
        Attempt::new(question(
            "multiple_choice",
            &["A", "B", "C"],
            RawAnswerKey::Text("B".into()),
        ))
    }

    fn short() -> Attempt {
        Attempt::new(question("short_answer", &[], RawAnswerKey::Text("Paris".into())))
    }

    fn multi() -> Attempt {
        Attempt::new(question(
            "multiple_answer",
            &["A", "B", "C"],
            RawAnswerKey::Keys(vec!["A".into(), "C".into()]),
        ))
    }

    #[test]
    fn new_attempt_is_blank() {
        let attempt = mc();
        assert_eq!(attempt.status(), AttemptStatus::Unanswered);
        assert!(attempt.submitted().is_none());
        assert!(attempt.verdict().is_none());
        assert!(attempt.reveal().is_none());
        assert!(attempt.record().is_none());
    }

    #[test]
    fn set_and_clear_answer_moves_between_states() {
        let mut attempt = short();
        assert_eq!(attempt.set_answer("paris").unwrap(), AttemptStatus::Answered);
        assert_eq!(attempt.set_answer("").unwrap(), AttemptStatus::Unanswered);
        assert!(attempt.submitted().is_none());
        assert_eq!(attempt.set_answer("   ").unwrap(), AttemptStatus::Unanswered);
        attempt.set_answer("Lyon").unwrap();
        assert_eq!(attempt.clear().unwrap(), AttemptStatus::Unanswered);
    }

    #[test]
    fn check_without_answer_is_empty_answer() {
        let mut attempt = mc();
        assert_eq!(attempt.check(), Err(AttemptError::EmptyAnswer));
        assert_eq!(attempt.status(), AttemptStatus::Unanswered);
        assert!(attempt.verdict().is_none());
    }

    #[test]
    fn check_grades_and_locks() {
        let mut attempt = mc();
        attempt.set_answer("A").unwrap();
        attempt.set_answer("B").unwrap();
        assert!(attempt.can_check());
        assert_eq!(attempt.check(), Ok(true));
        assert_eq!(attempt.status(), AttemptStatus::Checked);
        assert_eq!(attempt.verdict(), Some(true));
        assert!(attempt.checked_at().is_some());
    }

    #[test]
    fn mutation_after_check_is_locked() {
        let mut attempt = mc();
        attempt.set_answer("A").unwrap();
        assert_eq!(attempt.check(), Ok(false));

        assert_eq!(attempt.set_answer("B"), Err(AttemptError::AttemptLocked));
        assert_eq!(attempt.clear(), Err(AttemptError::AttemptLocked));
        assert_eq!(attempt.check(), Err(AttemptError::AttemptLocked));
        assert_eq!(attempt.submitted(), Some(&Answer::Choice("A".into())));
        assert_eq!(attempt.verdict(), Some(false));
    }

    #[test]
    fn toggle_after_check_is_locked() {
        let mut attempt = multi();
        attempt.toggle_option("A").unwrap();
        assert_eq!(attempt.check(), Ok(false));

        assert_eq!(attempt.toggle_option("B"), Err(AttemptError::AttemptLocked));
        assert_eq!(attempt.toggle_option("A"), Err(AttemptError::AttemptLocked));
        assert_eq!(
            attempt.submitted(),
            Some(&Answer::Choices(BTreeSet::from(["A".to_string()])))
        );
        assert_eq!(attempt.verdict(), Some(false));
        assert_eq!(attempt.status(), AttemptStatus::Checked);
    }

    #[test]
    fn option_keys_are_trimmed() {
        let mut attempt = mc();
        assert_eq!(attempt.set_answer("B\r").unwrap(), AttemptStatus::Answered);
        assert_eq!(attempt.submitted(), Some(&Answer::Choice("B".into())));
        assert_eq!(attempt.check(), Ok(true));

        let mut attempt = multi();
        attempt.toggle_option(" A ").unwrap();
        attempt.toggle_option("C\r").unwrap();
        assert_eq!(attempt.check(), Ok(true));
    }

    #[test]
    fn unknown_option_rejected() {
        let mut attempt = mc();
        assert_eq!(
            attempt.set_answer("Z"),
            Err(AttemptError::UnknownOption("Z".into()))
        );
        assert_eq!(attempt.status(), AttemptStatus::Unanswered);
    }

    #[test]
    fn numeric_parse_failure_is_judged_not_rejected() {
        let mut attempt = Attempt::new(question(
            "numerical_input",
            &[],
            RawAnswerKey::Text("0.04".into()),
        ));
        attempt.set_answer("abc").unwrap();
        assert_eq!(attempt.check(), Ok(false));
        assert_eq!(attempt.status(), AttemptStatus::Checked);
    }

    #[test]
    fn toggle_builds_a_set() {
        let mut attempt = multi();
        assert_eq!(attempt.toggle_option("C").unwrap(), AttemptStatus::Answered);
        attempt.toggle_option("B").unwrap();
        attempt.toggle_option("A").unwrap();
        assert_eq!(attempt.toggle_option("B").unwrap(), AttemptStatus::Answered);
        assert_eq!(attempt.check(), Ok(true));
    }

    #[test]
    fn toggling_everything_off_returns_to_unanswered() {
        let mut attempt = multi();
        attempt.toggle_option("A").unwrap();
        assert_eq!(attempt.toggle_option("A").unwrap(), AttemptStatus::Unanswered);
        assert_eq!(attempt.check(), Err(AttemptError::EmptyAnswer));
    }

    #[test]
    fn input_modes_do_not_cross() {
        let mut attempt = multi();
        assert_eq!(
            attempt.set_answer("A"),
            Err(AttemptError::WrongInputMode {
                question_type: QuestionType::MultipleAnswer
            })
        );
        let mut attempt = mc();
        assert!(matches!(
            attempt.toggle_option("A"),
            Err(AttemptError::WrongInputMode { .. })
        ));
    }

    #[test]
    fn option_marks_before_and_after_check() {
        let mut attempt = mc();
        attempt.set_answer("A").unwrap();
        let before: Vec<_> = attempt.option_marks().into_iter().map(|(_, m)| m).collect();
        assert_eq!(
            before,
            vec![OptionMark::Selected, OptionMark::Unselected, OptionMark::Unselected]
        );

        attempt.check().unwrap();
        let after: Vec<_> = attempt.option_marks().into_iter().map(|(_, m)| m).collect();
        assert_eq!(
            after,
            vec![OptionMark::Incorrect, OptionMark::Correct, OptionMark::Neutral]
        );
    }

    #[test]
    fn reveal_and_record_after_check() {
        let mut attempt = short();
        attempt.set_answer("  paris ").unwrap();
        attempt.check().unwrap();

        let reveal = attempt.reveal().unwrap();
        assert!(reveal.correct);
        assert_eq!(reveal.explanation, "Worked solution.");
        assert_eq!(reveal.answer_key.to_string(), "Paris");

        let record = attempt.record().unwrap();
        assert_eq!(record.question_type, QuestionType::ShortAnswer);
        assert_eq!(record.submitted, "  paris ");
        assert_eq!(record.correct_answer, "Paris");
        assert!(record.correct);
    }
}
