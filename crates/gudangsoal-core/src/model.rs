//! Core data model types for gudangsoal.
//!
//! A question arrives from a content store as a [`RawQuestion`] with its type
//! still a free-form string. The validator turns it into a [`Question`] whose
//! [`AnswerKey`] carries the type-specific answer shape used for grading.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::QuestionError;

/// Opaque question identifier (usually a UUID issued by the content store).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(String);

impl QuestionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, used wherever the full id is too noisy.
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuestionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for QuestionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// The closed set of gradeable question types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    MultipleAnswer,
    NumericalInput,
    ShortAnswer,
}

impl QuestionType {
    pub const ALL: [QuestionType; 5] = [
        QuestionType::MultipleChoice,
        QuestionType::TrueFalse,
        QuestionType::MultipleAnswer,
        QuestionType::NumericalInput,
        QuestionType::ShortAnswer,
    ];

    /// Answers are drawn from the question's option list.
    pub fn is_option_based(self) -> bool {
        matches!(
            self,
            QuestionType::MultipleChoice | QuestionType::TrueFalse | QuestionType::MultipleAnswer
        )
    }

    /// Answers are free-form text or a number.
    pub fn is_input_based(self) -> bool {
        matches!(
            self,
            QuestionType::NumericalInput | QuestionType::ShortAnswer
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::TrueFalse => "true_false",
            QuestionType::MultipleAnswer => "multiple_answer",
            QuestionType::NumericalInput => "numerical_input",
            QuestionType::ShortAnswer => "short_answer",
        }
    }

    /// Human-readable label ("multiple choice").
    pub fn label(self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = QuestionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuestionType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| QuestionError::UnsupportedQuestionType(s.to_string()))
    }
}

/// Difficulty level as stored in the question bank.
///
/// Serialized in the bank vocabulary; deserialized through [`FromStr`], so
/// either vocabulary is accepted in any letter case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Difficulty {
    #[serde(rename = "mudah")]
    Easy,
    #[serde(rename = "sedang")]
    Medium,
    #[serde(rename = "sulit")]
    Hard,
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "mudah",
            Difficulty::Medium => "sedang",
            Difficulty::Hard => "sulit",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mudah" | "easy" => Ok(Difficulty::Easy),
            "sedang" | "medium" => Ok(Difficulty::Medium),
            "sulit" | "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// Parse a difficulty filter where `"all"` means no filtering.
pub fn parse_difficulty_filter(s: &str) -> Result<Option<Difficulty>, String> {
    if s.trim().eq_ignore_ascii_case("all") {
        Ok(None)
    } else {
        s.parse().map(Some)
    }
}

/// One selectable option of an option-based question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    /// Short label, unique within the question (e.g. "A").
    pub key: String,
    /// Display text.
    pub text: String,
}

/// Answer key exactly as stored: a string, a bare number, or a list of keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAnswerKey {
    Text(String),
    Number(f64),
    Keys(Vec<String>),
}

/// A question record as delivered by a content store, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawQuestion {
    pub id: QuestionId,
    /// Declared type; may name a type this engine cannot grade.
    #[serde(rename = "type")]
    pub question_type: String,
    pub text: String,
    #[serde(default)]
    pub options: Option<Vec<QuestionOption>>,
    #[serde(default)]
    pub answer_key: Option<RawAnswerKey>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub subchapter_id: Option<String>,
    #[serde(default)]
    pub chapter: Option<String>,
    #[serde(default)]
    pub subchapter: Option<String>,
}

/// Where a question sits in the curriculum, for display only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentLocation {
    pub chapter: Option<String>,
    pub subchapter: Option<String>,
    pub subchapter_id: Option<String>,
}

/// Canonical correct answer, tagged by question type.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerKey {
    MultipleChoice(String),
    TrueFalse(String),
    MultipleAnswer(BTreeSet<String>),
    /// Keeps the literal for display next to its parsed value.
    NumericalInput {
        literal: String,
        value: f64,
    },
    ShortAnswer(String),
}

impl AnswerKey {
    pub fn question_type(&self) -> QuestionType {
        match self {
            AnswerKey::MultipleChoice(_) => QuestionType::MultipleChoice,
            AnswerKey::TrueFalse(_) => QuestionType::TrueFalse,
            AnswerKey::MultipleAnswer(_) => QuestionType::MultipleAnswer,
            AnswerKey::NumericalInput { .. } => QuestionType::NumericalInput,
            AnswerKey::ShortAnswer(_) => QuestionType::ShortAnswer,
        }
    }

    /// Whether `key` is (one of) the correct option keys.
    pub fn is_correct_option(&self, key: &str) -> bool {
        match self {
            AnswerKey::MultipleChoice(k) | AnswerKey::TrueFalse(k) => k == key,
            AnswerKey::MultipleAnswer(keys) => keys.contains(key),
            AnswerKey::NumericalInput { .. } | AnswerKey::ShortAnswer(_) => false,
        }
    }
}

impl fmt::Display for AnswerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerKey::MultipleChoice(k) | AnswerKey::TrueFalse(k) => f.write_str(k),
            AnswerKey::MultipleAnswer(keys) => {
                write!(f, "{}", keys.iter().cloned().collect::<Vec<_>>().join(", "))
            }
            AnswerKey::NumericalInput { literal, .. } => f.write_str(literal),
            AnswerKey::ShortAnswer(text) => f.write_str(text),
        }
    }
}

/// A validated, gradeable question. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub id: QuestionId,
    /// Prompt text with line breaks preserved.
    pub text: String,
    /// Empty for input-based types.
    pub options: Vec<QuestionOption>,
    pub answer_key: AnswerKey,
    pub explanation: String,
    pub difficulty: Option<Difficulty>,
    pub location: ContentLocation,
}

impl Question {
    pub fn question_type(&self) -> QuestionType {
        self.answer_key.question_type()
    }

    pub fn option(&self, key: &str) -> Option<&QuestionOption> {
        self.options.iter().find(|o| o.key == key)
    }

    pub fn has_option(&self, key: &str) -> bool {
        self.option(key).is_some()
    }
}

/// A user's submission, shaped by the question type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Answer {
    /// A single option key (multiple choice, true/false).
    Choice(String),
    /// A set of option keys (multiple answer).
    Choices(BTreeSet<String>),
    /// Free text (numerical input, short answer).
    Text(String),
}

impl Answer {
    /// Blank text, a blank key, or an empty key set.
    pub fn is_empty(&self) -> bool {
        match self {
            Answer::Choice(key) => key.trim().is_empty(),
            Answer::Choices(keys) => keys.is_empty(),
            Answer::Text(text) => text.trim().is_empty(),
        }
    }

    /// Whether this submission selected the option `key`.
    pub fn selects(&self, key: &str) -> bool {
        match self {
            Answer::Choice(k) => k == key,
            Answer::Choices(keys) => keys.contains(key),
            Answer::Text(_) => false,
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Choice(key) => f.write_str(key),
            Answer::Choices(keys) => {
                write!(f, "{}", keys.iter().cloned().collect::<Vec<_>>().join(", "))
            }
            Answer::Text(text) => f.write_str(text),
        }
    }
}
