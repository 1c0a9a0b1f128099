//! Question model validator.
//!
//! Classifies a [`RawQuestion`] into one of the supported types and checks
//! that it carries what grading needs. Anything that fails here is shown as
//! "not gradeable" and never reaches the grading engine.

use std::collections::{BTreeSet, HashSet};

use crate::error::QuestionError;
use crate::model::{
    AnswerKey, ContentLocation, Question, QuestionOption, QuestionType, RawAnswerKey, RawQuestion,
};

/// Whether `type_name` names a supported question type.
pub fn is_supported(type_name: &str) -> bool {
    type_name.parse::<QuestionType>().is_ok()
}

pub fn is_option_based(question_type: QuestionType) -> bool {
    question_type.is_option_based()
}

pub fn is_input_based(question_type: QuestionType) -> bool {
    question_type.is_input_based()
}

/// Validate a raw record and build the gradeable [`Question`].
pub fn classify(raw: &RawQuestion) -> Result<Question, QuestionError> {
    let question_type: QuestionType = raw.question_type.parse()?;
    let id = raw.id.as_str();

    let options = if question_type.is_option_based() {
        validate_options(id, raw.options.as_deref().unwrap_or_default())?
    } else {
        Vec::new()
    };

    let answer_key = build_answer_key(id, question_type, raw.answer_key.as_ref(), &options)?;

    Ok(Question {
        id: raw.id.clone(),
        text: raw.text.clone(),
        options,
        answer_key,
        explanation: raw.explanation.clone().unwrap_or_default(),
        difficulty: raw.difficulty,
        location: ContentLocation {
            chapter: raw.chapter.clone(),
            subchapter: raw.subchapter.clone(),
            subchapter_id: raw.subchapter_id.clone(),
        },
    })
}

fn validate_options(
    id: &str,
    options: &[QuestionOption],
) -> Result<Vec<QuestionOption>, QuestionError> {
    if options.is_empty() {
        return Err(QuestionError::MissingOptions(id.to_string()));
    }

    let mut seen = HashSet::new();
    for option in options {
        if option.key.trim().is_empty() {
            return Err(QuestionError::BlankOptionKey(id.to_string()));
        }
        if !seen.insert(option.key.as_str()) {
            return Err(QuestionError::DuplicateOptionKey {
                id: id.to_string(),
                key: option.key.clone(),
            });
        }
    }

    Ok(options.to_vec())
}

fn build_answer_key(
    id: &str,
    question_type: QuestionType,
    raw: Option<&RawAnswerKey>,
    options: &[QuestionOption],
) -> Result<AnswerKey, QuestionError> {
    let malformed = |reason: String| QuestionError::MalformedAnswerKey {
        id: id.to_string(),
        reason,
    };

    let Some(raw) = raw else {
        return Err(malformed("answer key is missing".into()));
    };

    match question_type {
        QuestionType::MultipleChoice | QuestionType::TrueFalse => {
            let key = match raw {
                RawAnswerKey::Text(key) => key.trim().to_string(),
                RawAnswerKey::Keys(keys) if keys.len() == 1 => keys[0].trim().to_string(),
                RawAnswerKey::Keys(_) => {
                    return Err(malformed("expected a single option key".into()))
                }
                RawAnswerKey::Number(_) => {
                    return Err(malformed("expected an option key, found a number".into()))
                }
            };
            if key.is_empty() {
                return Err(malformed("answer key is empty".into()));
            }
            if !options.iter().any(|o| o.key == key) {
                return Err(malformed(format!("'{key}' is not one of the options")));
            }
            Ok(if question_type == QuestionType::TrueFalse {
                AnswerKey::TrueFalse(key)
            } else {
                AnswerKey::MultipleChoice(key)
            })
        }
        QuestionType::MultipleAnswer => {
            let listed: Vec<String> = match raw {
                RawAnswerKey::Keys(keys) => keys.iter().map(|k| k.trim().to_string()).collect(),
                RawAnswerKey::Text(text) => text
                    .split(',')
                    .map(|k| k.trim().to_string())
                    .filter(|k| !k.is_empty())
                    .collect(),
                RawAnswerKey::Number(_) => {
                    return Err(malformed("expected a set of option keys".into()))
                }
            };
            let mut keys = BTreeSet::new();
            for key in listed {
                if key.is_empty() {
                    return Err(malformed("answer key contains a blank entry".into()));
                }
                if !options.iter().any(|o| o.key == key) {
                    return Err(malformed(format!("'{key}' is not one of the options")));
                }
                if !keys.insert(key.clone()) {
                    return Err(malformed(format!("'{key}' is listed twice")));
                }
            }
            if keys.is_empty() {
                return Err(malformed("answer key is empty".into()));
            }
            Ok(AnswerKey::MultipleAnswer(keys))
        }
        QuestionType::NumericalInput => {
            let (literal, value) = match raw {
                RawAnswerKey::Number(n) => (n.to_string(), *n),
                RawAnswerKey::Text(text) => {
                    let literal = text.trim().to_string();
                    if literal.is_empty() {
                        return Err(malformed("answer key is empty".into()));
                    }
                    let value = literal
                        .parse::<f64>()
                        .map_err(|_| malformed(format!("'{literal}' is not a number")))?;
                    (literal, value)
                }
                RawAnswerKey::Keys(_) => {
                    return Err(malformed("expected a number, found a list".into()))
                }
            };
            if !value.is_finite() {
                return Err(malformed(format!("'{literal}' is not a finite number")));
            }
            Ok(AnswerKey::NumericalInput { literal, value })
        }
        QuestionType::ShortAnswer => {
            let text = match raw {
                RawAnswerKey::Text(text) => text.clone(),
                RawAnswerKey::Number(n) => n.to_string(),
                RawAnswerKey::Keys(_) => {
                    return Err(malformed("expected text, found a list".into()))
                }
            };
            if text.trim().is_empty() {
                return Err(malformed("answer key is empty".into()));
            }
            Ok(AnswerKey::ShortAnswer(text))
        }
    }
}
