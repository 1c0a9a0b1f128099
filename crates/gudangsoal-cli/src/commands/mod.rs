//! Subcommand implementations and shared helpers.

pub mod check;
pub mod drill;
pub mod init;
pub mod list;
pub mod show;
pub mod validate;

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};

use gudangsoal_core::attempt::{Attempt, OptionMark};
use gudangsoal_core::error::AttemptError;
use gudangsoal_core::model::{parse_difficulty_filter, Question, QuestionType};
use gudangsoal_core::traits::{ContentStore, QuestionFilter};
use gudangsoal_store::{create_store, load_config_from, GudangsoalConfig};

/// Load configuration and open the configured content store.
pub(crate) fn open_store(
    config_path: Option<PathBuf>,
) -> Result<(GudangsoalConfig, Box<dyn ContentStore>)> {
    let config = load_config_from(config_path.as_deref())?;
    tracing::debug!(store = ?config.store, "opening content store");
    let store = create_store(&config.store).context("failed to open content store")?;
    Ok((config, store))
}

pub(crate) fn build_filter(
    subchapter: Option<String>,
    difficulty: &str,
    limit: Option<usize>,
    config: &GudangsoalConfig,
) -> Result<QuestionFilter> {
    let difficulty = parse_difficulty_filter(difficulty).map_err(anyhow::Error::msg)?;
    let limit = limit.unwrap_or(config.list_limit);
    anyhow::ensure!(limit >= 1, "--limit must be at least 1");
    Ok(QuestionFilter {
        subchapter_id: subchapter,
        difficulty,
        limit,
    })
}

/// Feed raw answer values into an attempt.
///
/// Multiple-answer questions select each distinct comma-separated key once;
/// every other type takes the values as one submission.
pub(crate) fn apply_answer(attempt: &mut Attempt, values: &[String]) -> Result<(), AttemptError> {
    if attempt.question().question_type() == QuestionType::MultipleAnswer {
        let keys: BTreeSet<&str> = values
            .iter()
            .flat_map(|v| v.split(','))
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .collect();
        for key in keys {
            attempt.toggle_option(key)?;
        }
        Ok(())
    } else {
        attempt.set_answer(values.join(" ")).map(|_| ())
    }
}

pub(crate) fn print_question(question: &Question) {
    let mut meta = vec![question.question_type().label()];
    if let Some(difficulty) = question.difficulty {
        meta.push(difficulty.to_string());
    }
    if let Some(chapter) = &question.location.chapter {
        meta.push(chapter.clone());
    }
    if let Some(subchapter) = &question.location.subchapter {
        meta.push(subchapter.clone());
    }

    println!("[{}] {}", question.id.short(), meta.join(" · "));
    println!();
    println!("{}", question.text);
    if !question.options.is_empty() {
        println!();
    }
}

pub(crate) fn print_options(attempt: &Attempt) {
    for (option, mark) in attempt.option_marks() {
        println!("  {} {}. {}", mark_symbol(mark), option.key, option.text);
    }
}

/// Verdict, correct answer, and explanation of a checked attempt.
pub(crate) fn print_reveal(attempt: &Attempt) {
    let Some(reveal) = attempt.reveal() else {
        return;
    };
    if reveal.correct {
        println!("Correct!");
    } else {
        println!("Incorrect. Correct answer: {}", reveal.answer_key);
    }
    if !reveal.explanation.is_empty() {
        println!("Explanation: {}", reveal.explanation);
    }
}

fn mark_symbol(mark: OptionMark) -> &'static str {
    match mark {
        OptionMark::Unselected | OptionMark::Neutral => " ",
        OptionMark::Selected => "*",
        OptionMark::Correct => "✓",
        OptionMark::Incorrect => "✗",
    }
}
