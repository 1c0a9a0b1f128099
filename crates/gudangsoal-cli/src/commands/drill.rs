//! The `gudangsoal drill` command.
//!
//! Walks through the listed questions in order, reading one answer per line
//! from stdin. A blank line skips the question; end of input ends the drill.

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use gudangsoal_core::model::QuestionType;
use gudangsoal_core::report::DrillSummary;
use gudangsoal_core::view::{QuestionView, ViewState};

use super::{apply_answer, build_filter, open_store, print_options, print_question, print_reveal};

pub async fn execute(
    subchapter: Option<String>,
    difficulty: String,
    limit: Option<usize>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (config, store) = open_store(config_path)?;
    let filter = build_filter(subchapter, &difficulty, limit, &config)?;

    let questions = store.list_questions(&filter).await?;
    if questions.is_empty() {
        println!("No questions found.");
        return Ok(());
    }

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    let mut view = QuestionView::new();
    let mut summary = DrillSummary::default();
    let total = questions.len();

    for (index, item) in questions.into_iter().enumerate() {
        println!("── Question {}/{total} ──", index + 1);
        view.load(store.as_ref(), item.id).await;

        match view.state() {
            ViewState::Ready(_) => {}
            ViewState::NotGradeable { question, error } => {
                println!("[{}] skipped: {error}", question.id.short());
                summary.skip();
                continue;
            }
            ViewState::NotFound(id) => {
                println!("[{}] skipped: question no longer exists", id.short());
                summary.skip();
                continue;
            }
            ViewState::Failed { id, error } => {
                tracing::warn!(question = %id, %error, "skipping question");
                println!("[{}] skipped: {error}", id.short());
                summary.skip();
                continue;
            }
            ViewState::Idle | ViewState::Loading(_) => continue,
        }
        let Some(attempt) = view.attempt_mut() else {
            continue;
        };

        print_question(attempt.question());
        print_options(attempt);
        if attempt.question().question_type() == QuestionType::MultipleAnswer {
            println!("(separate keys with commas)");
        }

        let Some(line) = lines.next() else {
            println!("\nEnd of input.");
            break;
        };
        let line = line.context("failed to read answer from stdin")?;

        if line.trim().is_empty() {
            println!("Skipped.\n");
            summary.skip();
            continue;
        }

        if let Err(e) = apply_answer(attempt, &[line]) {
            println!("{e}; skipped.\n");
            summary.skip();
            continue;
        }

        match attempt.check() {
            Ok(_) => {
                print_reveal(attempt);
                if let Some(record) = attempt.record() {
                    summary.record(&record);
                }
            }
            Err(e) => {
                println!("{e}; skipped.");
                summary.skip();
            }
        }
        println!();
    }

    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &DrillSummary) {
    let mut table = Table::new();
    table.set_header(vec!["Type", "Attempted", "Correct"]);

    for (question_type, tally) in &summary.by_type {
        table.add_row(vec![
            Cell::new(question_type.label()),
            Cell::new(tally.attempted),
            Cell::new(tally.correct),
        ]);
    }

    println!("{table}");
    println!(
        "Score: {}/{} ({:.1}%), {} skipped",
        summary.correct,
        summary.attempted,
        summary.accuracy() * 100.0,
        summary.skipped
    );
}
