//! The `gudangsoal check` command.

use std::path::PathBuf;

use anyhow::{bail, Result};
use serde::Serialize;

use gudangsoal_core::report::AttemptRecord;
use gudangsoal_core::view::{QuestionView, ViewState};

use super::{apply_answer, open_store, print_options, print_question, print_reveal};

#[derive(Serialize)]
struct CheckOutput<'a> {
    #[serde(flatten)]
    record: AttemptRecord,
    explanation: &'a str,
}

pub async fn execute(
    id: String,
    answer: Vec<String>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    if format != "text" && format != "json" {
        bail!("unknown format: {format} (expected text or json)");
    }

    let (_, store) = open_store(config_path)?;

    let mut view = QuestionView::new();
    view.load(store.as_ref(), id.into()).await;

    match view.state() {
        ViewState::Ready(_) => {}
        ViewState::NotGradeable { question, error } => {
            bail!("question {} cannot be graded: {error}", question.id)
        }
        ViewState::NotFound(id) => bail!("question not found: {id}"),
        ViewState::Failed { id, error } => bail!("failed to load question {id}: {error}"),
        ViewState::Idle | ViewState::Loading(_) => bail!("question did not load"),
    }
    let Some(attempt) = view.attempt_mut() else {
        bail!("question did not load");
    };

    apply_answer(attempt, &answer)?;
    attempt.check()?;

    if format == "json" {
        let Some(record) = attempt.record() else {
            bail!("attempt was not checked");
        };
        let output = CheckOutput {
            record,
            explanation: &attempt.question().explanation,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_question(attempt.question());
        print_options(attempt);
        println!();
        if let Some(submitted) = attempt.submitted() {
            println!("Your answer: {submitted}");
        }
        print_reveal(attempt);
    }

    Ok(())
}
