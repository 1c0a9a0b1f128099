//! The `gudangsoal show` command.

use std::path::PathBuf;

use anyhow::{bail, Result};

use gudangsoal_core::view::{QuestionView, ViewState};

use super::{open_store, print_options, print_question};

pub async fn execute(id: String, config_path: Option<PathBuf>) -> Result<()> {
    let (_, store) = open_store(config_path)?;

    let mut view = QuestionView::new();
    view.load(store.as_ref(), id.into()).await;

    match view.state() {
        ViewState::Ready(attempt) => {
            print_question(attempt.question());
            print_options(attempt);
        }
        ViewState::NotGradeable { question, error } => {
            println!("[{}] {}", question.id.short(), question.question_type);
            println!();
            println!("{}", question.text);
            println!();
            println!("This question cannot be answered here: {error}");
        }
        ViewState::NotFound(id) => bail!("question not found: {id}"),
        ViewState::Failed { id, error } => bail!("failed to load question {id}: {error}"),
        ViewState::Idle | ViewState::Loading(_) => bail!("question did not load"),
    }

    Ok(())
}
