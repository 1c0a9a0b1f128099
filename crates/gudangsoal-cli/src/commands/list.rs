//! The `gudangsoal list` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use gudangsoal_core::model::QuestionType;
use gudangsoal_core::traits::QuestionSummary;

use super::{build_filter, open_store};

const TEXT_PREVIEW_CHARS: usize = 60;

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

    let mut table = Table::new();
    table.set_header(vec![
        "ID",
        "Type",
        "Difficulty",
        "Chapter",
        "Subchapter",
        "Question",
    ]);

    for q in &questions {
        table.add_row(vec![
            Cell::new(q.id.short()),
            Cell::new(type_label(q)),
            Cell::new(q.difficulty.map(|d| d.to_string()).unwrap_or_default()),
            Cell::new(q.chapter.as_deref().unwrap_or("")),
            Cell::new(q.subchapter.as_deref().unwrap_or("")),
            Cell::new(preview(&q.text)),
        ]);
    }

    println!("{table}");
    println!("{} question(s) from {} store.", questions.len(), store.name());
    Ok(())
}

fn type_label(summary: &QuestionSummary) -> String {
    match summary.question_type.as_deref() {
        Some(raw) => match raw.parse::<QuestionType>() {
            Ok(t) => t.label(),
            Err(_) => format!("{raw} (unsupported)"),
        },
        None => "unknown".to_string(),
    }
}

/// First line of the prompt, cut to a fixed number of characters.
fn preview(text: &str) -> String {
    let line = text.lines().next().unwrap_or("").trim();
    if line.chars().count() > TEXT_PREVIEW_CHARS {
        let cut: String = line.chars().take(TEXT_PREVIEW_CHARS).collect();
        format!("{cut}…")
    } else {
        line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_truncates_long_first_line() {
        let long = "a".repeat(100);
        let p = preview(&format!("{long}\nsecond line"));
        assert_eq!(p.chars().count(), TEXT_PREVIEW_CHARS + 1);
        assert!(p.ends_with('…'));
        assert_eq!(preview("  short\nmore"), "short");
    }
}
