//! Attempt records and drill summaries.
//!
//! These are in-memory summaries for display; nothing here is persisted.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{QuestionId, QuestionType};

/// Outcome of one checked attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub question_id: QuestionId,
    pub question_type: QuestionType,
    /// The submission as displayed to the student.
    pub submitted: String,
    /// The correct answer as displayed to the student.
    pub correct_answer: String,
    pub correct: bool,
    pub checked_at: DateTime<Utc>,
}

/// Per-type tally inside a [`DrillSummary`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeTally {
    pub attempted: u32,
    pub correct: u32,
}

/// Running totals over a sequence of attempts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrillSummary {
    pub attempted: u32,
    pub correct: u32,
    /// Questions that could not be graded and were skipped.
    pub skipped: u32,
    pub by_type: BTreeMap<QuestionType, TypeTally>,
}

impl DrillSummary {
    pub fn record(&mut self, record: &AttemptRecord) {
        let tally = self.by_type.entry(record.question_type).or_default();
        tally.attempted += 1;
        self.attempted += 1;
        if record.correct {
            tally.correct += 1;
            self.correct += 1;
        }
    }

    pub fn skip(&mut self) {
        self.skipped += 1;
    }

    /// Fraction of attempted questions answered correctly (0.0 when none).
    pub fn accuracy(&self) -> f64 {
        if self.attempted == 0 {
            0.0
        } else {
            self.correct as f64 / self.attempted as f64
        }
    }
}
