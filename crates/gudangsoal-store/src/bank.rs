//! In-memory content store backed by TOML question banks.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;

use gudangsoal_core::error::StoreError;
use gudangsoal_core::model::{QuestionId, RawQuestion};
use gudangsoal_core::parser::{load_banks, QuestionBank};
use gudangsoal_core::traits::{ContentStore, QuestionFilter, QuestionSummary};

/// Serves questions from banks loaded into memory. Listing preserves the
/// order in which questions appear in the bank files.
pub struct BankStore {
    questions: Vec<RawQuestion>,
    index: HashMap<QuestionId, usize>,
}

impl BankStore {
    /// Merge banks into one store. On duplicate ids the first record wins.
    pub fn new(banks: Vec<QuestionBank>) -> Self {
        let mut questions = Vec::new();
        let mut index = HashMap::new();

        for bank in banks {
            for question in bank.questions {
                if index.contains_key(&question.id) {
                    tracing::warn!(
                        bank = %bank.id,
                        question = %question.id,
                        "duplicate question id, keeping the first"
                    );
                    continue;
                }
                index.insert(question.id.clone(), questions.len());
                questions.push(question);
            }
        }

        Self { questions, index }
    }

    /// Load a bank file, or every bank under a directory.
    pub fn from_path(path: &Path) -> Result<Self> {
        let banks = load_banks(path)?;
        tracing::debug!(path = %path.display(), banks = banks.len(), "loaded question banks");
        Ok(Self::new(banks))
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[async_trait]
impl ContentStore for BankStore {
    fn name(&self) -> &str {
        "bank"
    }

    async fn fetch_question_by_id(&self, id: &QuestionId) -> Result<RawQuestion, StoreError> {
        self.index
            .get(id)
            .map(|&i| self.questions[i].clone())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn list_questions(
        &self,
        filter: &QuestionFilter,
    ) -> Result<Vec<QuestionSummary>, StoreError> {
        Ok(self
            .questions
            .iter()
            .filter(|q| filter.matches(q))
            .take(filter.limit)
            .map(QuestionSummary::from)
            .collect())
    }
}
