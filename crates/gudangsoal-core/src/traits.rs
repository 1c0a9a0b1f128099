//! Content store trait.
//!
//! Implemented by the `gudangsoal-store` crate (TOML banks, PostgREST, mock).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::model::{Difficulty, QuestionId, RawQuestion};

/// Maximum number of questions returned by a listing unless configured.
pub const DEFAULT_LIST_LIMIT: usize = 50;

/// Source of question records.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Human-readable store name (e.g. "bank").
    fn name(&self) -> &str;

    /// Fetch one question by id. Missing ids yield [`StoreError::NotFound`].
    async fn fetch_question_by_id(&self, id: &QuestionId) -> Result<RawQuestion, StoreError>;

    /// List questions matching a filter, at most `filter.limit` of them.
    async fn list_questions(&self, filter: &QuestionFilter)
        -> Result<Vec<QuestionSummary>, StoreError>;
}

/// Listing filter. `None` fields match everything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionFilter {
    pub subchapter_id: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub limit: usize,
}

impl Default for QuestionFilter {
    fn default() -> Self {
        Self {
            subchapter_id: None,
            difficulty: None,
            limit: DEFAULT_LIST_LIMIT,
        }
    }
}

impl QuestionFilter {
    pub fn matches(&self, question: &RawQuestion) -> bool {
        let subchapter_ok = self
            .subchapter_id
            .as_ref()
            .is_none_or(|wanted| question.subchapter_id.as_ref() == Some(wanted));
        let difficulty_ok = self
            .difficulty
            .is_none_or(|wanted| question.difficulty == Some(wanted));
        subchapter_ok && difficulty_ok
    }
}

/// A question as shown in a listing, without its answer key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSummary {
    pub id: QuestionId,
    pub text: String,
    #[serde(rename = "type", default)]
    pub question_type: Option<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub subchapter_id: Option<String>,
    #[serde(default)]
    pub chapter: Option<String>,
    #[serde(default)]
    pub subchapter: Option<String>,
}

impl From<&RawQuestion> for QuestionSummary {
    fn from(q: &RawQuestion) -> Self {
        Self {
            id: q.id.clone(),
            text: q.text.clone(),
            question_type: Some(q.question_type.clone()),
            difficulty: q.difficulty,
            subchapter_id: q.subchapter_id.clone(),
            chapter: q.chapter.clone(),
            subchapter: q.subchapter.clone(),
        }
    }
}
