//! Mock content store for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use gudangsoal_core::error::StoreError;
use gudangsoal_core::model::{QuestionId, RawQuestion};
use gudangsoal_core::traits::{ContentStore, QuestionFilter, QuestionSummary};

/// A mock store for exercising views and attempts without a real backend.
///
/// Responses can be delayed per id to simulate out-of-order arrivals.
pub struct MockStore {
    /// Map of question id → fetch result.
    responses: HashMap<QuestionId, Result<RawQuestion, StoreError>>,
    /// Artificial latency per question id.
    delays: HashMap<QuestionId, Duration>,
    /// Number of fetches made.
    call_count: AtomicU32,
    /// Last id requested.
    last_request: Mutex<Option<QuestionId>>,
}

impl MockStore {
    /// Create a mock store serving the given questions.
    pub fn new(questions: Vec<RawQuestion>) -> Self {
        Self {
            responses: questions
                .into_iter()
                .map(|q| (q.id.clone(), Ok(q)))
                .collect(),
            delays: HashMap::new(),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Make fetches of `id` fail with `error`.
    pub fn with_error(mut self, id: impl Into<QuestionId>, error: StoreError) -> Self {
        self.responses.insert(id.into(), Err(error));
        self
    }

    /// Delay fetches of `id` by `delay`.
    pub fn with_delay(mut self, id: impl Into<QuestionId>, delay: Duration) -> Self {
        self.delays.insert(id.into(), delay);
        self
    }

    /// Get the number of fetches made to this store.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last id requested from this store.
    pub fn last_request(&self) -> Option<QuestionId> {
        self.last_request
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl ContentStore for MockStore {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_question_by_id(&self, id: &QuestionId) -> Result<RawQuestion, StoreError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_request.lock().unwrap_or_else(|e| e.into_inner()) = Some(id.clone());

        if let Some(delay) = self.delays.get(id) {
            tokio::time::sleep(*delay).await;
        }

        self.responses
            .get(id)
            .cloned()
            .unwrap_or_else(|| Err(StoreError::NotFound(id.to_string())))
    }

    async fn list_questions(
        &self,
        filter: &QuestionFilter,
    ) -> Result<Vec<QuestionSummary>, StoreError> {
        let mut questions: Vec<&RawQuestion> = self
            .responses
            .values()
            .filter_map(|r| r.as_ref().ok())
            .filter(|q| filter.matches(q))
            .collect();
        questions.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(questions
            .into_iter()
            .take(filter.limit)
            .map(QuestionSummary::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gudangsoal_core::attempt::AttemptStatus;
    use gudangsoal_core::model::RawAnswerKey;
    use gudangsoal_core::view::{LoadOutcome, QuestionView, ViewState};

    fn short_answer(id: &str, key: &str) -> RawQuestion {
        RawQuestion {
            id: QuestionId::new(id),
            question_type: "short_answer".into(),
            text: format!("Pertanyaan {id}"),
            options: None,
            answer_key: Some(RawAnswerKey::Text(key.into())),
            explanation: Some(format!("Jawabannya {key}.")),
            difficulty: None,
            subchapter_id: None,
            chapter: None,
            subchapter: None,
        }
    }

    #[tokio::test]
    async fn serves_and_counts() {
        let store = MockStore::new(vec![short_answer("q1", "air")]);

        let q = store.fetch_question_by_id(&"q1".into()).await.unwrap();
        assert_eq!(q.id.as_str(), "q1");

        let err = store.fetch_question_by_id(&"q2".into()).await.unwrap_err();
        assert_eq!(err, StoreError::NotFound("q2".into()));

        assert_eq!(store.call_count(), 2);
        assert_eq!(store.last_request(), Some(QuestionId::new("q2")));
    }

    #[tokio::test]
    async fn configured_error_is_returned() {
        let store = MockStore::new(vec![])
            .with_error("q1", StoreError::Unavailable("connection refused".into()));
        let err = store.fetch_question_by_id(&"q1".into()).await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[tokio::test]
    async fn list_respects_limit() {
        let store = MockStore::new(vec![
            short_answer("q3", "c"),
            short_answer("q1", "a"),
            short_answer("q2", "b"),
        ]);
        let listed = store
            .list_questions(&QuestionFilter {
                limit: 2,
                ..Default::default()
            })
            .await
            .unwrap();
        let ids: Vec<&str> = listed.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["q1", "q2"]);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_earlier_load_does_not_override_newer_one() {
        let store = MockStore::new(vec![short_answer("lama", "satu"), short_answer("baru", "dua")])
            .with_delay("lama", Duration::from_millis(500))
            .with_delay("baru", Duration::from_millis(10));
        let mut view = QuestionView::new();

        let first = view.begin_load("lama".into());
        let second = view.begin_load("baru".into());

        let (first_result, second_result) = tokio::join!(
            store.fetch_question_by_id(first.id()),
            store.fetch_question_by_id(second.id()),
        );

        // The newer response arrives first, the older one afterwards.
        assert_eq!(view.complete_load(second, second_result), LoadOutcome::Applied);
        assert_eq!(view.complete_load(first, first_result), LoadOutcome::Stale);

        let attempt = view.attempt().unwrap();
        assert_eq!(attempt.question().id.as_str(), "baru");
        assert_eq!(attempt.status(), AttemptStatus::Unanswered);
    }

    #[tokio::test]
    async fn failed_load_surfaces_in_view() {
        let store = MockStore::new(vec![]).with_error("q1", StoreError::Timeout(30));
        let mut view = QuestionView::new();

        assert_eq!(view.load(&store, "q1".into()).await, LoadOutcome::Applied);
        assert!(matches!(
            view.state(),
            ViewState::Failed {
                error: StoreError::Timeout(30),
                ..
            }
        ));
    }
}
