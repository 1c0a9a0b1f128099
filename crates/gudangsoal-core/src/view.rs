//! Question view: owns the attempt for the question currently on screen.
//!
//! Loading is the only asynchronous step. Every load is issued a
//! [`LoadTicket`] carrying a generation number; a response is applied only if
//! its ticket is still the latest one, so a slow response for a question the
//! student already navigated away from cannot replace the current attempt.

use std::sync::Arc;

use crate::attempt::Attempt;
use crate::error::{QuestionError, StoreError};
use crate::model::{QuestionId, RawQuestion};
use crate::traits::ContentStore;
use crate::validator::classify;

/// Identifies one in-flight load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    id: QuestionId,
}

impl LoadTicket {
    pub fn id(&self) -> &QuestionId {
        &self.id
    }
}

/// What the view is currently showing.
#[derive(Debug, Clone)]
pub enum ViewState {
    Idle,
    Loading(QuestionId),
    Ready(Attempt),
    /// Loaded, but the record cannot be graded; render a neutral state.
    NotGradeable {
        question: RawQuestion,
        error: QuestionError,
    },
    NotFound(QuestionId),
    Failed {
        id: QuestionId,
        error: StoreError,
    },
}

/// Whether a completed load was applied to the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    Stale,
}

/// Hosts at most one attempt at a time.
#[derive(Debug)]
pub struct QuestionView {
    generation: u64,
    state: ViewState,
}

impl Default for QuestionView {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestionView {
    pub fn new() -> Self {
        Self {
            generation: 0,
            state: ViewState::Idle,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn attempt(&self) -> Option<&Attempt> {
        match &self.state {
            ViewState::Ready(attempt) => Some(attempt),
            _ => None,
        }
    }

    pub fn attempt_mut(&mut self) -> Option<&mut Attempt> {
        match &mut self.state {
            ViewState::Ready(attempt) => Some(attempt),
            _ => None,
        }
    }

    /// Start loading `id`. Any previous attempt is discarded immediately and
    /// every earlier ticket becomes stale.
    pub fn begin_load(&mut self, id: QuestionId) -> LoadTicket {
        self.generation += 1;
        self.state = ViewState::Loading(id.clone());
        tracing::debug!(question = %id, generation = self.generation, "loading question");
        LoadTicket {
            generation: self.generation,
            id,
        }
    }

    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Apply the result of a fetch, unless a newer load has started since.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<RawQuestion, StoreError>,
    ) -> LoadOutcome {
        if !self.is_current(&ticket) {
            tracing::debug!(
                question = %ticket.id,
                generation = ticket.generation,
                current = self.generation,
                "discarding stale question load"
            );
            return LoadOutcome::Stale;
        }

        self.state = match result {
            Ok(raw) if raw.id != ticket.id => ViewState::Failed {
                error: StoreError::Decode(format!(
                    "store returned question {} for {}",
                    raw.id, ticket.id
                )),
                id: ticket.id,
            },
            Ok(raw) => match classify(&raw) {
                Ok(question) => ViewState::Ready(Attempt::new(Arc::new(question))),
                Err(error) => {
                    tracing::info!(question = %raw.id, %error, "question is not gradeable");
                    ViewState::NotGradeable {
                        question: raw,
                        error,
                    }
                }
            },
            Err(StoreError::NotFound(_)) => ViewState::NotFound(ticket.id),
            Err(error) => {
                tracing::warn!(question = %ticket.id, %error, "failed to load question");
                ViewState::Failed {
                    id: ticket.id,
                    error,
                }
            }
        };
        LoadOutcome::Applied
    }

    /// Fetch `id` from `store` and apply it.
    pub async fn load(&mut self, store: &dyn ContentStore, id: QuestionId) -> LoadOutcome {
        let ticket = self.begin_load(id);
        let result = store.fetch_question_by_id(ticket.id()).await;
        self.complete_load(ticket, result)
    }
}
