//! PostgREST content store (the REST interface Supabase exposes).
//!
//! Questions live in a `questions` table joined to `subchapters` and
//! `chapters`; the nested titles are flattened into the raw record.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use tracing::instrument;

use gudangsoal_core::error::StoreError;
use gudangsoal_core::model::{QuestionId, QuestionOption, RawAnswerKey, RawQuestion};
use gudangsoal_core::traits::{ContentStore, QuestionFilter, QuestionSummary};

const QUESTION_SELECT: &str = "id,text,difficulty,options,answer_key,explanation,type,subchapter_id,subchapters!inner(title,chapters!inner(title))";
const SUMMARY_SELECT: &str =
    "id,text,difficulty,type,subchapter_id,subchapters!inner(title,chapters!inner(title))";

/// Content store reading from a PostgREST endpoint.
pub struct PostgrestStore {
    base_url: String,
    api_key: String,
    table: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl PostgrestStore {
    pub fn new(base_url: &str, api_key: &str, table: &str, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            table: table.to_string(),
            timeout_secs,
            client,
        })
    }

    fn table_url(&self, params: &[(&str, String)]) -> Result<Url, StoreError> {
        Url::parse_with_params(&format!("{}/rest/v1/{}", self.base_url, self.table), params)
            .map_err(|e| StoreError::Unavailable(format!("invalid store URL: {e}")))
    }

    async fn get_rows(&self, url: Url) -> Result<Vec<QuestionRow>, StoreError> {
        let response = self
            .client
            .get(url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    StoreError::Timeout(self.timeout_secs)
                } else {
                    StoreError::Unavailable(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::ApiError {
                status,
                message: body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}

#[derive(Deserialize)]
struct QuestionRow {
    id: QuestionId,
    #[serde(rename = "type", default)]
    question_type: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    options: Option<Vec<QuestionOption>>,
    #[serde(default)]
    answer_key: Option<RawAnswerKey>,
    #[serde(default)]
    explanation: Option<String>,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    subchapter_id: Option<String>,
    #[serde(default)]
    subchapters: Option<SubchapterRow>,
}

#[derive(Deserialize)]
struct SubchapterRow {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    chapters: Option<ChapterRow>,
}

#[derive(Deserialize)]
struct ChapterRow {
    #[serde(default)]
    title: Option<String>,
}

impl From<QuestionRow> for RawQuestion {
    fn from(row: QuestionRow) -> Self {
        let (subchapter, chapter) = match row.subchapters {
            Some(sub) => (sub.title, sub.chapters.and_then(|c| c.title)),
            None => (None, None),
        };
        RawQuestion {
            id: row.id,
            question_type: row.question_type.unwrap_or_default(),
            text: row.text.unwrap_or_default(),
            options: row.options,
            answer_key: row.answer_key,
            explanation: row.explanation,
            // Values outside the known levels are treated as unrated.
            difficulty: row.difficulty.and_then(|d| d.parse().ok()),
            subchapter_id: row.subchapter_id,
            chapter,
            subchapter,
        }
    }
}

#[async_trait]
impl ContentStore for PostgrestStore {
    fn name(&self) -> &str {
        "postgrest"
    }

    #[instrument(skip(self), fields(table = %self.table))]
    async fn fetch_question_by_id(&self, id: &QuestionId) -> Result<RawQuestion, StoreError> {
        let url = self.table_url(&[
            ("select", QUESTION_SELECT.to_string()),
            ("id", format!("eq.{id}")),
        ])?;

        self.get_rows(url)
            .await?
            .into_iter()
            .next()
            .map(RawQuestion::from)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    #[instrument(skip(self), fields(table = %self.table))]
    async fn list_questions(
        &self,
        filter: &QuestionFilter,
    ) -> Result<Vec<QuestionSummary>, StoreError> {
        let mut params = vec![("select", SUMMARY_SELECT.to_string())];
        if let Some(subchapter_id) = &filter.subchapter_id {
            params.push(("subchapter_id", format!("eq.{subchapter_id}")));
        }
        if let Some(difficulty) = filter.difficulty {
            params.push(("difficulty", format!("eq.{difficulty}")));
        }
        params.push(("limit", filter.limit.to_string()));

        let url = self.table_url(&params)?;
        Ok(self
            .get_rows(url)
            .await?
            .into_iter()
            .map(|row| QuestionSummary::from(&RawQuestion::from(row)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gudangsoal_core::model::Difficulty;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store(server: &MockServer) -> PostgrestStore {
        PostgrestStore::new(&server.uri(), "anon-key", "questions", 5).unwrap()
    }

    #[tokio::test]
    async fn fetch_flattens_nested_titles() {
        let server = MockServer::start().await;

        let body = serde_json::json!([{
            "id": "3f2a9c1e-aaaa",
            "type": "multiple_choice",
            "text": "Berapa 2 + 2?",
            "difficulty": "mudah",
            "options": [{"key": "A", "text": "3"}, {"key": "B", "text": "4"}],
            "answer_key": "B",
            "explanation": "2 + 2 = 4",
            "subchapter_id": "penjumlahan",
            "subchapters": {"title": "Penjumlahan", "chapters": {"title": "Bilangan"}}
        }]);

        Mock::given(method("GET"))
            .and(path("/rest/v1/questions"))
            .and(query_param("id", "eq.3f2a9c1e-aaaa"))
            .and(header("apikey", "anon-key"))
            .and(header("authorization", "Bearer anon-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;

        let q = store(&server)
            .fetch_question_by_id(&"3f2a9c1e-aaaa".into())
            .await
            .unwrap();
        assert_eq!(q.question_type, "multiple_choice");
        assert_eq!(q.difficulty, Some(Difficulty::Easy));
        assert_eq!(q.chapter.as_deref(), Some("Bilangan"));
        assert_eq!(q.subchapter.as_deref(), Some("Penjumlahan"));
        assert_eq!(q.answer_key, Some(RawAnswerKey::Text("B".into())));
    }

    #[tokio::test]
    async fn empty_result_is_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/questions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let err = store(&server)
            .fetch_question_by_id(&"missing".into())
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::NotFound("missing".into()));
    }

    #[tokio::test]
    async fn error_status_is_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/questions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&server)
            .await;

        let err = store(&server)
            .fetch_question_by_id(&"q".into())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ApiError { status: 401, .. }));
    }

    #[tokio::test]
    async fn list_sends_filters_and_limit() {
        let server = MockServer::start().await;

        let body = serde_json::json!([
            {
                "id": "q1", "type": "short_answer", "text": "A?",
                "difficulty": "sulit", "subchapter_id": "s1"
            },
            {
                "id": "q2", "type": "essay", "text": "B?",
                "difficulty": "sulit", "subchapter_id": "s1"
            }
        ]);

        Mock::given(method("GET"))
            .and(path("/rest/v1/questions"))
            .and(query_param("subchapter_id", "eq.s1"))
            .and(query_param("difficulty", "eq.sulit"))
            .and(query_param("limit", "50"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;

        let summaries = store(&server)
            .list_questions(&QuestionFilter {
                subchapter_id: Some("s1".into()),
                difficulty: Some(Difficulty::Hard),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[1].question_type.as_deref(), Some("essay"));
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/questions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = store(&server)
            .fetch_question_by_id(&"q".into())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
    }
}
