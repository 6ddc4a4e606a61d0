// Client for the remote lesson API. Credentials come from outside: whoever
// owns the session hands a bearer token to `with_token`.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// The lesson-completion source of truth, as seen by the shelf.
#[async_trait::async_trait]
pub trait LessonGateway: Send + Sync {
    async fn lessons_by_course(&self, course_id: &str) -> anyhow::Result<Vec<LessonDto>>;

    async fn complete_lesson(&self, lesson_id: &str, course_id: Option<&str>)
    -> anyhow::Result<()>;
}

#[derive(Clone, Debug)]
pub struct LessonClient {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl LessonClient {
    /// Create a new client with the given base URL (e.g. "http://192.168.1.128:4000").
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let base_url_str = base_url.into();
        tracing::debug!(base_url = %base_url_str, "creating LessonClient");
        Ok(LessonClient {
            base_url: base_url_str.trim_end_matches('/').to_string(),
            token: None,
            client,
        })
    }

    /// Return a client with the provided token set (Bearer)
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.token = (!token.is_empty()).then_some(token);
        self
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }
}

#[async_trait::async_trait]
impl LessonGateway for LessonClient {
    /// GET /api/lessons/by-course/{course_id}
    #[tracing::instrument(level = "debug", skip(self))]
    async fn lessons_by_course(&self, course_id: &str) -> anyhow::Result<Vec<LessonDto>> {
        let url = self.url(&format!("/api/lessons/by-course/{}", course_id));
        // The API answers 304 to repeated identical GETs; a timestamp keeps responses fresh.
        let cache_bust = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        tracing::debug!(%url, "GET lessons by course");
        let req = self
            .authorize(self.client.get(&url))
            .query(&[("t", cache_bust.to_string())]);

        let resp = req.send().await?;
        let status = resp.error_for_status()?;
        let body = status.text().await?;
        match serde_json::from_str::<Vec<LessonDto>>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(e) => {
                let snippet_len = body.len().min(2000);
                let snippet = body.get(..snippet_len).unwrap_or_default();
                tracing::error!(error = %e, body_snippet = %snippet, "failed to parse lessons response");
                Err(e.into())
            }
        }
    }

    /// POST /api/lessons/{lesson_id}/complete
    #[tracing::instrument(level = "debug", skip(self))]
    async fn complete_lesson(
        &self,
        lesson_id: &str,
        course_id: Option<&str>,
    ) -> anyhow::Result<()> {
        let url = self.url(&format!("/api/lessons/{}/complete", lesson_id));
        tracing::debug!(%url, "POST complete lesson");
        let resp = self
            .authorize(self.client.post(&url))
            .json(&CompleteLessonRequest { course_id })
            .send()
            .await?;
        resp.error_for_status()?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompleteLessonRequest<'a> {
    course_id: Option<&'a str>,
}

#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LessonDto {
    #[serde(deserialize_with = "crate::lesson_client::de::opt_string_from_str_or_num", default)]
    pub id: Option<String>,
    pub title: Option<String>,
    /// Seconds
    pub duration: Option<f64>,
    pub order: Option<i64>,
    pub video_url: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
    // allow extra fields
    #[serde(flatten)]
    pub extra: std::collections::HashMap<String, serde_json::Value>,
}

impl LessonDto {
    pub fn is_completed(&self) -> bool {
        self.completed.unwrap_or(false)
    }
}

/// Internal serde helpers
pub mod de {
    use serde::{Deserialize, Deserializer};

    /// Accept Option<String> from either a string or a number; null/"" -> None.
    pub fn opt_string_from_str_or_num<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum NumOrStr {
            Num(i64),
            Str(String),
        }

        let val: Option<NumOrStr> = Option::deserialize(deserializer)?;
        Ok(match val {
            None => None,
            Some(NumOrStr::Num(n)) => Some(n.to_string()),
            Some(NumOrStr::Str(s)) if s.trim().is_empty() => None,
            Some(NumOrStr::Str(s)) => Some(s),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_url_trims_trailing_slash() {
        let c = LessonClient::new("http://localhost:4000/").unwrap();
        assert_eq!(
            c.url("/api/lessons/by-course/c1"),
            "http://localhost:4000/api/lessons/by-course/c1"
        );
        assert_eq!(c.url("api/x"), "http://localhost:4000/api/x");
    }

    #[test]
    fn empty_token_is_no_token() {
        let c = LessonClient::new("http://localhost:4000")
            .unwrap()
            .with_token("");
        assert!(c.token.is_none());
        let c = c.with_token("abc");
        assert_eq!(c.token.as_deref(), Some("abc"));
    }

    #[test]
    fn lessons_deserialize_example() {
        let json = r#"[
            { "id": "l1", "title": "Intro", "duration": 312, "order": 1, "videoUrl": "http://v/1.mp4", "completed": true, "courseId": "c1" },
            { "id": 2, "title": "Layout", "duration": null, "order": 2, "videoUrl": null, "completed": false },
            { "id": "", "title": "Bonus" }
        ]"#;
        let lessons: Vec<LessonDto> = serde_json::from_str(json).unwrap();
        assert_eq!(lessons.len(), 3);
        assert_eq!(lessons[0].id.as_deref(), Some("l1"));
        assert!(lessons[0].is_completed());
        assert_eq!(lessons[0].extra.get("courseId"), Some(&serde_json::json!("c1")));
        assert_eq!(lessons[1].id.as_deref(), Some("2"));
        assert!(!lessons[1].is_completed());
        assert_eq!(lessons[2].id, None);
        assert!(!lessons[2].is_completed());
    }

    #[test]
    fn complete_request_uses_camel_case() {
        let body = serde_json::to_string(&CompleteLessonRequest {
            course_id: Some("c1"),
        })
        .unwrap();
        assert_eq!(body, r#"{"courseId":"c1"}"#);
    }
}
