//! Hypothesis API client.
//!
//! Thin authenticated wrapper over the service's REST endpoints:
//! - `GET /profile` for the calling user's account id
//! - `GET /search` for annotation rows
//!
//! The bearer token is read from the settings store at call time, never
//! cached, so a token change in the host's settings panel takes effect on
//! the next command. There is no retry or backoff: every invocation is a
//! single user-triggered action and failures propagate to the caller.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

use crate::annotations::normalize;
use crate::models::{Annotation, AnnotationRow, ProfileResponse, SearchResponse};
use crate::settings::{self, SettingsStore};

/// Production API root.
pub const API_BASE: &str = "https://api.hypothes.is/api";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub enum ClientError {
    /// Transport, client-build, or body-decode failure.
    Request(reqwest::Error),
    /// The service answered with a non-success HTTP status.
    Status(u16),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Request(e) => write!(f, "Hypothesis request failed: {}", e),
            ClientError::Status(code) => write!(f, "Hypothesis API returned status {}", code),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Request(e) => Some(e),
            ClientError::Status(_) => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Request(e)
    }
}

// ============================================================================
// Search Query
// ============================================================================

/// Builder for the `/search` query string. Parameters are emitted in a
/// stable order and values are percent-encoded.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    limit: Option<u32>,
    user: Option<String>,
    uri: Option<String>,
    tags: Option<String>,
    sort: Option<String>,
    order: Option<String>,
    search_after: Option<String>,
}

impl SearchQuery {
    pub fn new() -> Self {
        SearchQuery::default()
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = Some(tags.into());
        self
    }

    pub fn sort(mut self, field: impl Into<String>) -> Self {
        self.sort = Some(field.into());
        self
    }

    pub fn order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    /// Only annotations updated after this instant (RFC 3339 on the wire).
    pub fn search_after(mut self, after: DateTime<Utc>) -> Self {
        self.search_after = Some(after.to_rfc3339());
        self
    }

    pub fn to_query_string(&self) -> String {
        let mut params: Vec<String> = Vec::new();
        if let Some(limit) = self.limit {
            params.push(format!("limit={}", limit));
        }
        let encoded = [
            ("user", &self.user),
            ("uri", &self.uri),
            ("tags", &self.tags),
            ("sort", &self.sort),
            ("order", &self.order),
            ("search_after", &self.search_after),
        ];
        for (key, value) in encoded {
            if let Some(value) = value {
                params.push(format!("{}={}", key, urlencoding::encode(value)));
            }
        }
        params.join("&")
    }
}

// ============================================================================
// Client
// ============================================================================

pub struct AnnotationClient {
    base_url: String,
    settings: Arc<dyn SettingsStore>,
}

impl AnnotationClient {
    pub fn new(settings: Arc<dyn SettingsStore>) -> Self {
        AnnotationClient::with_base_url(settings, API_BASE)
    }

    /// Client against a non-production API root (tests, staging).
    pub fn with_base_url(settings: Arc<dyn SettingsStore>, base_url: impl Into<String>) -> Self {
        AnnotationClient {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            settings,
        }
    }

    fn auth_header(&self) -> String {
        format!("Bearer {}", settings::api_token(&*self.settings))
    }

    async fn get_json<T: DeserializeOwned>(&self, path_and_query: &str) -> Result<T, ClientError> {
        let url = format!("{}/{}", self.base_url, path_and_query);
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let response = client
            .get(&url)
            .header("Authorization", self.auth_header())
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }
        Ok(response.json().await?)
    }

    /// Account id of the token's owner, e.g. `acct:user@hypothes.is`.
    pub async fn current_user(&self) -> Result<String, ClientError> {
        let profile: ProfileResponse = self.get_json("profile").await?;
        Ok(profile.userid)
    }

    /// Raw annotation rows matching a search query.
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<AnnotationRow>, ClientError> {
        let response: SearchResponse = self
            .get_json(&format!("search?{}", query.to_query_string()))
            .await?;
        Ok(response.rows)
    }

    /// The calling user's annotations updated after `from`, oldest first.
    pub async fn annotations_since(
        &self,
        from: DateTime<Utc>,
    ) -> Result<Vec<Annotation>, ClientError> {
        let user = self.current_user().await?;
        let query = SearchQuery::new()
            .user(user)
            .sort("updated")
            .order("asc")
            .search_after(from);
        Ok(normalize(self.search(&query).await?))
    }

    /// Like [`annotations_since`](Self::annotations_since), restricted to
    /// annotations carrying the given tags.
    pub async fn annotations_since_with_tags(
        &self,
        from: DateTime<Utc>,
        tags: &str,
    ) -> Result<Vec<Annotation>, ClientError> {
        let user = self.current_user().await?;
        let query = SearchQuery::new()
            .user(user)
            .tags(tags)
            .sort("updated")
            .order("asc")
            .search_after(from);
        Ok(normalize(self.search(&query).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SETTING_TOKEN;
    use chrono::TimeZone;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockSettings(Mutex<HashMap<String, String>>);

    impl SettingsStore for MockSettings {
        fn get(&self, id: &str) -> Option<String> {
            self.0.lock().unwrap().get(id).cloned()
        }
        fn set(&self, id: &str, value: &str) {
            self.0.lock().unwrap().insert(id.to_string(), value.to_string());
        }
    }

    fn settings_with_token(token: &str) -> Arc<MockSettings> {
        let settings = Arc::new(MockSettings::default());
        settings.set(SETTING_TOKEN, token);
        settings
    }

    #[test]
    fn test_query_string_stable_order_and_encoding() {
        let query = SearchQuery::new()
            .limit(20)
            .user("acct:u@h")
            .order("asc")
            .uri("https://example.com/a?b=1");
        assert_eq!(
            query.to_query_string(),
            "limit=20&user=acct%3Au%40h&uri=https%3A%2F%2Fexample.com%2Fa%3Fb%3D1&order=asc"
        );
    }

    #[test]
    fn test_query_string_search_after_is_rfc3339() {
        let after = Utc.with_ymd_and_hms(2023, 1, 2, 3, 4, 5).unwrap();
        let query = SearchQuery::new().sort("updated").search_after(after);
        assert_eq!(
            query.to_query_string(),
            "sort=updated&search_after=2023-01-02T03%3A04%3A05%2B00%3A00"
        );
    }

    #[test]
    fn test_empty_query_string() {
        assert_eq!(SearchQuery::new().to_query_string(), "");
    }

    #[tokio::test]
    async fn test_current_user_sends_bearer_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/profile")
            .match_header("authorization", "Bearer tok-123")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"userid":"acct:me@hypothes.is"}"#)
            .create_async()
            .await;

        let client = AnnotationClient::with_base_url(settings_with_token("tok-123"), server.url());
        let user = client.current_user().await.expect("profile should succeed");
        assert_eq!(user, "acct:me@hypothes.is");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_search_decodes_rows() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/search")
            .match_query(mockito::Matcher::UrlEncoded("uri".into(), "https://example.com".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"rows":[{"uri":"https://example.com","text":"a note","tags":["t"],"target":[]}]}"#,
            )
            .create_async()
            .await;

        let client = AnnotationClient::with_base_url(settings_with_token("tok"), server.url());
        let rows = client
            .search(&SearchQuery::new().uri("https://example.com"))
            .await
            .expect("search should succeed");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text, "a note");
        assert_eq!(rows[0].tags, vec!["t"]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_propagates() {
        let mut server = mockito::Server::new_async().await;
        let _search = server
            .mock("GET", "/search")
            .match_query(mockito::Matcher::Any)
            .with_status(401)
            .create_async()
            .await;

        let client = AnnotationClient::with_base_url(settings_with_token(""), server.url());
        let err = client
            .search(&SearchQuery::new().limit(1))
            .await
            .expect_err("unauthorized search should fail");
        assert!(matches!(err, ClientError::Status(401)));
    }
}
