// SPDX-FileCopyrightText: 2026 Memchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Zep Cloud REST API.
//!
//! Provides [`ZepClient`] which handles `Api-Key` authentication, JSON
//! bodies, transient error retry, and the mapping of 404 responses to
//! [`MemchatError::NotFound`]. Ids are always sent as single percent-encoded
//! path segments.

use std::time::Duration;

use memchat_core::{GraphScope, MemchatError, ThreadId};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::types::{
    AddMessagesRequest, ApiErrorResponse, CreateThreadRequest, CreateUserRequest,
    GraphListRequest, GraphSearchRequest, GraphSearchResponse, ThreadContextResponse, ZepMessage,
};

/// Most records Zep returns from one graph search.
pub const MAX_SEARCH_LIMIT: usize = 50;

/// Query sent when the caller has none; Zep rejects empty queries.
pub const MATCH_ALL_QUERY: &str = "*";

/// HTTP client for Zep Cloud.
#[derive(Debug, Clone)]
pub struct ZepClient {
    client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
    max_retries: u32,
}

impl ZepClient {
    /// Creates a client for the API rooted at `base_url` (e.g. `https://api.getzep.com/api/v2`).
    pub fn new(
        api_key: &SecretString,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, MemchatError> {
        let base = Url::parse(base_url)
            .map_err(|e| MemchatError::Config(format!("invalid Zep base URL `{base_url}`: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(MemchatError::Config(format!(
                "Zep base URL `{base_url}` cannot carry a path"
            )));
        }

        let mut auth = HeaderValue::from_str(&format!("Api-Key {}", api_key.expose_secret()))
            .map_err(|e| MemchatError::Config(format!("invalid API key header value: {e}")))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| MemchatError::Memory {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base,
            timeout,
            max_retries: 1,
        })
    }

    /// Appends `segments` to the base URL, percent-encoding each one.
    ///
    /// Empty, `.` and `..` segments would change which resource is addressed
    /// and are rejected as `NotFound`.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, MemchatError> {
        if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(MemchatError::NotFound(format!("invalid id `{bad}`")));
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                MemchatError::Config(format!(
                    "Zep base URL `{}` cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Maps a transport failure; client timeouts become [`MemchatError::Timeout`].
    fn transport_error(&self, context: &str, e: reqwest::Error) -> MemchatError {
        if e.is_timeout() {
            warn!(timeout_ms = self.timeout.as_millis() as u64, "Zep request timed out");
            return MemchatError::Timeout {
                duration: self.timeout,
            };
        }
        MemchatError::Memory {
            message: format!("{context}: {e}"),
            source: Some(Box::new(e)),
        }
    }

    /// `GET /users/{user_id}`.
    pub async fn get_user(&self, user_id: &str) -> Result<Value, MemchatError> {
        let url = self.endpoint(&["users", user_id])?;
        self.request(Method::GET, url, None::<&()>).await
    }

    /// `POST /users`.
    pub async fn create_user(&self, user_id: &str) -> Result<Value, MemchatError> {
        let url = self.endpoint(&["users"])?;
        self.request(Method::POST, url, Some(&CreateUserRequest { user_id }))
            .await
    }

    /// `GET /threads/{id}/messages?limit=N`. Fails with `NotFound` for unknown threads.
    pub async fn thread_messages(
        &self,
        thread: &ThreadId,
        limit: usize,
    ) -> Result<Value, MemchatError> {
        let mut url = self.endpoint(&["threads", thread.as_str(), "messages"])?;
        url.query_pairs_mut().append_pair("limit", &limit.to_string());
        self.request(Method::GET, url, None::<&()>).await
    }

    /// `POST /threads`.
    pub async fn create_thread(
        &self,
        thread: &ThreadId,
        user_id: &str,
    ) -> Result<Value, MemchatError> {
        let url = self.endpoint(&["threads"])?;
        self.request(
            Method::POST,
            url,
            Some(&CreateThreadRequest {
                thread_id: thread.as_str(),
                user_id,
            }),
        )
        .await
    }

    /// `POST /threads/{id}/messages`, in order, in one request.
    pub async fn add_messages(
        &self,
        thread: &ThreadId,
        messages: &[ZepMessage],
    ) -> Result<(), MemchatError> {
        let url = self.endpoint(&["threads", thread.as_str(), "messages"])?;
        self.request::<Value, _>(Method::POST, url, Some(&AddMessagesRequest { messages }))
        .await
        .map(|_| ())
    }

    /// `GET /threads/{id}/context`; empty when Zep has no context block.
    pub async fn get_context(&self, thread: &ThreadId) -> Result<String, MemchatError> {
        let url = self.endpoint(&["threads", thread.as_str(), "context"])?;
        let response: ThreadContextResponse = self.request(Method::GET, url, None::<&()>).await?;
        Ok(response.context.unwrap_or_default())
    }

    /// `POST /graph/node/user/{user_id}`: every node in the user's graph.
    pub async fn graph_nodes(&self, user_id: &str) -> Result<Vec<Value>, MemchatError> {
        let url = self.endpoint(&["graph", "node", "user", user_id])?;
        self.request(Method::POST, url, Some(&GraphListRequest::default()))
            .await
    }

    /// `POST /graph/edge/user/{user_id}`: every edge in the user's graph.
    pub async fn graph_edges(&self, user_id: &str) -> Result<Vec<Value>, MemchatError> {
        let url = self.endpoint(&["graph", "edge", "user", user_id])?;
        self.request(Method::POST, url, Some(&GraphListRequest::default()))
            .await
    }

    /// `POST /graph/search` for one half of the graph.
    ///
    /// `limit` is clamped to [`MAX_SEARCH_LIMIT`]; a missing or blank query
    /// becomes [`MATCH_ALL_QUERY`].
    pub async fn search_graph(
        &self,
        user_id: &str,
        query: Option<&str>,
        scope: GraphScope,
        limit: usize,
    ) -> Result<Vec<Value>, MemchatError> {
        let query = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .unwrap_or(MATCH_ALL_QUERY);
        let request = GraphSearchRequest {
            user_id,
            query,
            limit: limit.clamp(1, MAX_SEARCH_LIMIT),
            scope,
        };

        let url = self.endpoint(&["graph", "search"])?;
        let response: GraphSearchResponse =
            self.request(Method::POST, url, Some(&request)).await?;

        Ok(match scope {
            GraphScope::Nodes => response.nodes,
            GraphScope::Edges => response.edges,
        }
        .unwrap_or_default())
    }

    /// Sends one request, retrying once on 429/500/503, and decodes the body.
    ///
    /// An empty success body decodes as JSON `null`.
    async fn request<T, B>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<T, MemchatError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url_path = url.path().to_string();
        let path = url_path.as_str();
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, path, "retrying Zep request after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let mut builder = self.client.request(method.clone(), url.clone());
            if let Some(body) = body {
                builder = builder.json(body);
            }

            let response = builder
                .send()
                .await
                .map_err(|e| self.transport_error("HTTP request failed", e))?;

            let status = response.status();
            debug!(status = %status, %method, path, attempt, "Zep response received");

            let text = response
                .text()
                .await
                .map_err(|e| self.transport_error("failed to read response body", e))?;

            if status.is_success() {
                let text = if text.trim().is_empty() { "null" } else { text.as_str() };
                return serde_json::from_str(text).map_err(|e| MemchatError::Memory {
                    message: format!("failed to parse Zep response from {path}: {e}"),
                    source: Some(Box::new(e)),
                });
            }

            if is_transient_error(status) && attempt < self.max_retries {
                warn!(status = %status, body = %text, "transient error, will retry");
                last_error = Some(MemchatError::memory(format!(
                    "Zep returned {status}: {text}"
                )));
                continue;
            }

            return Err(classify_error(status, path, &text));
        }

        Err(last_error.unwrap_or_else(|| MemchatError::memory("Zep request failed after retries")))
    }
}

/// 404s, and any error whose message says something was not found, become
/// [`MemchatError::NotFound`]; everything else is a memory error.
fn classify_error(status: StatusCode, path: &str, body: &str) -> MemchatError {
    let message = serde_json::from_str::<ApiErrorResponse>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| body.to_string());

    if status == StatusCode::NOT_FOUND || message.to_lowercase().contains("not found") {
        let detail = if message.is_empty() {
            path.to_string()
        } else {
            format!("{path}: {message}")
        };
        return MemchatError::NotFound(detail);
    }

    MemchatError::memory(format!("Zep API error ({status}) on {path}: {message}"))
}

/// Returns true for HTTP status codes worth one retry.
fn is_transient_error(status: StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> ZepClient {
        ZepClient::new(
            &SecretString::from("z-test"),
            base_url,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn ids_stay_inside_their_path_segment() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/threads/t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"other": true})))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/threads/t1%3Fx=%2Fy%23z/messages"))
            .and(query_param("limit", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"messages": []})))
            .expect(1)
            .mount(&server)
            .await;

        test_client(&server.uri())
            .thread_messages(&ThreadId::from("t1?x=/y#z"), 1)
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url.path(), "/threads/t1%3Fx=%2Fy%23z/messages");
        assert_eq!(requests[0].url.query(), Some("limit=1"));
    }

    #[tokio::test]
    async fn dot_segments_are_rejected_before_sending() {
        let server = MockServer::start().await;
        let client = test_client(&server.uri());

        for id in ["..", ".", ""] {
            let err = client
                .get_context(&ThreadId::from(id))
                .await
                .unwrap_err();
            assert!(err.is_not_found(), "{id:?}: {err}");
        }
        let err = client.get_user("..").await.unwrap_err();
        assert!(err.is_not_found(), "{err}");
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn base_path_is_preserved() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/users/alice"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"user_id": "alice"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&format!("{}/api/v2/", server.uri()));
        client.get_user("alice").await.unwrap();
    }

    #[test]
    fn unusable_base_url_is_a_config_error() {
        let err = ZepClient::new(&SecretString::from("z"), "not a url", Duration::from_secs(1))
            .unwrap_err();
        assert!(matches!(err, MemchatError::Config(_)), "{err}");
    }

    #[tokio::test]
    async fn slow_upstream_is_a_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/alice"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"user_id": "alice"}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let client = ZepClient::new(
            &SecretString::from("z-test"),
            &server.uri(),
            Duration::from_millis(300),
        )
        .unwrap();
        let err = client.get_user("alice").await.unwrap_err();
        assert!(
            matches!(err, MemchatError::Timeout { duration } if duration == Duration::from_millis(300)),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn sends_api_key_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/alice"))
            .and(header("authorization", "Api-Key z-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"user_id": "alice"})))
            .expect(1)
            .mount(&server)
            .await;

        let user = test_client(&server.uri()).get_user("alice").await.unwrap();
        assert_eq!(user["user_id"], "alice");
    }

    #[tokio::test]
    async fn missing_user_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/ghost"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(serde_json::json!({"message": "user not found"})),
            )
            .mount(&server)
            .await;

        let err = test_client(&server.uri()).get_user("ghost").await.unwrap_err();
        assert!(err.is_not_found(), "got: {err}");
    }

    #[tokio::test]
    async fn user_not_found_message_on_400_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/threads"))
            .and(body_json(serde_json::json!({"thread_id": "t1", "user_id": "bob"})))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(serde_json::json!({"message": "User not found"})),
            )
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .create_thread(&ThreadId::from("t1"), "bob")
            .await
            .unwrap_err();
        assert!(err.is_not_found(), "got: {err}");
    }

    #[tokio::test]
    async fn thread_messages_passes_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/threads/t1/messages"))
            .and(query_param("limit", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"messages": []})))
            .expect(1)
            .mount(&server)
            .await;

        test_client(&server.uri())
            .thread_messages(&ThreadId::from("t1"), 1)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn add_messages_accepts_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/threads/t1/messages"))
            .and(body_json(serde_json::json!({
                "messages": [
                    {"role": "user", "content": "hi"},
                    {"role": "assistant", "content": "hello"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let messages = [
            ZepMessage {
                role: "user".into(),
                content: "hi".into(),
                created_at: None,
            },
            ZepMessage {
                role: "assistant".into(),
                content: "hello".into(),
                created_at: None,
            },
        ];
        test_client(&server.uri())
            .add_messages(&ThreadId::from("t1"), &messages)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn get_context_defaults_to_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/threads/t1/context"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"context": null})))
            .mount(&server)
            .await;

        let context = test_client(&server.uri())
            .get_context(&ThreadId::from("t1"))
            .await
            .unwrap();
        assert_eq!(context, "");
    }

    #[tokio::test]
    async fn search_clamps_limit_and_defaults_query() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graph/search"))
            .and(body_json(serde_json::json!({
                "user_id": "alice",
                "query": "*",
                "limit": 50,
                "scope": "edges"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "edges": [{"uuid": "e1", "source_node_uuid": "a", "target_node_uuid": "b"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let edges = test_client(&server.uri())
            .search_graph("alice", Some("  "), GraphScope::Edges, 500)
            .await
            .unwrap();
        assert_eq!(edges.len(), 1);
    }

    #[tokio::test]
    async fn search_missing_half_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graph/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let nodes = test_client(&server.uri())
            .search_graph("alice", None, GraphScope::Nodes, 10)
            .await
            .unwrap();
        assert!(nodes.is_empty());
    }

    #[tokio::test]
    async fn retries_once_on_500() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graph/node/user/alice"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/graph/node/user/alice"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{"uuid": "n1"}])))
            .mount(&server)
            .await;

        let nodes = test_client(&server.uri()).graph_nodes("alice").await.unwrap();
        assert_eq!(nodes.len(), 1);
    }

    #[tokio::test]
    async fn non_transient_error_is_memory_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graph/edge/user/alice"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({"message": "unauthorized"})))
            .expect(1)
            .mount(&server)
            .await;

        let err = test_client(&server.uri()).graph_edges("alice").await.unwrap_err();
        assert!(matches!(err, MemchatError::Memory { .. }));
        assert!(err.to_string().contains("unauthorized"), "got: {err}");
    }
}
