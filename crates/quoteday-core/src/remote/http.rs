//! HTTP remote data source.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::RemoteSource;
use crate::config::{normalize_endpoint, SyncConfig};
use crate::error::{Error, Result};
use crate::models::Quote;
use crate::util::now_millis;

/// Longest server error body quoted in a network error
const ERROR_EXCERPT_CHARS: usize = 180;

/// Remote collection reached over plain JSON HTTP
///
/// `GET <endpoint>?_since=<ms>` returns posts whose `body` becomes the quote
/// text; `POST <endpoint>` receives `{"quotes": [...]}`.
#[derive(Clone)]
pub struct HttpRemoteSource {
    endpoint: String,
    fetch_limit: Option<usize>,
    remote_category: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for HttpRemoteSource {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("HttpRemoteSource")
            .field("endpoint", &self.endpoint)
            .field("fetch_limit", &self.fetch_limit)
            .field("remote_category", &self.remote_category)
            .finish_non_exhaustive()
    }
}

impl HttpRemoteSource {
    pub fn new(config: &SyncConfig) -> Result<Self> {
        let endpoint = normalize_endpoint(config.endpoint.clone())?;
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            endpoint,
            fetch_limit: config.fetch_limit,
            remote_category: config.remote_category.clone(),
            client,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn fetch_url(&self, since: i64) -> String {
        let separator = if self.endpoint.contains('?') { '&' } else { '?' };
        format!("{}{separator}_since={since}", self.endpoint)
    }

    fn to_quotes(&self, posts: Vec<RemotePost>) -> Vec<Quote> {
        let fetched_at = now_millis();
        let quotes = posts
            .into_iter()
            .filter(|post| !post.body.trim().is_empty())
            .map(|post| Quote::new(post.id, post.body, self.remote_category.clone(), fetched_at));
        match self.fetch_limit {
            Some(limit) => quotes.take(limit).collect(),
            None => quotes.collect(),
        }
    }
}

impl RemoteSource for HttpRemoteSource {
    async fn fetch_since(&self, since: i64) -> Result<Vec<Quote>> {
        let url = self.fetch_url(since);
        tracing::debug!("Fetching remote quotes from {url}");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Network(format!(
                "fetch failed: {}",
                describe_failure(status, &body)
            )));
        }

        let posts = response.json::<Vec<RemotePost>>().await?;
        Ok(self.to_quotes(posts))
    }

    async fn push(&self, quotes: &[Quote]) -> Result<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&PushBody { quotes })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Network(format!(
                "push failed: {}",
                describe_failure(status, &body)
            )));
        }

        tracing::debug!("Pushed {} quotes to {}", quotes.len(), self.endpoint);
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct RemotePost {
    id: i64,
    #[serde(default)]
    body: String,
}

#[derive(Serialize)]
struct PushBody<'a> {
    quotes: &'a [Quote],
}

fn describe_failure(status: StatusCode, body: &str) -> String {
    let trimmed = body.trim().chars().take(ERROR_EXCERPT_CHARS).collect::<String>();
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use axum::extract::{Query, State};
    use axum::http::StatusCode as AxumStatus;
    use axum::routing::get;
    use axum::{Json, Router};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    #[derive(Clone, Default)]
    struct ServerState {
        since_seen: Arc<Mutex<Vec<String>>>,
        pushed: Arc<Mutex<Vec<Value>>>,
    }

    #[derive(Deserialize)]
    struct SinceQuery {
        #[serde(rename = "_since")]
        since: String,
    }

    async fn list_posts(
        State(state): State<ServerState>,
        Query(query): Query<SinceQuery>,
    ) -> Json<Value> {
        state.since_seen.lock().unwrap().push(query.since);
        Json(json!([
            {"userId": 1, "id": 1, "title": "t1", "body": "first body"},
            {"userId": 1, "id": 2, "title": "t2", "body": "second body"},
            {"userId": 1, "id": 3, "title": "t3", "body": ""},
            {"userId": 1, "id": 4, "title": "t4", "body": "fourth body"}
        ]))
    }

    async fn accept_push(
        State(state): State<ServerState>,
        Json(body): Json<Value>,
    ) -> (AxumStatus, Json<Value>) {
        state.pushed.lock().unwrap().push(body);
        (AxumStatus::CREATED, Json(json!({"id": 101})))
    }

    async fn spawn_server(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/posts")
    }

    async fn posts_server() -> (String, ServerState) {
        let state = ServerState::default();
        let router = Router::new()
            .route("/posts", get(list_posts).post(accept_push))
            .with_state(state.clone());
        (spawn_server(router).await, state)
    }

    fn source_for(endpoint: &str, limit: Option<usize>) -> HttpRemoteSource {
        let config = SyncConfig::new(endpoint).unwrap().with_fetch_limit(limit);
        HttpRemoteSource::new(&config).unwrap()
    }

    #[tokio::test]
    async fn fetch_maps_posts_to_imported_quotes() {
        let (endpoint, state) = posts_server().await;
        let source = source_for(&endpoint, None);

        let quotes = source.fetch_since(1234).await.unwrap();

        assert_eq!(state.since_seen.lock().unwrap().as_slice(), ["1234"]);
        let texts = quotes.iter().map(|quote| quote.text.as_str()).collect::<Vec<_>>();
        assert_eq!(texts, vec!["first body", "second body", "fourth body"]);
        assert!(quotes.iter().all(|quote| quote.category == "Imported"));
        assert_eq!(quotes[2].id.get(), 4);
        assert!(quotes.iter().all(|quote| quote.timestamp > 0));
    }

    #[tokio::test]
    async fn fetch_respects_limit() {
        let (endpoint, _) = posts_server().await;
        let source = source_for(&endpoint, Some(2));

        let quotes = source.fetch_since(0).await.unwrap();

        assert_eq!(quotes.len(), 2);
    }

    #[tokio::test]
    async fn push_posts_quotes_envelope() {
        let (endpoint, state) = posts_server().await;
        let source = source_for(&endpoint, None);
        let quotes = vec![Quote::new(1, "A", "Motivation", 100)];

        source.push(&quotes).await.unwrap();

        let pushed = state.pushed.lock().unwrap();
        assert_eq!(
            pushed.as_slice(),
            [json!({"quotes": [{"id": 1, "text": "A", "category": "Motivation", "timestamp": 100}]})]
        );
    }

    #[tokio::test]
    async fn non_success_status_is_network_error() {
        let router = Router::new().route(
            "/posts",
            get(|| async { (AxumStatus::SERVICE_UNAVAILABLE, "maintenance") })
                .post(|| async { AxumStatus::INTERNAL_SERVER_ERROR }),
        );
        let endpoint = spawn_server(router).await;
        let source = source_for(&endpoint, None);

        let fetch_error = source.fetch_since(0).await.unwrap_err();
        assert!(matches!(fetch_error, Error::Network(_)));
        assert!(fetch_error.to_string().contains("maintenance (503)"));

        let push_error = source.push(&[]).await.unwrap_err();
        assert!(push_error.to_string().contains("HTTP 500"));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let source = source_for(&format!("http://{addr}/posts"), None);

        assert!(matches!(
            source.fetch_since(0).await,
            Err(Error::Network(_))
        ));
    }

    #[test]
    fn describe_failure_truncates_long_bodies() {
        let long = "x".repeat(500);
        let described = describe_failure(StatusCode::BAD_GATEWAY, &long);
        assert_eq!(described, format!("{} (502)", "x".repeat(180)));
        assert_eq!(
            describe_failure(StatusCode::NOT_FOUND, "   "),
            "HTTP 404"
        );
    }

    #[test]
    fn endpoint_is_normalized() {
        let source = source_for(" https://api.example.com/posts/ ", None);
        assert_eq!(source.endpoint(), "https://api.example.com/posts");
    }

    #[test]
    fn fetch_url_appends_since_parameter() {
        let source = source_for("https://api.example.com/posts", None);
        assert_eq!(
            source.fetch_url(42),
            "https://api.example.com/posts?_since=42"
        );

        let source = source_for("https://api.example.com/posts?userId=1", None);
        assert_eq!(
            source.fetch_url(42),
            "https://api.example.com/posts?userId=1&_since=42"
        );
    }

    #[test]
    fn new_rejects_invalid_endpoint() {
        let config = SyncConfig {
            endpoint: "api.example.com".to_string(),
            ..SyncConfig::default()
        };
        assert!(matches!(
            HttpRemoteSource::new(&config),
            Err(Error::InvalidInput(_))
        ));
    }
}
