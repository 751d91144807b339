//! Loopback HTTP stub for exercising the embedding and completion clients.
//!
//! A [`StubServer`] binds an ephemeral port, answers every request with a
//! canned status and JSON body, and keeps the first request it saw for the
//! test to inspect.
//!
//! ```no_run
//! # async fn demo() -> std::io::Result<()> {
//! use stub_server::{StatusCode, StubServer};
//!
//! let server = StubServer::start(StatusCode::OK, r#"{"ok":true}"#).await?;
//! let url = format!("{}/embed", server.url());
//! reqwest::Client::new().post(url).send().await.ok();
//! let request = server.first_request().await;
//! assert_eq!(request.map(|r| r.path).as_deref(), Some("/embed"));
//! # Ok(())
//! # }
//! ```

use std::io;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{header, HeaderMap, Method, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

pub use axum::http::StatusCode;

/// What the client sent.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: String,
}

impl RecordedRequest {
    /// Header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Body parsed as JSON.
    pub fn json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_str(&self.body)
    }
}

struct Canned {
    status: StatusCode,
    body: &'static str,
    first: Mutex<Option<oneshot::Sender<RecordedRequest>>>,
}

/// Running stub. The server task lives until the runtime shuts down.
pub struct StubServer {
    url: String,
    first: oneshot::Receiver<RecordedRequest>,
}

impl StubServer {
    pub async fn start(status: StatusCode, body: &'static str) -> io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let url = format!("http://{}", listener.local_addr()?);

        let (tx, rx) = oneshot::channel();
        let canned = Arc::new(Canned {
            status,
            body,
            first: Mutex::new(Some(tx)),
        });
        let app = Router::new().fallback(respond).with_state(canned);
        tokio::spawn(async move { axum::serve(listener, app).await });

        Ok(Self { url, first: rx })
    }

    /// Base URL without a trailing slash, e.g. `http://127.0.0.1:40123`.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Waits for the first request; `None` if the server went away first.
    pub async fn first_request(self) -> Option<RecordedRequest> {
        self.first.await.ok()
    }
}

async fn respond(
    State(canned): State<Arc<Canned>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let sender = canned.first.lock().ok().and_then(|mut slot| slot.take());
    if let Some(sender) = sender {
        let _ = sender.send(RecordedRequest {
            method,
            path: uri.path().to_string(),
            headers,
            body,
        });
    }
    (
        canned.status,
        [(header::CONTENT_TYPE, "application/json")],
        canned.body,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_first_request_and_replies() {
        let server = StubServer::start(StatusCode::TOO_MANY_REQUESTS, r#"{"error":"slow down"}"#)
            .await
            .unwrap();
        let response = reqwest::Client::new()
            .post(format!("{}/v1/chat/completions", server.url()))
            .header("Authorization", "Bearer sk-test")
            .json(&serde_json::json!({ "model": "gpt-4o-mini" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 429);
        assert_eq!(response.text().await.unwrap(), r#"{"error":"slow down"}"#);

        let request = server.first_request().await.unwrap();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path, "/v1/chat/completions");
        assert_eq!(request.header("authorization"), Some("Bearer sk-test"));
        assert_eq!(request.json().unwrap()["model"], "gpt-4o-mini");
    }

    #[tokio::test]
    async fn later_requests_get_the_same_reply() {
        let server = StubServer::start(StatusCode::OK, "[]").await.unwrap();
        let client = reqwest::Client::new();
        for path in ["/a", "/b"] {
            let response = client
                .get(format!("{}{path}", server.url()))
                .send()
                .await
                .unwrap();
            assert!(response.status().is_success());
        }
        assert_eq!(server.first_request().await.unwrap().path, "/a");
    }
}
