//! In-process HTTP server that records every request it receives.
//!
//! Stands in for the vendor API and the identity service in tests. Responses
//! are registered per method and path; anything unregistered gets a 404.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Clone, Default)]
pub struct MockServer {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    routes: Arc<Mutex<HashMap<(Method, String), (StatusCode, String)>>>,
}

impl MockServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, method: Method, path: &str, status: u16, body: &str) -> Self {
        self.routes.lock().unwrap().insert(
            (method, path.to_string()),
            (StatusCode::from_u16(status).unwrap(), body.to_string()),
        );
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Bind to an ephemeral port and serve in the background.
    pub async fn spawn(&self) -> (String, tokio::task::JoinHandle<()>) {
        let app = Router::new().fallback(record).with_state(self.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (url, handle)
    }
}

async fn record(
    State(server): State<MockServer>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    server.requests.lock().unwrap().push(RecordedRequest {
        method: method.clone(),
        path: uri.path().to_string(),
        authorization: header_value(header::AUTHORIZATION),
        content_type: header_value(header::CONTENT_TYPE),
        body,
    });

    server
        .routes
        .lock()
        .unwrap()
        .get(&(method, uri.path().to_string()))
        .cloned()
        .unwrap_or((StatusCode::NOT_FOUND, "not found".to_string()))
}
