//! Scriptable stand-in for the AMap API, used by tests.

use axum::{
    Router,
    extract::{Query, State},
    http::{StatusCode, Uri, header},
    response::IntoResponse,
};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::config::ClientConfig;

#[derive(Default)]
struct StubState {
    script: Mutex<VecDeque<(u16, String)>>,
    fallback: Mutex<(u16, String)>,
    delay: Mutex<Duration>,
    hits: AtomicUsize,
    last_path: Mutex<Option<String>>,
    last_query: Mutex<Option<HashMap<String, String>>>,
}

/// An HTTP server on `127.0.0.1:<random>` answering every path.
///
/// Responses queued with [`push`](Self::push) are served first, in order;
/// afterwards every request gets the fallback response.
pub(crate) struct StubUpstream {
    pub base_url: String,
    state: Arc<StubState>,
}

impl StubUpstream {
    pub async fn start(status: u16, body: &str) -> Self {
        let state = Arc::new(StubState::default());
        *state.fallback.lock().unwrap() = (status, body.to_string());

        let app = Router::new().fallback(handle).with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn push(&self, status: u16, body: &str) {
        self.state
            .script
            .lock()
            .unwrap()
            .push_back((status, body.to_string()));
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.state.delay.lock().unwrap() = delay;
    }

    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    pub fn last_path(&self) -> Option<String> {
        self.state.last_path.lock().unwrap().clone()
    }

    pub fn last_query(&self) -> Option<HashMap<String, String>> {
        self.state.last_query.lock().unwrap().clone()
    }

    /// Client settings pointing at this stub, without retry delay.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(&self.base_url, "test-key").with_retry_delay(Duration::ZERO)
    }
}

async fn handle(
    State(state): State<Arc<StubState>>,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    state.hits.fetch_add(1, Ordering::SeqCst);
    *state.last_path.lock().unwrap() = Some(uri.path().to_string());
    *state.last_query.lock().unwrap() = Some(query);

    let delay = *state.delay.lock().unwrap();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let scripted = state.script.lock().unwrap().pop_front();
    let (status, body) = scripted.unwrap_or_else(|| state.fallback.lock().unwrap().clone());

    (
        StatusCode::from_u16(status).unwrap(),
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
}
