// In-process stand-in for the remote chatbot.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::{
    Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

#[derive(Clone, Debug)]
pub enum Behavior {
    Reply(serde_json::Value),
    Status(StatusCode, &'static str),
    Raw(&'static str),
    Delay(Duration, serde_json::Value),
}

#[derive(Clone, Debug)]
pub struct Received {
    pub body: String,
    pub content_type: Option<String>,
}

pub struct MockChatbot {
    pub addr: SocketAddr,
    state: Arc<MockState>,
}

struct MockState {
    behavior: Behavior,
    hits: AtomicUsize,
    completed: AtomicUsize,
    abandoned: AtomicUsize,
    received: Mutex<Vec<Received>>,
}

// Counts a delayed handler as abandoned if it is dropped before finishing.
struct InFlight<'a> {
    state: &'a MockState,
    finished: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let counter = if self.finished {
            &self.state.completed
        } else {
            &self.state.abandoned
        };
        counter.fetch_add(1, Ordering::SeqCst);
    }
}

impl MockChatbot {
    /// Serves `POST {prefix}/chatbot` on an ephemeral local port.
    pub async fn start(prefix: &str, behavior: Behavior) -> Self {
        let state = Arc::new(MockState {
            behavior,
            hits: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
            abandoned: AtomicUsize::new(0),
            received: Mutex::new(Vec::new()),
        });

        let routes = Router::new()
            .route("/chatbot", post(chatbot_handler))
            .with_state(state.clone());
        let app = if prefix.is_empty() {
            routes
        } else {
            Router::new().nest(prefix, routes)
        };
        let app = app.layer(TraceLayer::new_for_http());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn base_url(&self, prefix: &str) -> String {
        format!("http://{}{}", self.addr, prefix)
    }

    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    /// Delayed handlers that ran to the end.
    pub fn completed(&self) -> usize {
        self.state.completed.load(Ordering::SeqCst)
    }

    /// Delayed handlers dropped early because the client went away.
    pub fn abandoned(&self) -> usize {
        self.state.abandoned.load(Ordering::SeqCst)
    }

    pub async fn received(&self) -> Vec<Received> {
        self.state.received.lock().await.clone()
    }
}

/// An address nothing is listening on.
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Answers every connection with a 500 whose body ends early.
pub async fn truncated_error_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                // Drain the request so closing sends a FIN rather than a reset.
                let mut buf = [0u8; 4096];
                while let Ok(Ok(n)) =
                    tokio::time::timeout(Duration::from_millis(100), socket.read(&mut buf)).await
                {
                    if n == 0 {
                        break;
                    }
                }
                let _ = socket
                    .write_all(
                        b"HTTP/1.1 500 Internal Server Error\r\n\
                          content-length: 100\r\n\
                          connection: close\r\n\r\n\
                          partial",
                    )
                    .await;
                let _ = socket.shutdown().await;
            });
        }
    });
    format!("http://{}", addr)
}

async fn chatbot_handler(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    state.received.lock().await.push(Received {
        body,
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });

    match &state.behavior {
        Behavior::Reply(json) => axum::Json(json.clone()).into_response(),
        Behavior::Status(status, body) => (*status, *body).into_response(),
        Behavior::Raw(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            *body,
        )
            .into_response(),
        Behavior::Delay(delay, json) => {
            let mut in_flight = InFlight {
                state: &state,
                finished: false,
            };
            tokio::time::sleep(*delay).await;
            in_flight.finished = true;
            axum::Json(json.clone()).into_response()
        }
    }
}
