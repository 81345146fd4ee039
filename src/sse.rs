//! HTTP + Server-Sent Events transport.
//!
//! - `GET /sse` opens a session stream. The first event is `endpoint`, whose
//!   data is the URL to post messages to.
//! - `POST /messages/?session_id=...` accepts one JSON-RPC message and answers
//!   `202 Accepted`; the JSON-RPC response arrives as a `message` event on the
//!   session's stream.

use std::collections::HashMap;
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;
use uuid::Uuid;

use crate::error::Result;
use crate::server::{JsonRpcRequest, JsonRpcResponse, McpServer};

const SESSION_BUFFER: usize = 32;
const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);

type Sessions = Arc<RwLock<HashMap<String, mpsc::Sender<JsonRpcResponse>>>>;

#[derive(Clone)]
struct SseState {
    server: Arc<McpServer>,
    sessions: Sessions,
    shutdown: watch::Receiver<bool>,
}

/// Removes a session from the table once its stream is dropped.
struct SessionGuard {
    id: String,
    sessions: Sessions,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if let Ok(mut sessions) = self.sessions.write() {
            sessions.remove(&self.id);
        }
        tracing::info!(session_id = %self.id, "SSE session closed");
    }
}

#[derive(Debug, Deserialize)]
struct MessageParams {
    session_id: Option<String>,
}

/// Build the SSE router for a server.
///
/// Session streams stay open until the client disconnects.
pub fn router(server: Arc<McpServer>) -> Router {
    let (_never, shutdown) = watch::channel(false);
    router_with_shutdown(server, shutdown)
}

/// Build the SSE router; every session stream ends once `shutdown` turns true.
pub fn router_with_shutdown(server: Arc<McpServer>, shutdown: watch::Receiver<bool>) -> Router {
    let state = SseState {
        server,
        sessions: Arc::new(RwLock::new(HashMap::new())),
        shutdown,
    };

    Router::new()
        .route("/sse", get(sse_handler))
        .route("/messages/", post(message_handler))
        .route("/messages", post(message_handler))
        .with_state(state)
}

/// Listen on `addr` and serve the SSE transport until Ctrl-C / SIGTERM.
pub async fn serve(server: Arc<McpServer>, addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Mobi MCP server listening on http://{}/sse", addr);
    serve_until(listener, server, shutdown_signal()).await
}

/// Serve the SSE transport on `listener` until `signal` completes.
///
/// Open session streams are closed when the signal fires, so shutdown does
/// not wait for clients to hang up.
pub async fn serve_until<F>(
    listener: TcpListener,
    server: Arc<McpServer>,
    signal: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let app = router_with_shutdown(server, shutdown_rx);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            signal.await;
            let _ = shutdown_tx.send(true);
        })
        .await?;
    Ok(())
}

/// Resolves once shutdown is requested. A dropped sender means it never will be.
async fn shutdown_requested(mut shutdown: watch::Receiver<bool>) {
    loop {
        let requested = *shutdown.borrow_and_update();
        if requested {
            return;
        }
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

async fn sse_handler(
    State(state): State<SseState>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let session_id = Uuid::new_v4().simple().to_string();
    let (tx, rx) = mpsc::channel(SESSION_BUFFER);

    if let Ok(mut sessions) = state.sessions.write() {
        sessions.insert(session_id.clone(), tx);
    }
    tracing::info!(session_id = %session_id, "SSE session opened");

    let endpoint = Event::default()
        .event("endpoint")
        .data(format!("/messages/?session_id={}", session_id));

    let guard = SessionGuard {
        id: session_id,
        sessions: state.sessions.clone(),
    };

    let messages = ReceiverStream::new(rx).filter_map(move |response| {
        let _guard = &guard;
        match serde_json::to_string(&response) {
            Ok(json) => Some(Ok::<_, Infallible>(
                Event::default().event("message").data(json),
            )),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize response");
                None
            }
        }
    });

    let stream = tokio_stream::once(Ok::<_, Infallible>(endpoint)).chain(messages);
    let stream =
        futures::StreamExt::take_until(stream, shutdown_requested(state.shutdown.clone()));

    Sse::new(stream).keep_alive(KeepAlive::new().interval(KEEP_ALIVE_INTERVAL))
}

async fn message_handler(
    State(state): State<SseState>,
    Query(params): Query<MessageParams>,
    body: String,
) -> Response {
    let Some(session_id) = params.session_id else {
        return (StatusCode::BAD_REQUEST, "session_id is required").into_response();
    };

    let sender = state
        .sessions
        .read()
        .ok()
        .and_then(|sessions| sessions.get(&session_id).cloned());
    let Some(sender) = sender else {
        return (StatusCode::NOT_FOUND, "Could not find session").into_response();
    };

    let request: JsonRpcRequest = match serde_json::from_str(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(session_id = %session_id, error = %e, "Unparseable message");
            return (StatusCode::BAD_REQUEST, format!("Could not parse message: {}", e))
                .into_response();
        }
    };

    let server = state.server.clone();
    tokio::spawn(async move {
        if let Some(response) = server.handle_request(request).await {
            if sender.send(response).await.is_err() {
                tracing::debug!(session_id = %session_id, "Session closed before response was delivered");
            }
        }
    });

    (StatusCode::ACCEPTED, "Accepted").into_response()
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {},
                    _ = sigterm.recv() => {},
                }
            }
            Err(_) => {
                ctrl_c.await.ok();
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
    }
    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
