//! One-shot redirect listener
//!
//! The provider finishes the authorization step by redirecting the user's
//! browser to `http://localhost:<port>/callback`. This module stands up an
//! ephemeral HTTP server for exactly that one request: the handler pulls the
//! `code` and `error` query parameters out of the redirect, pushes them
//! through a single-slot oneshot channel to the waiting flow, and answers
//! the browser with a bare 200 so the tab resolves.
//!
//! Lifecycle is one pass: bind, serve until the first callback or the
//! timeout, tear down. `await_callback` consumes the server, so a finished
//! listener cannot be reused, and every exit path releases the socket:
//! shutdown is graceful first, bounded by a grace period, with task abort
//! as the backstop.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::{Mutex, oneshot};
use tracing::{debug, warn};

use crate::constants::{CALLBACK_PATH, DEFAULT_SHUTDOWN_GRACE};
use crate::error::{Error, Result};

/// What the redirect carried. Under normal provider behavior exactly one
/// field is populated; a malformed callback leaves both empty, and the
/// result is delivered as-is for the caller to interpret.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CallbackResult {
    /// Authorization code, present when the user approved.
    #[serde(default)]
    pub code: String,
    /// Provider error string, present when authorization failed.
    #[serde(default)]
    pub error: String,
}

/// Single-slot handoff between the HTTP handler and the waiting flow. The
/// first callback takes the sender; later requests find the slot empty.
type CallbackSlot = Arc<Mutex<Option<oneshot::Sender<CallbackResult>>>>;

/// Ephemeral server for one authorization redirect.
pub struct CallbackServer {
    listener: TcpListener,
    addr: SocketAddr,
    grace: Duration,
}

impl CallbackServer {
    /// Bind the listener.
    ///
    /// An address already in use surfaces here as [`Error::ListenerBind`],
    /// before the flow wastes a browser round-trip on a callback that could
    /// never be received.
    pub async fn bind(addr: SocketAddr) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| Error::ListenerBind { addr, source })?;
        let addr = listener
            .local_addr()
            .map_err(|source| Error::ListenerBind { addr, source })?;
        Ok(Self {
            listener,
            addr,
            grace: DEFAULT_SHUTDOWN_GRACE,
        })
    }

    /// The bound address, with any port-zero request resolved.
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Override the shutdown grace bound.
    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    /// Serve until the first callback arrives or `timeout` elapses.
    ///
    /// Returns the delivered [`CallbackResult`], or
    /// [`Error::CallbackTimeout`] when the browser never called back. On
    /// both paths the server is shut down and the socket released before
    /// this returns, so a subsequent bind on the same port succeeds.
    pub async fn await_callback(self, timeout: Duration) -> Result<CallbackResult> {
        let CallbackServer {
            listener,
            addr,
            grace,
        } = self;

        let (result_tx, result_rx) = oneshot::channel();
        let slot: CallbackSlot = Arc::new(Mutex::new(Some(result_tx)));
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let app = build_callback_router(slot);
        let mut server = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        debug!(%addr, "callback listener waiting for redirect");
        let outcome = tokio::time::timeout(timeout, result_rx).await;

        // Tear down on every path so the port is never left held. The
        // graceful path drains the in-flight 200 to the browser; the abort
        // path bounds a shutdown that overruns the grace period.
        let _ = shutdown_tx.send(());
        match tokio::time::timeout(grace, &mut server).await {
            Ok(Ok(Ok(()))) => {}
            Ok(Ok(Err(e))) => warn!(%addr, error = %e, "callback listener exited with error"),
            Ok(Err(e)) => warn!(%addr, error = %e, "callback listener task failed"),
            Err(_) => {
                warn!(
                    %addr,
                    grace_secs = grace.as_secs(),
                    "graceful shutdown overran, aborting listener"
                );
                server.abort();
                let _ = server.await;
            }
        }

        match outcome {
            Ok(Ok(result)) => {
                debug!(%addr, "callback received");
                Ok(result)
            }
            Ok(Err(_)) => Err(Error::ListenerClosed),
            Err(_) => Err(Error::CallbackTimeout(timeout)),
        }
    }
}

/// Build the router serving the callback path.
fn build_callback_router(slot: CallbackSlot) -> Router {
    Router::new()
        .route(CALLBACK_PATH, get(handle_callback))
        .with_state(slot)
}

/// Deliver the first redirect through the slot and let the browser tab
/// resolve. Later requests (reloads, stray probes) still get a 200 but
/// cannot overwrite what was delivered.
async fn handle_callback(
    State(slot): State<CallbackSlot>,
    Query(result): Query<CallbackResult>,
) -> StatusCode {
    if let Some(tx) = slot.lock().await.take() {
        let _ = tx.send(result);
    }
    StatusCode::OK
}
