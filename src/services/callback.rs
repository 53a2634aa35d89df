// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! One-shot localhost listener for the OAuth redirect.
//!
//! Strava redirects the user's browser back to `http://localhost:<port>`
//! with the authorization code in the query string. We serve exactly one
//! request: the handler hands the code to a oneshot channel, the waiter
//! races that channel against a deadline, and the server is torn down
//! either way.

use crate::error::{AppError, Result};
use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{oneshot, Mutex};

const CONFIRMATION_PAGE: &str =
    "<h1>Authorization received! You can close this window.</h1>";

type CodeSender = Arc<Mutex<Option<oneshot::Sender<Result<String>>>>>;

/// Redirect parameters Strava appends to the callback URL.
#[derive(Debug, Deserialize)]
struct CallbackParams {
    code: Option<String>,
    error: Option<String>,
}

/// Bind the redirect port and wait for the user to complete authorization
/// in the browser, up to `timeout`.
pub async fn wait_for_authorization_code(port: u16, timeout: Duration) -> Result<String> {
    let listener = TcpListener::bind(("127.0.0.1", port)).await.map_err(|e| {
        AppError::Auth(format!("Failed to bind callback listener on port {port}: {e}"))
    })?;
    receive_code(listener, timeout).await
}

/// Serve the listener until one callback arrives or the deadline passes.
pub(crate) async fn receive_code(listener: TcpListener, timeout: Duration) -> Result<String> {
    let (tx, rx) = oneshot::channel();
    let sender: CodeSender = Arc::new(Mutex::new(Some(tx)));

    let app = Router::new()
        .route("/", get(handle_callback))
        .with_state(sender);

    let server = tokio::spawn(async move { axum::serve(listener, app).await });

    let outcome = match tokio::time::timeout(timeout, rx).await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(_)) => Err(AppError::Auth(
            "Callback listener closed before a code arrived".to_string(),
        )),
        Err(_) => Err(AppError::Auth(
            "Interactive authorization timed out waiting for the browser callback".to_string(),
        )),
    };

    server.abort();
    outcome
}

async fn handle_callback(
    State(sender): State<CodeSender>,
    Query(params): Query<CallbackParams>,
) -> Html<&'static str> {
    let outcome = match (params.code, params.error) {
        (Some(code), _) => Ok(code),
        (None, Some(error)) => Err(AppError::Auth(format!("Authorization denied: {error}"))),
        (None, None) => Err(AppError::Auth(
            "Callback arrived without an authorization code".to_string(),
        )),
    };

    // Only the first request completes the flow; later hits still get the
    // confirmation page.
    if let Some(tx) = sender.lock().await.take() {
        let _ = tx.send(outcome);
    }

    Html(CONFIRMATION_PAGE)
}
