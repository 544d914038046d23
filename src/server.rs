//! Webhook HTTP server.
//!
//! Telegram POSTs updates to `/webhook`; every update is decoded, run through
//! the [`Dispatcher`] and the resulting reply is delivered before responding.
//! `/setup_webhook` and `/get_webhook_info` manage the registration.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use crate::dispatcher::{Dispatcher, InboundUpdate, ReplyAction};
use crate::platform::{telegram, PlatformClient};

const INVALID_UPDATE: &str = "Invalid update received";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Internal(err) => (StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", err)),
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

/// Shared state, cloned into every handler
#[derive(Clone)]
pub struct AppState {
    dispatcher: Dispatcher,
    platform: Arc<dyn PlatformClient>,
    webhook_url: Option<String>,
}

impl AppState {
    pub fn new(
        dispatcher: Dispatcher,
        platform: Arc<dyn PlatformClient>,
        webhook_url: Option<String>,
    ) -> Self {
        Self {
            dispatcher,
            platform,
            webhook_url,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/webhook", post(webhook))
        .route("/setup_webhook", get(setup_webhook))
        .route("/get_webhook_info", get(get_webhook_info))
        .with_state(state)
}

/// Bind and serve until Ctrl-C
pub async fn serve(state: AppState, addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    info!("Listening on http://{}", addr);
    info!("  POST /webhook          - Telegram updates");
    info!("  GET  /setup_webhook    - Register webhook URL");
    info!("  GET  /get_webhook_info - Current webhook registration");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await
        .context("Server error")?;

    Ok(())
}

async fn root() -> Json<Value> {
    Json(json!({ "status": "Bot is running!" }))
}

async fn webhook(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>, ApiError> {
    let update = telegram::decode_update(&body).map_err(|e| {
        warn!("Rejected webhook body: {:#}", e);
        ApiError::BadRequest(INVALID_UPDATE.to_string())
    })?;

    info!("Received {} update", update.kind());
    if let InboundUpdate::DirectMessage { chat_id, text } = &update {
        debug!("Message in chat {}: {}", chat_id, text);
    }

    let action = state.dispatcher.dispatch(update);
    if action == ReplyAction::NoAction {
        warn!("Update carried neither a text message nor an inline query");
        return Err(ApiError::BadRequest(INVALID_UPDATE.to_string()));
    }

    if let Err(e) = state.platform.send(&action).await {
        error!("Failed to deliver reply: {:#}", e);
        return Err(e.into());
    }

    Ok(Json(json!({ "status": "ok" })))
}

async fn setup_webhook(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let url = state
        .webhook_url
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("Webhook URL not configured".to_string()))?;

    if let Err(e) = state.platform.set_webhook(url).await {
        error!("Failed to register webhook: {:#}", e);
        return Err(e.into());
    }

    Ok(Json(json!({
        "message": format!("Webhook setup response: webhook set to {}", url)
    })))
}

async fn get_webhook_info(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let info = state.platform.webhook_info().await?;
    Ok(Json(info))
}
