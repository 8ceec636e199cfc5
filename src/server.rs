use std::sync::Arc;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::error::{Result, HonyakuError};
use crate::translate::{TranslationResult, Translator};

#[derive(Clone)]
pub struct AppState {
    pub translator: Arc<Translator>,
}

impl AppState {
    pub fn new(translator: Translator) -> Self {
        Self {
            translator: Arc::new(translator),
        }
    }
}

/// Body of `POST /translate`
#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    #[serde(default)]
    pub content: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/translate", post(translate))
        .route("/health", get(health_check))
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped
pub async fn serve(translator: Translator, addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| HonyakuError::Server(format!("Failed to bind {}: {}", addr, e)))?;

    info!(
        "Translate service listening on {} (demo mode: {})",
        addr,
        translator.is_demo()
    );

    axum::serve(listener, router(AppState::new(translator))).await?;

    Ok(())
}

async fn translate(
    State(state): State<AppState>,
    Json(request): Json<TranslateRequest>,
) -> Json<TranslationResult> {
    let request_id = Uuid::new_v4();
    info!(%request_id, chars = request.content.chars().count(), "Translate request");

    let result = state.translator.translate(&request.content).await;

    info!(%request_id, is_english = result.is_english, "Translate response");
    Json(result)
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "demo_mode": state.translator.is_demo()
    }))
}
