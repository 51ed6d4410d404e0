//! HTTP API server for integration with other systems.
//!
//! Exposes the summarization pipeline over REST.

use crate::catalog::VideoRecord;
use crate::cli::Output;
use crate::config::Settings;
use crate::error::VidsumError;
use crate::orchestrator::Orchestrator;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Shared application state.
struct AppState {
    orchestrator: Orchestrator,
}

/// Run the HTTP API server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    let orchestrator = Orchestrator::new(settings)?;

    let state = Arc::new(AppState { orchestrator });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/videos/{video_id}", get(get_video))
        .route("/videos/{video_id}/summary", get(get_summary))
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Vidsum API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET /health");
    Output::kv("Video Details", "GET /videos/:video_id");
    Output::kv("Summary", "GET /videos/:video_id/summary");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

// === Response Types ===

#[derive(Serialize)]
struct VideoResponse {
    external_id: String,
    title: String,
    description: String,
    thumbnail_url: String,
    channel_title: String,
    published_at: DateTime<Utc>,
    view_count: u64,
    like_count: u64,
    duration: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
}

impl From<VideoRecord> for VideoResponse {
    fn from(record: VideoRecord) -> Self {
        Self {
            external_id: record.external_id,
            title: record.title,
            description: record.description,
            thumbnail_url: record.thumbnail_url,
            channel_title: record.channel_title,
            published_at: record.published_at,
            view_count: record.view_count,
            like_count: record.like_count,
            duration: record.duration,
            summary: record.summary,
        }
    }
}

#[derive(Serialize)]
struct SummaryResponse {
    summary: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(err: VidsumError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &err {
        VidsumError::NotFound(_) => StatusCode::NOT_FOUND,
        VidsumError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        VidsumError::TranscriptUnavailable(_) | VidsumError::Summarization(_) => {
            StatusCode::BAD_GATEWAY
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let message = match &err {
        VidsumError::NotFound(_) => "Video not found".to_string(),
        VidsumError::TranscriptUnavailable(_) | VidsumError::Summarization(_) => {
            "Failed to summarize video".to_string()
        }
        e => e.to_string(),
    };

    (status, Json(ErrorResponse { error: message }))
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn get_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
) -> impl IntoResponse {
    match state.orchestrator.get_video(&video_id).await {
        Ok(record) => Json(VideoResponse::from(record)).into_response(),
        Err(e) => error_response(e).into_response(),
    }
}

async fn get_summary(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
) -> impl IntoResponse {
    match state.orchestrator.summarize(&video_id).await {
        Ok(outcome) => Json(SummaryResponse {
            summary: outcome.summary,
        })
        .into_response(),
        Err(e) => error_response(e).into_response(),
    }
}
