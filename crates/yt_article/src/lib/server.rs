use std::{sync::Arc, time::Duration};

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    llm::generator::TextGenerator,
    types::{ArticleRequest, ArticleResult},
    yt::TranscriptSource,
    ArticlePipeline,
};

pub struct AppState<S, G>
where
    S: TranscriptSource + Send + Sync + 'static,
    G: TextGenerator + Send + Sync + 'static,
{
    pipeline: Arc<ArticlePipeline<S, G>>,
    request_timeout: Duration,
}

impl<S, G> AppState<S, G>
where
    S: TranscriptSource + Send + Sync + 'static,
    G: TextGenerator + Send + Sync + 'static,
{
    pub fn new(pipeline: ArticlePipeline<S, G>, request_timeout: Duration) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            request_timeout,
        }
    }
}

impl<S, G> Clone for AppState<S, G>
where
    S: TranscriptSource + Send + Sync + 'static,
    G: TextGenerator + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
            request_timeout: self.request_timeout,
        }
    }
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
}

pub fn build_router<S, G>(state: AppState<S, G>) -> Router
where
    S: TranscriptSource + Send + Sync + 'static,
    G: TextGenerator + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/generate_article", post(generate_article::<S, G>))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn generate_article<S, G>(
    State(state): State<AppState<S, G>>,
    Json(request): Json<ArticleRequest>,
) -> impl IntoResponse
where
    S: TranscriptSource + Send + Sync + 'static,
    G: TextGenerator + Send + Sync + 'static,
{
    match tokio::time::timeout(state.request_timeout, state.pipeline.run_request(&request)).await {
        Ok(result @ ArticleResult::Article { .. }) => (StatusCode::OK, Json(result)),
        Ok(result @ ArticleResult::Error { .. }) => (StatusCode::INTERNAL_SERVER_ERROR, Json(result)),
        Err(_) => {
            tracing::warn!(
                video_id = %request.video_id,
                timeout_secs = state.request_timeout.as_secs(),
                "Request timed out"
            );
            (
                StatusCode::GATEWAY_TIMEOUT,
                Json(ArticleResult::Error {
                    error: format!(
                        "Request timed out after {}s",
                        state.request_timeout.as_secs()
                    ),
                }),
            )
        }
    }
}
