use crate::{
    feedback::{record_feedback, Rating},
    joke::{JokeRequester, Language},
    model::LlmBackend,
    ui,
};
use axum::{
    extract::State,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Default, Deserialize)]
pub struct JokeReq {
    /// Absent and `null` both mean the default language.
    #[serde(default)]
    pub language: Option<Language>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JokeResp {
    pub joke: String,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackReq {
    pub rating: Rating,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FeedbackResp {
    pub message: String,
}

pub fn routes<B: LlmBackend>(requester: JokeRequester<B>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(|| async { "ok" }))
        .route("/api/joke", post(joke::<B>))
        .route("/api/feedback", post(feedback))
        .with_state(Arc::new(requester))
}

async fn index() -> Html<&'static str> {
    Html(ui::INDEX_HTML)
}

async fn joke<B: LlmBackend>(
    State(requester): State<Arc<JokeRequester<B>>>,
    Json(req): Json<JokeReq>,
) -> Json<JokeResp> {
    let joke = requester.request_joke(req.language.unwrap_or_default()).await;
    Json(JokeResp { joke })
}

async fn feedback(Json(req): Json<FeedbackReq>) -> impl IntoResponse {
    info!(rating = %req.rating, "feedback received");
    Json(FeedbackResp { message: record_feedback(req.rating) })
}
