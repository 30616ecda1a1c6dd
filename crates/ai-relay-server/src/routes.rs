//! HTTP request handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::app::AppState;

/// Document served by `GET /`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Greeting {
    pub title: String,
    pub body: String,
}

/// Greeting document.
///
/// GET /
pub async fn root() -> Json<Greeting> {
    Json(Greeting {
        title: "Hello World".to_owned(),
        body: "This is Body".to_owned(),
    })
}

/// Greet by name.
///
/// GET /hello/{name}
pub async fn say_hello(Path(name): Path<String>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": format!("Hello {name}") }))
}

/// Insert request body.
#[derive(Debug, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub body: String,
}

/// Insert one post into the relational store.
///
/// POST /insert
pub async fn insert(
    State(state): State<AppState>,
    Json(post): Json<NewPost>,
) -> impl IntoResponse {
    match state.storage.insert(&post.title, &post.body).await {
        Ok(id) => (StatusCode::CREATED, Json(serde_json::json!({ "id": id }))),
        Err(e) => {
            error!("Failed to insert post: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
        }
    }
}
