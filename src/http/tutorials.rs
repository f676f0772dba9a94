//! Tutorial CRUD handlers mounted under `/api/tutorials`.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::http::request::JsonOrForm;
use crate::http::response::{ApiError, Message};
use crate::http::server::AppState;
use crate::models::{Tutorial, TutorialInput};

/// Query string of `GET /api/tutorials`.
#[derive(Debug, Default, Deserialize)]
pub struct TitleFilter {
    pub title: Option<String>,
}

/// Routes for the tutorials collection.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/tutorials",
            get(find_all).post(create).delete(delete_all),
        )
        .route("/api/tutorials/published", get(find_all_published))
        .route(
            "/api/tutorials/{id}",
            get(find_one).put(update).delete(delete),
        )
}

fn parse_id(id: &str) -> Option<Uuid> {
    Uuid::parse_str(id).ok()
}

pub async fn create(
    State(state): State<AppState>,
    JsonOrForm(input): JsonOrForm<TutorialInput>,
) -> Result<Json<Tutorial>, ApiError> {
    let tutorial = input.into_tutorial().ok_or(ApiError::EmptyContent)?;
    let tutorial = state.db.tutorials.insert(tutorial);
    tracing::info!(id = %tutorial.id, "Tutorial created");
    Ok(Json(tutorial))
}

pub async fn find_all(
    State(state): State<AppState>,
    Query(filter): Query<TitleFilter>,
) -> Json<Vec<Tutorial>> {
    let tutorials = match filter.title.as_deref() {
        Some(title) => state.db.tutorials.find(|t| t.title_contains(title)),
        None => state.db.tutorials.find_all(),
    };
    Json(tutorials)
}

pub async fn find_all_published(State(state): State<AppState>) -> Json<Vec<Tutorial>> {
    Json(state.db.tutorials.find(|t| t.published))
}

pub async fn find_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Tutorial>, ApiError> {
    parse_id(&id)
        .and_then(|uuid| state.db.tutorials.find_by_id(&uuid))
        .map(Json)
        .ok_or(ApiError::NotFound(id))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonOrForm(input): JsonOrForm<TutorialInput>,
) -> Result<Message, ApiError> {
    if input.is_empty() {
        return Err(ApiError::EmptyUpdate);
    }

    let uuid = parse_id(&id).ok_or_else(|| ApiError::UpdateMissing(id.clone()))?;
    state
        .db
        .tutorials
        .update(&uuid, |t| t.apply(input))
        .ok_or(ApiError::UpdateMissing(id))?;

    tracing::info!(id = %uuid, "Tutorial updated");
    Ok(Message::new("Tutorial was updated successfully."))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Message, ApiError> {
    let uuid = parse_id(&id).ok_or_else(|| ApiError::DeleteMissing(id.clone()))?;
    state
        .db
        .tutorials
        .delete(&uuid)
        .ok_or(ApiError::DeleteMissing(id))?;

    tracing::info!(id = %uuid, "Tutorial deleted");
    Ok(Message::new("Tutorial was deleted successfully!"))
}

pub async fn delete_all(State(state): State<AppState>) -> Message {
    let count = state.db.tutorials.delete_all();
    tracing::info!(count, "All tutorials deleted");
    Message::new(format!("{} Tutorials were deleted successfully!", count))
}
