use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::db::models::{CharacterClass, Outcome};
use crate::error::AppResult;
use crate::extractors::{CurrentUser, ValidatedJson, ValidatedPath};
use crate::game::{CreateCharacterRequest, CreatedCharacter, RecordOutcomeRequest};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/game/create", post(create_character))
        .route("/api/class/{id}", get(show_class))
        .route("/api/outcome", post(record_outcome))
}

/// POST /api/game/create — first step of the creation form
async fn create_character(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(req): ValidatedJson<CreateCharacterRequest>,
) -> AppResult<(StatusCode, Json<CreatedCharacter>)> {
    let created = state.characters.create(user.id, &req).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/class/{id} — base stats for attribute resolution
async fn show_class(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<i64>,
) -> AppResult<Json<CharacterClass>> {
    Ok(Json(state.characters.class(id).await?))
}

/// POST /api/outcome
async fn record_outcome(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(req): ValidatedJson<RecordOutcomeRequest>,
) -> AppResult<(StatusCode, Json<Outcome>)> {
    let outcome = state
        .characters
        .record_outcome(user.id, &req.name, &req.description)
        .await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}
