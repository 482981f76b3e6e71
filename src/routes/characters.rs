use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use crate::db::models::{Character, CharacterDetail};
use crate::error::AppResult;
use crate::extractors::{ValidatedJson, ValidatedPath};
use crate::game::{AddQuestRequest, UpdateAttributesRequest};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Message {
    pub message: &'static str,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/character", get(list))
        .route("/api/character/addquest", post(add_quest))
        .route("/api/character/update/{id}", post(update))
        .route("/api/character/{id}", get(show).delete(destroy))
}

/// GET /api/character
async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Character>>> {
    Ok(Json(state.characters.list().await?))
}

/// GET /api/character/{id} — character with quests and class name
async fn show(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<i64>,
) -> AppResult<Json<CharacterDetail>> {
    Ok(Json(state.characters.get(id).await?))
}

/// POST /api/character/addquest
async fn add_quest(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<AddQuestRequest>,
) -> AppResult<Json<Message>> {
    state
        .characters
        .associate_quest(req.character_id, req.quest_id)
        .await?;
    Ok(Json(Message {
        message: "Association created successfully",
    }))
}

/// POST /api/character/update/{id} — full overwrite of the six stats
async fn update(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<i64>,
    ValidatedJson(req): ValidatedJson<UpdateAttributesRequest>,
) -> AppResult<Json<Character>> {
    Ok(Json(
        state.characters.update_attributes(id, req.into()).await?,
    ))
}

/// DELETE /api/character/{id}
async fn destroy(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<i64>,
) -> AppResult<Json<Message>> {
    state.characters.delete(id).await?;
    Ok(Json(Message {
        message: "Character deleted successfully",
    }))
}
