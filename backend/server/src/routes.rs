use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use ledger::{Listing, NewRecipe, ReactionCounts, ReactionKind, Recipe, RecipeId, UserReaction};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{error::AppError, identity::Identity, state::State as AppState};

/// Any JSON object is accepted, a missing or non-string `reaction` is an invalid reaction.
#[derive(Deserialize)]
pub struct ReactionPayload {
    #[serde(default)]
    reaction: Value,
}

#[derive(Serialize)]
pub struct ReactionsResponse {
    reactions: ReactionCounts,
}

pub async fn list_handler(
    State(state): State<Arc<AppState>>,
    identity: Identity,
) -> Result<Json<Listing>, AppError> {
    Ok(Json(state.recipes.list(identity.user()).await?))
}

pub async fn create_handler(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    payload: Result<Json<NewRecipe>, JsonRejection>,
) -> Result<(StatusCode, Json<Recipe>), AppError> {
    identity.require()?;
    let Json(draft) = payload.map_err(|_| AppError::MalformedPayload)?;

    let recipe = state.recipes.create(draft).await?;

    Ok((StatusCode::CREATED, Json(recipe)))
}

pub async fn react_handler(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<String>,
    payload: Result<Json<ReactionPayload>, JsonRejection>,
) -> Result<Json<ReactionsResponse>, AppError> {
    let user = identity.require()?;
    let Json(payload) = payload.map_err(|_| AppError::MalformedPayload)?;

    let kind: ReactionKind = payload.reaction.as_str().unwrap_or_default().parse()?;
    let id: RecipeId = id.parse()?;

    let reactions = state.recipes.react(id, &user, kind).await?;

    Ok(Json(ReactionsResponse { reactions }))
}

pub async fn recommendations_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Recipe>>, AppError> {
    Ok(Json(state.recipes.recommendations().await?))
}

pub async fn user_reactions_handler(
    State(state): State<Arc<AppState>>,
    identity: Identity,
) -> Result<Json<Vec<UserReaction>>, AppError> {
    let user = identity.require()?;

    Ok(Json(state.recipes.user_reactions(&user).await?))
}
