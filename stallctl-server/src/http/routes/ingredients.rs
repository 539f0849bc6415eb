//! Ingredient endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::db::repos::{Id, Ingredient, IngredientRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{CurrentUser, ValidJson, ValidPath};
use crate::http::server::AppState;
use crate::models::{Amount, IngredientName};

#[derive(Deserialize)]
pub struct CreateIngredientRequest {
    pub name: String,
    pub cost_per_gram: Decimal,
}

#[derive(Deserialize)]
pub struct UpdateIngredientRequest {
    pub name: Option<String>,
    pub cost_per_gram: Option<Decimal>,
}

#[derive(Serialize)]
pub struct IngredientResponse {
    pub id: Id,
    pub name: String,
    pub cost_per_gram: Decimal,
    pub created_at: String,
}

impl From<Ingredient> for IngredientResponse {
    fn from(i: Ingredient) -> Self {
        Self {
            id: i.id,
            name: i.name,
            cost_per_gram: i.cost_per_gram,
            created_at: i.created_at.to_rfc3339(),
        }
    }
}

/// GET /ingredients
async fn list_ingredients(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> Result<Json<Vec<IngredientResponse>>, ApiError> {
    let ingredients = IngredientRepo::new(&state.pool).list(user.id).await?;
    Ok(Json(ingredients.into_iter().map(Into::into).collect()))
}

/// POST /ingredients
async fn create_ingredient(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ValidJson(req): ValidJson<CreateIngredientRequest>,
) -> Result<(StatusCode, Json<IngredientResponse>), ApiError> {
    let name = IngredientName::new(&req.name)?;
    let cost_per_gram = Amount::new("cost per gram", req.cost_per_gram)?;

    let ingredient = IngredientRepo::new(&state.pool)
        .create(user.id, &name, cost_per_gram)
        .await?;
    tracing::info!(user_id = user.id, ingredient = name.as_str(), "ingredient created");

    Ok((StatusCode::CREATED, Json(ingredient.into())))
}

/// PATCH /ingredients/{id}
async fn update_ingredient(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ValidPath(ingredient_id): ValidPath<Id>,
    ValidJson(req): ValidJson<UpdateIngredientRequest>,
) -> Result<Json<IngredientResponse>, ApiError> {
    let name = req.name.as_deref().map(IngredientName::new).transpose()?;
    let cost_per_gram = req
        .cost_per_gram
        .map(|c| Amount::new("cost per gram", c))
        .transpose()?;

    let ingredient = IngredientRepo::new(&state.pool)
        .update(user.id, ingredient_id, name.as_ref(), cost_per_gram)
        .await?;
    Ok(Json(ingredient.into()))
}

/// Ingredient routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ingredients", get(list_ingredients).post(create_ingredient))
        .route("/ingredients/{id}", patch(update_ingredient))
}
