//! Recipe endpoints
//!
//! Recipes are listed per item together with the per-unit cost breakdown
//! the stall owner uses to set prices.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stallctl_core::money;

use crate::db::repos::{CostEntry, Id, RecipeComponent, RecipeRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{CurrentUser, ValidJson, ValidPath};
use crate::http::server::AppState;
use crate::models::Amount;

#[derive(Deserialize)]
pub struct UpsertComponentRequest {
    pub item_id: Id,
    pub ingredient_id: Id,
    pub grams_per_unit: Decimal,
}

#[derive(Serialize)]
pub struct ComponentResponse {
    pub item_id: Id,
    pub ingredient_id: Id,
    pub ingredient_name: String,
    pub grams_per_unit: Decimal,
    pub cost_per_gram: Decimal,
    #[serde(serialize_with = "money::serialize")]
    pub cost_per_unit: Decimal,
}

impl From<RecipeComponent> for ComponentResponse {
    fn from(c: RecipeComponent) -> Self {
        Self {
            cost_per_unit: c.cost_per_unit(),
            item_id: c.item_id,
            ingredient_id: c.ingredient_id,
            ingredient_name: c.ingredient_name,
            grams_per_unit: c.grams_per_unit,
            cost_per_gram: c.cost_per_gram,
        }
    }
}

/// One item with its recipe and unit economics
#[derive(Serialize)]
pub struct RecipeResponse {
    pub item_id: Id,
    pub item_name: String,
    pub is_active: bool,
    #[serde(serialize_with = "money::serialize")]
    pub unit_price: Decimal,
    #[serde(serialize_with = "money::serialize")]
    pub material_cost_per_unit: Decimal,
    #[serde(serialize_with = "money::serialize")]
    pub margin_per_unit: Decimal,
    pub components: Vec<ComponentResponse>,
}

impl From<&CostEntry> for RecipeResponse {
    fn from(entry: &CostEntry) -> Self {
        Self {
            item_id: entry.item.id,
            item_name: entry.item.name.clone(),
            is_active: entry.item.is_active,
            unit_price: entry.model.pricing.unit_price(),
            material_cost_per_unit: entry.model.material_cost_per_unit(),
            margin_per_unit: entry.model.margin_per_unit(),
            components: entry.components.iter().cloned().map(Into::into).collect(),
        }
    }
}

/// GET /recipes - every item with its components
async fn list_recipes(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> Result<Json<Vec<RecipeResponse>>, ApiError> {
    let book = RecipeRepo::new(&state.pool).cost_book(user.id).await?;
    Ok(Json(book.entries().iter().map(RecipeResponse::from).collect()))
}

/// PUT /recipes - set grams of an ingredient per unit of an item
async fn upsert_component(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ValidJson(req): ValidJson<UpsertComponentRequest>,
) -> Result<Json<ComponentResponse>, ApiError> {
    let grams = Amount::new("grams per unit", req.grams_per_unit)?;
    let component = RecipeRepo::new(&state.pool)
        .upsert(user.id, req.item_id, req.ingredient_id, grams)
        .await?;
    Ok(Json(component.into()))
}

/// DELETE /recipes/{item_id}/{ingredient_id}
async fn remove_component(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ValidPath((item_id, ingredient_id)): ValidPath<(Id, Id)>,
) -> Result<StatusCode, ApiError> {
    RecipeRepo::new(&state.pool)
        .remove(user.id, item_id, ingredient_id)
        .await?;
    tracing::info!(user_id = user.id, item_id, ingredient_id, "recipe component removed");
    Ok(StatusCode::NO_CONTENT)
}

/// Recipe routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/recipes", get(list_recipes).put(upsert_component))
        .route("/recipes/{item_id}/{ingredient_id}", delete(remove_component))
}
