//! Item endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stallctl_core::money;

use crate::db::repos::{Id, Item, ItemRepo, ItemUpdate};
use crate::http::error::ApiError;
use crate::http::extractors::{CurrentUser, ValidJson, ValidPath, ValidQuery};
use crate::http::server::AppState;
use crate::models::{Amount, BundleSize, ItemName};

/// Create item request
#[derive(Deserialize)]
pub struct CreateItemRequest {
    pub name: String,
    pub bundle_size: Option<i32>,
    pub bundle_price: Decimal,
}

#[derive(Deserialize, Default)]
pub struct ListItemsQuery {
    /// Only items still on sale
    #[serde(default)]
    pub active: bool,
}

/// Partial update request; omitted fields are unchanged
#[derive(Deserialize, Default)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub bundle_size: Option<i32>,
    pub bundle_price: Option<Decimal>,
    pub is_active: Option<bool>,
}

impl UpdateItemRequest {
    fn validate(self) -> Result<ItemUpdate, ApiError> {
        Ok(ItemUpdate {
            name: self.name.as_deref().map(ItemName::new).transpose()?,
            bundle_size: self.bundle_size.map(BundleSize::new).transpose()?,
            bundle_price: self
                .bundle_price
                .map(|p| Amount::new("bundle price", p))
                .transpose()?,
            is_active: self.is_active,
        })
    }
}

/// Item response
#[derive(Serialize)]
pub struct ItemResponse {
    pub id: Id,
    pub name: String,
    pub bundle_size: i32,
    pub bundle_price: Decimal,
    #[serde(serialize_with = "money::serialize")]
    pub unit_price: Decimal,
    pub is_active: bool,
    pub created_at: String,
}

impl TryFrom<Item> for ItemResponse {
    type Error = ApiError;

    fn try_from(item: Item) -> Result<Self, Self::Error> {
        let unit_price = item.pricing()?.unit_price();
        Ok(Self {
            id: item.id,
            name: item.name,
            bundle_size: item.bundle_size,
            bundle_price: item.bundle_price,
            unit_price,
            is_active: item.is_active,
            created_at: item.created_at.to_rfc3339(),
        })
    }
}

/// GET /items?active=true - all items, or only active ones
async fn list_items(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ValidQuery(query): ValidQuery<ListItemsQuery>,
) -> Result<Json<Vec<ItemResponse>>, ApiError> {
    let repo = ItemRepo::new(&state.pool);
    let items = if query.active {
        repo.list_active(user.id).await?
    } else {
        repo.list(user.id).await?
    };
    let items = items
        .into_iter()
        .map(ItemResponse::try_from)
        .collect::<Result<_, _>>()?;
    Ok(Json(items))
}

/// POST /items - create an item (bundle size defaults to 3)
async fn create_item(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ValidJson(req): ValidJson<CreateItemRequest>,
) -> Result<(StatusCode, Json<ItemResponse>), ApiError> {
    let name = ItemName::new(&req.name)?;
    let bundle_size = req
        .bundle_size
        .map(BundleSize::new)
        .transpose()?
        .unwrap_or_default();
    let bundle_price = Amount::new("bundle price", req.bundle_price)?;

    let item = ItemRepo::new(&state.pool)
        .create(user.id, &name, bundle_size, bundle_price)
        .await?;

    Ok((StatusCode::CREATED, Json(item.try_into()?)))
}

/// PATCH /items/{id} - rename, reprice, activate or deactivate
async fn update_item(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ValidPath(item_id): ValidPath<Id>,
    ValidJson(req): ValidJson<UpdateItemRequest>,
) -> Result<Json<ItemResponse>, ApiError> {
    let update = req.validate()?;
    let item = ItemRepo::new(&state.pool)
        .update(user.id, item_id, update)
        .await?;
    Ok(Json(item.try_into()?))
}

/// Item routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route("/items/{id}", patch(update_item))
}
