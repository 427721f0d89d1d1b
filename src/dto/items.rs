use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Item;

/// `Option` fields let absent attributes reach the validators as absent,
/// so the response reports every violation instead of failing to parse.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateItemRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Integer cents.
    pub price: Option<i64>,
    pub status: Option<String>,
    #[serde(default)]
    pub category_ids: Vec<Uuid>,
    pub photo: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateItemRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub status: Option<String>,
    pub category_ids: Option<Vec<Uuid>>,
    pub photo: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct ItemList {
    pub items: Vec<Item>,
}
