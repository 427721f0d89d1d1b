//! API-facing models. These are what handlers serialize; the sea-orm rows in
//! `entity` never leave the service layer (and `password_hash` never leaves
//! the database).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{ItemStatus, OrderStatus};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Item {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Integer cents.
    pub price: i64,
    /// Currency rendering of `price`, e.g. `$9.50`.
    pub price_display: String,
    pub status: ItemStatus,
    /// Stored reference, or the placeholder when none was uploaded.
    pub photo_url: String,
    pub categories: Vec<Category>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: OrderStatus,
    /// Integer cents, derived from line snapshots at checkout.
    pub total_price: i64,
    pub total_display: String,
    /// When checkout finalized this order; `None` while it is an open cart.
    pub placed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One line of an order: one unit of one item, at its add-time price.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderLine {
    pub id: Uuid,
    pub order_id: Uuid,
    pub item_id: Uuid,
    /// Price snapshot taken when the line was added, in cents.
    pub price: i64,
    pub created_at: DateTime<Utc>,
}
