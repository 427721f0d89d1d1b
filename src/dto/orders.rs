use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Order, OrderLine};

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithLines {
    pub order: Order,
    pub lines: Vec<OrderLine>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct QuantityQuery {
    /// Identity of the item whose lines should be counted.
    pub item_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QuantityResponse {
    pub item_id: Uuid,
    pub quantity: u64,
}

/// Live total, recomputed from current item prices. Informational; the
/// stored `total_price` keeps the checkout-time snapshot.
#[derive(Debug, Serialize, ToSchema)]
pub struct TotalResponse {
    pub total: i64,
    pub total_display: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PurchaserResponse {
    pub full_name: String,
    pub email: String,
}
