use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Order, OrderLine};

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddCartItemRequest {
    pub item_id: Uuid,
}

/// The caller's open order plus its lines.
#[derive(Debug, Serialize, ToSchema)]
pub struct CartView {
    pub order: Order,
    pub lines: Vec<OrderLine>,
}
