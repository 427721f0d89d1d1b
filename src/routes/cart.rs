use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post},
};
use uuid::Uuid;

use crate::{
    domain::Identity,
    dto::cart::{AddCartItemRequest, CartView},
    dto::orders::OrderWithLines,
    error::AppResult,
    models::OrderLine,
    response::ApiResponse,
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(current_cart))
        .route("/items", post(add_item))
        .route("/items/{item_id}", delete(remove_item))
        .route("/checkout", post(checkout))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "The caller's open cart", body = ApiResponse<CartView>)
    ),
    tag = "Cart"
)]
pub async fn current_cart(
    State(state): State<AppState>,
    identity: Identity,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::current_cart(&state, &identity).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/cart/items",
    request_body = AddCartItemRequest,
    responses(
        (status = 200, description = "Line added with a price snapshot", body = ApiResponse<OrderLine>),
        (status = 404, description = "Item not found")
    ),
    tag = "Cart"
)]
pub async fn add_item(
    State(state): State<AppState>,
    identity: Identity,
    Json(payload): Json<AddCartItemRequest>,
) -> AppResult<Json<ApiResponse<OrderLine>>> {
    let resp = cart_service::add_item(&state, &identity, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/cart/items/{item_id}",
    params(
        ("item_id" = Uuid, Path, description = "Item whose line should be removed")
    ),
    responses(
        (status = 200, description = "One line removed"),
        (status = 404, description = "No open cart or no matching line")
    ),
    tag = "Cart"
)]
pub async fn remove_item(
    State(state): State<AppState>,
    identity: Identity,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = cart_service::remove_item(&state, &identity, item_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/cart/checkout",
    responses(
        (status = 200, description = "Order finalized with derived total", body = ApiResponse<OrderWithLines>),
        (status = 404, description = "No open cart"),
        (status = 422, description = "Order is incomplete (e.g. no items)")
    ),
    tag = "Cart"
)]
pub async fn checkout(
    State(state): State<AppState>,
    identity: Identity,
) -> AppResult<Json<ApiResponse<OrderWithLines>>> {
    let resp = cart_service::checkout(&state, &identity).await?;
    Ok(Json(resp))
}
