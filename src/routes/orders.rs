use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    domain::Identity,
    dto::orders::{
        OrderList, OrderWithLines, PurchaserResponse, QuantityQuery, QuantityResponse,
        TotalResponse,
    },
    error::AppResult,
    response::ApiResponse,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders))
        .route("/{id}", get(get_order))
        .route("/{id}/total", get(order_total))
        .route("/{id}/purchaser", get(purchaser))
        .route("/{id}/quantity", get(item_quantity))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    responses(
        (status = 200, description = "The caller's orders", body = ApiResponse<OrderList>)
    ),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    identity: Identity,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_orders(&state, &identity).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order with lines", body = ApiResponse<OrderWithLines>),
        (status = 404, description = "Order not found")
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderWithLines>>> {
    let resp = order_service::get_order(&state, &identity, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}/total",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Live total over current item prices", body = ApiResponse<TotalResponse>),
        (status = 404, description = "Order not found")
    ),
    tag = "Orders"
)]
pub async fn order_total(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<TotalResponse>>> {
    let resp = order_service::order_total(&state, &identity, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}/purchaser",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Owning user's name and email", body = ApiResponse<PurchaserResponse>),
        (status = 404, description = "Order not found")
    ),
    tag = "Orders"
)]
pub async fn purchaser(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<PurchaserResponse>>> {
    let resp = order_service::purchaser(&state, &identity, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}/quantity",
    params(
        ("id" = Uuid, Path, description = "Order ID"),
        ("item_id" = Option<Uuid>, Query, description = "Item whose lines to count; required")
    ),
    responses(
        (status = 200, description = "Count of lines for the item", body = ApiResponse<QuantityResponse>),
        (status = 400, description = "item_id missing"),
        (status = 404, description = "Order not found")
    ),
    tag = "Orders"
)]
pub async fn item_quantity(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
    Query(query): Query<QuantityQuery>,
) -> AppResult<Json<ApiResponse<QuantityResponse>>> {
    let resp = order_service::item_quantity(&state, &identity, id, query.item_id).await?;
    Ok(Json(resp))
}
