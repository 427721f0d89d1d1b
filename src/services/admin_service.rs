use chrono::Utc;
use sea_orm::sea_query::LockType;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, QuerySelect, Set, TransactionTrait};
use sea_orm::{ColumnTrait, QueryFilter};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    domain::{Identity, OrderStatus, Rule, ValidationError, Violation},
    dto::orders::{OrderList, UpdateOrderStatusRequest},
    entity::orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
    error::{AppError, AppResult},
    middleware::auth::ensure_admin,
    models::Order,
    response::ApiResponse,
    services::order_service::order_model,
    state::AppState,
};

pub async fn list_all_orders(
    state: &AppState,
    identity: &Identity,
    status: Option<String>,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_admin(identity)?;

    let mut finder = Orders::find().order_by_desc(OrderCol::CreatedAt);
    if let Some(status) = status.as_ref().filter(|s| !s.is_empty()) {
        finder = finder.filter(OrderCol::Status.eq(status.clone()));
    }

    let orders = finder.all(&state.orm).await?;

    let mut items = Vec::with_capacity(orders.len());
    for order in orders {
        items.push(order_model(order)?);
    }

    Ok(ApiResponse::success("Orders", OrderList { items }))
}

/// Moves a placed order out of `ordered`. Terminal orders are immutable;
/// unplaced carts cannot be transitioned at all.
pub async fn update_order_status(
    state: &AppState,
    identity: &Identity,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(identity)?;

    let Some(next) = OrderStatus::parse(&payload.status) else {
        return Err(ValidationError {
            violations: vec![Violation::new("status", Rule::Inclusion)],
        }
        .into());
    };

    let txn = state.orm.begin().await?;

    let existing = Orders::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let current = OrderStatus::parse(&existing.status).ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!("unknown order status: {}", existing.status))
    })?;

    if existing.placed_at.is_none() {
        return Err(AppError::InvalidArgument(
            "order has not been checked out".into(),
        ));
    }
    if !current.can_transition_to(next) {
        return Err(AppError::InvalidArgument(format!(
            "cannot transition order from {} to {}",
            current.as_str(),
            next.as_str()
        )));
    }

    let mut active: OrderActive = existing.into();
    active.status = Set(next.as_str().to_string());
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&txn).await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.orm,
        Some(identity.user_id),
        "order_status_update",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "status": order.status })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success("Order updated", order_model(order)?))
}
