use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    domain::{Identity, OrderStatus, Price,
        validate::{OrderDraft, validate_order}},
    dto::cart::{AddCartItemRequest, CartView},
    dto::orders::OrderWithLines,
    entity::{
        items::Entity as Items,
        order_items::{ActiveModel as LineActive, Column as LineCol, Entity as OrderItems},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
    },
    error::{AppError, AppResult},
    models::OrderLine,
    response::ApiResponse,
    services::order_service::{line_model, order_model},
    state::AppState,
};

/// The caller's open order, created on first use.
pub async fn current_cart(state: &AppState, identity: &Identity) -> AppResult<ApiResponse<CartView>> {
    let order = match find_cart(&state.orm, identity).await? {
        Some(cart) => cart,
        None => create_cart(&state.orm, identity).await?,
    };

    let lines = OrderItems::find()
        .filter(LineCol::OrderId.eq(order.id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(line_model)
        .collect();

    Ok(ApiResponse::success(
        "Cart",
        CartView {
            order: order_model(order)?,
            lines,
        },
    ))
}

/// Adds one unit of the item, snapshotting its current price into the line.
/// Adding the same item again appends another line; quantity is the line count.
///
/// Runs inside a transaction holding the cart row lock, so a concurrent
/// checkout cannot finalize the order between the cart lookup and the line
/// insert. If checkout wins the lock, the re-read here no longer sees an
/// open cart and a fresh one is created.
pub async fn add_item(
    state: &AppState,
    identity: &Identity,
    payload: AddCartItemRequest,
) -> AppResult<ApiResponse<OrderLine>> {
    let txn = state.orm.begin().await?;

    let item = Items::find_by_id(payload.item_id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let cart = match lock_cart(&txn, identity).await? {
        Some(cart) => cart,
        None => create_cart(&txn, identity).await?,
    };

    let line = LineActive {
        id: Set(Uuid::new_v4()),
        order_id: Set(cart.id),
        item_id: Set(item.id),
        price: Set(item.price),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.orm,
        Some(identity.user_id),
        "cart_add_item",
        Some("order_items"),
        Some(serde_json::json!({ "order_id": cart.id, "item_id": item.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success("Added to cart", line_model(line)))
}

/// Removes one matching line (one unit), not every line for the item.
/// Holds the cart row lock like [`add_item`], so the lines of an order being
/// checked out cannot shrink mid-finalization.
pub async fn remove_item(
    state: &AppState,
    identity: &Identity,
    item_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let txn = state.orm.begin().await?;

    let cart = lock_cart(&txn, identity).await?.ok_or(AppError::NotFound)?;

    let line = OrderItems::find()
        .filter(
            Condition::all()
                .add(LineCol::OrderId.eq(cart.id))
                .add(LineCol::ItemId.eq(item_id)),
        )
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    OrderItems::delete_by_id(line.id).exec(&txn).await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.orm,
        Some(identity.user_id),
        "cart_remove_item",
        Some("order_items"),
        Some(serde_json::json!({ "order_id": cart.id, "item_id": item_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Removed from cart",
        serde_json::json!({}),
    ))
}

/// Finalizes the open order in one transaction: validates it, derives
/// `total_price` from the line snapshots, and stamps `placed_at`. A
/// client-supplied total is never accepted.
pub async fn checkout(
    state: &AppState,
    identity: &Identity,
) -> AppResult<ApiResponse<OrderWithLines>> {
    let txn = state.orm.begin().await?;

    let cart = lock_cart(&txn, identity).await?.ok_or(AppError::NotFound)?;

    let lines = OrderItems::find()
        .filter(LineCol::OrderId.eq(cart.id))
        .all(&txn)
        .await?;

    let total = lines
        .iter()
        .try_fold(Price::ZERO, |acc, line| {
            acc.checked_add(Price::from_cents(line.price))
        })
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("order total overflow")))?;

    let draft = OrderDraft {
        user_id: Some(cart.user_id),
        status: Some(cart.status.clone()),
        total_price: Some(total.cents()),
        item_count: lines.len(),
    };
    validate_order(&draft)?;

    let mut active: OrderActive = cart.into();
    active.total_price = Set(total.cents());
    active.placed_at = Set(Some(Utc::now().into()));
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&txn).await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.orm,
        Some(identity.user_id),
        "checkout",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "total_price": order.total_price })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Checkout complete",
        OrderWithLines {
            order: order_model(order)?,
            lines: lines.into_iter().map(line_model).collect(),
        },
    ))
}

fn open_cart_condition(identity: &Identity) -> Condition {
    Condition::all()
        .add(OrderCol::UserId.eq(identity.user_id))
        .add(OrderCol::Status.eq(OrderStatus::Ordered.as_str()))
        .add(OrderCol::PlacedAt.is_null())
}

async fn find_cart<C: ConnectionTrait>(
    conn: &C,
    identity: &Identity,
) -> AppResult<Option<OrderModel>> {
    Ok(Orders::find()
        .filter(open_cart_condition(identity))
        .one(conn)
        .await?)
}

/// `SELECT ... FOR UPDATE` on the open cart row. Every order mutation takes
/// this lock inside its transaction, which serializes add, remove, and
/// checkout against each other.
async fn lock_cart<C: ConnectionTrait>(
    conn: &C,
    identity: &Identity,
) -> AppResult<Option<OrderModel>> {
    Ok(Orders::find()
        .filter(open_cart_condition(identity))
        .lock(LockType::Update)
        .one(conn)
        .await?)
}

async fn create_cart<C: ConnectionTrait>(conn: &C, identity: &Identity) -> AppResult<OrderModel> {
    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(identity.user_id),
        status: Set(OrderStatus::Ordered.as_str().to_string()),
        total_price: Set(0),
        placed_at: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(conn)
    .await?;

    Ok(order)
}
