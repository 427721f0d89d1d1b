use chrono::Utc;
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::{
    domain::{Identity, OrderStatus, Price},
    dto::orders::{OrderList, OrderWithLines, PurchaserResponse, QuantityResponse, TotalResponse},
    entity::{
        items::{Column as ItemCol, Entity as Items},
        order_items::{Column as LineCol, Entity as OrderItems, Model as LineModel},
        orders::{Column as OrderCol, Entity as Orders, Model as OrderModel},
        users::Entity as Users,
    },
    error::{AppError, AppResult},
    models::{Order, OrderLine},
    response::ApiResponse,
    state::AppState,
};

pub async fn list_orders(state: &AppState, identity: &Identity) -> AppResult<ApiResponse<OrderList>> {
    let orders = Orders::find()
        .filter(OrderCol::UserId.eq(identity.user_id))
        .order_by_desc(OrderCol::CreatedAt)
        .all(&state.orm)
        .await?;

    let mut items = Vec::with_capacity(orders.len());
    for order in orders {
        items.push(order_model(order)?);
    }

    Ok(ApiResponse::success("Orders", OrderList { items }))
}

pub async fn get_order(
    state: &AppState,
    identity: &Identity,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithLines>> {
    let order = find_visible_order(state, identity, id).await?;

    let lines = OrderItems::find()
        .filter(LineCol::OrderId.eq(order.id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(line_model)
        .collect();

    Ok(ApiResponse::success(
        "Order",
        OrderWithLines {
            order: order_model(order)?,
            lines,
        },
    ))
}

/// Live total: the sum of the items' *current* prices over every line.
/// Informational only; the stored `total_price` keeps the checkout snapshot.
pub async fn order_total(
    state: &AppState,
    identity: &Identity,
    id: Uuid,
) -> AppResult<ApiResponse<TotalResponse>> {
    let order = find_visible_order(state, identity, id).await?;

    let lines = OrderItems::find()
        .filter(LineCol::OrderId.eq(order.id))
        .all(&state.orm)
        .await?;

    let item_ids: Vec<Uuid> = lines.iter().map(|l| l.item_id).collect();
    let items = Items::find()
        .filter(ItemCol::Id.is_in(item_ids))
        .all(&state.orm)
        .await?;

    let mut total = Price::ZERO;
    for line in &lines {
        let item = items
            .iter()
            .find(|i| i.id == line.item_id)
            .ok_or(AppError::MissingReference("order_item.item"))?;
        total = total
            .checked_add(Price::from_cents(item.price))
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("order total overflow")))?;
    }

    Ok(ApiResponse::success(
        "Order total",
        TotalResponse {
            total: total.cents(),
            total_display: total.to_string(),
        },
    ))
}

/// Delegates to the owning user. The presence invariant makes a missing user
/// unreachable; if it happens anyway the failure is explicit, not a default.
pub async fn purchaser(
    state: &AppState,
    identity: &Identity,
    id: Uuid,
) -> AppResult<ApiResponse<PurchaserResponse>> {
    let order = find_visible_order(state, identity, id).await?;

    let user = Users::find_by_id(order.user_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::MissingReference("order.user"))?;

    Ok(ApiResponse::success(
        "Purchaser",
        PurchaserResponse {
            full_name: user.full_name,
            email: user.email,
        },
    ))
}

/// How many lines of this order reference the given item. The item identity
/// is a required input.
pub async fn item_quantity(
    state: &AppState,
    identity: &Identity,
    id: Uuid,
    item_id: Option<Uuid>,
) -> AppResult<ApiResponse<QuantityResponse>> {
    let Some(item_id) = item_id else {
        return Err(AppError::InvalidArgument("item_id is required".into()));
    };

    let order = find_visible_order(state, identity, id).await?;

    let quantity = OrderItems::find()
        .filter(
            Condition::all()
                .add(LineCol::OrderId.eq(order.id))
                .add(LineCol::ItemId.eq(item_id)),
        )
        .all(&state.orm)
        .await?
        .len() as u64;

    Ok(ApiResponse::success(
        "Quantity",
        QuantityResponse { item_id, quantity },
    ))
}

/// Owners see their own orders; admins see any. Everyone else gets NotFound
/// rather than confirmation that the order exists.
async fn find_visible_order(
    state: &AppState,
    identity: &Identity,
    id: Uuid,
) -> AppResult<OrderModel> {
    let mut condition = Condition::all().add(OrderCol::Id.eq(id));
    if !identity.is_admin() {
        condition = condition.add(OrderCol::UserId.eq(identity.user_id));
    }

    Orders::find()
        .filter(condition)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

pub(crate) fn order_model(model: OrderModel) -> AppResult<Order> {
    let status = OrderStatus::parse(&model.status).ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!("unknown order status: {}", model.status))
    })?;

    Ok(Order {
        id: model.id,
        user_id: model.user_id,
        status,
        total_price: model.total_price,
        total_display: Price::from_cents(model.total_price).to_string(),
        placed_at: model.placed_at.map(|dt| dt.with_timezone(&Utc)),
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}

pub(crate) fn line_model(model: LineModel) -> OrderLine {
    OrderLine {
        id: model.id,
        order_id: model.order_id,
        item_id: model.item_id,
        price: model.price,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
