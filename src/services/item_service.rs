use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    domain::{
        Identity, ItemStatus, Price,
        validate::{ItemDraft, validate_item},
    },
    dto::items::{CreateItemRequest, ItemList, UpdateItemRequest},
    entity::{
        categories::{Column as CategoryCol, Entity as Categories, Model as CategoryModel},
        item_categories::{
            ActiveModel as ItemCategoryActive, Column as ItemCategoryCol, Entity as ItemCategories,
        },
        items::{ActiveModel as ItemActive, Column as ItemCol, Entity as Items, Model as ItemModel},
        order_items::{Column as OrderItemCol, Entity as OrderItems},
    },
    error::{AppError, AppResult},
    middleware::auth::ensure_admin,
    models::Item,
    response::ApiResponse,
    services::category_service::category_model,
    state::AppState,
};

pub async fn create_item(
    state: &AppState,
    identity: &Identity,
    payload: CreateItemRequest,
) -> AppResult<ApiResponse<Item>> {
    ensure_admin(identity)?;

    let draft = ItemDraft {
        title: payload.title,
        description: payload.description,
        price: payload.price,
        status: payload.status,
        category_ids: payload.category_ids,
    };

    // Case-preserving exact match; "Food" does not collide with "food".
    let title_taken = match draft.title.as_deref() {
        Some(title) if !title.trim().is_empty() => {
            Items::find()
                .filter(ItemCol::Title.eq(title))
                .count(&state.orm)
                .await?
                > 0
        }
        _ => false,
    };

    validate_item(&draft, title_taken)?;

    let categories = Categories::find()
        .filter(CategoryCol::Id.is_in(draft.category_ids.clone()))
        .all(&state.orm)
        .await?;
    if categories.len() != draft.category_ids.len() {
        return Err(AppError::NotFound);
    }

    let (Some(title), Some(description), Some(price), Some(status)) =
        (draft.title, draft.description, draft.price, draft.status)
    else {
        return Err(AppError::Internal(anyhow::anyhow!(
            "validated item draft missing fields"
        )));
    };

    let txn = state.orm.begin().await?;

    let item = ItemActive {
        id: Set(Uuid::new_v4()),
        title: Set(title),
        description: Set(description),
        price: Set(price),
        status: Set(status),
        photo: Set(payload.photo),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    for category_id in &draft.category_ids {
        ItemCategoryActive {
            id: Set(Uuid::new_v4()),
            item_id: Set(item.id),
            category_id: Set(*category_id),
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.orm,
        Some(identity.user_id),
        "item_create",
        Some("items"),
        Some(serde_json::json!({ "item_id": item.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let data = item_model(item, categories)?;
    Ok(ApiResponse::success("Item created", data))
}

pub async fn list_items(state: &AppState) -> AppResult<ApiResponse<ItemList>> {
    let items = Items::find().all(&state.orm).await?;
    let joins = ItemCategories::find().all(&state.orm).await?;
    let categories = Categories::find().all(&state.orm).await?;

    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let linked: Vec<CategoryModel> = joins
            .iter()
            .filter(|j| j.item_id == item.id)
            .filter_map(|j| categories.iter().find(|c| c.id == j.category_id).cloned())
            .collect();
        out.push(item_model(item, linked)?);
    }

    Ok(ApiResponse::success("Items", ItemList { items: out }))
}

pub async fn get_item(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Item>> {
    let item = Items::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let categories = item_categories_of(state, id).await?;
    Ok(ApiResponse::success("Item", item_model(item, categories)?))
}

pub async fn update_item(
    state: &AppState,
    identity: &Identity,
    id: Uuid,
    payload: UpdateItemRequest,
) -> AppResult<ApiResponse<Item>> {
    ensure_admin(identity)?;

    let existing = Items::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let existing_category_ids: Vec<Uuid> = ItemCategories::find()
        .filter(ItemCategoryCol::ItemId.eq(id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|j| j.category_id)
        .collect();

    let draft = ItemDraft {
        title: Some(payload.title.unwrap_or(existing.title.clone())),
        description: Some(payload.description.unwrap_or(existing.description.clone())),
        price: Some(payload.price.unwrap_or(existing.price)),
        status: Some(payload.status.unwrap_or(existing.status.clone())),
        category_ids: payload.category_ids.unwrap_or(existing_category_ids.clone()),
    };

    let title_taken = match draft.title.as_deref() {
        Some(title) if title != existing.title => {
            Items::find()
                .filter(ItemCol::Title.eq(title))
                .count(&state.orm)
                .await?
                > 0
        }
        _ => false,
    };

    validate_item(&draft, title_taken)?;

    let categories = Categories::find()
        .filter(CategoryCol::Id.is_in(draft.category_ids.clone()))
        .all(&state.orm)
        .await?;
    if categories.len() != draft.category_ids.len() {
        return Err(AppError::NotFound);
    }

    let txn = state.orm.begin().await?;

    let mut active: ItemActive = existing.into();
    if let Some(title) = draft.title {
        active.title = Set(title);
    }
    if let Some(description) = draft.description {
        active.description = Set(description);
    }
    if let Some(price) = draft.price {
        active.price = Set(price);
    }
    if let Some(status) = draft.status {
        active.status = Set(status);
    }
    if let Some(photo) = payload.photo {
        active.photo = Set(Some(photo));
    }
    let item = active.update(&txn).await?;

    if draft.category_ids != existing_category_ids {
        ItemCategories::delete_many()
            .filter(ItemCategoryCol::ItemId.eq(id))
            .exec(&txn)
            .await?;
        for category_id in &draft.category_ids {
            ItemCategoryActive {
                id: Set(Uuid::new_v4()),
                item_id: Set(id),
                category_id: Set(*category_id),
            }
            .insert(&txn)
            .await?;
        }
    }

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.orm,
        Some(identity.user_id),
        "item_update",
        Some("items"),
        Some(serde_json::json!({ "item_id": item.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let data = item_model(item, categories)?;
    Ok(ApiResponse::success("Item updated", data))
}

/// Explicit cascade: removes this item's join rows and order lines, and
/// nothing else. Category and order rows survive untouched.
pub async fn delete_item(
    state: &AppState,
    identity: &Identity,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(identity)?;

    let existing = Items::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let txn = state.orm.begin().await?;

    ItemCategories::delete_many()
        .filter(ItemCategoryCol::ItemId.eq(existing.id))
        .exec(&txn)
        .await?;

    OrderItems::delete_many()
        .filter(OrderItemCol::ItemId.eq(existing.id))
        .exec(&txn)
        .await?;

    Items::delete_by_id(existing.id).exec(&txn).await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.orm,
        Some(identity.user_id),
        "item_delete",
        Some("items"),
        Some(serde_json::json!({ "item_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success("Item deleted", serde_json::json!({})))
}

pub(crate) async fn item_categories_of(
    state: &AppState,
    item_id: Uuid,
) -> AppResult<Vec<CategoryModel>> {
    let ids: Vec<Uuid> = ItemCategories::find()
        .filter(ItemCategoryCol::ItemId.eq(item_id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|j| j.category_id)
        .collect();

    Ok(Categories::find()
        .filter(CategoryCol::Id.is_in(ids))
        .all(&state.orm)
        .await?)
}

pub(crate) fn item_model(model: ItemModel, categories: Vec<CategoryModel>) -> AppResult<Item> {
    let status = ItemStatus::parse(&model.status).ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!("unknown item status: {}", model.status))
    })?;

    let photo_url = model.photo_url().to_string();

    Ok(Item {
        id: model.id,
        title: model.title,
        description: model.description,
        price: model.price,
        price_display: Price::from_cents(model.price).to_string(),
        status,
        photo_url,
        categories: categories.into_iter().map(category_model).collect(),
        created_at: model.created_at.with_timezone(&Utc),
    })
}
