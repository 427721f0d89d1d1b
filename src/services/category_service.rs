use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    domain::{Identity, Rule, ValidationError, Violation,
        validate::{CategoryDraft, validate_category}},
    dto::categories::{CategoryList, CategoryWithItems, CreateCategoryRequest},
    entity::{
        categories::{
            ActiveModel as CategoryActive, Column as CategoryCol, Entity as Categories,
            Model as CategoryModel,
        },
        item_categories::{Column as ItemCategoryCol, Entity as ItemCategories},
        items::{Column as ItemCol, Entity as Items},
    },
    error::{AppError, AppResult},
    middleware::auth::ensure_admin,
    models::Category,
    response::ApiResponse,
    services::item_service::item_model,
    state::AppState,
};

pub async fn create_category(
    state: &AppState,
    identity: &Identity,
    payload: CreateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(identity)?;

    let draft = CategoryDraft { name: payload.name };

    let name_taken = match draft.name.as_deref() {
        Some(name) if !name.trim().is_empty() => {
            Categories::find()
                .filter(CategoryCol::Name.eq(name))
                .count(&state.orm)
                .await?
                > 0
        }
        _ => false,
    };

    validate_category(&draft, name_taken)?;

    let Some(name) = draft.name else {
        return Err(AppError::Internal(anyhow::anyhow!(
            "validated category draft missing name"
        )));
    };

    let category = CategoryActive {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.orm,
        Some(identity.user_id),
        "category_create",
        Some("categories"),
        Some(serde_json::json!({ "category_id": category.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Category created",
        category_model(category),
    ))
}

pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<CategoryList>> {
    let items = Categories::find()
        .all(&state.orm)
        .await?
        .into_iter()
        .map(category_model)
        .collect();

    Ok(ApiResponse::success("Categories", CategoryList { items }))
}

/// The items currently linked to a category. Re-runs the membership query on
/// every call, so it reflects the current joins.
pub async fn category_items(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<CategoryWithItems>> {
    let category = Categories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let item_ids: Vec<Uuid> = ItemCategories::find()
        .filter(ItemCategoryCol::CategoryId.eq(id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|j| j.item_id)
        .collect();

    let mut items = Vec::with_capacity(item_ids.len());
    for item in Items::find()
        .filter(ItemCol::Id.is_in(item_ids))
        .all(&state.orm)
        .await?
    {
        let categories = crate::services::item_service::item_categories_of(state, item.id).await?;
        items.push(item_model(item, categories)?);
    }

    Ok(ApiResponse::success(
        "Category items",
        CategoryWithItems {
            category: category_model(category),
            items,
        },
    ))
}

/// Refused when some item would be left with zero categories; the item
/// minimum-cardinality invariant wins over the delete. Otherwise join rows
/// go first, then the category. Items are never destroyed here.
pub async fn delete_category(
    state: &AppState,
    identity: &Identity,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(identity)?;

    let existing = Categories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let member_item_ids: Vec<Uuid> = ItemCategories::find()
        .filter(ItemCategoryCol::CategoryId.eq(id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|j| j.item_id)
        .collect();

    for item_id in &member_item_ids {
        let memberships = ItemCategories::find()
            .filter(ItemCategoryCol::ItemId.eq(*item_id))
            .count(&state.orm)
            .await?;
        if memberships <= 1 {
            return Err(ValidationError {
                violations: vec![Violation::new("items", Rule::MinimumCardinality)],
            }
            .into());
        }
    }

    let txn = state.orm.begin().await?;

    ItemCategories::delete_many()
        .filter(ItemCategoryCol::CategoryId.eq(id))
        .exec(&txn)
        .await?;

    Categories::delete_by_id(existing.id).exec(&txn).await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.orm,
        Some(identity.user_id),
        "category_delete",
        Some("categories"),
        Some(serde_json::json!({ "category_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Category deleted",
        serde_json::json!({}),
    ))
}

pub(crate) fn category_model(model: CategoryModel) -> Category {
    Category {
        id: model.id,
        name: model.name,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
