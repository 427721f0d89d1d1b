use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Category, Item};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCategoryRequest {
    pub name: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct CategoryList {
    pub items: Vec<Category>,
}

#[derive(Serialize, ToSchema)]
pub struct CategoryWithItems {
    pub category: Category,
    pub items: Vec<Item>,
}
