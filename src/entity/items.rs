use sea_orm::entity::prelude::*;

use crate::domain::PLACEHOLDER_PHOTO;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// Integer cents.
    pub price: i64,
    pub status: String,
    pub photo: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// Stored reference, or the fixed placeholder when none was uploaded.
    pub fn photo_url(&self) -> &str {
        self.photo.as_deref().unwrap_or(PLACEHOLDER_PHOTO)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::item_categories::Entity")]
    ItemCategories,
    #[sea_orm(has_many = "super::order_items::Entity")]
    OrderItems,
}

impl Related<super::item_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ItemCategories.def()
    }
}

impl Related<super::order_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(photo: Option<&str>) -> Model {
        Model {
            id: Uuid::new_v4(),
            title: "food".into(),
            description: "good".into(),
            price: 500,
            status: "active".into(),
            photo: photo.map(String::from),
            created_at: Utc::now().into(),
        }
    }

    #[test]
    fn photo_url_falls_back_to_placeholder() {
        assert_eq!(item(None).photo_url(), "/Fat_unicorn.jpg");
        assert_eq!(item(Some("/uploads/cake.jpg")).photo_url(), "/uploads/cake.jpg");
    }
}
