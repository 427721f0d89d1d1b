pub mod audit_logs;
pub mod categories;
pub mod item_categories;
pub mod items;
pub mod order_items;
pub mod orders;
pub mod users;

pub use categories::Entity as Categories;
pub use item_categories::Entity as ItemCategories;
pub use items::Entity as Items;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use users::Entity as Users;
