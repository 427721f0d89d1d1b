use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        cart::CartView,
        categories::{CategoryList, CategoryWithItems},
        items::ItemList,
        orders::{OrderList, OrderWithLines, PurchaserResponse, QuantityResponse, TotalResponse},
    },
    models::{Category, Item, Order, OrderLine, User},
    response::ApiResponse,
    routes::{admin, auth, cart, categories, health, items, orders},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::logout,
        items::list_items,
        items::get_item,
        items::create_item,
        items::update_item,
        items::delete_item,
        categories::list_categories,
        categories::category_items,
        categories::create_category,
        categories::delete_category,
        cart::current_cart,
        cart::add_item,
        cart::remove_item,
        cart::checkout,
        orders::list_orders,
        orders::get_order,
        orders::order_total,
        orders::purchaser,
        orders::item_quantity,
        admin::list_all_orders,
        admin::update_order_status
    ),
    components(
        schemas(
            User,
            Category,
            Item,
            Order,
            OrderLine,
            ItemList,
            CategoryList,
            CategoryWithItems,
            CartView,
            OrderList,
            OrderWithLines,
            TotalResponse,
            PurchaserResponse,
            QuantityResponse,
            ApiResponse<Item>,
            ApiResponse<ItemList>,
            ApiResponse<CartView>,
            ApiResponse<OrderList>,
            ApiResponse<OrderWithLines>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Items", description = "Item endpoints"),
        (name = "Categories", description = "Category endpoints"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Orders", description = "Order endpoints"),
        (name = "Admin", description = "Admin endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
