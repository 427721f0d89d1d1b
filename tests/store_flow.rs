use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait, Statement};
use storefront_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    domain::{Identity, Rule, Session},
    dto::{
        auth::{LoginRequest, RegisterRequest},
        cart::AddCartItemRequest,
        categories::CreateCategoryRequest,
        items::{CreateItemRequest, UpdateItemRequest},
        orders::UpdateOrderStatusRequest,
    },
    entity::{Categories, ItemCategories, Items},
    error::AppError,
    services::{admin_service, auth_service, cart_service, category_service, item_service, order_service},
    state::AppState,
};

// Full storefront flow at the service level: admin builds the catalog, a user
// registers, fills a cart, checks out, and the admin transitions the order.
// Runs against a real database; skips cleanly when none is configured.
#[tokio::test]
async fn storefront_flow() -> anyhow::Result<()> {
    let database_url =
        match std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
            Ok(url) => url,
            Err(_) => {
                eprintln!(
                    "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
                );
                return Ok(());
            }
        };
    let state = setup_state(&database_url).await?;

    // --- registration and login -------------------------------------------
    let registered = auth_service::register_user(
        &state,
        RegisterRequest {
            email: "user@example.com".into(),
            full_name: "Uri User".into(),
            password: "user123".into(),
        },
    )
    .await?;
    let user = registered.data.expect("registered user");
    assert!(!user.is_admin);

    // Duplicate email is a collected uniqueness violation, not a DB error.
    let dup = auth_service::register_user(
        &state,
        RegisterRequest {
            email: "user@example.com".into(),
            full_name: "Someone Else".into(),
            password: "other456".into(),
        },
    )
    .await;
    match dup {
        Err(AppError::Validation(err)) => assert!(err.has("email", Rule::Unique)),
        other => panic!("expected validation error, got {other:?}"),
    }

    let login = auth_service::login_user(
        &state,
        LoginRequest {
            email: "user@example.com".into(),
            password: "user123".into(),
        },
    )
    .await?;
    assert!(login.data.expect("login data").token.starts_with("Bearer "));

    // Wrong password and unknown email collapse to the same generic failure.
    let wrong_password = auth_service::login_user(
        &state,
        LoginRequest {
            email: "user@example.com".into(),
            password: "nope".into(),
        },
    )
    .await;
    let unknown_email = auth_service::login_user(
        &state,
        LoginRequest {
            email: "ghost@example.com".into(),
            password: "user123".into(),
        },
    )
    .await;
    assert!(matches!(wrong_password, Err(AppError::AuthenticationFailed)));
    assert!(matches!(unknown_email, Err(AppError::AuthenticationFailed)));

    // Logout twice in a row: both succeed, including from Anonymous.
    auth_service::logout_user(&state, Session::default()).await?;
    auth_service::logout_user(&state, Session::default()).await?;

    let auth_user = Identity {
        user_id: user.id,
        email: user.email.clone(),
        full_name: user.full_name.clone(),
        admin: false,
    };
    let auth_admin = seed_admin(&state).await?;

    // --- catalog ----------------------------------------------------------
    let category = category_service::create_category(
        &state,
        &auth_admin,
        CreateCategoryRequest {
            name: Some("breakfast".into()),
        },
    )
    .await?
    .data
    .expect("category");

    // Non-admins cannot touch the catalog.
    let forbidden = category_service::create_category(
        &state,
        &auth_user,
        CreateCategoryRequest {
            name: Some("sneaky".into()),
        },
    )
    .await;
    assert!(matches!(forbidden, Err(AppError::Forbidden)));

    let item = item_service::create_item(
        &state,
        &auth_admin,
        CreateItemRequest {
            title: Some("Unicorn Pancakes".into()),
            description: Some("Stack of three".into()),
            price: Some(8),
            status: Some("active".into()),
            category_ids: vec![category.id],
            photo: None,
        },
    )
    .await?
    .data
    .expect("item");
    assert_eq!(item.photo_url, "/Fat_unicorn.jpg");
    assert_eq!(item.price_display, "$0.08");

    // Round trip: the stored record matches what was sent.
    let fetched = item_service::get_item(&state, item.id).await?.data.expect("item");
    assert_eq!(fetched.title, "Unicorn Pancakes");
    assert_eq!(fetched.description, "Stack of three");
    assert_eq!(fetched.price, 8);
    assert_eq!(fetched.categories.len(), 1);

    // Invalid drafts report every violation and persist nothing.
    let invalid = item_service::create_item(
        &state,
        &auth_admin,
        CreateItemRequest {
            title: None,
            description: None,
            price: Some(0),
            status: Some("retired".into()),
            category_ids: vec![],
            photo: None,
        },
    )
    .await;
    match invalid {
        Err(AppError::Validation(err)) => {
            assert!(err.has("title", Rule::Required));
            assert!(err.has("description", Rule::Required));
            assert!(err.has("price", Rule::GreaterThanZero));
            assert!(err.has("status", Rule::Inclusion));
            assert!(err.has("categories", Rule::MinimumCardinality));
        }
        other => panic!("expected validation error, got {other:?}"),
    }

    // Duplicate title: rejected, and the item count stays at 1.
    let duplicate = item_service::create_item(
        &state,
        &auth_admin,
        CreateItemRequest {
            title: Some("Unicorn Pancakes".into()),
            description: Some("Imitation stack".into()),
            price: Some(9),
            status: Some("active".into()),
            category_ids: vec![category.id],
            photo: None,
        },
    )
    .await;
    match duplicate {
        Err(AppError::Validation(err)) => assert!(err.has("title", Rule::Unique)),
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(Items::find().count(&state.orm).await?, 1);

    // --- cart and checkout --------------------------------------------------
    // Checkout with an empty cart: the zero-item invariant rejects it.
    cart_service::current_cart(&state, &auth_user).await?;
    let empty_checkout = cart_service::checkout(&state, &auth_user).await;
    match empty_checkout {
        Err(AppError::Validation(err)) => assert!(err.has("items", Rule::MinimumCardinality)),
        other => panic!("expected validation error, got {other:?}"),
    }

    // Same item twice: two lines, quantity 2.
    cart_service::add_item(&state, &auth_user, AddCartItemRequest { item_id: item.id }).await?;
    cart_service::add_item(&state, &auth_user, AddCartItemRequest { item_id: item.id }).await?;

    let placed = cart_service::checkout(&state, &auth_user)
        .await?
        .data
        .expect("checkout data");
    assert_eq!(placed.order.total_price, 16);
    assert!(placed.order.placed_at.is_some());
    assert_eq!(placed.lines.len(), 2);

    let total = order_service::order_total(&state, &auth_user, placed.order.id)
        .await?
        .data
        .expect("total");
    assert_eq!(total.total, 16);
    assert_eq!(total.total_display, "$0.16");

    let quantity = order_service::item_quantity(&state, &auth_user, placed.order.id, Some(item.id))
        .await?
        .data
        .expect("quantity");
    assert_eq!(quantity.quantity, 2);

    let missing_item_id =
        order_service::item_quantity(&state, &auth_user, placed.order.id, None).await;
    assert!(matches!(missing_item_id, Err(AppError::InvalidArgument(_))));

    let purchaser = order_service::purchaser(&state, &auth_user, placed.order.id)
        .await?
        .data
        .expect("purchaser");
    assert_eq!(purchaser.email, "user@example.com");
    assert_eq!(purchaser.full_name, "Uri User");

    // --- live total vs stored snapshot --------------------------------------
    // A price edit after checkout moves the live total but never the stored
    // one, which was derived from the line snapshots.
    item_service::update_item(
        &state,
        &auth_admin,
        item.id,
        UpdateItemRequest {
            title: None,
            description: None,
            price: Some(10),
            status: None,
            category_ids: None,
            photo: None,
        },
    )
    .await?;

    let live = order_service::order_total(&state, &auth_user, placed.order.id)
        .await?
        .data
        .expect("total");
    assert_eq!(live.total, 20);
    assert_eq!(live.total_display, "$0.20");

    let stored = order_service::get_order(&state, &auth_user, placed.order.id)
        .await?
        .data
        .expect("order");
    assert_eq!(stored.order.total_price, 16);

    // A finalized order never receives new lines: adding again opens a fresh
    // cart, and the line snapshots the current price.
    let late_line = cart_service::add_item(&state, &auth_user, AddCartItemRequest { item_id: item.id })
        .await?
        .data
        .expect("line");
    assert_ne!(late_line.order_id, placed.order.id);
    assert_eq!(late_line.price, 10);

    let placed_after = order_service::get_order(&state, &auth_user, placed.order.id)
        .await?
        .data
        .expect("order");
    assert_eq!(placed_after.lines.len(), 2);

    // --- admin order management --------------------------------------------
    let all_orders = admin_service::list_all_orders(&state, &auth_admin, None)
        .await?
        .data
        .expect("orders");
    assert!(all_orders.items.iter().any(|o| o.id == placed.order.id));

    let paid = admin_service::update_order_status(
        &state,
        &auth_admin,
        placed.order.id,
        UpdateOrderStatusRequest {
            status: "paid".into(),
        },
    )
    .await?
    .data
    .expect("order");
    assert_eq!(paid.status.as_str(), "paid");

    // Terminal orders are immutable.
    let illegal = admin_service::update_order_status(
        &state,
        &auth_admin,
        placed.order.id,
        UpdateOrderStatusRequest {
            status: "completed".into(),
        },
    )
    .await;
    assert!(matches!(illegal, Err(AppError::InvalidArgument(_))));

    // --- deletion cascades ---------------------------------------------------
    // Destroying the item removes join rows and order lines; the category and
    // the order themselves survive.
    item_service::delete_item(&state, &auth_admin, item.id).await?;

    assert_eq!(ItemCategories::find().count(&state.orm).await?, 0);
    let kept_category = Categories::find_by_id(category.id)
        .one(&state.orm)
        .await?
        .expect("category survives item deletion");
    assert_eq!(kept_category.name, "breakfast");

    let order_after = order_service::get_order(&state, &auth_user, placed.order.id)
        .await?
        .data
        .expect("order survives item deletion");
    assert_eq!(order_after.order.id, placed.order.id);
    assert_eq!(order_after.lines.len(), 0);

    // --- category deletion policy -------------------------------------------
    // Deleting a category that is some item's only category is refused; once
    // the item belongs to a second category the delete goes through and the
    // item survives with the remaining one.
    let dessert = category_service::create_category(
        &state,
        &auth_admin,
        CreateCategoryRequest {
            name: Some("dessert".into()),
        },
    )
    .await?
    .data
    .expect("category");

    let solo = item_service::create_item(
        &state,
        &auth_admin,
        CreateItemRequest {
            title: Some("Solo Cake".into()),
            description: Some("One of a kind".into()),
            price: Some(300),
            status: Some("active".into()),
            category_ids: vec![dessert.id],
            photo: None,
        },
    )
    .await?
    .data
    .expect("item");

    let refused = category_service::delete_category(&state, &auth_admin, dessert.id).await;
    match refused {
        Err(AppError::Validation(err)) => assert!(err.has("items", Rule::MinimumCardinality)),
        other => panic!("expected validation error, got {other:?}"),
    }

    let pastry = category_service::create_category(
        &state,
        &auth_admin,
        CreateCategoryRequest {
            name: Some("pastry".into()),
        },
    )
    .await?
    .data
    .expect("category");

    item_service::update_item(
        &state,
        &auth_admin,
        solo.id,
        UpdateItemRequest {
            title: None,
            description: None,
            price: None,
            status: None,
            category_ids: Some(vec![dessert.id, pastry.id]),
            photo: None,
        },
    )
    .await?;

    category_service::delete_category(&state, &auth_admin, dessert.id).await?;

    let kept = item_service::get_item(&state, solo.id).await?.data.expect("item");
    assert_eq!(kept.categories.len(), 1);
    assert_eq!(kept.categories[0].name, "pastry");

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE order_items, orders, item_categories, items, categories, audit_logs, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    let config = AppConfig {
        database_url: database_url.to_string(),
        jwt_secret: "integration-test-secret".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
    };

    Ok(AppState { orm, config })
}

async fn seed_admin(state: &AppState) -> anyhow::Result<Identity> {
    let registered = auth_service::register_user(
        state,
        RegisterRequest {
            email: "admin@example.com".into(),
            full_name: "Ada Admin".into(),
            password: "admin123".into(),
        },
    )
    .await?
    .data
    .expect("admin user");

    // Registration never grants the role; flip the flag directly.
    use sea_orm::{ActiveModelTrait, Set};
    use storefront_api::entity::users::{ActiveModel as UserActive, Entity as Users};

    let user = Users::find_by_id(registered.id)
        .one(&state.orm)
        .await?
        .expect("admin row");
    let mut active: UserActive = user.into();
    active.is_admin = Set(true);
    active.update(&state.orm).await?;

    Ok(Identity {
        user_id: registered.id,
        email: registered.email,
        full_name: registered.full_name,
        admin: true,
    })
}
