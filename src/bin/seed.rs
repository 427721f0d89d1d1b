use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use storefront_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::{
        categories::{ActiveModel as CategoryActive, Column as CategoryCol, Entity as Categories},
        item_categories::ActiveModel as ItemCategoryActive,
        items::{ActiveModel as ItemActive, Column as ItemCol, Entity as Items},
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    },
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let admin_id = ensure_user(&orm, "admin@example.com", "Ada Admin", "admin123", true).await?;
    let user_id = ensure_user(&orm, "user@example.com", "Uri User", "user123", false).await?;

    let breakfast = ensure_category(&orm, "breakfast").await?;
    let dessert = ensure_category(&orm, "dessert").await?;

    seed_items(&orm, &[breakfast, dessert]).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_user(
    orm: &DatabaseConnection,
    email: &str,
    full_name: &str,
    password: &str,
    is_admin: bool,
) -> anyhow::Result<Uuid> {
    if let Some(existing) = Users::find()
        .filter(UserCol::Email.eq(email))
        .one(orm)
        .await?
    {
        println!("User {email} already present");
        return Ok(existing.id);
    }

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        full_name: Set(full_name.to_string()),
        password_hash: Set(password_hash),
        is_admin: Set(is_admin),
        created_at: NotSet,
    }
    .insert(orm)
    .await?;

    println!("Ensured user {email} (admin={is_admin})");
    Ok(user.id)
}

async fn ensure_category(orm: &DatabaseConnection, name: &str) -> anyhow::Result<Uuid> {
    if let Some(existing) = Categories::find()
        .filter(CategoryCol::Name.eq(name))
        .one(orm)
        .await?
    {
        return Ok(existing.id);
    }

    let category = CategoryActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        created_at: NotSet,
    }
    .insert(orm)
    .await?;

    println!("Ensured category {name}");
    Ok(category.id)
}

async fn seed_items(orm: &DatabaseConnection, category_ids: &[Uuid]) -> anyhow::Result<()> {
    let items = vec![
        ("Unicorn Pancakes", "Stack of three with sprinkles", 950),
        ("Dragonfruit Bowl", "Chilled and bright pink", 1200),
        ("Gryphon Granola", "Oats, honey, mythology", 800),
        ("Phoenix Flambe", "Arrives on fire, settles down", 1600),
    ];

    for (title, description, price) in items {
        if Items::find()
            .filter(ItemCol::Title.eq(title))
            .one(orm)
            .await?
            .is_some()
        {
            continue;
        }

        let item = ItemActive {
            id: Set(Uuid::new_v4()),
            title: Set(title.to_string()),
            description: Set(description.to_string()),
            price: Set(price),
            status: Set("active".to_string()),
            photo: Set(None),
            created_at: NotSet,
        }
        .insert(orm)
        .await?;

        for category_id in category_ids {
            ItemCategoryActive {
                id: Set(Uuid::new_v4()),
                item_id: Set(item.id),
                category_id: Set(*category_id),
            }
            .insert(orm)
            .await?;
        }
    }

    println!("Seeded items");
    Ok(())
}
