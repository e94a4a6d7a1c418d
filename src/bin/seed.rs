use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use axum_shop_api::{config::AppConfig, db::create_pool};
use password_hash::rand_core::OsRng;
use rust_decimal::Decimal;
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url, config.database_max_connections).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let admin_id = ensure_admin(&pool, "admin", "admin123").await?;
    seed_products(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}");
    Ok(())
}

// Idempotent: an existing admin keeps its password, reruns change nothing.
async fn ensure_admin(pool: &sqlx::PgPool, username: &str, password: &str) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, username, password_hash, role)
        VALUES ($1, $2, $3, 'admin')
        ON CONFLICT (username) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(username)
    .bind(password_hash)
    .fetch_optional(pool)
    .await?;

    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE username = $1")
                .bind(username)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured admin user {username}");
    Ok(user_id)
}

async fn seed_products(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let products = [
        (
            "Walnut Desk Organizer",
            "Five compartments, oiled finish",
            "49.90",
            40,
            Some("/images/desk-organizer.jpg"),
        ),
        (
            "Ceramic Pour-Over Set",
            "Dripper and carafe, 600 ml",
            "34.50",
            25,
            Some("/images/pour-over.jpg"),
        ),
        (
            "Linen Tote Bag",
            "Natural dye, inner pocket",
            "19.99",
            120,
            None,
        ),
        (
            "Brass Bookmark Pair",
            "Etched, gift boxed",
            "12.00",
            200,
            Some("/images/bookmarks.jpg"),
        ),
    ];

    for (name, description, price, stock, image_url) in products {
        let price: Decimal = price.parse()?;
        // Product names carry no unique constraint, so guard by hand.
        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, price, stock, image_url)
            SELECT $1, $2, $3, $4, $5, $6
            WHERE NOT EXISTS (SELECT 1 FROM products WHERE name = $2)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(stock)
        .bind(image_url)
        .execute(pool)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}
