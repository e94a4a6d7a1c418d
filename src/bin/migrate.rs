use axum_shop_api::{config::AppConfig, db::create_pool};

// Apply the embedded migrations and exit. The server also runs them at
// startup; this binary exists for deploy pipelines that migrate first.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    let pool = create_pool(&config.database_url, config.database_max_connections).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    println!("Migrations applied");
    Ok(())
}
