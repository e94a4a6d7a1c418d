use axum_shop_api::{
    db::{create_orm_conn, create_pool},
    dto::orders::{CartItemInput, PlaceOrderRequest},
    entity::products::{ActiveModel as ProductActive, Entity as Products, Model as ProductModel},
    services::order_service,
    state::AppState,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, Set, Statement};
use uuid::Uuid;

// Concurrent checkouts naming the same products in opposite orders must both
// commit: row locks are taken in a stable order, so neither transaction waits
// on a lock the other holds.
#[tokio::test]
async fn opposing_concurrent_carts_both_commit() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    let pen = create_product(&state, "Gel Pen", "2.50", 40).await?;
    let notebook = create_product(&state, "Dot Grid Notebook", "8.00", 40).await?;

    for _ in 0..10 {
        let (first, second) = tokio::join!(
            order_service::place_order(&state, opposing_cart(&pen, &notebook)),
            order_service::place_order(&state, opposing_cart(&notebook, &pen)),
        );
        first?;
        second?;
    }

    assert_eq!(stock_of(&state, pen.id).await?, 20);
    assert_eq!(stock_of(&state, notebook.id).await?, 20);

    let history = order_service::list_order_history(&state).await?;
    assert_eq!(history.len(), 20);

    Ok(())
}

fn opposing_cart(first: &ProductModel, second: &ProductModel) -> PlaceOrderRequest {
    PlaceOrderRequest {
        cart_items: vec![
            CartItemInput {
                id: first.id,
                quantity: 1,
                price: first.price,
            },
            CartItemInput {
                id: second.id,
                quantity: 1,
                price: second.price,
            },
        ],
        total_amount: first.price + second.price,
    }
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url, 5).await?;
    let orm = create_orm_conn(database_url, 5).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    // Clean tables between runs.
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE order_items, orders, audit_logs, products, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    Ok(AppState::new(pool, orm))
}

async fn create_product(
    state: &AppState,
    name: &str,
    price: &str,
    stock: i32,
) -> anyhow::Result<ProductModel> {
    let product = ProductActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.into()),
        description: Set(Some("A product for testing".into())),
        price: Set(price.parse()?),
        stock: Set(stock),
        image_url: Set(None),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(product)
}

async fn stock_of(state: &AppState, id: Uuid) -> anyhow::Result<i32> {
    let product = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| anyhow::anyhow!("product vanished"))?;
    Ok(product.stock)
}
