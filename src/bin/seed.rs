use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::{EntityTrait, PaginatorTrait};
use storefront::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    dto::{auth::RegisterRequest, products::CreateProductRequest},
    entity::CatalogItems,
    error::ServiceError,
    services::{auth_service, product_service},
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env(0)?;

    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;
    let state = AppState::new(pool);

    ensure_user(&state, "demo@example.com", "demo123").await?;
    seed_products(&state).await?;

    println!("Seed completed");
    Ok(())
}

async fn ensure_user(state: &AppState, email: &str, password: &str) -> anyhow::Result<()> {
    let request = RegisterRequest {
        first_name: "Demo".into(),
        last_name: "Shopper".into(),
        email: email.into(),
        password: password.into(),
        phone: String::new(),
    };
    match auth_service::register(state, request).await {
        Ok(created) => println!("Created user {email} ({})", created.user_id),
        Err(ServiceError::Rule(_)) => println!("User {email} already exists"),
        Err(err) => return Err(anyhow::anyhow!(err)),
    }
    Ok(())
}

async fn seed_products(state: &AppState) -> anyhow::Result<()> {
    let existing = CatalogItems::find().count(&state.orm).await?;
    if existing > 0 {
        println!("Catalog already has {existing} items, skipping");
        return Ok(());
    }

    let items = [
        product("Smartphone X", "phones", "Acme", "299.99", "10", 40, None),
        product("Wireless Earbuds", "audio", "Sonic", "49.99", "0", 120, None),
        product("4K Television", "tv", "Vista", "649.00", "15", 8, Some(("tv_week", 5))),
        product("Blender Pro", "kitchen", "Mixa", "89.50", "20", 25, Some(("daily", 3))),
    ];

    for item in items {
        let created = product_service::create_product(state, item).await?;
        println!("Created product {} ({})", created.name, created.id);
    }

    let mut flash = product("Gaming Laptop", "computers", "Bolt", "1199.00", "25", 30, None);
    flash.is_flash_sale = true;
    flash.initial_stock = 50;
    flash.flash_sale_price = "899.25".parse()?;
    flash.flash_sale_end_time = Some(Utc::now() + Duration::hours(48));
    let created = product_service::create_product(state, flash).await?;
    println!("Created flash sale {} ({})", created.name, created.id);

    Ok(())
}

fn product(
    name: &str,
    category: &str,
    brand: &str,
    price: &str,
    discount: &str,
    stock: i32,
    deal: Option<(&str, i32)>,
) -> CreateProductRequest {
    let (is_top_deal, deal_type, deal_priority) = match deal {
        Some((deal_type, priority)) => (true, deal_type.to_string(), priority),
        None => (false, String::new(), 0),
    };
    CreateProductRequest {
        name: name.into(),
        description: format!("{brand} {name}"),
        category: category.into(),
        brand: brand.into(),
        image_url: String::new(),
        price: price.parse().unwrap_or(Decimal::ONE),
        discount_percentage: discount.parse().unwrap_or(Decimal::ZERO),
        stock,
        is_flash_sale: false,
        flash_sale_price: Decimal::ZERO,
        flash_sale_end_time: None,
        initial_stock: 0,
        is_top_deal,
        deal_type,
        deal_priority,
    }
}
