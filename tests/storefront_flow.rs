use std::str::FromStr;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use secrecy::SecretString;
use storefront::{
    config::AuthConfig,
    db::{create_pool, run_migrations},
    dto::{
        auth::{LoginRequest, ProfileChanges, RegisterRequest, UpdateUserRequest},
        cart::{AddToCartBody, AddToCartRequest, RemoveFromCartRequest, UpdateCartItemBody, UpdateCartItemRequest},
        orders::{
            CancelOrderRequest, CreateOrderBody, CreateOrderRequest, ListOrdersRequest,
            OrderItemInput, UpdateOrderStatusBody, UpdateOrderStatusRequest,
        },
        products::{
            CategoryRequest, CreateProductRequest, DealTypeRequest, ProductChanges,
            SearchProductsRequest, UpdateProductRequest,
        },
    },
    entity::{BasketItems, Baskets, baskets},
    error::ServiceError,
    services::{auth_service, cart_service, order_service, product_service, token::TokenService},
    state::AppState,
    store::PageRequest,
};
use uuid::Uuid;

// Each test works on fresh ids, so tests share one database without truncating it.
async fn setup() -> anyhow::Result<Option<AppState>> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests.");
            return Ok(None);
        }
    };

    let pool = create_pool(&database_url).await?;
    run_migrations(&pool).await?;
    Ok(Some(AppState::new(pool)))
}

fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).expect("decimal")
}

fn basket_line(product_id: Uuid, name: &str, quantity: i32, price: &str) -> AddToCartBody {
    AddToCartBody {
        product_id,
        product_name: name.into(),
        image_url: format!("https://img.example.com/{name}.png"),
        quantity,
        price: dec(price),
    }
}

fn order_line(quantity: i32, price: &str) -> OrderItemInput {
    OrderItemInput {
        product_id: Uuid::new_v4(),
        product_name: format!("item {price}"),
        quantity,
        price: dec(price),
    }
}

async fn place_order(state: &AppState, user_id: Uuid, items: Vec<OrderItemInput>) -> anyhow::Result<storefront::models::Order> {
    Ok(order_service::create_order(
        state,
        CreateOrderRequest {
            user_id,
            order: CreateOrderBody {
                shipping_address: "12 Market Street".into(),
                payment_method: "card".into(),
                items,
            },
        },
    )
    .await?)
}

#[tokio::test]
async fn adding_same_product_merges_into_one_line() -> anyhow::Result<()> {
    let Some(state) = setup().await? else { return Ok(()) };
    let user_id = Uuid::new_v4();
    let product_id = Uuid::new_v4();

    cart_service::add_to_basket(
        &state,
        AddToCartRequest { user_id, item: basket_line(product_id, "kettle", 2, "25.00") },
    )
    .await?;
    let basket = cart_service::add_to_basket(
        &state,
        AddToCartRequest { user_id, item: basket_line(product_id, "renamed", 3, "99.00") },
    )
    .await?;

    assert_eq!(basket.items.len(), 1);
    let line = &basket.items[0];
    assert_eq!(line.quantity, 5);
    // the stored line keeps what it was created with
    assert_eq!(line.price, dec("25.00"));
    assert_eq!(line.product_name, "kettle");
    assert_eq!(basket.total_items, 5);
    assert_eq!(basket.total_price, dec("125.00"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_adds_never_lose_increments() -> anyhow::Result<()> {
    let Some(state) = setup().await? else { return Ok(()) };
    let user_id = Uuid::new_v4();
    let product_id = Uuid::new_v4();
    const N: i32 = 16;

    let mut handles = Vec::new();
    for _ in 0..N {
        let state = state.clone();
        handles.push(tokio::spawn(async move {
            cart_service::add_to_basket(
                &state,
                AddToCartRequest { user_id, item: basket_line(product_id, "mug", 1, "8.50") },
            )
            .await
        }));
    }
    for handle in handles {
        handle.await??;
    }

    let basket = cart_service::get_basket(&state, user_id).await?;
    assert_eq!(basket.items.len(), 1);
    assert_eq!(basket.items[0].quantity, N);

    let baskets = Baskets::find()
        .filter(baskets::Column::UserId.eq(user_id))
        .count(&state.orm)
        .await?;
    assert_eq!(baskets, 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_get_or_create_makes_one_basket() -> anyhow::Result<()> {
    let Some(state) = setup().await? else { return Ok(()) };
    let user_id = Uuid::new_v4();

    let mut handles = Vec::new();
    for _ in 0..16 {
        let state = state.clone();
        handles.push(tokio::spawn(async move {
            cart_service::get_or_create(&state, user_id).await
        }));
    }
    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await??.id);
    }

    ids.dedup();
    assert_eq!(ids.len(), 1);
    let baskets = Baskets::find()
        .filter(baskets::Column::UserId.eq(user_id))
        .count(&state.orm)
        .await?;
    assert_eq!(baskets, 1);
    Ok(())
}

#[tokio::test]
async fn basket_update_remove_and_clear() -> anyhow::Result<()> {
    let Some(state) = setup().await? else { return Ok(()) };
    let user_id = Uuid::new_v4();
    let kept = Uuid::new_v4();
    let dropped = Uuid::new_v4();

    // reading never creates a basket
    let empty = cart_service::get_basket(&state, user_id).await?;
    assert!(empty.id.is_none());
    assert_eq!(empty.total_price, Decimal::ZERO);
    cart_service::clear(&state, user_id).await?;

    cart_service::add_to_basket(&state, AddToCartRequest { user_id, item: basket_line(kept, "lamp", 1, "30.00") }).await?;
    cart_service::add_to_basket(&state, AddToCartRequest { user_id, item: basket_line(dropped, "rug", 2, "45.00") }).await?;

    let basket = cart_service::update_basket_item(
        &state,
        UpdateCartItemRequest { user_id, item: UpdateCartItemBody { product_id: kept, quantity: 4 } },
    )
    .await?;
    let lamp = basket.items.iter().find(|i| i.product_id == kept).expect("lamp line");
    assert_eq!(lamp.quantity, 4);
    assert_eq!(basket.total_price, dec("210.00"));

    let missing = cart_service::update_basket_item(
        &state,
        UpdateCartItemRequest { user_id, item: UpdateCartItemBody { product_id: Uuid::new_v4(), quantity: 1 } },
    )
    .await;
    assert!(matches!(missing, Err(ServiceError::NotFound(_))));

    let zero = cart_service::update_basket_item(
        &state,
        UpdateCartItemRequest { user_id, item: UpdateCartItemBody { product_id: kept, quantity: 0 } },
    )
    .await;
    assert!(matches!(zero, Err(ServiceError::Validation(_))));

    let basket = cart_service::remove_from_basket(&state, RemoveFromCartRequest { user_id, product_id: dropped }).await?;
    assert_eq!(basket.items.len(), 1);
    // removing again is a no-op
    cart_service::remove_from_basket(&state, RemoveFromCartRequest { user_id, product_id: dropped }).await?;

    cart_service::clear(&state, user_id).await?;
    let cleared = cart_service::get_basket(&state, user_id).await?;
    assert!(cleared.id.is_some());
    assert!(cleared.items.is_empty());
    assert_eq!(cleared.total_items, 0);

    let lines = BasketItems::find()
        .filter(storefront::entity::basket_items::Column::BasketId.eq(cleared.id.expect("basket id")))
        .count(&state.orm)
        .await?;
    assert_eq!(lines, 0);
    Ok(())
}

#[tokio::test]
async fn order_total_is_frozen_at_creation() -> anyhow::Result<()> {
    let Some(state) = setup().await? else { return Ok(()) };
    let user_id = Uuid::new_v4();

    let order = place_order(&state, user_id, vec![order_line(2, "299.99"), order_line(1, "49.99")]).await?;

    assert_eq!(order.total_price, dec("649.97"));
    assert_eq!(order.status, "pending");
    assert_eq!(order.items.len(), 2);
    let item_sum: Decimal = order.items.iter().map(|i| i.subtotal).sum();
    assert_eq!(item_sum, order.total_price);

    let reloaded = order_service::get_order(&state, order.id).await?;
    assert_eq!(reloaded.total_price, dec("649.97"));

    let invalid = order_service::create_order(
        &state,
        CreateOrderRequest {
            user_id,
            order: CreateOrderBody {
                shipping_address: "nowhere".into(),
                payment_method: "card".into(),
                items: vec![],
            },
        },
    )
    .await;
    assert!(matches!(invalid, Err(ServiceError::Validation(_))));
    Ok(())
}

#[tokio::test]
async fn cancellation_guards_terminal_state_and_ownership() -> anyhow::Result<()> {
    let Some(state) = setup().await? else { return Ok(()) };
    let owner = Uuid::new_v4();

    let delivered = place_order(&state, owner, vec![order_line(1, "10.00")]).await?;
    order_service::update_status(
        &state,
        UpdateOrderStatusRequest {
            order_id: delivered.id,
            change: UpdateOrderStatusBody { status: "delivered".into() },
        },
    )
    .await?;

    let err = order_service::cancel_order(&state, CancelOrderRequest { order_id: delivered.id, user_id: owner })
        .await
        .expect_err("delivered orders cannot be cancelled");
    assert!(matches!(err, ServiceError::Rule(_)));
    assert!(err.to_string().contains("delivered"));
    assert_eq!(order_service::get_order(&state, delivered.id).await?.status, "delivered");

    let open = place_order(&state, owner, vec![order_line(1, "10.00")]).await?;
    let err = order_service::cancel_order(&state, CancelOrderRequest { order_id: open.id, user_id: Uuid::new_v4() })
        .await
        .expect_err("strangers cannot cancel");
    assert!(matches!(err, ServiceError::NotFound(_)));
    assert_eq!(err.to_string(), "order not found or unauthorized");
    assert_eq!(order_service::get_order(&state, open.id).await?.status, "pending");

    let cancelled = order_service::cancel_order(&state, CancelOrderRequest { order_id: open.id, user_id: owner }).await?;
    assert_eq!(cancelled.status, "cancelled");
    assert_eq!(cancelled.items.len(), 1);

    let again = order_service::cancel_order(&state, CancelOrderRequest { order_id: open.id, user_id: owner }).await;
    assert!(matches!(again, Err(ServiceError::Rule(_))));
    Ok(())
}

#[tokio::test]
async fn order_listing_pages_newest_first() -> anyhow::Result<()> {
    let Some(state) = setup().await? else { return Ok(()) };
    let user_id = Uuid::new_v4();

    let mut created = Vec::new();
    for price in ["1.00", "2.00", "3.00"] {
        created.push(place_order(&state, user_id, vec![order_line(1, price)]).await?.id);
    }

    let page = order_service::list_orders(
        &state,
        ListOrdersRequest { user_id, page: PageRequest::new(1, 0) },
    )
    .await?;
    assert_eq!(page.page_size, 10);
    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 3);
    assert!(page.items.iter().all(|o| o.items.len() == 1));

    let second = order_service::list_orders(
        &state,
        ListOrdersRequest { user_id, page: PageRequest::new(2, 1) },
    )
    .await?;
    assert_eq!(second.total, 3);
    assert_eq!(second.items.len(), 1);
    assert_eq!(second.items[0].id, created[1]);

    let missing = order_service::update_status(
        &state,
        UpdateOrderStatusRequest {
            order_id: Uuid::new_v4(),
            change: UpdateOrderStatusBody { status: "shipped".into() },
        },
    )
    .await;
    assert!(matches!(missing, Err(ServiceError::NotFound(_))));
    Ok(())
}

fn catalog_item(name: &str, category: &str) -> CreateProductRequest {
    CreateProductRequest {
        name: name.into(),
        description: format!("{name} for testing"),
        category: category.into(),
        brand: "TestBrand".into(),
        image_url: String::new(),
        price: dec("200.00"),
        discount_percentage: dec("25"),
        stock: 25,
        is_flash_sale: false,
        flash_sale_price: Decimal::ZERO,
        flash_sale_end_time: None,
        initial_stock: 100,
        is_top_deal: false,
        deal_type: String::new(),
        deal_priority: 0,
    }
}

#[tokio::test]
async fn catalog_soft_delete_and_flash_sales() -> anyhow::Result<()> {
    let Some(state) = setup().await? else { return Ok(()) };
    let category = format!("cat-{}", Uuid::new_v4());

    let kept = product_service::create_product(&state, catalog_item("Kept Widget", &category)).await?;
    assert_eq!(kept.final_price, dec("150.00"));
    assert_eq!(kept.flash_sale_progress, 75);
    assert!(kept.in_stock);

    let doomed = product_service::create_product(&state, catalog_item("Doomed Widget", &category)).await?;
    product_service::delete_product(&state, doomed.id).await?;
    assert!(matches!(
        product_service::get_product(&state, doomed.id).await,
        Err(ServiceError::NotFound(_))
    ));
    assert!(matches!(
        product_service::delete_product(&state, doomed.id).await,
        Err(ServiceError::NotFound(_))
    ));

    let listed = product_service::products_by_category(
        &state,
        CategoryRequest { category: category.clone(), page: PageRequest::default() },
    )
    .await?;
    assert_eq!(listed.total, 1);
    assert_eq!(listed.page_size, 20);
    assert_eq!(listed.items[0].id, kept.id);

    let found = product_service::search_products(
        &state,
        SearchProductsRequest { query: "kept widget".into(), page: PageRequest::new(1, 100) },
    )
    .await?;
    assert!(found.items.iter().any(|p| p.id == kept.id));
    assert!(found.items.iter().all(|p| p.id != doomed.id));

    let mut running = catalog_item("Running Sale", &category);
    running.is_flash_sale = true;
    running.flash_sale_end_time = Some(Utc::now() + Duration::hours(2));
    let running = product_service::create_product(&state, running).await?;
    assert!(running.flash_sale_active);

    let mut expired = catalog_item("Expired Sale", &category);
    expired.is_flash_sale = true;
    expired.flash_sale_end_time = Some(Utc::now() - Duration::minutes(1));
    let expired = product_service::create_product(&state, expired).await?;
    assert!(!expired.flash_sale_active);

    let sales = product_service::flash_sales(&state, PageRequest::new(1, 100)).await?;
    assert!(sales.items.iter().any(|p| p.id == running.id));
    assert!(sales.items.iter().all(|p| p.id != expired.id));

    // turning the sale off without a new end time clears the end time
    let stopped = product_service::update_product(
        &state,
        UpdateProductRequest {
            id: running.id,
            changes: ProductChanges { is_flash_sale: Some(false), ..Default::default() },
        },
    )
    .await?;
    assert!(!stopped.is_flash_sale);
    assert!(stopped.flash_sale_end_time.is_none());

    let bad = product_service::update_product(
        &state,
        UpdateProductRequest {
            id: kept.id,
            changes: ProductChanges { discount_percentage: Some(dec("120")), ..Default::default() },
        },
    )
    .await;
    assert!(matches!(bad, Err(ServiceError::Validation(_))));
    Ok(())
}

fn positions(page: &[storefront::models::Product], ids: &[Uuid]) -> Vec<Uuid> {
    page.iter().map(|p| p.id).filter(|id| ids.contains(id)).collect()
}

#[tokio::test]
async fn flash_sales_list_soonest_ending_first() -> anyhow::Result<()> {
    let Some(state) = setup().await? else { return Ok(()) };
    let category = format!("cat-{}", Uuid::new_v4());

    let mut later = catalog_item("Ends Later", &category);
    later.is_flash_sale = true;
    later.flash_sale_end_time = Some(Utc::now() + Duration::minutes(20));
    let later = product_service::create_product(&state, later).await?;

    let mut sooner = catalog_item("Ends Sooner", &category);
    sooner.is_flash_sale = true;
    sooner.flash_sale_end_time = Some(Utc::now() + Duration::minutes(10));
    let sooner = product_service::create_product(&state, sooner).await?;

    let sales = product_service::flash_sales(&state, PageRequest::new(1, 100)).await?;
    assert_eq!(positions(&sales.items, &[later.id, sooner.id]), vec![sooner.id, later.id]);

    for id in [later.id, sooner.id] {
        product_service::delete_product(&state, id).await?;
    }
    Ok(())
}

#[tokio::test]
async fn top_deals_rank_by_priority_then_recency() -> anyhow::Result<()> {
    let Some(state) = setup().await? else { return Ok(()) };
    let category = format!("cat-{}", Uuid::new_v4());
    let deal_type = format!("bundle-{}", Uuid::new_v4());

    let deal = |name: &str, kind: &str, priority: i32| {
        let mut item = catalog_item(name, &category);
        item.is_top_deal = true;
        item.deal_type = kind.to_string();
        item.deal_priority = priority;
        item
    };

    let minor = product_service::create_product(&state, deal("Minor Deal", &deal_type, i32::MAX - 1)).await?;
    let older = product_service::create_product(&state, deal("Older Major", &deal_type, i32::MAX)).await?;
    let newer = product_service::create_product(&state, deal("Newer Major", &deal_type, i32::MAX)).await?;
    let other = product_service::create_product(&state, deal("Other Type", "clearance", i32::MAX)).await?;
    let ids = [minor.id, older.id, newer.id, other.id];

    let top = product_service::top_deals(&state, PageRequest::new(1, 100)).await?;
    assert_eq!(
        positions(&top.items, &ids),
        vec![other.id, newer.id, older.id, minor.id]
    );

    let typed = product_service::deals_by_type(
        &state,
        DealTypeRequest { deal_type: deal_type.clone(), page: PageRequest::default() },
    )
    .await?;
    assert_eq!(typed.total, 3);
    let typed_ids: Vec<Uuid> = typed.items.iter().map(|p| p.id).collect();
    assert_eq!(typed_ids, vec![newer.id, older.id, minor.id]);

    let blank = product_service::deals_by_type(
        &state,
        DealTypeRequest { deal_type: "  ".into(), page: PageRequest::default() },
    )
    .await;
    assert!(matches!(blank, Err(ServiceError::Validation(_))));

    for id in ids {
        product_service::delete_product(&state, id).await?;
    }
    Ok(())
}

#[tokio::test]
async fn identity_register_login_and_deactivate() -> anyhow::Result<()> {
    let Some(state) = setup().await? else { return Ok(()) };
    let tokens = TokenService::new(&AuthConfig {
        jwt_secret: SecretString::from("flow-secret".to_string()),
        access_ttl: Duration::hours(24),
        refresh_ttl: Duration::days(7),
    });
    let email = format!("shopper-{}@example.com", Uuid::new_v4());

    let register = || RegisterRequest {
        first_name: "Ada".into(),
        last_name: "Buyer".into(),
        email: email.clone(),
        password: "secret123".into(),
        phone: "0800000000".into(),
    };

    let created = auth_service::register(&state, register()).await?;
    let duplicate = auth_service::register(&state, register()).await;
    assert!(matches!(duplicate, Err(ServiceError::Rule(ref m)) if m == "user with this email already exists"));

    let wrong = auth_service::login(
        &state,
        &tokens,
        LoginRequest { email: email.clone(), password: "nope-nope".into() },
    )
    .await;
    assert!(matches!(wrong, Err(ServiceError::Unauthorized(_))));

    let login = auth_service::login(
        &state,
        &tokens,
        LoginRequest { email: email.clone(), password: "secret123".into() },
    )
    .await?;
    assert_eq!(login.user.id, created.user_id);
    assert_eq!(tokens.subject(&login.token)?, created.user_id);
    assert_eq!(tokens.subject(&login.refresh_token)?, created.user_id);

    let updated = auth_service::update_user(
        &state,
        UpdateUserRequest {
            user_id: created.user_id,
            changes: ProfileChanges {
                first_name: Some(String::new()),
                address: Some("1 Main Road".into()),
                ..Default::default()
            },
        },
    )
    .await?;
    assert_eq!(updated.first_name, "Ada");
    assert_eq!(updated.address, "1 Main Road");

    auth_service::delete_user(&state, created.user_id).await?;
    assert!(matches!(
        auth_service::get_user(&state, created.user_id).await,
        Err(ServiceError::NotFound(_))
    ));
    let after = auth_service::login(
        &state,
        &tokens,
        LoginRequest { email, password: "secret123".into() },
    )
    .await;
    assert!(matches!(after, Err(ServiceError::Unauthorized(_))));
    Ok(())
}
