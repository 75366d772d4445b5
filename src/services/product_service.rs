use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, EntityTrait, QueryFilter,
    QueryOrder, Select, Set,
    sea_query::{Expr, extension::postgres::PgExpr},
};
use uuid::Uuid;

use crate::{
    dto::{
        Validate,
        products::{
            CategoryRequest, CreateProductRequest, DealTypeRequest, ProductChanges,
            SearchProductsRequest, UpdateProductRequest,
        },
    },
    entity::{
        CatalogItems,
        catalog_items::{ActiveModel, Column, Model as CatalogModel},
    },
    error::{ServiceError, ServiceResult},
    models::Product,
    rpc::Empty,
    services::deals,
    state::AppState,
    store::{ActiveScope, CATALOG_PAGE_SIZE, Page, PageRequest, deactivate, fetch_page},
};

pub async fn create_product(state: &AppState, payload: CreateProductRequest) -> ServiceResult<Product> {
    payload.validate()?;

    let product = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name.trim().to_string()),
        description: Set(payload.description),
        category: Set(payload.category),
        brand: Set(payload.brand),
        image_url: Set(payload.image_url),
        price: Set(payload.price),
        discount_percentage: Set(payload.discount_percentage),
        stock: Set(payload.stock),
        is_active: Set(true),
        is_flash_sale: Set(payload.is_flash_sale),
        flash_sale_price: Set(payload.flash_sale_price),
        flash_sale_end_time: Set(payload.flash_sale_end_time.map(Into::into)),
        initial_stock: Set(payload.initial_stock),
        is_top_deal: Set(payload.is_top_deal),
        deal_type: Set(payload.deal_type),
        deal_priority: Set(payload.deal_priority),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(product_id = %product.id, "catalog item created");
    Ok(deals::evaluate(product, Utc::now()))
}

pub async fn get_product(state: &AppState, id: Uuid) -> ServiceResult<Product> {
    let product = find_product(state, id).await?;
    Ok(deals::evaluate(product, Utc::now()))
}

pub async fn update_product(state: &AppState, payload: UpdateProductRequest) -> ServiceResult<Product> {
    payload.changes.validate()?;
    let product = find_product(state, payload.id).await?;

    let mut active: ActiveModel = product.into();
    apply_changes(&mut active, payload.changes);
    active.updated_at = Set(Utc::now().into());

    let product = active.update(&state.orm).await?;
    Ok(deals::evaluate(product, Utc::now()))
}

pub async fn delete_product(state: &AppState, id: Uuid) -> ServiceResult<Empty> {
    if !deactivate::<CatalogItems, _>(id, &state.orm).await? {
        return Err(ServiceError::NotFound("product not found".into()));
    }
    tracing::info!(product_id = %id, "catalog item deactivated");
    Ok(Empty {})
}

pub async fn list_products(state: &AppState, page: PageRequest) -> ServiceResult<Page<Product>> {
    let finder = newest_first(CatalogItems::find_active());
    evaluated_page(state, finder, page).await
}

/// Case-insensitive substring match on name or description.
pub async fn search_products(
    state: &AppState,
    payload: SearchProductsRequest,
) -> ServiceResult<Page<Product>> {
    let query = payload.query.trim();
    if query.is_empty() {
        return Err(ServiceError::Validation("search query is required".into()));
    }

    let pattern = format!("%{}%", escape_like(query));
    let finder = CatalogItems::find_active().filter(
        Condition::any()
            .add(Expr::col(Column::Name).ilike(pattern.clone()))
            .add(Expr::col(Column::Description).ilike(pattern)),
    );
    evaluated_page(state, newest_first(finder), payload.page).await
}

pub async fn products_by_category(
    state: &AppState,
    payload: CategoryRequest,
) -> ServiceResult<Page<Product>> {
    if payload.category.trim().is_empty() {
        return Err(ServiceError::Validation("category is required".into()));
    }
    let finder = CatalogItems::find_active().filter(Column::Category.eq(payload.category));
    evaluated_page(state, newest_first(finder), payload.page).await
}

/// Running flash sales, soonest to end first. Expiry is judged against the
/// clock at query time.
pub async fn flash_sales(state: &AppState, page: PageRequest) -> ServiceResult<Page<Product>> {
    let finder = CatalogItems::find_active()
        .filter(Column::IsFlashSale.eq(true))
        .filter(Column::FlashSaleEndTime.gt(Utc::now()))
        .order_by_asc(Column::FlashSaleEndTime)
        .order_by_asc(Column::Id);
    evaluated_page(state, finder, page).await
}

pub async fn top_deals(state: &AppState, page: PageRequest) -> ServiceResult<Page<Product>> {
    let finder = CatalogItems::find_active().filter(Column::IsTopDeal.eq(true));
    evaluated_page(state, by_deal_priority(finder), page).await
}

pub async fn deals_by_type(state: &AppState, payload: DealTypeRequest) -> ServiceResult<Page<Product>> {
    if payload.deal_type.trim().is_empty() {
        return Err(ServiceError::Validation("deal_type is required".into()));
    }
    let finder = CatalogItems::find_active()
        .filter(Column::IsTopDeal.eq(true))
        .filter(Column::DealType.eq(payload.deal_type));
    evaluated_page(state, by_deal_priority(finder), payload.page).await
}

async fn find_product(state: &AppState, id: Uuid) -> ServiceResult<CatalogModel> {
    CatalogItems::find_active_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| ServiceError::NotFound("product not found".into()))
}

async fn evaluated_page(
    state: &AppState,
    finder: Select<CatalogItems>,
    page: PageRequest,
) -> ServiceResult<Page<Product>> {
    let paging = page.normalize(CATALOG_PAGE_SIZE);
    let page = fetch_page(finder, paging, &state.orm).await?;
    let now = Utc::now();
    Ok(page.map(|model| deals::evaluate(model, now)))
}

fn newest_first(finder: Select<CatalogItems>) -> Select<CatalogItems> {
    finder
        .order_by_desc(Column::CreatedAt)
        .order_by_desc(Column::Id)
}

fn by_deal_priority(finder: Select<CatalogItems>) -> Select<CatalogItems> {
    finder
        .order_by_desc(Column::DealPriority)
        .order_by_desc(Column::CreatedAt)
        .order_by_desc(Column::Id)
}

fn apply_changes(active: &mut ActiveModel, changes: ProductChanges) {
    if let Some(name) = changes.name.filter(|n| !n.trim().is_empty()) {
        active.name = Set(name.trim().to_string());
    }
    if let Some(description) = changes.description {
        active.description = Set(description);
    }
    if let Some(category) = changes.category {
        active.category = Set(category);
    }
    if let Some(brand) = changes.brand {
        active.brand = Set(brand);
    }
    if let Some(image_url) = changes.image_url {
        active.image_url = Set(image_url);
    }
    if let Some(price) = changes.price {
        active.price = Set(price);
    }
    if let Some(discount) = changes.discount_percentage {
        active.discount_percentage = Set(discount);
    }
    if let Some(stock) = changes.stock {
        active.stock = Set(stock);
    }
    if let Some(flash_sale_price) = changes.flash_sale_price {
        active.flash_sale_price = Set(flash_sale_price);
    }
    if let Some(initial_stock) = changes.initial_stock {
        active.initial_stock = Set(initial_stock);
    }
    if let Some(is_top_deal) = changes.is_top_deal {
        active.is_top_deal = Set(is_top_deal);
    }
    if let Some(deal_type) = changes.deal_type {
        active.deal_type = Set(deal_type);
    }
    if let Some(deal_priority) = changes.deal_priority {
        active.deal_priority = Set(deal_priority);
    }

    match (changes.is_flash_sale, changes.flash_sale_end_time) {
        (Some(false), None) => {
            active.is_flash_sale = Set(false);
            active.flash_sale_end_time = Set(None);
        }
        (is_flash_sale, end_time) => {
            if let Some(is_flash_sale) = is_flash_sale {
                active.is_flash_sale = Set(is_flash_sale);
            }
            if let Some(end_time) = end_time {
                active.flash_sale_end_time = Set(Some(end_time.into()));
            }
        }
    }
}

fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
