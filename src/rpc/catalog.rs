use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::products::{
        CategoryRequest, CreateProductRequest, DealTypeRequest, ProductIdRequest,
        SearchProductsRequest, UpdateProductRequest,
    },
    models::Product,
    rpc::{Empty, RpcResult, methods, respond},
    services::product_service,
    state::AppState,
    store::{Page, PageRequest},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(methods::CREATE_PRODUCT, post(create))
        .route(methods::GET_PRODUCT, post(get))
        .route(methods::UPDATE_PRODUCT, post(update))
        .route(methods::DELETE_PRODUCT, post(delete))
        .route(methods::LIST_PRODUCTS, post(list))
        .route(methods::SEARCH_PRODUCTS, post(search))
        .route(methods::PRODUCTS_BY_CATEGORY, post(by_category))
        .route(methods::FLASH_SALES, post(flash_sales))
        .route(methods::TOP_DEALS, post(top_deals))
        .route(methods::DEALS_BY_TYPE, post(deals_by_type))
        .with_state(state)
}

async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> RpcResult<Product> {
    respond(
        product_service::create_product(&state, payload).await,
        "product created successfully",
    )
}

async fn get(
    State(state): State<AppState>,
    Json(payload): Json<ProductIdRequest>,
) -> RpcResult<Product> {
    respond(
        product_service::get_product(&state, payload.id).await,
        "product retrieved successfully",
    )
}

async fn update(
    State(state): State<AppState>,
    Json(payload): Json<UpdateProductRequest>,
) -> RpcResult<Product> {
    respond(
        product_service::update_product(&state, payload).await,
        "product updated successfully",
    )
}

async fn delete(
    State(state): State<AppState>,
    Json(payload): Json<ProductIdRequest>,
) -> RpcResult<Empty> {
    respond(
        product_service::delete_product(&state, payload.id).await,
        "product deleted successfully",
    )
}

async fn list(
    State(state): State<AppState>,
    Json(payload): Json<PageRequest>,
) -> RpcResult<Page<Product>> {
    respond(
        product_service::list_products(&state, payload).await,
        "products retrieved successfully",
    )
}

async fn search(
    State(state): State<AppState>,
    Json(payload): Json<SearchProductsRequest>,
) -> RpcResult<Page<Product>> {
    respond(
        product_service::search_products(&state, payload).await,
        "products retrieved successfully",
    )
}

async fn by_category(
    State(state): State<AppState>,
    Json(payload): Json<CategoryRequest>,
) -> RpcResult<Page<Product>> {
    respond(
        product_service::products_by_category(&state, payload).await,
        "products retrieved successfully",
    )
}

async fn flash_sales(
    State(state): State<AppState>,
    Json(payload): Json<PageRequest>,
) -> RpcResult<Page<Product>> {
    respond(
        product_service::flash_sales(&state, payload).await,
        "flash sales retrieved successfully",
    )
}

async fn top_deals(
    State(state): State<AppState>,
    Json(payload): Json<PageRequest>,
) -> RpcResult<Page<Product>> {
    respond(
        product_service::top_deals(&state, payload).await,
        "top deals retrieved successfully",
    )
}

async fn deals_by_type(
    State(state): State<AppState>,
    Json(payload): Json<DealTypeRequest>,
) -> RpcResult<Page<Product>> {
    respond(
        product_service::deals_by_type(&state, payload).await,
        "deals retrieved successfully",
    )
}
