use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::{
        Validate,
        products::{
            CategoryRequest, CreateProductRequest, DealTypeRequest, ProductChanges,
            ProductIdRequest, ProductList, SearchProductsRequest, UpdateProductRequest,
        },
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Product,
    response::{ApiResponse, Meta},
    routes::{
        forward,
        params::{CategoryQuery, DealTypeQuery, SearchQuery},
    },
    rpc::{Empty, methods},
    state::GatewayState,
    store::{Page, PageRequest},
};

pub fn router() -> Router<GatewayState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/search", get(search_products))
        .route("/category", get(products_by_category))
        .route("/deals", get(top_deals))
        .route("/deals/type", get(deals_by_type))
        .route("/flash-sales", get(flash_sales))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}

fn product_page(message: String, page: Page<Product>) -> Json<ApiResponse<ProductList>> {
    let meta = Meta::for_page(&page);
    Json(ApiResponse::success(
        message,
        ProductList { items: page.items },
        Some(meta),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/products",
    params(PageRequest),
    responses(
        (status = 200, description = "List products", body = ApiResponse<ProductList>)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<GatewayState>,
    Query(page): Query<PageRequest>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let (message, data) =
        forward::<_, Page<Product>>(&state.catalog, methods::LIST_PRODUCTS, &page).await?;
    Ok(product_page(message, data))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Products matching the query", body = ApiResponse<ProductList>),
        (status = 400, description = "Missing query")
    ),
    tag = "Products"
)]
pub async fn search_products(
    State(state): State<GatewayState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let request = SearchProductsRequest::try_from(query)?;
    let (message, data) =
        forward::<_, Page<Product>>(&state.catalog, methods::SEARCH_PRODUCTS, &request).await?;
    Ok(product_page(message, data))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/category",
    params(CategoryQuery),
    responses(
        (status = 200, description = "Products in a category", body = ApiResponse<ProductList>),
        (status = 400, description = "Missing category")
    ),
    tag = "Products"
)]
pub async fn products_by_category(
    State(state): State<GatewayState>,
    Query(query): Query<CategoryQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let request = CategoryRequest::try_from(query)?;
    let (message, data) =
        forward::<_, Page<Product>>(&state.catalog, methods::PRODUCTS_BY_CATEGORY, &request)
            .await?;
    Ok(product_page(message, data))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/deals",
    params(PageRequest),
    responses(
        (status = 200, description = "Top deals by priority", body = ApiResponse<ProductList>)
    ),
    tag = "Products"
)]
pub async fn top_deals(
    State(state): State<GatewayState>,
    Query(page): Query<PageRequest>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let (message, data) =
        forward::<_, Page<Product>>(&state.catalog, methods::TOP_DEALS, &page).await?;
    Ok(product_page(message, data))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/deals/type",
    params(DealTypeQuery),
    responses(
        (status = 200, description = "Top deals of one type", body = ApiResponse<ProductList>),
        (status = 400, description = "Missing deal_type")
    ),
    tag = "Products"
)]
pub async fn deals_by_type(
    State(state): State<GatewayState>,
    Query(query): Query<DealTypeQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let request = DealTypeRequest::try_from(query)?;
    let (message, data) =
        forward::<_, Page<Product>>(&state.catalog, methods::DEALS_BY_TYPE, &request).await?;
    Ok(product_page(message, data))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/flash-sales",
    params(PageRequest),
    responses(
        (status = 200, description = "Running flash sales, soonest end first", body = ApiResponse<ProductList>)
    ),
    tag = "Products"
)]
pub async fn flash_sales(
    State(state): State<GatewayState>,
    Query(page): Query<PageRequest>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let (message, data) =
        forward::<_, Page<Product>>(&state.catalog, methods::FLASH_SALES, &page).await?;
    Ok(product_page(message, data))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Get product", body = ApiResponse<Product>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<GatewayState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let request = ProductIdRequest { id };
    let (message, data) =
        forward::<_, Product>(&state.catalog, methods::GET_PRODUCT, &request).await?;
    Ok(Json(ApiResponse::success(message, data, Some(Meta::empty()))))
}

#[utoipa::path(
    post,
    path = "/api/v1/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Create product", body = ApiResponse<Product>),
        (status = 400, description = "Invalid product"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<GatewayState>,
    _user: AuthUser,
    Json(payload): Json<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Product>>)> {
    payload.validate()?;
    let (message, data) =
        forward::<_, Product>(&state.catalog, methods::CREATE_PRODUCT, &payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(message, data, Some(Meta::empty()))),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = ProductChanges,
    responses(
        (status = 200, description = "Updated product", body = ApiResponse<Product>),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<GatewayState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    Json(changes): Json<ProductChanges>,
) -> AppResult<Json<ApiResponse<Product>>> {
    changes.validate()?;
    let request = UpdateProductRequest { id, changes };
    let (message, data) =
        forward::<_, Product>(&state.catalog, methods::UPDATE_PRODUCT, &request).await?;
    Ok(Json(ApiResponse::success(message, data, Some(Meta::empty()))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Deleted product"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<GatewayState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let request = ProductIdRequest { id };
    let (message, _) =
        forward::<_, Empty>(&state.catalog, methods::DELETE_PRODUCT, &request).await?;
    Ok(Json(ApiResponse::success(
        message,
        serde_json::json!({}),
        Some(Meta::empty()),
    )))
}
