use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::{
        Validate,
        orders::{
            CancelOrderRequest, CreateOrderBody, CreateOrderRequest, ListOrdersRequest,
            OrderIdRequest, OrderList, UpdateOrderStatusBody, UpdateOrderStatusRequest,
        },
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Order,
    response::{ApiResponse, Meta},
    routes::forward,
    rpc::methods,
    state::GatewayState,
    store::{Page, PageRequest},
};

pub fn router() -> Router<GatewayState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/{id}", get(get_order))
        .route("/{id}/status", put(update_order_status))
        .route("/{id}/cancel", post(cancel_order))
}

#[utoipa::path(
    post,
    path = "/api/v1/orders",
    request_body = CreateOrderBody,
    responses(
        (status = 201, description = "Order created with frozen prices", body = ApiResponse<Order>),
        (status = 400, description = "Invalid order"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<GatewayState>,
    user: AuthUser,
    Json(order): Json<CreateOrderBody>,
) -> AppResult<(StatusCode, Json<ApiResponse<Order>>)> {
    order.validate()?;
    let request = CreateOrderRequest {
        user_id: user.user_id,
        order,
    };
    let (message, data) = forward::<_, Order>(&state.orders, methods::CREATE_ORDER, &request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(message, data, Some(Meta::empty()))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders",
    params(PageRequest),
    responses(
        (status = 200, description = "Caller's orders, newest first", body = ApiResponse<OrderList>),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<GatewayState>,
    user: AuthUser,
    Query(page): Query<PageRequest>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let request = ListOrdersRequest {
        user_id: user.user_id,
        page,
    };
    let (message, data) =
        forward::<_, Page<Order>>(&state.orders, methods::LIST_ORDERS, &request).await?;
    let meta = Meta::for_page(&data);
    Ok(Json(ApiResponse::success(
        message,
        OrderList { items: data.items },
        Some(meta),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order with items", body = ApiResponse<Order>),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Order not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<GatewayState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let request = OrderIdRequest { order_id: id };
    let (message, data) = forward::<_, Order>(&state.orders, methods::GET_ORDER, &request).await?;
    Ok(Json(ApiResponse::success(message, data, Some(Meta::empty()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = UpdateOrderStatusBody,
    responses(
        (status = 200, description = "Status overwritten", body = ApiResponse<Order>),
        (status = 400, description = "Empty status"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Order not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn update_order_status(
    State(state): State<GatewayState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    Json(change): Json<UpdateOrderStatusBody>,
) -> AppResult<Json<ApiResponse<Order>>> {
    change.validate()?;
    let request = UpdateOrderStatusRequest {
        order_id: id,
        change,
    };
    let (message, data) =
        forward::<_, Order>(&state.orders, methods::UPDATE_ORDER_STATUS, &request).await?;
    Ok(Json(ApiResponse::success(message, data, Some(Meta::empty()))))
}

#[utoipa::path(
    post,
    path = "/api/v1/orders/{id}/cancel",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order cancelled", body = ApiResponse<Order>),
        (status = 400, description = "Order is delivered or already cancelled"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Order not found or not owned by caller")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn cancel_order(
    State(state): State<GatewayState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let request = CancelOrderRequest {
        order_id: id,
        user_id: user.user_id,
    };
    let (message, data) = forward::<_, Order>(&state.orders, methods::CANCEL_ORDER, &request).await?;
    Ok(Json(ApiResponse::success(message, data, Some(Meta::empty()))))
}
