use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::orders::{
        CancelOrderRequest, CreateOrderRequest, ListOrdersRequest, OrderIdRequest,
        UpdateOrderStatusRequest,
    },
    models::Order,
    rpc::{RpcResult, methods, respond},
    services::order_service,
    state::AppState,
    store::Page,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(methods::CREATE_ORDER, post(create))
        .route(methods::GET_ORDER, post(get))
        .route(methods::LIST_ORDERS, post(list))
        .route(methods::UPDATE_ORDER_STATUS, post(update_status))
        .route(methods::CANCEL_ORDER, post(cancel))
        .with_state(state)
}

async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> RpcResult<Order> {
    respond(
        order_service::create_order(&state, payload).await,
        "order created successfully",
    )
}

async fn get(
    State(state): State<AppState>,
    Json(payload): Json<OrderIdRequest>,
) -> RpcResult<Order> {
    respond(
        order_service::get_order(&state, payload.order_id).await,
        "order retrieved successfully",
    )
}

async fn list(
    State(state): State<AppState>,
    Json(payload): Json<ListOrdersRequest>,
) -> RpcResult<Page<Order>> {
    respond(
        order_service::list_orders(&state, payload).await,
        "orders retrieved successfully",
    )
}

async fn update_status(
    State(state): State<AppState>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> RpcResult<Order> {
    respond(
        order_service::update_status(&state, payload).await,
        "order status updated successfully",
    )
}

async fn cancel(
    State(state): State<AppState>,
    Json(payload): Json<CancelOrderRequest>,
) -> RpcResult<Order> {
    respond(
        order_service::cancel_order(&state, payload).await,
        "order cancelled successfully",
    )
}
