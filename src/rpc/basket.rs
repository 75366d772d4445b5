use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::{
        UserIdRequest,
        cart::{AddToCartRequest, RemoveFromCartRequest, UpdateCartItemRequest},
    },
    models::Basket,
    rpc::{Empty, RpcResult, methods, respond},
    services::cart_service,
    state::AppState,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(methods::GET_BASKET, post(get))
        .route(methods::ADD_TO_BASKET, post(add))
        .route(methods::UPDATE_BASKET_ITEM, post(update))
        .route(methods::REMOVE_FROM_BASKET, post(remove))
        .route(methods::CLEAR_BASKET, post(clear))
        .with_state(state)
}

async fn get(
    State(state): State<AppState>,
    Json(payload): Json<UserIdRequest>,
) -> RpcResult<Basket> {
    respond(
        cart_service::get_basket(&state, payload.user_id).await,
        "cart retrieved successfully",
    )
}

async fn add(
    State(state): State<AppState>,
    Json(payload): Json<AddToCartRequest>,
) -> RpcResult<Basket> {
    respond(
        cart_service::add_to_basket(&state, payload).await,
        "item added to cart",
    )
}

async fn update(
    State(state): State<AppState>,
    Json(payload): Json<UpdateCartItemRequest>,
) -> RpcResult<Basket> {
    respond(
        cart_service::update_basket_item(&state, payload).await,
        "cart item updated",
    )
}

async fn remove(
    State(state): State<AppState>,
    Json(payload): Json<RemoveFromCartRequest>,
) -> RpcResult<Basket> {
    respond(
        cart_service::remove_from_basket(&state, payload).await,
        "item removed from cart",
    )
}

async fn clear(
    State(state): State<AppState>,
    Json(payload): Json<UserIdRequest>,
) -> RpcResult<Empty> {
    respond(
        cart_service::clear(&state, payload.user_id).await,
        "cart cleared",
    )
}
