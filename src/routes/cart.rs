use axum::{
    Json, Router,
    extract::State,
    routing::{get, post, put},
};

use crate::{
    dto::{
        UserIdRequest, Validate,
        cart::{
            AddToCartBody, AddToCartRequest, RemoveFromCartBody, RemoveFromCartRequest,
            UpdateCartItemBody, UpdateCartItemRequest,
        },
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Basket,
    response::{ApiResponse, Meta},
    routes::forward,
    rpc::{Empty, methods},
    state::GatewayState,
};

pub fn router() -> Router<GatewayState> {
    Router::new()
        .route("/", get(get_cart).delete(clear_cart))
        .route("/add", post(add_to_cart))
        .route("/update", put(update_cart_item))
        .route("/remove", post(remove_from_cart))
}

#[utoipa::path(
    get,
    path = "/api/v1/cart",
    responses(
        (status = 200, description = "Current user's basket with totals", body = ApiResponse<Basket>),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn get_cart(
    State(state): State<GatewayState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Basket>>> {
    let request = UserIdRequest {
        user_id: user.user_id,
    };
    let (message, data) = forward::<_, Basket>(&state.basket, methods::GET_BASKET, &request).await?;
    Ok(Json(ApiResponse::success(message, data, Some(Meta::empty()))))
}

#[utoipa::path(
    post,
    path = "/api/v1/cart/add",
    request_body = AddToCartBody,
    responses(
        (status = 200, description = "Item added or merged", body = ApiResponse<Basket>),
        (status = 400, description = "Invalid quantity or price"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<GatewayState>,
    user: AuthUser,
    Json(item): Json<AddToCartBody>,
) -> AppResult<Json<ApiResponse<Basket>>> {
    item.validate()?;
    let request = AddToCartRequest {
        user_id: user.user_id,
        item,
    };
    let (message, data) =
        forward::<_, Basket>(&state.basket, methods::ADD_TO_BASKET, &request).await?;
    Ok(Json(ApiResponse::success(message, data, Some(Meta::empty()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/cart/update",
    request_body = UpdateCartItemBody,
    responses(
        (status = 200, description = "Quantity replaced", body = ApiResponse<Basket>),
        (status = 400, description = "Invalid quantity"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Item not in basket")
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn update_cart_item(
    State(state): State<GatewayState>,
    user: AuthUser,
    Json(item): Json<UpdateCartItemBody>,
) -> AppResult<Json<ApiResponse<Basket>>> {
    item.validate()?;
    let request = UpdateCartItemRequest {
        user_id: user.user_id,
        item,
    };
    let (message, data) =
        forward::<_, Basket>(&state.basket, methods::UPDATE_BASKET_ITEM, &request).await?;
    Ok(Json(ApiResponse::success(message, data, Some(Meta::empty()))))
}

#[utoipa::path(
    post,
    path = "/api/v1/cart/remove",
    request_body = RemoveFromCartBody,
    responses(
        (status = 200, description = "Item removed (no-op when absent)", body = ApiResponse<Basket>),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<GatewayState>,
    user: AuthUser,
    Json(body): Json<RemoveFromCartBody>,
) -> AppResult<Json<ApiResponse<Basket>>> {
    let request = RemoveFromCartRequest {
        user_id: user.user_id,
        product_id: body.product_id,
    };
    let (message, data) =
        forward::<_, Basket>(&state.basket, methods::REMOVE_FROM_BASKET, &request).await?;
    Ok(Json(ApiResponse::success(message, data, Some(Meta::empty()))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/cart",
    responses(
        (status = 200, description = "Basket emptied"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn clear_cart(
    State(state): State<GatewayState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let request = UserIdRequest {
        user_id: user.user_id,
    };
    let (message, _) = forward::<_, Empty>(&state.basket, methods::CLEAR_BASKET, &request).await?;
    Ok(Json(ApiResponse::success(
        message,
        serde_json::json!({}),
        Some(Meta::empty()),
    )))
}
