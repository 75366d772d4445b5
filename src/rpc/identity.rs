use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::{
        UserIdRequest,
        auth::{
            LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UpdateUserRequest,
            VerifyTokenRequest, VerifyTokenResponse,
        },
    },
    models::User,
    rpc::{Empty, RpcReply, RpcResult, methods, respond},
    services::auth_service,
    state::IdentityState,
};

pub fn router(state: IdentityState) -> Router {
    Router::new()
        .route(methods::REGISTER, post(register))
        .route(methods::LOGIN, post(login))
        .route(methods::GET_USER, post(get_user))
        .route(methods::UPDATE_USER, post(update_user))
        .route(methods::DELETE_USER, post(delete_user))
        .route(methods::VERIFY_TOKEN, post(verify_token))
        .with_state(state)
}

async fn register(
    State(state): State<IdentityState>,
    Json(payload): Json<RegisterRequest>,
) -> RpcResult<RegisterResponse> {
    respond(
        auth_service::register(&state.app, payload).await,
        "user registered successfully",
    )
}

async fn login(
    State(state): State<IdentityState>,
    Json(payload): Json<LoginRequest>,
) -> RpcResult<LoginResponse> {
    respond(
        auth_service::login(&state.app, &state.tokens, payload).await,
        "login successful",
    )
}

async fn get_user(
    State(state): State<IdentityState>,
    Json(payload): Json<UserIdRequest>,
) -> RpcResult<User> {
    respond(
        auth_service::get_user(&state.app, payload.user_id).await,
        "user retrieved successfully",
    )
}

async fn update_user(
    State(state): State<IdentityState>,
    Json(payload): Json<UpdateUserRequest>,
) -> RpcResult<User> {
    respond(
        auth_service::update_user(&state.app, payload).await,
        "user updated successfully",
    )
}

async fn delete_user(
    State(state): State<IdentityState>,
    Json(payload): Json<UserIdRequest>,
) -> RpcResult<Empty> {
    respond(
        auth_service::delete_user(&state.app, payload.user_id).await,
        "user deleted successfully",
    )
}

async fn verify_token(
    State(state): State<IdentityState>,
    Json(payload): Json<VerifyTokenRequest>,
) -> Json<RpcReply<VerifyTokenResponse>> {
    let result = auth_service::verify_token(&state.tokens, &payload);
    let message = result.message.clone();
    Json(RpcReply::ok(message, result))
}
