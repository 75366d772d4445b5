use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::{
        UserIdRequest, Validate,
        auth::{
            LoginRequest, LoginResponse, ProfileChanges, RegisterRequest, RegisterResponse,
            UpdateUserRequest,
        },
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::User,
    response::{ApiResponse, Meta},
    routes::forward,
    rpc::{Empty, methods},
    state::GatewayState,
};

pub fn router() -> Router<GatewayState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/{id}", get(get_user).put(update_user).delete(delete_user))
}

#[utoipa::path(
    post,
    path = "/api/v1/users/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Register user", body = ApiResponse<RegisterResponse>),
        (status = 400, description = "Invalid input or email already registered")
    ),
    tag = "Users"
)]
pub async fn register(
    State(state): State<GatewayState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<RegisterResponse>>)> {
    payload.validate()?;
    let (message, data) =
        forward::<_, RegisterResponse>(&state.identity, methods::REGISTER, &payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(message, data, Some(Meta::empty()))),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login user", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Users"
)]
pub async fn login(
    State(state): State<GatewayState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    payload.validate()?;
    let (message, data) =
        forward::<_, LoginResponse>(&state.identity, methods::LOGIN, &payload).await?;
    Ok(Json(ApiResponse::success(message, data, Some(Meta::empty()))))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User profile", body = ApiResponse<User>),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn get_user(
    State(state): State<GatewayState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<User>>> {
    user.ensure_self(id)?;
    let request = UserIdRequest { user_id: id };
    let (message, data) = forward::<_, User>(&state.identity, methods::GET_USER, &request).await?;
    Ok(Json(ApiResponse::success(message, data, Some(Meta::empty()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = ProfileChanges,
    responses(
        (status = 200, description = "Updated profile", body = ApiResponse<User>),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn update_user(
    State(state): State<GatewayState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(changes): Json<ProfileChanges>,
) -> AppResult<Json<ApiResponse<User>>> {
    user.ensure_self(id)?;
    let request = UpdateUserRequest {
        user_id: id,
        changes,
    };
    let (message, data) =
        forward::<_, User>(&state.identity, methods::UPDATE_USER, &request).await?;
    Ok(Json(ApiResponse::success(message, data, Some(Meta::empty()))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Account deactivated"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn delete_user(
    State(state): State<GatewayState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    user.ensure_self(id)?;
    let request = UserIdRequest { user_id: id };
    let (message, _) =
        forward::<_, Empty>(&state.identity, methods::DELETE_USER, &request).await?;
    Ok(Json(ApiResponse::success(
        message,
        serde_json::json!({}),
        Some(Meta::empty()),
    )))
}
