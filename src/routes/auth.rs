use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::auth::{VerifyTokenRequest, VerifyTokenResponse},
    error::AppResult,
    response::{ApiResponse, Meta},
    routes::forward,
    rpc::methods,
    state::GatewayState,
};

pub fn router() -> Router<GatewayState> {
    Router::new().route("/verify", post(verify))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/verify",
    request_body = VerifyTokenRequest,
    responses(
        (status = 200, description = "Verification result; `valid` is false for bad tokens", body = ApiResponse<VerifyTokenResponse>)
    ),
    tag = "Auth"
)]
pub async fn verify(
    State(state): State<GatewayState>,
    Json(payload): Json<VerifyTokenRequest>,
) -> AppResult<Json<ApiResponse<VerifyTokenResponse>>> {
    let (message, data) =
        forward::<_, VerifyTokenResponse>(&state.identity, methods::VERIFY_TOKEN, &payload)
            .await?;
    Ok(Json(ApiResponse::success(message, data, Some(Meta::empty()))))
}
