use axum::{
    Json, Router,
    http::{StatusCode, Uri},
    routing::get,
};
use serde::{Serialize, de::DeserializeOwned};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
};

use crate::{
    error::AppResult,
    response::{ApiResponse, Meta},
    rpc::client::RpcClient,
    state::GatewayState,
    telemetry::{request_id_header, trace_layer},
};

pub mod auth;
pub mod cart;
pub mod doc;
pub mod health;
pub mod orders;
pub mod params;
pub mod products;
pub mod users;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<GatewayState> {
    Router::new()
        .nest("/users", users::router())
        .nest("/auth", auth::router())
        .nest("/products", products::router())
        .nest("/cart", cart::router())
        .nest("/orders", orders::router())
}

/// The full gateway: API, health, docs and the shared middleware stack.
pub fn app(state: GatewayState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1", create_api_router())
        .merge(doc::scalar_docs())
        .fallback(not_found)
        .layer(trace_layer())
        .layer(PropagateRequestIdLayer::new(request_id_header()))
        .layer(SetRequestIdLayer::new(request_id_header(), MakeRequestUuid))
        .layer(RequestBodyLimitLayer::new(1024 * 1024))
        .layer(ConcurrencyLimitLayer::new(100))
        .with_state(state)
}

/// Call `method` on a peer and unwrap its reply into `(message, data)`.
pub(crate) async fn forward<Req, Resp>(
    client: &RpcClient,
    method: &'static str,
    request: &Req,
) -> AppResult<(String, Resp)>
where
    Req: Serialize + ?Sized,
    Resp: DeserializeOwned,
{
    let reply = client.call::<Req, Resp>(method, request).await?;
    Ok(reply.into_result()?)
}

async fn not_found(uri: Uri) -> (StatusCode, Json<ApiResponse<serde_json::Value>>) {
    let body = ApiResponse::success(
        "Not Found",
        serde_json::json!({ "path": uri.path() }),
        Some(Meta::empty()),
    );
    (StatusCode::NOT_FOUND, Json(body))
}
