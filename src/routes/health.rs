use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::response::{ApiResponse, Meta};

/// Liveness payload; `service` tells the gateway and each RPC peer apart.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthData {
    pub status: String,
    pub service: String,
    pub version: String,
}

pub fn report(service: &str) -> Json<ApiResponse<HealthData>> {
    Json(ApiResponse::success(
        "Health check",
        HealthData {
            status: "ok".into(),
            service: service.into(),
            version: env!("CARGO_PKG_VERSION").into(),
        },
        Some(Meta::empty()),
    ))
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Gateway is up", body = ApiResponse<HealthData>),
    )
)]
pub async fn health_check() -> Json<ApiResponse<HealthData>> {
    report("gateway")
}
