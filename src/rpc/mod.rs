//! Internal RPC plumbing.
//!
//! Every domain operation is served as `POST /rpc/<service>/<method>` with a
//! flat JSON body and answered with an [`RpcReply`]. Domain outcomes (bad
//! input, not found, rule violations) travel inside a `200` reply with
//! `success: false`; only infrastructure faults surface as a `5xx`.

use std::net::SocketAddr;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use crate::{
    error::{ErrorCode, ServiceError, ServiceResult},
    routes::health,
    telemetry::{request_id_header, trace_layer},
};

pub mod basket;
pub mod catalog;
pub mod client;
pub mod identity;
pub mod orders;

pub mod methods {
    pub const REGISTER: &str = "/rpc/identity/register";
    pub const LOGIN: &str = "/rpc/identity/login";
    pub const GET_USER: &str = "/rpc/identity/get_user";
    pub const UPDATE_USER: &str = "/rpc/identity/update_user";
    pub const DELETE_USER: &str = "/rpc/identity/delete_user";
    pub const VERIFY_TOKEN: &str = "/rpc/identity/verify_token";

    pub const CREATE_PRODUCT: &str = "/rpc/catalog/create";
    pub const GET_PRODUCT: &str = "/rpc/catalog/get";
    pub const UPDATE_PRODUCT: &str = "/rpc/catalog/update";
    pub const DELETE_PRODUCT: &str = "/rpc/catalog/delete";
    pub const LIST_PRODUCTS: &str = "/rpc/catalog/list";
    pub const SEARCH_PRODUCTS: &str = "/rpc/catalog/search";
    pub const PRODUCTS_BY_CATEGORY: &str = "/rpc/catalog/by_category";
    pub const FLASH_SALES: &str = "/rpc/catalog/flash_sales";
    pub const TOP_DEALS: &str = "/rpc/catalog/top_deals";
    pub const DEALS_BY_TYPE: &str = "/rpc/catalog/deals_by_type";

    pub const GET_BASKET: &str = "/rpc/basket/get";
    pub const ADD_TO_BASKET: &str = "/rpc/basket/add";
    pub const UPDATE_BASKET_ITEM: &str = "/rpc/basket/update";
    pub const REMOVE_FROM_BASKET: &str = "/rpc/basket/remove";
    pub const CLEAR_BASKET: &str = "/rpc/basket/clear";

    pub const CREATE_ORDER: &str = "/rpc/orders/create";
    pub const GET_ORDER: &str = "/rpc/orders/get";
    pub const LIST_ORDERS: &str = "/rpc/orders/list";
    pub const UPDATE_ORDER_STATUS: &str = "/rpc/orders/update_status";
    pub const CANCEL_ORDER: &str = "/rpc/orders/cancel";
}

/// Wire envelope for every RPC answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcReply<T> {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
    pub data: Option<T>,
}

impl<T> RpcReply<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            code: None,
            data: Some(data),
        }
    }

    pub fn rejected(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            code: Some(code),
            data: None,
        }
    }

    /// Split a reply into its message and payload, or the domain failure it carries.
    pub fn into_result(self) -> Result<(String, T), RemoteError> {
        if !self.success {
            return Err(RemoteError::Rejected {
                code: self.code.unwrap_or(ErrorCode::RuleViolation),
                message: self.message,
            });
        }
        match self.data {
            Some(data) => Ok((self.message, data)),
            None => Err(RemoteError::MissingPayload),
        }
    }
}

/// Payload for operations that only acknowledge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("{message}")]
    Rejected { code: ErrorCode, message: String },

    #[error("reply reported success without data")]
    MissingPayload,
}

/// An infrastructure failure inside a service handler, answered with a 500.
#[derive(Debug)]
pub struct RpcFault(ServiceError);

impl IntoResponse for RpcFault {
    fn into_response(self) -> Response {
        tracing::error!(error = ?self.0, "rpc handler failed");
        let body = serde_json::json!({ "message": self.0.to_string() });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

pub type RpcResult<T> = Result<Json<RpcReply<T>>, RpcFault>;

/// Turn a service outcome into a reply: domain errors become `success: false`,
/// everything else becomes a fault.
pub fn respond<T>(result: ServiceResult<T>, message: &str) -> RpcResult<T> {
    match result {
        Ok(data) => Ok(Json(RpcReply::ok(message, data))),
        Err(err) => match err.code() {
            Some(code) => {
                tracing::debug!(?code, error = %err, "rpc rejected");
                Ok(Json(RpcReply::rejected(code, err.to_string())))
            }
            None => Err(RpcFault(err)),
        },
    }
}

/// Add `/health`, request ids and tracing to a service router and serve it.
pub async fn serve(service: &'static str, router: Router, host: &str, port: u16) -> anyhow::Result<()> {
    let app = router
        .route("/health", get(move || async move { health::report(service) }))
        .layer(trace_layer())
        .layer(PropagateRequestIdLayer::new(request_id_header()))
        .layer(SetRequestIdLayer::new(request_id_header(), MakeRequestUuid));

    let addr = SocketAddr::from((host.parse::<std::net::IpAddr>()?, port));
    tracing::info!(service, "listening on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_reply_keeps_code_and_message() {
        let reply: RpcReply<Empty> = RpcReply::rejected(ErrorCode::NotFound, "order not found");
        match reply.into_result() {
            Err(RemoteError::Rejected { code, message }) => {
                assert_eq!(code, ErrorCode::NotFound);
                assert_eq!(message, "order not found");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn success_without_data_is_an_error() {
        let reply: RpcReply<Empty> = serde_json::from_str(r#"{"success":true,"message":"ok"}"#)
            .expect("reply json");
        assert!(matches!(reply.into_result(), Err(RemoteError::MissingPayload)));
    }

    #[test]
    fn empty_payload_survives_the_wire() {
        let json = serde_json::to_string(&RpcReply::ok("cleared", Empty {})).expect("encode");
        let reply: RpcReply<Empty> = serde_json::from_str(&json).expect("decode");
        assert_eq!(reply.into_result().expect("ok").1, Empty {});
    }

    #[test]
    fn infrastructure_errors_become_faults() {
        let result: ServiceResult<Empty> = Err(ServiceError::Internal(anyhow::anyhow!("boom")));
        assert!(respond(result, "x").is_err());

        let result: ServiceResult<Empty> = Err(ServiceError::Rule("no".into()));
        let reply = respond(result, "x").expect("reply").0;
        assert!(!reply.success);
        assert_eq!(reply.code, Some(ErrorCode::RuleViolation));
    }
}
