use axum::{extract::FromRequestParts, http::header};
use uuid::Uuid;

use crate::{
    dto::auth::{VerifyTokenRequest, VerifyTokenResponse},
    error::AppError,
    rpc::methods,
    state::GatewayState,
};

/// The caller's identity as confirmed by the identity service for this request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
}

impl AuthUser {
    /// Profile routes only act on the caller's own account.
    pub fn ensure_self(&self, user_id: Uuid) -> Result<(), AppError> {
        if self.user_id != user_id {
            return Err(AppError::Unauthorized(
                "cannot act on another user's account".into(),
            ));
        }
        Ok(())
    }
}

/// Accepts exactly `Bearer <token>`: two tokens separated by one space.
pub fn parse_bearer(value: &str) -> Option<&str> {
    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Some(token),
        _ => None,
    }
}

impl FromRequestParts<GatewayState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &GatewayState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid Authorization header".into()))?;

        let token = parse_bearer(auth_str)
            .ok_or_else(|| AppError::Unauthorized("Invalid Authorization scheme".into()))?;

        let request = VerifyTokenRequest {
            token: token.to_string(),
        };
        let reply = state
            .identity
            .call::<_, VerifyTokenResponse>(methods::VERIFY_TOKEN, &request)
            .await
            .map_err(|err| {
                tracing::warn!(
                    error = %err,
                    peer = state.identity.service(),
                    "token verification unavailable"
                );
                AppError::Unauthorized("Token verification failed".into())
            })?;

        let (_, verified) = reply
            .into_result()
            .map_err(|_| AppError::Unauthorized("Token verification failed".into()))?;

        let user = match (verified.valid, verified.user_id) {
            (true, Some(user_id)) => AuthUser { user_id },
            _ => return Err(AppError::Unauthorized("Invalid or expired token".into())),
        };

        parts.extensions.insert(user);
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::parse_bearer;

    #[test]
    fn accepts_exactly_two_parts() {
        assert_eq!(parse_bearer("Bearer abc.def.ghi"), Some("abc.def.ghi"));
    }

    #[test]
    fn rejects_malformed_headers() {
        for value in [
            "",
            "Bearer",
            "Bearer ",
            "bearer abc",
            "Basic abc",
            "Bearer abc extra",
            "Bearer  abc",
            "abc",
        ] {
            assert_eq!(parse_bearer(value), None, "{value:?}");
        }
    }
}
