use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::Validate,
    error::{ServiceError, ServiceResult},
    models::User,
};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Deserialize, Serialize, Debug, Clone, ToSchema)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub phone: String,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> ServiceResult<()> {
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err(ServiceError::Validation(
                "first_name and last_name are required".into(),
            ));
        }
        if !is_plausible_email(&self.email) {
            return Err(ServiceError::Validation("a valid email is required".into()));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ServiceError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(())
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.trim().split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.contains('@'),
        None => false,
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    pub user_id: Uuid,
}

#[derive(Deserialize, Serialize, Debug, Clone, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> ServiceResult<()> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(ServiceError::Validation(
                "email and password are required".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub kind: TokenKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VerifyTokenRequest {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VerifyTokenResponse {
    pub valid: bool,
    pub user_id: Option<Uuid>,
    pub message: String,
}

/// Profile fields a user may change. Absent or empty values keep what is stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ProfileChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub changes: ProfileChanges,
}
