use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::Utc;
use password_hash::rand_core::OsRng;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, QueryFilter, Set, SqlErr,
};
use uuid::Uuid;

use crate::{
    dto::{
        Validate,
        auth::{
            LoginRequest, LoginResponse, ProfileChanges, RegisterRequest, RegisterResponse,
            TokenKind, UpdateUserRequest, VerifyTokenRequest, VerifyTokenResponse,
        },
    },
    entity::{
        Users,
        users::{ActiveModel as UserActive, Column as UserCol, Model as UserModel},
    },
    error::{ServiceError, ServiceResult},
    models::User,
    rpc::Empty,
    services::token::TokenService,
    state::AppState,
    store::{ActiveScope, deactivate},
};

const DUPLICATE_EMAIL: &str = "user with this email already exists";
const BAD_CREDENTIALS: &str = "invalid email or password";

pub async fn register(state: &AppState, payload: RegisterRequest) -> ServiceResult<RegisterResponse> {
    payload.validate()?;
    let email = normalize_email(&payload.email);

    let exist = Users::find_active()
        .filter(UserCol::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?;
    if exist.is_some() {
        return Err(ServiceError::Rule(DUPLICATE_EMAIL.into()));
    }

    let password_hash = hash_password(&payload.password)?;

    // A concurrent registration can still slip past the lookup; the partial
    // unique index on active emails settles it.
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        first_name: Set(payload.first_name.trim().to_string()),
        last_name: Set(payload.last_name.trim().to_string()),
        email: Set(email),
        password_hash: Set(password_hash),
        phone: Set(payload.phone),
        address: Set(String::new()),
        is_active: Set(true),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await
    .map_err(|err| match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => ServiceError::Rule(DUPLICATE_EMAIL.into()),
        _ => ServiceError::Db(err),
    })?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok(RegisterResponse { user_id: user.id })
}

pub async fn login(
    state: &AppState,
    tokens: &TokenService,
    payload: LoginRequest,
) -> ServiceResult<LoginResponse> {
    payload.validate()?;
    let email = normalize_email(&payload.email);

    let user = Users::find_active()
        .filter(UserCol::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?
        .ok_or_else(|| ServiceError::Unauthorized(BAD_CREDENTIALS.into()))?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| ServiceError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    if Argon2::default()
        .verify_password(payload.password.as_bytes(), &parsed_hash)
        .is_err()
    {
        tracing::info!(user_id = %user.id, "login rejected");
        return Err(ServiceError::Unauthorized(BAD_CREDENTIALS.into()));
    }

    let token = tokens.issue(user.id, TokenKind::Access)?;
    let refresh_token = tokens.issue(user.id, TokenKind::Refresh)?;

    tracing::info!(user_id = %user.id, "user logged in");
    Ok(LoginResponse {
        user: user_from_entity(user),
        token,
        refresh_token,
    })
}

pub async fn get_user(state: &AppState, user_id: Uuid) -> ServiceResult<User> {
    find_user(state, user_id).await.map(user_from_entity)
}

pub async fn update_user(state: &AppState, payload: UpdateUserRequest) -> ServiceResult<User> {
    let user = find_user(state, payload.user_id).await?;
    let ProfileChanges {
        first_name,
        last_name,
        phone,
        address,
    } = payload.changes;

    let mut active: UserActive = user.into();
    if let Some(value) = non_empty(first_name) {
        active.first_name = Set(value);
    }
    if let Some(value) = non_empty(last_name) {
        active.last_name = Set(value);
    }
    if let Some(value) = non_empty(phone) {
        active.phone = Set(value);
    }
    if let Some(value) = non_empty(address) {
        active.address = Set(value);
    }
    active.updated_at = Set(Utc::now().into());

    let user = active.update(&state.orm).await?;
    Ok(user_from_entity(user))
}

pub async fn delete_user(state: &AppState, user_id: Uuid) -> ServiceResult<Empty> {
    if !deactivate::<Users, _>(user_id, &state.orm).await? {
        return Err(ServiceError::NotFound("user not found".into()));
    }
    tracing::info!(%user_id, "user deactivated");
    Ok(Empty {})
}

/// An invalid token is an ordinary answer, never an error.
pub fn verify_token(tokens: &TokenService, payload: &VerifyTokenRequest) -> VerifyTokenResponse {
    match tokens.subject(&payload.token) {
        Ok(user_id) => VerifyTokenResponse {
            valid: true,
            user_id: Some(user_id),
            message: "token is valid".into(),
        },
        Err(err) => VerifyTokenResponse {
            valid: false,
            user_id: None,
            message: err.to_string(),
        },
    }
}

async fn find_user(state: &AppState, user_id: Uuid) -> ServiceResult<UserModel> {
    Users::find_active_by_id(user_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| ServiceError::NotFound("user not found".into()))
}

fn hash_password(password: &str) -> ServiceResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::Internal(anyhow::anyhow!(e.to_string())))
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn user_from_entity(model: UserModel) -> User {
    User {
        id: model.id,
        first_name: model.first_name,
        last_name: model.last_name,
        email: model.email,
        phone: model.phone,
        address: model.address,
        is_active: model.is_active,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

