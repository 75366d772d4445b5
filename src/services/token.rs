use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::ExposeSecret;
use uuid::Uuid;

use crate::{
    config::AuthConfig,
    dto::auth::{Claims, TokenKind},
    error::{ServiceError, ServiceResult},
};

/// Mints and checks stateless HS256 tokens.
///
/// A token is valid while its signature matches and `exp` has not passed.
/// There is no revocation list.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            access_ttl: config.access_ttl,
            refresh_ttl: config.refresh_ttl,
        }
    }

    pub fn ttl(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        }
    }

    pub fn issue(&self, subject: Uuid, kind: TokenKind) -> ServiceResult<String> {
        self.issue_at(subject, kind, Utc::now())
    }

    pub fn issue_at(
        &self,
        subject: Uuid,
        kind: TokenKind,
        issued_at: DateTime<Utc>,
    ) -> ServiceResult<String> {
        let expires_at = issued_at
            .checked_add_signed(self.ttl(kind))
            .ok_or_else(|| ServiceError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

        let claims = Claims {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            kind,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| ServiceError::Internal(anyhow::anyhow!(e.to_string())))
    }

    /// Check signature and expiry. Any failure is reported as `Unauthorized`.
    pub fn verify(&self, token: &str) -> ServiceResult<Claims> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| {
                tracing::debug!(error = %err, "token rejected");
                ServiceError::Unauthorized("invalid or expired token".into())
            })
    }

    /// Verify and resolve the subject to a user id.
    pub fn subject(&self, token: &str) -> ServiceResult<Uuid> {
        let claims = self.verify(token)?;
        Uuid::parse_str(&claims.sub)
            .map_err(|_| ServiceError::Unauthorized("invalid user id in token".into()))
    }
}
