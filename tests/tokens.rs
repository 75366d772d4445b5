use chrono::{Duration, Utc};
use secrecy::SecretString;
use storefront::{
    config::AuthConfig,
    dto::auth::{TokenKind, VerifyTokenRequest},
    services::{auth_service, token::TokenService},
};
use uuid::Uuid;

fn config(secret: &str) -> AuthConfig {
    AuthConfig {
        jwt_secret: SecretString::from(secret.to_string()),
        access_ttl: Duration::hours(24),
        refresh_ttl: Duration::days(7),
    }
}

#[test]
fn fresh_tokens_of_both_kinds_verify() {
    let tokens = TokenService::new(&config("test-secret"));
    let user_id = Uuid::new_v4();

    for kind in [TokenKind::Access, TokenKind::Refresh] {
        let token = tokens.issue(user_id, kind).expect("issue");
        let claims = tokens.verify(&token).expect("verify");
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.kind, kind);
        assert_eq!(claims.exp - claims.iat, tokens.ttl(kind).num_seconds());
    }
}

#[test]
fn token_is_invalid_one_second_after_ttl() {
    let tokens = TokenService::new(&config("test-secret"));
    let ttl = tokens.ttl(TokenKind::Access);
    let issued_at = Utc::now() - ttl - Duration::seconds(1);

    let token = tokens
        .issue_at(Uuid::new_v4(), TokenKind::Access, issued_at)
        .expect("issue");

    assert!(tokens.verify(&token).is_err());
}

#[test]
fn refresh_token_outlives_access_ttl() {
    let tokens = TokenService::new(&config("test-secret"));
    let issued_at = Utc::now() - Duration::hours(25);

    let access = tokens
        .issue_at(Uuid::new_v4(), TokenKind::Access, issued_at)
        .expect("issue");
    let refresh = tokens
        .issue_at(Uuid::new_v4(), TokenKind::Refresh, issued_at)
        .expect("issue");

    assert!(tokens.verify(&access).is_err());
    assert!(tokens.verify(&refresh).is_ok());
}

#[test]
fn tampered_or_foreign_tokens_fail() {
    let tokens = TokenService::new(&config("test-secret"));
    let other = TokenService::new(&config("another-secret"));
    let token = tokens.issue(Uuid::new_v4(), TokenKind::Access).expect("issue");

    assert!(other.verify(&token).is_err());

    // graft another subject's claims onto the original signature
    let forged_claims = tokens.issue(Uuid::new_v4(), TokenKind::Access).expect("issue");
    let original: Vec<&str> = token.split('.').collect();
    let forged: Vec<&str> = forged_claims.split('.').collect();
    let tampered = format!("{}.{}.{}", original[0], forged[1], original[2]);
    assert!(tokens.verify(&tampered).is_err());

    assert!(tokens.verify("not-a-jwt").is_err());
}

#[test]
fn verify_reply_reports_invalid_without_failing() {
    let tokens = TokenService::new(&config("test-secret"));
    let user_id = Uuid::new_v4();

    let good = tokens.issue(user_id, TokenKind::Access).expect("issue");
    let reply = auth_service::verify_token(&tokens, &VerifyTokenRequest { token: good });
    assert!(reply.valid);
    assert_eq!(reply.user_id, Some(user_id));

    let reply = auth_service::verify_token(
        &tokens,
        &VerifyTokenRequest {
            token: "garbage".into(),
        },
    );
    assert!(!reply.valid);
    assert_eq!(reply.user_id, None);
}
