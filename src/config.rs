use std::{env, time::Duration};

use anyhow::Context;
use secrecy::SecretString;

/// Settings shared by every domain service process.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env(default_port: u16) -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(default_port);
        Ok(Self {
            port,
            database_url,
            host,
        })
    }
}

/// Token signing settings, handed to [`crate::services::token::TokenService`].
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: SecretString,
    pub access_ttl: chrono::Duration,
    pub refresh_ttl: chrono::Duration,
}

impl AuthConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let secret = env::var("JWT_SECRET").context("JWT_SECRET is not set")?;
        let access_hours = env::var("ACCESS_TOKEN_TTL_HOURS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(24);
        let refresh_days = env::var("REFRESH_TOKEN_TTL_DAYS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(7);
        Ok(Self {
            jwt_secret: SecretString::from(secret),
            access_ttl: chrono::Duration::hours(access_hours),
            refresh_ttl: chrono::Duration::days(refresh_days),
        })
    }
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub identity_url: String,
    pub catalog_url: String,
    pub basket_url: String,
    pub order_url: String,
    pub rpc_deadline: Duration,
    pub cors_origins: Vec<String>,
}

impl GatewayConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8080);
        let rpc_deadline = env::var("RPC_DEADLINE_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_secs(5));
        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000,http://localhost:5173".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            identity_url: service_url("IDENTITY_SERVICE_URL", 50051),
            catalog_url: service_url("CATALOG_SERVICE_URL", 50052),
            basket_url: service_url("BASKET_SERVICE_URL", 50053),
            order_url: service_url("ORDER_SERVICE_URL", 50054),
            rpc_deadline,
            cors_origins,
        })
    }
}

fn service_url(key: &str, default_port: u16) -> String {
    env::var(key).unwrap_or_else(|_| format!("http://127.0.0.1:{default_port}"))
}
