use std::time::Duration;

use crate::{
    config::GatewayConfig,
    db::{DbPool, OrmConn, orm_from_pool},
    rpc::client::RpcClient,
    services::token::TokenService,
};

/// Database handles held by every domain service.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
}

impl AppState {
    pub fn new(pool: DbPool) -> Self {
        let orm = orm_from_pool(&pool);
        Self { pool, orm }
    }
}

#[derive(Clone)]
pub struct IdentityState {
    pub app: AppState,
    pub tokens: TokenService,
}

/// The gateway holds no database; it only talks to peers.
#[derive(Clone)]
pub struct GatewayState {
    pub identity: RpcClient,
    pub catalog: RpcClient,
    pub basket: RpcClient,
    pub orders: RpcClient,
}

impl GatewayState {
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::with_urls(
            &config.identity_url,
            &config.catalog_url,
            &config.basket_url,
            &config.order_url,
            config.rpc_deadline,
        )
    }

    pub fn with_urls(
        identity_url: &str,
        catalog_url: &str,
        basket_url: &str,
        order_url: &str,
        deadline: Duration,
    ) -> Self {
        Self {
            identity: RpcClient::new("identity", identity_url, deadline),
            catalog: RpcClient::new("catalog", catalog_url, deadline),
            basket: RpcClient::new("basket", basket_url, deadline),
            orders: RpcClient::new("orders", order_url, deadline),
        }
    }
}
