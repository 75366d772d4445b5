use storefront::{
    config::{AppConfig, AuthConfig},
    db::create_pool,
    rpc::{identity, serve},
    services::token::TokenService,
    state::{AppState, IdentityState},
    telemetry::init_tracing,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing("info,storefront=debug");

    let config = AppConfig::from_env(50051)?;
    let auth = AuthConfig::from_env()?;
    let pool = create_pool(&config.database_url).await?;

    let state = IdentityState {
        app: AppState::new(pool),
        tokens: TokenService::new(&auth),
    };

    serve("identity", identity::router(state), &config.host, config.port).await
}
