use storefront::{
    config::AppConfig,
    db::create_pool,
    rpc::{catalog, serve},
    state::AppState,
    telemetry::init_tracing,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing("info,storefront=debug");

    let config = AppConfig::from_env(50052)?;
    let pool = create_pool(&config.database_url).await?;
    let state = AppState::new(pool);

    serve("catalog", catalog::router(state), &config.host, config.port).await
}
