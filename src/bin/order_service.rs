use storefront::{
    config::AppConfig,
    db::create_pool,
    rpc::{orders, serve},
    state::AppState,
    telemetry::init_tracing,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing("info,storefront=debug");

    let config = AppConfig::from_env(50054)?;
    let pool = create_pool(&config.database_url).await?;
    let state = AppState::new(pool);

    serve("orders", orders::router(state), &config.host, config.port).await
}
