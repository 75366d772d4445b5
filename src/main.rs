use axum::http::{HeaderValue, Method, header};
use tower_http::cors::CorsLayer;

use std::net::SocketAddr;

use storefront::{
    config::GatewayConfig, routes::app, state::GatewayState, telemetry::init_tracing,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing("info,storefront=debug");

    let config = GatewayConfig::from_env()?;
    let state = GatewayState::from_config(&config);

    let app = app(state).layer(cors_layer(&config.cors_origins));

    let addr = SocketAddr::from((config.host.parse::<std::net::IpAddr>()?, config.port));
    tracing::info!(
        identity = %config.identity_url,
        catalog = %config.catalog_url,
        basket = %config.basket_url,
        orders = %config.order_url,
        deadline_ms = config.rpc_deadline.as_millis() as u64,
        "gateway peers"
    );
    tracing::info!("listening on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}
