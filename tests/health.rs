use storefront::routes::health::{health_check, report};

#[tokio::test]
async fn health_check_returns_ok() {
    let response = health_check().await;
    assert_eq!(response.0.message, "Health check");

    let data = response.0.data.expect("health data");
    assert_eq!(data.status, "ok");
    assert_eq!(data.service, "gateway");
    assert_eq!(data.version, env!("CARGO_PKG_VERSION"));
}

#[test]
fn peers_report_their_own_name() {
    let data = report("catalog").0.data.expect("health data");
    assert_eq!(data.service, "catalog");
}
