use std::time::Duration;

use axum::{Json, Router, http::StatusCode, routing::post};
use storefront::{
    dto::UserIdRequest,
    rpc::{
        Empty, RpcReply,
        client::{RpcClient, RpcError},
    },
};
use uuid::Uuid;

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind peer");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve peer");
    });
    format!("http://{addr}")
}

async fn slow() -> Json<RpcReply<Empty>> {
    tokio::time::sleep(Duration::from_secs(2)).await;
    Json(RpcReply::ok("late", Empty {}))
}

async fn fast() -> Json<RpcReply<Empty>> {
    Json(RpcReply::ok("done", Empty {}))
}

async fn broken() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

fn request() -> UserIdRequest {
    UserIdRequest {
        user_id: Uuid::new_v4(),
    }
}

#[tokio::test]
async fn slow_peer_exceeds_deadline() {
    let url = spawn(Router::new().route("/rpc/test/slow", post(slow))).await;
    let client = RpcClient::new("test", url, Duration::from_millis(100));

    let result = client.call::<_, Empty>("/rpc/test/slow", &request()).await;

    assert!(matches!(
        result,
        Err(RpcError::DeadlineExceeded { service, .. }) if service == client.service()
    ));
    assert_eq!(client.service(), "test");
}

#[tokio::test]
async fn fast_peer_answers_within_deadline() {
    let url = spawn(Router::new().route("/rpc/test/fast", post(fast))).await;
    let client = RpcClient::new("test", format!("{url}/"), Duration::from_millis(500));

    let reply = client
        .call::<_, Empty>("/rpc/test/fast", &request())
        .await
        .expect("reply");

    let (message, _) = reply.into_result().expect("success");
    assert_eq!(message, "done");
}

#[tokio::test]
async fn server_fault_is_a_status_error() {
    let url = spawn(Router::new().route("/rpc/test/broken", post(broken))).await;
    let client = RpcClient::new("test", url, Duration::from_millis(500));

    let result = client.call::<_, Empty>("/rpc/test/broken", &request()).await;

    assert!(matches!(
        result,
        Err(RpcError::Status(StatusCode::INTERNAL_SERVER_ERROR))
    ));
}
