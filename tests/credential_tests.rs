// HTTP credential client tests against a live local server

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use stylecam::credential::{CredentialError, CredentialProvider, HttpCredentialProvider};
use stylecam::{create_router, AppState, SecretSource};

/// Serve `router` on an ephemeral port and return its base URL
async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_fetch_key_from_endpoint() {
    let base = spawn(create_router(AppState::new(SecretSource::Fixed(Some(
        "abc".to_string(),
    )))))
    .await;

    let provider = HttpCredentialProvider::new(format!("{}/api/get-key", base));
    assert_eq!(provider.fetch().await.unwrap(), "abc");
}

#[tokio::test]
async fn test_server_error_message_is_surfaced() {
    let router = Router::new().route(
        "/api/get-key",
        get(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "not configured" })),
            )
        }),
    );
    let base = spawn(router).await;

    let provider = HttpCredentialProvider::new(format!("{}/api/get-key", base));
    let err = provider.fetch().await.unwrap_err();

    assert_eq!(err.to_string(), "not configured");
    assert!(matches!(err, CredentialError::Rejected { status: 500, .. }));
}

#[tokio::test]
async fn test_unconfigured_server_is_rejected() {
    let base = spawn(create_router(AppState::new(SecretSource::Fixed(None)))).await;

    let provider = HttpCredentialProvider::new(format!("{}/api/get-key", base));
    let err = provider.fetch().await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "API key is not configured on the server environment."
    );
}

#[tokio::test]
async fn test_missing_key_in_success_response() {
    let router = Router::new().route(
        "/api/get-key",
        get(|| async { Json(serde_json::json!({ "status": "ok" })) }),
    );
    let base = spawn(router).await;

    let provider = HttpCredentialProvider::new(format!("{}/api/get-key", base));
    let err = provider.fetch().await.unwrap_err();

    assert!(matches!(err, CredentialError::MissingKey));
}

#[tokio::test]
async fn test_non_json_error_uses_status() {
    let router = Router::new().route(
        "/api/get-key",
        get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
    );
    let base = spawn(router).await;

    let provider = HttpCredentialProvider::new(format!("{}/api/get-key", base));
    let err = provider.fetch().await.unwrap_err();

    assert_eq!(err.to_string(), "Credential endpoint returned HTTP 502");
}

#[tokio::test]
async fn test_unreachable_endpoint_is_request_error() {
    // Bind then drop to get a port with nothing listening
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let provider = HttpCredentialProvider::new(format!("http://{}/api/get-key", addr));
    let err = provider.fetch().await.unwrap_err();

    assert!(matches!(err, CredentialError::Request(_)));
}
