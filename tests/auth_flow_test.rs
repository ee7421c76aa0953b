mod common;

use common::*;
use ee_tile_proxy::core::auth::ServiceAccountAuthenticator;
use ee_tile_proxy::utils::validation::Validate;
use ee_tile_proxy::{EarthEngineClient, ProxyError, ServiceAccountKey};
use httpmock::prelude::*;

/// 成功認證並初始化：伺服器可以啟動
#[tokio::test]
async fn test_connect_authenticates_and_initializes() {
    let server = MockServer::start_async().await;
    let token_mock = mock_token(&server, "ya29.test").await;
    let assets_mock = mock_list_assets(&server, "ya29.test").await;

    let key = service_account_key(&server);
    assert!(key.validate().is_ok());

    let result = EarthEngineClient::connect(&server_config(&server), key).await;

    assert!(result.is_ok(), "connect failed: {:?}", result.err());
    token_mock.assert_async().await;
    assets_mock.assert_async().await;
}

#[tokio::test]
async fn test_rejected_credentials_prevent_startup() {
    let server = MockServer::start_async().await;
    let token_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/token");
            then.status(400)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "error": "invalid_grant",
                    "error_description": "Invalid JWT Signature."
                }));
        })
        .await;

    let result =
        EarthEngineClient::connect(&server_config(&server), service_account_key(&server)).await;

    token_mock.assert_async().await;
    match result {
        Err(ProxyError::AuthError { message }) => {
            assert!(message.contains("400"));
            assert!(message.contains("invalid_grant"));
            assert!(message.contains("Invalid JWT Signature."));
        }
        Err(other) => panic!("expected auth error, got {:?}", other),
        Ok(_) => panic!("expected auth error, got a client"),
    }
}

#[tokio::test]
async fn test_unregistered_project_fails_initialization() {
    let server = MockServer::start_async().await;
    mock_token(&server, "ya29.test").await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path(format!("/v1/projects/{}:listAssets", PROJECT));
            then.status(403)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "error": {
                        "code": 403,
                        "message": "Not signed up for Earth Engine.",
                        "status": "PERMISSION_DENIED"
                    }
                }));
        })
        .await;

    let result =
        EarthEngineClient::connect(&server_config(&server), service_account_key(&server)).await;

    match result {
        Err(ProxyError::InitializationError { message }) => {
            assert!(message.contains("Not signed up for Earth Engine."));
            assert!(message.contains("PERMISSION_DENIED"));
        }
        Err(other) => panic!("expected initialization error, got {:?}", other),
        Ok(_) => panic!("expected initialization error, got a client"),
    }
}

#[test]
fn test_missing_credentials_prevent_startup() {
    let result = ServiceAccountKey::from_lookup(|name| match name {
        "PROJECT_ID" => Some("ee-demo".to_string()),
        _ => None,
    });
    assert!(matches!(result, Err(ProxyError::MissingConfigError { .. })));
}

#[tokio::test]
async fn test_access_token_is_cached_until_stale() {
    let server = MockServer::start_async().await;
    let token_mock = mock_token(&server, "ya29.cached").await;

    let auth = ServiceAccountAuthenticator::new(service_account_key(&server), reqwest::Client::new())
        .expect("test key should parse");

    let first = auth.access_token().await.unwrap();
    let second = auth.access_token().await.unwrap();

    assert_eq!(first.token, "ya29.cached");
    assert_eq!(first, second);
    assert!(first.is_fresh());
    token_mock.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_short_lived_token_is_refreshed() {
    let server = MockServer::start_async().await;
    // 有效期短於刷新邊界，每次都需要重新換發
    let token_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/token");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "access_token": "ya29.short",
                    "expires_in": 30,
                    "token_type": "Bearer"
                }));
        })
        .await;

    let auth = ServiceAccountAuthenticator::new(service_account_key(&server), reqwest::Client::new())
        .expect("test key should parse");

    auth.access_token().await.unwrap();
    auth.access_token().await.unwrap();

    token_mock.assert_hits_async(2).await;
}

#[tokio::test]
async fn test_out_of_range_expires_in_is_auth_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/token");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "access_token": "ya29.forever",
                    "expires_in": i64::MAX,
                    "token_type": "Bearer"
                }));
        })
        .await;

    let auth = ServiceAccountAuthenticator::new(service_account_key(&server), reqwest::Client::new())
        .expect("test key should parse");

    match auth.access_token().await {
        Err(ProxyError::AuthError { message }) => {
            assert!(message.contains("expires_in"));
            assert!(message.contains(&i64::MAX.to_string()));
        }
        other => panic!("expected auth error, got {:?}", other),
    }

    // 啟動流程同樣應回報認證失敗而不是崩潰
    let result =
        EarthEngineClient::connect(&server_config(&server), service_account_key(&server)).await;
    assert!(matches!(result, Err(ProxyError::AuthError { .. })));
}
