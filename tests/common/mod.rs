#![allow(dead_code)]

use ee_tile_proxy::{ServerConfig, ServiceAccountKey};
use httpmock::prelude::*;
use httpmock::Mock;
use std::collections::HashMap;

pub const PROJECT: &str = "ee-demo";
pub const TEST_KEY: &str = include_str!("../fixtures/test_key.pem");

/// Builds the key the same way the binary does, from environment-style
/// variables, but pointed at the mock token endpoint.
pub fn service_account_key(server: &MockServer) -> ServiceAccountKey {
    // .env 內的私鑰通常是跳脫過的單行字串
    let escaped_key = TEST_KEY.replace('\n', "\\n");
    let vars: HashMap<&str, String> = HashMap::from([
        ("PROJECT_ID", PROJECT.to_string()),
        ("PRIVATE_KEY_ID", "test-key-id".to_string()),
        ("PRIVATE_KEY", escaped_key),
        (
            "CLIENT_EMAIL",
            "my-app@ee-demo.iam.gserviceaccount.com".to_string(),
        ),
        ("CLIENT_ID", "1234567890".to_string()),
        ("TOKEN_URI", server.url("/token")),
    ]);
    ServiceAccountKey::from_lookup(|k| vars.get(k).cloned()).expect("test key should load")
}

pub fn server_config(server: &MockServer) -> ServerConfig {
    ServerConfig {
        api_base: server.base_url(),
        ..Default::default()
    }
}

pub async fn mock_token<'a>(server: &'a MockServer, token: &str) -> Mock<'a> {
    let body = serde_json::json!({
        "access_token": token,
        "expires_in": 3599,
        "token_type": "Bearer"
    });
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/token")
                .x_www_form_urlencoded_tuple(
                    "grant_type",
                    "urn:ietf:params:oauth:grant-type:jwt-bearer",
                )
                .body_contains("assertion=");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(body);
        })
        .await
}

pub async fn mock_list_assets<'a>(server: &'a MockServer, token: &str) -> Mock<'a> {
    let auth = format!("Bearer {}", token);
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path(format!("/v1/projects/{}:listAssets", PROJECT))
                .query_param("pageSize", "1")
                .header("authorization", auth);
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({ "assets": [] }));
        })
        .await
}
