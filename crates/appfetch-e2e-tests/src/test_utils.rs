use appfetch_lib::cli::{BuildParams, FetchParams, ValidateParams};
use appfetch_lib::config::{AllowedPackages, AppLayout};
use appfetch_lib::remote::RemoteSettings;
use httpmock::prelude::*;
use httpmock::Mock;
use serde_json::{Value, json};
use std::path::Path;

pub const SOURCES: &str = "files/bucket/apps/demo/";

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter("appfetch_lib=debug,appfetch_e2e_tests=debug")
        .with_test_writer()
        .try_init()
        .ok();
}

/// One listing page as the metadata endpoint returns it.
pub fn listing_body(node_type: &str, file_urls: &[&str], next_token: Option<&str>) -> Value {
    let items: Vec<Value> = file_urls
        .iter()
        .map(|url| {
            json!({
                "name": url.rsplit('/').next().unwrap_or(url),
                "url": url,
                "resourceType": "FILE",
                "nodeType": "ITEM",
            })
        })
        .collect();

    let resource_type = if node_type == "FOLDER" { "FOLDER" } else { "FILE" };
    let mut body = json!({
        "name": "demo",
        "url": SOURCES,
        "resourceType": resource_type,
        "nodeType": node_type,
        "items": items,
    });
    if let Some(token) = next_token {
        body["nextToken"] = json!(token);
    }
    body
}

pub async fn mock_listing<'a>(server: &'a MockServer, body: &Value) -> Mock<'a> {
    let path = format!("/v1/metadata/{SOURCES}");
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path(path)
                .query_param("recursive", "true");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(body.clone());
        })
        .await
}

pub async fn mock_file<'a>(server: &'a MockServer, file_url: &str, content: &[u8]) -> Mock<'a> {
    let path = format!("/v1/{file_url}");
    server
        .mock_async(|when, then| {
            when.method(GET).path(path);
            then.status(200).body(content);
        })
        .await
}

pub fn remote_settings(server: &MockServer, api_key: Option<&str>, jwt: Option<&str>) -> RemoteSettings {
    RemoteSettings::new(
        &server.base_url(),
        api_key.map(str::to_string),
        jwt.map(str::to_string),
    )
    .expect("mock server URL should parse")
}

pub fn fetch_params(server: &MockServer, target_dir: &Path) -> FetchParams {
    FetchParams {
        remote: remote_settings(server, None, None),
        sources: SOURCES.to_string(),
        target_dir: target_dir.to_path_buf(),
    }
}

pub fn validate_params(target_dir: &Path, allowed_packages: &str) -> ValidateParams {
    ValidateParams {
        target_dir: target_dir.to_path_buf(),
        layout: AppLayout::default(),
        allowed_packages: AllowedPackages::from_whitespace_separated(allowed_packages),
    }
}

pub fn build_params(server: &MockServer, target_dir: &Path, allowed_packages: &str) -> BuildParams {
    BuildParams {
        fetch: fetch_params(server, target_dir),
        validate: validate_params(target_dir, allowed_packages),
    }
}
