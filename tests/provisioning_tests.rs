//! Provisioning resolution against a mocked Okta API.

mod common;

use common::*;
use okta_provisioning_inventory::inventory::{
    resolve_provisioning, ProvisioningConfig, ProvisioningStatus,
};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FEATURES: &str = "/api/v1/apps/0oa1/features";
const UP_DETAIL: &str = "/api/v1/apps/0oa1/features/USER_PROVISIONING";
const UM_DETAIL: &str = "/api/v1/apps/0oa1/features/USER_MANAGEMENT";

#[tokio::test]
async fn test_no_provisioning_feature_is_disabled() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        FEATURES,
        json!([feature_json("GROUP_PUSH", "ENABLED"), feature_json("IMPORT", "ENABLED")]),
    )
    .await;

    let client = test_client(&server);
    let status = resolve_provisioning(&client, &application("0oa1", "custom"), &no_delay()).await;

    assert_eq!(status, ProvisioningStatus::disabled());
}

#[tokio::test]
async fn test_features_not_supported_is_disabled() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(FEATURES))
        .respond_with(ResponseTemplate::new(400).set_body_json(not_supported_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let status = resolve_provisioning(&client, &application("0oa1", "slack"), &no_delay()).await;

    assert!(!status.enabled);
    assert!(status.config.is_none());
}

#[tokio::test]
async fn test_features_server_error_is_disabled() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(FEATURES))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let status = resolve_provisioning(&client, &application("0oa1", "custom"), &no_delay()).await;

    assert_eq!(status, ProvisioningStatus::disabled());
}

#[tokio::test]
async fn test_detail_flags_are_read() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        FEATURES,
        json!([feature_json("USER_PROVISIONING", "ENABLED")]),
    )
    .await;
    mount_json(
        &server,
        UP_DETAIL,
        feature_detail_json("USER_PROVISIONING", true, false, true),
    )
    .await;

    let client = test_client(&server);
    let status = resolve_provisioning(&client, &application("0oa1", "custom"), &no_delay()).await;

    assert!(status.enabled);
    assert_eq!(
        status.config,
        Some(ProvisioningConfig {
            create: true,
            update: false,
            deactivate: true,
        })
    );
}

#[tokio::test]
async fn test_rate_limited_detail_then_success_matches_direct_success() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        FEATURES,
        json!([feature_json("USER_PROVISIONING", "DISABLED")]),
    )
    .await;
    mount_rate_limited(&server, UP_DETAIL, 1).await;
    mount_json(
        &server,
        UP_DETAIL,
        feature_detail_json("USER_PROVISIONING", false, true, false),
    )
    .await;

    let client = test_client(&server);
    let status = resolve_provisioning(&client, &application("0oa1", "custom"), &no_delay()).await;

    assert_eq!(
        status.config,
        Some(ProvisioningConfig {
            create: false,
            update: true,
            deactivate: false,
        })
    );
}

#[tokio::test]
async fn test_rate_limited_twice_falls_back_to_feature_status() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        FEATURES,
        json!([feature_json("USER_PROVISIONING", "ENABLED")]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path(UP_DETAIL))
        .respond_with(ResponseTemplate::new(429))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(UM_DETAIL))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let status = resolve_provisioning(&client, &application("0oa1", "custom"), &no_delay()).await;

    assert!(status.enabled);
    assert_eq!(status.config, Some(ProvisioningConfig::all_enabled()));
}

#[tokio::test]
async fn test_detail_falls_back_to_other_feature_name() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        FEATURES,
        json!([feature_json("USER_MANAGEMENT", "DISABLED")]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path(UM_DETAIL))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    mount_json(
        &server,
        UP_DETAIL,
        feature_detail_json("USER_PROVISIONING", true, true, false),
    )
    .await;

    let client = test_client(&server);
    let status = resolve_provisioning(&client, &application("0oa1", "custom"), &no_delay()).await;

    assert_eq!(
        status.config,
        Some(ProvisioningConfig {
            create: true,
            update: true,
            deactivate: false,
        })
    );
}

#[tokio::test]
async fn test_well_known_app_synthesizes_operations() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        FEATURES,
        json!([feature_json("USER_PROVISIONING", "DISABLED")]),
    )
    .await;

    let client = test_client(&server);
    let status = resolve_provisioning(&client, &application("0oa1", "slack"), &no_delay()).await;

    assert!(status.enabled);
    assert_eq!(status.config, Some(ProvisioningConfig::all_enabled()));
}

#[tokio::test]
async fn test_unresolved_config_for_unknown_app() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        FEATURES,
        json!([feature_json("USER_PROVISIONING", "DISABLED")]),
    )
    .await;

    let client = test_client(&server);
    let status = resolve_provisioning(&client, &application("0oa1", "custom"), &no_delay()).await;

    assert!(status.enabled);
    assert!(status.config.is_none());
    assert_eq!(status.operations(), ProvisioningConfig::default());
}
