//! Request pacing observed through the resolvers.

mod common;

use std::time::Duration;

use common::*;
use okta_provisioning_inventory::inventory::{
    resolve_attributes, resolve_provisioning, ThrottlePolicy,
};
use serde_json::json;
use tokio::time::Instant;

const DELAY: Duration = Duration::from_millis(150);

fn paced() -> ThrottlePolicy {
    ThrottlePolicy {
        request_delay: DELAY,
        rate_limit_backoff: Duration::ZERO,
    }
}

#[tokio::test]
async fn test_features_call_is_paced() {
    let server = wiremock::MockServer::start().await;
    mount_json(&server, "/api/v1/apps/0oa1/features", json!([])).await;

    let client = test_client(&server);
    let start = Instant::now();
    let status = resolve_provisioning(&client, &application("0oa1", "custom"), &paced()).await;

    assert!(!status.enabled);
    assert!(start.elapsed() >= DELAY);
}

#[tokio::test]
async fn test_features_and_detail_calls_are_each_paced() {
    let server = wiremock::MockServer::start().await;
    mount_json(
        &server,
        "/api/v1/apps/0oa1/features",
        json!([feature_json("USER_PROVISIONING", "ENABLED")]),
    )
    .await;
    mount_json(
        &server,
        "/api/v1/apps/0oa1/features/USER_PROVISIONING",
        feature_detail_json("USER_PROVISIONING", true, true, true),
    )
    .await;

    let client = test_client(&server);
    let start = Instant::now();
    let status = resolve_provisioning(&client, &application("0oa1", "custom"), &paced()).await;

    assert!(status.enabled);
    assert!(start.elapsed() >= DELAY * 2);
}

#[tokio::test]
async fn test_mapping_list_and_each_detail_are_paced() {
    let server = wiremock::MockServer::start().await;
    mount_json(
        &server,
        "/api/v1/mappings",
        json!([
            {
                "id": "prm1",
                "source": { "type": "user" },
                "target": { "type": "appuser" }
            },
            {
                "id": "prm2",
                "source": { "type": "user" },
                "target": { "type": "appuser" }
            }
        ]),
    )
    .await;
    mount_json(
        &server,
        "/api/v1/mappings/prm1",
        json!({ "properties": { "email": {} } }),
    )
    .await;
    mount_json(
        &server,
        "/api/v1/mappings/prm2",
        json!({ "properties": { "login": {} } }),
    )
    .await;

    let client = test_client(&server);
    let start = Instant::now();
    let set = resolve_attributes(&client, &application("0oa1", "custom"), &paced()).await;

    assert_eq!(set.len(), 2);
    assert!(start.elapsed() >= DELAY * 3);
}

#[tokio::test]
async fn test_immediate_policy_does_not_sleep() {
    let start = Instant::now();
    for _ in 0..100 {
        ThrottlePolicy::immediate().pace().await;
    }
    assert!(start.elapsed() < DELAY);
}
