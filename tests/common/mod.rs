//! Shared helpers for the Okta API integration tests.

#![allow(dead_code)]

use std::time::Duration;

use okta_provisioning_inventory::inventory::ThrottlePolicy;
use okta_provisioning_inventory::okta::{Application, OktaClient};
use okta_provisioning_inventory::secret::ApiToken;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_TOKEN: &str = "00test-token";

/// Client pointed at the mock server.
pub fn test_client(server: &MockServer) -> OktaClient {
    OktaClient::new(
        &server.uri(),
        "SSWS",
        &ApiToken::from(TEST_TOKEN.to_string()),
        Duration::from_secs(5),
        Duration::from_secs(5),
    )
    .expect("client")
}

/// No pacing and no backoff so tests run instantly.
pub fn no_delay() -> ThrottlePolicy {
    ThrottlePolicy::immediate()
}

/// Application JSON as returned by `/api/v1/apps`.
pub fn app_json(id: &str, name: &str, label: &str, status: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "label": label,
        "status": status,
        "signOnMode": "SAML_2_0",
        "features": []
    })
}

pub fn application(id: &str, name: &str) -> Application {
    serde_json::from_value(app_json(id, name, &name.to_uppercase(), "ACTIVE"))
        .expect("application")
}

pub fn feature_json(name: &str, status: &str) -> Value {
    json!({ "name": name, "status": status, "description": "test feature" })
}

/// Feature detail with the three lifecycle capabilities.
pub fn feature_detail_json(name: &str, create: bool, update: bool, deactivate: bool) -> Value {
    let s = |on: bool| if on { "ENABLED" } else { "DISABLED" };
    json!({
        "name": name,
        "status": "ENABLED",
        "capabilities": {
            "create": { "lifecycleCreate": { "status": s(create) } },
            "update": {
                "profile": { "status": s(update) },
                "lifecycleDeactivate": { "status": s(deactivate) },
                "password": { "status": "DISABLED", "seed": "RANDOM", "change": "CHANGE" }
            }
        }
    })
}

pub fn not_supported_json() -> Value {
    json!({
        "errorCode": "E0000150",
        "errorSummary": "Provisioning is not supported for this application.",
        "errorCauses": []
    })
}

/// Mount `GET {route}` answering with `body`.
pub async fn mount_json(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount `GET {route}` answering 429 for the first `times` requests.
pub async fn mount_rate_limited(server: &MockServer, route: &str, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("X-Rate-Limit-Remaining", "0")
                .set_body_json(json!({
                    "errorCode": "E0000047",
                    "errorSummary": "API call exceeded rate limit due to too many requests."
                })),
        )
        .up_to_n_times(times)
        .mount(server)
        .await;
}
