//! Okta data models for applications, features, mappings and schemas.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Feature granting push provisioning to an app.
pub const FEATURE_USER_PROVISIONING: &str = "USER_PROVISIONING";

/// Legacy name some integrations still report for the same capability.
pub const FEATURE_USER_MANAGEMENT: &str = "USER_MANAGEMENT";

/// Value Okta uses for enabled features and capabilities.
pub const STATUS_ENABLED: &str = "ENABLED";

/// Application as returned by the apps listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Application {
    /// Application id (e.g. "0oa1abcd...").
    pub id: String,

    /// Technical integration name (e.g. "slack", "office365").
    #[serde(default)]
    pub name: String,

    /// Admin-visible label.
    #[serde(default)]
    pub label: String,

    /// Lifecycle status, "ACTIVE" or "INACTIVE".
    #[serde(default)]
    pub status: String,

    /// Features advertised in the listing payload.
    #[serde(default)]
    pub features: Vec<String>,
}

impl Application {
    /// True when the app's status is ACTIVE.
    pub fn is_active(&self) -> bool {
        self.status == "ACTIVE"
    }

    /// True when the listing itself advertises a provisioning feature.
    pub fn advertises_provisioning(&self) -> bool {
        self.features
            .iter()
            .any(|f| f == FEATURE_USER_PROVISIONING || f == FEATURE_USER_MANAGEMENT)
    }
}

/// Entry of `/apps/{id}/features`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppFeature {
    pub name: String,
    #[serde(default)]
    pub status: String,
}

impl AppFeature {
    pub fn is_enabled(&self) -> bool {
        self.status == STATUS_ENABLED
    }
}

/// Detailed feature configuration from `/apps/{id}/features/{name}`.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureDetail {
    #[serde(default)]
    pub capabilities: Capabilities,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Capabilities {
    #[serde(default)]
    pub create: CreateCapabilities,
    #[serde(default)]
    pub update: UpdateCapabilities,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCapabilities {
    pub lifecycle_create: Option<CapabilityStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCapabilities {
    pub profile: Option<CapabilityStatus>,
    pub lifecycle_deactivate: Option<CapabilityStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CapabilityStatus {
    #[serde(default)]
    pub status: String,
}

impl CapabilityStatus {
    fn enabled(status: &Option<CapabilityStatus>) -> bool {
        status.as_ref().is_some_and(|s| s.status == STATUS_ENABLED)
    }
}

impl FeatureDetail {
    pub fn create_enabled(&self) -> bool {
        CapabilityStatus::enabled(&self.capabilities.create.lifecycle_create)
    }

    pub fn update_enabled(&self) -> bool {
        CapabilityStatus::enabled(&self.capabilities.update.profile)
    }

    pub fn deactivate_enabled(&self) -> bool {
        CapabilityStatus::enabled(&self.capabilities.update.lifecycle_deactivate)
    }
}

/// Profile mapping summary from `/mappings`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileMapping {
    pub id: String,
    pub source: MappingEndpoint,
    pub target: MappingEndpoint,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MappingEndpoint {
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl ProfileMapping {
    /// Mapping pushes Okta user profile fields into an app user profile.
    pub fn pushes_user_profile(&self) -> bool {
        self.source.kind.eq_ignore_ascii_case("user")
            && self.target.kind.to_ascii_uppercase().contains("USER")
    }
}

/// Mapping detail from `/mappings/{id}`; keys of `properties` are target fields.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileMappingDetail {
    #[serde(default)]
    pub properties: BTreeMap<String, serde_json::Value>,
}

/// App user schema from `/meta/schemas/apps/{id}/default`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppUserSchema {
    #[serde(default)]
    pub user: Option<SchemaObject>,
    #[serde(default)]
    pub definitions: SchemaDefinitions,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaDefinitions {
    #[serde(default)]
    pub user: Option<SchemaObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchemaObject {
    #[serde(default)]
    pub properties: BTreeMap<String, serde_json::Value>,
}

impl AppUserSchema {
    /// Property names of the `user` object, preferring the root definition.
    pub fn user_property_names(&self) -> Vec<String> {
        self.user
            .as_ref()
            .or(self.definitions.user.as_ref())
            .map(|object| object.properties.keys().cloned().collect())
            .unwrap_or_default()
    }
}

/// Okta error body, e.g. `{"errorCode":"E0000150","errorSummary":"..."}`; only
/// the summary is surfaced.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OktaErrorBody {
    #[serde(default)]
    pub error_summary: String,
}
