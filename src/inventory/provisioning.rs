//! Provisioning resolution for a single application.
//!
//! Features are read first; the detailed feature configuration supplies the
//! lifecycle flags. When the detail cannot be read, flags are synthesized
//! from the feature status and then from the well-known table.

use tracing::{debug, warn};

use super::throttle::ThrottlePolicy;
use super::well_known;
use crate::okta::models::{
    AppFeature, Application, FeatureDetail, FEATURE_USER_MANAGEMENT, FEATURE_USER_PROVISIONING,
};
use crate::okta::OktaClient;

/// Lifecycle operations enabled for provisioning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProvisioningConfig {
    pub create: bool,
    pub update: bool,
    pub deactivate: bool,
}

impl ProvisioningConfig {
    /// Every lifecycle operation assumed on.
    pub fn all_enabled() -> Self {
        Self {
            create: true,
            update: true,
            deactivate: true,
        }
    }
}

impl From<&FeatureDetail> for ProvisioningConfig {
    fn from(detail: &FeatureDetail) -> Self {
        Self {
            create: detail.create_enabled(),
            update: detail.update_enabled(),
            deactivate: detail.deactivate_enabled(),
        }
    }
}

/// Resolved provisioning state of an application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProvisioningStatus {
    pub enabled: bool,
    pub config: Option<ProvisioningConfig>,
}

impl ProvisioningStatus {
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Flags to report; all false when no configuration was resolved.
    pub fn operations(&self) -> ProvisioningConfig {
        self.config.unwrap_or_default()
    }
}

/// Pick the provisioning feature, preferring `USER_PROVISIONING`.
pub fn select_provisioning_feature(features: &[AppFeature]) -> Option<&AppFeature> {
    features
        .iter()
        .find(|f| f.name == FEATURE_USER_PROVISIONING)
        .or_else(|| features.iter().find(|f| f.name == FEATURE_USER_MANAGEMENT))
}

/// Resolve whether provisioning is enabled and which operations are active.
///
/// Never fails: API errors degrade to "disabled" or to an unresolved config.
pub async fn resolve_provisioning(
    client: &OktaClient,
    app: &Application,
    policy: &ThrottlePolicy,
) -> ProvisioningStatus {
    policy.pace().await;
    let features = match client.list_features(&app.id).await {
        Ok(features) => features,
        Err(e) if e.is_not_supported() => {
            debug!("{}: features not supported ({})", app.label, e);
            return ProvisioningStatus::disabled();
        }
        Err(e) => {
            warn!("{}: failed to list features: {}", app.label, e);
            return ProvisioningStatus::disabled();
        }
    };

    let Some(feature) = select_provisioning_feature(&features) else {
        if app.advertises_provisioning() {
            debug!(
                "{}: listing advertises provisioning but features endpoint does not",
                app.label
            );
        }
        return ProvisioningStatus::disabled();
    };

    let fallback = if feature.name == FEATURE_USER_PROVISIONING {
        FEATURE_USER_MANAGEMENT
    } else {
        FEATURE_USER_PROVISIONING
    };

    let mut config = fetch_feature_config(client, app, &feature.name, policy).await;
    if config.is_none() {
        config = fetch_feature_config(client, app, fallback, policy).await;
    }

    if config.is_none() && feature.is_enabled() {
        debug!(
            "{}: {} is ENABLED, assuming all operations",
            app.label, feature.name
        );
        config = Some(ProvisioningConfig::all_enabled());
    }

    if config.is_none() {
        if let Some(known) = well_known::lookup(&app.name) {
            debug!(
                "{}: using well-known operations for {}",
                app.label, known.display_name
            );
            config = Some(ProvisioningConfig::all_enabled());
        }
    }

    ProvisioningStatus {
        enabled: true,
        config,
    }
}

async fn fetch_feature_config(
    client: &OktaClient,
    app: &Application,
    feature_name: &str,
    policy: &ThrottlePolicy,
) -> Option<ProvisioningConfig> {
    policy.pace().await;
    let what = format!("{} feature {}", app.label, feature_name);
    match policy
        .retry_once_on_rate_limit(&what, || client.get_feature(&app.id, feature_name))
        .await
    {
        Ok(attempt) => Some(ProvisioningConfig::from(&attempt.value)),
        Err(e) => {
            warn!("{}: could not read {}: {}", app.label, feature_name, e);
            None
        }
    }
}
