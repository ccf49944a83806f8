//! Synchronized attribute resolution for a single application.
//!
//! Sources are tried in order and the first one yielding fields wins:
//! well-known defaults, profile mapping details, then the app user schema.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use super::throttle::ThrottlePolicy;
use super::well_known;
use crate::okta::models::Application;
use crate::okta::OktaClient;

pub const SOURCE_MAPPING: &str = "Mapping details";
pub const SOURCE_SCHEMA: &str = "Schema";
pub const SOURCE_SCHEMA_RETRY: &str = "Schema (retry)";

/// Synchronized field names with the sources that produced them.
///
/// Fields are kept deduplicated and in ascending ordinal order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSet {
    fields: BTreeSet<String>,
    sources: Vec<String>,
}

impl AttributeSet {
    /// Add fields from one source; the source is recorded only if it contributed.
    pub fn add<I, S>(&mut self, fields: I, source: impl Into<String>)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let before = self.fields.len();
        self.fields.extend(fields.into_iter().map(Into::into));
        if self.fields.len() > before {
            self.sources.push(source.into());
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Resolve the synchronized attributes of a provisioning-enabled application.
///
/// Never fails: each step logs its API errors and yields no fields, letting
/// the next step run.
pub async fn resolve_attributes(
    client: &OktaClient,
    app: &Application,
    policy: &ThrottlePolicy,
) -> AttributeSet {
    let mut set = AttributeSet::default();

    if let Some(known) = well_known::lookup(&app.name) {
        set.add(known.default_attributes.iter().copied(), known.source_label());
        return set;
    }

    let fields = mapping_fields(client, app, policy).await;
    set.add(fields, SOURCE_MAPPING);

    if set.is_empty() {
        if let Some((fields, retried)) = schema_fields(client, app, policy).await {
            let source = if retried {
                SOURCE_SCHEMA_RETRY
            } else {
                SOURCE_SCHEMA
            };
            set.add(fields, source);
        }
    }

    set
}

/// Target fields of mappings pushing the Okta user profile into the app.
///
/// A failed listing yields no fields; a failed detail fetch skips that mapping.
async fn mapping_fields(
    client: &OktaClient,
    app: &Application,
    policy: &ThrottlePolicy,
) -> Vec<String> {
    policy.pace().await;
    let what = format!("{} profile mappings", app.label);
    let mappings = match policy
        .retry_once_on_rate_limit(&what, || client.list_mappings(&app.id))
        .await
    {
        Ok(attempt) => attempt.value,
        Err(e) => {
            warn!("{}: could not list profile mappings: {}", app.label, e);
            return Vec::new();
        }
    };

    let mut fields = Vec::new();
    for mapping in mappings.iter().filter(|m| m.pushes_user_profile()) {
        policy.pace().await;
        let detail = match client.get_mapping(&mapping.id).await {
            Ok(detail) => detail,
            Err(e) => {
                warn!(
                    "{}: could not read profile mapping {}: {}",
                    app.label, mapping.id, e
                );
                continue;
            }
        };
        debug!(
            "{}: mapping {} maps {} properties",
            app.label,
            mapping.id,
            detail.properties.len()
        );
        fields.extend(detail.properties.into_keys());
    }

    fields
}

/// Property names of the app user schema, and whether a retry was needed.
async fn schema_fields(
    client: &OktaClient,
    app: &Application,
    policy: &ThrottlePolicy,
) -> Option<(Vec<String>, bool)> {
    policy.pace().await;
    let what = format!("{} user schema", app.label);
    match policy
        .retry_once_on_rate_limit(&what, || client.get_app_user_schema(&app.id))
        .await
    {
        Ok(attempt) => Some((attempt.value.user_property_names(), attempt.retried)),
        Err(e) => {
            warn!("{}: could not read user schema: {}", app.label, e);
            None
        }
    }
}
