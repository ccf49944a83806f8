//! Inventory builder: list applications, resolve each one, assemble rows.

use tracing::{debug, info};

use super::attributes::{resolve_attributes, AttributeSet};
use super::provisioning::resolve_provisioning;
use super::throttle::ThrottlePolicy;
use crate::error::ApiError;
use crate::okta::models::Application;
use crate::okta::OktaClient;
use crate::report::ReportRow;

/// Builds one report row per Okta application.
pub struct InventoryBuilder<'a> {
    client: &'a OktaClient,
    policy: ThrottlePolicy,
    page_size: u32,
}

impl<'a> InventoryBuilder<'a> {
    pub fn new(client: &'a OktaClient, policy: ThrottlePolicy, page_size: u32) -> Self {
        Self {
            client,
            policy,
            page_size,
        }
    }

    /// Run the full inventory.
    ///
    /// Only the application listing can fail; per-application problems are
    /// logged and reported with default values.
    pub async fn run(&self) -> Result<Vec<ReportRow>, ApiError> {
        info!("Listing applications (page size {})", self.page_size);
        let applications = self.client.list_applications(self.page_size).await?;

        let total = applications.len();
        let mut rows = Vec::with_capacity(total);

        for (idx, app) in applications.iter().enumerate() {
            info!(
                "Processing application {}/{}: {} ({})",
                idx + 1,
                total,
                app.label,
                app.name
            );
            rows.push(self.process_application(app).await);
        }

        Ok(rows)
    }

    /// Resolve provisioning and attributes for one application.
    pub async fn process_application(&self, app: &Application) -> ReportRow {
        let provisioning = resolve_provisioning(self.client, app, &self.policy).await;

        let attributes = if provisioning.enabled {
            resolve_attributes(self.client, app, &self.policy).await
        } else {
            AttributeSet::default()
        };

        let row = ReportRow::assemble(app, &provisioning, &attributes);
        debug!(
            "{}: provisioning={} create={} update={} deactivate={} fields={}",
            app.label,
            row.provisioning_enabled,
            row.create_operation,
            row.update_operation,
            row.deactivate_operation,
            row.field_count
        );
        row
    }
}
