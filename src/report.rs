//! Report rows and CSV export.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::error::ReportError;
use crate::inventory::attributes::AttributeSet;
use crate::inventory::provisioning::ProvisioningStatus;
use crate::okta::models::Application;

/// Separator used to flatten list-valued columns.
pub const LIST_SEPARATOR: &str = "; ";

/// One CSV row per application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReportRow {
    pub app_id: String,
    pub app_name: String,
    pub app_label: String,
    pub status: String,
    pub is_active: bool,
    pub provisioning_enabled: bool,
    pub create_operation: bool,
    pub update_operation: bool,
    pub deactivate_operation: bool,
    pub sync_fields: String,
    pub field_count: usize,
    pub attribute_sources: String,
}

impl ReportRow {
    /// Combine an application with its resolved provisioning and attributes.
    pub fn assemble(
        app: &Application,
        provisioning: &ProvisioningStatus,
        attributes: &AttributeSet,
    ) -> Self {
        let operations = provisioning.operations();
        Self {
            app_id: app.id.clone(),
            app_name: app.name.clone(),
            app_label: app.label.clone(),
            status: app.status.clone(),
            is_active: app.is_active(),
            provisioning_enabled: provisioning.enabled,
            create_operation: operations.create,
            update_operation: operations.update,
            deactivate_operation: operations.deactivate,
            sync_fields: attributes.fields().collect::<Vec<_>>().join(LIST_SEPARATOR),
            field_count: attributes.len(),
            attribute_sources: attributes.sources().join(LIST_SEPARATOR),
        }
    }
}

/// Totals logged at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub total: usize,
    pub provisioning_enabled: usize,
    pub active: usize,
}

impl ReportSummary {
    pub fn from_rows(rows: &[ReportRow]) -> Self {
        Self {
            total: rows.len(),
            provisioning_enabled: rows.iter().filter(|r| r.provisioning_enabled).count(),
            active: rows.iter().filter(|r| r.is_active).count(),
        }
    }
}

/// Serialize rows as CSV with a header row.
pub fn write_csv<W: Write>(rows: &[ReportRow], writer: W) -> Result<(), ReportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// File name embedding the generation timestamp.
pub fn report_file_name(prefix: &str, generated_at: DateTime<Local>) -> String {
    format!("{}_{}.csv", prefix, generated_at.format("%Y%m%d_%H%M%S"))
}

/// Write the report into `directory`, returning the created path.
pub fn export(
    rows: &[ReportRow],
    directory: &Path,
    prefix: &str,
    generated_at: DateTime<Local>,
) -> Result<PathBuf, ReportError> {
    fs::create_dir_all(directory)?;
    let path = directory.join(report_file_name(prefix, generated_at));
    let file = File::create(&path)?;
    write_csv(rows, file)?;
    Ok(path)
}
