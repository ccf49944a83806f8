//! Provisioning inventory of Okta applications.
//!
//! This module provides:
//! - Provisioning resolution (feature detail with fallbacks)
//! - Synchronized attribute resolution (defaults, mappings, schema)
//! - Fixed pacing and the one-shot 429 retry
//! - Orchestration across all applications

pub mod attributes;
pub mod builder;
pub mod provisioning;
pub mod throttle;
pub mod well_known;

pub use attributes::{resolve_attributes, AttributeSet};
pub use builder::InventoryBuilder;
pub use provisioning::{resolve_provisioning, ProvisioningConfig, ProvisioningStatus};
pub use throttle::ThrottlePolicy;
