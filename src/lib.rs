//! Okta Provisioning Inventory
//!
//! Enumerates Okta applications and reports, per application, whether user
//! provisioning is enabled, which lifecycle operations are active, and which
//! user attributes are synchronized.

#![deny(clippy::all)]

pub mod config;
pub mod error;
pub mod inventory;
pub mod okta;
pub mod report;
pub mod secret;
