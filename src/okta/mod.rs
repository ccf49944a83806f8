//! Okta management API access.

pub mod client;
pub mod models;
pub mod pagination;

pub use client::OktaClient;
pub use models::Application;
