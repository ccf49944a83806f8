//! Well-known integrations with hard-coded provisioning behaviour.
//!
//! Okta does not expose capability details or attribute lists for every
//! catalog integration. For these apps provisioning is assumed to support all
//! lifecycle operations, and the listed attributes stand in for a mapping.

/// A catalog integration special-cased by the inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WellKnownApp {
    /// Okta technical name, as in `Application::name`.
    pub name: &'static str,
    /// Human readable product name used in source labels.
    pub display_name: &'static str,
    /// Attributes pushed by the integration's default profile mapping.
    pub default_attributes: &'static [&'static str],
}

impl WellKnownApp {
    /// Source label recorded when the default attributes are used.
    pub fn source_label(&self) -> String {
        format!("Default schema for {}", self.display_name)
    }
}

pub static WELL_KNOWN_APPS: &[WellKnownApp] = &[
    WellKnownApp {
        name: "zoomus",
        display_name: "Zoom",
        default_attributes: &["email", "firstName", "lastName", "userName", "userType"],
    },
    WellKnownApp {
        name: "slack",
        display_name: "Slack",
        default_attributes: &["userName", "email", "firstName", "lastName", "displayName"],
    },
    WellKnownApp {
        name: "office365",
        display_name: "Office 365",
        default_attributes: &[
            "userPrincipalName",
            "displayName",
            "givenName",
            "surname",
            "mail",
            "mailNickname",
            "usageLocation",
        ],
    },
    WellKnownApp {
        name: "google",
        display_name: "Google Workspace",
        default_attributes: &["email", "firstName", "lastName", "orgUnitPath"],
    },
    WellKnownApp {
        name: "salesforce",
        display_name: "Salesforce",
        default_attributes: &[
            "userName",
            "email",
            "firstName",
            "lastName",
            "alias",
            "profile",
            "role",
        ],
    },
    WellKnownApp {
        name: "boxnet",
        display_name: "Box",
        default_attributes: &["login", "name", "role", "status"],
    },
];

/// Look up a well-known integration by technical name, ignoring ASCII case.
pub fn lookup(app_name: &str) -> Option<&'static WellKnownApp> {
    WELL_KNOWN_APPS
        .iter()
        .find(|app| app.name.eq_ignore_ascii_case(app_name.trim()))
}
