//! `[analytics]` section configuration.
//!
//! Mirrors the web SDK config object. Keys are optional here; whether the
//! required ones are present is checked by [`Analytics::from_config`]
//! when analytics is enabled.
//!
//! [`Analytics::from_config`]: crate::analytics::Analytics::from_config

use serde::{Deserialize, Serialize};

/// `[analytics]` section in folio.toml.
///
/// ```toml
/// [analytics]
/// enable = true
/// api_key = "AIza..."
/// project_id = "my-portfolio"
/// app_id = "1:123:web:abc"
/// measurement_id = "G-XXXXXXX"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalyticsConfig {
    #[serde(default)]
    pub enable: bool,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub auth_domain: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub storage_bucket: Option<String>,
    #[serde(default)]
    pub messaging_sender_id: Option<String>,
    #[serde(default)]
    pub app_id: Option<String>,
    #[serde(default)]
    pub measurement_id: Option<String>,
}
