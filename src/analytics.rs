//! Web analytics bootstrap.
//!
//! The site embeds the Firebase web SDK when `[analytics] enable = true`.
//! Configuration is checked up front so a half-filled `[analytics]` section
//! fails the build instead of producing a page whose SDK init throws.
//!
//! Initialization happens at most once per process ([`AnalyticsSlot`]); the
//! emitted script applies the same rule in the browser by reusing an
//! existing app instance.

use crate::config::AnalyticsConfig;
use serde_json::{Map, Value};
use std::sync::OnceLock;
use thiserror::Error;

const SDK_VERSION: &str = "10.12.2";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("[analytics.{0}] is required when analytics is enabled")]
    MissingKey(&'static str),
}

/// Validated SDK configuration, as `(camelCaseKey, value)` pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analytics {
    entries: Vec<(&'static str, String)>,
}

impl Analytics {
    /// `Ok(None)` when disabled; an error naming the first missing required key.
    pub fn from_config(config: &AnalyticsConfig) -> Result<Option<Self>, AnalyticsError> {
        if !config.enable {
            return Ok(None);
        }

        let fields: [(&'static str, &'static str, &Option<String>, bool); 7] = [
            ("api_key", "apiKey", &config.api_key, true),
            ("auth_domain", "authDomain", &config.auth_domain, false),
            ("project_id", "projectId", &config.project_id, true),
            ("storage_bucket", "storageBucket", &config.storage_bucket, false),
            ("messaging_sender_id", "messagingSenderId", &config.messaging_sender_id, false),
            ("app_id", "appId", &config.app_id, true),
            ("measurement_id", "measurementId", &config.measurement_id, true),
        ];

        let mut entries = Vec::with_capacity(fields.len());
        for (key, js_key, value, required) in fields {
            match value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                Some(value) => entries.push((js_key, value.to_owned())),
                None if required => return Err(AnalyticsError::MissingKey(key)),
                None => {}
            }
        }
        Ok(Some(Self { entries }))
    }

    pub fn get(&self, js_key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| *key == js_key)
            .map(|(_, value)| value.as_str())
    }

    /// SDK config object as JSON, safe to inline in a `<script>`.
    pub fn config_json(&self) -> String {
        let map: Map<String, Value> = self
            .entries
            .iter()
            .map(|(key, value)| ((*key).to_owned(), Value::String(value.clone())))
            .collect();
        Value::Object(map).to_string().replace("</", "<\\/")
    }

    /// Module script for `<head>`.
    pub fn head_snippet(&self) -> String {
        format!(
            r#"<script type="module">
import {{ initializeApp, getApps, getApp }} from "https://www.gstatic.com/firebasejs/{SDK_VERSION}/firebase-app.js";
import {{ getAnalytics, isSupported }} from "https://www.gstatic.com/firebasejs/{SDK_VERSION}/firebase-analytics.js";
const app = getApps().length ? getApp() : initializeApp({config});
isSupported().then((ok) => {{ if (ok) getAnalytics(app); }});
</script>"#,
            config = self.config_json()
        )
    }
}

// ============================================================================
// Process-wide instance
// ============================================================================

/// Holds the analytics instance once initialized.
pub struct AnalyticsSlot {
    cell: OnceLock<Option<Analytics>>,
}

impl AnalyticsSlot {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// Initialize from `config` on first call; later calls return the same
    /// instance and ignore their argument.
    ///
    /// A validation failure leaves the slot empty so a corrected config can
    /// bootstrap later.
    pub fn bootstrap(&self, config: &AnalyticsConfig) -> Result<Option<&Analytics>, AnalyticsError> {
        if let Some(existing) = self.cell.get() {
            return Ok(existing.as_ref());
        }
        let analytics = Analytics::from_config(config)?;
        Ok(self.cell.get_or_init(|| analytics).as_ref())
    }

    pub fn get(&self) -> Option<&Analytics> {
        self.cell.get().and_then(Option::as_ref)
    }
}

/// The process's analytics instance.
pub static ANALYTICS: AnalyticsSlot = AnalyticsSlot::new();
