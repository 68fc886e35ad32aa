//! `[theme]` section configuration.

use super::defaults;
use crate::theme::ThemePreference;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[theme]` section in folio.toml.
///
/// ```toml
/// [theme]
/// default = "system"     # light | dark | system
/// storage_key = "theme"  # localStorage key used by the page script
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ThemeConfig {
    /// Preference used until the visitor picks one.
    #[serde(default = "defaults::theme::default")]
    #[educe(Default = defaults::theme::default())]
    pub default: ThemePreference,

    #[serde(default = "defaults::theme::storage_key")]
    #[educe(Default = defaults::theme::storage_key())]
    pub storage_key: String,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;
    use crate::theme::ThemePreference;

    #[test]
    fn test_theme_defaults() {
        let config = SiteConfig::default();
        assert_eq!(config.theme.default, ThemePreference::System);
        assert_eq!(config.theme.storage_key, "theme");
    }

    #[test]
    fn test_theme_override() {
        let config: SiteConfig = toml::from_str(
            r#"
            [base]
            title = "T"
            [theme]
            default = "dark"
            storage_key = "folio-theme"
            "#,
        )
        .unwrap();
        assert_eq!(config.theme.default, ThemePreference::Dark);
        assert_eq!(config.theme.storage_key, "folio-theme");
    }

    #[test]
    fn test_theme_rejects_unknown_preference() {
        let result = toml::from_str::<SiteConfig>(
            r#"
            [base]
            title = "T"
            [theme]
            default = "sepia"
            "#,
        );
        assert!(result.is_err());
    }
}
