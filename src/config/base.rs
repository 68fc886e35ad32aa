//! `[base]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[base]` section in folio.toml - site metadata.
///
/// # Example
/// ```toml
/// [base]
/// title = "Alex Rivera"
/// description = "Software engineer crafting digital experiences"
/// url = "https://alexrivera.dev"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BaseConfig {
    /// Browser tab title.
    pub title: String,

    /// `<meta name="description">` content.
    #[serde(default)]
    pub description: String,

    /// `<meta name="author">` content.
    #[serde(default = "defaults::base::author")]
    #[educe(Default = defaults::base::author())]
    pub author: String,

    /// Absolute site URL. Required when `[build.sitemap].enable = true`.
    #[serde(default = "defaults::base::url")]
    #[educe(Default = defaults::base::url())]
    pub url: Option<String>,

    /// `<html lang>` value.
    #[serde(default = "defaults::base::language")]
    #[educe(Default = defaults::base::language())]
    pub language: String,

    /// Footer copyright line; `© <year> <author>` when empty.
    #[serde(default)]
    pub copyright: String,
}

impl BaseConfig {
    pub fn copyright_line(&self, year: i32) -> String {
        if self.copyright.is_empty() {
            format!("© {year} {}", self.author)
        } else {
            self.copyright.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;

    #[test]
    fn test_base_config_full() {
        let config = r#"
            [base]
            title = "Alex Rivera"
            description = "Portfolio"
            author = "Alex"
            url = "https://alexrivera.dev"
            language = "en-GB"
            copyright = "2025 Alex"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.base.title, "Alex Rivera");
        assert_eq!(config.base.url.as_deref(), Some("https://alexrivera.dev"));
        assert_eq!(config.base.language, "en-GB");
        assert_eq!(config.base.copyright_line(2030), "2025 Alex");
    }

    #[test]
    fn test_base_config_defaults() {
        let config: SiteConfig = toml::from_str("[base]\ntitle = \"Test\"").unwrap();

        assert_eq!(config.base.author, "<YOUR_NAME>");
        assert_eq!(config.base.language, "en");
        assert_eq!(config.base.url, None);
        assert_eq!(config.base.description, "");
        assert_eq!(config.base.copyright_line(2025), "© 2025 <YOUR_NAME>");
    }

    #[test]
    fn test_unknown_field_rejection() {
        let config = r#"
            [base]
            title = "Test"
            unknown_field = "should_fail"
        "#;
        let result: Result<SiteConfig, _> = toml::from_str(config);

        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }
}
