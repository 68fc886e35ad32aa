//! Site configuration management for `folio.toml`.
//!
//! # Sections
//!
//! | Section       | Purpose                                        |
//! |---------------|------------------------------------------------|
//! | `[base]`      | Site metadata (title, author, url)             |
//! | `[build]`     | Content file, assets, output, minify, sitemap  |
//! | `[serve]`     | Development server (port, interface, watch)    |
//! | `[theme]`     | Default light/dark preference, storage key     |
//! | `[analytics]` | Web analytics bootstrap keys                   |
//!
//! # Example
//!
//! ```toml
//! [base]
//! title = "Alex Rivera"
//! url = "https://alexrivera.dev"
//!
//! [build]
//! content = "portfolio.toml"
//! output = "public"
//!
//! [build.sitemap]
//! enable = true
//!
//! [serve]
//! port = 4321
//! ```

mod analytics;
mod base;
mod build;
pub mod defaults;
mod error;
mod handle;
mod serve;
mod theme;

pub use analytics::AnalyticsConfig;
pub use error::ConfigError;
pub use handle::{cfg, init_config, reload_config, set_serve_addr};

use base::BaseConfig;
use build::BuildConfig;
use serve::ServeConfig;
use theme::ThemeConfig;

use crate::{
    analytics::Analytics,
    cli::{Cli, Commands},
};
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    net::{IpAddr, SocketAddr},
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing folio.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// CLI arguments reference
    #[serde(skip)]
    pub cli: Option<&'static Cli>,

    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Address the dev server is listening on, once bound.
    #[serde(skip)]
    pub serve_addr: Option<SocketAddr>,

    #[serde(default)]
    pub base: BaseConfig,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub serve: ServeConfig,

    #[serde(default)]
    pub theme: ThemeConfig,

    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Read `<root>/<config>` (defaults when absent) and apply the CLI on top.
    pub fn load(cli: &'static Cli) -> Result<Self> {
        let root = cli.root.as_deref().unwrap_or(Path::new("./"));
        let config_path = root.join(&cli.config);

        let mut config = if config_path.exists() {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };
        config.update_with_cli(cli);
        Ok(config)
    }

    pub fn get_root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    pub fn set_root(&mut self, path: &Path) {
        self.build.root = Some(path.to_path_buf())
    }

    /// Where the sitemap is written (absolute once loaded).
    pub fn sitemap_path(&self) -> PathBuf {
        self.build.output.join(&self.build.sitemap.path)
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &'static Cli) {
        self.cli = Some(cli);

        let base = cli
            .root
            .clone()
            .unwrap_or_else(|| self.get_root().to_owned());
        let root = match &cli.command {
            Commands::Init { name: Some(name) } => base.join(name),
            _ => base,
        };
        self.update_path_with_root(&root, &cli.config);

        if let Commands::Serve {
            interface,
            port,
            watch,
            ..
        } = &cli.command
        {
            Self::update_option(&mut self.serve.interface, interface.as_ref());
            Self::update_option(&mut self.serve.port, port.as_ref());
            Self::update_option(&mut self.serve.watch, watch.as_ref());
            self.update_local_url();
        }

        if let Some(args) = cli.build_args() {
            self.build.clean |= args.clean;
            Self::update_option(&mut self.build.minify, args.minify.as_ref());
            Self::update_option(&mut self.build.sitemap.enable, args.sitemap.as_ref());
            if let Some(url) = &args.base_url {
                self.base.url = Some(url.clone());
            }
        }
    }

    /// Record the address the dev server bound and point `base.url` at it.
    pub fn set_serve_addr(&mut self, addr: SocketAddr) {
        self.serve_addr = Some(addr);
        self.update_local_url();
    }

    /// `base.url` for the dev server, unless `--base-url` was given.
    ///
    /// Uses the bound address when known (the port may have moved), the
    /// configured interface and port otherwise.
    fn update_local_url(&mut self) {
        let overridden = self
            .cli
            .and_then(Cli::build_args)
            .is_some_and(|args| args.base_url.is_some());
        if overridden {
            return;
        }

        let addr = self.serve_addr.or_else(|| {
            let ip: IpAddr = self.serve.interface.parse().ok()?;
            Some(SocketAddr::new(ip, self.serve.port))
        });
        self.base.url = Some(match addr {
            // Display brackets IPv6 hosts
            Some(addr) => format!("http://{addr}"),
            None => format!("http://{}:{}", self.serve.interface, self.serve.port),
        });
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Resolve every path against `root` and make it absolute.
    fn update_path_with_root(&mut self, root: &Path, config_file: &Path) {
        let root = Self::normalize_path(root);
        self.set_root(&root);

        self.config_path = Self::normalize_path(&root.join(config_file));
        self.build.content = Self::normalize_path(&root.join(&self.build.content));
        self.build.assets = Self::normalize_path(&root.join(&self.build.assets));
        self.build.output = Self::normalize_path(&root.join(&self.build.output));
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    pub fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration before building or serving.
    pub fn validate(&self) -> Result<()> {
        if !self.config_path.exists() {
            bail!("Config file not found");
        }

        if let Some(base_url) = &self.base.url
            && !base_url.starts_with("http")
        {
            bail!(ConfigError::Validation(
                "[base.url] must start with http:// or https://".into()
            ));
        }

        if self.build.sitemap.enable && self.base.url.is_none() {
            bail!(ConfigError::Validation(
                "[base.url] is required for sitemap generation".into()
            ));
        }

        if self.theme.storage_key.trim().is_empty() {
            bail!(ConfigError::Validation(
                "[theme.storage_key] must not be empty".into()
            ));
        }

        Analytics::from_config(&self.analytics).map_err(ConfigError::from)?;

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::AnalyticsError;
    use clap::Parser;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> &'static Cli {
        Box::leak(Box::new(Cli::try_parse_from(args).unwrap()))
    }

    fn site(config: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("folio.toml"), config).unwrap();
        dir
    }

    #[test]
    fn test_from_str() {
        let config = SiteConfig::from_str(
            r#"
            [base]
            title = "Alex Rivera"
            author = "Alex"
            "#,
        )
        .unwrap();
        assert_eq!(config.base.title, "Alex Rivera");
        assert_eq!(config.base.author, "Alex");
    }

    #[test]
    fn test_from_str_invalid_toml() {
        let err = SiteConfig::from_str("[base\ntitle = 1").unwrap_err();
        assert!(err.downcast_ref::<ConfigError>().is_some());
    }

    #[test]
    fn test_unknown_top_level_field_rejection() {
        let config = r#"
            [base]
            title = "Test"

            [extra]
            field = "value"
        "#;
        assert!(SiteConfig::from_str(config).is_err());
    }

    #[test]
    fn test_site_config_default() {
        let config = SiteConfig::default();

        assert!(config.cli.is_none());
        assert_eq!(config.config_path, PathBuf::new());
        assert_eq!(config.get_root(), Path::new("./"));
        assert!(config.build.minify);
        assert_eq!(config.serve.port, 4321);
        assert!(!config.analytics.enable);
    }

    #[test]
    fn test_from_path_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = SiteConfig::from_path(&dir.path().join("folio.toml")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Io(..))
        ));
    }

    #[test]
    fn test_load_resolves_paths_against_root() {
        let dir = site("[base]\ntitle = \"T\"\n[build]\noutput = \"dist\"");
        let root = dir.path().to_str().unwrap();
        let config = SiteConfig::load(cli(&["folio", "-r", root, "build"])).unwrap();

        let root = dir.path().canonicalize().unwrap();
        assert_eq!(config.get_root(), root);
        assert_eq!(config.config_path, root.join("folio.toml"));
        assert_eq!(config.build.output, root.join("dist"));
        assert_eq!(config.build.content, root.join("portfolio.toml"));
        assert_eq!(config.sitemap_path(), root.join("dist/sitemap.xml"));
        config.validate().unwrap();
    }

    #[test]
    fn test_cli_overrides() {
        let dir = site("[base]\ntitle = \"T\"\nurl = \"https://a.dev\"");
        let root = dir.path().to_str().unwrap();
        let config = SiteConfig::load(cli(&[
            "folio", "-r", root, "build", "--clean", "-m", "false", "--sitemap",
            "--base-url", "https://b.dev",
        ]))
        .unwrap();

        assert!(config.build.clean);
        assert!(!config.build.minify);
        assert!(config.build.sitemap.enable);
        assert_eq!(config.base.url.as_deref(), Some("https://b.dev"));
    }

    #[test]
    fn test_serve_uses_local_url() {
        let dir = site("[base]\ntitle = \"T\"\nurl = \"https://a.dev\"");
        let root = dir.path().to_str().unwrap();
        let config =
            SiteConfig::load(cli(&["folio", "-r", root, "serve", "-p", "9000"])).unwrap();

        assert_eq!(config.serve.port, 9000);
        assert_eq!(config.base.url.as_deref(), Some("http://127.0.0.1:9000"));
    }

    #[test]
    fn test_serve_url_follows_bound_address() {
        let dir = site("[base]\ntitle = \"T\"");
        let root = dir.path().to_str().unwrap();
        let mut config =
            SiteConfig::load(cli(&["folio", "-r", root, "serve", "-i", "::1", "-p", "9000"])).unwrap();
        assert_eq!(config.base.url.as_deref(), Some("http://[::1]:9000"));

        config.set_serve_addr("[::1]:9002".parse().unwrap());
        assert_eq!(config.base.url.as_deref(), Some("http://[::1]:9002"));

        config.set_serve_addr("127.0.0.1:9003".parse().unwrap());
        assert_eq!(config.base.url.as_deref(), Some("http://127.0.0.1:9003"));
    }

    #[test]
    fn test_serve_addr_keeps_explicit_base_url() {
        let dir = site("[base]\ntitle = \"T\"");
        let root = dir.path().to_str().unwrap();
        let mut config = SiteConfig::load(cli(&[
            "folio", "-r", root, "serve", "--base-url", "https://preview.dev",
        ]))
        .unwrap();

        config.set_serve_addr("127.0.0.1:4322".parse().unwrap());
        assert_eq!(config.base.url.as_deref(), Some("https://preview.dev"));
        assert_eq!(config.serve_addr.map(|a| a.port()), Some(4322));
    }

    #[test]
    fn test_init_name_extends_root() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_str().unwrap();
        let config = SiteConfig::load(cli(&["folio", "-r", root, "init", "me"])).unwrap();
        assert!(config.get_root().ends_with("me"));
        assert!(config.config_path.ends_with("me/folio.toml"));
    }

    #[test]
    fn test_validate_missing_config_file() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_str().unwrap();
        let config = SiteConfig::load(cli(&["folio", "-r", root, "build"])).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_sitemap_requires_url() {
        let dir = site("[base]\ntitle = \"T\"\n[build.sitemap]\nenable = true");
        let root = dir.path().to_str().unwrap();
        let config = SiteConfig::load(cli(&["folio", "-r", root, "build"])).unwrap();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("[base.url]"));
    }

    #[test]
    fn test_validate_url_scheme() {
        let dir = site("[base]\ntitle = \"T\"\nurl = \"alexrivera.dev\"");
        let root = dir.path().to_str().unwrap();
        let config = SiteConfig::load(cli(&["folio", "-r", root, "build"])).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_analytics_fails_fast() {
        let dir = site(
            r#"
            [base]
            title = "T"
            [analytics]
            enable = true
            api_key = "key"
            project_id = "p"
            app_id = "a"
            "#,
        );
        let root = dir.path().to_str().unwrap();
        let config = SiteConfig::load(cli(&["folio", "-r", root, "build"])).unwrap();

        let err = config.validate().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Analytics(AnalyticsError::MissingKey("measurement_id")))
        ));
    }
}
