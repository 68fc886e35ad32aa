//! Site scaffolding for `folio init`.

use crate::{config::SiteConfig, theme::FileThemeStore};
use anyhow::{Context, Result, bail};
use std::{fs, path::Path};

const CONFIG_TEMPLATE: &str = include_str!("embed/init/folio.toml");
const CONTENT_TEMPLATE: &str = include_str!("embed/init/portfolio.toml");

/// Directories every new site starts with.
const SITE_DIRS: &[&str] = &["assets/certificates"];

/// Create a new site at the configured root.
pub fn new_site(config: &SiteConfig) -> Result<()> {
    let root = config.get_root();

    if !is_dir_empty(root)? {
        bail!(
            "`{}` is not empty. Use `folio init <NAME>` to create the site in a subdirectory.",
            root.display()
        );
    }

    for dir in SITE_DIRS {
        let path = root.join(dir);
        fs::create_dir_all(&path).with_context(|| format!("Failed to create {}", path.display()))?;
    }
    write_new(&config.config_path, CONFIG_TEMPLATE)?;
    write_new(&config.build.content, CONTENT_TEMPLATE)?;
    init_ignore_file(root, &config.build.output)?;

    crate::log!("init"; "created site at {}", root.display());
    Ok(())
}

fn is_dir_empty(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }
    Ok(fs::read_dir(path)?.next().is_none())
}

fn write_new(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

/// `.gitignore` listing the output directory and local preview state.
fn init_ignore_file(root: &Path, output: &Path) -> Result<()> {
    let output = output.strip_prefix(root).unwrap_or(output);
    let content = format!(
        "/{}/\n/{}/\n",
        output.display(),
        FileThemeStore::STATE_DIR
    );
    fs::write(root.join(".gitignore"), content)?;
    Ok(())
}
