//! Global config with atomic reload support.
//!
//! Readers (parallel page rendering, the dev server) take a snapshot with
//! [`cfg`]; the watcher swaps in a freshly parsed config with
//! [`reload_config`] when `folio.toml` changes on disk.
//!
//! ```text
//!   rayon workers ──► cfg() ──┐
//!   serve loop    ──► cfg() ──┼──► ArcSwap<SiteConfig>
//!   watcher ──► reload_config ┘      (atomic replace)
//! ```

use super::SiteConfig;
use crate::utils::hash;
use anyhow::{Result, bail};
use arc_swap::ArcSwap;
use std::{
    fs,
    net::SocketAddr,
    sync::{
        Arc, LazyLock,
        atomic::{AtomicU64, Ordering},
    },
};

/// Global config storage, replaced by the loaded config in `main`.
pub static CONFIG: LazyLock<ArcSwap<SiteConfig>> =
    LazyLock::new(|| ArcSwap::from_pointee(SiteConfig::default()));

/// Hash of the config file content last loaded.
static CONFIG_HASH: AtomicU64 = AtomicU64::new(0);

/// Current config snapshot. Lock-free; the `Arc` keeps it alive across a reload.
#[inline]
pub fn cfg() -> Arc<SiteConfig> {
    CONFIG.load_full()
}

/// Initialize global config (called once at startup).
pub fn init_config(config: SiteConfig) {
    if let Ok(content) = fs::read_to_string(&config.config_path) {
        CONFIG_HASH.store(hash::compute(content.as_bytes()), Ordering::Relaxed);
    }
    CONFIG.store(Arc::new(config));
}

/// Record the dev server's bound address in the global config.
pub fn set_serve_addr(addr: SocketAddr) {
    let mut config = SiteConfig::clone(&cfg());
    config.set_serve_addr(addr);
    CONFIG.store(Arc::new(config));
}

/// Re-read `folio.toml` and replace the global config.
///
/// Returns `false` without reparsing when the file content is unchanged
/// (editors often touch files without modifying them).
pub fn reload_config() -> Result<bool> {
    let current = cfg();
    let Some(cli) = current.cli else {
        bail!("config reloaded before initialization");
    };

    let content = fs::read_to_string(&current.config_path)?;
    let new_hash = hash::compute(content.as_bytes());
    if new_hash == CONFIG_HASH.load(Ordering::Relaxed) {
        return Ok(false);
    }

    let mut config = SiteConfig::from_str(&content)?;
    config.serve_addr = current.serve_addr;
    config.update_with_cli(cli);
    config.validate()?;

    CONFIG.store(Arc::new(config));
    CONFIG_HASH.store(new_hash, Ordering::Relaxed);
    Ok(true)
}
