//! File system watcher for `folio serve`.
//!
//! Watches the config file, the content file and the assets directory.
//! Every settled batch of changes triggers a full rebuild; the site is small
//! enough that incremental builds buy nothing. A config change first swaps
//! in the reloaded global config.
//!
//! ```text
//! notify events ──► Debouncer (300ms) ──► handle_changes()
//!                                              │
//!                         config changed? ─────┼──► reload_config()
//!                                              ▼
//!                                         build_site() ──► serve::publish()
//! ```

use crate::{
    build::build_site,
    config::{SiteConfig, cfg, reload_config},
    log,
    logger::WatchStatus,
    serve,
};
use anyhow::{Context, Result};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use rustc_hash::FxHashSet;
use std::{
    path::{Path, PathBuf},
    sync::mpsc::{self, RecvTimeoutError},
    time::{Duration, Instant},
};

const DEBOUNCE_MS: u64 = 300;
const REBUILD_COOLDOWN_MS: u64 = 800;

// =============================================================================
// File Categories
// =============================================================================

/// Role of a changed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileCategory {
    Config,
    Content,
    Asset,
    /// Outside everything the build reads.
    Unknown,
}

fn categorize_path(path: &Path, config: &SiteConfig) -> FileCategory {
    let path = SiteConfig::normalize_path(path);

    if path == config.config_path {
        FileCategory::Config
    } else if path == config.build.content {
        FileCategory::Content
    } else if path.starts_with(&config.build.assets) {
        FileCategory::Asset
    } else {
        FileCategory::Unknown
    }
}

/// Editor swap and backup files.
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bak" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || (name.starts_with('.') && name != ".")
}

/// `/site/assets/resume.pdf` → `assets/resume.pdf`
fn rel_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

// =============================================================================
// Debounce State
// =============================================================================

/// Collects paths until events stop arriving for [`DEBOUNCE_MS`].
struct Debouncer {
    pending: FxHashSet<PathBuf>,
    last_event: Option<Instant>,
    last_rebuild: Option<Instant>,
}

impl Debouncer {
    fn new() -> Self {
        Self {
            pending: FxHashSet::default(),
            last_event: None,
            last_rebuild: None,
        }
    }

    /// Events right after a rebuild are mostly our own writes.
    fn in_cooldown(&self) -> bool {
        self.last_rebuild
            .is_some_and(|t| t.elapsed() < Duration::from_millis(REBUILD_COOLDOWN_MS))
    }

    fn add(&mut self, event: Event) {
        let before = self.pending.len();
        self.pending
            .extend(event.paths.into_iter().filter(|p| !is_temp_file(p)));
        if self.pending.len() > before {
            self.last_event = Some(Instant::now());
        }
    }

    fn ready(&self) -> bool {
        !self.pending.is_empty()
            && self
                .last_event
                .is_some_and(|t| t.elapsed() >= Duration::from_millis(DEBOUNCE_MS))
    }

    fn take(&mut self) -> Vec<PathBuf> {
        self.last_event = None;
        self.pending.drain().collect()
    }

    fn mark_rebuild(&mut self) {
        self.last_rebuild = Some(Instant::now());
    }

    fn timeout(&self) -> Duration {
        if self.pending.is_empty() {
            Duration::from_secs(60)
        } else {
            Duration::from_millis(DEBOUNCE_MS)
        }
    }
}

// =============================================================================
// Rebuild
// =============================================================================

/// Rebuild for a settled batch. Returns true when a build ran successfully.
fn handle_changes(paths: &[PathBuf], status: &mut WatchStatus) -> bool {
    let config = cfg();
    let root = config.get_root();

    let mut config_changed = false;
    let mut triggers = Vec::new();
    for path in paths {
        match categorize_path(path, &config) {
            FileCategory::Config => config_changed = true,
            FileCategory::Content | FileCategory::Asset => triggers.push(rel_path(path, root)),
            FileCategory::Unknown => {}
        }
    }

    if config_changed {
        match reload_config() {
            Ok(true) => triggers.insert(0, rel_path(&config.config_path, root)),
            Ok(false) if triggers.is_empty() => {
                status.unchanged("config unchanged");
                return false;
            }
            Ok(false) => {}
            Err(e) => {
                status.error("config reload failed", &format!("{e:#}"));
                return false;
            }
        }
    }
    if triggers.is_empty() {
        return false;
    }

    // reload may have replaced the config
    match build_site(&cfg()) {
        Ok(portfolio) => {
            serve::publish(portfolio);
            status.success(&format!("rebuilt ({})", triggers.join(", ")));
            true
        }
        Err(e) => {
            status.error(&format!("build failed ({})", triggers.join(", ")), &format!("{e:#}"));
            false
        }
    }
}

// =============================================================================
// Watcher Setup
// =============================================================================

/// Directories to register and how.
///
/// Single files are watched through their parent directory so editors that
/// save by rename don't drop the watch.
fn watch_targets(config: &SiteConfig) -> Vec<(PathBuf, RecursiveMode)> {
    let mut targets: Vec<(PathBuf, RecursiveMode)> = Vec::new();
    for file in [&config.config_path, &config.build.content] {
        if let Some(parent) = file.parent()
            && parent.exists()
            && !targets.iter().any(|(p, _)| p == parent)
        {
            targets.push((parent.to_path_buf(), RecursiveMode::NonRecursive));
        }
    }
    if config.build.assets.exists() {
        targets.push((config.build.assets.clone(), RecursiveMode::Recursive));
    }
    targets
}

fn setup_watchers(watcher: &mut impl Watcher, config: &SiteConfig) -> Result<()> {
    let root = config.get_root();
    for (path, mode) in watch_targets(config) {
        watcher
            .watch(&path, mode)
            .with_context(|| format!("Failed to watch {}", path.display()))?;
    }

    let watched: Vec<String> = [&config.config_path, &config.build.content, &config.build.assets]
        .into_iter()
        .filter(|p| p.exists())
        .map(|p| rel_path(p, root))
        .collect();
    log!("watch"; "{}", watched.join(", "));
    Ok(())
}

const fn is_relevant(event: &Event) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    )
}

// =============================================================================
// Public API
// =============================================================================

/// Watch and rebuild until the event channel closes.
pub fn watch_for_changes_blocking() -> Result<()> {
    let config = cfg();
    if !config.serve.watch {
        return Ok(());
    }

    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(tx).context("Failed to create file watcher")?;
    setup_watchers(&mut watcher, &config)?;
    drop(config);

    let mut debouncer = Debouncer::new();
    let mut status = WatchStatus::new();

    loop {
        match rx.recv_timeout(debouncer.timeout()) {
            Ok(Ok(event)) if is_relevant(&event) && !debouncer.in_cooldown() => {
                debouncer.add(event);
            }
            Ok(Err(e)) => log!("watch"; "error: {e}"),
            Err(RecvTimeoutError::Timeout) if debouncer.ready() => {
                if handle_changes(&debouncer.take(), &mut status) {
                    debouncer.mark_rebuild();
                }
            }
            Err(RecvTimeoutError::Disconnected) => break,
            _ => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind};
    use std::fs;
    use tempfile::TempDir;

    fn site() -> (TempDir, SiteConfig) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        fs::write(root.join("folio.toml"), "").unwrap();
        fs::write(root.join("portfolio.toml"), "").unwrap();
        fs::create_dir_all(root.join("assets/certificates")).unwrap();

        let mut config = SiteConfig::default();
        config.set_root(&root);
        config.config_path = root.join("folio.toml");
        config.build.content = root.join("portfolio.toml");
        config.build.assets = root.join("assets");
        config.build.output = root.join("public");
        (dir, config)
    }

    fn modify(path: &Path) -> Event {
        Event::new(EventKind::Modify(ModifyKind::Any)).add_path(path.to_path_buf())
    }

    #[test]
    fn test_categorize_path() {
        let (_dir, config) = site();
        let root = config.get_root().to_path_buf();

        assert_eq!(categorize_path(&root.join("folio.toml"), &config), FileCategory::Config);
        assert_eq!(categorize_path(&root.join("portfolio.toml"), &config), FileCategory::Content);
        assert_eq!(
            categorize_path(&root.join("assets/certificates/aws.pdf"), &config),
            FileCategory::Asset
        );
        assert_eq!(categorize_path(&root.join("public/index.html"), &config), FileCategory::Unknown);
        assert_eq!(categorize_path(&root.join("notes.md"), &config), FileCategory::Unknown);
    }

    #[test]
    fn test_is_temp_file() {
        assert!(is_temp_file(Path::new("portfolio.toml~")));
        assert!(is_temp_file(Path::new(".portfolio.toml.swp")));
        assert!(is_temp_file(Path::new("assets/x.tmp")));
        assert!(!is_temp_file(Path::new("portfolio.toml")));
        assert!(!is_temp_file(Path::new("assets/resume.pdf")));
    }

    #[test]
    fn test_watch_targets_dedupes_root() {
        let (_dir, config) = site();
        let targets = watch_targets(&config);

        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].0, config.get_root());
        assert_eq!(targets[0].1, RecursiveMode::NonRecursive);
        assert_eq!(targets[1], (config.build.assets.clone(), RecursiveMode::Recursive));
    }

    #[test]
    fn test_debouncer_waits_for_quiet_period() {
        let mut debouncer = Debouncer::new();
        assert!(!debouncer.ready());
        assert_eq!(debouncer.timeout(), Duration::from_secs(60));

        debouncer.add(modify(Path::new("/site/portfolio.toml")));
        debouncer.add(modify(Path::new("/site/portfolio.toml")));
        assert!(!debouncer.ready());
        assert_eq!(debouncer.timeout(), Duration::from_millis(DEBOUNCE_MS));

        debouncer.last_event = Instant::now().checked_sub(Duration::from_millis(DEBOUNCE_MS));
        assert!(debouncer.ready());
        assert_eq!(debouncer.take(), vec![PathBuf::from("/site/portfolio.toml")]);
        assert!(!debouncer.ready());
    }

    #[test]
    fn test_debouncer_ignores_temp_files() {
        let mut debouncer = Debouncer::new();
        debouncer.add(
            Event::new(EventKind::Create(CreateKind::File))
                .add_path(PathBuf::from("/site/.portfolio.toml.swp")),
        );
        assert!(debouncer.pending.is_empty());
        assert!(debouncer.last_event.is_none());
    }

    #[test]
    fn test_cooldown_after_rebuild() {
        let mut debouncer = Debouncer::new();
        assert!(!debouncer.in_cooldown());
        debouncer.mark_rebuild();
        assert!(debouncer.in_cooldown());
    }
}
