//! Site building orchestration.
//!
//! # Architecture
//!
//! ```text
//! build_site()
//!     │
//!     ├── Portfolio::from_path()      content file → validated records
//!     ├── ANALYTICS.bootstrap()       once per process, fails fast
//!     ├── prepare_output()            `clean` wipes the directory
//!     ├── prune_stale_projects()      pages of removed projects
//!     ├── write_static_files()        site.<hash>.css, site.<hash>.js
//!     │
//!     ├── rayon::join
//!     │     ├── render_pages()        every Route → minified HTML
//!     │     └── copy_assets()         assets/ → output/
//!     │
//!     └── build_sitemap()
//! ```

use crate::{
    analytics::ANALYTICS,
    config::SiteConfig,
    data::Portfolio,
    log,
    logger::ProgressBars,
    render::{self, AssetLinks, RenderContext},
    router::Route,
    sitemap::build_sitemap,
    tracker::ObserveOptions,
    utils::{
        hash,
        minify::{MinifyType, minify},
    },
};
use anyhow::{Context, Result, anyhow};
use chrono::Datelike;
use rayon::prelude::*;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::atomic::{AtomicBool, Ordering},
};
use walkdir::WalkDir;

const IGNORED_FILES: &[&str] = &[".DS_Store", "Thumbs.db"];

/// Build the whole site into `config.build.output`.
///
/// Returns the loaded portfolio so callers (the dev server) can route
/// requests without reading the content file again.
pub fn build_site(config: &SiteConfig) -> Result<Portfolio> {
    let portfolio = Portfolio::from_path(&config.build.content)?;
    let analytics = ANALYTICS.bootstrap(&config.analytics)?;

    let output = &config.build.output;
    prepare_output(output, config.build.clean)?;
    prune_stale_projects(output, &portfolio)?;

    let assets = write_static_files(config)?;
    let now = chrono::Local::now();
    let ctx = RenderContext {
        config,
        portfolio: &portfolio,
        analytics,
        assets: &assets,
        year: now.year(),
    };

    let routes = Route::all(&portfolio);
    let asset_files = collect_files(&config.build.assets);
    let progress = ProgressBars::new_filtered(&[
        ("pages", routes.len()),
        ("assets", asset_files.len()),
    ]);
    let has_error = AtomicBool::new(false);
    let tick = |index: usize| {
        if let Some(progress) = &progress {
            progress.inc(index);
        }
    };

    let (pages_result, assets_result) = rayon::join(
        || render_pages(&routes, &ctx, &has_error, || tick(0)),
        || copy_assets(&asset_files, config, &has_error, || tick(1)),
    );
    if let Some(progress) = &progress {
        progress.finish();
    }
    pages_result?;
    assets_result?;

    build_sitemap(config, &routes, &now.format("%Y-%m-%d").to_string())?;

    log!(
        "build";
        "{} pages, {} assets → {}",
        routes.len(),
        asset_files.len(),
        output.display()
    );
    Ok(portfolio)
}

/// Create the output directory, emptying it first when `clean` is set.
fn prepare_output(output: &Path, clean: bool) -> Result<()> {
    if clean && output.exists() {
        fs::remove_dir_all(output).with_context(|| {
            format!("Failed to clear output directory: {}", output.display())
        })?;
    }
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))
}

/// Remove `projects/<slug>/` pages whose project is gone from the portfolio.
fn prune_stale_projects(output: &Path, portfolio: &Portfolio) -> Result<()> {
    let Ok(entries) = fs::read_dir(output.join("projects")) else {
        return Ok(());
    };
    for entry in entries.filter_map(Result::ok) {
        let dir = entry.path();
        let stale = dir.join("index.html").is_file()
            && entry
                .file_name()
                .to_str()
                .is_none_or(|slug| portfolio.project(slug).is_none());
        if stale {
            fs::remove_dir_all(&dir)
                .with_context(|| format!("Failed to remove stale page {}", dir.display()))?;
        }
    }
    Ok(())
}

/// Write the fingerprinted stylesheet and script, returning their URLs.
fn write_static_files(config: &SiteConfig) -> Result<AssetLinks> {
    let script = render::site_script(
        ObserveOptions::default(),
        &config.theme.storage_key,
        config.theme.default,
    );

    let stylesheet = write_fingerprinted(&config.build.output, "site", "css", render::STYLESHEET)?;
    let script = write_fingerprinted(&config.build.output, "site", "js", &script)?;
    Ok(AssetLinks { stylesheet, script })
}

/// Write `<stem>.<hash>.<ext>` and return its URL path.
fn write_fingerprinted(output: &Path, stem: &str, ext: &str, content: &str) -> Result<String> {
    let name = format!("{stem}.{}.{ext}", hash::fingerprint(content.as_bytes()));
    let path = output.join(&name);
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(format!("/{name}"))
}

fn render_pages(
    routes: &[Route],
    ctx: &RenderContext<'_>,
    has_error: &AtomicBool,
    on_done: impl Fn() + Sync,
) -> Result<()> {
    routes.par_iter().try_for_each(|route| {
        if has_error.load(Ordering::Relaxed) {
            return Err(anyhow!("Aborted"));
        }
        if let Err(e) = write_page(route, ctx) {
            if !has_error.swap(true, Ordering::Relaxed) {
                log!("error"; "{}: {:#}", route.output_path().display(), e);
            }
            return Err(anyhow!("Build failed"));
        }
        on_done();
        Ok(())
    })
}

fn write_page(route: &Route, ctx: &RenderContext<'_>) -> Result<()> {
    let html = render::render(route, ctx);
    let html = minify(MinifyType::Html(html.as_bytes()), ctx.config);

    let dest = ctx.config.build.output.join(route.output_path());
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&dest, &*html)?;
    Ok(())
}

// ============================================================================
// Assets
// ============================================================================

/// Every regular file under `dir`; empty when `dir` doesn't exist.
pub fn collect_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_str().unwrap_or_default();
            !IGNORED_FILES.contains(&name)
        })
        .map(walkdir::DirEntry::into_path)
        .collect()
}

fn copy_assets(
    files: &[PathBuf],
    config: &SiteConfig,
    has_error: &AtomicBool,
    on_done: impl Fn() + Sync,
) -> Result<()> {
    files.par_iter().try_for_each(|path| {
        if has_error.load(Ordering::Relaxed) {
            return Err(anyhow!("Aborted"));
        }
        if let Err(e) = copy_asset(path, config) {
            if !has_error.swap(true, Ordering::Relaxed) {
                log!("error"; "{}: {:#}", path.display(), e);
            }
            return Err(anyhow!("Build failed"));
        }
        on_done();
        Ok(())
    })
}

/// Copy one asset to the same relative location under the output directory.
fn copy_asset(path: &Path, config: &SiteConfig) -> Result<()> {
    let relative = path
        .strip_prefix(&config.build.assets)
        .with_context(|| format!("{} is outside the assets directory", path.display()))?;
    let dest = config.build.output.join(relative);

    if !config.build.clean && is_up_to_date(path, &dest) {
        return Ok(());
    }
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(path, &dest)?;
    Ok(())
}

/// Destination exists and is at least as new as the source.
fn is_up_to_date(src: &Path, dst: &Path) -> bool {
    let modified = |p: &Path| p.metadata().and_then(|m| m.modified()).ok();
    match (modified(src), modified(dst)) {
        (Some(src), Some(dst)) => src <= dst,
        _ => false,
    }
}
