//! Development server.
//!
//! Serves the build output with `tiny_http`, resolving `index.html` for
//! directory paths and answering unknown paths with the generated
//! `404.html`. The watcher thread rebuilds the site in the background and
//! publishes the fresh portfolio here so request logging stays current.
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────────┐
//! │   Main Thread   │     │  Watcher Thread  │
//! │  (HTTP Server)  │     │  (File Monitor)  │
//! └────────┬────────┘     └────────┬─────────┘
//!          │                       │
//!    serve output/           rebuild + publish()
//!          └──────────┬────────────┘
//!                     ▼
//!             config.build.output
//! ```

use crate::{
    build::build_site,
    config::{SiteConfig, cfg, set_serve_addr},
    data::Portfolio,
    log,
    router::Route,
    watch::watch_for_changes_blocking,
};
use anyhow::{Context, Result, anyhow, bail};
use arc_swap::ArcSwap;
use std::{
    ffi::OsStr,
    fs,
    net::{IpAddr, SocketAddr},
    path::{Component, Path, PathBuf},
    sync::{Arc, LazyLock},
};
use tiny_http::{Header, Request, Response, Server};

/// Ports tried after the configured one is taken.
const MAX_PORT_RETRIES: u16 = 10;

/// Portfolio of the most recent successful build.
static SITE: LazyLock<ArcSwap<Portfolio>> =
    LazyLock::new(|| ArcSwap::from_pointee(Portfolio::default()));

/// Replace the portfolio used for request routing.
pub fn publish(portfolio: Portfolio) {
    SITE.store(Arc::new(portfolio));
}

/// Bind, build, then serve until Ctrl+C, watching for changes when
/// `[serve] watch` is on.
///
/// The site is built after binding so `base.url` carries the port actually
/// in use.
pub fn serve_site() -> Result<()> {
    let c = cfg();
    let interface: IpAddr = c
        .serve
        .interface
        .parse()
        .with_context(|| format!("Invalid interface `{}`", c.serve.interface))?;

    let (server, addr) = try_bind_port(interface, c.serve.port, MAX_PORT_RETRIES)?;
    let server = Arc::new(server);
    set_serve_addr(addr);

    let c = cfg();
    publish(build_site(&c)?);

    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        log!("serve"; "shutting down...");
        server_for_signal.unblock();
    })
    .context("Failed to set Ctrl+C handler")?;

    log!("serve"; "http://{}", addr);

    if c.serve.watch {
        std::thread::spawn(move || {
            if let Err(err) = watch_for_changes_blocking() {
                log!("watch"; "{err}");
            }
        });
    }

    for request in server.incoming_requests() {
        // config may have been hot-reloaded by the watcher
        if let Err(e) = handle_request(request, &cfg()) {
            log!("serve"; "request error: {e}");
        }
    }

    Ok(())
}

/// Bind `base_port`, or the next free one within `max_retries` attempts.
fn try_bind_port(interface: IpAddr, base_port: u16, max_retries: u16) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;
    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }

    match last_error {
        Some(e) => bail!(
            "Failed to bind after {} attempts (ports {}-{}): {}",
            max_retries,
            base_port,
            base_port.saturating_add(max_retries - 1),
            e
        ),
        None => bail!("No ports to try"),
    }
}

// ============================================================================
// Request Handling
// ============================================================================

fn handle_request(request: Request, config: &SiteConfig) -> Result<()> {
    let url = urlencoding::decode(request.url())
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_default();

    let portfolio = SITE.load();
    match resolve_page(&config.build.output, &url, &portfolio) {
        Some(path) => serve_file(request, &path),
        None => {
            // a real page that has no file yet means the output is stale
            let route = Route::resolve(&url, &portfolio);
            if !route.is_not_found() {
                log!("serve"; "{} is not built yet", url);
            }
            serve_not_found(request, &config.build.output)
        }
    }
}

/// [`resolve_file`], except that a project page left behind by an earlier
/// build (its slug is no longer in `portfolio`) does not resolve.
fn resolve_page(root: &Path, url: &str, portfolio: &Portfolio) -> Option<PathBuf> {
    let file = resolve_file(root, url)?;
    let mut parts = file.strip_prefix(root).ok()?.iter().map(OsStr::to_str);
    let stale = matches!(
        (parts.next(), parts.next(), parts.next(), parts.next()),
        (Some(Some("projects")), Some(Some(slug)), Some(Some("index.html")), None)
            if portfolio.project(slug).is_none()
    );
    (!stale).then_some(file)
}

/// File under `root` for a decoded URL path, trying `index.html` for
/// directories. Paths escaping `root` never resolve.
fn resolve_file(root: &Path, url: &str) -> Option<PathBuf> {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let relative = Path::new(path.trim_matches('/'));
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return None;
    }

    let local = root.join(relative);
    if local.is_file() {
        return Some(local);
    }
    let index = local.join("index.html");
    index.is_file().then_some(index)
}

fn serve_file(request: Request, path: &Path) -> Result<()> {
    let content = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let response = Response::from_data(content).with_header(content_type(guess_content_type(path))?);
    request.respond(response)?;
    Ok(())
}

/// The generated `404.html`, or plain text before the first build.
fn serve_not_found(request: Request, root: &Path) -> Result<()> {
    let (body, kind) = match fs::read(root.join("404.html")) {
        Ok(html) => (html, "text/html; charset=utf-8"),
        Err(_) => (b"404 Not Found".to_vec(), "text/plain; charset=utf-8"),
    };
    let response = Response::from_data(body)
        .with_status_code(404)
        .with_header(content_type(kind)?);
    request.respond(response)?;
    Ok(())
}

fn content_type(value: &str) -> Result<Header> {
    Header::from_bytes("Content-Type", value).map_err(|()| anyhow!("invalid content type `{value}`"))
}

/// MIME type from the file extension; `application/octet-stream` otherwise.
fn guess_content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "application/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("xml") => "application/xml; charset=utf-8",

        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        Some("ico") => "image/x-icon",

        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",

        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain; charset=utf-8",

        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, TcpListener};
    use tempfile::TempDir;

    fn output() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("projects/jungle-baby")).unwrap();
        fs::write(dir.path().join("index.html"), "home").unwrap();
        fs::write(dir.path().join("projects/jungle-baby/index.html"), "jb").unwrap();
        fs::write(dir.path().join("resume.pdf"), "%PDF").unwrap();
        dir
    }

    #[test]
    fn test_guess_content_type() {
        assert_eq!(guess_content_type(Path::new("a/index.html")), "text/html; charset=utf-8");
        assert_eq!(guess_content_type(Path::new("site.1a2b3c4d.css")), "text/css; charset=utf-8");
        assert_eq!(guess_content_type(Path::new("resume.pdf")), "application/pdf");
        assert_eq!(guess_content_type(Path::new("LICENSE")), "application/octet-stream");
    }

    #[test]
    fn test_resolve_file() {
        let dir = output();
        let root = dir.path();

        assert_eq!(resolve_file(root, "/"), Some(root.join("index.html")));
        assert_eq!(
            resolve_file(root, "/projects/jungle-baby/?ref=nav"),
            Some(root.join("projects/jungle-baby/index.html"))
        );
        assert_eq!(resolve_file(root, "/resume.pdf"), Some(root.join("resume.pdf")));
        assert_eq!(resolve_file(root, "/projects/missing/"), None);
    }

    #[test]
    fn test_removed_project_page_is_not_served() {
        let dir = output();
        let root = dir.path();
        fs::create_dir_all(root.join("projects/old-site")).unwrap();
        fs::write(root.join("projects/old-site/index.html"), "old").unwrap();
        fs::write(root.join("projects/shot.png"), "png").unwrap();

        let portfolio = Portfolio::from_str(
            "[profile]\nname = \"Alex\"\n[[projects]]\ntitle = \"Jungle Baby\"",
        )
        .unwrap();

        assert_eq!(resolve_page(root, "/projects/old-site/", &portfolio), None);
        assert_eq!(resolve_page(root, "/projects/old-site/index.html", &portfolio), None);
        assert_eq!(
            resolve_page(root, "/projects/jungle-baby/", &portfolio),
            Some(root.join("projects/jungle-baby/index.html"))
        );
        // assets under projects/ are not pages
        assert_eq!(
            resolve_page(root, "/projects/shot.png", &portfolio),
            Some(root.join("projects/shot.png"))
        );
        assert_eq!(resolve_page(root, "/resume.pdf", &portfolio), Some(root.join("resume.pdf")));
    }

    #[test]
    fn test_resolve_file_rejects_traversal() {
        let dir = output();
        let root = dir.path().join("projects");
        assert_eq!(resolve_file(&root, "/../index.html"), None);
    }

    #[test]
    fn test_try_bind_port_skips_taken_port() {
        let taken = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
        let port = taken.local_addr().unwrap().port();

        let (_server, addr) = try_bind_port(IpAddr::V4(Ipv4Addr::LOCALHOST), port, 5).unwrap();
        assert_ne!(addr.port(), port);
    }
}
