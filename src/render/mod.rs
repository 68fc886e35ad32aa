//! HTML generation for every route.
//!
//! Pages are plain strings assembled with `format!` around the embedded
//! layout; all content from `portfolio.toml` goes through [`escape_html`].
//!
//! ```text
//! render(route)
//!     ├── Home         → home::page()
//!     ├── Projects     → pages::projects()
//!     ├── Project(id)  → pages::project()   (unknown id → not found)
//!     └── NotFound     → pages::not_found()
//!           │
//!           ▼
//!     layout::wrap()   (head, theme bootstrap, assets, analytics)
//! ```

mod home;
mod layout;
mod pages;

pub use layout::AssetLinks;

use crate::{
    analytics::Analytics, config::SiteConfig, data::Portfolio, router::Route, theme::ThemePreference,
    tracker::ObserveOptions,
};

/// Stylesheet served as `site.<hash>.css`.
pub const STYLESHEET: &str = include_str!("../embed/site.css");

const SITE_SCRIPT: &str = include_str!("../embed/site.js");
const THEME_INIT: &str = include_str!("../embed/theme-init.js");

/// Everything a page needs besides its route.
pub struct RenderContext<'a> {
    pub config: &'a SiteConfig,
    pub portfolio: &'a Portfolio,
    pub analytics: Option<&'a Analytics>,
    pub assets: &'a AssetLinks,
    /// Build year, for the intro label and copyright line.
    pub year: i32,
}

/// Full HTML document for `route`.
pub fn render(route: &Route, ctx: &RenderContext<'_>) -> String {
    let site = &ctx.config.base.title;
    let (title, body) = match route {
        Route::Home => (site.clone(), home::page(ctx)),
        Route::Projects => (format!("Projects · {site}"), pages::projects(ctx.portfolio)),
        Route::Project(slug) => match ctx.portfolio.project(slug) {
            Some(project) => (format!("{} · {site}", project.title), pages::project(project)),
            None => (format!("Not Found · {site}"), pages::not_found()),
        },
        Route::NotFound => (format!("Not Found · {site}"), pages::not_found()),
    };
    layout::wrap(ctx, &title, &body)
}

/// The page script with tracker parameters and theme settings filled in.
pub fn site_script(options: ObserveOptions, storage_key: &str, default: ThemePreference) -> String {
    SITE_SCRIPT
        .replace("__THRESHOLD__", &options.threshold.as_fraction().to_string())
        .replace("__ROOT_MARGIN__", &js_string(&options.root_margin.to_css()))
        .replace("__STORAGE_KEY__", &js_string(storage_key))
        .replace("__DEFAULT_THEME__", &js_string(default.as_str()))
        .replace("__PREFERENCES__", &preferences())
}

/// Inline `<head>` script applying the stored theme before first paint.
fn theme_init(storage_key: &str, default: ThemePreference) -> String {
    THEME_INIT
        .replace("__STORAGE_KEY__", &js_string(storage_key))
        .replace("__DEFAULT_THEME__", &js_string(default.as_str()))
        .replace("__PREFERENCES__", &preferences())
}

/// JS array of the accepted stored values; anything else means the default.
fn preferences() -> String {
    serde_json::to_string(&ThemePreference::ALL.map(ThemePreference::as_str))
        .unwrap_or_else(|_| "[]".into())
}

/// Quoted JS string literal that can't terminate the enclosing `<script>`.
fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_owned())
        .to_string()
        .replace("</", "<\\/")
}

/// Escape text for HTML element content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `<ul class="chips">` of escaped items, empty when there are none.
fn chips(items: &[String], class: &str) -> String {
    if items.is_empty() {
        return String::new();
    }
    let items: String = items
        .iter()
        .map(|item| format!("<li>{}</li>", escape_html(item)))
        .collect();
    format!(r#"<ul class="{class}">{items}</ul>"#)
}
