//! Output minification for generated pages and the sitemap.
//!
//! Both kinds pass through untouched when `[build] minify = false`.

use crate::config::SiteConfig;
use std::borrow::Cow;

pub enum MinifyType<'a> {
    Html(&'a [u8]),
    Xml(&'a [u8]),
}

/// Minify `content` according to `config.build.minify`.
pub fn minify<'a>(content: MinifyType<'a>, config: &SiteConfig) -> Cow<'a, [u8]> {
    match (content, config.build.minify) {
        (MinifyType::Html(html), false) | (MinifyType::Xml(html), false) => Cow::Borrowed(html),
        (MinifyType::Html(html), true) => Cow::Owned(minify_html_bytes(html)),
        (MinifyType::Xml(xml), true) => Cow::Owned(minify_xml_bytes(xml)),
    }
}

fn minify_html_bytes(html: &[u8]) -> Vec<u8> {
    let mut cfg = minify_html::Cfg::new();
    cfg.keep_closing_tags = true;
    cfg.keep_html_and_head_opening_tags = true;
    cfg.minify_css = true;
    cfg.minify_js = true;
    minify_html::minify(html, &cfg)
}

/// Drops indentation and blank lines; text inside a line is left alone.
fn minify_xml_bytes(xml: &[u8]) -> Vec<u8> {
    String::from_utf8_lossy(xml)
        .lines()
        .map(str::trim)
        .collect::<String>()
        .into_bytes()
}
