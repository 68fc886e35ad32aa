//! Document shell shared by every page.

use super::{RenderContext, escape_html, theme_init};

const LAYOUT: &str = include_str!("../embed/layout.html");

/// URLs of the fingerprinted stylesheet and script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetLinks {
    pub stylesheet: String,
    pub script: String,
}

#[allow(clippy::literal_string_with_formatting_args)]
pub fn wrap(ctx: &RenderContext<'_>, title: &str, body: &str) -> String {
    let base = &ctx.config.base;
    let theme = &ctx.config.theme;
    let analytics = ctx
        .analytics
        .map(|analytics| analytics.head_snippet())
        .unwrap_or_default();

    LAYOUT
        .replace("{lang}", &escape_html(&base.language))
        .replace("{title}", &escape_html(title))
        .replace("{description}", &escape_html(&base.description))
        .replace("{author}", &escape_html(&base.author))
        .replace("{theme_init}", &theme_init(&theme.storage_key, theme.default))
        .replace("{stylesheet}", &escape_html(&ctx.assets.stylesheet))
        .replace("{script}", &escape_html(&ctx.assets.script))
        .replace("{analytics}", &analytics)
        .replace("{body}", body)
}
