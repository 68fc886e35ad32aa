//! Sub-pages: the project index, project details and the not-found page.

use super::{chips, escape_html};
use crate::data::{Portfolio, Project};

pub fn projects(portfolio: &Portfolio) -> String {
    let rows: String = portfolio.projects.iter().map(project_row).collect();

    format!(
        r#"<main class="page subpage">
<a class="back" href="/">← Back to home</a>
<div class="detail-head"><h1>All Projects</h1><p class="muted">A collection of work across web, mobile and backend systems.</p></div>
<div class="cards">{rows}</div>
</main>"#
    )
}

fn project_row(project: &Project) -> String {
    let meta = meta_line(project);
    let link = match &project.live_url {
        Some(url) => format!(
            r#"<a href="{}" target="_blank" rel="noopener noreferrer">Visit site ↗</a>"#,
            escape_html(url)
        ),
        None => r#"<span class="muted">Internal / private</span>"#.to_owned(),
    };

    format!(
        r#"<div class="card"><div class="meta">{meta}</div>
<h3><a href="/projects/{slug}/">{title}</a></h3>
<p class="muted">{description}</p>{tech}<div class="meta">{link}</div></div>"#,
        slug = project.slug(),
        title = escape_html(&project.title),
        description = escape_html(&project.description),
        tech = chips(&project.tech, "chips plain")
    )
}

/// `category • year`, whichever is present.
fn meta_line(project: &Project) -> String {
    [project.category.as_deref(), project.year.as_deref()]
        .into_iter()
        .flatten()
        .map(escape_html)
        .collect::<Vec<_>>()
        .join(" • ")
}

pub fn project(project: &Project) -> String {
    let live = project
        .live_url
        .as_deref()
        .map(|url| {
            format!(
                r#"<a class="button" href="{}" target="_blank" rel="noopener noreferrer">View Live ↗</a>"#,
                escape_html(url)
            )
        })
        .unwrap_or_default();

    let mut body = String::new();
    if !project.tech.is_empty() {
        body.push_str(&format!(
            "<section><h2>Technologies Used</h2>{}</section>",
            chips(&project.tech, "chips")
        ));
    }
    if let Some(about) = &project.long_description {
        let paragraphs: String = about
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| format!("<p>{}</p>", escape_html(p)))
            .collect();
        body.push_str(&format!("<section><h2>About This Project</h2>{paragraphs}</section>"));
    }
    body.push_str(&list_section("Key Features", &project.features));
    body.push_str(&list_section("Challenges &amp; Solutions", &project.challenges));
    body.push_str(&list_section("Results &amp; Impact", &project.results));

    format!(
        r#"<main class="page subpage">
<div class="section-head"><a class="back" href="/projects/">← Back to Projects</a>{live}</div>
<div class="detail-head"><div class="meta">{meta}</div><h1>{title}</h1><p class="headline">{description}</p></div>
<div class="detail">{body}</div>
</main>"#,
        meta = meta_line(project),
        title = escape_html(&project.title),
        description = escape_html(&project.description)
    )
}

/// Titled bullet list; empty when there are no items. `heading` is trusted markup.
fn list_section(heading: &str, items: &[String]) -> String {
    if items.is_empty() {
        return String::new();
    }
    let items: String = items
        .iter()
        .map(|item| format!("<li>{}</li>", escape_html(item)))
        .collect();
    format!(r#"<section><h2>{heading}</h2><ul class="list">{items}</ul></section>"#)
}

pub fn not_found() -> String {
    r#"<main class="page subpage not-found">
<h1>Project Not Found</h1>
<p class="muted">The page you're looking for doesn't exist or has moved.</p>
<a class="back" href="/projects/">← Back to Projects</a>
</main>"#
        .to_owned()
}
