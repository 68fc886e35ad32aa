//! The single-page home: side dots, top bar, tracked sections, footer.

use super::{RenderContext, chips, escape_html};
use crate::{
    data::{Portfolio, Project, Thought},
    nav::NAVIGATION,
};

pub fn page(ctx: &RenderContext<'_>) -> String {
    let portfolio = ctx.portfolio;
    let mut html = String::with_capacity(16 * 1024);

    html.push_str(&nav_dots());
    html.push_str(r#"<main class="page">"#);
    html.push_str(&top_nav(&ctx.config.base.title));
    html.push_str(&intro(portfolio, ctx.year));
    html.push_str(&work(portfolio));
    html.push_str(&projects(portfolio));
    html.push_str(&education(portfolio));
    html.push_str(&thoughts(portfolio));
    html.push_str(&connect(portfolio));
    html.push_str(&footer(&ctx.config.base.copyright_line(ctx.year)));
    html.push_str("</main>");
    html.push_str(r#"<div class="fade-bottom"></div>"#);
    html
}

/// Opening tag of a tracked section.
fn section_open(tag: &str, id: &str) -> String {
    format!(r#"<{tag} id="{id}" class="section {id}" data-section>"#)
}

// ============================================================================
// Navigation
// ============================================================================

fn nav_dots() -> String {
    let buttons: String = NAVIGATION
        .iter()
        .map(|entry| {
            format!(
                r#"<button type="button" data-nav="{id}" aria-label="Navigate to {id}"></button>"#,
                id = entry.target
            )
        })
        .collect();
    format!(r#"<nav class="nav-dots" aria-label="Sections">{buttons}</nav>"#)
}

fn top_nav(title: &str) -> String {
    let items: String = NAVIGATION
        .iter()
        .map(|entry| {
            format!(
                r#"<li><button type="button" data-nav="{}">{}</button></li>"#,
                entry.target, entry.label
            )
        })
        .collect();

    format!(
        r#"<div class="top-nav" role="navigation" aria-label="Primary">
<div class="bar"><div class="mono">{title}</div><ul>{items}</ul>
<button type="button" class="menu-toggle" data-menu-toggle aria-controls="mobile-menu" aria-expanded="false" aria-label="Open menu">Menu</button></div>
<div id="mobile-menu" hidden><ul>{items}</ul></div>
</div>"#,
        title = escape_html(title)
    )
}

// ============================================================================
// Sections
// ============================================================================

fn intro(portfolio: &Portfolio, year: i32) -> String {
    let profile = &portfolio.profile;

    let (first, rest) = profile
        .name
        .split_once(' ')
        .unwrap_or((profile.name.as_str(), ""));
    let name = if rest.is_empty() {
        escape_html(first)
    } else {
        format!(
            r#"{}<br><span class="muted">{}</span>"#,
            escape_html(first),
            escape_html(rest)
        )
    };

    let mut status = String::new();
    if profile.available {
        status.push_str(r#"<div><span class="pulse"></span>Available for work</div>"#);
    }
    if let Some(location) = &profile.location {
        status.push_str(&format!("<div>{}</div>", escape_html(location)));
    }

    let mut actions = String::new();
    if let Some(resume) = &profile.resume {
        actions.push_str(&format!(
            r#"<a class="button" href="{}" download>Download Resume</a>"#,
            escape_html(resume)
        ));
    }
    for link in &profile.links {
        actions.push_str(&format!(
            r#"<a class="button" href="{url}" target="_blank" rel="noopener noreferrer" aria-label="Open {label} profile">{label}</a>"#,
            url = escape_html(&link.url),
            label = escape_html(&link.label)
        ));
    }

    let currently = profile
        .currently
        .as_ref()
        .map(|position| {
            let period = position
                .period
                .as_deref()
                .map(|p| format!(r#"<div class="mono">{}</div>"#, escape_html(p)))
                .unwrap_or_default();
            format!(
                r#"<div><div class="mono">CURRENTLY</div><div>{}</div><div class="muted">@ {}</div>{period}</div>"#,
                escape_html(&position.role),
                escape_html(&position.company)
            )
        })
        .unwrap_or_default();

    let focus = if profile.focus.is_empty() {
        String::new()
    } else {
        format!(
            r#"<div><div class="mono">FOCUS</div>{}</div>"#,
            chips(&profile.focus, "chips")
        )
    };

    format!(
        r#"{open}<div class="intro-grid">
<div><div class="mono">PORTFOLIO / {year}</div><h1>{name}</h1>
<p class="headline">{headline}</p><div class="status">{status}</div><div class="actions">{actions}</div></div>
<div>{currently}{focus}</div>
</div></header>"#,
        open = section_open("header", "intro"),
        headline = escape_html(&profile.headline)
    )
}

fn work(portfolio: &Portfolio) -> String {
    let span = portfolio
        .work_span()
        .map(|span| format!(r#"<div class="mono">{}</div>"#, escape_html(&span)))
        .unwrap_or_default();

    let jobs: String = portfolio
        .work
        .iter()
        .map(|job| {
            format!(
                r#"<div class="job"><div class="year">{year}</div>
<div><h3>{role}</h3><div class="muted">{company}</div><p class="muted">{description}</p></div>
<div>{tech}</div></div>"#,
                year = escape_html(&job.year),
                role = escape_html(&job.role),
                company = escape_html(&job.company),
                description = escape_html(&job.description),
                tech = chips(&job.tech, "chips plain")
            )
        })
        .collect();

    format!(
        r#"{open}<div class="section-head"><h2>Work Experience</h2>{span}</div>{jobs}</section>"#,
        open = section_open("section", "work")
    )
}

fn project_card(project: &Project) -> String {
    format!(
        r#"<a class="card" href="/projects/{slug}/"><h3>{title}</h3><p class="muted">{description}</p>{tech}</a>"#,
        slug = project.slug(),
        title = escape_html(&project.title),
        description = escape_html(&project.description),
        tech = chips(&project.tech, "chips plain")
    )
}

fn projects(portfolio: &Portfolio) -> String {
    let cards: String = portfolio.showcase().into_iter().map(project_card).collect();

    format!(
        r#"{open}<h2>Projects</h2><div class="cards">{cards}</div>
<p><a class="button" href="/projects/">All projects →</a></p></section>"#,
        open = section_open("section", "projects")
    )
}

fn education(portfolio: &Portfolio) -> String {
    let degree = portfolio
        .education
        .as_ref()
        .map(|education| {
            let summary = education
                .summary
                .as_deref()
                .map(|s| format!(r#"<p class="muted">{}</p>"#, escape_html(s)))
                .unwrap_or_default();
            format!(
                r#"<div class="card"><div>{}</div><div class="meta">{}</div>{summary}</div><div class="divider"></div>"#,
                escape_html(&education.degree),
                escape_html(&education.school)
            )
        })
        .unwrap_or_default();

    let certifications: String = portfolio
        .certifications
        .iter()
        .map(|cert| {
            let issued = match &cert.date {
                Some(date) => format!("{} • {}", escape_html(&cert.issuer), escape_html(date)),
                None => escape_html(&cert.issuer),
            };
            let description = cert
                .description
                .as_deref()
                .map(|d| format!(r#"<p class="muted">{}</p>"#, escape_html(d)))
                .unwrap_or_default();
            format!(
                r#"<div class="card"><div class="section-head"><h3>{name}</h3>
<a href="{file}" target="_blank" rel="noopener" aria-label="View {name} certificate">View</a></div>
<div class="meta">{issued}</div>{description}</div>"#,
                name = escape_html(&cert.name),
                file = escape_html(&cert.file())
            )
        })
        .collect();

    format!(
        r#"{open}<h2>Education and Certifications</h2>{degree}<div class="cards">{certifications}</div></section>"#,
        open = section_open("section", "education")
    )
}

fn thought_card(thought: &Thought) -> String {
    let dateline = format!(
        "<span>{}</span><span>{}</span>",
        escape_html(thought.date.as_deref().unwrap_or_default()),
        escape_html(thought.read_time.as_deref().unwrap_or_default())
    );
    let body = format!(
        r#"<div class="dateline">{dateline}</div><h3>{title}</h3><p class="muted">{excerpt}</p><span class="more">Read more →</span>"#,
        title = escape_html(&thought.title),
        excerpt = escape_html(&thought.excerpt)
    );
    match &thought.url {
        Some(url) => format!(r#"<a class="card thought" href="{}">{body}</a>"#, escape_html(url)),
        None => format!(r#"<article class="card thought">{body}</article>"#),
    }
}

/// Left out entirely without posts, so the tracker never observes it.
fn thoughts(portfolio: &Portfolio) -> String {
    if portfolio.thoughts.is_empty() {
        return String::new();
    }
    let cards: String = portfolio.thoughts.iter().map(thought_card).collect();

    format!(
        r#"{open}<h2>Recent Thoughts</h2><div class="cards">{cards}</div></section>"#,
        open = section_open("section", "thoughts")
    )
}

fn connect(portfolio: &Portfolio) -> String {
    let email = portfolio
        .profile
        .email
        .as_deref()
        .map(|email| {
            let email = escape_html(email);
            format!(r#"<p><a href="mailto:{email}">{email} →</a></p>"#)
        })
        .unwrap_or_default();

    let socials: String = portfolio
        .socials
        .iter()
        .map(|social| {
            format!(
                r#"<a class="card" href="{}"><div>{}</div><div class="meta">{}</div></a>"#,
                escape_html(&social.url),
                escape_html(&social.name),
                escape_html(&social.handle)
            )
        })
        .collect();

    format!(
        r#"{open}<div class="cards"><div><h2>Let's Connect</h2>
<p class="headline">Always interested in new opportunities, collaborations, and conversations about technology and design.</p>{email}</div>
<div><div class="mono">ELSEWHERE</div><div class="cards">{socials}</div></div></div></section>"#,
        open = section_open("section", "connect")
    )
}

fn footer(copyright: &str) -> String {
    format!(
        r#"<footer class="footer"><div class="muted">{}</div>
<button type="button" class="theme-toggle" data-theme-toggle aria-label="Toggle theme"><span class="sun">☀</span><span class="moon">☾</span></button></footer>"#,
        escape_html(copyright)
    )
}
