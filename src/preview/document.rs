//! Terminal rendition of the home page.
//!
//! The same sections as the HTML page, reduced to styled text lines
//! wrapped to the terminal width.

use crate::{
    config::SiteConfig,
    data::Portfolio,
    nav::SECTIONS,
    tracker::SectionId,
};

/// How a line is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Section heading.
    Heading,
    /// Name, job role, card title.
    Title,
    Body,
    Muted,
    /// Small caps labels like `CURRENTLY`.
    Label,
    /// Links and chips.
    Accent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub tone: Tone,
}

impl Line {
    fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }

    fn blank() -> Self {
        Self::new("", Tone::Body)
    }
}

/// One tracked section's lines.
#[derive(Debug, Clone)]
pub struct Block {
    pub id: SectionId,
    pub lines: Vec<Line>,
}

#[derive(Debug, Clone)]
pub struct Document {
    pub sections: Vec<Block>,
    pub footer: Vec<Line>,
}

/// Compose the page for a terminal `width` columns wide.
pub fn compose(portfolio: &Portfolio, config: &SiteConfig, year: i32, width: usize) -> Document {
    let mut writer = Writer::new(width);

    let sections = SECTIONS
        .into_iter()
        .filter(|&id| id != "thoughts" || !portfolio.thoughts.is_empty())
        .map(|id| {
            match id {
                "intro" => intro(&mut writer, portfolio, year),
                "work" => work(&mut writer, portfolio),
                "projects" => projects(&mut writer, portfolio),
                "education" => education(&mut writer, portfolio),
                "thoughts" => thoughts(&mut writer, portfolio),
                _ => connect(&mut writer, portfolio),
            }
            Block {
                id: SectionId::new(id),
                lines: writer.take(),
            }
        })
        .collect();

    writer.line(&config.base.copyright_line(year), Tone::Muted);
    writer.line("[t] toggle theme · [m] menu · [1-5] jump · [q] quit", Tone::Muted);

    Document {
        sections,
        footer: writer.take(),
    }
}

fn intro(w: &mut Writer, portfolio: &Portfolio, year: i32) {
    let profile = &portfolio.profile;
    w.line(&format!("PORTFOLIO / {year}"), Tone::Label);
    w.blank();
    w.line(&profile.name, Tone::Title);
    w.blank();
    w.wrap(&profile.headline, Tone::Body);
    w.blank();
    if profile.available {
        w.line("● Available for work", Tone::Accent);
    }
    if let Some(location) = &profile.location {
        w.line(location, Tone::Muted);
    }

    let mut actions: Vec<String> = Vec::new();
    if let Some(resume) = &profile.resume {
        actions.push(format!("[Download Resume {resume}]"));
    }
    actions.extend(profile.links.iter().map(|l| format!("[{}]", l.label)));
    if !actions.is_empty() {
        w.blank();
        w.wrap(&actions.join(" "), Tone::Accent);
    }

    if let Some(position) = &profile.currently {
        w.blank();
        w.line("CURRENTLY", Tone::Label);
        w.line(&position.role, Tone::Body);
        w.line(&format!("@ {}", position.company), Tone::Muted);
        if let Some(period) = &position.period {
            w.line(period, Tone::Muted);
        }
    }
    if !profile.focus.is_empty() {
        w.blank();
        w.line("FOCUS", Tone::Label);
        w.wrap(&profile.focus.join(" · "), Tone::Accent);
    }
}

fn work(w: &mut Writer, portfolio: &Portfolio) {
    w.line("Work Experience", Tone::Heading);
    if let Some(span) = portfolio.work_span() {
        w.line(&span, Tone::Label);
    }
    for job in &portfolio.work {
        w.blank();
        w.line(&format!("{}  {}", job.year, job.role), Tone::Title);
        w.line(&job.company, Tone::Muted);
        w.wrap(&job.description, Tone::Body);
        if !job.tech.is_empty() {
            w.wrap(&job.tech.join(" · "), Tone::Accent);
        }
    }
}

fn projects(w: &mut Writer, portfolio: &Portfolio) {
    w.line("Projects", Tone::Heading);
    for project in portfolio.showcase() {
        w.blank();
        w.line(&project.title, Tone::Title);
        w.wrap(&project.description, Tone::Body);
        if !project.tech.is_empty() {
            w.wrap(&project.tech.join(" · "), Tone::Accent);
        }
    }
    w.blank();
    w.line("All projects → /projects/", Tone::Muted);
}

fn education(w: &mut Writer, portfolio: &Portfolio) {
    w.line("Education and Certifications", Tone::Heading);
    if let Some(education) = &portfolio.education {
        w.blank();
        w.line(&education.degree, Tone::Title);
        w.line(&education.school, Tone::Muted);
        if let Some(summary) = &education.summary {
            w.wrap(summary, Tone::Body);
        }
    }
    for cert in &portfolio.certifications {
        w.blank();
        w.line(&cert.name, Tone::Title);
        match &cert.date {
            Some(date) => w.line(&format!("{} • {date}", cert.issuer), Tone::Muted),
            None => w.line(&cert.issuer, Tone::Muted),
        }
        w.line(&cert.file(), Tone::Accent);
    }
}

fn thoughts(w: &mut Writer, portfolio: &Portfolio) {
    w.line("Recent Thoughts", Tone::Heading);
    for thought in &portfolio.thoughts {
        w.blank();
        let dateline = [thought.date.as_deref(), thought.read_time.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" · ");
        if !dateline.is_empty() {
            w.line(&dateline, Tone::Label);
        }
        w.line(&thought.title, Tone::Title);
        w.wrap(&thought.excerpt, Tone::Body);
        if let Some(url) = &thought.url {
            w.line(&format!("Read more → {url}"), Tone::Accent);
        }
    }
}

fn connect(w: &mut Writer, portfolio: &Portfolio) {
    w.line("Let's Connect", Tone::Heading);
    w.blank();
    w.wrap(
        "Always interested in new opportunities, collaborations, and conversations about technology and design.",
        Tone::Body,
    );
    if let Some(email) = &portfolio.profile.email {
        w.blank();
        w.line(&format!("{email} →"), Tone::Accent);
    }
    if !portfolio.socials.is_empty() {
        w.blank();
        w.line("ELSEWHERE", Tone::Label);
        for social in &portfolio.socials {
            w.line(&format!("{}  {}", social.name, social.handle), Tone::Body);
        }
    }
}

// ============================================================================
// Line Writer
// ============================================================================

struct Writer {
    width: usize,
    lines: Vec<Line>,
}

impl Writer {
    fn new(width: usize) -> Self {
        Self {
            width: width.max(1),
            lines: Vec::new(),
        }
    }

    fn line(&mut self, text: &str, tone: Tone) {
        self.lines.push(Line::new(text, tone));
    }

    fn blank(&mut self) {
        self.lines.push(Line::blank());
    }

    fn wrap(&mut self, text: &str, tone: Tone) {
        self.lines
            .extend(wrap(text, self.width).into_iter().map(|l| Line::new(l, tone)));
    }

    fn take(&mut self) -> Vec<Line> {
        std::mem::take(&mut self.lines)
    }
}

/// Greedy word wrap by character count. Words longer than `width` are split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if len > 0 {
                lines.push(std::mem::take(&mut current));
                len = 0;
            }
            lines.push(word.drain(..width).collect());
        }
        if word.is_empty() {
            continue;
        }

        if len > 0 && len + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
            len = 0;
        }
        if len > 0 {
            current.push(' ');
            len += 1;
        }
        current.extend(word.iter());
        len += word.len();
    }
    if len > 0 {
        lines.push(current);
    }
    lines
}
