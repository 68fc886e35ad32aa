//! Portfolio content records.
//!
//! Deserialized from `portfolio.toml`. Optional fields render nothing when
//! absent; empty lists are skipped by the templates.

use crate::utils::slug::{dash_whitespace, slugify};
use serde::{Deserialize, Serialize};

/// Who the site is about.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Profile {
    pub name: String,

    /// One-sentence pitch under the name.
    #[serde(default)]
    pub headline: String,

    #[serde(default)]
    pub location: Option<String>,

    /// Shows the pulsing "Available for work" badge.
    #[serde(default)]
    pub available: bool,

    /// Downloadable resume, e.g. `/resume.pdf`.
    #[serde(default)]
    pub resume: Option<String>,

    /// Call-to-action links next to the resume button.
    #[serde(default)]
    pub links: Vec<Link>,

    #[serde(default)]
    pub currently: Option<Position>,

    /// Skill chips in the "FOCUS" column.
    #[serde(default)]
    pub focus: Vec<String>,

    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Link {
    pub label: String,
    pub url: String,
}

/// The "CURRENTLY" block.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Position {
    pub role: String,
    pub company: String,
    #[serde(default)]
    pub period: Option<String>,
}

/// One row of work experience.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Job {
    pub year: String,
    pub role: String,
    pub company: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tech: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    /// URL identifier; derived from the title when omitted.
    #[serde(default)]
    pub slug: Option<String>,
    pub title: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub long_description: Option<String>,
    #[serde(default)]
    pub tech: Vec<String>,
    #[serde(default)]
    pub live_url: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub challenges: Vec<String>,
    #[serde(default)]
    pub results: Vec<String>,
    /// Listed in the home page "Projects" section.
    #[serde(default)]
    pub featured: bool,
}

impl Project {
    /// Explicit slug, or one derived from the title.
    pub fn slug(&self) -> String {
        self.slug.clone().unwrap_or_else(|| slugify(&self.title))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Education {
    pub degree: String,
    pub school: String,
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Certification {
    pub name: String,
    pub issuer: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Certificate document; defaults to `/certificates/<name>.pdf`.
    #[serde(default)]
    pub file: Option<String>,
}

impl Certification {
    pub fn file(&self) -> String {
        self.file
            .clone()
            .unwrap_or_else(|| format!("/certificates/{}.pdf", dash_whitespace(&self.name)))
    }
}

/// Short post card in the "Recent Thoughts" section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Thought {
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    /// Free-form, e.g. `Dec 2024`.
    #[serde(default)]
    pub date: Option<String>,
    /// e.g. `5 min`.
    #[serde(default)]
    pub read_time: Option<String>,
    /// Where "Read more" points; the card is not a link without it.
    #[serde(default)]
    pub url: Option<String>,
}

/// Entry in the "ELSEWHERE" grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Social {
    pub name: String,
    pub handle: String,
    pub url: String,
}
