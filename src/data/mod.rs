//! Portfolio content loading and validation.
//!
//! Everything the pages show comes from one TOML file (`[build] content`,
//! `portfolio.toml` by default):
//!
//! ```toml
//! [profile]
//! name = "Alex Rivera"
//! headline = "Software engineer crafting digital experiences."
//! focus = ["Rust", "TypeScript"]
//!
//! [[work]]
//! year = "2023"
//! role = "Senior Engineer"
//! company = "Acme"
//!
//! [[projects]]
//! title = "Inventory System"
//! featured = true
//! ```
//!
//! Project slugs double as route identifiers, so they must be unique and
//! URL-safe.

mod types;

pub use types::{Certification, Education, Job, Link, Position, Profile, Project, Social, Thought};

use crate::utils::slug::is_url_safe;
use anyhow::{Context, Result};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use thiserror::Error;

/// Problems with the content file that make routing or rendering impossible.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContentError {
    #[error("[profile.name] must not be empty")]
    MissingName,

    #[error("project `{title}` has slug `{slug}`, which is not URL-safe")]
    InvalidSlug { title: String, slug: String },

    #[error("slug `{0}` is used by more than one project")]
    DuplicateSlug(String),
}

/// The whole site's content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Portfolio {
    pub profile: Profile,

    #[serde(default)]
    pub work: Vec<Job>,

    #[serde(default)]
    pub projects: Vec<Project>,

    #[serde(default)]
    pub education: Option<Education>,

    #[serde(default)]
    pub certifications: Vec<Certification>,

    /// Post cards between education and contact; the section is left out
    /// when empty.
    #[serde(default)]
    pub thoughts: Vec<Thought>,

    #[serde(default)]
    pub socials: Vec<Social>,
}

impl Portfolio {
    pub fn from_str(content: &str) -> Result<Self> {
        let portfolio: Self = toml::from_str(content)?;
        portfolio.validate()?;
        Ok(portfolio)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read content file {}", path.display()))?;
        Self::from_str(&content).with_context(|| format!("Invalid content in {}", path.display()))
    }

    pub fn validate(&self) -> Result<(), ContentError> {
        if self.profile.name.trim().is_empty() {
            return Err(ContentError::MissingName);
        }

        let mut seen = FxHashSet::default();
        for project in &self.projects {
            let slug = project.slug();
            if !is_url_safe(&slug) {
                return Err(ContentError::InvalidSlug {
                    title: project.title.clone(),
                    slug,
                });
            }
            if !seen.insert(slug.clone()) {
                return Err(ContentError::DuplicateSlug(slug));
            }
        }
        Ok(())
    }

    /// Route lookup: the project with this slug.
    pub fn project(&self, slug: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.slug() == slug)
    }

    /// Projects marked `featured`.
    pub fn featured(&self) -> impl Iterator<Item = &Project> {
        self.projects.iter().filter(|p| p.featured)
    }

    /// Projects shown on the home page: the featured ones, or all of them
    /// when none is featured.
    pub fn showcase(&self) -> Vec<&Project> {
        let featured: Vec<&Project> = self.featured().collect();
        if featured.is_empty() {
            self.projects.iter().collect()
        } else {
            featured
        }
    }

    /// Span of years covered by work experience, e.g. `2019 — 2025`.
    pub fn work_span(&self) -> Option<String> {
        let years = self.work.iter().map(|job| job.year.as_str());
        let first = years.clone().min()?;
        let last = years.max()?;
        Some(if first == last {
            first.to_owned()
        } else {
            format!("{first} — {last}")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
        [profile]
        name = "Alex Rivera"
        headline = "Engineer"

        [[work]]
        year = "2019"
        role = "Engineer"
        company = "Initech"

        [[work]]
        year = "2023"
        role = "Senior Engineer"
        company = "Acme"

        [[projects]]
        title = "Jungle.Baby - Kids Activity Booking Platform"
        slug = "jungle-baby"
        featured = true

        [[projects]]
        title = "Sequester Green Brigade"
    "#;

    #[test]
    fn test_load_sample() {
        let portfolio = Portfolio::from_str(SAMPLE).unwrap();
        assert_eq!(portfolio.profile.name, "Alex Rivera");
        assert_eq!(portfolio.work.len(), 2);
        assert_eq!(portfolio.featured().count(), 1);
        assert!(portfolio.education.is_none());
    }

    #[test]
    fn test_project_lookup() {
        let portfolio = Portfolio::from_str(SAMPLE).unwrap();
        assert_eq!(
            portfolio.project("jungle-baby").map(|p| p.title.as_str()),
            Some("Jungle.Baby - Kids Activity Booking Platform")
        );
        assert!(portfolio.project("sequester-green-brigade").is_some());
        assert!(portfolio.project("nope").is_none());
    }

    #[test]
    fn test_showcase_falls_back_to_all() {
        let portfolio = Portfolio::from_str(SAMPLE).unwrap();
        assert_eq!(portfolio.showcase().len(), 1);

        let mut plain = portfolio.clone();
        plain.projects.iter_mut().for_each(|p| p.featured = false);
        assert_eq!(plain.showcase().len(), 2);
    }

    #[test]
    fn test_work_span() {
        let portfolio = Portfolio::from_str(SAMPLE).unwrap();
        assert_eq!(portfolio.work_span().as_deref(), Some("2019 — 2023"));
        assert_eq!(Portfolio::default().work_span(), None);
    }

    #[test]
    fn test_missing_name() {
        let err = Portfolio::from_str("[profile]\nname = \"  \"").unwrap_err();
        assert_eq!(err.downcast_ref::<ContentError>(), Some(&ContentError::MissingName));
    }

    #[test]
    fn test_duplicate_slug() {
        let content = r#"
            [profile]
            name = "A"
            [[projects]]
            title = "Same Name"
            [[projects]]
            title = "Same  name!"
        "#;
        let err = Portfolio::from_str(content).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ContentError>(),
            Some(&ContentError::DuplicateSlug("same-name".into()))
        );
    }

    #[test]
    fn test_invalid_explicit_slug() {
        let content = r#"
            [profile]
            name = "A"
            [[projects]]
            title = "X"
            slug = "../etc"
        "#;
        let err = Portfolio::from_str(content).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ContentError>(),
            Some(ContentError::InvalidSlug { .. })
        ));
    }

    #[test]
    fn test_untitled_project_has_no_slug() {
        let content = r#"
            [profile]
            name = "A"
            [[projects]]
            title = "???"
        "#;
        assert!(Portfolio::from_str(content).is_err());
    }

    #[test]
    fn test_from_path_reports_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("portfolio.toml");
        fs::write(&path, "[profile]\nname = \"\"").unwrap();

        let err = Portfolio::from_path(&path).unwrap_err();
        assert!(format!("{err:#}").contains("portfolio.toml"));
        assert!(Portfolio::from_path(&dir.path().join("missing.toml")).is_err());
    }
}
