//! URL routing for the generated pages.
//!
//! | Path                | Route              | Output file                   |
//! |---------------------|--------------------|-------------------------------|
//! | `/`                 | `Home`             | `index.html`                  |
//! | `/projects`         | `Projects`         | `projects/index.html`         |
//! | `/projects/<slug>`  | `Project(slug)`    | `projects/<slug>/index.html`  |
//! | anything else       | `NotFound`         | `404.html`                    |
//!
//! Project routes are resolved by identifier lookup in the portfolio; an
//! unknown slug is `NotFound`.

use crate::data::Portfolio;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Projects,
    Project(String),
    NotFound,
}

impl Route {
    /// Resolve a request path (query string and surrounding slashes ignored).
    pub fn resolve(path: &str, portfolio: &Portfolio) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            [] | ["index.html"] => Self::Home,
            ["projects"] | ["projects", "index.html"] => Self::Projects,
            ["projects", slug] | ["projects", slug, "index.html"] => {
                if portfolio.project(slug).is_some() {
                    Self::Project((*slug).to_owned())
                } else {
                    Self::NotFound
                }
            }
            _ => Self::NotFound,
        }
    }

    /// Every page the site consists of, in sitemap order.
    pub fn all(portfolio: &Portfolio) -> Vec<Self> {
        let mut routes = vec![Self::Home, Self::Projects];
        routes.extend(portfolio.projects.iter().map(|p| Self::Project(p.slug())));
        routes.push(Self::NotFound);
        routes
    }

    /// Output file relative to the output directory.
    pub fn output_path(&self) -> PathBuf {
        match self {
            Self::Home => PathBuf::from("index.html"),
            Self::Projects => PathBuf::from("projects/index.html"),
            Self::Project(slug) => PathBuf::from("projects").join(slug).join("index.html"),
            Self::NotFound => PathBuf::from("404.html"),
        }
    }

    /// URL path, `None` for the not-found page.
    pub fn url_path(&self) -> Option<String> {
        match self {
            Self::Home => Some("/".into()),
            Self::Projects => Some("/projects/".into()),
            Self::Project(slug) => Some(format!("/projects/{slug}/")),
            Self::NotFound => None,
        }
    }

    /// Absolute URL under `base` (trailing slash on `base` tolerated).
    pub fn url(&self, base: &str) -> Option<String> {
        self.url_path()
            .map(|path| format!("{}{path}", base.trim_end_matches('/')))
    }

    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn portfolio() -> Portfolio {
        Portfolio::from_str(
            r#"
            [profile]
            name = "A"
            [[projects]]
            title = "Jungle Baby"
            [[projects]]
            title = "Inventory"
            slug = "jewellery-inventory-system"
            "#,
        )
        .unwrap()
    }

    #[test]
    fn test_resolve_static_routes() {
        let p = portfolio();
        assert_eq!(Route::resolve("/", &p), Route::Home);
        assert_eq!(Route::resolve("", &p), Route::Home);
        assert_eq!(Route::resolve("/index.html", &p), Route::Home);
        assert_eq!(Route::resolve("/projects", &p), Route::Projects);
        assert_eq!(Route::resolve("/projects/", &p), Route::Projects);
        assert_eq!(Route::resolve("/projects/index.html?x=1", &p), Route::Projects);
    }

    #[test]
    fn test_resolve_project_by_slug() {
        let p = portfolio();
        assert_eq!(
            Route::resolve("/projects/jungle-baby", &p),
            Route::Project("jungle-baby".into())
        );
        assert_eq!(
            Route::resolve("/projects/jewellery-inventory-system/#features", &p),
            Route::Project("jewellery-inventory-system".into())
        );
    }

    #[test]
    fn test_unknown_project_is_not_found() {
        let p = portfolio();
        assert_eq!(Route::resolve("/projects/missing", &p), Route::NotFound);
        assert_eq!(Route::resolve("/projects/jungle-baby/extra", &p), Route::NotFound);
        assert_eq!(Route::resolve("/blog", &p), Route::NotFound);
    }

    #[test]
    fn test_all_routes() {
        let routes = Route::all(&portfolio());
        assert_eq!(routes.len(), 5);
        assert_eq!(routes[0], Route::Home);
        assert_eq!(routes[2], Route::Project("jungle-baby".into()));
        assert!(routes.last().unwrap().is_not_found());
    }

    #[test]
    fn test_output_paths() {
        assert_eq!(Route::Home.output_path(), PathBuf::from("index.html"));
        assert_eq!(
            Route::Project("x".into()).output_path(),
            PathBuf::from("projects/x/index.html")
        );
        assert_eq!(Route::NotFound.output_path(), PathBuf::from("404.html"));
    }

    #[test]
    fn test_urls() {
        assert_eq!(Route::Home.url("https://a.dev/").as_deref(), Some("https://a.dev/"));
        assert_eq!(
            Route::Project("x".into()).url("https://a.dev").as_deref(),
            Some("https://a.dev/projects/x/")
        );
        assert_eq!(Route::NotFound.url("https://a.dev"), None);
    }
}
