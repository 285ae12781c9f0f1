//! Route Table
//!
//! Top-level pages of the client. Unknown paths redirect to the landing page.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Landing,
    Dashboard,
    ScrapeJobs,
    TailorResume,
    EmailHr,
    AiInterview,
}

impl Route {
    pub fn all() -> &'static [Route] {
        &[
            Route::Landing,
            Route::Dashboard,
            Route::ScrapeJobs,
            Route::TailorResume,
            Route::EmailHr,
            Route::AiInterview,
        ]
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::Dashboard => "/dashboard",
            Route::ScrapeJobs => "/scrape-jobs",
            Route::TailorResume => "/tailor-resume",
            Route::EmailHr => "/email-hr",
            Route::AiInterview => "/ai-interview",
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Outcome of matching a path
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "route", rename_all = "snake_case")]
pub enum Resolution {
    Page(Route),
    Redirect(Route),
}

impl Resolution {
    /// Page finally shown
    pub fn route(&self) -> Route {
        match self {
            Resolution::Page(route) | Resolution::Redirect(route) => *route,
        }
    }
}

/// Match a path, ignoring any query string, fragment, or trailing slash
pub fn resolve(path: &str) -> Resolution {
    let path = path
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    let trimmed = path.trim_end_matches('/');
    let normalized = if trimmed.is_empty() { "/" } else { trimmed };

    Route::all()
        .iter()
        .find(|route| route.path() == normalized)
        .map(|&route| Resolution::Page(route))
        .unwrap_or(Resolution::Redirect(Route::Landing))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_paths() {
        for route in Route::all() {
            assert_eq!(resolve(route.path()), Resolution::Page(*route));
        }
    }

    #[test]
    fn test_trailing_slash_and_query() {
        assert_eq!(resolve("/dashboard/"), Resolution::Page(Route::Dashboard));
        assert_eq!(resolve("/email-hr?app=4"), Resolution::Page(Route::EmailHr));
        assert_eq!(resolve(""), Resolution::Page(Route::Landing));
        assert_eq!(resolve("/?ref=mail"), Resolution::Page(Route::Landing));
    }

    #[test]
    fn test_unknown_redirects_to_landing() {
        assert_eq!(resolve("/settings"), Resolution::Redirect(Route::Landing));
        assert_eq!(resolve("/dashboard/extra"), Resolution::Redirect(Route::Landing));
        assert_eq!(resolve("/nope").route(), Route::Landing);
    }
}
