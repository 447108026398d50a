use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;

#[cfg(feature = "ssr")]
use axum::extract::FromRef;
#[cfg(feature = "ssr")]
use leptos::config::LeptosOptions;
#[cfg(feature = "ssr")]
use surrealdb::{Surreal, engine::remote::http::Client};

use crate::dropdown::DropdownOption;
use crate::listing::Filtered;

#[cfg(feature = "ssr")]
#[derive(FromRef, Debug, Clone)]
pub struct AppState {
    pub db: std::sync::Arc<Surreal<Client>>,
    pub leptos_options: std::sync::Arc<LeptosOptions>,
}

#[cfg(feature = "ssr")]
impl FromRef<AppState> for LeptosOptions {
    fn from_ref(state: &AppState) -> Self {
        state.leptos_options.as_ref().clone()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Author {
    pub id: Thing,
    pub slug: String,
    pub name: String,
    pub github: Option<String>,
}

impl Default for Author {
    fn default() -> Self {
        Self {
            id: Thing::from(("author", "0")),
            slug: String::new(),
            name: String::new(),
            github: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    pub id: Thing,
    pub title: String,
    pub slug: Option<String>,
    pub summary: String,
    pub body: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub author: Author,
    pub read_time: usize,
    pub total_views: usize,
    pub image: Option<String>,
    pub created_at: String,
    pub is_published: bool,
}

impl Default for Post {
    fn default() -> Self {
        Self {
            id: Thing::from(("post", "0")),
            title: String::new(),
            slug: None,
            summary: String::new(),
            body: String::new(),
            categories: vec![],
            tags: vec![],
            author: Author::default(),
            read_time: 0,
            total_views: 0,
            image: None,
            created_at: String::new(),
            is_published: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    pub id: Thing,
    pub title: String,
    pub slug: Option<String>,
    pub client: Option<String>,
    pub summary: String,
    pub body: String,
    #[serde(default)]
    pub brandings: Vec<String>,
    #[serde(default)]
    pub industries: Vec<String>,
    pub image: Option<String>,
    pub created_at: String,
    pub is_published: bool,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            id: Thing::from(("project", "0")),
            title: String::new(),
            slug: None,
            client: None,
            summary: String::new(),
            body: String::new(),
            brandings: vec![],
            industries: vec![],
            image: None,
            created_at: String::new(),
            is_published: true,
        }
    }
}

/// Everything the blog listing needs on first render.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BlogPayload {
    pub categories: Vec<DropdownOption>,
    pub tags: Vec<DropdownOption>,
    pub authors: Vec<DropdownOption>,
    pub posts: Filtered<Post>,
}

/// Everything the portfolio listing needs on first render.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PortfolioPayload {
    pub brandings: Vec<DropdownOption>,
    pub industries: Vec<DropdownOption>,
    pub projects: Filtered<Project>,
}

/// Public prefix under which uploaded images are served.
pub const STORAGE_URL: &str = match option_env!("STORAGE_URL") {
    Some(url) => url,
    None => "/storage",
};

/// Resolves a stored image path against `base`.
///
/// Absolute URLs pass through untouched, blank paths yield `None`, and the
/// prefix and path are joined by exactly one slash.
#[must_use]
pub fn storage_url(base: &str, path: &str) -> Option<String> {
    let path = path.trim();
    if path.is_empty() {
        return None;
    }
    if path.starts_with("http://") || path.starts_with("https://") || path.starts_with("//") {
        return Some(path.to_owned());
    }
    Some(format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    ))
}

impl Post {
    #[must_use]
    pub fn image_url(&self) -> Option<String> {
        self.image.as_deref().and_then(|path| storage_url(STORAGE_URL, path))
    }
}

impl Project {
    #[must_use]
    pub fn image_url(&self) -> Option<String> {
        self.image.as_deref().and_then(|path| storage_url(STORAGE_URL, path))
    }
}
