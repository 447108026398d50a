//! Runtime settings of the server, read once from the environment at startup.

use std::env;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("SURREAL_PROTOCOL must be 'http' or 'https', got '{0}'")]
    InvalidProtocol(String),
    #[error("SITE_URL must be an absolute http(s) URL, got '{0}'")]
    InvalidSiteUrl(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Http,
    Https,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    pub protocol: Protocol,
    pub host: String,
    pub namespace: String,
    pub database: String,
    pub root: Option<Credentials>,
    pub namespace_user: Option<Credentials>,
    pub database_user: Option<Credentials>,
    /// Absolute base used for links in the feed and the sitemap, without a
    /// trailing slash.
    pub site_url: String,
    /// Directory served under `/storage`.
    pub static_dir: String,
}

fn credentials(user: Option<String>, pass: Option<String>) -> Option<Credentials> {
    let username = user.filter(|u| !u.trim().is_empty())?;
    Some(Credentials {
        username,
        password: pass.unwrap_or_default(),
    })
}

impl SiteConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_owned());

        let protocol = match or("SURREAL_PROTOCOL", "http").trim() {
            "http" => Protocol::Http,
            "https" => Protocol::Https,
            other => return Err(ConfigError::InvalidProtocol(other.to_owned())),
        };

        let site_url = or("SITE_URL", "http://127.0.0.1:3007");
        if !(site_url.starts_with("http://") || site_url.starts_with("https://")) {
            return Err(ConfigError::InvalidSiteUrl(site_url));
        }

        Ok(Self {
            protocol,
            host: or("SURREAL_HOST", "127.0.0.1:8000"),
            namespace: or("SURREAL_NS", "studio"),
            database: or("SURREAL_DB", "studio"),
            root: credentials(lookup("SURREAL_ROOT_USER"), lookup("SURREAL_ROOT_PASS")),
            namespace_user: credentials(
                lookup("SURREAL_NAMESPACE_USER"),
                lookup("SURREAL_NAMESPACE_PASS"),
            ),
            database_user: credentials(
                lookup("SURREAL_USERNAME").or_else(|| lookup("SURREAL_USER")),
                lookup("SURREAL_PASSWORD").or_else(|| lookup("SURREAL_PASS")),
            ),
            site_url: site_url.trim_end_matches('/').to_owned(),
            static_dir: or("STATIC_DIR", "storage"),
        })
    }
}
