//! RSS feed and sitemap.

#![allow(deprecated)]
use app::types::{AppState, Author, Post};
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::Response;
use chrono::DateTime;
use core::fmt::{self, Write as _};
use rss::{CategoryBuilder, ChannelBuilder, Item};
use serde::Deserialize;
use shared_utils::{RetryConfig, retry_async};
use std::sync::Arc;
use tracing::{error, warn};

use crate::config::SiteConfig;

/// A sitemap `<url>` entry backed by a published record.
#[derive(Debug, Clone, Deserialize)]
pub struct SitemapEntry {
    pub slug: Option<String>,
    pub created_at: String,
}

/// Listing pages that always appear in the sitemap, with change frequency and
/// priority.
const STATIC_PAGES: &[(&str, &str, &str)] = &[
    ("/", "daily", "1.0"),
    ("/blog", "daily", "0.9"),
    ("/portfolio", "weekly", "0.9"),
    ("/rss.xml", "daily", "0.5"),
];

fn build_response(body: String, content_type: &str, status: StatusCode) -> Response<String> {
    match Response::builder()
        .status(status)
        .header("Content-Type", content_type)
        .body(body)
    {
        Ok(response) => response,
        Err(build_error) => {
            error!(?build_error, "Failed to build HTTP response");
            let mut fallback = Response::new(String::new());
            *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        }
    }
}

fn failure(message: &str) -> Response<String> {
    build_response(
        message.to_owned(),
        "text/plain; charset=utf-8",
        StatusCode::INTERNAL_SERVER_ERROR,
    )
}

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Builds the RSS channel for `posts`, newest first as given.
#[must_use]
pub fn render_rss(site_url: &str, posts: Vec<Post>) -> String {
    let items = posts
        .into_iter()
        .map(|post| {
            let Post {
                author: Author {
                    name: author_name, ..
                },
                title,
                summary,
                slug,
                categories,
                created_at,
                ..
            } = post;

            let mut item = Item::default();
            item.set_author(author_name);
            item.set_title(title);
            item.set_description(summary);
            item.set_categories(
                categories
                    .into_iter()
                    .map(|name| CategoryBuilder::default().name(name).build())
                    .collect::<Vec<_>>(),
            );
            if let Some(slug) = slug {
                item.set_link(format!("{site_url}/blog/{slug}"));
            }
            match DateTime::parse_from_rfc3339(&created_at) {
                Ok(date) => item.set_pub_date(date.to_rfc2822()),
                Err(e) => warn!(created_at, "Leaving out pubDate of unparsable timestamp: {e}"),
            }
            item
        })
        .collect::<Vec<_>>();

    ChannelBuilder::default()
        .title("Lumen Studio")
        .link(site_url.to_owned())
        .description("Lumen Studio \u{2013} Branding, Design & Writing")
        .items(items)
        .build()
        .to_string()
}

fn write_url(
    sitemap: &mut String,
    loc: &str,
    lastmod: Option<&str>,
    freq: &str,
    priority: &str,
) -> fmt::Result {
    writeln!(sitemap, "<url>")?;
    writeln!(sitemap, "<loc>{}</loc>", escape_xml(loc))?;
    if let Some(lastmod) = lastmod {
        writeln!(sitemap, "<lastmod>{lastmod}</lastmod>")?;
    }
    writeln!(sitemap, "<changefreq>{freq}</changefreq>")?;
    writeln!(sitemap, "<priority>{priority}</priority>")?;
    writeln!(sitemap, "</url>")
}

/// Builds the sitemap: the listing pages, then every post and project.
pub fn render_sitemap(
    site_url: &str,
    posts: &[SitemapEntry],
    projects: &[SitemapEntry],
) -> Result<String, fmt::Error> {
    let mut sitemap = String::new();
    writeln!(sitemap, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
    writeln!(sitemap, "<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">")?;

    for (path, freq, priority) in STATIC_PAGES {
        write_url(&mut sitemap, &format!("{site_url}{path}"), None, freq, priority)?;
    }

    for (prefix, entries) in [("blog", posts), ("portfolio", projects)] {
        for entry in entries {
            let Some(slug) = entry.slug.as_deref() else {
                warn!(prefix, "Skipping sitemap entry without slug");
                continue;
            };
            let lastmod = DateTime::parse_from_rfc3339(&entry.created_at)
                .ok()
                .map(|date| date.format("%Y-%m-%d").to_string());
            write_url(
                &mut sitemap,
                &format!("{site_url}/{prefix}/{slug}"),
                lastmod.as_deref(),
                "monthly",
                "0.8",
            )?;
        }
    }

    write!(sitemap, "</urlset>")?;
    Ok(sitemap)
}

pub async fn rss_handler(
    State(state): State<AppState>,
    Extension(site): Extension<Arc<SiteConfig>>,
) -> Response<String> {
    let db = state.db.as_ref();
    let query = retry_async("rss_feed", RetryConfig::from_env(), || async {
        db.query("SELECT *, author.* FROM post WHERE is_published = true ORDER BY created_at DESC LIMIT 50")
            .await
    })
    .await;
    let posts = match query.map(|mut response| response.take::<Vec<Post>>(0)) {
        Ok(Ok(posts)) => posts,
        Ok(Err(err)) => {
            error!(?err, "Failed to deserialize feed posts");
            return failure("Failed to generate RSS feed");
        }
        Err(err) => {
            error!(?err, "Failed to fetch feed posts");
            return failure("Failed to generate RSS feed");
        }
    };
    build_response(
        render_rss(&site.site_url, posts),
        "application/rss+xml",
        StatusCode::OK,
    )
}

pub async fn sitemap_handler(
    State(state): State<AppState>,
    Extension(site): Extension<Arc<SiteConfig>>,
) -> Response<String> {
    let db = state.db.as_ref();
    let query = retry_async("sitemap_query", RetryConfig::from_env(), || async {
        db.query(
            "SELECT slug, created_at FROM post WHERE is_published = true ORDER BY created_at DESC;
             SELECT slug, created_at FROM project WHERE is_published = true ORDER BY created_at DESC;",
        )
        .await
    })
    .await;
    let mut response = match query {
        Ok(response) => response,
        Err(err) => {
            error!(?err, "Failed to fetch sitemap entries");
            return failure("Failed to build sitemap");
        }
    };
    let entries = response
        .take::<Vec<SitemapEntry>>(0)
        .and_then(|posts| Ok((posts, response.take::<Vec<SitemapEntry>>(1)?)));
    let (posts, projects) = match entries {
        Ok(entries) => entries,
        Err(err) => {
            error!(?err, "Failed to deserialize sitemap entries");
            return failure("Failed to build sitemap");
        }
    };
    match render_sitemap(&site.site_url, &posts, &projects) {
        Ok(sitemap) => build_response(sitemap, "application/xml", StatusCode::OK),
        Err(err) => {
            error!(?err, "Failed to write sitemap");
            failure("Failed to build sitemap")
        }
    }
}
