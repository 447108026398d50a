//! Server functions behind the blog and portfolio pages.
//!
//! Each listing has two endpoints: one returning everything the first render
//! needs (dropdown options, the first page and the applied filters) and one
//! answering the debounced filter requests. Filter params are validated before
//! they reach a query and are only ever passed to SurrealDB as bound
//! parameters. Every database round-trip goes through the retry helper.

#![allow(deprecated)]

use leptos::prelude::{ServerFnError, server};
use leptos::server_fn::codec::Json;

use crate::{
    filter::QueryParams,
    listing::Filtered,
    types::{BlogPayload, PortfolioPayload, Post, Project},
};

#[cfg(feature = "ssr")]
pub use store::{
    bump_views, load_blog, load_portfolio, load_post, load_posts, load_project, load_projects,
};

/// Initial payload of the blog listing for the filters in `params`.
#[server(endpoint = "/blog", input = Json)]
pub async fn blog_page(params: QueryParams) -> Result<BlogPayload, ServerFnError> {
    use crate::types::AppState;
    use leptos::prelude::expect_context;

    let AppState { db, .. } = expect_context::<AppState>();
    load_blog(db.as_ref(), &params).await
}

/// One page of posts matching `params`.
#[server(endpoint = "/blog/filter", input = Json)]
pub async fn filter_posts(params: QueryParams) -> Result<Filtered<Post>, ServerFnError> {
    use crate::types::AppState;
    use leptos::prelude::expect_context;

    let AppState { db, .. } = expect_context::<AppState>();
    load_posts(db.as_ref(), &params).await
}

/// Initial payload of the portfolio listing for the filters in `params`.
#[server(endpoint = "/portfolio", input = Json)]
pub async fn portfolio_page(params: QueryParams) -> Result<PortfolioPayload, ServerFnError> {
    use crate::types::AppState;
    use leptos::prelude::expect_context;

    let AppState { db, .. } = expect_context::<AppState>();
    load_portfolio(db.as_ref(), &params).await
}

/// One page of projects matching `params`.
#[server(endpoint = "/portfolio/filter", input = Json)]
pub async fn filter_projects(params: QueryParams) -> Result<Filtered<Project>, ServerFnError> {
    use crate::types::AppState;
    use leptos::prelude::expect_context;

    let AppState { db, .. } = expect_context::<AppState>();
    load_projects(db.as_ref(), &params).await
}

/// Fetches a published post by slug with its body rendered to HTML.
#[server(endpoint = "/post")]
pub async fn select_post(slug: String) -> Result<Post, ServerFnError> {
    use crate::types::AppState;
    use leptos::prelude::expect_context;

    let AppState { db, .. } = expect_context::<AppState>();
    load_post(db.as_ref(), &slug).await
}

/// Fetches a published project by slug with its body rendered to HTML.
#[server(endpoint = "/project")]
pub async fn select_project(slug: String) -> Result<Project, ServerFnError> {
    use crate::types::AppState;
    use leptos::prelude::expect_context;

    let AppState { db, .. } = expect_context::<AppState>();
    load_project(db.as_ref(), &slug).await
}

/// Increments the `total_views` count of the post with `slug`.
#[server(endpoint = "/increment_views")]
pub async fn increment_views(slug: String) -> Result<(), ServerFnError> {
    use crate::types::AppState;
    use leptos::prelude::expect_context;

    let AppState { db, .. } = expect_context::<AppState>();
    bump_views(db.as_ref(), &slug).await
}

#[cfg(feature = "ssr")]
mod store {
    use chrono::{DateTime, Utc};
    use core::fmt::Display;
    use leptos::prelude::ServerFnError;
    use leptos::server_fn::error::NoCustomError;
    use serde::{Deserialize, de::DeserializeOwned};
    use shared_utils::{RetryConfig, retry_async};
    use surrealdb::{Connection, Surreal};

    use crate::{
        dropdown::DropdownOption,
        filter::{
            AUTHOR_KEY, BRANDING_KEY, BlogFilter, CATEGORY_KEY, FilterSet, INDUSTRY_KEY,
            PortfolioFilter, QueryParams, TAG_KEY, validate,
        },
        listing::{Filtered, ListingPage, PageMeta},
        query::{
            ListingQuery, POSTS_PER_PAGE, PROJECTS_PER_PAGE, options_statement, taxonomy_table,
        },
        types::{BlogPayload, PortfolioPayload, Post, Project, STORAGE_URL, storage_url},
    };

    #[derive(Deserialize)]
    struct Total {
        total: usize,
    }

    fn server_error(context: &str, e: impl Display) -> ServerFnError {
        tracing::error!("{context}: {e}");
        ServerFnError::<NoCustomError>::ServerError(format!("{context}: {e}"))
    }

    /// Slugs contain only alphanumerics, hyphens and underscores.
    pub(crate) fn is_valid_slug(slug: &str) -> bool {
        !slug.is_empty()
            && slug.len() <= 200
            && slug
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }

    fn check_slug(slug: &str) -> Result<(), ServerFnError> {
        if is_valid_slug(slug) {
            Ok(())
        } else {
            Err(server_error(
                "Invalid slug format",
                format!("'{}'", slug.chars().take(50).collect::<String>()),
            ))
        }
    }

    /// Formats an RFC 3339 timestamp for display, leaving anything else as is.
    pub(crate) fn format_date(created_at: &str) -> String {
        DateTime::parse_from_rfc3339(created_at).map_or_else(
            |_| created_at.to_owned(),
            |parsed| {
                parsed
                    .with_timezone(&Utc)
                    .date_naive()
                    .format("%b %-d, %Y")
                    .to_string()
            },
        )
    }

    fn render_body(body: &str) -> Result<String, ServerFnError> {
        markdown::render(body, |path| storage_url(STORAGE_URL, path))
            .map_err(|e| server_error("Markdown error", e))
    }

    /// Runs `query` for the requested page, clamping the page into range.
    async fn select_page<C, T>(
        db: &Surreal<C>,
        context: &'static str,
        query: &ListingQuery,
        requested: usize,
        per_page: usize,
    ) -> Result<ListingPage<T>, ServerFnError>
    where
        C: Connection,
        T: DeserializeOwned,
    {
        let config = RetryConfig::from_env();

        let count = query.count_statement();
        let mut response = retry_async(context, config, || async {
            let mut request = db.query(count.as_str());
            for (name, value) in query.text_bindings() {
                request = request.bind((*name, value.clone()));
            }
            for (name, values) in query.list_bindings() {
                request = request.bind((*name, values.clone()));
            }
            request.await
        })
        .await
        .map_err(|e| server_error("Database error", e))?;
        let totals: Vec<Total> = response
            .take(0)
            .map_err(|e| server_error("Query error", e))?;
        let total = totals.first().map_or(0, |t| t.total);

        let meta = PageMeta::new(requested, per_page, total);
        let page = query.page_statement(meta.per_page, meta.offset());
        let mut response = retry_async(context, config, || async {
            let mut request = db.query(page.as_str());
            for (name, value) in query.text_bindings() {
                request = request.bind((*name, value.clone()));
            }
            for (name, values) in query.list_bindings() {
                request = request.bind((*name, values.clone()));
            }
            request.await
        })
        .await
        .map_err(|e| server_error("Database error", e))?;
        let items: Vec<T> = response
            .take(0)
            .map_err(|e| server_error("Query error", e))?;

        Ok(ListingPage { items, meta })
    }

    /// Loads the dropdown options of each taxonomy table, in order.
    /// Loads the options of each multi-select in `keys`, in order.
    async fn select_options<C: Connection>(
        db: &Surreal<C>,
        context: &'static str,
        keys: &[&str],
    ) -> Result<Vec<Vec<DropdownOption>>, ServerFnError> {
        let statements = keys
            .iter()
            .map(|key| {
                taxonomy_table(key)
                    .map(options_statement)
                    .ok_or_else(|| server_error("Unknown filter key", key))
            })
            .collect::<Result<Vec<_>, _>>()?
            .join(";\n");
        let mut response = retry_async(context, RetryConfig::from_env(), || async {
            db.query(statements.as_str()).await
        })
        .await
        .map_err(|e| server_error("Database error", e))?;

        let mut options = Vec::with_capacity(keys.len());
        for index in 0..keys.len() {
            let table: Vec<DropdownOption> = response
                .take(index)
                .map_err(|e| server_error("Query error", e))?;
            options.push(table);
        }
        Ok(options)
    }

    fn checked<F: FilterSet>(params: &QueryParams) -> Result<(F, usize), ServerFnError> {
        validate::<F>(params).map_err(|e| server_error("Invalid filter", e))?;
        Ok((F::from_params(params), params.page().unwrap_or(1)))
    }

    pub async fn load_posts<C: Connection>(
        db: &Surreal<C>,
        params: &QueryParams,
    ) -> Result<Filtered<Post>, ServerFnError> {
        let (filter, page) = checked::<BlogFilter>(params)?;
        let query = ListingQuery::for_posts(&filter);
        let mut listing: ListingPage<Post> =
            select_page(db, "filter_posts", &query, page, POSTS_PER_PAGE).await?;
        for post in &mut listing.items {
            post.created_at = format_date(&post.created_at);
        }
        Ok(Filtered {
            listing,
            applied: filter.to_params(),
        })
    }

    pub async fn load_projects<C: Connection>(
        db: &Surreal<C>,
        params: &QueryParams,
    ) -> Result<Filtered<Project>, ServerFnError> {
        let (filter, page) = checked::<PortfolioFilter>(params)?;
        let query = ListingQuery::for_projects(&filter);
        let mut listing: ListingPage<Project> =
            select_page(db, "filter_projects", &query, page, PROJECTS_PER_PAGE).await?;
        for project in &mut listing.items {
            project.created_at = format_date(&project.created_at);
        }
        Ok(Filtered {
            listing,
            applied: filter.to_params(),
        })
    }

    pub async fn load_blog<C: Connection>(
        db: &Surreal<C>,
        params: &QueryParams,
    ) -> Result<BlogPayload, ServerFnError> {
        let posts = load_posts(db, params).await?;
        let mut options = select_options(db, "blog_page", &[CATEGORY_KEY, TAG_KEY, AUTHOR_KEY])
            .await?
            .into_iter();
        Ok(BlogPayload {
            categories: options.next().unwrap_or_default(),
            tags: options.next().unwrap_or_default(),
            authors: options.next().unwrap_or_default(),
            posts,
        })
    }

    pub async fn load_portfolio<C: Connection>(
        db: &Surreal<C>,
        params: &QueryParams,
    ) -> Result<PortfolioPayload, ServerFnError> {
        let projects = load_projects(db, params).await?;
        let mut options = select_options(db, "portfolio_page", &[BRANDING_KEY, INDUSTRY_KEY])
            .await?
            .into_iter();
        Ok(PortfolioPayload {
            brandings: options.next().unwrap_or_default(),
            industries: options.next().unwrap_or_default(),
            projects,
        })
    }

    async fn select_published<C, T>(
        db: &Surreal<C>,
        context: &'static str,
        statement: &'static str,
        slug: &str,
    ) -> Result<Option<T>, ServerFnError>
    where
        C: Connection,
        T: DeserializeOwned,
    {
        check_slug(slug)?;
        let mut response = retry_async(context, RetryConfig::from_env(), || {
            let s = slug.to_owned();
            async move { db.query(statement).bind(("slug", s)).await }
        })
        .await
        .map_err(|e| server_error("Database error", e))?;
        let mut found: Vec<T> = response
            .take(0)
            .map_err(|e| server_error("Query error", e))?;
        Ok(if found.is_empty() {
            None
        } else {
            Some(found.swap_remove(0))
        })
    }

    pub async fn load_post<C: Connection>(
        db: &Surreal<C>,
        slug: &str,
    ) -> Result<Post, ServerFnError> {
        let mut post: Post = select_published(
            db,
            "select_post",
            "SELECT *, author.* FROM post WHERE slug = $slug AND is_published = true LIMIT 1",
            slug,
        )
        .await?
        .ok_or_else(|| server_error("Post not found", slug))?;
        post.created_at = format_date(&post.created_at);
        post.body = render_body(&post.body)?;
        Ok(post)
    }

    pub async fn load_project<C: Connection>(
        db: &Surreal<C>,
        slug: &str,
    ) -> Result<Project, ServerFnError> {
        let mut project: Project = select_published(
            db,
            "select_project",
            "SELECT * FROM project WHERE slug = $slug AND is_published = true LIMIT 1",
            slug,
        )
        .await?
        .ok_or_else(|| server_error("Project not found", slug))?;
        project.created_at = format_date(&project.created_at);
        project.body = render_body(&project.body)?;
        Ok(project)
    }

    pub async fn bump_views<C: Connection>(db: &Surreal<C>, slug: &str) -> Result<(), ServerFnError> {
        check_slug(slug)?;
        retry_async("increment_views", RetryConfig::from_env(), || {
            let s = slug.to_owned();
            async move {
                db.query("UPDATE post SET total_views += 1 WHERE slug = $slug")
                    .bind(("slug", s))
                    .await
            }
        })
        .await
        .map_err(|e| server_error("Database error", e))?;
        Ok(())
    }
}
