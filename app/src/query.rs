//! SurrealQL for the filtered listings.
//!
//! Filter values are never interpolated: every condition refers to a bound
//! parameter, and [`ListingQuery`] hands the bindings back so the caller can
//! attach them to the request.

use crate::filter::{
    AUTHOR_KEY, BRANDING_KEY, BlogFilter, CATEGORY_KEY, INDUSTRY_KEY, PortfolioFilter, Selection,
    TAG_KEY,
};

pub const POSTS_PER_PAGE: usize = 9;
pub const PROJECTS_PER_PAGE: usize = 9;

/// Query for one listing table with its conditions and bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    table: &'static str,
    projection: &'static str,
    conditions: Vec<String>,
    texts: Vec<(&'static str, String)>,
    lists: Vec<(&'static str, Vec<String>)>,
}

impl ListingQuery {
    fn new(table: &'static str, projection: &'static str) -> Self {
        Self {
            table,
            projection,
            conditions: vec!["is_published = true".to_owned()],
            texts: Vec::new(),
            lists: Vec::new(),
        }
    }

    fn search(mut self, search: &str) -> Self {
        let search = search.trim().to_lowercase();
        if !search.is_empty() {
            self.conditions.push(
                "(string::lowercase(title) CONTAINS $search OR string::lowercase(summary) CONTAINS $search)"
                    .to_owned(),
            );
            self.texts.push(("search", search));
        }
        self
    }

    /// Matches records whose `field` array shares at least one identifier with
    /// `selection`.
    fn any_of(mut self, field: &'static str, selection: &Selection) -> Self {
        if !selection.is_empty() {
            self.conditions.push(format!("{field} CONTAINSANY ${field}"));
            self.lists
                .push((field, selection.iter().map(str::to_owned).collect()));
        }
        self
    }

    fn author(mut self, author: &str) -> Self {
        let author = author.trim();
        if !author.is_empty() {
            self.conditions.push(format!("author.slug = ${AUTHOR_KEY}"));
            self.texts.push((AUTHOR_KEY, author.to_owned()));
        }
        self
    }

    #[must_use]
    pub fn for_posts(filter: &BlogFilter) -> Self {
        Self::new("post", "*, author.*")
            .search(&filter.search)
            .any_of("categories", &filter.categories)
            .any_of("tags", &filter.tags)
            .author(&filter.author)
    }

    #[must_use]
    pub fn for_projects(filter: &PortfolioFilter) -> Self {
        Self::new("project", "*")
            .search(&filter.search)
            .any_of("brandings", &filter.brandings)
            .any_of("industries", &filter.industries)
    }

    #[must_use]
    pub fn condition(&self) -> String {
        self.conditions.join(" AND ")
    }

    /// Counts every matching record.
    #[must_use]
    pub fn count_statement(&self) -> String {
        format!(
            "SELECT count() AS total FROM {} WHERE {} GROUP ALL",
            self.table,
            self.condition()
        )
    }

    /// Selects one page of matching records, newest first.
    #[must_use]
    pub fn page_statement(&self, limit: usize, start: usize) -> String {
        format!(
            "SELECT {} FROM {} WHERE {} ORDER BY created_at DESC LIMIT {limit} START {start}",
            self.projection,
            self.table,
            self.condition()
        )
    }

    /// Single-valued bindings, named after their `$parameter`.
    #[must_use]
    pub fn text_bindings(&self) -> &[(&'static str, String)] {
        &self.texts
    }

    /// Identifier-list bindings, named after their `$parameter`.
    #[must_use]
    pub fn list_bindings(&self) -> &[(&'static str, Vec<String>)] {
        &self.lists
    }
}

/// Selects the dropdown options of a taxonomy table.
#[must_use]
pub fn options_statement(table: &str) -> String {
    format!("SELECT slug AS id, name AS label FROM {table} ORDER BY label")
}

/// Taxonomy table behind each multi-select wire key.
#[must_use]
pub fn taxonomy_table(key: &str) -> Option<&'static str> {
    match key {
        CATEGORY_KEY => Some("category"),
        TAG_KEY => Some("tag"),
        AUTHOR_KEY => Some("author"),
        BRANDING_KEY => Some("branding"),
        INDUSTRY_KEY => Some("industry"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unfiltered_posts_only_require_publication() {
        let query = ListingQuery::for_posts(&BlogFilter::default());
        assert_eq!(query.condition(), "is_published = true");
        assert!(query.text_bindings().is_empty());
        assert!(query.list_bindings().is_empty());
    }

    #[test]
    fn post_filters_become_bound_conditions() {
        let filter = BlogFilter {
            search: "  Rust ".to_owned(),
            categories: Selection::split("tech,design"),
            tags: Selection::new(),
            author: "jane".to_owned(),
        };
        let query = ListingQuery::for_posts(&filter);
        let condition = query.condition();

        assert!(condition.contains("CONTAINS $search"));
        assert!(condition.contains("categories CONTAINSANY $categories"));
        assert!(!condition.contains("$tags"));
        assert!(condition.contains("author.slug = $author"));
        assert_eq!(
            query.text_bindings(),
            &[("search", "rust".to_owned()), ("author", "jane".to_owned())]
        );
        assert_eq!(
            query.list_bindings(),
            &[("categories", vec!["tech".to_owned(), "design".to_owned()])]
        );
    }

    #[test]
    fn filter_values_never_reach_the_statement() {
        let filter = BlogFilter {
            search: "'; DELETE post; --".to_owned(),
            ..Default::default()
        };
        let query = ListingQuery::for_posts(&filter);
        assert!(!query.count_statement().contains("DELETE"));
        assert!(!query.page_statement(9, 0).contains("DELETE"));
    }

    #[test]
    fn project_filters_use_their_own_fields() {
        let filter = PortfolioFilter {
            search: String::new(),
            brandings: Selection::split("identity"),
            industries: Selection::split("retail,food"),
        };
        let query = ListingQuery::for_projects(&filter);
        assert_eq!(
            query.condition(),
            "is_published = true AND brandings CONTAINSANY $brandings AND industries CONTAINSANY $industries"
        );
    }

    #[test]
    fn statements_paginate_newest_first() {
        let query = ListingQuery::for_projects(&PortfolioFilter::default());
        assert_eq!(
            query.count_statement(),
            "SELECT count() AS total FROM project WHERE is_published = true GROUP ALL"
        );
        assert_eq!(
            query.page_statement(9, 18),
            "SELECT * FROM project WHERE is_published = true ORDER BY created_at DESC LIMIT 9 START 18"
        );
    }

    #[test]
    fn taxonomy_tables_cover_every_multi_select_key() {
        assert_eq!(taxonomy_table(CATEGORY_KEY), Some("category"));
        assert_eq!(taxonomy_table(INDUSTRY_KEY), Some("industry"));
        assert_eq!(taxonomy_table("search"), None);
        assert_eq!(
            options_statement("tag"),
            "SELECT slug AS id, name AS label FROM tag ORDER BY label"
        );
    }
}
