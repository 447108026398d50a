//! Filter sets for the blog and portfolio listings and their flat wire form.
//!
//! A filter set travels between browser and server as [`QueryParams`], a flat
//! map of string keys to string values. Blank fields never appear in that map,
//! so an unfiltered listing is requested with an empty map and the server's
//! defaults apply. Multi-valued fields are comma-joined.

extern crate alloc;
use alloc::collections::BTreeMap;
use serde::{Deserialize, Serialize};

/// Separator used when a multi-valued field is flattened into a single value.
pub const SEPARATOR: char = ',';

/// Key carrying the requested page number.
pub const PAGE_KEY: &str = "page";

pub const SEARCH_KEY: &str = "search";
pub const CATEGORY_KEY: &str = "category";
pub const TAG_KEY: &str = "tag";
pub const AUTHOR_KEY: &str = "author";
pub const BRANDING_KEY: &str = "branding";
pub const INDUSTRY_KEY: &str = "industry";

/// A flat key/value request body. Keys whose value is blank are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryParams(BTreeMap<String, String>);

impl QueryParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key`, or removes the key when the value is blank.
    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.0.remove(key);
        } else {
            self.0.insert(key.to_owned(), trimmed.to_owned());
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns a copy of these params with `page` added.
    #[must_use]
    pub fn with_page(mut self, page: usize) -> Self {
        self.0.insert(PAGE_KEY.to_owned(), page.to_string());
        self
    }

    /// The requested page, if present and numeric.
    #[must_use]
    pub fn page(&self) -> Option<usize> {
        self.get(PAGE_KEY).and_then(|p| p.parse().ok())
    }

    /// Percent-encoded query string including the leading `?`, or an empty
    /// string when there is nothing to encode.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        if self.0.is_empty() {
            return String::new();
        }
        let pairs: Vec<(&str, &str)> = self.iter().collect();
        serde_urlencoded::to_string(pairs)
            .map(|encoded| format!("?{encoded}"))
            .unwrap_or_default()
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

/// An insertion-ordered set of option identifiers.
///
/// Equality ignores order: two selections are equal when they hold the same
/// identifiers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Selection(Vec<String>);

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|v| v == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Returns the selection with `id` added, or removed if it was present.
    #[must_use]
    pub fn toggled(&self, id: &str) -> Self {
        if self.contains(id) {
            Self(self.0.iter().filter(|v| *v != id).cloned().collect())
        } else {
            let mut next = self.clone();
            next.0.push(id.to_owned());
            next
        }
    }

    /// Flattens the selection into a single comma-joined value.
    #[must_use]
    pub fn join(&self) -> String {
        self.0.join(&SEPARATOR.to_string())
    }

    /// Parses a comma-joined value, skipping blank segments and duplicates.
    #[must_use]
    pub fn split(joined: &str) -> Self {
        joined.split(SEPARATOR).collect()
    }
}

impl<S: AsRef<str>> FromIterator<S> for Selection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut selection = Self::new();
        for id in iter {
            let id = id.as_ref().trim();
            if !id.is_empty() && !selection.contains(id) {
                selection.0.push(id.to_owned());
            }
        }
        selection
    }
}

impl PartialEq for Selection {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|id| other.contains(id))
    }
}

impl Eq for Selection {}

/// Common behaviour of the listing filter sets.
pub trait FilterSet: Clone + Default + PartialEq + Send + Sync + 'static {
    /// Every wire key this filter set reads or writes, `page` excluded.
    const KEYS: &'static [&'static str];

    /// Serializes the non-blank fields.
    fn to_params(&self) -> QueryParams;

    /// Rebuilds a filter set from a flat map, ignoring unknown keys.
    fn from_params(params: &QueryParams) -> Self;

    fn is_blank(&self) -> bool {
        self.to_params().is_empty()
    }
}

/// Filters of the blog listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogFilter {
    pub search: String,
    pub categories: Selection,
    pub tags: Selection,
    pub author: String,
}

impl FilterSet for BlogFilter {
    const KEYS: &'static [&'static str] = &[SEARCH_KEY, CATEGORY_KEY, TAG_KEY, AUTHOR_KEY];

    fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.insert(SEARCH_KEY, self.search.as_str());
        params.insert(CATEGORY_KEY, self.categories.join());
        params.insert(TAG_KEY, self.tags.join());
        params.insert(AUTHOR_KEY, self.author.as_str());
        params
    }

    fn from_params(params: &QueryParams) -> Self {
        Self {
            search: params.get(SEARCH_KEY).unwrap_or_default().to_owned(),
            categories: params.get(CATEGORY_KEY).map(Selection::split).unwrap_or_default(),
            tags: params.get(TAG_KEY).map(Selection::split).unwrap_or_default(),
            author: params.get(AUTHOR_KEY).unwrap_or_default().to_owned(),
        }
    }
}

/// Filters of the portfolio listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioFilter {
    pub search: String,
    pub brandings: Selection,
    pub industries: Selection,
}

impl FilterSet for PortfolioFilter {
    const KEYS: &'static [&'static str] = &[SEARCH_KEY, BRANDING_KEY, INDUSTRY_KEY];

    fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.insert(SEARCH_KEY, self.search.as_str());
        params.insert(BRANDING_KEY, self.brandings.join());
        params.insert(INDUSTRY_KEY, self.industries.join());
        params
    }

    fn from_params(params: &QueryParams) -> Self {
        Self {
            search: params.get(SEARCH_KEY).unwrap_or_default().to_owned(),
            brandings: params.get(BRANDING_KEY).map(Selection::split).unwrap_or_default(),
            industries: params.get(INDUSTRY_KEY).map(Selection::split).unwrap_or_default(),
        }
    }
}

#[cfg(any(feature = "ssr", test))]
pub use validation::{FilterError, validate};

#[cfg(any(feature = "ssr", test))]
mod validation {
    use super::{FilterSet, PAGE_KEY, QueryParams, SEARCH_KEY, Selection};
    use thiserror::Error;

    const MAX_SEARCH_LEN: usize = 200;
    const MAX_IDENTIFIER_LEN: usize = 100;

    #[derive(Debug, Clone, PartialEq, Eq, Error)]
    pub enum FilterError {
        #[error("search text exceeds 200 characters")]
        SearchTooLong,
        #[error("invalid identifier for '{key}': '{value}'")]
        InvalidIdentifier { key: String, value: String },
    }

    fn is_valid_identifier(id: &str) -> bool {
        !id.is_empty()
            && id.len() <= MAX_IDENTIFIER_LEN
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == ' ')
    }

    /// Checks the params a listing endpoint received before they reach a query.
    ///
    /// Keys outside `F::KEYS` and `page` are ignored; a malformed page is not an
    /// error since the listing falls back to the first page.
    pub fn validate<F: FilterSet>(params: &QueryParams) -> Result<(), FilterError> {
        for (key, value) in params.iter() {
            if key == PAGE_KEY || !F::KEYS.contains(&key) {
                continue;
            }
            if key == SEARCH_KEY {
                if value.chars().count() > MAX_SEARCH_LEN {
                    return Err(FilterError::SearchTooLong);
                }
                continue;
            }
            if let Some(bad) = Selection::split(value)
                .iter()
                .find(|id| !is_valid_identifier(id))
            {
                return Err(FilterError::InvalidIdentifier {
                    key: key.to_owned(),
                    value: bad.chars().take(50).collect(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(ids: &[&str]) -> Selection {
        ids.iter().collect()
    }

    #[test]
    fn blank_fields_never_reach_the_wire() {
        let filter = BlogFilter {
            search: "   ".to_owned(),
            categories: Selection::new(),
            tags: selection(&[""]),
            author: String::new(),
        };
        let params = filter.to_params();
        assert!(params.is_empty());
        assert!(params.iter().all(|(_, v)| !v.is_empty()));
        assert!(filter.is_blank());
    }

    #[test]
    fn two_categories_serialize_to_one_joined_key() {
        let filter = BlogFilter {
            categories: selection(&["tech", "design"]),
            ..Default::default()
        };
        let params = filter.to_params();
        assert_eq!(params.len(), 1);
        assert_eq!(params.get(CATEGORY_KEY), Some("tech,design"));
        assert_eq!(params.get(SEARCH_KEY), None);
        assert_eq!(params.get(TAG_KEY), None);
        assert_eq!(params.get(AUTHOR_KEY), None);
    }

    #[test]
    fn join_then_split_preserves_the_set() {
        let ids = selection(&["rust", "web-dev", "machine learning", "a_b"]);
        assert_eq!(Selection::split(&ids.join()), ids);
        assert_eq!(Selection::split(""), Selection::new());
    }

    #[test]
    fn split_ignores_blank_segments_and_duplicates() {
        let parsed = Selection::split("tech,, design ,tech,");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed.join(), "tech,design");
    }

    #[test]
    fn selection_equality_ignores_order() {
        assert_eq!(selection(&["a", "b"]), selection(&["b", "a"]));
        assert_ne!(selection(&["a"]), selection(&["a", "b"]));
    }

    #[test]
    fn toggling_adds_then_removes() {
        let empty = Selection::new();
        let one = empty.toggled("tech");
        assert!(one.contains("tech"));
        let two = one.toggled("design");
        assert_eq!(two.join(), "tech,design");
        let back = two.toggled("tech");
        assert_eq!(back.join(), "design");
    }

    #[test]
    fn page_is_added_alongside_filters() {
        let filter = BlogFilter {
            categories: selection(&["tech"]),
            ..Default::default()
        };
        let params = filter.to_params().with_page(3);
        assert_eq!(params.len(), 2);
        assert_eq!(params.get(PAGE_KEY), Some("3"));
        assert_eq!(params.get(CATEGORY_KEY), Some("tech"));
        assert_eq!(params.page(), Some(3));
    }

    #[test]
    fn blog_filter_survives_the_flat_map() {
        let filter = BlogFilter {
            search: "async".to_owned(),
            categories: selection(&["tech"]),
            tags: selection(&["rust", "tokio"]),
            author: "jane".to_owned(),
        };
        assert_eq!(BlogFilter::from_params(&filter.to_params()), filter);
    }

    #[test]
    fn portfolio_filter_survives_the_flat_map() {
        let filter = PortfolioFilter {
            search: String::new(),
            brandings: selection(&["logo", "identity"]),
            industries: selection(&["retail"]),
        };
        let params = filter.to_params();
        assert_eq!(params.get(SEARCH_KEY), None);
        assert_eq!(PortfolioFilter::from_params(&params), filter);
    }

    #[test]
    fn unknown_keys_are_ignored_when_decoding() {
        let params: QueryParams = [("branding", "logo"), ("category", "tech")]
            .into_iter()
            .collect();
        let filter = PortfolioFilter::from_params(&params);
        assert_eq!(filter.brandings, selection(&["logo"]));
        assert!(filter.industries.is_empty());
    }

    #[test]
    fn query_string_is_encoded() {
        let params: QueryParams = [("search", "rust & wasm"), ("category", "tech,design")]
            .into_iter()
            .collect();
        assert_eq!(
            params.to_query_string(),
            "?category=tech%2Cdesign&search=rust+%26+wasm"
        );
        assert_eq!(QueryParams::new().to_query_string(), "");
    }

    #[test]
    fn params_serialize_as_a_plain_object() {
        let params: QueryParams = [("tag", "rust")].into_iter().collect();
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json, serde_json::json!({ "tag": "rust" }));
    }

    #[test]
    fn validate_accepts_well_formed_params() {
        let params: QueryParams = [
            ("search", "how we ship"),
            ("category", "tech,web-dev"),
            ("page", "not-a-number"),
        ]
        .into_iter()
        .collect();
        assert_eq!(validate::<BlogFilter>(&params), Ok(()));
    }

    #[test]
    fn validate_rejects_injected_identifiers() {
        let params: QueryParams = [("tag", "rust,x'; DELETE post;--")].into_iter().collect();
        assert!(matches!(
            validate::<BlogFilter>(&params),
            Err(FilterError::InvalidIdentifier { key, .. }) if key == "tag"
        ));
    }

    #[test]
    fn validate_rejects_oversized_search() {
        let long = "a".repeat(201);
        let params: QueryParams = [("search", long.as_str())].into_iter().collect();
        assert_eq!(
            validate::<PortfolioFilter>(&params),
            Err(FilterError::SearchTooLong)
        );
    }
}
