//! Paging, filter, sort and search state of one list page.

use std::collections::BTreeMap;

use serde::Serialize;

/// Highest page a query may ask for; larger values are clamped.
pub const MAX_PAGE: usize = u32::MAX as usize;

/// Default sort direction for a freshly chosen column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub const fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }

    pub const fn flipped(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// Everything that determines which rows a list page shows.
///
/// Rebuilt from the query string on every request. Filters may carry several
/// values per key and are sent to the backend as repeated parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ListQuery {
    pub page: usize,
    pub per_page: usize,
    pub filters: BTreeMap<String, Vec<String>>,
    pub sort_field: Option<String>,
    pub sort_order: SortOrder,
    pub search: String,
}

impl ListQuery {
    pub fn new(per_page: usize) -> Self {
        Self {
            page: 1,
            per_page: per_page.max(1),
            filters: BTreeMap::new(),
            sort_field: None,
            sort_order: SortOrder::default(),
            search: String::new(),
        }
    }

    /// Parses a query string, keeping only the listed filter keys.
    ///
    /// Malformed numbers fall back to the defaults instead of failing the page.
    pub fn from_query_string(query: &str, filter_keys: &[&str], per_page: usize) -> Self {
        let params: BTreeMap<String, Vec<String>> =
            serde_html_form::from_str(query).unwrap_or_default();
        let mut parsed = Self::new(per_page);

        let pairs = params
            .into_iter()
            .flat_map(|(key, values)| values.into_iter().map(move |value| (key.clone(), value)));
        for (key, value) in pairs {
            let value = value.trim().to_string();
            match key.as_str() {
                "page" => parsed.page = value.parse().unwrap_or(1).clamp(1, MAX_PAGE),
                "per_page" => {
                    parsed.per_page = value.parse().unwrap_or(parsed.per_page).clamp(1, 1000)
                }
                "search" => parsed.search = value,
                "sort_by" if !value.is_empty() => parsed.sort_field = Some(value),
                "sort_order" => {
                    parsed.sort_order = SortOrder::parse(&value).unwrap_or_default();
                }
                key if filter_keys.contains(&key) && !value.is_empty() => {
                    let values = parsed.filters.entry(key.to_string()).or_default();
                    if !values.contains(&value) {
                        values.push(value);
                    }
                }
                _ => {}
            }
        }
        parsed
    }

    /// Adds `value` to the filter or removes it when already present.
    pub fn toggle_filter(&mut self, key: &str, value: &str) {
        let values = self.filters.entry(key.to_string()).or_default();
        if let Some(position) = values.iter().position(|held| held == value) {
            values.remove(position);
        } else {
            values.push(value.to_string());
        }
        if values.is_empty() {
            self.filters.remove(key);
        }
    }

    pub fn has_filter(&self, key: &str, value: &str) -> bool {
        self.filters
            .get(key)
            .is_some_and(|values| values.iter().any(|held| held == value))
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, MAX_PAGE);
    }

    /// Same field flips the order; a new field starts descending.
    pub fn sort_by(&mut self, field: &str) {
        if self.sort_field.as_deref() == Some(field) {
            self.sort_order = self.sort_order.flipped();
        } else {
            self.sort_field = Some(field.to_string());
            self.sort_order = SortOrder::Desc;
        }
    }

    /// Replaces the search term and returns to the first page.
    pub fn search(&mut self, term: &str) {
        self.search = term.trim().to_string();
        self.page = 1;
    }

    fn pairs(&self, include_paging: bool) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if include_paging {
            pairs.push(("page".to_string(), self.page.to_string()));
            pairs.push(("per_page".to_string(), self.per_page.to_string()));
        }
        for (key, values) in &self.filters {
            for value in values {
                pairs.push((key.clone(), value.clone()));
            }
        }
        if !self.search.is_empty() {
            pairs.push(("search".to_string(), self.search.clone()));
        }
        if let Some(field) = &self.sort_field {
            pairs.push(("sort_by".to_string(), field.clone()));
            pairs.push(("sort_order".to_string(), self.sort_order.as_str().to_string()));
        }
        pairs
    }

    /// Parameters of the backend list call.
    pub fn backend_params(&self) -> Vec<(String, String)> {
        self.pairs(true)
    }

    /// Query string reproducing this state in the panel's own links.
    pub fn to_query_string(&self) -> String {
        serde_html_form::to_string(self.pairs(true)).unwrap_or_default()
    }

    /// Copy with one change applied, for rendering links.
    pub fn with(&self, change: impl FnOnce(&mut ListQuery)) -> ListQuery {
        let mut next = self.clone();
        change(&mut next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_repeated_filters_and_ignores_unknown_keys() {
        let query = ListQuery::from_query_string(
            "page=2&status=active&status=banned&foo=bar&sort_by=name&sort_order=asc",
            &["status"],
            10,
        );
        assert_eq!(query.page, 2);
        assert_eq!(query.filters["status"], vec!["active", "banned"]);
        assert!(!query.filters.contains_key("foo"));
        assert_eq!(query.sort_field.as_deref(), Some("name"));
        assert_eq!(query.sort_order, SortOrder::Asc);
    }

    #[test]
    fn oversized_page_numbers_are_capped() {
        let query = ListQuery::from_query_string("page=9999999999999999999&per_page=10", &[], 10);
        assert_eq!(query.page, MAX_PAGE);
        // Beyond usize entirely: treated as malformed.
        let query = ListQuery::from_query_string("page=99999999999999999999999", &[], 10);
        assert_eq!(query.page, 1);

        let mut query = ListQuery::new(10);
        query.set_page(usize::MAX);
        assert_eq!(query.page, MAX_PAGE);
    }

    #[test]
    fn malformed_numbers_fall_back() {
        let query = ListQuery::from_query_string("page=abc&per_page=0", &[], 10);
        assert_eq!(query.page, 1);
        assert_eq!(query.per_page, 1);
    }

    #[test]
    fn toggling_twice_restores_the_query() {
        let original = ListQuery::from_query_string("status=active", &["status"], 10);
        let mut query = original.clone();
        query.toggle_filter("status", "inactive");
        assert!(query.has_filter("status", "inactive"));
        query.toggle_filter("status", "inactive");
        assert_eq!(query, original);

        query.toggle_filter("status", "active");
        assert!(query.filters.is_empty());
    }

    #[test]
    fn sorting_same_field_flips_and_new_field_starts_desc() {
        let mut query = ListQuery::new(10);
        query.sort_by("name");
        assert_eq!(query.sort_order, SortOrder::Desc);
        query.sort_by("name");
        assert_eq!(query.sort_order, SortOrder::Asc);
        query.sort_by("created_at");
        assert_eq!(query.sort_field.as_deref(), Some("created_at"));
        assert_eq!(query.sort_order, SortOrder::Desc);
    }

    #[test]
    fn backend_params_repeat_filter_keys() {
        let mut query = ListQuery::new(20);
        query.toggle_filter("status", "pending");
        query.toggle_filter("status", "approved");
        query.search("  Tehran ");
        let params = query.backend_params();
        assert_eq!(params[0], ("page".to_string(), "1".to_string()));
        assert_eq!(params[1], ("per_page".to_string(), "20".to_string()));
        assert_eq!(
            params.iter().filter(|(key, _)| key == "status").count(),
            2
        );
        assert!(params.contains(&("search".to_string(), "Tehran".to_string())));
        assert_eq!(
            query.to_query_string(),
            "page=1&per_page=20&status=pending&status=approved&search=Tehran"
        );
    }
}
