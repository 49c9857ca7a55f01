//! Maps search state to and from the URL query string.
//!
//! The query string is the record of a search: it is decoded once when a page
//! is opened and re-encoded after every change. Decoding is total. A value
//! that cannot be parsed is logged and treated as absent.

use std::collections::HashMap;
use url::form_urlencoded;

use super::error::{CoreError, CoreResult};
use super::filters::{is_valid_amount, FilterKey, Filters, SizeRange};
use super::search::DEFAULT_PAGE_SIZE;
use super::sort::SortOption;
use super::ListingType;

const SORT_KEY: &str = "sort";
const PAGE_KEY: &str = "page";
const LIMIT_KEY: &str = "limit";

/// Everything a search URL carries.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub filters: Filters,
    pub sort: SortOption,
    /// One-based page number.
    pub page: usize,
    pub limit: usize,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            filters: Filters::default(),
            sort: SortOption::default(),
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Encodes and decodes [`SearchQuery`] values.
///
/// `page_size` and `default_sort` decide which values are implied when a key is
/// missing, so `limit` is only written when it differs from `page_size`.
#[derive(Debug, Clone, Copy)]
pub struct FilterCodec {
    page_size: usize,
    default_sort: SortOption,
}

impl Default for FilterCodec {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, SortOption::default())
    }
}

impl FilterCodec {
    pub fn new(page_size: usize, default_sort: SortOption) -> Self {
        Self {
            page_size: page_size.max(1),
            default_sort,
        }
    }

    /// The query that an empty query string decodes to.
    pub fn empty_query(&self) -> SearchQuery {
        SearchQuery {
            filters: Filters::default(),
            sort: self.default_sort,
            page: 1,
            limit: self.page_size,
        }
    }

    /// The present filter fields as `(key, value)` pairs in canonical order.
    pub fn filter_pairs(filters: &Filters) -> Vec<(&'static str, String)> {
        filters
            .present_keys()
            .into_iter()
            .filter_map(|key| {
                let value = match key {
                    FilterKey::ListingType => filters.listing_type.map(|t| t.as_str().to_string()),
                    FilterKey::CityId => filters.city_id.clone(),
                    FilterKey::TownId => filters.town_id.clone(),
                    FilterKey::CategoryId => filters.category_id.clone(),
                    FilterKey::SubCategoryId => filters.sub_category_id.clone(),
                    FilterKey::MinPrice => filters.min_price.map(|v| v.to_string()),
                    FilterKey::MaxPrice => filters.max_price.map(|v| v.to_string()),
                    FilterKey::Beds => filters.beds.map(|v| v.to_string()),
                    FilterKey::Baths => filters.baths.map(|v| v.to_string()),
                    FilterKey::Size => filters
                        .size
                        .and_then(|range| serde_json::to_string(&range).ok()),
                    FilterKey::SearchTerm => filters.search_term.clone(),
                };
                value.map(|v| (key.as_str(), v))
            })
            .collect()
    }

    /// Serializes `query` as `application/x-www-form-urlencoded`.
    pub fn encode(&self, query: &SearchQuery) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in Self::filter_pairs(&query.filters) {
            serializer.append_pair(key, &value);
        }
        serializer.append_pair(SORT_KEY, query.sort.as_str());
        if query.page > 1 {
            serializer.append_pair(PAGE_KEY, &query.page.to_string());
        }
        if query.limit != self.page_size {
            serializer.append_pair(LIMIT_KEY, &query.limit.to_string());
        }
        serializer.finish()
    }

    /// `base_path?query`, or just `base_path` when the query string is empty.
    pub fn href(&self, base_path: &str, query: &SearchQuery) -> String {
        let encoded = self.encode(query);
        if encoded.is_empty() {
            base_path.to_string()
        } else {
            format!("{}?{}", base_path, encoded)
        }
    }

    /// Parses a query string, with or without its leading `?`.
    pub fn decode(&self, query_string: &str) -> SearchQuery {
        let raw = query_string.strip_prefix('?').unwrap_or(query_string);

        // First occurrence wins, like `URLSearchParams.get`.
        let mut params: HashMap<String, String> = HashMap::new();
        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            params
                .entry(key.into_owned())
                .or_insert_with(|| value.into_owned());
        }
        let params = Params(params);

        let filters = Filters {
            listing_type: params.listing_type("listingType"),
            city_id: params.text(&["cityId"]),
            town_id: params.text(&["townId"]),
            category_id: params.text(&["categoryId"]),
            sub_category_id: params.text(&["subCategoryId"]),
            min_price: params.number(&["minPrice"]),
            max_price: params.number(&["maxPrice"]),
            beds: params.number(&["beds", "minBeds"]),
            baths: params.number(&["baths", "maxBaths", "minBaths"]),
            size: params.size(),
            search_term: params.text(&["searchTerm", "search"]),
        };

        let sort = params
            .get(SORT_KEY)
            .and_then(|value| {
                let parsed = SortOption::parse(value);
                if parsed.is_none() {
                    report(malformed(SORT_KEY, value));
                }
                parsed
            })
            .unwrap_or(self.default_sort);

        SearchQuery {
            filters,
            sort,
            page: params.count(PAGE_KEY).unwrap_or(1),
            limit: params.count(LIMIT_KEY).unwrap_or(self.page_size),
        }
    }
}

fn malformed(key: &str, value: &str) -> CoreError {
    CoreError::MalformedFilterValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn report(error: CoreError) {
    tracing::warn!("Ignoring query parameter: {}", error);
}

/// Parses a finite, non-negative number.
fn parse_number(key: &str, value: &str) -> CoreResult<f64> {
    match value.trim().parse::<f64>() {
        Ok(number) if is_valid_amount(number) => Ok(number),
        _ => Err(malformed(key, value)),
    }
}

fn parse_size(value: &str) -> CoreResult<SizeRange> {
    let range: SizeRange =
        serde_json::from_str(value).map_err(|_| malformed(FilterKey::Size.as_str(), value))?;
    let valid = |bound: Option<f64>| bound.map_or(true, is_valid_amount);
    if valid(range.min) && valid(range.max) {
        Ok(range)
    } else {
        Err(malformed(FilterKey::Size.as_str(), value))
    }
}

struct Params(HashMap<String, String>);

impl Params {
    /// The raw value for `key`. Empty values count as missing.
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }

    /// The first of `keys` that carries a value.
    fn first(&self, keys: &[&'static str]) -> Option<(&'static str, &str)> {
        keys.iter().find_map(|&key| self.get(key).map(|value| (key, value)))
    }

    fn text(&self, keys: &[&'static str]) -> Option<String> {
        self.first(keys).map(|(_, value)| value.to_string())
    }

    fn number(&self, keys: &[&'static str]) -> Option<f64> {
        let (key, value) = self.first(keys)?;
        parse_number(key, value).map_err(report).ok()
    }

    fn count(&self, key: &str) -> Option<usize> {
        let value = self.get(key)?;
        match value.trim().parse::<usize>() {
            Ok(n) if n >= 1 => Some(n),
            _ => {
                report(malformed(key, value));
                None
            }
        }
    }

    fn listing_type(&self, key: &str) -> Option<ListingType> {
        let value = self.get(key)?;
        let parsed = ListingType::parse(value);
        if parsed.is_none() {
            report(malformed(key, value));
        }
        parsed
    }

    /// The JSON `size` value, or the legacy `minSize`/`maxSize` pair.
    fn size(&self) -> Option<SizeRange> {
        if let Some(value) = self.get(FilterKey::Size.as_str()) {
            match parse_size(value) {
                Ok(range) if !range.is_empty() => return Some(range),
                Ok(_) => {}
                Err(error) => report(error),
            }
        }
        let range = SizeRange {
            min: self.number(&["minSize"]),
            max: self.number(&["maxSize"]),
        };
        (!range.is_empty()).then_some(range)
    }
}
