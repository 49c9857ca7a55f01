pub mod settings;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::core::search::DEFAULT_PAGE_SIZE;
use crate::core::{FilterCodec, SortOption};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    /// Listings per results page.
    pub page_size: usize,
    /// Ordering used when the URL carries no (valid) `sort`.
    pub default_sort: SortOption,
    /// Path the search page is served from; navigation URLs are built on it.
    pub base_path: String,
    /// How many featured listings the home page shows.
    pub featured_limit: usize,
    pub currency_symbol: String,
}

impl SearchConfig {
    pub fn load() -> Result<Self> {
        settings::load_config(None)
    }

    /// A codec whose implied defaults match this configuration.
    pub fn codec(&self) -> FilterCodec {
        FilterCodec::new(self.page_size, self.default_sort)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            default_sort: SortOption::DateDesc,
            base_path: "/search".to_string(),
            featured_limit: 6,
            currency_symbol: "$".to_string(),
        }
    }
}
