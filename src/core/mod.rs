pub mod codec;
pub mod error;
pub mod filters;
pub mod hierarchy;
pub mod search;
pub mod snapshot;
pub mod sort;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a property is offered for sale or for rent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum ListingType {
    Sale,
    Rent,
}

impl ListingType {
    /// The wire form used in query strings and JSON (`SALE` / `RENT`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingType::Sale => "SALE",
            ListingType::Rent => "RENT",
        }
    }

    /// Parses the wire form, ignoring ASCII case.
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("SALE") {
            Some(ListingType::Sale)
        } else if value.eq_ignore_ascii_case("RENT") {
            Some(ListingType::Rent)
        } else {
            None
        }
    }
}

/// JSON input is read with the same case rule as query strings.
impl TryFrom<String> for ListingType {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ListingType::parse(&value).ok_or(CoreError::MalformedFilterValue {
            key: "listingType".to_string(),
            value,
        })
    }
}

impl fmt::Display for ListingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A listing as delivered by the data layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub property_code: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub listing_type: Option<ListingType>,
    #[serde(default)]
    pub rent_price: Option<f64>,
    #[serde(default)]
    pub sale_price: Option<f64>,
    #[serde(default)]
    pub size: Option<f64>,
    #[serde(default)]
    pub beds: Option<f64>,
    #[serde(default)]
    pub baths: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub city_id: Option<String>,
    #[serde(default)]
    pub town_id: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub sub_category_id: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Property {
    /// Creates a bare property with only an id and a creation time.
    pub fn new(id: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: None,
            slug: None,
            description: None,
            property_code: None,
            address: None,
            listing_type: None,
            rent_price: None,
            sale_price: None,
            size: None,
            beds: None,
            baths: None,
            tags: Vec::new(),
            city_id: None,
            town_id: None,
            category_id: None,
            sub_category_id: None,
            created_at,
            updated_at: None,
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Town {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub city_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCategory {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub category_id: String,
}

pub use codec::{FilterCodec, SearchQuery};
pub use error::{CoreError, CoreResult};
pub use filters::{FilterKey, Filters, SizeRange};
pub use hierarchy::{CategoryHierarchy, Hierarchy, HierarchyNode, LocationHierarchy, PickerGroup};
pub use search::{ResultPage, SearchEngine};
pub use snapshot::{load_snapshot, Snapshot};
pub use sort::{SortChoice, SortOption};
