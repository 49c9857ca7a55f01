//! The fixed set of result orderings offered by the search page.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use super::Property;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOption {
    #[default]
    #[serde(rename = "date-desc")]
    DateDesc,
    #[serde(rename = "date-asc")]
    DateAsc,
    #[serde(rename = "rent-asc")]
    RentAsc,
    #[serde(rename = "rent-desc")]
    RentDesc,
    #[serde(rename = "sale-asc")]
    SaleAsc,
    #[serde(rename = "sale-desc")]
    SaleDesc,
    #[serde(rename = "beds-asc")]
    BedsAsc,
    #[serde(rename = "beds-desc")]
    BedsDesc,
    #[serde(rename = "size-asc")]
    SizeAsc,
    #[serde(rename = "size-desc")]
    SizeDesc,
}

/// A sort option as presented in the sort selector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SortChoice {
    pub value: SortOption,
    pub label: &'static str,
}

impl SortOption {
    /// Every option, in selector order.
    pub const ALL: [SortOption; 10] = [
        SortOption::DateDesc,
        SortOption::DateAsc,
        SortOption::RentAsc,
        SortOption::RentDesc,
        SortOption::SaleAsc,
        SortOption::SaleDesc,
        SortOption::BedsAsc,
        SortOption::BedsDesc,
        SortOption::SizeAsc,
        SortOption::SizeDesc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::DateDesc => "date-desc",
            SortOption::DateAsc => "date-asc",
            SortOption::RentAsc => "rent-asc",
            SortOption::RentDesc => "rent-desc",
            SortOption::SaleAsc => "sale-asc",
            SortOption::SaleDesc => "sale-desc",
            SortOption::BedsAsc => "beds-asc",
            SortOption::BedsDesc => "beds-desc",
            SortOption::SizeAsc => "size-asc",
            SortOption::SizeDesc => "size-desc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOption::DateDesc => "Newest First",
            SortOption::DateAsc => "Oldest First",
            SortOption::RentAsc => "Rent Price: Low to High",
            SortOption::RentDesc => "Rent Price: High to Low",
            SortOption::SaleAsc => "Sale Price: Low to High",
            SortOption::SaleDesc => "Sale Price: High to Low",
            SortOption::BedsAsc => "Bedrooms: Low to High",
            SortOption::BedsDesc => "Bedrooms: High to Low",
            SortOption::SizeAsc => "Size: Small to Large",
            SortOption::SizeDesc => "Size: Large to Small",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|option| option.as_str() == value)
    }

    pub fn choices() -> Vec<SortChoice> {
        Self::ALL
            .into_iter()
            .map(|value| SortChoice {
                value,
                label: value.label(),
            })
            .collect()
    }

    /// Total order over two properties. Missing numeric values count as 0.
    pub fn compare(&self, a: &Property, b: &Property) -> Ordering {
        fn num(value: Option<f64>) -> f64 {
            value.unwrap_or(0.0)
        }

        match self {
            SortOption::DateDesc => b.created_at.cmp(&a.created_at),
            SortOption::DateAsc => a.created_at.cmp(&b.created_at),
            SortOption::RentAsc => num(a.rent_price).total_cmp(&num(b.rent_price)),
            SortOption::RentDesc => num(b.rent_price).total_cmp(&num(a.rent_price)),
            SortOption::SaleAsc => num(a.sale_price).total_cmp(&num(b.sale_price)),
            SortOption::SaleDesc => num(b.sale_price).total_cmp(&num(a.sale_price)),
            SortOption::BedsAsc => num(a.beds).total_cmp(&num(b.beds)),
            SortOption::BedsDesc => num(b.beds).total_cmp(&num(a.beds)),
            SortOption::SizeAsc => num(a.size).total_cmp(&num(b.size)),
            SortOption::SizeDesc => num(b.size).total_cmp(&num(a.size)),
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
