//! Buyer-side filtering and ordering of listings.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::model::Product;

/// Ordering applied to browse results.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SortOrder {
    /// Most recently listed first
    #[default]
    Newest,
    /// Cheapest first
    PriceLow,
    /// Most expensive first
    PriceHigh,
    /// Most viewed first
    Popular,
}

/// Filter and ordering for the buyer browse view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrowseQuery {
    /// Exact category match when set
    pub category: Option<String>,
    /// Case-insensitive substring of name or description when set
    pub search: Option<String>,
    pub sort: SortOrder,
}

impl BrowseQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    fn matches(&self, product: &Product) -> bool {
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            if product.category != category {
                return false;
            }
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            return product.name.to_lowercase().contains(&needle)
                || product.description.to_lowercase().contains(&needle);
        }
        true
    }
}

/// Filters and sorts `products` according to `query`.
///
/// Sorting is stable: products with equal keys keep their stored order.
pub fn browse_products(products: Vec<Product>, query: &BrowseQuery) -> Vec<Product> {
    let mut selected: Vec<Product> = products.into_iter().filter(|p| query.matches(p)).collect();

    match query.sort {
        SortOrder::PriceLow => selected.sort_by(|a, b| a.price.total_cmp(&b.price)),
        SortOrder::PriceHigh => selected.sort_by(|a, b| b.price.total_cmp(&a.price)),
        SortOrder::Popular => selected.sort_by(|a, b| b.views.cmp(&a.views)),
        SortOrder::Newest => selected.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }

    selected
}
