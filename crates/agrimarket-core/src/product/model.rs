//! Product domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::icon::product_icon;
use crate::farmer::Farmer;

/// Listing payload submitted by a farmer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub quantity: u32,
    pub unit: String,
    pub price: f64,
    #[serde(default)]
    pub description: String,
    pub location: String,
}

impl NewProduct {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        quantity: u32,
        unit: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            quantity,
            unit: unit.into(),
            price,
            description: String::new(),
            location: "Location not set".to_string(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }
}

/// A listing owned by exactly one farmer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    /// Owning farmer. Not referentially enforced by the store.
    pub farmer_id: String,
    pub name: String,
    pub category: String,
    pub quantity: u32,
    pub unit: String,
    pub price: f64,
    #[serde(default)]
    pub description: String,
    pub location: String,
    /// Emoji derived from the product name at creation time.
    pub image: String,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub inquiries: u64,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Builds a fresh listing with zeroed counters and a derived icon.
    pub fn from_listing(
        id: String,
        farmer_id: impl Into<String>,
        data: NewProduct,
        created_at: DateTime<Utc>,
    ) -> Self {
        let image = product_icon(&data.name).to_string();
        let NewProduct {
            name,
            category,
            quantity,
            unit,
            price,
            description,
            location,
        } = data;

        Self {
            id,
            farmer_id: farmer_id.into(),
            name,
            category,
            quantity,
            unit,
            price,
            description,
            location,
            image,
            views: 0,
            inquiries: 0,
            created_at,
        }
    }
}

/// A product together with the farmer who listed it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetail {
    pub product: Product,
    pub farmer: Farmer,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_listing_zeroes_counters_and_derives_icon() {
        let data = NewProduct::new("Fresh Tomatoes", "vegetables", 50, "kg", 30.0)
            .with_location("Nashik, Maharashtra");
        let product = Product::from_listing("1".to_string(), "f1", data, Utc::now());

        assert_eq!(product.views, 0);
        assert_eq!(product.inquiries, 0);
        assert_eq!(product.image, "🍅");
        assert_eq!(product.farmer_id, "f1");
        assert_eq!(product.location, "Nashik, Maharashtra");
    }

    #[test]
    fn test_missing_counters_read_as_zero() {
        let json = r#"{
            "id": "1", "farmerId": "f1", "name": "Rice", "category": "grains",
            "quantity": 10, "unit": "kg", "price": 45.5, "location": "Pune",
            "image": "🌾", "createdAt": "2024-01-01T00:00:00Z"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.views, 0);
        assert_eq!(product.inquiries, 0);
        assert_eq!(product.description, "");
    }
}
