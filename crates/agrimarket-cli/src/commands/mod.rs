pub mod account;
pub mod browse;
pub mod listing;

use agrimarket_core::KeyValueStore;
use agrimarket_core::MarketRepository;
use agrimarket_core::farmer::SessionProjection;
use agrimarket_core::product::Product;
use agrimarket_infrastructure::Enricher;
use anyhow::Result;
use tokio_util::sync::CancellationToken;

/// Everything a command needs: the repository, the enricher and a shutdown token.
pub struct Context<S> {
    pub repo: MarketRepository<S>,
    pub enricher: Enricher,
    pub cancel: CancellationToken,
}

impl<S: KeyValueStore> Context<S> {
    pub fn new(repo: MarketRepository<S>, enricher: Enricher, cancel: CancellationToken) -> Self {
        Self {
            repo,
            enricher,
            cancel,
        }
    }

    /// The logged-in farmer, or an error telling the user to log in.
    pub fn require_session(&self) -> Result<SessionProjection> {
        match self.repo.current_session()? {
            Some(session) => Ok(session),
            None => anyhow::bail!("Not logged in. Run `agrimarket login` first."),
        }
    }
}

pub(crate) fn format_price(price: f64, unit: &str) -> String {
    format!("₹{:.2}/{}", price, unit)
}

/// One-line summary used by product listings.
pub(crate) fn product_line(product: &Product) -> String {
    format!(
        "{} {} [{}] {} {} @ {} · {} · 👁 {} · 📞 {} (id {})",
        product.image,
        product.name,
        product.category,
        product.quantity,
        product.unit,
        format_price(product.price, &product.unit),
        product.location,
        product.views,
        product.inquiries,
        product.id
    )
}


#[cfg(test)]
mod tests {
    use super::*;
    use agrimarket_core::product::NewProduct;
    use chrono::Utc;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(40.0, "kg"), "₹40.00/kg");
        assert_eq!(format_price(12.5, "dozen"), "₹12.50/dozen");
    }

    #[test]
    fn test_product_line_mentions_id_and_icon() {
        let product = Product::from_listing(
            "1700000000000".to_string(),
            "f1",
            NewProduct::new("Tomato", "vegetables", 50, "kg", 40.0),
            Utc::now(),
        );
        let line = product_line(&product);
        assert!(line.starts_with("🍅 Tomato [vegetables]"));
        assert!(line.ends_with("(id 1700000000000)"));
    }

    #[test]
    fn test_require_session() {
        let ctx = test_support::context();
        let err = ctx.require_session().unwrap_err();
        assert!(err.to_string().contains("Not logged in"));
    }
}
