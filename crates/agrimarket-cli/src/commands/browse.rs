//! Buyer-side commands. None of them need a session.

use agrimarket_core::KeyValueStore;
use agrimarket_core::product::{BrowseQuery, SortOrder};
use anyhow::Result;
use clap::Args;

use super::{Context, format_price, product_line};

#[derive(Args, Debug, Clone, Default)]
pub struct BrowseArgs {
    /// Only show this category
    #[arg(long)]
    pub category: Option<String>,
    /// Case-insensitive text to find in name or description
    #[arg(long)]
    pub search: Option<String>,
    /// newest, price-low, price-high or popular
    #[arg(long, default_value_t = SortOrder::Newest)]
    pub sort: SortOrder,
}

impl BrowseArgs {
    fn query(&self) -> BrowseQuery {
        let mut query = BrowseQuery::new().sort(self.sort);
        if let Some(category) = &self.category {
            query = query.category(category.trim());
        }
        if let Some(search) = &self.search {
            query = query.search(search.trim());
        }
        query
    }
}

pub fn browse<S: KeyValueStore>(ctx: &Context<S>, args: &BrowseArgs) -> Result<()> {
    let products = ctx.repo.browse(&args.query())?;

    if products.is_empty() {
        println!("No products match.");
        return Ok(());
    }
    println!("{} product(s), sorted by {}", products.len(), args.sort);
    for product in &products {
        println!("{}", product_line(product));
    }
    Ok(())
}

/// Opens a product as a buyer; this counts as a view.
pub async fn view<S: KeyValueStore>(ctx: &Context<S>, product_id: &str) -> Result<()> {
    let metadata = ctx.enricher.collect(&ctx.cancel).await;

    let Some(detail) = ctx.repo.open_product(product_id, metadata)? else {
        anyhow::bail!("Product {} not found", product_id);
    };
    let (product, farmer) = (&detail.product, &detail.farmer);

    println!("{} {}", product.image, product.name);
    println!("  Category:   {}", product.category);
    println!("  Available:  {} {}", product.quantity, product.unit);
    println!("  Price:      {}", format_price(product.price, &product.unit));
    println!("  Location:   {}", product.location);
    if !product.description.is_empty() {
        println!("  About:      {}", product.description);
    }
    println!("  Seller:     {} · 📱 {}", farmer.name, farmer.masked_mobile());
    println!(
        "  Listed:     {}",
        product.created_at.format("%Y-%m-%d")
    );
    println!("Run `agrimarket contact {}` for the seller's number.", product.id);
    Ok(())
}

/// Reveals the seller's contact details; this counts as an inquiry.
pub fn contact<S: KeyValueStore>(ctx: &Context<S>, product_id: &str) -> Result<()> {
    let Some(farmer) = ctx.repo.contact_farmer(product_id)? else {
        anyhow::bail!("No seller found for product {}", product_id);
    };

    println!("📞 {} · {}", farmer.name, farmer.mobile);
    if !farmer.email.is_empty() {
        println!("✉️  {}", farmer.email);
    }
    if !farmer.city.is_empty() {
        println!("📍 {}, {}", farmer.city, farmer.state);
    }
    Ok(())
}

pub async fn lookup_pin<S: KeyValueStore>(ctx: &Context<S>, pin: &str) -> Result<()> {
    if ctx.enricher.is_offline() {
        anyhow::bail!("Postal lookups are disabled (offline mode)");
    }
    match ctx.enricher.resolve_pin(pin, &ctx.cancel).await {
        Some(location) => println!("{} ({} district)", location.display_name(), location.district),
        None => println!("No location found for {}", pin.trim()),
    }
    Ok(())
}
