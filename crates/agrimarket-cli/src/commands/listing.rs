//! Commands for the logged-in farmer's own listings and dashboard.

use agrimarket_core::KeyValueStore;
use agrimarket_core::product::NewProduct;
use anyhow::{Context as _, Result};
use clap::Args;

use super::{Context, product_line};

#[derive(Args, Debug, Clone)]
pub struct AddProductArgs {
    #[arg(long)]
    pub name: String,
    /// e.g. vegetables, fruits, grains, pulses, spices, dairy, other
    #[arg(long)]
    pub category: String,
    #[arg(long)]
    pub quantity: u32,
    /// kg, quintal, ton, dozen, litre, ...
    #[arg(long, default_value = "kg")]
    pub unit: String,
    /// Price per unit in rupees
    #[arg(long)]
    pub price: f64,
    #[arg(long, default_value = "")]
    pub description: String,
    /// Defaults to the farmer's registered "City, State"
    #[arg(long)]
    pub location: Option<String>,
}

pub fn add_product<S: KeyValueStore>(ctx: &Context<S>, args: AddProductArgs) -> Result<()> {
    let session = ctx.require_session()?;

    if args.name.trim().is_empty() || args.category.trim().is_empty() {
        anyhow::bail!("Product name and category are required");
    }
    if !args.price.is_finite() || args.price < 0.0 {
        anyhow::bail!("Price must be a non-negative number");
    }

    let mut data = NewProduct::new(
        args.name.trim(),
        args.category.trim(),
        args.quantity,
        args.unit.trim(),
        args.price,
    )
    .with_description(args.description.trim());

    let location = match args.location {
        Some(location) => Some(location),
        None => ctx
            .repo
            .list_farmers()?
            .into_iter()
            .find(|f| f.id == session.id)
            .filter(|f| !f.city.is_empty() && !f.state.is_empty())
            .map(|f| format!("{}, {}", f.city, f.state)),
    };
    if let Some(location) = location {
        data = data.with_location(location);
    }

    let product = ctx
        .repo
        .add_product(&session.id, data)
        .context("Failed to save product")?;
    println!("✅ Listed {}", product_line(&product));
    Ok(())
}

pub fn delete_product<S: KeyValueStore>(ctx: &Context<S>, product_id: &str) -> Result<()> {
    let session = ctx.require_session()?;

    let owned = ctx
        .repo
        .product(product_id)?
        .is_some_and(|p| p.farmer_id == session.id);
    ctx.repo.delete_product(product_id, &session.id)?;

    if owned {
        println!("🗑  Deleted product {}", product_id);
    } else {
        println!("No product {} among your listings.", product_id);
    }
    Ok(())
}

pub fn my_products<S: KeyValueStore>(ctx: &Context<S>) -> Result<()> {
    let session = ctx.require_session()?;
    let products = ctx.repo.list_farmer_products(&session.id)?;

    if products.is_empty() {
        println!("No products listed yet. Add one with `agrimarket add-product`.");
        return Ok(());
    }
    for product in &products {
        println!("{}", product_line(product));
    }
    Ok(())
}

pub fn dashboard<S: KeyValueStore>(ctx: &Context<S>, recent_logins: usize) -> Result<()> {
    let session = ctx.require_session()?;
    let stats = ctx.repo.dashboard_stats(&session.id)?;

    println!("📊 Dashboard for {}", session.name);
    println!("  Products:        {}", stats.total_products);
    println!("  Total views:     {}", stats.total_views);
    println!("  Inquiries:       {}", stats.total_inquiries);
    println!("  Unique viewers:  {}", stats.unique_viewers);

    let history = ctx.repo.login_history(&session.id)?;
    if recent_logins > 0 && !history.is_empty() {
        println!("\n🕑 Recent logins");
        for record in history.iter().rev().take(recent_logins) {
            let device = &record.metadata.device;
            let location = &record.metadata.location;
            println!(
                "  {} · {} {} on {} · {}, {}",
                record.login_time.format("%Y-%m-%d %H:%M UTC"),
                device.browser_name,
                device.browser_version,
                device.os_name,
                location.city,
                location.country
            );
        }
    }
    Ok(())
}
