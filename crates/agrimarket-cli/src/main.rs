use std::path::PathBuf;

use agrimarket_core::MarketRepository;
use agrimarket_infrastructure::{
    ConfigService, DeviceProbe, Enricher, JsonFileStore, resolve_store_dir,
};
use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{Context, account, browse, listing};

#[derive(Parser)]
#[command(name = "agrimarket")]
#[command(about = "AgriMarket - farmers list produce, buyers browse and contact them", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding the store files (overrides the config file)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Config file to use instead of the platform default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Skip all network lookups; visitor location stays "Unknown"
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new farmer account
    Register(account::RegisterArgs),
    /// Log in as a farmer
    Login {
        username: String,
        password: String,
    },
    /// End the current session
    Logout,
    /// Show the logged-in farmer
    Whoami,
    /// Reset a forgotten password with the security answers
    Recover(account::RecoverArgs),
    /// Rate a password as weak, medium or strong
    PasswordStrength { password: String },
    /// List a new product (requires login)
    AddProduct(listing::AddProductArgs),
    /// Remove one of your products (requires login)
    DeleteProduct { id: String },
    /// Show your listed products (requires login)
    MyProducts,
    /// Show views, inquiries and recent logins (requires login)
    Dashboard {
        /// How many recent logins to show
        #[arg(long, default_value_t = 5)]
        logins: usize,
    },
    /// Browse the catalogue
    Browse(browse::BrowseArgs),
    /// Show a product and its seller
    View { id: String },
    /// Get the seller's phone number for a product
    Contact { id: String },
    /// Resolve a 6-digit PIN code to city and state
    LookupPin { pin: String },
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_service = match &cli.config {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new()?,
    };
    let config = config_service.load().with_context(|| {
        format!(
            "Failed to load configuration from {}",
            config_service.path().display()
        )
    })?;
    init_tracing(&config.logging.level);

    let store_dir = resolve_store_dir(&config, cli.data_dir.as_deref())?;
    let store = JsonFileStore::open(&store_dir)
        .with_context(|| format!("Failed to open store at {}", store_dir.display()))?;

    let device = DeviceProbe::new("agrimarket", env!("CARGO_PKG_VERSION"));
    let enricher = if cli.offline {
        Enricher::offline(device)
    } else {
        Enricher::from_settings(&config.lookup, device)?
    };

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });
    }

    let ctx = Context::new(MarketRepository::new(store), enricher, cancel);

    match cli.command {
        Commands::Register(args) => account::register(&ctx, args).await?,
        Commands::Login { username, password } => account::login(&ctx, &username, &password).await?,
        Commands::Logout => account::logout(&ctx)?,
        Commands::Whoami => account::whoami(&ctx)?,
        Commands::Recover(args) => account::recover(&ctx, args)?,
        Commands::PasswordStrength { password } => account::show_password_strength(&password),
        Commands::AddProduct(args) => listing::add_product(&ctx, args)?,
        Commands::DeleteProduct { id } => listing::delete_product(&ctx, &id)?,
        Commands::MyProducts => listing::my_products(&ctx)?,
        Commands::Dashboard { logins } => listing::dashboard(&ctx, logins)?,
        Commands::Browse(args) => browse::browse(&ctx, &args)?,
        Commands::View { id } => browse::view(&ctx, &id).await?,
        Commands::Contact { id } => browse::contact(&ctx, &id)?,
        Commands::LookupPin { pin } => browse::lookup_pin(&ctx, &pin).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrimarket_core::farmer::SecurityQuestion;
    use agrimarket_core::product::SortOrder;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_browse_with_global_flags() {
        let cli = Cli::try_parse_from([
            "agrimarket",
            "browse",
            "--sort",
            "price-high",
            "--category",
            "fruits",
            "--offline",
            "--data-dir",
            "/tmp/market",
        ])
        .unwrap();

        assert!(cli.offline);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/market")));
        match cli.command {
            Commands::Browse(args) => {
                assert_eq!(args.sort, SortOrder::PriceHigh);
                assert_eq!(args.category.as_deref(), Some("fruits"));
            }
            _ => panic!("expected browse"),
        }
    }

    #[test]
    fn test_parse_register_questions() {
        let cli = Cli::try_parse_from([
            "agrimarket", "register", "--name", "Asha", "--mobile", "9876543210",
            "--username", "asha01", "--password", "harvest2024", "--pin", "411001",
            "--q1", "pet", "--a1", "moti", "--q2", "village", "--a2", "wai", "--accept-terms",
        ])
        .unwrap();

        match cli.command {
            Commands::Register(args) => {
                assert_eq!(args.q1, SecurityQuestion::Pet);
                assert_eq!(args.q2, SecurityQuestion::Village);
                assert_eq!(args.country, "India");
                assert!(args.accept_terms);
            }
            _ => panic!("expected register"),
        }
    }

    #[test]
    fn test_unknown_sort_is_rejected() {
        assert!(Cli::try_parse_from(["agrimarket", "browse", "--sort", "cheapest"]).is_err());
    }

    #[test]
    fn test_recover_answers_require_new_password() {
        assert!(
            Cli::try_parse_from(["agrimarket", "recover", "--username", "asha01", "--a1", "x"])
                .is_err()
        );
    }
}
