//! Cosmetica CLI - drive the storefront cart and checkout from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Add two jars of cream to the cart and look at it
//! cosmetica cart add --id 1 --name "Cream" --price 20 --quantity 2
//! cosmetica cart show
//!
//! # Browse the catalog
//! cosmetica catalog categories
//! cosmetica catalog products --category 3
//!
//! # Place the order with a bank slip
//! cosmetica checkout --user-id 7 --first-name Nadia ... --slip slip.jpg
//!
//! # Order history and connectivity
//! cosmetica orders --user-id 7
//! cosmetica health
//! ```
//!
//! # Commands
//!
//! - `cart` - Inspect and change the persisted cart
//! - `catalog` - Browse products and categories
//! - `checkout` - Run the details and payment steps
//! - `orders` - List a customer's orders
//! - `health` - Probe the backend

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use cosmetica_core::{CategoryId, ProductId, UserId};
use cosmetica_storefront::StorefrontError;
use cosmetica_storefront::config::StorefrontConfig;
use rust_decimal::Decimal;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "cosmetica")]
#[command(author, version, about = "Cosmetica storefront client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Browse the catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Place an order for the current cart
    Checkout(CheckoutArgs),
    /// List orders placed by a customer
    Orders {
        /// Customer ID
        #[arg(short, long)]
        user_id: UserId,
    },
    /// Check that the backend is reachable
    Health,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and total
    Show,
    /// Add a product, merging with an existing line
    Add {
        /// Product ID
        #[arg(long)]
        id: ProductId,

        /// Product name
        #[arg(long)]
        name: String,

        /// Unit price
        #[arg(long)]
        price: Decimal,

        /// Product image URL
        #[arg(long)]
        image: Option<String>,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a product line
    Remove {
        /// Product ID
        #[arg(long)]
        id: ProductId,
    },
    /// Set the quantity of a product line (values below 1 become 1)
    Set {
        /// Product ID
        #[arg(long)]
        id: ProductId,

        /// New quantity
        #[arg(short, long, allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove every line
    Clear,
    /// Open or close the cart drawer (flips it without --state)
    Open {
        /// Explicit visibility
        #[arg(long, action = clap::ArgAction::Set)]
        state: Option<bool>,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products, optionally within one category
    Products {
        /// Category ID
        #[arg(long)]
        category: Option<CategoryId>,
    },
    /// Show one product
    Product {
        /// Product ID
        #[arg(long)]
        id: ProductId,
    },
    /// List categories
    Categories,
}

#[derive(clap::Args)]
struct CheckoutArgs {
    /// Customer ID placing the order
    #[arg(long)]
    user_id: UserId,

    #[arg(long, default_value = "")]
    first_name: String,

    #[arg(long, default_value = "")]
    last_name: String,

    #[arg(long, default_value = "")]
    email: String,

    /// 10-digit phone number
    #[arg(long, default_value = "")]
    phone: String,

    #[arg(long, default_value = "")]
    address: String,

    #[arg(long, default_value = "")]
    city: String,

    #[arg(long, default_value = "")]
    state: String,

    #[arg(long, default_value = "")]
    country: String,

    #[arg(long, default_value = "")]
    postal_code: String,

    /// Payment slip image
    #[arg(long)]
    slip: Option<PathBuf>,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Map tracing levels to Sentry: warnings and errors become events, the rest
/// breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt().with_writer(std::io::stderr).init();
            tracing::error!("Failed to load configuration: {e}");
            return ExitCode::from(2);
        }
    };

    // Sentry must be initialized before the subscriber so the layer has a hub
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cosmetica_storefront=info,cosmetica_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    // The Sentry guard must drop before the process exits
    match run(cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            e.report();
            tracing::error!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: &StorefrontConfig) -> Result<(), StorefrontError> {
    match cli.command {
        Commands::Cart { action } => {
            let mut cart = commands::cart::open(config)?;
            match action {
                CartAction::Show => {}
                CartAction::Add {
                    id,
                    name,
                    price,
                    image,
                    quantity,
                } => commands::cart::add(&mut cart, id, name, price, image, quantity)?,
                CartAction::Remove { id } => commands::cart::remove(&mut cart, id),
                CartAction::Set { id, quantity } => commands::cart::set(&mut cart, id, quantity),
                CartAction::Clear => commands::cart::clear(&mut cart),
                CartAction::Open { state } => commands::cart::open_drawer(&mut cart, state),
            }
            commands::cart::show(&cart, config.currency)?;
        }
        Commands::Catalog { action } => {
            let client = commands::client(config)?;
            match action {
                CatalogAction::Products { category } => {
                    commands::catalog::products(&client, category, config.currency).await?;
                }
                CatalogAction::Product { id } => {
                    commands::catalog::product(&client, id, config.currency).await?;
                }
                CatalogAction::Categories => commands::catalog::categories(&client).await?,
            }
        }
        Commands::Checkout(args) => {
            let form = args.shipping_form();
            commands::checkout::run(config, args.user_id, form, args.slip.as_deref()).await?;
        }
        Commands::Orders { user_id } => {
            let client = commands::client(config)?;
            commands::orders::list(&client, user_id, config.currency).await?;
        }
        Commands::Health => commands::health::probe(config).await?,
    }
    Ok(())
}

impl CheckoutArgs {
    fn shipping_form(&self) -> cosmetica_storefront::checkout::ShippingForm {
        cosmetica_storefront::checkout::ShippingForm {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            country: self.country.clone(),
            postal_code: self.postal_code.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_cart_add() {
        let cli = Cli::try_parse_from([
            "cosmetica", "cart", "add", "--id", "1", "--name", "Cream", "--price", "20", "-q", "2",
        ]);
        let Ok(Cli {
            command: Commands::Cart {
                action: CartAction::Add { id, quantity, price, .. },
            },
        }) = cli
        else {
            panic!("expected cart add");
        };
        assert_eq!(id, ProductId::new(1));
        assert_eq!(quantity, 2);
        assert_eq!(price, Decimal::from(20));
    }

    #[test]
    fn test_parse_negative_quantity() {
        let cli = Cli::try_parse_from(["cosmetica", "cart", "set", "--id", "4", "-q", "-3"]);
        assert!(matches!(
            cli,
            Ok(Cli {
                command: Commands::Cart {
                    action: CartAction::Set { quantity: -3, .. }
                }
            })
        ));
    }
}
