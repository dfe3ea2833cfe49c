//! AmpKicks CLI - Catalog checks and shopper state inspection.
//!
//! # Usage
//!
//! ```bash
//! # Validate a catalog file
//! ak-cli catalog validate data/products.json
//!
//! # Search a catalog the way the storefront listing does
//! ak-cli catalog search data/products.json --query runner --gender men --max-price 6000
//!
//! # Show the cart and order history kept by a storefront file store
//! ak-cli cart show --store data/store.json
//! ak-cli orders list --store data/store.json
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "ak-cli")]
#[command(author, version, about = "AmpKicks CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect product catalog files
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Inspect the stored cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Inspect placed orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Check that a catalog file parses and every product is valid
    Validate {
        /// Catalog JSON file
        path: PathBuf,
    },
    /// List products matching a filter
    Search {
        /// Catalog JSON file
        path: PathBuf,

        /// Case-insensitive text to find in name, description, or category
        #[arg(short, long)]
        query: Option<String>,

        /// Accepted category (repeatable)
        #[arg(short, long)]
        category: Vec<String>,

        /// Accepted gender: men, women, unisex, kids (repeatable)
        #[arg(short, long)]
        gender: Vec<String>,

        /// Inclusive price ceiling
        #[arg(short, long)]
        max_price: Option<u64>,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart lines and totals
    Show {
        /// Storefront store file (`AMPKICKS_STORE_PATH`)
        #[arg(short, long, env = "AMPKICKS_STORE_PATH")]
        store: PathBuf,
    },
}

#[derive(Subcommand)]
enum OrdersAction {
    /// Print every placed order
    List {
        /// Storefront store file (`AMPKICKS_STORE_PATH`)
        #[arg(short, long, env = "AMPKICKS_STORE_PATH")]
        store: PathBuf,
    },
}

fn main() {
    dotenvy::dotenv().ok();

    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::Validate { path } => commands::catalog::validate(&path)?,
            CatalogAction::Search {
                path,
                query,
                category,
                gender,
                max_price,
            } => {
                let criteria =
                    commands::catalog::criteria(query, category, &gender, max_price)?;
                commands::catalog::search(&path, &criteria)?;
            }
        },
        Commands::Cart { action } => match action {
            CartAction::Show { store } => commands::cart::show(&store)?,
        },
        Commands::Orders { action } => match action {
            OrdersAction::List { store } => commands::orders::list(&store)?,
        },
    }
    Ok(())
}
