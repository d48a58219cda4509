//! Puppyracer CLI - Cart and catalog tools.
//!
//! # Usage
//!
//! ```bash
//! # Show the persisted cart
//! pr-cli cart show
//!
//! # Add a product from the catalog
//! pr-cli cart add 4 -q 2
//!
//! # Browse the catalog
//! pr-cli products list --category snacks
//! ```
//!
//! # Commands
//!
//! - `cart` - Inspect and modify the cart stored in the storage directory
//! - `products` - Browse the product catalog
//!
//! Configuration is read from the same environment variables as the
//! storefront server; `--storage-dir` and `--catalog` override them.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use puppyracer_core::ProductId;
use puppyracer_storefront::catalog::Catalog;
use puppyracer_storefront::config::StorefrontConfig;

mod commands;

use commands::CommandError;

#[derive(Parser)]
#[command(name = "pr-cli")]
#[command(author, version, about = "Puppyracer CLI tools")]
struct Cli {
    /// Directory holding the persisted cart
    #[arg(long, global = true)]
    storage_dir: Option<PathBuf>,

    /// YAML catalog to use instead of the built-in one
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and modify the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Browse the product catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart lines and totals
    Show,
    /// Add a catalog product
    Add {
        /// Product ID
        id: ProductId,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a line
    Remove {
        /// Product ID
        id: ProductId,
    },
    /// Increase a line's quantity by one
    Increase {
        /// Product ID
        id: ProductId,
    },
    /// Decrease a line's quantity by one
    Decrease {
        /// Product ID
        id: ProductId,
    },
    /// Set a line's quantity (0 or less removes it)
    Set {
        /// Product ID
        id: ProductId,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List products
    List {
        /// Only products in this category
        #[arg(short, long)]
        category: Option<String>,

        /// Search name, description and category
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Show a single product
    Show {
        /// Product ID
        id: ProductId,
    },
}

fn main() {
    // Defaults to info so command output is visible without RUST_LOG
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CommandError> {
    let mut config = StorefrontConfig::from_env()?;
    if let Some(dir) = cli.storage_dir {
        config.storage_dir = dir;
    }
    if let Some(path) = cli.catalog {
        config.catalog_path = Some(path);
    }

    let catalog = Catalog::load(config.catalog_path.as_deref())?;

    match cli.command {
        Commands::Cart { action } => {
            let mut cart = commands::cart::open(&config.storage_dir)?;
            match action {
                CartAction::Show => {}
                CartAction::Add { id, quantity } => {
                    commands::cart::add(&mut cart, &catalog, id, quantity)?;
                }
                CartAction::Remove { id } => {
                    commands::cart::remove(&mut cart, id)?;
                }
                CartAction::Increase { id } => {
                    commands::cart::increase(&mut cart, id)?;
                }
                CartAction::Decrease { id } => {
                    commands::cart::decrease(&mut cart, id)?;
                }
                CartAction::Set { id, quantity } => {
                    commands::cart::set(&mut cart, id, quantity)?;
                }
                CartAction::Clear => commands::cart::clear(&mut cart),
            }
            commands::cart::show(&cart);
        }
        Commands::Products { action } => match action {
            ProductsAction::List { category, search } => {
                commands::products::list(&catalog, category.as_deref(), &search);
            }
            ProductsAction::Show { id } => {
                commands::products::show(&catalog, id)?;
            }
        },
    }
    Ok(())
}
