//! Shell commands.

use std::fmt::Write as _;
use std::path::PathBuf;

use cart::{CartSession, CartStore, PersistenceBridge, ProductId, TAX_RATE_PERCENT};
use checkout::{CheckoutSequencer, InMemoryOrderService, Order, SessionIdentity};
use clap::{Parser, Subcommand};
use storage::FileStorage;

use crate::catalog::CatalogSeed;
use crate::config::Config;
use crate::error::CliError;

/// Browse the gallery catalog, manage the cart and check out.
#[derive(Debug, Parser)]
#[command(name = "storefront", version)]
pub struct Cli {
    /// Directory where the cart is saved.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Catalog seed file with products and users.
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Storage key for the cart.
    #[arg(long, global = true)]
    pub cart_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Applies command-line overrides on top of `config`.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(path) = &self.catalog {
            config.catalog_path = path.clone();
        }
        if let Some(key) = &self.cart_key {
            config.cart_key = key.clone();
        }
        config
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List catalog products.
    Products,
    /// Show the cart and its totals.
    Show,
    /// Add a product to the cart.
    Add {
        product_id: String,
        #[arg(default_value_t = 1)]
        quantity: u32,
    },
    /// Set the quantity of a product already in the cart (0 removes it).
    Set { product_id: String, quantity: u32 },
    /// Remove a product from the cart.
    Remove { product_id: String },
    /// Empty the cart.
    Clear,
    /// Sign in and place an order for the cart.
    Checkout {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
}

/// Runs a command and returns the text to print.
#[tracing::instrument(skip(config), fields(data_dir = %config.data_dir.display()))]
pub async fn run(command: Command, config: &Config) -> Result<String, CliError> {
    let load_seed = || CatalogSeed::load(&config.catalog_path);
    let bridge = PersistenceBridge::with_key(FileStorage::new(&config.data_dir), &config.cart_key);
    let mut session = CartSession::open(bridge);

    let output = match command {
        Command::Products => render_products(&load_seed()?),
        Command::Show => render_cart(session.store()),
        Command::Add {
            product_id,
            quantity,
        } => {
            let seed = load_seed()?;
            let product = seed.product(&ProductId::new(product_id))?;
            session.add_product(product, quantity)?;
            render_cart(session.store())
        }
        Command::Set {
            product_id,
            quantity,
        } => {
            let seed = load_seed()?;
            let product = seed.product(&ProductId::new(product_id))?;
            session.update_quantity(product, quantity)?;
            render_cart(session.store())
        }
        Command::Remove { product_id } => {
            if !session.remove(&ProductId::new(product_id.as_str())) {
                tracing::info!(%product_id, "product was not in the cart");
            }
            render_cart(session.store())
        }
        Command::Clear => {
            session.clear();
            render_cart(session.store())
        }
        Command::Checkout { email, password } => {
            let seed = load_seed()?;
            let user = seed.user_directory().sign_in(&email, &password)?;
            let sequencer = CheckoutSequencer::new(
                seed.product_catalog(),
                InMemoryOrderService::new(),
                SessionIdentity::signed_in(user),
            );
            let order = sequencer.checkout(&mut session).await?;
            tracing::warn!(
                catalog = %config.catalog_path.display(),
                "stock decrements are kept in memory only and are not written back to the catalog"
            );
            render_order(&order)
        }
    };

    if session.is_dirty() {
        tracing::warn!("cart changes could not be saved and will be lost on exit");
    }
    Ok(output)
}

/// Renders the catalog listing.
pub fn render_products(seed: &CatalogSeed) -> String {
    let mut out = String::new();
    for product in &seed.products {
        let artist = product.artist.as_deref().unwrap_or("-");
        let _ = writeln!(
            out,
            "{:<8} {:<28} {:<16} {:>12}  stock {}",
            product.id.as_str(),
            product.name,
            artist,
            product.price.to_string(),
            product.stock
        );
    }
    out
}

/// Renders the cart lines and totals.
pub fn render_cart(cart: &CartStore) -> String {
    if cart.is_empty() {
        return "Cart is empty\n".to_string();
    }

    let mut out = String::new();
    for line in cart.items() {
        let _ = writeln!(
            out,
            "{:<8} {:<28} {:>3} x {:>12} = {:>12}",
            line.product_id.as_str(),
            line.name,
            line.quantity,
            line.unit_price.to_string(),
            line.line_total().to_string()
        );
    }

    let totals = cart.totals();
    let _ = writeln!(out, "Subtotal      {:>12}", totals.subtotal.to_string());
    let _ = writeln!(out, "IVA ({TAX_RATE_PERCENT}%)     {:>12}", totals.iva.to_string());
    let _ = writeln!(out, "Total         {:>12}", totals.total.to_string());
    let _ = writeln!(out, "Items         {:>12}", totals.count);
    out
}

/// Renders a placed order.
pub fn render_order(order: &Order) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Order {} ({})", order.id, order.status);
    for line in &order.items {
        let _ = writeln!(
            out,
            "  {:<8} {:<28} {:>3} x {:>12}",
            line.product_id.as_str(),
            line.name,
            line.quantity,
            line.unit_price.to_string()
        );
    }
    let _ = writeln!(out, "Total {}", order.total);
    let _ = writeln!(
        out,
        "Note: catalog stock is not updated; the next run starts from the seed file again."
    );
    out
}
