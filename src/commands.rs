//! Command-line subcommands and their output.

use std::fmt::Write as _;

use apiary::cart::{CartStore, SqliteStorage};
use apiary::config::{Config, ShippingConfig};
use apiary::data::types::{Article, Order, Product};
use apiary::data::{ArticleKind, Catalog, DataError, ResilientFetcher, Source};
use apiary::query::{QueryDescriptor, SortKey, SortOrder};
use clap::Subcommand;
use color_eyre::{eyre::eyre, Report, Result};
use tracing::warn;

#[derive(Subcommand, Debug)]
pub enum Command {
  /// List products
  Products {
    /// Only show this category (honey, honeycomb, pollen, royal_jelly, propolis_spray)
    #[arg(long)]
    category: Option<String>,
    /// Sort by name or price
    #[arg(long)]
    sort: Option<SortKey>,
    /// asc or desc
    #[arg(long, default_value = "asc")]
    order: SortOrder,
  },
  /// Show a product by its slug
  Product { slug: String },
  /// List blog or health articles
  Articles { kind: ArticleKind },
  /// Show an order
  Order { id: String },
  /// Inspect or change the cart
  #[command(subcommand)]
  Cart(CartCommand),
}

#[derive(Subcommand, Debug)]
pub enum CartCommand {
  /// Show cart contents and totals
  Show,
  /// Add a product by slug or id
  Add {
    product: String,
    #[arg(default_value_t = 1)]
    quantity: u32,
  },
  /// Remove one unit of a product
  Decrease { product_id: String },
  /// Remove a product entirely
  Remove { product_id: String },
  /// Empty the cart
  Clear,
}

pub async fn run(command: Command, config: &Config) -> Result<()> {
  let catalog = Catalog::new(ResilientFetcher::from_config(config)?);

  match command {
    Command::Products {
      category,
      sort,
      order,
    } => {
      let mut query = QueryDescriptor::new();
      query.category = category;
      query.sort_by = sort;
      query.order = order;

      let products = catalog.products(&query).await.map_err(user_facing)?;
      print!("{}", render_products(&products.data, products.source));
    }
    Command::Product { slug } => {
      let product = catalog
        .product_by_slug(&slug)
        .await
        .map_err(user_facing)?
        .ok_or_else(|| eyre!("Product not found: {}", slug))?;
      print!("{}", render_product(&product));
    }
    Command::Articles { kind } => {
      let articles = catalog.articles(kind).await.map_err(user_facing)?;
      print!("{}", render_articles(&articles.data));
    }
    Command::Order { id } => {
      let order = catalog
        .order(&id)
        .await
        .map_err(user_facing)?
        .ok_or_else(|| eyre!("Order not found: {}", id))?;
      print!("{}", render_order(&order));
    }
    Command::Cart(cart_command) => run_cart(cart_command, &catalog, config).await?,
  }

  Ok(())
}

async fn run_cart(command: CartCommand, catalog: &Catalog, config: &Config) -> Result<()> {
  let mut cart = open_cart(config)?;

  match command {
    CartCommand::Show => {}
    CartCommand::Add { product, quantity } => {
      let found = catalog
        .product(&product)
        .await
        .map_err(user_facing)?
        .ok_or_else(|| eyre!("Product not found: {}", product))?;
      let before = cart.state().get(&found.id).map_or(0, |l| l.quantity);
      cart.add(&found, quantity);
      let after = cart.state().get(&found.id).map_or(0, |l| l.quantity);
      if after < before.saturating_add(quantity) {
        println!("Only {} of {} in stock.", found.stock, found.name);
      }
    }
    CartCommand::Decrease { product_id } => cart.decrease(&product_id),
    CartCommand::Remove { product_id } => cart.remove(&product_id),
    CartCommand::Clear => cart.clear(),
  }

  print!("{}", render_cart(&cart, &config.shipping));
  Ok(())
}

fn open_cart(config: &Config) -> Result<CartStore> {
  let path = config.cart.database_path()?;
  match SqliteStorage::open(&path) {
    Ok(storage) => Ok(CartStore::initialize(storage)),
    Err(e) => {
      warn!(error = %e, "cart storage unavailable, changes will not be saved");
      Ok(CartStore::detached())
    }
  }
}

/// Collapse "both sources failed" into the generic message users see.
fn user_facing(e: DataError) -> Report {
  if e.is_unavailable() {
    Report::new(e).wrap_err("Data is currently unavailable. Please try again later.")
  } else {
    Report::new(e)
  }
}

fn render_products(products: &[Product], source: Source) -> String {
  let mut out = String::new();
  if products.is_empty() {
    out.push_str("No products found.\n");
  }
  for p in products {
    let _ = write!(out, "{:<6} {:<28} {:>6} ден.", p.id, p.name, p.price);
    if p.discount > 0 {
      let _ = write!(out, " (-{}%)", p.discount);
    }
    let stock = if p.stock == 0 {
      "out of stock".to_string()
    } else {
      format!("{} in stock", p.stock)
    };
    let _ = writeln!(out, "  {}  [{}]", stock, p.category);
  }
  if source == Source::Fallback {
    out.push_str("(served from bundled data)\n");
  }
  out
}

fn render_product(p: &Product) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "{} ({})", p.name, p.id);
  let _ = writeln!(out, "  slug:     {}", p.slug());
  let _ = writeln!(out, "  category: {}", p.category);
  let _ = writeln!(out, "  price:    {} ден.", p.price);
  if p.discount > 0 {
    let _ = writeln!(out, "  discount: {}%", p.discount);
  }
  if let Some(weight) = p.weight {
    let _ = writeln!(out, "  weight:   {} g", weight);
  }
  let _ = writeln!(out, "  stock:    {}", p.stock);
  for (key, value) in &p.attributes {
    if let Some(text) = value.as_str().filter(|t| !t.is_empty()) {
      let _ = writeln!(out, "  {}: {}", key, text);
    }
  }
  out
}

fn render_articles(articles: &[Article]) -> String {
  let mut out = String::new();
  for a in articles {
    let _ = writeln!(out, "{}  {}  /{}", a.created_at, a.title, a.slug);
  }
  out
}

fn render_order(order: &Order) -> String {
  let mut out = String::new();
  let status = if order.status { "fulfilled" } else { "pending" };
  let _ = writeln!(out, "Order #{} ({})", order.order_id, status);
  let _ = writeln!(
    out,
    "  {} {}, {}, {} {}",
    order.first_name, order.last_name, order.address, order.postal_code, order.city
  );
  for item in &order.cart.items {
    let _ = writeln!(out, "  {} x {} @ {} ден.", item.quantity, item.name, item.price);
  }
  let summary = &order.cart.price_summary;
  let _ = writeln!(
    out,
    "  subtotal {} / shipping {} / total {} ден.",
    summary.subtotal, summary.shipping, summary.total
  );
  out
}

fn render_cart(cart: &CartStore, shipping: &ShippingConfig) -> String {
  let mut out = String::new();
  if cart.items().is_empty() {
    out.push_str("Cart is empty.\n");
    return out;
  }

  for line in cart.items() {
    let _ = writeln!(
      out,
      "{:<6} {:<28} {:>3} x {:>6} = {:>7} ден.",
      line.product_id,
      line.snapshot.name,
      line.quantity,
      line.unit_price(),
      line.line_total()
    );
  }

  let summary = cart.price_summary(shipping);
  let _ = writeln!(
    out,
    "{} items, {} products",
    cart.total_items(),
    cart.total_unique_products()
  );
  let _ = writeln!(out, "Subtotal: {} ден.", summary.subtotal);
  let _ = writeln!(out, "Shipping: {} ден.", summary.shipping);
  if summary.remaining_for_free_shipping > 0 {
    let _ = writeln!(
      out,
      "  {} ден. more for free shipping",
      summary.remaining_for_free_shipping
    );
  }
  let _ = writeln!(out, "Total:    {} ден.", summary.total);
  out
}
