//! Product catalog commands
//!
//! Commands: list, show, add, update, low-stock

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use invctl_core::models::{NewProduct, Product, ProductUpdate};
use invctl_db::store;
use rust_decimal::Decimal;

#[derive(Parser, Debug)]
pub struct ProductArgs {
    #[command(subcommand)]
    pub command: ProductCommands,
}

#[derive(Subcommand, Debug)]
pub enum ProductCommands {
    /// List products, optionally filtered by category
    List(ListArgs),
    /// Show a single product by SKU
    Show(ShowArgs),
    /// Add a product to the catalog
    Add(AddArgs),
    /// Update product fields by SKU
    Update(UpdateArgs),
    /// List products at or below their reorder level
    LowStock(LowStockArgs),
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Only show products in this category
    #[arg(long)]
    pub category: Option<String>,

    /// Emit JSON instead of the table
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Product SKU
    pub sku: String,

    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct AddArgs {
    /// Product name
    #[arg(long)]
    pub name: String,

    /// Stock keeping unit (unique)
    #[arg(long)]
    pub sku: String,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    /// Unit price, e.g. 12.50
    #[arg(long)]
    pub price: Decimal,

    /// Initial stock level
    #[arg(long, default_value = "0")]
    pub quantity: i32,

    /// Reorder when stock falls to this level
    #[arg(long = "reorder-level", default_value = "5")]
    pub reorder_level: i32,

    /// Quantity to reorder at a time
    #[arg(long = "reorder-quantity", default_value = "10")]
    pub reorder_quantity: i32,

    /// Supplier id
    #[arg(long)]
    pub supplier: Option<i32>,
}

#[derive(Parser, Debug)]
pub struct UpdateArgs {
    /// Product SKU
    pub sku: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub price: Option<Decimal>,

    /// Set the absolute stock level
    #[arg(long)]
    pub quantity: Option<i32>,

    #[arg(long = "reorder-level")]
    pub reorder_level: Option<i32>,

    #[arg(long = "reorder-quantity")]
    pub reorder_quantity: Option<i32>,

    #[arg(long)]
    pub supplier: Option<i32>,
}

#[derive(Parser, Debug)]
pub struct LowStockArgs {
    #[arg(long)]
    pub json: bool,
}

pub async fn run_product(args: ProductArgs) -> Result<()> {
    match args.command {
        ProductCommands::List(args) => run_list(args).await,
        ProductCommands::Show(args) => run_show(args).await,
        ProductCommands::Add(args) => run_add(args).await,
        ProductCommands::Update(args) => run_update(args).await,
        ProductCommands::LowStock(args) => run_low_stock(args).await,
    }
}

async fn run_list(args: ListArgs) -> Result<()> {
    let pool = super::open_pool().await?;
    let products = store::list_products(&pool, args.category.as_deref()).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&products)?);
    } else {
        print_product_table(&products);
    }
    Ok(())
}

async fn run_show(args: ShowArgs) -> Result<()> {
    let pool = super::open_pool().await?;
    let product = store::get_product_by_sku(&pool, &args.sku)
        .await?
        .ok_or_else(|| anyhow!("product '{}' not found", args.sku))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&product)?);
    } else {
        print_product_detail(&product);
    }
    Ok(())
}

async fn run_add(args: AddArgs) -> Result<()> {
    let pool = super::open_pool().await?;
    let product = store::create_product(
        &pool,
        &NewProduct {
            name: args.name,
            sku: args.sku,
            description: args.description,
            category: args.category,
            unit_price: args.price,
            quantity_in_stock: args.quantity,
            reorder_level: args.reorder_level,
            reorder_quantity: args.reorder_quantity,
            supplier_id: args.supplier,
        },
    )
    .await?;

    println!("Added product {} ({})", product.sku, product.name);
    Ok(())
}

async fn run_update(args: UpdateArgs) -> Result<()> {
    let pool = super::open_pool().await?;
    let update = ProductUpdate {
        name: args.name,
        description: args.description,
        category: args.category,
        unit_price: args.price,
        quantity_in_stock: args.quantity,
        reorder_level: args.reorder_level,
        reorder_quantity: args.reorder_quantity,
        supplier_id: args.supplier,
    };

    if update.is_empty() {
        return Err(anyhow!("no fields to update; pass at least one --option"));
    }

    let product = store::update_product(&pool, &args.sku, &update).await?;
    println!("Updated product {}", product.sku);
    Ok(())
}

async fn run_low_stock(args: LowStockArgs) -> Result<()> {
    let pool = super::open_pool().await?;
    let products = store::list_low_stock(&pool).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&products)?);
    } else if products.is_empty() {
        println!("No products below their reorder level");
    } else {
        println!(
            "{:<16} {:<30} {:>8} {:>8} {:>8}",
            "SKU", "NAME", "STOCK", "REORDER", "ORDER QTY"
        );
        for p in &products {
            println!(
                "{:<16} {:<30} {:>8} {:>8} {:>8}",
                p.sku, p.name, p.quantity_in_stock, p.reorder_level, p.reorder_quantity
            );
        }
    }
    Ok(())
}

fn print_product_table(products: &[Product]) {
    if products.is_empty() {
        println!("No products found");
        return;
    }

    println!(
        "{:<16} {:<30} {:<16} {:>10} {:>8}",
        "SKU", "NAME", "CATEGORY", "PRICE", "STOCK"
    );
    for p in products {
        println!(
            "{:<16} {:<30} {:<16} {:>10} {:>8}",
            p.sku,
            p.name,
            p.category.as_deref().unwrap_or("-"),
            format!("${:.2}", p.unit_price),
            p.quantity_in_stock
        );
    }
}

fn print_product_detail(p: &Product) {
    println!("{} ({})", p.name, p.sku);
    if let Some(description) = &p.description {
        println!("  {description}");
    }
    println!("  Category:         {}", p.category.as_deref().unwrap_or("-"));
    println!("  Unit price:       ${:.2}", p.unit_price);
    println!("  In stock:         {}", p.quantity_in_stock);
    println!("  Stock value:      ${:.2}", p.stock_value());
    println!(
        "  Reorder:          at {} (order {})",
        p.reorder_level, p.reorder_quantity
    );
    if p.needs_reorder() {
        println!("  ** needs reorder **");
    }
    if let Some(supplier_id) = p.supplier_id {
        println!("  Supplier id:      {supplier_id}");
    }
}
