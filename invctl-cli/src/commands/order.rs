//! Purchase order commands
//!
//! Commands: list, show, create, receive

use std::collections::HashMap;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use invctl_core::models::{
    NewOrderItem, NewPurchaseOrder, OrderStatus, PurchaseOrder, PurchaseOrderWithItems,
};
use invctl_db::store;
use rust_decimal::Decimal;

#[derive(Parser, Debug)]
pub struct OrderArgs {
    #[command(subcommand)]
    pub command: OrderCommands,
}

#[derive(Subcommand, Debug)]
pub enum OrderCommands {
    /// List purchase orders, optionally filtered by status
    List(ListArgs),
    /// Show an order with its lines by order number
    Show(ShowArgs),
    /// Create a purchase order from item specs
    Create(CreateArgs),
    /// Receive a pending order and add stock
    Receive(ReceiveArgs),
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Filter by status (pending, delivered, cancelled)
    #[arg(long)]
    pub status: Option<OrderStatus>,

    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Order number, e.g. PO-20250314-092653
    pub order_number: String,

    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct CreateArgs {
    /// Supplier id the order goes to
    #[arg(long)]
    pub supplier: i32,

    /// Order line as SKU:QTY:PRICE (repeatable)
    #[arg(long = "item", value_name = "SKU:QTY:PRICE", required = true)]
    pub items: Vec<ItemSpec>,

    /// Expected delivery date (YYYY-MM-DD)
    #[arg(long = "expected-delivery")]
    pub expected_delivery: Option<NaiveDate>,

    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Parser, Debug)]
pub struct ReceiveArgs {
    /// Order number to receive
    pub order_number: String,

    /// Partial receipt as SKU:QTY (repeatable); omit to receive in full
    #[arg(long = "item", value_name = "SKU:QTY")]
    pub items: Vec<ReceiveSpec>,
}

/// An order line given on the command line: `SKU:QTY:PRICE`
#[derive(Debug, Clone)]
pub struct ItemSpec {
    pub sku: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

impl FromStr for ItemSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let sku = parts
            .next()
            .filter(|p| !p.is_empty())
            .ok_or("expected SKU:QTY:PRICE")?;
        let quantity = parts
            .next()
            .ok_or("expected SKU:QTY:PRICE")?
            .parse::<i32>()
            .map_err(|e| format!("invalid quantity: {e}"))?;
        let unit_price = parts
            .next()
            .ok_or("expected SKU:QTY:PRICE")?
            .parse::<Decimal>()
            .map_err(|e| format!("invalid price: {e}"))?;

        if quantity <= 0 {
            return Err("quantity must be positive".to_string());
        }
        if unit_price < Decimal::ZERO {
            return Err("price cannot be negative".to_string());
        }

        Ok(ItemSpec {
            sku: sku.to_string(),
            quantity,
            unit_price,
        })
    }
}

/// A receipt line given on the command line: `SKU:QTY`
#[derive(Debug, Clone)]
pub struct ReceiveSpec {
    pub sku: String,
    pub quantity: i32,
}

impl FromStr for ReceiveSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (sku, qty) = s.split_once(':').ok_or("expected SKU:QTY")?;
        if sku.is_empty() {
            return Err("expected SKU:QTY".to_string());
        }
        let quantity = qty
            .parse::<i32>()
            .map_err(|e| format!("invalid quantity: {e}"))?;
        if quantity < 0 {
            return Err("quantity cannot be negative".to_string());
        }

        Ok(ReceiveSpec {
            sku: sku.to_string(),
            quantity,
        })
    }
}

pub async fn run_order(args: OrderArgs) -> Result<()> {
    match args.command {
        OrderCommands::List(args) => run_list(args).await,
        OrderCommands::Show(args) => run_show(args).await,
        OrderCommands::Create(args) => run_create(args).await,
        OrderCommands::Receive(args) => run_receive(args).await,
    }
}

async fn run_list(args: ListArgs) -> Result<()> {
    let pool = super::open_pool().await?;
    let orders = store::list_orders(&pool, args.status).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&orders)?);
    } else {
        print_order_table(&orders);
    }
    Ok(())
}

async fn run_show(args: ShowArgs) -> Result<()> {
    let pool = super::open_pool().await?;
    let order = store::get_order(&pool, &args.order_number)
        .await?
        .ok_or_else(|| anyhow!("purchase order '{}' not found", args.order_number))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&order)?);
    } else {
        let labels = product_labels(&pool, &order.items).await?;
        print_order_detail(&order, &labels);
    }
    Ok(())
}

/// Map item product ids to `SKU (name)` labels for display.
async fn product_labels(
    pool: &invctl_db::PgPool,
    items: &[invctl_core::models::PurchaseItem],
) -> Result<HashMap<i32, String>> {
    let mut labels = HashMap::new();
    for item in items {
        if let Some(product) = store::get_product(pool, item.product_id).await? {
            labels.insert(item.product_id, format!("{} ({})", product.sku, product.name));
        }
    }
    Ok(labels)
}

fn item_label(product_id: i32, labels: &HashMap<i32, String>) -> String {
    labels
        .get(&product_id)
        .cloned()
        .unwrap_or_else(|| format!("product {product_id}"))
}

async fn run_create(args: CreateArgs) -> Result<()> {
    let pool = super::open_pool().await?;

    // Resolve SKUs to product ids up front so a typo fails before anything
    // is written
    let mut items = Vec::with_capacity(args.items.len());
    for spec in &args.items {
        let product = store::get_product_by_sku(&pool, &spec.sku)
            .await?
            .ok_or_else(|| anyhow!("product '{}' not found", spec.sku))?;
        items.push(NewOrderItem {
            product_id: product.id,
            quantity: spec.quantity,
            unit_price: spec.unit_price,
        });
    }

    let order = store::create_order(
        &pool,
        &NewPurchaseOrder {
            supplier_id: args.supplier,
            expected_delivery: args.expected_delivery,
            notes: args.notes,
            items,
        },
    )
    .await?;

    println!(
        "Created purchase order {} ({} items, total ${:.2})",
        order.order.order_number,
        order.items.len(),
        order.order.total_amount
    );
    Ok(())
}

async fn run_receive(args: ReceiveArgs) -> Result<()> {
    let pool = super::open_pool().await?;

    let mut received: HashMap<i32, i32> = HashMap::new();
    for spec in &args.items {
        let product = store::get_product_by_sku(&pool, &spec.sku)
            .await?
            .ok_or_else(|| anyhow!("product '{}' not found", spec.sku))?;
        received.insert(product.id, spec.quantity);
    }

    let order = store::receive_order(&pool, &args.order_number, &received).await?;
    let labels = product_labels(&pool, &order.items).await?;

    println!("Received purchase order {}", order.order.order_number);
    for item in &order.items {
        println!(
            "  {}: received {}/{}",
            item_label(item.product_id, &labels),
            item.received_quantity,
            item.quantity
        );
    }
    Ok(())
}

fn print_order_table(orders: &[PurchaseOrder]) {
    if orders.is_empty() {
        println!("No purchase orders found");
        return;
    }

    println!(
        "{:<22} {:<10} {:<12} {:>12}",
        "ORDER", "SUPPLIER", "STATUS", "TOTAL"
    );
    for o in orders {
        println!(
            "{:<22} {:<10} {:<12} {:>12}",
            o.order_number,
            o.supplier_id,
            o.status,
            format!("${:.2}", o.total_amount)
        );
    }
}

fn print_order_detail(order: &PurchaseOrderWithItems, labels: &HashMap<i32, String>) {
    let o = &order.order;
    println!("{} ({})", o.order_number, o.status);
    println!("  Supplier id:       {}", o.supplier_id);
    println!("  Ordered:           {}", o.order_date.format("%Y-%m-%d"));
    if let Some(expected) = o.expected_delivery {
        println!("  Expected delivery: {expected}");
    }
    if let Some(notes) = &o.notes {
        println!("  Notes:             {notes}");
    }
    println!("  Total:             ${:.2}", o.total_amount);
    println!("  Items:");
    for item in &order.items {
        println!(
            "    {}: {} x ${:.2} (received {})",
            item_label(item.product_id, labels),
            item.quantity,
            item.unit_price,
            item.received_quantity
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_spec_parses() {
        let spec: ItemSpec = "WID-001:12:4.25".parse().unwrap();
        assert_eq!(spec.sku, "WID-001");
        assert_eq!(spec.quantity, 12);
        assert_eq!(spec.unit_price, "4.25".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_item_spec_rejects_malformed() {
        assert!("WID-001".parse::<ItemSpec>().is_err());
        assert!("WID-001:3".parse::<ItemSpec>().is_err());
        assert!(":3:1.00".parse::<ItemSpec>().is_err());
        assert!("WID-001:0:1.00".parse::<ItemSpec>().is_err());
        assert!("WID-001:-2:1.00".parse::<ItemSpec>().is_err());
        assert!("WID-001:3:-1.00".parse::<ItemSpec>().is_err());
    }

    #[test]
    fn test_receive_spec_parses() {
        let spec: ReceiveSpec = "WID-001:7".parse().unwrap();
        assert_eq!(spec.sku, "WID-001");
        assert_eq!(spec.quantity, 7);

        // Zero is allowed: an item that didn't arrive
        assert_eq!("WID-001:0".parse::<ReceiveSpec>().unwrap().quantity, 0);
    }

    #[test]
    fn test_receive_spec_rejects_malformed() {
        assert!("WID-001".parse::<ReceiveSpec>().is_err());
        assert!(":4".parse::<ReceiveSpec>().is_err());
        assert!("WID-001:-1".parse::<ReceiveSpec>().is_err());
    }

    #[test]
    fn test_item_label_prefers_sku_and_name() {
        let mut labels = HashMap::new();
        labels.insert(10, "WID-001 (Widget)".to_string());

        assert_eq!(item_label(10, &labels), "WID-001 (Widget)");
        // A product that has since been deleted still renders by id
        assert_eq!(item_label(99, &labels), "product 99");
    }
}
