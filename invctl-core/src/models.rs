//! Domain models for the inventory and purchase management system.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ============================================================================
// Products
// ============================================================================

/// An inventory item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub sku: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub unit_price: Decimal,
    pub quantity_in_stock: i32,
    pub reorder_level: i32,
    pub reorder_quantity: i32,
    pub supplier_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Current value of stock for this product
    pub fn stock_value(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity_in_stock)
    }

    /// Whether the product has fallen to (or below) its reorder level
    pub fn needs_reorder(&self) -> bool {
        self.quantity_in_stock <= self.reorder_level
    }
}

/// Fields for creating a product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub sku: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub unit_price: Decimal,
    pub quantity_in_stock: i32,
    pub reorder_level: i32,
    pub reorder_quantity: i32,
    pub supplier_id: Option<i32>,
}

/// Partial update for a product; `None` fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub unit_price: Option<Decimal>,
    pub quantity_in_stock: Option<i32>,
    pub reorder_level: Option<i32>,
    pub reorder_quantity: Option<i32>,
    pub supplier_id: Option<i32>,
}

impl ProductUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.unit_price.is_none()
            && self.quantity_in_stock.is_none()
            && self.reorder_level.is_none()
            && self.reorder_quantity.is_none()
            && self.supplier_id.is_none()
    }
}

// ============================================================================
// Suppliers
// ============================================================================

/// A vendor products are purchased from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    pub id: i32,
    pub name: String,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update for a supplier; `None` fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupplierUpdate {
    pub name: Option<String>,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub active: Option<bool>,
}

impl SupplierUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.contact_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.notes.is_none()
            && self.active.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSupplier {
    pub name: String,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

// ============================================================================
// Purchase orders
// ============================================================================

/// Purchase order lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(CoreError::InvalidStatus {
                value: other.to_string(),
            }),
        }
    }
}

/// An order placed with a supplier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub id: i32,
    pub order_number: String,
    pub supplier_id: i32,
    pub order_date: DateTime<Utc>,
    pub expected_delivery: Option<NaiveDate>,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single line on a purchase order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseItem {
    pub id: i32,
    pub purchase_order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub received_quantity: i32,
}

impl PurchaseItem {
    /// Total price for this line
    pub fn total_price(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// An order together with its lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrderWithItems {
    #[serde(flatten)]
    pub order: PurchaseOrder,
    pub items: Vec<PurchaseItem>,
}

/// A line for a new purchase order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrderItem {
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPurchaseOrder {
    pub supplier_id: i32,
    pub expected_delivery: Option<NaiveDate>,
    pub notes: Option<String>,
    pub items: Vec<NewOrderItem>,
}

/// Order total, recomputed from lines rather than trusted from input
pub fn order_total(items: &[NewOrderItem]) -> Decimal {
    items
        .iter()
        .map(|item| item.unit_price * Decimal::from(item.quantity))
        .sum()
}

/// Generate an order number: `PO-<YYYYMMDD>-<HHMMSS>`
pub fn generate_order_number(now: DateTime<Utc>) -> String {
    format!("PO-{}-{}", now.format("%Y%m%d"), now.format("%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::prelude::FromPrimitive;

    fn dec(value: f64) -> Decimal {
        Decimal::from_f64(value).unwrap()
    }

    fn sample_product() -> Product {
        Product {
            id: 1,
            name: "Widget".to_string(),
            sku: "WID-001".to_string(),
            description: None,
            category: Some("widgets".to_string()),
            unit_price: dec(2.50),
            quantity_in_stock: 4,
            reorder_level: 5,
            reorder_quantity: 10,
            supplier_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_stock_value() {
        let product = sample_product();
        assert_eq!(product.stock_value(), dec(10.0));
    }

    #[test]
    fn test_needs_reorder_at_and_below_level() {
        let mut product = sample_product();
        assert!(product.needs_reorder());

        product.quantity_in_stock = 5;
        assert!(product.needs_reorder());

        product.quantity_in_stock = 6;
        assert!(!product.needs_reorder());
    }

    #[test]
    fn test_order_status_round_trip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }

        assert!("shipped".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_order_total_sums_lines() {
        let items = vec![
            NewOrderItem {
                product_id: 1,
                quantity: 3,
                unit_price: dec(1.25),
            },
            NewOrderItem {
                product_id: 2,
                quantity: 2,
                unit_price: dec(10.00),
            },
        ];
        assert_eq!(order_total(&items), dec(23.75));
        assert_eq!(order_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_generate_order_number_format() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
        assert_eq!(generate_order_number(ts), "PO-20250314-092653");
    }

    #[test]
    fn test_product_update_is_empty() {
        assert!(ProductUpdate::default().is_empty());

        let update = ProductUpdate {
            unit_price: Some(dec(9.99)),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
