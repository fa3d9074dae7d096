//! Store operations for products, suppliers, and purchase orders.
//!
//! All functions take a pool reference; order creation and receiving run
//! inside a single transaction so partial writes never land.

use std::collections::HashMap;

use chrono::Utc;
use invctl_core::models::{
    generate_order_number, order_total, NewProduct, NewPurchaseOrder, NewSupplier, OrderStatus,
    Product, ProductUpdate, PurchaseItem, PurchaseOrder, PurchaseOrderWithItems, Supplier,
    SupplierUpdate,
};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::info;

use crate::error::{DbError, DbResult};

const PRODUCT_COLUMNS: &str = "id, name, sku, description, category, unit_price, \
     quantity_in_stock, reorder_level, reorder_quantity, supplier_id, created_at, updated_at";

const SUPPLIER_COLUMNS: &str =
    "id, name, contact_name, email, phone, address, notes, active, created_at, updated_at";

const ORDER_COLUMNS: &str = "id, order_number, supplier_id, order_date, expected_delivery, \
     status, total_amount, notes, created_at, updated_at";

const ITEM_COLUMNS: &str =
    "id, purchase_order_id, product_id, quantity, unit_price, received_quantity";

// ============================================================================
// Row mapping
// ============================================================================

fn product_from_row(row: &PgRow) -> Result<Product, sqlx::Error> {
    Ok(Product {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        sku: row.try_get("sku")?,
        description: row.try_get("description")?,
        category: row.try_get("category")?,
        unit_price: row.try_get("unit_price")?,
        quantity_in_stock: row.try_get("quantity_in_stock")?,
        reorder_level: row.try_get("reorder_level")?,
        reorder_quantity: row.try_get("reorder_quantity")?,
        supplier_id: row.try_get("supplier_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn supplier_from_row(row: &PgRow) -> Result<Supplier, sqlx::Error> {
    Ok(Supplier {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        contact_name: row.try_get("contact_name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        address: row.try_get("address")?,
        notes: row.try_get("notes")?,
        active: row.try_get("active")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn order_from_row(row: &PgRow) -> Result<PurchaseOrder, sqlx::Error> {
    let status: String = row.try_get("status")?;
    let status = status
        .parse::<OrderStatus>()
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

    Ok(PurchaseOrder {
        id: row.try_get("id")?,
        order_number: row.try_get("order_number")?,
        supplier_id: row.try_get("supplier_id")?,
        order_date: row.try_get("order_date")?,
        expected_delivery: row.try_get("expected_delivery")?,
        status,
        total_amount: row.try_get("total_amount")?,
        notes: row.try_get("notes")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn item_from_row(row: &PgRow) -> Result<PurchaseItem, sqlx::Error> {
    Ok(PurchaseItem {
        id: row.try_get("id")?,
        purchase_order_id: row.try_get("purchase_order_id")?,
        product_id: row.try_get("product_id")?,
        quantity: row.try_get("quantity")?,
        unit_price: row.try_get("unit_price")?,
        received_quantity: row.try_get("received_quantity")?,
    })
}

// ============================================================================
// Products
// ============================================================================

pub async fn list_products(pool: &PgPool, category: Option<&str>) -> DbResult<Vec<Product>> {
    let mut builder = QueryBuilder::<Postgres>::new(format!(
        "SELECT {PRODUCT_COLUMNS} FROM products"
    ));
    if let Some(category) = category {
        builder.push(" WHERE category = ");
        builder.push_bind(category);
    }
    builder.push(" ORDER BY name");

    let rows = builder.build().fetch_all(pool).await?;
    Ok(rows
        .iter()
        .map(product_from_row)
        .collect::<Result<Vec<_>, _>>()?)
}

pub async fn get_product(pool: &PgPool, id: i32) -> DbResult<Option<Product>> {
    let row = sqlx::query(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(product_from_row).transpose().map_err(Into::into)
}

pub async fn get_product_by_sku(pool: &PgPool, sku: &str) -> DbResult<Option<Product>> {
    let row = sqlx::query(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE sku = $1"
    ))
    .bind(sku)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(product_from_row).transpose().map_err(Into::into)
}

pub async fn create_product(pool: &PgPool, new: &NewProduct) -> DbResult<Product> {
    let row = sqlx::query(&format!(
        "INSERT INTO products \
             (name, sku, description, category, unit_price, quantity_in_stock, \
              reorder_level, reorder_quantity, supplier_id) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(&new.name)
    .bind(&new.sku)
    .bind(&new.description)
    .bind(&new.category)
    .bind(new.unit_price)
    .bind(new.quantity_in_stock)
    .bind(new.reorder_level)
    .bind(new.reorder_quantity)
    .bind(new.supplier_id)
    .fetch_one(pool)
    .await
    .map_err(|e| DbError::from_sqlx_conflict(e, &format!("product '{}'", new.sku)))?;

    let product = product_from_row(&row)?;
    info!(sku = %product.sku, id = product.id, "created product");
    Ok(product)
}

pub async fn update_product(
    pool: &PgPool,
    sku: &str,
    update: &ProductUpdate,
) -> DbResult<Product> {
    if update.is_empty() {
        return Err(DbError::InvalidState("no fields to update".to_string()));
    }

    let mut builder = QueryBuilder::<Postgres>::new("UPDATE products SET updated_at = now()");
    if let Some(name) = &update.name {
        builder.push(", name = ");
        builder.push_bind(name);
    }
    if let Some(description) = &update.description {
        builder.push(", description = ");
        builder.push_bind(description);
    }
    if let Some(category) = &update.category {
        builder.push(", category = ");
        builder.push_bind(category);
    }
    if let Some(unit_price) = update.unit_price {
        builder.push(", unit_price = ");
        builder.push_bind(unit_price);
    }
    if let Some(quantity) = update.quantity_in_stock {
        builder.push(", quantity_in_stock = ");
        builder.push_bind(quantity);
    }
    if let Some(level) = update.reorder_level {
        builder.push(", reorder_level = ");
        builder.push_bind(level);
    }
    if let Some(quantity) = update.reorder_quantity {
        builder.push(", reorder_quantity = ");
        builder.push_bind(quantity);
    }
    if let Some(supplier_id) = update.supplier_id {
        builder.push(", supplier_id = ");
        builder.push_bind(supplier_id);
    }
    builder.push(" WHERE sku = ");
    builder.push_bind(sku);
    builder.push(format!(" RETURNING {PRODUCT_COLUMNS}"));

    let row = builder
        .build()
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DbError::NotFound(format!("product '{sku}'")))?;

    let product = product_from_row(&row)?;
    info!(sku = %product.sku, "updated product");
    Ok(product)
}

/// Products at or below their reorder level.
pub async fn list_low_stock(pool: &PgPool) -> DbResult<Vec<Product>> {
    let rows = sqlx::query(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products \
         WHERE quantity_in_stock <= reorder_level \
         ORDER BY quantity_in_stock - reorder_level"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(product_from_row)
        .collect::<Result<Vec<_>, _>>()?)
}

// ============================================================================
// Suppliers
// ============================================================================

pub async fn list_suppliers(pool: &PgPool, include_inactive: bool) -> DbResult<Vec<Supplier>> {
    let query = if include_inactive {
        format!("SELECT {SUPPLIER_COLUMNS} FROM suppliers ORDER BY name")
    } else {
        format!("SELECT {SUPPLIER_COLUMNS} FROM suppliers WHERE active ORDER BY name")
    };

    let rows = sqlx::query(&query).fetch_all(pool).await?;
    Ok(rows
        .iter()
        .map(supplier_from_row)
        .collect::<Result<Vec<_>, _>>()?)
}

pub async fn get_supplier(pool: &PgPool, id: i32) -> DbResult<Option<Supplier>> {
    let row = sqlx::query(&format!(
        "SELECT {SUPPLIER_COLUMNS} FROM suppliers WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(supplier_from_row).transpose().map_err(Into::into)
}

pub async fn create_supplier(pool: &PgPool, new: &NewSupplier) -> DbResult<Supplier> {
    let row = sqlx::query(&format!(
        "INSERT INTO suppliers (name, contact_name, email, phone, address, notes) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING {SUPPLIER_COLUMNS}"
    ))
    .bind(&new.name)
    .bind(&new.contact_name)
    .bind(&new.email)
    .bind(&new.phone)
    .bind(&new.address)
    .bind(&new.notes)
    .fetch_one(pool)
    .await?;

    let supplier = supplier_from_row(&row)?;
    info!(name = %supplier.name, id = supplier.id, "created supplier");
    Ok(supplier)
}

pub async fn update_supplier(
    pool: &PgPool,
    id: i32,
    update: &SupplierUpdate,
) -> DbResult<Supplier> {
    if update.is_empty() {
        return Err(DbError::InvalidState("no fields to update".to_string()));
    }

    let mut builder = QueryBuilder::<Postgres>::new("UPDATE suppliers SET updated_at = now()");
    if let Some(name) = &update.name {
        builder.push(", name = ");
        builder.push_bind(name);
    }
    if let Some(contact_name) = &update.contact_name {
        builder.push(", contact_name = ");
        builder.push_bind(contact_name);
    }
    if let Some(email) = &update.email {
        builder.push(", email = ");
        builder.push_bind(email);
    }
    if let Some(phone) = &update.phone {
        builder.push(", phone = ");
        builder.push_bind(phone);
    }
    if let Some(address) = &update.address {
        builder.push(", address = ");
        builder.push_bind(address);
    }
    if let Some(notes) = &update.notes {
        builder.push(", notes = ");
        builder.push_bind(notes);
    }
    if let Some(active) = update.active {
        builder.push(", active = ");
        builder.push_bind(active);
    }
    builder.push(" WHERE id = ");
    builder.push_bind(id);
    builder.push(format!(" RETURNING {SUPPLIER_COLUMNS}"));

    let row = builder
        .build()
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DbError::NotFound(format!("supplier {id}")))?;

    let supplier = supplier_from_row(&row)?;
    info!(id = supplier.id, "updated supplier");
    Ok(supplier)
}

// ============================================================================
// Purchase orders
// ============================================================================

pub async fn list_orders(
    pool: &PgPool,
    status: Option<OrderStatus>,
) -> DbResult<Vec<PurchaseOrder>> {
    let mut builder = QueryBuilder::<Postgres>::new(format!(
        "SELECT {ORDER_COLUMNS} FROM purchase_orders"
    ));
    if let Some(status) = status {
        builder.push(" WHERE status = ");
        builder.push_bind(status.as_str());
    }
    builder.push(" ORDER BY order_date DESC");

    let rows = builder.build().fetch_all(pool).await?;
    Ok(rows
        .iter()
        .map(order_from_row)
        .collect::<Result<Vec<_>, _>>()?)
}

pub async fn get_order(
    pool: &PgPool,
    order_number: &str,
) -> DbResult<Option<PurchaseOrderWithItems>> {
    let row = sqlx::query(&format!(
        "SELECT {ORDER_COLUMNS} FROM purchase_orders WHERE order_number = $1"
    ))
    .bind(order_number)
    .fetch_optional(pool)
    .await?;

    let order = match row.as_ref().map(order_from_row).transpose()? {
        Some(order) => order,
        None => return Ok(None),
    };

    let item_rows = sqlx::query(&format!(
        "SELECT {ITEM_COLUMNS} FROM purchase_items WHERE purchase_order_id = $1 ORDER BY id"
    ))
    .bind(order.id)
    .fetch_all(pool)
    .await?;

    let items = item_rows
        .iter()
        .map(item_from_row)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(PurchaseOrderWithItems { order, items }))
}

/// Create an order with its lines in one transaction.
///
/// The order number is stamped `PO-<YYYYMMDD>-<HHMMSS>` and the total is
/// computed from the lines, never accepted from the caller.
pub async fn create_order(
    pool: &PgPool,
    new: &NewPurchaseOrder,
) -> DbResult<PurchaseOrderWithItems> {
    let order_number = generate_order_number(Utc::now());
    let total = order_total(&new.items);

    let mut tx = pool.begin().await?;

    let row = sqlx::query(&format!(
        "INSERT INTO purchase_orders \
             (order_number, supplier_id, expected_delivery, status, total_amount, notes) \
         VALUES ($1, $2, $3, 'pending', $4, $5) \
         RETURNING {ORDER_COLUMNS}"
    ))
    .bind(&order_number)
    .bind(new.supplier_id)
    .bind(new.expected_delivery)
    .bind(total)
    .bind(&new.notes)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| DbError::from_sqlx_conflict(e, &format!("purchase order '{order_number}'")))?;

    let order = order_from_row(&row)?;

    let mut items = Vec::with_capacity(new.items.len());
    for line in &new.items {
        let row = sqlx::query(&format!(
            "INSERT INTO purchase_items (purchase_order_id, product_id, quantity, unit_price) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {ITEM_COLUMNS}"
        ))
        .bind(order.id)
        .bind(line.product_id)
        .bind(line.quantity)
        .bind(line.unit_price)
        .fetch_one(&mut *tx)
        .await?;
        items.push(item_from_row(&row)?);
    }

    tx.commit().await?;

    info!(
        order_number = %order.order_number,
        items = items.len(),
        total = %order.total_amount,
        "created purchase order"
    );

    Ok(PurchaseOrderWithItems { order, items })
}

/// Receive a pending order: mark it delivered, record received quantities,
/// and add the received stock to each product. All in one transaction.
///
/// `received` maps product id to received quantity; products not in the map
/// are received in full. An empty map receives everything in full.
pub async fn receive_order(
    pool: &PgPool,
    order_number: &str,
    received: &HashMap<i32, i32>,
) -> DbResult<PurchaseOrderWithItems> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query(&format!(
        "SELECT {ORDER_COLUMNS} FROM purchase_orders WHERE order_number = $1 FOR UPDATE"
    ))
    .bind(order_number)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| DbError::NotFound(format!("purchase order '{order_number}'")))?;

    let order = order_from_row(&row)?;
    ensure_receivable(&order.order_number, order.status)?;

    let item_rows = sqlx::query(&format!(
        "SELECT {ITEM_COLUMNS} FROM purchase_items WHERE purchase_order_id = $1 ORDER BY id"
    ))
    .bind(order.id)
    .fetch_all(&mut *tx)
    .await?;

    let mut items = item_rows
        .iter()
        .map(item_from_row)
        .collect::<Result<Vec<_>, _>>()?;

    check_received_products(received, &items)?;

    for item in &mut items {
        let received_qty = received.get(&item.product_id).copied().unwrap_or(item.quantity);
        if received_qty < 0 {
            return Err(DbError::InvalidState(format!(
                "received quantity for product {} cannot be negative",
                item.product_id
            )));
        }

        sqlx::query("UPDATE purchase_items SET received_quantity = $1 WHERE id = $2")
            .bind(received_qty)
            .bind(item.id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE products \
             SET quantity_in_stock = quantity_in_stock + $1, updated_at = now() \
             WHERE id = $2",
        )
        .bind(received_qty)
        .bind(item.product_id)
        .execute(&mut *tx)
        .await?;

        item.received_quantity = received_qty;
    }

    let row = sqlx::query(&format!(
        "UPDATE purchase_orders SET status = 'delivered', updated_at = now() \
         WHERE id = $1 RETURNING {ORDER_COLUMNS}"
    ))
    .bind(order.id)
    .fetch_one(&mut *tx)
    .await?;

    let order = order_from_row(&row)?;

    tx.commit().await?;

    info!(order_number = %order.order_number, "received purchase order");

    Ok(PurchaseOrderWithItems { order, items })
}

/// Only pending orders can be received.
fn ensure_receivable(order_number: &str, status: OrderStatus) -> DbResult<()> {
    if status != OrderStatus::Pending {
        return Err(DbError::InvalidState(format!(
            "purchase order '{order_number}' is {status}, only pending orders can be received"
        )));
    }
    Ok(())
}

/// Every product in a partial receipt must be a line on the order;
/// anything else would be silently dropped.
fn check_received_products(
    received: &HashMap<i32, i32>,
    items: &[PurchaseItem],
) -> DbResult<()> {
    for product_id in received.keys() {
        if !items.iter().any(|item| item.product_id == *product_id) {
            return Err(DbError::InvalidState(format!(
                "product {product_id} is not a line on this order"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn line(product_id: i32) -> PurchaseItem {
        PurchaseItem {
            id: product_id,
            purchase_order_id: 1,
            product_id,
            quantity: 5,
            unit_price: Decimal::ONE,
            received_quantity: 0,
        }
    }

    #[test]
    fn test_only_pending_orders_are_receivable() {
        assert!(ensure_receivable("PO-20250314-092653", OrderStatus::Pending).is_ok());

        let err =
            ensure_receivable("PO-20250314-092653", OrderStatus::Delivered).unwrap_err();
        assert!(matches!(err, DbError::InvalidState(_)));
        assert!(err.to_string().contains("delivered"));

        let err =
            ensure_receivable("PO-20250314-092653", OrderStatus::Cancelled).unwrap_err();
        assert!(err.to_string().contains("cancelled"));
    }

    #[test]
    fn test_receipt_for_product_not_on_order_is_rejected() {
        let items = vec![line(10), line(11)];

        let mut received = HashMap::new();
        received.insert(10, 3);
        assert!(check_received_products(&received, &items).is_ok());

        received.insert(99, 1);
        let err = check_received_products(&received, &items).unwrap_err();
        assert!(err.to_string().contains("product 99"));
    }

    #[test]
    fn test_empty_receipt_receives_in_full() {
        let items = vec![line(10)];
        assert!(check_received_products(&HashMap::new(), &items).is_ok());
    }
}
