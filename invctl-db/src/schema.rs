//! Schema definition and initialization.
//!
//! Everything is `IF NOT EXISTS` so `invctl init` can be re-run safely.

use sqlx::PgPool;
use tracing::info;

use crate::error::DbResult;

const SCHEMA: &str = r#"
-- Suppliers table
CREATE TABLE IF NOT EXISTS suppliers (
    id SERIAL PRIMARY KEY,
    name VARCHAR(100) NOT NULL,
    contact_name VARCHAR(100),
    email VARCHAR(100),
    phone VARCHAR(20),
    address TEXT,
    notes TEXT,
    active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Products table
CREATE TABLE IF NOT EXISTS products (
    id SERIAL PRIMARY KEY,
    name VARCHAR(100) NOT NULL,
    sku VARCHAR(50) NOT NULL UNIQUE,
    description TEXT,
    category VARCHAR(50),
    unit_price NUMERIC(12, 2) NOT NULL,
    quantity_in_stock INTEGER NOT NULL DEFAULT 0,
    reorder_level INTEGER NOT NULL DEFAULT 5,
    reorder_quantity INTEGER NOT NULL DEFAULT 10,
    supplier_id INTEGER REFERENCES suppliers(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Purchase orders table
CREATE TABLE IF NOT EXISTS purchase_orders (
    id SERIAL PRIMARY KEY,
    order_number VARCHAR(50) NOT NULL UNIQUE,
    supplier_id INTEGER NOT NULL REFERENCES suppliers(id),
    order_date TIMESTAMPTZ NOT NULL DEFAULT now(),
    expected_delivery DATE,
    status VARCHAR(20) NOT NULL DEFAULT 'pending',
    total_amount NUMERIC(12, 2) NOT NULL DEFAULT 0,
    notes TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Purchase items table
CREATE TABLE IF NOT EXISTS purchase_items (
    id SERIAL PRIMARY KEY,
    purchase_order_id INTEGER NOT NULL REFERENCES purchase_orders(id) ON DELETE CASCADE,
    product_id INTEGER NOT NULL REFERENCES products(id),
    quantity INTEGER NOT NULL,
    unit_price NUMERIC(12, 2) NOT NULL,
    received_quantity INTEGER NOT NULL DEFAULT 0
);
"#;

const INDEXES: &str = r#"
-- Product lookup by SKU (most frequent lookup path)
CREATE INDEX IF NOT EXISTS idx_products_sku ON products (sku);

-- Product filtering by category
CREATE INDEX IF NOT EXISTS idx_products_category ON products (category);

-- Low-stock scans compare quantity against the reorder level
CREATE INDEX IF NOT EXISTS idx_products_stock_level ON products (quantity_in_stock, reorder_level);

-- Purchase order filtering by status
CREATE INDEX IF NOT EXISTS idx_purchase_orders_status ON purchase_orders (status);

-- Purchase order date range queries
CREATE INDEX IF NOT EXISTS idx_purchase_orders_date ON purchase_orders (order_date);
"#;

/// Create tables and indexes if they don't exist.
pub async fn init_schema(pool: &PgPool) -> DbResult<()> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    info!("database tables created");

    sqlx::raw_sql(INDEXES).execute(pool).await?;
    info!("database indexes created");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_covers_all_tables() {
        for table in ["suppliers", "products", "purchase_orders", "purchase_items"] {
            assert!(
                SCHEMA.contains(&format!("CREATE TABLE IF NOT EXISTS {table}")),
                "missing table {table}"
            );
        }
    }

    #[test]
    fn test_all_named_indexes_present() {
        for index in [
            "idx_products_sku",
            "idx_products_category",
            "idx_products_stock_level",
            "idx_purchase_orders_status",
            "idx_purchase_orders_date",
        ] {
            assert!(
                INDEXES.contains(&format!("CREATE INDEX IF NOT EXISTS {index}")),
                "missing index {index}"
            );
        }
    }
}
