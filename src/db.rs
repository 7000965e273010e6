// ==========================================
// Customer Visit Planner - SQLite Connection Setup
// ==========================================
// Goals:
// - One place for Connection::open PRAGMA behavior so every module gets
//   the same foreign-key and busy-timeout settings
// - Idempotent schema bootstrap for the planner tables
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// Default busy_timeout (milliseconds).
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Planner schema. CREATE TABLE IF NOT EXISTS throughout so bootstrap is
/// safe to run on every startup.
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS territories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS customers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    cust_code TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    trade_name TEXT,
    territory_id INTEGER REFERENCES territories(id),
    group_name TEXT,
    group_2_iws TEXT,
    iws_code TEXT,
    old_value TEXT,
    old_name TEXT,
    door_count INTEGER,
    cvm_notes TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS stores (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    customer_id INTEGER NOT NULL REFERENCES customers(id) ON DELETE CASCADE,
    address_1 TEXT,
    address_2 TEXT,
    city TEXT,
    state TEXT,
    postcode TEXT,
    country TEXT,
    main_contact TEXT,
    owner_name TEXT,
    owner_phone TEXT,
    owner_email TEXT,
    store_manager_name TEXT,
    store_phone TEXT,
    store_email TEXT,
    market_manager_name TEXT,
    marketing_phone TEXT,
    marketing_email TEXT,
    account_dept_name TEXT,
    accounting_phone TEXT,
    accounting_email TEXT,
    sort_bucket TEXT,
    notes TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_stores_customer ON stores(customer_id);

CREATE TABLE IF NOT EXISTS products (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    customer_id INTEGER NOT NULL REFERENCES customers(id) ON DELETE CASCADE,
    product_name TEXT NOT NULL,
    last_visit TEXT,
    action TEXT,
    status TEXT,
    next_action TEXT,
    last_contact TEXT,
    notes TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_products_customer ON products(customer_id);

CREATE TABLE IF NOT EXISTS cvm_month_entries (
    customer_id INTEGER NOT NULL REFERENCES customers(id) ON DELETE CASCADE,
    year INTEGER NOT NULL,
    month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
    planned_date TEXT,
    completed_manual INTEGER NOT NULL DEFAULT 0,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (customer_id, year, month)
);
"#;

/// Apply the shared connection PRAGMAs.
///
/// foreign_keys and busy_timeout are per-connection settings and must be
/// applied to every connection the process opens.
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Open a SQLite connection with the shared configuration applied.
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// Create the planner tables when missing.
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN \
                 ('territories','customers','stores','products','cvm_month_entries')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 5);
    }
}
