// ==========================================
// Customer Visit Planner - SQLite Planner Store
// ==========================================
// Responsibility: PlannerStore over rusqlite.
// Blank-vs-NULL convention: importer field structs carry "" for "not
// supplied"; NULLIF maps blanks to NULL on write, COALESCE implements
// merge precedence on update.
//
// The struct borrows a Connection so callers can hand it a transaction
// (rusqlite::Transaction derefs to Connection) and keep commit/rollback
// ownership for the whole run.
// ==========================================

use crate::domain::planner::{CustomerFields, MonthlyPlanEntry, ProductFields, StoreFields};
use crate::repository::error::StoreResult;
use crate::repository::planner_store::PlannerStore;
use rusqlite::{params, Connection, OptionalExtension};

pub struct SqlitePlannerStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqlitePlannerStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        SqlitePlannerStore { conn }
    }
}

impl PlannerStore for SqlitePlannerStore<'_> {
    // ===== Territories =====

    fn territory_id_by_name(&self, name: &str) -> StoreResult<Option<i64>> {
        let id = self
            .conn
            .query_row(
                "SELECT id FROM territories WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    fn insert_territory(&self, name: &str) -> StoreResult<i64> {
        self.conn.execute(
            "INSERT INTO territories (name) VALUES (?1)",
            params![name],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    // ===== Customers =====

    fn customer_id_by_code(&self, cust_code: &str) -> StoreResult<Option<i64>> {
        let id = self
            .conn
            .query_row(
                "SELECT id FROM customers WHERE cust_code = ?1",
                params![cust_code],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    fn insert_customer(&self, fields: &CustomerFields) -> StoreResult<i64> {
        self.conn.execute(
            r#"
            INSERT INTO customers (
                cust_code, name, trade_name, territory_id,
                group_name, group_2_iws, iws_code,
                old_value, old_name, door_count, cvm_notes, created_at
            ) VALUES (
                ?1, ?2, NULLIF(?3, ''), ?4,
                NULLIF(?5, ''), NULLIF(?6, ''), NULLIF(?7, ''),
                NULLIF(?8, ''), NULLIF(?9, ''), ?10, NULLIF(?11, ''), datetime('now')
            )
            "#,
            params![
                fields.cust_code,
                fields.name,
                fields.trade_name,
                fields.territory_id,
                fields.group_name,
                fields.group_2_iws,
                fields.iws_code,
                fields.old_value,
                fields.old_name,
                fields.door_count,
                fields.cvm_notes,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn overwrite_customer(&self, customer_id: i64, fields: &CustomerFields) -> StoreResult<()> {
        // name keeps its existing value when the incoming name is blank;
        // a blank cell must not erase a known customer name.
        self.conn.execute(
            r#"
            UPDATE customers
            SET
                name = CASE WHEN NULLIF(?2, '') IS NULL THEN name ELSE ?2 END,
                trade_name = NULLIF(?3, ''),
                territory_id = ?4,
                group_name = NULLIF(?5, ''),
                group_2_iws = NULLIF(?6, ''),
                iws_code = NULLIF(?7, ''),
                old_value = NULLIF(?8, ''),
                old_name = NULLIF(?9, ''),
                door_count = ?10,
                cvm_notes = NULLIF(?11, '')
            WHERE id = ?1
            "#,
            params![
                customer_id,
                fields.name,
                fields.trade_name,
                fields.territory_id,
                fields.group_name,
                fields.group_2_iws,
                fields.iws_code,
                fields.old_value,
                fields.old_name,
                fields.door_count,
                fields.cvm_notes,
            ],
        )?;
        Ok(())
    }

    fn merge_customer(&self, customer_id: i64, fields: &CustomerFields) -> StoreResult<()> {
        self.conn.execute(
            r#"
            UPDATE customers
            SET
                name = COALESCE(NULLIF(?2, ''), name),
                trade_name = COALESCE(NULLIF(?3, ''), trade_name),
                territory_id = COALESCE(?4, territory_id),
                group_name = COALESCE(NULLIF(?5, ''), group_name),
                group_2_iws = COALESCE(NULLIF(?6, ''), group_2_iws),
                iws_code = COALESCE(NULLIF(?7, ''), iws_code),
                old_value = COALESCE(NULLIF(?8, ''), old_value),
                old_name = COALESCE(NULLIF(?9, ''), old_name),
                door_count = COALESCE(?10, door_count),
                cvm_notes = COALESCE(NULLIF(?11, ''), cvm_notes)
            WHERE id = ?1
            "#,
            params![
                customer_id,
                fields.name,
                fields.trade_name,
                fields.territory_id,
                fields.group_name,
                fields.group_2_iws,
                fields.iws_code,
                fields.old_value,
                fields.old_name,
                fields.door_count,
                fields.cvm_notes,
            ],
        )?;
        Ok(())
    }

    // ===== Stores =====

    fn store_id_by_identity(
        &self,
        customer_id: i64,
        fields: &StoreFields,
    ) -> StoreResult<Option<i64>> {
        let id = self
            .conn
            .query_row(
                r#"
                SELECT id
                FROM stores
                WHERE customer_id = ?1
                  AND COALESCE(address_1, '') = ?2
                  AND COALESCE(city, '') = ?3
                  AND COALESCE(state, '') = ?4
                ORDER BY id
                LIMIT 1
                "#,
                params![customer_id, fields.address_1, fields.city, fields.state],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    fn insert_store(&self, customer_id: i64, fields: &StoreFields) -> StoreResult<i64> {
        self.conn.execute(
            r#"
            INSERT INTO stores (
                customer_id, address_1, address_2, city, state, postcode, country,
                main_contact, owner_name, owner_phone, owner_email,
                store_manager_name, store_phone, store_email,
                market_manager_name, marketing_phone, marketing_email,
                account_dept_name, accounting_phone, accounting_email,
                sort_bucket, notes, created_at
            ) VALUES (
                ?1, NULLIF(?2, ''), NULLIF(?3, ''), NULLIF(?4, ''), NULLIF(?5, ''),
                NULLIF(?6, ''), NULLIF(?7, ''),
                NULLIF(?8, ''), NULLIF(?9, ''), NULLIF(?10, ''), NULLIF(?11, ''),
                NULLIF(?12, ''), NULLIF(?13, ''), NULLIF(?14, ''),
                NULLIF(?15, ''), NULLIF(?16, ''), NULLIF(?17, ''),
                NULLIF(?18, ''), NULLIF(?19, ''), NULLIF(?20, ''),
                NULLIF(?21, ''), NULLIF(?22, ''), datetime('now')
            )
            "#,
            params![
                customer_id,
                fields.address_1,
                fields.address_2,
                fields.city,
                fields.state,
                fields.postcode,
                fields.country,
                fields.main_contact,
                fields.owner_name,
                fields.owner_phone,
                fields.owner_email,
                fields.store_manager_name,
                fields.store_phone,
                fields.store_email,
                fields.market_manager_name,
                fields.marketing_phone,
                fields.marketing_email,
                fields.account_dept_name,
                fields.accounting_phone,
                fields.accounting_email,
                fields.sort_bucket,
                fields.notes,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn overwrite_store(&self, store_id: i64, fields: &StoreFields) -> StoreResult<()> {
        self.conn.execute(
            r#"
            UPDATE stores
            SET
                address_1 = NULLIF(?2, ''),
                address_2 = NULLIF(?3, ''),
                city = NULLIF(?4, ''),
                state = NULLIF(?5, ''),
                postcode = NULLIF(?6, ''),
                country = NULLIF(?7, ''),
                main_contact = NULLIF(?8, ''),
                owner_name = NULLIF(?9, ''),
                owner_phone = NULLIF(?10, ''),
                owner_email = NULLIF(?11, ''),
                store_manager_name = NULLIF(?12, ''),
                store_phone = NULLIF(?13, ''),
                store_email = NULLIF(?14, ''),
                market_manager_name = NULLIF(?15, ''),
                marketing_phone = NULLIF(?16, ''),
                marketing_email = NULLIF(?17, ''),
                account_dept_name = NULLIF(?18, ''),
                accounting_phone = NULLIF(?19, ''),
                accounting_email = NULLIF(?20, ''),
                sort_bucket = NULLIF(?21, ''),
                notes = NULLIF(?22, '')
            WHERE id = ?1
            "#,
            params![
                store_id,
                fields.address_1,
                fields.address_2,
                fields.city,
                fields.state,
                fields.postcode,
                fields.country,
                fields.main_contact,
                fields.owner_name,
                fields.owner_phone,
                fields.owner_email,
                fields.store_manager_name,
                fields.store_phone,
                fields.store_email,
                fields.market_manager_name,
                fields.marketing_phone,
                fields.marketing_email,
                fields.account_dept_name,
                fields.accounting_phone,
                fields.accounting_email,
                fields.sort_bucket,
                fields.notes,
            ],
        )?;
        Ok(())
    }

    fn merge_store(&self, store_id: i64, fields: &StoreFields) -> StoreResult<()> {
        self.conn.execute(
            r#"
            UPDATE stores
            SET
                address_1 = COALESCE(NULLIF(?2, ''), address_1),
                address_2 = COALESCE(NULLIF(?3, ''), address_2),
                city = COALESCE(NULLIF(?4, ''), city),
                state = COALESCE(NULLIF(?5, ''), state),
                postcode = COALESCE(NULLIF(?6, ''), postcode),
                country = COALESCE(NULLIF(?7, ''), country),
                main_contact = COALESCE(NULLIF(?8, ''), main_contact),
                owner_name = COALESCE(NULLIF(?9, ''), owner_name),
                owner_phone = COALESCE(NULLIF(?10, ''), owner_phone),
                owner_email = COALESCE(NULLIF(?11, ''), owner_email),
                store_manager_name = COALESCE(NULLIF(?12, ''), store_manager_name),
                store_phone = COALESCE(NULLIF(?13, ''), store_phone),
                store_email = COALESCE(NULLIF(?14, ''), store_email),
                market_manager_name = COALESCE(NULLIF(?15, ''), market_manager_name),
                marketing_phone = COALESCE(NULLIF(?16, ''), marketing_phone),
                marketing_email = COALESCE(NULLIF(?17, ''), marketing_email),
                account_dept_name = COALESCE(NULLIF(?18, ''), account_dept_name),
                accounting_phone = COALESCE(NULLIF(?19, ''), accounting_phone),
                accounting_email = COALESCE(NULLIF(?20, ''), accounting_email),
                sort_bucket = COALESCE(NULLIF(?21, ''), sort_bucket),
                notes = COALESCE(NULLIF(?22, ''), notes)
            WHERE id = ?1
            "#,
            params![
                store_id,
                fields.address_1,
                fields.address_2,
                fields.city,
                fields.state,
                fields.postcode,
                fields.country,
                fields.main_contact,
                fields.owner_name,
                fields.owner_phone,
                fields.owner_email,
                fields.store_manager_name,
                fields.store_phone,
                fields.store_email,
                fields.market_manager_name,
                fields.marketing_phone,
                fields.marketing_email,
                fields.account_dept_name,
                fields.accounting_phone,
                fields.accounting_email,
                fields.sort_bucket,
                fields.notes,
            ],
        )?;
        Ok(())
    }

    fn set_first_store_sort_bucket(&self, customer_id: i64, sort_bucket: &str) -> StoreResult<()> {
        self.conn.execute(
            r#"
            UPDATE stores
            SET sort_bucket = COALESCE(NULLIF(?2, ''), sort_bucket)
            WHERE id = (
                SELECT id
                FROM stores
                WHERE customer_id = ?1
                ORDER BY id
                LIMIT 1
            )
            "#,
            params![customer_id, sort_bucket],
        )?;
        Ok(())
    }

    // ===== Products =====

    fn product_id_by_name(
        &self,
        customer_id: i64,
        product_name: &str,
    ) -> StoreResult<Option<i64>> {
        let id = self
            .conn
            .query_row(
                r#"
                SELECT id
                FROM products
                WHERE customer_id = ?1
                  AND LOWER(product_name) = LOWER(?2)
                ORDER BY id
                LIMIT 1
                "#,
                params![customer_id, product_name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    fn insert_product(&self, customer_id: i64, fields: &ProductFields) -> StoreResult<i64> {
        self.conn.execute(
            r#"
            INSERT INTO products (
                customer_id, product_name, last_visit, action, status,
                next_action, last_contact, notes, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, NULLIF(?4, ''), NULLIF(?5, ''),
                NULLIF(?6, ''), ?7, NULLIF(?8, ''), datetime('now'), datetime('now')
            )
            "#,
            params![
                customer_id,
                fields.product_name,
                fields.last_visit,
                fields.action,
                fields.status,
                fields.next_action,
                fields.last_contact,
                fields.notes,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn overwrite_product(&self, product_id: i64, fields: &ProductFields) -> StoreResult<()> {
        self.conn.execute(
            r#"
            UPDATE products
            SET
                last_visit = ?2,
                action = NULLIF(?3, ''),
                status = NULLIF(?4, ''),
                next_action = NULLIF(?5, ''),
                last_contact = ?6,
                notes = NULLIF(?7, ''),
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![
                product_id,
                fields.last_visit,
                fields.action,
                fields.status,
                fields.next_action,
                fields.last_contact,
                fields.notes,
            ],
        )?;
        Ok(())
    }

    fn merge_product(&self, product_id: i64, fields: &ProductFields) -> StoreResult<()> {
        self.conn.execute(
            r#"
            UPDATE products
            SET
                last_visit = COALESCE(?2, last_visit),
                action = COALESCE(NULLIF(?3, ''), action),
                status = COALESCE(NULLIF(?4, ''), status),
                next_action = COALESCE(NULLIF(?5, ''), next_action),
                last_contact = COALESCE(?6, last_contact),
                notes = COALESCE(NULLIF(?7, ''), notes),
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![
                product_id,
                fields.last_visit,
                fields.action,
                fields.status,
                fields.next_action,
                fields.last_contact,
                fields.notes,
            ],
        )?;
        Ok(())
    }

    // ===== Monthly plan entries =====

    fn month_entry_exists(&self, customer_id: i64, year: i32, month: u32) -> StoreResult<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM cvm_month_entries WHERE customer_id = ?1 AND year = ?2 AND month = ?3",
                params![customer_id, year, month],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn upsert_month_entry(&self, entry: &MonthlyPlanEntry) -> StoreResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO cvm_month_entries
                (customer_id, year, month, planned_date, completed_manual, updated_at)
            VALUES
                (?1, ?2, ?3, ?4, ?5, datetime('now'))
            ON CONFLICT (customer_id, year, month)
            DO UPDATE SET
                planned_date = excluded.planned_date,
                completed_manual = excluded.completed_manual,
                updated_at = datetime('now')
            "#,
            params![
                entry.customer_id,
                entry.year,
                entry.month,
                entry.planned_date,
                entry.completed_manual as i32,
            ],
        )?;
        Ok(())
    }

    fn delete_month_entry(&self, customer_id: i64, year: i32, month: u32) -> StoreResult<()> {
        self.conn.execute(
            "DELETE FROM cvm_month_entries WHERE customer_id = ?1 AND year = ?2 AND month = ?3",
            params![customer_id, year, month],
        )?;
        Ok(())
    }
}
