// ==========================================
// Customer Visit Planner - Planner Store Trait
// ==========================================
// Responsibility: the relational-store capabilities the workbook
// importer relies on - point lookup by natural key, insert returning
// id, overwrite/merge updates, key-conflict upsert, delete.
// Implementor: SqlitePlannerStore.
//
// All methods are synchronous: the importer runs single-threaded inside
// one ambient transaction owned by the caller, so the trait is written
// against that transaction's connection.
// ==========================================

use crate::domain::planner::{CustomerFields, MonthlyPlanEntry, ProductFields, StoreFields};
use crate::repository::error::StoreResult;

pub trait PlannerStore {
    // ===== Territories =====

    /// Point lookup by unique territory name.
    fn territory_id_by_name(&self, name: &str) -> StoreResult<Option<i64>>;

    /// Insert a territory, returning the generated id. Territories are
    /// never updated once created.
    fn insert_territory(&self, name: &str) -> StoreResult<i64>;

    // ===== Customers =====

    /// Point lookup by unique customer code.
    fn customer_id_by_code(&self, cust_code: &str) -> StoreResult<Option<i64>>;

    /// Insert a customer, returning the generated id. Blank text fields
    /// are stored as NULL.
    fn insert_customer(&self, fields: &CustomerFields) -> StoreResult<i64>;

    /// Replace every provided field on an existing customer. The name is
    /// kept when the incoming name is blank; all other blanks clear.
    fn overwrite_customer(&self, customer_id: i64, fields: &CustomerFields) -> StoreResult<()>;

    /// Update only non-blank incoming fields, leaving existing values in
    /// place for blanks (incoming-if-present, else existing).
    fn merge_customer(&self, customer_id: i64, fields: &CustomerFields) -> StoreResult<()>;

    // ===== Stores =====

    /// Lowest-id store matching the dedup identity
    /// (customer, address_1, city, state).
    fn store_id_by_identity(&self, customer_id: i64, fields: &StoreFields)
        -> StoreResult<Option<i64>>;

    fn insert_store(&self, customer_id: i64, fields: &StoreFields) -> StoreResult<i64>;

    fn overwrite_store(&self, store_id: i64, fields: &StoreFields) -> StoreResult<()>;

    fn merge_store(&self, store_id: i64, fields: &StoreFields) -> StoreResult<()>;

    /// Set the sort bucket on the customer's first (lowest-id) store row,
    /// if any. Never creates a store.
    fn set_first_store_sort_bucket(&self, customer_id: i64, sort_bucket: &str) -> StoreResult<()>;

    // ===== Products =====

    /// Point lookup by (customer, lower(product_name)).
    fn product_id_by_name(&self, customer_id: i64, product_name: &str)
        -> StoreResult<Option<i64>>;

    fn insert_product(&self, customer_id: i64, fields: &ProductFields) -> StoreResult<i64>;

    fn overwrite_product(&self, product_id: i64, fields: &ProductFields) -> StoreResult<()>;

    fn merge_product(&self, product_id: i64, fields: &ProductFields) -> StoreResult<()>;

    // ===== Monthly plan entries =====

    fn month_entry_exists(&self, customer_id: i64, year: i32, month: u32) -> StoreResult<bool>;

    /// Atomic insert-or-replace on the (customer, year, month) key.
    fn upsert_month_entry(&self, entry: &MonthlyPlanEntry) -> StoreResult<()>;

    /// Remove the entry for a key. Empty entries do not persist.
    fn delete_month_entry(&self, customer_id: i64, year: i32, month: u32) -> StoreResult<()>;
}
