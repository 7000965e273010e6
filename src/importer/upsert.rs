// ==========================================
// Customer Visit Planner - Entity Upserters
// ==========================================
// Responsibility: apply the run-wide upsert policy per entity. One
// generic resolve-then-apply routine carries the three-way branch;
// entity wrappers contribute only their key, their field set and their
// summary counters, so the policy semantics cannot drift between
// entities.
// ==========================================

use std::collections::HashMap;

use tracing::debug;

use crate::domain::planner::{CustomerFields, MonthlyPlanEntry, ProductFields, StoreFields};
use crate::domain::report::ImportSummary;
use crate::domain::types::UpsertPolicy;
use crate::importer::error::ImportResult;
use crate::importer::header::MONTH_SHORT;
use crate::repository::error::StoreResult;
use crate::repository::planner_store::PlannerStore;

// ==========================================
// Generic resolve-then-apply
// ==========================================

pub enum UpsertOutcome {
    Created(i64),
    Updated(i64),
    SkippedExisting(i64),
}

/// The single policy branch every entity upsert goes through: look up
/// the natural key, insert when absent (regardless of policy), and
/// otherwise skip, overwrite or merge per the run's policy.
fn resolve_and_apply(
    policy: UpsertPolicy,
    lookup: impl FnOnce() -> StoreResult<Option<i64>>,
    insert: impl FnOnce() -> StoreResult<i64>,
    overwrite: impl FnOnce(i64) -> StoreResult<()>,
    merge: impl FnOnce(i64) -> StoreResult<()>,
) -> StoreResult<UpsertOutcome> {
    let existing = lookup()?;

    let id = match existing {
        None => return Ok(UpsertOutcome::Created(insert()?)),
        Some(id) => id,
    };

    match policy {
        UpsertPolicy::CreateOnly => Ok(UpsertOutcome::SkippedExisting(id)),
        UpsertPolicy::Overwrite => {
            overwrite(id)?;
            Ok(UpsertOutcome::Updated(id))
        }
        UpsertPolicy::Merge => {
            merge(id)?;
            Ok(UpsertOutcome::Updated(id))
        }
    }
}

// ==========================================
// Territory cache
// ==========================================
// Territories are created on first reference and never updated; the
// cache spans all four passes of a run.
#[derive(Default)]
pub struct TerritoryCache {
    by_name: HashMap<String, i64>,
}

/// Get-or-create a territory by name. Blank names resolve to None.
pub fn resolve_territory(
    store: &dyn PlannerStore,
    cache: &mut TerritoryCache,
    summary: &mut ImportSummary,
    territory_name: &str,
) -> ImportResult<Option<i64>> {
    let name = territory_name.trim();
    if name.is_empty() {
        return Ok(None);
    }
    if let Some(id) = cache.by_name.get(name) {
        return Ok(Some(*id));
    }

    let id = match store.territory_id_by_name(name)? {
        Some(id) => id,
        None => {
            let id = store.insert_territory(name)?;
            summary.territories_created += 1;
            debug!(territory = name, id, "territory created");
            id
        }
    };
    cache.by_name.insert(name.to_string(), id);
    Ok(Some(id))
}

// ==========================================
// Customer
// ==========================================

/// Upsert a customer by its code, returning the customer id. On first
/// creation a blank name becomes the placeholder "Customer {code}";
/// existing rows follow the run policy.
pub fn upsert_customer(
    store: &dyn PlannerStore,
    summary: &mut ImportSummary,
    fields: &CustomerFields,
) -> ImportResult<i64> {
    let policy = summary.upsert_policy;
    let outcome = resolve_and_apply(
        policy,
        || store.customer_id_by_code(&fields.cust_code),
        || {
            if fields.name.is_empty() {
                let mut named = fields.clone();
                named.name = format!("Customer {}", fields.cust_code);
                store.insert_customer(&named)
            } else {
                store.insert_customer(fields)
            }
        },
        |id| store.overwrite_customer(id, fields),
        |id| store.merge_customer(id, fields),
    )?;

    Ok(match outcome {
        UpsertOutcome::Created(id) => {
            summary.customers_created += 1;
            id
        }
        UpsertOutcome::Updated(id) => {
            summary.customers_updated += 1;
            id
        }
        UpsertOutcome::SkippedExisting(id) => {
            summary.customers_skipped_existing += 1;
            id
        }
    })
}

// ==========================================
// Store
// ==========================================

/// Upsert a store row for a customer, deduplicated on the
/// (customer, address_1, city, state) identity.
pub fn upsert_store_row(
    store: &dyn PlannerStore,
    summary: &mut ImportSummary,
    customer_id: i64,
    fields: &StoreFields,
) -> ImportResult<()> {
    let policy = summary.upsert_policy;
    let outcome = resolve_and_apply(
        policy,
        || store.store_id_by_identity(customer_id, fields),
        || store.insert_store(customer_id, fields),
        |id| store.overwrite_store(id, fields),
        |id| store.merge_store(id, fields),
    )?;

    match outcome {
        UpsertOutcome::Created(_) => summary.stores_created += 1,
        UpsertOutcome::Updated(_) => summary.stores_updated += 1,
        UpsertOutcome::SkippedExisting(_) => summary.stores_skipped_existing += 1,
    }
    Ok(())
}

// ==========================================
// Product
// ==========================================

/// Upsert a product interaction snapshot keyed by
/// (customer, lower(product_name)).
pub fn upsert_product(
    store: &dyn PlannerStore,
    summary: &mut ImportSummary,
    customer_id: i64,
    fields: &ProductFields,
) -> ImportResult<()> {
    let policy = summary.upsert_policy;
    let outcome = resolve_and_apply(
        policy,
        || store.product_id_by_name(customer_id, &fields.product_name),
        || store.insert_product(customer_id, fields),
        |id| store.overwrite_product(id, fields),
        |id| store.merge_product(id, fields),
    )?;

    match outcome {
        UpsertOutcome::Created(_) => summary.products_created += 1,
        UpsertOutcome::Updated(_) => summary.products_updated += 1,
        UpsertOutcome::SkippedExisting(_) => summary.products_skipped_existing += 1,
    }
    Ok(())
}

// ==========================================
// Monthly plan entry
// ==========================================

/// Apply one month's planned/completed pair for a customer.
///
/// Invariants enforced here:
/// - a completion flag without a resolvable planned date is discarded
///   with a row issue naming the month (severity per validation mode);
/// - an entry left with neither a date nor a completion is deleted
///   rather than stored, so empty entries never persist.
///
/// Callers skip wholly-absent pairs before getting here; this function
/// handles the pairs that carried at least one signal.
pub fn apply_month_entry(
    store: &dyn PlannerStore,
    summary: &mut ImportSummary,
    sheet: &str,
    row: u32,
    customer_id: i64,
    year: i32,
    month: u32,
    planned_date: Option<chrono::NaiveDate>,
    completed_requested: bool,
) -> ImportResult<()> {
    let mut completed = completed_requested;
    if completed && planned_date.is_none() {
        let level = summary.validation_level();
        summary.record_issue(
            level,
            sheet,
            Some(row),
            format!(
                "COMPLETED {} is set without a usable PLANNED {} date; completion flag discarded.",
                MONTH_SHORT[(month - 1) as usize],
                MONTH_SHORT[(month - 1) as usize],
            ),
        );
        completed = false;
    }

    if planned_date.is_none() && !completed {
        // The pair carried only a discarded completion; remove any stale
        // entry instead of storing an empty one. create_only never
        // mutates existing data, deletes included.
        if summary.upsert_policy != UpsertPolicy::CreateOnly
            && store.month_entry_exists(customer_id, year, month)?
        {
            store.delete_month_entry(customer_id, year, month)?;
            summary.cvm_entries_cleared += 1;
        }
        return Ok(());
    }

    if summary.upsert_policy == UpsertPolicy::CreateOnly
        && store.month_entry_exists(customer_id, year, month)?
    {
        summary.cvm_entries_skipped_existing += 1;
        return Ok(());
    }

    store.upsert_month_entry(&MonthlyPlanEntry {
        customer_id,
        year,
        month,
        planned_date,
        completed_manual: completed,
    })?;
    summary.cvm_entries_upserted += 1;
    Ok(())
}
