// ==========================================
// Customer Visit Planner - Planner Entities
// ==========================================
// Field structs carried from the workbook passes into the store layer.
// Convention: text fields hold cleaned strings where "" means "not
// supplied"; the store layer maps blanks to NULL on write. Dates and
// counts are Options.
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// CustomerFields
// ==========================================
// Natural key: cust_code. A customer row can be touched by all four
// sheet passes in one run; each pass supplies only the fields its sheet
// carries and leaves the rest blank.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerFields {
    pub cust_code: String,
    pub name: String,
    pub trade_name: String,
    pub territory_id: Option<i64>,
    pub group_name: String,
    pub group_2_iws: String,
    pub iws_code: String,
    pub old_value: String,
    pub old_name: String,
    pub door_count: Option<i64>,
    pub cvm_notes: String,
}

impl CustomerFields {
    /// Minimal fields for a pass that only knows code, name and territory.
    pub fn for_code(cust_code: &str, name: &str, territory_id: Option<i64>) -> Self {
        CustomerFields {
            cust_code: cust_code.to_string(),
            name: name.to_string(),
            territory_id,
            ..CustomerFields::default()
        }
    }
}

// ==========================================
// StoreFields
// ==========================================
// A physical store location plus its six contact-role triples.
// Dedup identity is (customer, address_1, city, state).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreFields {
    pub address_1: String,
    pub address_2: String,
    pub city: String,
    pub state: String,
    pub postcode: String,
    pub country: String,
    pub main_contact: String,
    pub owner_name: String,
    pub owner_phone: String,
    pub owner_email: String,
    pub store_manager_name: String,
    pub store_phone: String,
    pub store_email: String,
    pub market_manager_name: String,
    pub marketing_phone: String,
    pub marketing_email: String,
    pub account_dept_name: String,
    pub accounting_phone: String,
    pub accounting_email: String,
    pub sort_bucket: String,
    pub notes: String,
}

impl StoreFields {
    /// True when at least one field carries data. Blank store payloads
    /// must not create store rows.
    pub fn has_data(&self) -> bool {
        [
            &self.address_1,
            &self.address_2,
            &self.city,
            &self.state,
            &self.postcode,
            &self.country,
            &self.main_contact,
            &self.owner_name,
            &self.owner_phone,
            &self.owner_email,
            &self.store_manager_name,
            &self.store_phone,
            &self.store_email,
            &self.market_manager_name,
            &self.marketing_phone,
            &self.marketing_email,
            &self.account_dept_name,
            &self.accounting_phone,
            &self.accounting_email,
            &self.sort_bucket,
            &self.notes,
        ]
        .iter()
        .any(|v| !v.is_empty())
    }

    /// Duplicate-tracking key within the detail pass.
    pub fn duplicate_key(&self, cust_code: &str) -> String {
        format!(
            "{}|{}|{}|{}",
            cust_code.to_lowercase(),
            self.address_1.to_lowercase(),
            self.city.to_lowercase(),
            self.state.to_lowercase()
        )
    }
}

// ==========================================
// ProductFields
// ==========================================
// One product interaction snapshot per (customer, product name).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductFields {
    pub product_name: String,
    pub last_visit: Option<NaiveDate>,
    pub action: String,
    pub status: String,
    pub next_action: String,
    pub last_contact: Option<NaiveDate>,
    pub notes: String,
}

impl ProductFields {
    /// True when the whole interaction group is empty for a row.
    pub fn is_blank(&self) -> bool {
        self.action.is_empty()
            && self.status.is_empty()
            && self.next_action.is_empty()
            && self.notes.is_empty()
            && self.last_visit.is_none()
            && self.last_contact.is_none()
    }
}

// ==========================================
// MonthlyPlanEntry
// ==========================================
// One planned/completed pair per (customer, year, month). Invariant:
// completed_manual is never true without a planned_date, and an entry
// with neither is deleted rather than stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyPlanEntry {
    pub customer_id: i64,
    pub year: i32,
    pub month: u32,
    pub planned_date: Option<NaiveDate>,
    pub completed_manual: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_fields_has_data() {
        let blank = StoreFields::default();
        assert!(!blank.has_data());

        let populated = StoreFields {
            city: "Sydney".to_string(),
            ..StoreFields::default()
        };
        assert!(populated.has_data());
    }

    #[test]
    fn test_store_duplicate_key_is_case_insensitive() {
        let fields = StoreFields {
            address_1: "12 George St".to_string(),
            city: "SYDNEY".to_string(),
            state: "NSW".to_string(),
            ..StoreFields::default()
        };
        assert_eq!(
            fields.duplicate_key("C100"),
            "c100|12 george st|sydney|nsw"
        );
    }

    #[test]
    fn test_product_fields_is_blank() {
        assert!(ProductFields::default().is_blank());
        let with_visit = ProductFields {
            last_visit: NaiveDate::from_ymd_opt(2026, 1, 6),
            ..ProductFields::default()
        };
        assert!(!with_visit.is_blank());
    }
}
