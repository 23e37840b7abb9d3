use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::format_money;

/// A spending envelope with a monthly amount.
///
/// Cached copies are snapshots: they are refreshed only when the entity
/// cache is explicitly invalidated, never synchronized live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: String,
    pub name: String,
    /// Budgeted amount in minor currency units (cents). Never negative.
    pub amount_cents: i64,
    pub start_date: NaiveDate,
    /// Absent means open-ended.
    pub end_date: Option<NaiveDate>,
    pub show_in_menu: bool,
    /// Display rank; ties keep server order.
    pub sort_order: i64,
}

impl Budget {
    pub fn amount_formatted(&self, currency: &str, locale: &str) -> String {
        format_money(self.amount_cents, currency, locale)
    }
}

/// Payload for creating or updating a budget.
#[derive(Debug, Clone, Serialize)]
pub struct NewBudget {
    pub name: String,
    pub amount_cents: i64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub show_in_menu: bool,
    pub sort_order: i64,
}

impl NewBudget {
    /// Check the payload invariants before it is submitted to the gateway.
    /// The core otherwise assumes already-validated inputs.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError("budget name must not be empty".into()));
        }
        if self.amount_cents < 0 {
            return Err(ValidationError("budget amount must not be negative".into()));
        }
        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(ValidationError(
                    "budget end date must not precede its start date".into(),
                ));
            }
        }
        Ok(())
    }
}
