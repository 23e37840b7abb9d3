use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::models::MAX_TAGS;
use crate::money::format_money;

/// A single purchase, possibly recurring monthly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    /// Date of the original (first) occurrence.
    pub date: NaiveDate,
    /// Price in minor currency units (cents). Never negative.
    pub price_cents: i64,
    pub place: String,
    pub reason: Option<String>,
    /// Free-form labels; order-insignificant, at most [`MAX_TAGS`].
    pub tags: Vec<String>,
    pub recurring: bool,
    /// Last month the expense recurs in; ignored unless `recurring` is true.
    pub recur_until: Option<NaiveDate>,
    /// Owning budget reference (many expenses to one budget).
    pub budget_id: String,
}

impl Expense {
    pub fn price_formatted(&self, currency: &str, locale: &str) -> String {
        format_money(self.price_cents, currency, locale)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Payload for creating or updating an expense.
///
/// `recur_until` is sent verbatim: an update that omits an end date keeps
/// the recurrence open-ended rather than silently dropping an existing one.
#[derive(Debug, Clone, Serialize)]
pub struct NewExpense {
    pub date: NaiveDate,
    pub price_cents: i64,
    pub place: String,
    pub reason: Option<String>,
    pub tags: Vec<String>,
    pub recurring: bool,
    pub recur_until: Option<NaiveDate>,
    pub budget_id: String,
}

impl NewExpense {
    /// Check the payload invariants before it is submitted to the gateway.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.price_cents < 0 {
            return Err(ValidationError("expense price must not be negative".into()));
        }
        if self.place.trim().is_empty() {
            return Err(ValidationError("expense place must not be empty".into()));
        }
        if self.budget_id.trim().is_empty() {
            return Err(ValidationError("expense must reference a budget".into()));
        }
        if self.tags.len() > MAX_TAGS {
            return Err(ValidationError(format!(
                "expense may carry at most {} tags",
                MAX_TAGS
            )));
        }
        if self.recurring {
            if let Some(until) = self.recur_until {
                if until < self.date {
                    return Err(ValidationError(
                        "recurrence end must not precede the expense date".into(),
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> NewExpense {
        NewExpense {
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            price_cents: 1299,
            place: "Bakery".into(),
            reason: None,
            tags: vec!["food".into()],
            recurring: false,
            recur_until: None,
            budget_id: "b1".into(),
        }
    }

    #[test]
    fn test_valid_payload() {
        assert!(payload().validate().is_ok());
    }

    #[test]
    fn test_too_many_tags_rejected() {
        let mut p = payload();
        p.tags = (0..6).map(|i| format!("tag{}", i)).collect();
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_five_tags_allowed() {
        let mut p = payload();
        p.tags = (0..5).map(|i| format!("tag{}", i)).collect();
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_recur_until_before_date_rejected() {
        let mut p = payload();
        p.recurring = true;
        p.recur_until = Some(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_recur_until_ignored_when_not_recurring() {
        // The invariant only binds recurring expenses.
        let mut p = payload();
        p.recurring = false;
        p.recur_until = Some(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_missing_budget_rejected() {
        let mut p = payload();
        p.budget_id = "".into();
        assert!(p.validate().is_err());
    }
}
