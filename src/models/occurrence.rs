use chrono::NaiveDate;
use serde::Serialize;

/// A materialized projection of an expense onto one reporting period.
///
/// Produced by the recurrence expander, consumed by the aggregator, then
/// discarded. Never persisted and never mutated; the effective price always
/// equals the source expense's price (no proration).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    pub expense_id: String,
    pub budget_id: String,
    /// Effective date within the target period.
    pub date: NaiveDate,
    pub price_cents: i64,
}
