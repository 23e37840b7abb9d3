//! Expansion of expenses into per-period occurrences.
//!
//! Cadence is fixed at monthly, so an expense yields at most one occurrence
//! per period. Expansion is pure: same inputs, same output, no hidden state.

use chrono::Datelike;

use crate::models::{Expense, Occurrence};
use crate::period::Period;

/// Materialize `expense` in `period`, if it occurs there.
///
/// Non-recurring expenses occur only in the period containing their date.
/// Recurring ones occur in every period from their date's period through the
/// period of `recur_until` (open-ended when absent). A `recur_until` earlier
/// than the date means "no occurrences after the first".
///
/// The effective date keeps the original day-of-month, clamped to the last
/// day of shorter target months.
pub fn expand(expense: &Expense, period: Period) -> Option<Occurrence> {
    let first = Period::from_date(expense.date);

    if !expense.recurring {
        if period != first {
            return None;
        }
        return Some(occurrence_on(expense, period));
    }

    if period < first {
        return None;
    }
    if let Some(until) = expense.recur_until {
        let last = Period::from_date(until).max(first);
        if period > last {
            return None;
        }
    }
    Some(occurrence_on(expense, period))
}

/// Expand every expense for one period, dropping those with no occurrence.
pub fn materialize(expenses: &[Expense], period: Period) -> Vec<Occurrence> {
    expenses
        .iter()
        .filter_map(|expense| expand(expense, period))
        .collect()
}

fn occurrence_on(expense: &Expense, period: Period) -> Occurrence {
    Occurrence {
        expense_id: expense.id.clone(),
        budget_id: expense.budget_id.clone(),
        date: period.clamp_day(expense.date.day()),
        price_cents: expense.price_cents,
    }
}
