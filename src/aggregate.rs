//! Per-budget and global spending figures for one reporting period.

use std::collections::HashMap;

use crate::locale::LocaleSettings;
use crate::models::{Budget, Expense};
use crate::money::format_money;
use crate::period::Period;
use crate::recurrence::materialize;

/// Spent/remaining figures for one budget.
///
/// The cents fields are the source of truth for comparisons and sign checks;
/// the display strings exist only for presentation.
#[derive(Debug, Clone)]
pub struct BudgetFigures {
    pub spent_cents: i64,
    /// May be negative: the sign, not clamping, communicates overspend.
    pub remaining_cents: i64,
    pub spent_display: String,
    pub remaining_display: String,
}

#[derive(Debug, Clone)]
pub struct Summary {
    pub per_budget: HashMap<String, BudgetFigures>,
    pub total_spent_cents: i64,
    pub total_remaining_cents: i64,
    /// Number of occurrences that survived expansion for the period.
    pub transaction_count: usize,
    pub total_spent_display: String,
    pub total_remaining_display: String,
}

/// Combine cached entities, expanded occurrences, and the selected period
/// into display-ready figures.
///
/// Totals run across every budget in `budgets`, including those with zero
/// spend. Occurrences referencing a budget absent from the collection still
/// count as transactions but contribute to no budget's figures.
pub fn summarize(
    budgets: &[Budget],
    expenses: &[Expense],
    period: Period,
    locale: &LocaleSettings,
) -> Summary {
    let occurrences = materialize(expenses, period);
    let transaction_count = occurrences.len();

    let mut spent_by_budget: HashMap<&str, i64> = HashMap::new();
    for occurrence in &occurrences {
        *spent_by_budget
            .entry(occurrence.budget_id.as_str())
            .or_insert(0) += occurrence.price_cents;
    }

    let mut per_budget = HashMap::with_capacity(budgets.len());
    let mut total_spent = 0i64;
    let mut total_remaining = 0i64;

    for budget in budgets {
        let spent = spent_by_budget.get(budget.id.as_str()).copied().unwrap_or(0);
        let remaining = budget.amount_cents - spent;
        total_spent += spent;
        total_remaining += remaining;
        per_budget.insert(
            budget.id.clone(),
            BudgetFigures {
                spent_cents: spent,
                remaining_cents: remaining,
                spent_display: format_money(spent, &locale.currency, &locale.locale),
                remaining_display: format_money(remaining, &locale.currency, &locale.locale),
            },
        );
    }

    Summary {
        per_budget,
        total_spent_cents: total_spent,
        total_remaining_cents: total_remaining,
        transaction_count,
        total_spent_display: format_money(total_spent, &locale.currency, &locale.locale),
        total_remaining_display: format_money(total_remaining, &locale.currency, &locale.locale),
    }
}
