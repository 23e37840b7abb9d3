pub mod budget;
pub mod expense;
pub mod occurrence;

pub use budget::{Budget, NewBudget};
pub use expense::{Expense, NewExpense};
pub use occurrence::Occurrence;

/// Maximum number of tags an expense may carry.
pub const MAX_TAGS: usize = 5;
