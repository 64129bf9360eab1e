//! Budget comparison

use serde::{Deserialize, Serialize};

use crate::aggregate::{percentage_of, total_spending};
use crate::models::ExpenseRecord;

/// Spending measured against a caller-owned budget
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub budget: f64,
    pub spent: f64,
    /// Negative when over budget
    pub remaining: f64,
    /// Share of the budget used (0-100+); 0 when no budget is set
    pub percent_used: f64,
    pub over_budget: bool,
}

impl BudgetStatus {
    pub fn compute(budget: f64, records: &[ExpenseRecord]) -> Self {
        let spent = total_spending(records);
        let remaining = budget - spent;

        Self {
            budget,
            spent,
            remaining,
            percent_used: if budget > 0.0 {
                percentage_of(spent, budget)
            } else {
                0.0
            },
            over_budget: budget > 0.0 && spent > budget,
        }
    }

    pub fn has_budget(&self) -> bool {
        self.budget > 0.0
    }
}
