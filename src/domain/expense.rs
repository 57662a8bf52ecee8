/// Budget entries and the monthly summary
///
/// Income and spending share one collection, told apart by [`ExpenseKind`].

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{optional_text, require_text, DateKey, DomainError, RecordId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseKind {
    #[default]
    Expense,
    Income,
}

impl ExpenseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseKind::Expense => "expense",
            ExpenseKind::Income => "income",
        }
    }
}

impl fmt::Display for ExpenseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpenseKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "expense" => Ok(ExpenseKind::Expense),
            "income" => Ok(ExpenseKind::Income),
            other => Err(DomainError::validation(format!(
                "Invalid entry type '{}'. Valid options: expense, income",
                other
            ))),
        }
    }
}

/// One income or expense line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: RecordId,
    pub date: DateKey,
    pub category: String,
    /// Always positive; the kind carries the sign
    pub amount: f64,
    pub description: Option<String>,
    pub kind: ExpenseKind,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(
        date: DateKey,
        category: &str,
        amount: f64,
        kind: ExpenseKind,
        description: Option<String>,
    ) -> Result<Self, DomainError> {
        Self::validate_amount(amount)?;
        Ok(Self {
            id: RecordId::new(),
            date,
            category: require_text("Category", category, 100)?,
            amount,
            description: optional_text("Description", description, 500)?,
            kind,
            created_at: Utc::now(),
        })
    }

    pub fn set_amount(&mut self, amount: f64) -> Result<(), DomainError> {
        Self::validate_amount(amount)?;
        self.amount = amount;
        Ok(())
    }

    fn validate_amount(amount: f64) -> Result<(), DomainError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(DomainError::invalid_value("Amount must be a positive number"));
        }
        Ok(())
    }
}

/// Totals for a set of budget entries
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BudgetSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    /// Income minus expenses
    pub balance: f64,
    /// Spending per category; income is not included
    pub expenses_by_category: BTreeMap<String, f64>,
}

impl BudgetSummary {
    pub fn from_expenses<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a Expense>,
    {
        let mut summary = BudgetSummary::default();
        for entry in entries {
            match entry.kind {
                ExpenseKind::Income => summary.total_income += entry.amount,
                ExpenseKind::Expense => {
                    summary.total_expenses += entry.amount;
                    *summary.expenses_by_category.entry(entry.category.clone()).or_insert(0.0) += entry.amount;
                }
            }
        }
        summary.balance = summary.total_income - summary.total_expenses;
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> DateKey {
        "2025-06-03".parse().unwrap()
    }

    #[test]
    fn test_amount_must_be_positive() {
        assert!(Expense::new(day(), "Food", 0.0, ExpenseKind::Expense, None).is_err());
        assert!(Expense::new(day(), "Food", -3.0, ExpenseKind::Expense, None).is_err());
        assert!(Expense::new(day(), "Food", f64::NAN, ExpenseKind::Expense, None).is_err());
        assert!(Expense::new(day(), "", 3.0, ExpenseKind::Expense, None).is_err());
    }

    #[test]
    fn test_budget_summary() {
        let entries = vec![
            Expense::new(day(), "Income", 2000.0, ExpenseKind::Income, None).unwrap(),
            Expense::new(day(), "Food & Dining", 40.0, ExpenseKind::Expense, None).unwrap(),
            Expense::new(day(), "Food & Dining", 10.0, ExpenseKind::Expense, None).unwrap(),
            Expense::new(day(), "Mortgage", 900.0, ExpenseKind::Expense, None).unwrap(),
        ];

        let summary = BudgetSummary::from_expenses(&entries);
        assert_eq!(summary.total_income, 2000.0);
        assert_eq!(summary.total_expenses, 950.0);
        assert_eq!(summary.balance, 1050.0);
        assert_eq!(summary.expenses_by_category.get("Food & Dining"), Some(&50.0));
        assert!(!summary.expenses_by_category.contains_key("Income"));
    }
}
