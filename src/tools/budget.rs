/// Tools for the budget tracker
///
/// This module implements the expense_add and budget_summary MCP tools.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{start_of_month, BudgetSummary, DateKey, DomainError, Expense, ExpenseKind};
use crate::storage::{ExpenseStore, StorageError};
use crate::tools::date_or_today;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddExpenseParams {
    #[schemars(description = "Category, e.g. Food, Transport, Salary")]
    pub category: String,
    #[schemars(description = "Positive amount")]
    pub amount: f64,
    #[schemars(description = "expense or income (default expense)")]
    pub kind: Option<String>,
    pub description: Option<String>,
    #[schemars(description = "Day as YYYY-MM-DD (default today)")]
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AddExpenseResponse {
    pub success: bool,
    pub expense: Expense,
    pub message: String,
}

pub fn expense_add<S: ExpenseStore>(
    storage: &S,
    params: AddExpenseParams,
    today: DateKey,
) -> Result<AddExpenseResponse, StorageError> {
    let date = date_or_today(params.date.as_deref(), today)?;
    let kind = params.kind.as_deref().map(str::parse::<ExpenseKind>).transpose()?.unwrap_or_default();

    let expense = Expense::new(date, &params.category, params.amount, kind, params.description)?;
    let expense = storage.create_expense(expense)?;

    let message = format!("💰 Recorded {} of {:.2} in {}", expense.kind, expense.amount, expense.category);
    Ok(AddExpenseResponse { success: true, expense, message })
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct BudgetSummaryParams {
    #[schemars(description = "First day (YYYY-MM-DD), default the first of this month")]
    pub start: Option<String>,
    #[schemars(description = "Last day (YYYY-MM-DD), default today")]
    pub end: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BudgetSummaryResponse {
    pub success: bool,
    pub start: DateKey,
    pub end: DateKey,
    pub summary: BudgetSummary,
    pub entries: Vec<Expense>,
    pub message: String,
}

/// Income, spending and balance over a range, month to date by default
pub fn budget_summary<S: ExpenseStore>(
    storage: &S,
    params: BudgetSummaryParams,
    today: DateKey,
) -> Result<BudgetSummaryResponse, StorageError> {
    let end = date_or_today(params.end.as_deref(), today)?;
    let start = date_or_today(params.start.as_deref(), start_of_month(end))?;
    if end < start {
        return Err(DomainError::InvalidDate(format!("range end {} is before start {}", end, start)).into());
    }

    let entries = storage.expenses_in_range(start, end)?;
    let summary = BudgetSummary::from_expenses(&entries);

    let message = format!(
        "{} entr{} from {} to {}: balance {:.2}",
        entries.len(),
        if entries.len() == 1 { "y" } else { "ies" },
        start,
        end,
        summary.balance
    );
    Ok(BudgetSummaryResponse { success: true, start, end, summary, entries, message })
}
