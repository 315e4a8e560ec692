//! CSV export of the expense list and the monthly trend.

use rust_decimal::{Decimal, RoundingStrategy};

use super::aggregate::MonthlyTotal;
use crate::types::Expense;

pub const EXPENSE_CSV_HEADER: &str = "ID,Date,Merchant,Category,Amount,Status,Notes";
pub const TREND_CSV_HEADER: &str = "Month,Amount";

pub fn expenses_csv<'a, I>(expenses: I) -> String
where
    I: IntoIterator<Item = &'a Expense>,
{
    let mut out = String::from(EXPENSE_CSV_HEADER);
    out.push('\n');
    for expense in expenses {
        let row = [
            field(&expense.id),
            field(&expense.date),
            field(&expense.merchant),
            field(&expense.category),
            amount(expense.amount),
            expense.status.as_str().to_string(),
            field(expense.description.as_deref().unwrap_or_default()),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

pub fn trend_csv(trend: &[MonthlyTotal]) -> String {
    let mut out = String::from(TREND_CSV_HEADER);
    out.push('\n');
    for month in trend {
        out.push_str(&field(&month.label));
        out.push(',');
        out.push_str(&amount(month.amount));
        out.push('\n');
    }
    out
}

fn amount(value: Decimal) -> String {
    format!(
        "{:.2}",
        value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// Quote a field when it contains a delimiter, quote or line break.
fn field(raw: &str) -> String {
    if raw.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}
