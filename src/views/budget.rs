//! Budget utilization.
//!
//! A budget's spent amount is always derived from the loaded expenses of
//! its category. The `spent` value stored on the budget record is ignored.

use rust_decimal::Decimal;
use serde::Serialize;

use super::format::{format_currency, format_percentage};
use crate::types::{Budget, CurrencyCode, Expense};

/// Severity band, judged on the raw (unclamped) percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BudgetBand {
    /// Below 50%.
    Nominal,
    /// 50% to below 70%.
    Caution,
    /// 70% to below 85%.
    Elevated,
    /// 85% to below 100%.
    High,
    /// 100% and above.
    OverBudget,
}

impl BudgetBand {
    pub fn for_percentage(percentage: Decimal) -> Self {
        if percentage >= Decimal::ONE_HUNDRED {
            BudgetBand::OverBudget
        } else if percentage >= Decimal::from(85) {
            BudgetBand::High
        } else if percentage >= Decimal::from(70) {
            BudgetBand::Elevated
        } else if percentage >= Decimal::from(50) {
            BudgetBand::Caution
        } else {
            BudgetBand::Nominal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetBand::Nominal => "nominal",
            BudgetBand::Caution => "caution",
            BudgetBand::Elevated => "elevated",
            BudgetBand::High => "high",
            BudgetBand::OverBudget => "over-budget",
        }
    }
}

impl std::fmt::Display for BudgetBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A budget together with its computed spend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetUtilization {
    pub budget: Budget,
    /// Sum of loaded expenses in the budget's category.
    pub spent: Decimal,
    /// `spent / total * 100`, not clamped.
    pub raw_percentage: Decimal,
    /// `raw_percentage` capped at 100, for progress bars.
    pub percentage: Decimal,
    /// `total - spent`; negative when over budget.
    pub remaining: Decimal,
    pub band: BudgetBand,
}

impl BudgetUtilization {
    pub fn is_over_budget(&self) -> bool {
        self.remaining.is_sign_negative() && !self.remaining.is_zero()
    }

    /// "$1,200.00 left" or "$350.00 over".
    pub fn status_text(&self, currency: CurrencyCode) -> String {
        if self.is_over_budget() {
            format!("{} over", format_currency(self.remaining.abs(), currency))
        } else {
            format!("{} left", format_currency(self.remaining, currency))
        }
    }

    pub fn percentage_text(&self) -> String {
        format_percentage(self.raw_percentage)
    }
}

/// Sum of expenses whose category matches exactly.
pub fn category_spend(category: &str, expenses: &[Expense]) -> Decimal {
    expenses
        .iter()
        .filter(|e| e.category == category)
        .map(|e| e.amount)
        .sum()
}

pub fn budget_utilization(budget: &Budget, expenses: &[Expense]) -> BudgetUtilization {
    let spent = category_spend(&budget.category, expenses);

    // A non-positive limit cannot be divided by; any spend against it counts
    // as fully used.
    let raw_percentage = if budget.total > Decimal::ZERO {
        spent / budget.total * Decimal::ONE_HUNDRED
    } else if spent > Decimal::ZERO {
        Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    };

    BudgetUtilization {
        budget: budget.clone(),
        spent,
        raw_percentage,
        percentage: raw_percentage.min(Decimal::ONE_HUNDRED),
        remaining: budget.total - spent,
        band: BudgetBand::for_percentage(raw_percentage),
    }
}

/// Utilization of every budget, in budget order.
pub fn budget_utilizations(budgets: &[Budget], expenses: &[Expense]) -> Vec<BudgetUtilization> {
    budgets
        .iter()
        .map(|b| budget_utilization(b, expenses))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    pub total_budget: Decimal,
    pub total_spent: Decimal,
    pub remaining: Decimal,
}

/// Totals across all budgets. Spend is computed per budget, so an expense
/// category with two budgets is counted twice.
pub fn budget_summary(budgets: &[Budget], expenses: &[Expense]) -> BudgetSummary {
    let total_budget: Decimal = budgets.iter().map(|b| b.total).sum();
    let total_spent: Decimal = budgets
        .iter()
        .map(|b| category_spend(&b.category, expenses))
        .sum();

    BudgetSummary {
        total_budget,
        total_spent,
        remaining: total_budget - total_spent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BudgetPeriod, ExpenseStatus};

    fn expense(category: &str, amount: Decimal, status: ExpenseStatus) -> Expense {
        Expense {
            id: format!("{}-{}", category, amount),
            org_id: "org1".to_string(),
            merchant: "Merchant".to_string(),
            date: "Aug 28, 2024".to_string(),
            category: category.to_string(),
            amount,
            status,
            receipt_url: None,
            description: None,
            user_id: "u1".to_string(),
            user_name: None,
        }
    }

    fn budget(category: &str, spent: i64, total: i64) -> Budget {
        Budget {
            id: 1,
            org_id: "org1".to_string(),
            category: category.to_string(),
            spent: Decimal::from(spent),
            total: Decimal::from(total),
            period: BudgetPeriod::Monthly,
            icon: None,
            color: None,
            background: None,
        }
    }

    fn acme_expenses() -> Vec<Expense> {
        vec![
            expense("Software", Decimal::new(14400, 2), ExpenseStatus::Approved),
            expense("Travel", Decimal::new(85320, 2), ExpenseStatus::Pending),
            expense("Office Supplies", Decimal::new(7899, 2), ExpenseStatus::Rejected),
        ]
    }

    #[test]
    fn test_acme_software_budget() {
        let u = budget_utilization(&budget("Software", 5200, 8000), &acme_expenses());

        assert_eq!(u.spent, Decimal::new(14400, 2));
        assert_eq!(u.raw_percentage, Decimal::new(18, 1));
        assert_eq!(u.band, BudgetBand::Nominal);
        assert_eq!(u.remaining, Decimal::new(785600, 2));
        assert_eq!(u.percentage_text(), "1.8%");
        assert_eq!(u.status_text(CurrencyCode::Usd), "$7,856.00 left");
    }

    #[test]
    fn test_stored_spent_is_ignored() {
        let u = budget_utilization(&budget("Marketing", 9999, 100), &acme_expenses());
        assert_eq!(u.spent, Decimal::ZERO);
        assert_eq!(u.band, BudgetBand::Nominal);
    }

    #[test]
    fn test_band_boundaries() {
        let cases = [
            (0, BudgetBand::Nominal),
            (49, BudgetBand::Nominal),
            (50, BudgetBand::Caution),
            (69, BudgetBand::Caution),
            (70, BudgetBand::Elevated),
            (84, BudgetBand::Elevated),
            (85, BudgetBand::High),
            (99, BudgetBand::High),
            (100, BudgetBand::OverBudget),
            (250, BudgetBand::OverBudget),
        ];
        for (pct, band) in cases {
            assert_eq!(BudgetBand::for_percentage(Decimal::from(pct)), band, "{}%", pct);
        }
    }

    #[test]
    fn test_over_budget_keeps_raw_values() {
        let expenses = vec![
            expense("Travel", Decimal::from(900), ExpenseStatus::Approved),
            expense("Travel", Decimal::from(450), ExpenseStatus::Pending),
        ];
        let u = budget_utilization(&budget("Travel", 0, 1000), &expenses);

        assert_eq!(u.raw_percentage, Decimal::from(135));
        assert_eq!(u.percentage, Decimal::ONE_HUNDRED);
        assert_eq!(u.band, BudgetBand::OverBudget);
        assert!(u.is_over_budget());
        assert_eq!(u.status_text(CurrencyCode::Usd), "$350.00 over");
    }

    #[test]
    fn test_exactly_on_budget() {
        let expenses = vec![expense("Food", Decimal::from(200), ExpenseStatus::Approved)];
        let u = budget_utilization(&budget("Food", 0, 200), &expenses);
        assert_eq!(u.band, BudgetBand::OverBudget);
        assert!(!u.is_over_budget());
        assert_eq!(u.status_text(CurrencyCode::Usd), "$0.00 left");
    }

    #[test]
    fn test_zero_total_does_not_panic() {
        let expenses = vec![expense("Food", Decimal::from(5), ExpenseStatus::Approved)];
        let u = budget_utilization(&budget("Food", 0, 0), &expenses);
        assert_eq!(u.band, BudgetBand::OverBudget);

        let u = budget_utilization(&budget("Food", 0, 0), &[]);
        assert_eq!(u.band, BudgetBand::Nominal);
    }

    #[test]
    fn test_budget_summary() {
        let budgets = vec![budget("Software", 5200, 8000), budget("Travel", 8400, 12000)];
        let summary = budget_summary(&budgets, &acme_expenses());

        assert_eq!(summary.total_budget, Decimal::from(20000));
        assert_eq!(summary.total_spent, Decimal::new(99720, 2));
        assert_eq!(summary.remaining, Decimal::new(1900280, 2));
    }
}
