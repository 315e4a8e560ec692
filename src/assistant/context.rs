use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::store::AppState;
use crate::types::{BudgetPeriod, CurrencyCode, ExpenseStatus, format_display_date};

/// Snapshot of the data the assistant may talk about.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantContext {
    pub current_user: Option<String>,
    pub current_date: String,
    pub currency: CurrencyCode,
    pub expenses: Vec<ExpenseContext>,
    pub budgets: Vec<BudgetContext>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseContext {
    pub date: String,
    pub merchant: String,
    pub category: String,
    pub amount: Decimal,
    pub status: ExpenseStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetContext {
    pub category: String,
    pub limit: Decimal,
    pub period: BudgetPeriod,
}

impl AssistantContext {
    /// Capture the active organization's loaded expenses and budgets.
    pub fn from_state(state: &AppState, today: NaiveDate) -> Self {
        Self {
            current_user: state.current_user().map(|u| u.name.clone()),
            current_date: format_display_date(today),
            currency: state.currency(),
            expenses: state
                .expenses
                .iter()
                .map(|e| ExpenseContext {
                    date: e.date.clone(),
                    merchant: e.merchant.clone(),
                    category: e.category.clone(),
                    amount: e.amount,
                    status: e.status,
                })
                .collect(),
            budgets: state
                .budgets
                .iter()
                .map(|b| BudgetContext {
                    category: b.category.clone(),
                    limit: b.total,
                    period: b.period,
                })
                .collect(),
        }
    }

    /// Instructions sent as the first message of every session.
    pub fn system_prompt(&self) -> Result<String, serde_json::Error> {
        let data = serde_json::to_string(self)?;
        let currency = self.currency.as_str();

        Ok(format!(
            "You are ExpenseFlow AI, a helpful financial assistant embedded in an expense \
             management dashboard.\n\
             \n\
             Here is the live context of the user's data:\n\
             {data}\n\
             \n\
             Your goal: answer questions about the user's spending, budgets, and financial \
             health based strictly on the data provided above.\n\
             \n\
             Rules:\n\
             1. Be concise and friendly.\n\
             2. Always format money using the currency code provided ({currency}).\n\
             3. If the user asks about \"recent\" expenses, look at the dates provided.\n\
             4. If the user asks for advice, give simple financial tips based on their spending \
             habits visible in the data.\n\
             5. Do not make up data. If you don't see an expense, say so.\n"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::bootstrapped;

    #[tokio::test]
    async fn test_context_from_store() {
        let (_backend, store) = bootstrapped().await;
        let today = NaiveDate::from_ymd_opt(2024, 8, 30).unwrap();

        let context = store.with_state(|state| AssistantContext::from_state(state, today));

        assert!(context.current_user.is_some());
        assert_eq!(context.current_date, "Aug 30, 2024");
        assert_eq!(context.currency, CurrencyCode::Usd);
        assert_eq!(context.expenses.len(), store.with_state(|s| s.expenses.len()));
        assert_eq!(context.budgets.len(), store.with_state(|s| s.budgets.len()));
    }

    #[test]
    fn test_json_shape() {
        let context = AssistantContext {
            current_user: Some("Alex".to_string()),
            current_date: "Aug 30, 2024".to_string(),
            currency: CurrencyCode::Eur,
            expenses: vec![ExpenseContext {
                date: "Aug 28, 2024".to_string(),
                merchant: "Figma".to_string(),
                category: "Software".to_string(),
                amount: Decimal::from(144),
                status: ExpenseStatus::Approved,
            }],
            budgets: vec![BudgetContext {
                category: "Software".to_string(),
                limit: Decimal::from(8000),
                period: BudgetPeriod::Monthly,
            }],
        };

        let value = serde_json::to_value(&context).unwrap();
        assert_eq!(value["currentUser"], "Alex");
        assert_eq!(value["currentDate"], "Aug 30, 2024");
        assert_eq!(value["currency"], "EUR");
        assert_eq!(value["expenses"][0]["merchant"], "Figma");
        assert_eq!(value["budgets"][0]["limit"], 8000.0);

        let prompt = context.system_prompt().unwrap();
        assert!(prompt.starts_with("You are ExpenseFlow AI"));
        assert!(prompt.contains("\"merchant\":\"Figma\""));
        assert!(prompt.contains("(EUR)"));
    }
}
