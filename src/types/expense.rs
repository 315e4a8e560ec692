use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ExpenseId, OrgId, UserId, ValidationError, require};

/// Formats accepted for an expense's display date, tried in order.
const DISPLAY_DATE_FORMATS: &[&str] = &["%b %d, %Y", "%B %d, %Y", "%Y-%m-%d"];

/// Approval state of an expense.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum ExpenseStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ExpenseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseStatus::Pending => "Pending",
            ExpenseStatus::Approved => "Approved",
            ExpenseStatus::Rejected => "Rejected",
        }
    }
}

impl std::fmt::Display for ExpenseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single expense owned by one organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: ExpenseId,
    pub org_id: OrgId,
    pub merchant: String,
    /// Display-formatted date (e.g. "Aug 28, 2024"), not a sortable value.
    pub date: String,
    /// Free-form; checked softly against the organization's category set.
    pub category: String,
    pub amount: Decimal,
    pub status: ExpenseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
}

impl Expense {
    /// Best-effort parse of the display date.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_display_date(&self.date)
    }

    pub fn apply(&mut self, update: &ExpenseUpdate) {
        if let Some(merchant) = &update.merchant {
            self.merchant = merchant.clone();
        }
        if let Some(date) = &update.date {
            self.date = date.clone();
        }
        if let Some(category) = &update.category {
            self.category = category.clone();
        }
        if let Some(amount) = update.amount {
            self.amount = amount;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(url) = &update.receipt_url {
            self.receipt_url = Some(url.clone());
        }
        if let Some(description) = &update.description {
            self.description = Some(description.clone());
        }
    }
}

/// Payload for creating an expense. The data service assigns identity,
/// ownership and the creator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub merchant: String,
    pub date: String,
    pub category: String,
    pub amount: Decimal,
    #[serde(default)]
    pub status: ExpenseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewExpense {
    pub fn new(
        merchant: impl Into<String>,
        date: impl Into<String>,
        category: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            merchant: merchant.into(),
            date: date.into(),
            category: category.into(),
            amount,
            status: ExpenseStatus::Pending,
            receipt_url: None,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require("merchant", &self.merchant)?;
        require("date", &self.date)?;
        require("category", &self.category)?;
        if self.amount.is_sign_negative() {
            return Err(ValidationError::new("amount", "must not be negative"));
        }
        Ok(())
    }
}

/// Partial update of an expense.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ExpenseStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ExpenseUpdate {
    /// A status-only transition.
    pub fn status(status: ExpenseStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(merchant) = &self.merchant {
            require("merchant", merchant)?;
        }
        if let Some(date) = &self.date {
            require("date", date)?;
        }
        if let Some(category) = &self.category {
            require("category", category)?;
        }
        if self.amount.is_some_and(|a| a.is_sign_negative()) {
            return Err(ValidationError::new("amount", "must not be negative"));
        }
        Ok(())
    }
}

/// Parse a display date such as "Aug 28, 2024", "August 28, 2024" or
/// "2024-08-28".
pub fn parse_display_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DISPLAY_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

/// Render a date the way expenses store it ("Aug 28, 2024").
pub fn format_display_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}
