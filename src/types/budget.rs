use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{BudgetId, OrgId, ValidationError, require};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum BudgetPeriod {
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl BudgetPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetPeriod::Monthly => "Monthly",
            BudgetPeriod::Quarterly => "Quarterly",
            BudgetPeriod::Yearly => "Yearly",
        }
    }
}

impl std::fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A spending limit for one category.
///
/// `spent` is whatever the data service stored at creation time. It is
/// advisory only: the displayed figure is always derived from the loaded
/// expenses (see [`crate::views::budget_utilization`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: BudgetId,
    pub org_id: OrgId,
    pub category: String,
    #[serde(default)]
    pub spent: Decimal,
    pub total: Decimal,
    pub period: BudgetPeriod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, rename = "bg", skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

impl Budget {
    pub fn apply(&mut self, update: &BudgetUpdate) {
        if let Some(category) = &update.category {
            self.category = category.clone();
        }
        if let Some(total) = update.total {
            self.total = total;
        }
        if let Some(period) = update.period {
            self.period = period;
        }
        if let Some(icon) = &update.icon {
            self.icon = Some(icon.clone());
        }
        if let Some(color) = &update.color {
            self.color = Some(color.clone());
        }
        if let Some(background) = &update.background {
            self.background = Some(background.clone());
        }
    }
}

/// Payload for creating a budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBudget {
    pub category: String,
    pub total: Decimal,
    pub period: BudgetPeriod,
    #[serde(default)]
    pub spent: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, rename = "bg", skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

impl NewBudget {
    pub fn new(category: impl Into<String>, total: Decimal, period: BudgetPeriod) -> Self {
        Self {
            category: category.into(),
            total,
            period,
            spent: Decimal::ZERO,
            icon: None,
            color: None,
            background: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require("category", &self.category)?;
        if self.total <= Decimal::ZERO {
            return Err(ValidationError::new("total", "must be greater than zero"));
        }
        Ok(())
    }
}

/// Partial update of a budget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<BudgetPeriod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(rename = "bg", skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

impl BudgetUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(category) = &self.category {
            require("category", category)?;
        }
        if self.total.is_some_and(|t| t <= Decimal::ZERO) {
            return Err(ValidationError::new("total", "must be greater than zero"));
        }
        Ok(())
    }
}
