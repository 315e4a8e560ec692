//! Domain types for organizations and the records they own.

mod billing;
mod budget;
mod expense;
mod notification;
mod organization;
mod user;
mod validation;

pub use billing::*;
pub use budget::*;
pub use expense::*;
pub use notification::*;
pub use organization::*;
pub use user::*;
pub use validation::*;

/// Organization identifier (e.g. "org1", "org-k3j9x0a1b").
pub type OrgId = String;

pub type UserId = String;

/// Expense identifier, unique within its organization.
pub type ExpenseId = String;

/// Budget identifier, numeric and unique within its organization.
pub type BudgetId = u32;

pub type NotificationId = String;
