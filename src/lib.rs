//! ExpenseFlow - organization-scoped expense, budget and team state.
//!
//! The [`store::Store`] holds one signed-in user's view of the data service:
//! the organizations they belong to, the active organization, and that
//! organization's expenses, budgets, notifications, roster and billing
//! records. [`views`] derives everything a dashboard renders from those
//! collections.

pub mod access;
pub mod assistant;
pub mod backend;
pub mod config;
pub mod store;
pub mod types;
pub mod views;
