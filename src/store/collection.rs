//! A loadable, identity-keyed list of records.

use crate::types::{
    AppNotification, Budget, BudgetId, Expense, Invoice, OrgMember, Organization, PaymentMethod,
};

/// Lifecycle of a collection's last fetch.
///
/// Only fetches move a collection to `Loading`; point mutations leave the
/// status alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

impl LoadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadStatus::Idle => "idle",
            LoadStatus::Loading => "loading",
            LoadStatus::Succeeded => "succeeded",
            LoadStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Records addressable by a unique key.
pub trait Keyed {
    type Key: PartialEq + ?Sized;

    fn key(&self) -> &Self::Key;
}

macro_rules! keyed_by {
    ($ty:ty, $field:ident, $key:ty) => {
        impl Keyed for $ty {
            type Key = $key;

            fn key(&self) -> &Self::Key {
                &self.$field
            }
        }
    };
}

keyed_by!(Organization, id, str);
keyed_by!(OrgMember, user_id, str);
keyed_by!(Expense, id, str);
keyed_by!(Budget, id, BudgetId);
keyed_by!(AppNotification, id, str);
keyed_by!(Invoice, id, str);
keyed_by!(PaymentMethod, id, str);

/// Items plus the status and error of the last fetch.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    items: Vec<T>,
    status: LoadStatus,
    error: Option<String>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            status: LoadStatus::Idle,
            error: None,
        }
    }
}

impl<T: Keyed> Collection<T> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn status(&self) -> LoadStatus {
        self.status
    }

    /// Error message of the last failed fetch, cleared on the next success.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }

    pub fn begin_load(&mut self) {
        self.status = LoadStatus::Loading;
    }

    pub fn finish_load(&mut self, items: Vec<T>) {
        self.items = items;
        self.status = LoadStatus::Succeeded;
        self.error = None;
    }

    /// Record a failed fetch. The previous items are kept.
    pub fn fail_load(&mut self, error: impl ToString) {
        self.status = LoadStatus::Failed;
        self.error = Some(error.to_string());
    }

    /// Drop all items and return to `Idle`.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn prepend(&mut self, item: T) {
        self.items.insert(0, item);
    }

    pub fn append(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn get(&self, key: &T::Key) -> Option<&T> {
        self.items.iter().find(|item| item.key() == key)
    }

    pub fn get_mut(&mut self, key: &T::Key) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.key() == key)
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    /// Replace the record with the same key in place.
    ///
    /// Returns `false` (and changes nothing) if no record matches.
    pub fn replace(&mut self, item: T) -> bool {
        match self.get_mut(item.key()) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }

    /// Remove the record with `key`. Returns `false` if it was absent.
    pub fn remove(&mut self, key: &T::Key) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.key() != key);
        self.items.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BudgetPeriod;
    use rust_decimal::Decimal;

    fn budget(id: BudgetId, category: &str) -> Budget {
        Budget {
            id,
            org_id: "org1".to_string(),
            category: category.to_string(),
            spent: Decimal::ZERO,
            total: Decimal::new(100, 0),
            period: BudgetPeriod::Monthly,
            icon: None,
            color: None,
            background: None,
        }
    }

    #[test]
    fn test_load_lifecycle() {
        let mut budgets = Collection::default();
        assert_eq!(budgets.status(), LoadStatus::Idle);

        budgets.begin_load();
        assert!(budgets.is_loading());

        budgets.finish_load(vec![budget(1, "Software")]);
        assert_eq!(budgets.status(), LoadStatus::Succeeded);
        assert_eq!(budgets.len(), 1);
    }

    #[test]
    fn test_failed_load_keeps_items() {
        let mut budgets = Collection::default();
        budgets.finish_load(vec![budget(1, "Software"), budget(2, "Travel")]);

        budgets.begin_load();
        budgets.fail_load("service unavailable");

        assert_eq!(budgets.status(), LoadStatus::Failed);
        assert_eq!(budgets.error(), Some("service unavailable"));
        assert_eq!(budgets.len(), 2);

        budgets.begin_load();
        budgets.finish_load(vec![budget(1, "Software")]);
        assert_eq!(budgets.error(), None);
    }

    #[test]
    fn test_replace_and_remove_by_key() {
        let mut budgets = Collection::default();
        budgets.finish_load(vec![budget(1, "Software"), budget(2, "Travel")]);

        assert!(budgets.replace(budget(2, "Hosting")));
        assert_eq!(budgets.get(&2).map(|b| b.category.as_str()), Some("Hosting"));

        assert!(!budgets.replace(budget(9, "Food")));
        assert_eq!(budgets.len(), 2);

        assert!(budgets.remove(&1));
        assert!(!budgets.remove(&1));
        assert_eq!(budgets.len(), 1);
    }

    #[test]
    fn test_prepend_append() {
        let mut budgets = Collection::default();
        budgets.append(budget(1, "Software"));
        budgets.append(budget(2, "Travel"));
        budgets.prepend(budget(3, "Food"));

        let ids: Vec<_> = budgets.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_reset() {
        let mut budgets = Collection::default();
        budgets.finish_load(vec![budget(1, "Software")]);
        budgets.reset();
        assert!(budgets.is_empty());
        assert_eq!(budgets.status(), LoadStatus::Idle);
    }
}
