// 💰 Expense Store - the one authoritative collection of expenses
//
// Records are kept newest-first: `add` always inserts at the head.
// Every derived view (filters, totals) is computed on demand and never cached.
// Records are immutable once added; there is no update or delete.

use crate::category::ExpenseCategory;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;
use uuid::Uuid;

// ============================================================================
// RECORDS
// ============================================================================

/// A stored expense. Identity (`id`) is assigned by the store and never reused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: Uuid,
    pub amount: f64,
    pub description: String,
    pub date: DateTime<Utc>,
    pub category: ExpenseCategory,
}

/// An expense as submitted by a front-end, before the store assigns identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    pub amount: f64,
    pub description: String,
    /// Defaults to "now" when the store accepts it
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    pub category: ExpenseCategory,
}

impl NewExpense {
    pub fn new(amount: f64, description: impl Into<String>, category: ExpenseCategory) -> Self {
        NewExpense {
            amount,
            description: description.into(),
            date: None,
            category,
        }
    }

    pub fn on(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    /// Input-form check run by front-ends before calling `ExpenseStore::add`.
    ///
    /// The store itself accepts whatever it is given.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(ValidationError::NonPositiveAmount(self.amount));
        }
        if self.description.trim().is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    NonPositiveAmount(f64),
    EmptyDescription,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NonPositiveAmount(amount) => {
                write!(f, "Amount must be greater than zero (got {})", amount)
            }
            ValidationError::EmptyDescription => write!(f, "Description must not be empty"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Aggregate for one category; zero when nothing matches
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: ExpenseCategory,
    pub total: f64,
}

// ============================================================================
// CHANGE NOTIFICATION
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    Added(ExpenseRecord),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&StoreEvent) + Send>;

// ============================================================================
// STORE
// ============================================================================

pub struct ExpenseStore {
    /// Newest first
    records: Vec<ExpenseRecord>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl ExpenseStore {
    pub fn new() -> Self {
        ExpenseStore {
            records: Vec::new(),
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Assign identity and default date, insert at the head, then notify listeners.
    pub fn add(&mut self, expense: NewExpense) -> ExpenseRecord {
        let record = ExpenseRecord {
            id: Uuid::new_v4(),
            amount: expense.amount,
            description: expense.description,
            date: expense.date.unwrap_or_else(Utc::now),
            category: expense.category,
        };

        debug!(
            id = %record.id,
            category = %record.category,
            amount = record.amount,
            "expense added"
        );

        self.records.insert(0, record.clone());

        let event = StoreEvent::Added(record.clone());
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }

        record
    }

    /// Full sequence, newest first
    pub fn all(&self) -> &[ExpenseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&ExpenseRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Records in `category` (relative order preserved), or everything for `None`
    pub fn filtered_by(&self, category: Option<ExpenseCategory>) -> Vec<&ExpenseRecord> {
        match category {
            Some(category) => self
                .records
                .iter()
                .filter(|r| r.category == category)
                .collect(),
            None => self.records.iter().collect(),
        }
    }

    /// The `limit` most recently added records
    pub fn recent(&self, limit: usize) -> &[ExpenseRecord] {
        &self.records[..limit.min(self.records.len())]
    }

    /// Records whose UTC calendar date falls in `[from, to]`
    pub fn between(&self, from: NaiveDate, to: NaiveDate) -> Vec<&ExpenseRecord> {
        self.records
            .iter()
            .filter(|r| {
                let day = r.date.date_naive();
                day >= from && day <= to
            })
            .collect()
    }

    pub fn total_for(&self, category: ExpenseCategory) -> f64 {
        self.records
            .iter()
            .filter(|r| r.category == category)
            .map(|r| r.amount)
            .sum()
    }

    pub fn total_all(&self) -> f64 {
        self.records.iter().map(|r| r.amount).sum()
    }

    /// One entry per category in declared order, including empty ones
    pub fn category_totals(&self) -> Vec<CategoryTotal> {
        ExpenseCategory::ALL
            .iter()
            .map(|&category| CategoryTotal {
                category,
                total: self.total_for(category),
            })
            .collect()
    }

    /// Register a callback fired synchronously after every mutation
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&StoreEvent) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        debug!(subscription = id.0, "store listener registered");
        id
    }

    /// Returns false when `id` is not (or no longer) registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }
}

impl Default for ExpenseStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ExpenseStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpenseStore")
            .field("records", &self.records)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::{Arc, Mutex};

    fn scenario_store() -> ExpenseStore {
        let mut store = ExpenseStore::new();
        store.add(NewExpense::new(20.00, "Coffee", ExpenseCategory::Food));
        store.add(NewExpense::new(15.50, "Bus", ExpenseCategory::Transport));
        store
    }

    fn mixed_store() -> ExpenseStore {
        let mut store = ExpenseStore::new();
        store.add(NewExpense::new(12.0, "Lunch", ExpenseCategory::Food));
        store.add(NewExpense::new(60.0, "Power bill", ExpenseCategory::Utilities));
        store.add(NewExpense::new(8.25, "Snacks", ExpenseCategory::Food));
        store.add(NewExpense::new(30.0, "Cinema", ExpenseCategory::Entertainment));
        store.add(NewExpense::new(3.5, "Metro", ExpenseCategory::Transport));
        store.add(NewExpense::new(19.75, "Dinner", ExpenseCategory::Food));
        store
    }

    #[test]
    fn test_scenario_totals() {
        let store = scenario_store();

        assert_eq!(store.total_all(), 35.50);
        assert_eq!(store.total_for(ExpenseCategory::Food), 20.00);
        assert_eq!(store.total_for(ExpenseCategory::Entertainment), 0.0);
        assert_eq!(store.all()[0].description, "Bus");
    }

    #[test]
    fn test_scenario_category_totals_in_declared_order() {
        let totals = scenario_store().category_totals();

        let expected = [
            (ExpenseCategory::Food, 20.00),
            (ExpenseCategory::Transport, 15.50),
            (ExpenseCategory::Utilities, 0.0),
            (ExpenseCategory::Entertainment, 0.0),
            (ExpenseCategory::Other, 0.0),
        ];
        assert_eq!(totals.len(), 5);
        for (total, (category, amount)) in totals.iter().zip(expected) {
            assert_eq!(total.category, category);
            assert_eq!(total.total, amount);
        }
    }

    #[test]
    fn test_add_inserts_newest_first() {
        let mut store = ExpenseStore::new();
        let descriptions = ["first", "second", "third", "fourth"];
        for d in descriptions {
            store.add(NewExpense::new(1.0, d, ExpenseCategory::Other));
        }

        assert_eq!(store.len(), descriptions.len());
        let order: Vec<&str> = store.all().iter().map(|r| r.description.as_str()).collect();
        assert_eq!(order, vec!["fourth", "third", "second", "first"]);
    }

    #[test]
    fn test_add_assigns_unique_ids_and_default_date() {
        let mut store = ExpenseStore::new();
        let before = Utc::now();
        let a = store.add(NewExpense::new(5.0, "A", ExpenseCategory::Food));
        let b = store.add(NewExpense::new(5.0, "A", ExpenseCategory::Food));
        let after = Utc::now();

        assert_ne!(a.id, b.id);
        assert!(a.date >= before && a.date <= after);
        assert_eq!(store.get(a.id), Some(&a));
    }

    #[test]
    fn test_add_keeps_explicit_date() {
        let mut store = ExpenseStore::new();
        let date = Utc.with_ymd_and_hms(2024, 3, 15, 9, 30, 0).unwrap();
        let record = store.add(NewExpense::new(9.99, "Book", ExpenseCategory::Other).on(date));

        assert_eq!(record.date, date);
    }

    #[test]
    fn test_add_accepts_invalid_input_as_given() {
        let mut store = ExpenseStore::new();
        store.add(NewExpense::new(10.0, "Refund offset", ExpenseCategory::Food));
        store.add(NewExpense::new(-4.0, "", ExpenseCategory::Food));
        store.add(NewExpense::new(0.0, "Zero", ExpenseCategory::Food));

        assert_eq!(store.len(), 3);
        assert_eq!(store.total_for(ExpenseCategory::Food), 6.0);
    }

    #[test]
    fn test_filtered_by_preserves_order() {
        let store = mixed_store();
        let food: Vec<&str> = store
            .filtered_by(Some(ExpenseCategory::Food))
            .iter()
            .map(|r| r.description.as_str())
            .collect();

        assert_eq!(food, vec!["Dinner", "Snacks", "Lunch"]);
        assert!(store.filtered_by(Some(ExpenseCategory::Other)).is_empty());
    }

    #[test]
    fn test_filtered_by_none_is_all() {
        let store = mixed_store();
        let all: Vec<&ExpenseRecord> = store.all().iter().collect();

        assert_eq!(store.filtered_by(None), all);
    }

    #[test]
    fn test_recent_limits() {
        let store = mixed_store();

        assert!(store.recent(0).is_empty());
        assert_eq!(store.recent(2).len(), 2);
        assert_eq!(store.recent(2)[0].description, "Dinner");
        assert_eq!(store.recent(100).len(), store.len());
        assert!(ExpenseStore::new().recent(3).is_empty());
    }

    #[test]
    fn test_total_for_matches_filtered_sum() {
        let store = mixed_store();

        for category in ExpenseCategory::ALL {
            let filtered: f64 = store.filtered_by(Some(category)).iter().map(|r| r.amount).sum();
            assert_eq!(store.total_for(category), filtered);
        }

        let by_category: f64 = store.category_totals().iter().map(|t| t.total).sum();
        assert!((store.total_all() - by_category).abs() < 1e-9);
    }

    #[test]
    fn test_add_changes_only_its_category_total() {
        let mut store = mixed_store();
        let before = store.category_totals();

        store.add(NewExpense::new(42.0, "Concert", ExpenseCategory::Entertainment));
        let after = store.category_totals();

        for (b, a) in before.iter().zip(after.iter()) {
            if a.category == ExpenseCategory::Entertainment {
                assert_eq!(a.total, b.total + 42.0);
            } else {
                assert_eq!(a.total, b.total);
            }
        }
    }

    #[test]
    fn test_empty_store_totals() {
        let store = ExpenseStore::new();

        assert!(store.is_empty());
        assert_eq!(store.total_all(), 0.0);
        let totals = store.category_totals();
        assert_eq!(totals.len(), ExpenseCategory::COUNT);
        assert!(totals.iter().all(|t| t.total == 0.0));
    }

    #[test]
    fn test_between_is_inclusive() {
        let mut store = ExpenseStore::new();
        for day in 1..=5 {
            let date = Utc.with_ymd_and_hms(2024, 6, day, 23, 59, 0).unwrap();
            let description = format!("day {}", day);
            store.add(NewExpense::new(day as f64, description, ExpenseCategory::Food).on(date));
        }

        let from = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 6, 4).unwrap();
        let days: Vec<&str> = store
            .between(from, to)
            .iter()
            .map(|r| r.description.as_str())
            .collect();

        assert_eq!(days, vec!["day 4", "day 3", "day 2"]);
        assert!(store.between(to, from).is_empty());
    }

    #[test]
    fn test_subscribers_notified_after_insert() {
        let mut store = ExpenseStore::new();
        let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        store.subscribe(move |event| {
            let StoreEvent::Added(record) = event;
            sink.lock().unwrap().push(record.description.clone());
        });

        store.add(NewExpense::new(1.0, "Tea", ExpenseCategory::Food));
        store.add(NewExpense::new(2.0, "Train", ExpenseCategory::Transport));

        assert_eq!(*seen.lock().unwrap(), vec!["Tea".to_string(), "Train".to_string()]);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let mut store = ExpenseStore::new();
        let count = Arc::new(Mutex::new(0));

        let counter = count.clone();
        let id = store.subscribe(move |_| *counter.lock().unwrap() += 1);

        store.add(NewExpense::new(1.0, "Tea", ExpenseCategory::Food));
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.add(NewExpense::new(1.0, "Tea", ExpenseCategory::Food));

        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn test_validate() {
        assert!(NewExpense::new(20.0, "Coffee", ExpenseCategory::Food).validate().is_ok());
        assert_eq!(
            NewExpense::new(0.0, "Coffee", ExpenseCategory::Food).validate(),
            Err(ValidationError::NonPositiveAmount(0.0))
        );
        assert_eq!(
            NewExpense::new(5.0, "   ", ExpenseCategory::Food).validate(),
            Err(ValidationError::EmptyDescription)
        );
        assert!(NewExpense::new(f64::NAN, "x", ExpenseCategory::Food).validate().is_err());
    }

    #[test]
    fn test_store_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<ExpenseStore>();
    }
}
