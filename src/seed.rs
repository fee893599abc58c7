// 🌱 Sample data - reproducible demo expenses
//
// Same seed and anchor always give the same expenses, so front-ends can start
// with a populated store and tests can rely on the output.

use crate::category::ExpenseCategory;
use crate::store::{ExpenseStore, NewExpense};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// How far back seeded dates reach from the anchor
pub const SEED_WINDOW_DAYS: i64 = 30;

fn descriptions(category: ExpenseCategory) -> &'static [&'static str] {
    match category {
        ExpenseCategory::Food => &["Groceries", "Coffee", "Lunch", "Bakery", "Takeaway"],
        ExpenseCategory::Transport => &["Bus ticket", "Taxi", "Fuel", "Train pass", "Parking"],
        ExpenseCategory::Utilities => &["Electricity", "Water bill", "Internet", "Phone plan"],
        ExpenseCategory::Entertainment => &["Cinema", "Concert", "Streaming", "Books", "Museum"],
        ExpenseCategory::Other => &["Gift", "Haircut", "Pharmacy", "Stationery"],
    }
}

/// Generate `count` expenses dated within the last `SEED_WINDOW_DAYS` before `anchor`,
/// oldest first.
pub fn sample_expenses(seed: u64, count: usize, anchor: DateTime<Utc>) -> Vec<NewExpense> {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut expenses: Vec<NewExpense> = (0..count)
        .map(|_| {
            let category = ExpenseCategory::ALL[rng.gen_range(0..ExpenseCategory::COUNT)];
            let pool = descriptions(category);
            let description = pool[rng.gen_range(0..pool.len())];
            let cents: i64 = rng.gen_range(100..=10_000);
            let minutes_ago = rng.gen_range(0..SEED_WINDOW_DAYS * 24 * 60);

            NewExpense::new(cents as f64 / 100.0, description, category)
                .on(anchor - Duration::minutes(minutes_ago))
        })
        .collect();

    expenses.sort_by_key(|e| e.date);
    expenses
}

/// Add a sample set to `store`; the newest sample ends up at the head.
pub fn seed_store(store: &mut ExpenseStore, seed: u64, count: usize, anchor: DateTime<Utc>) {
    for expense in sample_expenses(seed, count, anchor) {
        store.add(expense);
    }
    debug!(seed, count, "store seeded with sample expenses");
}

// ============================================================================
// TESTS
// ============================================================================
