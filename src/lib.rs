// Expense Tracker - Core Library
// Exposes the store, chart layout and seeding for the terminal UI, API server, and tests

pub mod category;
pub mod chart;
pub mod config;
pub mod logging;
pub mod seed;
pub mod store;

// Re-export commonly used types
pub use category::{ExpenseCategory, ParseCategoryError};
pub use chart::{layout, AxisTick, Bar, ChartGeometry, LayoutConfig};
pub use config::{AppConfig, SeedConfig, ServerSettings};
pub use seed::{sample_expenses, seed_store};
pub use store::{
    CategoryTotal, ExpenseRecord, ExpenseStore, NewExpense, StoreEvent, SubscriptionId,
    ValidationError,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build a store populated according to `config.seed`
pub fn store_from_config(config: &AppConfig) -> ExpenseStore {
    let mut store = ExpenseStore::new();
    if config.seed.enabled {
        seed_store(&mut store, config.seed.seed, config.seed.count, chrono::Utc::now());
    }
    store
}
