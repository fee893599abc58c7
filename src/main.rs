// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use expense_tracker::{logging, store_from_config, AppConfig, ExpenseStore};
use std::env;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let config = AppConfig::load().context("Failed to load configuration")?;
    let store = store_from_config(&config);

    if args.len() > 1 && args[1] == "summary" {
        logging::init("info")?;
        run_summary(&store, &config);
    } else {
        // Keep the alternate screen clean unless RUST_LOG asks for more
        logging::init("warn")?;
        run_ui_mode(store, config)?;
    }

    Ok(())
}

fn run_summary(store: &ExpenseStore, config: &AppConfig) {
    println!("💰 Expense Tracker - Summary");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    println!("\n📊 By category:");
    for total in store.category_totals() {
        println!("   {:<14} {:>12.2}", total.category.as_str(), total.total);
    }

    println!("\n🕒 Most recent ({}):", config.recent_limit);
    for record in store.recent(config.recent_limit) {
        println!(
            "   {}  {:<14} {:<30} {:>10.2}",
            record.date.format("%Y-%m-%d"),
            record.category.as_str(),
            record.description,
            record.amount
        );
    }

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✓ {} expenses, total {:.2}", store.len(), store.total_all());
}

#[cfg(feature = "tui")]
fn run_ui_mode(store: ExpenseStore, config: AppConfig) -> Result<()> {
    let mut app = ui::App::new(store, config);
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_store: ExpenseStore, _config: AppConfig) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or print totals with: expense-tracker summary");
    std::process::exit(1);
}
