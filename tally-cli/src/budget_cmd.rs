use anyhow::{Result, bail};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tally_core::normalize::parse_amount;
use tally_core::{BudgetLevel, BudgetStatus, YearMonth, format_amount, month_expenses, today_in};

use crate::config::{Config, load_config, save_config};
use crate::state;

const BAR_WIDTH: usize = 20;

pub fn set(amount: &str) -> Result<()> {
    let amount = parse_amount(amount)?;
    if amount <= Decimal::ZERO {
        bail!("budget must be greater than zero");
    }
    let mut cfg = load_config()?;
    cfg.budget.monthly = Some(amount);
    save_config(&cfg)?;
    tracing::info!(%amount, "monthly budget set");
    println!("Monthly budget set to {}", format_amount(amount, &cfg.display.currency_glyph));
    Ok(())
}

pub fn clear() -> Result<()> {
    let mut cfg = load_config()?;
    cfg.budget.monthly = None;
    save_config(&cfg)?;
    println!("Monthly budget cleared");
    Ok(())
}

pub fn status(cfg: &Config) -> Result<()> {
    let Some(budget) = cfg.budget.monthly else {
        println!("No monthly budget set. Run: tally budget set <amount>");
        return Ok(());
    };

    let month = YearMonth::of(today_in(&cfg.profile.timezone)?);
    let store = state::open_store()?;
    let spent = month_expenses(store.records(), month);

    println!("# Budget for {}\n", month.label());
    match BudgetStatus::evaluate(budget, spent) {
        Some(status) => print_budget_status(cfg, &status),
        None => println!("Budget: not set"),
    }
    Ok(())
}

pub fn print_budget_status(cfg: &Config, status: &BudgetStatus) {
    let glyph = cfg.display.currency_glyph.as_str();
    println!(
        "Budget: {} of {} spent ({}%)",
        format_amount(status.spent, glyph),
        format_amount(status.budget, glyph),
        status.percentage
    );
    println!("[{}] {}", progress_bar(status.progress()), level_text(status.level));
    if status.level == BudgetLevel::Over {
        println!("Over budget by {}", format_amount(-status.remaining, glyph));
    } else {
        println!("Remaining: {}", format_amount(status.remaining, glyph));
    }
}

fn level_text(level: BudgetLevel) -> &'static str {
    match level {
        BudgetLevel::Safe => "on track",
        BudgetLevel::Warning => "watch your spending",
        BudgetLevel::Danger => "close to the limit",
        BudgetLevel::Over => "over budget",
    }
}

fn progress_bar(progress: Decimal) -> String {
    let filled = (progress * Decimal::from(BAR_WIDTH) / Decimal::ONE_HUNDRED)
        .floor()
        .to_usize()
        .unwrap_or(0)
        .min(BAR_WIDTH);
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}
