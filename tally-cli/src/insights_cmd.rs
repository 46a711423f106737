use anyhow::Result;
use chrono::Datelike;
use tally_core::insights::CategoryChange;
use tally_core::{YearMonth, format_amount, month_over_month, today_in, top_categories};

use crate::config::Config;
use crate::state;

pub fn run(cfg: &Config, top: usize) -> Result<()> {
    let today = today_in(&cfg.profile.timezone)?;
    let month = YearMonth::of(today);
    let store = state::open_store()?;
    let all = store.records();
    let glyph = cfg.display.currency_glyph.as_str();

    println!("## Top categories in {}\n", today.year());
    let top = top_categories(all, today.year(), top);
    if top.is_empty() {
        println!("No expenses recorded this year.");
    }
    for (i, c) in top.iter().enumerate() {
        println!("{}. {:<14} {}", i + 1, c.category, format_amount(c.total, glyph));
    }

    println!("\n## {} vs {}\n", month.label(), month.previous().label());
    let cmp = month_over_month(all, month);
    if cmp.is_unchanged() {
        println!("Spending is steady compared to last month.");
    }
    if let Some(up) = &cmp.biggest_increase {
        println!("Biggest increase: {}", describe(up, glyph));
    }
    if let Some(down) = &cmp.biggest_decrease {
        println!("Biggest decrease: {}", describe(down, glyph));
    }
    Ok(())
}

fn describe(change: &CategoryChange, glyph: &str) -> String {
    let sign = if change.percent_change.is_sign_positive() { "+" } else { "" };
    format!(
        "{} {}{}% ({} -> {})",
        change.category,
        sign,
        change.percent_change,
        format_amount(change.last_month, glyph),
        format_amount(change.this_month, glyph)
    )
}
