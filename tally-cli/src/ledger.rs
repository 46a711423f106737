use anyhow::{Context, Result, bail};
use tally_core::{
    AggregateSnapshot, BudgetStatus, ClockIds, RawTransaction, Transaction, TransactionFilter, TransactionId,
    TransactionStore, TransactionType, YearMonth, compute_totals, display_label, format_amount, format_signed_with,
    month_expenses, newest_first, normalize, today_in,
};

use crate::budget_cmd::print_budget_status;
use crate::config::Config;
use crate::state;

pub struct AddArgs {
    pub kind: String,
    pub amount: String,
    pub category: Option<String>,
    pub payment: String,
    pub date: Option<String>,
    pub note: Option<String>,
}

pub fn add(cfg: &Config, args: AddArgs) -> Result<()> {
    let payment_method = cfg.payment_method(&args.payment)?;
    let date = match args.date {
        Some(d) => d,
        None => today_in(&cfg.profile.timezone)?.format("%Y-%m-%d").to_string(),
    };

    let raw = RawTransaction {
        kind: args.kind,
        amount_text: args.amount,
        category: args.category,
        payment_method,
        date,
        description: args.note,
    };

    let t = normalize(&raw, &ClockIds::new()).context("invalid transaction")?;
    if t.is_income() && raw.category.is_some() {
        println!("Note: income is recorded without a category.");
    }
    if let Some(category) = t.category.as_deref().filter(|c| !cfg.is_known_category(c)) {
        tracing::info!(category, "category not in configured list");
    }

    let mut store = state::open_store()?;
    store.insert(t.clone())?;

    println!("Added {}", row(cfg, &t));
    Ok(())
}

pub fn list(
    cfg: &Config,
    month: Option<YearMonth>,
    category: Option<String>,
    kind: Option<TransactionType>,
    limit: Option<usize>,
) -> Result<()> {
    let store = state::open_store()?;

    let mut filter = TransactionFilter::new();
    if let Some(m) = month {
        filter = filter.with_month(m);
    }
    if let Some(c) = category {
        filter = filter.with_category(c);
    }
    if let Some(k) = kind {
        filter = filter.with_kind(k);
    }

    let mut rows = filter.apply(store.records());
    newest_first(&mut rows);

    if rows.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }

    let shown = limit.unwrap_or(rows.len());
    for t in rows.iter().take(shown) {
        println!("{}", row(cfg, t));
    }
    if shown < rows.len() {
        println!("... {} more (raise --limit)", rows.len() - shown);
    }

    let totals = compute_totals(rows.iter().copied());
    println!();
    print_totals(cfg, &totals);
    Ok(())
}

pub fn delete(id: &str) -> Result<()> {
    let mut store = state::open_store()?;
    let id = TransactionId::from(id.trim());
    if !store.delete_by_id(&id)? {
        bail!("no transaction with id {}", id);
    }
    println!("Deleted {}", id);
    Ok(())
}

pub fn summary(cfg: &Config, month: Option<YearMonth>) -> Result<()> {
    let month = match month {
        Some(m) => m,
        None => YearMonth::of(today_in(&cfg.profile.timezone)?),
    };
    let store = state::open_store()?;
    let all = store.records();

    println!("# {}\n", month.label());
    let this_month = compute_totals(all.iter().filter(|t| month.contains(t.date)));
    print_totals(cfg, &this_month);

    let overall = compute_totals(all);
    println!(
        "\nAll-time balance: {} across {} transactions",
        format_amount(overall.total_balance, &cfg.display.currency_glyph),
        all.len()
    );

    if let Some(budget) = cfg.budget.monthly {
        println!();
        match BudgetStatus::evaluate(budget, month_expenses(all, month)) {
            Some(status) => print_budget_status(cfg, &status),
            None => println!("Budget: not set"),
        }
    }
    Ok(())
}

pub fn print_totals(cfg: &Config, totals: &AggregateSnapshot) {
    let glyph = cfg.display.currency_glyph.as_str();
    println!("Income:   {}", format_amount(totals.total_income, glyph));
    println!("Expenses: {}", format_amount(totals.total_expenses, glyph));
    println!("Balance:  {}", format_amount(totals.total_balance, glyph));
}

fn row(cfg: &Config, t: &Transaction) -> String {
    let mut line = format!(
        "{}  {:<14} {:>12}  {:<6}  {}",
        t.date.format("%Y-%m-%d"),
        display_label(t),
        format_signed_with(t, &cfg.display.currency_glyph),
        t.payment_method,
        t.id
    );
    if !t.description.is_empty() {
        line.push_str("  ");
        line.push_str(&t.description);
    }
    line
}
