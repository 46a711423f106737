use chrono::{TimeZone, Utc};
use rust_decimal_macros::dec;
use tally_backup::{JsonFileStore, export_json, import_json, read_csv, restore_into, write_csv};
use tally_core::{
    AggregateSnapshot, ClockIds, RawTransaction, TransactionStore, UuidIds, compute_totals, display_label,
    format_signed, normalize,
};

fn month_of_entries() -> Vec<RawTransaction> {
    vec![
        RawTransaction::income("500", "Bank", "2024-03-02").with_category("Freelance"),
        RawTransaction::expense("120", "Rent", "bKash", "2024-03-05"),
        RawTransaction::expense("30", "Food", "Cash", "2024-03-09").with_description("groceries"),
    ]
}

#[test]
fn test_entries_persist_and_total() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("transactions.json");
    let ids = ClockIds::new();

    let mut store = JsonFileStore::open(&path).unwrap();
    for raw in month_of_entries() {
        store.insert(normalize(&raw, &ids).unwrap()).unwrap();
    }
    drop(store);

    let store = JsonFileStore::open(&path).unwrap();
    let all = store.list_all().unwrap();
    assert_eq!(compute_totals(&all), AggregateSnapshot::new(dec!(500), dec!(150)));
    assert_eq!(compute_totals(&all).total_balance, dec!(350));

    let labels: Vec<_> = all.iter().map(display_label).collect();
    assert_eq!(labels, ["Income", "Rent", "Food"]);
    assert_eq!(format_signed(&all[0]), "+৳500.00");
    assert_eq!(format_signed(&all[2]), "-৳30.00");
}

#[test]
fn test_backup_restores_into_fresh_store() {
    let ids = ClockIds::new();
    let txns: Vec<_> = month_of_entries()
        .iter()
        .map(|raw| normalize(raw, &ids).unwrap())
        .collect();
    let json = export_json(&txns, Utc.with_ymd_and_hms(2024, 3, 31, 20, 0, 0).unwrap()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let mut store = JsonFileStore::open(dir.path().join("transactions.json")).unwrap();
    let restored = restore_into(&mut store, import_json(&json).unwrap(), &UuidIds).unwrap();

    assert_eq!(restored, 3);
    assert_eq!(store.list_all().unwrap(), txns);
}

#[test]
fn test_csv_export_feeds_same_totals() {
    let ids = ClockIds::new();
    let txns: Vec<_> = month_of_entries()
        .iter()
        .map(|raw| normalize(raw, &ids).unwrap())
        .collect();

    let mut buf = Vec::new();
    write_csv(&mut buf, &txns).unwrap();
    let reread = read_csv(buf.as_slice(), &UuidIds).unwrap();

    assert_eq!(compute_totals(&reread), compute_totals(&txns));
    assert!(reread.iter().all(|t| !t.is_income() || t.category.is_none()));
}
