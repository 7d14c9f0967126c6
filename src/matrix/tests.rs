#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::models::{Category, Due, Member, Month, MonthName};

fn add_member(db: &Database, first: &str, last: &str) -> i64 {
    let id = db
        .insert_member(&Member::new(first.into(), last.into()))
        .unwrap();
    on_member_created(db, id).unwrap();
    id
}

fn add_category(db: &Database, name: &str) -> i64 {
    let id = db
        .insert_category(&Category::new(name.into(), String::new()))
        .unwrap();
    on_category_created(db, id).unwrap();
    id
}

fn add_month(db: &Database, name: MonthName, year: i32) -> i64 {
    let id = db.insert_month(&Month::new(name, year)).unwrap();
    on_month_created(db, id).unwrap();
    id
}

// ── Backfill outcomes ─────────────────────────────────────────

#[test]
fn test_member_backfill_skipped_without_categories() {
    let db = Database::open_in_memory().unwrap();
    let id = db
        .insert_member(&Member::new("Awa".into(), "Diop".into()))
        .unwrap();
    let outcome = on_member_created(&db, id).unwrap();
    assert_eq!(outcome, Backfill::Skipped(MissingAxis::Categories));
    assert_eq!(db.due_count().unwrap(), 0);
}

#[test]
fn test_member_backfill_skipped_without_months() {
    let db = Database::open_in_memory().unwrap();
    db.insert_category(&Category::new("Épargne".into(), String::new()))
        .unwrap();
    let id = db
        .insert_member(&Member::new("Awa".into(), "Diop".into()))
        .unwrap();
    let outcome = on_member_created(&db, id).unwrap();
    assert_eq!(outcome, Backfill::Skipped(MissingAxis::Months));
}

#[test]
fn test_skip_does_not_abort_creation() {
    let db = Database::open_in_memory().unwrap();
    let id = db
        .insert_member(&Member::new("Awa".into(), "Diop".into()))
        .unwrap();
    on_member_created(&db, id).unwrap();
    // The member row exists even though no dues could be created
    assert!(db.get_member_by_id(id).unwrap().is_some());
}

#[test]
fn test_single_cell_scenario() {
    // Member A, then category X, then month Janvier 2024:
    // exactly one zero due ties them together.
    let db = Database::open_in_memory().unwrap();
    let member_id = add_member(&db, "A", "A");
    let category_id = add_category(&db, "X");
    let month_id = add_month(&db, MonthName::Janvier, 2024);

    let dues = db.get_dues().unwrap();
    assert_eq!(dues.len(), 1);
    assert_eq!(dues[0].member_id, member_id);
    assert_eq!(dues[0].category_id, category_id);
    assert_eq!(dues[0].month_id, month_id);
    assert_eq!(dues[0].amount, Decimal::ZERO);
    assert!(!dues[0].is_late);
}

#[test]
fn test_new_month_crosses_members_and_categories() {
    // 2 members x 3 categories x 1 month pre-existing; a new month adds
    // exactly 2 x 3 = 6 rows.
    let db = Database::open_in_memory().unwrap();
    add_member(&db, "Awa", "Diop");
    add_member(&db, "Moussa", "Traoré");
    add_category(&db, "Épargne");
    add_category(&db, "Solidarité");
    add_category(&db, "Fête");
    add_month(&db, MonthName::Janvier, 2024);
    assert_eq!(db.due_count().unwrap(), 6);

    let month_id = db
        .insert_month(&Month::new(MonthName::Fevrier, 2024))
        .unwrap();
    let outcome = on_month_created(&db, month_id).unwrap();
    assert_eq!(outcome, Backfill::Created(6));
    assert_eq!(db.due_count().unwrap(), 12);
}

#[test]
fn test_backfill_idempotent() {
    let db = Database::open_in_memory().unwrap();
    add_category(&db, "Épargne");
    add_month(&db, MonthName::Janvier, 2024);
    let member_id = add_member(&db, "Awa", "Diop");

    // Running the same backfill again inserts nothing
    let outcome = on_member_created(&db, member_id).unwrap();
    assert_eq!(outcome, Backfill::Created(0));
    assert_eq!(db.due_count().unwrap(), 1);
}

#[test]
fn test_matrix_complete_regardless_of_creation_order() {
    let db = Database::open_in_memory().unwrap();
    add_month(&db, MonthName::Mars, 2024);
    add_member(&db, "Awa", "Diop");
    add_category(&db, "Épargne");
    add_month(&db, MonthName::Avril, 2024);
    add_member(&db, "Moussa", "Traoré");
    add_category(&db, "Solidarité");

    // 2 members x 2 categories x 2 months
    assert_eq!(db.due_count().unwrap(), 8);
    assert_eq!(missing_cells(&db).unwrap(), 0);
}

#[test]
fn test_existing_amounts_survive_backfill() {
    let db = Database::open_in_memory().unwrap();
    add_category(&db, "Épargne");
    add_month(&db, MonthName::Janvier, 2024);
    let member_id = add_member(&db, "Awa", "Diop");

    let due = &db.get_dues_for_member(member_id).unwrap()[0];
    db.update_due_amount(due.id.unwrap(), dec!(50)).unwrap();

    // A repeated backfill must not reset the paid amount
    on_member_created(&db, member_id).unwrap();
    let due = &db.get_dues_for_member(member_id).unwrap()[0];
    assert_eq!(due.amount, dec!(50));
}

// ── Integrity check and repair ────────────────────────────────

#[test]
fn test_missing_cells_and_repair() {
    let db = Database::open_in_memory().unwrap();
    add_member(&db, "Awa", "Diop");
    add_category(&db, "Épargne");
    add_month(&db, MonthName::Janvier, 2024);
    assert_eq!(missing_cells(&db).unwrap(), 0);

    // Punch a hole in the matrix
    let due_id = db.get_dues().unwrap()[0].id.unwrap();
    db.delete_due(due_id).unwrap();
    assert_eq!(missing_cells(&db).unwrap(), 1);

    assert_eq!(repair(&db).unwrap(), 1);
    assert_eq!(missing_cells(&db).unwrap(), 0);
    assert_eq!(repair(&db).unwrap(), 0);
}

#[test]
fn test_duplicate_ad_hoc_due_rejected() {
    let db = Database::open_in_memory().unwrap();
    let member_id = add_member(&db, "Awa", "Diop");
    let category_id = add_category(&db, "Épargne");
    let month_id = add_month(&db, MonthName::Janvier, 2024);

    // The cell already exists from backfill; the store refuses a second one
    let result = db.insert_due(&Due::new_zero(member_id, category_id, month_id));
    assert!(result.is_err());
    assert_eq!(db.due_count().unwrap(), 1);
}

// ── Outcome descriptions ──────────────────────────────────────

#[test]
fn test_backfill_describe() {
    assert_eq!(Backfill::Created(0).describe(), "Matrix already complete");
    assert_eq!(Backfill::Created(1).describe(), "Backfilled 1 due");
    assert_eq!(Backfill::Created(6).describe(), "Backfilled 6 dues");
    assert!(Backfill::Skipped(MissingAxis::Months)
        .describe()
        .contains("months"));
}
