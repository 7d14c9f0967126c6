#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;

fn setup_matrix(db: &Database) -> (i64, i64, i64) {
    let member_id = db
        .insert_member(&Member::new("Awa".into(), "Diop".into()))
        .unwrap();
    let category_id = db
        .insert_category(&Category::new("Épargne".into(), "Caisse commune".into()))
        .unwrap();
    let month_id = db
        .insert_month(&Month::new(MonthName::Janvier, 2024))
        .unwrap();
    db.backfill_missing_dues().unwrap();
    (member_id, category_id, month_id)
}

// ── Open / migrate ────────────────────────────────────────────

#[test]
fn test_open_creates_schema_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tontui.db");
    {
        let db = Database::open(&path).unwrap();
        db.insert_member(&Member::new("Awa".into(), "Diop".into()))
            .unwrap();
    }
    // Re-open without re-applying the schema
    let db = Database::open(&path).unwrap();
    assert_eq!(db.member_count().unwrap(), 1);
}

// ── Member CRUD ───────────────────────────────────────────────

#[test]
fn test_member_crud() {
    let db = Database::open_in_memory().unwrap();
    let id = db
        .insert_member(&Member::new("Awa".into(), "Diop".into()))
        .unwrap();

    let fetched = db.get_member_by_id(id).unwrap().unwrap();
    assert_eq!(fetched.first_name, "Awa");
    assert_eq!(fetched.last_name, "Diop");

    db.update_member(id, "Awa", "Ndiaye").unwrap();
    let updated = db.get_member_by_id(id).unwrap().unwrap();
    assert_eq!(updated.last_name, "Ndiaye");
    assert_ne!(updated.updated_at, updated.created_at);

    db.delete_member(id).unwrap();
    assert!(db.get_member_by_id(id).unwrap().is_none());
}

#[test]
fn test_member_by_id_not_found() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.get_member_by_id(99999).unwrap().is_none());
}

#[test]
fn test_members_sorted_by_name() {
    let db = Database::open_in_memory().unwrap();
    db.insert_member(&Member::new("Moussa".into(), "Traoré".into()))
        .unwrap();
    db.insert_member(&Member::new("Awa".into(), "Diop".into()))
        .unwrap();
    db.insert_member(&Member::new("Binta".into(), "Diop".into()))
        .unwrap();

    let names: Vec<String> = db
        .get_members()
        .unwrap()
        .iter()
        .map(Member::full_name)
        .collect();
    assert_eq!(names, vec!["Awa Diop", "Binta Diop", "Moussa Traoré"]);
}

// ── Category CRUD ─────────────────────────────────────────────

#[test]
fn test_category_crud() {
    let db = Database::open_in_memory().unwrap();
    let id = db
        .insert_category(&Category::new("Épargne".into(), "Caisse".into()))
        .unwrap();

    let fetched = db.get_category_by_id(id).unwrap().unwrap();
    assert_eq!(fetched.name, "Épargne");
    assert_eq!(fetched.description, "Caisse");

    db.update_category(id, "Épargne", "Caisse commune").unwrap();
    assert_eq!(
        db.get_category_by_id(id).unwrap().unwrap().description,
        "Caisse commune"
    );

    db.delete_category(id).unwrap();
    assert!(db.get_category_by_id(id).unwrap().is_none());
}

// ── Month CRUD ────────────────────────────────────────────────

#[test]
fn test_month_roundtrip() {
    let db = Database::open_in_memory().unwrap();
    let id = db
        .insert_month(&Month::new(MonthName::Fevrier, 2024))
        .unwrap();
    let fetched = db.get_month_by_id(id).unwrap().unwrap();
    assert_eq!(fetched.name, MonthName::Fevrier);
    assert_eq!(fetched.year, 2024);
    assert_eq!(fetched.label(), "Février 2024");
}

#[test]
fn test_month_unique_per_year() {
    let db = Database::open_in_memory().unwrap();
    db.insert_month(&Month::new(MonthName::Janvier, 2024))
        .unwrap();
    assert!(db.insert_month(&Month::new(MonthName::Janvier, 2024)).is_err());
    // Same label in another year is fine
    db.insert_month(&Month::new(MonthName::Janvier, 2025))
        .unwrap();
    assert_eq!(db.month_count().unwrap(), 2);
}

#[test]
fn test_update_month() {
    let db = Database::open_in_memory().unwrap();
    let id = db
        .insert_month(&Month::new(MonthName::Janvier, 2024))
        .unwrap();

    db.update_month(id, MonthName::Fevrier, 2025).unwrap();
    let fetched = db.get_month_by_id(id).unwrap().unwrap();
    assert_eq!(fetched.label(), "Février 2025");

    // Moving onto an occupied (name, year) slot is rejected
    let other = db.insert_month(&Month::new(MonthName::Mars, 2025)).unwrap();
    assert!(db.update_month(other, MonthName::Fevrier, 2025).is_err());
    assert_eq!(
        db.get_month_by_id(other).unwrap().unwrap().name,
        MonthName::Mars
    );
}

// ── Due CRUD ──────────────────────────────────────────────────

#[test]
fn test_due_amount_roundtrips_as_decimal() {
    let db = Database::open_in_memory().unwrap();
    let (member_id, _, _) = setup_matrix(&db);

    let due = &db.get_dues_for_member(member_id).unwrap()[0];
    db.update_due_amount(due.id.unwrap(), dec!(12.35)).unwrap();

    let due = db.get_due_by_id(due.id.unwrap()).unwrap().unwrap();
    assert_eq!(due.amount, dec!(12.35));
}

#[test]
fn test_due_late_flag() {
    let db = Database::open_in_memory().unwrap();
    let (_, _, month_id) = setup_matrix(&db);

    let due = &db.get_dues_for_month(month_id).unwrap()[0];
    db.set_due_late(due.id.unwrap(), true).unwrap();
    assert!(db.get_due_by_id(due.id.unwrap()).unwrap().unwrap().is_late);

    db.set_due_late(due.id.unwrap(), false).unwrap();
    assert!(!db.get_due_by_id(due.id.unwrap()).unwrap().unwrap().is_late);
}

#[test]
fn test_dues_filtered_by_axis() {
    let db = Database::open_in_memory().unwrap();
    let (member_id, _, month_id) = setup_matrix(&db);
    let other_month = db
        .insert_month(&Month::new(MonthName::Fevrier, 2024))
        .unwrap();
    db.backfill_dues_for_month(other_month).unwrap();

    assert_eq!(db.get_dues().unwrap().len(), 2);
    assert_eq!(db.get_dues_for_member(member_id).unwrap().len(), 2);
    assert_eq!(db.get_dues_for_month(month_id).unwrap().len(), 1);
    assert_eq!(db.get_dues_for_month(other_month).unwrap().len(), 1);
}

// ── Cascade deletes ───────────────────────────────────────────

#[test]
fn test_delete_category_cascades_to_dues() {
    let db = Database::open_in_memory().unwrap();
    let (_, category_id, _) = setup_matrix(&db);
    assert_eq!(db.due_count().unwrap(), 1);

    db.delete_category(category_id).unwrap();
    assert_eq!(db.due_count().unwrap(), 0);
    assert!(db.get_dues().unwrap().is_empty());
}

#[test]
fn test_delete_member_cascades_to_dues() {
    let db = Database::open_in_memory().unwrap();
    let (member_id, _, _) = setup_matrix(&db);
    db.delete_member(member_id).unwrap();
    assert_eq!(db.due_count().unwrap(), 0);
}

#[test]
fn test_delete_month_cascades_to_dues() {
    let db = Database::open_in_memory().unwrap();
    let (_, _, month_id) = setup_matrix(&db);
    db.delete_month(month_id).unwrap();
    assert_eq!(db.due_count().unwrap(), 0);
}

// ── Transactional member + dues update ────────────────────────

#[test]
fn test_update_member_with_dues() {
    let mut db = Database::open_in_memory().unwrap();
    let (member_id, _, _) = setup_matrix(&db);
    let due_id = db.get_dues_for_member(member_id).unwrap()[0].id.unwrap();

    db.update_member_with_dues(member_id, "Awa", "Ndiaye", &[(due_id, dec!(75))])
        .unwrap();

    assert_eq!(
        db.get_member_by_id(member_id).unwrap().unwrap().last_name,
        "Ndiaye"
    );
    assert_eq!(db.get_due_by_id(due_id).unwrap().unwrap().amount, dec!(75));
}

// ── Export ────────────────────────────────────────────────────

#[test]
fn test_export_dues_to_csv() {
    let db = Database::open_in_memory().unwrap();
    setup_matrix(&db);
    db.insert_month(&Month::new(MonthName::Janvier, 2025))
        .unwrap();
    db.backfill_missing_dues().unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dues.csv");
    let path_str = path.display().to_string();

    let all = db.export_dues_to_csv(&path_str, None).unwrap();
    assert_eq!(all, 2);

    let only_2024 = db.export_dues_to_csv(&path_str, Some(2024)).unwrap();
    assert_eq!(only_2024, 1);

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.starts_with("first_name,last_name,category,month,year,amount,late"));
    assert!(contents.contains("Awa,Diop,Épargne,Janvier,2024,0,no"));
}
