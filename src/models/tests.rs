#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

// ── Member ────────────────────────────────────────────────────

#[test]
fn test_member_new_defaults() {
    let member = Member::new("Awa".into(), "Diop".into());
    assert!(member.id.is_none());
    assert_eq!(member.first_name, "Awa");
    assert_eq!(member.last_name, "Diop");
    assert!(!member.created_at.is_empty());
    assert_eq!(member.created_at, member.updated_at);
}

#[test]
fn test_member_full_name() {
    let member = Member::new("Moussa".into(), "Traoré".into());
    assert_eq!(member.full_name(), "Moussa Traoré");
    assert_eq!(format!("{member}"), "Moussa Traoré");
}

// ── Category ──────────────────────────────────────────────────

#[test]
fn test_category_new() {
    let cat = Category::new("Épargne".into(), "Caisse commune".into());
    assert!(cat.id.is_none());
    assert_eq!(cat.name, "Épargne");
    assert_eq!(cat.description, "Caisse commune");
    assert!(!cat.created_at.is_empty());
}

// ── MonthName ─────────────────────────────────────────────────

#[test]
fn test_month_name_parse() {
    assert_eq!(MonthName::parse("Janvier"), Some(MonthName::Janvier));
    assert_eq!(MonthName::parse("janvier"), Some(MonthName::Janvier));
    assert_eq!(MonthName::parse("Février"), Some(MonthName::Fevrier));
    assert_eq!(MonthName::parse("fevrier"), Some(MonthName::Fevrier));
    assert_eq!(MonthName::parse("Août"), Some(MonthName::Aout));
    assert_eq!(MonthName::parse("aout"), Some(MonthName::Aout));
    assert_eq!(MonthName::parse("decembre"), Some(MonthName::Decembre));
    assert_eq!(MonthName::parse("Smarch"), None);
}

#[test]
fn test_month_name_roundtrip() {
    // Every label should roundtrip through as_str -> parse
    for name in MonthName::all() {
        let s = name.as_str();
        assert_eq!(MonthName::parse(s), Some(*name), "Roundtrip failed for {s}");
    }
}

#[test]
fn test_month_name_canonical_order() {
    let all = MonthName::all();
    assert_eq!(all.len(), 12);
    assert_eq!(MonthName::Janvier.index(), 0);
    assert_eq!(MonthName::Fevrier.index(), 1);
    assert_eq!(MonthName::Decembre.index(), 11);
}

#[test]
fn test_month_label() {
    let month = Month::new(MonthName::Janvier, 2024);
    assert_eq!(month.label(), "Janvier 2024");
    assert_eq!(format!("{month}"), "Janvier 2024");
}

// ── Due ───────────────────────────────────────────────────────

#[test]
fn test_due_new_zero() {
    let due = Due::new_zero(1, 2, 3);
    assert!(due.id.is_none());
    assert_eq!(due.amount, Decimal::ZERO);
    assert!(!due.is_late);
    assert_eq!(due.member_id, 1);
    assert_eq!(due.category_id, 2);
    assert_eq!(due.month_id, 3);
}

#[test]
fn test_due_is_paid() {
    let mut due = Due::new_zero(1, 1, 1);
    assert!(!due.is_paid());
    due.amount = dec!(25.00);
    assert!(due.is_paid());
}

#[test]
fn test_due_find_matches_full_triple() {
    let dues = vec![
        Due::new_zero(1, 1, 1),
        Due::new_zero(1, 2, 1),
        Due::new_zero(2, 1, 1),
    ];
    assert_eq!(Due::find(&dues, 1, 2, 1).unwrap().category_id, 2);
    // A two-axis match is not a cell
    assert!(Due::find(&dues, 1, 2, 9).is_none());
    assert!(Due::find(&dues, 2, 2, 1).is_none());
}
