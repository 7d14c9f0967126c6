#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::models::MonthName;

fn due(member_id: i64, category_id: i64, month_id: i64, amount: Decimal) -> Due {
    Due {
        id: None,
        amount,
        is_late: false,
        member_id,
        category_id,
        month_id,
    }
}

fn month(name: MonthName, year: i32) -> Month {
    Month::new(name, year)
}

// ── Totals ────────────────────────────────────────────────────

#[test]
fn test_grand_total_empty_is_zero() {
    assert_eq!(grand_total(&[]), Decimal::ZERO);
}

#[test]
fn test_grand_total_order_independent() {
    let a = due(1, 1, 1, dec!(10.50));
    let b = due(2, 1, 1, dec!(4.25));
    let c = due(1, 2, 2, dec!(0.25));
    let forward = grand_total(&[a.clone(), b.clone(), c.clone()]);
    let backward = grand_total(&[c, b, a]);
    assert_eq!(forward, dec!(15.00));
    assert_eq!(forward, backward);
}

#[test]
fn test_total_for_member_in_month() {
    let dues = vec![
        due(1, 1, 1, dec!(10)),
        due(1, 2, 1, dec!(5)),
        due(1, 1, 2, dec!(100)),
        due(2, 1, 1, dec!(7)),
    ];
    assert_eq!(total_for_member_in_month(&dues, 1, 1), dec!(15));
    assert_eq!(total_for_member_in_month(&dues, 2, 1), dec!(7));
    assert_eq!(total_for_member_in_month(&dues, 3, 1), Decimal::ZERO);
}

#[test]
fn test_total_for_category_in_month() {
    let dues = vec![
        due(1, 1, 1, dec!(10)),
        due(2, 1, 1, dec!(20)),
        due(1, 2, 1, dec!(5)),
        due(1, 1, 2, dec!(40)),
    ];
    assert_eq!(total_for_category_in_month(&dues, 1, 1), dec!(30));
    assert_eq!(total_for_category_in_month(&dues, 2, 1), dec!(5));
    assert_eq!(total_for_category_in_month(&dues, 2, 9), Decimal::ZERO);
}

#[test]
fn test_axis_totals() {
    let dues = vec![
        due(1, 1, 1, dec!(10)),
        due(1, 2, 2, dec!(20)),
        due(2, 1, 1, dec!(1)),
    ];
    assert_eq!(total_for_member(&dues, 1), dec!(30));
    assert_eq!(total_for_category(&dues, 1), dec!(11));
    assert_eq!(total_for_month(&dues, 2), dec!(20));
    assert_eq!(total_for_month(&[], 2), Decimal::ZERO);
}

#[test]
fn test_late_count() {
    let mut a = due(1, 1, 1, dec!(10));
    a.is_late = true;
    let b = due(2, 1, 1, dec!(10));
    assert_eq!(late_count(&[]), 0);
    assert_eq!(late_count(&[a, b]), 1);
}

// ── Month grouping and ordering ───────────────────────────────

#[test]
fn test_group_months_by_year() {
    let months = vec![
        month(MonthName::Mars, 2024),
        month(MonthName::Janvier, 2023),
        month(MonthName::Fevrier, 2024),
        month(MonthName::Decembre, 2023),
    ];
    assert_eq!(group_months_by_year(&months), vec![2023, 2024]);
    assert!(group_months_by_year(&[]).is_empty());
}

#[test]
fn test_sort_months_year_primary() {
    let months = vec![
        month(MonthName::Mars, 2024),
        month(MonthName::Janvier, 2023),
        month(MonthName::Fevrier, 2024),
    ];
    let sorted = sort_months_chronologically(&months);
    let labels: Vec<String> = sorted.iter().map(Month::label).collect();
    assert_eq!(labels, vec!["Janvier 2023", "Février 2024", "Mars 2024"]);
}

#[test]
fn test_sort_months_within_year_uses_calendar_order() {
    let months = vec![
        month(MonthName::Decembre, 2024),
        month(MonthName::Aout, 2024),
        month(MonthName::Janvier, 2024),
    ];
    let sorted = sort_months_chronologically(&months);
    assert_eq!(sorted[0].name, MonthName::Janvier);
    assert_eq!(sorted[1].name, MonthName::Aout);
    assert_eq!(sorted[2].name, MonthName::Decembre);
}

#[test]
fn test_months_in_year() {
    let months = vec![
        month(MonthName::Fevrier, 2024),
        month(MonthName::Janvier, 2023),
        month(MonthName::Janvier, 2024),
    ];
    let in_2024 = months_in_year(&months, 2024);
    assert_eq!(in_2024.len(), 2);
    assert_eq!(in_2024[0].name, MonthName::Janvier);
    assert_eq!(in_2024[1].name, MonthName::Fevrier);
    assert!(months_in_year(&months, 1999).is_empty());
}
