#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::util::*;

// ── format_amount ─────────────────────────────────────────────

#[test]
fn test_format_amount_basic() {
    assert_eq!(format_amount(dec!(0)), "0.00 €");
    assert_eq!(format_amount(dec!(5)), "5.00 €");
    assert_eq!(format_amount(dec!(12.5)), "12.50 €");
}

#[test]
fn test_format_amount_thousands() {
    assert_eq!(format_amount(dec!(1234.56)), "1,234.56 €");
    assert_eq!(format_amount(dec!(1234567.89)), "1,234,567.89 €");
}

#[test]
fn test_format_amount_negative() {
    assert_eq!(format_amount(dec!(-42.99)), "-42.99 €");
    assert_eq!(format_amount(Decimal::ZERO), "0.00 €");
}

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_short_string_unchanged() {
    assert_eq!(truncate("Épargne", 10), "Épargne");
    assert_eq!(truncate("", 5), "");
}

#[test]
fn test_truncate_long_string() {
    assert_eq!(truncate("Solidarité familiale", 11), "Solidarité…");
    assert!(truncate("Solidarité familiale", 11).chars().count() <= 11);
}

#[test]
fn test_truncate_zero_max() {
    assert_eq!(truncate("anything", 0), "");
}

#[test]
fn test_truncate_multibyte_safe() {
    // Accented labels must not be split mid-codepoint
    let label = "Février Février";
    let out = truncate(label, 9);
    assert_eq!(out.chars().count(), 9);
    assert!(out.ends_with('…'));
}

// ── scroll helpers ────────────────────────────────────────────

#[test]
fn test_scroll_down_moves_cursor_and_window() {
    let (mut index, mut scroll) = (0, 0);
    for _ in 0..5 {
        scroll_down(&mut index, &mut scroll, 10, 3);
    }
    assert_eq!(index, 5);
    assert_eq!(scroll, 3);
}

#[test]
fn test_scroll_down_stops_at_end() {
    let (mut index, mut scroll) = (1, 0);
    scroll_down(&mut index, &mut scroll, 2, 5);
    assert_eq!(index, 1);
}

#[test]
fn test_scroll_up_clamps_at_zero() {
    let (mut index, mut scroll) = (0, 0);
    scroll_up(&mut index, &mut scroll);
    assert_eq!(index, 0);
    assert_eq!(scroll, 0);
}

#[test]
fn test_scroll_to_top_and_bottom() {
    let (mut index, mut scroll) = (7, 5);
    scroll_to_top(&mut index, &mut scroll);
    assert_eq!((index, scroll), (0, 0));

    scroll_to_bottom(&mut index, &mut scroll, 10, 4);
    assert_eq!(index, 9);
    assert_eq!(scroll, 6);
}

#[test]
fn test_scroll_to_bottom_empty_list() {
    let (mut index, mut scroll) = (3, 2);
    scroll_to_bottom(&mut index, &mut scroll, 0, 4);
    // Untouched when there is nothing to select
    assert_eq!((index, scroll), (3, 2));
}
