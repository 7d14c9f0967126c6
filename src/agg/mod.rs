//! Read-side aggregation over the flat due set.
//!
//! Everything here is a pure function over collections already loaded from
//! the store; nothing mutates stored data, and empty input always yields
//! zero or an empty result.

use rust_decimal::Decimal;

use crate::models::{Due, Month};

/// Sum of every amount in the set.
pub(crate) fn grand_total(dues: &[Due]) -> Decimal {
    dues.iter().map(|d| d.amount).sum()
}

pub(crate) fn total_for_member_in_month(dues: &[Due], member_id: i64, month_id: i64) -> Decimal {
    dues.iter()
        .filter(|d| d.member_id == member_id && d.month_id == month_id)
        .map(|d| d.amount)
        .sum()
}

pub(crate) fn total_for_category_in_month(
    dues: &[Due],
    category_id: i64,
    month_id: i64,
) -> Decimal {
    dues.iter()
        .filter(|d| d.category_id == category_id && d.month_id == month_id)
        .map(|d| d.amount)
        .sum()
}

pub(crate) fn total_for_member(dues: &[Due], member_id: i64) -> Decimal {
    dues.iter()
        .filter(|d| d.member_id == member_id)
        .map(|d| d.amount)
        .sum()
}

pub(crate) fn total_for_category(dues: &[Due], category_id: i64) -> Decimal {
    dues.iter()
        .filter(|d| d.category_id == category_id)
        .map(|d| d.amount)
        .sum()
}

pub(crate) fn total_for_month(dues: &[Due], month_id: i64) -> Decimal {
    dues.iter()
        .filter(|d| d.month_id == month_id)
        .map(|d| d.amount)
        .sum()
}

pub(crate) fn late_count(dues: &[Due]) -> usize {
    dues.iter().filter(|d| d.is_late).count()
}

/// Distinct years present in the month set, ascending. Drives the year
/// selector.
pub(crate) fn group_months_by_year(months: &[Month]) -> Vec<i32> {
    let mut years: Vec<i32> = months.iter().map(|m| m.year).collect();
    years.sort_unstable();
    years.dedup();
    years
}

/// Order months by year, then by canonical calendar position within the
/// year.
pub(crate) fn sort_months_chronologically(months: &[Month]) -> Vec<Month> {
    let mut sorted = months.to_vec();
    sorted.sort_by_key(|m| (m.year, m.name.index()));
    sorted
}

/// The months of one year, in calendar order.
pub(crate) fn months_in_year(months: &[Month], year: i32) -> Vec<Month> {
    let mut in_year: Vec<Month> = months.iter().filter(|m| m.year == year).cloned().collect();
    in_year.sort_by_key(|m| m.name.index());
    in_year
}

#[cfg(test)]
mod tests;
