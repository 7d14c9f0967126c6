//! Dues matrix engine.
//!
//! The ledger is a dense three-dimensional grid: every member owes exactly
//! one due per (category, month) pair. The grid is kept complete by
//! backfilling at creation time: whenever an entity is created on one axis,
//! the missing cells against the other two axes are bulk-inserted at zero.

use anyhow::Result;

use crate::db::Database;

/// Which axis had no entities when a backfill was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MissingAxis {
    Members,
    Categories,
    Months,
}

impl std::fmt::Display for MissingAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Members => write!(f, "members"),
            Self::Categories => write!(f, "categories"),
            Self::Months => write!(f, "months"),
        }
    }
}

/// Outcome of a creation-time backfill. A skip is a soft condition, not an
/// error: the entity itself was created, there was just nothing to cross it
/// with yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Backfill {
    Created(usize),
    Skipped(MissingAxis),
}

impl Backfill {
    /// Human-readable status line for the TUI/CLI.
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Created(0) => "Matrix already complete".into(),
            Self::Created(1) => "Backfilled 1 due".into(),
            Self::Created(n) => format!("Backfilled {n} dues"),
            Self::Skipped(axis) => {
                format!("No {axis} yet; dues will appear once the matrix has all three axes")
            }
        }
    }
}

/// Cross a new member against every existing (category, month) pair.
pub(crate) fn on_member_created(db: &Database, member_id: i64) -> Result<Backfill> {
    if db.category_count()? == 0 {
        return Ok(Backfill::Skipped(MissingAxis::Categories));
    }
    if db.month_count()? == 0 {
        return Ok(Backfill::Skipped(MissingAxis::Months));
    }
    Ok(Backfill::Created(db.backfill_dues_for_member(member_id)?))
}

/// Cross a new category against every existing (member, month) pair.
pub(crate) fn on_category_created(db: &Database, category_id: i64) -> Result<Backfill> {
    if db.member_count()? == 0 {
        return Ok(Backfill::Skipped(MissingAxis::Members));
    }
    if db.month_count()? == 0 {
        return Ok(Backfill::Skipped(MissingAxis::Months));
    }
    Ok(Backfill::Created(db.backfill_dues_for_category(category_id)?))
}

/// Cross a new month against every existing (member, category) pair.
pub(crate) fn on_month_created(db: &Database, month_id: i64) -> Result<Backfill> {
    if db.member_count()? == 0 {
        return Ok(Backfill::Skipped(MissingAxis::Members));
    }
    if db.category_count()? == 0 {
        return Ok(Backfill::Skipped(MissingAxis::Categories));
    }
    Ok(Backfill::Created(db.backfill_dues_for_month(month_id)?))
}

/// Number of (member, category, month) triples without a due row. Zero when
/// the matrix invariant holds.
pub(crate) fn missing_cells(db: &Database) -> Result<i64> {
    db.count_missing_due_cells()
}

/// Fill every missing cell with a zero due.
pub(crate) fn repair(db: &Database) -> Result<usize> {
    db.backfill_missing_dues()
}

#[cfg(test)]
mod tests;
