mod schema;

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::models::*;

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        // Check if schema_version table exists
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database - apply full schema
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        // Existing database - check version and apply migrations
        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    // ── Members ───────────────────────────────────────────────

    pub(crate) fn insert_member(&self, member: &Member) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO members (first_name, last_name, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                member.first_name,
                member.last_name,
                member.created_at,
                member.updated_at,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn get_members(&self) -> Result<Vec<Member>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, first_name, last_name, created_at, updated_at
             FROM members ORDER BY last_name, first_name",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Member {
                id: Some(row.get(0)?),
                first_name: row.get(1)?,
                last_name: row.get(2)?,
                created_at: row.get(3)?,
                updated_at: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_member_by_id(&self, id: i64) -> Result<Option<Member>> {
        let result = self.conn.query_row(
            "SELECT id, first_name, last_name, created_at, updated_at
             FROM members WHERE id = ?1",
            params![id],
            |row| {
                Ok(Member {
                    id: Some(row.get(0)?),
                    first_name: row.get(1)?,
                    last_name: row.get(2)?,
                    created_at: row.get(3)?,
                    updated_at: row.get(4)?,
                })
            },
        );
        match result {
            Ok(m) => Ok(Some(m)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn update_member(&self, id: i64, first_name: &str, last_name: &str) -> Result<()> {
        self.conn.execute(
            "UPDATE members SET first_name = ?1, last_name = ?2, updated_at = ?3 WHERE id = ?4",
            params![first_name, last_name, chrono::Utc::now().to_rfc3339(), id],
        )?;
        Ok(())
    }

    /// Update a member together with a batch of due amounts, atomically.
    /// Either every row is written or none is.
    pub(crate) fn update_member_with_dues(
        &mut self,
        id: i64,
        first_name: &str,
        last_name: &str,
        due_amounts: &[(i64, Decimal)],
    ) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "UPDATE members SET first_name = ?1, last_name = ?2, updated_at = ?3 WHERE id = ?4",
            params![first_name, last_name, chrono::Utc::now().to_rfc3339(), id],
        )?;
        for (due_id, amount) in due_amounts {
            tx.execute(
                "UPDATE dues SET amount = ?1 WHERE id = ?2",
                params![amount.to_string(), due_id],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    pub(crate) fn delete_member(&self, id: i64) -> Result<()> {
        // Dependent dues go with it (ON DELETE CASCADE)
        self.conn
            .execute("DELETE FROM members WHERE id = ?1", params![id])?;
        Ok(())
    }

    pub(crate) fn member_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM members", [], |row| row.get(0))?)
    }

    // ── Categories ────────────────────────────────────────────

    pub(crate) fn insert_category(&self, cat: &Category) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO categories (name, description, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![cat.name, cat.description, cat.created_at, cat.updated_at],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn get_categories(&self) -> Result<Vec<Category>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description, created_at, updated_at
             FROM categories ORDER BY name",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Category {
                id: Some(row.get(0)?),
                name: row.get(1)?,
                description: row.get(2)?,
                created_at: row.get(3)?,
                updated_at: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_category_by_id(&self, id: i64) -> Result<Option<Category>> {
        let result = self.conn.query_row(
            "SELECT id, name, description, created_at, updated_at
             FROM categories WHERE id = ?1",
            params![id],
            |row| {
                Ok(Category {
                    id: Some(row.get(0)?),
                    name: row.get(1)?,
                    description: row.get(2)?,
                    created_at: row.get(3)?,
                    updated_at: row.get(4)?,
                })
            },
        );
        match result {
            Ok(c) => Ok(Some(c)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn update_category(&self, id: i64, name: &str, description: &str) -> Result<()> {
        self.conn.execute(
            "UPDATE categories SET name = ?1, description = ?2, updated_at = ?3 WHERE id = ?4",
            params![name, description, chrono::Utc::now().to_rfc3339(), id],
        )?;
        Ok(())
    }

    pub(crate) fn delete_category(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM categories WHERE id = ?1", params![id])?;
        Ok(())
    }

    pub(crate) fn category_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?)
    }

    // ── Months ────────────────────────────────────────────────

    pub(crate) fn insert_month(&self, month: &Month) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO months (name, year) VALUES (?1, ?2)",
            params![month.name.as_str(), month.year],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn get_months(&self) -> Result<Vec<Month>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, year FROM months ORDER BY year, id")?;
        let rows = stmt.query_map([], |row| {
            let name_str: String = row.get(1)?;
            let name = MonthName::parse(&name_str).ok_or_else(|| {
                rusqlite::Error::FromSqlConversionFailure(
                    1,
                    rusqlite::types::Type::Text,
                    format!("unknown month label: {name_str}").into(),
                )
            })?;
            Ok(Month {
                id: Some(row.get(0)?),
                name,
                year: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_month_by_id(&self, id: i64) -> Result<Option<Month>> {
        let result = self.conn.query_row(
            "SELECT id, name, year FROM months WHERE id = ?1",
            params![id],
            |row| {
                let name_str: String = row.get(1)?;
                let name = MonthName::parse(&name_str).ok_or_else(|| {
                    rusqlite::Error::FromSqlConversionFailure(
                        1,
                        rusqlite::types::Type::Text,
                        format!("unknown month label: {name_str}").into(),
                    )
                })?;
                Ok(Month {
                    id: Some(row.get(0)?),
                    name,
                    year: row.get(2)?,
                })
            },
        );
        match result {
            Ok(m) => Ok(Some(m)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Rename a period. The `UNIQUE(name, year)` index rejects a move onto
    /// an occupied slot.
    pub(crate) fn update_month(&self, id: i64, name: MonthName, year: i32) -> Result<()> {
        self.conn.execute(
            "UPDATE months SET name = ?1, year = ?2 WHERE id = ?3",
            params![name.as_str(), year, id],
        )?;
        Ok(())
    }

    pub(crate) fn delete_month(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM months WHERE id = ?1", params![id])?;
        Ok(())
    }

    pub(crate) fn month_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM months", [], |row| row.get(0))?)
    }

    // ── Dues ──────────────────────────────────────────────────

    /// Ad hoc insert. The unique index on (member, category, month)
    /// rejects a duplicate matrix cell.
    pub(crate) fn insert_due(&self, due: &Due) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO dues (amount, is_late, member_id, category_id, month_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                due.amount.to_string(),
                due.is_late,
                due.member_id,
                due.category_id,
                due.month_id,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn get_dues(&self) -> Result<Vec<Due>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, amount, is_late, member_id, category_id, month_id
             FROM dues ORDER BY id",
        )?;
        let rows = stmt.query_map([], Self::map_due_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_dues_for_member(&self, member_id: i64) -> Result<Vec<Due>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, amount, is_late, member_id, category_id, month_id
             FROM dues WHERE member_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![member_id], Self::map_due_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_dues_for_month(&self, month_id: i64) -> Result<Vec<Due>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, amount, is_late, member_id, category_id, month_id
             FROM dues WHERE month_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![month_id], Self::map_due_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_due_by_id(&self, id: i64) -> Result<Option<Due>> {
        let result = self.conn.query_row(
            "SELECT id, amount, is_late, member_id, category_id, month_id
             FROM dues WHERE id = ?1",
            params![id],
            Self::map_due_row,
        );
        match result {
            Ok(d) => Ok(Some(d)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn map_due_row(row: &rusqlite::Row) -> rusqlite::Result<Due> {
        let amount_str: String = row.get(1)?;
        Ok(Due {
            id: Some(row.get(0)?),
            amount: Decimal::from_str(&amount_str).unwrap_or_default(),
            is_late: row.get(2)?,
            member_id: row.get(3)?,
            category_id: row.get(4)?,
            month_id: row.get(5)?,
        })
    }

    pub(crate) fn update_due_amount(&self, id: i64, amount: Decimal) -> Result<()> {
        self.conn.execute(
            "UPDATE dues SET amount = ?1 WHERE id = ?2",
            params![amount.to_string(), id],
        )?;
        Ok(())
    }

    pub(crate) fn set_due_late(&self, id: i64, is_late: bool) -> Result<()> {
        self.conn.execute(
            "UPDATE dues SET is_late = ?1 WHERE id = ?2",
            params![is_late, id],
        )?;
        Ok(())
    }

    pub(crate) fn delete_due(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM dues WHERE id = ?1", params![id])?;
        Ok(())
    }

    pub(crate) fn due_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM dues", [], |row| row.get(0))?)
    }

    // ── Matrix backfill ───────────────────────────────────────
    //
    // Each backfill is one bulk statement: the matrix invariant is never
    // visible half-restored, and INSERT OR IGNORE against the unique index
    // makes every variant idempotent.

    /// Create the zero due for every (category, month) pair this member
    /// does not have yet. Returns the number of rows inserted.
    pub(crate) fn backfill_dues_for_member(&self, member_id: i64) -> Result<usize> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO dues (amount, is_late, member_id, category_id, month_id)
             SELECT '0', 0, ?1, c.id, m.id FROM categories c CROSS JOIN months m",
            params![member_id],
        )?;
        Ok(inserted)
    }

    /// Create the zero due for every (member, month) pair missing in this
    /// category.
    pub(crate) fn backfill_dues_for_category(&self, category_id: i64) -> Result<usize> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO dues (amount, is_late, member_id, category_id, month_id)
             SELECT '0', 0, mb.id, ?1, mo.id FROM members mb CROSS JOIN months mo",
            params![category_id],
        )?;
        Ok(inserted)
    }

    /// Create the zero due for every (member, category) pair missing in
    /// this month.
    pub(crate) fn backfill_dues_for_month(&self, month_id: i64) -> Result<usize> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO dues (amount, is_late, member_id, category_id, month_id)
             SELECT '0', 0, mb.id, c.id, ?1 FROM members mb CROSS JOIN categories c",
            params![month_id],
        )?;
        Ok(inserted)
    }

    /// Fill every missing cell of the whole matrix.
    pub(crate) fn backfill_missing_dues(&self) -> Result<usize> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO dues (amount, is_late, member_id, category_id, month_id)
             SELECT '0', 0, mb.id, c.id, mo.id
             FROM members mb CROSS JOIN categories c CROSS JOIN months mo",
            [],
        )?;
        Ok(inserted)
    }

    /// Count (member, category, month) triples with no due row.
    pub(crate) fn count_missing_due_cells(&self) -> Result<i64> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*)
             FROM members mb CROSS JOIN categories c CROSS JOIN months mo
             WHERE NOT EXISTS (
                 SELECT 1 FROM dues d
                 WHERE d.member_id = mb.id
                   AND d.category_id = c.id
                   AND d.month_id = mo.id
             )",
            [],
            |row| row.get(0),
        )?)
    }

    // ── Export ────────────────────────────────────────────────

    /// Export the joined dues ledger to CSV, optionally limited to one
    /// year. Returns the number of rows written.
    pub(crate) fn export_dues_to_csv(&self, path: &str, year: Option<i32>) -> Result<usize> {
        let (sql, param_values): (String, Vec<Box<dyn rusqlite::types::ToSql>>) =
            if let Some(y) = year {
                (
                    "SELECT mb.first_name, mb.last_name, c.name, mo.name, mo.year,
                            d.amount, d.is_late
                     FROM dues d
                     JOIN members mb ON d.member_id = mb.id
                     JOIN categories c ON d.category_id = c.id
                     JOIN months mo ON d.month_id = mo.id
                     WHERE mo.year = ?1
                     ORDER BY mo.year, mo.id, c.name, mb.last_name"
                        .into(),
                    vec![Box::new(y)],
                )
            } else {
                (
                    "SELECT mb.first_name, mb.last_name, c.name, mo.name, mo.year,
                            d.amount, d.is_late
                     FROM dues d
                     JOIN members mb ON d.member_id = mb.id
                     JOIN categories c ON d.category_id = c.id
                     JOIN months mo ON d.month_id = mo.id
                     ORDER BY mo.year, mo.id, c.name, mb.last_name"
                        .into(),
                    vec![],
                )
            };

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, i32>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, bool>(6)?,
            ))
        })?;

        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create export file: {path}"))?;
        writer.write_record([
            "first_name",
            "last_name",
            "category",
            "month",
            "year",
            "amount",
            "late",
        ])?;

        let mut count = 0;
        for row in rows {
            let (first, last, cat, month, year, amount, late) = row?;
            writer.write_record([
                first.as_str(),
                last.as_str(),
                cat.as_str(),
                month.as_str(),
                &year.to_string(),
                amount.as_str(),
                if late { "yes" } else { "no" },
            ])?;
            count += 1;
        }
        writer.flush()?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests;
