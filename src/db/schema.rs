pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS members (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name  TEXT NOT NULL,
    last_name   TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS categories (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS months (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name  TEXT NOT NULL,
    year  INTEGER NOT NULL,
    UNIQUE(name, year)
);

CREATE TABLE IF NOT EXISTS dues (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    amount      TEXT NOT NULL DEFAULT '0',
    is_late     BOOLEAN NOT NULL DEFAULT 0,
    member_id   INTEGER NOT NULL REFERENCES members(id) ON DELETE CASCADE,
    category_id INTEGER NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
    month_id    INTEGER NOT NULL REFERENCES months(id) ON DELETE CASCADE,
    UNIQUE(member_id, category_id, month_id)
);

CREATE INDEX IF NOT EXISTS idx_dues_member ON dues(member_id);
CREATE INDEX IF NOT EXISTS idx_dues_category ON dues(category_id);
CREATE INDEX IF NOT EXISTS idx_dues_month ON dues(month_id);

"#;

pub(crate) const CURRENT_VERSION: i32 = 1;

/// Migrations from version N to N+1.
/// Each entry is (from_version, sql).
pub(crate) const MIGRATIONS: &[(i32, &str)] = &[
    // Future migrations go here:
    // (1, "ALTER TABLE dues ADD COLUMN paid_at TEXT;"),
];
