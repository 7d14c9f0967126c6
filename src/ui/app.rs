use anyhow::Result;
use rust_decimal::Decimal;

use crate::agg;
use crate::db::Database;
use crate::matrix;
use crate::models::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    Members,
    Categories,
    Months,
    Dues,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[
            Self::Dashboard,
            Self::Members,
            Self::Categories,
            Self::Months,
            Self::Dues,
        ]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dashboard => write!(f, "Dashboard"),
            Self::Members => write!(f, "Members"),
            Self::Categories => write!(f, "Tontines"),
            Self::Months => write!(f, "Months"),
            Self::Dues => write!(f, "Dues"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Editing,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Editing => write!(f, "EDIT"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone)]
pub(crate) enum PendingAction {
    DeleteMember { id: i64, name: String },
    DeleteCategory { id: i64, name: String },
    DeleteMonth { id: i64, label: String },
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    pub(crate) visible_rows: usize,

    // Loaded collections
    pub(crate) members: Vec<Member>,
    pub(crate) categories: Vec<Category>,
    /// Chronologically sorted (year, then calendar position).
    pub(crate) months: Vec<Month>,
    pub(crate) years: Vec<i32>,
    pub(crate) dues: Vec<Due>,

    // Selected period, as an index into `months`
    pub(crate) period_index: usize,

    // Cursors
    pub(crate) member_index: usize,
    pub(crate) member_scroll: usize,
    pub(crate) category_index: usize,
    pub(crate) month_index: usize,
    pub(crate) month_scroll: usize,
    pub(crate) matrix_row: usize,
    pub(crate) matrix_scroll: usize,
    pub(crate) matrix_col: usize,

    // Dashboard
    pub(crate) grand_total: Decimal,
    pub(crate) late_dues: usize,
    pub(crate) missing_cells: i64,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,
}

impl App {
    pub(crate) fn new() -> Self {
        Self {
            running: true,
            screen: Screen::Dashboard,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,
            visible_rows: 20,
            members: Vec::new(),
            categories: Vec::new(),
            months: Vec::new(),
            years: Vec::new(),
            dues: Vec::new(),
            period_index: 0,
            member_index: 0,
            member_scroll: 0,
            category_index: 0,
            month_index: 0,
            month_scroll: 0,
            matrix_row: 0,
            matrix_scroll: 0,
            matrix_col: 0,
            grand_total: Decimal::ZERO,
            late_dues: 0,
            missing_cells: 0,
            pending_action: None,
            confirm_message: String::new(),
        }
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    /// The month the dashboard and dues grid are scoped to.
    pub(crate) fn selected_month(&self) -> Option<&Month> {
        self.months.get(self.period_index)
    }

    /// The due under the matrix cursor, if the cell exists.
    pub(crate) fn selected_due(&self) -> Option<&Due> {
        let member_id = self.members.get(self.matrix_row)?.id?;
        let category_id = self.categories.get(self.matrix_col)?.id?;
        let month_id = self.selected_month()?.id?;
        Due::find(&self.dues, member_id, category_id, month_id)
    }

    // ── Refresh from the store ────────────────────────────────

    pub(crate) fn refresh_members(&mut self, db: &Database) -> Result<()> {
        self.members = db.get_members()?;
        if self.member_index >= self.members.len() {
            self.member_index = self.members.len().saturating_sub(1);
        }
        if self.matrix_row >= self.members.len() {
            self.matrix_row = self.members.len().saturating_sub(1);
        }
        Ok(())
    }

    pub(crate) fn refresh_categories(&mut self, db: &Database) -> Result<()> {
        self.categories = db.get_categories()?;
        if self.category_index >= self.categories.len() {
            self.category_index = self.categories.len().saturating_sub(1);
        }
        if self.matrix_col >= self.categories.len() {
            self.matrix_col = self.categories.len().saturating_sub(1);
        }
        Ok(())
    }

    pub(crate) fn refresh_months(&mut self, db: &Database) -> Result<()> {
        self.months = agg::sort_months_chronologically(&db.get_months()?);
        self.years = agg::group_months_by_year(&self.months);
        if self.period_index >= self.months.len() {
            self.period_index = self.months.len().saturating_sub(1);
        }
        if self.month_index >= self.months.len() {
            self.month_index = self.months.len().saturating_sub(1);
        }
        Ok(())
    }

    pub(crate) fn refresh_dues(&mut self, db: &Database) -> Result<()> {
        self.dues = db.get_dues()?;
        Ok(())
    }

    pub(crate) fn refresh_dashboard(&mut self, db: &Database) -> Result<()> {
        self.refresh_dues(db)?;
        self.grand_total = agg::grand_total(&self.dues);
        self.late_dues = agg::late_count(&self.dues);
        self.missing_cells = matrix::missing_cells(db)?;
        Ok(())
    }

    pub(crate) fn refresh_all(&mut self, db: &Database) -> Result<()> {
        self.refresh_members(db)?;
        self.refresh_categories(db)?;
        self.refresh_months(db)?;
        self.refresh_dashboard(db)?;
        Ok(())
    }

    // ── Period navigation ─────────────────────────────────────

    pub(crate) fn next_period(&mut self) {
        if !self.months.is_empty() {
            self.period_index = (self.period_index + 1) % self.months.len();
        }
    }

    pub(crate) fn prev_period(&mut self) {
        if !self.months.is_empty() {
            self.period_index = if self.period_index == 0 {
                self.months.len() - 1
            } else {
                self.period_index - 1
            };
        }
    }

    /// Jump to the first month of the given year, if present.
    pub(crate) fn select_year(&mut self, year: i32) -> bool {
        if let Some(pos) = self.months.iter().position(|m| m.year == year) {
            self.period_index = pos;
            true
        } else {
            false
        }
    }
}
