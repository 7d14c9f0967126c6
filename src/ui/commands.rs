use std::collections::HashMap;
use std::sync::LazyLock;

use rust_decimal::Decimal;
use std::str::FromStr;

use super::app::{App, InputMode, PendingAction, Screen};
use crate::db::Database;
use crate::matrix;
use crate::models::{Category, Due, Member, Month, MonthName};

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Database) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit TonTUI", cmd_quit, r);
    register_command!("quit", "Quit TonTUI", cmd_quit, r);
    register_command!("d", "Go to Dashboard", cmd_dashboard, r);
    register_command!("dashboard", "Go to Dashboard", cmd_dashboard, r);
    register_command!("members", "Go to Members", cmd_members, r);
    register_command!("tontines", "Go to Tontines", cmd_categories, r);
    register_command!("months", "Go to Months", cmd_months, r);
    register_command!("dues", "Go to Dues", cmd_dues, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!(
        "member",
        "Add member (e.g. :member Awa Diop)",
        cmd_add_member,
        r
    );
    register_command!(
        "tontine",
        "Add tontine (e.g. :tontine Épargne caisse commune)",
        cmd_add_category,
        r
    );
    register_command!(
        "month",
        "Add month (e.g. :month Janvier 2024)",
        cmd_add_month,
        r
    );
    register_command!(
        "edit-member",
        "Edit selected member, optionally with this month's amounts (e.g. :edit-member Awa Ndiaye 25 10)",
        cmd_edit_member,
        r
    );
    register_command!(
        "edit-tontine",
        "Edit selected tontine (e.g. :edit-tontine Épargne caisse commune)",
        cmd_edit_category,
        r
    );
    register_command!(
        "edit-month",
        "Move selected month (e.g. :edit-month Mars 2025)",
        cmd_edit_month,
        r
    );
    register_command!(
        "set",
        "Set amount of selected due (e.g. :set 25.50)",
        cmd_set_amount,
        r
    );
    register_command!("late", "Toggle late flag of selected due", cmd_late, r);
    register_command!("delete-member", "Delete selected member", cmd_delete_member, r);
    register_command!(
        "delete-tontine",
        "Delete selected tontine",
        cmd_delete_category,
        r
    );
    register_command!("delete-month", "Delete selected month", cmd_delete_month, r);
    register_command!(
        "export",
        "Export dues ledger to CSV (e.g. :export ~/dues.csv)",
        cmd_export,
        r
    );
    register_command!("check", "Count missing matrix cells", cmd_check, r);
    register_command!("repair", "Backfill missing matrix cells", cmd_repair, r);
    register_command!("year", "Jump to a year (e.g. :year 2024)", cmd_year, r);
    register_command!("next-month", "Go to next month", cmd_next_month, r);
    register_command!("prev-month", "Go to previous month", cmd_prev_month, r);

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(());
    }
    let (name, args) = match input.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (input, ""),
    };
    match COMMANDS.get(name) {
        Some(cmd) => (cmd.run)(args, app, db),
        None => {
            app.set_status(format!("Unknown command: :{name}"));
            Ok(())
        }
    }
}

// ── Navigation ────────────────────────────────────────────────

fn cmd_quit(_: &str, app: &mut App, _: &mut Database) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_dashboard(_: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Dashboard;
    app.refresh_dashboard(db)
}

fn cmd_members(_: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Members;
    app.refresh_members(db)?;
    app.refresh_dues(db)
}

fn cmd_categories(_: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Categories;
    app.refresh_categories(db)?;
    app.refresh_dues(db)
}

fn cmd_months(_: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Months;
    app.refresh_months(db)?;
    app.refresh_dues(db)
}

fn cmd_dues(_: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Dues;
    app.refresh_all(db)
}

fn cmd_help(_: &str, app: &mut App, _: &mut Database) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

// ── Entity creation (triggers matrix backfill) ────────────────

fn cmd_add_member(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let mut parts = args.splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let last = parts.next().unwrap_or("").trim();
    if first.is_empty() || last.is_empty() {
        app.set_status("Usage: :member <first> <last>");
        return Ok(());
    }

    let id = db.insert_member(&Member::new(first.into(), last.into()))?;
    let outcome = matrix::on_member_created(db, id)?;
    app.refresh_all(db)?;
    app.set_status(format!("Added member {first} {last} — {}", outcome.describe()));
    Ok(())
}

fn cmd_add_category(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let mut parts = args.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or("").trim();
    let description = parts.next().unwrap_or("").trim();
    if name.is_empty() {
        app.set_status("Usage: :tontine <name> [description]");
        return Ok(());
    }

    let id = db.insert_category(&Category::new(name.into(), description.into()))?;
    let outcome = matrix::on_category_created(db, id)?;
    app.refresh_all(db)?;
    app.set_status(format!("Added tontine {name} — {}", outcome.describe()));
    Ok(())
}

fn cmd_add_month(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let mut parts = args.split_whitespace();
    let name = parts.next().and_then(MonthName::parse);
    let year = parts.next().and_then(|y| y.parse::<i32>().ok());
    let (Some(name), Some(year)) = (name, year) else {
        app.set_status("Usage: :month <name> <year> (e.g. :month Janvier 2024)");
        return Ok(());
    };

    let id = match db.insert_month(&Month::new(name, year)) {
        Ok(id) => id,
        Err(_) => {
            app.set_status(format!("{name} {year} already exists"));
            return Ok(());
        }
    };
    let outcome = matrix::on_month_created(db, id)?;
    app.refresh_all(db)?;
    app.set_status(format!("Added {name} {year} — {}", outcome.describe()));
    Ok(())
}

// ── Updates ───────────────────────────────────────────────────

/// Edit the selected member. Trailing numbers are amounts for the selected
/// month, one per tontine column in display order, written atomically with
/// the name.
fn cmd_edit_member(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let Some(member) = app.members.get(app.member_index) else {
        app.set_status("No member selected");
        return Ok(());
    };
    let Some(id) = member.id else {
        return Ok(());
    };

    let mut parts = args.split_whitespace();
    let first = parts.next().unwrap_or("");
    let last = parts.next().unwrap_or("");
    if first.is_empty() || last.is_empty() {
        app.set_status("Usage: :edit-member <first> <last> [amounts…]");
        return Ok(());
    }
    let Ok(amounts) = parts
        .map(Decimal::from_str)
        .collect::<Result<Vec<_>, _>>()
    else {
        app.set_status("Usage: :edit-member <first> <last> [amounts…]");
        return Ok(());
    };

    if amounts.is_empty() {
        db.update_member(id, first, last)?;
        app.refresh_members(db)?;
        app.set_status(format!("Renamed member to {first} {last}"));
        return Ok(());
    }

    if amounts.iter().any(|a| *a < Decimal::ZERO) {
        app.set_status("Amounts must not be negative");
        return Ok(());
    }
    let Some(month_id) = app.selected_month().and_then(|m| m.id) else {
        app.set_status("No month selected");
        return Ok(());
    };
    let updates: Vec<(i64, Decimal)> = app
        .categories
        .iter()
        .zip(&amounts)
        .filter_map(|(cat, amount)| {
            let due = Due::find(&app.dues, id, cat.id?, month_id)?;
            Some((due.id?, *amount))
        })
        .collect();

    db.update_member_with_dues(id, first, last, &updates)?;
    app.refresh_members(db)?;
    app.refresh_dues(db)?;
    app.set_status(format!(
        "Updated {first} {last} and {} due{}",
        updates.len(),
        if updates.len() == 1 { "" } else { "s" }
    ));
    Ok(())
}

fn cmd_edit_category(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let Some(cat) = app.categories.get(app.category_index) else {
        app.set_status("No tontine selected");
        return Ok(());
    };
    let Some(id) = cat.id else {
        return Ok(());
    };
    let current_description = cat.description.clone();

    let mut parts = args.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or("").trim();
    let description = parts.next().map(str::trim);
    if name.is_empty() {
        app.set_status("Usage: :edit-tontine <name> [description]");
        return Ok(());
    }

    // An omitted description keeps the current one
    db.update_category(id, name, description.unwrap_or(&current_description))?;
    app.refresh_categories(db)?;
    app.set_status(format!("Updated tontine {name}"));
    Ok(())
}

fn cmd_edit_month(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let Some(month) = app.months.get(app.month_index) else {
        app.set_status("No month selected");
        return Ok(());
    };
    let Some(id) = month.id else {
        return Ok(());
    };

    let mut parts = args.split_whitespace();
    let name = parts.next().and_then(MonthName::parse);
    let year = parts.next().and_then(|y| y.parse::<i32>().ok());
    let (Some(name), Some(year)) = (name, year) else {
        app.set_status("Usage: :edit-month <name> <year> (e.g. :edit-month Mars 2025)");
        return Ok(());
    };

    if db.update_month(id, name, year).is_err() {
        app.set_status(format!("{name} {year} already exists"));
        return Ok(());
    }
    app.refresh_months(db)?;
    app.set_status(format!("Moved month to {name} {year}"));
    Ok(())
}

fn cmd_set_amount(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if app.screen != Screen::Dues {
        app.set_status(":set works on the Dues screen");
        return Ok(());
    }
    let Ok(amount) = Decimal::from_str(args.trim()) else {
        app.set_status("Usage: :set <amount>");
        return Ok(());
    };
    if amount < Decimal::ZERO {
        app.set_status("Amount must not be negative");
        return Ok(());
    }

    let Some(due_id) = app.selected_due().and_then(|d| d.id) else {
        app.set_status("No due selected");
        return Ok(());
    };
    db.update_due_amount(due_id, amount)?;
    app.refresh_dues(db)?;
    app.set_status(format!("Set amount to {}", super::util::format_amount(amount)));
    Ok(())
}

fn cmd_late(_: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if app.screen != Screen::Dues {
        app.set_status(":late works on the Dues screen");
        return Ok(());
    }
    let Some(due) = app.selected_due() else {
        app.set_status("No due selected");
        return Ok(());
    };
    let (Some(id), was_late) = (due.id, due.is_late) else {
        return Ok(());
    };
    db.set_due_late(id, !was_late)?;
    app.refresh_dues(db)?;
    app.set_status(if was_late {
        "Marked on time"
    } else {
        "Marked late"
    });
    Ok(())
}

// ── Deletion (confirmed) ──────────────────────────────────────

fn cmd_delete_member(_: &str, app: &mut App, _: &mut Database) -> anyhow::Result<()> {
    let Some(member) = app.members.get(app.member_index) else {
        app.set_status("No member selected");
        return Ok(());
    };
    let Some(id) = member.id else {
        return Ok(());
    };
    let name = member.full_name();
    app.confirm_message = format!("Delete member {name} and all their dues?");
    app.pending_action = Some(PendingAction::DeleteMember { id, name });
    app.input_mode = InputMode::Confirm;
    Ok(())
}

fn cmd_delete_category(_: &str, app: &mut App, _: &mut Database) -> anyhow::Result<()> {
    let Some(cat) = app.categories.get(app.category_index) else {
        app.set_status("No tontine selected");
        return Ok(());
    };
    let Some(id) = cat.id else {
        return Ok(());
    };
    let name = cat.name.clone();
    app.confirm_message = format!("Delete tontine {name} and all its dues?");
    app.pending_action = Some(PendingAction::DeleteCategory { id, name });
    app.input_mode = InputMode::Confirm;
    Ok(())
}

fn cmd_delete_month(_: &str, app: &mut App, _: &mut Database) -> anyhow::Result<()> {
    let Some(month) = app.months.get(app.month_index) else {
        app.set_status("No month selected");
        return Ok(());
    };
    let Some(id) = month.id else {
        return Ok(());
    };
    let label = month.label();
    app.confirm_message = format!("Delete {label} and all its dues?");
    app.pending_action = Some(PendingAction::DeleteMonth { id, label });
    app.input_mode = InputMode::Confirm;
    Ok(())
}

// ── Ledger tools ──────────────────────────────────────────────

fn cmd_export(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let path = if args.is_empty() {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/tontui-dues.csv")
    } else {
        crate::run::cli::shellexpand(args)
    };
    match db.export_dues_to_csv(&path, None) {
        Ok(0) => app.set_status("Nothing to export"),
        Ok(n) => app.set_status(format!("Exported {n} dues to {path}")),
        Err(e) => app.set_status(format!("Export failed: {e}")),
    }
    Ok(())
}

fn cmd_check(_: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let missing = matrix::missing_cells(db)?;
    app.missing_cells = missing;
    if missing == 0 {
        app.set_status("Matrix complete: every member has a due for every tontine and month");
    } else {
        app.set_status(format!("{missing} missing matrix cells — run :repair to fill them"));
    }
    Ok(())
}

fn cmd_repair(_: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let filled = matrix::repair(db)?;
    app.refresh_all(db)?;
    if filled == 0 {
        app.set_status("Matrix already complete");
    } else {
        app.set_status(format!("Backfilled {filled} missing dues"));
    }
    Ok(())
}

fn cmd_year(args: &str, app: &mut App, _: &mut Database) -> anyhow::Result<()> {
    let Ok(year) = args.trim().parse::<i32>() else {
        app.set_status("Usage: :year <yyyy>");
        return Ok(());
    };
    if app.select_year(year) {
        app.set_status(format!("Year {year}"));
    } else {
        app.set_status(format!("No months recorded for {year}"));
    }
    Ok(())
}

fn cmd_next_month(_: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.next_period();
    app.refresh_dashboard(db)?;
    if let Some(month) = app.selected_month() {
        app.set_status(month.label());
    }
    Ok(())
}

fn cmd_prev_month(_: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.prev_period();
    app.refresh_dashboard(db)?;
    if let Some(month) = app.selected_month() {
        app.set_status(month.label());
    }
    Ok(())
}
