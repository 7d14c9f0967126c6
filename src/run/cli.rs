use anyhow::Result;

use crate::agg;
use crate::db::Database;
use crate::matrix;
use crate::ui::util::format_amount;

pub(crate) fn as_cli(args: &[String], db: &mut Database) -> Result<()> {
    match args[1].as_str() {
        "summary" | "s" => cli_summary(&args[2..], db),
        "members" => cli_members(db),
        "tontines" | "categories" => cli_tontines(db),
        "months" => cli_months(db),
        "export" => cli_export(&args[2..], db),
        "check" => cli_check(db),
        "repair" => cli_repair(db),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("tontui {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("TonTUI — local-only dues ledger for tontine groups");
    println!();
    println!("Usage: tontui [command]");
    println!();
    println!("Commands:");
    println!("  (none)                        Launch interactive TUI");
    println!("  summary [year]                Print the collection summary");
    println!("  members                       List members with their totals");
    println!("  tontines                      List tontines with their totals");
    println!("  months                        List recorded months");
    println!("  export [path]                 Export the dues ledger to CSV");
    println!("    --year <yyyy>               Restrict the export to one year");
    println!("  check                         Count missing dues-matrix cells");
    println!("  repair                        Backfill missing dues-matrix cells");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
}

fn cli_summary(args: &[String], db: &mut Database) -> Result<()> {
    let year = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .and_then(|a| a.parse::<i32>().ok());

    let dues = db.get_dues()?;
    let months = agg::sort_months_chronologically(&db.get_months()?);
    let missing = db.count_missing_due_cells()?;

    println!(
        "TonTUI — {}",
        year.map_or_else(|| "all years".to_string(), |y| y.to_string())
    );
    println!("{}", "─".repeat(44));
    println!("  Members:    {}", db.member_count()?);
    println!("  Tontines:   {}", db.category_count()?);
    println!("  Months:     {}", db.month_count()?);
    println!("  Collected:  {}", format_amount(agg::grand_total(&dues)));
    println!("  Late dues:  {}", agg::late_count(&dues));
    if missing > 0 {
        println!("  Missing:    {missing} matrix cells (run `tontui repair`)");
    }

    let shown = match year {
        Some(y) => agg::months_in_year(&months, y),
        None => months,
    };
    if !shown.is_empty() {
        println!();
        println!("Collected by month:");
        for month in &shown {
            let total = agg::total_for_month(&dues, month.id.unwrap_or(0));
            println!("  {:<20} {}", month.label(), format_amount(total));
        }
    }

    Ok(())
}

fn cli_members(db: &mut Database) -> Result<()> {
    let members = db.get_members()?;
    if members.is_empty() {
        println!("No members");
        return Ok(());
    }

    let dues = db.get_dues()?;
    println!("{:<4} {:<24} {:<14} Late", "ID", "Name", "Total paid");
    println!("{}", "─".repeat(50));
    for member in &members {
        let id = member.id.unwrap_or(0);
        let total = agg::total_for_member(&dues, id);
        let late = dues
            .iter()
            .filter(|d| d.member_id == id && d.is_late)
            .count();
        println!(
            "{:<4} {:<24} {:<14} {}",
            id,
            member.full_name(),
            format_amount(total),
            late,
        );
    }
    Ok(())
}

fn cli_tontines(db: &mut Database) -> Result<()> {
    let categories = db.get_categories()?;
    if categories.is_empty() {
        println!("No tontines");
        return Ok(());
    }

    let dues = db.get_dues()?;
    println!("{:<4} {:<20} {:<14} Description", "ID", "Name", "Collected");
    println!("{}", "─".repeat(64));
    for cat in &categories {
        let id = cat.id.unwrap_or(0);
        println!(
            "{:<4} {:<20} {:<14} {}",
            id,
            cat.name,
            format_amount(agg::total_for_category(&dues, id)),
            cat.description,
        );
    }
    Ok(())
}

fn cli_months(db: &mut Database) -> Result<()> {
    let months = agg::sort_months_chronologically(&db.get_months()?);
    if months.is_empty() {
        println!("No months");
        return Ok(());
    }

    let dues = db.get_dues()?;
    println!("{:<4} {:<14} {:<6} Collected", "ID", "Month", "Year");
    println!("{}", "─".repeat(44));
    for month in &months {
        let id = month.id.unwrap_or(0);
        println!(
            "{:<4} {:<14} {:<6} {}",
            id,
            month.name.as_str(),
            month.year,
            format_amount(agg::total_for_month(&dues, id)),
        );
    }
    Ok(())
}

fn cli_export(args: &[String], db: &mut Database) -> Result<()> {
    let year = args
        .windows(2)
        .find(|w| w[0] == "--year")
        .and_then(|w| w[1].parse::<i32>().ok());

    // Output path is the first non-flag argument
    let output_path = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .map(|a| shellexpand(a))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            format!("{home}/tontui-dues.csv")
        });

    let count = db.export_dues_to_csv(&output_path, year)?;
    if count == 0 {
        println!("No dues to export");
    } else {
        println!("Exported {count} dues to {output_path}");
    }
    Ok(())
}

fn cli_check(db: &mut Database) -> Result<()> {
    let missing = db.count_missing_due_cells()?;
    if missing == 0 {
        println!("Matrix complete: every member has a due for every tontine and month");
    } else {
        println!("{missing} missing matrix cells (run `tontui repair`)");
    }
    Ok(())
}

fn cli_repair(db: &mut Database) -> Result<()> {
    let filled = matrix::repair(db)?;
    if filled == 0 {
        println!("Matrix already complete");
    } else {
        println!("Backfilled {filled} missing dues");
    }
    Ok(())
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}
