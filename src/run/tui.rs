use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use crate::db::Database;
use crate::ui::app::{App, InputMode, PendingAction, Screen};
use crate::ui::commands;
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

pub(crate) fn as_tui(db: &mut Database) -> Result<()> {
    let mut app = App::new();
    app.refresh_all(db)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, db);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    db: &mut Database,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            // 1 tab + 1 status + 1 cmd + 2 borders + 1 header
            let content_height = f.area().height.saturating_sub(6) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

        if let Event::Key(key) = event::read()? {
            if app.show_help {
                app.show_help = false;
                continue;
            }
            match app.input_mode {
                InputMode::Normal => handle_normal_input(key, app, db)?,
                InputMode::Command => handle_command_input(key, app, db)?,
                InputMode::Editing => handle_editing_input(key, app, db)?,
                InputMode::Confirm => handle_confirm_input(key, app, db)?,
            }
        }
    }
    Ok(())
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('q') | KeyCode::Char('c')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            app.running = false;
        }
        KeyCode::Char('j') | KeyCode::Down => handle_move_down(app),
        KeyCode::Char('k') | KeyCode::Up => handle_move_up(app),
        KeyCode::Char('1') => switch_screen(app, db, Screen::Dashboard)?,
        KeyCode::Char('2') => switch_screen(app, db, Screen::Members)?,
        KeyCode::Char('3') => switch_screen(app, db, Screen::Categories)?,
        KeyCode::Char('4') => switch_screen(app, db, Screen::Months)?,
        KeyCode::Char('5') => switch_screen(app, db, Screen::Dues)?,
        KeyCode::Tab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let next = (idx + 1) % screens.len();
            switch_screen(app, db, screens[next])?;
        }
        KeyCode::BackTab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let prev = if idx == 0 {
                screens.len() - 1
            } else {
                idx - 1
            };
            switch_screen(app, db, screens[prev])?;
        }
        KeyCode::Enter if app.screen == Screen::Dues => {
            if app.selected_due().is_some() {
                app.input_mode = InputMode::Editing;
                app.command_input.clear();
            } else {
                app.set_status("No due under the cursor — :repair if the matrix has holes");
            }
        }
        KeyCode::Enter if app.screen == Screen::Months => {
            // Make the month under the cursor the selected period
            app.period_index = app.month_index;
            app.refresh_dashboard(db)?;
            if let Some(month) = app.selected_month() {
                app.set_status(month.label());
            }
        }
        KeyCode::Esc => {
            app.status_message.clear();
        }
        KeyCode::Char('h') | KeyCode::Left if app.screen == Screen::Dues => {
            app.matrix_col = app.matrix_col.saturating_sub(1);
        }
        KeyCode::Char('l') | KeyCode::Right if app.screen == Screen::Dues => {
            if app.matrix_col + 1 < app.categories.len() {
                app.matrix_col += 1;
            }
        }
        KeyCode::Char('x') if app.screen == Screen::Dues => {
            commands::handle_command("late", app, db)?;
        }
        KeyCode::Char('g') => handle_goto_top(app),
        KeyCode::Char('G') => handle_goto_bottom(app),
        KeyCode::Char('?') => {
            app.show_help = true;
        }
        KeyCode::Char('H') => {
            commands::handle_command("prev-month", app, db)?;
        }
        KeyCode::Char('L') => {
            commands::handle_command("next-month", app, db)?;
        }
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let half_page = app.visible_rows / 2;
            for _ in 0..half_page {
                handle_move_down(app);
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let half_page = app.visible_rows / 2;
            for _ in 0..half_page {
                handle_move_up(app);
            }
        }
        KeyCode::Char('D') => match app.screen {
            Screen::Members => commands::handle_command("delete-member", app, db)?,
            Screen::Categories => commands::handle_command("delete-tontine", app, db)?,
            Screen::Months => commands::handle_command("delete-month", app, db)?,
            _ => {}
        },
        _ => {}
    }
    Ok(())
}

fn handle_command_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            commands::handle_command(&input, app, db)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_editing_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
            if !input.is_empty() {
                commands::handle_command(&format!("set {input}"), app, db)?;
            }
        }
        KeyCode::Esc => {
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
            app.set_status("Edit cancelled");
        }
        KeyCode::Backspace => {
            app.command_input.pop();
        }
        KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_confirm_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            if let Some(action) = app.pending_action.take() {
                match action {
                    PendingAction::DeleteMember { id, name } => {
                        db.delete_member(id)?;
                        app.refresh_all(db)?;
                        app.set_status(format!("Deleted member: {name}"));
                    }
                    PendingAction::DeleteCategory { id, name } => {
                        db.delete_category(id)?;
                        app.refresh_all(db)?;
                        app.set_status(format!("Deleted tontine: {name}"));
                    }
                    PendingAction::DeleteMonth { id, label } => {
                        db.delete_month(id)?;
                        app.refresh_all(db)?;
                        app.set_status(format!("Deleted month: {label}"));
                    }
                }
            }
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
        }
        _ => {
            // Any other key = cancel
            app.pending_action = None;
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
            app.set_status("Cancelled");
        }
    }
    Ok(())
}

// ── Navigation helpers ───────────────────────────────────────

fn switch_screen(app: &mut App, db: &mut Database, screen: Screen) -> Result<()> {
    app.screen = screen;
    match screen {
        Screen::Dashboard => app.refresh_dashboard(db)?,
        Screen::Members => {
            app.refresh_members(db)?;
            app.refresh_dues(db)?;
        }
        Screen::Categories => {
            app.refresh_categories(db)?;
            app.refresh_dues(db)?;
        }
        Screen::Months => {
            app.refresh_months(db)?;
            app.refresh_dues(db)?;
        }
        Screen::Dues => app.refresh_all(db)?,
    }
    Ok(())
}

fn handle_move_down(app: &mut App) {
    let page = app.visible_rows.max(1);
    match app.screen {
        Screen::Members => scroll_down(
            &mut app.member_index,
            &mut app.member_scroll,
            app.members.len(),
            page,
        ),
        Screen::Categories => {
            if app.category_index + 1 < app.categories.len() {
                app.category_index += 1;
            }
        }
        Screen::Months => scroll_down(
            &mut app.month_index,
            &mut app.month_scroll,
            app.months.len(),
            page,
        ),
        Screen::Dues => scroll_down(
            &mut app.matrix_row,
            &mut app.matrix_scroll,
            app.members.len(),
            page,
        ),
        _ => {}
    }
}

fn handle_move_up(app: &mut App) {
    match app.screen {
        Screen::Members => scroll_up(&mut app.member_index, &mut app.member_scroll),
        Screen::Categories => {
            app.category_index = app.category_index.saturating_sub(1);
        }
        Screen::Months => scroll_up(&mut app.month_index, &mut app.month_scroll),
        Screen::Dues => scroll_up(&mut app.matrix_row, &mut app.matrix_scroll),
        _ => {}
    }
}

fn handle_goto_top(app: &mut App) {
    match app.screen {
        Screen::Members => scroll_to_top(&mut app.member_index, &mut app.member_scroll),
        Screen::Categories => app.category_index = 0,
        Screen::Months => scroll_to_top(&mut app.month_index, &mut app.month_scroll),
        Screen::Dues => scroll_to_top(&mut app.matrix_row, &mut app.matrix_scroll),
        _ => {}
    }
}

fn handle_goto_bottom(app: &mut App) {
    let page = app.visible_rows.max(1);
    match app.screen {
        Screen::Members => scroll_to_bottom(
            &mut app.member_index,
            &mut app.member_scroll,
            app.members.len(),
            page,
        ),
        Screen::Categories => {
            if !app.categories.is_empty() {
                app.category_index = app.categories.len() - 1;
            }
        }
        Screen::Months => scroll_to_bottom(
            &mut app.month_index,
            &mut app.month_scroll,
            app.months.len(),
            page,
        ),
        Screen::Dues => scroll_to_bottom(
            &mut app.matrix_row,
            &mut app.matrix_scroll,
            app.members.len(),
            page,
        ),
        _ => {}
    }
}
