use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::agg;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::format_amount;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(5)])
        .split(area);

    render_stat_cards(f, chunks[0], app);

    let lower = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    render_category_totals(f, lower[0], app);
    render_member_totals(f, lower[1], app);
}

fn render_stat_cards(f: &mut Frame, area: Rect, app: &App) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    render_card(f, cards[0], "Members", app.members.len().to_string(), theme::ACCENT);
    render_card(
        f,
        cards[1],
        "Tontines",
        app.categories.len().to_string(),
        theme::ACCENT,
    );
    render_card(
        f,
        cards[2],
        "Total collected",
        format_amount(app.grand_total),
        theme::GREEN,
    );

    let integrity = if app.missing_cells == 0 {
        format!("{} late", app.late_dues)
    } else {
        format!("{} late | {} missing", app.late_dues, app.missing_cells)
    };
    let color = if app.missing_cells == 0 {
        theme::YELLOW
    } else {
        theme::RED
    };
    render_card(f, cards[3], "Ledger", integrity, color);
}

fn render_card(f: &mut Frame, area: Rect, title: &str, value: String, color: ratatui::style::Color) {
    let card = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
    ])
    .centered()
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(format!(" {title} "), theme::dim_style())),
    );
    f.render_widget(card, area);
}

fn render_category_totals(f: &mut Frame, area: Rect, app: &App) {
    let title = match app.selected_month() {
        Some(month) => format!(" Per tontine — {} ", month.label()),
        None => " Per tontine ".into(),
    };

    if app.categories.is_empty() || app.selected_month().is_none() {
        render_empty(f, area, &title, "Add tontines and months to see totals");
        return;
    }

    let month_id = app.selected_month().and_then(|m| m.id).unwrap_or(0);
    let header = Row::new(
        ["Tontine", "Collected"]
            .iter()
            .map(|h| Cell::from(*h).style(theme::header_style())),
    )
    .height(1);

    let rows: Vec<Row> = app
        .categories
        .iter()
        .map(|cat| {
            let total = agg::total_for_category_in_month(
                &app.dues,
                cat.id.unwrap_or(0),
                month_id,
            );
            Row::new(vec![
                Cell::from(cat.name.clone()),
                Cell::from(format_amount(total)).style(theme::paid_style()),
            ])
            .style(theme::normal_style())
        })
        .collect();

    let widths = [Constraint::Min(16), Constraint::Length(16)];
    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                title,
                Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD),
            )),
    );
    f.render_widget(table, area);
}

fn render_member_totals(f: &mut Frame, area: Rect, app: &App) {
    let title = match app.selected_month() {
        Some(month) => format!(" Per member — {} ", month.label()),
        None => " Per member ".into(),
    };

    if app.members.is_empty() || app.selected_month().is_none() {
        render_empty(f, area, &title, "Add members and months to see totals");
        return;
    }

    let month_id = app.selected_month().and_then(|m| m.id).unwrap_or(0);
    let header = Row::new(
        ["Member", "Paid"]
            .iter()
            .map(|h| Cell::from(*h).style(theme::header_style())),
    )
    .height(1);

    let rows: Vec<Row> = app
        .members
        .iter()
        .map(|member| {
            let total = agg::total_for_member_in_month(
                &app.dues,
                member.id.unwrap_or(0),
                month_id,
            );
            Row::new(vec![
                Cell::from(member.full_name()),
                Cell::from(format_amount(total)).style(theme::paid_style()),
            ])
            .style(theme::normal_style())
        })
        .collect();

    let widths = [Constraint::Min(16), Constraint::Length(16)];
    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                title,
                Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD),
            )),
    );
    f.render_widget(table, area);
}

fn render_empty(f: &mut Frame, area: Rect, title: &str, hint: &str) {
    let msg = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(hint, theme::dim_style())),
    ])
    .centered()
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(title.to_string(), theme::dim_style())),
    );
    f.render_widget(msg, area);
}
