use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::agg;
use crate::models::Due;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, truncate};

/// One month of the dues matrix: members as rows, tontines as columns.
pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let Some(month) = app.selected_month() else {
        render_placeholder(f, area, "No months yet", ":month <name> <year> to start a period");
        return;
    };
    let month_id = month.id.unwrap_or(0);
    let title = format!(" Dues — {} ", month.label());

    if app.members.is_empty() || app.categories.is_empty() {
        render_placeholder(
            f,
            area,
            "The matrix needs members and tontines",
            ":member <first> <last> and :tontine <name> to fill the axes",
        );
        return;
    }

    let mut header_cells: Vec<Cell> =
        vec![Cell::from("Member").style(theme::header_style())];
    for cat in &app.categories {
        header_cells.push(Cell::from(truncate(&cat.name, 12)).style(theme::header_style()));
    }
    header_cells.push(Cell::from("Total").style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let page = app.visible_rows.max(1);
    let rows: Vec<Row> = app
        .members
        .iter()
        .enumerate()
        .skip(app.matrix_scroll)
        .take(page)
        .map(|(row_idx, member)| {
            let member_id = member.id.unwrap_or(0);
            let mut cells: Vec<Cell> = vec![Cell::from(truncate(&member.full_name(), 20))
                .style(if row_idx == app.matrix_row {
                    Style::default()
                        .fg(theme::ACCENT)
                        .add_modifier(Modifier::BOLD)
                } else {
                    theme::normal_style()
                })];

            for (col_idx, cat) in app.categories.iter().enumerate() {
                let due = Due::find(&app.dues, member_id, cat.id.unwrap_or(0), month_id);
                let text = match due {
                    Some(d) => format_amount(d.amount),
                    None => "·".to_string(),
                };
                let style = if row_idx == app.matrix_row && col_idx == app.matrix_col {
                    theme::selected_style()
                } else if due.is_some_and(|d| d.is_late) {
                    theme::late_style()
                } else if due.is_some_and(Due::is_paid) {
                    theme::paid_style()
                } else {
                    theme::dim_style()
                };
                cells.push(Cell::from(text).style(style));
            }

            let row_total = agg::total_for_member_in_month(&app.dues, member_id, month_id);
            cells.push(Cell::from(format_amount(row_total)).style(theme::normal_style()));
            Row::new(cells)
        })
        .collect();

    let mut widths = vec![Constraint::Length(20)];
    widths.extend(app.categories.iter().map(|_| Constraint::Min(12)));
    widths.push(Constraint::Length(14));

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

fn render_placeholder(f: &mut Frame, area: Rect, text: &str, hint: &str) {
    let msg = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(text.to_string(), theme::dim_style())),
        Line::from(""),
        Line::from(Span::styled(
            hint.to_string(),
            Style::default().fg(theme::ACCENT),
        )),
    ])
    .centered()
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(" Dues ", theme::dim_style())),
    );
    f.render_widget(msg, area);
}
