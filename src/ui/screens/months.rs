use ratatui::{
    layout::{Constraint, Rect},
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
    if app.months.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("No months yet", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Add one with :month <name> <year>",
                theme::dim_style(),
            )),
            Line::from(Span::styled(
                "e.g. :month Janvier 2024",
                Style::default().fg(theme::ACCENT),
            )),
        ])
        .centered()
        .block(titled_block(&app.years));
        f.render_widget(msg, area);
        return;
    }

    let header = Row::new(
        ["Month", "Year", "Collected", "Late"]
            .iter()
            .map(|h| Cell::from(*h).style(theme::header_style())),
    )
    .height(1);

    let page = app.visible_rows.max(1);
    let rows: Vec<Row> = app
        .months
        .iter()
        .enumerate()
        .skip(app.month_scroll)
        .take(page)
        .map(|(i, month)| {
            let month_id = month.id.unwrap_or(0);
            let total = agg::total_for_month(&app.dues, month_id);
            let late = app
                .dues
                .iter()
                .filter(|d| d.month_id == month_id && d.is_late)
                .count();

            let style = if i == app.month_index {
                theme::selected_style()
            } else if i == app.period_index {
                Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD)
            } else {
                theme::normal_style()
            };

            Row::new(vec![
                Cell::from(month.name.as_str()),
                Cell::from(month.year.to_string()),
                Cell::from(format_amount(total)),
                Cell::from(if late > 0 {
                    Span::styled(late.to_string(), theme::late_style())
                } else {
                    Span::styled("-", theme::dim_style())
                }),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Length(6),
        Constraint::Length(16),
        Constraint::Min(6),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(titled_block(&app.years));
    f.render_widget(table, area);
}

fn titled_block(years: &[i32]) -> Block<'static> {
    let title = if years.is_empty() {
        " Months ".to_string()
    } else {
        let list = years
            .iter()
            .map(|y| y.to_string())
            .collect::<Vec<_>>()
            .join(" · ");
        format!(" Months — years: {list} ")
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            title,
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        ))
}
