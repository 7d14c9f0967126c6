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
use crate::ui::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    if app.members.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("No members yet", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Add one with :member <first> <last>",
                theme::dim_style(),
            )),
            Line::from(Span::styled(
                "e.g. :member Awa Diop",
                Style::default().fg(theme::ACCENT),
            )),
        ])
        .centered()
        .block(titled_block(" Members ", 0));
        f.render_widget(msg, area);
        return;
    }

    let header = Row::new(
        ["Member", "Joined", "Total paid", "Late"]
            .iter()
            .map(|h| Cell::from(*h).style(theme::header_style())),
    )
    .height(1);

    let page = app.visible_rows.max(1);
    let rows: Vec<Row> = app
        .members
        .iter()
        .enumerate()
        .skip(app.member_scroll)
        .take(page)
        .map(|(i, member)| {
            let member_id = member.id.unwrap_or(0);
            let total = agg::total_for_member(&app.dues, member_id);
            let late = app
                .dues
                .iter()
                .filter(|d| d.member_id == member_id && d.is_late)
                .count();

            let style = if i == app.member_index {
                theme::selected_style()
            } else {
                theme::normal_style()
            };

            // created_at is RFC 3339; the date part is enough here
            let joined = member.created_at.chars().take(10).collect::<String>();

            Row::new(vec![
                Cell::from(truncate(&member.full_name(), 28)),
                Cell::from(joined),
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
        Constraint::Min(20),
        Constraint::Length(12),
        Constraint::Length(16),
        Constraint::Length(6),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(titled_block(" Members ", app.members.len()));
    f.render_widget(table, area);
}

fn titled_block(label: &str, count: usize) -> Block<'static> {
    let title = if count > 0 {
        format!("{label}({count}) ")
    } else {
        label.to_string()
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
