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
    if app.categories.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("No tontines yet", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Add one with :tontine <name> [description]",
                theme::dim_style(),
            )),
            Line::from(Span::styled(
                "e.g. :tontine Épargne caisse commune",
                Style::default().fg(theme::ACCENT),
            )),
        ])
        .centered()
        .block(titled_block(" Tontines ", 0));
        f.render_widget(msg, area);
        return;
    }

    let header = Row::new(
        ["Tontine", "Description", "Collected"]
            .iter()
            .map(|h| Cell::from(*h).style(theme::header_style())),
    )
    .height(1);

    let rows: Vec<Row> = app
        .categories
        .iter()
        .enumerate()
        .map(|(i, cat)| {
            let total = agg::total_for_category(&app.dues, cat.id.unwrap_or(0));
            let style = if i == app.category_index {
                theme::selected_style()
            } else {
                theme::normal_style()
            };
            Row::new(vec![
                Cell::from(truncate(&cat.name, 24)),
                Cell::from(truncate(&cat.description, 40)),
                Cell::from(format_amount(total)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(24),
        Constraint::Min(24),
        Constraint::Length(16),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(titled_block(" Tontines ", app.categories.len()));
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
