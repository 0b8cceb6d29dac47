use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style, Stylize},
    widgets::{Cell, Row, Table},
    Frame,
};

use crate::app::App;
use crate::icons;

use super::popups::truncate_string;

/// Render the issue table. Only items the filter left visible are shown.
pub fn render_table(f: &mut Frame, app: &App, area: Rect) {
    let visible = app.visible_items();

    let header = Row::new(vec![
        Cell::from("Issue").style(Style::default().fg(Color::Yellow).bold()),
        Cell::from("Title").style(Style::default().fg(Color::Yellow).bold()),
        Cell::from("Linked PRs").style(Style::default().fg(Color::Yellow).bold()),
        Cell::from("Merged").style(Style::default().fg(Color::Yellow).bold()),
    ])
    .height(1)
    .bottom_margin(1);

    let rows: Vec<Row> = visible
        .iter()
        .map(|item| {
            let issue = &item.issue;
            let number = issue
                .number
                .map(|n| format!("#{n}"))
                .unwrap_or_default();
            let linked = issue
                .linked_pull_requests
                .iter()
                .map(|pr| {
                    let mark = if pr.merged {
                        icons::MERGED
                    } else {
                        icons::NOT_MERGED
                    };
                    format!("{mark}#{}", pr.number)
                })
                .collect::<Vec<_>>()
                .join(" ");
            let (merged_text, merged_color) = if issue.has_merged_pr {
                (icons::MERGED_DISPLAY, Color::Magenta)
            } else {
                (icons::NOT_MERGED_DISPLAY, Color::DarkGray)
            };

            Row::new(vec![
                Cell::from(number),
                Cell::from(truncate_string(&issue.title, 60)),
                Cell::from(truncate_string(&linked, 24)),
                Cell::from(merged_text).style(Style::default().fg(merged_color)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(8),
        Constraint::Min(30),
        Constraint::Length(26),
        Constraint::Length(13),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .row_highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(icons::SELECTOR);

    f.render_stateful_widget(table, area, &mut app.table_state.clone());
}
