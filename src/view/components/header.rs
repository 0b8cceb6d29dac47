use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    Frame,
};

use crate::app::{App, FilterMode};

/// Render the header: toggle control on the left, counts and repo on the right
pub fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let mode_style = match app.mode() {
        FilterMode::AllShown => Style::default().fg(Color::DarkGray),
        FilterMode::OnlyMergedShown => Style::default().fg(Color::Magenta).bold(),
    };

    let left = Line::from(vec![
        Span::styled(" [m] ", Style::default().fg(Color::Yellow)),
        Span::styled(app.toggle_label(), Style::default().fg(Color::Cyan).bold()),
        Span::raw("  "),
        Span::styled(
            format!("{}/{} shown", app.visible_items().len(), app.total_items()),
            mode_style,
        ),
    ]);

    let loading_indicator = if app.loading {
        format!("{} ", app.spinner())
    } else {
        String::new()
    };

    let right = Line::from(vec![
        Span::styled(loading_indicator, Style::default().fg(Color::Yellow)),
        Span::styled(
            format!("{} ", app.repository),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let chunks = Layout::horizontal([Constraint::Min(0), Constraint::Length(right.width() as u16)])
        .split(area);

    f.render_widget(left, chunks[0]);
    f.render_widget(right, chunks[1]);
}
