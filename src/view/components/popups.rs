use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the help popup
pub fn render_help_popup(f: &mut Frame) {
    let area = f.area();
    let popup_width = 40u16;
    let popup_height = 13u16;
    let popup_area = centered_rect(popup_width, popup_height, area);

    f.render_widget(Clear, popup_area);

    let keys = [
        ("m    ", "Toggle merged PR filter"),
        ("j/↓  ", "Move down"),
        ("k/↑  ", "Move up"),
        ("g/G  ", "Go to top/bottom"),
        ("o/⏎  ", "Open issue in browser"),
        ("r    ", "Refresh"),
        ("q    ", "Quit"),
    ];

    let mut help_lines: Vec<Line> = keys
        .iter()
        .map(|(key, action)| {
            Line::from(vec![
                Span::styled(*key, Style::default().fg(Color::Yellow)),
                Span::raw(*action),
            ])
        })
        .collect();
    help_lines.push(Line::raw(""));
    help_lines.push(Line::from("Press any key to close").centered());

    let help = Paragraph::new(help_lines).block(
        Block::default()
            .title(" Help ")
            .title_style(Style::default().fg(Color::Cyan).bold())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(help, popup_area);
}

/// Render the error popup
pub fn render_error_popup(f: &mut Frame, error: &str) {
    let area = f.area();
    let popup_width = (area.width * 60 / 100)
        .max(40)
        .min(area.width.saturating_sub(4));
    let popup_height = 7u16;
    let popup_area = centered_rect(popup_width, popup_height, area);

    f.render_widget(Clear, popup_area);

    let error_paragraph = Paragraph::new(error)
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .title(" Error ")
                .title_style(Style::default().fg(Color::Red).bold())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
        .wrap(Wrap { trim: true });

    f.render_widget(error_paragraph, popup_area);

    let hint_area = Rect {
        x: popup_area.x,
        y: popup_area.y + popup_area.height,
        width: popup_area.width,
        height: 1,
    };

    if hint_area.y < area.height {
        let hint = Line::from(vec![
            Span::raw("Press "),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::raw(" to dismiss"),
        ])
        .centered();
        f.render_widget(hint, hint_area);
    }
}

pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .split(area);

    Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .split(vertical[0])[0]
}

/// Truncate a string to a maximum number of characters with ellipsis
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_strings() {
        assert_eq!(truncate_string("short", 10), "short");
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        assert_eq!(truncate_string("ééééé", 3), "éé…");
        assert_eq!(truncate_string("abcdef", 4), "abc…");
    }
}
