//! UI rendering

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::app::{App, RefreshIndicator};

/// Main UI rendering function
pub fn draw(frame: &mut Frame, app: &App) {
    // Create vertical layout for status bar at the bottom
    let outer_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(frame.area());

    let pane_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(outer_chunks[0]);

    draw_singers_pane(frame, app, pane_chunks[0]);
    draw_detail_pane(frame, app, pane_chunks[1]);
    draw_refresh_indicator(frame, app);
    draw_status_bar(frame, app, outer_chunks[1]);

    if app.show_help {
        draw_help_overlay(frame);
    }
}

/// Draw the singer list (left)
fn draw_singers_pane(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!(" Singers ({}) ", app.singers.len());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().add_modifier(Modifier::BOLD));

    if app.show_empty_placeholder() {
        let placeholder = Paragraph::new(vec![
            Line::from(""),
            Line::from("No singers yet"),
            Line::from(Span::styled(
                "Press r to refresh",
                Style::default().add_modifier(Modifier::DIM),
            )),
        ])
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let max_len = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = app
        .singers
        .iter()
        .map(|singer| {
            let name = Line::from(Span::raw(clip(&singer.name, max_len)));
            let genres = Line::from(Span::styled(
                clip(&singer.genres_label(), max_len),
                Style::default().add_modifier(Modifier::DIM),
            ));
            ListItem::new(vec![name, genres])
        })
        .collect();

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .add_modifier(Modifier::BOLD)
            .add_modifier(Modifier::REVERSED),
    );

    let mut state = ListState::default();
    if !app.singers.is_empty() {
        state.select(Some(app.selected));
    }

    frame.render_stateful_widget(list, area, &mut state);
}

/// Draw the detail pane (right)
fn draw_detail_pane(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().title(" Detail ").borders(Borders::ALL);

    let label = Style::default().add_modifier(Modifier::BOLD);
    let content = if let Some(singer) = app.current_singer() {
        let mut lines = vec![
            Line::from(Span::styled(singer.name.as_str(), label)),
            Line::from(""),
            Line::from(vec![
                Span::styled("Genres: ", label),
                Span::raw(singer.genres_label()),
            ]),
            Line::from(vec![
                Span::styled("Works:  ", label),
                Span::raw(singer.counts_label()),
            ]),
        ];
        if let Some(ref link) = singer.link {
            lines.push(Line::from(vec![
                Span::styled("Link:   ", label),
                Span::styled(link.as_str(), Style::default().fg(Color::Cyan)),
            ]));
        }
        if !singer.description.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(singer.description.as_str()));
        }
        lines
    } else {
        vec![Line::from(Span::styled(
            "No singer selected",
            Style::default().add_modifier(Modifier::DIM),
        ))]
    };

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

/// Draw the status bar at the bottom
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let content = if app.is_refreshing() {
        "Refreshing singers...".to_string()
    } else if let Some(msg) = &app.status_message {
        msg.clone()
    } else {
        let updated = app
            .last_updated
            .map(|t| format!("Updated {}  ", t.format("%H:%M")))
            .unwrap_or_default();
        format!("{}r:refresh  enter:open  ?:help  q:quit", updated)
    };

    let style = if app.retry.is_offered() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };

    frame.render_widget(Paragraph::new(content).style(style), area);
}

/// Draw refresh indicator in top-right corner
fn draw_refresh_indicator(frame: &mut Frame, app: &App) {
    let area = frame.area();
    if area.width < 5 {
        return;
    }

    let (icon, style) = match app.indicator {
        RefreshIndicator::Idle => ("○", Style::default().add_modifier(Modifier::DIM)),
        RefreshIndicator::Refreshing => ("↻", Style::default().fg(Color::Yellow)),
        RefreshIndicator::Fresh => ("✓", Style::default().fg(Color::Green)),
        RefreshIndicator::Failed => ("✗", Style::default().fg(Color::Red)),
    };

    let indicator = Paragraph::new(Span::styled(icon, style));
    let indicator_area = Rect::new(area.width - 2, 0, 1, 1);
    frame.render_widget(indicator, indicator_area);
}

/// Draw help overlay
fn draw_help_overlay(frame: &mut Frame) {
    let area = frame.area();

    let popup_width = 44.min(area.width.saturating_sub(4));
    let popup_height = 14.min(area.height.saturating_sub(4));
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("  j/k, ↑/↓    Move up/down"),
        Line::from("  gg          Jump to first singer"),
        Line::from("  G           Jump to last singer"),
        Line::from("  Enter       Open singer website"),
        Line::from("  r           Refresh from the server"),
        Line::from("  R           Retry after a failure"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().add_modifier(Modifier::BOLD));

    frame.render_widget(Paragraph::new(help_text).block(block), popup_area);
}

/// Clip to `max` characters, marking the cut with an ellipsis
fn clip(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use musicshelf_core::{Singer, SnapshotSource, ViewUpdate};
    use ratatui::{backend::TestBackend, Terminal};

    fn rendered(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_clip() {
        assert_eq!(clip("short", 10), "short");
        assert_eq!(clip("Мумий Тролль", 6), "Мумий…");
    }

    #[test]
    fn test_renders_singers_and_detail() {
        let mut app = App::new();
        app.apply(ViewUpdate::Snapshot {
            singers: vec![Singer::new(1, "Tove Lo")
                .with_genres(["pop"])
                .with_description("swedish singer")],
            source: SnapshotSource::Network,
        });

        let screen = rendered(&app);
        assert!(screen.contains("Singers (1)"));
        assert!(screen.contains("Tove Lo"));
        assert!(screen.contains("swedish singer"));
    }

    #[test]
    fn test_placeholder_only_after_settle() {
        let app = App::new();
        assert!(!rendered(&app).contains("No singers yet"));

        let mut app = App::new();
        app.apply(ViewUpdate::Snapshot {
            singers: vec![],
            source: SnapshotSource::Network,
        });
        assert!(rendered(&app).contains("No singers yet"));
    }
}
