//! Configuration panel view

use crate::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Draw the config panel
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let mut content = vec![
        Line::from(Span::styled(
            "Summit TUI Configuration",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Daemon: ", Style::default().fg(Color::DarkGray)),
            if app.state.daemon_connected {
                Span::styled("connected", Style::default().fg(Color::Green))
            } else {
                Span::styled("not connected", Style::default().fg(Color::Red))
            },
        ]),
    ];

    if let Some(info) = &app.backend_info {
        content.push(Line::from(vec![
            Span::styled("Version: ", Style::default().fg(Color::DarkGray)),
            Span::raw(&info.version),
        ]));
        content.push(Line::from(vec![
            Span::styled("Uptime: ", Style::default().fg(Color::DarkGray)),
            Span::raw(format!("{}s", info.uptime_seconds)),
        ]));
        content.push(Line::from(vec![
            Span::styled("Events tracked: ", Style::default().fg(Color::DarkGray)),
            Span::raw(info.event_count.to_string()),
        ]));
    }

    content.push(Line::from(""));
    content.push(Line::from(vec![
        Span::styled("Judge id: ", Style::default().fg(Color::DarkGray)),
        Span::raw(&app.judge_id),
    ]));
    content.push(Line::from(vec![
        Span::styled("Sort: ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!(
            "{} {}",
            app.state.event_sort_field.label(),
            app.state.event_sort_direction.symbol()
        )),
    ]));
    content.push(Line::from(vec![
        Span::styled("Show archived events: ", Style::default().fg(Color::DarkGray)),
        Span::raw(if app.state.show_archived_events {
            "yes"
        } else {
            "no"
        }),
    ]));

    content.push(Line::from(""));
    content.push(Line::from(Span::styled(
        "Settings are saved to config.json on quit.",
        Style::default().fg(Color::DarkGray),
    )));

    let paragraph = Paragraph::new(content)
        .block(
            Block::default()
                .title(" Config ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.state.scroll_offset as u16, 0));

    frame.render_widget(paragraph, area);
}
