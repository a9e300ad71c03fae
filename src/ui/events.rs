//! Events list and detail views

use super::render_scrollable_list;
use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

fn status_style(status: &str) -> Style {
    match status {
        "published" => Style::default().fg(Color::Green),
        "archived" => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::DarkGray),
    }
}

/// Draw the events list
pub fn draw_list(frame: &mut Frame, area: Rect, app: &App) {
    let sorted_events = app.state.sorted_events();

    // Header with sort info
    let sort_label = format!(
        "Sort: {} {}",
        app.state.event_sort_field.label(),
        app.state.event_sort_direction.symbol()
    );

    let archived_count = app
        .state
        .events
        .iter()
        .filter(|e| e.status == "archived")
        .count();
    let filter_label = if archived_count > 0 {
        if app.state.show_archived_events {
            format!("({} archived)", archived_count)
        } else {
            format!("(hiding {} archived)", archived_count)
        }
    } else {
        String::new()
    };

    if sorted_events.is_empty() {
        let message = if !app.state.show_archived_events && archived_count > 0 {
            "No active events. Press 'a' to show archived events.\nPress 'n' to create a new event."
        } else {
            "No events found.\nPress 'n' to create a new event."
        };
        let content = Paragraph::new(message)
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .title(" Events ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            );
        frame.render_widget(content, area);
        return;
    }

    // Split area for header and list
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);

    // Draw header
    let header = Paragraph::new(Line::from(vec![
        Span::styled(sort_label, Style::default().fg(Color::Cyan)),
        Span::styled(" [s]cycle [S]dir", Style::default().fg(Color::DarkGray)),
        Span::raw(" | "),
        Span::styled(filter_label, Style::default().fg(Color::DarkGray)),
        Span::styled(" [a]toggle", Style::default().fg(Color::DarkGray)),
    ]));
    frame.render_widget(header, chunks[0]);

    // Draw list
    let items: Vec<ListItem> = sorted_events
        .iter()
        .enumerate()
        .map(|(idx, event)| {
            let is_selected = idx == app.state.selected_index;

            let prefix = if is_selected { "▸" } else { " " };
            let date = event.starts_at.format("%Y-%m-%d").to_string();
            let status_label = format!("[{}]", event.status);
            let seats = match event.seats_left() {
                Some(left) => format!("{}/{} ({} left)", event.registered_count, event.capacity, left),
                None => format!("{} registered", event.registered_count),
            };

            let style = if is_selected {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };

            let line = Line::from(vec![
                Span::styled(prefix, style),
                Span::styled(date, Style::default().fg(Color::Cyan)),
                Span::raw(" "),
                Span::styled(status_label, status_style(&event.status)),
                Span::raw(" "),
                Span::styled(&event.name, style.add_modifier(Modifier::BOLD)),
                Span::raw("  "),
                Span::styled(seats, Style::default().fg(Color::DarkGray)),
            ]);

            ListItem::new(line)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(" Events ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    render_scrollable_list(frame, chunks[1], list, app.state.selected_index);
}

/// Draw the event detail view
pub fn draw_detail(frame: &mut Frame, area: Rect, app: &App) {
    let Some(event) = app.state.selected_event() else {
        let content = Paragraph::new("Event not found. Press Esc to go back.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(content, area);
        return;
    };

    let mut content = vec![
        Line::from(vec![
            Span::styled(
                &event.name,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(format!("[{}]", event.status), status_style(&event.status)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Venue: ", Style::default().fg(Color::DarkGray)),
            Span::raw(&event.venue),
        ]),
        Line::from(vec![
            Span::styled("Starts: ", Style::default().fg(Color::DarkGray)),
            Span::raw(event.starts_at.format("%Y-%m-%d %H:%M UTC").to_string()),
        ]),
        Line::from(vec![
            Span::styled("Ends:   ", Style::default().fg(Color::DarkGray)),
            Span::raw(event.ends_at.format("%Y-%m-%d %H:%M UTC").to_string()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Registered: ", Style::default().fg(Color::DarkGray)),
            Span::raw(event.registered_count.to_string()),
            Span::styled("   Checked in: ", Style::default().fg(Color::DarkGray)),
            Span::raw(event.checked_in_count.to_string()),
            Span::styled("   Capacity: ", Style::default().fg(Color::DarkGray)),
            Span::raw(if event.capacity == 0 {
                "unlimited".to_string()
            } else {
                event.capacity.to_string()
            }),
        ]),
        Line::from(""),
    ];

    if !event.description.is_empty() {
        for line in event.description.lines() {
            content.push(Line::from(line.to_string()));
        }
        content.push(Line::from(""));
    }

    content.push(Line::from(Span::styled(
        "Screens",
        Style::default().fg(Color::Cyan),
    )));
    for (key, label) in [
        ("1", "Attendance scanning"),
        ("2", "Forms"),
        ("3", "Judging"),
        ("4", "Leaderboard"),
    ] {
        content.push(Line::from(vec![
            Span::styled(format!("  {key} "), Style::default().fg(Color::Cyan)),
            Span::raw(label),
        ]));
    }

    let paragraph = Paragraph::new(content)
        .block(
            Block::default()
                .title(format!(" Event - {} ", event.name))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.state.scroll_offset as u16, 0));

    frame.render_widget(paragraph, area);
}
