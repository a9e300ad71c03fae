//! Attendance scanning view: scan input, last outcome, tallies, roster

use super::render_scrollable_list;
use crate::app::App;
use crate::state::ScanOutcome;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

/// Draw the attendance view
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Scan input
            Constraint::Length(6), // Last outcome + tallies
            Constraint::Min(0),    // Roster
        ])
        .split(area);

    draw_scan_input(frame, chunks[0], app);
    draw_outcome(frame, chunks[1], app);
    draw_roster(frame, chunks[2], app);
}

fn draw_scan_input(frame: &mut Frame, area: Rect, app: &App) {
    let scan = &app.state.scan;
    let title = format!(" Scan badge - {} (m to switch) ", scan.mode.label());

    let content = Paragraph::new(Line::from(vec![
        Span::styled(&scan.buffer, Style::default().fg(Color::White)),
        Span::styled("▌", Style::default().fg(Color::Cyan)),
    ]))
    .block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(content, area);
}

fn draw_outcome(frame: &mut Frame, area: Rect, app: &App) {
    let scan = &app.state.scan;

    let (line, color) = match &scan.last {
        Some(ScanOutcome::Accepted { name, at }) => {
            let when = at
                .map(|t| format!(" at {}", t.format("%H:%M:%S")))
                .unwrap_or_default();
            (format!("✓ {name}{when}"), Color::Green)
        }
        Some(ScanOutcome::AlreadyRecorded { name }) => {
            (format!("⚠ {name} was already recorded"), Color::Yellow)
        }
        Some(ScanOutcome::NotRegistered { code }) => {
            (format!("✗ {code} is not registered"), Color::Red)
        }
        Some(ScanOutcome::NotCheckedIn { code }) => {
            (format!("✗ {code} was never checked in"), Color::Red)
        }
        Some(ScanOutcome::BadBadge(err)) => (format!("✗ {err}"), Color::Red),
        None => ("Waiting for a scan...".to_string(), Color::DarkGray),
    };

    let tally = scan.tally;
    let content = vec![
        Line::from(Span::styled(
            line,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("accepted ", Style::default().fg(Color::DarkGray)),
            Span::styled(tally.accepted.to_string(), Style::default().fg(Color::Green)),
            Span::styled("   duplicates ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                tally.duplicates.to_string(),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled("   rejected ", Style::default().fg(Color::DarkGray)),
            Span::styled(tally.rejected.to_string(), Style::default().fg(Color::Red)),
        ]),
        Line::from(vec![
            Span::styled("event total: ", Style::default().fg(Color::DarkGray)),
            Span::raw(format!(
                "{} registered, {} checked in, {} checked out",
                app.state.attendance.registered,
                app.state.attendance.checked_in,
                app.state.attendance.checked_out
            )),
        ]),
    ];

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .title(" Last scan ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(paragraph, area);
}

fn draw_roster(frame: &mut Frame, area: Rect, app: &App) {
    if app.state.registrations.is_empty() {
        let content = Paragraph::new("No registrations loaded. Press 'r' to refresh.")
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .title(" Roster ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        frame.render_widget(content, area);
        return;
    }

    let checked_in = app
        .state
        .registrations
        .iter()
        .filter(|r| r.checked_in)
        .count();

    let items: Vec<ListItem> = app
        .state
        .registrations
        .iter()
        .enumerate()
        .map(|(idx, reg)| {
            let is_selected = idx == app.state.selected_index;
            let prefix = if is_selected { "▸" } else { " " };
            let mark = if reg.checked_in { "✓" } else { " " };
            let mark_style = if reg.checked_in {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let style = if is_selected {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };

            let when = reg
                .checked_in_at
                .map(|t| t.format(" %H:%M").to_string())
                .unwrap_or_default();

            ListItem::new(Line::from(vec![
                Span::styled(prefix, style),
                Span::styled(mark, mark_style),
                Span::raw(" "),
                Span::styled(&reg.name, style),
                Span::raw("  "),
                Span::styled(&reg.attendee_code, Style::default().fg(Color::Cyan)),
                Span::raw("  "),
                Span::styled(&reg.email, Style::default().fg(Color::DarkGray)),
                Span::styled(when, Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(format!(
                " Roster ({checked_in}/{} in) ",
                app.state.registrations.len()
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );

    render_scrollable_list(frame, area, list, app.state.selected_index);
}
