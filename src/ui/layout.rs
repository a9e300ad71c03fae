//! Layout components (sidebar, status bar)

use super::components::{render_sidebar_button, BUTTON_HEIGHT};
use crate::app::App;
use crate::state::View;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Sidebar items
pub const SIDEBAR_ITEMS: &[&str] = &["Events", "Attendance", "Forms", "Judging", "Config"];

/// Create the main layout with sidebar
pub fn create_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(20), // Sidebar
            Constraint::Min(0),     // Main content
        ])
        .split(area);

    // Reserve bottom line for status bar
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(chunks[1]);

    let sidebar_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Sidebar content
            Constraint::Length(1), // Status bar continuation
        ])
        .split(chunks[0]);

    (sidebar_chunks[0], main_chunks[0])
}

/// Draw the sidebar with boxed buttons
pub fn draw_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let has_event = app.state.selected_event_id.is_some();

    // Create vertical layout for button boxes (centered vertically)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),                // Top padding (flex)
            Constraint::Length(BUTTON_HEIGHT), // Events
            Constraint::Length(BUTTON_HEIGHT), // Attendance
            Constraint::Length(BUTTON_HEIGHT), // Forms
            Constraint::Length(BUTTON_HEIGHT), // Judging
            Constraint::Length(BUTTON_HEIGHT), // Config
            Constraint::Min(0),                // Bottom padding (flex)
        ])
        .split(area);

    // Render each button
    for (idx, label) in SIDEBAR_ITEMS.iter().enumerate() {
        let is_selected = match idx {
            0 => matches!(
                app.state.current_view,
                View::Events | View::EventDetail | View::EventCreate | View::EventEdit
            ),
            1 => matches!(app.state.current_view, View::Attendance),
            2 => matches!(
                app.state.current_view,
                View::Forms
                    | View::FormBuilder
                    | View::QuestionEdit
                    | View::PageEdit
                    | View::BranchEdit
                    | View::FormPreview
            ),
            3 => matches!(
                app.state.current_view,
                View::Judging | View::ScoreEntry | View::Leaderboard
            ),
            4 => matches!(app.state.current_view, View::Config),
            _ => false,
        };

        // Attendance, Forms, and Judging need a selected event
        let requires_event = (1..=3).contains(&idx);
        let is_enabled = !requires_event || has_event;

        render_sidebar_button(frame, chunks[idx + 1], label, is_selected, is_enabled);
    }
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let status_area = Rect {
        x: 0,
        y: area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    // Build status bar content
    let mut spans = vec![];

    // Connection status
    let conn_status = if app.state.daemon_connected {
        Span::styled(" ● ", Style::default().fg(Color::Green))
    } else {
        Span::styled(" ○ ", Style::default().fg(Color::Red))
    };
    spans.push(conn_status);

    // View-specific hints
    let hints = get_view_hints(&app.state.current_view);
    spans.push(Span::styled(hints, Style::default().fg(Color::DarkGray)));

    // Status message
    if let Some(msg) = &app.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg, Style::default().fg(Color::Green)));
    }

    // Selected event name
    if let Some(event) = app.state.selected_event() {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            format!("⚑ {}", event.name),
            Style::default().fg(Color::Blue),
        ));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, status_area);

    // Quit hint on the right (double Ctrl+C to quit)
    let quit_hint = " ^C^C:quit ";
    let quit_area = Rect {
        x: area.width.saturating_sub(quit_hint.len() as u16),
        y: area.height.saturating_sub(1),
        width: quit_hint.len() as u16,
        height: 1,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Platform-specific save shortcut hint
#[cfg(target_os = "macos")]
const SAVE_HINT: &str = "Cmd+W:save";
#[cfg(not(target_os = "macos"))]
const SAVE_HINT: &str = "^W:save";

/// Get keyboard hints for the current view
fn get_view_hints(view: &View) -> String {
    match view {
        View::Splash => "Press any key to skip".to_string(),
        View::Events => {
            "j/k:nav  Enter:open  n:new  e:edit  d:delete  s/S:sort  a:all  y:copy  c:config"
                .to_string()
        }
        View::EventDetail => "e:edit  1-4:go to screen  j/k:scroll  d/u:page  Esc:back".to_string(),
        View::EventCreate | View::EventEdit => format!("Tab:next  {}  Esc:cancel", SAVE_HINT),
        View::Attendance => "type/scan badge  Enter:record  m:mode  r:roster refresh  Esc:back".to_string(),
        View::Forms => "j/k:nav  Enter:build  n:new  p:preview  d:delete  Esc:back".to_string(),
        View::FormBuilder => {
            "Tab:pane  j/k:nav  q:question  g:page  b:branch  J/K:move  x:remove  ^S:save".to_string()
        }
        View::QuestionEdit | View::PageEdit | View::BranchEdit => {
            format!("Tab:next  {}  Esc:cancel", SAVE_HINT)
        }
        View::FormPreview => "Tab:question  Enter:next page  Backspace-page:back  Esc:leave".to_string(),
        View::Judging => "j/k:nav  Enter:score  l:leaderboard  Esc:back".to_string(),
        View::ScoreEntry => "j/k:criterion  ←/→ or 0-9:score  ^S:submit  Esc:back".to_string(),
        View::Leaderboard => "r:refresh  j/k:scroll  Esc:back".to_string(),
        View::Config => "j/k:scroll  Esc:back".to_string(),
    }
}
