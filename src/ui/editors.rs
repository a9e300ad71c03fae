//! Editor form rendering (events, questions, pages, branches)

use crate::app::App;
use crate::state::{EditorState, FieldValue, Form, FormField};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Draw a single editor field
fn draw_field(frame: &mut Frame, area: Rect, field: &FormField, is_active: bool) {
    let style = if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let border_style = if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let value = field.display_value();
    let display_value = if value.is_empty() && !is_active {
        "(empty)".to_string()
    } else {
        value
    };

    // Toggles use Space, text fields show a cursor
    let cursor = if is_active && !matches!(field.value, FieldValue::Toggle(_)) {
        "▌"
    } else {
        ""
    };

    let content = if field.is_multiline {
        let mut lines: Vec<Line> = display_value
            .lines()
            .map(|l| Line::from(l.to_string()))
            .collect();
        if is_active {
            if let Some(last) = lines.last_mut() {
                last.spans
                    .push(Span::styled(cursor, Style::default().fg(Color::Cyan)));
            } else {
                lines.push(Line::from(Span::styled(
                    cursor,
                    Style::default().fg(Color::Cyan),
                )));
            }
        }
        Paragraph::new(lines)
    } else {
        let mut spans = vec![Span::styled(display_value, style)];
        if matches!(field.value, FieldValue::Toggle(_)) && is_active {
            spans.push(Span::styled(
                "  (Space to toggle)",
                Style::default().fg(Color::DarkGray),
            ));
        }
        spans.push(Span::styled(cursor, Style::default().fg(Color::Cyan)));
        Paragraph::new(Line::from(spans))
    };

    let block = Block::default()
        .title(format!(" {} ", field.label))
        .borders(Borders::ALL)
        .border_style(border_style);

    frame.render_widget(content.wrap(Wrap { trim: false }).block(block), area);
}

/// Draw every field of a form vertically, multiline fields get the slack
fn draw_form_fields(frame: &mut Frame, area: Rect, form: &dyn Form) {
    let count = form.field_count();
    let mut constraints: Vec<Constraint> = Vec::with_capacity(count + 1);
    for i in 0..count {
        let is_multiline = form.get_field(i).is_some_and(|f| f.is_multiline);
        constraints.push(if is_multiline {
            Constraint::Min(5)
        } else {
            Constraint::Length(3)
        });
    }
    constraints.push(Constraint::Length(2)); // Help text

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .margin(1)
        .split(area);

    for i in 0..count {
        if let Some(field) = form.get_field(i) {
            draw_field(frame, chunks[i], field, form.active_field() == i);
        }
    }

    let help = Paragraph::new(Line::from(vec![
        Span::styled("Tab", Style::default().fg(Color::Cyan)),
        Span::raw(": next field  "),
        Span::styled(crate::platform::SAVE_SHORTCUT, Style::default().fg(Color::Cyan)),
        Span::raw(": save  "),
        Span::styled("Esc", Style::default().fg(Color::Cyan)),
        Span::raw(": cancel"),
    ]))
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[count]);
}

fn draw_titled_form(frame: &mut Frame, area: Rect, title: &str, form: &dyn Form) {
    let block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(block, area);
    draw_form_fields(frame, area, form);
}

/// Draw event create form
pub fn draw_event_create(frame: &mut Frame, area: Rect, app: &App) {
    if let EditorState::EventCreate(form) = &app.state.editor {
        draw_titled_form(frame, area, "Create Event", form);
    }
}

/// Draw event edit form
pub fn draw_event_edit(frame: &mut Frame, area: Rect, app: &App) {
    if let EditorState::EventEdit(form) = &app.state.editor {
        let title = app
            .state
            .selected_event()
            .map(|e| format!("Edit Event - {}", e.name))
            .unwrap_or_else(|| "Edit Event".to_string());
        draw_titled_form(frame, area, &title, form);
    }
}

/// Draw the question editor with its type selector line
pub fn draw_question_edit(frame: &mut Frame, area: Rect, app: &App) {
    let EditorState::Question(form) = &app.state.editor else {
        return;
    };

    let title = match &form.editing {
        Some((_, number)) => format!("Edit Question {number}"),
        None => "Add Question".to_string(),
    };
    let block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .margin(1)
        .split(area);

    let kind_line = Paragraph::new(Line::from(vec![
        Span::styled("Type: ", Style::default().fg(Color::DarkGray)),
        Span::styled(form.kind.label(), Style::default().fg(Color::Yellow)),
        Span::styled("   Ctrl+T to change", Style::default().fg(Color::DarkGray)),
    ]));
    frame.render_widget(kind_line, chunks[0]);

    draw_form_fields(frame, chunks[1], form);
}

/// Draw page title/description editor
pub fn draw_page_edit(frame: &mut Frame, area: Rect, app: &App) {
    if let EditorState::Page(form) = &app.state.editor {
        let title = match form.editing {
            Some(idx) => format!("Edit Page {}", idx + 1),
            None => "Add Page".to_string(),
        };
        draw_titled_form(frame, area, &title, form);
    }
}

/// Draw branch rule editor
pub fn draw_branch_edit(frame: &mut Frame, area: Rect, app: &App) {
    let EditorState::Branch(form) = &app.state.editor else {
        return;
    };

    let block = Block::default()
        .title(" Branch Rule ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .margin(1)
        .split(area);

    let context = Paragraph::new(Line::from(vec![
        Span::styled("Question: ", Style::default().fg(Color::DarkGray)),
        Span::styled(&form.question_prompt, Style::default().fg(Color::Yellow)),
        Span::styled(
            format!("   (page {})", form.source_page + 1),
            Style::default().fg(Color::DarkGray),
        ),
    ]));
    frame.render_widget(context, chunks[0]);

    draw_form_fields(frame, chunks[1], form);
}
