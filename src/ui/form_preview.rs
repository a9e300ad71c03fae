//! Form fill/preview view driven by a `FormSession`

use crate::app::App;
use crate::state::{QuestionEntry, QuestionKind, SessionPhase};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Draw the preview (fill flow) for the open form session
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let Some(session) = &app.state.preview else {
        let content = Paragraph::new("No form open for preview. Press Esc to go back.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(content, area);
        return;
    };

    if session.phase == SessionPhase::Complete {
        draw_complete(frame, area, app);
        return;
    }

    let (visited, total) = session.progress();
    let page = session
        .doc()
        .pages
        .get(session.current_page)
        .map(|p| p.title.clone())
        .unwrap_or_default();

    let title = format!(
        " {} - {} (page {}/{}) ",
        session.doc().title,
        page,
        visited,
        total
    );

    let mut content: Vec<Line> = Vec::new();
    if let Some(desc) = session
        .doc()
        .pages
        .get(session.current_page)
        .map(|p| p.description.as_str())
    {
        if !desc.is_empty() {
            content.push(Line::from(Span::styled(
                desc.to_string(),
                Style::default().fg(Color::DarkGray),
            )));
            content.push(Line::from(""));
        }
    }

    for (idx, entry) in session.entries.iter().enumerate() {
        let is_active = idx == session.active_entry;
        push_entry_lines(&mut content, entry, is_active);
        content.push(Line::from(""));
    }

    let paragraph = Paragraph::new(content)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.state.scroll_offset as u16, 0));

    frame.render_widget(paragraph, area);
}

fn push_entry_lines(content: &mut Vec<Line>, entry: &QuestionEntry, is_active: bool) {
    let marker = if is_active { "▸ " } else { "  " };
    let mandatory = if entry.question.mandatory { " *" } else { "" };
    let prompt_style = if is_active {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    content.push(Line::from(vec![
        Span::styled(marker.to_string(), Style::default().fg(Color::Cyan)),
        Span::styled(
            format!("{}. {}", entry.question.number, entry.question.prompt),
            prompt_style,
        ),
        Span::styled(mandatory.to_string(), Style::default().fg(Color::Red)),
    ]));

    if let Some(help) = &entry.question.help_text {
        content.push(Line::from(Span::styled(
            format!("     {help}"),
            Style::default().fg(Color::DarkGray),
        )));
    }

    match &entry.question.kind {
        QuestionKind::MultipleChoice { choices } => {
            for (idx, choice) in choices.iter().enumerate() {
                let selected = entry.choice == Some(idx);
                let bullet = if selected { "(•)" } else { "( )" };
                let style = if selected {
                    Style::default().fg(Color::Green)
                } else if is_active {
                    Style::default()
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                content.push(Line::from(Span::styled(
                    format!("     {bullet} {choice}"),
                    style,
                )));
            }
        }
        _ => {
            let cursor = if is_active { "▌" } else { "" };
            let display = if entry.input.is_empty() && !is_active {
                "(blank)".to_string()
            } else {
                entry.input.clone()
            };
            let hint = input_hint(&entry.question.kind);
            content.push(Line::from(vec![
                Span::raw("     "),
                Span::styled(display, Style::default().fg(Color::White)),
                Span::styled(cursor.to_string(), Style::default().fg(Color::Cyan)),
                Span::styled(format!("  {hint}"), Style::default().fg(Color::DarkGray)),
            ]));
        }
    }

    if let Some(error) = &entry.error {
        content.push(Line::from(Span::styled(
            format!("     ✗ {error}"),
            Style::default().fg(Color::Red),
        )));
    }
}

fn input_hint(kind: &QuestionKind) -> String {
    match kind {
        QuestionKind::Essay { max_length: Some(max) } => format!("(max {max} chars)"),
        QuestionKind::Essay { max_length: None } => String::new(),
        QuestionKind::MultipleChoice { .. } => String::new(),
        QuestionKind::Date { .. } => "(YYYY-MM-DD)".to_string(),
        QuestionKind::Number { is_integer: true, .. } => "(whole number)".to_string(),
        QuestionKind::Number { is_integer: false, .. } => "(number)".to_string(),
        QuestionKind::Upload { allowed_extensions, .. } => {
            if allowed_extensions.is_empty() {
                "(file path)".to_string()
            } else {
                format!("(file path, .{})", allowed_extensions.join(" ."))
            }
        }
    }
}

fn draw_complete(frame: &mut Frame, area: Rect, app: &App) {
    let Some(session) = &app.state.preview else {
        return;
    };

    let answers = session.submission();
    let mut content = vec![
        Line::from(Span::styled(
            "All pages complete",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    for answer in &answers {
        let prompt = session
            .doc()
            .question(&answer.question_id)
            .map(|q| format!("{}. {}", q.number, q.prompt))
            .unwrap_or_else(|| answer.question_id.clone());
        content.push(Line::from(vec![
            Span::styled(prompt, Style::default().fg(Color::Cyan)),
            Span::raw("  "),
            Span::raw(answer.value.canonical()),
        ]));
    }

    content.push(Line::from(""));
    content.push(Line::from(vec![
        Span::styled("Enter", Style::default().fg(Color::Cyan)),
        Span::raw(": submit  "),
        Span::styled("Backspace", Style::default().fg(Color::Cyan)),
        Span::raw(": back  "),
        Span::styled("Esc", Style::default().fg(Color::Cyan)),
        Span::raw(": discard"),
    ]));

    let paragraph = Paragraph::new(content)
        .block(
            Block::default()
                .title(format!(" {} - review ", session.doc().title))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green)),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.state.scroll_offset as u16, 0));

    frame.render_widget(paragraph, area);
}
