//! Forms list and form builder views

use super::render_scrollable_list;
use crate::app::App;
use crate::state::{BuilderFocus, PageTarget, QuestionKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

fn kind_tag(kind: &QuestionKind) -> &'static str {
    match kind {
        QuestionKind::Essay { .. } => "essay",
        QuestionKind::MultipleChoice { .. } => "choice",
        QuestionKind::Date { .. } => "date",
        QuestionKind::Number { .. } => "number",
        QuestionKind::Upload { .. } => "upload",
    }
}

/// Draw the forms list for the selected event
pub fn draw_list(frame: &mut Frame, area: Rect, app: &App) {
    let event_name = app
        .state
        .selected_event()
        .map(|e| e.name.clone())
        .unwrap_or_else(|| "Event".to_string());

    if app.state.forms.is_empty() {
        let content = Paragraph::new("No forms yet.\nPress 'n' to create a new form.")
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .title(format!(" Forms - {} ", event_name))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            );
        frame.render_widget(content, area);
        return;
    }

    let items: Vec<ListItem> = app
        .state
        .forms
        .iter()
        .enumerate()
        .map(|(idx, form)| {
            let is_selected = idx == app.state.selected_index;
            let prefix = if is_selected { "▸" } else { " " };

            let style = if is_selected {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };

            let counts = format!(
                "{} pages, {} questions",
                form.pages.len(),
                form.question_count()
            );
            let sheet = if form.meta.sheet_id.is_some() {
                " ⇒sheet"
            } else {
                ""
            };

            let line = Line::from(vec![
                Span::styled(prefix, style),
                Span::styled(&form.title, style.add_modifier(Modifier::BOLD)),
                Span::raw("  "),
                Span::styled(counts, Style::default().fg(Color::DarkGray)),
                Span::styled(sheet, Style::default().fg(Color::Green)),
            ]);
            ListItem::new(line)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(format!(" Forms - {} ", event_name))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    render_scrollable_list(frame, area, list, app.state.selected_index);
}

/// Draw the form builder: pages pane on the left, questions on the right
pub fn draw_builder(frame: &mut Frame, area: Rect, app: &App) {
    let Some(builder) = &app.state.builder else {
        let content = Paragraph::new("No form open. Press Esc to go back.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(content, area);
        return;
    };

    let dirty_marker = if builder.dirty { " *" } else { "" };
    let outer = Block::default()
        .title(format!(" Builder - {}{} ", builder.doc.title, dirty_marker))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(0)])
        .split(inner);

    draw_pages_pane(frame, panes[0], app, builder);
    draw_questions_pane(frame, panes[1], app, builder);
}

fn draw_pages_pane(
    frame: &mut Frame,
    area: Rect,
    _app: &App,
    builder: &crate::state::BuilderState,
) {
    let border_color = match builder.focus {
        BuilderFocus::Pages => Color::Cyan,
        BuilderFocus::Questions => Color::DarkGray,
    };

    let items: Vec<ListItem> = builder
        .doc
        .pages
        .iter()
        .enumerate()
        .map(|(idx, page)| {
            let is_selected = idx == builder.selected_page;
            let prefix = if is_selected { "▸" } else { " " };
            let style = if is_selected {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };
            let branch_count = page.branches.len();
            let branch_label = if branch_count > 0 {
                format!(" ⎇{branch_count}")
            } else {
                String::new()
            };
            let line = Line::from(vec![
                Span::styled(prefix, style),
                Span::styled(format!("{}. ", idx + 1), Style::default().fg(Color::Cyan)),
                Span::styled(&page.title, style),
                Span::styled(branch_label, Style::default().fg(Color::Yellow)),
            ]);
            ListItem::new(line)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(" Pages ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color)),
    );

    render_scrollable_list(frame, area, list, builder.selected_page);
}

fn draw_questions_pane(
    frame: &mut Frame,
    area: Rect,
    _app: &App,
    builder: &crate::state::BuilderState,
) {
    let border_color = match builder.focus {
        BuilderFocus::Questions => Color::Cyan,
        BuilderFocus::Pages => Color::DarkGray,
    };

    let Some(page) = builder.doc.pages.get(builder.selected_page) else {
        return;
    };

    if page.questions.is_empty() {
        let content = Paragraph::new("No questions on this page.\nPress 'q' to add one.")
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .title(format!(" {} ", page.title))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border_color)),
            );
        frame.render_widget(content, area);
        return;
    }

    let items: Vec<ListItem> = page
        .questions
        .iter()
        .enumerate()
        .map(|(idx, question)| {
            let is_selected = idx == builder.selected_question;
            let prefix = if is_selected { "▸" } else { " " };
            let style = if is_selected {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };

            let mandatory = if question.mandatory { " *" } else { "" };
            let mut spans = vec![
                Span::styled(prefix, style),
                Span::styled(
                    format!("{}. ", question.number),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(&question.prompt, style),
                Span::styled(mandatory, Style::default().fg(Color::Red)),
                Span::raw(" "),
                Span::styled(
                    format!("[{}]", kind_tag(&question.kind)),
                    Style::default().fg(Color::DarkGray),
                ),
            ];

            if let Some(rule) = page.branches.get(&question.id) {
                let target = match rule.target {
                    PageTarget::Page(p) => format!("p{}", p + 1),
                    PageTarget::Submit => "submit".to_string(),
                };
                spans.push(Span::styled(
                    format!("  ⎇ \"{}\" → {}", rule.assert_on, target),
                    Style::default().fg(Color::Yellow),
                ));
            }

            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(format!(" {} ", page.title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color)),
    );

    render_scrollable_list(frame, area, list, builder.selected_question);
}
