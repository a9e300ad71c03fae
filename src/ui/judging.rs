//! Judging views: team assignments, score sheet entry, leaderboard

use super::render_scrollable_list;
use crate::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

/// Draw the judge's team assignments
pub fn draw_teams(frame: &mut Frame, area: Rect, app: &App) {
    if app.state.teams.is_empty() {
        let content = Paragraph::new("No teams assigned to you for this event.")
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .title(" Judging ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            );
        frame.render_widget(content, area);
        return;
    }

    let scored = app.state.teams.iter().filter(|t| t.scored).count();

    let items: Vec<ListItem> = app
        .state
        .teams
        .iter()
        .enumerate()
        .map(|(idx, team)| {
            let is_selected = idx == app.state.selected_index;
            let prefix = if is_selected { "▸" } else { " " };
            let mark = if team.scored { "✓" } else { "·" };
            let mark_style = if team.scored {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let style = if is_selected {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };

            ListItem::new(Line::from(vec![
                Span::styled(prefix, style),
                Span::styled(mark, mark_style),
                Span::raw(" "),
                Span::styled(&team.team_name, style.add_modifier(Modifier::BOLD)),
                Span::raw("  "),
                Span::styled(&team.project_title, Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(format!(
                " Judging ({scored}/{} scored) ",
                app.state.teams.len()
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    render_scrollable_list(frame, area, list, app.state.selected_index);
}

/// Draw the score sheet for the selected team
pub fn draw_score_sheet(frame: &mut Frame, area: Rect, app: &App) {
    let Some(sheet) = &app.state.sheet else {
        let content = Paragraph::new("No team selected. Press Esc to go back.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(content, area);
        return;
    };

    let team_name = app
        .state
        .teams
        .iter()
        .find(|t| t.team_id == sheet.team_id)
        .map(|t| t.team_name.clone())
        .unwrap_or_else(|| sheet.team_id.clone());

    let mut content: Vec<Line> = Vec::new();
    for (idx, criterion) in app.state.criteria.iter().enumerate() {
        let is_active = idx == sheet.active;
        let marker = if is_active { "▸ " } else { "  " };
        let score = sheet
            .score(idx)
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());

        let label_style = if is_active {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        content.push(Line::from(vec![
            Span::styled(marker.to_string(), Style::default().fg(Color::Cyan)),
            Span::styled(criterion.label.clone(), label_style),
            Span::styled(
                format!("  (weight {})", criterion.weight),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
        content.push(Line::from(vec![
            Span::raw("     "),
            Span::styled(
                format!("{score} / {}", criterion.max_score),
                Style::default().fg(Color::Yellow),
            ),
        ]));
        content.push(Line::from(""));
    }

    let total = sheet.weighted_total(&app.state.criteria);
    let completeness = if sheet.is_complete() {
        Span::styled("complete", Style::default().fg(Color::Green))
    } else {
        Span::styled("incomplete", Style::default().fg(Color::Red))
    };
    content.push(Line::from(vec![
        Span::styled("Weighted total: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("{total:.1}"),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        completeness,
    ]));

    let paragraph = Paragraph::new(content)
        .block(
            Block::default()
                .title(format!(" Score - {team_name} "))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.state.scroll_offset as u16, 0));

    frame.render_widget(paragraph, area);
}

/// Draw the leaderboard
pub fn draw_leaderboard(frame: &mut Frame, area: Rect, app: &App) {
    if app.state.leaderboard.is_empty() {
        let content = Paragraph::new("Leaderboard is empty. Press 'r' to refresh.")
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .title(" Leaderboard ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            );
        frame.render_widget(content, area);
        return;
    }

    let mut content: Vec<Line> = Vec::new();
    for row in &app.state.leaderboard {
        let medal_style = match row.rank {
            1 => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            2 => Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
            3 => Style::default().fg(Color::Red),
            _ => Style::default(),
        };
        content.push(Line::from(vec![
            Span::styled(format!("{:>3}. ", row.rank), medal_style),
            Span::styled(row.team_name.clone(), medal_style),
            Span::raw("  "),
            Span::styled(
                format!("{:.1}", row.weighted_score),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(
                format!("  ({} judges)", row.judge_count),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }

    let paragraph = Paragraph::new(content)
        .block(
            Block::default()
                .title(" Leaderboard ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .scroll((app.state.scroll_offset as u16, 0));

    frame.render_widget(paragraph, area);
}
