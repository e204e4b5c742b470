use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;

pub(super) fn render_team_view(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();
    let visible = app.visible_collaborators();

    if visible.is_empty() {
        lines.push(Line::from(Span::styled(
            "No collaborators. Press n to add one.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    for (idx, collaborator) in visible.iter().enumerate() {
        let selected = idx == app.team.cursor;
        // Count of active contracts this person is assigned to.
        let assignments = app
            .store
            .contracts()
            .iter()
            .filter(|c| !c.is_archived)
            .filter(|c| c.collaborator_ids.iter().any(|id| *id == collaborator.id))
            .count();

        let mut style = if collaborator.is_archived {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::White)
        };
        if selected {
            style = style.add_modifier(Modifier::BOLD);
        }

        let marker = if selected { ">" } else { " " };
        let archived = if collaborator.is_archived { "  [archived]" } else { "" };
        lines.push(Line::from(Span::styled(
            format!(
                "{marker} {}  ({})  {} active contracts{archived}",
                collaborator.name,
                collaborator.specialty.label(),
                assignments,
            ),
            style,
        )));
    }

    let block = Block::default().borders(Borders::ALL).title(" Team ");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
