use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, Tab};

mod agenda_view;
mod contracts_view;
mod overlays;
mod team_view;
pub(super) mod utils;

pub fn render(frame: &mut Frame, app: &mut App) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_tab_bar(frame, app, root[0]);

    let body = root[1];
    match app.tab {
        Tab::Contracts => contracts_view::render_contracts_view(frame, app, body),
        Tab::Agenda => agenda_view::render_agenda_view(frame, app, body),
        Tab::Team => team_view::render_team_view(frame, app, body),
    }

    render_status_line(frame, app, root[2]);

    overlays::render_overlay(frame, app);
}

fn render_tab_bar(frame: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    let tab_span = |label: &'static str, tab: Tab| {
        if app.tab == tab {
            Span::styled(
                label,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(label, Style::default().fg(Color::DarkGray))
        }
    };

    let line = Line::from(vec![
        Span::styled(
            " TOWING ",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        tab_span("[Contracts]", Tab::Contracts),
        Span::raw(" "),
        tab_span("[Agenda]", Tab::Agenda),
        Span::raw(" "),
        tab_span("[Team]", Tab::Team),
        Span::raw("   "),
        Span::styled(
            format!("today {}", app.today.format("%d/%m/%Y")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_status_line(frame: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    let line = if let Some(status) = &app.status {
        Line::from(Span::styled(
            status.as_str(),
            Style::default().fg(Color::Yellow),
        ))
    } else {
        let hints = match app.tab {
            Tab::Contracts => {
                "Tab switch | j/k move | Enter expand | n new | e edit | a archive | d delete | t team | A activity | 1-4 progress | s status | N notes | S scan | P pdf | B backup | I import | q quit"
            }
            Tab::Agenda => {
                "Tab switch | h/l day | f specialty | j/k + space collaborator filter | c clear | W pdf | g digest | q quit"
            }
            Tab::Team => "Tab switch | j/k move | n new | e edit | a archive | d delete | v archived | q quit",
        };
        Line::from(Span::styled(hints, Style::default().fg(Color::DarkGray)))
    };
    frame.render_widget(Paragraph::new(line), area);
}
