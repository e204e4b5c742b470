use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;

pub(super) fn render_contracts_view(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();
    let visible = app.visible_contracts();

    if visible.is_empty() {
        lines.push(Line::from(Span::styled(
            "No contracts. Press n to create one.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    for (idx, contract) in visible.iter().enumerate() {
        let selected = idx == app.contracts.cursor;
        let expanded = app.contracts.expanded.contains(&contract.id);
        let overdue = contract.is_overdue(app.today);

        let mut header_style = if contract.is_archived {
            Style::default().fg(Color::DarkGray)
        } else if overdue {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::White)
        };
        if selected {
            header_style = header_style.add_modifier(Modifier::BOLD);
        }

        let marker = if selected { ">" } else { " " };
        let arrow = if expanded { "v" } else { ">" };
        let mut header = format!(
            "{marker} {arrow} #{}  {} to {}  {}%",
            contract.number,
            contract.start_date.format("%d/%m/%y"),
            contract.end_date.format("%d/%m/%y"),
            contract.overall_progress(),
        );
        if contract.is_archived {
            header.push_str("  [archived]");
        }
        if overdue {
            header.push_str("  OVERDUE");
        }
        if app.scanning.contains(&contract.id) {
            header.push_str("  [scanning...]");
        }
        lines.push(Line::from(Span::styled(header, header_style)));

        if !expanded {
            continue;
        }

        let team = team_line(app, contract);
        lines.push(Line::from(Span::styled(
            format!("      team: {team}"),
            Style::default().fg(Color::Cyan),
        )));

        if contract.activities.is_empty() {
            lines.push(Line::from(Span::styled(
                "      no activities (A to add, S to scan a photo)",
                Style::default().fg(Color::DarkGray),
            )));
        }
        for (aidx, activity) in contract.activities.iter().enumerate() {
            let act_selected = selected && aidx == app.contracts.activity_cursor;
            let act_overdue = activity.is_overdue(app.today, contract.end_date);
            let mut style = if activity.progress.is_complete() {
                Style::default().fg(Color::Green)
            } else if act_overdue {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::Gray)
            };
            if act_selected {
                style = style.add_modifier(Modifier::REVERSED);
            }
            let notes = if activity.notes.is_empty() {
                String::new()
            } else {
                format!("  ({} notes)", activity.notes.len())
            };
            lines.push(Line::from(Span::styled(
                format!(
                    "      [{:>3}%] {}  {}  {} to {}{notes}",
                    activity.progress.percent(),
                    activity.status.label(),
                    activity.description,
                    activity.start_date.format("%d/%m"),
                    activity.end_date.format("%d/%m"),
                ),
                style,
            )));
        }
    }

    if app.contracts.team_mode {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  Assign team (space toggles, t closes):",
            Style::default().fg(Color::Cyan),
        )));
        render_team_toggles(app, &mut lines);
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Contracts (most recent first) ");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn team_line(app: &App, contract: &towing_core::domain::Contract) -> String {
    let names: Vec<&str> = app
        .store
        .collaborators()
        .iter()
        .filter(|c| contract.collaborator_ids.iter().any(|id| *id == c.id))
        .map(|c| c.name.as_str())
        .collect();
    if names.is_empty() {
        "none assigned".to_string()
    } else {
        names.join(", ")
    }
}

fn render_team_toggles(app: &App, lines: &mut Vec<Line>) {
    let Some(contract) = app.selected_contract() else {
        return;
    };
    let active: Vec<_> = app
        .store
        .collaborators()
        .iter()
        .filter(|c| !c.is_archived)
        .collect();
    for (idx, collaborator) in active.iter().enumerate() {
        let assigned = contract
            .collaborator_ids
            .iter()
            .any(|id| *id == collaborator.id);
        let mark = if assigned { "x" } else { " " };
        let cursor = if idx == app.contracts.team_cursor {
            ">"
        } else {
            " "
        };
        let mut style = Style::default().fg(Color::White);
        if idx == app.contracts.team_cursor {
            style = style.add_modifier(Modifier::BOLD);
        }
        lines.push(Line::from(Span::styled(
            format!(
                "  {cursor} [{mark}] {} ({})",
                collaborator.name,
                collaborator.specialty.label(),
            ),
            style,
        )));
    }
}
