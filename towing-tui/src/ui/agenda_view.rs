use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use towing_core::schedule::WeekSchedule;

use crate::app::App;

pub(super) fn render_agenda_view(frame: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(0)])
        .split(area);

    render_filter_panel(frame, app, columns[0]);

    let week = WeekSchedule::build(
        app.today,
        app.store.contracts(),
        app.store.collaborators(),
        &app.agenda.filter,
    );
    render_week(frame, app, &week, columns[1]);
}

fn render_filter_panel(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    let specialty = match app.agenda.filter.specialty {
        None => "All",
        Some(s) => s.label(),
    };
    lines.push(Line::from(vec![
        Span::raw("Specialty (f): "),
        Span::styled(specialty, Style::default().fg(Color::Cyan)),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Collaborators (space):",
        Style::default().fg(Color::DarkGray),
    )));

    let active: Vec<_> = app
        .store
        .collaborators()
        .iter()
        .filter(|c| !c.is_archived)
        .collect();
    for (idx, collaborator) in active.iter().enumerate() {
        let picked = app.agenda.filter.collaborator_ids.contains(&collaborator.id);
        let mark = if picked { "x" } else { " " };
        let cursor = if idx == app.agenda.filter_cursor { ">" } else { " " };
        let mut style = Style::default().fg(Color::White);
        if idx == app.agenda.filter_cursor {
            style = style.add_modifier(Modifier::BOLD);
        }
        lines.push(Line::from(Span::styled(
            format!("{cursor} [{mark}] {}", collaborator.name),
            style,
        )));
    }

    let block = Block::default().borders(Borders::ALL).title(" Filters ");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_week(frame: &mut Frame, app: &App, week: &WeekSchedule, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    if !week.backlog.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("OVERDUE BACKLOG ({})", week.backlog.len()),
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )));
        for entry in &week.backlog {
            lines.push(entry_line(app, entry, true));
        }
        lines.push(Line::from(""));
    }

    for (idx, bucket) in week.days.iter().enumerate() {
        let selected = idx == app.agenda.day_cursor;
        let mut style = Style::default().fg(Color::Cyan);
        if selected {
            style = style.add_modifier(Modifier::BOLD).add_modifier(Modifier::REVERSED);
        }
        let today_marker = if bucket.date == app.today { " (today)" } else { "" };
        lines.push(Line::from(Span::styled(
            format!(" {}{today_marker} ", bucket.date.format("%A %d/%m")),
            style,
        )));

        if bucket.entries.is_empty() {
            lines.push(Line::from(Span::styled(
                "   nothing scheduled",
                Style::default().fg(Color::DarkGray),
            )));
        }
        for entry in &bucket.entries {
            let overdue = entry.is_overdue_on(bucket.date);
            lines.push(entry_line(app, entry, overdue));
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Week of {} ", week.monday.format("%d/%m/%Y")));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn entry_line<'a>(
    app: &App,
    entry: &'a towing_core::schedule::ScheduleEntry,
    overdue: bool,
) -> Line<'a> {
    let style = if overdue {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::White)
    };
    let team = entry.team_names(app.store.collaborators());
    Line::from(Span::styled(
        format!(
            "   #{} {} ({}%) [{}]",
            entry.contract_number,
            entry.activity.description,
            entry.activity.progress.percent(),
            if team.is_empty() { "unassigned".to_string() } else { team },
        ),
        style,
    ))
}
