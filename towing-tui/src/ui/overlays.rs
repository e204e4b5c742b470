use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph},
    Frame,
};

use crate::app::{
    ActivityForm, App, CollaboratorForm, ContractForm, GateState, NotesState, Overlay, PromptState,
};

use super::utils::{centered_rect, input_line};

pub(super) fn render_overlay(frame: &mut Frame, app: &App) {
    let Some(overlay) = &app.overlay else {
        return;
    };
    match overlay {
        Overlay::Gate(state) => render_gate(frame, state),
        Overlay::ContractForm(form) => render_contract_form(frame, form),
        Overlay::ActivityForm(form) => render_activity_form(frame, form),
        Overlay::CollaboratorForm(form) => render_collaborator_form(frame, form),
        Overlay::Notes(state) => render_notes(frame, state),
        Overlay::Prompt(state) => render_prompt(frame, state),
        Overlay::ConfirmDeleteActivity { label, .. } => {
            render_confirm(frame, " Delete Activity? ", label)
        }
        Overlay::ConfirmImport { summary, .. } => render_confirm(frame, " Restore Backup? ", summary),
    }
}

fn dialog_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title.to_string())
        .padding(Padding::horizontal(1))
}

fn render_gate(frame: &mut Frame, state: &GateState) {
    let area = centered_rect(46, 8, frame.area());
    frame.render_widget(Clear, area);

    // Mask the passcode.
    let masked = "*".repeat(state.input.value.chars().count());
    let mut text = vec![
        Line::from(""),
        Line::from(Span::raw(format!("Passcode: {masked}"))),
        Line::from(""),
    ];
    if state.error {
        text.push(Line::from(Span::styled(
            "Incorrect passcode, try again",
            Style::default().fg(Color::Red),
        )));
    } else {
        text.push(Line::from(Span::styled(
            "Enter to confirm, Esc to cancel",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let paragraph = Paragraph::new(text)
        .block(dialog_block(" Restricted Action "))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn render_contract_form(frame: &mut Frame, form: &ContractForm) {
    let title = if form.editing_id.is_some() {
        " Edit Contract "
    } else {
        " New Contract "
    };
    let area = centered_rect(52, 10, frame.area());
    frame.render_widget(Clear, area);

    let mut text = vec![
        input_line("Number", &form.number, form.focused == 0),
        input_line("Start ", &form.start, form.focused == 1),
        input_line("End   ", &form.end, form.focused == 2),
        Line::from(""),
    ];
    text.push(footer_line(form.error.as_deref(), "Tab next field, Enter save, Esc cancel"));

    frame.render_widget(Paragraph::new(text).block(dialog_block(title)), area);
}

fn render_activity_form(frame: &mut Frame, form: &ActivityForm) {
    let title = if form.editing_id.is_some() {
        " Edit Activity "
    } else {
        " New Activity "
    };
    let area = centered_rect(60, 10, frame.area());
    frame.render_widget(Clear, area);

    let mut text = vec![
        input_line("Description", &form.description, form.focused == 0),
        input_line("Start      ", &form.start, form.focused == 1),
        input_line("End        ", &form.end, form.focused == 2),
        Line::from(""),
    ];
    text.push(footer_line(form.error.as_deref(), "Tab next field, Enter save, Esc cancel"));

    frame.render_widget(Paragraph::new(text).block(dialog_block(title)), area);
}

fn render_collaborator_form(frame: &mut Frame, form: &CollaboratorForm) {
    let title = if form.editing_id.is_some() {
        " Edit Collaborator "
    } else {
        " New Collaborator "
    };
    let area = centered_rect(50, 9, frame.area());
    frame.render_widget(Clear, area);

    let text = vec![
        input_line("Name", &form.name, true),
        Line::from(vec![
            Span::raw("Specialty: "),
            Span::styled(form.specialty.label(), Style::default().fg(Color::Cyan)),
            Span::styled(" (Tab cycles)", Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Enter save (passcode required), Esc cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    frame.render_widget(Paragraph::new(text).block(dialog_block(title)), area);
}

fn render_notes(frame: &mut Frame, state: &NotesState) {
    let height = (state.notes.len() as u16 + 7).min(20);
    let area = centered_rect(70, height, frame.area());
    frame.render_widget(Clear, area);

    let mut text: Vec<Line> = Vec::new();
    if state.notes.is_empty() {
        text.push(Line::from(Span::styled(
            "No notes yet",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for (idx, note) in state.notes.iter().enumerate() {
        let mut style = Style::default().fg(Color::White);
        if idx == state.cursor {
            style = style.add_modifier(Modifier::BOLD);
        }
        if state.editing == Some(idx) {
            style = style.fg(Color::Yellow);
        }
        let cursor = if idx == state.cursor { ">" } else { " " };
        text.push(Line::from(Span::styled(
            format!("{cursor} [{}] {}", note.created_at, note.text),
            style,
        )));
    }
    text.push(Line::from(""));
    let label = if state.editing.is_some() { "Edit" } else { "New " };
    text.push(input_line(label, &state.input, true));
    text.push(Line::from(Span::styled(
        "Enter save, Ctrl+e edit, Del remove, Esc close",
        Style::default().fg(Color::DarkGray),
    )));

    frame.render_widget(Paragraph::new(text).block(dialog_block(" Notes ")), area);
}

fn render_prompt(frame: &mut Frame, state: &PromptState) {
    let area = centered_rect(64, 7, frame.area());
    frame.render_widget(Clear, area);

    let text = vec![
        input_line("Path", &state.input, true),
        Line::from(""),
        Line::from(Span::styled(
            "Enter confirm, Esc cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let title = format!(" {} ", state.title);
    frame.render_widget(Paragraph::new(text).block(dialog_block(&title)), area);
}

fn render_confirm(frame: &mut Frame, title: &str, detail: &str) {
    let area = centered_rect(60, 9, frame.area());
    frame.render_widget(Clear, area);

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            detail.to_string(),
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("[y] Yes", Style::default().fg(Color::Red)),
            Span::raw("    "),
            Span::styled("[n] No", Style::default().fg(Color::White)),
        ]),
    ];

    let paragraph = Paragraph::new(text)
        .block(dialog_block(title))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn footer_line<'a>(error: Option<&'a str>, hint: &'a str) -> Line<'a> {
    match error {
        Some(error) => Line::from(Span::styled(error, Style::default().fg(Color::Red))),
        None => Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))),
    }
}
