use chrono::Days;
use crossterm::event::{KeyCode, KeyEvent};
use towing_core::domain::Specialty;
use towing_core::schedule::{self, VISIBLE_DAYS};

use crate::app::App;

pub(in super::super) fn handle_agenda_key(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Char('h') | KeyCode::Left => {
            if app.agenda.day_cursor > 0 {
                app.agenda.day_cursor -= 1;
            }
        }
        KeyCode::Char('l') | KeyCode::Right => {
            if app.agenda.day_cursor + 1 < VISIBLE_DAYS {
                app.agenda.day_cursor += 1;
            }
        }
        KeyCode::Char('f') => {
            app.agenda.filter.specialty = match app.agenda.filter.specialty {
                None => Some(Specialty::Woodworking),
                Some(Specialty::Woodworking) => Some(Specialty::Metalworking),
                Some(Specialty::Metalworking) => None,
            };
        }
        KeyCode::Char('j') | KeyCode::Down => {
            let len = active_collaborator_ids(app).len();
            if app.agenda.filter_cursor + 1 < len {
                app.agenda.filter_cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            if app.agenda.filter_cursor > 0 {
                app.agenda.filter_cursor -= 1;
            }
        }
        KeyCode::Char(' ') => {
            if let Some(id) = active_collaborator_ids(app)
                .get(app.agenda.filter_cursor)
                .cloned()
            {
                app.agenda.filter.toggle_collaborator(&id);
            }
        }
        KeyCode::Char('c') => {
            app.agenda.filter = Default::default();
        }
        KeyCode::Char('W') => {
            export_weekly_pdf(app);
        }
        KeyCode::Char('g') => {
            export_day_digest(app);
        }
        _ => {}
    }
}

fn active_collaborator_ids(app: &App) -> Vec<String> {
    app.store
        .collaborators()
        .iter()
        .filter(|c| !c.is_archived)
        .map(|c| c.id.clone())
        .collect()
}

fn export_weekly_pdf(app: &mut App) {
    let report = towing_pdf::weekly_report(
        app.store.contracts(),
        app.store.collaborators(),
        app.today,
    );
    let renderer =
        towing_pdf::ReportRenderer::new(&app.config.font_dir, app.config.font_family.clone());
    let filename = towing_pdf::weekly_report_filename(app.today);
    match renderer.render_to_file(&report, std::path::Path::new(&filename)) {
        Ok(()) => app.set_status(format!("Wrote {filename}")),
        Err(e) => {
            tracing::error!(error = %e, "weekly report failed");
            app.set_status(format!("Report failed: {e}"));
        }
    }
}

/// Write the selected day's share digest to a text file.
fn export_day_digest(app: &mut App) {
    let monday = schedule::week_monday(app.today);
    let Some(day) = monday.checked_add_days(Days::new(app.agenda.day_cursor as u64)) else {
        return;
    };
    let week = schedule::WeekSchedule::build(
        app.today,
        app.store.contracts(),
        app.store.collaborators(),
        &app.agenda.filter,
    );
    let Some(bucket) = week.days.iter().find(|b| b.date == day) else {
        return;
    };
    let digest = schedule::day_digest(day, &bucket.entries, app.store.collaborators());
    let filename = format!("TOWING_Day_{}.txt", day.format("%Y%m%d"));
    match std::fs::write(&filename, digest) {
        Ok(()) => app.set_status(format!("Wrote {filename}")),
        Err(e) => {
            tracing::error!(error = %e, "digest export failed");
            app.set_status(format!("Digest failed: {e}"));
        }
    }
}
