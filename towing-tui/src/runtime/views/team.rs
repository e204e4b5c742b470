use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, CollaboratorForm, GateState, GatedAction, Overlay};

use super::commit;

pub(in super::super) fn handle_team_key(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            let len = app.visible_collaborators().len();
            if app.team.cursor + 1 < len {
                app.team.cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            if app.team.cursor > 0 {
                app.team.cursor -= 1;
            }
        }
        KeyCode::Char('n') => {
            app.overlay = Some(Overlay::CollaboratorForm(CollaboratorForm::blank()));
        }
        KeyCode::Char('e') => {
            let form = app
                .visible_collaborators()
                .get(app.team.cursor)
                .map(|c| CollaboratorForm::for_edit(&c.id, &c.name, c.specialty));
            if let Some(form) = form {
                app.overlay = Some(Overlay::CollaboratorForm(form));
            }
        }
        KeyCode::Char('a') => {
            if let Some(id) = app.selected_collaborator_id() {
                let result = app.store.toggle_archive_collaborator(&id);
                commit(app, result);
                app.clamp_cursors();
            }
        }
        KeyCode::Char('d') => {
            if let Some(id) = app.selected_collaborator_id() {
                app.overlay = Some(Overlay::Gate(GateState::new(
                    GatedAction::DeleteCollaborator(id),
                )));
            }
        }
        KeyCode::Char('v') => {
            app.team.show_archived = !app.team.show_archived;
            app.clamp_cursors();
        }
        _ => {}
    }
}
