use std::path::Path;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use towing_core::domain::{is_valid_contract_number, ContractPatch, Note};
use towing_core::StoreError;

use crate::app::{
    ActivityForm, App, CollaboratorForm, ContractForm, GateState, GatedAction, NotesState,
    Overlay, PromptPurpose, PromptState, TextInput, parse_form_date,
};
use crate::scan::{self, ActivityExtractor, GeminiExtractor};

use super::super::action_queue::{Action, ActionTx};
use super::commit;

const DATE_FORMAT_ERROR: &str = "Dates must be YYYY-MM-DD";

fn commit_with(app: &mut App, result: Result<(), StoreError>, success: &str) {
    match result {
        Ok(()) => app.set_status(success.to_string()),
        Err(e) => {
            tracing::error!(error = %e, "persist failed");
            app.set_status(format!("Save failed: {e}"));
        }
    }
}

/// Route plain editing keys into a text input. Returns true when consumed.
fn edit_input(key: KeyEvent, input: &mut TextInput) -> bool {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            input.insert(c);
            true
        }
        KeyCode::Backspace => {
            input.backspace();
            true
        }
        KeyCode::Left => {
            input.move_left();
            true
        }
        KeyCode::Right => {
            input.move_right();
            true
        }
        _ => false,
    }
}

pub(in super::super) fn handle_overlay_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    let Some(overlay) = app.overlay.take() else {
        return;
    };
    match overlay {
        Overlay::Gate(state) => handle_gate_key(key, app, state),
        Overlay::ContractForm(form) => handle_contract_form_key(key, app, form),
        Overlay::ActivityForm(form) => handle_activity_form_key(key, app, form),
        Overlay::CollaboratorForm(form) => handle_collaborator_form_key(key, app, form),
        Overlay::Notes(state) => handle_notes_key(key, app, state),
        Overlay::Prompt(state) => handle_prompt_key(key, app, state, action_tx),
        Overlay::ConfirmDeleteActivity {
            contract_id,
            activity_id,
            label,
        } => handle_confirm_delete_key(key, app, contract_id, activity_id, label),
        Overlay::ConfirmImport { backup, summary } => {
            handle_confirm_import_key(key, app, backup, summary)
        }
    }
}

fn handle_gate_key(key: KeyEvent, app: &mut App, mut state: GateState) {
    match key.code {
        KeyCode::Esc => {
            app.set_status("Cancelled");
        }
        KeyCode::Enter => {
            if state.input.value == app.config.gate_secret {
                run_gated(app, state.pending);
            } else {
                // Wrong passcode: clear and let the user retry.
                state.error = true;
                state.input.clear();
                app.overlay = Some(Overlay::Gate(state));
            }
        }
        _ => {
            edit_input(key, &mut state.input);
            app.overlay = Some(Overlay::Gate(state));
        }
    }
}

fn run_gated(app: &mut App, action: GatedAction) {
    match action {
        GatedAction::DeleteContract(id) => {
            let result = app.store.delete_contract(&id);
            app.clamp_cursors();
            commit_with(app, result, "Contract deleted");
        }
        GatedAction::RenumberContract { id, patch } => {
            let result = app.store.update_contract(&id, patch);
            commit_with(app, result, "Contract updated");
        }
        GatedAction::DeleteCollaborator(id) => {
            let result = app.store.delete_collaborator(&id);
            app.clamp_cursors();
            commit_with(app, result, "Collaborator deleted");
        }
        GatedAction::SaveCollaborator {
            editing_id,
            name,
            specialty,
        } => match editing_id {
            Some(id) => {
                let result = app.store.update_collaborator(&id, name, specialty);
                commit_with(app, result, "Collaborator updated");
            }
            None => {
                let result = app.store.add_collaborator(name, specialty).map(|_| ());
                app.team.cursor = 0;
                commit_with(app, result, "Collaborator added");
            }
        },
    }
}

fn handle_contract_form_key(key: KeyEvent, app: &mut App, mut form: ContractForm) {
    match key.code {
        KeyCode::Esc => {}
        KeyCode::Tab => {
            form.focused = (form.focused + 1) % ContractForm::FIELDS;
            app.overlay = Some(Overlay::ContractForm(form));
        }
        KeyCode::BackTab => {
            form.focused = (form.focused + ContractForm::FIELDS - 1) % ContractForm::FIELDS;
            app.overlay = Some(Overlay::ContractForm(form));
        }
        KeyCode::Enter => submit_contract_form(app, form),
        _ => {
            edit_input(key, form.focused_input());
            app.overlay = Some(Overlay::ContractForm(form));
        }
    }
}

fn submit_contract_form(app: &mut App, mut form: ContractForm) {
    let number = form.number.value.trim().to_string();
    if !is_valid_contract_number(&number) {
        form.error = Some("Number may only contain digits and separators".to_string());
        app.overlay = Some(Overlay::ContractForm(form));
        return;
    }
    let (Some(start), Some(end)) = (
        parse_form_date(&form.start.value),
        parse_form_date(&form.end.value),
    ) else {
        form.error = Some(DATE_FORMAT_ERROR.to_string());
        app.overlay = Some(Overlay::ContractForm(form));
        return;
    };

    match form.editing_id {
        None => {
            let result = app.store.add_contract(number, start, end).map(|_| ());
            app.contracts.cursor = 0;
            commit_with(app, result, "Contract created");
        }
        Some(id) => {
            let patch = ContractPatch {
                number: Some(number.clone()),
                start_date: Some(start),
                end_date: Some(end),
                ..Default::default()
            };
            let renumbered = app
                .store
                .contract(&id)
                .map(|c| c.number != number)
                .unwrap_or(false);
            if renumbered {
                // Changing the contract number is passcode-gated.
                app.overlay = Some(Overlay::Gate(GateState::new(
                    GatedAction::RenumberContract { id, patch },
                )));
            } else {
                let result = app.store.update_contract(&id, patch);
                commit_with(app, result, "Contract updated");
            }
        }
    }
}

fn handle_activity_form_key(key: KeyEvent, app: &mut App, mut form: ActivityForm) {
    match key.code {
        KeyCode::Esc => {}
        KeyCode::Tab => {
            form.focused = (form.focused + 1) % ActivityForm::FIELDS;
            app.overlay = Some(Overlay::ActivityForm(form));
        }
        KeyCode::BackTab => {
            form.focused = (form.focused + ActivityForm::FIELDS - 1) % ActivityForm::FIELDS;
            app.overlay = Some(Overlay::ActivityForm(form));
        }
        KeyCode::Enter => submit_activity_form(app, form),
        _ => {
            edit_input(key, form.focused_input());
            app.overlay = Some(Overlay::ActivityForm(form));
        }
    }
}

fn submit_activity_form(app: &mut App, mut form: ActivityForm) {
    let description = form.description.value.trim().to_string();
    if description.is_empty() {
        form.error = Some("Description is required".to_string());
        app.overlay = Some(Overlay::ActivityForm(form));
        return;
    }
    let (Some(start), Some(end)) = (
        parse_form_date(&form.start.value),
        parse_form_date(&form.end.value),
    ) else {
        form.error = Some(DATE_FORMAT_ERROR.to_string());
        app.overlay = Some(Overlay::ActivityForm(form));
        return;
    };

    match form.editing_id {
        None => {
            let result = app
                .store
                .add_activity(&form.contract_id, description, start, end);
            commit_with(app, result, "Activity added");
        }
        Some(activity_id) => {
            let result = app.store.update_activity(
                &form.contract_id,
                &activity_id,
                description,
                start,
                end,
            );
            commit_with(app, result, "Activity updated");
        }
    }
}

fn handle_collaborator_form_key(key: KeyEvent, app: &mut App, mut form: CollaboratorForm) {
    match key.code {
        KeyCode::Esc => {}
        KeyCode::Tab | KeyCode::BackTab => {
            form.cycle_specialty();
            app.overlay = Some(Overlay::CollaboratorForm(form));
        }
        KeyCode::Enter => {
            let name = form.name.value.trim().to_string();
            if name.is_empty() {
                app.set_status("Name is required");
                app.overlay = Some(Overlay::CollaboratorForm(form));
                return;
            }
            // Create and edit are both passcode-gated.
            app.overlay = Some(Overlay::Gate(GateState::new(GatedAction::SaveCollaborator {
                editing_id: form.editing_id,
                name,
                specialty: form.specialty,
            })));
        }
        _ => {
            edit_input(key, &mut form.name);
            app.overlay = Some(Overlay::CollaboratorForm(form));
        }
    }
}

fn handle_notes_key(key: KeyEvent, app: &mut App, mut state: NotesState) {
    match key.code {
        KeyCode::Esc => {
            return;
        }
        KeyCode::Down => {
            if state.cursor + 1 < state.notes.len() {
                state.cursor += 1;
            }
        }
        KeyCode::Up => {
            if state.cursor > 0 {
                state.cursor -= 1;
            }
        }
        KeyCode::Enter => {
            let text = state.input.value.trim().to_string();
            if let Some(idx) = state.editing.take() {
                if let Some(note) = state.notes.get_mut(idx) {
                    note.text = text;
                }
                state.input.clear();
                save_notes(app, &state);
            } else if !text.is_empty() {
                state.notes.push(Note::new(text));
                state.input.clear();
                state.cursor = state.notes.len() - 1;
                save_notes(app, &state);
            }
        }
        KeyCode::Char('e') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(note) = state.notes.get(state.cursor) {
                state.input = TextInput::from_str(&note.text);
                state.editing = Some(state.cursor);
            }
        }
        KeyCode::Delete => {
            if state.cursor < state.notes.len() {
                state.notes.remove(state.cursor);
                state.cursor = state.cursor.min(state.notes.len().saturating_sub(1));
                state.editing = None;
                save_notes(app, &state);
            }
        }
        _ => {
            edit_input(key, &mut state.input);
        }
    }
    app.overlay = Some(Overlay::Notes(state));
}

fn save_notes(app: &mut App, state: &NotesState) {
    let result = app.store.set_activity_notes(
        &state.contract_id,
        &state.activity_id,
        state.notes.clone(),
    );
    commit(app, result);
}

fn handle_prompt_key(key: KeyEvent, app: &mut App, mut state: PromptState, action_tx: &ActionTx) {
    match key.code {
        KeyCode::Esc => {
            app.set_status("Cancelled");
        }
        KeyCode::Enter => {
            let path = state.input.value.trim().to_string();
            match state.purpose {
                PromptPurpose::ImportBackup => import_backup(app, &path),
                PromptPurpose::ScanImage { contract_id } => {
                    start_scan(app, contract_id, &path, action_tx)
                }
            }
        }
        _ => {
            edit_input(key, &mut state.input);
            app.overlay = Some(Overlay::Prompt(state));
        }
    }
}

fn import_backup(app: &mut App, path: &str) {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            app.set_status(format!("Could not read {path}: {e}"));
            return;
        }
    };
    match towing_core::parse(&raw) {
        Ok(backup) => {
            let summary = format!(
                "Replace current data with {} contracts and {} collaborators?",
                backup.contracts.as_ref().map(Vec::len).unwrap_or(0),
                backup.collaborators.as_ref().map(Vec::len).unwrap_or(0),
            );
            app.overlay = Some(Overlay::ConfirmImport { backup, summary });
        }
        Err(e) => {
            tracing::error!(error = %e, path, "backup import rejected");
            app.set_status(format!("Import rejected: {e}"));
        }
    }
}

fn start_scan(app: &mut App, contract_id: String, path: &str, action_tx: &ActionTx) {
    let Some(api_key) = app.config.gemini_api_key.clone() else {
        app.set_status("Scan unavailable: no Gemini API key configured");
        return;
    };
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            app.set_status(format!("Could not read {path}: {e}"));
            return;
        }
    };
    let mime = scan::mime_for_path(Path::new(path));
    let today = app.today;
    app.scanning.insert(contract_id.clone());
    app.set_status("Scanning work order photo...");

    let tx = action_tx.clone();
    tokio::spawn(async move {
        let extractor = GeminiExtractor::new(api_key);
        let result = extractor
            .extract(&bytes, mime)
            .await
            .map(|scanned| scan::materialize(scanned, today))
            .map_err(|e| e.to_string());
        let _ = tx.send(Action::ScanFinished {
            contract_id,
            result,
        });
    });
}

fn handle_confirm_delete_key(
    key: KeyEvent,
    app: &mut App,
    contract_id: String,
    activity_id: String,
    label: String,
) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            let result = app.store.delete_activity(&contract_id, &activity_id);
            app.clamp_cursors();
            commit_with(app, result, "Activity deleted");
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {}
        _ => {
            app.overlay = Some(Overlay::ConfirmDeleteActivity {
                contract_id,
                activity_id,
                label,
            });
        }
    }
}

fn handle_confirm_import_key(
    key: KeyEvent,
    app: &mut App,
    backup: towing_core::Backup,
    summary: String,
) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            let result = app.store.restore(backup.contracts, backup.collaborators);
            app.clamp_cursors();
            commit_with(app, result, "Backup restored");
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.set_status("Import cancelled");
        }
        _ => {
            app.overlay = Some(Overlay::ConfirmImport { backup, summary });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TowingConfig;
    use chrono::NaiveDate;
    use towing_core::{JsonFilePersister, Store};

    fn test_app() -> App {
        let dir = std::env::temp_dir().join(format!(
            "towing-overlays-{}",
            towing_core::domain::new_id()
        ));
        let store = Store::load(JsonFilePersister::new(dir));
        let mut config = TowingConfig::default();
        config.gate_secret = "2468".to_string();
        App::new(
            store,
            config,
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        )
    }

    fn press(app: &mut App, tx: &ActionTx, code: KeyCode) {
        handle_overlay_key(KeyEvent::new(code, KeyModifiers::NONE), app, tx);
    }

    fn type_text(app: &mut App, tx: &ActionTx, text: &str) {
        for c in text.chars() {
            press(app, tx, KeyCode::Char(c));
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn wrong_passcode_keeps_gate_open_with_cleared_input() {
        let mut app = test_app();
        let (tx, _rx) = super::super::super::action_queue::channel();
        let id = app
            .store
            .add_contract("010/2024", day(2024, 1, 1), day(2024, 1, 31))
            .unwrap();
        app.overlay = Some(Overlay::Gate(GateState::new(GatedAction::DeleteContract(
            id.clone(),
        ))));

        type_text(&mut app, &tx, "1111");
        press(&mut app, &tx, KeyCode::Enter);

        let Some(Overlay::Gate(state)) = &app.overlay else {
            panic!("gate should stay open after a wrong passcode");
        };
        assert!(state.error);
        assert!(state.input.value.is_empty());
        assert!(app.store.contract(&id).is_some());
    }

    #[test]
    fn correct_passcode_runs_the_pending_action() {
        let mut app = test_app();
        let (tx, _rx) = super::super::super::action_queue::channel();
        let id = app
            .store
            .add_contract("010/2024", day(2024, 1, 1), day(2024, 1, 31))
            .unwrap();
        app.overlay = Some(Overlay::Gate(GateState::new(GatedAction::DeleteContract(
            id.clone(),
        ))));

        // A failed attempt first: retries are unlimited.
        type_text(&mut app, &tx, "0000");
        press(&mut app, &tx, KeyCode::Enter);
        type_text(&mut app, &tx, "2468");
        press(&mut app, &tx, KeyCode::Enter);

        assert!(app.overlay.is_none());
        assert!(app.store.contract(&id).is_none());
    }

    #[test]
    fn number_change_on_edit_stages_a_gated_renumber() {
        let mut app = test_app();
        let (tx, _rx) = super::super::super::action_queue::channel();
        let id = app
            .store
            .add_contract("010/2024", day(2024, 1, 1), day(2024, 1, 31))
            .unwrap();
        let mut form = ContractForm::for_edit(&id, "010/2024", day(2024, 1, 1), day(2024, 1, 31));
        form.number = TextInput::from_str("011/2024");
        app.overlay = Some(Overlay::ContractForm(form));

        press(&mut app, &tx, KeyCode::Enter);

        let Some(Overlay::Gate(state)) = &app.overlay else {
            panic!("a renumbering edit must go through the gate");
        };
        assert!(matches!(
            &state.pending,
            GatedAction::RenumberContract { id: gated, .. } if *gated == id
        ));
        // Nothing applied until the gate passes.
        assert_eq!(app.store.contract(&id).unwrap().number, "010/2024");

        type_text(&mut app, &tx, "2468");
        press(&mut app, &tx, KeyCode::Enter);
        assert_eq!(app.store.contract(&id).unwrap().number, "011/2024");
    }

    #[test]
    fn same_number_edit_applies_without_the_gate() {
        let mut app = test_app();
        let (tx, _rx) = super::super::super::action_queue::channel();
        let id = app
            .store
            .add_contract("010/2024", day(2024, 1, 1), day(2024, 1, 31))
            .unwrap();
        let mut form = ContractForm::for_edit(&id, "010/2024", day(2024, 1, 1), day(2024, 1, 31));
        form.end = TextInput::from_str("2024-02-29");
        app.overlay = Some(Overlay::ContractForm(form));

        press(&mut app, &tx, KeyCode::Enter);

        assert!(app.overlay.is_none());
        assert_eq!(
            app.store.contract(&id).unwrap().end_date,
            day(2024, 2, 29)
        );
    }

    #[test]
    fn invalid_number_keeps_the_form_open_with_an_error() {
        let mut app = test_app();
        let (tx, _rx) = super::super::super::action_queue::channel();
        let mut form = ContractForm::blank();
        form.number = TextInput::from_str("A-123");
        form.start = TextInput::from_str("2024-01-01");
        form.end = TextInput::from_str("2024-01-31");
        app.overlay = Some(Overlay::ContractForm(form));

        press(&mut app, &tx, KeyCode::Enter);

        let Some(Overlay::ContractForm(form)) = &app.overlay else {
            panic!("a rejected number must keep the form open");
        };
        assert!(form.error.is_some());
        assert_eq!(form.number.value, "A-123");
        assert!(app.store.contracts().is_empty());
    }
}
