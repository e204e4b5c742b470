use crossterm::event::{KeyCode, KeyEvent};
use towing_core::domain::{ActivityStatus, Progress};

use crate::app::{
    ActivityForm, App, ContractForm, GateState, GatedAction, Overlay, PromptPurpose, PromptState,
};

use super::super::action_queue::ActionTx;
use super::commit;

pub(in super::super) fn handle_contracts_key(key: KeyEvent, app: &mut App, _action_tx: &ActionTx) {
    if app.contracts.team_mode {
        handle_team_toggle_key(key, app);
        return;
    }

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            let len = app.visible_contracts().len();
            if app.contracts.cursor + 1 < len {
                app.contracts.cursor += 1;
                app.contracts.activity_cursor = 0;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            if app.contracts.cursor > 0 {
                app.contracts.cursor -= 1;
                app.contracts.activity_cursor = 0;
            }
        }
        KeyCode::Char('J') => {
            let len = app
                .selected_contract()
                .filter(|c| app.contracts.expanded.contains(&c.id))
                .map(|c| c.activities.len())
                .unwrap_or(0);
            if app.contracts.activity_cursor + 1 < len {
                app.contracts.activity_cursor += 1;
            }
        }
        KeyCode::Char('K') => {
            if app.contracts.activity_cursor > 0 {
                app.contracts.activity_cursor -= 1;
            }
        }
        KeyCode::Enter => {
            if let Some(id) = app.selected_contract_id() {
                if !app.contracts.expanded.remove(&id) {
                    app.contracts.expanded.insert(id);
                }
                app.contracts.activity_cursor = 0;
            }
        }
        KeyCode::Char('n') => {
            app.overlay = Some(Overlay::ContractForm(ContractForm::blank()));
        }
        KeyCode::Char('e') => {
            let form = app.selected_contract().map(|contract| {
                ContractForm::for_edit(
                    &contract.id,
                    &contract.number,
                    contract.start_date,
                    contract.end_date,
                )
            });
            if let Some(form) = form {
                app.overlay = Some(Overlay::ContractForm(form));
            }
        }
        KeyCode::Char('a') => {
            if let Some(id) = app.selected_contract_id() {
                let result = app.store.toggle_archive_contract(&id);
                commit(app, result);
                app.clamp_cursors();
            }
        }
        KeyCode::Char('d') => {
            if let Some(id) = app.selected_contract_id() {
                app.overlay = Some(Overlay::Gate(GateState::new(GatedAction::DeleteContract(
                    id,
                ))));
            }
        }
        KeyCode::Char('v') => {
            app.contracts.show_archived = !app.contracts.show_archived;
            app.clamp_cursors();
        }
        KeyCode::Char('t') => {
            if app.selected_contract().is_some() {
                app.contracts.team_mode = true;
                app.contracts.team_cursor = 0;
            }
        }
        KeyCode::Char('A') => {
            if let Some(id) = app.selected_contract_id() {
                app.overlay = Some(Overlay::ActivityForm(ActivityForm::blank(&id)));
            }
        }
        KeyCode::Char('E') => {
            if let Some((contract_id, activity_id)) = app.selected_activity_id() {
                let Some(activity) = app
                    .store
                    .contract(&contract_id)
                    .and_then(|c| c.activity(&activity_id))
                else {
                    return;
                };
                app.overlay = Some(Overlay::ActivityForm(ActivityForm::for_edit(
                    &contract_id,
                    &activity_id,
                    &activity.description,
                    activity.start_date,
                    activity.end_date,
                )));
            }
        }
        KeyCode::Char('x') => {
            if let Some((contract_id, activity_id)) = app.selected_activity_id() {
                let label = app
                    .store
                    .contract(&contract_id)
                    .and_then(|c| c.activity(&activity_id))
                    .map(|a| a.description.clone())
                    .unwrap_or_default();
                app.overlay = Some(Overlay::ConfirmDeleteActivity {
                    contract_id,
                    activity_id,
                    label,
                });
            }
        }
        KeyCode::Char(c @ '1'..='4') => {
            if let Some((contract_id, activity_id)) = app.selected_activity_id() {
                let level = Progress::LEVELS[(c as usize) - ('1' as usize)];
                let result = app
                    .store
                    .toggle_activity_progress(&contract_id, &activity_id, level);
                commit(app, result);
            }
        }
        KeyCode::Char('s') => {
            if let Some((contract_id, activity_id)) = app.selected_activity_id() {
                let Some(current) = app
                    .store
                    .contract(&contract_id)
                    .and_then(|c| c.activity(&activity_id))
                    .map(|a| a.status)
                else {
                    return;
                };
                let next = match current {
                    ActivityStatus::InProgress => ActivityStatus::Halted,
                    ActivityStatus::Halted => ActivityStatus::InProgress,
                };
                let result = app
                    .store
                    .set_activity_status(&contract_id, &activity_id, next);
                commit(app, result);
            }
        }
        KeyCode::Char('N') => {
            if let Some((contract_id, activity_id)) = app.selected_activity_id() {
                let notes = app
                    .store
                    .contract(&contract_id)
                    .and_then(|c| c.activity(&activity_id))
                    .map(|a| a.notes.clone())
                    .unwrap_or_default();
                app.overlay = Some(Overlay::Notes(crate::app::NotesState::new(
                    &contract_id,
                    &activity_id,
                    notes,
                )));
            }
        }
        KeyCode::Char('S') => {
            if let Some(id) = app.selected_contract_id() {
                if app.config.gemini_api_key.is_none() {
                    app.set_status("Scan unavailable: no Gemini API key configured");
                } else if app.scanning.contains(&id) {
                    app.set_status("A scan is already running for this contract");
                } else {
                    app.overlay = Some(Overlay::Prompt(PromptState::new(
                        PromptPurpose::ScanImage { contract_id: id },
                        "Path to work order photo",
                    )));
                }
            }
        }
        KeyCode::Char('P') => {
            export_contracts_pdf(app);
        }
        KeyCode::Char('B') => {
            export_backup(app);
        }
        KeyCode::Char('I') => {
            app.overlay = Some(Overlay::Prompt(PromptState::new(
                PromptPurpose::ImportBackup,
                "Path to backup file",
            )));
        }
        _ => {}
    }
}

fn handle_team_toggle_key(key: KeyEvent, app: &mut App) {
    let collaborators: Vec<String> = app
        .store
        .collaborators()
        .iter()
        .filter(|c| !c.is_archived)
        .map(|c| c.id.clone())
        .collect();

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if app.contracts.team_cursor + 1 < collaborators.len() {
                app.contracts.team_cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            if app.contracts.team_cursor > 0 {
                app.contracts.team_cursor -= 1;
            }
        }
        KeyCode::Char(' ') => {
            if let (Some(contract_id), Some(collaborator_id)) = (
                app.selected_contract_id(),
                collaborators.get(app.contracts.team_cursor).cloned(),
            ) {
                let result = app
                    .store
                    .toggle_collaborator_assignment(&contract_id, &collaborator_id);
                commit(app, result);
            }
        }
        KeyCode::Char('t') | KeyCode::Esc | KeyCode::Enter => {
            app.contracts.team_mode = false;
        }
        _ => {}
    }
}

fn export_contracts_pdf(app: &mut App) {
    let report = towing_pdf::contracts_report(
        app.store.contracts(),
        app.store.collaborators(),
        app.today,
    );
    let renderer =
        towing_pdf::ReportRenderer::new(&app.config.font_dir, app.config.font_family.clone());
    let filename = towing_pdf::contracts_report_filename(app.today);
    match renderer.render_to_file(&report, std::path::Path::new(&filename)) {
        Ok(()) => app.set_status(format!("Wrote {filename}")),
        Err(e) => {
            tracing::error!(error = %e, "contracts report failed");
            app.set_status(format!("Report failed: {e}"));
        }
    }
}

fn export_backup(app: &mut App) {
    let raw = towing_core::export(app.store.contracts(), app.store.collaborators());
    let filename = format!("TOWING_Backup_{}.json", app.today.format("%Y%m%d"));
    match std::fs::write(&filename, raw) {
        Ok(()) => app.set_status(format!("Wrote {filename}")),
        Err(e) => {
            tracing::error!(error = %e, "backup export failed");
            app.set_status(format!("Backup failed: {e}"));
        }
    }
}
