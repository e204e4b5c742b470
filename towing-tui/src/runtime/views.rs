use crossterm::event::{KeyCode, KeyEvent};
use towing_core::StoreError;

use crate::app::{App, Tab};

use super::action_queue::ActionTx;

mod agenda;
mod contracts;
mod overlays;
mod team;

/// Report a failed persist without losing the in-memory mutation.
fn commit(app: &mut App, result: Result<(), StoreError>) {
    if let Err(e) = result {
        tracing::error!(error = %e, "persist failed");
        app.set_status(format!("Save failed: {e}"));
    }
}

pub(super) fn handle_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    app.clear_status();

    if app.overlay.is_some() {
        overlays::handle_overlay_key(key, app, action_tx);
        return;
    }

    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Tab => {
            app.tab = match app.tab {
                Tab::Contracts => Tab::Agenda,
                Tab::Agenda => Tab::Team,
                Tab::Team => Tab::Contracts,
            };
            return;
        }
        KeyCode::BackTab => {
            app.tab = match app.tab {
                Tab::Contracts => Tab::Team,
                Tab::Agenda => Tab::Contracts,
                Tab::Team => Tab::Agenda,
            };
            return;
        }
        _ => {}
    }

    match app.tab {
        Tab::Contracts => contracts::handle_contracts_key(key, app, action_tx),
        Tab::Agenda => agenda::handle_agenda_key(key, app),
        Tab::Team => team::handle_team_key(key, app),
    }
}
