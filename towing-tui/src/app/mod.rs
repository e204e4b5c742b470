mod state;

pub use state::*;

use std::collections::HashSet;

use chrono::NaiveDate;
use towing_core::domain::{Collaborator, Contract};
use towing_core::schedule::ScheduleFilter;
use towing_core::{JsonFilePersister, Store};

use crate::config::TowingConfig;

/// Per-tab state for the Contracts view.
#[derive(Debug, Default)]
pub struct ContractsState {
    pub cursor: usize,
    pub expanded: HashSet<String>,
    pub show_archived: bool,
    /// Cursor inside the expanded contract's activity list.
    pub activity_cursor: usize,
    /// When set, j/k and space move over the team toggle list instead.
    pub team_mode: bool,
    pub team_cursor: usize,
}

#[derive(Debug, Default)]
pub struct AgendaState {
    pub filter: ScheduleFilter,
    /// Cursor over the collaborator filter strip.
    pub filter_cursor: usize,
    pub day_cursor: usize,
}

#[derive(Debug, Default)]
pub struct TeamState {
    pub cursor: usize,
    pub show_archived: bool,
}

pub struct App {
    pub store: Store<JsonFilePersister>,
    pub config: TowingConfig,
    pub today: NaiveDate,
    pub running: bool,
    pub tab: Tab,
    pub overlay: Option<Overlay>,
    pub status: Option<String>,
    pub contracts: ContractsState,
    pub agenda: AgendaState,
    pub team: TeamState,
    /// Contract ids with an outstanding photo scan. One scan per contract.
    pub scanning: HashSet<String>,
}

impl App {
    pub fn new(store: Store<JsonFilePersister>, config: TowingConfig, today: NaiveDate) -> Self {
        Self {
            store,
            config,
            today,
            running: true,
            tab: Tab::Contracts,
            overlay: None,
            status: None,
            contracts: ContractsState::default(),
            agenda: AgendaState::default(),
            team: TeamState::default(),
            scanning: HashSet::new(),
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// Contracts shown on the Contracts tab: active first, archived
    /// appended when the archived section is open.
    pub fn visible_contracts(&self) -> Vec<&Contract> {
        let active = self.store.contracts().iter().filter(|c| !c.is_archived);
        if self.contracts.show_archived {
            active
                .chain(self.store.contracts().iter().filter(|c| c.is_archived))
                .collect()
        } else {
            active.collect()
        }
    }

    pub fn visible_collaborators(&self) -> Vec<&Collaborator> {
        let active = self.store.collaborators().iter().filter(|c| !c.is_archived);
        if self.team.show_archived {
            active
                .chain(self.store.collaborators().iter().filter(|c| c.is_archived))
                .collect()
        } else {
            active.collect()
        }
    }

    pub fn selected_contract(&self) -> Option<&Contract> {
        self.visible_contracts()
            .get(self.contracts.cursor)
            .copied()
    }

    pub fn selected_contract_id(&self) -> Option<String> {
        self.selected_contract().map(|c| c.id.clone())
    }

    pub fn selected_collaborator_id(&self) -> Option<String> {
        self.visible_collaborators()
            .get(self.team.cursor)
            .map(|c| c.id.clone())
    }

    /// Id of the activity under the activity cursor, when the selected
    /// contract is expanded.
    pub fn selected_activity_id(&self) -> Option<(String, String)> {
        let contract = self.selected_contract()?;
        if !self.contracts.expanded.contains(&contract.id) {
            return None;
        }
        let activity = contract.activities.get(self.contracts.activity_cursor)?;
        Some((contract.id.clone(), activity.id.clone()))
    }

    /// Clamp all cursors after a mutation changed list lengths.
    pub fn clamp_cursors(&mut self) {
        let contracts = self.visible_contracts().len();
        self.contracts.cursor = self.contracts.cursor.min(contracts.saturating_sub(1));
        let activities = self
            .selected_contract()
            .map(|c| c.activities.len())
            .unwrap_or(0);
        self.contracts.activity_cursor = self
            .contracts
            .activity_cursor
            .min(activities.saturating_sub(1));
        let collaborators = self.visible_collaborators().len();
        self.team.cursor = self.team.cursor.min(collaborators.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app() -> App {
        let dir = std::env::temp_dir().join(format!(
            "towing-app-{}",
            towing_core::domain::new_id()
        ));
        let store = Store::load(JsonFilePersister::new(dir));
        App::new(
            store,
            TowingConfig::default(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        )
    }

    #[test]
    fn archived_contracts_hidden_until_toggled() {
        let mut app = test_app();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let a = app.store.add_contract("001/2024", start, end).unwrap();
        app.store.add_contract("002/2024", start, end).unwrap();
        app.store.toggle_archive_contract(&a).unwrap();

        assert_eq!(app.visible_contracts().len(), 1);
        app.contracts.show_archived = true;
        let visible = app.visible_contracts();
        assert_eq!(visible.len(), 2);
        // Archived entries trail the active ones.
        assert!(visible[1].is_archived);
    }

    #[test]
    fn cursor_clamps_after_deletion() {
        let mut app = test_app();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        app.store.add_contract("001/2024", start, end).unwrap();
        let b = app.store.add_contract("002/2024", start, end).unwrap();
        app.contracts.cursor = 1;
        app.store.delete_contract(&b).unwrap();
        app.clamp_cursors();
        assert_eq!(app.contracts.cursor, 0);
    }

    #[test]
    fn selected_activity_requires_expansion() {
        let mut app = test_app();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let id = app.store.add_contract("001/2024", start, end).unwrap();
        app.store.add_activity(&id, "Hull survey", start, end).unwrap();

        assert!(app.selected_activity_id().is_none());
        app.contracts.expanded.insert(id.clone());
        let (cid, _) = app.selected_activity_id().unwrap();
        assert_eq!(cid, id);
    }
}
