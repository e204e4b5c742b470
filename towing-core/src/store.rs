use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{
    Activity, ActivityStatus, Collaborator, Contract, ContractPatch, Note, Progress, Specialty,
};
use crate::persist::{PersistError, Persister};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Single in-process source of truth for both collections, mirrored through
/// the persister on every mutation. Reads always go through the in-memory
/// state, so there is no cache invalidation to get wrong.
pub struct Store<P: Persister> {
    contracts: Vec<Contract>,
    collaborators: Vec<Collaborator>,
    persister: P,
}

impl<P: Persister> Store<P> {
    pub fn load(persister: P) -> Self {
        let contracts = persister.load_contracts();
        let collaborators = persister.load_collaborators();
        Self {
            contracts,
            collaborators,
            persister,
        }
    }

    pub fn contracts(&self) -> &[Contract] {
        &self.contracts
    }

    pub fn collaborators(&self) -> &[Collaborator] {
        &self.collaborators
    }

    pub fn contract(&self, id: &str) -> Option<&Contract> {
        self.contracts.iter().find(|c| c.id == id)
    }

    pub fn collaborator(&self, id: &str) -> Option<&Collaborator> {
        self.collaborators.iter().find(|c| c.id == id)
    }

    fn persist_contracts(&mut self) -> Result<(), StoreError> {
        self.persister.save_contracts(&self.contracts)?;
        Ok(())
    }

    fn persist_collaborators(&mut self) -> Result<(), StoreError> {
        self.persister.save_collaborators(&self.collaborators)?;
        Ok(())
    }

    /// New contracts land at index 0 so the most recent work is listed first.
    pub fn add_contract(
        &mut self,
        number: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<String, StoreError> {
        let contract = Contract::new(number, start_date, end_date);
        let id = contract.id.clone();
        self.contracts.insert(0, contract);
        self.persist_contracts()?;
        Ok(id)
    }

    /// Merges the patch into the matching contract; unknown ids are a no-op.
    pub fn update_contract(&mut self, id: &str, patch: ContractPatch) -> Result<(), StoreError> {
        let Some(contract) = self.contracts.iter_mut().find(|c| c.id == id) else {
            return Ok(());
        };
        patch.apply(contract);
        self.persist_contracts()
    }

    pub fn delete_contract(&mut self, id: &str) -> Result<(), StoreError> {
        self.contracts.retain(|c| c.id != id);
        self.persist_contracts()
    }

    pub fn toggle_archive_contract(&mut self, id: &str) -> Result<(), StoreError> {
        if let Some(contract) = self.contracts.iter_mut().find(|c| c.id == id) {
            contract.is_archived = !contract.is_archived;
        }
        self.persist_contracts()
    }

    pub fn add_collaborator(
        &mut self,
        name: impl Into<String>,
        specialty: Specialty,
    ) -> Result<String, StoreError> {
        let collaborator = Collaborator::new(name, specialty);
        let id = collaborator.id.clone();
        self.collaborators.insert(0, collaborator);
        self.persist_collaborators()?;
        Ok(id)
    }

    pub fn update_collaborator(
        &mut self,
        id: &str,
        name: impl Into<String>,
        specialty: Specialty,
    ) -> Result<(), StoreError> {
        if let Some(collaborator) = self.collaborators.iter_mut().find(|c| c.id == id) {
            collaborator.name = name.into();
            collaborator.specialty = specialty;
        }
        self.persist_collaborators()
    }

    /// Removes the record and prunes the id from every contract's assignment
    /// list in the same operation, so no contract is left holding a stale id.
    pub fn delete_collaborator(&mut self, id: &str) -> Result<(), StoreError> {
        self.collaborators.retain(|c| c.id != id);
        for contract in &mut self.contracts {
            contract.collaborator_ids.retain(|cid| cid != id);
        }
        self.persist_collaborators()?;
        self.persist_contracts()
    }

    pub fn toggle_archive_collaborator(&mut self, id: &str) -> Result<(), StoreError> {
        if let Some(collaborator) = self.collaborators.iter_mut().find(|c| c.id == id) {
            collaborator.is_archived = !collaborator.is_archived;
        }
        self.persist_collaborators()
    }

    /// Assign or unassign a collaborator on a contract. The toggle keeps the
    /// assignment list duplicate-free.
    pub fn toggle_collaborator_assignment(
        &mut self,
        contract_id: &str,
        collaborator_id: &str,
    ) -> Result<(), StoreError> {
        if let Some(contract) = self.contracts.iter_mut().find(|c| c.id == contract_id) {
            if contract.collaborator_ids.iter().any(|id| id == collaborator_id) {
                contract.collaborator_ids.retain(|id| id != collaborator_id);
            } else {
                contract.collaborator_ids.push(collaborator_id.to_string());
            }
        }
        self.persist_contracts()
    }

    pub fn add_activity(
        &mut self,
        contract_id: &str,
        description: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<(), StoreError> {
        if let Some(contract) = self.contracts.iter_mut().find(|c| c.id == contract_id) {
            contract
                .activities
                .push(Activity::new(description, start_date, end_date));
        }
        self.persist_contracts()
    }

    /// Append a batch of already-built activities (photo scan results).
    pub fn add_activities(
        &mut self,
        contract_id: &str,
        activities: Vec<Activity>,
    ) -> Result<(), StoreError> {
        if activities.is_empty() {
            return Ok(());
        }
        if let Some(contract) = self.contracts.iter_mut().find(|c| c.id == contract_id) {
            contract.activities.extend(activities);
        }
        self.persist_contracts()
    }

    pub fn update_activity(
        &mut self,
        contract_id: &str,
        activity_id: &str,
        description: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<(), StoreError> {
        if let Some(activity) = self.activity_mut(contract_id, activity_id) {
            activity.description = description.into();
            activity.start_date = start_date;
            activity.end_date = end_date;
        }
        self.persist_contracts()
    }

    pub fn delete_activity(&mut self, contract_id: &str, activity_id: &str) -> Result<(), StoreError> {
        if let Some(contract) = self.contracts.iter_mut().find(|c| c.id == contract_id) {
            contract.activities.retain(|a| a.id != activity_id);
        }
        self.persist_contracts()
    }

    pub fn toggle_activity_progress(
        &mut self,
        contract_id: &str,
        activity_id: &str,
        level: Progress,
    ) -> Result<(), StoreError> {
        if let Some(activity) = self.activity_mut(contract_id, activity_id) {
            activity.progress = activity.progress.toggled(level);
        }
        self.persist_contracts()
    }

    pub fn set_activity_status(
        &mut self,
        contract_id: &str,
        activity_id: &str,
        status: ActivityStatus,
    ) -> Result<(), StoreError> {
        if let Some(activity) = self.activity_mut(contract_id, activity_id) {
            activity.status = status;
        }
        self.persist_contracts()
    }

    /// The notes editor works on the whole list: append, in-place edit and
    /// removal all come back as a replacement list.
    pub fn set_activity_notes(
        &mut self,
        contract_id: &str,
        activity_id: &str,
        notes: Vec<Note>,
    ) -> Result<(), StoreError> {
        if let Some(activity) = self.activity_mut(contract_id, activity_id) {
            activity.notes = notes;
        }
        self.persist_contracts()
    }

    /// Destructive restore from a backup. Absent collections stay untouched;
    /// present ones swap wholesale, and both blobs persist together.
    pub fn restore(
        &mut self,
        contracts: Option<Vec<Contract>>,
        collaborators: Option<Vec<Collaborator>>,
    ) -> Result<(), StoreError> {
        if let Some(contracts) = contracts {
            self.contracts = contracts;
        }
        if let Some(collaborators) = collaborators {
            self.collaborators = collaborators;
        }
        self.persist_contracts()?;
        self.persist_collaborators()
    }

    fn activity_mut(&mut self, contract_id: &str, activity_id: &str) -> Option<&mut Activity> {
        self.contracts
            .iter_mut()
            .find(|c| c.id == contract_id)?
            .activities
            .iter_mut()
            .find(|a| a.id == activity_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::MemoryPersister;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn store() -> Store<MemoryPersister> {
        Store::load(MemoryPersister::default())
    }

    #[test]
    fn new_contract_is_inserted_at_head() {
        let mut store = store();
        store.add_contract("001/2024", date(2024, 1, 1), date(2024, 2, 1)).unwrap();
        let second = store.add_contract("002/2024", date(2024, 3, 1), date(2024, 4, 1)).unwrap();
        assert_eq!(store.contracts()[0].id, second);
        assert_eq!(store.contracts()[0].number, "002/2024");
        assert_eq!(store.contracts().len(), 2);
    }

    #[test]
    fn update_contract_is_idempotent() {
        let mut store = store();
        let id = store.add_contract("001/2024", date(2024, 1, 1), date(2024, 2, 1)).unwrap();
        let patch = ContractPatch {
            number: Some("009/2024".to_string()),
            end_date: Some(date(2024, 3, 1)),
            ..Default::default()
        };

        store.update_contract(&id, patch.clone()).unwrap();
        let once = store.contract(&id).unwrap().clone();
        store.update_contract(&id, patch).unwrap();
        assert_eq!(store.contract(&id).unwrap(), &once);
    }

    #[test]
    fn update_unknown_contract_is_a_noop() {
        let mut store = store();
        store.add_contract("001/2024", date(2024, 1, 1), date(2024, 2, 1)).unwrap();
        let before = store.contracts().to_vec();
        store
            .update_contract("missing", ContractPatch { is_archived: Some(true), ..Default::default() })
            .unwrap();
        assert_eq!(store.contracts(), &before[..]);
    }

    #[test]
    fn deleting_collaborator_cascades_into_assignments() {
        let mut store = store();
        let colab = store.add_collaborator("Ana", Specialty::Woodworking).unwrap();
        let other = store.add_collaborator("Rui", Specialty::Metalworking).unwrap();
        let c1 = store.add_contract("001/2024", date(2024, 1, 1), date(2024, 2, 1)).unwrap();
        let c2 = store.add_contract("002/2024", date(2024, 1, 1), date(2024, 2, 1)).unwrap();
        store.toggle_collaborator_assignment(&c1, &colab).unwrap();
        store.toggle_collaborator_assignment(&c2, &colab).unwrap();
        store.toggle_collaborator_assignment(&c2, &other).unwrap();

        store.delete_collaborator(&colab).unwrap();

        assert!(store.collaborator(&colab).is_none());
        for contract in store.contracts() {
            assert!(!contract.collaborator_ids.contains(&colab));
        }
        assert!(store.contract(&c2).unwrap().collaborator_ids.contains(&other));
    }

    #[test]
    fn assignment_toggle_never_duplicates() {
        let mut store = store();
        let colab = store.add_collaborator("Ana", Specialty::Woodworking).unwrap();
        let contract = store.add_contract("001/2024", date(2024, 1, 1), date(2024, 2, 1)).unwrap();

        store.toggle_collaborator_assignment(&contract, &colab).unwrap();
        assert_eq!(store.contract(&contract).unwrap().collaborator_ids.len(), 1);
        store.toggle_collaborator_assignment(&contract, &colab).unwrap();
        assert!(store.contract(&contract).unwrap().collaborator_ids.is_empty());
    }

    #[test]
    fn progress_toggle_at_same_level_resets() {
        let mut store = store();
        let contract = store.add_contract("001/2024", date(2024, 1, 1), date(2024, 2, 1)).unwrap();
        store.add_activity(&contract, "paint deck", date(2024, 1, 2), date(2024, 1, 9)).unwrap();
        let activity = store.contract(&contract).unwrap().activities[0].id.clone();

        store.toggle_activity_progress(&contract, &activity, Progress::Half).unwrap();
        assert_eq!(
            store.contract(&contract).unwrap().activities[0].progress,
            Progress::Half
        );
        store.toggle_activity_progress(&contract, &activity, Progress::Half).unwrap();
        assert_eq!(
            store.contract(&contract).unwrap().activities[0].progress,
            Progress::None
        );
    }

    #[test]
    fn every_mutation_reaches_the_persister() {
        let mut store = store();
        let id = store.add_contract("001/2024", date(2024, 1, 1), date(2024, 2, 1)).unwrap();
        store.add_activity(&id, "rig survey", date(2024, 1, 2), date(2024, 1, 9)).unwrap();
        assert_eq!(store.persister.contracts.len(), 1);
        assert_eq!(store.persister.contracts[0].activities.len(), 1);

        store.add_collaborator("Ana", Specialty::Woodworking).unwrap();
        assert_eq!(store.persister.collaborators.len(), 1);
    }

    #[test]
    fn restore_swaps_only_present_collections() {
        let mut store = store();
        store.add_contract("001/2024", date(2024, 1, 1), date(2024, 2, 1)).unwrap();
        store.add_collaborator("Ana", Specialty::Woodworking).unwrap();

        let replacement = vec![Contract::new("777/2025", date(2025, 1, 1), date(2025, 2, 1))];
        store.restore(Some(replacement), None).unwrap();

        assert_eq!(store.contracts().len(), 1);
        assert_eq!(store.contracts()[0].number, "777/2025");
        assert_eq!(store.collaborators().len(), 1, "absent field leaves collection unchanged");
    }
}
