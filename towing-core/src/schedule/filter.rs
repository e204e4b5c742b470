use std::collections::HashSet;

use crate::domain::{Collaborator, Specialty};

use super::ScheduleEntry;

/// Two independently optional predicates, ANDed together. `specialty: None`
/// means "All"; an empty id set means no collaborator filtering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleFilter {
    pub specialty: Option<Specialty>,
    pub collaborator_ids: HashSet<String>,
}

impl ScheduleFilter {
    pub fn is_empty(&self) -> bool {
        self.specialty.is_none() && self.collaborator_ids.is_empty()
    }

    pub fn matches(&self, entry: &ScheduleEntry, collaborators: &[Collaborator]) -> bool {
        let specialty_ok = match self.specialty {
            None => true,
            Some(wanted) => entry
                .team(collaborators)
                .iter()
                .any(|c| c.specialty == wanted),
        };

        let collaborator_ok = self.collaborator_ids.is_empty()
            || entry
                .collaborator_ids
                .iter()
                .any(|id| self.collaborator_ids.contains(id));

        specialty_ok && collaborator_ok
    }

    pub fn toggle_collaborator(&mut self, id: &str) {
        if !self.collaborator_ids.remove(id) {
            self.collaborator_ids.insert(id.to_string());
        }
    }
}
