use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{new_id, Activity};

static NUMBER_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9\W_]+$").unwrap());

/// Contract numbers carry only digits and punctuation (e.g. "010/2024").
/// Uniqueness is not enforced.
pub fn is_valid_contract_number(number: &str) -> bool {
    NUMBER_PATTERN.is_match(number)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub id: String,
    pub number: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub collaborator_ids: Vec<String>,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub is_archived: bool,
}

impl Contract {
    pub fn new(number: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            id: new_id(),
            number: number.into(),
            start_date,
            end_date,
            collaborator_ids: Vec::new(),
            activities: Vec::new(),
            is_archived: false,
        }
    }

    pub fn activity(&self, activity_id: &str) -> Option<&Activity> {
        self.activities.iter().find(|a| a.id == activity_id)
    }

    /// Mean progress across activities, 0 when there are none.
    pub fn overall_progress(&self) -> u8 {
        if self.activities.is_empty() {
            return 0;
        }
        let sum: u32 = self.activities.iter().map(|a| a.progress.percent() as u32).sum();
        (sum / self.activities.len() as u32) as u8
    }

    /// A contract is flagged overdue when its own end has passed and any
    /// activity is still unfinished.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        today > self.end_date && self.activities.iter().any(|a| !a.progress.is_complete())
    }
}

/// Field-wise update for [`Contract`]; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContractPatch {
    pub number: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub collaborator_ids: Option<Vec<String>>,
    pub activities: Option<Vec<Activity>>,
    pub is_archived: Option<bool>,
}

impl ContractPatch {
    pub fn apply(self, contract: &mut Contract) {
        if let Some(number) = self.number {
            contract.number = number;
        }
        if let Some(start_date) = self.start_date {
            contract.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            contract.end_date = end_date;
        }
        if let Some(collaborator_ids) = self.collaborator_ids {
            contract.collaborator_ids = collaborator_ids;
        }
        if let Some(activities) = self.activities {
            contract.activities = activities;
        }
        if let Some(is_archived) = self.is_archived {
            contract.is_archived = is_archived;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_validation_accepts_digits_and_punctuation() {
        assert!(is_valid_contract_number("010/2024"));
        assert!(is_valid_contract_number("001-02.2025"));
        assert!(is_valid_contract_number("42"));
        assert!(!is_valid_contract_number("ABC/2024"));
        assert!(!is_valid_contract_number(""));
    }

    #[test]
    fn patch_merges_only_present_fields() {
        let mut contract = Contract::new(
            "010/2024",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        );
        let original_start = contract.start_date;

        ContractPatch {
            number: Some("011/2024".to_string()),
            is_archived: Some(true),
            ..Default::default()
        }
        .apply(&mut contract);

        assert_eq!(contract.number, "011/2024");
        assert!(contract.is_archived);
        assert_eq!(contract.start_date, original_start);
        assert!(contract.activities.is_empty());
    }
}
