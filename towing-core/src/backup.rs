use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Collaborator, Contract};

pub const BACKUP_VERSION: &str = "1.0";

#[derive(Debug, Error)]
pub enum BackupError {
    #[error("not a valid backup file: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("file contains neither contracts nor collaborators")]
    Unrecognized,
}

/// Full-dataset backup envelope. Import tolerates either collection being
/// absent, in which case the live one is left untouched on restore.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contracts: Option<Vec<Contract>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collaborators: Option<Vec<Collaborator>>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub exported_at: Option<String>,
}

/// Serialize the full dataset for download.
pub fn export(contracts: &[Contract], collaborators: &[Collaborator]) -> String {
    let backup = Backup {
        contracts: Some(contracts.to_vec()),
        collaborators: Some(collaborators.to_vec()),
        version: Some(BACKUP_VERSION.to_string()),
        exported_at: Some(chrono::Local::now().to_rfc3339()),
    };
    serde_json::to_string_pretty(&backup).unwrap_or_default()
}

/// Parse an uploaded backup. Rejected outright when neither recognizable
/// collection is present; the destructive swap itself is the caller's
/// decision, taken after explicit user confirmation.
pub fn parse(raw: &str) -> Result<Backup, BackupError> {
    let backup: Backup = serde_json::from_str(raw)?;
    if backup.contracts.is_none() && backup.collaborators.is_none() {
        return Err(BackupError::Unrecognized);
    }
    Ok(backup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Specialty;
    use crate::persist::MemoryPersister;
    use crate::store::Store;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn export_then_import_restores_collections_exactly() {
        let mut store = Store::load(MemoryPersister::default());
        let contract = store
            .add_contract("010/2024", date(2024, 1, 1), date(2024, 1, 31))
            .unwrap();
        store
            .add_activity(&contract, "mast work", date(2024, 1, 5), date(2024, 1, 10))
            .unwrap();
        store.add_collaborator("Ana", Specialty::Woodworking).unwrap();

        let contracts_before = serde_json::to_string(store.contracts()).unwrap();
        let collaborators_before = serde_json::to_string(store.collaborators()).unwrap();

        let exported = export(store.contracts(), store.collaborators());
        let backup = parse(&exported).unwrap();
        store.restore(backup.contracts, backup.collaborators).unwrap();

        assert_eq!(serde_json::to_string(store.contracts()).unwrap(), contracts_before);
        assert_eq!(
            serde_json::to_string(store.collaborators()).unwrap(),
            collaborators_before
        );
    }

    #[test]
    fn import_rejects_unrecognized_payload() {
        assert!(matches!(
            parse(r#"{"something": 1}"#),
            Err(BackupError::Unrecognized)
        ));
        assert!(matches!(parse("not json"), Err(BackupError::Malformed(_))));
    }

    #[test]
    fn import_accepts_single_collection() {
        let backup = parse(r#"{"collaborators": []}"#).unwrap();
        assert!(backup.contracts.is_none());
        assert!(backup.collaborators.is_some());
    }
}
