use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::domain::{Collaborator, Contract};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to serialize {what}: {source}")]
    Serialize {
        what: &'static str,
        source: serde_json::Error,
    },
}

/// Durable mirror of the two top-level collections. Every store mutation
/// writes through one of the save methods; loads never fail, they degrade to
/// an empty collection.
pub trait Persister {
    fn save_contracts(&mut self, contracts: &[Contract]) -> Result<(), PersistError>;
    fn save_collaborators(&mut self, collaborators: &[Collaborator]) -> Result<(), PersistError>;
    fn load_contracts(&self) -> Vec<Contract>;
    fn load_collaborators(&self) -> Vec<Collaborator>;
}

/// Two independently keyed JSON blobs under a data directory, overwritten
/// whole on every mutation. Single-writer, last write wins.
pub struct JsonFilePersister {
    dir: PathBuf,
}

impl JsonFilePersister {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn contracts_path(&self) -> PathBuf {
        self.dir.join("contracts.json")
    }

    pub fn collaborators_path(&self) -> PathBuf {
        self.dir.join("collaborators.json")
    }

    fn save_list<T: Serialize>(
        &self,
        path: &Path,
        what: &'static str,
        items: &[T],
    ) -> Result<(), PersistError> {
        let raw = serde_json::to_string_pretty(items)
            .map_err(|source| PersistError::Serialize { what, source })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| PersistError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, raw).map_err(|source| PersistError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(%what, path = %path.display(), "persisted collection");
        Ok(())
    }

    /// Absent file means a fresh workspace; corrupt JSON is logged and
    /// treated the same way. Neither surfaces to the user.
    fn load_list<T: DeserializeOwned>(&self, path: &Path, what: &'static str) -> Vec<T> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::error!(%what, path = %path.display(), error = %e, "failed to read persisted data");
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(e) => {
                tracing::error!(%what, path = %path.display(), error = %e, "failed to parse persisted data, starting empty");
                Vec::new()
            }
        }
    }
}

impl Persister for JsonFilePersister {
    fn save_contracts(&mut self, contracts: &[Contract]) -> Result<(), PersistError> {
        self.save_list(&self.contracts_path(), "contracts", contracts)
    }

    fn save_collaborators(&mut self, collaborators: &[Collaborator]) -> Result<(), PersistError> {
        self.save_list(&self.collaborators_path(), "collaborators", collaborators)
    }

    fn load_contracts(&self) -> Vec<Contract> {
        self.load_list(&self.contracts_path(), "contracts")
    }

    fn load_collaborators(&self) -> Vec<Collaborator> {
        self.load_list(&self.collaborators_path(), "collaborators")
    }
}

/// In-memory persister for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryPersister {
    pub contracts: Vec<Contract>,
    pub collaborators: Vec<Collaborator>,
}

impl Persister for MemoryPersister {
    fn save_contracts(&mut self, contracts: &[Contract]) -> Result<(), PersistError> {
        self.contracts = contracts.to_vec();
        Ok(())
    }

    fn save_collaborators(&mut self, collaborators: &[Collaborator]) -> Result<(), PersistError> {
        self.collaborators = collaborators.to_vec();
        Ok(())
    }

    fn load_contracts(&self) -> Vec<Contract> {
        self.contracts.clone()
    }

    fn load_collaborators(&self) -> Vec<Collaborator> {
        self.collaborators.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Specialty;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("towing-persist-{tag}-{}", crate::domain::new_id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn load_missing_files_yields_empty_collections() {
        let persister = JsonFilePersister::new(scratch_dir("missing"));
        assert!(persister.load_contracts().is_empty());
        assert!(persister.load_collaborators().is_empty());
    }

    #[test]
    fn corrupt_json_degrades_to_empty() {
        let dir = scratch_dir("corrupt");
        std::fs::write(dir.join("contracts.json"), "{not json").unwrap();
        let persister = JsonFilePersister::new(dir);
        assert!(persister.load_contracts().is_empty());
    }

    #[test]
    fn save_and_reload_round_trips() {
        let dir = scratch_dir("roundtrip");
        let mut persister = JsonFilePersister::new(dir);
        let collaborators = vec![Collaborator::new("Ana", Specialty::Woodworking)];
        persister.save_collaborators(&collaborators).unwrap();
        assert_eq!(persister.load_collaborators(), collaborators);
    }

    #[test]
    fn missing_is_archived_backfills_to_false() {
        let dir = scratch_dir("backfill");
        std::fs::write(
            dir.join("collaborators.json"),
            r#"[{"id":"c1","name":"Rui","specialty":"Metalworking"}]"#,
        )
        .unwrap();
        let persister = JsonFilePersister::new(dir);
        let loaded = persister.load_collaborators();
        assert_eq!(loaded.len(), 1);
        assert!(!loaded[0].is_archived);
    }
}
