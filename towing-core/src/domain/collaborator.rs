use serde::{Deserialize, Serialize};

use super::new_id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Specialty {
    Woodworking,
    Metalworking,
}

impl Specialty {
    pub const ALL: [Specialty; 2] = [Specialty::Woodworking, Specialty::Metalworking];

    pub fn label(self) -> &'static str {
        match self {
            Specialty::Woodworking => "Woodworking",
            Specialty::Metalworking => "Metalworking",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collaborator {
    pub id: String,
    pub name: String,
    pub specialty: Specialty,
    /// Backfilled to `false` when loading data saved before archiving existed.
    #[serde(default)]
    pub is_archived: bool,
}

impl Collaborator {
    pub fn new(name: impl Into<String>, specialty: Specialty) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            specialty,
            is_archived: false,
        }
    }
}
