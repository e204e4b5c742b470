use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::new_id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityStatus {
    InProgress,
    Halted,
}

impl ActivityStatus {
    pub fn label(self) -> &'static str {
        match self {
            ActivityStatus::InProgress => "In progress",
            ActivityStatus::Halted => "Halted",
        }
    }
}

/// Discrete progress level. The closed five-value set is load-bearing: the
/// schedule and report rules are written in terms of complete vs not, never
/// arbitrary thresholds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Progress {
    #[default]
    None,
    Quarter,
    Half,
    ThreeQuarters,
    Complete,
}

impl Progress {
    /// The selectable levels, in display order.
    pub const LEVELS: [Progress; 4] = [
        Progress::Quarter,
        Progress::Half,
        Progress::ThreeQuarters,
        Progress::Complete,
    ];

    pub fn percent(self) -> u8 {
        match self {
            Progress::None => 0,
            Progress::Quarter => 25,
            Progress::Half => 50,
            Progress::ThreeQuarters => 75,
            Progress::Complete => 100,
        }
    }

    pub fn is_complete(self) -> bool {
        self == Progress::Complete
    }

    /// Selecting the level already set resets to zero (toggle-off), never to
    /// the previous level.
    pub fn toggled(self, level: Progress) -> Progress {
        if self == level {
            Progress::None
        } else {
            level
        }
    }
}

impl TryFrom<u8> for Progress {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Progress::None),
            25 => Ok(Progress::Quarter),
            50 => Ok(Progress::Half),
            75 => Ok(Progress::ThreeQuarters),
            100 => Ok(Progress::Complete),
            other => Err(format!("invalid progress level: {other}")),
        }
    }
}

impl From<Progress> for u8 {
    fn from(value: Progress) -> Self {
        value.percent()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub text: String,
    /// Preformatted timestamp, fixed at creation.
    pub created_at: String,
}

impl Note {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            text: text.into(),
            created_at: chrono::Local::now().format("%d/%m/%y %H:%M").to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub progress: Progress,
    pub status: ActivityStatus,
    #[serde(default)]
    pub notes: Vec<Note>,
}

impl Activity {
    pub fn new(description: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            id: new_id(),
            description: description.into(),
            start_date,
            end_date,
            progress: Progress::None,
            status: ActivityStatus::InProgress,
            notes: Vec::new(),
        }
    }

    /// An unfinished activity is overdue once either its own deadline or the
    /// parent contract's deadline has passed.
    pub fn is_overdue(&self, today: NaiveDate, contract_end: NaiveDate) -> bool {
        !self.progress.is_complete() && (today > self.end_date || today > contract_end)
    }

    /// Concatenated note text for tabular output, oldest first.
    pub fn notes_text(&self) -> Option<String> {
        if self.notes.is_empty() {
            return None;
        }
        Some(
            self.notes
                .iter()
                .map(|n| n.text.as_str())
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn progress_toggles_off_to_zero() {
        let p = Progress::Half;
        assert_eq!(p.toggled(Progress::Half), Progress::None);
        assert_eq!(p.toggled(Progress::ThreeQuarters), Progress::ThreeQuarters);
        assert_eq!(Progress::None.toggled(Progress::Complete), Progress::Complete);
    }

    #[test]
    fn progress_serializes_as_number() {
        let json = serde_json::to_string(&Progress::ThreeQuarters).unwrap();
        assert_eq!(json, "75");
        let parsed: Progress = serde_json::from_str("100").unwrap();
        assert_eq!(parsed, Progress::Complete);
        assert!(serde_json::from_str::<Progress>("60").is_err());
    }

    #[test]
    fn overdue_considers_both_deadlines() {
        let mut act = Activity::new("hull survey", date(2024, 1, 5), date(2024, 1, 10));
        act.progress = Progress::Half;

        let contract_end = date(2024, 1, 31);
        // Past the activity's own end, contract still running.
        assert!(act.is_overdue(date(2024, 1, 15), contract_end));
        // Inside the activity window.
        assert!(!act.is_overdue(date(2024, 1, 8), contract_end));
        // Activity window still open but contract expired.
        assert!(act.is_overdue(date(2024, 1, 8), date(2024, 1, 7)));

        act.progress = Progress::Complete;
        assert!(!act.is_overdue(date(2024, 1, 15), contract_end));
    }
}
