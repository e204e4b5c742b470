use chrono::NaiveDate;
use towing_core::domain::{ContractPatch, Note, Specialty};

/// Single-line text input with a byte-indexed cursor.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    pub value: String,
    pub cursor: usize,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_str(s: &str) -> Self {
        Self {
            value: s.to_string(),
            cursor: s.len(),
        }
    }

    /// Insert a character at the cursor position.
    pub fn insert(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Delete the character immediately before the cursor (backspace).
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let new_cursor = self.prev_boundary(self.cursor);
        self.value.drain(new_cursor..self.cursor);
        self.cursor = new_cursor;
    }

    /// Move cursor one char to the left.
    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.prev_boundary(self.cursor);
        }
    }

    /// Move cursor one char to the right.
    pub fn move_right(&mut self) {
        if self.cursor < self.value.len() {
            self.cursor = self.next_boundary(self.cursor);
        }
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Returns the string split at the cursor: (before, after).
    pub fn split_at_cursor(&self) -> (&str, &str) {
        (&self.value[..self.cursor], &self.value[self.cursor..])
    }

    fn prev_boundary(&self, pos: usize) -> usize {
        debug_assert!(pos > 0, "prev_boundary called with pos == 0");
        let mut p = pos - 1;
        while p > 0 && !self.value.is_char_boundary(p) {
            p -= 1;
        }
        p
    }

    fn next_boundary(&self, pos: usize) -> usize {
        let mut p = pos + 1;
        while p < self.value.len() && !self.value.is_char_boundary(p) {
            p += 1;
        }
        p
    }
}

/// Parse the `YYYY-MM-DD` form entry format.
pub fn parse_form_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Contracts,
    Agenda,
    Team,
}

/// Destructive or sensitive operation staged behind the passcode gate.
#[derive(Debug, Clone)]
pub enum GatedAction {
    DeleteContract(String),
    RenumberContract { id: String, patch: ContractPatch },
    DeleteCollaborator(String),
    SaveCollaborator {
        editing_id: Option<String>,
        name: String,
        specialty: Specialty,
    },
}

#[derive(Debug, Clone)]
pub struct GateState {
    pub input: TextInput,
    pub error: bool,
    pub pending: GatedAction,
}

impl GateState {
    pub fn new(pending: GatedAction) -> Self {
        Self {
            input: TextInput::new(),
            error: false,
            pending,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ContractForm {
    pub editing_id: Option<String>,
    pub number: TextInput,
    pub start: TextInput,
    pub end: TextInput,
    pub focused: usize,
    pub error: Option<String>,
}

impl ContractForm {
    pub const FIELDS: usize = 3;

    pub fn blank() -> Self {
        Self {
            editing_id: None,
            number: TextInput::new(),
            start: TextInput::new(),
            end: TextInput::new(),
            focused: 0,
            error: None,
        }
    }

    pub fn for_edit(id: &str, number: &str, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            editing_id: Some(id.to_string()),
            number: TextInput::from_str(number),
            start: TextInput::from_str(&start.format("%Y-%m-%d").to_string()),
            end: TextInput::from_str(&end.format("%Y-%m-%d").to_string()),
            focused: 0,
            error: None,
        }
    }

    pub fn focused_input(&mut self) -> &mut TextInput {
        match self.focused {
            0 => &mut self.number,
            1 => &mut self.start,
            _ => &mut self.end,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ActivityForm {
    pub contract_id: String,
    pub editing_id: Option<String>,
    pub description: TextInput,
    pub start: TextInput,
    pub end: TextInput,
    pub focused: usize,
    pub error: Option<String>,
}

impl ActivityForm {
    pub const FIELDS: usize = 3;

    pub fn blank(contract_id: &str) -> Self {
        Self {
            contract_id: contract_id.to_string(),
            editing_id: None,
            description: TextInput::new(),
            start: TextInput::new(),
            end: TextInput::new(),
            focused: 0,
            error: None,
        }
    }

    pub fn for_edit(
        contract_id: &str,
        activity_id: &str,
        description: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        Self {
            contract_id: contract_id.to_string(),
            editing_id: Some(activity_id.to_string()),
            description: TextInput::from_str(description),
            start: TextInput::from_str(&start.format("%Y-%m-%d").to_string()),
            end: TextInput::from_str(&end.format("%Y-%m-%d").to_string()),
            focused: 0,
            error: None,
        }
    }

    pub fn focused_input(&mut self) -> &mut TextInput {
        match self.focused {
            0 => &mut self.description,
            1 => &mut self.start,
            _ => &mut self.end,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CollaboratorForm {
    pub editing_id: Option<String>,
    pub name: TextInput,
    pub specialty: Specialty,
}

impl CollaboratorForm {
    pub fn blank() -> Self {
        Self {
            editing_id: None,
            name: TextInput::new(),
            specialty: Specialty::Woodworking,
        }
    }

    pub fn for_edit(id: &str, name: &str, specialty: Specialty) -> Self {
        Self {
            editing_id: Some(id.to_string()),
            name: TextInput::from_str(name),
            specialty,
        }
    }

    pub fn cycle_specialty(&mut self) {
        let all = Specialty::ALL;
        let idx = all.iter().position(|s| *s == self.specialty).unwrap_or(0);
        self.specialty = all[(idx + 1) % all.len()];
    }
}

/// Working copy of an activity's note list. Every mutation is written
/// straight through to the store, the copy only drives rendering.
#[derive(Debug, Clone)]
pub struct NotesState {
    pub contract_id: String,
    pub activity_id: String,
    pub notes: Vec<Note>,
    pub input: TextInput,
    pub cursor: usize,
    /// Index of the note being edited in place, if any.
    pub editing: Option<usize>,
}

impl NotesState {
    pub fn new(contract_id: &str, activity_id: &str, notes: Vec<Note>) -> Self {
        Self {
            contract_id: contract_id.to_string(),
            activity_id: activity_id.to_string(),
            notes,
            input: TextInput::new(),
            cursor: 0,
            editing: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum PromptPurpose {
    ImportBackup,
    ScanImage { contract_id: String },
}

/// Free-text prompt overlay (file paths).
#[derive(Debug, Clone)]
pub struct PromptState {
    pub purpose: PromptPurpose,
    pub title: &'static str,
    pub input: TextInput,
}

impl PromptState {
    pub fn new(purpose: PromptPurpose, title: &'static str) -> Self {
        Self {
            purpose,
            title,
            input: TextInput::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Overlay {
    Gate(GateState),
    ContractForm(ContractForm),
    ActivityForm(ActivityForm),
    CollaboratorForm(CollaboratorForm),
    Notes(NotesState),
    Prompt(PromptState),
    ConfirmDeleteActivity {
        contract_id: String,
        activity_id: String,
        label: String,
    },
    ConfirmImport {
        backup: towing_core::Backup,
        summary: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_input_edits_at_cursor() {
        let mut input = TextInput::from_str("2024");
        input.move_left();
        input.insert('x');
        assert_eq!(input.value, "202x4");
        input.backspace();
        assert_eq!(input.value, "2024");
    }

    #[test]
    fn form_date_parsing() {
        assert_eq!(
            parse_form_date(" 2024-01-05 "),
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
        assert_eq!(parse_form_date("05/01/2024"), None);
        assert_eq!(parse_form_date(""), None);
    }

    #[test]
    fn specialty_cycles_through_all_values() {
        let mut form = CollaboratorForm::blank();
        let first = form.specialty;
        for _ in 0..Specialty::ALL.len() {
            form.cycle_specialty();
        }
        assert_eq!(form.specialty, first);
    }
}
