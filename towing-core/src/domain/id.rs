use uuid::Uuid;

/// Generate an opaque unique identifier for a new record.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}
