//! UUID generation.

use uuid::Uuid;

/// Generates a new UUID v4.
#[must_use]
pub fn generate_uuid() -> Uuid {
    Uuid::new_v4()
}

/// Generates a time-ordered identifier for one planning run.
#[must_use]
pub fn generate_run_id() -> Uuid {
    Uuid::now_v7()
}
