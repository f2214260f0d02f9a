//! Row identifiers for sessions and project roles.
//!
//! These rows are written app-side with UUIDv7 ids so listing them by id
//! follows creation order. User ids come from the database default
//! (`gen_random_uuid()`, v4).

use uuid::Uuid;

/// New time-ordered row id in canonical hyphenated form.
pub fn new_row_id() -> String {
    Uuid::now_v7().to_string()
}
