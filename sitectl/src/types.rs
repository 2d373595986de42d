//! Common identifier types.
//!
//! Projects and workers are keyed by the UUIDs the backend assigns them. The aliases keep
//! signatures readable without introducing conversion boilerplate at the database boundary.

use uuid::Uuid;

pub type ProjectId = Uuid;
pub type WorkerId = Uuid;

/// Abbreviate a UUID to its first 8 characters for more readable logs and traces
/// Example: "550e8400-e29b-41d4-a716-446655440000" -> "550e8400"
pub fn abbrev_uuid(uuid: &Uuid) -> String {
    uuid.to_string().chars().take(8).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abbrev_uuid() {
        let id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(abbrev_uuid(&id), "550e8400");
    }
}
