//! Utility functions for identifiers, timestamps and prompt fingerprints.

mod fingerprint;
pub mod timestamps;
mod uuid_utils;

pub use fingerprint::fingerprint;
pub use timestamps::{iso_timestamp, parse_timestamp, Timestamp, TimestampError};
pub use uuid_utils::{generate_run_id, generate_uuid};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_uuid_is_valid() {
        let id = generate_uuid();
        assert_eq!(id.get_version_num(), 4);
    }

    #[test]
    fn test_run_ids_are_time_ordered() {
        let id = generate_run_id();
        assert_eq!(id.get_version_num(), 7);
    }

    #[test]
    fn test_iso_timestamp_format() {
        let ts = iso_timestamp();
        assert!(ts.contains('T'));
        assert!(ts.ends_with('Z'));
    }
}
