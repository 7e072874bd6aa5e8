//! Idempotency keys for expense submissions.
//!
//! A client generates one key per logical submission and reuses it across
//! retries, so the server can tell a retry apart from a new expense.

use uuid::Uuid;

/// The HTTP header clients use to pass an idempotency key.
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// Generate a fresh idempotency key.
///
/// Keys are random version 4 UUIDs in the canonical lowercase hyphenated
/// form, e.g. `550e8400-e29b-41d4-a716-446655440000`.
pub fn generate_key() -> String {
    Uuid::new_v4().to_string()
}

// ==============
// TESTS
// ==============

#[cfg(test)]
mod key_generation_tests {
    use std::collections::HashSet;

    use super::generate_key;

    #[track_caller]
    fn assert_uuid_v4(key: &str) {
        assert_eq!(key.len(), 36, "got length {}, want 36: {key}", key.len());

        for (i, character) in key.chars().enumerate() {
            match i {
                8 | 13 | 18 | 23 => {
                    assert_eq!(character, '-', "want '-' at index {i}: {key}");
                }
                14 => assert_eq!(character, '4', "want version nibble '4': {key}"),
                19 => assert!(
                    matches!(character, '8' | '9' | 'a' | 'b'),
                    "want variant nibble in 8-b at index 19: {key}"
                ),
                _ => assert!(
                    character.is_ascii_hexdigit() && !character.is_ascii_uppercase(),
                    "want lowercase hex at index {i}: {key}"
                ),
            }
        }
    }

    #[test]
    fn keys_have_uuid_v4_shape() {
        for _ in 0..10 {
            assert_uuid_v4(&generate_key());
        }
    }

    #[test]
    fn keys_are_unique() {
        let keys: HashSet<String> = (0..100).map(|_| generate_key()).collect();

        assert_eq!(keys.len(), 100);
    }
}
