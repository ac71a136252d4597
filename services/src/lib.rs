//! Small shared helpers used across the workspace.

use sha2::{Digest, Sha256};

/// Deterministic, stable hex id derived from an arbitrary string.
///
/// Used wherever the system needs the *same* input to always produce the
/// *same* identifier (repo handle ids, cache keys) instead of a random UUID.
pub fn stable_id(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_input_same_id() {
        assert_eq!(stable_id("a@b"), stable_id("a@b"));
    }

    #[test]
    fn different_input_different_id() {
        assert_ne!(stable_id("a@b"), stable_id("a@c"));
    }
}
