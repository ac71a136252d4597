//! §4.7 Path-Safety Guard.
//!
//! Every externally supplied path parameter crossing into a handle must be
//! normalized and resolved against `local_path`; anything that escapes is
//! rejected before it ever touches the filesystem.

use crate::errors::RepoCoreError;
use std::path::{Component, Path, PathBuf};

/// Resolves `candidate` (a possibly-relative, possibly-hostile path) against
/// `root`, rejecting any result that is not a descendant of `root`.
///
/// This never touches the filesystem (no symlink resolution) — it is a pure
/// lexical normalization, which is enough to catch `..` traversal and
/// absolute-path substitution without requiring the target to exist yet
/// (callers that need existence checks do so after this guard passes).
pub fn resolve_within(root: &Path, candidate: &str) -> Result<PathBuf, RepoCoreError> {
    let candidate_path = Path::new(candidate);

    let mut normalized = PathBuf::new();
    for component in candidate_path.components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    return Err(RepoCoreError::PathEscape);
                }
            }
            // Absolute roots / prefixes in the candidate are never honored —
            // every path is relative to the handle's root.
            Component::RootDir | Component::Prefix(_) => {}
        }
    }

    let resolved = root.join(&normalized);
    let resolved_norm = dunce::simplified(&resolved);

    if !resolved_norm.starts_with(root) {
        return Err(RepoCoreError::PathEscape);
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_relative_path_resolves() {
        let root = Path::new("/repo");
        let p = resolve_within(root, "src/lib.rs").unwrap();
        assert_eq!(p, Path::new("/repo/src/lib.rs"));
    }

    #[test]
    fn parent_traversal_is_rejected() {
        let root = Path::new("/repo");
        assert!(resolve_within(root, "../etc/passwd").is_err());
        assert!(resolve_within(root, "a/../../etc/passwd").is_err());
    }

    #[test]
    fn absolute_path_is_treated_as_relative() {
        let root = Path::new("/repo");
        let p = resolve_within(root, "/etc/passwd").unwrap();
        assert_eq!(p, Path::new("/repo/etc/passwd"));
    }

    #[test]
    fn dotdot_that_stays_inside_is_allowed() {
        let root = Path::new("/repo");
        let p = resolve_within(root, "a/b/../c").unwrap();
        assert_eq!(p, Path::new("/repo/a/c"));
    }
}
