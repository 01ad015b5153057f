//! Property-based tests for the extraction guard.
//!
//! These tests use proptest to generate arbitrary entry names and verify
//! that resolution never produces a path outside the extraction root.

#![allow(clippy::expect_used)]

use longbox_core::ExtractRoot;
use longbox_core::guard::normalize_entry_name;
use proptest::prelude::*;
use tempfile::TempDir;

fn create_test_root() -> (TempDir, ExtractRoot) {
    let temp = TempDir::new().expect("failed to create temp dir");
    let root = ExtractRoot::new(temp.path()).expect("failed to create root");
    (temp, root)
}

proptest! {
    /// Any name with a .. component should be rejected.
    #[test]
    fn prop_parent_traversal_rejected(
        prefix in "([a-z]+/){0,5}",
        suffix in "([a-z]+/?){0,5}"
    ) {
        let (_temp, root) = create_test_root();
        let name = format!("{prefix}../{suffix}");
        let result = root.resolve(&name);
        prop_assert!(result.is_err(), "name with .. should be rejected: {name}");
    }

    /// Plain relative names should resolve strictly inside the root.
    #[test]
    fn prop_safe_names_resolve_inside_root(
        components in prop::collection::vec("[a-zA-Z0-9_-]{1,20}", 1..6)
    ) {
        let (_temp, root) = create_test_root();
        let name = components.join("/");
        let resolved = root.resolve(&name).expect("safe name should resolve");
        let target = resolved.expect("safe name should not be skipped");
        prop_assert!(target.starts_with(root.as_path()));
        prop_assert_ne!(target.as_path(), root.as_path());
    }

    /// Whatever the input, a resolved target is never outside the root.
    /// Hostile names error, degenerate names are skipped, and everything
    /// else must land inside.
    #[test]
    fn prop_resolution_never_escapes(
        name in "[a-zA-Z0-9_. /\\\\-]{0,40}"
    ) {
        let (_temp, root) = create_test_root();
        match root.resolve(&name) {
            Ok(Some(target)) => prop_assert!(
                target.starts_with(root.as_path()),
                "{name:?} resolved outside the root: {}",
                target.display()
            ),
            Ok(None) | Err(_) => {}
        }
    }

    /// Arbitrary unicode names, including control characters, still obey
    /// the containment property.
    #[test]
    fn prop_arbitrary_names_never_escape(name in any::<String>()) {
        let (_temp, root) = create_test_root();
        match root.resolve(&name) {
            Ok(Some(target)) => prop_assert!(target.starts_with(root.as_path())),
            Ok(None) | Err(_) => {}
        }
    }

    /// Backslash-separated names resolve to the same target as their
    /// forward-slash spelling.
    #[test]
    fn prop_backslashes_resolve_like_forward_slashes(
        components in prop::collection::vec("[a-z]{1,8}", 1..5)
    ) {
        let (_temp, root) = create_test_root();
        let forward = root
            .resolve(&components.join("/"))
            .expect("forward spelling should resolve");
        let backward = root
            .resolve(&components.join("\\"))
            .expect("backslash spelling should resolve");
        prop_assert_eq!(forward, backward);
    }

    /// There is no nesting-depth limit on entries.
    #[test]
    fn prop_deep_nesting_accepted(depth in 33usize..80) {
        let (_temp, root) = create_test_root();
        let components: Vec<String> = (0..depth).map(|i| format!("d{i}")).collect();
        let result = root.resolve(&components.join("/"));
        prop_assert!(matches!(result, Ok(Some(_))));
    }

    /// Leading separators are stripped, never treated as absolute.
    #[test]
    fn prop_leading_separators_stripped(
        seps in "[/\\\\]{1,5}",
        name in "[a-z]{1,10}"
    ) {
        let normalized = normalize_entry_name(&format!("{seps}{name}"));
        prop_assert_eq!(normalized, Some(name));
    }

    /// Names that are empty after normalization are skipped.
    #[test]
    fn prop_separator_only_names_are_skipped(seps in "[/\\\\]{0,6}") {
        prop_assert_eq!(normalize_entry_name(&seps), None);
    }
}
