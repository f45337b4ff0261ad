// SPDX-License-Identifier: MIT OR Apache-2.0
//! Microcrate for the `"KEY=VALUE"` environment-list form used by child
//! process launchers.

#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Snapshot the current environment as `"KEY=VALUE"` strings.
///
/// Callers typically start from this list, append or replace specific
/// entries, and pass the result as a full environment override for a child
/// process. Non-UTF-8 names and values are converted lossily. The order is
/// the platform's iteration order: stable within one process run, but not
/// guaranteed across runs.
pub fn current_env_strings() -> Vec<String> {
    std::env::vars_os()
        .map(|(key, value)| join_entry(&key.to_string_lossy(), &value.to_string_lossy()))
        .collect()
}

/// Split a `"KEY=VALUE"` entry at the first `=`.
///
/// Returns `None` when the entry contains no `=` at all. The value keeps
/// any further `=` characters verbatim.
pub fn split_entry(entry: &str) -> Option<(&str, &str)> {
    entry.split_once('=')
}

/// Format a key/value pair as a `"KEY=VALUE"` entry.
pub fn join_entry(key: &str, value: &str) -> String {
    format!("{key}={value}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn split_entry_splits_at_first_equals() {
        assert_eq!(split_entry("FOO=bar"), Some(("FOO", "bar")));
        assert_eq!(split_entry("FOO=a=b"), Some(("FOO", "a=b")));
        assert_eq!(split_entry("=bar"), Some(("", "bar")));
        assert_eq!(split_entry("FOO"), None);
    }

    #[test]
    fn join_entry_is_inverse_of_split_entry() {
        let entry = join_entry("KEY", "some=value");
        assert_eq!(split_entry(&entry), Some(("KEY", "some=value")));
    }

    #[test]
    fn snapshot_entries_all_contain_equals() {
        for entry in current_env_strings() {
            assert!(
                split_entry(&entry).is_some(),
                "malformed snapshot entry: {entry:?}"
            );
        }
    }

    #[test]
    fn snapshot_includes_visible_variables() {
        // PATH is set in any environment this test suite runs under.
        if let Ok(path) = std::env::var("PATH") {
            let entries = current_env_strings();
            assert!(entries.contains(&join_entry("PATH", &path)));
        }
    }

    #[test]
    fn snapshot_has_no_duplicate_keys() {
        let entries = current_env_strings();
        let keys: HashSet<&str> = entries
            .iter()
            .filter_map(|e| split_entry(e).map(|(k, _)| k))
            .collect();
        assert_eq!(keys.len(), entries.len());
    }
}
