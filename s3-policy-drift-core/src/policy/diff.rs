//! Structural diff between canonical policy documents.
//!
//! Both inputs must already be in canonical form; the walk then reports
//! additions, removals, and changes with JSON-pointer style paths, which the
//! checker renders into the human-readable `diff_details` text.

use itertools::Itertools;
use serde_json::Value;
use std::fmt;

/// Kind of difference found at a path
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiffKind {
    /// Present in the live document only
    Added,
    /// Present in the baseline document only
    Removed,
    /// Present in both with different values
    Changed,
}

impl fmt::Display for DiffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added => write!(f, "added"),
            Self::Removed => write!(f, "removed"),
            Self::Changed => write!(f, "changed"),
        }
    }
}

/// One difference between baseline and live documents
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiffEntry {
    /// JSON-pointer style location, e.g. `/Statement/1/Action`
    pub path: String,
    /// What happened at this location
    pub kind: DiffKind,
    /// Baseline-side value rendering, absent for additions
    pub expected: Option<String>,
    /// Live-side value rendering, absent for removals
    pub actual: Option<String>,
}

impl DiffEntry {
    fn added(path: String, actual: &Value) -> Self {
        Self {
            path,
            kind: DiffKind::Added,
            expected: None,
            actual: Some(actual.to_string()),
        }
    }

    fn removed(path: String, expected: &Value) -> Self {
        Self {
            path,
            kind: DiffKind::Removed,
            expected: Some(expected.to_string()),
            actual: None,
        }
    }

    fn changed(path: String, expected: &Value, actual: &Value) -> Self {
        Self {
            path,
            kind: DiffKind::Changed,
            expected: Some(expected.to_string()),
            actual: Some(actual.to_string()),
        }
    }
}

/// Compare two canonical documents, returning every difference.
///
/// `expected` is the baseline side, `actual` the live side. An empty result
/// means the documents are structurally equal.
#[must_use]
pub fn diff_documents(expected: &Value, actual: &Value) -> Vec<DiffEntry> {
    let mut entries = Vec::new();
    walk("", expected, actual, &mut entries);
    entries
}

fn walk(path: &str, expected: &Value, actual: &Value, entries: &mut Vec<DiffEntry>) {
    match (expected, actual) {
        (Value::Object(exp), Value::Object(act)) => {
            // Canonical maps iterate in sorted key order, so a merge keeps
            // the union sorted without re-collecting.
            for key in exp.keys().merge(act.keys()).dedup() {
                let child = format!("{}/{}", path, key);
                match (exp.get(key), act.get(key)) {
                    (Some(e), Some(a)) => walk(&child, e, a, entries),
                    (Some(e), None) => entries.push(DiffEntry::removed(child, e)),
                    (None, Some(a)) => entries.push(DiffEntry::added(child, a)),
                    (None, None) => {}
                }
            }
        }
        (Value::Array(exp), Value::Array(act)) => {
            let shared = exp.len().min(act.len());
            for (index, (e, a)) in exp.iter().zip(act.iter()).enumerate() {
                walk(&format!("{}/{}", path, index), e, a, entries);
            }
            for (index, e) in exp.iter().enumerate().skip(shared) {
                entries.push(DiffEntry::removed(format!("{}/{}", path, index), e));
            }
            for (index, a) in act.iter().enumerate().skip(shared) {
                entries.push(DiffEntry::added(format!("{}/{}", path, index), a));
            }
        }
        (e, a) => {
            if e != a {
                entries.push(DiffEntry::changed(path.to_string(), e, a));
            }
        }
    }
}

/// Render diff entries as multi-line human-readable text.
#[must_use]
pub fn render_diff(entries: &[DiffEntry]) -> String {
    entries
        .iter()
        .map(|entry| match entry.kind {
            DiffKind::Added => format!(
                "  added   {} = {}",
                entry.path,
                entry.actual.as_deref().unwrap_or_default()
            ),
            DiffKind::Removed => format!(
                "  removed {} = {}",
                entry.path,
                entry.expected.as_deref().unwrap_or_default()
            ),
            DiffKind::Changed => format!(
                "  changed {}: expected {}, actual {}",
                entry.path,
                entry.expected.as_deref().unwrap_or_default(),
                entry.actual.as_deref().unwrap_or_default()
            ),
        })
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StatementOrder;
    use crate::policy::canonicalize;
    use serde_json::json;

    fn canonical(value: Value) -> Value {
        canonicalize(value, StatementOrder::Insignificant)
    }

    #[test]
    fn test_equal_documents_produce_no_entries() {
        let doc = canonical(json!({"Version": "2012-10-17", "Statement": []}));
        assert!(diff_documents(&doc, &doc).is_empty());
    }

    #[test]
    fn test_added_statement_is_reported_with_path() {
        let expected = canonical(json!({"Statement": [{"Sid": "AllowAuthenticatedUploads"}]}));
        let actual = canonical(json!({"Statement": [
            {"Sid": "AllowAuthenticatedUploads"},
            {"Sid": "PublicReadGetObject"}
        ]}));

        let entries = diff_documents(&expected, &actual);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, DiffKind::Added);
        assert_eq!(entries[0].path, "/Statement/1");
        assert!(entries[0]
            .actual
            .as_deref()
            .unwrap_or_default()
            .contains("PublicReadGetObject"));
    }

    #[test]
    fn test_removed_key_is_reported() {
        let expected = canonical(json!({"Statement": [{"Sid": "A", "Condition": {"Bool": {}}}]}));
        let actual = canonical(json!({"Statement": [{"Sid": "A"}]}));

        let entries = diff_documents(&expected, &actual);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, DiffKind::Removed);
        assert_eq!(entries[0].path, "/Statement/0/Condition");
    }

    #[test]
    fn test_changed_scalar_carries_both_sides() {
        let expected = canonical(json!({"Version": "2012-10-17"}));
        let actual = canonical(json!({"Version": "2008-10-17"}));

        let entries = diff_documents(&expected, &actual);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, DiffKind::Changed);
        assert_eq!(entries[0].path, "/Version");
        assert_eq!(entries[0].expected.as_deref(), Some("\"2012-10-17\""));
        assert_eq!(entries[0].actual.as_deref(), Some("\"2008-10-17\""));
    }

    #[test]
    fn test_type_mismatch_is_a_change() {
        let expected = canonical(json!({"Action": "s3:GetObject"}));
        let actual = canonical(json!({"Action": ["s3:GetObject"]}));

        let entries = diff_documents(&expected, &actual);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, DiffKind::Changed);
        assert_eq!(entries[0].path, "/Action");
    }

    #[test]
    fn test_render_mentions_every_entry() {
        let expected = canonical(json!({"Version": "2012-10-17", "Statement": [{"Sid": "A"}]}));
        let actual = canonical(json!({"Version": "2008-10-17", "Statement": []}));

        let text = render_diff(&diff_documents(&expected, &actual));
        assert!(text.contains("removed /Statement/0"));
        assert!(text.contains("changed /Version"));
    }
}
