//! Checked-in baseline policy documents.
//!
//! One JSON document per bucket, at a path derived deterministically from the
//! bucket name. Baselines are ground truth: the store only ever reads them.

use log::debug;
use serde_json::Value as JsonValue;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{DriftError, Result};

/// Read-only access to the baseline documents directory
#[derive(Clone, Debug)]
pub struct BaselineStore {
    baselines_dir: PathBuf,
}

impl BaselineStore {
    /// constructor
    #[must_use]
    pub fn new(baselines_dir: impl Into<PathBuf>) -> Self {
        Self {
            baselines_dir: baselines_dir.into(),
        }
    }

    /// Deterministic baseline path for a bucket: `<baselines_dir>/<bucket>.json`
    #[must_use]
    pub fn baseline_file_path(&self, bucket_name: &str) -> PathBuf {
        self.baselines_dir.join(format!("{bucket_name}.json"))
    }

    /// Load and parse the baseline document for `bucket_name`.
    ///
    /// # Errors
    /// Returns `DriftError::FileSystem` when the file is missing or
    /// unreadable and `DriftError::JsonParsing` when it is not valid JSON.
    pub fn load(&self, bucket_name: &str) -> Result<JsonValue> {
        let path = self.baseline_file_path(bucket_name);
        debug!("Loading baseline document from {}", path.display());

        let raw = fs::read_to_string(&path)
            .map_err(|e| DriftError::file_system("read", path.as_path(), e))?;
        serde_json::from_str(&raw).map_err(|e| {
            DriftError::json_parsing(format!("baseline document '{}'", path.display()), e)
        })
    }

    /// Confirm every known bucket has a baseline file present.
    ///
    /// This is the precondition gate for a full run, not a per-bucket check;
    /// all missing files are reported at once.
    ///
    /// # Errors
    /// Returns `DriftError::BaselinesMissing` listing every absent file name.
    pub fn verify_all_present(&self, buckets: &[String]) -> Result<()> {
        let missing: Vec<String> = buckets
            .iter()
            .filter(|bucket| !self.baseline_file_path(bucket).is_file())
            .map(|bucket| format!("{bucket}.json"))
            .collect();

        if missing.is_empty() {
            debug!(
                "All {} baseline documents present under {}",
                buckets.len(),
                self.baselines_dir.display()
            );
            Ok(())
        } else {
            Err(DriftError::BaselinesMissing {
                baselines_dir: self.baselines_dir.clone(),
                missing,
            })
        }
    }

    /// The configured baselines directory
    #[must_use]
    pub fn baselines_dir(&self) -> &Path {
        &self.baselines_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn write_baseline(dir: &Path, bucket: &str, value: &JsonValue) {
        let mut file =
            fs::File::create(dir.join(format!("{bucket}.json"))).expect("create baseline");
        write!(file, "{value}").expect("write baseline");
    }

    #[test]
    fn test_baseline_file_path_is_deterministic() {
        let store = BaselineStore::new("/baselines");
        assert_eq!(
            store.baseline_file_path("eg-pz-prod-s3-branding-ohio"),
            PathBuf::from("/baselines/eg-pz-prod-s3-branding-ohio.json")
        );
    }

    #[test]
    fn test_load_parses_baseline_document() {
        let dir = tempfile::tempdir().expect("tempdir");
        let policy = json!({"Version": "2012-10-17", "Statement": []});
        write_baseline(dir.path(), "eg-pz-prod-s3-attachments-ohio", &policy);

        let store = BaselineStore::new(dir.path());
        let loaded = store
            .load("eg-pz-prod-s3-attachments-ohio")
            .expect("load baseline");
        assert_eq!(loaded, policy);
    }

    #[test]
    fn test_load_missing_baseline_is_file_system_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = BaselineStore::new(dir.path());
        let err = store
            .load("eg-pz-prod-s3-attachments-ohio")
            .expect_err("should fail");
        assert!(matches!(err, DriftError::FileSystem { .. }));
    }

    #[test]
    fn test_load_malformed_baseline_is_json_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join("eg-pz-prod-s3-attachments-ohio.json"),
            "not json",
        )
        .expect("write file");

        let store = BaselineStore::new(dir.path());
        let err = store
            .load("eg-pz-prod-s3-attachments-ohio")
            .expect_err("should fail");
        assert!(matches!(err, DriftError::JsonParsing { .. }));
    }

    #[test]
    fn test_verify_all_present_reports_every_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_baseline(
            dir.path(),
            "eg-pz-prod-s3-branding-ohio",
            &json!({"Statement": []}),
        );

        let store = BaselineStore::new(dir.path());
        let buckets = vec![
            "eg-pz-prod-s3-branding-ohio".to_string(),
            "eg-pz-prod-s3-attachments-ohio".to_string(),
            "eg-pz-prod-s3-exports-ohio".to_string(),
        ];

        let err = store
            .verify_all_present(&buckets)
            .expect_err("two baselines missing");
        if let DriftError::BaselinesMissing { missing, .. } = err {
            assert_eq!(
                missing,
                vec![
                    "eg-pz-prod-s3-attachments-ohio.json".to_string(),
                    "eg-pz-prod-s3-exports-ohio.json".to_string(),
                ]
            );
        } else {
            panic!("Expected BaselinesMissing error");
        }
    }

    #[test]
    fn test_verify_all_present_passes_when_complete() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_baseline(
            dir.path(),
            "eg-pz-prod-s3-branding-ohio",
            &json!({"Statement": []}),
        );

        let store = BaselineStore::new(dir.path());
        let buckets = vec!["eg-pz-prod-s3-branding-ohio".to_string()];
        assert!(store.verify_all_present(&buckets).is_ok());
    }
}
