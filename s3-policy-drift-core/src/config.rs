//! Checker configuration.
//!
//! All ambient settings (AWS profile, region, expected account, baselines
//! directory, bucket inventory) live in an explicit [`CheckerConfig`] that is
//! constructed once at process start and passed by reference into the checker.
//! There are no process-global accessors.

use crate::errors::{DriftError, Result};
use regex::Regex;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::OnceLock,
};

/// Whether the order of policy statement arrays is semantically significant.
///
/// IAM evaluates a policy's statements as an unordered set, so the default
/// treats reordering as a non-drift case. `Significant` preserves array order
/// during canonicalization for operators who want byte-shape fidelity.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatementOrder {
    /// Array order is preserved; a reordered statement list counts as drift.
    Significant,
    /// Array order is normalized away before comparison.
    #[default]
    Insignificant,
}

/// Checker configuration
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CheckerConfig {
    /// AWS CLI / SDK profile name
    #[serde(default)]
    pub profile: Option<String>,
    /// AWS region
    #[serde(default)]
    pub region: Option<String>,
    /// Account the caller identity must belong to, when pinned
    #[serde(default)]
    pub expected_account_id: Option<String>,
    /// Directory holding one baseline document per bucket
    pub baselines_dir: PathBuf,
    /// Known bucket inventory; checks are only valid for these names
    pub buckets: Vec<String>,
    /// Statement-array ordering semantics used during canonicalization
    #[serde(default)]
    pub statement_order: StatementOrder,
}

/// Cached S3 bucket name pattern (lowercase DNS labels, 3-63 chars)
static BUCKET_NAME_RE: OnceLock<Regex> = OnceLock::new();

fn bucket_name_regex() -> &'static Regex {
    BUCKET_NAME_RE.get_or_init(|| {
        Regex::new(r"^[a-z0-9][a-z0-9.-]{1,61}[a-z0-9]$").expect("bucket name pattern")
    })
}

impl CheckerConfig {
    /// Load a configuration document from a JSON file and validate it.
    ///
    /// # Errors
    /// Returns `DriftError` if the file cannot be read, is not valid JSON,
    /// or fails [`CheckerConfig::validate`].
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|e| DriftError::file_system("read", path, e))?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|e| DriftError::json_parsing(format!("config file '{}'", path.display()), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the bucket inventory and directory settings.
    ///
    /// # Errors
    /// Returns `DriftError::Validation` for empty or malformed bucket names
    /// and duplicate inventory entries.
    pub fn validate(&self) -> Result<()> {
        if self.baselines_dir.as_os_str().is_empty() {
            return Err(DriftError::validation_for_field(
                "baselines directory must not be empty",
                "BaselinesDir",
            ));
        }

        for name in &self.buckets {
            if !bucket_name_regex().is_match(name) {
                return Err(DriftError::validation_for_field(
                    format!("'{name}' is not a valid bucket name"),
                    "Buckets",
                ));
            }
        }

        let mut seen = self.buckets.clone();
        seen.sort();
        seen.dedup();
        if seen.len() != self.buckets.len() {
            return Err(DriftError::validation_for_field(
                "bucket inventory contains duplicate names",
                "Buckets",
            ));
        }

        Ok(())
    }

    /// Whether `bucket_name` belongs to the configured inventory.
    #[must_use]
    pub fn is_known_bucket(&self, bucket_name: &str) -> bool {
        self.buckets.iter().any(|b| b == bucket_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_config() -> CheckerConfig {
        CheckerConfig {
            profile: Some("pz-prod".to_string()),
            region: Some("us-east-2".to_string()),
            expected_account_id: Some("123456789012".to_string()),
            baselines_dir: PathBuf::from("baselines"),
            buckets: vec![
                "eg-pz-prod-s3-branding-ohio".to_string(),
                "eg-pz-prod-s3-attachments-ohio".to_string(),
            ],
            statement_order: StatementOrder::default(),
        }
    }

    #[test]
    fn test_valid_config_passes_validation() {
        assert!(sample_config().validate().is_ok());
    }

    #[test]
    fn test_statement_order_defaults_to_insignificant() {
        assert_eq!(StatementOrder::default(), StatementOrder::Insignificant);
    }

    #[test]
    fn test_invalid_bucket_name_rejected() {
        let mut config = sample_config();
        config.buckets.push("Not_A_Bucket".to_string());
        let err = config.validate().expect_err("should reject uppercase name");
        assert!(err.to_string().contains("Not_A_Bucket"));
    }

    #[test]
    fn test_duplicate_bucket_names_rejected() {
        let mut config = sample_config();
        config
            .buckets
            .push("eg-pz-prod-s3-branding-ohio".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_is_known_bucket() {
        let config = sample_config();
        assert!(config.is_known_bucket("eg-pz-prod-s3-branding-ohio"));
        assert!(!config.is_known_bucket("eg-pz-prod-s3-mystery-ohio"));
    }

    #[test]
    fn test_from_file_round_trip() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{
                "Profile": "pz-prod",
                "Region": "us-east-2",
                "BaselinesDir": "baselines",
                "Buckets": ["eg-pz-prod-s3-branding-ohio"],
                "StatementOrder": "significant"
            }}"#
        )
        .expect("write config");

        let config = CheckerConfig::from_file(file.path()).expect("load config");
        assert_eq!(config.profile.as_deref(), Some("pz-prod"));
        assert_eq!(config.expected_account_id, None);
        assert_eq!(config.statement_order, StatementOrder::Significant);
        assert_eq!(config.buckets.len(), 1);
    }

    #[test]
    fn test_from_file_missing_path_is_file_system_error() {
        let err = CheckerConfig::from_file(Path::new("/nonexistent/config.json"))
            .expect_err("should fail");
        assert!(matches!(err, DriftError::FileSystem { .. }));
    }
}
