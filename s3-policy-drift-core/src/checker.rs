//! Drift checker service: per-bucket comparison and suite preconditions.

use log::{debug, info, warn};
use serde::Serialize;
use std::path::PathBuf;

use crate::aws::PolicyFetcher;
use crate::baseline::BaselineStore;
use crate::config::CheckerConfig;
use crate::errors::{DriftError, Result};
use crate::policy::{canonical_pretty, canonicalize, diff_documents, render_diff};

/// Whether a bucket name carries the branding component.
///
/// Branding buckets are expected to carry an additional public-read statement
/// that non-branding buckets do not. The predicate only annotates the report
/// with the expected policy shape; it never alters comparison logic.
#[must_use]
pub fn is_branding_bucket(bucket_name: &str) -> bool {
    bucket_name.split('-').any(|segment| segment == "branding")
}

/// Outcome of one bucket check, consumed immediately by the reporting layer
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyCheckResult {
    /// Bucket the check ran against
    pub bucket_name: String,
    /// True when the canonical documents are structurally equal
    pub passed: bool,
    /// Infrastructure or configuration failure detail; never set for drift
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Human-readable diff of the canonical documents; only set for drift
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_details: Option<String>,
    /// Canonical baseline text, present when the baseline was readable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_policy: Option<String>,
    /// Canonical live text, present when the fetch succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_policy: Option<String>,
    /// Baseline file the check compared against
    pub baseline_file_path: PathBuf,
    /// Expected policy shape annotation
    pub branding_bucket: bool,
}

impl PolicyCheckResult {
    /// Both documents were retrieved and they disagree.
    #[must_use]
    pub fn drifted(&self) -> bool {
        !self.passed && self.diff_details.is_some()
    }

    /// The check could not be completed; not a drift signal.
    #[must_use]
    pub fn inconclusive(&self) -> bool {
        !self.passed && self.error_message.is_some()
    }
}

/// Main service struct that owns the policy fetcher and baseline store and
/// provides the drift-check operations
pub struct DriftChecker {
    config: CheckerConfig,
    fetcher: Box<dyn PolicyFetcher>,
    baselines: BaselineStore,
}

impl DriftChecker {
    /// Build a checker over an injected fetcher; the baseline store is
    /// derived from the configured directory.
    #[must_use]
    pub fn new(config: CheckerConfig, fetcher: Box<dyn PolicyFetcher>) -> Self {
        let baselines = BaselineStore::new(config.baselines_dir.clone());
        Self {
            config,
            fetcher,
            baselines,
        }
    }

    /// The configuration this checker was built with
    #[must_use]
    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Verify AWS access under the configured profile.
    ///
    /// Fatal for the whole suite: every bucket check depends on it.
    ///
    /// # Errors
    /// Returns `DriftError::AccessVerification` when the identity call fails
    /// or the caller belongs to the wrong account.
    pub async fn verify_access(&self) -> Result<String> {
        let account = self
            .fetcher
            .verify_access()
            .await
            .map_err(|e| DriftError::access_verification(e.to_string()))?;
        info!("AWS access verified for account {}", account);
        Ok(account)
    }

    /// Confirm a baseline document exists for every known bucket.
    ///
    /// # Errors
    /// Returns `DriftError::BaselinesMissing` listing every absent file.
    pub fn verify_baselines_exist(&self) -> Result<()> {
        self.baselines.verify_all_present(&self.config.buckets)
    }

    /// Check one bucket's live policy against its baseline.
    ///
    /// Unknown bucket names are a checker bug and surface as a hard error;
    /// fetch and baseline-read failures are inconclusive results carrying
    /// `error_message`, distinct from genuine drift.
    ///
    /// # Errors
    /// Returns `DriftError::Validation` for empty names and
    /// `DriftError::UnknownBucket` for names outside the inventory.
    pub async fn check_bucket(&self, bucket_name: &str) -> Result<PolicyCheckResult> {
        if bucket_name.is_empty() {
            return Err(DriftError::validation("bucket name must not be empty"));
        }
        if !self.config.is_known_bucket(bucket_name) {
            return Err(DriftError::unknown_bucket(bucket_name));
        }

        let baseline_file_path = self.baselines.baseline_file_path(bucket_name);
        let branding_bucket = is_branding_bucket(bucket_name);
        debug!(
            "Checking bucket {} against baseline {}",
            bucket_name,
            baseline_file_path.display()
        );

        let live = match self.fetcher.fetch_policy(bucket_name).await {
            Ok(live) => live,
            Err(e) => {
                warn!("Live policy fetch failed for {}: {}", bucket_name, e);
                return Ok(PolicyCheckResult {
                    bucket_name: bucket_name.to_string(),
                    passed: false,
                    error_message: Some(e.to_string()),
                    diff_details: None,
                    expected_policy: None,
                    actual_policy: None,
                    baseline_file_path,
                    branding_bucket,
                });
            }
        };

        let baseline = match self.baselines.load(bucket_name) {
            Ok(baseline) => baseline,
            Err(e) => {
                warn!("Baseline read failed for {}: {}", bucket_name, e);
                return Ok(PolicyCheckResult {
                    bucket_name: bucket_name.to_string(),
                    passed: false,
                    error_message: Some(e.to_string()),
                    diff_details: None,
                    expected_policy: None,
                    actual_policy: None,
                    baseline_file_path,
                    branding_bucket,
                });
            }
        };

        let expected = canonicalize(baseline, self.config.statement_order);
        let actual = canonicalize(live, self.config.statement_order);
        let entries = diff_documents(&expected, &actual);

        let result = if entries.is_empty() {
            info!("Bucket {} matches its baseline", bucket_name);
            PolicyCheckResult {
                bucket_name: bucket_name.to_string(),
                passed: true,
                error_message: None,
                diff_details: None,
                expected_policy: Some(canonical_pretty(&expected)),
                actual_policy: Some(canonical_pretty(&actual)),
                baseline_file_path,
                branding_bucket,
            }
        } else {
            warn!(
                "Bucket {} drifted from its baseline ({} differences)",
                bucket_name,
                entries.len()
            );
            PolicyCheckResult {
                bucket_name: bucket_name.to_string(),
                passed: false,
                error_message: None,
                diff_details: Some(render_diff(&entries)),
                expected_policy: Some(canonical_pretty(&expected)),
                actual_policy: Some(canonical_pretty(&actual)),
                baseline_file_path,
                branding_bucket,
            }
        };

        Ok(result)
    }

    /// Run the full suite: preconditions first, then every known bucket.
    ///
    /// Precondition failures stop the run before any bucket is checked.
    /// Per-bucket failures are isolated; one bucket's error never prevents
    /// the remaining buckets from being checked.
    ///
    /// # Errors
    /// Returns the precondition error when access or baseline verification
    /// fails.
    pub async fn check_all(&self) -> Result<Vec<PolicyCheckResult>> {
        self.verify_access().await?;
        self.verify_baselines_exist()?;

        let mut results = Vec::with_capacity(self.config.buckets.len());
        for bucket_name in &self.config.buckets {
            match self.check_bucket(bucket_name).await {
                Ok(result) => results.push(result),
                Err(e) => results.push(PolicyCheckResult {
                    bucket_name: bucket_name.clone(),
                    passed: false,
                    error_message: Some(e.to_string()),
                    diff_details: None,
                    expected_policy: None,
                    actual_policy: None,
                    baseline_file_path: self.baselines.baseline_file_path(bucket_name),
                    branding_bucket: is_branding_bucket(bucket_name),
                }),
            }
        }

        info!(
            "Checked {} buckets: {} passed, {} drifted, {} inconclusive",
            results.len(),
            results.iter().filter(|r| r.passed).count(),
            results.iter().filter(|r| r.drifted()).count(),
            results.iter().filter(|r| r.inconclusive()).count()
        );
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branding_bucket_classification() {
        assert!(is_branding_bucket("eg-pz-prod-s3-branding-ohio"));
        assert!(!is_branding_bucket("eg-pz-prod-s3-attachments-ohio"));
    }

    #[test]
    fn test_branding_requires_whole_segment() {
        assert!(!is_branding_bucket("eg-pz-prod-s3-rebranding-ohio"));
        assert!(is_branding_bucket("branding"));
    }
}
