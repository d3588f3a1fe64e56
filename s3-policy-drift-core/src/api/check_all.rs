use anyhow::{Context, Result};
use log::debug;

use crate::aws::cli_fetcher::AwsCliPolicyFetcher;
use crate::checker::{DriftChecker, PolicyCheckResult};
use crate::config::CheckerConfig;

/// Run the full drift suite: access and baseline preconditions, then one
/// check per known bucket with per-bucket failure isolation.
pub async fn check_all(config: &CheckerConfig) -> Result<Vec<PolicyCheckResult>> {
    debug!(
        "Running drift suite over {} buckets (baselines: {})",
        config.buckets.len(),
        config.baselines_dir.display()
    );

    let checker = DriftChecker::new(
        config.clone(),
        Box::new(AwsCliPolicyFetcher::new(config.clone())),
    );

    checker
        .check_all()
        .await
        .context("Drift suite preconditions failed")
}
