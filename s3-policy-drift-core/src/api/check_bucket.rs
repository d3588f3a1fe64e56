use anyhow::{Context, Result};

use crate::aws::cli_fetcher::AwsCliPolicyFetcher;
use crate::checker::{DriftChecker, PolicyCheckResult};
use crate::config::CheckerConfig;

/// Check one bucket's live policy against its checked-in baseline.
pub async fn check_bucket(
    config: &CheckerConfig,
    bucket_name: &str,
) -> Result<PolicyCheckResult> {
    let checker = DriftChecker::new(
        config.clone(),
        Box::new(AwsCliPolicyFetcher::new(config.clone())),
    );

    checker
        .check_bucket(bucket_name)
        .await
        .with_context(|| format!("Failed to check bucket '{bucket_name}'"))
}
