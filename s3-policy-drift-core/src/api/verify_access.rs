use anyhow::{Context, Result};

use crate::aws::cli_fetcher::AwsCliPolicyFetcher;
use crate::checker::DriftChecker;
use crate::config::CheckerConfig;

/// Verify AWS access under the configured profile, returning the caller
/// account id.
pub async fn verify_access(config: &CheckerConfig) -> Result<String> {
    let checker = DriftChecker::new(
        config.clone(),
        Box::new(AwsCliPolicyFetcher::new(config.clone())),
    );

    checker
        .verify_access()
        .await
        .context("AWS access verification failed")
}
