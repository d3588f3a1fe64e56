use aws_sdk_sts::Client as StsClient;

use crate::aws::{AwsError, AwsResult};
use crate::config::CheckerConfig;

/// Build an STS client honoring the configured profile and region.
///
/// Falls back to the standard credential provider chain when the config
/// leaves profile or region unset.
pub async fn sts_client(config: &CheckerConfig) -> StsClient {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
    if let Some(profile) = &config.profile {
        loader = loader.profile_name(profile);
    }
    if let Some(region) = &config.region {
        loader = loader.region(aws_config::Region::new(region.clone()));
    }
    let sdk_config = loader.load().await;
    StsClient::new(&sdk_config)
}

/// Return the current caller account ID using STS GetCallerIdentity.
///
/// This is the suite-wide access precondition: every bucket check depends on
/// it, and it doubles as a same-account guardrail when the configuration pins
/// an expected account.
///
/// # Arguments
///
/// * `client` - STS client to use for the API call
pub async fn caller_account_id(client: &StsClient) -> AwsResult<String> {
    let out = client
        .get_caller_identity()
        .send()
        .await
        .map_err(|e| AwsError::SdkError(format!("STS GetCallerIdentity failed: {}", e)))?;
    let acct = out
        .account()
        .map(|s| s.to_string())
        .ok_or_else(|| AwsError::SdkError("STS GetCallerIdentity missing Account".to_string()))?;
    Ok(acct)
}

/// Enforce the expected-account guardrail when one is configured.
pub fn require_expected_account(
    caller_account: &str,
    expected: Option<&str>,
) -> AwsResult<()> {
    match expected {
        Some(expected) if expected != caller_account => Err(AwsError::ConfigError(format!(
            "caller identity belongs to account {} but configuration expects account {}",
            caller_account, expected
        ))),
        _ => Ok(()),
    }
}
