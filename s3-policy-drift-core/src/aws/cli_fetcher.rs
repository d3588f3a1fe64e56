use async_trait::async_trait;
use log::{debug, info};
use serde_json::{from_str, Value as JsonValue};
use std::process::Command;

use crate::aws::sts::{caller_account_id, require_expected_account, sts_client};
use crate::aws::{AwsError, AwsResult, PolicyFetcher};
use crate::config::CheckerConfig;

/// Live policy fetcher that shells out to the AWS CLI.
///
/// `GetBucketPolicy` returns the policy document as a JSON string field, so
/// the invocation uses `--query Policy --output text` to receive the raw
/// document on stdout.
pub struct AwsCliPolicyFetcher {
    config: CheckerConfig,
}

impl AwsCliPolicyFetcher {
    /// constructor
    #[must_use]
    pub fn new(config: CheckerConfig) -> Self {
        Self { config }
    }

    fn command_args(&self, bucket_name: &str) -> Vec<String> {
        let mut args = vec![
            "s3api".to_string(),
            "get-bucket-policy".to_string(),
            "--bucket".to_string(),
            bucket_name.to_string(),
            "--query".to_string(),
            "Policy".to_string(),
            "--output".to_string(),
            "text".to_string(),
        ];
        if let Some(profile) = &self.config.profile {
            args.push("--profile".to_string());
            args.push(profile.clone());
        }
        if let Some(region) = &self.config.region {
            args.push("--region".to_string());
            args.push(region.clone());
        }
        args
    }

    fn retrieve_policy_text(&self, bucket_name: &str) -> AwsResult<String> {
        info!("Retrieving live policy for bucket {}", bucket_name);

        let args = self.command_args(bucket_name);
        let mut cmd = Command::new("aws");
        cmd.args(&args);

        let cmd_str = format!("aws {}", args.join(" "));
        let output = cmd.output().map_err(|e| AwsError::PolicyFetchError {
            bucket_name: bucket_name.to_string(),
            message: format!("failed to run `{}`: {}", cmd_str, e),
        })?;

        debug!(
            "Policy fetch output for {}: {:?}",
            bucket_name,
            String::from_utf8_lossy(&output.stdout)
        );

        if !output.status.success() {
            Err(AwsError::PolicyFetchError {
                bucket_name: bucket_name.to_string(),
                message: format!(
                    "`{}` exited with {}: {}",
                    cmd_str,
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            })
        } else {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        }
    }
}

#[async_trait]
impl PolicyFetcher for AwsCliPolicyFetcher {
    async fn verify_access(&self) -> AwsResult<String> {
        let client = sts_client(&self.config).await;
        let account = caller_account_id(&client).await?;
        require_expected_account(&account, self.config.expected_account_id.as_deref())?;
        Ok(account)
    }

    async fn fetch_policy(&self, bucket_name: &str) -> AwsResult<JsonValue> {
        let text = self.retrieve_policy_text(bucket_name)?;
        from_str(&text).map_err(|e| AwsError::PolicyFetchError {
            bucket_name: bucket_name.to_string(),
            message: format!("live policy is not valid JSON: {}", e),
        })
    }
}
