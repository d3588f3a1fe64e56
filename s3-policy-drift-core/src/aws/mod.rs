//! AWS boundary: STS identity verification and live policy retrieval.

/// aws cli policy fetcher
pub mod cli_fetcher;

/// sts calls
pub mod sts;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use thiserror::Error;

#[derive(Error, Debug)]
/// AWS Errors from SDK calls and CLI invocations
pub enum AwsError {
    #[error("AWS configuration error: {0}")]
    /// config error
    ConfigError(String),
    #[error("AWS SDK error: {0}")]
    /// errors from SDK output
    SdkError(String),
    #[error("Policy fetch error for bucket '{bucket_name}': {message}")]
    /// errors from the bucket policy CLI invocation
    PolicyFetchError {
        /// bucket whose policy was requested
        bucket_name: String,
        /// failure detail, including CLI stderr when present
        message: String,
    },
}

/// Type of AWS Result extending Result
pub type AwsResult<T> = Result<T, AwsError>;

/// Retrieval seam for live policy documents.
///
/// The checker only requires "given a bucket name, return its live policy
/// JSON or an error"; the transport (CLI shell-out, SDK call, test double)
/// is the implementor's concern.
#[async_trait]
pub trait PolicyFetcher: Send + Sync {
    /// Verify credentials are usable, returning the caller account id.
    async fn verify_access(&self) -> AwsResult<String>;

    /// Fetch the live policy document for `bucket_name`.
    async fn fetch_policy(&self, bucket_name: &str) -> AwsResult<JsonValue>;
}
