//! Standalone CLI for S3 bucket policy drift checks.

mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use s3_policy_drift_core::{api, is_branding_bucket, BaselineStore, CheckerConfig, StatementOrder};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::output::SuiteReport;

const EXIT_CLEAN: u8 = 0;
const EXIT_DRIFT: u8 = 1;
const EXIT_INFRA_FAILURE: u8 = 2;

#[derive(Parser)]
#[command(
    name = "s3-policy-drift",
    version,
    about = "Detects drift between live S3 bucket policies and checked-in baseline documents"
)]
struct Cli {
    /// Path to the checker configuration file (JSON)
    #[arg(
        long,
        global = true,
        default_value = "drift-config.json",
        env = "S3_POLICY_DRIFT_CONFIG"
    )]
    config: PathBuf,

    /// Override the configured baselines directory
    #[arg(long, global = true)]
    baselines_dir: Option<PathBuf>,

    /// Override the configured AWS profile
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Override the configured AWS region
    #[arg(long, global = true)]
    region: Option<String>,

    /// Treat statement-array order as significant during comparison
    #[arg(long, global = true)]
    strict_statement_order: bool,

    /// Pretty-print JSON output (default when stdout is a terminal)
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check one bucket's live policy against its baseline
    Check {
        /// Bucket name from the configured inventory
        bucket: String,
    },
    /// Run preconditions, then check every configured bucket
    CheckAll,
    /// Verify AWS access under the configured profile
    VerifyAccess,
    /// Verify every configured bucket has a baseline document
    VerifyBaselines,
    /// List the configured bucket inventory with shape annotations
    ListBuckets,
}

/// Inventory entry emitted by `list-buckets`
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct BucketInventoryEntry {
    bucket_name: String,
    branding_bucket: bool,
    baseline_file_path: PathBuf,
}

fn load_config(cli: &Cli) -> Result<CheckerConfig> {
    let mut config = CheckerConfig::from_file(&cli.config)?;
    if let Some(baselines_dir) = &cli.baselines_dir {
        config.baselines_dir = baselines_dir.clone();
    }
    if let Some(profile) = &cli.profile {
        config.profile = Some(profile.clone());
    }
    if let Some(region) = &cli.region {
        config.region = Some(region.clone());
    }
    if cli.strict_statement_order {
        config.statement_order = StatementOrder::Significant;
    }
    config.validate()?;
    Ok(config)
}

async fn run(cli: Cli) -> Result<u8> {
    let pretty = cli.pretty || atty::is(atty::Stream::Stdout);
    let config = load_config(&cli)?;

    match &cli.command {
        Command::Check { bucket } => {
            api::verify_access(&config).await?;
            let result = api::check_bucket(&config, bucket).await?;
            output::print_check_result(&result);
            output::output_json(&result, pretty)?;
            if result.passed {
                Ok(EXIT_CLEAN)
            } else if result.drifted() {
                Ok(EXIT_DRIFT)
            } else {
                Ok(EXIT_INFRA_FAILURE)
            }
        }
        Command::CheckAll => {
            let results = api::check_all(&config).await?;
            for result in &results {
                output::print_check_result(result);
            }
            let report = SuiteReport::from_results(results);
            output::output_json(&report, pretty)?;
            if report.drifted > 0 {
                Ok(EXIT_DRIFT)
            } else if report.inconclusive > 0 {
                Ok(EXIT_INFRA_FAILURE)
            } else {
                Ok(EXIT_CLEAN)
            }
        }
        Command::VerifyAccess => {
            let account = api::verify_access(&config).await?;
            output::note(&format!("AWS access verified for account {}", account));
            Ok(EXIT_CLEAN)
        }
        Command::VerifyBaselines => {
            api::verify_baselines(&config)?;
            output::note(&format!(
                "All {} baseline documents present under {}",
                config.buckets.len(),
                config.baselines_dir.display()
            ));
            Ok(EXIT_CLEAN)
        }
        Command::ListBuckets => {
            let store = BaselineStore::new(config.baselines_dir.clone());
            let inventory: Vec<BucketInventoryEntry> = config
                .buckets
                .iter()
                .map(|bucket_name| BucketInventoryEntry {
                    bucket_name: bucket_name.clone(),
                    branding_bucket: is_branding_bucket(bucket_name),
                    baseline_file_path: store.baseline_file_path(bucket_name),
                })
                .collect();
            output::output_json(&inventory, pretty)?;
            Ok(EXIT_CLEAN)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            output::warn(&format!("{e:#}"));
            ExitCode::from(EXIT_INFRA_FAILURE)
        }
    }
}
