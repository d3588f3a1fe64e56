use anyhow::{Context, Result};

use crate::baseline::BaselineStore;
use crate::config::CheckerConfig;

/// Confirm a baseline document exists for every known bucket.
///
/// Purely local; no AWS access required.
pub fn verify_baselines(config: &CheckerConfig) -> Result<()> {
    BaselineStore::new(config.baselines_dir.clone())
        .verify_all_present(&config.buckets)
        .context("Baseline presence verification failed")
}
