use anyhow::{Context, Result};
use log::debug;
use s3_policy_drift_core::PolicyCheckResult;
use serde::Serialize;
use std::io::{self, Write};

pub(crate) fn note(msg: &str) {
    let _ = writeln!(io::stderr(), "s3-policy-drift: {}", msg);
}

pub(crate) fn warn(msg: &str) {
    let _ = writeln!(io::stderr(), "s3-policy-drift (warning): {}", msg);
}

pub(crate) fn print_check_result(result: &PolicyCheckResult) {
    let stderr = io::stderr();
    let mut w = stderr.lock();
    let _ = writeln!(w, "Policy Drift Check");
    let _ = writeln!(w, "Bucket:   {}", result.bucket_name);
    let _ = writeln!(w, "Baseline: {}", result.baseline_file_path.display());
    let _ = writeln!(
        w,
        "Shape:    {}",
        if result.branding_bucket {
            "branding (public-read statement expected)"
        } else {
            "standard"
        }
    );
    if result.passed {
        let _ = writeln!(w, "Status:   PASS (live policy matches baseline)");
    } else if let Some(message) = &result.error_message {
        let _ = writeln!(w, "Status:   INCONCLUSIVE (infrastructure failure)");
        let _ = writeln!(w, "Error:    {}", message);
    } else {
        let _ = writeln!(w, "Status:   DRIFT DETECTED");
        if let Some(diff) = &result.diff_details {
            let _ = writeln!(w);
            let _ = writeln!(w, "Differences from baseline:");
            let _ = writeln!(w, "{}", diff);
        }
    }
    let _ = writeln!(w);
}

/// Suite-level report emitted by `check-all`
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct SuiteReport {
    /// Number of buckets checked
    pub checked: usize,
    /// Checks whose live policy matched the baseline
    pub passed: usize,
    /// Checks where both documents were retrieved but disagree
    pub drifted: usize,
    /// Checks that could not be completed
    pub inconclusive: usize,
    /// Per-bucket results
    pub results: Vec<PolicyCheckResult>,
}

impl SuiteReport {
    pub(crate) fn from_results(results: Vec<PolicyCheckResult>) -> Self {
        Self {
            checked: results.len(),
            passed: results.iter().filter(|r| r.passed).count(),
            drifted: results.iter().filter(|r| r.drifted()).count(),
            inconclusive: results.iter().filter(|r| r.inconclusive()).count(),
            results,
        }
    }
}

/// Output a serializable report as JSON to stdout
pub(crate) fn output_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    debug!("Formatting report output as JSON (pretty: {})", pretty);

    let json_output = if pretty {
        serde_json::to_string_pretty(value).context("Failed to serialize report to pretty JSON")?
    } else {
        serde_json::to_string(value).context("Failed to serialize report to JSON")?
    };

    // Output to stdout (not using println! to avoid extra newline in compact mode)
    print!("{}", json_output);
    if pretty {
        println!(); // Add newline for pretty output
    }

    debug!("Report JSON written to stdout");
    Ok(())
}
