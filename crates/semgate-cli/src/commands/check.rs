//! Version compliance check command

use clap::Args;
use semgate_apidiff::SurfaceComparator;
use semgate_core::{ExError, Verdict};
use semgate_engine::{run_check, CheckRequest, ReportTargets};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Previous release: local path, file: URL, or http(s) URL
    #[arg(long = "oldJarUri", visible_alias = "oldJar", value_name = "URI")]
    pub old_jar_uri: String,

    /// Declared version of the previous release
    #[arg(long = "oldJarVersion", value_name = "VERSION")]
    pub old_jar_version: String,

    /// Candidate build (jar or aar)
    #[arg(long = "newJar", value_name = "PATH")]
    pub new_jar: String,

    /// Declared version of the candidate build
    #[arg(long = "newJarVersion", value_name = "VERSION")]
    pub new_jar_version: String,

    /// File of exclusion patterns, one per line; `#` starts a comment
    #[arg(long = "excludeList", value_name = "PATH")]
    pub exclude_list: Option<PathBuf>,

    /// Pass when the previous release does not exist (first release)
    #[arg(long = "ignoreMissingOld")]
    pub ignore_missing_old: bool,

    #[arg(long = "textReport", value_name = "PATH")]
    pub text_report: PathBuf,

    #[arg(long = "htmlReport", value_name = "PATH")]
    pub html_report: PathBuf,

    /// Optional machine-readable report
    #[arg(long = "jsonReport", value_name = "PATH")]
    pub json_report: Option<PathBuf>,
}

impl From<CheckArgs> for CheckRequest {
    fn from(args: CheckArgs) -> Self {
        CheckRequest {
            old_location: args.old_jar_uri,
            old_version: args.old_jar_version,
            new_location: args.new_jar,
            new_version: args.new_jar_version,
            exclude_list: args.exclude_list,
            ignore_missing_old: args.ignore_missing_old,
            reports: ReportTargets {
                text: args.text_report,
                html: args.html_report,
                json: args.json_report,
            },
        }
    }
}

/// Run the check and print diagnostics; returns the process exit code.
///
/// # Errors
///
/// Any fatal error from the pipeline; the caller prints it.
pub fn execute(args: CheckArgs) -> Result<i32, ExError> {
    let request = CheckRequest::from(args);
    let outcome = run_check(&request, &SurfaceComparator::new())?;

    if outcome.old_substituted {
        eprintln!(
            "INFO: Old artifact {} does not exist; compared the new artifact against itself",
            request.old_location
        );
    }

    eprintln!("INFO: Text report written to {}", request.reports.text.display());
    eprintln!("INFO: HTML report written to {}", request.reports.html.display());
    if let Some(json) = &request.reports.json {
        eprintln!("INFO: JSON report written to {}", json.display());
    }

    match &outcome.verdict {
        Verdict::Pass(_) => eprintln!("INFO: {}", outcome.verdict),
        Verdict::Fail { .. } => eprintln!("ERROR: {}", outcome.verdict),
    }
    Ok(outcome.verdict.exit_code())
}
