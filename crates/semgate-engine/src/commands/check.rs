//! Version-compliance check orchestration.
//!
//! ## Pipeline (in order):
//! 1. Parse both declared versions (fatal on garbage, even for identical files)
//! 2. Resolve the new artifact, then the old one (missing-old escape hatch)
//! 3. Load the exclusion list
//! 4. Identical-content short-circuit on the staged files (no diff)
//! 5. Normalize both sides (`.aar` → `classes.jar`)
//! 6. Diff through the supplied `ApiComparator`
//! 7. Write the reports (any failure is fatal, before the verdict)
//! 8. Decide the verdict

use semgate_core::errors::{ExError, ExErrorKind, Result, SemgateError};
use semgate_core::report::{render_html, render_json, render_text, ReportHeader};
use semgate_core::{
    decide, load_exclusions, log_op_end, log_op_error, log_op_start, ApiComparator, ChangeModel,
    DecisionInput, SemanticVersion, Verdict,
};
use semgate_store::{
    atomic_write, normalize, resolve_new, resolve_old, same_content, Artifact, ArtifactLocation,
    OldArtifact,
};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Where the reports go
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTargets {
    pub text: PathBuf,
    pub html: PathBuf,
    pub json: Option<PathBuf>,
}

/// Everything one check needs, as given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRequest {
    /// Path or URL of the previous release
    pub old_location: String,
    pub old_version: String,
    /// Path or URL of the candidate build
    pub new_location: String,
    pub new_version: String,
    pub exclude_list: Option<PathBuf>,
    pub ignore_missing_old: bool,
    pub reports: ReportTargets,
}

/// Result of a completed check
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub verdict: Verdict,
    /// Empty when the diff was skipped
    pub model: ChangeModel,
    /// True when the staged files were byte-identical and no diff ran
    pub identical: bool,
    /// True when the missing old artifact was replaced by the new one
    pub old_substituted: bool,
}

/// Run one version-compliance check.
///
/// # Errors
///
/// Input errors (bad version, non-increasing versions, bad location or
/// pattern), resource errors (missing artifact, fetch failure, malformed
/// archive, unreadable class file) and report write failures. A
/// non-compliant bump is not an error: it is `Verdict::Fail`.
pub fn run_check(request: &CheckRequest, comparator: &dyn ApiComparator) -> Result<CheckOutcome> {
    let start = Instant::now();
    log_op_start!(
        "check",
        old_version = %request.old_version,
        new_version = %request.new_version
    );

    let result = check_pipeline(request, comparator);
    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(outcome) => log_op_end!(
            "check",
            duration_ms = duration_ms,
            verdict = outcome.verdict.label(),
            identical = outcome.identical
        ),
        Err(err) => log_op_error!("check", err.clone(), duration_ms = duration_ms),
    }
    result
}

fn check_pipeline(request: &CheckRequest, comparator: &dyn ApiComparator) -> Result<CheckOutcome> {
    let old_version = SemanticVersion::parse(&request.old_version)?;
    let new_version = SemanticVersion::parse(&request.new_version)?;

    let mut scratch = Scratch::default();
    let new = resolve_new(Artifact::new(
        ArtifactLocation::parse(&request.new_location)?,
        request.new_version.clone(),
    ))?;
    scratch.track(&new, staged(&new)?);
    let old = resolve_old(
        Artifact::new(
            ArtifactLocation::parse(&request.old_location)?,
            request.old_version.clone(),
        ),
        request.ignore_missing_old,
        &new,
    )?;
    scratch.track(old.artifact(), staged(old.artifact())?);

    compare_staged(request, comparator, &old, &new, (&old_version, &new_version), &mut scratch)
}

fn compare_staged(
    request: &CheckRequest,
    comparator: &dyn ApiComparator,
    old: &OldArtifact,
    new: &Artifact,
    (old_version, new_version): (&SemanticVersion, &SemanticVersion),
    scratch: &mut Scratch,
) -> Result<CheckOutcome> {
    let exclusions = load_exclusions(request.exclude_list.as_deref())?;

    let old_path = staged(old.artifact())?;
    let new_path = staged(new)?;
    let header = report_header(old.artifact(), new);

    if same_content(old_path, new_path)? {
        tracing::info!(
            old = %old_path.display(),
            new = %new_path.display(),
            "artifacts are identical, skipping comparison"
        );
        let model = ChangeModel::default();
        write_reports(&request.reports, &header, &model)?;
        let verdict = decide(old_version, new_version, DecisionInput::Identical)?;
        return Ok(CheckOutcome {
            verdict,
            model,
            identical: true,
            old_substituted: old.is_substituted(),
        });
    }

    let old_jar = normalize(old_path, &[new_path])?;
    scratch.track(old.artifact(), &old_jar);
    let new_jar = normalize(new_path, &[old_path, old_jar.as_path()])?;
    scratch.track(new, &new_jar);
    let model = comparator.compare(&old_jar, &new_jar, &exclusions)?;

    write_reports(&request.reports, &header, &model)?;
    let verdict = decide(old_version, new_version, DecisionInput::Changes(&model))?;
    Ok(CheckOutcome {
        verdict,
        model,
        identical: false,
        old_substituted: old.is_substituted(),
    })
}

/// Header naming the artifacts that were compared, as the user located them
fn report_header(old: &Artifact, new: &Artifact) -> ReportHeader {
    ReportHeader {
        old_archive: old.location().to_string(),
        old_version: old.version().to_string(),
        new_archive: new.location().to_string(),
        new_version: new.version().to_string(),
    }
}

fn staged(artifact: &Artifact) -> Result<&Path> {
    artifact.staged_path().ok_or_else(|| {
        ExError::new(ExErrorKind::Internal)
            .with_op("check")
            .with_artifact(artifact.location().to_string())
            .with_message("artifact was not staged")
    })
}

fn write_reports(targets: &ReportTargets, header: &ReportHeader, model: &ChangeModel) -> Result<()> {
    let start = Instant::now();
    log_op_start!("write_reports", change_count = model.change_count());

    let result = write_report_files(targets, header, model);

    let duration_ms = start.elapsed().as_millis() as u64;
    match result {
        Ok(()) => {
            log_op_end!("write_reports", duration_ms = duration_ms);
            Ok(())
        }
        Err(err) => {
            log_op_error!("write_reports", err.clone(), duration_ms = duration_ms);
            Err(err)
        }
    }
}

fn write_report_files(
    targets: &ReportTargets,
    header: &ReportHeader,
    model: &ChangeModel,
) -> Result<()> {
    atomic_write(&targets.text, render_text(header, model).as_bytes())
        .map_err(|e| report_error("text", &targets.text, e))?;
    atomic_write(&targets.html, render_html(header, model).as_bytes())
        .map_err(|e| report_error("HTML", &targets.html, e))?;
    if let Some(json) = &targets.json {
        let rendered = render_json(header, model).map_err(|e| report_error("JSON", json, e))?;
        atomic_write(json, rendered.as_bytes()).map_err(|e| report_error("JSON", json, e))?;
    }
    Ok(())
}

fn report_error(format: &str, path: &Path, cause: ExError) -> ExError {
    ExError::from(SemgateError::Report {
        reason: format!("cannot write the {} report", format),
    })
    .with_op("write_reports")
    .with_artifact(path.display().to_string())
    .with_source(cause)
}

/// Files the run created for remote artifacts; removed when dropped.
/// Local inputs and their extractions are never tracked.
#[derive(Default)]
struct Scratch {
    paths: Vec<PathBuf>,
}

impl Scratch {
    fn track(&mut self, artifact: &Artifact, path: &Path) {
        if artifact.location().is_remote() && !self.paths.iter().any(|p| p == path) {
            self.paths.push(path.to_path_buf());
        }
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        for path in &self.paths {
            if let Err(e) = std::fs::remove_file(path) {
                tracing::debug!(path = %path.display(), error = %e, "could not remove staged download");
            }
        }
    }
}
