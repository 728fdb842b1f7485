//! Per-job results and batch reports.

use std::path::PathBuf;

use serde::Serialize;

use super::errors::JobError;

/// How a job ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// The tool ran and exited with 0.
    Succeeded,
    /// Naming, startup or the tool itself failed.
    Failed,
    /// Planned and printed, nothing executed.
    DryRun,
}

/// Result of processing a single input.
#[derive(Debug, Clone, Serialize)]
pub struct JobResult {
    /// Input that was processed.
    pub input: PathBuf,
    /// Output path, if one was derived.
    pub output: Option<PathBuf>,
    /// Final status.
    pub status: JobStatus,
    /// Tool exit code when the tool ran and failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    /// Error message (if failed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobResult {
    /// Create a successful result.
    pub fn success(input: PathBuf, output: PathBuf) -> Self {
        Self {
            input,
            output: Some(output),
            status: JobStatus::Succeeded,
            exit_code: None,
            error: None,
        }
    }

    /// Create a dry-run result.
    pub fn dry_run(input: PathBuf, output: PathBuf) -> Self {
        Self {
            input,
            output: Some(output),
            status: JobStatus::DryRun,
            exit_code: None,
            error: None,
        }
    }

    /// Create a failed result.
    pub fn failure(input: PathBuf, output: Option<PathBuf>, error: &JobError) -> Self {
        Self {
            input,
            output,
            status: JobStatus::Failed,
            exit_code: error.exit_code(),
            error: Some(error.to_string()),
        }
    }

    /// Whether the job did not fail.
    pub fn is_ok(&self) -> bool {
        self.status != JobStatus::Failed
    }
}

/// Results of a whole run, in processing order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    /// One entry per job that was attempted.
    pub results: Vec<JobResult>,
    /// Set when `stop_on_error` ended the run before all inputs were tried.
    pub stopped_early: bool,
}

impl BatchReport {
    /// Number of attempted jobs.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether no job was attempted (e.g. nothing matched).
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Jobs that succeeded.
    pub fn succeeded(&self) -> usize {
        self.count(JobStatus::Succeeded)
    }

    /// Jobs that failed.
    pub fn failed(&self) -> usize {
        self.count(JobStatus::Failed)
    }

    /// Jobs that were only planned.
    pub fn dry_runs(&self) -> usize {
        self.count(JobStatus::DryRun)
    }

    /// True when nothing failed (an empty report is a success).
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// One-line summary for logs.
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{} job(s): {} succeeded, {} failed",
            self.len(),
            self.succeeded(),
            self.failed()
        );
        if self.dry_runs() > 0 {
            summary.push_str(&format!(", {} dry run", self.dry_runs()));
        }
        if self.stopped_early {
            summary.push_str(" (stopped after first failure)");
        }
        summary
    }

    fn count(&self, status: JobStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_result_success() {
        let result = JobResult::success(PathBuf::from("A.mp4"), PathBuf::from("A_p0d5_1234.mp4"));

        assert!(result.is_ok());
        assert_eq!(result.status, JobStatus::Succeeded);
        assert!(result.output.is_some());
        assert!(result.error.is_none());
    }

    #[test]
    fn job_result_failure() {
        let error = JobError::InputNotFound(PathBuf::from("A.mp4"));
        let result = JobResult::failure(PathBuf::from("A.mp4"), None, &error);

        assert!(!result.is_ok());
        assert!(result.output.is_none());
        assert_eq!(result.error.as_deref(), Some("Input file not found: A.mp4"));
    }

    #[test]
    fn empty_report_is_success() {
        let report = BatchReport::default();
        assert!(report.is_empty());
        assert!(report.is_success());
        assert_eq!(report.summary(), "0 job(s): 0 succeeded, 0 failed");
    }

    #[test]
    fn report_counts_and_serializes() {
        let error = JobError::InputNotFound(PathBuf::from("B.mp4"));
        let report = BatchReport {
            results: vec![
                JobResult::success(PathBuf::from("A.mp4"), PathBuf::from("A_x.mp4")),
                JobResult::failure(PathBuf::from("B.mp4"), None, &error),
            ],
            stopped_early: true,
        };

        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 1);
        assert!(!report.is_success());
        assert!(report.summary().ends_with("(stopped after first failure)"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["results"][0]["status"], "succeeded");
        assert_eq!(json["results"][1]["status"], "failed");
        assert!(json["results"][0].get("error").is_none());
        assert_eq!(json["stopped_early"], true);
    }
}
