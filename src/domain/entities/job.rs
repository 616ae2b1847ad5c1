use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Item count assumed when the backend does not report one.
pub const DEFAULT_TOTAL_ITEMS: u64 = 100;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JobType {
    Categories,
    Products,
}

impl JobType {
    pub fn title(&self) -> &'static str {
        match self {
            JobType::Categories => "Category import",
            JobType::Products => "Product import",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Cancelled => "cancelled",
        }
    }

    /// Pending and running jobs are polled.
    pub fn is_active(&self) -> bool {
        matches!(self, JobStatus::Pending | JobStatus::Running)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for JobStatus {
    type Err = String;

    // The Celery-backed endpoint reports upper-case enum values.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(JobStatus::Pending),
            "running" => Ok(JobStatus::Running),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed),
            "cancelled" | "canceled" => Ok(JobStatus::Cancelled),
            _ => Err(format!("Invalid job status: {}", s)),
        }
    }
}

impl<'de> Deserialize<'de> for JobStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Coarse stage reconstructed from the raw percentage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Authentication,
    Navigation,
    Extraction,
    Saving,
    Completed,
}

impl Phase {
    /// Breakpoints: [0,10) [10,20) [20,90) [90,100) 100.
    pub fn from_progress(progress: u8) -> Self {
        match progress {
            0..=9 => Phase::Authentication,
            10..=19 => Phase::Navigation,
            20..=89 => Phase::Extraction,
            90..=99 => Phase::Saving,
            _ => Phase::Completed,
        }
    }

    pub fn number(&self) -> u8 {
        match self {
            Phase::Authentication => 1,
            Phase::Navigation => 2,
            Phase::Extraction => 3,
            Phase::Saving => 4,
            Phase::Completed => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Authentication => "authentication",
            Phase::Navigation => "navigation",
            Phase::Extraction => "extraction",
            Phase::Saving => "saving",
            Phase::Completed => "completed",
        }
    }

    /// Header shown above the progress bar, e.g. `STEP 3: EXTRACTION`.
    pub fn step_label(&self) -> String {
        format!("STEP {}: {}", self.number(), self.as_str().to_uppercase())
    }
}

/// `floor((progress - 20) / 70 * total)`, in integer arithmetic.
pub fn estimate_items(progress: u8, total: u64) -> u64 {
    u64::from(progress.saturating_sub(20)) * total / 70
}

/// Body of `GET .../status/{job_id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobStatusReport {
    pub status: JobStatus,
    #[serde(default, deserialize_with = "progress_from_number")]
    pub progress: u8,
    #[serde(default)]
    pub total_items: Option<u64>,
    #[serde(default)]
    pub current_item: Option<u64>,
    #[serde(default)]
    pub processed_items: Option<u64>,
    #[serde(default)]
    pub current_sku: Option<String>,
    #[serde(default)]
    pub result: Option<Value>,
}

impl JobStatusReport {
    pub fn phase(&self) -> Phase {
        Phase::from_progress(self.progress)
    }

    fn sku(&self) -> Option<&str> {
        let top_level = self.current_sku.as_deref().filter(|s| !s.is_empty());
        top_level.or_else(|| {
            self.result
                .as_ref()?
                .get("current_sku")?
                .as_str()
                .filter(|s| !s.is_empty())
        })
    }

    /// Human-readable status line for the current phase.
    pub fn detail(&self) -> String {
        match self.phase() {
            Phase::Authentication => "Signing in to the importer...".to_string(),
            Phase::Navigation => "Navigating to the selected category...".to_string(),
            Phase::Extraction => {
                let total = self
                    .total_items
                    .filter(|total| *total > 0)
                    .unwrap_or(DEFAULT_TOTAL_ITEMS);
                let current = self.current_item.unwrap_or(0);

                if current > 0 {
                    match self.sku() {
                        Some(sku) => format!("Importing product {}/{} ({})", current, total, sku),
                        None => format!("Importing product {}/{}", current, total),
                    }
                } else {
                    format!(
                        "Importing product {}/{}",
                        estimate_items(self.progress, total),
                        total
                    )
                }
            }
            Phase::Saving => "Saving products to the database...".to_string(),
            Phase::Completed => format!(
                "Import finished: {} products",
                self.processed_items.unwrap_or(0)
            ),
        }
    }
}

/// The single tracked job. Field names follow the record the web dashboard
/// kept under `currentImportJob`, so either side can read the other's value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImportJob {
    pub job_id: String,
    pub job_type: JobType,
    pub status: JobStatus,
    #[serde(deserialize_with = "progress_from_number")]
    pub progress: u8,
    pub current_step: String,
    pub detailed_status: String,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub is_minimized: bool,
}

/// Partial update merged into the tracked job.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobUpdate {
    pub status: Option<JobStatus>,
    pub progress: Option<u8>,
    pub current_step: Option<String>,
    pub detailed_status: Option<String>,
    pub is_minimized: Option<bool>,
}

impl JobUpdate {
    pub fn cancelled() -> Self {
        Self {
            status: Some(JobStatus::Cancelled),
            progress: Some(0),
            current_step: Some("CANCELLED".to_string()),
            detailed_status: Some("Import cancelled by the user".to_string()),
            is_minimized: None,
        }
    }
}

impl From<&JobStatusReport> for JobUpdate {
    fn from(report: &JobStatusReport) -> Self {
        Self {
            status: Some(report.status),
            progress: Some(report.progress),
            current_step: Some(report.phase().step_label()),
            detailed_status: Some(report.detail()),
            is_minimized: None,
        }
    }
}

impl ImportJob {
    pub fn new(job_id: String, job_type: JobType, started_at: DateTime<Utc>) -> Self {
        Self {
            job_id,
            job_type,
            status: JobStatus::Pending,
            progress: 0,
            current_step: "Starting...".to_string(),
            detailed_status: "Preparing import".to_string(),
            started_at,
            is_minimized: false,
        }
    }

    pub fn apply(&mut self, update: JobUpdate) {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(progress) = update.progress {
            self.progress = progress.min(100);
        }
        if let Some(step) = update.current_step {
            self.current_step = step;
        }
        if let Some(detail) = update.detailed_status {
            self.detailed_status = detail;
        }
        if let Some(minimized) = update.is_minimized {
            self.is_minimized = minimized;
        }
    }

    pub fn phase(&self) -> Phase {
        Phase::from_progress(self.progress)
    }

    /// Wall-clock time since start as `MM:SS`.
    pub fn elapsed_display(&self, now: DateTime<Utc>) -> String {
        let elapsed = (now - self.started_at).num_seconds().max(0);
        format!("{:02}:{:02}", elapsed / 60, elapsed % 60)
    }
}

fn progress_from_number<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(raw.map(|p| p.clamp(0.0, 100.0).floor() as u8).unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn report(progress: u8) -> JobStatusReport {
        JobStatusReport {
            status: JobStatus::Running,
            progress,
            total_items: None,
            current_item: None,
            processed_items: None,
            current_sku: None,
            result: None,
        }
    }

    #[test]
    fn test_phase_breakpoints() {
        let cases = [
            (0, Phase::Authentication),
            (9, Phase::Authentication),
            (10, Phase::Navigation),
            (19, Phase::Navigation),
            (20, Phase::Extraction),
            (89, Phase::Extraction),
            (90, Phase::Saving),
            (99, Phase::Saving),
            (100, Phase::Completed),
        ];

        for (progress, expected) in cases {
            assert_eq!(Phase::from_progress(progress), expected, "progress {}", progress);
        }
    }

    #[test]
    fn test_step_label() {
        assert_eq!(Phase::Extraction.step_label(), "STEP 3: EXTRACTION");
        assert_eq!(Phase::Completed.step_label(), "STEP 5: COMPLETED");
    }

    #[test]
    fn test_extraction_detail_uses_backend_counts() {
        let mut r = report(50);
        r.total_items = Some(40);
        r.current_item = Some(12);
        r.result = Some(serde_json::json!({ "current_sku": "NOR-123" }));

        assert_eq!(r.detail(), "Importing product 12/40 (NOR-123)");

        r.current_sku = Some("TOP-1".to_string());
        assert_eq!(r.detail(), "Importing product 12/40 (TOP-1)");
    }

    #[test]
    fn test_extraction_detail_estimates_without_current_item() {
        let mut r = report(55);
        r.total_items = Some(70);
        // floor((55 - 20) / 70 * 70) = 35
        assert_eq!(r.detail(), "Importing product 35/70");

        // zero total falls back to the default
        r.total_items = Some(0);
        r.progress = 41;
        // floor(21 / 70 * 100) = 30
        assert_eq!(r.detail(), "Importing product 30/100");
    }

    #[test]
    fn test_completed_detail_reports_processed_items() {
        let mut r = report(100);
        r.processed_items = Some(87);
        assert_eq!(r.detail(), "Import finished: 87 products");
    }

    #[test]
    fn test_status_report_is_lenient() {
        let r: JobStatusReport = serde_json::from_value(serde_json::json!({
            "job_id": "abc",
            "status": "RUNNING",
            "progress": 42.7,
            "total_items": null,
            "error": null
        }))
        .unwrap();

        assert_eq!(r.status, JobStatus::Running);
        assert_eq!(r.progress, 42);
        assert_eq!(r.total_items, None);

        let r: JobStatusReport =
            serde_json::from_value(serde_json::json!({ "status": "pending", "progress": null }))
                .unwrap();
        assert_eq!(r.progress, 0);
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let parsed: Result<JobStatusReport, _> =
            serde_json::from_value(serde_json::json!({ "status": "paused" }));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_stored_record_uses_dashboard_field_names() {
        let started = Utc.with_ymd_and_hms(2025, 10, 16, 19, 55, 0).unwrap();
        let job = ImportJob::new("job-1".to_string(), JobType::Products, started);
        let value = serde_json::to_value(&job).unwrap();

        assert_eq!(value["jobId"], "job-1");
        assert_eq!(value["jobType"], "products");
        assert_eq!(value["status"], "pending");
        assert_eq!(value["isMinimized"], false);

        let stored = r#"{"jobId":"job-2","jobType":"categories","status":"running","progress":35,
            "currentStep":"STEP 3: EXTRACTION","detailedStatus":"Importing product 3/10",
            "startedAt":"2025-10-16T19:55:00.000Z","isMinimized":true}"#;
        let job: ImportJob = serde_json::from_str(stored).unwrap();
        assert_eq!(job.job_id, "job-2");
        assert_eq!(job.started_at, started);
        assert!(job.is_minimized);
    }

    #[test]
    fn test_apply_merges_only_present_fields() {
        let started = Utc.with_ymd_and_hms(2025, 10, 16, 19, 55, 0).unwrap();
        let mut job = ImportJob::new("job-1".to_string(), JobType::Products, started);

        job.apply(JobUpdate {
            progress: Some(150),
            ..Default::default()
        });
        assert_eq!(job.progress, 100);
        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.current_step, "Starting...");

        job.apply(JobUpdate::cancelled());
        assert_eq!(job.status, JobStatus::Cancelled);
        assert_eq!(job.progress, 0);
    }

    #[test]
    fn test_elapsed_display() {
        let started = Utc.with_ymd_and_hms(2025, 10, 16, 19, 55, 0).unwrap();
        let job = ImportJob::new("job-1".to_string(), JobType::Categories, started);

        assert_eq!(job.elapsed_display(started), "00:00");
        assert_eq!(
            job.elapsed_display(started + chrono::Duration::seconds(125)),
            "02:05"
        );
        assert_eq!(
            job.elapsed_display(started - chrono::Duration::seconds(5)),
            "00:00"
        );
    }
}
