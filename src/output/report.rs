//! Run report
//!
//! Collects one outcome per target while a run progresses and prints a
//! summary at the end.

use crate::state::TargetState;
use chrono::{DateTime, Utc};

/// What happened to one target
#[derive(Debug, Clone)]
pub struct TargetOutcome {
    /// Output name, e.g. "laptops.csv"
    pub destination: String,

    pub url: String,

    /// Terminal state the target ended in
    pub state: TargetState,

    /// Records written (0 when failed)
    pub records: usize,

    /// Whether the page was expanded in a browser session
    pub paginated: bool,

    /// Error message for failed targets
    pub error: Option<String>,
}

impl TargetOutcome {
    pub fn done(destination: &str, url: &str, records: usize, paginated: bool) -> Self {
        Self {
            destination: destination.to_string(),
            url: url.to_string(),
            state: TargetState::Done,
            records,
            paginated,
            error: None,
        }
    }

    pub fn failed(destination: &str, url: &str, error: String) -> Self {
        Self {
            destination: destination.to_string(),
            url: url.to_string(),
            state: TargetState::Failed,
            records: 0,
            paginated: false,
            error: Some(error),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.state == TargetState::Failed
    }
}

/// Summary of a whole run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub outcomes: Vec<TargetOutcome>,
}

impl RunReport {
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            outcomes: Vec::new(),
        }
    }

    pub fn record(&mut self, outcome: TargetOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Total number of records written across all targets
    pub fn total_records(&self) -> usize {
        self.outcomes.iter().map(|o| o.records).sum()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    pub fn succeeded_count(&self) -> usize {
        self.outcomes.len() - self.failed_count()
    }

    /// True when no target failed
    pub fn is_success(&self) -> bool {
        self.failed_count() == 0
    }

    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}

/// Prints the report to stdout in a formatted manner
pub fn print_report(report: &RunReport) {
    println!("=== Harvest Report ===\n");

    println!("Started:  {}", report.started_at.to_rfc3339());
    if let Some(finished) = report.finished_at {
        println!("Finished: {}", finished.to_rfc3339());
    }
    if let Some(seconds) = report.duration_seconds() {
        println!("Duration: {}s", seconds);
    }
    println!();

    println!("Targets ({}):", report.outcomes.len());
    for outcome in &report.outcomes {
        match &outcome.error {
            None => println!(
                "  ✓ {} - {} records{}",
                outcome.destination,
                outcome.records,
                if outcome.paginated { " (expanded)" } else { "" }
            ),
            Some(error) => println!("  ✗ {} - {}", outcome.destination, error),
        }
    }
    println!();

    println!(
        "Total: {} records in {} files, {} failed",
        report.total_records(),
        report.succeeded_count(),
        report.failed_count()
    );
}
