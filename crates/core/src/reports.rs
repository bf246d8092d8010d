//! Derived, never-persisted views computed per request.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Per-segment statistics over a set of segment assignments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SegmentStat {
    pub segment_id: String,
    pub segment_name: String,
    /// Number of assignment records in the segment (not distinct customers).
    pub customer_count: u64,
    /// Share of all assignments, 0–100. Not rounded.
    pub percentage: f64,
    /// Mean score rounded half-up to two fraction digits.
    pub avg_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Priority {
    High,
    Medium,
}

/// A recommendation joined with its customer, product and segment, explained
/// and prioritized for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EnrichedRecommendation {
    pub customer_id: Option<i64>,
    pub customer_name: Option<String>,
    pub segment: Option<String>,
    pub product_id: Option<i64>,
    pub product_name: Option<String>,
    pub product_category: Option<String>,
    pub confidence: Option<f64>,
    pub rationale: String,
    pub priority: Priority,
}

/// Result of one external model process run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TrainingOutcome {
    pub succeeded: bool,
    /// Merged stdout and stderr, one `\n` per line. On launch failure or
    /// timeout this holds the error message instead.
    pub combined_output: String,
    /// `None` when the process never ran to an exit status.
    pub exit_code: Option<i32>,
}

impl TrainingOutcome {
    pub fn exited(exit_code: i32, combined_output: String) -> Self {
        Self {
            succeeded: exit_code == 0,
            combined_output,
            exit_code: Some(exit_code),
        }
    }

    pub fn aborted(message: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            combined_output: message.into(),
            exit_code: None,
        }
    }
}
