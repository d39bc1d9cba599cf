//! SquareSum Solver Service Protocol — v1 Frozen Wire Format
//!
//! This crate defines the canonical JSON types exchanged with the remote
//! solver service. Field names are frozen; changing one is a breaking
//! change for every deployed service.
//!
//! # Endpoints
//!
//! | Method | Path                          | Request            | Response           |
//! |--------|-------------------------------|--------------------|--------------------|
//! | GET    | `/health`                     | —                  | `HealthResponse`   |
//! | POST   | `/solve`                      | `SolveRequest`     | `SolveResponse`    |
//! | POST   | `/count/jobs/start`           | `StartCountRequest`| `StartCountResponse` |
//! | GET    | `/count/jobs/{job_id}`        | —                  | `CountJobStatus`   |
//! | POST   | `/count/jobs/{job_id}/cancel` | —                  | (ignored)          |
//!
//! Non-2xx responses carry an `ErrorBody` with a human-readable `detail`.

use serde::{Deserialize, Serialize};

// =============================================================================
// Shared enums
// =============================================================================

/// Value-range rule applied to grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Cells may hold any integer in `1..target`.
    #[default]
    Unbounded,
    /// Cells are additionally capped at `size * size`.
    BoundedBySizeSquared,
}

/// Counting strategy requested by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountMode {
    /// Exhaustive count, no time limit.
    Exact,
    /// Time-boxed exact count with a statistical fallback.
    Auto,
    /// Statistical estimate only.
    Estimate,
}

/// Server-reported lifecycle state of a counting job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Queued,
    Running,
    Canceling,
    Completed,
    Canceled,
    Failed,
}

impl JobState {
    /// Terminal states stop the client's poll loop.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Canceled | Self::Failed)
    }

    /// Wire name, also used in user-facing progress lines.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Canceling => "canceling",
            Self::Completed => "completed",
            Self::Canceled => "canceled",
            Self::Failed => "failed",
        }
    }
}

// =============================================================================
// Solve endpoint
// =============================================================================

/// `POST /solve` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveRequest {
    pub target: i64,
    pub size: usize,
    pub known_grid: Vec<Vec<Option<u32>>>,
    pub game_mode: GameMode,
    #[serde(default)]
    pub trace: bool,
}

/// `POST /solve` success response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveResponse {
    pub solution: Vec<Vec<u32>>,
    pub grid_rows: Vec<String>,
    pub grid_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<Vec<String>>,
}

// =============================================================================
// Counting jobs
// =============================================================================

/// `POST /count/jobs/start` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartCountRequest {
    pub target: i64,
    pub size: usize,
    pub known_grid: Vec<Vec<Option<u32>>>,
    pub game_mode: GameMode,
    pub mode: CountMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_seconds: Option<f64>,
    pub sample_paths: u32,
    pub use_multiprocessing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workers: Option<u32>,
}

/// `POST /count/jobs/start` success response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartCountResponse {
    pub job_id: String,
}

/// `GET /count/jobs/{job_id}` response — one polled snapshot.
///
/// The `exact`/`count`/`estimated_count`/`relative_error`/`mode_used`
/// group is only meaningful when `status` is `completed`; `error` only
/// when `status` is `failed`. `relative_error` is a fraction (0.05 = 5%).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountJobStatus {
    pub job_id: String,
    pub status: JobState,
    #[serde(default)]
    pub lower_bound: u64,
    #[serde(default)]
    pub elapsed_seconds: f64,
    #[serde(default)]
    pub nodes_visited: u64,
    #[serde(default)]
    pub exact: bool,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub estimated_count: Option<f64>,
    #[serde(default)]
    pub relative_error: Option<f64>,
    #[serde(default)]
    pub mode_used: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

// =============================================================================
// Misc
// =============================================================================

/// `GET /health` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Body of any non-2xx service response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_mode_wire_names() {
        assert_eq!(
            serde_json::to_string(&GameMode::Unbounded).unwrap(),
            "\"unbounded\"",
        );
        assert_eq!(
            serde_json::to_string(&GameMode::BoundedBySizeSquared).unwrap(),
            "\"bounded_by_size_squared\"",
        );
    }

    #[test]
    fn job_state_terminality() {
        assert!(!JobState::Queued.is_terminal());
        assert!(!JobState::Running.is_terminal());
        assert!(!JobState::Canceling.is_terminal());
        assert!(JobState::Completed.is_terminal());
        assert!(JobState::Canceled.is_terminal());
        assert!(JobState::Failed.is_terminal());
    }

    #[test]
    fn start_request_omits_absent_options() {
        let req = StartCountRequest {
            target: 15,
            size: 3,
            known_grid: vec![vec![None; 3]; 3],
            game_mode: GameMode::Unbounded,
            mode: CountMode::Exact,
            max_seconds: None,
            sample_paths: 200,
            use_multiprocessing: false,
            workers: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["mode"], "exact");
        assert!(json.get("max_seconds").is_none());
        assert!(json.get("workers").is_none());
        assert_eq!(json["known_grid"][0][0], serde_json::Value::Null);
    }

    // Golden decode: a mid-flight snapshot as the service emits it,
    // with the completion-only fields absent entirely.
    #[test]
    fn status_decodes_without_completion_fields() {
        let raw = r#"{
            "job_id": "j-42",
            "status": "running",
            "lower_bound": 3,
            "elapsed_seconds": 12.4,
            "nodes_visited": 90817
        }"#;
        let snap: CountJobStatus = serde_json::from_str(raw).unwrap();
        assert_eq!(snap.status, JobState::Running);
        assert_eq!(snap.lower_bound, 3);
        assert_eq!(snap.count, None);
        assert_eq!(snap.error, None);
        assert!(!snap.exact);
    }

    #[test]
    fn status_decodes_completed_exact() {
        let raw = r#"{
            "job_id": "j-42",
            "status": "completed",
            "lower_bound": 8,
            "elapsed_seconds": 2.1,
            "nodes_visited": 5512,
            "exact": true,
            "count": 8,
            "estimated_count": null,
            "relative_error": null,
            "mode_used": "exact",
            "error": null
        }"#;
        let snap: CountJobStatus = serde_json::from_str(raw).unwrap();
        assert!(snap.status.is_terminal());
        assert!(snap.exact);
        assert_eq!(snap.count, Some(8));
        assert_eq!(snap.mode_used.as_deref(), Some("exact"));
    }
}
