//! HTTP bindings for the solver service endpoints.

use std::time::Duration;

use squaresum_core::PuzzleSpec;
use squaresum_protocol::{
    CountJobStatus, ErrorBody, HealthResponse, SolveRequest, SolveResponse, StartCountRequest,
    StartCountResponse,
};

use crate::error::ClientError;

/// Solver service API client (blocking).
#[derive(Clone)]
pub struct SolverClient {
    http: reqwest::blocking::Client,
    api_base: String,
}

impl SolverClient {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self::with_timeout(api_base, Duration::from_secs(30))
    }

    pub fn with_timeout(api_base: impl Into<String>, timeout: Duration) -> Self {
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("sqsum/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// `GET /health` — service liveness probe.
    pub fn health(&self) -> Result<HealthResponse, ClientError> {
        let url = format!("{}/health", self.api_base);
        let resp = self.get(&url)?;
        resp.json().map_err(|e| ClientError::Parse(e.to_string()))
    }

    /// `POST /solve` — synchronous solve of a validated puzzle.
    pub fn solve(&self, spec: &PuzzleSpec, trace: bool) -> Result<SolveResponse, ClientError> {
        let body = SolveRequest {
            target: spec.target,
            size: spec.size,
            known_grid: spec.known_grid.clone(),
            game_mode: spec.game_mode,
            trace,
        };
        let url = format!("{}/solve", self.api_base);
        let resp = self.post_json(&url, &body)?;
        resp.json().map_err(|e| ClientError::Parse(e.to_string()))
    }

    /// `POST /count/jobs/start` — launch a counting job, returns its id.
    pub fn start_count_job(&self, request: &StartCountRequest) -> Result<String, ClientError> {
        let url = format!("{}/count/jobs/start", self.api_base);
        let resp = self.post_json(&url, request)?;
        let body: StartCountResponse =
            resp.json().map_err(|e| ClientError::Parse(e.to_string()))?;
        Ok(body.job_id)
    }

    /// `GET /count/jobs/{job_id}` — one status snapshot.
    pub fn job_status(&self, job_id: &str) -> Result<CountJobStatus, ClientError> {
        let url = format!("{}/count/jobs/{job_id}", self.api_base);
        let resp = self.get(&url)?;
        resp.json().map_err(|e| ClientError::Parse(e.to_string()))
    }

    /// `POST /count/jobs/{job_id}/cancel` — fire-and-forget; the true
    /// end state arrives via a later poll.
    pub fn cancel_job(&self, job_id: &str) -> Result<(), ClientError> {
        let url = format!("{}/count/jobs/{job_id}/cancel", self.api_base);
        self.post_json(&url, &serde_json::json!({}))?;
        Ok(())
    }

    // ── Internal helpers ────────────────────────────────────────────

    fn get(&self, url: &str) -> Result<reqwest::blocking::Response, ClientError> {
        let response = self
            .http
            .get(url)
            .send()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        check_status(response)
    }

    fn post_json<T: serde::Serialize>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<reqwest::blocking::Response, ClientError> {
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        check_status(response)
    }
}

/// Map a non-2xx response to an error, preferring the service's
/// `detail` string when the body carries one.
fn check_status(
    response: reqwest::blocking::Response,
) -> Result<reqwest::blocking::Response, ClientError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let body = response.text().unwrap_or_default();
    if let Ok(err) = serde_json::from_str::<ErrorBody>(&body) {
        return Err(ClientError::Service(err.detail));
    }
    Err(ClientError::Http(status, body))
}
