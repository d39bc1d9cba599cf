//! Pure formatting of job snapshots and solve results.
//!
//! No state of its own: `present` is a function of its argument only,
//! so calling it twice with the same snapshot yields identical text.

use squaresum_protocol::{CountJobStatus, JobState, SolveResponse};

use crate::grid::GridState;

/// Render a polled count-job snapshot (or its absence) as display text.
pub fn present(status: Option<&CountJobStatus>) -> String {
    let Some(snap) = status else {
        return "No count in progress.".to_string();
    };

    match snap.status {
        JobState::Queued | JobState::Running | JobState::Canceling => format!(
            "Counting ({}): lower bound {}, {}s elapsed, {} nodes visited.",
            snap.status.as_str(),
            snap.lower_bound,
            snap.elapsed_seconds.round() as i64,
            snap.nodes_visited,
        ),
        JobState::Completed => present_completed(snap),
        JobState::Canceled => format!(
            "Canceled: {} solution(s) found before cancellation.",
            snap.lower_bound,
        ),
        JobState::Failed => snap
            .error
            .clone()
            .unwrap_or_else(|| "Counting failed.".to_string()),
    }
}

fn present_completed(snap: &CountJobStatus) -> String {
    if snap.exact {
        let count = snap.count.unwrap_or(snap.lower_bound);
        return format!("Exact solutions: {count}.");
    }

    match (snap.mode_used.as_deref(), snap.estimated_count) {
        // Estimate-only run: no lower-bound framing.
        (Some("estimate"), Some(est)) => format!("Estimated solutions: {est:.0}."),
        (_, Some(est)) => {
            let margin = snap
                .relative_error
                .map(|re| format!(" (\u{b1}{:.1}%)", re * 100.0))
                .unwrap_or_default();
            format!(
                "At least {} solution(s); estimated total {est:.0}{margin}.",
                snap.lower_bound,
            )
        }
        (_, None) => format!("At least {} solution(s) found.", snap.lower_bound),
    }
}

/// Render a solve response as the service's canonical grid text.
pub fn present_solution(response: &SolveResponse) -> String {
    response.grid_text.clone()
}

/// Render the grid with user-provided cells marked by a trailing `*`.
/// Columns are padded to the widest value so the marks line up.
pub fn present_annotated(state: &GridState) -> String {
    let size = state.size();
    let width = (0..size)
        .flat_map(|r| (0..size).map(move |c| (r, c)))
        .map(|(r, c)| state.cell(r, c).raw_text.len())
        .max()
        .unwrap_or(1)
        .max(1);

    let mut lines = Vec::with_capacity(size);
    for r in 0..size {
        let row: Vec<String> = (0..size)
            .map(|c| {
                let cell = state.cell(r, c);
                let text = if cell.raw_text.is_empty() { "." } else { &cell.raw_text };
                let mark = if cell.is_user_provided { "*" } else { " " };
                format!("{text:>width$}{mark}")
            })
            .collect();
        lines.push(row.join(" ").trim_end().to_string());
    }
    lines.join("\n")
}
