// Application settings
// Loaded from ~/.config/squaresum/settings.toml

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Defaults applied to `count` when flags are omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CountDefaults {
    /// "auto", "exact", or "estimate"
    pub mode: String,

    /// Time budget for auto mode, seconds
    pub max_seconds: f64,

    /// Sample paths for the statistical estimate
    pub sample_paths: u32,

    /// Let the service fan out across processes
    pub use_multiprocessing: bool,

    /// Worker count; None = service chooses
    pub workers: Option<u32>,
}

impl Default for CountDefaults {
    fn default() -> Self {
        Self {
            mode: "auto".into(),
            max_seconds: 5.0,
            sample_paths: 200,
            use_multiprocessing: false,
            workers: None,
        }
    }
}

/// Top-level settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Solver service base URL
    pub api_base: String,

    /// Poll cadence for count jobs, milliseconds
    pub poll_interval_ms: u64,

    /// Per-request HTTP timeout, seconds
    pub request_timeout_secs: u64,

    /// Counting defaults
    pub count: CountDefaults,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: "http://127.0.0.1:8000".into(),
            poll_interval_ms: 1000,
            request_timeout_secs: 30,
            count: CountDefaults::default(),
        }
    }
}

impl Settings {
    /// Settings file path: `~/.config/squaresum/settings.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("squaresum").join("settings.toml"))
    }

    /// Load from disk, falling back to defaults when the file is
    /// missing or unreadable. A malformed file also falls back rather
    /// than blocking the CLI. `SQUARESUM_API_BASE` wins over the file.
    pub fn load() -> Self {
        let mut settings: Self = Self::path()
            .and_then(|path| fs::read_to_string(path).ok())
            .and_then(|contents| toml::from_str(&contents).ok())
            .unwrap_or_default();

        if let Ok(base) = std::env::var("SQUARESUM_API_BASE") {
            if !base.trim().is_empty() {
                settings.api_base = base.trim().trim_end_matches('/').to_string();
            }
        }

        settings
    }

    /// Persist the current settings (creates the directory if needed).
    pub fn save(&self) -> std::io::Result<()> {
        let Some(path) = Self::path() else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no config directory on this platform",
            ));
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(path, contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.api_base, "http://127.0.0.1:8000");
        assert_eq!(settings.poll_interval_ms, 1000);
        assert_eq!(settings.count.mode, "auto");
        assert_eq!(settings.count.sample_paths, 200);
        assert_eq!(settings.count.workers, None);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            api_base = "http://solver.internal:9000"

            [count]
            mode = "exact"
            "#,
        )
        .unwrap();
        assert_eq!(settings.api_base, "http://solver.internal:9000");
        assert_eq!(settings.poll_interval_ms, 1000);
        assert_eq!(settings.count.mode, "exact");
        assert_eq!(settings.count.max_seconds, 5.0);
    }

    #[test]
    fn load_never_fails() {
        // load() falls back to defaults for a missing or malformed
        // file; whatever is on disk, it must yield usable settings.
        let settings = Settings::load();
        assert!(!settings.api_base.is_empty());
        assert!(settings.poll_interval_ms > 0);
    }

    #[test]
    fn round_trips_through_toml() {
        let mut settings = Settings::default();
        settings.count.workers = Some(4);
        let text = toml::to_string_pretty(&settings).unwrap();
        let back: Settings = toml::from_str(&text).unwrap();
        assert_eq!(back.count.workers, Some(4));
        assert_eq!(back.api_base, settings.api_base);
    }
}
