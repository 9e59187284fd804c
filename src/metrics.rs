//! Performance metrics for `--profile`.
//!
//! This module provides:
//! - [`PhaseTimer`] - A wrapper around `Instant` for timing different phases
//! - [`rss_after_phase`] - Optional memory usage tracking using `sysinfo`
//! - [`ProfileData`] - Structured data for performance metrics
//! - [`print_profile_summary`] - Human-readable summary on stderr
//! - [`save_stats_json`] - JSON output for scripting integration
//!
//! # Usage
//!
//! ```rust
//! use size_scanner::metrics::{PhaseTimer, rss_after_phase, ProfileData};
//!
//! let mut profile = ProfileData::new();
//! let timer = PhaseTimer::new("Build tree");
//!
//! // ... do work ...
//!
//! profile.add_phase(timer.finish());
//! profile.memory_peak = rss_after_phase();
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use sysinfo::System;

/// A timer for measuring the duration of a named phase.
#[derive(Debug, Clone)]
pub struct PhaseTimer {
    pub name: String,
    pub start: Instant,
}

impl PhaseTimer {
    /// Creates a new timer and starts timing the specified phase.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            start: Instant::now(),
        }
    }

    /// Finishes timing the phase and returns the elapsed duration.
    pub fn finish(self) -> PhaseResult {
        PhaseResult {
            name: self.name,
            duration: self.start.elapsed(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// The result of a completed phase timing operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseResult {
    pub name: String,
    #[serde(with = "duration_serde")]
    pub duration: Duration,
}

/// Durations are stored as whole milliseconds in JSON.
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

/// Profiling data for a complete run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileData {
    /// Timing results for each phase of the run
    pub phases: Vec<PhaseResult>,
    /// Resident memory after the scan, in bytes (if available)
    pub memory_peak: Option<u64>,
    /// Scan figures such as node count, workers, unreadable entries
    pub metadata: BTreeMap<String, String>,
}

impl ProfileData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_phase(&mut self, phase: PhaseResult) {
        self.phases.push(phase);
    }

    pub fn add_metadata(&mut self, key: &str, value: impl ToString) {
        self.metadata.insert(key.to_string(), value.to_string());
    }

    /// Sum of all phase durations.
    pub fn total_duration(&self) -> Duration {
        self.phases.iter().map(|p| p.duration).sum()
    }
}

/// Measures the current process's RSS (Resident Set Size) in bytes.
///
/// Returns `None` when `sysinfo` cannot report on this platform.
pub fn rss_after_phase() -> Option<u64> {
    let pid = sysinfo::get_current_pid().ok()?;
    let mut system = System::new();
    system.refresh_process(pid);
    system.process(pid).map(|process| process.memory())
}

/// Prints a profile summary to stderr, keeping stdout for rows.
///
/// # Example Output
/// ```text
/// Scan phase timings
///   Build tree          150 ms
///   Sort & filter         4 ms
///   Render               12 ms
/// Memory peak:      42.0 MB
/// ```
pub fn print_profile_summary(profile: &ProfileData) {
    eprintln!("\nScan phase timings");

    for phase in &profile.phases {
        eprintln!("  {:<15} {:>7} ms", phase.name, phase.duration.as_millis());
    }
    eprintln!("  {:<15} {:>7} ms", "Total", profile.total_duration().as_millis());

    if let Some(memory_peak) = profile.memory_peak {
        let memory_mb = memory_peak as f64 / (1024.0 * 1024.0);
        eprintln!("Memory peak:      {:.1} MB", memory_mb);
    }

    if !profile.metadata.is_empty() {
        eprintln!("\nAdditional metrics:");
        for (key, value) in &profile.metadata {
            eprintln!("  {:<15} {}", key, value);
        }
    }

    eprintln!();
}

/// Writes `stats.json` next to `output_path` and returns its path.
pub fn save_stats_json(output_path: &Path, profile: &ProfileData) -> anyhow::Result<PathBuf> {
    let stats_path = output_path.with_file_name("stats.json");

    let stats = serde_json::json!({
        "scan_phases": profile.phases,
        "total_duration_ms": profile.total_duration().as_millis() as u64,
        "memory_peak_bytes": profile.memory_peak,
        "metadata": profile.metadata,
        "timestamp": chrono::Utc::now().to_rfc3339()
    });

    std::fs::write(&stats_path, serde_json::to_string_pretty(&stats)?)?;
    Ok(stats_path)
}

/// Times a block, returning `(result, PhaseResult)`.
///
/// ```rust
/// use size_scanner::time_phase;
///
/// let (result, timing) = time_phase!("Sum", { (1..=10).sum::<u32>() });
/// assert_eq!(result, 55);
/// assert_eq!(timing.name, "Sum");
/// ```
#[macro_export]
macro_rules! time_phase {
    ($name:expr, $code:block) => {{
        let timer = $crate::metrics::PhaseTimer::new($name);
        let result = $code;
        let timing = timer.finish();
        (result, timing)
    }};
}
