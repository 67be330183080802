//! Update progress reporting.
//!
//! Reports observable progress during `xkcd update` so users see which comic
//! is being fetched, how much is left, and when a checkpoint lands.
//! Progress is emitted on **stderr** so stdout remains parseable for scripts.

use std::io::Write;

/// A single progress event for an index update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyncProgressEvent {
    /// Asking the remote for the latest comic number.
    Discovering,
    /// About to fetch comic `num`, the `n`th of `total` missing comics.
    Fetching { num: u32, n: u64, total: u64 },
    /// A checkpoint was written after `fetched` successful fetches.
    Checkpoint { fetched: u64, total: u64 },
}

/// Reports update progress. Implementations write to stderr (human or JSON).
pub trait SyncProgressReporter {
    /// Emit a progress event. Called from the index builder.
    fn report(&self, event: SyncProgressEvent);
}

/// Human-friendly progress on stderr: "update  fetching #1,234  (12 / 50)".
pub struct StderrProgress;

impl SyncProgressReporter for StderrProgress {
    fn report(&self, event: SyncProgressEvent) {
        let line = match &event {
            SyncProgressEvent::Discovering => "update  discovering latest comic...\n".to_string(),
            SyncProgressEvent::Fetching { num, n, total } => format!(
                "update  fetching #{}  ({} / {})\n",
                num,
                format_number(*n),
                format_number(*total)
            ),
            SyncProgressEvent::Checkpoint { fetched, total } => format!(
                "update  checkpoint saved  ({} / {})\n",
                format_number(*fetched),
                format_number(*total)
            ),
        };
        let _ = std::io::stderr().lock().write_all(line.as_bytes());
        let _ = std::io::stderr().lock().flush();
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl SyncProgressReporter for JsonProgress {
    fn report(&self, event: SyncProgressEvent) {
        if let Ok(line) = serde_json::to_string(&event_json(&event)) {
            let _ = writeln!(std::io::stderr().lock(), "{}", line);
            let _ = std::io::stderr().lock().flush();
        }
    }
}

fn event_json(event: &SyncProgressEvent) -> serde_json::Value {
    match event {
        SyncProgressEvent::Discovering => serde_json::json!({
            "event": "progress",
            "phase": "discovering"
        }),
        SyncProgressEvent::Fetching { num, n, total } => serde_json::json!({
            "event": "progress",
            "phase": "fetching",
            "num": num,
            "n": n,
            "total": total
        }),
        SyncProgressEvent::Checkpoint { fetched, total } => serde_json::json!({
            "event": "checkpoint",
            "fetched": fetched,
            "total": total
        }),
    }
}

/// No-op reporter when progress is disabled.
pub struct NoProgress;

impl SyncProgressReporter for NoProgress {
    fn report(&self, _event: SyncProgressEvent) {}
}

fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + (s.len() - 1) / 3);
    let chars: Vec<char> = s.chars().rev().collect();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }
    result.chars().rev().collect()
}

/// Progress mode for the CLI: off, human (stderr), or JSON (stderr).
#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum ProgressMode {
    Off,
    Human,
    Json,
}

impl ProgressMode {
    /// Default: human progress when stderr is a TTY, otherwise off.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stderr) {
            ProgressMode::Human
        } else {
            ProgressMode::Off
        }
    }

    /// Build a reporter for this mode. Caller can pass it to the builder.
    pub fn reporter(&self) -> Box<dyn SyncProgressReporter> {
        match self {
            ProgressMode::Off => Box::new(NoProgress),
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
        }
    }
}
