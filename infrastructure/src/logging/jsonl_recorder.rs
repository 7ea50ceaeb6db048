//! JSONL file writer for consensus results.
//!
//! Each [`ConsensusResult`] is written as a single JSON line with a `type`,
//! `stage` and `recorded_at` field next to the serialized result. The file
//! is opened in append mode so repeated invocations build one audit trail.

use consensus_application::ResultRecorder;
use consensus_domain::ConsensusResult;
use serde_json::{Value, json};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// JSONL result recorder that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every record and
/// on `Drop`.
pub struct JsonlResultRecorder {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlResultRecorder {
    /// Open (or create) the file at `path` for appending.
    ///
    /// Creates parent directories if they don't exist.
    /// Returns `None` if the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create result log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open result log file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn to_record(stage: Option<&str>, result: &ConsensusResult) -> Option<Value> {
        let recorded_at = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        let result = match serde_json::to_value(result) {
            Ok(value) => value,
            Err(e) => {
                warn!("Could not serialize consensus result: {}", e);
                return None;
            }
        };

        Some(json!({
            "type": "consensus_result",
            "stage": stage,
            "recorded_at": recorded_at,
            "result": result,
        }))
    }
}

impl ResultRecorder for JsonlResultRecorder {
    fn record(&self, stage: Option<&str>, result: &ConsensusResult) {
        let Some(record) = Self::to_record(stage, result) else {
            return;
        };
        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            if let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush()) {
                warn!("Could not write to {}: {}", self.path.display(), e);
            }
        }
    }
}

impl Drop for JsonlResultRecorder {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consensus_domain::{
        ConsensusResult, MetricConsensus, Model, StabilityThresholds,
    };
    use std::collections::BTreeMap;
    use std::time::Duration;

    fn sample_result(values: &[f64]) -> ConsensusResult {
        let metric =
            MetricConsensus::from_samples("beta", values.to_vec(), &StabilityThresholds::default());
        ConsensusResult::assemble(
            Vec::new(),
            BTreeMap::from([("beta".to_string(), metric)]),
            None,
            Model::ClaudeSonnet4,
            Duration::from_millis(250),
        )
    }

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_line_per_result() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs").join("consensus.jsonl");
        let recorder = JsonlResultRecorder::new(&path).unwrap();

        recorder.record(Some("hunt_patterns"), &sample_result(&[0.2, 0.2, 0.2]));
        recorder.record(None, &sample_result(&[-5.0, 5.0, 0.0]));
        drop(recorder);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "consensus_result");
        assert_eq!(lines[0]["stage"], "hunt_patterns");
        assert!(lines[0]["recorded_at"].is_string());
        assert_eq!(lines[0]["result"]["metrics"]["beta"]["stability"], "high");
        assert_eq!(lines[1]["stage"], Value::Null);
        assert_eq!(lines[1]["result"]["metrics"]["beta"]["cv"], "Infinity");
    }

    #[test]
    fn test_appends_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");

        for _ in 0..2 {
            let recorder = JsonlResultRecorder::new(&path).unwrap();
            recorder.record(Some("mine_qual"), &sample_result(&[1.0]));
        }

        assert_eq!(read_lines(&path).len(), 2);
    }

    #[test]
    fn test_recorded_result_deserializes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip.jsonl");
        let original = sample_result(&[0.18, 0.21, 0.24]);

        let recorder = JsonlResultRecorder::new(&path).unwrap();
        recorder.record(None, &original);
        drop(recorder);

        let line = read_lines(&path).remove(0);
        let back: ConsensusResult = serde_json::from_value(line["result"].clone()).unwrap();
        assert_eq!(back, original);
    }
}
