//! JSONL file writer for game events.
//!
//! Each [`GameEvent`] is serialized as a single JSON line with its
//! `type` tag and a `timestamp`, appended via a buffered writer. Gives
//! every round a replayable transcript on disk.

use outsider_application::ports::notifier::{GameEvent, GameNotifier};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// JSONL game-event log that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on `Drop`.
pub struct JsonlEventLog {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlEventLog {
    /// Create a new log writing to the given path.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    /// Returns `None` if the file cannot be created.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!("Could not create event log directory {}: {}", parent.display(), e);
            return None;
        }

        let file = match File::create(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not create event log file {}: {}", path.display(), e);
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
}

impl GameNotifier for JsonlEventLog {
    fn notify(&self, event: GameEvent) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        // The event serializes to an object with its `type` tag; add
        // the timestamp alongside.
        let record = match serde_json::to_value(&event) {
            Ok(serde_json::Value::Object(mut map)) => {
                map.insert(
                    "timestamp".to_string(),
                    serde_json::Value::String(timestamp),
                );
                serde_json::Value::Object(map)
            }
            Ok(other) => serde_json::json!({
                "type": event.kind(),
                "timestamp": timestamp,
                "data": other,
            }),
            Err(_) => return,
        };

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            // Flush each line; the log doubles as a crash record.
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlEventLog {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use outsider_application::ports::notifier::{QuestionCountEvent, RoundResetEvent};
    use std::io::Read;

    #[test]
    fn test_jsonl_log_writes_valid_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("round.events.jsonl");
        let log = JsonlEventLog::new(&path).unwrap();

        log.notify(GameEvent::QuestionCountUpdate(QuestionCountEvent {
            question_count: 2,
            questions_until_vote: 3,
            can_vote: false,
        }));
        log.notify(GameEvent::RoundReset(RoundResetEvent {
            message: "fresh table".to_string(),
        }));

        drop(log);

        let mut content = String::new();
        File::open(&path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();

        let lines: Vec<&str> = content.trim().lines().collect();
        assert_eq!(lines.len(), 2);

        for line in &lines {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert!(value.get("type").is_some());
            assert!(value.get("timestamp").is_some());
        }

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["type"], "question_count_update");
        assert_eq!(first["question_count"], 2);

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["type"], "round_reset");
        assert_eq!(second["message"], "fresh table");
    }

    #[test]
    fn test_log_survives_invalid_path() {
        let result = JsonlEventLog::new("/nonexistent/deeply/nested/path/file.jsonl");
        // Just verify it degrades to None without panicking.
        let _ = result;
    }
}
