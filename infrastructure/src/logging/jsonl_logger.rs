//! JSONL file writer for conversation events.
//!
//! One JSON object per line: the event payload plus `type`, `timestamp`, and
//! `run` (the start time of the run that wrote it). The file is opened in
//! append mode so transcripts of several runs can share one file.

use chrono::{SecondsFormat, Utc};
use curlgen_application::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use serde_json::{Value, json};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Build the JSON line for an event.
fn to_record(event: ConversationEvent, run: &str, timestamp: String) -> Value {
    match event.payload {
        Value::Object(mut map) => {
            map.insert("type".to_string(), Value::String(event.event_type.to_string()));
            map.insert("timestamp".to_string(), Value::String(timestamp));
            map.insert("run".to_string(), Value::String(run.to_string()));
            Value::Object(map)
        }
        other => json!({
            "type": event.event_type,
            "timestamp": timestamp,
            "run": run,
            "data": other,
        }),
    }
}

/// Transcript logger writing one JSON object per line.
pub struct JsonlConversationLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
    run: String,
}

impl JsonlConversationLogger {
    /// Open (or create) the transcript file for appending.
    ///
    /// Parent directories are created as needed. Returns `None` when the
    /// file cannot be opened; the run continues without a transcript.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create conversation log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!(
                    "Could not open conversation log file {}: {}",
                    path.display(),
                    e
                );
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
            run: now(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let record = to_record(event, &self.run, now());
        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlConversationLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_record_merges_object_payload() {
        let record = to_record(
            ConversationEvent::new("tool_call", json!({"id": "call_1"})),
            "run-1",
            "2026-01-01T00:00:00.000Z".to_string(),
        );
        assert_eq!(
            record,
            json!({
                "id": "call_1",
                "type": "tool_call",
                "timestamp": "2026-01-01T00:00:00.000Z",
                "run": "run-1"
            })
        );
    }

    #[test]
    fn test_record_wraps_scalar_payload() {
        let record = to_record(
            ConversationEvent::new("note", json!("just text")),
            "r",
            "t".to_string(),
        );
        assert_eq!(record["data"], "just text");
        assert_eq!(record["type"], "note");
    }

    #[test]
    fn test_logger_writes_one_line_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("run.jsonl");
        let logger = JsonlConversationLogger::new(&path).unwrap();

        logger.log(ConversationEvent::new("llm_request", json!({"turn": 1})));
        logger.log(ConversationEvent::new(
            "command_outcome",
            json!({"command": "curl x", "met_expectation": true}),
        ));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "llm_request");
        assert_eq!(lines[1]["command"], "curl x");
        assert!(lines.iter().all(|l| l.get("timestamp").is_some()));
    }

    #[test]
    fn test_logger_appends_across_runs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shared.jsonl");

        for turn in 1..=2 {
            let logger = JsonlConversationLogger::new(&path).unwrap();
            logger.log(ConversationEvent::new("llm_request", json!({"turn": turn})));
        }

        assert_eq!(read_lines(&path).len(), 2);
    }

    #[test]
    fn test_logger_returns_none_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        assert!(JsonlConversationLogger::new(blocker.join("run.jsonl")).is_none());
    }
}
