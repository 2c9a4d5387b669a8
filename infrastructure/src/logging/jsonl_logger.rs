//! Analysis transcripts as JSON Lines
//!
//! One line per orchestrator event, e.g.
//! `{"type":"persona_failed","timestamp":"...","document":"plan.txt","persona":"hr",...}`.
//! Lines are flushed as they are written so an interrupted run still leaves
//! a readable transcript.

use serde_json::{Map, Value};
use sideview_application::{ConversationEvent, ConversationLogger};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

/// Writes analysis events to a `.transcript.jsonl` file
pub struct JsonlConversationLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
    document: Option<String>,
}

impl JsonlConversationLogger {
    /// Start a transcript at `path`, creating parent directories.
    ///
    /// Transcripts are optional output: failures are logged and yield `None`.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!("Transcript disabled, cannot create {}: {}", parent.display(), e);
            return None;
        }

        match File::create(path) {
            Ok(file) => Some(Self {
                writer: Mutex::new(BufWriter::new(file)),
                path: path.to_path_buf(),
                document: None,
            }),
            Err(e) => {
                warn!("Transcript disabled, cannot create {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Transcript for one run over `document`, in `log_dir`.
    ///
    /// File name: `<UTC timestamp>-<document stem>.transcript.jsonl`. Every
    /// record carries the document's file name.
    pub fn for_document(log_dir: &Path, document: &Path) -> Option<Self> {
        let stem = document
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        let timestamp = chrono::Utc::now().format("%Y%m%dT%H%M%SZ");
        let mut logger =
            Self::new(log_dir.join(format!("{}-{}.transcript.jsonl", timestamp, stem)))?;
        logger.document = document
            .file_name()
            .map(|n| n.to_string_lossy().into_owned());
        Some(logger)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `type`, `timestamp` and `document` first, then the payload fields.
    /// A non-object payload is kept under `data`.
    fn record(&self, event: ConversationEvent) -> Value {
        let mut record = Map::new();
        record.insert("type".into(), Value::from(event.event_type));
        record.insert(
            "timestamp".into(),
            Value::from(chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)),
        );
        if let Some(document) = &self.document {
            record.insert("document".into(), Value::from(document.as_str()));
        }

        match event.payload {
            Value::Object(fields) => {
                for (key, value) in fields {
                    record.entry(key).or_insert(value);
                }
            }
            Value::Null => {}
            other => {
                record.insert("data".into(), other);
            }
        }
        Value::Object(record)
    }

    fn writer(&self) -> MutexGuard<'_, BufWriter<File>> {
        self.writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let event_type = event.event_type;
        let Ok(line) = serde_json::to_string(&self.record(event)) else {
            return;
        };

        let mut writer = self.writer();
        if let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush()) {
            debug!("Dropped {} transcript record: {}", event_type, e);
        }
    }
}

impl Drop for JsonlConversationLogger {
    fn drop(&mut self) {
        let _ = self.writer().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_record_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.transcript.jsonl");
        let logger = JsonlConversationLogger::new(&path).unwrap();

        logger.log(ConversationEvent::new(
            "persona_completed",
            serde_json::json!({ "persona": "legal", "comments": 3 }),
        ));
        logger.log(ConversationEvent::new(
            "persona_failed",
            serde_json::json!({ "persona": "hr", "cause": { "kind": "parse" } }),
        ));
        drop(logger);

        let records = read_lines(&path);
        assert_eq!(records.len(), 2);
        for record in &records {
            assert!(record.get("timestamp").is_some());
        }
        assert_eq!(records[0]["type"], "persona_completed");
        assert_eq!(records[0]["persona"], "legal");
        assert_eq!(records[0]["comments"], 3);
        assert_eq!(records[1]["cause"]["kind"], "parse");
    }

    #[test]
    fn test_non_object_payload_goes_under_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.transcript.jsonl");
        let logger = JsonlConversationLogger::new(&path).unwrap();

        logger.log(ConversationEvent::new(
            "analysis_aborted",
            serde_json::json!("document is empty"),
        ));
        drop(logger);

        let records = read_lines(&path);
        assert_eq!(records[0]["type"], "analysis_aborted");
        assert_eq!(records[0]["data"], "document is empty");
    }

    #[test]
    fn test_for_document_names_file_after_stem() {
        let dir = tempfile::tempdir().unwrap();
        let logger =
            JsonlConversationLogger::for_document(&dir.path().join("logs"), Path::new("plan.txt"))
                .unwrap();

        let name = logger.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.ends_with("-plan.transcript.jsonl"), "{}", name);
        assert!(logger.path().parent().unwrap().exists());

        let path = logger.path().to_path_buf();
        logger.log(ConversationEvent::new(
            "analysis_started",
            serde_json::json!({ "personas": 5, "type": "ignored" }),
        ));
        drop(logger);

        let records = read_lines(&path);
        assert_eq!(records[0]["document"], "plan.txt");
        assert_eq!(records[0]["type"], "analysis_started");
        assert_eq!(records[0]["personas"], 5);
    }
}
