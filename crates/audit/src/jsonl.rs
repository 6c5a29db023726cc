//! Append-only JSONL audit log.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use tracing::{info, warn};

use careledger_types::AuditEvent;

use crate::EventSink;

/// Writes one JSON object per line to an append-only file.
///
/// The file is best-effort logging, not a commit log: write failures
/// are traced and the event is dropped, never surfaced to the emitting
/// operation. Each event is also mirrored through `tracing`.
pub struct JsonlSink {
    file: Mutex<File>,
    path: PathBuf,
}

impl JsonlSink {
    pub fn new(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            file: Mutex::new(file),
            path,
        })
    }

    /// Renames the log aside with an epoch-seconds suffix and reopens a
    /// fresh file once the current one exceeds `max_bytes`.
    pub fn rotate_if_needed(&self, max_bytes: u64) -> anyhow::Result<()> {
        let mut file = self.file.lock();

        let metadata = std::fs::metadata(&self.path)?;
        if metadata.len() <= max_bytes {
            return Ok(());
        }

        let backup_path = format!(
            "{}.{}",
            self.path.display(),
            SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs()
        );
        std::fs::rename(&self.path, &backup_path)?;

        *file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        info!(path = %self.path.display(), "rotated audit log");
        Ok(())
    }
}

fn append_line(file: &mut File, line: &str) -> std::io::Result<()> {
    writeln!(file, "{line}")?;
    file.flush()
}

impl EventSink for JsonlSink {
    fn emit(&self, event: AuditEvent) {
        let line = match serde_json::to_string(&event) {
            Ok(line) => line,
            Err(err) => {
                warn!(%err, "failed to encode audit event; dropped");
                return;
            }
        };

        {
            let mut file = self.file.lock();
            if let Err(err) = append_line(&mut file, &line) {
                warn!(%err, path = %self.path.display(), "failed to append audit event; dropped");
            }
        }

        info!(
            kind = event.kind.as_str(),
            subject = %event.subject,
            "audit event"
        );
    }
}
