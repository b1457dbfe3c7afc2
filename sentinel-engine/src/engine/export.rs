//! Event log export as delimited text.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Local};
use tracing::{debug, info};

use sentinel_core::store::{AggregationStore, LogCursor};

use super::error::EngineError;

/// Column header, always the first row.
pub const EXPORT_HEADER: [&str; 5] = ["Timestamp", "Protocol", "Source", "Destination", "Size"];

/// Events copied out of the store per lock acquisition.
const EXPORT_CHUNK: usize = 1024;

/// Writes the session log to disk without pausing ingestion.
pub struct Exporter {
    store: Arc<AggregationStore>,
}

impl Exporter {
    pub fn new(store: Arc<AggregationStore>) -> Self {
        Self { store }
    }

    /// `LOG_<HHMMSS>.<extension>`
    pub fn default_file_name(now: DateTime<Local>, extension: &str) -> String {
        format!("LOG_{}.{}", now.format("%H%M%S"), extension)
    }

    /// Writes the header and one row per event, in log order, to `path`,
    /// replacing any existing file. Returns the number of rows written.
    ///
    /// The row count is fixed when the call starts; events ingested while
    /// the file is being written are not included. The log is copied in
    /// chunks so the store lock is only ever held briefly. Rows go to a
    /// sibling staging file that is renamed over `path` once complete, so a
    /// failed export leaves any previous file at `path` untouched.
    pub fn export(&self, path: &Path) -> Result<usize, EngineError> {
        self.export_from(self.store.log_cursor(), path)
    }

    fn export_from(&self, cursor: LogCursor, path: &Path) -> Result<usize, EngineError> {
        let staging = staging_path(path);
        let written = match self.write_rows(&cursor, &staging) {
            Ok(written) => written,
            Err(e) => {
                let _ = fs::remove_file(&staging);
                return Err(e);
            }
        };
        if let Err(e) = fs::rename(&staging, path) {
            let _ = fs::remove_file(&staging);
            return Err(e.into());
        }

        info!(rows = written, path = %path.display(), "Event log exported");
        Ok(written)
    }

    fn write_rows(&self, cursor: &LogCursor, target: &Path) -> Result<usize, EngineError> {
        let mut writer = csv::Writer::from_path(target)?;
        writer.write_record(EXPORT_HEADER)?;

        let mut written = 0;
        while written < cursor.len() {
            let chunk = self
                .store
                .read_log(cursor, written..written + EXPORT_CHUNK)?;
            for event in &chunk {
                let size = event.size.to_string();
                writer.write_record([
                    event.clock_time().as_str(),
                    event.protocol.as_str(),
                    &*event.source,
                    &*event.destination,
                    size.as_str(),
                ])?;
            }
            written += chunk.len();
            debug!(written, total = cursor.len(), "Export chunk flushed");
        }

        writer.flush()?;
        Ok(written)
    }
}

/// `<file name>.tmp` next to the target, on the same filesystem.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
