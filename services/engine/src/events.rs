//! # Swap Event Sinks
//!
//! Destinations for settled [`SwapRecord`]s. The executor emits after every
//! pool lock is released; a failing sink is logged and never rolls a trade
//! back.
//!
//! - [`InMemorySwapLog`]: append-only vector, readable while trading
//! - [`JsonLinesSwapLog`]: one JSON object per line to any writer or file
//! - [`NullSink`]: discards everything

use kswap_types::SwapRecord;
use parking_lot::{Mutex, RwLock};
use std::fmt::Debug;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Event delivery failures
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Event log I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Event serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A destination for swap records
pub trait SwapEventSink: Send + Sync + Debug {
    /// Append one record
    fn record(&self, record: &SwapRecord) -> Result<(), SinkError>;
}

/// Discards every record
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl SwapEventSink for NullSink {
    fn record(&self, _record: &SwapRecord) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Append-only in-memory log
#[derive(Debug, Default)]
pub struct InMemorySwapLog {
    records: RwLock<Vec<SwapRecord>>,
}

impl InMemorySwapLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every record in emission order
    pub fn records(&self) -> Vec<SwapRecord> {
        self.records.read().clone()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl SwapEventSink for InMemorySwapLog {
    fn record(&self, record: &SwapRecord) -> Result<(), SinkError> {
        self.records.write().push(record.clone());
        Ok(())
    }
}

/// JSON-lines log; each record is flushed as soon as it is written
#[derive(Debug)]
pub struct JsonLinesSwapLog<W: Write + Send + Debug> {
    writer: Mutex<W>,
}

impl<W: Write + Send + Debug> JsonLinesSwapLog<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl JsonLinesSwapLog<BufWriter<File>> {
    /// Open `path` for appending, creating parent directories
    pub fn create(path: &Path) -> Result<Self, SinkError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        info!(path = %path.display(), "Swap event log opened");
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write + Send + Debug> SwapEventSink for JsonLinesSwapLog<W> {
    fn record(&self, record: &SwapRecord) -> Result<(), SinkError> {
        let line = serde_json::to_string(record)?;
        let mut writer = self.writer.lock();
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}
