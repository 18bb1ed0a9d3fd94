//! Append-only CSV edge sink.

use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::error::{BbhError, Result};
use crate::types::BbhEdge;

/// Line sink for BBH edges, shared by concurrent column tasks.
///
/// Each edge is one CSV line `row,col,score`; the internal mutex makes every
/// line write atomic with respect to other writers. Scores use Rust's
/// shortest round-trip float formatting.
pub struct OutputSink {
    path: PathBuf,
    writer: Mutex<BufWriter<Box<dyn Write + Send>>>,
    edges: AtomicU64,
}

impl std::fmt::Debug for OutputSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputSink")
            .field("path", &self.path)
            .field("edges", &self.edges)
            .finish()
    }
}

impl OutputSink {
    /// Open `path` for appending, creating it if needed. `-` means stdout.
    pub fn open(path: &Path) -> Result<Self> {
        let raw: Box<dyn Write + Send> = if path.as_os_str() == "-" {
            Box::new(io::stdout())
        } else {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| BbhError::io(path, "open", e))?;
            Box::new(file)
        };

        Ok(Self {
            path: path.to_path_buf(),
            writer: Mutex::new(BufWriter::new(raw)),
            edges: AtomicU64::new(0),
        })
    }

    pub fn write_edge(&self, edge: &BbhEdge) -> Result<()> {
        let mut writer = self.writer.lock().unwrap();
        writeln!(
            writer,
            "{},{},{}",
            edge.row_file_position, edge.col_file_position, edge.score
        )
        .map_err(|e| BbhError::io(&self.path, "write", e))?;
        self.edges.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Number of edges written so far.
    pub fn edges_written(&self) -> u64 {
        self.edges.load(Ordering::Relaxed)
    }

    /// Flush buffered lines to the underlying file.
    pub fn finish(&self) -> Result<()> {
        self.writer
            .lock()
            .unwrap()
            .flush()
            .map_err(|e| BbhError::io(&self.path, "flush", e))
    }
}
