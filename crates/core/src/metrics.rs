//! Metrics collection and reporting for a single encode or decode run.
//!
//! Tracks:
//! - Timing (start, end, throughput)
//! - Input/output byte counts
//! - Container shape (table entries, payload bytes)
//!
//! Metrics are filled in by the caller from an [`EncodeSummary`] or
//! [`DecodeSummary`] once the run completes.

use std::time::{Duration, Instant};

use crate::container::{DecodeSummary, EncodeSummary};

/// Which direction a run went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Encode,
    Decode,
}

/// Counters and timing for one codec run.
#[derive(Debug, Clone)]
pub struct Metrics {
    /// Encode or decode
    pub operation: Operation,

    // === Timing ===
    /// When the run started
    pub start_time: Instant,

    /// When the run ended (set on completion)
    pub end_time: Option<Instant>,

    // === Input/Output ===
    /// Bytes read from the input stream
    pub input_bytes: u64,

    /// Bytes written to the output stream
    pub output_bytes: u64,

    // === Container ===
    /// Original (uncompressed) symbol count
    pub symbols: u64,

    /// Frequency table entries in the container
    pub table_entries: usize,

    /// Bit-packed payload bytes in the container
    pub payload_bytes: u64,
}

impl Metrics {
    /// Create new metrics with start time set to now.
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            start_time: Instant::now(),
            end_time: None,
            input_bytes: 0,
            output_bytes: 0,
            symbols: 0,
            table_entries: 0,
            payload_bytes: 0,
        }
    }

    /// Record the outcome of an encode.
    pub fn record_encode(&mut self, summary: &EncodeSummary) {
        self.input_bytes = summary.file_size;
        self.output_bytes = summary.total_bytes();
        self.symbols = summary.file_size;
        self.table_entries = summary.table_size;
        self.payload_bytes = summary.payload_bytes;
    }

    /// Record the outcome of a decode.
    pub fn record_decode(&mut self, summary: &DecodeSummary) {
        self.input_bytes = summary.total_bytes();
        self.output_bytes = summary.file_size;
        self.symbols = summary.file_size;
        self.table_entries = summary.table_size;
        self.payload_bytes = summary.payload_bytes;
    }

    /// Mark the run as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Get total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Container size relative to the original data.
    ///
    /// Returns 0.0 if there was no data.
    pub fn compression_ratio(&self) -> f64 {
        let (raw, packed) = match self.operation {
            Operation::Encode => (self.input_bytes, self.output_bytes),
            Operation::Decode => (self.output_bytes, self.input_bytes),
        };
        if raw == 0 {
            0.0
        } else {
            packed as f64 / raw as f64
        }
    }

    /// Average payload bits spent per original symbol.
    pub fn bits_per_symbol(&self) -> f64 {
        if self.symbols == 0 {
            0.0
        } else {
            (self.payload_bytes * 8) as f64 / self.symbols as f64
        }
    }

    /// Original bytes processed per second.
    pub fn throughput_bps(&self) -> f64 {
        let duration_secs = self.duration().as_secs_f64();
        if duration_secs == 0.0 {
            0.0
        } else {
            self.symbols as f64 / duration_secs
        }
    }

    /// Print a human-readable summary to stderr.
    pub fn print_summary(&self) {
        let title = match self.operation {
            Operation::Encode => "Encode",
            Operation::Decode => "Decode",
        };

        eprintln!("\n=== {} Summary ===", title);
        eprintln!("Duration: {} ms", self.duration().as_millis());
        eprintln!("Input:  {} bytes ({:.2} MiB)", self.input_bytes, self.input_bytes as f64 / 1024.0 / 1024.0);
        eprintln!("Output: {} bytes ({:.2} MiB)", self.output_bytes, self.output_bytes as f64 / 1024.0 / 1024.0);
        eprintln!();
        eprintln!("=== Container ===");
        eprintln!("Table entries: {}", self.table_entries);
        eprintln!("Payload: {} bytes", self.payload_bytes);
        eprintln!("Ratio: {:.1}%", self.compression_ratio() * 100.0);
        eprintln!("Bits per symbol: {:.3}", self.bits_per_symbol());
        eprintln!();
        eprintln!("=== Performance ===");
        eprintln!("Throughput: {:.2} MB/s", self.throughput_bps() / 1_000_000.0);
        eprintln!();
    }

    /// Export metrics as a simple text format (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "duration_ms={}\n\
             input_bytes={}\n\
             output_bytes={}\n\
             symbols={}\n\
             table_entries={}\n\
             payload_bytes={}\n\
             compression_ratio={:.4}\n\
             bits_per_symbol={:.4}\n",
            self.duration().as_millis(),
            self.input_bytes,
            self.output_bytes,
            self.symbols,
            self.table_entries,
            self.payload_bytes,
            self.compression_ratio(),
            self.bits_per_symbol(),
        )
    }
}
