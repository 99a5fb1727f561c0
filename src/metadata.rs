//! Metadata carried alongside a loaded volume

use crate::error::Result;
use crate::segy::ByteLocations;
use crate::types::{SampleFormat, ValueRange};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Header information decoded from a SEG-Y file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegyMetadata {
    /// SEG-Y revision word (major revision in the high byte)
    pub revision: u16,

    /// Textual header, one entry per 80-column card
    pub text_header: Vec<String>,

    /// Selected binary header fields, keyed by name
    pub binary_header: BTreeMap<String, i32>,

    /// Sample encoding of the trace data
    pub sample_format: SampleFormat,

    /// Sample interval in microseconds
    pub sample_interval_us: u32,

    /// Samples per trace
    pub samples_per_trace: usize,

    /// Trace header byte locations used while decoding
    pub byte_locations: ByteLocations,
}

impl SegyMetadata {
    pub fn new(sample_format: SampleFormat, byte_locations: ByteLocations) -> Self {
        Self {
            revision: 0,
            text_header: Vec::new(),
            binary_header: BTreeMap::new(),
            sample_format,
            sample_interval_us: 0,
            samples_per_trace: 0,
            byte_locations,
        }
    }

    /// Major SEG-Y revision (0, 1 or 2)
    pub fn revision_major(&self) -> u8 {
        (self.revision >> 8) as u8
    }

    /// Sample interval in milliseconds
    pub fn sample_interval_ms(&self) -> f64 {
        self.sample_interval_us as f64 / 1000.0
    }
}

/// Complete metadata for one loaded volume
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeMetadata {
    /// Identifier derived from the file stem
    pub identifier: String,

    /// File the volume was loaded from
    pub source_path: PathBuf,

    /// Size of the source file in bytes
    pub file_size: usize,

    /// Number of traces read
    pub trace_count: usize,

    /// Load timestamp
    pub loaded_at: DateTime<Utc>,

    /// Range of the non-NaN sample values
    pub value_range: ValueRange,

    /// Decoded SEG-Y headers
    pub segy: SegyMetadata,
}

impl VolumeMetadata {
    pub fn new(identifier: impl Into<String>, source_path: impl Into<PathBuf>, segy: SegyMetadata) -> Self {
        Self {
            identifier: identifier.into(),
            source_path: source_path.into(),
            file_size: 0,
            trace_count: 0,
            loaded_at: Utc::now(),
            value_range: ValueRange::new(f64::NAN, f64::NAN),
            segy,
        }
    }

    /// Set file size
    pub fn with_file_size(mut self, file_size: usize) -> Self {
        self.file_size = file_size;
        self
    }

    /// Set trace count
    pub fn with_trace_count(mut self, trace_count: usize) -> Self {
        self.trace_count = trace_count;
        self
    }

    /// Set value range
    pub fn with_value_range(mut self, range: ValueRange) -> Self {
        self.value_range = range;
        self
    }

    /// Pretty-printed JSON rendition
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
