//! SEG-Y file decoding
//!
//! Reads the textual and binary file headers, then walks fixed-length traces.
//! Inline, crossline and CDP coordinates are taken from trace header byte
//! locations supplied by the caller, since surveys disagree on where they live.

use crate::error::{Result, WellTraceError};
use crate::metadata::SegyMetadata;
use crate::types::SampleFormat;
use crate::utils::{decode_samples, decode_text_header, read_i16_be, read_i32_be};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Length of the textual file header
pub const TEXT_HEADER_LEN: usize = 3200;
/// Length of the binary file header
pub const BINARY_HEADER_LEN: usize = 400;
/// Length of every trace header
pub const TRACE_HEADER_LEN: usize = 240;

const FILE_HEADER_LEN: usize = TEXT_HEADER_LEN + BINARY_HEADER_LEN;

/// 1-based trace header byte positions of the 4-byte geometry fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ByteLocationsRepr")]
pub struct ByteLocations {
    pub iline: usize,
    pub xline: usize,
    pub cdp_x: usize,
    pub cdp_y: usize,
}

impl ByteLocations {
    pub fn new(iline: usize, xline: usize, cdp_x: usize, cdp_y: usize) -> Result<Self> {
        let locs = Self {
            iline,
            xline,
            cdp_x,
            cdp_y,
        };
        locs.validate()?;
        Ok(locs)
    }

    /// Petrel 3D export convention
    pub fn petrel_3d() -> Self {
        Self {
            iline: 5,
            xline: 21,
            cdp_x: 73,
            cdp_y: 77,
        }
    }

    /// SEG-Y revision 1 standard 3D positions
    pub fn standard_3d() -> Self {
        Self {
            iline: 189,
            xline: 193,
            cdp_x: 181,
            cdp_y: 185,
        }
    }

    /// Look up a named convention
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "petrel_3d" => Ok(Self::petrel_3d()),
            "standard_3d" => Ok(Self::standard_3d()),
            other => Err(WellTraceError::Configuration(format!(
                "Unknown byte location convention: {}",
                other
            ))),
        }
    }

    /// Every field must fit a 4-byte word inside the trace header
    pub fn validate(&self) -> Result<()> {
        for (field, loc) in [
            ("iline", self.iline),
            ("xline", self.xline),
            ("cdp_x", self.cdp_x),
            ("cdp_y", self.cdp_y),
        ] {
            if loc == 0 || loc + 3 > TRACE_HEADER_LEN {
                return Err(WellTraceError::Configuration(format!(
                    "Byte location {} for {} is outside the {} byte trace header",
                    loc, field, TRACE_HEADER_LEN
                )));
            }
        }
        Ok(())
    }
}

impl Default for ByteLocations {
    fn default() -> Self {
        Self::petrel_3d()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ByteLocationsRepr {
    Named(String),
    Explicit {
        iline: usize,
        xline: usize,
        cdp_x: usize,
        cdp_y: usize,
    },
}

impl TryFrom<ByteLocationsRepr> for ByteLocations {
    type Error = WellTraceError;

    fn try_from(repr: ByteLocationsRepr) -> Result<Self> {
        match repr {
            ByteLocationsRepr::Named(name) => Self::from_name(&name),
            ByteLocationsRepr::Explicit {
                iline,
                xline,
                cdp_x,
                cdp_y,
            } => Self::new(iline, xline, cdp_x, cdp_y),
        }
    }
}

/// Geometry fields of one trace header
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceHeader {
    pub iline: i32,
    pub xline: i32,
    pub cdp_x: f64,
    pub cdp_y: f64,
    /// Delay recording time in ms
    pub delay_ms: i16,
}

/// One decoded trace
#[derive(Debug, Clone)]
pub struct Trace {
    pub header: TraceHeader,
    pub samples: Vec<f32>,
}

/// Apply the SEG-Y coordinate scalar (bytes 71-72)
fn apply_scalar(value: i32, scalar: i16) -> f64 {
    match scalar {
        0 => value as f64,
        s if s < 0 => value as f64 / (-(s as f64)),
        s => value as f64 * s as f64,
    }
}

/// Random access reader over an in-memory SEG-Y file
pub struct SegyReader {
    bytes: Bytes,
    metadata: SegyMetadata,
    data_start: usize,
    trace_len: usize,
    trace_count: usize,
}

impl SegyReader {
    /// Read a SEG-Y file from disk, tagging failures with its path
    pub fn open(path: impl AsRef<Path>, byte_locations: ByteLocations) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        Self::from_bytes(Bytes::from(data), byte_locations)
            .map_err(|e| WellTraceError::parse(path, e))
    }

    /// Parse the file headers and validate the trace layout
    pub fn from_bytes(bytes: Bytes, byte_locations: ByteLocations) -> Result<Self> {
        byte_locations.validate()?;

        if bytes.len() < FILE_HEADER_LEN {
            return Err(WellTraceError::InvalidFormat(format!(
                "file is {} bytes, shorter than the {} byte file headers",
                bytes.len(),
                FILE_HEADER_LEN
            )));
        }

        let binary = &bytes[TEXT_HEADER_LEN..FILE_HEADER_LEN];
        let sample_interval = read_i16_be(binary, 16)? as u16;
        let samples_per_trace = read_i16_be(binary, 20)? as u16 as usize;
        let format_code = read_i16_be(binary, 24)?;
        let revision = read_i16_be(binary, 300)? as u16;
        let fixed_length = read_i16_be(binary, 302)?;
        let extended_headers = read_i16_be(binary, 304)?;

        let sample_format = SampleFormat::from_code(format_code)?;

        if samples_per_trace == 0 {
            return Err(WellTraceError::InvalidFormat(
                "binary header declares zero samples per trace".to_string(),
            ));
        }
        if extended_headers < 0 {
            return Err(WellTraceError::InvalidFormat(
                "variable number of extended textual headers is not supported".to_string(),
            ));
        }

        let data_start = FILE_HEADER_LEN + extended_headers as usize * TEXT_HEADER_LEN;
        if data_start > bytes.len() {
            return Err(WellTraceError::InvalidFormat(format!(
                "{} extended textual headers run past the end of the file",
                extended_headers
            )));
        }

        let trace_len = TRACE_HEADER_LEN + samples_per_trace * sample_format.size_in_bytes();
        let body = bytes.len() - data_start;
        if body == 0 {
            return Err(WellTraceError::InvalidFormat("file contains no traces".to_string()));
        }
        if body % trace_len != 0 {
            return Err(WellTraceError::InvalidFormat(format!(
                "truncated trace data: {} trailing bytes for traces of {} bytes",
                body % trace_len,
                trace_len
            )));
        }

        let mut metadata = SegyMetadata::new(sample_format, byte_locations);
        metadata.revision = revision;
        metadata.text_header = decode_text_header(&bytes[..TEXT_HEADER_LEN]);
        metadata.sample_interval_us = sample_interval as u32;
        metadata.samples_per_trace = samples_per_trace;

        let fields = [
            ("job_id", read_i32_be(binary, 0)?),
            ("line_number", read_i32_be(binary, 4)?),
            ("sample_interval", sample_interval as i32),
            ("samples_per_trace", samples_per_trace as i32),
            ("format_code", format_code as i32),
            ("measurement_system", read_i16_be(binary, 54)? as i32),
            ("revision", revision as i32),
            ("fixed_length", fixed_length as i32),
            ("extended_headers", extended_headers as i32),
        ];
        for (name, value) in fields {
            metadata.binary_header.insert(name.to_string(), value);
        }

        Ok(Self {
            trace_count: body / trace_len,
            bytes,
            metadata,
            data_start,
            trace_len,
        })
    }

    pub fn metadata(&self) -> &SegyMetadata {
        &self.metadata
    }

    pub fn trace_count(&self) -> usize {
        self.trace_count
    }

    /// Size of the underlying file in bytes
    pub fn len_bytes(&self) -> usize {
        self.bytes.len()
    }

    /// Decode the trace at `index`
    pub fn trace(&self, index: usize) -> Result<Trace> {
        if index >= self.trace_count {
            return Err(WellTraceError::InvalidArgument(format!(
                "trace {} out of range for {} traces",
                index, self.trace_count
            )));
        }

        let start = self.data_start + index * self.trace_len;
        let raw_header = &self.bytes[start..start + TRACE_HEADER_LEN];
        let payload = &self.bytes[start + TRACE_HEADER_LEN..start + self.trace_len];

        let locs = &self.metadata.byte_locations;
        let scalar = read_i16_be(raw_header, 70)?;
        let header = TraceHeader {
            iline: read_i32_be(raw_header, locs.iline - 1)?,
            xline: read_i32_be(raw_header, locs.xline - 1)?,
            cdp_x: apply_scalar(read_i32_be(raw_header, locs.cdp_x - 1)?, scalar),
            cdp_y: apply_scalar(read_i32_be(raw_header, locs.cdp_y - 1)?, scalar),
            delay_ms: read_i16_be(raw_header, 108)?,
        };

        Ok(Trace {
            header,
            samples: decode_samples(payload, self.metadata.sample_format)?,
        })
    }

    /// Decode every trace in file order
    pub fn traces(&self) -> impl Iterator<Item = Result<Trace>> + '_ {
        (0..self.trace_count).map(move |i| self.trace(i))
    }
}
