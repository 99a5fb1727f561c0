//! Core data types for SEG-Y volumes

use crate::error::{Result, WellTraceError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trace sample encodings supported by the reader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i16)]
pub enum SampleFormat {
    /// 4-byte IBM hexadecimal floating point
    IbmF32 = 1,
    /// 4-byte two's complement integer
    I32 = 2,
    /// 2-byte two's complement integer
    I16 = 3,
    /// 4-byte IEEE floating point
    IeeeF32 = 5,
    /// 1-byte two's complement integer
    I8 = 8,
}

impl SampleFormat {
    /// Resolve the data sample format code of the binary file header
    pub fn from_code(code: i16) -> Result<Self> {
        match code {
            1 => Ok(SampleFormat::IbmF32),
            2 => Ok(SampleFormat::I32),
            3 => Ok(SampleFormat::I16),
            5 => Ok(SampleFormat::IeeeF32),
            8 => Ok(SampleFormat::I8),
            other => Err(WellTraceError::UnsupportedSampleFormat(other)),
        }
    }

    /// Code as written in the binary file header
    pub fn code(&self) -> i16 {
        *self as i16
    }

    /// Size in bytes of one sample
    pub fn size_in_bytes(&self) -> usize {
        match self {
            SampleFormat::I8 => 1,
            SampleFormat::I16 => 2,
            SampleFormat::IbmF32 | SampleFormat::I32 | SampleFormat::IeeeF32 => 4,
        }
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Labelled coordinate axis of a volume
///
/// Coordinates are kept sorted ascending. Inline and crossline axes hold the
/// line numbers found in the trace headers, the sample axis holds times in ms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisDescriptor {
    /// Name of the axis (e.g., "iline", "xline", "twt")
    pub name: String,
    /// Unit of measurement (e.g., "ms", "m", "trace")
    pub unit: String,
    /// Coordinate of every position along the axis
    pub coords: Vec<f64>,
}

impl AxisDescriptor {
    /// Create an axis from explicit coordinates, sorting them ascending
    pub fn new(name: impl Into<String>, unit: impl Into<String>, mut coords: Vec<f64>) -> Self {
        coords.sort_by(|a, b| a.total_cmp(b));
        Self {
            name: name.into(),
            unit: unit.into(),
            coords,
        }
    }

    /// Create a regularly sampled axis
    pub fn regular(
        name: impl Into<String>,
        unit: impl Into<String>,
        start: f64,
        step: f64,
        num_samples: usize,
    ) -> Self {
        let coords = (0..num_samples).map(|i| start + i as f64 * step).collect();
        Self::new(name, unit, coords)
    }

    /// Number of positions along this axis
    pub fn num_samples(&self) -> usize {
        self.coords.len()
    }

    pub fn coord_min(&self) -> f64 {
        self.coords.first().copied().unwrap_or(f64::NAN)
    }

    pub fn coord_max(&self) -> f64 {
        self.coords.last().copied().unwrap_or(f64::NAN)
    }

    /// Index of the exact coordinate, if present
    pub fn exact_index(&self, coord: f64) -> Option<usize> {
        self.coords.binary_search_by(|c| c.total_cmp(&coord)).ok()
    }

    /// Index of the nearest coordinate
    ///
    /// Requests outside the axis clamp to the first or last position. When the
    /// request sits exactly halfway between two positions the larger one wins.
    pub fn nearest_index(&self, coord: f64) -> Option<usize> {
        if self.coords.is_empty() || coord.is_nan() {
            return None;
        }

        let upper = self.coords.partition_point(|&c| c < coord);
        if upper == 0 {
            return Some(0);
        }
        if upper == self.coords.len() {
            return Some(self.coords.len() - 1);
        }

        let below = coord - self.coords[upper - 1];
        let above = self.coords[upper] - coord;
        if below < above {
            Some(upper - 1)
        } else {
            Some(upper)
        }
    }
}

/// Value range for a volume
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}
