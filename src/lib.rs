//! welltrace - well-location traces from SEG-Y volumes and TWT log resampling
//!
//! Two batch stages sharing nothing but tabular data:
//!
//! - [`VolumeSliceExtractor`] discovers SEG-Y files in a directory, loads each
//!   into a labelled (inline, crossline, sample) cube, slices the trace nearest
//!   to a well position and exports the profiles as CSV.
//! - [`LogResampler`] averages the numeric columns of a well log into
//!   fixed-width TWT bins.
//!
//! Everything is synchronous and single-threaded.
//!
//! # Example
//!
//! ```rust,ignore
//! use welltrace::{ExtractorConfig, VolumeSliceExtractor, WellLogTable};
//!
//! # fn example() -> welltrace::Result<()> {
//! let config = ExtractorConfig::new("data/seismic", 1150.0, 2020.0)
//!     .with_column_rename("ai_F02", "AI");
//! let mut extractor = VolumeSliceExtractor::new(config)?;
//! extractor.discover_and_load()?;
//! extractor.process()?;
//! extractor.export_all("out")?;
//!
//! let log = WellLogTable::read_csv("data/well_F02.csv")?;
//! let resampled = welltrace::resample(&log, 0.5)?;
//! resampled.write_csv_path("out/well_F02_resampled.csv")?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod extractor;
pub mod io;
pub mod metadata;
pub mod profile;
pub mod resample;
pub mod segy;
pub mod types;
pub mod utils;
pub mod volume;
pub mod welllog;

// Re-exports
pub use config::{ExtractorConfig, ParseErrorPolicy};
pub use error::{Result, WellTraceError};
pub use extractor::{ExportReport, LoadReport, ProcessReport, VolumeSliceExtractor};
pub use metadata::{SegyMetadata, VolumeMetadata};
pub use profile::{ProfileRow, ResultSet, TraceProfile};
pub use resample::{resample, LogResampler, ResampleOptions, ResampledRow, ResampledTable};
pub use segy::{ByteLocations, SegyReader};
pub use types::{AxisDescriptor, SampleFormat};
pub use volume::SeismicVolume;
pub use welllog::{coerce_numeric, LogValue, WellLogTable};

/// Version of the welltrace crate
pub const WELLTRACE_VERSION: &str = env!("CARGO_PKG_VERSION");
