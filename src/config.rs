//! Extraction configuration

use crate::error::{Result, WellTraceError};
use crate::segy::ByteLocations;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Suffix appended to identifiers when naming profiles
pub const DEFAULT_TAG: &str = "F02";

/// What to do when a file in the source directory fails to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseErrorPolicy {
    /// Stop at the first failure and return it
    #[default]
    Abort,
    /// Log the failure, record it in the load report and continue
    Skip,
}

/// Settings of a [`VolumeSliceExtractor`](crate::VolumeSliceExtractor)
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Directory scanned for SEG-Y files
    pub source_dir: PathBuf,

    /// Identifiers to slice, in processing order
    pub variable_names: Vec<String>,

    /// Well inline position
    pub well_inline: f64,

    /// Well crossline position
    pub well_crossline: f64,

    /// Suffix of derived profile names
    pub tag: String,

    /// New value-column name keyed by derived profile name
    pub column_renames: BTreeMap<String, String>,

    /// Trace header byte locations, a named convention or explicit positions
    pub byte_locations: ByteLocations,

    /// Recognised file extensions, compared case-insensitively
    pub extensions: Vec<String>,

    pub on_parse_error: ParseErrorPolicy,

    /// Drop each volume once it has been sliced
    pub release_after_process: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("."),
            variable_names: Vec::new(),
            well_inline: 0.0,
            well_crossline: 0.0,
            tag: DEFAULT_TAG.to_string(),
            column_renames: BTreeMap::new(),
            byte_locations: ByteLocations::petrel_3d(),
            extensions: vec!["segy".to_string(), "sgy".to_string()],
            on_parse_error: ParseErrorPolicy::Abort,
            release_after_process: false,
        }
    }
}

impl ExtractorConfig {
    pub fn new(source_dir: impl Into<PathBuf>, well_inline: f64, well_crossline: f64) -> Self {
        Self {
            source_dir: source_dir.into(),
            well_inline,
            well_crossline,
            ..Self::default()
        }
    }

    /// Load from a JSON file
    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the derived-name suffix
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Set identifiers to process besides the discovered ones
    pub fn with_variable_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.variable_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Rename the value column of one derived profile
    pub fn with_column_rename(mut self, derived_name: impl Into<String>, column: impl Into<String>) -> Self {
        self.column_renames.insert(derived_name.into(), column.into());
        self
    }

    pub fn with_byte_locations(mut self, byte_locations: ByteLocations) -> Self {
        self.byte_locations = byte_locations;
        self
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_parse_error_policy(mut self, policy: ParseErrorPolicy) -> Self {
        self.on_parse_error = policy;
        self
    }

    pub fn with_release_after_process(mut self, release: bool) -> Self {
        self.release_after_process = release;
        self
    }

    /// Derived profile name for an identifier
    pub fn derived_name(&self, identifier: &str) -> String {
        format!("{}_{}", identifier, self.tag)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tag.is_empty() {
            return Err(WellTraceError::Configuration("tag must not be empty".to_string()));
        }
        if !self.well_inline.is_finite() || !self.well_crossline.is_finite() {
            return Err(WellTraceError::Configuration(format!(
                "well position ({}, {}) must be finite",
                self.well_inline, self.well_crossline
            )));
        }
        if self.extensions.is_empty() {
            return Err(WellTraceError::Configuration(
                "at least one volume file extension is required".to_string(),
            ));
        }
        self.byte_locations.validate()
    }
}
