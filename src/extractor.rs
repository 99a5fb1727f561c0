//! Volume slice extraction at a well location - main API of the crate

use crate::config::{ExtractorConfig, ParseErrorPolicy};
use crate::error::{Result, WellTraceError};
use crate::io::{identifier_for, OutputDirectory, VolumeDirectory};
use crate::profile::{ResultSet, TraceProfile};
use crate::volume::SeismicVolume;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A file that failed to load
#[derive(Debug)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub error: WellTraceError,
}

/// Outcome of [`VolumeSliceExtractor::discover_and_load`]
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Identifiers loaded, in file name order
    pub loaded: Vec<String>,
    /// Files skipped under [`ParseErrorPolicy::Skip`]
    pub failures: Vec<LoadFailure>,
}

/// Outcome of [`VolumeSliceExtractor::process`]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProcessReport {
    /// Derived names stored, in processing order
    pub processed: Vec<String>,
    /// Tracked identifiers without a loaded volume
    pub missing: Vec<String>,
}

/// Outcome of [`VolumeSliceExtractor::export_all`]
#[derive(Debug, Default)]
pub struct ExportReport {
    pub written: Vec<PathBuf>,
    /// Derived names whose file could not be written
    pub failures: Vec<(String, WellTraceError)>,
}

impl ExportReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Loads SEG-Y volumes, slices them at a well and collects the profiles
///
/// Not synchronised: share across threads only behind external locking.
pub struct VolumeSliceExtractor {
    config: ExtractorConfig,

    /// Identifiers to process, in order
    tracked: Vec<String>,

    volumes: HashMap<String, SeismicVolume>,

    results: ResultSet,
}

impl VolumeSliceExtractor {
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        config.validate()?;

        let mut tracked: Vec<String> = Vec::with_capacity(config.variable_names.len());
        for name in &config.variable_names {
            if !tracked.contains(name) {
                tracked.push(name.clone());
            }
        }

        Ok(Self {
            config,
            tracked,
            volumes: HashMap::new(),
            results: ResultSet::new(),
        })
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Identifiers that `process` will visit
    pub fn tracked_identifiers(&self) -> &[String] {
        &self.tracked
    }

    pub fn volume(&self, identifier: &str) -> Option<&SeismicVolume> {
        self.volumes.get(identifier)
    }

    pub fn loaded_count(&self) -> usize {
        self.volumes.len()
    }

    fn track(&mut self, identifier: &str) {
        if !self.tracked.iter().any(|t| t == identifier) {
            self.tracked.push(identifier.to_string());
        }
    }

    /// Register an already loaded volume under `identifier`
    pub fn insert_volume(&mut self, identifier: impl Into<String>, volume: SeismicVolume) {
        let identifier = identifier.into();
        self.track(&identifier);
        self.volumes.insert(identifier, volume);
    }

    /// Drop a loaded volume, keeping its identifier tracked
    pub fn release_volume(&mut self, identifier: &str) -> Option<SeismicVolume> {
        self.volumes.remove(identifier)
    }

    /// Load every recognised file of the configured source directory
    pub fn discover_and_load(&mut self) -> Result<LoadReport> {
        let dir = self.config.source_dir.clone();
        self.discover_and_load_from(dir)
    }

    /// Load every recognised file of `directory` in file name order
    ///
    /// Each file becomes a volume keyed by its stem; a later file whose stem
    /// is already taken fails with [`WellTraceError::DuplicateIdentifier`].
    /// A failure is returned immediately under [`ParseErrorPolicy::Abort`],
    /// leaving the extractor as it was before the call, and recorded in the
    /// report under [`ParseErrorPolicy::Skip`].
    pub fn discover_and_load_from(&mut self, directory: impl AsRef<Path>) -> Result<LoadReport> {
        let files = VolumeDirectory::new(directory.as_ref()).volume_files(&self.config.extensions)?;
        let mut report = LoadReport::default();
        let mut staged: Vec<(String, SeismicVolume)> = Vec::new();

        for path in files {
            let Some(identifier) = identifier_for(&path) else {
                warn!("Skipping {}: file name is not valid UTF-8", path.display());
                continue;
            };

            let loaded = if staged.iter().any(|(id, _)| *id == identifier) {
                Err(WellTraceError::DuplicateIdentifier {
                    identifier: identifier.clone(),
                    path: path.clone(),
                })
            } else {
                SeismicVolume::load(&identifier, &path, self.config.byte_locations)
            };

            match loaded {
                Ok(volume) => {
                    info!("'{}' loaded from {}: {}", identifier, path.display(), volume.summary());
                    staged.push((identifier, volume));
                }
                Err(error) => match self.config.on_parse_error {
                    ParseErrorPolicy::Abort => return Err(error),
                    ParseErrorPolicy::Skip => {
                        warn!("Skipping {}: {}", path.display(), error);
                        report.failures.push(LoadFailure { path, error });
                    }
                },
            }
        }

        for (identifier, volume) in staged {
            if self.volumes.contains_key(&identifier) {
                debug!("Reloaded volume '{}'", identifier);
            }
            self.insert_volume(identifier.clone(), volume);
            report.loaded.push(identifier);
        }

        Ok(report)
    }

    /// Slice every tracked volume at the configured well position
    ///
    /// Identifiers without a loaded volume are logged and reported, not
    /// treated as errors. Running twice yields the same result set.
    pub fn process(&mut self) -> Result<ProcessReport> {
        let mut report = ProcessReport::default();
        let (well_inline, well_crossline) = (self.config.well_inline, self.config.well_crossline);

        for identifier in self.tracked.clone() {
            let Some(volume) = self.volumes.get(&identifier) else {
                warn!("Volume '{}' not found, skipping", identifier);
                report.missing.push(identifier);
                continue;
            };

            info!("Processing '{}'", identifier);
            let derived = self.config.derived_name(&identifier);
            let mut profile = volume.nearest_trace(well_inline, well_crossline, derived.clone())?;

            if let Some(column) = self.config.column_renames.get(&derived) {
                if profile.rename_value_column(column.clone()) {
                    info!("Column 'data' of {} renamed to '{}'", derived, column);
                }
            }

            if self.results.insert(profile).is_some() {
                debug!("Replaced existing profile {}", derived);
            }
            info!("{} created", derived);
            report.processed.push(derived);

            if self.config.release_after_process {
                self.release_volume(&identifier);
            }
        }

        Ok(report)
    }

    /// Profile of `identifier`, looked up by its derived name
    pub fn get(&self, identifier: &str) -> Option<&TraceProfile> {
        self.results.get(&self.config.derived_name(identifier))
    }

    /// Derived names of all stored profiles in insertion order
    pub fn list_processed(&self) -> Vec<&str> {
        self.results.names()
    }

    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    /// Write every profile to `<output_dir>/<derived-name>.csv`
    ///
    /// Failing to create the directory is an error. A file that cannot be
    /// written is recorded in the report and the remaining files are still
    /// exported.
    pub fn export_all(&self, output_dir: impl AsRef<Path>) -> Result<ExportReport> {
        let out = OutputDirectory::create(output_dir)?;
        let mut report = ExportReport::default();

        for profile in self.results.iter() {
            let path = out.csv_path(profile.name());
            match profile.write_csv_path(&path) {
                Ok(()) => {
                    info!("{} saved to {}", profile.name(), path.display());
                    report.written.push(path);
                }
                Err(error) => {
                    warn!("Failed to write {}: {}", path.display(), error);
                    report.failures.push((profile.name().to_string(), error));
                }
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segy::fixtures::SegyBuilder;
    use crate::segy::{ByteLocations, SegyReader};
    use bytes::Bytes;
    use std::fs;
    use tempfile::TempDir;

    fn cube(offset: f32) -> Vec<u8> {
        SegyBuilder::new(4)
            .grid(10..15, 20..24, move |il, xl, k| offset + (il * 100 + xl) as f32 + k as f32)
            .build()
    }

    fn volume(identifier: &str, offset: f32) -> SeismicVolume {
        let reader = SegyReader::from_bytes(Bytes::from(cube(offset)), ByteLocations::petrel_3d()).unwrap();
        SeismicVolume::from_reader(identifier, format!("{}.sgy", identifier), &reader).unwrap()
    }

    #[test]
    fn test_process_in_memory_volumes() {
        let config = ExtractorConfig::new(".", 12.0, 21.0).with_column_rename("ai_F02", "AI");
        let mut extractor = VolumeSliceExtractor::new(config).unwrap();
        extractor.insert_volume("ai", volume("ai", 0.0));
        extractor.insert_volume("vp", volume("vp", 0.5));

        let report = extractor.process().unwrap();
        assert_eq!(report.processed, vec!["ai_F02", "vp_F02"]);
        assert!(report.missing.is_empty());

        let ai = extractor.get("ai").unwrap();
        assert_eq!(ai.value_column(), "AI");
        assert_eq!(ai.values(), vec![1221.0, 1222.0, 1223.0, 1224.0]);
        assert_eq!(extractor.get("vp").unwrap().value_column(), "data");
        assert!(extractor.get("density").is_none());
    }

    #[test]
    fn test_missing_identifier_is_reported() {
        let config = ExtractorConfig::new(".", 12.0, 21.0).with_variable_names(["density", "ai"]);
        let mut extractor = VolumeSliceExtractor::new(config).unwrap();
        extractor.insert_volume("ai", volume("ai", 0.0));

        let report = extractor.process().unwrap();
        assert_eq!(report.missing, vec!["density"]);
        assert_eq!(report.processed, vec!["ai_F02"]);
        assert_eq!(extractor.list_processed(), vec!["ai_F02"]);
    }

    #[test]
    fn test_process_is_idempotent() {
        let mut extractor = VolumeSliceExtractor::new(ExtractorConfig::new(".", 11.0, 23.0)).unwrap();
        extractor.insert_volume("ai", volume("ai", 0.0));

        extractor.process().unwrap();
        let first: Vec<TraceProfile> = extractor.results().iter().cloned().collect();
        extractor.process().unwrap();
        let second: Vec<TraceProfile> = extractor.results().iter().cloned().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_release_after_process() {
        let config = ExtractorConfig::new(".", 11.0, 23.0).with_release_after_process(true);
        let mut extractor = VolumeSliceExtractor::new(config).unwrap();
        extractor.insert_volume("ai", volume("ai", 0.0));

        extractor.process().unwrap();
        assert_eq!(extractor.loaded_count(), 0);
        assert!(extractor.get("ai").is_some());

        let again = extractor.process().unwrap();
        assert_eq!(again.missing, vec!["ai"]);
        assert!(extractor.get("ai").is_some());
    }

    #[test]
    fn test_discover_abort_and_skip() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("ai.sgy"), cube(0.0)).unwrap();
        fs::write(temp_dir.path().join("broken.segy"), b"garbage").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), b"ignored").unwrap();

        let config = ExtractorConfig::new(temp_dir.path(), 12.0, 21.0);
        let mut aborting = VolumeSliceExtractor::new(config.clone()).unwrap();
        match aborting.discover_and_load() {
            Err(WellTraceError::Parse { path, .. }) => assert!(path.ends_with("broken.segy")),
            other => panic!("expected parse failure, got {:?}", other),
        }
        // ai.sgy loaded before the failure but was not kept
        assert_eq!(aborting.loaded_count(), 0);
        assert!(aborting.tracked_identifiers().is_empty());

        let mut skipping =
            VolumeSliceExtractor::new(config.with_parse_error_policy(ParseErrorPolicy::Skip)).unwrap();
        let report = skipping.discover_and_load().unwrap();
        assert_eq!(report.loaded, vec!["ai"]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(skipping.tracked_identifiers(), &["ai".to_string()]);
    }

    #[test]
    fn test_duplicate_stems() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("ai.segy"), cube(0.0)).unwrap();
        fs::write(temp_dir.path().join("ai.sgy"), cube(0.5)).unwrap();

        let config = ExtractorConfig::new(temp_dir.path(), 12.0, 21.0);
        let mut aborting = VolumeSliceExtractor::new(config.clone()).unwrap();
        match aborting.discover_and_load() {
            Err(WellTraceError::DuplicateIdentifier { identifier, path }) => {
                assert_eq!(identifier, "ai");
                assert!(path.ends_with("ai.sgy"));
            }
            other => panic!("expected duplicate identifier, got {:?}", other),
        }
        assert_eq!(aborting.loaded_count(), 0);

        let mut skipping =
            VolumeSliceExtractor::new(config.with_parse_error_policy(ParseErrorPolicy::Skip)).unwrap();
        let report = skipping.discover_and_load().unwrap();
        assert_eq!(report.loaded, vec!["ai"]);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].path.ends_with("ai.sgy"));
        assert_eq!(skipping.loaded_count(), 1);

        // the first file in name order keeps the identifier
        skipping.process().unwrap();
        assert_eq!(skipping.get("ai").unwrap().values()[0], 1221.0);
    }

    #[test]
    fn test_reload_replaces_volume() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("ai.sgy"), cube(0.0)).unwrap();

        let mut extractor =
            VolumeSliceExtractor::new(ExtractorConfig::new(temp_dir.path(), 12.0, 21.0)).unwrap();
        extractor.discover_and_load().unwrap();
        let again = extractor.discover_and_load().unwrap();
        assert_eq!(again.loaded, vec!["ai"]);
        assert_eq!(extractor.loaded_count(), 1);
        assert_eq!(extractor.tracked_identifiers(), &["ai".to_string()]);
    }
}
