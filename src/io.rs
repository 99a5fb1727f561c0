//! File system access for volume discovery and CSV export

use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory holding SEG-Y volumes
pub struct VolumeDirectory {
    base_path: PathBuf,
}

impl VolumeDirectory {
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Files with one of `extensions`, sorted by file name
    ///
    /// Extensions are matched case-insensitively and without the leading dot.
    /// Subdirectories are not descended into.
    pub fn volume_files(&self, extensions: &[String]) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in fs::read_dir(&self.base_path)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }

            let path = entry.path();
            let recognised = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)))
                .unwrap_or(false);
            if recognised {
                files.push(path);
            }
        }

        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }
}

/// Identifier of a volume file: its name without the extension
pub fn identifier_for(path: &Path) -> Option<String> {
    path.file_stem().and_then(|s| s.to_str()).map(str::to_string)
}

/// Destination directory for exported profiles
pub struct OutputDirectory {
    base_path: PathBuf,
}

impl OutputDirectory {
    /// Create the directory, including missing parents
    pub fn create(base_path: impl AsRef<Path>) -> Result<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Path of the CSV file for a derived name
    pub fn csv_path(&self, name: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_volume_files_sorted_and_filtered() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["vp.sgy", "ai.SEGY", "notes.txt", "density.segy", "README"] {
            fs::write(temp_dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(temp_dir.path().join("nested.sgy")).unwrap();

        let dir = VolumeDirectory::new(temp_dir.path());
        let extensions = vec!["segy".to_string(), "sgy".to_string()];
        let names: Vec<_> = dir
            .volume_files(&extensions)
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();

        assert_eq!(names, vec!["ai.SEGY", "density.segy", "vp.sgy"]);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let dir = VolumeDirectory::new(temp_dir.path().join("absent"));
        assert!(dir.volume_files(&["sgy".to_string()]).is_err());
    }

    #[test]
    fn test_identifier_and_output_paths() {
        assert_eq!(identifier_for(Path::new("/data/ai_full.sgy")), Some("ai_full".to_string()));

        let temp_dir = TempDir::new().unwrap();
        let out = OutputDirectory::create(temp_dir.path().join("a/b")).unwrap();
        assert!(out.base_path().is_dir());
        assert_eq!(out.csv_path("ai_F02"), temp_dir.path().join("a/b/ai_F02.csv"));
    }
}
