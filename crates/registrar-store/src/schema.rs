//! Data file layout and storage configuration.
//!
//! Every collection lives in its own file inside one data directory.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// File names inside the data directory.
pub mod files {
    /// Student records, one per line.
    pub const STUDENTS: &str = "students.txt";

    /// Course records, one per line.
    pub const COURSES: &str = "courses.txt";

    /// Registration ledger, `studentId|courseId` per line.
    pub const REGISTRATIONS: &str = "registrations.txt";
}

/// The collections persisted by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataFile {
    /// `students.txt`
    Students,
    /// `courses.txt`
    Courses,
    /// `registrations.txt`
    Registrations,
}

impl DataFile {
    /// The file name of this collection.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Students => files::STUDENTS,
            Self::Courses => files::COURSES,
            Self::Registrations => files::REGISTRATIONS,
        }
    }

    /// Resolve this collection's file inside `data_dir`.
    #[must_use]
    pub fn path_in(self, data_dir: &Path) -> PathBuf {
        data_dir.join(self.file_name())
    }
}

/// Configuration for the flat-file store.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Directory holding the data files. Created on open if absent.
    #[serde(default = "StoreConfig::default_data_dir")]
    pub data_dir: PathBuf,

    /// Write the default dataset when a data file is missing.
    #[serde(default = "StoreConfig::default_seed")]
    pub seed_defaults: bool,
}

impl StoreConfig {
    fn default_data_dir() -> PathBuf {
        PathBuf::from("data")
    }

    const fn default_seed() -> bool {
        true
    }

    /// Configuration rooted at `data_dir` with seeding enabled.
    #[must_use]
    pub fn at(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            seed_defaults: Self::default_seed(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: Self::default_data_dir(),
            seed_defaults: Self::default_seed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert!(config.seed_defaults);
    }

    #[test]
    fn config_from_json_uses_defaults() {
        let config: StoreConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.data_dir, PathBuf::from("data"));

        let config: StoreConfig =
            serde_json::from_str(r#"{"data_dir":"/var/lib/registrar","seed_defaults":false}"#)
                .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/registrar"));
        assert!(!config.seed_defaults);
    }

    #[test]
    fn file_paths() {
        let dir = Path::new("data");
        assert_eq!(
            DataFile::Registrations.path_in(dir),
            PathBuf::from("data/registrations.txt")
        );
        assert_eq!(DataFile::Courses.file_name(), "courses.txt");
    }
}
