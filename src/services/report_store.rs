use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportStoreError {
    #[error("invalid report name: {0:?}")]
    InvalidName(String),
    #[error("report not found: {0}")]
    NotFound(String),
    #[error("report already exists: {0}")]
    AlreadyExists(String),
    #[error("failed to create report directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("report i/o failed for {name}: {source}")]
    Io { name: String, source: io::Error },
    #[error("report store lock poisoned")]
    Poisoned,
}

/// Write-once storage for rendered reports, addressed by file name.
pub trait ReportStore: Send + Sync {
    fn write(&self, name: &str, bytes: &[u8]) -> Result<(), ReportStoreError>;
    fn read(&self, name: &str) -> Result<Vec<u8>, ReportStoreError>;
    fn exists(&self, name: &str) -> bool;
}

/// Accepts a name only when it is a single plain path component.
pub fn validate_report_name(name: &str) -> Result<&str, ReportStoreError> {
    let invalid = name.is_empty()
        || name.starts_with('.')
        || name.contains(['/', '\\', '\0', ':']);
    if invalid {
        return Err(ReportStoreError::InvalidName(name.to_string()));
    }
    Ok(name)
}

/// Stores reports as files under one directory.
pub struct DirectoryReportStore {
    root: PathBuf,
}

impl DirectoryReportStore {
    /// Opens `root`, creating it when missing.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self, ReportStoreError> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root).map_err(|source| ReportStoreError::CreateDir {
            path: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, ReportStoreError> {
        Ok(self.root.join(validate_report_name(name)?))
    }
}

impl ReportStore for DirectoryReportStore {
    fn write(&self, name: &str, bytes: &[u8]) -> Result<(), ReportStoreError> {
        let path = self.path_for(name)?;
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|source| match source.kind() {
                io::ErrorKind::AlreadyExists => ReportStoreError::AlreadyExists(name.to_string()),
                _ => ReportStoreError::Io {
                    name: name.to_string(),
                    source,
                },
            })?;
        file.write_all(bytes)
            .and_then(|_| file.flush())
            .map_err(|source| ReportStoreError::Io {
                name: name.to_string(),
                source,
            })
    }

    fn read(&self, name: &str) -> Result<Vec<u8>, ReportStoreError> {
        let path = self.path_for(name)?;
        std::fs::read(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => ReportStoreError::NotFound(name.to_string()),
            _ => ReportStoreError::Io {
                name: name.to_string(),
                source,
            },
        })
    }

    fn exists(&self, name: &str) -> bool {
        self.path_for(name).map(|path| path.is_file()).unwrap_or(false)
    }
}

#[derive(Default)]
pub struct InMemoryReportStore {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .files
            .lock()
            .map(|files| files.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }
}

impl ReportStore for InMemoryReportStore {
    fn write(&self, name: &str, bytes: &[u8]) -> Result<(), ReportStoreError> {
        let name = validate_report_name(name)?;
        let mut files = self.files.lock().map_err(|_| ReportStoreError::Poisoned)?;
        if files.contains_key(name) {
            return Err(ReportStoreError::AlreadyExists(name.to_string()));
        }
        files.insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    fn read(&self, name: &str) -> Result<Vec<u8>, ReportStoreError> {
        let name = validate_report_name(name)?;
        let files = self.files.lock().map_err(|_| ReportStoreError::Poisoned)?;
        files
            .get(name)
            .cloned()
            .ok_or_else(|| ReportStoreError::NotFound(name.to_string()))
    }

    fn exists(&self, name: &str) -> bool {
        validate_report_name(name).is_ok()
            && self
                .files
                .lock()
                .map(|files| files.contains_key(name))
                .unwrap_or(false)
    }
}
