use crate::model::{FileRecord, FilesDocument, LibraryStats, StatsDocument};
use anyhow::{Context, Result, anyhow};
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

/// Where the two pipeline documents live on disk.
#[derive(Debug, Clone)]
pub struct DataPaths {
    pub stats: PathBuf,
    pub files: PathBuf,
}

impl DataPaths {
    pub fn from_dir(dir: &Path) -> Self {
        Self {
            stats: dir.join("stats.json"),
            files: dir.join("files.json"),
        }
    }
}

/// Loads both documents, in parallel, and fails startup if either is missing
/// or malformed. There is no partial-data mode: the dashboard only renders
/// with both documents decoded.
pub fn load(paths: &DataPaths) -> Result<(LibraryStats, Vec<FileRecord>)> {
    let stats_path = paths.stats.clone();
    let files_path = paths.files.clone();

    let stats_handle = thread::spawn(move || load_stats(&stats_path));
    let files_handle = thread::spawn(move || load_files(&files_path));

    let stats = stats_handle
        .join()
        .map_err(|_| anyhow!("stats loader panicked"))??;
    let files = files_handle
        .join()
        .map_err(|_| anyhow!("files loader panicked"))??;
    Ok((stats, files))
}

fn load_stats(path: &Path) -> Result<LibraryStats> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let document: StatsDocument = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(document.stats)
}

fn load_files(path: &Path) -> Result<Vec<FileRecord>> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let document: FilesDocument = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(document.files)
}
