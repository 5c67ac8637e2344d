use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One scanned audio file as written by the scan pipeline into `files.json`.
///
/// Every field tolerates absence: a record damaged during scanning still
/// participates in every aggregation that does not need the missing field.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FileRecord {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub bitrate: Option<u64>,
    #[serde(default)]
    pub mtime_epoch: Option<i64>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ScanSummary {
    #[serde(default)]
    pub total_files_found: u64,
    #[serde(default)]
    pub files_scanned: u64,
    #[serde(default)]
    pub files_with_errors: u64,
    #[serde(default)]
    pub unique_genres: u64,
    #[serde(default)]
    pub unique_artists: u64,
    #[serde(default)]
    pub unique_albums: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct NumericStats {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub sum: f64,
    #[serde(default)]
    pub mean: f64,
    #[serde(default)]
    pub median: f64,
    #[serde(default)]
    pub min: f64,
    #[serde(default)]
    pub max: f64,
    #[serde(default)]
    pub stdev: f64,
}

/// Precomputed aggregates from `stats.json`.
///
/// Treated as a cache of answers: any key may be absent, and every consumer
/// falls back to recomputing from the raw file list when the slice it wants
/// is missing.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LibraryStats {
    #[serde(default)]
    pub summary: Option<ScanSummary>,
    #[serde(default)]
    pub genre_counts: Option<HashMap<String, u64>>,
    #[serde(default)]
    pub artist_counts: Option<HashMap<String, u64>>,
    #[serde(default)]
    pub top_artists_per_genre: Option<HashMap<String, Vec<(String, u64)>>>,
    #[serde(default)]
    pub duration_bins: Option<HashMap<String, u64>>,
    #[serde(default)]
    pub duration_percentiles: Option<HashMap<String, f64>>,
    #[serde(default)]
    pub per_genre_duration_bins: Option<HashMap<String, HashMap<String, u64>>>,
    #[serde(default)]
    pub per_genre_duration_stats: Option<HashMap<String, Option<NumericStats>>>,
    #[serde(default)]
    pub year_counts: Option<HashMap<String, u64>>,
    #[serde(default)]
    pub added_year_counts: Option<HashMap<String, u64>>,
    #[serde(default)]
    pub genre_percentages: Option<HashMap<String, f64>>,
    #[serde(default)]
    pub top_genres: Option<Vec<(String, u64)>>,
    #[serde(default)]
    pub durations: Option<NumericStats>,
}

/// Top-level wrapper of `stats.json`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StatsDocument {
    pub stats: LibraryStats,
}

/// Top-level wrapper of `files.json`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FilesDocument {
    pub files: Vec<FileRecord>,
}
