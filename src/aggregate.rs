use crate::filter;
use crate::model::{FileRecord, NumericStats};
use std::collections::HashMap;

/// Duration bucket edges in seconds; each label covers `[edge, next_edge)`.
const DURATION_BIN_EDGES: &[f64] = &[0.0, 120.0, 240.0, 360.0, 720.0];
pub const DURATION_BIN_LABELS: &[&str] = &["<2m", "2-4m", "4-6m", "6-12m", "12m+"];

const TOP_ARTISTS: usize = 20;

/// A labelled count, the unit every chart panel consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRow {
    pub label: String,
    pub count: u64,
}

impl ChartRow {
    pub fn new(label: impl Into<String>, count: u64) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

/// The bin label for a duration in seconds. Every duration lands in exactly
/// one bin; anything at or past 720 seconds is `12m+`.
pub fn duration_bin_label(seconds: f64) -> &'static str {
    for (idx, edge) in DURATION_BIN_EDGES.iter().enumerate().skip(1) {
        if seconds < *edge {
            return DURATION_BIN_LABELS[idx - 1];
        }
    }
    DURATION_BIN_LABELS[DURATION_BIN_LABELS.len() - 1]
}

/// Duration histogram over a filtered subset. Absent durations count as zero
/// seconds; bins that stay empty are omitted, the rest keep bin order.
pub fn duration_bins(files: &[&FileRecord]) -> Vec<ChartRow> {
    let mut counts = [0_u64; 5];
    for file in files {
        let seconds = file.duration.unwrap_or(0.0);
        let label = duration_bin_label(seconds);
        let slot = DURATION_BIN_LABELS
            .iter()
            .position(|candidate| *candidate == label)
            .unwrap_or(0);
        counts[slot] += 1;
    }

    DURATION_BIN_LABELS
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(label, count)| ChartRow::new(*label, count))
        .collect()
}

/// Release-year histogram, ascending by year. Files without an extractable
/// year are left out entirely.
pub fn year_histogram(files: &[&FileRecord]) -> Vec<ChartRow> {
    let mut counts: HashMap<i32, u64> = HashMap::new();
    for file in files {
        if let Some(year) = filter::year_of(file) {
            *counts.entry(year).or_default() += 1;
        }
    }
    sorted_year_rows(counts)
}

/// Added-to-library timeline by UTC year of the modification time, ascending.
/// A missing mtime falls back to epoch zero and lands in 1970.
pub fn added_timeline(files: &[&FileRecord]) -> Vec<ChartRow> {
    let mut counts: HashMap<i32, u64> = HashMap::new();
    for file in files {
        let epoch = file.mtime_epoch.unwrap_or(0);
        if let Some(year) = filter::year_from_epoch(epoch) {
            *counts.entry(year).or_default() += 1;
        }
    }
    sorted_year_rows(counts)
}

fn sorted_year_rows(counts: HashMap<i32, u64>) -> Vec<ChartRow> {
    let mut years: Vec<(i32, u64)> = counts.into_iter().collect();
    years.sort_by_key(|(year, _)| *year);
    years
        .into_iter()
        .map(|(year, count)| ChartRow::new(year.to_string(), count))
        .collect()
}

/// Occurrence counts of non-empty artist fields, descending by count with a
/// stable tie order, truncated to the top 20.
pub fn artist_counts(files: &[&FileRecord]) -> Vec<ChartRow> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();
    for file in files {
        let Some(artist) = file.artist.as_deref().filter(|name| !name.trim().is_empty()) else {
            continue;
        };
        if !counts.contains_key(artist) {
            first_seen.push(artist);
        }
        *counts.entry(artist).or_default() += 1;
    }

    let mut rows: Vec<ChartRow> = first_seen
        .into_iter()
        .map(|artist| ChartRow::new(artist, counts[artist]))
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows.truncate(TOP_ARTISTS);
    rows
}

/// Genre occurrence counts over a subset, split per part and title-cased the
/// way the scan pipeline normalizes them; a file with no genre field counts
/// under "Unknown". Used when `genre_counts` is missing from the stats
/// document.
pub fn genre_counts(files: &[&FileRecord]) -> HashMap<String, u64> {
    let mut counts: HashMap<String, u64> = HashMap::new();
    for file in files {
        let mut any = false;
        if let Some(raw) = file.genre.as_deref() {
            for part in filter::split_genres(raw) {
                *counts.entry(title_case(part)).or_default() += 1;
                any = true;
            }
        }
        if !any {
            *counts.entry(String::from("Unknown")).or_default() += 1;
        }
    }
    counts
}

fn title_case(part: &str) -> String {
    part.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Summary statistics over the present durations of a subset; `None` when no
/// file carries a duration.
pub fn duration_stats(files: &[&FileRecord]) -> Option<NumericStats> {
    let mut durations: Vec<f64> = files.iter().filter_map(|file| file.duration).collect();
    if durations.is_empty() {
        return None;
    }

    durations.sort_by(|a, b| a.total_cmp(b));
    let count = durations.len();
    let sum: f64 = durations.iter().sum();
    let mean = sum / count as f64;
    let median = if count % 2 == 1 {
        durations[count / 2]
    } else {
        (durations[count / 2 - 1] + durations[count / 2]) / 2.0
    };
    let stdev = if count > 1 {
        let variance = durations
            .iter()
            .map(|value| (value - mean).powi(2))
            .sum::<f64>()
            / (count - 1) as f64;
        variance.sqrt()
    } else {
        0.0
    };

    Some(NumericStats {
        count: count as u64,
        sum,
        mean,
        median,
        min: durations[0],
        max: durations[count - 1],
        stdev,
    })
}
