use crate::aggregate::{self, ChartRow, DURATION_BIN_LABELS};
use crate::data::{self, DataPaths};
use crate::filter::{self, GenreSelection};
use crate::model::{FileRecord, LibraryStats, NumericStats};
use std::collections::HashMap;

const TOP_ARTIST_ROWS: usize = 20;

/// One row of the genre browser: a selectable genre and its library-wide
/// track count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreEntry {
    pub name: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SummaryView {
    pub shown_files: usize,
    pub total_files: u64,
    pub files_with_errors: u64,
    pub unique_genres: u64,
    pub unique_artists: u64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DurationView {
    pub bins: Vec<ChartRow>,
    pub stats: Option<NumericStats>,
}

/// Everything the rendering layer consumes, rebuilt as plain values on every
/// selection change. Panels with an empty row list render their own
/// "no data" indicator.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardSnapshot {
    pub summary: SummaryView,
    pub genres: Vec<ChartRow>,
    pub artists: Vec<ChartRow>,
    pub durations: DurationView,
    pub years: Vec<ChartRow>,
    pub timeline: Vec<ChartRow>,
}

/// The single owner of the loaded datasets and the active genre selection.
///
/// The datasets are immutable after load; `select_genre` is the only state
/// transition and synchronously rebuilds the snapshot before returning.
#[derive(Debug)]
pub struct DashCore {
    pub files: Vec<FileRecord>,
    pub stats: LibraryStats,
    pub selection: GenreSelection,
    pub genre_entries: Vec<GenreEntry>,
    pub cursor: usize,
    pub snapshot: DashboardSnapshot,
    pub dirty: bool,
    pub status: String,
}

impl DashCore {
    pub fn new(stats: LibraryStats, files: Vec<FileRecord>) -> Self {
        let mut core = Self {
            files,
            stats,
            selection: GenreSelection::All,
            genre_entries: Vec::new(),
            cursor: 0,
            snapshot: DashboardSnapshot::default(),
            dirty: true,
            status: String::from("Ready"),
        };
        core.rebuild_genre_entries();
        core.rebuild_snapshot();
        core
    }

    pub fn load_from(paths: &DataPaths) -> anyhow::Result<Self> {
        let (stats, files) = data::load(paths)?;
        Ok(Self::new(stats, files))
    }

    /// Replaces both datasets from disk, keeping the active selection.
    pub fn reload(&mut self, paths: &DataPaths) -> anyhow::Result<()> {
        let (stats, files) = data::load(paths)?;
        self.stats = stats;
        self.files = files;
        self.rebuild_genre_entries();
        self.rebuild_snapshot();
        self.set_status("Data reloaded");
        Ok(())
    }

    /// The only write path for the selection. Accepts the `__all__` sentinel
    /// or any genre string; a genre no file carries simply produces empty
    /// views downstream.
    pub fn select_genre(&mut self, raw: &str) {
        self.selection = GenreSelection::parse(raw);
        self.rebuild_snapshot();
        self.set_status(&format!("Filter: {}", self.selection.label()));
    }

    /// Applies the genre under the browser cursor; row 0 is "All genres".
    pub fn select_cursor_entry(&mut self) {
        if self.cursor == 0 {
            self.select_genre(filter::ALL_SENTINEL);
            return;
        }

        let Some(entry) = self.genre_entries.get(self.cursor - 1) else {
            self.set_status("Nothing selected");
            return;
        };
        let name = entry.name.clone();
        self.select_genre(&name);
    }

    pub fn clear_filter(&mut self) {
        self.select_genre(filter::ALL_SENTINEL);
    }

    pub fn select_next(&mut self) {
        self.cursor = (self.cursor + 1).min(self.genre_entries.len());
        self.dirty = true;
    }

    pub fn select_prev(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
        self.dirty = true;
    }

    /// True when the browser row at `index` is the active selection.
    pub fn is_row_active(&self, index: usize) -> bool {
        match (&self.selection, index) {
            (GenreSelection::All, 0) => true,
            (GenreSelection::Genre(name), idx) if idx > 0 => self
                .genre_entries
                .get(idx - 1)
                .is_some_and(|entry| entry.name.eq_ignore_ascii_case(name)),
            _ => false,
        }
    }

    fn rebuild_genre_entries(&mut self) {
        let counts = match &self.stats.genre_counts {
            Some(precomputed) => precomputed.clone(),
            None => {
                let everything: Vec<&FileRecord> = self.files.iter().collect();
                aggregate::genre_counts(&everything)
            }
        };

        let mut entries: Vec<GenreEntry> = counts
            .into_iter()
            .map(|(name, count)| GenreEntry { name, count })
            .collect();
        entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
        self.genre_entries = entries;
        self.cursor = self.cursor.min(self.genre_entries.len());
    }

    /// Rebuilds every view in the defined order: summary, genres, artists,
    /// durations, years, timeline. Deterministic for a given selection, so
    /// reselecting the same genre repeats the same snapshot.
    fn rebuild_snapshot(&mut self) {
        let subset = filter::filtered_files(&self.files, &self.selection);

        let summary = self.summary_view(&subset);
        let genres = self.genre_rows();
        let artists = self.artist_rows(&subset);
        let durations = self.duration_view(&subset);
        let years = self.year_rows(&subset);
        let timeline = self.timeline_rows(&subset);

        self.snapshot = DashboardSnapshot {
            summary,
            genres,
            artists,
            durations,
            years,
            timeline,
        };
        self.dirty = true;
    }

    fn summary_view(&self, subset: &[&FileRecord]) -> SummaryView {
        match &self.stats.summary {
            Some(scan) => SummaryView {
                shown_files: subset.len(),
                total_files: scan.total_files_found,
                files_with_errors: scan.files_with_errors,
                unique_genres: scan.unique_genres,
                unique_artists: scan.unique_artists,
            },
            None => SummaryView {
                shown_files: subset.len(),
                total_files: self.files.len() as u64,
                files_with_errors: self
                    .files
                    .iter()
                    .filter(|file| file.error.is_some())
                    .count() as u64,
                unique_genres: self.genre_entries.len() as u64,
                unique_artists: {
                    let names: std::collections::HashSet<&str> = self
                        .files
                        .iter()
                        .filter_map(|file| file.artist.as_deref())
                        .filter(|name| !name.trim().is_empty())
                        .collect();
                    names.len() as u64
                },
            },
        }
    }

    /// The library-wide genre distribution backing the genre browser;
    /// filtering highlights a row rather than narrowing the chart, so the
    /// rows track `genre_entries` one-to-one in the same order.
    fn genre_rows(&self) -> Vec<ChartRow> {
        self.genre_entries
            .iter()
            .map(|entry| ChartRow::new(entry.name.clone(), entry.count))
            .collect()
    }

    fn artist_rows(&self, subset: &[&FileRecord]) -> Vec<ChartRow> {
        match &self.selection {
            GenreSelection::All => match &self.stats.artist_counts {
                Some(precomputed) => descending_rows(precomputed, TOP_ARTIST_ROWS),
                None => aggregate::artist_counts(subset),
            },
            GenreSelection::Genre(genre) => {
                let precomputed = self
                    .stats
                    .top_artists_per_genre
                    .as_ref()
                    .and_then(|per_genre| per_genre.get(genre));
                match precomputed {
                    Some(pairs) => pairs
                        .iter()
                        .take(TOP_ARTIST_ROWS)
                        .map(|(name, count)| ChartRow::new(name.clone(), *count))
                        .collect(),
                    None => aggregate::artist_counts(subset),
                }
            }
        }
    }

    fn duration_view(&self, subset: &[&FileRecord]) -> DurationView {
        let precomputed_bins = match &self.selection {
            GenreSelection::All => self.stats.duration_bins.as_ref(),
            GenreSelection::Genre(genre) => self
                .stats
                .per_genre_duration_bins
                .as_ref()
                .and_then(|per_genre| per_genre.get(genre)),
        };
        let bins = match precomputed_bins {
            Some(map) => bin_rows(map),
            None => aggregate::duration_bins(subset),
        };

        let stats = match &self.selection {
            GenreSelection::All => self
                .stats
                .durations
                .clone()
                .or_else(|| aggregate::duration_stats(subset)),
            GenreSelection::Genre(genre) => self
                .stats
                .per_genre_duration_stats
                .as_ref()
                .and_then(|per_genre| per_genre.get(genre))
                .and_then(Clone::clone)
                .or_else(|| aggregate::duration_stats(subset)),
        };

        DurationView { bins, stats }
    }

    fn year_rows(&self, subset: &[&FileRecord]) -> Vec<ChartRow> {
        if self.selection == GenreSelection::All {
            if let Some(precomputed) = &self.stats.year_counts {
                return year_rows(precomputed);
            }
        }
        aggregate::year_histogram(subset)
    }

    fn timeline_rows(&self, subset: &[&FileRecord]) -> Vec<ChartRow> {
        if self.selection == GenreSelection::All {
            if let Some(precomputed) = &self.stats.added_year_counts {
                return year_rows(precomputed);
            }
        }
        aggregate::added_timeline(subset)
    }

    fn set_status(&mut self, message: &str) {
        self.status = message.to_string();
        self.dirty = true;
    }
}

fn descending_rows(counts: &HashMap<String, u64>, keep: usize) -> Vec<ChartRow> {
    let mut rows: Vec<ChartRow> = counts
        .iter()
        .map(|(name, count)| ChartRow::new(name.clone(), *count))
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    rows.truncate(keep);
    rows
}

/// Precomputed duration-bin maps carry no ordering; rows come out in the
/// canonical bin order, absent labels skipped.
fn bin_rows(counts: &HashMap<String, u64>) -> Vec<ChartRow> {
    DURATION_BIN_LABELS
        .iter()
        .filter_map(|label| {
            counts
                .get(*label)
                .filter(|count| **count > 0)
                .map(|count| ChartRow::new(*label, *count))
        })
        .collect()
}

fn year_rows(counts: &HashMap<String, u64>) -> Vec<ChartRow> {
    let mut years: Vec<(i32, u64)> = counts
        .iter()
        .filter_map(|(year, count)| year.parse::<i32>().ok().map(|parsed| (parsed, *count)))
        .collect();
    years.sort_by_key(|(year, _)| *year);
    years
        .into_iter()
        .map(|(year, count)| ChartRow::new(year.to_string(), count))
        .collect()
}
