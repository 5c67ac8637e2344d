use crate::model::FileRecord;
use time::OffsetDateTime;

/// Wire sentinel meaning "no genre filter".
pub const ALL_SENTINEL: &str = "__all__";

const GENRE_SEPARATORS: &[char] = &[',', ';', '/', '|'];

/// The active genre filter. At most one genre at a time; `All` is the
/// initial state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GenreSelection {
    #[default]
    All,
    Genre(String),
}

impl GenreSelection {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL_SENTINEL) {
            Self::All
        } else {
            Self::Genre(trimmed.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => "All genres",
            Self::Genre(name) => name.as_str(),
        }
    }
}

/// Splits a raw genre field into trimmed, non-empty parts. The scan pipeline
/// leaves multi-valued genres as one string separated by comma, semicolon,
/// slash, or pipe.
pub fn split_genres(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(GENRE_SEPARATORS)
        .map(str::trim)
        .filter(|part| !part.is_empty())
}

/// True iff any split part of the file's genre field equals `genre`,
/// case-insensitively. The target is matched as a single value, never split.
pub fn genre_matches(file: &FileRecord, genre: &str) -> bool {
    let Some(raw) = file.genre.as_deref() else {
        return false;
    };
    split_genres(raw).any(|part| part.eq_ignore_ascii_case(genre))
}

fn has_unknown_part(raw: &str) -> bool {
    split_genres(raw).any(|part| part.eq_ignore_ascii_case("unknown"))
}

/// The calendar year of a file, preferring a 4-digit 19xx/20xx token in the
/// date text and falling back to the UTC year of the modification time.
pub fn year_of(file: &FileRecord) -> Option<i32> {
    if let Some(year) = file.date.as_deref().and_then(year_from_text) {
        return Some(year);
    }
    file.mtime_epoch.and_then(year_from_epoch)
}

/// First 4-digit sequence beginning with "19" or "20" anywhere in the text.
pub fn year_from_text(text: &str) -> Option<i32> {
    let bytes = text.as_bytes();
    bytes.windows(4).find_map(|window| {
        if !window.iter().all(u8::is_ascii_digit) {
            return None;
        }
        if !window.starts_with(b"19") && !window.starts_with(b"20") {
            return None;
        }
        std::str::from_utf8(window).ok()?.parse().ok()
    })
}

/// UTC calendar year of an epoch timestamp in whole seconds.
pub fn year_from_epoch(epoch_seconds: i64) -> Option<i32> {
    OffsetDateTime::from_unix_timestamp(epoch_seconds)
        .ok()
        .map(|moment| moment.year())
}

/// The filtered subset for a selection, in the original file order.
///
/// With no filter active, files whose genre field is absent are dropped, as
/// are files any of whose genre parts reads "unknown" (any case). A specific
/// selection bypasses that exclusion: selecting "Unknown" explicitly matches
/// it literally.
pub fn filtered_files<'a>(
    files: &'a [FileRecord],
    selection: &GenreSelection,
) -> Vec<&'a FileRecord> {
    match selection {
        GenreSelection::All => files
            .iter()
            .filter(|file| {
                file.genre
                    .as_deref()
                    .is_some_and(|raw| !has_unknown_part(raw))
            })
            .collect(),
        GenreSelection::Genre(genre) => files
            .iter()
            .filter(|file| genre_matches(file, genre))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_with_genre(genre: Option<&str>) -> FileRecord {
        FileRecord {
            genre: genre.map(str::to_string),
            ..FileRecord::default()
        }
    }

    #[test]
    fn matches_any_split_part_case_insensitively() {
        let file = file_with_genre(Some("Rock; Pop"));
        assert!(genre_matches(&file, "pop"));
        assert!(genre_matches(&file, "ROCK"));
        assert!(!genre_matches(&file, "jazz"));
    }

    #[test]
    fn target_genre_is_not_split() {
        let file = file_with_genre(Some("Rock"));
        assert!(!genre_matches(&file, "rock, jazz"));
        assert!(!genre_matches(&file, "pop"));
    }

    #[test]
    fn missing_genre_never_matches() {
        let file = file_with_genre(None);
        assert!(!genre_matches(&file, "rock"));
    }

    #[test]
    fn splits_on_all_separators_with_whitespace() {
        let parts: Vec<&str> = split_genres(" Rock /  Pop|Jazz ;Blues,, ").collect();
        assert_eq!(parts, vec!["Rock", "Pop", "Jazz", "Blues"]);
    }

    #[test]
    fn year_prefers_date_text() {
        let file = FileRecord {
            date: Some(String::from("Released 1998-04-01")),
            mtime_epoch: Some(1_000_000_000),
            ..FileRecord::default()
        };
        assert_eq!(year_of(&file), Some(1998));
    }

    #[test]
    fn year_falls_back_to_mtime() {
        let file = FileRecord {
            date: Some(String::from("no year here, 123")),
            mtime_epoch: Some(1_000_000_000),
            ..FileRecord::default()
        };
        // 2001-09-09 UTC
        assert_eq!(year_of(&file), Some(2001));
    }

    #[test]
    fn year_absent_when_nothing_usable() {
        assert_eq!(year_of(&FileRecord::default()), None);
    }

    #[test]
    fn year_token_must_start_19_or_20() {
        assert_eq!(year_from_text("catalog 3099"), None);
        assert_eq!(year_from_text("1899 then 2015"), Some(2015));
    }

    #[test]
    fn default_view_excludes_unknown_and_missing_genre() {
        let files = vec![
            file_with_genre(Some("Rock")),
            file_with_genre(Some("unknown")),
            file_with_genre(Some("Rock; UNKNOWN")),
            file_with_genre(None),
        ];

        let subset = filtered_files(&files, &GenreSelection::All);
        assert_eq!(subset.len(), 1);
        assert_eq!(subset[0].genre.as_deref(), Some("Rock"));
    }

    #[test]
    fn explicit_unknown_selection_matches_literally() {
        let files = vec![
            file_with_genre(Some("Rock")),
            file_with_genre(Some("Unknown")),
            file_with_genre(None),
        ];

        let subset = filtered_files(&files, &GenreSelection::Genre(String::from("Unknown")));
        assert_eq!(subset.len(), 1);
        assert_eq!(subset[0].genre.as_deref(), Some("Unknown"));
    }

    #[test]
    fn unmatched_genre_yields_empty_subset() {
        let files = vec![file_with_genre(Some("Rock"))];
        let subset = filtered_files(&files, &GenreSelection::Genre(String::from("Zydeco")));
        assert!(subset.is_empty());
    }

    #[test]
    fn filter_preserves_input_order() {
        let files: Vec<FileRecord> = ["Rock", "Pop", "Rock", "Rock; Pop"]
            .iter()
            .map(|genre| file_with_genre(Some(genre)))
            .collect();

        let subset = filtered_files(&files, &GenreSelection::Genre(String::from("rock")));
        let genres: Vec<&str> = subset
            .iter()
            .filter_map(|file| file.genre.as_deref())
            .collect();
        assert_eq!(genres, vec!["Rock", "Rock", "Rock; Pop"]);
    }

    #[test]
    fn sentinel_parses_to_no_filter() {
        assert_eq!(GenreSelection::parse("__all__"), GenreSelection::All);
        assert_eq!(GenreSelection::parse("  "), GenreSelection::All);
        assert_eq!(
            GenreSelection::parse(" Rock "),
            GenreSelection::Genre(String::from("Rock"))
        );
    }

    proptest::proptest! {
        #[test]
        fn filtered_subset_is_a_subsequence(genres in proptest::collection::vec(
            proptest::option::of("[A-Za-z ;,/|]{0,16}"),
            0..40,
        )) {
            let files: Vec<FileRecord> = genres
                .iter()
                .map(|genre| file_with_genre(genre.as_deref()))
                .collect();

            for selection in [
                GenreSelection::All,
                GenreSelection::Genre(String::from("Rock")),
            ] {
                let subset = filtered_files(&files, &selection);
                let mut cursor = 0;
                for kept in &subset {
                    let pos = files[cursor..]
                        .iter()
                        .position(|file| std::ptr::eq(file, *kept));
                    proptest::prop_assert!(pos.is_some());
                    cursor += pos.unwrap() + 1;
                }
            }
        }
    }
}
