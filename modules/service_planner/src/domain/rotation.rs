//! Song rotation ranking
//!
//! Orders the catalog by staleness so recently scheduled songs sink to the bottom.

use crate::contract::{RotationEntry, Song, SongUsage};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Most recent service date per song title
pub fn last_played_dates(history: &[SongUsage]) -> HashMap<&str, NaiveDate> {
    let mut last_played: HashMap<&str, NaiveDate> = HashMap::new();
    for usage in history {
        if usage.song_title.trim().is_empty() {
            continue;
        }
        last_played
            .entry(usage.song_title.as_str())
            .and_modify(|date| *date = (*date).max(usage.service_date))
            .or_insert(usage.service_date);
    }
    last_played
}

/// Enabled songs paired with their last-played date, least recently used first.
///
/// Never-played songs come before every played song. Ties on date are broken
/// by song name (case-sensitive, ascending).
pub fn rotation(catalog: &[Song], history: &[SongUsage]) -> Vec<RotationEntry> {
    let last_played = last_played_dates(history);

    let mut entries: Vec<RotationEntry> = catalog
        .iter()
        .filter(|song| !song.disabled)
        .map(|song| RotationEntry {
            last_played: last_played.get(song.name.as_str()).copied(),
            song: song.clone(),
        })
        .collect();

    // None orders before Some, matching "never played sorts as the minimum date"
    entries.sort_by(|a, b| {
        a.last_played
            .cmp(&b.last_played)
            .then_with(|| a.song.name.cmp(&b.song.name))
    });
    entries
}

/// Enabled songs in rotation order
pub fn rank(catalog: &[Song], history: &[SongUsage]) -> Vec<Song> {
    rotation(catalog, history)
        .into_iter()
        .map(|entry| entry.song)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::SongRecord;
    use chrono::Utc;
    use uuid::Uuid;

    fn song(name: &str) -> Song {
        SongRecord {
            name: name.to_string(),
            ..SongRecord::with_defaults()
        }
        .into_song(Uuid::new_v4(), Utc::now())
    }

    fn used(title: &str, date: &str) -> SongUsage {
        SongUsage {
            song_title: title.to_string(),
            service_date: date.parse().unwrap(),
        }
    }

    fn names(songs: &[Song]) -> Vec<&str> {
        songs.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_never_played_first_then_oldest() {
        let catalog = vec![song("Cornerstone"), song("Way Maker"), song("Amazing Grace"), song("Oceans")];
        let history = vec![
            used("Way Maker", "2025-03-02"),
            used("Cornerstone", "2025-01-05"),
            used("Way Maker", "2024-12-01"),
        ];

        let ranked = rank(&catalog, &history);
        assert_eq!(
            names(&ranked),
            vec!["Amazing Grace", "Oceans", "Cornerstone", "Way Maker"]
        );
    }

    #[test]
    fn test_uses_most_recent_date() {
        let catalog = vec![song("A"), song("B")];
        let history = vec![
            used("A", "2025-01-01"),
            used("A", "2025-06-01"),
            used("B", "2025-03-01"),
        ];

        let entries = rotation(&catalog, &history);
        assert_eq!(entries[0].song.name, "B");
        assert_eq!(entries[1].last_played, Some("2025-06-01".parse().unwrap()));
    }

    #[test]
    fn test_disabled_songs_excluded() {
        let mut retired = song("Retired");
        retired.disabled = true;
        let catalog = vec![retired, song("Active")];

        let ranked = rank(&catalog, &[]);
        assert_eq!(names(&ranked), vec!["Active"]);
    }

    #[test]
    fn test_tie_break_is_case_sensitive() {
        let catalog = vec![song("beta"), song("Alpha"), song("alpha"), song("Beta")];
        let history = vec![
            used("beta", "2025-01-01"),
            used("Beta", "2025-01-01"),
        ];

        let ranked = rank(&catalog, &history);
        assert_eq!(names(&ranked), vec!["Alpha", "alpha", "Beta", "beta"]);
    }

    #[test]
    fn test_history_for_unknown_titles_and_blank_titles_ignored() {
        let catalog = vec![song("Known")];
        let history = vec![used("Unknown", "2025-01-01"), used("  ", "2025-02-01")];

        let entries = rotation(&catalog, &history);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].last_played, None);
        assert!(!last_played_dates(&history).contains_key("  "));
    }

    #[test]
    fn test_ranking_is_deterministic() {
        let catalog = vec![song("C"), song("A"), song("B"), song("D")];
        let history = vec![used("C", "2025-02-01"), used("D", "2025-02-01")];

        let first = rank(&catalog, &history);
        for _ in 0..5 {
            assert_eq!(rank(&catalog, &history), first);
        }
    }
}
