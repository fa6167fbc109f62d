//! Tabular song import
//!
//! Turns loosely structured comma-delimited text into [`SongRecord`]s.
//! Malformed rows are skipped; the caller persists whatever comes back.

use crate::contract::SongRecord;

/// Song field a header column maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Name,
    Key,
    SongSelectId,
    Seasonal,
    Speed,
    Publisher,
    Artist,
    Category,
    Notes,
    Disabled,
}

impl Column {
    /// Match a trimmed, unquoted, lower-cased header token against the synonym table
    fn from_header(header: &str) -> Option<Self> {
        let column = match header {
            "songname" | "song name" | "name" => Column::Name,
            "key" => Column::Key,
            "songselectid" | "songselect id" | "ccli" => Column::SongSelectId,
            "seasonal" => Column::Seasonal,
            "speed" | "tempo" => Column::Speed,
            "publisher" => Column::Publisher,
            "artist" | "author" => Column::Artist,
            "category" | "genre" => Column::Category,
            "notes" => Column::Notes,
            "disabled" => Column::Disabled,
            _ => return None,
        };
        Some(column)
    }

    fn apply(self, record: &mut SongRecord, value: &str) {
        match self {
            Column::Name => record.name = value.to_string(),
            Column::Key => record.key = non_blank(value),
            Column::SongSelectId => record.song_select_id = value.parse().ok(),
            Column::Seasonal => record.seasonal = parse_flag(value),
            Column::Speed => {
                if let Some(speed) = non_blank(value) {
                    record.speed = speed;
                }
            }
            Column::Publisher => {
                if let Some(publisher) = non_blank(value) {
                    record.publisher = publisher;
                }
            }
            Column::Artist => {
                if let Some(artist) = non_blank(value) {
                    record.artist = artist;
                }
            }
            Column::Category => record.category = non_blank(value),
            Column::Notes => record.notes = non_blank(value),
            Column::Disabled => record.disabled = parse_flag(value),
        }
    }
}

/// Parse raw import text into song records, skipping malformed rows.
///
/// The first non-blank line is the header. Data rows whose field count differs
/// from the header's, and rows without a name, are dropped without error.
pub fn parse(raw: &str) -> Vec<SongRecord> {
    let mut lines = raw
        .split(['\r', '\n'])
        .filter(|line| !line.trim().is_empty());

    let Some(header_line) = lines.next() else {
        return Vec::new();
    };

    let columns: Vec<Option<Column>> = header_line
        .split(',')
        .map(|token| Column::from_header(&clean(token).to_lowercase()))
        .collect();

    let mut records = Vec::new();
    for (row, line) in lines.enumerate() {
        let values = split_row(line);
        if values.len() != columns.len() {
            tracing::debug!(
                row = row + 1,
                expected = columns.len(),
                found = values.len(),
                "Skipping import row with mismatched field count"
            );
            continue;
        }

        let mut record = SongRecord::with_defaults();
        for (column, value) in columns.iter().zip(&values) {
            if let Some(column) = column {
                column.apply(&mut record, clean(value));
            }
        }

        if record.name.trim().is_empty() {
            tracing::debug!(row = row + 1, "Skipping import row without a song name");
            continue;
        }
        records.push(record);
    }

    records
}

/// Split one data row on commas, treating commas inside double quotes as literal.
///
/// Quote characters toggle the quoted mode and are not part of the value.
pub fn split_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);

    fields
}

fn clean(value: &str) -> &str {
    value.trim().trim_matches('"')
}

fn non_blank(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}
