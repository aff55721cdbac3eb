//! Changes based on the `changes.csv` file.

use chrono::{DateTime, Utc};

/// An entry when a resource was last changed.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
pub struct ChangeEntry {
    /// The relative file name
    pub file: String,
    /// The timestamp of the last change
    pub timestamp: DateTime<Utc>,
}

/// State of a `changes.csv` file.
#[derive(Clone, Debug, Default)]
pub struct ChangeSource {
    pub entries: Vec<ChangeEntry>,
}

impl ChangeSource {
    /// Parse the content of a `changes.csv` file.
    ///
    /// Empty lines are skipped, as are rows which don't consist of a file name and an RFC 3339
    /// timestamp.
    pub fn parse(changes: &str) -> Self {
        let reader = csv::ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(false)
            .flexible(true)
            .from_reader(changes.as_bytes());

        let entries = reader
            .into_deserialize::<ChangeEntry>()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    log::debug!("Skipping malformed row in changes.csv: {err}");
                    None
                }
            })
            .collect();

        Self { entries }
    }

    /// Entries changed at, or after, the provided timestamp.
    pub fn since(&self, since: DateTime<Utc>) -> impl Iterator<Item = &ChangeEntry> {
        self.entries
            .iter()
            .filter(move |entry| entry.timestamp >= since)
    }
}
