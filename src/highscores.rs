//! High score leaderboard
//!
//! Ranked descending by score, capped (10 by default), persisted as a JSON
//! array of `{name, score, level, date}` records.

use serde::{Deserialize, Serialize};

use crate::persistence::{self, HIGH_SCORES_KEY, Storage, StorageError};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;
/// Longest accepted player name, in characters
pub const MAX_NAME_LEN: usize = 15;
/// Name used when the player leaves the field empty
pub const DEFAULT_NAME: &str = "Player";

/// A single leaderboard record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub name: String,
    pub score: u64,
    /// Level reached (1-based)
    pub level: u32,
    /// `YYYY-MM-DD`
    pub date: String,
}

/// High score leaderboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighScores {
    entries: Vec<ScoreRecord>,
    capacity: usize,
}

impl Default for HighScores {
    fn default() -> Self {
        Self::new()
    }
}

impl HighScores {
    /// Create an empty leaderboard with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(MAX_HIGH_SCORES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    /// Build from existing records, restoring order and cap
    pub fn from_records(mut entries: Vec<ScoreRecord>, capacity: usize) -> Self {
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(capacity);
        Self { entries, capacity }
    }

    /// True if fewer than `capacity` records exist or `score` beats the lowest
    pub fn is_high_score(&self, score: u64) -> bool {
        if self.entries.len() < self.capacity {
            return true;
        }
        self.entries.last().is_some_and(|lowest| score > lowest.score)
    }

    /// Insert a record in memory. Returns its 0-based rank, or `None` if it
    /// fell off the end of the table.
    ///
    /// Ties rank below existing records with the same score.
    pub fn insert(&mut self, name: &str, score: u64, level: u32, date: &str) -> Option<usize> {
        let rank = self.entries.iter().filter(|e| e.score >= score).count();
        if rank >= self.capacity {
            return None;
        }

        self.entries.insert(
            rank,
            ScoreRecord {
                name: sanitize_name(name),
                score,
                level,
                date: date.to_string(),
            },
        );
        self.entries.truncate(self.capacity);
        Some(rank)
    }

    /// Insert and persist. Storage failures are logged; the in-memory table
    /// keeps the record either way.
    pub fn add_score(
        &mut self,
        storage: &mut dyn Storage,
        name: &str,
        score: u64,
        level: u32,
        date: &str,
    ) -> Option<usize> {
        let rank = self.insert(name, score, level, date);
        if let Err(err) = self.save(storage) {
            log::warn!("Could not save high scores: {}", err);
        }
        rank
    }

    /// Records, best first
    pub fn scores(&self) -> &[ScoreRecord] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Drop every record and persist the empty table
    pub fn clear(&mut self, storage: &mut dyn Storage) {
        self.entries.clear();
        if let Err(err) = self.save(storage) {
            log::warn!("Could not save high scores: {}", err);
        }
    }

    /// Load from storage. Missing or corrupt data yields an empty table.
    pub fn load(storage: &dyn Storage, capacity: usize) -> Self {
        match persistence::load_json::<Vec<ScoreRecord>>(storage, HIGH_SCORES_KEY) {
            Ok(Some(entries)) => {
                log::info!("Loaded {} high scores", entries.len());
                Self::from_records(entries, capacity)
            }
            Ok(None) => {
                log::info!("No high scores found, starting fresh");
                Self::with_capacity(capacity)
            }
            Err(err) => {
                log::warn!("Discarding stored high scores: {}", err);
                Self::with_capacity(capacity)
            }
        }
    }

    pub fn save(&self, storage: &mut dyn Storage) -> Result<(), StorageError> {
        persistence::save_json(storage, HIGH_SCORES_KEY, &self.entries)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

/// Trim, default empty names and cap the length
pub fn sanitize_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        DEFAULT_NAME.to_string()
    } else {
        trimmed.chars().take(MAX_NAME_LEN).collect()
    }
}

/// Today's date as `YYYY-MM-DD` (UTC)
#[cfg(target_arch = "wasm32")]
pub fn today() -> String {
    let iso: String = js_sys::Date::new_0().to_iso_string().into();
    iso.chars().take(10).collect()
}

/// Today's date as `YYYY-MM-DD` (UTC)
#[cfg(not(target_arch = "wasm32"))]
pub fn today() -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format_day((secs / 86_400) as i64)
}

/// Format days since 1970-01-01 as a proleptic Gregorian date
pub fn format_day(days: i64) -> String {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);
    format!("{year:04}-{month:02}-{day:02}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;
    use proptest::prelude::*;

    fn filled(scores: &[u64], capacity: usize) -> HighScores {
        let mut table = HighScores::with_capacity(capacity);
        for (i, &score) in scores.iter().enumerate() {
            table.insert(&format!("p{i}"), score, 1, "2024-01-01");
        }
        table
    }

    fn values(table: &HighScores) -> Vec<u64> {
        table.scores().iter().map(|r| r.score).collect()
    }

    #[test]
    fn test_capacity_three_example() {
        let mut storage = MemoryStorage::new();
        let mut table = filled(&[50, 40, 30], 3);
        assert!(table.is_high_score(35));

        let rank = table.add_score(&mut storage, "Ann", 35, 2, "2024-05-01");
        assert_eq!(rank, Some(2));
        assert_eq!(values(&table), vec![50, 40, 35]);
    }

    #[test]
    fn test_not_high_score_when_full() {
        let table = filled(&[50, 40, 30], 3);
        assert!(!table.is_high_score(30));
        assert!(!table.is_high_score(10));
        assert!(table.is_high_score(31));
        assert!(filled(&[50], 3).is_high_score(0));
    }

    #[test]
    fn test_ties_keep_older_first() {
        let mut table = filled(&[50, 40], 5);
        let rank = table.insert("late", 40, 1, "2024-01-02");
        assert_eq!(rank, Some(2));
        assert_eq!(table.scores()[1].name, "p1");
        assert_eq!(table.scores()[2].name, "late");
    }

    #[test]
    fn test_evicted_score_has_no_rank() {
        let mut table = filled(&[50, 40, 30], 3);
        assert_eq!(table.insert("low", 30, 1, "2024-01-02"), None);
        assert_eq!(values(&table), vec![50, 40, 30]);
    }

    #[test]
    fn test_names_are_sanitized() {
        assert_eq!(sanitize_name("   "), "Player");
        assert_eq!(sanitize_name(" Zoe "), "Zoe");
        assert_eq!(sanitize_name("abcdefghijklmnopqrstuvwxyz"), "abcdefghijklmno");
    }

    #[test]
    fn test_persists_and_reloads() {
        let mut storage = MemoryStorage::new();
        let mut table = HighScores::new();
        table.add_score(&mut storage, "Ann", 12, 2, "2024-05-01");
        table.add_score(&mut storage, "Bob", 30, 3, "2024-05-02");

        let json = storage.get(HIGH_SCORES_KEY).unwrap().unwrap();
        assert!(json.starts_with('['));
        assert!(json.contains("\"name\":\"Bob\""));

        let reloaded = HighScores::load(&storage, MAX_HIGH_SCORES);
        assert_eq!(reloaded, table);
        assert_eq!(reloaded.top_score(), Some(30));
    }

    #[test]
    fn test_corrupt_storage_loads_empty() {
        let mut storage = MemoryStorage::new();
        storage.set(HIGH_SCORES_KEY, "not json").unwrap();
        let table = HighScores::load(&storage, MAX_HIGH_SCORES);
        assert!(table.is_empty());
    }

    #[test]
    fn test_save_failure_keeps_memory() {
        let mut storage = MemoryStorage::with_quota(2);
        let mut table = HighScores::new();
        assert_eq!(table.add_score(&mut storage, "Ann", 5, 1, "2024-05-01"), Some(0));
        assert_eq!(table.len(), 1);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut storage = MemoryStorage::new();
        let mut table = HighScores::new();
        table.add_score(&mut storage, "Ann", 5, 1, "2024-05-01");
        table.clear(&mut storage);
        assert!(table.is_empty());
        assert!(HighScores::load(&storage, MAX_HIGH_SCORES).is_empty());
    }

    #[test]
    fn test_format_day() {
        assert_eq!(format_day(0), "1970-01-01");
        assert_eq!(format_day(19_723), "2024-01-01");
        assert_eq!(format_day(19_782), "2024-02-29");
        assert_eq!(today().len(), 10);
    }

    proptest! {
        #[test]
        fn prop_sorted_and_capped(
            capacity in 1usize..12,
            scores in proptest::collection::vec(0u64..1000, 0..40),
        ) {
            let mut table = HighScores::with_capacity(capacity);
            for score in scores {
                let qualified = table.is_high_score(score);
                let rank = table.insert("x", score, 1, "2024-01-01");
                prop_assert_eq!(qualified, rank.is_some());
                prop_assert!(table.len() <= capacity);
                prop_assert!(table.scores().windows(2).all(|w| w[0].score >= w[1].score));
            }
        }
    }
}
