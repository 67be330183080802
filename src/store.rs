//! Local index and its persisted JSON snapshot.
//!
//! The snapshot is a single pretty-printed file:
//!
//! ```json
//! {
//!   "comics": { "1": { "num": 1, "title": "Barrel - Part 1", ... } },
//!   "lastNum": 3000,
//!   "updated": "2024-11-02T09:14:03.512Z"
//! }
//! ```
//!
//! Comics are kept in a `BTreeMap`, so serialization order is stable and
//! saving an unmodified index twice produces identical bytes. Saves write a
//! temporary file next to the snapshot and rename it into place.
//!
//! There is no locking. Two builders writing the same snapshot concurrently
//! can lose each other's checkpoints.

use std::collections::BTreeMap;
use std::io::Write;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tempfile::NamedTempFile;

use crate::error::StoreError;
use crate::models::Comic;

/// The in-memory index: every known comic plus sync metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Index {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub comics: BTreeMap<u32, Comic>,
    /// Highest comic number synchronized through.
    #[serde(rename = "lastNum", default)]
    pub last_num: u32,
    /// Time of the last successful save; `None` if never synced.
    #[serde(default, with = "sync_time")]
    pub updated: Option<DateTime<Utc>>,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.comics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comics.is_empty()
    }

    pub fn contains(&self, num: u32) -> bool {
        self.comics.contains_key(&num)
    }

    pub fn get(&self, num: u32) -> Option<&Comic> {
        self.comics.get(&num)
    }

    /// Insert a fully fetched comic under its own number.
    pub fn insert(&mut self, comic: Comic) {
        self.comics.insert(comic.num, comic);
    }

    /// All comic numbers in ascending order.
    pub fn sorted_numbers(&self) -> Vec<u32> {
        self.comics.keys().copied().collect()
    }

    /// First number a sync should consider. Saturates at `u32::MAX`.
    pub fn fetch_start(&self) -> u32 {
        self.last_num.saturating_add(1)
    }

    /// Numbers a sync towards `latest` should consider, or `None` when
    /// `last_num` already reaches it.
    pub fn pending_range(&self, latest: u32) -> Option<RangeInclusive<u32>> {
        (self.last_num < latest).then(|| self.fetch_start()..=latest)
    }

    /// How many numbers in `range` have no comic in the index.
    pub fn missing_count(&self, range: RangeInclusive<u32>) -> usize {
        if range.is_empty() {
            return 0;
        }
        let span = (*range.end() - *range.start()) as usize + 1;
        span - self.comics.range(range).count()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<BTreeMap<u32, Comic>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<BTreeMap<u32, Comic>>::deserialize(deserializer)?.unwrap_or_default())
}

/// RFC 3339 timestamps where the zero time (`0001-01-01T00:00:00Z`) means "never".
mod sync_time {
    use chrono::{DateTime, Datelike, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const ZERO_TIME: &str = "0001-01-01T00:00:00Z";

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            None => serializer.serialize_str(ZERO_TIME),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        let raw = match raw.as_deref().map(str::trim) {
            None | Some("") => return Ok(None),
            Some(s) => s,
        };
        let ts = DateTime::parse_from_rfc3339(raw)
            .map_err(serde::de::Error::custom)?
            .with_timezone(&Utc);
        if ts.year() <= 1 {
            Ok(None)
        } else {
            Ok(Some(ts))
        }
    }
}

/// Reads and writes the index snapshot at a fixed path.
#[derive(Debug, Clone)]
pub struct IndexStore {
    path: PathBuf,
}

impl IndexStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot, or an empty index if none exists yet.
    pub fn load(&self) -> Result<Index, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Index::new()),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&content).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Overwrite the snapshot with the full index.
    pub fn save(&self, index: &Index) -> Result<(), StoreError> {
        let mut encoded = serde_json::to_string_pretty(index).map_err(StoreError::Serialize)?;
        encoded.push('\n');

        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        std::fs::create_dir_all(&parent).map_err(write_err)?;
        let mut tmp = NamedTempFile::new_in(&parent).map_err(write_err)?;
        tmp.write_all(encoded.as_bytes()).map_err(write_err)?;
        tmp.flush().map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn comic(num: u32, title: &str) -> Comic {
        Comic {
            num,
            title: title.to_string(),
            safe_title: title.to_string(),
            year: "2006".to_string(),
            month: "1".to_string(),
            day: "1".to_string(),
            ..Comic::default()
        }
    }

    #[test]
    fn missing_snapshot_loads_empty_index() {
        let tmp = TempDir::new().unwrap();
        let store = IndexStore::new(tmp.path().join("xkcd_index.json"));
        let index = store.load().unwrap();
        assert!(index.is_empty());
        assert_eq!(index.last_num, 0);
        assert_eq!(index.updated, None);
    }

    #[test]
    fn save_creates_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("dir").join("index.json");
        let store = IndexStore::new(&path);

        let mut index = Index::new();
        index.insert(comic(1, "Barrel - Part 1"));
        store.save(&index).unwrap();

        assert!(path.exists());
        assert_eq!(store.load().unwrap(), index);
    }

    #[test]
    fn save_load_save_is_byte_identical() {
        let tmp = TempDir::new().unwrap();
        let store = IndexStore::new(tmp.path().join("index.json"));

        let mut index = Index::new();
        index.insert(comic(10, "Pi Equals"));
        index.insert(comic(2, "Petit Trees (sketch)"));
        index.insert(comic(1, "Barrel - Part 1"));
        index.last_num = 10;
        index.updated = Some(Utc.with_ymd_and_hms(2024, 11, 2, 9, 14, 3).unwrap());

        store.save(&index).unwrap();
        let first = std::fs::read(store.path()).unwrap();

        let reloaded = store.load().unwrap();
        store.save(&reloaded).unwrap();
        let second = std::fs::read(store.path()).unwrap();

        assert_eq!(first, second);
        assert_eq!(reloaded, index);
    }

    #[test]
    fn snapshot_uses_documented_field_names() {
        let tmp = TempDir::new().unwrap();
        let store = IndexStore::new(tmp.path().join("index.json"));

        let mut index = Index::new();
        index.insert(comic(1, "Barrel - Part 1"));
        index.last_num = 1;
        store.save(&index).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["lastNum"], 1);
        assert_eq!(raw["comics"]["1"]["title"], "Barrel - Part 1");
        assert_eq!(raw["updated"], "0001-01-01T00:00:00Z");
        // Indented for humans.
        assert!(std::fs::read_to_string(store.path())
            .unwrap()
            .contains("\n  \"comics\""));
    }

    #[test]
    fn null_comics_and_zero_time_load_as_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("index.json");
        std::fs::write(
            &path,
            r#"{"comics": null, "lastNum": 5, "updated": "0001-01-01T00:00:00Z"}"#,
        )
        .unwrap();

        let index = IndexStore::new(&path).load().unwrap();
        assert!(index.is_empty());
        assert_eq!(index.last_num, 5);
        assert_eq!(index.updated, None);
    }

    #[test]
    fn loads_offset_timestamps_written_by_other_tools() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("index.json");
        std::fs::write(
            &path,
            r#"{
  "comics": {"2": {"num": 2, "title": "Petit Trees (sketch)"}},
  "lastNum": 2,
  "updated": "2025-03-01T10:00:00.123456789+02:00"
}"#,
        )
        .unwrap();

        let index = IndexStore::new(&path).load().unwrap();
        assert_eq!(index.get(2).unwrap().title, "Petit Trees (sketch)");
        let updated = index.updated.unwrap();
        assert_eq!(updated.to_rfc3339(), "2025-03-01T08:00:00.123456789+00:00");
    }

    #[test]
    fn corrupt_snapshot_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("index.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = IndexStore::new(&path).load().unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }), "got {:?}", err);
    }

    #[test]
    fn save_into_file_path_parent_is_write_error() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "plain file").unwrap();
        let store = IndexStore::new(blocker.join("index.json"));
        let err = store.save(&Index::new()).unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }), "got {:?}", err);
    }

    #[test]
    fn fetch_start_and_missing_numbers() {
        let mut index = Index::new();
        assert_eq!(index.fetch_start(), 1);
        assert_eq!(index.pending_range(4), Some(1..=4));

        index.insert(comic(1, "a"));
        index.insert(comic(3, "c"));
        assert_eq!(index.missing_count(1..=4), 2);
        assert_eq!(index.missing_count(3..=3), 0);

        index.last_num = 3;
        assert_eq!(index.fetch_start(), 4);
        assert_eq!(index.pending_range(4), Some(4..=4));
        assert_eq!(index.pending_range(3), None);
        assert_eq!(index.sorted_numbers(), vec![1, 3]);
    }

    #[test]
    fn pending_range_at_max_last_num_is_empty() {
        let index = Index {
            last_num: u32::MAX,
            ..Index::new()
        };
        assert_eq!(index.fetch_start(), u32::MAX);
        assert_eq!(index.pending_range(5), None);
        assert_eq!(index.pending_range(u32::MAX), None);
    }

    #[test]
    fn missing_count_over_huge_range_does_not_allocate_per_number() {
        let mut index = Index::new();
        index.insert(comic(2, "b"));
        assert_eq!(index.missing_count(1..=u32::MAX), u32::MAX as usize - 1);
    }

    #[test]
    fn absent_comics_key_loads_as_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("index.json");
        std::fs::write(&path, r#"{"lastNum": 7}"#).unwrap();

        let index = IndexStore::new(&path).load().unwrap();
        assert!(index.is_empty());
        assert_eq!(index.last_num, 7);
        assert_eq!(index.updated, None);
    }
}
