//! Per-day record store
//!
//! In-memory map of daily records keyed by date, backed by a versioned
//! JSON file. One record per calendar day; a same-day `put` overwrites.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::data::storage;
use crate::data::types::DailyRecord;
use crate::error::Result;

/// Records data file name
const RECORDS_FILE: &str = "records.json";

/// Records file format version for migrations
const RECORDS_VERSION: u32 = 1;

/// Records file structure
#[derive(Debug, Serialize, Deserialize)]
struct RecordsFile {
    version: u32,
    records: Vec<DailyRecord>,
}

impl Default for RecordsFile {
    fn default() -> Self {
        Self {
            version: RECORDS_VERSION,
            records: Vec::new(),
        }
    }
}

/// Manages daily records in memory, keyed by date
pub struct RecordStore {
    path: PathBuf,
    records: HashMap<String, DailyRecord>,
    /// Whether there are unsaved changes
    dirty: bool,
}

impl RecordStore {
    /// Today's record key: the local calendar date
    pub fn today_key() -> String {
        Local::now().format("%Y-%m-%d").to_string()
    }

    /// Default records file location in the config directory
    pub fn default_path() -> Result<PathBuf> {
        storage::data_path(RECORDS_FILE)
    }

    /// Load records from the default storage location
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        Self::load_from(&path)
    }

    /// Load records from a specific path (used by tests)
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut records = HashMap::new();

        if let Some(file) = storage::load_from::<RecordsFile>(path)? {
            for record in file.records {
                records.insert(record.date_key.clone(), record);
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            records,
            dirty: false,
        })
    }

    /// Save records to the path this store was loaded from.
    ///
    /// No-op when nothing changed since the last save.
    pub fn save(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }

        let mut records: Vec<DailyRecord> = self.records.values().cloned().collect();
        records.sort_by(|a, b| a.date_key.cmp(&b.date_key));

        let file = RecordsFile {
            version: RECORDS_VERSION,
            records,
        };
        storage::save_to(&self.path, &file)?;
        self.dirty = false;
        Ok(())
    }

    /// Get the record for a date key
    pub fn get(&self, date_key: &str) -> Option<&DailyRecord> {
        self.records.get(date_key)
    }

    /// Get today's record, if one was generated
    pub fn today(&self) -> Option<&DailyRecord> {
        self.get(&Self::today_key())
    }

    /// Insert or overwrite the record for its date key
    pub fn put(&mut self, record: DailyRecord) {
        self.records.insert(record.date_key.clone(), record);
        self.dirty = true;
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
