use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::hunter::engine::HunterSnapshot;
use crate::hunter::errors::HunterError;
use crate::hunter::types::{
    ProfileRecord, QuestRecord, ShadowRecord, PROFILE_SCHEMA_VERSION, QUEST_SCHEMA_VERSION,
    RESET_SCHEMA_VERSION, SHADOW_SCHEMA_VERSION,
};

const TREE_PRIMARY: &str = "hunter";

pub const KEY_QUESTS: &str = "hunter.quests";
pub const KEY_SHADOWS: &str = "hunter.shadows";
pub const KEY_LAST_DAILY_RESET: &str = "hunter.last_daily_reset";
pub const KEY_PROFILE: &str = "hunter.profile";

/// Key/value backend the store writes encoded records through.
pub trait PersistenceAdapter: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, HunterError>;
    fn save(&self, key: &str, bytes: &[u8]) -> Result<(), HunterError>;

    /// Make previous saves durable. No-op for volatile backends.
    fn flush(&self) -> Result<(), HunterError> {
        Ok(())
    }
}

/// Sled-backed adapter; one tree holds every hunter record.
pub struct SledAdapter {
    _db: sled::Db,
    primary: sled::Tree,
}

impl SledAdapter {
    /// Open (or create) the database rooted at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, HunterError> {
        let path_ref = path.as_ref();
        std::fs::create_dir_all(path_ref)?;
        let db = sled::open(path_ref)?;
        let primary = db.open_tree(TREE_PRIMARY)?;
        Ok(Self { _db: db, primary })
    }
}

impl PersistenceAdapter for SledAdapter {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, HunterError> {
        Ok(self.primary.get(key.as_bytes())?.map(|ivec| ivec.to_vec()))
    }

    fn save(&self, key: &str, bytes: &[u8]) -> Result<(), HunterError> {
        self.primary.insert(key.as_bytes(), bytes)?;
        Ok(())
    }

    fn flush(&self) -> Result<(), HunterError> {
        self.primary.flush()?;
        Ok(())
    }
}

/// Volatile adapter for tests and dry runs. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryAdapter {
    records: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PersistenceAdapter for MemoryAdapter {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, HunterError> {
        let records = self
            .records
            .lock()
            .map_err(|_| HunterError::Internal("memory adapter lock poisoned".into()))?;
        Ok(records.get(key).cloned())
    }

    fn save(&self, key: &str, bytes: &[u8]) -> Result<(), HunterError> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| HunterError::Internal("memory adapter lock poisoned".into()))?;
        records.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    version: u8,
    data: &'a T,
}

#[derive(Deserialize)]
struct Envelope {
    version: u8,
    data: serde_json::Value,
}

/// Helper builder so tests can easily create throwaway sled stores.
pub struct HunterStoreBuilder {
    path: PathBuf,
}

impl HunterStoreBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn open(self) -> Result<HunterStore<SledAdapter>, HunterError> {
        Ok(HunterStore::new(SledAdapter::open(self.path)?))
    }
}

/// Typed, versioned access to the four hunter records.
pub struct HunterStore<A: PersistenceAdapter> {
    adapter: A,
}

impl<A: PersistenceAdapter> HunterStore<A> {
    pub fn new(adapter: A) -> Self {
        Self { adapter }
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    fn put_record<T: Serialize>(&self, key: &str, version: u8, value: &T) -> Result<(), HunterError> {
        let bytes = serde_json::to_vec(&EnvelopeRef {
            version,
            data: value,
        })?;
        self.adapter.save(key, &bytes)
    }

    fn get_record<T: DeserializeOwned>(
        &self,
        key: &str,
        entity: &'static str,
        version: u8,
    ) -> Result<Option<T>, HunterError> {
        let Some(bytes) = self.adapter.load(key)? else {
            return Ok(None);
        };
        let envelope: Envelope = serde_json::from_slice(&bytes)?;
        if envelope.version != version {
            return Err(HunterError::SchemaMismatch {
                entity,
                expected: version,
                found: envelope.version,
            });
        }
        Ok(Some(serde_json::from_value(envelope.data)?))
    }

    pub fn put_quests(&self, quests: &[QuestRecord]) -> Result<(), HunterError> {
        self.put_record(KEY_QUESTS, QUEST_SCHEMA_VERSION, &quests)
    }

    pub fn get_quests(&self) -> Result<Option<Vec<QuestRecord>>, HunterError> {
        self.get_record(KEY_QUESTS, "quests", QUEST_SCHEMA_VERSION)
    }

    pub fn put_shadows(&self, shadows: &[ShadowRecord]) -> Result<(), HunterError> {
        self.put_record(KEY_SHADOWS, SHADOW_SCHEMA_VERSION, &shadows)
    }

    pub fn get_shadows(&self) -> Result<Option<Vec<ShadowRecord>>, HunterError> {
        self.get_record(KEY_SHADOWS, "shadows", SHADOW_SCHEMA_VERSION)
    }

    pub fn put_last_daily_reset(&self, date: NaiveDate) -> Result<(), HunterError> {
        self.put_record(KEY_LAST_DAILY_RESET, RESET_SCHEMA_VERSION, &date)
    }

    pub fn get_last_daily_reset(&self) -> Result<Option<NaiveDate>, HunterError> {
        self.get_record(KEY_LAST_DAILY_RESET, "last_daily_reset", RESET_SCHEMA_VERSION)
    }

    pub fn put_profile(&self, profile: &ProfileRecord) -> Result<(), HunterError> {
        self.put_record(KEY_PROFILE, PROFILE_SCHEMA_VERSION, profile)
    }

    pub fn get_profile(&self) -> Result<Option<ProfileRecord>, HunterError> {
        self.get_record(KEY_PROFILE, "profile", PROFILE_SCHEMA_VERSION)
    }

    /// Read every record; absent ones stay `None` for the engine to default.
    pub fn load_snapshot(&self) -> Result<HunterSnapshot, HunterError> {
        Ok(HunterSnapshot {
            profile: self.get_profile()?,
            quests: self.get_quests()?,
            shadows: self.get_shadows()?,
            last_daily_reset: self.get_last_daily_reset()?,
        })
    }

    /// Write every record present in `snapshot` and flush.
    pub fn save_snapshot(&self, snapshot: &HunterSnapshot) -> Result<(), HunterError> {
        if let Some(profile) = &snapshot.profile {
            self.put_profile(profile)?;
        }
        if let Some(quests) = &snapshot.quests {
            self.put_quests(quests)?;
        }
        if let Some(shadows) = &snapshot.shadows {
            self.put_shadows(shadows)?;
        }
        if let Some(date) = snapshot.last_daily_reset {
            self.put_last_daily_reset(date)?;
        }
        self.adapter.flush()?;
        debug!("Hunter state saved");
        Ok(())
    }
}
