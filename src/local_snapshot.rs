use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use asobiba_core::{decode, encode, GameSnapshot, GAME_SNAPSHOT_VERSION};

use crate::persisted::{
    BootRecord, HighScoreTable, SettingsBlob, BOOT_RECORD_KEY, BOOT_RECORD_VERSION,
    HIGH_SCORES_KEY, HIGH_SCORES_VERSION, SETTINGS_KEY, SETTINGS_VERSION, SNAPSHOT_KEY,
};
use crate::store::KeyValueStore;

pub fn save_game_snapshot(store: &mut dyn KeyValueStore, snapshot: &GameSnapshot) {
    let Some(bytes) = encode(snapshot) else {
        log::warn!("snapshot: encode failed");
        return;
    };
    if store.set(SNAPSHOT_KEY, &STANDARD.encode(bytes)) {
        log::debug!("snapshot: saved");
    } else {
        log::warn!("snapshot: store write failed");
    }
}

pub fn load_game_snapshot(store: &dyn KeyValueStore) -> Option<GameSnapshot> {
    let raw = store.get(SNAPSHOT_KEY)?;
    if raw.is_empty() {
        log::debug!("snapshot: empty value");
        return None;
    }
    let bytes = STANDARD.decode(raw.as_bytes()).ok()?;
    let snapshot = decode::<GameSnapshot>(&bytes)?;
    if snapshot.version != GAME_SNAPSHOT_VERSION {
        log::debug!(
            "snapshot: version mismatch ({} != {})",
            snapshot.version,
            GAME_SNAPSHOT_VERSION
        );
        return None;
    }
    log::debug!("snapshot: loaded");
    Some(snapshot)
}

pub fn clear_game_snapshot(store: &mut dyn KeyValueStore) {
    store.remove(SNAPSHOT_KEY);
}

// Cheap change gate for the autosave path: identical state hashes to the same
// fingerprint, so unchanged frames skip the encode-and-write entirely.
pub fn snapshot_fingerprint(snapshot: &GameSnapshot) -> Option<u64> {
    let bytes = encode(snapshot)?;
    let mut hasher = DefaultHasher::new();
    bytes.hash(&mut hasher);
    Some(hasher.finish())
}

pub fn load_boot_record(store: &dyn KeyValueStore) -> BootRecord {
    let Some(record) = load_record::<BootRecord>(store, BOOT_RECORD_KEY) else {
        return BootRecord::default();
    };
    if record.version != BOOT_RECORD_VERSION {
        log::debug!("boot record: version mismatch, using defaults");
        return BootRecord::default();
    }
    record
}

pub fn save_boot_record(store: &mut dyn KeyValueStore, record: &BootRecord) {
    save_record(store, BOOT_RECORD_KEY, record);
}

pub fn load_settings(store: &dyn KeyValueStore) -> SettingsBlob {
    let Some(settings) = load_record::<SettingsBlob>(store, SETTINGS_KEY) else {
        return SettingsBlob::default();
    };
    if settings.version != SETTINGS_VERSION {
        log::debug!("settings: version mismatch, using defaults");
        return SettingsBlob::default();
    }
    settings
}

pub fn save_settings(store: &mut dyn KeyValueStore, settings: &SettingsBlob) {
    save_record(store, SETTINGS_KEY, settings);
}

pub fn load_high_scores(store: &dyn KeyValueStore) -> HighScoreTable {
    let Some(table) = load_record::<HighScoreTable>(store, HIGH_SCORES_KEY) else {
        return HighScoreTable::default();
    };
    if table.version != HIGH_SCORES_VERSION {
        log::debug!("high scores: version mismatch, starting fresh");
        return HighScoreTable::default();
    }
    table
}

pub fn save_high_scores(store: &mut dyn KeyValueStore, table: &HighScoreTable) {
    save_record(store, HIGH_SCORES_KEY, table);
}

fn load_record<T>(store: &dyn KeyValueStore, key: &str) -> Option<T>
where
    T: rkyv::Archive,
    T::Archived: for<'a> rkyv::bytecheck::CheckBytes<
            rkyv::api::high::HighValidator<'a, rkyv::rancor::Error>,
        > + rkyv::Deserialize<T, rkyv::api::high::HighDeserializer<rkyv::rancor::Error>>,
{
    let raw = store.get(key)?;
    let bytes = STANDARD.decode(raw.as_bytes()).ok()?;
    let record = decode::<T>(&bytes);
    if record.is_none() {
        log::debug!("persisted record {key}: decode failed");
    }
    record
}

fn save_record<T>(store: &mut dyn KeyValueStore, key: &str, value: &T)
where
    T: for<'a> rkyv::Serialize<
        rkyv::api::high::HighSerializer<
            rkyv::util::AlignedVec,
            rkyv::ser::allocator::ArenaHandle<'a>,
            rkyv::rancor::Error,
        >,
    >,
{
    let Some(bytes) = encode(value) else {
        log::warn!("persisted record {key}: encode failed");
        return;
    };
    if !store.set(key, &STANDARD.encode(bytes)) {
        log::warn!("persisted record {key}: store write failed");
    }
}
