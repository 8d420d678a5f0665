//! Opportunistic persistence of per-channel effect settings.
//!
//! Settings are stored as a compact `postcard` blob. A missing or corrupt
//! blob simply means the channel starts with defaults.

use alloc::{collections::BTreeMap, vec::Vec};

use heapless::String;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{
    channel::ChannelId,
    color::PixelColor,
    config::{EffectConfig, clamp_speed},
    error::{Error, StorageError},
};

/// Longest effect name that survives a save; longer names are truncated
pub const MAX_EFFECT_NAME: usize = 32;

/// Key value store for settings blobs, keyed by channel id.
pub trait SettingsStore: Send {
    fn load(&mut self, id: ChannelId) -> Option<Vec<u8>>;

    fn save(&mut self, id: ChannelId, blob: &[u8]) -> Result<(), StorageError>;
}

/// Persisted subset of an [`EffectConfig`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEffect {
    pub effect: String<MAX_EFFECT_NAME>,
    pub color: [u8; 4],
    pub brightness: u8,
    pub speed: u8,
    pub enabled: bool,
}

impl StoredEffect {
    pub fn from_config(config: &EffectConfig) -> Self {
        let mut effect = String::new();
        for ch in config.effect.chars() {
            if effect.push(ch).is_err() {
                break;
            }
        }
        let PixelColor { r, g, b, w } = config.color;
        Self {
            effect,
            color: [r, g, b, w],
            brightness: config.brightness,
            speed: config.speed,
            enabled: config.enabled,
        }
    }

    /// Overlay the stored fields onto `config`, leaving mask and callback
    pub fn apply_to(&self, config: &mut EffectConfig) {
        let [r, g, b, w] = self.color;
        config.effect = alloc::string::String::from(self.effect.as_str());
        config.color = PixelColor::new(r, g, b, w);
        config.brightness = self.brightness;
        config.speed = clamp_speed(self.speed);
        config.enabled = self.enabled;
    }

    pub fn encode(&self) -> Result<Vec<u8>, Error> {
        Ok(postcard::to_allocvec(self)?)
    }

    pub fn decode(blob: &[u8]) -> Option<Self> {
        postcard::from_bytes(blob).ok()
    }
}

/// Load stored settings for `id` into `config`. Returns whether anything was applied.
pub fn restore(store: &mut dyn SettingsStore, id: ChannelId, config: &mut EffectConfig) -> bool {
    let Some(blob) = store.load(id) else {
        debug!("no stored settings for channel {id}");
        return false;
    };
    match StoredEffect::decode(&blob) {
        Some(stored) => {
            stored.apply_to(config);
            true
        }
        None => {
            warn!("stored settings for channel {id} are corrupt, using defaults");
            false
        }
    }
}

/// Store that forgets everything; the default when no persistence is wired
#[derive(Debug, Default, Clone, Copy)]
pub struct NullStore;

impl SettingsStore for NullStore {
    fn load(&mut self, _id: ChannelId) -> Option<Vec<u8>> {
        None
    }

    fn save(&mut self, _id: ChannelId, _blob: &[u8]) -> Result<(), StorageError> {
        Ok(())
    }
}

/// In-memory store, handy for hosts without flash
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    blobs: BTreeMap<ChannelId, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: ChannelId, blob: Vec<u8>) {
        self.blobs.insert(id, blob);
    }

    pub fn get(&self, id: ChannelId) -> Option<&[u8]> {
        self.blobs.get(&id).map(Vec::as_slice)
    }
}

impl SettingsStore for MemoryStore {
    fn load(&mut self, id: ChannelId) -> Option<Vec<u8>> {
        self.blobs.get(&id).cloned()
    }

    fn save(&mut self, id: ChannelId, blob: &[u8]) -> Result<(), StorageError> {
        self.blobs.insert(id, blob.to_vec());
        Ok(())
    }
}
