//! Configuration store with atomic snapshot replacement
//!
//! The Miniserver configuration document is parsed wholesale into an
//! immutable [`MiniserverConfig`] snapshot. [`ConfigStore`] swaps the
//! current snapshot behind an `RwLock<Arc<...>>`, so readers racing a parse
//! observe either the fully-old or the fully-new table set, never a mix.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{Category, Control, ControlDetails, ControlType, Room};

#[derive(Debug, Deserialize)]
struct RawNamed {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawControl {
    name: String,
    #[serde(rename = "type")]
    control_type: String,
    room: Option<String>,
    cat: Option<String>,
    #[serde(default)]
    details: ControlDetails,
    #[serde(rename = "subControls")]
    sub_controls: Option<HashMap<String, RawControl>>,
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    rooms: HashMap<String, RawNamed>,
    cats: HashMap<String, RawNamed>,
    controls: HashMap<String, RawControl>,
}

/// One parsed configuration snapshot: uuid-keyed tables plus name indexes
#[derive(Debug, Default, PartialEq)]
pub struct MiniserverConfig {
    rooms: HashMap<String, Room>,
    categories: HashMap<String, Category>,
    controls: HashMap<String, Control>,
    rooms_by_name: HashMap<String, String>,
    categories_by_name: HashMap<String, String>,
    controls_by_name: HashMap<String, String>,
}

impl MiniserverConfig {
    /// Parse a raw configuration document
    ///
    /// Controls carrying a `subControls` collection are flattened one level:
    /// each immediate sub-control is registered under its own uuid and the
    /// parent uuid is discarded. Sub-controls of sub-controls are not
    /// recursed into.
    pub fn parse(document: &[u8]) -> Result<Self> {
        let raw: RawDocument = serde_json::from_slice(document)
            .map_err(|e| Error::MalformedConfiguration(e.to_string()))?;

        let mut config = MiniserverConfig::default();
        for (uuid, room) in raw.rooms {
            config.rooms_by_name.insert(room.name.clone(), uuid.clone());
            config.rooms.insert(
                uuid.clone(),
                Room {
                    uuid,
                    name: room.name,
                },
            );
        }
        for (uuid, cat) in raw.cats {
            config.categories_by_name.insert(cat.name.clone(), uuid.clone());
            config.categories.insert(
                uuid.clone(),
                Category {
                    uuid,
                    name: cat.name,
                },
            );
        }
        for (uuid, control) in raw.controls {
            match control.sub_controls {
                Some(subs) => {
                    for (sub_uuid, sub) in subs {
                        config.register_control(sub_uuid, sub);
                    }
                }
                None => config.register_control(uuid, control),
            }
        }
        Ok(config)
    }

    fn register_control(&mut self, uuid: String, raw: RawControl) {
        let control = Control {
            uuid: uuid.clone(),
            name: raw.name,
            control_type: ControlType::parse(&raw.control_type),
            room: raw.room,
            category: raw.cat,
            details: raw.details,
        };
        self.controls_by_name.insert(control.name.clone(), uuid.clone());
        self.controls.insert(uuid, control);
    }

    /// Pure lookup, never fails
    pub fn control_by_uuid(&self, uuid: &str) -> Option<&Control> {
        self.controls.get(uuid)
    }

    pub fn control_by_name(&self, name: &str) -> Option<&Control> {
        self.controls_by_name
            .get(name)
            .and_then(|uuid| self.controls.get(uuid))
    }

    /// Resolve a room name; failure is recoverable and the caller should
    /// skip the triggering message
    pub fn room_name(&self, uuid: &str) -> Result<&str> {
        self.rooms
            .get(uuid)
            .map(|r| r.name.as_str())
            .ok_or_else(|| Error::RoomNotFound(uuid.to_string()))
    }

    pub fn category_name(&self, uuid: &str) -> Result<&str> {
        self.categories
            .get(uuid)
            .map(|c| c.name.as_str())
            .ok_or_else(|| Error::CategoryNotFound(uuid.to_string()))
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn control_count(&self) -> usize {
        self.controls.len()
    }
}

/// Shared configuration store
///
/// Written only by the parse path (the message loop); read concurrently by
/// the message loop and the refresh scheduler.
#[derive(Debug, Default)]
pub struct ConfigStore {
    current: RwLock<Arc<MiniserverConfig>>,
    loaded: AtomicBool,
}

impl ConfigStore {
    /// Create an empty, not-yet-loaded store
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration document and swap in the new snapshot
    ///
    /// On failure the previous snapshot stays in effect.
    pub fn parse(&self, document: &[u8]) -> Result<()> {
        let config = MiniserverConfig::parse(document)?;
        debug!(
            rooms = config.room_count(),
            categories = config.category_count(),
            controls = config.control_count(),
            "miniserver configuration processed"
        );
        *self.current.write() = Arc::new(config);
        self.loaded.store(true, Ordering::Release);
        Ok(())
    }

    /// Current immutable snapshot
    pub fn snapshot(&self) -> Arc<MiniserverConfig> {
        self.current.read().clone()
    }

    /// Whether at least one parse has succeeded
    pub fn was_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }
}
