//! loxha Core
//!
//! Core building blocks for the Loxone -> Home Assistant discovery bridge.
//!
//! This crate provides:
//! - The normalized Miniserver data model ([`Room`], [`Category`], [`Control`])
//! - The configuration store with atomic snapshot replacement ([`ConfigStore`])
//! - Pure discovery-config builders ([`discovery`])
//! - Topic construction and classification ([`TopicScheme`])
//! - The per-process announcement dedup set ([`ConfiguredTopics`])
//!
//! Everything here is synchronous and free of network side effects; the
//! async MQTT plumbing lives in `loxha-bridge`.

pub mod cache;
pub mod discovery;
pub mod error;
pub mod store;
pub mod topics;
pub mod types;

pub use cache::ConfiguredTopics;
pub use discovery::{discovery_messages, DiscoveryMessage, DiscoveryPayload};
pub use error::{Error, Result};
pub use store::{ConfigStore, MiniserverConfig};
pub use topics::{TopicKind, TopicScheme};
pub use types::{Category, Control, ControlDetails, ControlType, Room};

/// Topic prefix of the Home Assistant discovery convention
pub const DISCOVERY_PREFIX: &str = "homeassistant";

/// Prefix applied to every generated entity slug
pub const SLUG_PREFIX: &str = "loxone";
