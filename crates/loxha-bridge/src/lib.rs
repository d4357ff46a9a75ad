//! loxha Bridge
//!
//! The async half of the Loxone -> Home Assistant discovery bridge:
//! - The inbound message router ([`MessageRouter`])
//! - The adaptive configuration-refresh scheduler ([`RefreshScheduler`])
//! - The outbound publish seam ([`Publisher`]) and its rumqttc-backed
//!   implementation ([`MqttPublisher`])
//! - Optional announcement filtering ([`AnnouncePolicy`])
//!
//! Connection lifecycle (reconnects, backoff) belongs to the bus client
//! driving the event loop, not to this crate.

pub mod error;
pub mod mqtt;
pub mod policy;
pub mod router;
pub mod scheduler;
pub mod traits;

pub use error::{BridgeError, Result};
pub use mqtt::{MqttPublisher, MqttSettings};
pub use policy::{AnnouncePolicy, NameAllowList};
pub use router::MessageRouter;
pub use scheduler::{RefreshScheduler, SchedulerConfig};
pub use traits::Publisher;
