//! Publish seam between the routing logic and the bus client

use async_trait::async_trait;

use crate::Result;

/// Outbound publish capability
///
/// Fire-and-forget from the caller's perspective: a returned error means the
/// bus client refused the publish, not that delivery failed downstream.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, topic: &str, payload: Vec<u8>, retain: bool) -> Result<()>;
}
