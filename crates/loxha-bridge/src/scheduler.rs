//! Configuration refresh scheduling
//!
//! A two-state polling loop that keeps the configuration store fresh
//! independently of message traffic. Until the first successful parse it
//! requests the configuration document every 5 seconds; once the store
//! reports loaded, the cadence relaxes to 5 minutes and never tightens
//! again.

use std::sync::Arc;
use std::time::Duration;

use loxha_core::{ConfigStore, TopicScheme};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::traits::Publisher;

/// Refresh intervals for the two scheduler states
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Cadence before the first successful configuration parse
    pub unloaded_interval: Duration,
    /// Cadence after the configuration has loaded
    pub loaded_interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            unloaded_interval: Duration::from_secs(5),
            loaded_interval: Duration::from_secs(300),
        }
    }
}

pub struct RefreshScheduler {
    store: Arc<ConfigStore>,
    publisher: Arc<dyn Publisher>,
    topics: TopicScheme,
    config: SchedulerConfig,
}

impl RefreshScheduler {
    pub fn new(store: Arc<ConfigStore>, topics: TopicScheme, publisher: Arc<dyn Publisher>) -> Self {
        Self {
            store,
            publisher,
            topics,
            config: SchedulerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SchedulerConfig) -> Self {
        self.config = config;
        self
    }

    /// Run until the token is cancelled
    ///
    /// Each iteration publishes an empty payload to the refresh-request
    /// topic and sleeps the interval of the current state. Publish failures
    /// are logged and the loop keeps going; the bus client owns retries.
    pub async fn run(self, shutdown: CancellationToken) {
        let request_topic = self.topics.configuration_request();
        let mut loaded = false;

        loop {
            if let Err(e) = self.publisher.publish(&request_topic, Vec::new(), false).await {
                warn!(topic = %request_topic, %e, "configuration refresh request failed");
            }

            if !loaded && self.store.was_loaded() {
                loaded = true;
                info!(
                    interval_secs = self.config.loaded_interval.as_secs(),
                    "configuration loaded, relaxing refresh cadence"
                );
            }

            let interval = if loaded {
                self.config.loaded_interval
            } else {
                self.config.unloaded_interval
            };

            tokio::select! {
                _ = shutdown.cancelled() => {
                    debug!("refresh scheduler stopped");
                    return;
                }
                _ = tokio::time::sleep(interval) => {}
            }
        }
    }
}
