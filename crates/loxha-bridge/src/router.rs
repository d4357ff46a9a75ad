//! Inbound message routing
//!
//! The single entry point for messages delivered by the bus client. The
//! client's delivery loop calls [`MessageRouter::handle`] sequentially, so
//! the router owns its dedup cache without further synchronization. Any
//! error raised while routing one message is logged and swallowed; it never
//! halts processing of subsequent messages.

use std::sync::Arc;

use loxha_core::{ConfigStore, ConfiguredTopics, Error as CoreError, TopicKind, TopicScheme};
use tracing::{debug, error, warn};

use crate::error::{BridgeError, Result};
use crate::policy::AnnouncePolicy;
use crate::traits::Publisher;

pub struct MessageRouter {
    store: Arc<ConfigStore>,
    topics: TopicScheme,
    publisher: Arc<dyn Publisher>,
    cache: ConfiguredTopics,
    policy: Option<Box<dyn AnnouncePolicy>>,
}

impl MessageRouter {
    pub fn new(store: Arc<ConfigStore>, topics: TopicScheme, publisher: Arc<dyn Publisher>) -> Self {
        Self {
            store,
            topics,
            publisher,
            cache: ConfiguredTopics::new(),
            policy: None,
        }
    }

    /// Install an announcement filter
    pub fn with_policy(mut self, policy: Box<dyn AnnouncePolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Topics whose discovery configuration has been announced this run
    pub fn configured_topics(&self) -> &ConfiguredTopics {
        &self.cache
    }

    /// Handle one inbound message; never fails
    pub async fn handle(&mut self, topic: &str, payload: &[u8]) {
        if let Err(err) = self.route(topic, payload).await {
            match err {
                BridgeError::Core(
                    e @ (CoreError::MalformedConfiguration(_)
                    | CoreError::RoomNotFound(_)
                    | CoreError::CategoryNotFound(_)
                    | CoreError::MissingDetail { .. }),
                ) => warn!(topic, %e, "message skipped"),
                err => error!(topic, %err, "failed to process message"),
            }
        }
    }

    async fn route(&mut self, topic: &str, payload: &[u8]) -> Result<()> {
        match self.topics.classify(topic) {
            TopicKind::Configuration => {
                self.store.parse(payload)?;
                Ok(())
            }
            TopicKind::ControlState(uuid) => self.announce(uuid).await,
            TopicKind::Other => Ok(()),
        }
    }

    /// Announce a control to the hub, at most once per state topic per run
    async fn announce(&mut self, uuid: &str) -> Result<()> {
        let state_topic = self.topics.state_topic(uuid);
        if self.cache.contains(&state_topic) {
            return Ok(());
        }

        let snapshot = self.store.snapshot();
        let Some(control) = snapshot.control_by_uuid(uuid) else {
            // Expected during the startup race: state traffic can precede
            // the first configuration document.
            debug!(uuid, "state message for unknown control dropped");
            return Ok(());
        };

        let Some(room_uuid) = control.room.as_deref() else {
            warn!(uuid, control = %control.name, "control has no room assigned, skipped");
            return Ok(());
        };
        let room = snapshot.room_name(room_uuid)?.to_string();

        if let Some(policy) = &self.policy {
            if !policy.allow(control, &room) {
                debug!(uuid, control = %control.name, "announcement vetoed by policy");
                return Ok(());
            }
        }

        let messages = match loxha_core::discovery_messages(control, &room, &self.topics) {
            Ok(messages) => messages,
            Err(CoreError::UnsupportedControlType(raw)) => {
                warn!(uuid, control_type = %raw, "unsupported control type");
                // Recorded so the warning fires once per topic per run.
                self.cache.record(state_topic);
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        for message in &messages {
            let json = message.payload_json()?;
            debug!(topic = %message.topic, payload = %json, "publishing discovery config");
            // Empty payload first: clears any previously retained
            // announcement so the hub replaces instead of merging.
            self.publisher.publish(&message.topic, Vec::new(), false).await?;
            self.publisher
                .publish(&message.topic, json.into_bytes(), false)
                .await?;
        }

        // Recorded only after every publish succeeded; a failure above
        // leaves the topic unrecorded so the next state message retries.
        self.cache.record(state_topic);
        debug!(uuid, entities = messages.len(), "control announced");
        Ok(())
    }
}
