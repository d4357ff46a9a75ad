//! rumqttc-backed publisher
//!
//! Thin wrapper over `rumqttc::AsyncClient`. The caller drives the returned
//! event loop; this module only queues publishes and subscriptions.

use std::time::Duration;

use async_trait::async_trait;
use rumqttc::{AsyncClient, EventLoop, MqttOptions, QoS};
use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};
use crate::traits::Publisher;

/// MQTT connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MqttSettings {
    /// Broker hostname or address
    pub broker_host: String,
    /// Broker port
    pub broker_port: u16,
    /// Client ID for the MQTT session
    pub client_id: String,
    /// Optional username for authentication
    #[serde(default)]
    pub username: Option<String>,
    /// Optional password for authentication
    #[serde(default)]
    pub password: Option<String>,
    /// Keep alive interval in seconds
    #[serde(default = "default_keep_alive")]
    pub keep_alive_secs: u16,
}

fn default_keep_alive() -> u16 {
    60
}

impl Default for MqttSettings {
    fn default() -> Self {
        Self {
            broker_host: "localhost".to_string(),
            broker_port: 1883,
            client_id: "loxha".to_string(),
            username: None,
            password: None,
            keep_alive_secs: 60,
        }
    }
}

impl MqttSettings {
    /// Build the client and the event loop the caller must poll
    pub fn connect(&self) -> (MqttPublisher, EventLoop) {
        let mut options = MqttOptions::new(&self.client_id, &self.broker_host, self.broker_port);
        options.set_keep_alive(Duration::from_secs(u64::from(self.keep_alive_secs)));
        if let (Some(user), Some(pass)) = (&self.username, &self.password) {
            options.set_credentials(user, pass);
        }

        let (client, eventloop) = AsyncClient::new(options, 100);
        (MqttPublisher { client }, eventloop)
    }
}

/// Publisher over a live rumqttc client
#[derive(Clone)]
pub struct MqttPublisher {
    client: AsyncClient,
}

impl MqttPublisher {
    pub async fn subscribe(&self, topic: &str) -> Result<()> {
        self.client
            .subscribe(topic, QoS::AtMostOnce)
            .await
            .map_err(|e| BridgeError::ConnectionFailed(format!("subscribe failed: {}", e)))
    }

    pub async fn disconnect(&self) -> Result<()> {
        self.client
            .disconnect()
            .await
            .map_err(|e| BridgeError::ConnectionFailed(e.to_string()))
    }
}

#[async_trait]
impl Publisher for MqttPublisher {
    async fn publish(&self, topic: &str, payload: Vec<u8>, retain: bool) -> Result<()> {
        self.client
            .publish(topic, QoS::AtMostOnce, retain, payload)
            .await
            .map_err(|e| BridgeError::Publish(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default() {
        let settings = MqttSettings::default();
        assert_eq!(settings.broker_host, "localhost");
        assert_eq!(settings.broker_port, 1883);
        assert_eq!(settings.keep_alive_secs, 60);
    }

    #[test]
    fn test_settings_deserialize_partial() {
        let settings: MqttSettings = serde_json::from_str(
            r#"{ "broker_host": "broker.local", "broker_port": 1884, "client_id": "loxha-test" }"#,
        )
        .unwrap();
        assert_eq!(settings.broker_host, "broker.local");
        assert_eq!(settings.username, None);
        assert_eq!(settings.keep_alive_secs, 60);
    }
}
