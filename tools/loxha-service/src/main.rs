//! loxha Bridge Service
//!
//! Deployable binary: connects to the MQTT broker, subscribes to the Loxone
//! namespace, routes inbound messages, and runs the configuration-refresh
//! scheduler until interrupted.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use loxha_bridge::{MessageRouter, MqttSettings, NameAllowList, RefreshScheduler};
use loxha_core::{ConfigStore, TopicScheme};
use rumqttc::{Event, Packet};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "loxha-service")]
#[command(about = "Loxone to Home Assistant MQTT discovery bridge")]
#[command(version)]
struct Cli {
    /// MQTT broker host
    #[arg(long, env = "LOXHA_MQTT_HOST", default_value = "localhost")]
    mqtt_host: String,

    /// MQTT broker port
    #[arg(long, env = "LOXHA_MQTT_PORT", default_value_t = 1883)]
    mqtt_port: u16,

    /// MQTT username
    #[arg(long, env = "LOXHA_MQTT_USERNAME")]
    mqtt_username: Option<String>,

    /// MQTT password
    #[arg(long, env = "LOXHA_MQTT_PASSWORD")]
    mqtt_password: Option<String>,

    /// MQTT client ID
    #[arg(long, env = "LOXHA_CLIENT_ID", default_value = "loxha")]
    client_id: String,

    /// Root topic namespace the Loxone gateway publishes under
    #[arg(long, env = "LOXHA_TOPIC_ROOT", default_value = "lox")]
    topic_root: String,

    /// Announce only controls whose name contains one of these fragments
    /// (debugging aid; all controls are announced when unset)
    #[arg(long, env = "LOXHA_ALLOW_CONTROLS", value_delimiter = ',')]
    allow_controls: Vec<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting loxha bridge service");
    info!("Broker: {}:{}", cli.mqtt_host, cli.mqtt_port);
    info!("Topic root: {}", cli.topic_root);

    let settings = MqttSettings {
        broker_host: cli.mqtt_host,
        broker_port: cli.mqtt_port,
        client_id: cli.client_id,
        username: cli.mqtt_username,
        password: cli.mqtt_password,
        ..MqttSettings::default()
    };
    let (publisher, mut eventloop) = settings.connect();
    let publisher = Arc::new(publisher);

    let store = Arc::new(ConfigStore::new());
    let topics = TopicScheme::new(cli.topic_root);

    let mut router = MessageRouter::new(store.clone(), topics.clone(), publisher.clone());
    if !cli.allow_controls.is_empty() {
        warn!(
            "Announcement allow-list active: {:?}",
            cli.allow_controls
        );
        router = router.with_policy(Box::new(NameAllowList::new(cli.allow_controls.clone())));
    }

    let shutdown = CancellationToken::new();
    let scheduler = RefreshScheduler::new(store, topics.clone(), publisher.clone());
    let scheduler_handle = tokio::spawn(scheduler.run(shutdown.clone()));

    let subscription = topics.subscription();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
            event = eventloop.poll() => match event {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    info!("Connected to MQTT broker");
                    // (Re)subscribe on every connection so a broker restart
                    // does not leave us deaf.
                    if let Err(e) = publisher.subscribe(&subscription).await {
                        error!(%e, "subscription failed");
                    }
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    router.handle(&publish.topic, &publish.payload).await;
                }
                Ok(_) => {}
                Err(e) => {
                    error!(%e, "MQTT connection error, retrying");
                    tokio::time::sleep(Duration::from_secs(5)).await;
                }
            }
        }
    }

    shutdown.cancel();
    scheduler_handle.await?;
    publisher.disconnect().await.ok();
    Ok(())
}
