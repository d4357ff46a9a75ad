//! Home Assistant discovery-config generation
//!
//! Pure, deterministic builders that turn a [`Control`] (plus its resolved
//! room name) into one or more `(topic, payload)` discovery messages on the
//! `homeassistant/<component>/<slug>/config` convention.
//!
//! The value/command templates reference the nested state JSON delivered on
//! the control's state topic (`value_json.state.*`). They are part of the
//! wire contract with Home Assistant; changing them breaks running
//! installations.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::topics::TopicScheme;
use crate::types::{Control, ControlType};
use crate::{DISCOVERY_PREFIX, SLUG_PREFIX};

/// Payload of a switch entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwitchConfig {
    pub command_topic: String,
    pub state_topic: String,
    pub value_template: String,
    pub payload_on: String,
    pub payload_off: String,
    pub state_on: String,
    pub state_off: String,
    pub qos: u8,
    pub retain: bool,
    pub unique_id: String,
    pub name: String,
    pub enabled_by_default: bool,
}

/// Payload of a read-only sensor entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorConfig {
    pub state_topic: String,
    pub value_template: String,
    pub unique_id: String,
    pub name: String,
    pub enabled_by_default: bool,
}

/// Payload of a number entity (slider mode)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberConfig {
    pub command_topic: String,
    pub state_topic: String,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub mode: String,
    pub value_template: String,
    pub command_template: String,
    pub qos: u8,
    pub retain: bool,
    pub unique_id: String,
    pub name: String,
    pub enabled_by_default: bool,
}

/// Payload of a stateless button entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ButtonConfig {
    pub command_topic: String,
    pub payload_press: String,
    pub unique_id: String,
    pub name: String,
    pub enabled_by_default: bool,
}

/// Closed set of discovery payload shapes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DiscoveryPayload {
    Switch(SwitchConfig),
    Sensor(SensorConfig),
    Number(NumberConfig),
    Button(ButtonConfig),
}

/// One retained announcement for the hub: a config topic plus its payload
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryMessage {
    pub topic: String,
    pub payload: DiscoveryPayload,
}

impl DiscoveryMessage {
    /// Serialize the payload for the wire
    pub fn payload_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.payload)?)
    }
}

/// Build the discovery messages for a control
///
/// Dispatches on the control type; unsupported types yield
/// [`Error::UnsupportedControlType`] and controls missing a required detail
/// field yield [`Error::MissingDetail`]. Both are recoverable.
pub fn discovery_messages(
    control: &Control,
    room: &str,
    topics: &TopicScheme,
) -> Result<Vec<DiscoveryMessage>> {
    match &control.control_type {
        ControlType::Switch => Ok(vec![switch(control, room, topics)]),
        ControlType::InfoOnlyAnalog => Ok(vec![analog_sensor(control, room, topics)]),
        ControlType::Slider => Ok(vec![slider(control, room, topics)?]),
        ControlType::Pushbutton => Ok(vec![pushbutton(control, room, topics)]),
        ControlType::TimedSwitch => Ok(timed_switch(control, room, topics)),
        ControlType::Jalousie => Ok(jalousie(control, room, topics)),
        ControlType::Radio => radio(control, room, topics),
        ControlType::Other(raw) => Err(Error::UnsupportedControlType(raw.clone())),
    }
}

fn switch(control: &Control, room: &str, topics: &TopicScheme) -> DiscoveryMessage {
    let slug = control_slug(control);
    DiscoveryMessage {
        topic: config_topic("switch", &slug),
        payload: DiscoveryPayload::Switch(SwitchConfig {
            command_topic: topics.command_topic(&control.uuid),
            state_topic: topics.state_topic(&control.uuid),
            value_template: "{{ value_json.state.active }}".to_string(),
            payload_on: "on".to_string(),
            payload_off: "off".to_string(),
            state_on: "on".to_string(),
            state_off: "off".to_string(),
            qos: 0,
            retain: false,
            unique_id: slug,
            name: entity_name(control, room, None),
            enabled_by_default: true,
        }),
    }
}

fn analog_sensor(control: &Control, room: &str, topics: &TopicScheme) -> DiscoveryMessage {
    let slug = control_slug(control);
    DiscoveryMessage {
        topic: config_topic("sensor", &slug),
        payload: DiscoveryPayload::Sensor(SensorConfig {
            state_topic: topics.state_topic(&control.uuid),
            value_template: "{{ value_json.state.value }}".to_string(),
            unique_id: slug,
            name: entity_name(control, room, None),
            enabled_by_default: true,
        }),
    }
}

fn slider(control: &Control, room: &str, topics: &TopicScheme) -> Result<DiscoveryMessage> {
    let slug = control_slug(control);
    Ok(DiscoveryMessage {
        topic: config_topic("number", &slug),
        payload: DiscoveryPayload::Number(NumberConfig {
            command_topic: topics.command_topic(&control.uuid),
            state_topic: topics.state_topic(&control.uuid),
            min: require_detail(control, control.details.min, "min")?,
            max: require_detail(control, control.details.max, "max")?,
            step: require_detail(control, control.details.step, "step")?,
            mode: "slider".to_string(),
            value_template: "{{ value_json.state.value }}".to_string(),
            command_template: "{{ value }}".to_string(),
            qos: 0,
            retain: false,
            unique_id: slug,
            name: entity_name(control, room, None),
            enabled_by_default: true,
        }),
    })
}

fn pushbutton(control: &Control, room: &str, topics: &TopicScheme) -> DiscoveryMessage {
    let slug = control_slug(control);
    DiscoveryMessage {
        topic: config_topic("button", &slug),
        payload: DiscoveryPayload::Button(ButtonConfig {
            command_topic: topics.command_topic(&control.uuid),
            payload_press: "pulse".to_string(),
            unique_id: slug,
            name: entity_name(control, room, None),
            enabled_by_default: true,
        }),
    }
}

// State carries a countdown: deactivationDelay is -1 when permanently on,
// otherwise counts down to 0 (off).
fn timed_switch(control: &Control, room: &str, topics: &TopicScheme) -> Vec<DiscoveryMessage> {
    vec![
        button_entity(control, room, topics, "On", "on"),
        button_entity(control, room, topics, "Off", "off"),
        button_entity(control, room, topics, "Start", "pulse"),
        sensor_entity(
            control,
            room,
            topics,
            "Time remaining",
            "{{ value_json.state.deactivationDelay | round(0) }}",
        ),
        sensor_entity(
            control,
            room,
            topics,
            "Status",
            r#"{{ "Off" if value_json.state.deactivationDelay == 0 else "On" }}"#,
        ),
    ]
}

// position and shadePosition arrive as 0..1 fractions; scaled to percent.
fn jalousie(control: &Control, room: &str, topics: &TopicScheme) -> Vec<DiscoveryMessage> {
    vec![
        button_entity(control, room, topics, "Full Up", "FullUp"),
        button_entity(control, room, topics, "Full Down", "FullDown"),
        button_entity(control, room, topics, "Shade", "shade"),
        button_entity(control, room, topics, "Enable autopilot", "auto"),
        button_entity(control, room, topics, "Disable autopilot", "NoAuto"),
        sensor_entity(
            control,
            room,
            topics,
            "direction",
            "{{ 'up' if value_json.state.up else 'down' if value_json.state.down else '-' }}",
        ),
        sensor_entity(
            control,
            room,
            topics,
            "position",
            "{{ (value_json.state.position * 100) | round(0) }}",
        ),
        sensor_entity(
            control,
            room,
            topics,
            "shade",
            "{{ (value_json.state.shadePosition * 100) | round(0) }}",
        ),
        sensor_entity(
            control,
            room,
            topics,
            "auto enabled",
            "{{ 'yes' if value_json.state.autoActive else 'no' }}",
        ),
    ]
}

// An 8-way radio: one reset button, one button per numbered position,
// plus sensors for the current numeric value and its text label.
fn radio(control: &Control, room: &str, topics: &TopicScheme) -> Result<Vec<DiscoveryMessage>> {
    let all_off = control.details.all_off.as_deref().ok_or_else(|| missing(control, "allOff"))?;

    let mut messages = Vec::with_capacity(11);
    messages.push(radio_button(control, room, topics, 0, all_off));
    for index in 1..=8u8 {
        let label = control
            .details
            .outputs
            .get(&index.to_string())
            .ok_or_else(|| missing(control, "outputs"))?;
        messages.push(radio_button(control, room, topics, index, label));
    }
    messages.push(sensor_entity(control, room, topics, "value", "{{ value_json.state.value }}"));
    messages.push(sensor_entity(control, room, topics, "text", "{{ value_json.state.text }}"));
    Ok(messages)
}

fn radio_button(
    control: &Control,
    room: &str,
    topics: &TopicScheme,
    index: u8,
    label: &str,
) -> DiscoveryMessage {
    let slug = format!("{}_{}", control_slug(control), index);
    let payload_press = if index == 0 {
        "reset".to_string()
    } else {
        index.to_string()
    };
    DiscoveryMessage {
        topic: config_topic("button", &slug),
        payload: DiscoveryPayload::Button(ButtonConfig {
            command_topic: topics.command_topic(&control.uuid),
            payload_press,
            unique_id: slug,
            name: entity_name(control, room, Some(label)),
            enabled_by_default: true,
        }),
    }
}

fn button_entity(
    control: &Control,
    room: &str,
    topics: &TopicScheme,
    label: &str,
    payload_press: &str,
) -> DiscoveryMessage {
    let slug = format!("{}_{}", control_slug(control), slugify(label));
    DiscoveryMessage {
        topic: config_topic("button", &slug),
        payload: DiscoveryPayload::Button(ButtonConfig {
            command_topic: topics.command_topic(&control.uuid),
            payload_press: payload_press.to_string(),
            unique_id: slug,
            name: entity_name(control, room, Some(label)),
            enabled_by_default: true,
        }),
    }
}

fn sensor_entity(
    control: &Control,
    room: &str,
    topics: &TopicScheme,
    label: &str,
    value_template: &str,
) -> DiscoveryMessage {
    let slug = format!("{}_{}", control_slug(control), slugify(label));
    DiscoveryMessage {
        topic: config_topic("sensor", &slug),
        payload: DiscoveryPayload::Sensor(SensorConfig {
            state_topic: topics.state_topic(&control.uuid),
            value_template: value_template.to_string(),
            unique_id: slug,
            name: entity_name(control, room, Some(label)),
            enabled_by_default: true,
        }),
    }
}

fn missing(control: &Control, field: &str) -> Error {
    Error::MissingDetail {
        control: control.uuid.clone(),
        field: field.to_string(),
    }
}

fn require_detail(control: &Control, value: Option<f64>, field: &str) -> Result<f64> {
    value.ok_or_else(|| missing(control, field))
}

/// `"<control> - <sub-label> (<room>)"`, or without the sub-label part
fn entity_name(control: &Control, room: &str, sub_label: Option<&str>) -> String {
    match sub_label {
        Some(sub) => format!("{} - {} ({})", control.name, sub, room),
        None => format!("{} ({})", control.name, room),
    }
}

/// Stable slug for a control, derived from its uuid
fn control_slug(control: &Control) -> String {
    slugify(&format!("{}_{}", SLUG_PREFIX, control.uuid))
}

fn config_topic(component: &str, slug: &str) -> String {
    sanitize_topic(&format!("{}/{}/{}/config", DISCOVERY_PREFIX, component, slug))
}

/// Lowercase and collapse every run of non-alphanumeric characters
/// (except `_`) into a single underscore
fn slugify(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut gap = false;
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            out.push(c.to_ascii_lowercase());
            gap = false;
        } else if !gap {
            out.push('_');
            gap = true;
        }
    }
    out
}

/// Make a topic MQTT-safe: collapse doubled slashes, replace wildcard
/// characters, strip a trailing slash
fn sanitize_topic(topic: &str) -> String {
    let mut out = topic.replace("//", "/").replace(['+', '#'], "_");
    if out.ends_with('/') {
        out.pop();
    }
    out
}
