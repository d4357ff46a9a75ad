//! Discovery-config generator tests
//!
//! The generated topics and payloads are wire contracts with Home Assistant;
//! these tests pin them down exactly.

use std::collections::BTreeMap;

use loxha_core::{
    discovery_messages, Control, ControlDetails, ControlType, DiscoveryPayload, Error, TopicScheme,
};

fn control(uuid: &str, name: &str, control_type: ControlType) -> Control {
    Control {
        uuid: uuid.to_string(),
        name: name.to_string(),
        control_type,
        room: Some("r1".to_string()),
        category: None,
        details: ControlDetails::default(),
    }
}

fn scheme() -> TopicScheme {
    TopicScheme::new("lox")
}

#[test]
fn test_switch_single_message() {
    let control = control("c1", "Main Switch", ControlType::Switch);
    let messages = discovery_messages(&control, "Kitchen", &scheme()).unwrap();

    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].topic, "homeassistant/switch/loxone_c1/config");

    let DiscoveryPayload::Switch(payload) = &messages[0].payload else {
        panic!("expected switch payload");
    };
    assert_eq!(payload.command_topic, "lox/by-uuid/c1/cmd");
    assert_eq!(payload.state_topic, "lox/by-uuid/c1/state");
    assert_eq!(payload.value_template, "{{ value_json.state.active }}");
    assert_eq!(payload.payload_on, "on");
    assert_eq!(payload.state_off, "off");
    assert_eq!(payload.unique_id, "loxone_c1");
    assert_eq!(payload.name, "Main Switch (Kitchen)");
    assert!(payload.enabled_by_default);
}

#[test]
fn test_switch_payload_wire_order() {
    let control = control("c1", "Main Switch", ControlType::Switch);
    let messages = discovery_messages(&control, "Kitchen", &scheme()).unwrap();

    assert_eq!(
        messages[0].payload_json().unwrap(),
        concat!(
            r#"{"command_topic":"lox/by-uuid/c1/cmd","#,
            r#""state_topic":"lox/by-uuid/c1/state","#,
            r#""value_template":"{{ value_json.state.active }}","#,
            r#""payload_on":"on","payload_off":"off","#,
            r#""state_on":"on","state_off":"off","#,
            r#""qos":0,"retain":false,"#,
            r#""unique_id":"loxone_c1","#,
            r#""name":"Main Switch (Kitchen)","#,
            r#""enabled_by_default":true}"#,
        )
    );
}

#[test]
fn test_analog_sensor() {
    let control = control("a1", "Outside Temp", ControlType::InfoOnlyAnalog);
    let messages = discovery_messages(&control, "Garden", &scheme()).unwrap();

    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].topic, "homeassistant/sensor/loxone_a1/config");
    let DiscoveryPayload::Sensor(payload) = &messages[0].payload else {
        panic!("expected sensor payload");
    };
    assert_eq!(payload.state_topic, "lox/by-uuid/a1/state");
    assert_eq!(payload.value_template, "{{ value_json.state.value }}");
    assert_eq!(payload.name, "Outside Temp (Garden)");
}

#[test]
fn test_slider_honors_details() {
    let mut control = control("s1", "Volume", ControlType::Slider);
    control.details.min = Some(0.0);
    control.details.max = Some(50.0);
    control.details.step = Some(0.5);

    let messages = discovery_messages(&control, "Living Room", &scheme()).unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].topic, "homeassistant/number/loxone_s1/config");

    let DiscoveryPayload::Number(payload) = &messages[0].payload else {
        panic!("expected number payload");
    };
    assert_eq!(payload.min, 0.0);
    assert_eq!(payload.max, 50.0);
    assert_eq!(payload.step, 0.5);
    assert_eq!(payload.mode, "slider");
    assert_eq!(payload.value_template, "{{ value_json.state.value }}");
    assert_eq!(payload.command_template, "{{ value }}");
}

#[test]
fn test_slider_missing_detail() {
    let mut control = control("s1", "Volume", ControlType::Slider);
    control.details.min = Some(0.0);
    control.details.max = Some(50.0);

    let err = discovery_messages(&control, "Living Room", &scheme()).unwrap_err();
    assert!(matches!(err, Error::MissingDetail { ref field, .. } if field == "step"));
}

#[test]
fn test_pushbutton() {
    let control = control("p1", "Doorbell", ControlType::Pushbutton);
    let messages = discovery_messages(&control, "Hall", &scheme()).unwrap();

    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].topic, "homeassistant/button/loxone_p1/config");
    let DiscoveryPayload::Button(payload) = &messages[0].payload else {
        panic!("expected button payload");
    };
    assert_eq!(payload.command_topic, "lox/by-uuid/p1/cmd");
    assert_eq!(payload.payload_press, "pulse");
}

#[test]
fn test_timed_switch_entities() {
    let control = control("t1", "Stair Light", ControlType::TimedSwitch);
    let messages = discovery_messages(&control, "Stairs", &scheme()).unwrap();

    assert_eq!(messages.len(), 5);

    let buttons: Vec<_> = messages
        .iter()
        .filter_map(|m| match &m.payload {
            DiscoveryPayload::Button(b) => Some(b),
            _ => None,
        })
        .collect();
    let sensors: Vec<_> = messages
        .iter()
        .filter_map(|m| match &m.payload {
            DiscoveryPayload::Sensor(s) => Some(s),
            _ => None,
        })
        .collect();
    assert_eq!(buttons.len(), 3);
    assert_eq!(sensors.len(), 2);

    let presses: Vec<_> = buttons.iter().map(|b| b.payload_press.as_str()).collect();
    assert_eq!(presses, ["on", "off", "pulse"]);

    assert_eq!(
        sensors[0].value_template,
        "{{ value_json.state.deactivationDelay | round(0) }}"
    );
    assert_eq!(
        sensors[1].value_template,
        r#"{{ "Off" if value_json.state.deactivationDelay == 0 else "On" }}"#
    );
    assert_eq!(sensors[0].name, "Stair Light - Time remaining (Stairs)");
    assert_eq!(sensors[0].unique_id, "loxone_t1_time_remaining");
}

#[test]
fn test_jalousie_entities() {
    let control = control("j1", "Blinds", ControlType::Jalousie);
    let messages = discovery_messages(&control, "Bedroom", &scheme()).unwrap();

    assert_eq!(messages.len(), 9);

    let buttons: Vec<_> = messages
        .iter()
        .filter_map(|m| match &m.payload {
            DiscoveryPayload::Button(b) => Some(b),
            _ => None,
        })
        .collect();
    let sensors: Vec<_> = messages
        .iter()
        .filter_map(|m| match &m.payload {
            DiscoveryPayload::Sensor(s) => Some(s),
            _ => None,
        })
        .collect();
    assert_eq!(buttons.len(), 5);
    assert_eq!(sensors.len(), 4);

    let presses: Vec<_> = buttons.iter().map(|b| b.payload_press.as_str()).collect();
    assert_eq!(presses, ["FullUp", "FullDown", "shade", "auto", "NoAuto"]);
    assert_eq!(buttons[0].unique_id, "loxone_j1_full_up");
    assert_eq!(buttons[4].name, "Blinds - Disable autopilot (Bedroom)");

    assert_eq!(
        sensors[0].value_template,
        "{{ 'up' if value_json.state.up else 'down' if value_json.state.down else '-' }}"
    );
    assert_eq!(
        sensors[1].value_template,
        "{{ (value_json.state.position * 100) | round(0) }}"
    );
    assert_eq!(
        sensors[2].value_template,
        "{{ (value_json.state.shadePosition * 100) | round(0) }}"
    );
    assert_eq!(
        sensors[3].value_template,
        "{{ 'yes' if value_json.state.autoActive else 'no' }}"
    );
    assert_eq!(sensors[0].unique_id, "loxone_j1_direction");
    assert_eq!(sensors[3].unique_id, "loxone_j1_auto_enabled");
}

fn radio_control() -> Control {
    let mut control = control("r8", "Heating Mode", ControlType::Radio);
    control.details.all_off = Some("Everything off".to_string());
    control.details.outputs = (1..=8u8)
        .map(|i| (i.to_string(), format!("Mode {}", i)))
        .collect::<BTreeMap<_, _>>();
    control
}

#[test]
fn test_radio_entities() {
    let messages = discovery_messages(&radio_control(), "Utility", &scheme()).unwrap();

    assert_eq!(messages.len(), 11);

    let buttons: Vec<_> = messages
        .iter()
        .filter_map(|m| match &m.payload {
            DiscoveryPayload::Button(b) => Some(b),
            _ => None,
        })
        .collect();
    assert_eq!(buttons.len(), 9);

    // Index 0 is the reset button, labeled by the allOff detail.
    assert_eq!(buttons[0].payload_press, "reset");
    assert_eq!(buttons[0].unique_id, "loxone_r8_0");
    assert_eq!(buttons[0].name, "Heating Mode - Everything off (Utility)");

    assert_eq!(buttons[3].payload_press, "3");
    assert_eq!(buttons[3].unique_id, "loxone_r8_3");
    assert_eq!(buttons[3].name, "Heating Mode - Mode 3 (Utility)");

    let sensors: Vec<_> = messages
        .iter()
        .filter_map(|m| match &m.payload {
            DiscoveryPayload::Sensor(s) => Some(s),
            _ => None,
        })
        .collect();
    assert_eq!(sensors.len(), 2);
    assert_eq!(sensors[0].value_template, "{{ value_json.state.value }}");
    assert_eq!(sensors[1].value_template, "{{ value_json.state.text }}");
    assert_eq!(sensors[1].unique_id, "loxone_r8_text");
}

#[test]
fn test_radio_missing_output_label() {
    let mut control = radio_control();
    control.details.outputs.remove("5");

    let err = discovery_messages(&control, "Utility", &scheme()).unwrap_err();
    assert!(matches!(err, Error::MissingDetail { ref field, .. } if field == "outputs"));
}

#[test]
fn test_unsupported_type() {
    let control = control("x1", "Mood", ControlType::Other("lightcontroller".to_string()));
    let err = discovery_messages(&control, "Kitchen", &scheme()).unwrap_err();
    assert!(matches!(err, Error::UnsupportedControlType(t) if t == "lightcontroller"));
}

#[test]
fn test_generation_is_deterministic() {
    let control = radio_control();
    let first = discovery_messages(&control, "Utility", &scheme()).unwrap();
    let second = discovery_messages(&control, "Utility", &scheme()).unwrap();
    assert_eq!(first, second);

    let json_first: Vec<_> = first.iter().map(|m| m.payload_json().unwrap()).collect();
    let json_second: Vec<_> = second.iter().map(|m| m.payload_json().unwrap()).collect();
    assert_eq!(json_first, json_second);
}

#[test]
fn test_uuid_slug_normalization() {
    let control = control(
        "0f86a2fe-0378-3e15-ffff403fb0c34b9e",
        "Ceiling",
        ControlType::Switch,
    );
    let messages = discovery_messages(&control, "Office", &scheme()).unwrap();
    assert_eq!(
        messages[0].topic,
        "homeassistant/switch/loxone_0f86a2fe_0378_3e15_ffff403fb0c34b9e/config"
    );
}
