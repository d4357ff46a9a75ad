//! Normalized Miniserver data model
//!
//! These types mirror the relevant slice of the Loxone structure file
//! (`LoxAPP3.json` style document): rooms, categories, and controls keyed by
//! uuid, with the type-specific `details` block reduced to the fields the
//! discovery builders actually consume.

use std::collections::BTreeMap;

use serde::Deserialize;

/// A room, immutable once parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub uuid: String,
    pub name: String,
}

/// A category, immutable once parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub uuid: String,
    pub name: String,
}

/// Closed set of control types the generator knows how to announce
///
/// The wire carries free-form strings; anything we have no builder for ends
/// up in [`ControlType::Other`] and is reported as a recoverable warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlType {
    Switch,
    InfoOnlyAnalog,
    Slider,
    Pushbutton,
    TimedSwitch,
    Jalousie,
    Radio,
    Other(String),
}

impl ControlType {
    /// Parse the wire string, matching case-insensitively
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "switch" => ControlType::Switch,
            "infoonlyanalog" => ControlType::InfoOnlyAnalog,
            "slider" => ControlType::Slider,
            "pushbutton" => ControlType::Pushbutton,
            "timedswitch" => ControlType::TimedSwitch,
            "jalousie" => ControlType::Jalousie,
            "radio" => ControlType::Radio,
            other => ControlType::Other(other.to_string()),
        }
    }
}

/// Type-specific detail block of a control
///
/// The source document carries heterogeneous shapes here; only the fields
/// used by a builder are retained, everything else is ignored.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ControlDetails {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Option<f64>,
    /// Label of the radio "all off" position
    #[serde(rename = "allOff")]
    pub all_off: Option<String>,
    /// Radio output labels keyed by position number ("1".."8")
    #[serde(default)]
    pub outputs: BTreeMap<String, String>,
}

/// A single automatable entity exposed by the Miniserver
#[derive(Debug, Clone, PartialEq)]
pub struct Control {
    pub uuid: String,
    pub name: String,
    pub control_type: ControlType,
    /// Room uuid, when assigned
    pub room: Option<String>,
    /// Category uuid, when assigned
    pub category: Option<String>,
    pub details: ControlDetails,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_type_parse_known() {
        assert_eq!(ControlType::parse("Switch"), ControlType::Switch);
        assert_eq!(ControlType::parse("InfoOnlyAnalog"), ControlType::InfoOnlyAnalog);
        assert_eq!(ControlType::parse("jalousie"), ControlType::Jalousie);
        assert_eq!(ControlType::parse("TIMEDSWITCH"), ControlType::TimedSwitch);
    }

    #[test]
    fn test_control_type_parse_unknown_is_lowercased() {
        assert_eq!(
            ControlType::parse("LightController"),
            ControlType::Other("lightcontroller".to_string())
        );
    }
}
