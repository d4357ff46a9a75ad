//! Announcement filtering
//!
//! An injectable predicate deciding which controls get announced to the hub.
//! Production runs without one; during debugging an allow-list keeps test
//! entities from flooding the dashboards.

use loxha_core::Control;

/// Veto point consulted before discovery messages are generated
pub trait AnnouncePolicy: Send + Sync {
    fn allow(&self, control: &Control, room: &str) -> bool;
}

/// Allow only controls whose name contains one of the given fragments
#[derive(Debug, Clone)]
pub struct NameAllowList {
    fragments: Vec<String>,
}

impl NameAllowList {
    pub fn new(fragments: Vec<String>) -> Self {
        Self { fragments }
    }
}

impl AnnouncePolicy for NameAllowList {
    fn allow(&self, control: &Control, _room: &str) -> bool {
        self.fragments.iter().any(|f| control.name.contains(f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loxha_core::{ControlDetails, ControlType};

    fn named(name: &str) -> Control {
        Control {
            uuid: "u1".to_string(),
            name: name.to_string(),
            control_type: ControlType::Switch,
            room: None,
            category: None,
            details: ControlDetails::default(),
        }
    }

    #[test]
    fn test_allow_list_matches_substring() {
        let policy = NameAllowList::new(vec!["generator".to_string()]);
        assert!(policy.allow(&named("R2 generator"), "Cellar"));
        assert!(!policy.allow(&named("Kitchen Light"), "Kitchen"));
    }
}
