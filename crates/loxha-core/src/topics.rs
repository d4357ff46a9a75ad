//! Topic construction and classification
//!
//! All bus topics hang off a configured root namespace:
//!
//! ```text
//! <root>/by-uuid/<uuid>/state   inbound per-control state
//! <root>/by-uuid/<uuid>/cmd     outbound commands (written by the hub)
//! <root>/configuration          inbound configuration document
//! <root>/configuration/get      outbound refresh request (empty payload)
//! ```

/// Classification of an inbound topic
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicKind<'a> {
    /// The configuration-document response topic
    Configuration,
    /// A per-control state topic; carries the control uuid
    ControlState(&'a str),
    /// Anything else, ignored by the router
    Other,
}

/// Topic scheme over the configured root namespace
#[derive(Debug, Clone)]
pub struct TopicScheme {
    root: String,
}

impl TopicScheme {
    pub fn new(root: impl Into<String>) -> Self {
        let root = root.into();
        Self {
            root: root.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// State topic of a control
    pub fn state_topic(&self, uuid: &str) -> String {
        format!("{}/by-uuid/{}/state", self.root, uuid)
    }

    /// Command topic of a control
    pub fn command_topic(&self, uuid: &str) -> String {
        format!("{}/by-uuid/{}/cmd", self.root, uuid)
    }

    /// Topic the configuration document arrives on
    pub fn configuration(&self) -> String {
        format!("{}/configuration", self.root)
    }

    /// Topic a configuration refresh is requested on
    pub fn configuration_request(&self) -> String {
        format!("{}/configuration/get", self.root)
    }

    /// Wildcard subscription covering everything under the root
    pub fn subscription(&self) -> String {
        format!("{}/#", self.root)
    }

    /// Classify an inbound topic
    pub fn classify<'a>(&self, topic: &'a str) -> TopicKind<'a> {
        let Some(rest) = topic.strip_prefix(self.root.as_str()) else {
            return TopicKind::Other;
        };
        if rest == "/configuration" {
            return TopicKind::Configuration;
        }
        if let Some(rest) = rest.strip_prefix("/by-uuid/") {
            if let Some(uuid) = rest.strip_suffix("/state") {
                if !uuid.is_empty() && !uuid.contains('/') {
                    return TopicKind::ControlState(uuid);
                }
            }
        }
        TopicKind::Other
    }
}
