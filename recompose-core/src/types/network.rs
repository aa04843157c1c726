//! Network domain types.

use super::{ACCESS_CONTROL_LABEL, STACK_NAMESPACE_LABEL};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One network as observed in the cluster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkRecord {
    /// Network ID
    pub id: String,

    /// Network name
    pub name: String,

    /// Network driver (e.g. "overlay")
    #[serde(default)]
    pub driver: String,

    /// Driver options, lexicographic by key
    #[serde(default)]
    pub options: BTreeMap<String, String>,

    /// Network labels
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl NetworkRecord {
    /// Stack that manages this network, when labeled.
    pub fn owner(&self) -> Option<&str> {
        self.labels.get(STACK_NAMESPACE_LABEL).map(String::as_str)
    }

    /// Access-control label value, when present.
    pub fn access_label(&self) -> Option<&str> {
        self.labels.get(ACCESS_CONTROL_LABEL).map(String::as_str)
    }
}
