//! Service domain types.

use super::STACK_NAMESPACE_LABEL;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One service as observed in the cluster.
///
/// Label and option maps are `BTreeMap` so iteration, and therefore rendered
/// output, is deterministic lexicographic regardless of snapshot order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRecord {
    /// Service ID
    pub id: String,

    /// Service name
    pub name: String,

    /// Annotation labels. The owning stack is the
    /// `com.docker.stack.namespace` entry when present.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,

    /// Container image
    pub image: String,

    /// Desired replica count. Required for rendering; there is no
    /// contract-level default.
    pub replicas: Option<u64>,

    #[serde(default)]
    pub restart_policy: Option<RestartPolicy>,

    #[serde(default)]
    pub update_config: Option<UpdateConfig>,

    /// Rollback cadence, carried independently from `update_config`.
    #[serde(default)]
    pub rollback_config: Option<UpdateConfig>,

    /// Placement constraints in scheduler order
    #[serde(default)]
    pub constraints: Vec<String>,

    #[serde(default)]
    pub limits: Option<ResourceSpec>,

    #[serde(default)]
    pub reservations: Option<ResourceSpec>,

    /// Published ports
    #[serde(default)]
    pub ports: Vec<PortSpec>,

    /// Task-level network attachments, preferred when rendering
    #[serde(default)]
    pub task_networks: Vec<NetworkAttachment>,

    /// Service-level network attachments, the fallback
    #[serde(default)]
    pub service_networks: Vec<NetworkAttachment>,

    /// Container labels, a separate namespace from annotation labels
    #[serde(default)]
    pub container_labels: BTreeMap<String, String>,

    #[serde(default)]
    pub mounts: Vec<MountSpec>,

    /// Raw KEY=VALUE environment entries
    #[serde(default)]
    pub env: Vec<String>,

    #[serde(default)]
    pub log_driver: Option<LogDriver>,
}

impl ServiceRecord {
    /// Stack this service belongs to, when labeled.
    pub fn stack(&self) -> Option<&str> {
        self.labels.get(STACK_NAMESPACE_LABEL).map(String::as_str)
    }
}

/// Restart policy as carried on the task template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestartPolicy {
    /// Restart condition, emitted verbatim (e.g. "any", "on-failure")
    pub condition: String,

    /// Nanoseconds between restarts; rendered as `3s` when unset
    #[serde(default)]
    pub delay_ns: Option<i64>,

    /// Rendered as `0` when unset
    #[serde(default)]
    pub max_attempts: Option<u64>,

    /// Nanoseconds of evaluation window; rendered as `0s` when unset
    #[serde(default)]
    pub window_ns: Option<i64>,
}

/// Update or rollback cadence. The orchestrator carries one record per
/// direction; they are never merged here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateConfig {
    #[serde(default)]
    pub parallelism: Option<u64>,

    /// Nanoseconds between task batches
    #[serde(default)]
    pub delay_ns: Option<i64>,

    #[serde(default)]
    pub failure_action: Option<String>,

    /// Nanoseconds to monitor each batch for failure
    #[serde(default)]
    pub monitor_ns: Option<i64>,

    #[serde(default)]
    pub max_failure_ratio: Option<f64>,
}

/// CPU and memory totals for one side of the resource block.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ResourceSpec {
    /// Fractional cores in units of 1e-9 cores
    #[serde(default)]
    pub nano_cpus: i64,

    #[serde(default)]
    pub memory_bytes: i64,
}

/// Published-to-target port pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PortSpec {
    pub published: u32,
    pub target: u32,
}

/// One attachment of a service to a network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkAttachment {
    /// ID of the attached network
    pub target: String,

    #[serde(default)]
    pub aliases: Vec<String>,
}

/// Bind or volume mount, source and target only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MountSpec {
    pub source: String,
    pub target: String,
}

/// Log driver name and options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogDriver {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub options: BTreeMap<String, String>,
}
