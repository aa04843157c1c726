//! Domain types: read-only projections of the cluster snapshot.

pub mod network;
pub mod service;

pub use network::NetworkRecord;
pub use service::{
    LogDriver, MountSpec, NetworkAttachment, PortSpec, ResourceSpec, RestartPolicy, ServiceRecord,
    UpdateConfig,
};

/// Label that groups services and networks into a named stack.
pub const STACK_NAMESPACE_LABEL: &str = "com.docker.stack.namespace";

/// Access-control label carried on networks, re-emitted on managed networks.
pub const ACCESS_CONTROL_LABEL: &str = "com.docker.ucp.access.label";
