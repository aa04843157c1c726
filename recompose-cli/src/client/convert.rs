//! Conversions from engine API models to domain records.

use bollard::models::{
    Mount, Network, NetworkAttachmentConfig, Service, ServiceSpecRollbackConfig,
    ServiceSpecUpdateConfig,
};
use recompose_core::types::{
    LogDriver, MountSpec, NetworkAttachment, NetworkRecord, PortSpec, ResourceSpec, RestartPolicy,
    ServiceRecord, UpdateConfig,
};
use std::collections::BTreeMap;
use tracing::warn;

/// Project one wire-level service into a `ServiceRecord`.
///
/// Records without an id or spec cannot be addressed at all and are skipped;
/// anything else missing is carried as absent and judged at render time.
pub fn service_record(service: Service) -> Option<ServiceRecord> {
    let (Some(id), Some(spec)) = (service.id, service.spec) else {
        warn!("skipping a service the engine returned without id or spec");
        return None;
    };

    let task = spec.task_template.unwrap_or_default();
    let container = task.container_spec.unwrap_or_default();
    let resources = task.resources.unwrap_or_default();

    let replicas = spec
        .mode
        .and_then(|mode| mode.replicated)
        .and_then(|replicated| replicated.replicas)
        .map(|count| count as u64);

    let ports = service
        .endpoint
        .and_then(|endpoint| endpoint.spec)
        .and_then(|endpoint_spec| endpoint_spec.ports)
        .unwrap_or_default()
        .into_iter()
        .map(|port| PortSpec {
            published: port.published_port.unwrap_or(0) as u32,
            target: port.target_port.unwrap_or(0) as u32,
        })
        .collect();

    Some(ServiceRecord {
        id,
        name: spec.name.unwrap_or_default(),
        labels: to_btree(spec.labels),
        image: container.image.unwrap_or_default(),
        replicas,
        restart_policy: task.restart_policy.map(|policy| RestartPolicy {
            condition: policy.condition.map(|c| c.to_string()).unwrap_or_default(),
            delay_ns: policy.delay,
            max_attempts: policy.max_attempts.map(|attempts| attempts as u64),
            window_ns: policy.window,
        }),
        update_config: spec.update_config.map(update_config),
        rollback_config: spec.rollback_config.map(rollback_config),
        constraints: task
            .placement
            .and_then(|placement| placement.constraints)
            .unwrap_or_default(),
        limits: resources.limits.map(|limit| ResourceSpec {
            nano_cpus: limit.nano_cpus.unwrap_or(0),
            memory_bytes: limit.memory_bytes.unwrap_or(0),
        }),
        reservations: resources.reservations.map(|reservation| ResourceSpec {
            nano_cpus: reservation.nano_cpus.unwrap_or(0),
            memory_bytes: reservation.memory_bytes.unwrap_or(0),
        }),
        ports,
        task_networks: attachments(task.networks),
        service_networks: attachments(spec.networks),
        container_labels: to_btree(container.labels),
        mounts: container.mounts.unwrap_or_default().into_iter().map(mount_spec).collect(),
        env: container.env.unwrap_or_default(),
        log_driver: task.log_driver.map(|driver| LogDriver {
            name: driver.name.filter(|name| !name.is_empty()),
            options: to_btree(driver.options),
        }),
    })
}

/// Project one wire-level network into a `NetworkRecord`.
pub fn network_record(network: Network) -> Option<NetworkRecord> {
    let Some(id) = network.id else {
        warn!("skipping a network the engine returned without an id");
        return None;
    };

    Some(NetworkRecord {
        id,
        name: network.name.unwrap_or_default(),
        driver: network.driver.unwrap_or_default(),
        options: to_btree(network.options),
        labels: to_btree(network.labels),
    })
}

fn update_config(config: ServiceSpecUpdateConfig) -> UpdateConfig {
    UpdateConfig {
        parallelism: config.parallelism.map(|p| p as u64),
        delay_ns: config.delay,
        failure_action: config
            .failure_action
            .map(|action| action.to_string())
            .filter(|action| !action.is_empty()),
        monitor_ns: config.monitor,
        max_failure_ratio: config.max_failure_ratio,
    }
}

fn rollback_config(config: ServiceSpecRollbackConfig) -> UpdateConfig {
    UpdateConfig {
        parallelism: config.parallelism.map(|p| p as u64),
        delay_ns: config.delay,
        failure_action: config
            .failure_action
            .map(|action| action.to_string())
            .filter(|action| !action.is_empty()),
        monitor_ns: config.monitor,
        max_failure_ratio: config.max_failure_ratio,
    }
}

fn attachments(networks: Option<Vec<NetworkAttachmentConfig>>) -> Vec<NetworkAttachment> {
    networks
        .unwrap_or_default()
        .into_iter()
        .filter_map(|attachment| {
            attachment.target.map(|target| NetworkAttachment {
                target,
                aliases: attachment.aliases.unwrap_or_default(),
            })
        })
        .collect()
}

fn mount_spec(mount: Mount) -> MountSpec {
    MountSpec {
        source: mount.source.unwrap_or_default(),
        target: mount.target.unwrap_or_default(),
    }
}

fn to_btree(map: Option<std::collections::HashMap<String, String>>) -> BTreeMap<String, String> {
    map.unwrap_or_default().into_iter().collect()
}
