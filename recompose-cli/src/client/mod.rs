//! Cluster snapshot acquisition.
//!
//! The translation engine never fetches anything itself; this module owns the
//! engine API calls and file loading that produce the point-in-time snapshot
//! a run operates on.

pub mod convert;

use anyhow::{Context, Result};
use bollard::network::ListNetworksOptions;
use bollard::service::ListServicesOptions;
use bollard::Docker;
use recompose_core::{NetworkRecord, ServiceRecord};
use std::collections::HashMap;
use std::path::Path;

/// Point-in-time view of the cluster's services and networks.
#[derive(Debug)]
pub struct Snapshot {
    pub services: Vec<ServiceRecord>,
    pub networks: HashMap<String, NetworkRecord>,
}

/// Snapshot a live engine endpoint.
///
/// Honors the usual engine environment (`DOCKER_HOST` and friends); any
/// failure here is fatal to the run.
pub async fn from_engine() -> Result<Snapshot> {
    let docker =
        Docker::connect_with_defaults().context("failed to connect to the container engine")?;

    let services = docker
        .list_services(None::<ListServicesOptions<String>>)
        .await
        .context("failed to list services")?;
    let networks = docker
        .list_networks(None::<ListNetworksOptions<String>>)
        .await
        .context("failed to list networks")?;

    Ok(Snapshot {
        services: services.into_iter().filter_map(convert::service_record).collect(),
        networks: networks
            .into_iter()
            .filter_map(convert::network_record)
            .map(|network| (network.id.clone(), network))
            .collect(),
    })
}

/// Load a snapshot from JSON files: one service array, one network array.
pub fn from_files(services_path: &Path, networks_path: &Path) -> Result<Snapshot> {
    let services: Vec<ServiceRecord> = read_json(services_path)?;
    let networks: Vec<NetworkRecord> = read_json(networks_path)?;

    Ok(Snapshot {
        services,
        networks: networks.into_iter().map(|network| (network.id.clone(), network)).collect(),
    })
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse snapshot file {}", path.display()))
}
