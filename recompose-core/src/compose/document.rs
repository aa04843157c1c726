//! Document assembly: one compose document per stack.
//!
//! A single linear pass: header, each member service through the service
//! formatter, then the trailing network block for every network the stack's
//! services touched.

use super::service::format_service;
use super::RenderOptions;
use crate::error::Result;
use crate::networks::classify;
use crate::stacks::StackIndex;
use crate::types::{NetworkRecord, ACCESS_CONTROL_LABEL};
use std::collections::HashMap;
use tracing::instrument;

/// Schema version literal emitted in every document header.
pub const COMPOSE_VERSION: &str = "3.3";

/// Networks touched while rendering one document, in first-use order.
/// Lives exactly as long as one stack's document.
#[derive(Debug, Default)]
struct NetworkUsage {
    entries: Vec<(String, String)>,
}

impl NetworkUsage {
    fn record(&mut self, id: &str, display_name: &str) {
        if !self.entries.iter().any(|(known, _)| known == id) {
            self.entries.push((id.to_string(), display_name.to_string()));
        }
    }
}

/// Render the complete compose document for one stack.
#[instrument(skip(index, networks, options))]
pub fn render_stack(
    stack: &str,
    index: &StackIndex,
    networks: &HashMap<String, NetworkRecord>,
    options: &RenderOptions,
) -> Result<String> {
    let mut out = String::new();
    let mut usage = NetworkUsage::default();

    out.push_str(&format!("version: '{}'\n\n", COMPOSE_VERSION));
    out.push_str("services:\n");

    for id in index.members(stack) {
        if let Some(svc) = index.services.get(id) {
            let block = format_service(svc, stack, networks, options)?;
            for (network_id, display_name) in &block.networks {
                usage.record(network_id, display_name);
            }
            block.render(&mut out);
        }
    }

    if !usage.entries.is_empty() {
        out.push_str("networks:\n");
        for (network_id, display_name) in &usage.entries {
            let class = classify(network_id, stack, networks, options.strip_prefix);
            match networks.get(network_id) {
                Some(network) if class.managed => {
                    render_managed_network(&mut out, display_name, network, options);
                }
                _ => {
                    out.push_str(&format!("  {}:\n    external: true\n", display_name));
                }
            }
        }
    }

    Ok(out)
}

/// Emit the creation detail for a network the stack owns: driver, filtered
/// driver options and the access-control label.
fn render_managed_network(
    out: &mut String,
    display_name: &str,
    network: &NetworkRecord,
    options: &RenderOptions,
) {
    out.push_str(&format!("  {}:\n", display_name));
    out.push_str(&format!("    driver: {}\n", network.driver));

    // vxlanid_list is allocation state, not configuration; it never survives
    // the round trip.
    let mut driver_opts: Vec<(&str, &str)> = network
        .options
        .iter()
        .filter(|(key, _)| key.as_str() != "vxlanid_list")
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect();
    if options.force_encrypted && !network.options.contains_key("encrypted") {
        driver_opts.push(("encrypted", ""));
    }

    if !driver_opts.is_empty() {
        out.push_str("    driver_opts:\n");
        for (key, value) in driver_opts {
            if value.is_empty() {
                out.push_str(&format!("      {}: \"\"\n", key));
            } else {
                out.push_str(&format!("      {}: {}\n", key, value));
            }
        }
    }

    if let Some(access) = network.access_label() {
        out.push_str("    labels:\n");
        out.push_str(&format!("      - {} = {}\n", ACCESS_CONTROL_LABEL, access));
    }
}
