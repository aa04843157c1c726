//! Service entry rendering.
//!
//! Translates one observed service record into the deploy-schema shape of a
//! compose service entry, filling the defaults the orchestrator omits when a
//! field was never set and suppressing sub-fields that carry no value.

use super::RenderOptions;
use crate::error::{RecomposeError, Result};
use crate::networks::classify;
use crate::types::{LogDriver, NetworkRecord, ResourceSpec, ServiceRecord, UpdateConfig};
use std::collections::HashMap;
use tracing::instrument;

/// Structured, ready-to-serialize form of one compose service entry.
///
/// Every field already carries its rendered value; `render` only lays the
/// text out. Network entries keep the id alongside the display name so the
/// document assembler can account for which networks the stack touches.
#[derive(Debug, Clone)]
pub struct ServiceBlock {
    /// Service key in the `services:` mapping
    pub key: String,
    pub image: String,
    pub replicas: u64,
    pub restart_policy: Option<RestartPolicyBlock>,
    pub update_config: Option<CadenceBlock>,
    pub rollback_config: Option<CadenceBlock>,
    pub constraints: Vec<String>,
    pub limits: Option<ResourceLines>,
    pub reservations: Option<ResourceLines>,
    /// Deploy-level labels, already `key=value` with trimmed parts
    pub deploy_labels: Vec<String>,
    /// Already `published:target`
    pub ports: Vec<String>,
    /// `(network id, display name)` in attachment order
    pub networks: Vec<(String, String)>,
    /// Container-level labels, `key=value` untrimmed
    pub container_labels: Vec<String>,
    /// Already `source:target`
    pub mounts: Vec<String>,
    /// Raw KEY=VALUE entries
    pub env: Vec<String>,
    pub logging: Option<LoggingBlock>,
}

/// Restart policy with the schema defaults already applied.
#[derive(Debug, Clone)]
pub struct RestartPolicyBlock {
    pub condition: String,
    pub delay: String,
    pub max_attempts: u64,
    pub window: String,
}

/// Update or rollback cadence with zero-valued fields suppressed.
#[derive(Debug, Clone, Default)]
pub struct CadenceBlock {
    pub parallelism: Option<u64>,
    pub delay: Option<String>,
    pub failure_action: Option<String>,
    pub monitor: Option<String>,
    pub max_failure_ratio: Option<f64>,
}

impl CadenceBlock {
    fn from_config(config: &UpdateConfig) -> Self {
        Self {
            parallelism: config.parallelism.filter(|&p| p != 0),
            delay: config.delay_ns.filter(|&d| d != 0).map(humanize_ns),
            failure_action: config.failure_action.clone().filter(|a| !a.is_empty()),
            monitor: config.monitor_ns.filter(|&m| m != 0).map(humanize_ns),
            max_failure_ratio: config.max_failure_ratio.filter(|&r| r != 0.0),
        }
    }
}

/// Rendered cpu/memory pair for one side of the resource block.
#[derive(Debug, Clone)]
pub struct ResourceLines {
    /// Fractional cores at two decimals (e.g. "1.50")
    pub cpus: String,
    /// Whole megabytes with suffix (e.g. "100M")
    pub memory: String,
}

impl From<ResourceSpec> for ResourceLines {
    fn from(spec: ResourceSpec) -> Self {
        Self {
            cpus: format!("{:.2}", spec.nano_cpus as f64 / 1_000_000_000.0),
            memory: format!("{:.0}M", spec.memory_bytes as f64 / 1_048_576.0),
        }
    }
}

/// Log driver block; which lines render depends on what the record carries.
#[derive(Debug, Clone)]
pub struct LoggingBlock {
    pub driver: Option<String>,
    pub options: Vec<(String, String)>,
}

/// Translate one service record into its compose service entry.
///
/// The service key prefers the first alias of the first service-level network
/// attachment over the service's own name. Task-level network attachments win
/// over service-level ones when rendering the `networks:` list; dangling
/// references are dropped from it.
#[instrument(skip(svc, networks, options), fields(service = %svc.name))]
pub fn format_service(
    svc: &ServiceRecord,
    stack: &str,
    networks: &HashMap<String, NetworkRecord>,
    options: &RenderOptions,
) -> Result<ServiceBlock> {
    if svc.image.is_empty() {
        return Err(RecomposeError::MissingRequiredField {
            stack: stack.to_string(),
            service: svc.id.clone(),
            field: "image",
        });
    }
    let replicas = svc.replicas.ok_or_else(|| RecomposeError::MissingRequiredField {
        stack: stack.to_string(),
        service: svc.id.clone(),
        field: "replicas",
    })?;

    let key = svc
        .service_networks
        .first()
        .and_then(|attachment| attachment.aliases.first())
        .cloned()
        .unwrap_or_else(|| svc.name.clone());

    let attachments =
        if svc.task_networks.is_empty() { &svc.service_networks } else { &svc.task_networks };
    let mut rendered_networks = Vec::new();
    for attachment in attachments {
        let class = classify(&attachment.target, stack, networks, options.strip_prefix);
        if class.display_name.is_empty() {
            continue;
        }
        rendered_networks.push((attachment.target.clone(), class.display_name));
    }

    Ok(ServiceBlock {
        key,
        image: svc.image.clone(),
        replicas,
        restart_policy: svc.restart_policy.as_ref().map(|policy| RestartPolicyBlock {
            condition: policy.condition.clone(),
            delay: policy.delay_ns.map(humanize_ns).unwrap_or_else(|| "3s".to_string()),
            max_attempts: policy.max_attempts.unwrap_or(0),
            window: policy.window_ns.map(humanize_ns).unwrap_or_else(|| "0s".to_string()),
        }),
        update_config: svc.update_config.as_ref().map(CadenceBlock::from_config),
        rollback_config: svc.rollback_config.as_ref().map(CadenceBlock::from_config),
        constraints: svc.constraints.clone(),
        limits: svc.limits.map(ResourceLines::from),
        reservations: svc.reservations.map(ResourceLines::from),
        deploy_labels: svc
            .labels
            .iter()
            .map(|(key, value)| format!("{}={}", key.trim(), value.trim()))
            .collect(),
        ports: svc.ports.iter().map(|p| format!("{}:{}", p.published, p.target)).collect(),
        networks: rendered_networks,
        container_labels: svc
            .container_labels
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect(),
        mounts: svc.mounts.iter().map(|m| format!("{}:{}", m.source, m.target)).collect(),
        env: svc.env.clone(),
        logging: svc.log_driver.as_ref().and_then(logging_block),
    })
}

fn logging_block(driver: &LogDriver) -> Option<LoggingBlock> {
    let name = driver.name.clone().filter(|n| !n.is_empty());
    if name.is_none() && driver.options.is_empty() {
        return None;
    }
    Some(LoggingBlock {
        driver: name,
        options: driver.options.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
    })
}

impl ServiceBlock {
    /// Serialize this entry under the `services:` section.
    ///
    /// List sections render only when non-empty; optional blocks render only
    /// when the source carried them.
    pub fn render(&self, out: &mut String) {
        out.push_str(&format!("  {}:\n", self.key));
        out.push_str(&format!("    image: {}\n", self.image));
        out.push_str("    deploy:\n");
        out.push_str(&format!("      replicas: {}\n", self.replicas));

        if let Some(policy) = &self.restart_policy {
            out.push_str("      restart_policy:\n");
            out.push_str(&format!("        condition: {}\n", policy.condition));
            out.push_str(&format!("        delay: {}\n", policy.delay));
            out.push_str(&format!("        max_attempts: {}\n", policy.max_attempts));
            out.push_str(&format!("        window: {}\n", policy.window));
        }

        if let Some(cadence) = &self.update_config {
            out.push_str("      update_config:\n");
            cadence.render(out);
        }
        if let Some(cadence) = &self.rollback_config {
            out.push_str("      rollback_config:\n");
            cadence.render(out);
        }

        if !self.constraints.is_empty() {
            out.push_str("      placement:\n");
            out.push_str("        constraints:\n");
            // The first element completes the marker opened here; the rest
            // bring their own. Downstream consumers parse this list
            // positionally, so the layout is contractual.
            out.push_str("          - ");
            for (position, constraint) in self.constraints.iter().enumerate() {
                if position == 0 {
                    out.push_str(&format!("{}\n", constraint));
                } else {
                    out.push_str(&format!("          - {}\n", constraint));
                }
            }
        }

        if self.limits.is_some() || self.reservations.is_some() {
            out.push_str("      resources:\n");
            if let Some(limits) = &self.limits {
                out.push_str("        limits:\n");
                limits.render(out);
            }
            if let Some(reservations) = &self.reservations {
                out.push_str("        reservations:\n");
                reservations.render(out);
            }
        }

        render_label_list(out, 6, &self.deploy_labels);

        if !self.ports.is_empty() {
            out.push_str("    ports:\n");
            for port in &self.ports {
                out.push_str(&format!("      - \"{}\"\n", port));
            }
        }

        if !self.networks.is_empty() {
            out.push_str("    networks:\n");
            for (_, display_name) in &self.networks {
                out.push_str(&format!("      - {}\n", display_name));
            }
        }

        render_label_list(out, 4, &self.container_labels);

        if !self.mounts.is_empty() {
            out.push_str("    volumes:\n");
            for mount in &self.mounts {
                out.push_str(&format!("      - {}\n", mount));
            }
        }

        if !self.env.is_empty() {
            out.push_str("    environment:\n");
            for entry in &self.env {
                out.push_str(&format!("      - {}\n", entry));
            }
        }

        if let Some(logging) = &self.logging {
            logging.render(out);
        }

        out.push('\n');
    }
}

impl CadenceBlock {
    fn render(&self, out: &mut String) {
        if let Some(parallelism) = self.parallelism {
            out.push_str(&format!("        parallelism: {}\n", parallelism));
        }
        if let Some(delay) = &self.delay {
            out.push_str(&format!("        delay: {}\n", delay));
        }
        if let Some(action) = &self.failure_action {
            out.push_str(&format!("        failure_action: {}\n", action));
        }
        if let Some(monitor) = &self.monitor {
            out.push_str(&format!("        monitor: {}\n", monitor));
        }
        if let Some(ratio) = self.max_failure_ratio {
            out.push_str(&format!("        max_failure_ratio: {}\n", ratio));
        }
    }
}

impl ResourceLines {
    fn render(&self, out: &mut String) {
        out.push_str(&format!("          cpus: '{}'\n", self.cpus));
        out.push_str(&format!("          memory: {}\n", self.memory));
    }
}

impl LoggingBlock {
    fn render(&self, out: &mut String) {
        out.push_str("    logging:\n");
        match (&self.driver, self.options.is_empty()) {
            // Options without a driver name: emit them unquoted.
            (None, false) => {
                out.push_str("      options:\n");
                for (key, value) in &self.options {
                    out.push_str(&format!("        {}: {}\n", key, value));
                }
            }
            // Driver and options: option values are quoted.
            (Some(driver), false) => {
                out.push_str(&format!("      driver: {}\n", driver));
                out.push_str("      options:\n");
                for (key, value) in &self.options {
                    out.push_str(&format!("        {}: \"{}\"\n", key, value));
                }
            }
            (Some(driver), true) => {
                out.push_str(&format!("      driver: {}\n", driver));
            }
            // Unreachable through format_service; a bare block renders empty.
            (None, true) => {}
        }
    }
}

fn render_label_list(out: &mut String, indent: usize, labels: &[String]) {
    if labels.is_empty() {
        return;
    }
    let spacer = " ".repeat(indent);
    out.push_str(&format!("{}labels:\n", spacer));
    for label in labels {
        out.push_str(&format!("{}  - {}\n", spacer, label));
    }
}

/// Render a nanosecond duration the way the scheduler reports it: whole
/// hours, minutes and seconds, with a millisecond component for any
/// sub-second remainder.
fn humanize_ns(ns: i64) -> String {
    if ns <= 0 {
        return "0s".to_string();
    }
    let total_ms = ns / 1_000_000;
    let hours = total_ms / 3_600_000;
    let minutes = total_ms % 3_600_000 / 60_000;
    let seconds = total_ms % 60_000 / 1000;
    let millis = total_ms % 1000;

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{}h", hours));
    }
    if minutes > 0 {
        out.push_str(&format!("{}m", minutes));
    }
    if seconds > 0 {
        out.push_str(&format!("{}s", seconds));
    }
    if millis > 0 {
        out.push_str(&format!("{}ms", millis));
    }
    if out.is_empty() {
        out.push_str("0s");
    }
    out
}
