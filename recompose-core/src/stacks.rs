//! Stack grouping and selection.
//!
//! Stacks are derived, never persisted: every run rebuilds the grouping from
//! the current service snapshot and throws it away afterwards.

use crate::error::{RecomposeError, Result};
use crate::types::ServiceRecord;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, instrument};

/// Stack membership plus the id-indexed service snapshot, built once per run.
#[derive(Debug, Default)]
pub struct StackIndex {
    /// Stack name -> member service ids, in snapshot order
    pub stacks: BTreeMap<String, Vec<String>>,

    /// Every service by id, including services that belong to no stack
    pub services: HashMap<String, ServiceRecord>,
}

impl StackIndex {
    /// Partition a service snapshot into named stacks.
    ///
    /// A service without the grouping label joins no stack but stays
    /// reachable through the id index. Member order within a stack follows
    /// snapshot order; stable for one run, nothing more.
    #[instrument(skip(services))]
    pub fn build(services: Vec<ServiceRecord>) -> Self {
        let mut index = StackIndex::default();

        for service in services {
            if let Some(stack) = service.stack() {
                index.stacks.entry(stack.to_string()).or_default().push(service.id.clone());
            }
            index.services.insert(service.id.clone(), service);
        }

        debug!(
            stacks = index.stacks.len(),
            services = index.services.len(),
            "grouped service snapshot"
        );
        index
    }

    /// Stack names matching the selector, `"*"` for all.
    ///
    /// Patterns are anchored to the whole stack name, so a selector equal to
    /// one exact name never picks up a sibling that shares a substring.
    pub fn select(&self, pattern: &str) -> Result<Vec<&str>> {
        if pattern == "*" {
            return Ok(self.stacks.keys().map(String::as_str).collect());
        }

        let anchored = format!("^(?:{})$", pattern);
        let re = Regex::new(&anchored).map_err(|e| RecomposeError::InvalidSelector {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        Ok(self.stacks.keys().map(String::as_str).filter(|name| re.is_match(name)).collect())
    }

    /// Member service ids of one stack, empty when unknown.
    pub fn members(&self, stack: &str) -> &[String] {
        self.stacks.get(stack).map(Vec::as_slice).unwrap_or(&[])
    }
}
