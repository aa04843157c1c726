//! CLI command implementations

pub mod export;
pub mod ls;

use crate::client::{self, Snapshot};
use crate::SnapshotArgs;
use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Resolve the snapshot source: files when both paths are given, otherwise
/// the live engine endpoint. Enumerating a busy cluster can take a moment, so
/// the live path gets a spinner (drawn on stderr, stdout stays clean).
pub(crate) async fn load_snapshot(args: &SnapshotArgs) -> Result<Snapshot> {
    if let (Some(services), Some(networks)) = (&args.services_json, &args.networks_json) {
        return client::from_files(services, networks);
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    spinner.set_message("Snapshotting services and networks...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let snapshot = client::from_engine().await;

    spinner.finish_and_clear();
    snapshot
}
