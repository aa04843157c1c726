//! `recompose ls` command: list stacks discovered in the snapshot.

use crate::SnapshotArgs;
use anyhow::Result;
use recompose_core::StackIndex;
use std::collections::HashSet;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct StackRow {
    #[tabled(rename = "STACK")]
    name: String,
    #[tabled(rename = "SERVICES")]
    services: usize,
    #[tabled(rename = "NETWORKS")]
    networks: usize,
}

pub async fn run(snapshot_args: &SnapshotArgs) -> Result<()> {
    let snapshot = super::load_snapshot(snapshot_args).await?;
    let index = StackIndex::build(snapshot.services);

    if index.stacks.is_empty() {
        println!("No stacks found");
        return Ok(());
    }

    let rows: Vec<StackRow> = index
        .stacks
        .iter()
        .map(|(name, members)| {
            let networks: HashSet<&str> = members
                .iter()
                .filter_map(|id| index.services.get(id))
                .flat_map(|svc| {
                    let attachments = if svc.task_networks.is_empty() {
                        &svc.service_networks
                    } else {
                        &svc.task_networks
                    };
                    attachments.iter().map(|attachment| attachment.target.as_str())
                })
                .collect();

            StackRow { name: name.clone(), services: members.len(), networks: networks.len() }
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);

    Ok(())
}
