// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

use crate::area::{boundary_keys_from_json, AreaIndex, DatasetTable};
use crate::config::DashboardConfig;
use crate::context::DashboardContext;
use crate::error::{DataError, DataResult, Result};
use crate::palette::Palette;
use crate::registry::DatasetRegistry;
use futures::future::try_join_all;
use std::path::PathBuf;
use tracing::{info, warn};

async fn read_file(path: PathBuf) -> DataResult<String> {
    tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| DataError::FileRead {
            path: path.display().to_string(),
            source,
        })
}

async fn read_dataset(name: String, path: PathBuf) -> DataResult<(String, String)> {
    let content = read_file(path).await?;
    Ok((name, content))
}

/// Reads the boundary, metadata and every dataset file concurrently, then
/// builds the registry, area index and scales.
pub async fn load_dashboard(config: DashboardConfig, palette: Palette) -> Result<DashboardContext> {
    config.validate()?;
    let datasets = config
        .datasets
        .iter()
        .map(|d| read_dataset(d.clone(), config.dataset_path(d)));
    let (topology, metadata, contents) = tokio::try_join!(
        read_file(config.topology_path()),
        read_file(config.metadata_path()),
        try_join_all(datasets),
    )?;
    build_context(config, palette, &topology, &metadata, contents)
}

/// Synchronous second half of the load phase, split out for callers that already hold the file contents.
pub fn build_context(
    config: DashboardConfig,
    palette: Palette,
    topology: &str,
    metadata: &str,
    contents: Vec<(String, String)>,
) -> Result<DashboardContext> {
    let registry = DatasetRegistry::from_json_str(metadata)?;
    let keys = boundary_keys_from_json(topology, &config.join.boundary_key)?;
    let mut tables = contents
        .into_iter()
        .map(|(name, content)| {
            if !registry.contains(&name) {
                warn!(dataset = %name, "dataset is loaded but has no registry metadata");
            }
            DatasetTable::from_csv_str(&name, &content)
        })
        .collect::<DataResult<Vec<_>>>()?;
    for dataset in registry.datasets() {
        if !tables.iter().any(|t| t.name == dataset.name) {
            warn!(dataset = %dataset.name, "registered dataset was not loaded; areas get no row for it");
            tables.push(DatasetTable {
                name: dataset.name.clone(),
                headers: vec![config.join.csv_key.clone()],
                rows: Vec::new(),
            });
        }
    }
    let areas = AreaIndex::build(&keys, &tables, &config.join.csv_key)?;
    info!(
        datasets = registry.len(),
        tables = tables.len(),
        areas = areas.len(),
        "dashboard data loaded"
    );
    DashboardContext::new(config, palette, registry, areas)
}

/// Blocking convenience over [`load_dashboard`] for callers without a runtime.
pub fn load_dashboard_blocking(config: DashboardConfig, palette: Palette) -> Result<DashboardContext> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(load_dashboard(config, palette))
}
