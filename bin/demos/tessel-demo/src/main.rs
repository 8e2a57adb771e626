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

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Args, Command};
use indexmap::IndexMap;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tessel::profiler::{MetadataProfiler, ProfilingConfig};
use tessel::surface::{JsonChartSurface, NullMapSurface};
use tessel::{load_dashboard, Dashboard, DashboardConfig, DatasetTable, Dispatcher, Palette};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();
    let level = args.log_level.as_ref().map_or("warn", |l| l.as_str());
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();

    run(args.command).inspect_err(|e| error!("{e:#}"))
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Profile {
            csv,
            name,
            shared_scale,
            out,
        } => {
            if name.is_some() && csv.len() > 1 {
                anyhow::bail!("--name applies to a single --csv only");
            }
            profile(&csv, name.as_deref(), shared_scale, out.as_deref())
        }
        Command::Render {
            config,
            data_dir,
            dataset,
            column,
            area,
            log,
            pretty,
        } => {
            let mut config = match config {
                Some(path) => DashboardConfig::from_yaml_file(path)?,
                None => DashboardConfig::default(),
            };
            if let Some(dir) = data_dir {
                config.data_dir = dir;
            }
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(render(config, &dataset, &column, area.as_deref(), log, pretty))
        }
        Command::Rules => {
            for (i, rule) in Dispatcher::standard()?.rules().iter().enumerate() {
                println!(
                    "{:>2}  {:<28} {:<60} {}",
                    i + 1,
                    rule.name,
                    rule.dataset_pattern(),
                    rule.column_pattern()
                );
            }
            Ok(())
        }
    }
}

fn dataset_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("Not a file path: {}", path.display()))
}

fn profile(paths: &[PathBuf], name: Option<&str>, shared_scale: bool, out: Option<&Path>) -> Result<()> {
    let mut metadata = IndexMap::new();
    for path in paths {
        let name = match name {
            Some(n) => n.to_string(),
            None => dataset_name(path)?,
        };
        let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        let table = DatasetTable::from_reader(&name, file)?;
        let mut config = ProfilingConfig::default();
        if shared_scale {
            config = config.with_shared_scale_from(&table.headers);
        }
        let meta = MetadataProfiler::with_config(config).profile_table(&table)?;
        info!(dataset = %name, columns = meta.column_data.len(), "profiled dataset");
        metadata.insert(name, meta);
    }
    let encoded = serde_json::to_string_pretty(&metadata)?;
    match out {
        Some(path) => fs::write(path, encoded).with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{encoded}"),
    }
    Ok(())
}

async fn render(
    config: DashboardConfig,
    dataset: &str,
    column: &str,
    area: Option<&str>,
    log: bool,
    pretty: bool,
) -> Result<()> {
    let mut ctx = load_dashboard(config, Palette::standard()?).await?;
    ctx.registry.column_options(dataset)?;
    ctx.selection.select_dataset(dataset);
    if column != tessel::BLANK_COLUMN {
        ctx.registry.column(dataset, column)?;
        ctx.selection.select_column(column);
    }
    if let Some(key) = area {
        if !ctx.areas.contains(key) {
            anyhow::bail!("No area with key {key}");
        }
        ctx.selection.toggle_area(key);
    }
    ctx.display.log_scale = log;

    let stdout = io::stdout();
    let mut dashboard = Dashboard::new(ctx, JsonChartSurface::new(stdout.lock(), pretty), NullMapSurface)?;
    let invocation = dashboard.current_invocation()?;
    info!(rule = invocation.rule, strategy = invocation.strategy.name(), "rendering selection");
    dashboard.refresh()?;
    Ok(())
}
