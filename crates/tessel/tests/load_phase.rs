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

mod common;

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use tessel::config::DashboardConfig;
use tessel::error::DataError;
use tessel::palette::Palette;
use tessel::{load_dashboard, load_dashboard_blocking, DashboardError, Strategy};

fn write_fixture(dir: &Path, config: &DashboardConfig) {
    fs::write(dir.join(&config.topology_file), common::TOPOLOGY).unwrap();
    fs::write(dir.join(&config.metadata_file), common::METADATA).unwrap();
    for (name, content) in common::datasets() {
        fs::write(dir.join(name), content).unwrap();
    }
}

fn fixture_config(dir: &TempDir) -> DashboardConfig {
    DashboardConfig {
        data_dir: dir.path().to_path_buf(),
        ..common::config()
    }
}

#[tokio::test]
async fn test_load_dashboard_from_directory() {
    let dir = TempDir::new().unwrap();
    let config = fixture_config(&dir);
    write_fixture(dir.path(), &config);

    let ctx = load_dashboard(config, Palette::standard().unwrap()).await.unwrap();
    assert_eq!(ctx.areas.len(), 3);
    assert_eq!(ctx.registry.len(), 4);
    assert_eq!(ctx.areas.get("E2").unwrap().value(common::NORMALIZING, "households"), Some("6"));
    assert!(ctx.areas.get("E3").unwrap().row(common::PLACES).is_none());
    assert!(ctx.scales.get("none", "blank").is_some());
}

#[tokio::test]
async fn test_missing_dataset_file_fails_load() {
    let dir = TempDir::new().unwrap();
    let config = fixture_config(&dir);
    write_fixture(dir.path(), &config);
    fs::remove_file(dir.path().join(common::ACORN)).unwrap();

    let err = load_dashboard(config, Palette::standard().unwrap()).await.unwrap_err();
    assert!(matches!(err, DashboardError::Data(DataError::FileRead { .. })));
}

#[tokio::test]
async fn test_yaml_config_drives_load() {
    let dir = TempDir::new().unwrap();
    let yaml = format!(
        "data_dir: {}\ndatasets:\n  - \"{}\"\n  - \"{}\"\nopacity:\n  high: 0.9\n  low: 0.2\n",
        dir.path().display(),
        common::PTAL,
        common::NORMALIZING,
    );
    let config_path = dir.path().join("dashboard.yml");
    fs::write(&config_path, yaml).unwrap();
    let config = DashboardConfig::from_yaml_file(&config_path).unwrap();
    assert_eq!(config.opacity.high, 0.9);
    assert_eq!(config.join.csv_key, "OA");
    write_fixture(dir.path(), &config);

    let ctx = load_dashboard(config, Palette::standard().unwrap()).await.unwrap();
    assert!(ctx.areas.get("E1").unwrap().row(common::PTAL).is_some());
    assert!(ctx.areas.get("E1").unwrap().row(common::PLACES).is_none());
    assert_eq!(ctx.opacity(), 0.9);
}

#[test]
fn test_blocking_load_and_histogram_dispatch() {
    let dir = TempDir::new().unwrap();
    let config = fixture_config(&dir);
    write_fixture(dir.path(), &config);

    let ctx = load_dashboard_blocking(config, Palette::standard().unwrap()).unwrap();
    let invocation = tessel::Dispatcher::standard()
        .unwrap()
        .select_visualization(&ctx.scales, common::NORMALIZING, "OA_area_meters", false)
        .unwrap();
    assert_eq!(
        invocation.strategy,
        Strategy::NumericHistogram {
            column: "OA_area_meters".into()
        }
    );
    let chart = tessel::render(&ctx, &invocation).unwrap();
    assert_eq!(chart.total.as_deref(), Some("60.000"));
}

#[test]
fn test_invalid_config_is_rejected_before_reading() {
    let config = DashboardConfig {
        datasets: Vec::new(),
        ..Default::default()
    };
    let err = load_dashboard_blocking(config, Palette::standard().unwrap()).unwrap_err();
    assert!(matches!(err, DashboardError::Config(_)));
}
