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

use crate::area::NumericPolicy;
use crate::error::ConfigError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_DATASETS: [&str; 29] = [
    "[OA]_Normalizing_properties.csv",
    "[Residents]_Acorn_directory.csv",
    "[Residents]_age_and_gender_distribution.csv",
    "[Residents]_spending_categories.csv",
    "[Residents]_disposable_income_spending_categories.csv",
    "[Residents]_income.csv",
    "[OA]_PTAL_directory.csv",
    "[OA]_Street_value_directory.csv",
    "[Residents]_wellbeing_directory.csv",
    "[Places]_counts.csv",
    "[Places]_counts_normalized_by_OA_effective_area.csv",
    "[Places]_counts_normalized_by_household_per_meter.csv",
    "[Places]_counts_normalized_by_household_per_meter_bound.csv",
    "[POC_Demographic_distribution]_granular.csv",
    "[POC_Demographic_distribution]_granular_normalized.csv",
    "[POC_Demographic_distribution]_granular_normalized_relevance.csv",
    "[Demographic_distribution]_granular_OA_scope.csv",
    "[Demographic_distribution]_granular_borough_scope.csv",
    "[Demographic_distribution]_supertypes_OA_scope.csv",
    "[Demographic_distribution]_supertypes_borough_scope.csv",
    "[Demographic_distribution]_supertypes_attractors_OA_scope.csv",
    "[Demographic_distribution]_supertypes_attractors_borough_scope.csv",
    "[Demographic_distribution]_supertypes_discriminant_OA_scope.csv",
    "[Demographic_distribution]_supertypes_discriminant_borough_scope.csv",
    "[Population]_total_over_24_hour.csv",
    "[Supply_demand]_example.csv",
    "community_engagement.csv",
    "green_groups.csv",
    "remaining.csv",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_dir: PathBuf,
    pub topology_file: String,
    pub metadata_file: String,
    pub datasets: Vec<String>,
    pub join: JoinConfig,
    pub map: MapConfig,
    pub opacity: OpacityConfig,
    pub numeric_policy: NumericPolicy,
}
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JoinConfig {
    /// Join column in every dataset CSV.
    pub csv_key: String,
    /// Feature property in the boundary file.
    pub boundary_key: String,
}
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub center_lat: f64,
    pub center_lng: f64,
    pub initial_zoom: f64,
    pub optimal_zoom: f64,
    pub lat_padding: f64,
    pub lng_padding: f64,
}
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpacityConfig {
    pub high: f64,
    pub low: f64,
}
impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            topology_file: "OAs_topojson_wgs84.json".to_string(),
            metadata_file: "output_data_metadata.json".to_string(),
            datasets: DEFAULT_DATASETS.iter().map(|d| d.to_string()).collect(),
            join: JoinConfig::default(),
            map: MapConfig::default(),
            opacity: OpacityConfig::default(),
            numeric_policy: NumericPolicy::default(),
        }
    }
}
impl Default for JoinConfig {
    fn default() -> Self {
        Self {
            csv_key: "OA".to_string(),
            boundary_key: "geo_code".to_string(),
        }
    }
}
impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center_lat: 51.511,
            center_lng: -0.16337,
            initial_zoom: 13.0,
            optimal_zoom: 13.7,
            lat_padding: 0.04,
            lng_padding: 0.09,
        }
    }
}
impl Default for OpacityConfig {
    fn default() -> Self {
        Self {
            high: 0.80,
            low: 0.30,
        }
    }
}
impl DashboardConfig {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!(
                "Failed to read dashboard config file: {}",
                path.as_ref().display()
            )
        })?;
        Self::from_yaml_str(&content)
    }
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: DashboardConfig =
            serde_yaml::from_str(content).context("Failed to parse dashboard config YAML")?;
        config.validate()?;
        Ok(config)
    }
    /// Same settings with a strict numeric policy.
    pub fn strict() -> Self {
        Self {
            numeric_policy: NumericPolicy::Strict,
            ..Default::default()
        }
    }
    pub fn topology_path(&self) -> PathBuf {
        self.data_dir.join(&self.topology_file)
    }
    pub fn metadata_path(&self) -> PathBuf {
        self.data_dir.join(&self.metadata_file)
    }
    pub fn dataset_path(&self, dataset: &str) -> PathBuf {
        self.data_dir.join(dataset)
    }
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.datasets.is_empty() {
            return Err(ConfigError::MissingRequiredConfig {
                field: "datasets".to_string(),
            });
        }
        for (field, value) in [("opacity.high", self.opacity.high), ("opacity.low", self.opacity.low)] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: format!("{value} is outside (0, 1]"),
                });
            }
        }
        if self.map.initial_zoom > self.map.optimal_zoom {
            return Err(ConfigError::InvalidValue {
                field: "map.initial_zoom".to_string(),
                reason: "initial zoom must not exceed the optimal zoom".to_string(),
            });
        }
        if self.join.csv_key.is_empty() || self.join.boundary_key.is_empty() {
            return Err(ConfigError::MissingRequiredConfig {
                field: "join".to_string(),
            });
        }
        Ok(())
    }
}
