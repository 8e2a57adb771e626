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

use thiserror::Error;
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
    #[error("Data error: {0}")]
    Data(#[from] DataError),
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Failed to parse dataset metadata: {source}")]
    MetadataParse {
        #[from]
        source: serde_json::Error,
    },
    #[error("Dataset '{name}' is not registered")]
    UnknownDataset { name: String },
    #[error("Column '{column}' is not registered for dataset '{dataset}'")]
    UnknownColumn { dataset: String, column: String },
    #[error("Column '{column}' appears more than once in dataset '{dataset}'")]
    DuplicateColumn { dataset: String, column: String },
    #[error("Invalid practical type for column '{column}': {details}")]
    InvalidPracticalType { column: String, details: String },
    #[error("Scale for '{dataset}' / '{column}' has an empty domain")]
    EmptyDomain { dataset: String, column: String },
    #[error("Continuous column '{column}' in dataset '{dataset}' has no min/max bounds")]
    MissingBounds { dataset: String, column: String },
}
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Failed to read data file '{path}': {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse CSV dataset '{dataset}': {source}")]
    Csv {
        dataset: String,
        #[source]
        source: csv::Error,
    },
    #[error("Failed to parse boundary file: {source}")]
    BoundaryParse {
        #[from]
        source: serde_json::Error,
    },
    #[error("Boundary file has no features or geometries")]
    EmptyBoundary,
    #[error("Dataset '{dataset}' has no join column '{key}'")]
    MissingJoinKey { dataset: String, key: String },
    #[error("Value '{value}' in column '{column}' is not numeric")]
    NonNumeric { column: String, value: String },
    #[error("Dataset '{dataset}' contains no rows")]
    EmptyDataset { dataset: String },
}
#[derive(Error, Debug, Clone)]
pub enum DispatchError {
    #[error("No scale registered for '{dataset}' / '{column}': registry and dispatcher are out of sync")]
    MissingScale { dataset: String, column: String },
    #[error("Dispatch rule '{rule}' has an invalid pattern: {source}")]
    InvalidRulePattern {
        rule: String,
        #[source]
        source: regex::Error,
    },
    #[error("Strategy '{strategy}' needs a selected area")]
    NoAreaSelected { strategy: String },
    #[error("Area '{key}' is not in the area index")]
    UnknownArea { key: String },
}
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Frequency cell '{column}' is malformed: {reason}")]
    MalformedFrequencyCell { column: String, reason: String },
    #[error("Chart surface rejected the chart: {reason}")]
    Surface { reason: String },
    #[error("Map surface rejected the update: {reason}")]
    MapSurface { reason: String },
}
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse YAML configuration: {source}")]
    YamlParse {
        #[from]
        source: serde_yaml::Error,
    },
    #[error("Failed to read configuration file '{path}': {source}")]
    ConfigFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("Missing required configuration: {field}")]
    MissingRequiredConfig { field: String },
}
pub type Result<T> = std::result::Result<T, DashboardError>;
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
pub type DataResult<T> = std::result::Result<T, DataError>;
