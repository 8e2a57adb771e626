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

#![allow(dead_code)]

use tessel::config::DashboardConfig;
use tessel::palette::Palette;
use tessel::{build_context, DashboardContext};

pub const PTAL: &str = "[OA]_PTAL_directory.csv";
pub const NORMALIZING: &str = "[OA]_Normalizing_properties.csv";
pub const PLACES: &str = "[Places]_counts.csv";
pub const ACORN: &str = "[Residents]_Acorn_directory.csv";

pub const METADATA: &str = r#"{
    "[OA]_PTAL_directory.csv": {"column_data": [
        {"name": "Public_Transport_Accessibility_Level", "type_registered": "object",
         "type_practical": ["PTAL", "default"], "range": ["1a", "6b"], "min": null, "max": null}
    ]},
    "[OA]_Normalizing_properties.csv": {"column_data": [
        {"name": "OA_area_meters", "type_registered": "float64", "type_practical": "number_float",
         "range": null, "min": 10.0, "max": 30.0},
        {"name": "households", "type_registered": "int64", "type_practical": "number_int",
         "range": [4, 5, 6], "min": 4, "max": 6}
    ]},
    "[Places]_counts.csv": {"column_data": [
        {"name": "bar", "type_practical": "number_int", "range": [0, 2], "min": 0, "max": 2},
        {"name": "cafe", "type_practical": "number_int", "range": [1, 3], "min": 1, "max": 3},
        {"name": "[shared_scale] - bar", "type_practical": "number_int", "range": [0, 2], "min": 0, "max": 3}
    ]},
    "[Residents]_Acorn_directory.csv": {"column_data": [
        {"name": "Acorn_category", "type_practical": ["household", "category"], "range": ["1", "2"]}
    ]}
}"#;

pub const TOPOLOGY: &str = r#"{"type": "FeatureCollection", "features": [
    {"type": "Feature", "properties": {"geo_code": "E1"}},
    {"type": "Feature", "properties": {"geo_code": "E2"}},
    {"type": "Feature", "properties": {"geo_code": "E3"}}
]}"#;

pub const PTAL_CSV: &str = "OA,Public_Transport_Accessibility_Level,Public Transport Accessibility Level_frequency_count\n\
E1,6b,\"{'6b': 3, '1a': 1}\"\n\
E2,1a,\"{'1a': 2}\"\n\
E3,1a,{}\n";

pub const NORMALIZING_CSV: &str = "Unnamed: 0,OA,OA_area_meters,households\n\
0,E1,10.0,4\n\
1,E2,30.0,6\n\
2,E3,20.0,5\n";

pub const PLACES_CSV: &str = "OA,bar,cafe,[shared_scale] - bar\n\
E1,2,1,2\n\
E2,0,3,0\n";

pub const ACORN_CSV: &str = "OA,Acorn_category\nE1,1\nE2,2\nE3,1\n";

pub fn datasets() -> Vec<(String, String)> {
    vec![
        (PTAL.to_string(), PTAL_CSV.to_string()),
        (NORMALIZING.to_string(), NORMALIZING_CSV.to_string()),
        (PLACES.to_string(), PLACES_CSV.to_string()),
        (ACORN.to_string(), ACORN_CSV.to_string()),
    ]
}

pub fn config() -> DashboardConfig {
    DashboardConfig {
        datasets: vec![
            PTAL.to_string(),
            NORMALIZING.to_string(),
            PLACES.to_string(),
            ACORN.to_string(),
        ],
        ..Default::default()
    }
}

pub fn context() -> DashboardContext {
    build_context(
        config(),
        Palette::standard().unwrap(),
        TOPOLOGY,
        METADATA,
        datasets(),
    )
    .unwrap()
}
