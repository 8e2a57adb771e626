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

//! Drill-down for the granular POC demographic distribution datasets.
//!
//! Column names are `" - "`-delimited segments such as
//! `[%_of_borough_total] - [per_effective_area_square_meter] - worker_units`.
//! The first segment picks the branch; a later segment picks unit or value mode.

use crate::dispatch::Strategy;
use crate::registry::BLANK_COLUMN;
use serde::Serialize;

/// Closed demographic vocabulary, in display order.
pub const DEMOGRAPHIC_TYPES: [&str; 6] = ["worker", "student", "tourist", "shopper", "leisurer", "chorer"];

const EFFECTIVE_AREA: &str = "[per_effective_area_square_meter]";
const BOROUGH_SHARE: &str = "[%_of_borough_total]";
const OA_SHARE: &str = "[%_of_OA_total]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PocBranch {
    Blank,
    EffectiveArea,
    BoroughShare,
    OaShare,
    Flat,
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DemographicMode {
    Units,
    Values,
}
impl DemographicMode {
    fn from_segment(segment: Option<&str>) -> Self {
        match segment {
            Some(s) if s.contains("units") => DemographicMode::Units,
            _ => DemographicMode::Values,
        }
    }
    pub fn suffix(self) -> &'static str {
        match self {
            DemographicMode::Units => "_units",
            DemographicMode::Values => "_value",
        }
    }
}

/// Pure string inspection; a segment that is absent counts as "not units".
pub fn classify(column: &str) -> (PocBranch, DemographicMode) {
    if column == BLANK_COLUMN {
        return (PocBranch::Blank, DemographicMode::Values);
    }
    let segments: Vec<&str> = column.split(" - ").collect();
    let at = |i: usize| segments.get(i).copied();
    match at(0) {
        Some(EFFECTIVE_AREA) => (PocBranch::EffectiveArea, DemographicMode::from_segment(at(1))),
        Some(BOROUGH_SHARE) => (PocBranch::BoroughShare, DemographicMode::from_segment(at(2))),
        Some(OA_SHARE) => (PocBranch::OaShare, DemographicMode::from_segment(at(2))),
        first => (PocBranch::Flat, DemographicMode::from_segment(first)),
    }
}

pub fn strategy_for(column: &str) -> Strategy {
    let (branch, mode) = classify(column);
    let suffix = mode.suffix().to_string();
    let scoped = |scope: &str| format!("{scope} - {EFFECTIVE_AREA} - ");
    match (branch, mode) {
        (PocBranch::Blank, _) => Strategy::DataTable,
        (PocBranch::EffectiveArea, DemographicMode::Units) => Strategy::DemographicColumn {
            prefix: format!("{EFFECTIVE_AREA} - "),
            suffix,
        },
        (PocBranch::EffectiveArea, DemographicMode::Values) => Strategy::DemographicPie {
            prefix: format!("{EFFECTIVE_AREA} - "),
            suffix,
        },
        (PocBranch::BoroughShare, _) => Strategy::DemographicColumn {
            prefix: scoped(BOROUGH_SHARE),
            suffix,
        },
        (PocBranch::OaShare, _) => Strategy::DemographicPie {
            prefix: scoped(OA_SHARE),
            suffix,
        },
        (PocBranch::Flat, DemographicMode::Units) => Strategy::DemographicColumn {
            prefix: String::new(),
            suffix,
        },
        (PocBranch::Flat, DemographicMode::Values) => Strategy::DemographicPie {
            prefix: String::new(),
            suffix,
        },
    }
}
