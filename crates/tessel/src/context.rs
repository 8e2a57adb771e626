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

use crate::area::{Area, AreaIndex};
use crate::config::DashboardConfig;
use crate::error::{DispatchError, Result};
use crate::palette::Palette;
use crate::registry::DatasetRegistry;
use crate::scale::{Scale, ScaleRegistry};
use crate::selection::{DisplayOptions, OpacityLevel, SelectionState};

/// Everything the dispatcher and the strategies read, built once after loading.
/// Only the interaction handlers mutate `selection` and `display`.
#[derive(Debug, Clone)]
pub struct DashboardContext {
    pub config: DashboardConfig,
    pub palette: Palette,
    pub registry: DatasetRegistry,
    pub scales: ScaleRegistry,
    pub areas: AreaIndex,
    pub selection: SelectionState,
    pub display: DisplayOptions,
}
impl DashboardContext {
    pub fn new(
        config: DashboardConfig,
        palette: Palette,
        registry: DatasetRegistry,
        areas: AreaIndex,
    ) -> Result<Self> {
        let scales = ScaleRegistry::build(&registry, &palette)?;
        Ok(Self {
            config,
            palette,
            registry,
            scales,
            areas,
            selection: SelectionState::default(),
            display: DisplayOptions::default(),
        })
    }
    pub fn selected_area(&self) -> Option<&Area> {
        self.selection
            .area
            .as_deref()
            .and_then(|k| self.areas.get(k))
    }
    pub fn scale(&self, dataset: &str, column: &str) -> std::result::Result<&Scale, DispatchError> {
        self.scales
            .get(dataset, column)
            .ok_or_else(|| DispatchError::MissingScale {
                dataset: dataset.to_string(),
                column: column.to_string(),
            })
    }
    pub fn selected_scale(&self) -> std::result::Result<&Scale, DispatchError> {
        self.scale(&self.selection.dataset, &self.selection.column)
    }
    pub fn opacity(&self) -> f64 {
        match self.display.opacity {
            OpacityLevel::High => self.config.opacity.high,
            OpacityLevel::Low => self.config.opacity.low,
        }
    }
}
