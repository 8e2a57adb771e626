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

use crate::context::DashboardContext;
use crate::dispatch::{Dispatcher, RenderInvocation};
use crate::error::{DispatchError, RegistryError, Result};
use crate::map_style::{current_legend, hover_style, style_all, MapView, Readout};
use crate::registry::{BLANK_COLUMN, NONE_DATASET};
use crate::render::{render, Chart};
use crate::selection::OpacityLevel;
use crate::surface::{ChartSurface, MapSurface};
use tracing::{debug, info};

/// Interaction handlers. Each one mutates the selection or display options,
/// then runs one dispatch-and-render cycle and restyles the map when colouring changes.
pub struct Dashboard<C: ChartSurface, M: MapSurface> {
    ctx: DashboardContext,
    dispatcher: Dispatcher,
    charts: C,
    map: M,
}
impl<C: ChartSurface, M: MapSurface> Dashboard<C, M> {
    pub fn new(ctx: DashboardContext, charts: C, map: M) -> Result<Self> {
        Ok(Self {
            ctx,
            dispatcher: Dispatcher::standard()?,
            charts,
            map,
        })
    }
    pub fn context(&self) -> &DashboardContext {
        &self.ctx
    }
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
    pub fn charts(&self) -> &C {
        &self.charts
    }
    pub fn map(&self) -> &M {
        &self.map
    }
    pub fn into_surfaces(self) -> (C, M) {
        (self.charts, self.map)
    }
    pub fn start(&mut self) -> Result<Chart> {
        self.map.set_view(&MapView::initial(&self.ctx.config.map))?;
        self.map.set_labels_visible(self.ctx.display.map_labels)?;
        self.restyle()?;
        info!(areas = self.ctx.areas.len(), "dashboard started");
        self.refresh()
    }
    /// Returns the column dropdown entries for the new dataset.
    pub fn select_dataset(&mut self, dataset: &str) -> Result<Vec<String>> {
        let columns = self.ctx.registry.column_options(dataset)?;
        self.ctx.selection.select_dataset(dataset);
        self.restyle()?;
        self.refresh()?;
        Ok(columns)
    }
    pub fn select_column(&mut self, column: &str) -> Result<Chart> {
        let dataset = self.ctx.selection.dataset.clone();
        if column != BLANK_COLUMN {
            if dataset == NONE_DATASET {
                return Err(RegistryError::UnknownColumn {
                    dataset,
                    column: column.to_string(),
                }
                .into());
            }
            self.ctx.registry.column(&dataset, column)?;
        }
        self.ctx.selection.select_column(column);
        self.restyle()?;
        self.refresh()
    }
    /// Toggles the clicked area and shows its readout (`unclicked` when cleared).
    pub fn click_area(&mut self, key: &str) -> Result<Readout> {
        if !self.ctx.areas.contains(key) {
            return Err(DispatchError::UnknownArea {
                key: key.to_string(),
            }
            .into());
        }
        let selected = self.ctx.selection.toggle_area(key).map(str::to_string);
        let readout = match selected.as_deref().and_then(|k| self.ctx.areas.get(k)) {
            Some(area) => Readout::for_area(&self.ctx, area),
            None => Readout::empty("unclicked"),
        };
        self.map.show_readout(&readout)?;
        self.restyle()?;
        self.refresh()?;
        Ok(readout)
    }
    pub fn hover_area(&mut self, key: &str) -> Result<Readout> {
        let area = self
            .ctx
            .areas
            .get(key)
            .ok_or_else(|| DispatchError::UnknownArea {
                key: key.to_string(),
            })?;
        let readout = Readout::for_area(&self.ctx, area);
        self.map
            .restyle(&[(area.key.clone(), hover_style(&self.ctx, area))])?;
        self.map.show_readout(&readout)?;
        Ok(readout)
    }
    pub fn unhover_area(&mut self) -> Result<Readout> {
        let readout = Readout::empty("unhovered");
        self.restyle()?;
        self.map.show_readout(&readout)?;
        Ok(readout)
    }
    pub fn toggle_log_scale(&mut self) -> Result<Chart> {
        let on = self.ctx.display.toggle_log_scale();
        debug!(log_scale = on, "toggled value axis scale");
        self.refresh()
    }
    pub fn toggle_opacity(&mut self) -> Result<OpacityLevel> {
        let level = self.ctx.display.toggle_opacity();
        self.restyle()?;
        Ok(level)
    }
    pub fn toggle_map_labels(&mut self) -> Result<bool> {
        let visible = self.ctx.display.toggle_map_labels();
        self.map.set_labels_visible(visible)?;
        Ok(visible)
    }
    pub fn recenter(&mut self) -> Result<()> {
        self.map.set_view(&MapView::recentred(&self.ctx.config.map))?;
        Ok(())
    }
    pub fn current_invocation(&self) -> Result<RenderInvocation> {
        let selection = &self.ctx.selection;
        Ok(self.dispatcher.select_visualization(
            &self.ctx.scales,
            &selection.dataset,
            &selection.column,
            selection.area_selected(),
        )?)
    }
    /// Dispatch, render and draw for the current selection.
    pub fn refresh(&mut self) -> Result<Chart> {
        let invocation = self.current_invocation()?;
        let chart = render(&self.ctx, &invocation)?;
        self.charts.draw(&chart)?;
        Ok(chart)
    }
    fn restyle(&mut self) -> Result<()> {
        self.map.restyle(&style_all(&self.ctx))?;
        self.map.show_legend(&current_legend(&self.ctx))?;
        Ok(())
    }
}
