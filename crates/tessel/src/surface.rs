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

//! Opaque draw targets. The dashboard hands finished charts and styles to these
//! and never reads anything back.

use crate::error::RenderError;
use crate::map_style::{AreaStyle, MapView, Readout};
use crate::render::Chart;
use crate::scale::Legend;
use std::io::Write;

pub trait ChartSurface {
    fn draw(&mut self, chart: &Chart) -> Result<(), RenderError>;
}

pub trait MapSurface {
    fn restyle(&mut self, styles: &[(String, AreaStyle)]) -> Result<(), RenderError>;
    fn set_view(&mut self, view: &MapView) -> Result<(), RenderError>;
    fn set_labels_visible(&mut self, visible: bool) -> Result<(), RenderError>;
    fn show_legend(&mut self, legend: &Legend) -> Result<(), RenderError>;
    fn show_readout(&mut self, readout: &Readout) -> Result<(), RenderError>;
}

/// Keeps every chart it is asked to draw.
#[derive(Debug, Default)]
pub struct RecordingChartSurface {
    pub charts: Vec<Chart>,
}
impl RecordingChartSurface {
    pub fn last(&self) -> Option<&Chart> {
        self.charts.last()
    }
}
impl ChartSurface for RecordingChartSurface {
    fn draw(&mut self, chart: &Chart) -> Result<(), RenderError> {
        self.charts.push(chart.clone());
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct RecordingMapSurface {
    pub restyles: Vec<Vec<(String, AreaStyle)>>,
    pub views: Vec<MapView>,
    pub labels_visible: bool,
    pub legends: Vec<Legend>,
    pub readouts: Vec<Readout>,
}
impl MapSurface for RecordingMapSurface {
    fn restyle(&mut self, styles: &[(String, AreaStyle)]) -> Result<(), RenderError> {
        self.restyles.push(styles.to_vec());
        Ok(())
    }
    fn set_view(&mut self, view: &MapView) -> Result<(), RenderError> {
        self.views.push(view.clone());
        Ok(())
    }
    fn set_labels_visible(&mut self, visible: bool) -> Result<(), RenderError> {
        self.labels_visible = visible;
        Ok(())
    }
    fn show_legend(&mut self, legend: &Legend) -> Result<(), RenderError> {
        self.legends.push(legend.clone());
        Ok(())
    }
    fn show_readout(&mut self, readout: &Readout) -> Result<(), RenderError> {
        self.readouts.push(readout.clone());
        Ok(())
    }
}

/// Writes each chart as a JSON document.
pub struct JsonChartSurface<W: Write> {
    out: W,
    pretty: bool,
}
impl<W: Write> JsonChartSurface<W> {
    pub fn new(out: W, pretty: bool) -> Self {
        Self { out, pretty }
    }
    pub fn into_inner(self) -> W {
        self.out
    }
}
impl<W: Write> ChartSurface for JsonChartSurface<W> {
    fn draw(&mut self, chart: &Chart) -> Result<(), RenderError> {
        let encoded = if self.pretty {
            serde_json::to_string_pretty(chart)
        } else {
            serde_json::to_string(chart)
        }
        .map_err(|e| RenderError::Surface {
            reason: e.to_string(),
        })?;
        writeln!(self.out, "{encoded}").map_err(|e| RenderError::Surface {
            reason: e.to_string(),
        })
    }
}

/// Map target for headless runs: accepts every update and drops it.
#[derive(Debug, Default)]
pub struct NullMapSurface;
impl MapSurface for NullMapSurface {
    fn restyle(&mut self, _styles: &[(String, AreaStyle)]) -> Result<(), RenderError> {
        Ok(())
    }
    fn set_view(&mut self, _view: &MapView) -> Result<(), RenderError> {
        Ok(())
    }
    fn set_labels_visible(&mut self, _visible: bool) -> Result<(), RenderError> {
        Ok(())
    }
    fn show_legend(&mut self, _legend: &Legend) -> Result<(), RenderError> {
        Ok(())
    }
    fn show_readout(&mut self, _readout: &Readout) -> Result<(), RenderError> {
        Ok(())
    }
}
