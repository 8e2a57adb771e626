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

use crate::area::Area;
use crate::config::MapConfig;
use crate::context::DashboardContext;
use crate::palette::{Colour, CLICKED_FILL, DEFAULT_FILL};
use crate::scale::Legend;
use serde::Serialize;

pub const HOVER_FILL: &str = "#000000";
pub const HOVER_CLICKED_FILL: &str = "#5f0c90";
const MISSING_VALUE: &str = "undefined";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaStyle {
    pub fill: Colour,
    pub stroke: Colour,
    pub stroke_weight: f64,
    pub z_index: u32,
    pub fill_opacity: f64,
    pub stroke_opacity: f64,
}

/// Base style for one area under the current selection; `hovered` raises its outline.
pub fn style_area(ctx: &DashboardContext, area: &Area, hovered: bool) -> AreaStyle {
    let selection = &ctx.selection;
    let clicked = selection.area.as_deref() == Some(area.key.as_str());
    let fill = if clicked {
        Colour::css(CLICKED_FILL)
    } else if selection.has_dataset() && selection.has_column() {
        ctx.scales
            .get(&selection.dataset, &selection.column)
            .map(|s| s.colour_for(area.value(&selection.dataset, &selection.column)))
            .unwrap_or_else(|| ctx.palette.blank())
    } else {
        Colour::css(DEFAULT_FILL)
    };
    let raised = hovered || clicked;
    AreaStyle {
        fill,
        stroke: ctx.palette.border(),
        stroke_weight: if raised { 2.0 } else { 0.5 },
        z_index: if raised { 2 } else { 1 },
        fill_opacity: ctx.opacity(),
        stroke_opacity: ctx.opacity(),
    }
}

/// Hover override drawn over the base style.
pub fn hover_style(ctx: &DashboardContext, area: &Area) -> AreaStyle {
    let clicked = ctx.selection.area.as_deref() == Some(area.key.as_str());
    let colour = Colour::css(if clicked { HOVER_CLICKED_FILL } else { HOVER_FILL });
    AreaStyle {
        fill: colour.clone(),
        stroke: colour,
        stroke_weight: 3.0,
        ..style_area(ctx, area, true)
    }
}

pub fn style_all(ctx: &DashboardContext) -> Vec<(String, AreaStyle)> {
    ctx.areas
        .areas()
        .map(|a| (a.key.clone(), style_area(ctx, a, false)))
        .collect()
}

/// Legend for the current selection; empty when nothing is coloured.
pub fn current_legend(ctx: &DashboardContext) -> Legend {
    if !ctx.selection.has_dataset() {
        return Legend::Empty;
    }
    ctx.scales
        .get(&ctx.selection.dataset, &ctx.selection.column)
        .map(|s| s.legend())
        .unwrap_or(Legend::Empty)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center_lat: f64,
    pub center_lng: f64,
    pub zoom: f64,
    pub min_zoom: f64,
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}
impl MapView {
    pub fn initial(config: &MapConfig) -> Self {
        Self {
            center_lat: config.center_lat,
            center_lng: config.center_lng,
            zoom: config.initial_zoom,
            min_zoom: config.initial_zoom,
            north: config.center_lat + config.lat_padding,
            south: config.center_lat - config.lat_padding,
            east: config.center_lng + config.lng_padding,
            west: config.center_lng - config.lng_padding,
        }
    }
    pub fn recentred(config: &MapConfig) -> Self {
        Self {
            zoom: config.optimal_zoom,
            ..Self::initial(config)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Readout {
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caret_percent: Option<f64>,
}
impl Readout {
    pub fn empty(label: &str) -> Self {
        Self {
            label: label.to_string(),
            value: MISSING_VALUE.to_string(),
            caret_percent: None,
        }
    }
    /// Key and value of `area` under the current selection, with the legend caret on continuous scales.
    pub fn for_area(ctx: &DashboardContext, area: &Area) -> Self {
        let selection = &ctx.selection;
        if !(selection.has_dataset() && selection.has_column()) {
            return Self::empty(&area.key);
        }
        let label = area
            .value(&selection.dataset, &ctx.config.join.csv_key)
            .unwrap_or(&area.key)
            .to_string();
        let raw = area.value(&selection.dataset, &selection.column);
        let caret_percent = ctx
            .scales
            .get(&selection.dataset, &selection.column)
            .and_then(|s| s.caret_percent(raw));
        Self {
            label,
            value: raw.unwrap_or(MISSING_VALUE).to_string(),
            caret_percent,
        }
    }
}
