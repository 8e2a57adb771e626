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

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tessel-demo")]
#[command(about = "Headless driver for the census output-area dashboard core")]
#[command(version)]
pub struct Args {
    #[arg(long, value_enum, help = "Set the logging level")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Derive registry metadata from one or more dataset CSVs.
    Profile {
        #[arg(long, required = true, help = "Dataset CSV to profile; repeatable")]
        csv: Vec<PathBuf>,

        #[arg(long, help = "Dataset name for a single CSV; defaults to the file name")]
        name: Option<String>,

        #[arg(long, help = "Give [shared_scale] columns common bounds")]
        shared_scale: bool,

        #[arg(long, help = "Write the metadata JSON here instead of stdout")]
        out: Option<PathBuf>,
    },
    /// Load the data directory, apply one selection and print the chart as JSON.
    Render {
        #[arg(long, help = "Dashboard YAML config; defaults apply when omitted")]
        config: Option<PathBuf>,

        #[arg(long, help = "Override the configured data directory")]
        data_dir: Option<PathBuf>,

        #[arg(long)]
        dataset: String,

        #[arg(long, default_value = "blank")]
        column: String,

        #[arg(long, help = "Boundary key of the clicked area")]
        area: Option<String>,

        #[arg(long, help = "Render value axes on a logarithmic scale")]
        log: bool,

        #[arg(long)]
        pretty: bool,
    },
    /// List the dispatch rules in evaluation order.
    Rules,
}

#[derive(clap::ValueEnum, Clone, Debug)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}
