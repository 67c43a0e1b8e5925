//! Dashboard configuration.
//!
//! [`DashboardConfig::default`] reproduces the LPL regional finals dashboard:
//! a semicolon-separated season export, filters preset to one jungler on one
//! team, and both outcomes selected.

use crate::aggregates::DEFAULT_TOP_N;
use crate::filters::{Dimension, FilterSet, FilterState};
use crate::prelude::*;
use crate::sources::{CsvOptions, CsvSource};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Initial state and labels of one filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionConfig {
    pub dimension: Dimension,
    /// Whether select-all starts switched on
    #[serde(default)]
    pub select_all: bool,
    /// Values selected when select-all is off
    #[serde(default)]
    pub defaults: Vec<String>,
    /// Multi-select label; falls back to a per-dimension default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Select-all checkbox label; falls back to a per-dimension default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select_all_label: Option<String>,
}

impl DimensionConfig {
    pub fn new<I, S>(dimension: Dimension, select_all: bool, defaults: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            dimension,
            select_all,
            defaults: defaults.into_iter().map(Into::into).collect(),
            label: None,
            select_all_label: None,
        }
    }

    /// Builds the filter in its initial state.
    pub fn to_filter_state(&self) -> FilterState {
        let state =
            FilterState::new(self.dimension, self.select_all, self.defaults.iter().cloned());
        let label = self.label.clone().unwrap_or_else(|| state.label().to_string());
        let select_all_label = self
            .select_all_label
            .clone()
            .unwrap_or_else(|| state.select_all_label().to_string());
        state.with_labels(label, select_all_label)
    }
}

/// Top-level dashboard configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Page title
    pub title: String,
    /// Path of the delimited season export
    pub data_path: String,
    pub csv: CsvOptions,
    /// Rows kept by top-N tables
    pub top_n: usize,
    pub dimensions: Vec<DimensionConfig>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "LPL regional finals 2024".to_string(),
            data_path: "LPL_regionalFinals_2024.csv".to_string(),
            csv: CsvOptions::default(),
            top_n: DEFAULT_TOP_N,
            dimensions: vec![
                DimensionConfig::new(Dimension::Player, false, ["Tarzan"]),
                DimensionConfig::new(Dimension::Role, false, ["JUNGLE"]),
                DimensionConfig::new(Dimension::Team, false, ["WBG"]),
                DimensionConfig::new(Dimension::Outcome, true, ["Win"]),
            ],
        }
    }
}

impl DashboardConfig {
    /// A configuration with every filter on select-all.
    pub fn select_all() -> Self {
        Self {
            dimensions: Dimension::ALL
                .iter()
                .map(|d| DimensionConfig::new(*d, true, Vec::<String>::new()))
                .collect(),
            ..Self::default()
        }
    }

    /// Reads a JSON configuration file. Missing fields take default values.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config '{}'", path.display()))?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_data_path(mut self, path: impl Into<String>) -> Self {
        self.data_path = path.into();
        self
    }

    pub fn with_csv_options(mut self, csv: CsvOptions) -> Self {
        self.csv = csv;
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Replaces the configuration of one dimension.
    pub fn with_dimension(mut self, dimension: DimensionConfig) -> Self {
        self.dimensions.retain(|d| d.dimension != dimension.dimension);
        self.dimensions.push(dimension);
        self
    }

    /// Checks the configuration for values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            return Err(LensError::Configuration("top_n must be at least 1".to_string()));
        }
        if self.data_path.trim().is_empty() {
            return Err(LensError::Configuration("data_path must not be empty".to_string()));
        }
        self.filter_set().map(|_| ())
    }

    /// Builds the initial filter set.
    pub fn filter_set(&self) -> Result<FilterSet> {
        FilterSet::new(
            self.dimensions
                .iter()
                .map(DimensionConfig::to_filter_state)
                .collect(),
        )
    }

    /// The source described by `data_path` and `csv`.
    pub fn source(&self) -> CsvSource {
        CsvSource::with_options(self.data_path.clone(), self.csv.clone())
    }
}
