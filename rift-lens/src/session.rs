//! Per-user dashboard state.
//!
//! A [`DashboardSession`] pairs a shared, immutable [`Dataset`] with one
//! user's filter selections. Every change to a filter synchronously
//! recomputes the filtered rows and all aggregates, so the session is always
//! consistent with its selections: there is no partially updated state for
//! the presentation layer to observe.

use crate::aggregates::AggregateSet;
use crate::config::DashboardConfig;
use crate::dataset::{Dataset, Record};
use crate::filters::{Dimension, FilterSet, ResolvedFilter};
use crate::logging::truncate_field;
use crate::prelude::*;
use crate::query::{filter, selections_from, FilteredView};
use crate::sources::DataSource;
use crate::store::DatasetStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

/// One user's view of a dataset.
#[derive(Debug, Clone)]
pub struct DashboardSession {
    dataset: Arc<Dataset>,
    config: DashboardConfig,
    filters: FilterSet,
    resolved: Vec<ResolvedFilter>,
    rows: Vec<usize>,
    aggregates: AggregateSet,
    log_config: LogConfig,
}

impl DashboardSession {
    /// Creates a session over an already loaded dataset.
    pub fn new(dataset: Arc<Dataset>, config: DashboardConfig) -> Result<Self> {
        config.validate()?;
        let filters = config.filter_set()?;
        let log_config = LogConfig::default();
        let (resolved, rows, aggregates) = evaluate(&dataset, &filters, config.top_n, &log_config);
        Ok(Self {
            dataset,
            config,
            filters,
            resolved,
            rows,
            aggregates,
            log_config,
        })
    }

    /// Replaces the logging behavior for recomputes.
    pub fn with_log_config(mut self, log_config: LogConfig) -> Self {
        self.log_config = log_config;
        self
    }

    /// Loads the configured CSV through the global store and opens a session.
    pub async fn open(config: DashboardConfig) -> Result<Self> {
        let source = config.source();
        Self::open_with_store(DatasetStore::global(), &source, config).await
    }

    /// Loads `source` through `store` and opens a session.
    #[instrument(skip(store, source, config), fields(source = %source.description()))]
    pub async fn open_with_store(
        store: &DatasetStore,
        source: &dyn DataSource,
        config: DashboardConfig,
    ) -> Result<Self> {
        config.validate()?;
        let dataset = store.load(source).await?;
        let session = Self::new(dataset, config)?;
        info!(
            rows = session.row_count(),
            total_rows = session.dataset.len(),
            "Dashboard session opened"
        );
        Ok(session)
    }

    /// Toggles select-all for `dimension` and recomputes.
    pub fn set_select_all(&mut self, dimension: Dimension, select_all: bool) {
        self.filters.set_select_all(dimension, select_all);
        self.recompute();
    }

    /// Sets an explicit selection for `dimension` and recomputes.
    pub fn set_explicit<I, S>(&mut self, dimension: Dimension, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters.set_explicit(dimension, values);
        self.recompute();
    }

    /// Applies a full widget state for one dimension in a single recompute.
    ///
    /// With `select_all` on, `values` is ignored.
    pub fn apply<I, S>(&mut self, dimension: Dimension, select_all: bool, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if select_all {
            self.filters.set_select_all(dimension, true);
        } else {
            self.filters.set_explicit(dimension, values);
        }
        self.recompute();
    }

    /// Strict check that every explicit selection exists in the dataset.
    pub fn validate_selections(&self) -> Result<()> {
        self.filters.validate(&self.dataset)
    }

    fn recompute(&mut self) {
        let (resolved, rows, aggregates) =
            evaluate(&self.dataset, &self.filters, self.config.top_n, &self.log_config);
        self.resolved = resolved;
        self.rows = rows;
        self.aggregates = aggregates;
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    /// Filters resolved against the dataset, in display order.
    pub fn resolved_filters(&self) -> &[ResolvedFilter] {
        &self.resolved
    }

    /// The rows matching the current selections.
    pub fn filtered_view(&self) -> FilteredView<'_> {
        FilteredView::from_indices(&self.dataset, self.rows.clone())
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn aggregates(&self) -> &AggregateSet {
        &self.aggregates
    }

    /// Captures the current state for rendering or export.
    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            title: self.config.title.clone(),
            generated_at: Some(Utc::now()),
            filters: self.resolved.clone(),
            row_count: self.rows.len(),
            total_rows: self.dataset.len(),
            aggregates: self.aggregates.clone(),
            rows: self.filtered_view().to_records(),
        }
    }
}

/// Runs the whole pipeline: resolve filters, select rows, compute aggregates.
fn evaluate(
    dataset: &Dataset,
    filters: &FilterSet,
    top_n: usize,
    log_config: &LogConfig,
) -> (Vec<ResolvedFilter>, Vec<usize>, AggregateSet) {
    let resolved = filters.resolve(dataset);
    let selections = selections_from(&resolved);
    let view = filter(dataset, &selections);
    let aggregates = AggregateSet::compute(&view, top_n);
    crate::log_recompute!(
        log_config,
        rows = view.len(),
        total_rows = dataset.len(),
        selections = %truncate_field(&format!("{selections:?}"), log_config.max_field_length),
        "Dashboard recomputed"
    );
    (resolved, view.row_indices().to_vec(), aggregates)
}

/// Everything the presentation layer renders, detached from the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub title: String,
    /// Capture time; left out of exports that exclude timestamps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
    pub filters: Vec<ResolvedFilter>,
    /// Rows matching the selections
    pub row_count: usize,
    /// Rows in the full dataset
    pub total_rows: usize,
    pub aggregates: AggregateSet,
    pub rows: Vec<Record>,
}
