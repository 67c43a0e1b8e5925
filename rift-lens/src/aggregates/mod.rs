//! Derived summaries computed from a [`FilteredView`].
//!
//! Every aggregate is a stateless [`Aggregate`] implementation producing a
//! small ordered [`AggregateTable`] of `(category, value)` rows. Tables are
//! rebuilt from scratch on every recompute and never mutated afterwards.
//!
//! Ordering contract for top-N tables: value descending, then category name
//! ascending. Ties therefore have a fixed, documented order instead of
//! depending on first-encountered rows.

use crate::dataset::Side;
use crate::query::FilteredView;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::instrument;

mod counts;
mod means;

pub use counts::{value_counts, CategoryColumn, SideWinRate, TopFrequency};
pub use means::{MeanState, StatColumn, TopMean};

/// Number of rows kept by top-N tables unless configured otherwise.
pub const DEFAULT_TOP_N: usize = 5;

/// A single cell value of an aggregate table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AggregateValue {
    Count(u64),
    Mean(f64),
}

impl AggregateValue {
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Count(c) => *c as f64,
            Self::Mean(m) => *m,
        }
    }

    pub fn as_count(&self) -> Option<u64> {
        match self {
            Self::Count(c) => Some(*c),
            Self::Mean(_) => None,
        }
    }
}

impl fmt::Display for AggregateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(c) => write!(f, "{c}"),
            Self::Mean(m) => write!(f, "{m:.2}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub category: String,
    pub value: AggregateValue,
}

impl AggregateRow {
    pub fn count(category: impl Into<String>, count: u64) -> Self {
        Self {
            category: category.into(),
            value: AggregateValue::Count(count),
        }
    }

    pub fn mean(category: impl Into<String>, mean: f64) -> Self {
        Self {
            category: category.into(),
            value: AggregateValue::Mean(mean),
        }
    }
}

/// Read-only result of one aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateTable {
    /// Stable identifier, e.g. `top_picks`
    pub key: String,
    /// Chart title for the presentation layer
    pub title: String,
    /// Header of the category column, e.g. `Pick`
    pub category_label: String,
    /// Header of the value column, e.g. `Count`
    pub value_label: String,
    pub rows: Vec<AggregateRow>,
}

impl AggregateTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Looks up the value for `category`.
    pub fn get(&self, category: &str) -> Option<AggregateValue> {
        self.rows
            .iter()
            .find(|row| row.category == category)
            .map(|row| row.value)
    }

    /// Sum of all count cells.
    pub fn total_count(&self) -> u64 {
        self.rows.iter().filter_map(|row| row.value.as_count()).sum()
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.category.as_str())
    }
}

/// A stateless computation from a filtered view to an aggregate table.
pub trait Aggregate: fmt::Debug + Send + Sync {
    /// Stable identifier of the produced table.
    fn key(&self) -> String;

    /// Chart title of the produced table.
    fn title(&self) -> String;

    /// Computes the table. Must be pure: equal views give equal tables.
    fn compute(&self, view: &FilteredView<'_>) -> AggregateTable;
}

/// The fixed set of dashboard aggregates, in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateSet {
    pub blue_side: AggregateTable,
    pub red_side: AggregateTable,
    pub top_picks: AggregateTable,
    pub top_bans: AggregateTable,
    pub top_kills: AggregateTable,
    pub top_assists: AggregateTable,
    pub top_deaths: AggregateTable,
}

impl AggregateSet {
    /// Computes every dashboard aggregate over `view`.
    ///
    /// `top_n` applies to all top-N tables.
    #[instrument(skip(view), fields(rows = view.len()))]
    pub fn compute(view: &FilteredView<'_>, top_n: usize) -> Self {
        Self {
            blue_side: SideWinRate::new(Side::Blue).compute(view),
            red_side: SideWinRate::new(Side::Red).compute(view),
            top_picks: TopFrequency::new(CategoryColumn::Pick, top_n).compute(view),
            top_bans: TopFrequency::new(CategoryColumn::Ban, top_n).compute(view),
            top_kills: TopMean::new(StatColumn::Kills, top_n).compute(view),
            top_assists: TopMean::new(StatColumn::Assists, top_n).compute(view),
            top_deaths: TopMean::new(StatColumn::Deaths, top_n).compute(view),
        }
    }

    /// All tables in display order.
    pub fn tables(&self) -> [&AggregateTable; 7] {
        [
            &self.blue_side,
            &self.red_side,
            &self.top_picks,
            &self.top_bans,
            &self.top_kills,
            &self.top_assists,
            &self.top_deaths,
        ]
    }

    /// Looks up a table by key.
    pub fn get(&self, key: &str) -> Option<&AggregateTable> {
        self.tables().into_iter().find(|t| t.key == key)
    }

    pub fn is_empty(&self) -> bool {
        self.tables().iter().all(|t| t.is_empty())
    }
}

/// Sorts rows by value descending, then category ascending, and keeps `n`.
pub(crate) fn top_n_rows(mut rows: Vec<AggregateRow>, n: usize) -> Vec<AggregateRow> {
    rows.sort_by(|a, b| {
        b.value
            .as_f64()
            .total_cmp(&a.value.as_f64())
            .then_with(|| a.category.cmp(&b.category))
    });
    rows.truncate(n);
    rows
}
