//! Categorical filters with a "select all" mode.
//!
//! Each [`Dimension`] offers the sorted distinct values of its column in the
//! full dataset as options. Options never depend on other active filters;
//! dimensions are independent, not cascading.
//!
//! A filter's [`Selection`] is either [`Selection::All`] (select-all is on)
//! or an explicit subset. Resolution against the available options is a pure
//! intersection: a configured value that does not exist in the data simply
//! matches nothing.

use crate::dataset::{Dataset, Record};
use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::warn;

/// A categorical column the dashboard can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Player,
    Role,
    Team,
    Outcome,
}

impl Dimension {
    /// All dimensions in display order.
    pub const ALL: [Dimension; 4] = [
        Dimension::Player,
        Dimension::Role,
        Dimension::Team,
        Dimension::Outcome,
    ];

    /// Lowercase identifier used in config files and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Role => "role",
            Self::Team => "team",
            Self::Outcome => "outcome",
        }
    }

    /// Header of the source column backing this dimension.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Player => "Player",
            Self::Role => "Role",
            Self::Team => "Team",
            Self::Outcome => "Outcome",
        }
    }

    /// Returns this dimension's value for a record.
    pub fn value_of<'a>(&self, record: &'a Record) -> &'a str {
        match self {
            Self::Player => &record.player,
            Self::Role => &record.role,
            Self::Team => &record.team,
            Self::Outcome => record.outcome.as_str(),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sorted, de-duplicated values of `dimension` across the whole dataset.
pub fn available_options(dataset: &Dataset, dimension: Dimension) -> Vec<String> {
    dataset
        .records()
        .iter()
        .map(|r| dimension.value_of(r))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Resolves a select-all flag and default subset against the available options.
///
/// With `select_all` on, every available option is active regardless of
/// `default_subset`. Otherwise the result is `default_subset ∩ available`.
/// An empty `available` yields an empty set either way.
pub fn resolve_selection(
    select_all: bool,
    default_subset: &BTreeSet<String>,
    available: &[String],
) -> BTreeSet<String> {
    if select_all {
        available.iter().cloned().collect()
    } else {
        available
            .iter()
            .filter(|option| default_subset.contains(*option))
            .cloned()
            .collect()
    }
}

/// The user's choice for one filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "values", rename_all = "snake_case")]
pub enum Selection {
    /// Every available option.
    All,
    /// An explicit subset of options.
    Explicit(BTreeSet<String>),
}

impl Selection {
    /// Creates an explicit selection from any iterator of values.
    pub fn explicit<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Explicit(values.into_iter().map(Into::into).collect())
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Resolves this selection against the available options.
    pub fn resolve(&self, available: &[String]) -> BTreeSet<String> {
        match self {
            Self::All => resolve_selection(true, &BTreeSet::new(), available),
            Self::Explicit(values) => resolve_selection(false, values, available),
        }
    }

    /// Explicit values that are not among `available`.
    pub fn phantom_values(&self, available: &[String]) -> Vec<String> {
        match self {
            Self::All => Vec::new(),
            Self::Explicit(values) => values
                .iter()
                .filter(|v| !available.contains(v))
                .cloned()
                .collect(),
        }
    }
}

/// Configuration and current selection of a single filter.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    dimension: Dimension,
    label: String,
    select_all_label: String,
    defaults: BTreeSet<String>,
    selection: Selection,
}

impl FilterState {
    /// Creates a filter in its initial state.
    ///
    /// When `select_all` is off the selection starts at `defaults`.
    pub fn new<I, S>(dimension: Dimension, select_all: bool, defaults: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let defaults: BTreeSet<String> = defaults.into_iter().map(Into::into).collect();
        let selection = if select_all {
            Selection::All
        } else {
            Selection::Explicit(defaults.clone())
        };
        Self {
            dimension,
            label: default_label(dimension).to_string(),
            select_all_label: default_select_all_label(dimension).to_string(),
            defaults,
            selection,
        }
    }

    /// Overrides the widget labels shown by the presentation layer.
    pub fn with_labels(
        mut self,
        label: impl Into<String>,
        select_all_label: impl Into<String>,
    ) -> Self {
        self.label = label.into();
        self.select_all_label = select_all_label.into();
        self
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn select_all_label(&self) -> &str {
        &self.select_all_label
    }

    pub fn defaults(&self) -> &BTreeSet<String> {
        &self.defaults
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_select_all(&self) -> bool {
        self.selection.is_all()
    }

    /// Toggles select-all. Turning it off goes back to the default subset.
    pub fn set_select_all(&mut self, select_all: bool) {
        self.selection = if select_all {
            Selection::All
        } else {
            Selection::Explicit(self.defaults.clone())
        };
    }

    /// Replaces the selection with an explicit set of values.
    pub fn set_explicit<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selection = Selection::explicit(values);
    }

    /// Resolves the selection against `available`, tolerating unknown values.
    pub fn resolve(&self, available: &[String]) -> ResolvedFilter {
        let phantom_values = self.selection.phantom_values(available);
        if !phantom_values.is_empty() {
            warn!(
                dimension = %self.dimension,
                values = ?phantom_values,
                "Selected values are not present in the dataset and match no rows"
            );
        }
        ResolvedFilter {
            dimension: self.dimension,
            label: self.label.clone(),
            select_all_label: self.select_all_label.clone(),
            select_all: self.selection.is_all(),
            available: available.to_vec(),
            active: self.selection.resolve(available),
            phantom_values,
        }
    }

    /// Strict check that every explicit value is an available option.
    pub fn validate(&self, available: &[String]) -> Result<()> {
        match self.selection.phantom_values(available).into_iter().next() {
            Some(value) => Err(LensError::invalid_selection(self.dimension.name(), value)),
            None => Ok(()),
        }
    }
}

fn default_label(dimension: Dimension) -> &'static str {
    match dimension {
        Dimension::Player => "Select player(s)",
        Dimension::Role => "Select role(s)",
        Dimension::Team => "Select team(s)",
        Dimension::Outcome => "Select win or loss",
    }
}

fn default_select_all_label(dimension: Dimension) -> &'static str {
    match dimension {
        Dimension::Player => "Select all players",
        Dimension::Role => "Select all roles",
        Dimension::Team => "Select all teams",
        Dimension::Outcome => "Select both",
    }
}

/// A filter resolved against a dataset: what the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedFilter {
    pub dimension: Dimension,
    pub label: String,
    pub select_all_label: String,
    pub select_all: bool,
    /// Sorted distinct values in the full dataset
    pub available: Vec<String>,
    /// Values rows must match
    pub active: BTreeSet<String>,
    /// Explicitly selected values that do not exist in the dataset
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phantom_values: Vec<String>,
}

/// One filter per [`Dimension`], in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSet {
    filters: Vec<FilterState>,
}

impl FilterSet {
    /// Creates a set from filter states.
    ///
    /// Dimensions without a state get a select-all filter; a repeated
    /// dimension is a configuration error.
    pub fn new(states: Vec<FilterState>) -> Result<Self> {
        let mut filters = Vec::with_capacity(Dimension::ALL.len());
        for dimension in Dimension::ALL {
            let mut matching = states.iter().filter(|s| s.dimension == dimension);
            let state = matching
                .next()
                .cloned()
                .unwrap_or_else(|| FilterState::new(dimension, true, Vec::<String>::new()));
            if matching.next().is_some() {
                return Err(LensError::Configuration(format!(
                    "filter '{dimension}' is configured more than once"
                )));
            }
            filters.push(state);
        }
        Ok(Self { filters })
    }

    /// A set where every filter has select-all on.
    pub fn select_all() -> Self {
        Self {
            filters: Dimension::ALL
                .iter()
                .map(|d| FilterState::new(*d, true, Vec::<String>::new()))
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &FilterState> {
        self.filters.iter()
    }

    pub fn get(&self, dimension: Dimension) -> &FilterState {
        &self.filters[Self::position(dimension)]
    }

    pub fn get_mut(&mut self, dimension: Dimension) -> &mut FilterState {
        &mut self.filters[Self::position(dimension)]
    }

    pub fn set_select_all(&mut self, dimension: Dimension, select_all: bool) {
        self.get_mut(dimension).set_select_all(select_all);
    }

    pub fn set_explicit<I, S>(&mut self, dimension: Dimension, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.get_mut(dimension).set_explicit(values);
    }

    /// Resolves every filter against the full dataset.
    pub fn resolve(&self, dataset: &Dataset) -> Vec<ResolvedFilter> {
        self.filters
            .iter()
            .map(|f| f.resolve(&available_options(dataset, f.dimension)))
            .collect()
    }

    /// Strict validation of every filter against the dataset.
    pub fn validate(&self, dataset: &Dataset) -> Result<()> {
        for filter in &self.filters {
            filter.validate(&available_options(dataset, filter.dimension))?;
        }
        Ok(())
    }

    fn position(dimension: Dimension) -> usize {
        Dimension::ALL
            .iter()
            .position(|d| *d == dimension)
            .unwrap_or_default()
    }
}
