//! Conjunctive filtering of a dataset into a [`FilteredView`].

use crate::dataset::{Dataset, Record};
use crate::filters::{Dimension, ResolvedFilter};
use std::collections::{BTreeMap, BTreeSet};

/// Active values per dimension. Dimensions absent from the map do not constrain.
pub type Selections = BTreeMap<Dimension, BTreeSet<String>>;

/// Builds [`Selections`] from resolved filters.
pub fn selections_from(filters: &[ResolvedFilter]) -> Selections {
    filters
        .iter()
        .map(|f| (f.dimension, f.active.clone()))
        .collect()
}

/// Rows of a dataset that satisfy every active selection.
///
/// The view stores row indices into the borrowed dataset, so it is cheap to
/// build and never copies records.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    rows: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// A view over every row of `dataset`.
    pub fn all(dataset: &'a Dataset) -> Self {
        Self {
            dataset,
            rows: (0..dataset.len()).collect(),
        }
    }

    /// A view over the given row indices. Out-of-range indices are dropped.
    pub fn from_indices(dataset: &'a Dataset, rows: Vec<usize>) -> Self {
        let rows = rows.into_iter().filter(|&i| i < dataset.len()).collect();
        Self { dataset, rows }
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn row_indices(&self) -> &[usize] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates over the included records in dataset order.
    pub fn records(&self) -> impl Iterator<Item = &'a Record> + '_ {
        let dataset = self.dataset;
        self.rows.iter().filter_map(move |&i| dataset.get(i))
    }

    /// Copies the included records out of the dataset.
    pub fn to_records(&self) -> Vec<Record> {
        self.records().cloned().collect()
    }
}

/// Returns true if `record` satisfies every selection.
///
/// AND across dimensions, OR within a dimension's value set. An empty value
/// set matches nothing; there is no "empty means unfiltered" fallback.
pub fn matches(record: &Record, selections: &Selections) -> bool {
    selections
        .iter()
        .all(|(dimension, values)| values.contains(dimension.value_of(record)))
}

/// Applies `selections` to `dataset`.
///
/// # Examples
///
/// ```rust
/// use rift_lens::dataset::{Dataset, Record};
/// use rift_lens::filters::Dimension;
/// use rift_lens::query::{filter, Selections};
///
/// let dataset = Dataset::from_records(vec![
///     Record::builder("Tarzan").team("WBG").build(),
///     Record::builder("Knight").team("BLG").build(),
/// ]);
///
/// let mut selections = Selections::new();
/// selections.insert(Dimension::Team, ["WBG".to_string()].into_iter().collect());
///
/// let view = filter(&dataset, &selections);
/// assert_eq!(view.len(), 1);
/// ```
pub fn filter<'a>(dataset: &'a Dataset, selections: &Selections) -> FilteredView<'a> {
    if selections.values().any(BTreeSet::is_empty) {
        return FilteredView {
            dataset,
            rows: Vec::new(),
        };
    }

    let rows = dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, record)| matches(record, selections))
        .map(|(i, _)| i)
        .collect();

    FilteredView { dataset, rows }
}
