//! Per-player averages of kills, assists and deaths.

use super::{top_n_rows, Aggregate, AggregateRow, AggregateTable};
use crate::dataset::Record;
use crate::query::FilteredView;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Numeric columns that can be averaged per player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatColumn {
    Kills,
    Assists,
    Deaths,
}

impl StatColumn {
    pub fn column(&self) -> &'static str {
        match self {
            Self::Kills => "Kills",
            Self::Assists => "Assists",
            Self::Deaths => "Deaths",
        }
    }

    pub fn value_of(&self, record: &Record) -> u32 {
        match self {
            Self::Kills => record.kills,
            Self::Assists => record.assists,
            Self::Deaths => record.deaths,
        }
    }
}

/// Running sum and count for an arithmetic mean.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MeanState {
    /// Sum of all values.
    pub sum: u64,
    /// Number of values.
    pub count: u64,
}

impl MeanState {
    pub fn add(&mut self, value: u32) {
        self.sum += u64::from(value);
        self.count += 1;
    }

    /// Combines two partial states.
    pub fn merge(self, other: MeanState) -> MeanState {
        MeanState {
            sum: self.sum + other.sum,
            count: self.count + other.count,
        }
    }

    /// Calculates the mean value, or `None` if nothing was added.
    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum as f64 / self.count as f64)
        }
    }
}

/// The `n` players with the highest average of a stat column.
///
/// Groups only exist for players with at least one row in the view, so a
/// mean is always defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopMean {
    stat: StatColumn,
    n: usize,
}

impl TopMean {
    pub fn new(stat: StatColumn, n: usize) -> Self {
        Self { stat, n }
    }

    /// Mean of the stat per player, keyed by player name.
    pub fn group_means<'a>(&self, view: &FilteredView<'a>) -> BTreeMap<&'a str, MeanState> {
        let mut groups: BTreeMap<&'a str, MeanState> = BTreeMap::new();
        for record in view.records() {
            groups
                .entry(record.player.as_str())
                .or_default()
                .add(self.stat.value_of(record));
        }
        groups
    }
}

impl Aggregate for TopMean {
    fn key(&self) -> String {
        format!("top_{}", self.stat.column().to_lowercase())
    }

    fn title(&self) -> String {
        format!(
            "Top {} Players by Average {} (All Games)",
            self.n,
            self.stat.column()
        )
    }

    fn compute(&self, view: &FilteredView<'_>) -> AggregateTable {
        let rows = self
            .group_means(view)
            .into_iter()
            .filter_map(|(player, state)| state.mean().map(|m| AggregateRow::mean(player, m)))
            .collect();

        AggregateTable {
            key: self.key(),
            title: self.title(),
            category_label: "Player".to_string(),
            value_label: self.stat.column().to_string(),
            rows: top_n_rows(rows, self.n),
        }
    }
}
