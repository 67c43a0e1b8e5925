//! Frequency aggregates: side win-rate and top picks/bans.

use super::{top_n_rows, Aggregate, AggregateRow, AggregateTable};
use crate::dataset::{Record, Side};
use crate::query::FilteredView;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Counts occurrences of each distinct value.
///
/// Rows come back sorted by count descending, then value ascending.
pub fn value_counts<'a, I>(values: I) -> Vec<AggregateRow>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }
    let rows = counts
        .into_iter()
        .map(|(value, count)| AggregateRow::count(value, count))
        .collect::<Vec<_>>();
    let len = rows.len();
    top_n_rows(rows, len)
}

/// Outcome counts for games played on one side of the map.
///
/// Rows are ordered by outcome name (`Loss`, `Win`); a side with no games
/// yields an empty table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SideWinRate {
    side: Side,
}

impl SideWinRate {
    pub fn new(side: Side) -> Self {
        Self { side }
    }
}

impl Aggregate for SideWinRate {
    fn key(&self) -> String {
        format!("{}_side", self.side.as_str().to_lowercase())
    }

    fn title(&self) -> String {
        format!("Win rate based on {} side", self.side)
    }

    fn compute(&self, view: &FilteredView<'_>) -> AggregateTable {
        let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
        for record in view.records().filter(|r| r.side == self.side) {
            *counts.entry(record.outcome.as_str()).or_insert(0) += 1;
        }
        AggregateTable {
            key: self.key(),
            title: self.title(),
            category_label: "Outcome".to_string(),
            value_label: "count".to_string(),
            rows: counts
                .into_iter()
                .map(|(outcome, count)| AggregateRow::count(outcome, count))
                .collect(),
        }
    }
}

/// Categorical columns with frequency tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryColumn {
    Pick,
    Ban,
}

impl CategoryColumn {
    pub fn column(&self) -> &'static str {
        match self {
            Self::Pick => "Pick",
            Self::Ban => "Ban",
        }
    }

    /// Missing cells are skipped by frequency tables.
    pub fn value_of<'a>(&self, record: &'a Record) -> Option<&'a str> {
        match self {
            Self::Pick => record.pick.as_deref(),
            Self::Ban => record.ban.as_deref(),
        }
    }
}

/// The `n` most frequent values of a categorical column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopFrequency {
    column: CategoryColumn,
    n: usize,
}

impl TopFrequency {
    pub fn new(column: CategoryColumn, n: usize) -> Self {
        Self { column, n }
    }
}

impl Aggregate for TopFrequency {
    fn key(&self) -> String {
        match self.column {
            CategoryColumn::Pick => "top_picks".to_string(),
            CategoryColumn::Ban => "top_bans".to_string(),
        }
    }

    fn title(&self) -> String {
        match self.column {
            CategoryColumn::Pick => "Top picks".to_string(),
            CategoryColumn::Ban => "Most banned".to_string(),
        }
    }

    fn compute(&self, view: &FilteredView<'_>) -> AggregateTable {
        let mut rows = value_counts(view.records().filter_map(|r| self.column.value_of(r)));
        rows.truncate(self.n);
        AggregateTable {
            key: self.key(),
            title: self.title(),
            category_label: self.column.column().to_string(),
            value_label: "Count".to_string(),
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregates::AggregateValue;
    use crate::dataset::{Dataset, Outcome};

    fn game(player: &str, side: Side, outcome: Outcome) -> Record {
        Record::builder(player).side(side).outcome(outcome).build()
    }

    #[test]
    fn test_side_win_rate_scenario() {
        let dataset = Dataset::from_records(vec![
            game("A", Side::Red, Outcome::Win),
            game("A", Side::Red, Outcome::Loss),
            game("B", Side::Blue, Outcome::Win),
        ]);
        let view = FilteredView::all(&dataset);

        let red = SideWinRate::new(Side::Red).compute(&view);
        assert_eq!(red.key, "red_side");
        assert_eq!(red.title, "Win rate based on Red side");
        assert_eq!(
            red.rows,
            vec![AggregateRow::count("Loss", 1), AggregateRow::count("Win", 1)]
        );

        let blue = SideWinRate::new(Side::Blue).compute(&view);
        assert_eq!(blue.rows, vec![AggregateRow::count("Win", 1)]);
    }

    #[test]
    fn test_side_with_no_games_is_empty() {
        let dataset = Dataset::from_records(vec![game("A", Side::Blue, Outcome::Win)]);
        let red = SideWinRate::new(Side::Red).compute(&FilteredView::all(&dataset));
        assert!(red.is_empty());
    }

    #[test]
    fn test_value_counts_sorted() {
        let rows = value_counts(["Vi", "Azir", "Vi", "Rell", "Azir", "Vi"]);
        assert_eq!(
            rows,
            vec![
                AggregateRow::count("Vi", 3),
                AggregateRow::count("Azir", 2),
                AggregateRow::count("Rell", 1),
            ]
        );
    }

    #[test]
    fn test_top_picks_truncates_and_skips_missing() {
        let picks = ["Vi", "Vi", "Azir", "Rell", "Ahri", "Kalista", "Rumble"];
        let mut records: Vec<Record> = picks
            .iter()
            .map(|p| Record::builder("A").pick(*p).build())
            .collect();
        records.push(Record::builder("B").build());
        let dataset = Dataset::from_records(records);

        let table =
            TopFrequency::new(CategoryColumn::Pick, 5).compute(&FilteredView::all(&dataset));
        assert_eq!(table.title, "Top picks");
        assert_eq!(table.len(), 5);
        assert_eq!(table.rows[0], AggregateRow::count("Vi", 2));
        // Ties at count 1 are alphabetical: Ahri, Azir, Kalista, Rell (Rumble cut)
        let rest: Vec<_> = table.categories().skip(1).collect();
        assert_eq!(rest, vec!["Ahri", "Azir", "Kalista", "Rell"]);
        assert_eq!(table.get("Rumble"), None);
    }

    #[test]
    fn test_top_bans_fewer_than_n() {
        let dataset = Dataset::from_records(vec![
            Record::builder("A").ban("Rell").build(),
            Record::builder("B").ban("Rell").build(),
        ]);
        let table = TopFrequency::new(CategoryColumn::Ban, 5).compute(&FilteredView::all(&dataset));
        assert_eq!(table.key, "top_bans");
        assert_eq!(table.rows, vec![AggregateRow::count("Rell", 2)]);
        assert_eq!(table.get("Rell"), Some(AggregateValue::Count(2)));
    }
}
