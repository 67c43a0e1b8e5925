//! Typed match records and the immutable dataset they live in.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Column headers every source must provide, in canonical order.
pub const REQUIRED_COLUMNS: [&str; 10] = [
    "Player", "Role", "Team", "Outcome", "Side", "Pick", "Ban", "Kills", "Assists", "Deaths",
];

/// Result of a game from the player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Outcome {
    Loss,
    Win,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loss => "Loss",
            Self::Win => "Win",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "win" => Ok(Self::Win),
            "loss" => Ok(Self::Loss),
            _ => Err(format!("expected 'Win' or 'Loss', found '{s}'")),
        }
    }
}

/// Map side the player's team started on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    Blue,
    Red,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blue => "Blue",
            Self::Red => "Red",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "red" => Ok(Self::Red),
            "blue" => Ok(Self::Blue),
            _ => Err(format!("expected 'Red' or 'Blue', found '{s}'")),
        }
    }
}

/// One row of the dataset: a single player's line for a single game.
///
/// `pick` and `ban` are optional because empty cells are common in draft
/// exports; frequency tables skip missing values. Columns beyond the required
/// set are carried in `extra` as text and never aggregated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub player: String,
    pub role: String,
    pub team: String,
    pub outcome: Outcome,
    pub side: Side,
    pub pick: Option<String>,
    pub ban: Option<String>,
    pub kills: u32,
    pub assists: u32,
    pub deaths: u32,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl Record {
    /// Starts building a record for the given player.
    ///
    /// ```rust
    /// use rift_lens::dataset::{Outcome, Record, Side};
    ///
    /// let record = Record::builder("Tarzan")
    ///     .role("JUNGLE")
    ///     .team("WBG")
    ///     .side(Side::Red)
    ///     .outcome(Outcome::Win)
    ///     .kills(4)
    ///     .build();
    /// assert_eq!(record.kills, 4);
    /// ```
    pub fn builder(player: impl Into<String>) -> RecordBuilder {
        RecordBuilder::new(player)
    }
}

/// Fluent builder for [`Record`], mostly useful for embedding and tests.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    record: Record,
}

impl RecordBuilder {
    fn new(player: impl Into<String>) -> Self {
        Self {
            record: Record {
                player: player.into(),
                role: String::new(),
                team: String::new(),
                outcome: Outcome::Win,
                side: Side::Blue,
                pick: None,
                ban: None,
                kills: 0,
                assists: 0,
                deaths: 0,
                extra: BTreeMap::new(),
            },
        }
    }

    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.record.role = role.into();
        self
    }

    pub fn team(mut self, team: impl Into<String>) -> Self {
        self.record.team = team.into();
        self
    }

    pub fn outcome(mut self, outcome: Outcome) -> Self {
        self.record.outcome = outcome;
        self
    }

    pub fn side(mut self, side: Side) -> Self {
        self.record.side = side;
        self
    }

    pub fn pick(mut self, pick: impl Into<String>) -> Self {
        self.record.pick = Some(pick.into());
        self
    }

    pub fn ban(mut self, ban: impl Into<String>) -> Self {
        self.record.ban = Some(ban.into());
        self
    }

    pub fn kills(mut self, kills: u32) -> Self {
        self.record.kills = kills;
        self
    }

    pub fn assists(mut self, assists: u32) -> Self {
        self.record.assists = assists;
        self
    }

    pub fn deaths(mut self, deaths: u32) -> Self {
        self.record.deaths = deaths;
        self
    }

    /// Sets kills, deaths and assists in the order they are usually quoted.
    pub fn kda(self, kills: u32, deaths: u32, assists: u32) -> Self {
        self.kills(kills).deaths(deaths).assists(assists)
    }

    pub fn extra(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.record.extra.insert(column.into(), value.into());
        self
    }

    pub fn build(self) -> Record {
        self.record
    }
}

/// An ordered, immutable sequence of records plus the source's column names.
///
/// A dataset is built once by a [`DataSource`](crate::sources::DataSource) or
/// [`Dataset::from_records`] and shared as `Arc<Dataset>` afterwards. There is
/// no mutation API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl Dataset {
    /// Creates a dataset from records and the column names they were read from.
    pub fn new(columns: Vec<String>, records: Vec<Record>) -> Self {
        Self { columns, records }
    }

    /// Creates a dataset whose columns are the required set plus any extra
    /// columns found on the records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut columns: Vec<String> = REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
        let mut extras: Vec<&String> = records.iter().flat_map(|r| r.extra.keys()).collect();
        extras.sort();
        extras.dedup();
        columns.extend(extras.into_iter().cloned());
        Self { columns, records }
    }

    /// Creates a dataset with the required columns and no rows.
    pub fn empty() -> Self {
        Self::from_records(Vec::new())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
