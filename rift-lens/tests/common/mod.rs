//! Shared helpers for rift-lens integration tests.

#![allow(dead_code)]

use rift_lens::dataset::{Dataset, Outcome, Record, Side};
use std::io::Write;
use tempfile::NamedTempFile;

pub const FINALS_HEADER: &str = "Player;Role;Team;Outcome;Side;Pick;Ban;Kills;Assists;Deaths";

/// A short semicolon-separated finals export.
pub const FINALS_CSV: &str = "\
Player;Role;Team;Outcome;Side;Pick;Ban;Kills;Assists;Deaths
Tarzan;JUNGLE;WBG;Win;Blue;Vi;Rell;4;9;1
Xiaohu;MID;WBG;Win;Blue;Azir;Ahri;5;6;1
Light;BOTTOM;WBG;Win;Blue;Varus;Jax;7;5;2
Weiwei;JUNGLE;LNG;Loss;Red;Sejuani;Vi;2;4;5
Scout;MID;LNG;Loss;Red;Ahri;Rumble;3;2;4
GALA;BOTTOM;LNG;Loss;Red;Kalista;Varus;2;3;3
Tarzan;JUNGLE;WBG;Loss;Red;Sejuani;Vi;2;5;3
Xiaohu;MID;WBG;Loss;Red;Ahri;Azir;3;3;2
Light;BOTTOM;WBG;Loss;Red;Kalista;;2;2;3
Weiwei;JUNGLE;LNG;Win;Blue;Vi;Sejuani;5;9;1
Scout;MID;LNG;Win;Blue;Azir;Ahri;6;7;0
GALA;BOTTOM;LNG;Win;Blue;Varus;Kalista;4;6;2
";

/// Writes `contents` to a temporary `.csv` file that lives as long as the handle.
pub fn write_csv(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("create temp csv");
    file.write_all(contents.as_bytes()).expect("write temp csv");
    file.flush().expect("flush temp csv");
    file
}

/// Installs a test subscriber once; later calls are no-ops.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("rift_lens=debug")
        .with_test_writer()
        .try_init();
}

pub fn game(player: &str, side: Side, outcome: Outcome) -> Record {
    Record::builder(player).side(side).outcome(outcome).build()
}

/// The three-row side win-rate scenario.
pub fn side_scenario() -> Dataset {
    Dataset::from_records(vec![
        game("A", Side::Red, Outcome::Win),
        game("A", Side::Red, Outcome::Loss),
        game("B", Side::Blue, Outcome::Win),
    ])
}
