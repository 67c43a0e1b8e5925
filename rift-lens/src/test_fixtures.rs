//! Sample data for tests and benchmarks.
//!
//! [`SAMPLE_CSV`] is a small semicolon-separated export shaped like a
//! regional finals season file; [`synthetic_records`] generates larger
//! deterministic datasets for benchmarks.

use crate::dataset::{Dataset, Outcome, Record, Side};

/// Two games of a best-of series, ten player lines each, plus an extra
/// `Game` column that is carried but never aggregated.
pub const SAMPLE_CSV: &str = "\
Game;Player;Role;Team;Outcome;Side;Pick;Ban;Kills;Assists;Deaths
1;Breathe;TOP;WBG;Win;Blue;Rumble;Kalista;3;7;2
1;Tarzan;JUNGLE;WBG;Win;Blue;Vi;Rell;4;9;1
1;Xiaohu;MID;WBG;Win;Blue;Azir;Ahri;5;6;1
1;Light;BOTTOM;WBG;Win;Blue;Varus;Jax;7;5;2
1;Crisp;SUPPORT;WBG;Win;Blue;Rakan;Renata Glasc;1;12;3
1;Zika;TOP;LNG;Loss;Red;Ksante;Azir;1;3;4
1;Weiwei;JUNGLE;LNG;Loss;Red;Sejuani;Vi;2;4;5
1;Scout;MID;LNG;Loss;Red;Ahri;Rumble;3;2;4
1;GALA;BOTTOM;LNG;Loss;Red;Kalista;Varus;2;3;3
1;Hang;SUPPORT;LNG;Loss;Red;Rell;Rakan;0;6;4
2;Breathe;TOP;WBG;Loss;Red;Jax;Ksante;1;2;4
2;Tarzan;JUNGLE;WBG;Loss;Red;Sejuani;Vi;2;5;3
2;Xiaohu;MID;WBG;Loss;Red;Ahri;Azir;3;3;2
2;Light;BOTTOM;WBG;Loss;Red;Kalista;Varus;2;2;3
2;Crisp;SUPPORT;WBG;Loss;Red;Rell;Rakan;0;6;5
2;Zika;TOP;LNG;Win;Blue;Rumble;Jax;3;8;1
2;Weiwei;JUNGLE;LNG;Win;Blue;Vi;Sejuani;5;9;1
2;Scout;MID;LNG;Win;Blue;Azir;Ahri;6;7;0
2;GALA;BOTTOM;LNG;Win;Blue;Varus;Kalista;4;6;2
2;Hang;SUPPORT;LNG;Win;Blue;Rakan;;1;11;1
";

/// Header names of [`SAMPLE_CSV`] in file order.
pub fn sample_columns() -> Vec<String> {
    SAMPLE_CSV
        .lines()
        .next()
        .unwrap_or_default()
        .split(';')
        .map(str::to_string)
        .collect()
}

/// The typed records [`SAMPLE_CSV`] should load into.
pub fn sample_records() -> Vec<Record> {
    SAMPLE_CSV
        .lines()
        .skip(1)
        .filter_map(|line| {
            let cells: Vec<&str> = line.split(';').collect();
            let [game, player, role, team, outcome, side, pick, ban, kills, assists, deaths] =
                cells.as_slice()
            else {
                return None;
            };
            let mut builder = Record::builder(*player)
                .role(*role)
                .team(*team)
                .outcome(outcome.parse().ok()?)
                .side(side.parse().ok()?)
                .kills(kills.parse().ok()?)
                .assists(assists.parse().ok()?)
                .deaths(deaths.parse().ok()?)
                .extra("Game", *game);
            if !pick.is_empty() {
                builder = builder.pick(*pick);
            }
            if !ban.is_empty() {
                builder = builder.ban(*ban);
            }
            Some(builder.build())
        })
        .collect()
}

/// [`sample_records`] as a dataset with the file's column order.
pub fn sample_dataset() -> Dataset {
    Dataset::new(sample_columns(), sample_records())
}

const PLAYERS: [(&str, &str, &str); 10] = [
    ("Breathe", "TOP", "WBG"),
    ("Tarzan", "JUNGLE", "WBG"),
    ("Xiaohu", "MID", "WBG"),
    ("Light", "BOTTOM", "WBG"),
    ("Crisp", "SUPPORT", "WBG"),
    ("Zika", "TOP", "LNG"),
    ("Weiwei", "JUNGLE", "LNG"),
    ("Scout", "MID", "LNG"),
    ("GALA", "BOTTOM", "LNG"),
    ("Hang", "SUPPORT", "LNG"),
];

const CHAMPIONS: [&str; 12] = [
    "Ahri", "Azir", "Jax", "Kalista", "Ksante", "Rakan", "Rell", "Rumble", "Sejuani", "Varus",
    "Vi", "Renata Glasc",
];

/// `games` deterministic games of ten player lines each.
///
/// The same arguments always produce the same records.
pub fn synthetic_records(games: usize) -> Vec<Record> {
    let mut records = Vec::with_capacity(games * PLAYERS.len());
    for game in 0..games {
        let wbg_blue = game % 2 == 0;
        let wbg_wins = game % 3 != 0;
        for (slot, (player, role, team)) in PLAYERS.iter().enumerate() {
            let is_wbg = *team == "WBG";
            let side = if is_wbg == wbg_blue { Side::Blue } else { Side::Red };
            let outcome = if is_wbg == wbg_wins {
                Outcome::Win
            } else {
                Outcome::Loss
            };
            let seed = game * 31 + slot * 7;
            records.push(
                Record::builder(*player)
                    .role(*role)
                    .team(*team)
                    .side(side)
                    .outcome(outcome)
                    .pick(CHAMPIONS[seed % CHAMPIONS.len()])
                    .ban(CHAMPIONS[(seed / 3 + slot) % CHAMPIONS.len()])
                    .kda((seed % 9) as u32, (seed % 5) as u32, (seed % 13) as u32)
                    .build(),
            );
        }
    }
    records
}
