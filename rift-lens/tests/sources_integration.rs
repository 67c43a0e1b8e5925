//! Loading season exports from disk.

mod common;

use common::{write_csv, FINALS_CSV, FINALS_HEADER};
use rift_lens::prelude::*;
use rift_lens::sources::{CsvOptions, CsvSource};
use rift_lens::store::DatasetStore;
use std::sync::Arc;

#[tokio::test]
async fn test_load_semicolon_export() -> Result<()> {
    common::init_test_logging();
    let file = write_csv(FINALS_CSV);
    let dataset = CsvSource::new(file.path().to_string_lossy()).load().await?;

    assert_eq!(dataset.len(), 12);
    assert_eq!(dataset.columns().len(), 10);

    let first = &dataset.records()[0];
    assert_eq!(first.player, "Tarzan");
    assert_eq!(first.side, Side::Blue);
    assert_eq!(first.outcome, Outcome::Win);
    assert_eq!(first.pick.as_deref(), Some("Vi"));
    assert_eq!((first.kills, first.assists, first.deaths), (4, 9, 1));

    // Empty Ban cell becomes a missing value
    assert_eq!(dataset.records()[8].ban, None);
    Ok(())
}

#[tokio::test]
async fn test_extra_columns_are_carried() -> Result<()> {
    let csv = "Game;Player;Role;Team;Outcome;Side;Pick;Ban;Kills;Assists;Deaths;Patch\n\
               1;Tarzan;JUNGLE;WBG;Win;Red;Vi;Rell;4;9;1;14.18\n";
    let file = write_csv(csv);
    let dataset = CsvSource::new(file.path().to_string_lossy()).load().await?;

    let record = &dataset.records()[0];
    assert_eq!(record.extra.get("Game").map(String::as_str), Some("1"));
    assert_eq!(record.extra.get("Patch").map(String::as_str), Some("14.18"));
    assert_eq!(dataset.columns()[0], "Game");
    Ok(())
}

#[tokio::test]
async fn test_missing_required_column() {
    let csv = "Player;Role;Team;Outcome;Side;Pick;Kills;Assists;Deaths\n\
               Tarzan;JUNGLE;WBG;Win;Red;Vi;4;9;1\n";
    let file = write_csv(csv);
    let err = CsvSource::new(file.path().to_string_lossy())
        .load()
        .await
        .unwrap_err();

    match err {
        LensError::MissingColumn { column, available } => {
            assert_eq!(column, "Ban");
            assert!(available.contains(&"Pick".to_string()));
        }
        other => panic!("expected MissingColumn, got {other:?}"),
    }
}

#[tokio::test]
async fn test_wrong_delimiter_is_a_load_failure() {
    let file = write_csv(FINALS_CSV);
    let source = CsvSource::with_options(
        file.path().to_string_lossy(),
        CsvOptions::default().with_delimiter(b','),
    );
    let err = source.load().await.unwrap_err();
    assert!(err.is_load_failure());
    assert!(matches!(err, LensError::MissingColumn { .. }));
}

#[tokio::test]
async fn test_non_numeric_stat_is_a_schema_error() {
    let csv = format!("{FINALS_HEADER}\nTarzan;JUNGLE;WBG;Win;Red;Vi;Rell;four;9;1\n");
    let file = write_csv(&csv);
    let err = CsvSource::new(file.path().to_string_lossy())
        .load()
        .await
        .unwrap_err();
    assert!(err.is_load_failure());
    assert!(
        matches!(err, LensError::Schema { ref column, .. } if column == "Kills"),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn test_bad_stat_past_the_inference_window_names_column_and_row() {
    let good = "Tarzan;JUNGLE;WBG;Win;Red;Vi;Rell;4;9;1\n".repeat(5);
    let csv = format!("{FINALS_HEADER}\n{good}Xiaohu;MID;WBG;Win;Red;Azir;Ahri;four;6;1\n");
    let file = write_csv(&csv);
    let source = CsvSource::with_options(
        file.path().to_string_lossy(),
        CsvOptions {
            schema_infer_max_records: 3,
            ..CsvOptions::default()
        },
    );

    let err = source.load().await.unwrap_err();
    match err {
        LensError::Schema { column, row, .. } => {
            assert_eq!(column, "Kills");
            assert_eq!(row, 6);
        }
        other => panic!("expected Schema, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unknown_side_is_a_schema_error() {
    let csv = format!("{FINALS_HEADER}\nTarzan;JUNGLE;WBG;Win;Purple;Vi;Rell;4;9;1\n");
    let file = write_csv(&csv);
    let err = CsvSource::new(file.path().to_string_lossy())
        .load()
        .await
        .unwrap_err();
    assert!(matches!(err, LensError::Schema { ref column, .. } if column == "Side"));
}

#[tokio::test]
async fn test_missing_file_is_a_data_load_error() {
    let err = CsvSource::new("/definitely/not/here.csv")
        .load()
        .await
        .unwrap_err();
    assert!(matches!(err, LensError::DataLoad { .. }));
}

#[tokio::test]
async fn test_store_parses_each_file_once() -> Result<()> {
    let file = write_csv(FINALS_CSV);
    let store = DatasetStore::new();
    let source = CsvSource::new(file.path().to_string_lossy());

    let first = store.load(&source).await?;
    let second = store.load(&source).await?;
    assert!(Arc::ptr_eq(&first, &second));

    // Same file read with different options is a different dataset
    let other = CsvSource::with_options(
        file.path().to_string_lossy(),
        CsvOptions {
            schema_infer_max_records: 10,
            ..CsvOptions::default()
        },
    );
    assert_eq!(source.cache_key(), other.cache_key());
    let third = store.load(&other).await?;
    assert!(Arc::ptr_eq(&first, &third));
    assert_eq!(store.len().await, 1);
    Ok(())
}

#[tokio::test]
async fn test_failed_load_can_be_retried() -> Result<()> {
    let mut file = write_csv("Player;Role\nTarzan;JUNGLE\n");
    let store = DatasetStore::new();
    let source = CsvSource::new(file.path().to_string_lossy());
    assert!(store.load(&source).await.is_err());

    use std::io::{Seek, SeekFrom, Write};
    file.as_file_mut().set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    file.write_all(FINALS_CSV.as_bytes())?;
    file.flush()?;

    let dataset = store.load(&source).await?;
    assert_eq!(dataset.len(), 12);
    Ok(())
}
