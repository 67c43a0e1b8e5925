//! Data source connectors for loading match datasets.
//!
//! Sources produce Arrow record batches, which are validated and converted
//! into typed [`Record`]s in one place ([`dataset_from_batches`]). Any missing
//! column or malformed value fails the whole load; there is no partial dataset.

use crate::dataset::{Dataset, Outcome, Record, Side, REQUIRED_COLUMNS};
use crate::prelude::*;
use arrow::array::{Array, ArrayRef, Int64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Schema};
use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::str::FromStr;

mod csv;
mod memory;

pub use csv::{CsvOptions, CsvSource};
pub use memory::MemorySource;

/// A source that can produce a validated [`Dataset`].
///
/// # Examples
///
/// ```rust,no_run
/// use rift_lens::sources::{CsvSource, DataSource};
///
/// # async fn example() -> rift_lens::prelude::Result<()> {
/// let source = CsvSource::new("LPL_regionalFinals_2024.csv");
/// let dataset = source.load().await?;
/// println!("{} rows", dataset.len());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait DataSource: Debug + Send + Sync {
    /// Reads and validates the whole source.
    async fn load(&self) -> Result<Dataset>;

    /// Key under which a loaded dataset is cached by the
    /// [`DatasetStore`](crate::store::DatasetStore).
    fn cache_key(&self) -> String;

    /// Returns a human-readable description of this data source.
    fn description(&self) -> String;
}

/// Converts Arrow batches into a validated dataset.
///
/// Every required column must exist in `schema` by exact header name. String
/// columns accept any Arrow type (values are rendered to text); stat columns
/// must hold non-null, non-negative integers. Remaining columns are carried as
/// text in [`Record::extra`].
pub fn dataset_from_batches(schema: &Schema, batches: &[RecordBatch]) -> Result<Dataset> {
    let available: Vec<String> = schema.fields().iter().map(|f| f.name().clone()).collect();
    for column in REQUIRED_COLUMNS {
        if !available.iter().any(|name| name == column) {
            return Err(LensError::MissingColumn {
                column: column.to_string(),
                available,
            });
        }
    }

    let mut records = Vec::with_capacity(batches.iter().map(|b| b.num_rows()).sum());
    let mut row_offset = 0;
    for batch in batches {
        records.extend(records_from_batch(batch, row_offset)?);
        row_offset += batch.num_rows();
    }

    Ok(Dataset::new(available, records))
}

fn records_from_batch(batch: &RecordBatch, row_offset: usize) -> Result<Vec<Record>> {
    let players = required_strings(batch, "Player", row_offset)?;
    let roles = required_strings(batch, "Role", row_offset)?;
    let teams = required_strings(batch, "Team", row_offset)?;
    let outcomes = parsed_values::<Outcome>(batch, "Outcome", row_offset)?;
    let sides = parsed_values::<Side>(batch, "Side", row_offset)?;
    let picks = optional_strings(batch, "Pick")?;
    let bans = optional_strings(batch, "Ban")?;
    let kills = stat_values(batch, "Kills", row_offset)?;
    let assists = stat_values(batch, "Assists", row_offset)?;
    let deaths = stat_values(batch, "Deaths", row_offset)?;

    let schema = batch.schema();
    let mut extras = Vec::new();
    for (idx, field) in schema.fields().iter().enumerate() {
        if !REQUIRED_COLUMNS.contains(&field.name().as_str()) {
            extras.push((field.name().clone(), text_values(batch.column(idx))?));
        }
    }

    let mut records = Vec::with_capacity(batch.num_rows());
    for i in 0..batch.num_rows() {
        let extra: BTreeMap<String, String> = extras
            .iter()
            .filter_map(|(name, values)| values[i].clone().map(|v| (name.clone(), v)))
            .collect();

        records.push(Record {
            player: players[i].clone(),
            role: roles[i].clone(),
            team: teams[i].clone(),
            outcome: outcomes[i],
            side: sides[i],
            pick: picks[i].clone(),
            ban: bans[i].clone(),
            kills: kills[i],
            assists: assists[i],
            deaths: deaths[i],
            extra,
        });
    }
    Ok(records)
}

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    batch.column_by_name(name).ok_or_else(|| LensError::MissingColumn {
        column: name.to_string(),
        available: batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect(),
    })
}

/// Renders any Arrow array as optional text, one entry per row.
fn text_values(array: &ArrayRef) -> Result<Vec<Option<String>>> {
    let utf8 = cast(array, &DataType::Utf8)?;
    let strings = utf8
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| LensError::Internal("cast to Utf8 did not yield a StringArray".into()))?;
    Ok((0..strings.len())
        .map(|i| {
            if strings.is_null(i) {
                None
            } else {
                Some(strings.value(i).trim().to_string())
            }
        })
        .collect())
}

fn optional_strings(batch: &RecordBatch, name: &str) -> Result<Vec<Option<String>>> {
    let values = text_values(column(batch, name)?)?;
    Ok(values
        .into_iter()
        .map(|v| v.filter(|s| !s.is_empty()))
        .collect())
}

fn required_strings(batch: &RecordBatch, name: &str, row_offset: usize) -> Result<Vec<String>> {
    text_values(column(batch, name)?)?
        .into_iter()
        .enumerate()
        .map(|(i, value)| match value {
            Some(v) if !v.is_empty() => Ok(v),
            _ => Err(LensError::schema(name, row_offset + i + 1, "missing value")),
        })
        .collect()
}

fn parsed_values<T>(batch: &RecordBatch, name: &str, row_offset: usize) -> Result<Vec<T>>
where
    T: FromStr<Err = String>,
{
    required_strings(batch, name, row_offset)?
        .iter()
        .enumerate()
        .map(|(i, v)| v.parse::<T>().map_err(|e| LensError::schema(name, row_offset + i + 1, e)))
        .collect()
}

/// Extracts a kills/assists/deaths column as non-negative integers.
fn stat_values(batch: &RecordBatch, name: &str, row_offset: usize) -> Result<Vec<u32>> {
    let array = column(batch, name)?;
    let row = |i: usize| row_offset + i + 1;

    match array.data_type() {
        dt if dt.is_integer() => {
            let widened = cast(array, &DataType::Int64)?;
            let ints = widened.as_any().downcast_ref::<Int64Array>().ok_or_else(|| {
                LensError::Internal("cast to Int64 did not yield an Int64Array".into())
            })?;
            (0..ints.len())
                .map(|i| {
                    if ints.is_null(i) {
                        return Err(LensError::schema(name, row(i), "missing value"));
                    }
                    u32::try_from(ints.value(i)).map_err(|_| {
                        LensError::schema(
                            name,
                            row(i),
                            format!("expected a non-negative integer, found {}", ints.value(i)),
                        )
                    })
                })
                .collect()
        }
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View | DataType::Null => {
            text_values(array)?
                .into_iter()
                .enumerate()
                .map(|(i, value)| match value {
                    None => Err(LensError::schema(name, row(i), "missing value")),
                    Some(v) => v.parse::<u32>().map_err(|_| {
                        LensError::schema(
                            name,
                            row(i),
                            format!("expected a non-negative integer, found '{v}'"),
                        )
                    }),
                })
                .collect()
        }
        other => Err(LensError::schema(
            name,
            row(0),
            format!("expected an integer column, found {other}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Float64Array, Int32Array};
    use arrow::datatypes::Field;
    use std::sync::Arc;

    fn schema_with(kills_type: DataType) -> Arc<Schema> {
        Arc::new(Schema::new(vec![
            Field::new("Player", DataType::Utf8, true),
            Field::new("Role", DataType::Utf8, true),
            Field::new("Team", DataType::Utf8, true),
            Field::new("Outcome", DataType::Utf8, true),
            Field::new("Side", DataType::Utf8, true),
            Field::new("Pick", DataType::Utf8, true),
            Field::new("Ban", DataType::Utf8, true),
            Field::new("Kills", kills_type, true),
            Field::new("Assists", DataType::Int64, true),
            Field::new("Deaths", DataType::Int64, true),
            Field::new("Patch", DataType::Utf8, true),
        ]))
    }

    fn batch(kills: ArrayRef, kills_type: DataType) -> RecordBatch {
        RecordBatch::try_new(
            schema_with(kills_type),
            vec![
                Arc::new(StringArray::from(vec!["Tarzan", "Xiaohu"])),
                Arc::new(StringArray::from(vec!["JUNGLE", "MID"])),
                Arc::new(StringArray::from(vec!["WBG", "WBG"])),
                Arc::new(StringArray::from(vec!["Win", "Loss"])),
                Arc::new(StringArray::from(vec!["Red", "Blue"])),
                Arc::new(StringArray::from(vec![Some("Lee Sin"), None])),
                Arc::new(StringArray::from(vec![Some("Ahri"), Some("")])),
                kills,
                Arc::new(Int64Array::from(vec![7, 2])),
                Arc::new(Int64Array::from(vec![1, 4])),
                Arc::new(StringArray::from(vec![Some("14.18"), None])),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_converts_typed_batch() {
        let batch = batch(Arc::new(Int32Array::from(vec![5, 0])), DataType::Int32);
        let dataset = dataset_from_batches(&batch.schema(), &[batch.clone()]).unwrap();

        assert_eq!(dataset.len(), 2);
        let first = &dataset.records()[0];
        assert_eq!(first.player, "Tarzan");
        assert_eq!(first.outcome, Outcome::Win);
        assert_eq!(first.side, Side::Red);
        assert_eq!(first.pick.as_deref(), Some("Lee Sin"));
        assert_eq!((first.kills, first.assists, first.deaths), (5, 7, 1));
        assert_eq!(first.extra.get("Patch").map(String::as_str), Some("14.18"));

        let second = &dataset.records()[1];
        assert_eq!(second.pick, None);
        assert_eq!(second.ban, None, "empty strings are treated as missing");
        assert!(second.extra.is_empty());
        assert_eq!(dataset.columns().last().map(String::as_str), Some("Patch"));
    }

    #[test]
    fn test_parses_numeric_text() {
        let batch = batch(Arc::new(StringArray::from(vec!["3", " 12 "])), DataType::Utf8);
        let dataset = dataset_from_batches(&batch.schema(), &[batch.clone()]).unwrap();
        assert_eq!(dataset.records()[1].kills, 12);
    }

    #[test]
    fn test_rejects_non_numeric_stat() {
        let batch = batch(Arc::new(StringArray::from(vec!["3", "many"])), DataType::Utf8);
        let err = dataset_from_batches(&batch.schema(), &[batch.clone()]).unwrap_err();
        match err {
            LensError::Schema { column, row, .. } => {
                assert_eq!(column, "Kills");
                assert_eq!(row, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_negative_stat() {
        let batch = batch(Arc::new(Int64Array::from(vec![-1, 2])), DataType::Int64);
        let err = dataset_from_batches(&batch.schema(), &[batch.clone()]).unwrap_err();
        assert!(matches!(err, LensError::Schema { row: 1, .. }));
    }

    #[test]
    fn test_rejects_null_stat() {
        let batch = batch(Arc::new(Int64Array::from(vec![Some(1), None])), DataType::Int64);
        let err = dataset_from_batches(&batch.schema(), &[batch.clone()]).unwrap_err();
        assert!(err.to_string().contains("missing value"));
    }

    #[test]
    fn test_rejects_float_stat() {
        let batch = batch(Arc::new(Float64Array::from(vec![1.5, 2.0])), DataType::Float64);
        let err = dataset_from_batches(&batch.schema(), &[batch.clone()]).unwrap_err();
        assert!(err.to_string().contains("expected an integer column"));
    }

    #[test]
    fn test_missing_column_fails_before_conversion() {
        let schema = Schema::new(vec![Field::new("Player", DataType::Utf8, true)]);
        let err = dataset_from_batches(&schema, &[]).unwrap_err();
        match err {
            LensError::MissingColumn { column, available } => {
                assert_eq!(column, "Role");
                assert_eq!(available, vec!["Player".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_header_only_schema_yields_empty_dataset() {
        let schema = schema_with(DataType::Utf8);
        let dataset = dataset_from_batches(&schema, &[]).unwrap();
        assert!(dataset.is_empty());
    }
}
