//! In-memory Arrow source, used for embedding and tests.

use super::{dataset_from_batches, DataSource};
use crate::dataset::{Dataset, Record};
use crate::prelude::*;
use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::instrument;

/// A dataset held as Arrow record batches.
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    schema: SchemaRef,
    batches: Vec<RecordBatch>,
}

impl MemorySource {
    /// Creates a source from batches sharing `schema`.
    pub fn new(
        name: impl Into<String>,
        schema: SchemaRef,
        batches: Vec<RecordBatch>,
    ) -> Result<Self> {
        let name = name.into();
        if let Some(mismatch) = batches.iter().find(|b| b.schema() != schema) {
            return Err(LensError::data_load(
                &name,
                format!(
                    "batch schema does not match source schema ({} vs {} fields)",
                    mismatch.schema().fields().len(),
                    schema.fields().len()
                ),
            ));
        }
        Ok(Self {
            name,
            schema,
            batches,
        })
    }

    /// Creates a source from a single batch.
    pub fn from_batch(name: impl Into<String>, batch: RecordBatch) -> Self {
        Self {
            name: name.into(),
            schema: batch.schema(),
            batches: vec![batch],
        }
    }

    /// Encodes typed records as a single batch with the required columns.
    ///
    /// Text columns are `Utf8` (`Pick` and `Ban` nullable) and stat columns
    /// are `Int64`. Extra columns on the records are not carried over.
    pub fn from_records(name: impl Into<String>, records: Vec<Record>) -> Result<Self> {
        let text = |name: &str, nullable: bool| Field::new(name, DataType::Utf8, nullable);
        let stat = |name: &str| Field::new(name, DataType::Int64, false);
        let schema = Arc::new(Schema::new(vec![
            text("Player", false),
            text("Role", false),
            text("Team", false),
            text("Outcome", false),
            text("Side", false),
            text("Pick", true),
            text("Ban", true),
            stat("Kills"),
            stat("Assists"),
            stat("Deaths"),
        ]));

        let strings = |f: fn(&Record) -> &str| -> ArrayRef {
            Arc::new(StringArray::from_iter_values(records.iter().map(f)))
        };
        let optional = |f: fn(&Record) -> Option<&str>| -> ArrayRef {
            Arc::new(records.iter().map(f).collect::<StringArray>())
        };
        let stats = |f: fn(&Record) -> u32| -> ArrayRef {
            Arc::new(Int64Array::from_iter_values(
                records.iter().map(|r| i64::from(f(r))),
            ))
        };

        let columns = vec![
            strings(|r| r.player.as_str()),
            strings(|r| r.role.as_str()),
            strings(|r| r.team.as_str()),
            strings(|r| r.outcome.as_str()),
            strings(|r| r.side.as_str()),
            optional(|r| r.pick.as_deref()),
            optional(|r| r.ban.as_deref()),
            stats(|r| r.kills),
            stats(|r| r.assists),
            stats(|r| r.deaths),
        ];
        let batch = RecordBatch::try_new(schema, columns)?;
        Ok(Self::from_batch(name, batch))
    }
}

#[async_trait]
impl DataSource for MemorySource {
    #[instrument(skip(self), fields(source.type = "memory", source.name = %self.name))]
    async fn load(&self) -> Result<Dataset> {
        dataset_from_batches(&self.schema, &self.batches)
    }

    fn cache_key(&self) -> String {
        format!("memory:{}", self.name)
    }

    fn description(&self) -> String {
        format!(
            "In-memory table '{}' ({} batches)",
            self.name,
            self.batches.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Outcome, Side};

    fn player_only_batch() -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![Field::new("Player", DataType::Utf8, false)]));
        RecordBatch::try_new(schema, vec![Arc::new(StringArray::from(vec!["Tarzan"]))]).unwrap()
    }

    #[tokio::test]
    async fn test_missing_columns_fail_load() {
        let source = MemorySource::from_batch("partial", player_only_batch());
        let err = source.load().await.unwrap_err();
        assert!(matches!(err, LensError::MissingColumn { .. }));
    }

    #[test]
    fn test_rejects_mismatched_batches() {
        let other = Arc::new(Schema::new(vec![Field::new("Kills", DataType::Int64, false)]));
        let batch = RecordBatch::try_new(other, vec![Arc::new(Int64Array::from(vec![1]))]).unwrap();
        let err =
            MemorySource::new("mixed", player_only_batch().schema(), vec![batch]).unwrap_err();
        assert!(matches!(err, LensError::DataLoad { .. }));
    }

    #[tokio::test]
    async fn test_from_records_round_trips_through_arrow() -> Result<()> {
        let records = vec![
            Record::builder("Tarzan")
                .role("JUNGLE")
                .team("WBG")
                .side(Side::Red)
                .outcome(Outcome::Loss)
                .pick("Vi")
                .kda(3, 2, 7)
                .build(),
            Record::builder("Xiaohu").role("MID").team("WBG").ban("Azir").build(),
        ];
        let source = MemorySource::from_records("finals", records.clone())?;
        let dataset = source.load().await?;
        assert_eq!(dataset.records(), records.as_slice());
        Ok(())
    }

    #[test]
    fn test_cache_key_and_description() {
        let source = MemorySource::from_batch("finals", player_only_batch());
        assert_eq!(source.cache_key(), "memory:finals");
        assert_eq!(source.description(), "In-memory table 'finals' (1 batches)");
    }
}
