//! Delimited file source implementation.

use super::{dataset_from_batches, DataSource};
use crate::dataset::Dataset;
use crate::prelude::*;
use arrow::datatypes::{DataType, Field, Schema};
use async_trait::async_trait;
use datafusion::error::DataFusionError;
use datafusion::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Options for reading a delimited match export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    /// Whether the file has a header row
    pub has_header: bool,
    /// Field delimiter (default: ';')
    pub delimiter: u8,
    /// Quote character (default: '"')
    pub quote: u8,
    /// Maximum records to read for schema inference
    pub schema_infer_max_records: usize,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            has_header: true,
            delimiter: b';',
            quote: b'"',
            schema_infer_max_records: 1000,
        }
    }
}

impl CsvOptions {
    /// Sets the field delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// A delimited file read through DataFusion's CSV reader.
///
/// # Examples
///
/// ```rust,no_run
/// use rift_lens::sources::{CsvOptions, CsvSource, DataSource};
///
/// # async fn example() -> rift_lens::prelude::Result<()> {
/// // Semicolon-separated export (the default)
/// let source = CsvSource::new("LPL_regionalFinals_2024.csv");
///
/// // Comma-separated export
/// let source = CsvSource::with_options(
///     "scrims.csv",
///     CsvOptions::default().with_delimiter(b','),
/// );
/// let dataset = source.load().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: String,
    options: CsvOptions,
}

impl CsvSource {
    /// Creates a new source with default options.
    pub fn new(path: impl Into<String>) -> Self {
        Self::with_options(path, CsvOptions::default())
    }

    /// Creates a new source with custom options.
    pub fn with_options(path: impl Into<String>, options: CsvOptions) -> Self {
        Self {
            path: path.into(),
            options,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn options(&self) -> &CsvOptions {
        &self.options
    }

    /// DataFusion filters listed files by extension, so it must match the path.
    fn file_extension(&self) -> String {
        Path::new(&self.path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default()
    }
}

#[async_trait]
impl DataSource for CsvSource {
    #[instrument(skip(self), fields(
        source.type = "csv",
        source.path = %self.path,
        csv.delimiter = %self.options.delimiter as char,
    ))]
    async fn load(&self) -> Result<Dataset> {
        let metadata = tokio::fs::metadata(&self.path).await.map_err(|e| {
            LensError::data_load_with_source(&self.path, "source is not readable", Box::new(e))
        })?;
        if !metadata.is_file() {
            return Err(LensError::data_load(&self.path, "source is not a regular file"));
        }

        let extension = self.file_extension();
        let extension = extension.as_str();
        let read_options = || {
            CsvReadOptions::new()
                .has_header(self.options.has_header)
                .delimiter(self.options.delimiter)
                .quote(self.options.quote)
                .schema_infer_max_records(self.options.schema_infer_max_records)
                .file_extension(extension)
        };
        let malformed = |e: DataFusionError| {
            LensError::data_load_with_source(&self.path, "malformed delimited file", Box::new(e))
        };

        // Inference only supplies the header names. Rows are read back as text
        // so that a bad stat value anywhere in the file is a schema error.
        let ctx = SessionContext::new();
        let inferred = ctx
            .read_csv(self.path.as_str(), read_options())
            .await
            .map_err(malformed)?;
        let schema = text_schema(inferred.schema().as_arrow());
        debug!(columns = schema.fields().len(), "Read source header");

        let df = ctx
            .read_csv(self.path.as_str(), read_options().schema(&schema))
            .await
            .map_err(malformed)?;
        let batches = df.collect().await.map_err(|e| {
            LensError::data_load_with_source(&self.path, "failed to read rows", Box::new(e))
        })?;

        let dataset = dataset_from_batches(&schema, &batches)?;
        info!(rows = dataset.len(), "Loaded CSV data source");
        Ok(dataset)
    }

    fn cache_key(&self) -> String {
        let canonical = std::fs::canonicalize(&self.path)
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| self.path.clone());
        format!(
            "csv:{canonical}:{}:{}",
            self.options.delimiter as char, self.options.has_header
        )
    }

    fn description(&self) -> String {
        format!(
            "CSV file '{}' (delimiter '{}')",
            self.path, self.options.delimiter as char
        )
    }
}

/// The same columns with every field as nullable text.
fn text_schema(inferred: &Schema) -> Schema {
    Schema::new(
        inferred
            .fields()
            .iter()
            .map(|f| Field::new(f.name(), DataType::Utf8, true))
            .collect::<Vec<_>>(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "Player;Role;Team;Outcome;Side;Pick;Ban;Kills;Assists;Deaths";

    fn write_temp(contents: &str, suffix: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        write!(file, "{contents}").unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_default_options_use_semicolon() {
        let options = CsvOptions::default();
        assert_eq!(options.delimiter, b';');
        assert!(options.has_header);
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(CsvSource::new("data/matches.csv").file_extension(), ".csv");
        assert_eq!(CsvSource::new("data/matches.txt").file_extension(), ".txt");
        assert_eq!(CsvSource::new("data/matches").file_extension(), "");
    }

    #[tokio::test]
    async fn test_load_semicolon_file() {
        let rows = "Tarzan;JUNGLE;WBG;Win;Red;Lee Sin;Ahri;3;9;1\n\
                    Xiaohu;MID;WBG;Loss;Blue;Azir;;2;4;3\n";
        let file = write_temp(&format!("{HEADER}\n{rows}"), ".csv");
        let source = CsvSource::new(file.path().to_str().unwrap());
        let dataset = source.load().await.unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records()[0].pick.as_deref(), Some("Lee Sin"));
        assert_eq!(dataset.records()[1].ban, None);
        assert_eq!(dataset.records()[1].deaths, 3);
    }

    #[tokio::test]
    async fn test_missing_file_is_data_load_error() {
        let source = CsvSource::new("/definitely/not/here.csv");
        let err = source.load().await.unwrap_err();
        assert!(matches!(err, LensError::DataLoad { .. }));
    }

    #[tokio::test]
    async fn test_wrong_delimiter_reports_missing_column() {
        let csv = HEADER.replace(';', ",") + "\nTarzan,JUNGLE,WBG,Win,Red,Lee Sin,Ahri,3,9,1\n";
        let file = write_temp(&csv, ".csv");
        let err = CsvSource::new(file.path().to_str().unwrap())
            .load()
            .await
            .unwrap_err();
        assert!(err.is_load_failure());
        assert!(matches!(err, LensError::MissingColumn { .. }));
    }

    #[test]
    fn test_cache_key_includes_options() {
        let semicolon = CsvSource::new("matches.csv");
        let comma =
            CsvSource::with_options("matches.csv", CsvOptions::default().with_delimiter(b','));
        assert_ne!(semicolon.cache_key(), comma.cache_key());
        assert!(semicolon.description().contains("';'"));
    }
}
