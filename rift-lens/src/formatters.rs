//! Rendering of dashboard snapshots.
//!
//! The dashboard's presentation layer is out of scope for this crate, but a
//! snapshot still needs to leave the process somehow: as JSON for a web
//! front end, as plain text for a terminal, or as Markdown for a report.
//!
//! # Examples
//!
//! ```rust
//! use rift_lens::config::DashboardConfig;
//! use rift_lens::dataset::{Dataset, Record};
//! use rift_lens::formatters::{HumanFormatter, SnapshotFormatter};
//! use rift_lens::session::DashboardSession;
//! use std::sync::Arc;
//!
//! let dataset = Arc::new(Dataset::from_records(vec![Record::builder("Tarzan").build()]));
//! let session = DashboardSession::new(dataset, DashboardConfig::select_all()).unwrap();
//! let output = HumanFormatter::new().format(&session.snapshot()).unwrap();
//! assert!(output.contains("Top picks"));
//! ```

use crate::aggregates::AggregateTable;
use crate::prelude::*;
use crate::session::DashboardSnapshot;
use std::fmt::{self, Write};

/// Configuration options for rendering snapshots.
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// Include the resolved filter state
    pub include_filters: bool,
    /// Include the filtered rows
    pub include_rows: bool,
    /// Maximum number of rows to render (`None` for all)
    pub max_rows: Option<usize>,
    /// Whether to use ANSI colors (human formatter only)
    pub use_colors: bool,
    /// Whether to include the generation timestamp
    pub include_timestamps: bool,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            include_filters: true,
            include_rows: true,
            max_rows: Some(20),
            use_colors: true,
            include_timestamps: true,
        }
    }
}

impl FormatterConfig {
    /// Only the aggregate tables.
    pub fn minimal() -> Self {
        Self {
            include_filters: false,
            include_rows: false,
            max_rows: Some(0),
            use_colors: false,
            include_timestamps: false,
        }
    }

    /// Everything, including every filtered row.
    pub fn detailed() -> Self {
        Self {
            include_filters: true,
            include_rows: true,
            max_rows: None,
            use_colors: true,
            include_timestamps: true,
        }
    }

    pub fn with_filters(mut self, include: bool) -> Self {
        self.include_filters = include;
        self
    }

    pub fn with_rows(mut self, include: bool) -> Self {
        self.include_rows = include;
        self
    }

    pub fn with_max_rows(mut self, max: Option<usize>) -> Self {
        self.max_rows = max;
        self
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    fn row_limit(&self, available: usize) -> usize {
        if !self.include_rows {
            return 0;
        }
        self.max_rows.map_or(available, |max| max.min(available))
    }
}

/// Renders a [`DashboardSnapshot`] into a string.
pub trait SnapshotFormatter {
    fn format(&self, snapshot: &DashboardSnapshot) -> Result<String>;

    /// Renders with an explicit configuration.
    ///
    /// The default implementation ignores `config`.
    fn format_with_config(
        &self,
        snapshot: &DashboardSnapshot,
        _config: &FormatterConfig,
    ) -> Result<String> {
        self.format(snapshot)
    }
}

/// Structured JSON output.
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    config: FormatterConfig,
    pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self {
            config: FormatterConfig::default(),
            pretty: true,
        }
    }

    pub fn with_config(config: FormatterConfig) -> Self {
        Self {
            config,
            pretty: true,
        }
    }

    /// Sets whether to use pretty-printed JSON.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotFormatter for JsonFormatter {
    fn format(&self, snapshot: &DashboardSnapshot) -> Result<String> {
        self.format_with_config(snapshot, &self.config)
    }

    fn format_with_config(
        &self,
        snapshot: &DashboardSnapshot,
        config: &FormatterConfig,
    ) -> Result<String> {
        let filtered = filter_snapshot_for_config(snapshot, config);
        let json = if self.pretty {
            serde_json::to_string_pretty(&filtered)
        } else {
            serde_json::to_string(&filtered)
        };
        Ok(json?)
    }
}

/// Plain-text output for terminals and logs.
#[derive(Debug, Clone)]
pub struct HumanFormatter {
    config: FormatterConfig,
}

impl HumanFormatter {
    pub fn new() -> Self {
        Self {
            config: FormatterConfig::default(),
        }
    }

    pub fn with_config(config: FormatterConfig) -> Self {
        Self { config }
    }
}

impl Default for HumanFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotFormatter for HumanFormatter {
    fn format(&self, snapshot: &DashboardSnapshot) -> Result<String> {
        self.format_with_config(snapshot, &self.config)
    }

    fn format_with_config(
        &self,
        snapshot: &DashboardSnapshot,
        config: &FormatterConfig,
    ) -> Result<String> {
        let mut output = String::new();
        write_human(&mut output, snapshot, config).map_err(render_error)?;
        Ok(output)
    }
}

fn write_human(
    out: &mut String,
    snapshot: &DashboardSnapshot,
    config: &FormatterConfig,
) -> fmt::Result {
    let (bold, reset) = if config.use_colors {
        ("\x1b[1m", "\x1b[0m")
    } else {
        ("", "")
    };

    writeln!(out, "{bold}{}{reset}", snapshot.title)?;
    writeln!(out, "Rows: {} of {}", snapshot.row_count, snapshot.total_rows)?;
    if let Some(at) = snapshot.generated_at.filter(|_| config.include_timestamps) {
        writeln!(out, "Generated: {}", at.to_rfc3339())?;
    }

    if config.include_filters {
        writeln!(out)?;
        writeln!(out, "Filters:")?;
        for filter in &snapshot.filters {
            let active = if filter.select_all {
                filter.select_all_label.clone()
            } else if filter.active.is_empty() {
                "(none)".to_string()
            } else {
                filter.active.iter().cloned().collect::<Vec<_>>().join(", ")
            };
            writeln!(out, "   {}: {active}", filter.label)?;
            if !filter.phantom_values.is_empty() {
                writeln!(
                    out,
                    "      not in data: {}",
                    filter.phantom_values.join(", ")
                )?;
            }
        }
    }

    for table in snapshot.aggregates.tables() {
        writeln!(out)?;
        writeln!(out, "{bold}{}{reset}", table.title)?;
        if table.is_empty() {
            writeln!(out, "   (no data)")?;
            continue;
        }
        let width = table
            .categories()
            .map(|c| c.chars().count())
            .chain(std::iter::once(table.category_label.chars().count()))
            .max()
            .unwrap_or_default();
        writeln!(out, "   {:<width$}  {}", table.category_label, table.value_label)?;
        for row in &table.rows {
            writeln!(out, "   {:<width$}  {}", row.category, row.value)?;
        }
    }

    let limit = config.row_limit(snapshot.rows.len());
    if limit > 0 {
        writeln!(out)?;
        writeln!(out, "Filtered rows:")?;
        for record in &snapshot.rows[..limit] {
            writeln!(
                out,
                "   {} ({}, {}) {} on {} side, {}/{}/{}",
                record.player,
                record.role,
                record.team,
                record.outcome,
                record.side,
                record.kills,
                record.deaths,
                record.assists
            )?;
        }
        if snapshot.rows.len() > limit {
            writeln!(out, "   ... and {} more rows", snapshot.rows.len() - limit)?;
        }
    }

    Ok(())
}

/// Markdown output for reports.
#[derive(Debug, Clone)]
pub struct MarkdownFormatter {
    config: FormatterConfig,
    heading_level: u8,
}

impl MarkdownFormatter {
    pub fn new() -> Self {
        Self {
            config: FormatterConfig::default(),
            heading_level: 2,
        }
    }

    pub fn with_config(config: FormatterConfig) -> Self {
        Self {
            config,
            heading_level: 2,
        }
    }

    /// Sets the base heading level for the output.
    pub fn with_heading_level(mut self, level: u8) -> Self {
        self.heading_level = level.clamp(1, 5);
        self
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotFormatter for MarkdownFormatter {
    fn format(&self, snapshot: &DashboardSnapshot) -> Result<String> {
        self.format_with_config(snapshot, &self.config)
    }

    fn format_with_config(
        &self,
        snapshot: &DashboardSnapshot,
        config: &FormatterConfig,
    ) -> Result<String> {
        let mut output = String::new();
        let h = "#".repeat(self.heading_level as usize);
        write_markdown(&mut output, &h, snapshot, config).map_err(render_error)?;
        Ok(output)
    }
}

fn write_markdown(
    out: &mut String,
    h: &str,
    snapshot: &DashboardSnapshot,
    config: &FormatterConfig,
) -> fmt::Result {
    writeln!(out, "{h} {}", snapshot.title)?;
    writeln!(out)?;
    writeln!(
        out,
        "**Rows:** {} of {}",
        snapshot.row_count, snapshot.total_rows
    )?;
    if let Some(at) = snapshot.generated_at.filter(|_| config.include_timestamps) {
        writeln!(out, "**Generated:** {}", at.to_rfc3339())?;
    }

    if config.include_filters {
        writeln!(out)?;
        writeln!(out, "{h}# Filters")?;
        writeln!(out)?;
        writeln!(out, "| Filter | Active |")?;
        writeln!(out, "|--------|--------|")?;
        for filter in &snapshot.filters {
            let active = if filter.select_all {
                "all".to_string()
            } else {
                filter.active.iter().cloned().collect::<Vec<_>>().join(", ")
            };
            writeln!(out, "| {} | {} |", filter.dimension, escape_cell(&active))?;
        }
    }

    for table in snapshot.aggregates.tables() {
        writeln!(out)?;
        write_markdown_table(out, h, table)?;
    }

    let limit = config.row_limit(snapshot.rows.len());
    if limit > 0 {
        writeln!(out)?;
        writeln!(out, "{h}# Filtered rows")?;
        writeln!(out)?;
        writeln!(
            out,
            "| Player | Role | Team | Outcome | Side | Pick | Ban | Kills | Assists | Deaths |"
        )?;
        writeln!(out, "|---|---|---|---|---|---|---|---|---|---|")?;
        for r in &snapshot.rows[..limit] {
            writeln!(
                out,
                "| {} | {} | {} | {} | {} | {} | {} | {} | {} | {} |",
                escape_cell(&r.player),
                escape_cell(&r.role),
                escape_cell(&r.team),
                r.outcome,
                r.side,
                escape_cell(r.pick.as_deref().unwrap_or("")),
                escape_cell(r.ban.as_deref().unwrap_or("")),
                r.kills,
                r.assists,
                r.deaths
            )?;
        }
        if snapshot.rows.len() > limit {
            writeln!(out)?;
            writeln!(out, "_{} more rows not shown_", snapshot.rows.len() - limit)?;
        }
    }

    Ok(())
}

fn write_markdown_table(out: &mut String, h: &str, table: &AggregateTable) -> fmt::Result {
    writeln!(out, "{h}# {}", table.title)?;
    writeln!(out)?;
    if table.is_empty() {
        writeln!(out, "_No data_")?;
        return Ok(());
    }
    writeln!(out, "| {} | {} |", table.category_label, table.value_label)?;
    writeln!(out, "|---|---|")?;
    for row in &table.rows {
        writeln!(out, "| {} | {} |", escape_cell(&row.category), row.value)?;
    }
    Ok(())
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}

fn render_error(e: fmt::Error) -> LensError {
    LensError::Internal(format!("Failed to render snapshot: {e}"))
}

/// Drops the parts of a snapshot the configuration excludes.
fn filter_snapshot_for_config(
    snapshot: &DashboardSnapshot,
    config: &FormatterConfig,
) -> DashboardSnapshot {
    let mut filtered = snapshot.clone();
    if !config.include_filters {
        filtered.filters.clear();
    }
    if !config.include_timestamps {
        filtered.generated_at = None;
    }
    filtered.rows.truncate(config.row_limit(snapshot.rows.len()));
    filtered
}
