//! Prelude for commonly used types and traits in rift-lens.

pub use crate::aggregates::{AggregateSet, AggregateTable, AggregateValue};
pub use crate::config::DashboardConfig;
pub use crate::dataset::{Dataset, Outcome, Record, Side};
pub use crate::error::{ErrorContext, LensError, Result};
pub use crate::filters::{Dimension, Selection};
pub use crate::formatters::{FormatterConfig, SnapshotFormatter};
pub use crate::logging::LogConfig;
pub use crate::session::{DashboardSession, DashboardSnapshot};
pub use crate::sources::DataSource;
