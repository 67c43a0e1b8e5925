//! # rift-lens - filter-and-aggregate core for match analytics dashboards
//!
//! rift-lens loads a season export of per-player game lines (one row per
//! player per game) and turns a set of categorical filter selections into the
//! summaries a dashboard renders: win counts by map side, the most picked and
//! banned champions, and the players with the best average kills, assists and
//! deaths.
//!
//! The pipeline has four stages:
//!
//! 1. [`store::DatasetStore`] loads a [`sources::DataSource`] once and shares
//!    the immutable [`dataset::Dataset`].
//! 2. [`filters::FilterSet`] holds one multi-value filter per
//!    [`filters::Dimension`], each with a "select all" mode.
//! 3. [`query::filter`] applies the resolved selections as a conjunction
//!    across dimensions, with OR within a dimension.
//! 4. [`aggregates::AggregateSet`] computes every table from the filtered
//!    view.
//!
//! [`session::DashboardSession`] ties the stages together for one user and
//! recomputes synchronously on every change.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rift_lens::prelude::*;
//!
//! # async fn example() -> rift_lens::prelude::Result<()> {
//! let config = DashboardConfig::default().with_data_path("LPL_regionalFinals_2024.csv");
//! let mut session = DashboardSession::open(config).await?;
//!
//! session.set_select_all(Dimension::Team, true);
//! session.set_explicit(Dimension::Role, ["JUNGLE", "MID"]);
//!
//! for row in &session.aggregates().top_kills.rows {
//!     println!("{}: {}", row.category, row.value);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Logging
//!
//! The crate emits `tracing` events and spans but never installs a
//! subscriber. Binaries can call [`logging::setup::init_logging`]; per-recompute
//! details are gated by [`logging::LogConfig`].

pub mod aggregates;
pub mod config;
pub mod dataset;
pub mod error;
pub mod filters;
pub mod formatters;
pub mod logging;
pub mod prelude;
pub mod query;
pub mod session;
pub mod sources;
pub mod store;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_fixtures;
