//! Postcode infection dashboard
//!
//! Loads one GeoJSON dataset of per-postcode, per-day, per-source infection counts and
//! lets the user scrub through time, narrow to a rolling day window and pick sources.
//! The filtered postcode totals are exposed to an external map layer, which reports
//! hovered postcodes back.
//!
//! ## Module Organization
//!
//! - `days` - calendar-day parsing, formatting and arithmetic
//! - `dataset` - records, GeoJSON decoding, source and date-bound discovery
//! - `aggregator` - rolling-window, source-filtered case totals
//! - `state` - session state and the event reducer
//! - `view` - render-model projection for the presentation layer
//! - `bridge` - outbound view export and inbound hover channel to the map layer
//! - `fetch` - one-shot dataset loading
//! - `runtime` - single-owner event loop and timer ticks
//! - `config` - environment configuration
//! - `ui` - terminal dashboard

pub mod aggregator;
pub mod bridge;
pub mod config;
pub mod dataset;
pub mod days;
pub mod fetch;
pub mod runtime;
pub mod state;
pub mod ui;
pub mod view;

// Re-export commonly used types
pub use aggregator::{aggregate, FilteredView, SourceFilter, Window};
pub use dataset::{Dataset, InfectionRecord};
pub use runtime::Runtime;
pub use state::{reduce, Direction, Event, SessionState};
pub use view::{render_model, RenderModel};
