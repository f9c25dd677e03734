//! # timestack-core
//!
//! Calendar offset arithmetic and natural-language date relationships.
//!
//! Given a base date and a target date (or a signed offset in days, months,
//! and years), this crate computes the target and renders how the two relate:
//! "the week before", "next month", "in 2 years". All functions take explicit
//! inputs; the current moment is injected through a [`Clock`].
//!
//! ## Modules
//!
//! - [`calendar`] — Start-of-day normalization, adding days/months/years with end-of-month clamping
//! - [`describe`] — Date-to-date and date-to-now descriptions, multi-field offset descriptions
//! - [`clock`] — Injected "now"
//! - [`interval`] — User-defined interval records and drafts
//! - [`period`] — Preset intervals and the period items a UI renders
//! - [`store`] — Interval persistence (in-memory and JSON file)
//! - [`config`] — Time zone and store settings
//! - [`error`] — Error types

pub mod calendar;
pub mod clock;
pub mod config;
pub mod describe;
pub mod error;
pub mod interval;
pub mod period;
pub mod store;

pub use calendar::{component_diff, Calendar, CalendarUnit, ComponentDiff, Offset};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use describe::{
    days_description, describe, describe_from_now, months_description, time_description,
    years_description, Describer,
};
pub use error::TimestackError;
pub use interval::{Chronology, IntervalDraft, IntervalRecord, IntervalUnit};
pub use period::{period_items, PeriodItem, Preset};
pub use store::{IntervalStore, JsonFileStore, MemoryStore};
