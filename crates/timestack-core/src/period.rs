//! Period items: the (base date, relative date, description) triples a
//! presentation layer lays out, built from the fixed presets and from the
//! user's stored intervals.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::calendar::{Calendar, Offset};
use crate::describe::describe;
use crate::interval::IntervalRecord;

// ── Presets ─────────────────────────────────────────────────────────────────

/// The fixed intervals offered for every base date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    OneYearAgo,
    OneYearFromNow,
    SevenDaysAgo,
    SevenDaysFromNow,
    ThreeMonthsAgo,
    ThreeMonthsFromNow,
}

impl Preset {
    /// All presets in display order.
    pub const ALL: [Preset; 6] = [
        Preset::OneYearAgo,
        Preset::OneYearFromNow,
        Preset::SevenDaysAgo,
        Preset::SevenDaysFromNow,
        Preset::ThreeMonthsAgo,
        Preset::ThreeMonthsFromNow,
    ];

    pub fn offset(self) -> Offset {
        match self {
            Preset::OneYearAgo => Offset::years(-1),
            Preset::OneYearFromNow => Offset::years(1),
            Preset::SevenDaysAgo => Offset::days(-7),
            Preset::SevenDaysFromNow => Offset::days(7),
            Preset::ThreeMonthsAgo => Offset::months(-3),
            Preset::ThreeMonthsFromNow => Offset::months(3),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Preset::OneYearAgo => "one year ago",
            Preset::OneYearFromNow => "one year from now",
            Preset::SevenDaysAgo => "seven days ago",
            Preset::SevenDaysFromNow => "seven days from now",
            Preset::ThreeMonthsAgo => "three months ago",
            Preset::ThreeMonthsFromNow => "three months from now",
        }
    }
}

// ── PeriodItem ──────────────────────────────────────────────────────────────

/// One rendered relationship between a base date and a date derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodItem {
    /// The date the user selected.
    pub base_date: DateTime<Utc>,
    /// The date the interval points to.
    pub relative_date: DateTime<Utc>,
    pub label: String,
    /// `relative_date` described against `base_date` ("the week before").
    pub description: String,
    /// Whether the item comes from a stored interval (and can be deleted).
    pub is_custom: bool,
    pub record_id: Option<Uuid>,
}

impl PeriodItem {
    pub fn for_preset(calendar: &Calendar, base: DateTime<Utc>, preset: Preset) -> Self {
        let relative_date = calendar.add_offset(base, preset.offset());
        Self {
            base_date: base,
            relative_date,
            label: preset.label().to_string(),
            description: describe(calendar, relative_date, base),
            is_custom: false,
            record_id: None,
        }
    }

    pub fn for_record(calendar: &Calendar, base: DateTime<Utc>, record: &IntervalRecord) -> Self {
        let relative_date = record.relative_to(calendar, base);
        Self {
            base_date: base,
            relative_date,
            label: record.label.clone(),
            description: describe(calendar, relative_date, base),
            is_custom: true,
            record_id: Some(record.id),
        }
    }
}

/// Items for a base date: stored intervals first, in the order given, then
/// every preset.
pub fn period_items(
    calendar: &Calendar,
    base: DateTime<Utc>,
    records: &[IntervalRecord],
) -> Vec<PeriodItem> {
    records
        .iter()
        .map(|record| PeriodItem::for_record(calendar, base, record))
        .chain(
            Preset::ALL
                .iter()
                .map(|preset| PeriodItem::for_preset(calendar, base, *preset)),
        )
        .collect()
}
