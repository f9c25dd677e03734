//! User-defined intervals.
//!
//! An [`IntervalRecord`] is what gets persisted: a signed magnitude of one
//! unit plus a label. The unit tag comes back from storage as a string, so
//! [`IntervalUnit`] keeps unrecognized tags as an explicit
//! [`IntervalUnit::Unknown`] case instead of failing the whole load.
//! Materializing an unknown-unit record yields the base date unchanged.
//!
//! An [`IntervalDraft`] is the not-yet-saved form a user edits: an unsigned
//! magnitude, a unit, and whether it points to the past or the future.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::calendar::{Calendar, CalendarUnit};
use crate::error::{Result, TimestackError};

// ── IntervalUnit ────────────────────────────────────────────────────────────

/// The unit tag of a stored interval.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IntervalUnit {
    Day,
    Month,
    Year,
    /// A tag this version does not recognize, kept verbatim.
    Unknown(String),
}

impl IntervalUnit {
    /// Read a stored tag. Matching is case-insensitive; anything else is
    /// [`IntervalUnit::Unknown`].
    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "day" => IntervalUnit::Day,
            "month" => IntervalUnit::Month,
            "year" => IntervalUnit::Year,
            _ => IntervalUnit::Unknown(tag.to_string()),
        }
    }

    pub fn as_calendar_unit(&self) -> Option<CalendarUnit> {
        match self {
            IntervalUnit::Day => Some(CalendarUnit::Day),
            IntervalUnit::Month => Some(CalendarUnit::Month),
            IntervalUnit::Year => Some(CalendarUnit::Year),
            IntervalUnit::Unknown(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            IntervalUnit::Day => "day",
            IntervalUnit::Month => "month",
            IntervalUnit::Year => "year",
            IntervalUnit::Unknown(tag) => tag,
        }
    }
}

impl From<CalendarUnit> for IntervalUnit {
    fn from(unit: CalendarUnit) -> Self {
        match unit {
            CalendarUnit::Day => IntervalUnit::Day,
            CalendarUnit::Month => IntervalUnit::Month,
            CalendarUnit::Year => IntervalUnit::Year,
        }
    }
}

impl From<String> for IntervalUnit {
    fn from(tag: String) -> Self {
        IntervalUnit::parse(&tag)
    }
}

impl From<IntervalUnit> for String {
    fn from(unit: IntervalUnit) -> Self {
        match unit {
            IntervalUnit::Unknown(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for IntervalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── IntervalRecord ──────────────────────────────────────────────────────────

/// A persisted user-defined interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalRecord {
    pub id: Uuid,
    pub label: String,
    pub unit: IntervalUnit,
    /// Negative for the past, positive for the future.
    pub magnitude: i32,
    pub created_at: DateTime<Utc>,
}

impl IntervalRecord {
    /// Create a record with a fresh v4 identifier.
    pub fn new(
        label: impl Into<String>,
        unit: impl Into<IntervalUnit>,
        magnitude: i32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
            unit: unit.into(),
            magnitude,
            created_at,
        }
    }

    /// The concrete date this interval points to from `base`.
    ///
    /// A record whose unit is [`IntervalUnit::Unknown`], or whose magnitude
    /// shifts `base` past the representable range, resolves to `base`.
    pub fn relative_to(&self, calendar: &Calendar, base: DateTime<Utc>) -> DateTime<Utc> {
        match self.unit.as_calendar_unit() {
            Some(unit) => match calendar.try_add_unit(base, unit, self.magnitude) {
                Ok(date) => date,
                Err(err) => {
                    warn!(
                        id = %self.id,
                        magnitude = self.magnitude,
                        error = %err,
                        "interval out of range, falling back to base date"
                    );
                    base
                }
            },
            None => {
                warn!(
                    id = %self.id,
                    unit = %self.unit,
                    "unrecognized interval unit, falling back to base date"
                );
                base
            }
        }
    }

    /// The concrete date this interval points to from its own creation time.
    pub fn anchored(&self, calendar: &Calendar) -> DateTime<Utc> {
        self.relative_to(calendar, self.created_at)
    }
}

// ── Drafts ──────────────────────────────────────────────────────────────────

/// Whether an interval points before or after its base date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chronology {
    #[default]
    Past,
    Future,
}

impl Chronology {
    /// "before" or "after".
    pub fn relation(self) -> &'static str {
        match self {
            Chronology::Past => "before",
            Chronology::Future => "after",
        }
    }

    fn sign(self) -> i64 {
        match self {
            Chronology::Past => -1,
            Chronology::Future => 1,
        }
    }
}

/// An interval being edited, before it is saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalDraft {
    pub magnitude: u32,
    pub unit: CalendarUnit,
    pub chronology: Chronology,
}

impl Default for IntervalDraft {
    fn default() -> Self {
        Self {
            magnitude: 1,
            unit: CalendarUnit::Day,
            chronology: Chronology::Past,
        }
    }
}

impl IntervalDraft {
    pub fn new(magnitude: u32, unit: CalendarUnit, chronology: Chronology) -> Self {
        Self {
            magnitude,
            unit,
            chronology,
        }
    }

    /// The magnitude with the chronology folded into its sign.
    ///
    /// # Errors
    ///
    /// Returns [`TimestackError::InvalidInterval`] if the magnitude does not
    /// fit a stored interval.
    pub fn signed_magnitude(&self) -> Result<i32> {
        let signed = self.chronology.sign() * i64::from(self.magnitude);
        i32::try_from(signed).map_err(|_| {
            TimestackError::InvalidInterval(format!(
                "magnitude {} {} is too large",
                self.magnitude,
                self.unit.plural()
            ))
        })
    }

    /// A preview line such as "3 days before March 10, 2025".
    pub fn preview(&self, calendar: &Calendar, base: DateTime<Utc>) -> String {
        let day = calendar.local_date(base);
        format!(
            "{} {} {} {}",
            self.magnitude,
            self.unit.inflect(self.magnitude),
            self.chronology.relation(),
            day.format("%B %-d, %Y")
        )
    }

    /// Turn the draft into a record ready to save.
    ///
    /// # Errors
    ///
    /// Returns [`TimestackError::InvalidInterval`] if the magnitude does not
    /// fit a stored interval, or if shifting `created_at` by it leaves the
    /// representable date range.
    pub fn into_record(
        self,
        label: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<IntervalRecord> {
        let magnitude = self.signed_magnitude()?;
        Calendar::utc()
            .try_add_unit(created_at, self.unit, magnitude)
            .map_err(|err| TimestackError::InvalidInterval(err.to_string()))?;
        Ok(IntervalRecord::new(label, self.unit, magnitude, created_at))
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    // ── IntervalUnit tests ──────────────────────────────────────────────

    #[test]
    fn test_unit_parse_known_tags() {
        assert_eq!(IntervalUnit::parse("day"), IntervalUnit::Day);
        assert_eq!(IntervalUnit::parse("Month"), IntervalUnit::Month);
        assert_eq!(IntervalUnit::parse(" YEAR "), IntervalUnit::Year);
    }

    #[test]
    fn test_unit_parse_unknown_keeps_tag() {
        let unit = IntervalUnit::parse("fortnight");
        assert_eq!(unit, IntervalUnit::Unknown("fortnight".to_string()));
        assert_eq!(unit.as_calendar_unit(), None);
        assert_eq!(String::from(unit), "fortnight");
    }

    #[test]
    fn test_unit_serializes_as_tag() {
        let json = serde_json::to_string(&IntervalUnit::Month).unwrap();
        assert_eq!(json, "\"month\"");
        let back: IntervalUnit = serde_json::from_str("\"week\"").unwrap();
        assert_eq!(back, IntervalUnit::Unknown("week".to_string()));
    }

    // ── IntervalRecord tests ────────────────────────────────────────────

    #[test]
    fn test_record_relative_to_base() {
        let cal = Calendar::utc();
        let record = IntervalRecord::new("Custom", CalendarUnit::Month, 1, utc(2025, 1, 1));
        assert_eq!(record.relative_to(&cal, utc(2024, 1, 31)), utc(2024, 2, 29));
    }

    #[test]
    fn test_record_negative_magnitude_points_to_past() {
        let cal = Calendar::utc();
        let record = IntervalRecord::new("Custom", CalendarUnit::Day, -7, utc(2025, 1, 1));
        assert_eq!(record.relative_to(&cal, utc(2025, 3, 10)), utc(2025, 3, 3));
    }

    #[test]
    fn test_record_unknown_unit_returns_base() {
        let cal = Calendar::utc();
        let record = IntervalRecord::new(
            "Corrupted",
            IntervalUnit::parse("hour"),
            5,
            utc(2025, 1, 1),
        );
        let base = utc(2025, 3, 10);
        assert_eq!(record.relative_to(&cal, base), base);
    }

    #[test]
    fn test_record_out_of_range_magnitude_returns_base() {
        let json = r#"{
            "id": "0d7e4b8a-3f2c-4a61-b5e9-7c1d2a3b4c5d",
            "label": "Far future",
            "unit": "year",
            "magnitude": 1000000,
            "created_at": "2025-01-01T00:00:00Z"
        }"#;
        let record: IntervalRecord = serde_json::from_str(json).unwrap();
        let base = utc(2025, 3, 10);
        assert_eq!(record.relative_to(&Calendar::utc(), base), base);
        assert_eq!(record.anchored(&Calendar::utc()), utc(2025, 1, 1));
    }

    #[test]
    fn test_record_anchored_uses_created_at() {
        let cal = Calendar::utc();
        let record = IntervalRecord::new("Custom", CalendarUnit::Year, 2, utc(2024, 2, 29));
        assert_eq!(record.anchored(&cal), utc(2026, 2, 28));
    }

    #[test]
    fn test_record_ids_are_unique() {
        let a = IntervalRecord::new("A", CalendarUnit::Day, 1, utc(2025, 1, 1));
        let b = IntervalRecord::new("A", CalendarUnit::Day, 1, utc(2025, 1, 1));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_record_deserializes_unknown_unit() {
        let json = r#"{
            "id": "6f1c2d1e-8a43-4c1b-9d4e-0e6b1a2f3c4d",
            "label": "Legacy",
            "unit": "quarter",
            "magnitude": 2,
            "created_at": "2025-01-01T00:00:00Z"
        }"#;
        let record: IntervalRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.unit, IntervalUnit::Unknown("quarter".to_string()));
        assert_eq!(record.magnitude, 2);
    }

    // ── IntervalDraft tests ─────────────────────────────────────────────

    #[test]
    fn test_draft_past_is_negative() {
        let draft = IntervalDraft::new(3, CalendarUnit::Day, Chronology::Past);
        assert_eq!(draft.signed_magnitude().unwrap(), -3);
    }

    #[test]
    fn test_draft_future_is_positive() {
        let draft = IntervalDraft::new(2, CalendarUnit::Year, Chronology::Future);
        assert_eq!(draft.signed_magnitude().unwrap(), 2);
    }

    #[test]
    fn test_draft_too_large_is_rejected() {
        let draft = IntervalDraft::new(u32::MAX, CalendarUnit::Day, Chronology::Future);
        let err = draft.signed_magnitude().unwrap_err().to_string();
        assert!(err.contains("Invalid interval"), "got: {err}");
    }

    #[test]
    fn test_draft_past_accepts_i32_min_magnitude() {
        let draft = IntervalDraft::new(1 << 31, CalendarUnit::Day, Chronology::Past);
        assert_eq!(draft.signed_magnitude().unwrap(), i32::MIN);
    }

    #[test]
    fn test_draft_unrepresentable_date_is_rejected() {
        let created = utc(2025, 3, 10);
        for chronology in [Chronology::Future, Chronology::Past] {
            let err = IntervalDraft::new(300_000, CalendarUnit::Year, chronology)
                .into_record("Too far", created)
                .unwrap_err()
                .to_string();
            assert!(err.contains("Invalid interval"), "got: {err}");
        }
    }

    #[test]
    fn test_draft_preview_inflects_unit() {
        let cal = Calendar::utc();
        let base = utc(2025, 3, 10);
        let plural = IntervalDraft::new(3, CalendarUnit::Day, Chronology::Past);
        assert_eq!(plural.preview(&cal, base), "3 days before March 10, 2025");
        let singular = IntervalDraft::new(1, CalendarUnit::Month, Chronology::Future);
        assert_eq!(singular.preview(&cal, base), "1 month after March 10, 2025");
    }

    #[test]
    fn test_draft_into_record() {
        let created = utc(2025, 3, 10);
        let record = IntervalDraft::new(6, CalendarUnit::Month, Chronology::Past)
            .into_record("Custom", created)
            .unwrap();
        assert_eq!(record.label, "Custom");
        assert_eq!(record.unit, IntervalUnit::Month);
        assert_eq!(record.magnitude, -6);
        assert_eq!(record.created_at, created);
    }
}
