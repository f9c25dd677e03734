//! Calendar arithmetic over instants.
//!
//! A [`Calendar`] answers day-level questions about `DateTime<Utc>` instants
//! in one IANA time zone: which local day an instant falls on, where that day
//! starts, and what instant results from shifting the local date by a signed
//! number of days, months, or years.
//!
//! Month and year shifts clamp to the last valid day of the resulting month
//! (Jan 31 + 1 month = Feb 28/29, Feb 29 + 1 year = Feb 28). The wall-clock
//! time of the input is preserved.
//!
//! # Functions
//!
//! - [`Calendar::add_unit`] — Shift by a signed amount of one unit
//! - [`Calendar::add_offset`] — Shift by an [`Offset`] (days, then months, then years)
//! - [`Calendar::start_of_day`] — Normalize an instant to local midnight
//! - [`component_diff`] — Decompose the gap between two dates into years, months, days

use std::fmt;

use chrono::{
    DateTime, Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, Offset as _,
    TimeZone, Utc,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TimestackError};

// ── Units and offsets ───────────────────────────────────────────────────────

/// A calendar unit that an amount can be added in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarUnit {
    Day,
    Month,
    Year,
}

impl CalendarUnit {
    /// Lowercase singular name ("day", "month", "year").
    pub fn singular(self) -> &'static str {
        match self {
            CalendarUnit::Day => "day",
            CalendarUnit::Month => "month",
            CalendarUnit::Year => "year",
        }
    }

    /// Lowercase plural name ("days", "months", "years").
    pub fn plural(self) -> &'static str {
        match self {
            CalendarUnit::Day => "days",
            CalendarUnit::Month => "months",
            CalendarUnit::Year => "years",
        }
    }

    /// Singular for a magnitude of one, plural otherwise.
    pub fn inflect(self, magnitude: u32) -> &'static str {
        if magnitude == 1 {
            self.singular()
        } else {
            self.plural()
        }
    }
}

impl fmt::Display for CalendarUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.singular())
    }
}

/// A signed calendar shift. Zero fields are absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Offset {
    pub days: i32,
    pub months: i32,
    pub years: i32,
}

impl Offset {
    pub fn new(days: i32, months: i32, years: i32) -> Self {
        Self {
            days,
            months,
            years,
        }
    }

    pub fn days(days: i32) -> Self {
        Self {
            days,
            ..Self::default()
        }
    }

    pub fn months(months: i32) -> Self {
        Self {
            months,
            ..Self::default()
        }
    }

    pub fn years(years: i32) -> Self {
        Self {
            years,
            ..Self::default()
        }
    }

    /// An offset of `amount` in a single `unit`.
    pub fn of(unit: CalendarUnit, amount: i32) -> Self {
        match unit {
            CalendarUnit::Day => Self::days(amount),
            CalendarUnit::Month => Self::months(amount),
            CalendarUnit::Year => Self::years(amount),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.days == 0 && self.months == 0 && self.years == 0
    }
}

/// The gap between two normalized dates, most significant unit first.
///
/// All components are non-negative; direction is carried separately.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ComponentDiff {
    pub years: u32,
    pub months: u32,
    pub days: u32,
}

impl ComponentDiff {
    pub fn is_zero(&self) -> bool {
        self.years == 0 && self.months == 0 && self.days == 0
    }
}

// ── Calendar ────────────────────────────────────────────────────────────────

/// The local calendar that day boundaries and date shifts are computed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    tz: Tz,
}

impl Default for Calendar {
    fn default() -> Self {
        Self::utc()
    }
}

impl Calendar {
    /// Build a calendar for an IANA time zone name (e.g. `"Europe/Berlin"`).
    ///
    /// # Errors
    ///
    /// Returns [`TimestackError::InvalidTimezone`] if the name is not a known
    /// IANA zone.
    pub fn new(timezone: &str) -> Result<Self> {
        let tz = timezone
            .trim()
            .parse::<Tz>()
            .map_err(|_| TimestackError::InvalidTimezone(format!("'{timezone}'")))?;
        Ok(Self { tz })
    }

    pub fn utc() -> Self {
        Self { tz: Tz::UTC }
    }

    pub fn with_timezone(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// The local calendar date an instant falls on.
    pub fn local_date(&self, date: DateTime<Utc>) -> NaiveDate {
        date.with_timezone(&self.tz).date_naive()
    }

    /// The instant at which the local day containing `date` begins.
    pub fn start_of_day(&self, date: DateTime<Utc>) -> DateTime<Utc> {
        let midnight = self.local_date(date).and_time(NaiveTime::MIN);
        self.resolve_local(midnight).unwrap_or(date)
    }

    /// Whether two instants fall on the same local calendar day.
    pub fn is_same_day(&self, a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
        self.local_date(a) == self.local_date(b)
    }

    /// The calendar-component gap between the local days of two instants.
    ///
    /// Order does not matter; the result is the absolute gap.
    pub fn components_between(&self, a: DateTime<Utc>, b: DateTime<Utc>) -> ComponentDiff {
        component_diff(self.local_date(a), self.local_date(b))
    }

    /// Add a signed amount of one calendar unit to an instant.
    ///
    /// A zero amount returns `date` unchanged. Days shift the local date by
    /// exactly `amount` days; months and years shift the month/year fields and
    /// clamp the day to the end of the resulting month.
    ///
    /// # Panics
    ///
    /// Panics if the result lies outside the range chrono can represent
    /// (hundreds of thousands of years away). Every in-range input succeeds.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use timestack_core::{Calendar, CalendarUnit};
    ///
    /// let calendar = Calendar::utc();
    /// let jan31 = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();
    /// let shifted = calendar.add_unit(jan31, CalendarUnit::Month, 1);
    /// assert_eq!(shifted, Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap());
    /// ```
    pub fn add_unit(&self, date: DateTime<Utc>, unit: CalendarUnit, amount: i32) -> DateTime<Utc> {
        match self.try_add_unit(date, unit, amount) {
            Ok(shifted) => shifted,
            Err(err) => panic!("calendar arithmetic produced no valid date: {err}"),
        }
    }

    /// Fallible form of [`Calendar::add_unit`].
    ///
    /// # Errors
    ///
    /// Returns [`TimestackError::OutOfRange`] if the shifted date cannot be
    /// represented.
    pub fn try_add_unit(
        &self,
        date: DateTime<Utc>,
        unit: CalendarUnit,
        amount: i32,
    ) -> Result<DateTime<Utc>> {
        if amount == 0 {
            return Ok(date);
        }

        let local = date.with_timezone(&self.tz).naive_local();
        let shifted = shift_date(local.date(), unit, amount)
            .map(|day| day.and_time(local.time()))
            .and_then(|naive| self.resolve_local(naive))
            .ok_or_else(|| {
                TimestackError::OutOfRange(format!(
                    "{} {:+} {}",
                    date.to_rfc3339(),
                    amount,
                    unit.plural()
                ))
            })?;

        Ok(shifted)
    }

    /// Apply an [`Offset`]: days first, then months, then years.
    ///
    /// The order matters for clamping: 2025-01-30 + {1 day, 1 month} is
    /// Jan 31 then Feb 28 here, while months-first would give Feb 28 then
    /// Mar 1.
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as [`Calendar::add_unit`].
    pub fn add_offset(&self, date: DateTime<Utc>, offset: Offset) -> DateTime<Utc> {
        let date = self.add_unit(date, CalendarUnit::Day, offset.days);
        let date = self.add_unit(date, CalendarUnit::Month, offset.months);
        self.add_unit(date, CalendarUnit::Year, offset.years)
    }

    /// Fallible form of [`Calendar::add_offset`].
    ///
    /// # Errors
    ///
    /// Returns [`TimestackError::OutOfRange`] if any intermediate date cannot
    /// be represented.
    pub fn try_add_offset(&self, date: DateTime<Utc>, offset: Offset) -> Result<DateTime<Utc>> {
        let date = self.try_add_unit(date, CalendarUnit::Day, offset.days)?;
        let date = self.try_add_unit(date, CalendarUnit::Month, offset.months)?;
        self.try_add_unit(date, CalendarUnit::Year, offset.years)
    }

    /// Map a local wall-clock time back to an instant.
    ///
    /// Ambiguous times (DST fall-back) resolve to the earlier instant. Times
    /// inside a DST gap are read with the offset in effect before the
    /// transition, which moves them forward by the length of the gap.
    fn resolve_local(&self, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
        if let Some(local) = self.tz.from_local_datetime(&naive).earliest() {
            return Some(local.with_timezone(&Utc));
        }

        let before = naive.checked_sub_signed(chrono::Duration::days(1))?;
        let offset = self.tz.offset_from_utc_datetime(&before).fix();
        let utc = naive.checked_sub_signed(chrono::Duration::seconds(i64::from(
            offset.local_minus_utc(),
        )))?;
        Some(Utc.from_utc_datetime(&utc))
    }
}

// ── Date-level helpers ──────────────────────────────────────────────────────

/// Shift a date by a signed amount of one unit, clamping month ends.
fn shift_date(date: NaiveDate, unit: CalendarUnit, amount: i32) -> Option<NaiveDate> {
    match unit {
        CalendarUnit::Day => {
            let days = Days::new(u64::from(amount.unsigned_abs()));
            if amount >= 0 {
                date.checked_add_days(days)
            } else {
                date.checked_sub_days(days)
            }
        }
        CalendarUnit::Month => shift_months(date, i64::from(amount)),
        CalendarUnit::Year => shift_months(date, i64::from(amount) * 12),
    }
}

fn shift_months(date: NaiveDate, months: i64) -> Option<NaiveDate> {
    let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        date.checked_add_months(magnitude)
    } else {
        date.checked_sub_months(magnitude)
    }
}

/// Decompose the gap between two dates into years, months, and days.
///
/// Months are counted as the largest whole number `m` such that
/// `earlier + m months` (clamped to month end) does not pass `later`; the
/// remainder is days. So Jan 31 → Feb 29 (leap year) is exactly one month,
/// while Jan 31 → Feb 28 of the same leap year is 28 days.
///
/// The arguments may be given in either order.
pub fn component_diff(a: NaiveDate, b: NaiveDate) -> ComponentDiff {
    let (from, to) = if a <= b { (a, b) } else { (b, a) };

    let mut months = i64::from(to.year() - from.year()) * 12 + i64::from(to.month())
        - i64::from(from.month());
    let mut anchor = shift_months(from, months).unwrap_or(from);
    // Landing in `to`'s month can overshoot by day-of-month; one step back
    // always lands at or before `to`.
    while months > 0 && anchor > to {
        months -= 1;
        anchor = shift_months(from, months).unwrap_or(from);
    }

    let days = to.signed_duration_since(anchor).num_days();

    ComponentDiff {
        years: (months / 12) as u32,
        months: (months % 12) as u32,
        days: days as u32,
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
