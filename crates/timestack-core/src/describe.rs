//! Natural-language descriptions of the gap between two dates.
//!
//! Two vocabularies share one set of rules:
//!
//! - **relative to now** — "yesterday", "last week", "3 months ago",
//!   "in 2 years"; used for descriptions anchored to the present.
//! - **relative to a base date** — "the day before", "the week after",
//!   "3 months before"; used when comparing two arbitrary dates.
//!
//! Only the single most significant non-zero unit of the gap is reported
//! (years, then months, then days). [`time_description`] is the exception:
//! it renders every field of a user-authored [`Offset`].
//!
//! # Functions
//!
//! - [`describe`] — Describe a date relative to an arbitrary base date
//! - [`describe_from_now`] — Describe a date relative to an explicit "now"
//! - [`time_description`] — Describe every non-zero field of an offset
//! - [`days_description`], [`months_description`], [`years_description`] — Single-unit phrases

use chrono::{DateTime, Utc};

use crate::calendar::{Calendar, CalendarUnit, ComponentDiff, Offset};
use crate::clock::{Clock, SystemClock};

/// Which side of the anchor the described date lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Past,
    Future,
}

impl Direction {
    fn of_amount(amount: i32) -> Self {
        if amount < 0 {
            Direction::Past
        } else {
            Direction::Future
        }
    }
}

/// Which phrase set to render with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wording {
    RelativeToNow,
    RelativeToBase,
}

impl Wording {
    fn same_instant(self) -> &'static str {
        match self {
            Wording::RelativeToNow => "now",
            Wording::RelativeToBase => "same time",
        }
    }

    fn same_day(self, direction: Direction) -> &'static str {
        match (self, direction) {
            (Wording::RelativeToNow, Direction::Past) => "earlier today",
            (Wording::RelativeToNow, Direction::Future) => "later today",
            (Wording::RelativeToBase, Direction::Past) => "earlier that day",
            (Wording::RelativeToBase, Direction::Future) => "later that day",
        }
    }
}

// ── Date-to-date descriptions ───────────────────────────────────────────────

/// Describe `date` relative to an arbitrary `base` date.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use timestack_core::{describe, Calendar};
///
/// let calendar = Calendar::utc();
/// let base = Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap();
/// let target = Utc.with_ymd_and_hms(2025, 3, 3, 0, 0, 0).unwrap();
/// assert_eq!(describe(&calendar, target, base), "the week before");
/// ```
pub fn describe(calendar: &Calendar, date: DateTime<Utc>, base: DateTime<Utc>) -> String {
    describe_with(calendar, date, base, Wording::RelativeToBase)
}

/// Describe `date` relative to `now`.
///
/// `now` is an explicit argument so results are reproducible; see
/// [`Describer`] for a variant that reads it from a [`Clock`].
pub fn describe_from_now(calendar: &Calendar, date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    describe_with(calendar, date, now, Wording::RelativeToNow)
}

fn describe_with(
    calendar: &Calendar,
    date: DateTime<Utc>,
    anchor: DateTime<Utc>,
    wording: Wording,
) -> String {
    // Raw instants, before any normalization
    if date.signed_duration_since(anchor).num_milliseconds().abs() < 1000 {
        return wording.same_instant().to_string();
    }

    let direction = if date < anchor {
        Direction::Past
    } else {
        Direction::Future
    };

    if calendar.is_same_day(date, anchor) {
        return wording.same_day(direction).to_string();
    }

    let diff = calendar.components_between(date, anchor);
    match dominant_unit(&diff) {
        Some((unit, magnitude)) => unit_phrase(unit, magnitude, direction, wording),
        None => wording.same_instant().to_string(),
    }
}

/// The most significant non-zero unit of a gap.
fn dominant_unit(diff: &ComponentDiff) -> Option<(CalendarUnit, u32)> {
    if diff.years > 0 {
        Some((CalendarUnit::Year, diff.years))
    } else if diff.months > 0 {
        Some((CalendarUnit::Month, diff.months))
    } else if diff.days > 0 {
        Some((CalendarUnit::Day, diff.days))
    } else {
        None
    }
}

/// Render a non-zero magnitude of one unit.
fn unit_phrase(unit: CalendarUnit, magnitude: u32, direction: Direction, wording: Wording) -> String {
    use CalendarUnit::{Day, Month, Year};
    use Direction::{Future, Past};

    match wording {
        Wording::RelativeToNow => match (unit, magnitude, direction) {
            (Day, 1, Past) => "yesterday".to_string(),
            (Day, 1, Future) => "tomorrow".to_string(),
            (Day, 7, Past) => "last week".to_string(),
            (Day, 7, Future) => "next week".to_string(),
            (Month | Year, 1, Past) => format!("last {}", unit.singular()),
            (Month | Year, 1, Future) => format!("next {}", unit.singular()),
            (_, n, Past) => format!("{n} {} ago", unit.inflect(n)),
            (_, n, Future) => format!("in {n} {}", unit.inflect(n)),
        },
        Wording::RelativeToBase => {
            let relation = match direction {
                Past => "before",
                Future => "after",
            };
            match (unit, magnitude) {
                (Day, 7) => format!("the week {relation}"),
                (_, 1) => format!("the {} {relation}", unit.singular()),
                (_, n) => format!("{n} {} {relation}", unit.inflect(n)),
            }
        }
    }
}

// ── Offset descriptions ─────────────────────────────────────────────────────

/// Describe a signed number of days ("today", "tomorrow", "last week", "3 days ago").
pub fn days_description(days: i32) -> String {
    signed_phrase(CalendarUnit::Day, days, "today")
}

/// Describe a signed number of months ("this month", "next month", "in 3 months").
pub fn months_description(months: i32) -> String {
    signed_phrase(CalendarUnit::Month, months, "this month")
}

/// Describe a signed number of years ("this year", "last year", "in 2 years").
pub fn years_description(years: i32) -> String {
    signed_phrase(CalendarUnit::Year, years, "this year")
}

fn signed_phrase(unit: CalendarUnit, amount: i32, zero: &str) -> String {
    if amount == 0 {
        return zero.to_string();
    }
    unit_phrase(
        unit,
        amount.unsigned_abs(),
        Direction::of_amount(amount),
        Wording::RelativeToNow,
    )
}

/// Describe every non-zero field of an offset, days first.
///
/// Fields are joined with ", " and the final pair with " and ". An all-zero
/// offset is "now".
///
/// # Examples
///
/// ```
/// use timestack_core::{time_description, Offset};
///
/// assert_eq!(
///     time_description(Offset::new(10, 3, 1)),
///     "in 10 days, in 3 months and next year"
/// );
/// assert_eq!(time_description(Offset::default()), "now");
/// ```
pub fn time_description(offset: Offset) -> String {
    let mut parts = Vec::new();
    if offset.days != 0 {
        parts.push(days_description(offset.days));
    }
    if offset.months != 0 {
        parts.push(months_description(offset.months));
    }
    if offset.years != 0 {
        parts.push(years_description(offset.years));
    }

    match parts.split_last() {
        None => "now".to_string(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} and {}", rest.join(", "), last),
    }
}

// ── Describer ───────────────────────────────────────────────────────────────

/// A calendar plus a clock: the entry point a presentation layer holds on to.
#[derive(Debug, Clone, Default)]
pub struct Describer<C = SystemClock> {
    calendar: Calendar,
    clock: C,
}

impl Describer<SystemClock> {
    pub fn new(calendar: Calendar) -> Self {
        Self {
            calendar,
            clock: SystemClock,
        }
    }
}

impl<C: Clock> Describer<C> {
    pub fn with_clock(calendar: Calendar, clock: C) -> Self {
        Self { calendar, clock }
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// See [`describe`].
    pub fn describe(&self, date: DateTime<Utc>, base: DateTime<Utc>) -> String {
        describe(&self.calendar, date, base)
    }

    /// Describe `date` relative to the clock's current moment.
    pub fn describe_now(&self, date: DateTime<Utc>) -> String {
        describe_from_now(&self.calendar, date, self.clock.now())
    }

    /// See [`time_description`].
    pub fn time_description(&self, offset: Offset) -> String {
        time_description(offset)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
