//! Calendar slot resolution: season, day type, and time-of-use block for a
//! civil timestamp.
//!
//! The block matrices are the utility's published schedule. Every Monday to
//! Friday counts as a weekday; there is no public-holiday calendar in this
//! version, so holidays are billed on the weekday schedule.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

/// Tariff season. High season is June, July, and August.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    High,
    Low,
    /// Applies in every season (ancillary components).
    All,
}

/// Time-of-use block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouBlock {
    Peak,
    Standard,
    OffPeak,
    /// Applies in every block (ancillary components).
    All,
}

/// Billing day type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayType {
    Weekday,
    Saturday,
    Sunday,
}

/// A half-open [start, end) window in minutes since midnight.
type Window = (u32, u32, TouBlock);

const HIGH_WEEKDAY: &[Window] = &[
    (6 * 60, 8 * 60, TouBlock::Peak),
    (17 * 60, 20 * 60, TouBlock::Peak),
    (8 * 60, 17 * 60, TouBlock::Standard),
    (20 * 60, 22 * 60, TouBlock::Standard),
];

const HIGH_SATURDAY: &[Window] = &[(7 * 60, 12 * 60, TouBlock::Standard)];

const HIGH_SUNDAY: &[Window] = &[(17 * 60, 19 * 60, TouBlock::Standard)];

const LOW_WEEKDAY: &[Window] = &[
    (7 * 60, 9 * 60, TouBlock::Peak),
    (18 * 60, 21 * 60, TouBlock::Peak),
    (6 * 60, 7 * 60, TouBlock::Standard),
    (9 * 60, 18 * 60, TouBlock::Standard),
    (21 * 60, 23 * 60, TouBlock::Standard),
];

const LOW_SATURDAY: &[Window] = &[
    (7 * 60, 12 * 60, TouBlock::Standard),
    (18 * 60, 20 * 60, TouBlock::Standard),
];

const LOW_SUNDAY: &[Window] = &[(18 * 60, 20 * 60, TouBlock::Standard)];

/// Season of a timestamp: high for June/July/August, low otherwise.
pub fn season(ts: NaiveDateTime) -> Season {
    match ts.month() {
        6..=8 => Season::High,
        _ => Season::Low,
    }
}

/// Billing day type of a timestamp.
pub fn day_type(ts: NaiveDateTime) -> DayType {
    match ts.weekday() {
        Weekday::Sat => DayType::Saturday,
        Weekday::Sun => DayType::Sunday,
        _ => DayType::Weekday,
    }
}

/// Time-of-use block for a timestamp. Falls back to off-peak where no
/// window matches.
pub fn tou_block(ts: NaiveDateTime) -> TouBlock {
    let windows = match (season(ts), day_type(ts)) {
        (Season::High, DayType::Weekday) => HIGH_WEEKDAY,
        (Season::High, DayType::Saturday) => HIGH_SATURDAY,
        (Season::High, DayType::Sunday) => HIGH_SUNDAY,
        (Season::Low, DayType::Weekday) => LOW_WEEKDAY,
        (Season::Low, DayType::Saturday) => LOW_SATURDAY,
        (Season::Low, DayType::Sunday) => LOW_SUNDAY,
        // `season` never returns `All`.
        (Season::All, _) => return TouBlock::OffPeak,
    };
    let minute = ts.hour() * 60 + ts.minute();
    windows
        .iter()
        .find(|(start, end, _)| (*start..*end).contains(&minute))
        .map_or(TouBlock::OffPeak, |&(_, _, block)| block)
}

/// Resolves a timestamp to its (season, block) slot.
pub fn resolve_slot(ts: NaiveDateTime) -> (Season, TouBlock) {
    (season(ts), tou_block(ts))
}
