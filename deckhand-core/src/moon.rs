//! Moon phase from the calendar date alone.
//!
//! The phase is bucketed into eight fixed-width bins of a 29.53-day cycle,
//! counted from a reference new moon in early January 2000.

use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;
use std::fmt;

const SYNODIC_MONTH_DAYS: f64 = 29.53;
const REFERENCE_JULIAN_DAY: f64 = 2_451_549.5;
/// Half-shifts the cycle so the bins line up with the labels. Fixed, not tunable.
const CYCLE_OFFSET_DAYS: f64 = 14.77;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MoonPhase {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

/// Upper (exclusive) bound of each bin; anything past the last is a waning crescent.
const PHASE_BINS: [(f64, MoonPhase); 7] = [
    (1.84566, MoonPhase::NewMoon),
    (5.53699, MoonPhase::WaxingCrescent),
    (9.22831, MoonPhase::FirstQuarter),
    (12.91963, MoonPhase::WaxingGibbous),
    (16.61096, MoonPhase::FullMoon),
    (20.30228, MoonPhase::WaningGibbous),
    (23.99361, MoonPhase::LastQuarter),
];

impl MoonPhase {
    pub fn from_days_since_new(days: f64) -> Self {
        PHASE_BINS
            .iter()
            .find(|(upper, _)| days < *upper)
            .map(|(_, phase)| *phase)
            .unwrap_or(MoonPhase::WaningCrescent)
    }

    pub fn name(&self) -> &'static str {
        match self {
            MoonPhase::NewMoon => "New Moon",
            MoonPhase::WaxingCrescent => "Waxing Crescent",
            MoonPhase::FirstQuarter => "First Quarter",
            MoonPhase::WaxingGibbous => "Waxing Gibbous",
            MoonPhase::FullMoon => "Full Moon",
            MoonPhase::WaningGibbous => "Waning Gibbous",
            MoonPhase::LastQuarter => "Last Quarter",
            MoonPhase::WaningCrescent => "Waning Crescent",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            MoonPhase::NewMoon => "🌑",
            MoonPhase::WaxingCrescent => "🌒",
            MoonPhase::FirstQuarter => "🌓",
            MoonPhase::WaxingGibbous => "🌔",
            MoonPhase::FullMoon => "🌕",
            MoonPhase::WaningGibbous => "🌖",
            MoonPhase::LastQuarter => "🌗",
            MoonPhase::WaningCrescent => "🌘",
        }
    }
}

impl fmt::Display for MoonPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.emoji(), self.name())
    }
}

/// Day number at midnight of `date`, with Jan/Feb counted as months 13/14 of
/// the previous year. The Gregorian century correction is not applied; the
/// reference constant is calibrated against this form.
pub fn julian_day(date: NaiveDate) -> f64 {
    let (year, month) = if date.month() < 3 {
        (date.year() - 1, date.month() + 12)
    } else {
        (date.year(), date.month())
    };

    (365.25 * f64::from(year + 4716)).floor()
        + (30.6001 * f64::from(month + 1)).floor()
        + f64::from(date.day())
        - 1524.5
}

/// Days into the current lunation. Uses a truncating remainder, so dates
/// before the reference come out negative.
pub fn days_since_new(date: NaiveDate) -> f64 {
    (julian_day(date) - REFERENCE_JULIAN_DAY + CYCLE_OFFSET_DAYS) % SYNODIC_MONTH_DAYS
}

pub fn moon_phase_on(date: NaiveDate) -> MoonPhase {
    MoonPhase::from_days_since_new(days_since_new(date))
}

/// Phase for today's local calendar date.
pub fn moon_phase_today() -> MoonPhase {
    moon_phase_on(Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    const IN_ORDER: [MoonPhase; 8] = [
        MoonPhase::NewMoon,
        MoonPhase::WaxingCrescent,
        MoonPhase::FirstQuarter,
        MoonPhase::WaxingGibbous,
        MoonPhase::FullMoon,
        MoonPhase::WaningGibbous,
        MoonPhase::LastQuarter,
        MoonPhase::WaningCrescent,
    ];

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn julian_day_without_century_correction() {
        assert_eq!(julian_day(date(2000, 1, 1)), 2_451_557.5);
        assert_eq!(julian_day(date(1999, 12, 31)), 2_451_556.5);
        assert_eq!(julian_day(date(2000, 3, 1)), 2_451_617.5);
    }

    #[test]
    fn boundaries_split_adjacent_bins() {
        assert_eq!(MoonPhase::from_days_since_new(1.84565), MoonPhase::NewMoon);
        assert_eq!(MoonPhase::from_days_since_new(1.84567), MoonPhase::WaxingCrescent);

        let expected = IN_ORDER;
        for (i, (upper, phase)) in PHASE_BINS.iter().enumerate() {
            assert_eq!(*phase, expected[i]);
            assert_eq!(MoonPhase::from_days_since_new(upper - 0.00001), expected[i]);
            assert_eq!(MoonPhase::from_days_since_new(*upper), expected[i + 1]);
            assert_eq!(MoonPhase::from_days_since_new(upper + 0.00001), expected[i + 1]);
        }
    }

    #[test]
    fn cycle_ends_waning_crescent() {
        assert_eq!(MoonPhase::from_days_since_new(0.0), MoonPhase::NewMoon);
        assert_eq!(MoonPhase::from_days_since_new(29.52), MoonPhase::WaningCrescent);
        assert_eq!(MoonPhase::from_days_since_new(-3.0), MoonPhase::NewMoon);
    }

    #[test]
    fn known_dates() {
        // jd - ref = 8, +14.77 => 22.77
        assert_eq!(moon_phase_on(date(2000, 1, 1)), MoonPhase::LastQuarter);
        // 27 + 14.77 wraps to 12.24
        assert_eq!(moon_phase_on(date(2000, 1, 20)), MoonPhase::WaxingGibbous);
        assert_eq!(moon_phase_on(date(2000, 1, 22)), MoonPhase::FullMoon);
        assert_eq!(moon_phase_on(date(2000, 1, 6)), MoonPhase::WaningCrescent);
    }

    #[test]
    fn early_dates_go_negative() {
        let d = date(1999, 12, 1);
        assert!(days_since_new(d) < 0.0);
        assert_eq!(moon_phase_on(d), MoonPhase::NewMoon);
    }

    #[test]
    fn same_date_same_phase() {
        let d = date(2026, 10, 16);
        assert_eq!(moon_phase_on(d), moon_phase_on(d));
        assert_eq!(moon_phase_today(), moon_phase_today());
    }

    #[test]
    fn every_phase_is_reached_within_a_cycle() {
        let start = date(2026, 1, 1);
        let seen: std::collections::HashSet<_> = (0..30)
            .map(|i| moon_phase_on(start + chrono::Duration::days(i)))
            .collect();
        assert_eq!(seen.len(), 8);
    }

    #[test]
    fn display_carries_emoji() {
        assert_eq!(MoonPhase::FullMoon.to_string(), "🌕 Full Moon");
    }
}
