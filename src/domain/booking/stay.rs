//! Stay period value object

use std::fmt;

use chrono::NaiveDate;

use crate::shared::{DomainError, DomainResult};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Half-open date interval `[check_in, check_out)`. Always at least one night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StayPeriod {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl StayPeriod {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> DomainResult<Self> {
        if check_out <= check_in {
            return Err(DomainError::InvalidDateRange {
                check_in,
                check_out,
            });
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    /// Parse `YYYY-MM-DD` dates.
    pub fn parse(check_in: &str, check_out: &str) -> DomainResult<Self> {
        let check_in = parse_date("check_in", check_in)?;
        let check_out = parse_date("check_out", check_out)?;
        Self::new(check_in, check_out)
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// Two stays conflict iff they share at least one night. A check-out on
    /// the same day as the other stay's check-in is not a conflict.
    pub fn overlaps(&self, other: &StayPeriod) -> bool {
        self.check_in < other.check_out && other.check_in < self.check_out
    }
}

impl fmt::Display for StayPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{}",
            self.check_in.format(DATE_FORMAT),
            self.check_out.format(DATE_FORMAT)
        )
    }
}

fn parse_date(field: &str, value: &str) -> DomainResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        DomainError::InvalidInput(format!("{} must be a YYYY-MM-DD date, got '{}'", field, value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn stay(a: u32, b: u32) -> StayPeriod {
        StayPeriod::new(d(a), d(b)).unwrap()
    }

    #[test]
    fn counts_nights() {
        assert_eq!(stay(10, 12).nights(), 2);
    }

    #[test]
    fn rejects_empty_and_inverted_ranges() {
        assert!(matches!(
            StayPeriod::new(d(10), d(10)),
            Err(DomainError::InvalidDateRange { .. })
        ));
        assert!(matches!(
            StayPeriod::new(d(12), d(10)),
            Err(DomainError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn parse_reports_bad_format_as_invalid_input() {
        let err = StayPeriod::parse("10/01/2024", "2024-01-12").unwrap_err();
        assert_eq!(err.code(), "invalid_input");
    }

    #[test]
    fn parse_accepts_iso_dates() {
        assert_eq!(StayPeriod::parse("2024-01-10", "2024-01-12").unwrap(), stay(10, 12));
    }

    #[test]
    fn back_to_back_stays_do_not_overlap() {
        assert!(!stay(10, 12).overlaps(&stay(12, 14)));
        assert!(!stay(12, 14).overlaps(&stay(10, 12)));
    }

    #[test]
    fn shared_night_overlaps() {
        assert!(stay(10, 12).overlaps(&stay(11, 13)));
        assert!(stay(10, 20).overlaps(&stay(12, 13)));
    }

    proptest! {
        #[test]
        fn overlap_matches_interval_definition(
            a in 0i64..60, len1 in 1i64..30,
            c in 0i64..60, len2 in 1i64..30,
        ) {
            let base = d(1);
            let (b, d2) = (a + len1, c + len2);
            let first = StayPeriod::new(
                base + chrono::Duration::days(a),
                base + chrono::Duration::days(b),
            ).unwrap();
            let second = StayPeriod::new(
                base + chrono::Duration::days(c),
                base + chrono::Duration::days(d2),
            ).unwrap();

            prop_assert_eq!(first.overlaps(&second), a < d2 && c < b);
            prop_assert_eq!(first.overlaps(&second), second.overlaps(&first));
        }
    }
}
