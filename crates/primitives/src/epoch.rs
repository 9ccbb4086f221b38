//! Conversion between calendar dates and the day counts used by columnar dates.

use crate::Date;

fn unix_epoch() -> Date {
    Date::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

/// Days since 1970-01-01, the physical representation of a polars `Date`.
#[must_use]
pub fn to_epoch_days(date: Date) -> i32 {
    (date - unix_epoch()).num_days() as i32
}

/// Inverse of [`to_epoch_days`].
#[must_use]
pub fn from_epoch_days(days: i32) -> Option<Date> {
    unix_epoch().checked_add_signed(chrono::Duration::days(i64::from(days)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_is_day_zero() {
        assert_eq!(to_epoch_days(Date::from_ymd_opt(1970, 1, 1).unwrap()), 0);
        assert_eq!(to_epoch_days(Date::from_ymd_opt(1970, 1, 2).unwrap()), 1);
    }

    #[test]
    fn round_trip_trading_day() {
        let d = Date::from_ymd_opt(2010, 1, 4).unwrap();
        assert_eq!(from_epoch_days(to_epoch_days(d)), Some(d));
        assert_eq!(to_epoch_days(d), 14613);
    }
}
