use crate::error::{ComplianceError, Result};
use crate::schema::FilingPeriod;
use chrono::{Days, NaiveDate};

/// Returns the `(year, month)` that follows the given calendar month.
pub fn following_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

pub fn ymd(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        ComplianceError::DateError(format!(
            "{:04}-{:02}-{:02} is not a valid calendar date",
            year, month, day
        ))
    })
}

/// The given day-of-month in the calendar month after `period`.
///
/// Every statutory return is due in the month following the tax period, so
/// this is the building block for all monthly and quarterly due dates.
pub fn day_of_following_month(period: FilingPeriod, day: u32) -> Result<NaiveDate> {
    let (year, month) = following_month(period.year(), period.month());
    ymd(year, month, day)
}

pub fn days_before(date: NaiveDate, days: u32) -> Result<NaiveDate> {
    date.checked_sub_days(Days::new(u64::from(days)))
        .ok_or_else(|| {
            ComplianceError::DateError(format!("Cannot subtract {} days from {}", days, date))
        })
}

/// Whole days `actual` falls after `due`. Zero when on time or early.
pub fn days_late(due: NaiveDate, actual: NaiveDate) -> i64 {
    (actual - due).num_days().max(0)
}

/// Year in which the April-March financial year containing the month ends.
pub fn financial_year_end_year(year: i32, month: u32) -> i32 {
    if month >= 4 {
        year + 1
    } else {
        year
    }
}

/// Every filing period from `start` to `end`, inclusive.
pub fn periods_between(start: FilingPeriod, end: FilingPeriod) -> Vec<FilingPeriod> {
    let mut periods = Vec::new();

    let mut current = start;
    while current <= end {
        periods.push(current);
        current = current.next();
    }

    periods
}

/// Parses a period string in the format "YYYY-MM".
/// Returns (year, month)
pub fn parse_period_string(period: &str) -> Result<(i32, u32)> {
    let trimmed = period.trim();
    let (year_part, month_part) = trimmed
        .split_once('-')
        .ok_or_else(|| ComplianceError::InvalidPeriod(period.to_string()))?;

    if year_part.len() != 4 || month_part.len() != 2 {
        return Err(ComplianceError::InvalidPeriod(period.to_string()));
    }

    let year: i32 = year_part
        .parse()
        .map_err(|_| ComplianceError::InvalidPeriod(period.to_string()))?;
    let month: u32 = month_part
        .parse()
        .map_err(|_| ComplianceError::InvalidPeriod(period.to_string()))?;

    if !(1..=12).contains(&month) {
        return Err(ComplianceError::InvalidPeriod(period.to_string()));
    }

    Ok((year, month))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_following_month() {
        assert_eq!(following_month(2023, 1), (2023, 2));
        assert_eq!(following_month(2023, 12), (2024, 1));
    }

    #[test]
    fn test_day_of_following_month_rolls_year() {
        let december = FilingPeriod::new(2023, 12).unwrap();
        assert_eq!(
            day_of_following_month(december, 20).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 20).unwrap()
        );
    }

    #[test]
    fn test_ymd_rejects_impossible_date() {
        assert!(ymd(2023, 2, 30).is_err());
    }

    #[test]
    fn test_days_before_crosses_month() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 3).unwrap();
        assert_eq!(
            days_before(date, 5).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 27).unwrap()
        );
    }

    #[test]
    fn test_days_late() {
        let due = NaiveDate::from_ymd_opt(2024, 4, 20).unwrap();
        assert_eq!(days_late(due, due), 0);
        assert_eq!(days_late(due, NaiveDate::from_ymd_opt(2024, 4, 19).unwrap()), 0);
        assert_eq!(days_late(due, NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()), 30);
    }

    #[test]
    fn test_financial_year_end_year() {
        assert_eq!(financial_year_end_year(2024, 3), 2024);
        assert_eq!(financial_year_end_year(2024, 4), 2025);
        assert_eq!(financial_year_end_year(2024, 12), 2025);
    }

    #[test]
    fn test_periods_between() {
        let start = FilingPeriod::new(2023, 11).unwrap();
        let end = FilingPeriod::new(2024, 2).unwrap();
        let periods = periods_between(start, end);
        assert_eq!(periods.len(), 4);
        assert_eq!(periods[0].to_string(), "2023-11");
        assert_eq!(periods[3].to_string(), "2024-02");

        assert!(periods_between(end, start).is_empty());
    }

    #[test]
    fn test_parse_period_string() {
        assert_eq!(parse_period_string("2023-02").unwrap(), (2023, 2));
        assert_eq!(parse_period_string(" 2024-12 ").unwrap(), (2024, 12));
        assert!(parse_period_string("2023-13").is_err());
        assert!(parse_period_string("2023-1").is_err());
        assert!(parse_period_string("202301").is_err());
        assert!(parse_period_string("2023-01:2023-03").is_err());
    }
}
