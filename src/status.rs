use crate::schema::FilingStatus;
use chrono::{Local, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Source of "today" for overdue checks.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Local calendar date from the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Filed flags and dates for one period, as stored by the persistence layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilingSnapshot {
    pub gstr1_filed: bool,
    pub gstr3b_filed: bool,
    #[serde(default)]
    pub gstr1_due_date: Option<NaiveDate>,
    #[serde(default)]
    pub gstr3b_due_date: Option<NaiveDate>,
    #[serde(default)]
    pub gstr1_filed_date: Option<NaiveDate>,
    #[serde(default)]
    pub gstr3b_filed_date: Option<NaiveDate>,
}

fn filed_after(filed: Option<NaiveDate>, due: Option<NaiveDate>) -> bool {
    matches!((filed, due), (Some(filed), Some(due)) if filed > due)
}

/// Derives the period status. First match wins:
///
/// 1. both returns filed: `late` if either was filed after its due date,
///    otherwise `filed`
/// 2. GSTR-3B due date known and already passed: `overdue`
/// 3. otherwise `pending`
///
/// Missing dates never make a period late or overdue.
pub fn get_filing_status(snapshot: &FilingSnapshot, today: NaiveDate) -> FilingStatus {
    if snapshot.gstr1_filed && snapshot.gstr3b_filed {
        let late = filed_after(snapshot.gstr1_filed_date, snapshot.gstr1_due_date)
            || filed_after(snapshot.gstr3b_filed_date, snapshot.gstr3b_due_date);
        return if late {
            FilingStatus::Late
        } else {
            FilingStatus::Filed
        };
    }

    match snapshot.gstr3b_due_date {
        Some(due) if today > due => FilingStatus::Overdue,
        _ => FilingStatus::Pending,
    }
}

/// True when nothing has been filed and the due date has passed.
///
/// A filed return is never overdue here, however late it was filed.
pub fn is_month_overdue(due_date: NaiveDate, filed_date: Option<NaiveDate>, today: NaiveDate) -> bool {
    if filed_date.is_some() {
        return false;
    }
    today > due_date
}

/// Status checks bound to a clock.
pub struct StatusResolver<C: Clock> {
    clock: C,
}

impl<C: Clock> StatusResolver<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn status(&self, snapshot: &FilingSnapshot) -> FilingStatus {
        get_filing_status(snapshot, self.clock.today())
    }

    pub fn is_month_overdue(&self, due_date: NaiveDate, filed_date: Option<NaiveDate>) -> bool {
        is_month_overdue(due_date, filed_date, self.clock.today())
    }
}

impl Default for StatusResolver<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn due_dates() -> FilingSnapshot {
        FilingSnapshot {
            gstr1_due_date: Some(date(2024, 5, 11)),
            gstr3b_due_date: Some(date(2024, 5, 20)),
            ..FilingSnapshot::default()
        }
    }

    #[test]
    fn test_both_filed_on_time() {
        let snapshot = FilingSnapshot {
            gstr1_filed: true,
            gstr3b_filed: true,
            gstr1_filed_date: Some(date(2024, 5, 10)),
            gstr3b_filed_date: Some(date(2024, 5, 20)),
            ..due_dates()
        };
        assert_eq!(get_filing_status(&snapshot, date(2024, 7, 1)), FilingStatus::Filed);
    }

    #[test]
    fn test_one_filed_late() {
        let snapshot = FilingSnapshot {
            gstr1_filed: true,
            gstr3b_filed: true,
            gstr1_filed_date: Some(date(2024, 5, 12)),
            gstr3b_filed_date: Some(date(2024, 5, 18)),
            ..due_dates()
        };
        assert_eq!(get_filing_status(&snapshot, date(2024, 5, 19)), FilingStatus::Late);

        let snapshot = FilingSnapshot {
            gstr1_filed: true,
            gstr3b_filed: true,
            gstr1_filed_date: Some(date(2024, 5, 1)),
            gstr3b_filed_date: Some(date(2024, 5, 21)),
            ..due_dates()
        };
        assert_eq!(get_filing_status(&snapshot, date(2024, 5, 21)), FilingStatus::Late);
    }

    #[test]
    fn test_both_filed_without_dates_is_filed() {
        let snapshot = FilingSnapshot {
            gstr1_filed: true,
            gstr3b_filed: true,
            ..FilingSnapshot::default()
        };
        assert_eq!(get_filing_status(&snapshot, date(2030, 1, 1)), FilingStatus::Filed);
    }

    #[test]
    fn test_unfiled_past_due_is_overdue() {
        assert_eq!(get_filing_status(&due_dates(), date(2024, 5, 21)), FilingStatus::Overdue);
    }

    #[test]
    fn test_unfiled_on_due_date_is_pending() {
        assert_eq!(get_filing_status(&due_dates(), date(2024, 5, 20)), FilingStatus::Pending);
        assert_eq!(get_filing_status(&due_dates(), date(2024, 5, 1)), FilingStatus::Pending);
    }

    #[test]
    fn test_partially_filed_follows_gstr3b_due_date() {
        let snapshot = FilingSnapshot {
            gstr1_filed: true,
            gstr1_filed_date: Some(date(2024, 5, 11)),
            ..due_dates()
        };
        assert_eq!(get_filing_status(&snapshot, date(2024, 6, 1)), FilingStatus::Overdue);
        assert_eq!(get_filing_status(&snapshot, date(2024, 5, 15)), FilingStatus::Pending);
    }

    #[test]
    fn test_missing_due_date_defaults_to_pending() {
        let snapshot = FilingSnapshot::default();
        assert_eq!(get_filing_status(&snapshot, date(2099, 1, 1)), FilingStatus::Pending);
    }

    #[test]
    fn test_is_month_overdue() {
        let due = date(2024, 5, 20);
        assert!(!is_month_overdue(due, None, date(2024, 5, 20)));
        assert!(is_month_overdue(due, None, date(2024, 5, 21)));
        assert!(!is_month_overdue(due, Some(date(2024, 8, 1)), date(2024, 9, 1)));
    }

    #[test]
    fn test_resolver_uses_injected_clock() {
        let resolver = StatusResolver::new(FixedClock(date(2024, 6, 1)));
        assert_eq!(resolver.today(), date(2024, 6, 1));
        assert_eq!(resolver.status(&due_dates()), FilingStatus::Overdue);
        assert!(resolver.is_month_overdue(date(2024, 5, 20), None));

        let resolver = StatusResolver::new(FixedClock(date(2024, 5, 2)));
        assert_eq!(resolver.status(&due_dates()), FilingStatus::Pending);
    }

    #[test]
    fn test_snapshot_deserializes_from_camel_case() {
        let snapshot: FilingSnapshot = serde_json::from_str(
            r#"{ "gstr1Filed": true, "gstr3bFiled": false, "gstr3bDueDate": "2024-05-20" }"#,
        )
        .unwrap();
        assert!(snapshot.gstr1_filed);
        assert_eq!(snapshot.gstr3b_due_date, Some(date(2024, 5, 20)));
        assert_eq!(snapshot.gstr1_due_date, None);
    }
}
