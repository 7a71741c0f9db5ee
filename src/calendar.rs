use crate::due_dates::DueDateCalculator;
use crate::error::Result;
use crate::rules::ComplianceRules;
use crate::schema::{DueDateInfo, FilingFrequency, FilingPeriod};
use crate::utils::periods_between;
use chrono::{Days, NaiveDate};
use log::info;

/// Due dates for every month from `start` to `end` inclusive.
pub fn compliance_calendar_with_rules(
    rules: &ComplianceRules,
    start: FilingPeriod,
    end: FilingPeriod,
    frequency: FilingFrequency,
    turnover: Option<f64>,
) -> Result<Vec<DueDateInfo>> {
    let calculator = DueDateCalculator::new(rules);

    let calendar = periods_between(start, end)
        .into_iter()
        .map(|period| calculator.calculate(period, frequency, turnover))
        .collect::<Result<Vec<_>>>()?;

    info!(
        "Built {} compliance calendar {} to {} ({} periods)",
        frequency,
        start,
        end,
        calendar.len()
    );

    Ok(calendar)
}

pub fn compliance_calendar(
    start: FilingPeriod,
    end: FilingPeriod,
    frequency: FilingFrequency,
    turnover: Option<f64>,
) -> Result<Vec<DueDateInfo>> {
    compliance_calendar_with_rules(&ComplianceRules::default(), start, end, frequency, turnover)
}

/// Calendar entries whose reminder falls between `today` and `today + horizon_days`.
///
/// Advisory interim-month entries are skipped, there is no GSTR-3B to remind about.
pub fn upcoming_reminders(
    calendar: &[DueDateInfo],
    today: NaiveDate,
    horizon_days: u32,
) -> Vec<&DueDateInfo> {
    let horizon_end = today
        .checked_add_days(Days::new(u64::from(horizon_days)))
        .unwrap_or(NaiveDate::MAX);

    calendar
        .iter()
        .filter(|info| !info.gstr3b_advisory)
        .filter(|info| info.reminder_date >= today && info.reminder_date <= horizon_end)
        .collect()
}
