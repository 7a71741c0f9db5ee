use crate::error::Result;
use crate::rules::ComplianceRules;
use crate::schema::{DueDateInfo, FilingFrequency, FilingPeriod};
use crate::utils::{day_of_following_month, days_before, ymd};
use chrono::NaiveDate;
use log::debug;

pub struct DueDateCalculator<'a> {
    rules: &'a ComplianceRules,
}

impl<'a> DueDateCalculator<'a> {
    pub fn new(rules: &'a ComplianceRules) -> Self {
        Self { rules }
    }

    /// Statutory due dates for `period` under the client's filing frequency.
    ///
    /// `turnover` is the aggregate annual turnover and only matters for the
    /// quarter-end GSTR-3B tier; absent turnover counts as the smaller tier.
    pub fn calculate(
        &self,
        period: FilingPeriod,
        frequency: FilingFrequency,
        turnover: Option<f64>,
    ) -> Result<DueDateInfo> {
        let rules = self.rules;

        let (gstr1_due_date, gstr3b_due_date, gstr9_due_date, is_quarter_end, advisory) =
            match frequency {
                FilingFrequency::Monthly => {
                    let (gstr1, gstr3b) = self.monthly_dates(period)?;
                    (gstr1, gstr3b, None, false, false)
                }
                FilingFrequency::Quarterly if period.is_quarter_end() => {
                    let gstr3b_day = if self.is_small_taxpayer(turnover) {
                        rules.quarterly_gstr3b_day_small
                    } else {
                        rules.quarterly_gstr3b_day_large
                    };
                    (
                        day_of_following_month(period, rules.quarterly_gstr1_day)?,
                        day_of_following_month(period, gstr3b_day)?,
                        None,
                        true,
                        false,
                    )
                }
                // Interim QRMP month: the GSTR-1 date is the IFF window and the
                // GSTR-3B date is a placeholder, no return is due.
                FilingFrequency::Quarterly => (
                    day_of_following_month(period, rules.quarterly_gstr1_day)?,
                    day_of_following_month(period, rules.interim_gstr3b_day)?,
                    None,
                    false,
                    true,
                ),
                FilingFrequency::Annual => {
                    let (gstr1, gstr3b) = self.monthly_dates(period)?;
                    (gstr1, gstr3b, Some(annual_return_due_date(period)?), false, false)
                }
            };

        let reminder_date = days_before(gstr3b_due_date, rules.reminder_lead_days)?;

        debug!(
            "Due dates for {} ({}): GSTR-1 {}, GSTR-3B {}{}",
            period,
            frequency,
            gstr1_due_date,
            gstr3b_due_date,
            if advisory { " (advisory)" } else { "" }
        );

        Ok(DueDateInfo {
            month: period,
            filing_frequency: frequency,
            gstr1_due_date,
            gstr3b_due_date,
            gstr9_due_date,
            is_quarter_end,
            quarter_end_month: is_quarter_end.then_some(period),
            reminder_date,
            gstr3b_advisory: advisory,
        })
    }

    fn monthly_dates(&self, period: FilingPeriod) -> Result<(NaiveDate, NaiveDate)> {
        Ok((
            day_of_following_month(period, self.rules.monthly_gstr1_day)?,
            day_of_following_month(period, self.rules.monthly_gstr3b_day)?,
        ))
    }

    /// Threshold is inclusive: turnover exactly at the limit is the smaller tier.
    fn is_small_taxpayer(&self, turnover: Option<f64>) -> bool {
        turnover.map_or(true, |t| t <= self.rules.quarterly_turnover_threshold)
    }
}

/// GSTR-9 is due on 31 December of the year after the April-March financial
/// year containing `period` ends.
pub fn annual_return_due_date(period: FilingPeriod) -> Result<NaiveDate> {
    ymd(period.financial_year_end_year() + 1, 12, 31)
}

/// Due dates under the statutory defaults.
pub fn calculate_due_dates(
    period: FilingPeriod,
    frequency: FilingFrequency,
    turnover: Option<f64>,
) -> Result<DueDateInfo> {
    let rules = ComplianceRules::default();
    DueDateCalculator::new(&rules).calculate(period, frequency, turnover)
}
