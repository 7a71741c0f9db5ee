use crate::due_dates::DueDateCalculator;
use crate::error::Result;
use crate::penalties::PenaltyCalculator;
use crate::rules::ComplianceRules;
use crate::schema::{DueDateInfo, FilingFrequency, FilingPeriod, FilingStatus};
use crate::status::{get_filing_status, FilingSnapshot};
use chrono::NaiveDate;
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// What the persistence layer holds for one client and one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilingRecord {
    pub period: FilingPeriod,
    pub frequency: FilingFrequency,
    #[serde(default)]
    pub turnover: Option<f64>,
    #[serde(default)]
    pub gstr1_filed_date: Option<NaiveDate>,
    #[serde(default)]
    pub gstr3b_filed_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_nil_return: bool,
    #[serde(default)]
    #[schemars(description = "Net tax payable in cash for the period")]
    pub tax_payable: f64,
    #[serde(default)]
    pub tax_paid_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilingAssessment {
    pub period: FilingPeriod,
    pub due_dates: DueDateInfo,
    pub status: FilingStatus,
    pub gstr1_late_fee: f64,
    pub gstr3b_late_fee: f64,
    pub interest: f64,
    pub total_penalty: f64,
}

pub struct FilingAssessor<'a> {
    rules: &'a ComplianceRules,
}

impl<'a> FilingAssessor<'a> {
    pub fn new(rules: &'a ComplianceRules) -> Self {
        Self { rules }
    }

    /// Status and accrued penalties for a record as of `today`.
    ///
    /// Each return accrues its own late fee up to its filed date, or up to
    /// `today` while unfiled. Interest runs from the GSTR-3B due date to the
    /// payment date (or `today`). Penalties only accrue where the monthly
    /// returns are statutory: monthly filers and quarter-end months. Interim
    /// QRMP months and annual filers carry none.
    pub fn assess(&self, record: &FilingRecord, today: NaiveDate) -> Result<FilingAssessment> {
        let due_dates = DueDateCalculator::new(self.rules).calculate(
            record.period,
            record.frequency,
            record.turnover,
        )?;

        let snapshot = FilingSnapshot {
            gstr1_filed: record.gstr1_filed_date.is_some(),
            gstr3b_filed: record.gstr3b_filed_date.is_some(),
            gstr1_due_date: Some(due_dates.gstr1_due_date),
            gstr3b_due_date: Some(due_dates.gstr3b_due_date),
            gstr1_filed_date: record.gstr1_filed_date,
            gstr3b_filed_date: record.gstr3b_filed_date,
        };
        let status = get_filing_status(&snapshot, today);

        let (gstr1_late_fee, gstr3b_late_fee, interest) = if accrues_penalties(&due_dates) {
            let penalties = PenaltyCalculator::new(self.rules);
            let gstr1_late_fee = penalties.late_fee(
                due_dates.gstr1_due_date,
                record.gstr1_filed_date.unwrap_or(today),
                record.is_nil_return,
            );
            let gstr3b_late_fee = penalties.late_fee(
                due_dates.gstr3b_due_date,
                record.gstr3b_filed_date.unwrap_or(today),
                record.is_nil_return,
            );
            let interest = if record.tax_payable > 0.0 {
                penalties.interest(
                    record.tax_payable,
                    due_dates.gstr3b_due_date,
                    record.tax_paid_date.unwrap_or(today),
                )
            } else {
                0.0
            };
            (gstr1_late_fee, gstr3b_late_fee, interest)
        } else {
            (0.0, 0.0, 0.0)
        };

        let total_penalty = gstr1_late_fee + gstr3b_late_fee + interest;

        debug!(
            "Assessed {} as {}: late fees {:.0} + {:.0}, interest {:.0}",
            record.period, status, gstr1_late_fee, gstr3b_late_fee, interest
        );

        Ok(FilingAssessment {
            period: record.period,
            due_dates,
            status,
            gstr1_late_fee,
            gstr3b_late_fee,
            interest,
            total_penalty,
        })
    }

    pub fn assess_all(
        &self,
        records: &[FilingRecord],
        today: NaiveDate,
    ) -> Result<Vec<FilingAssessment>> {
        let assessments = records
            .iter()
            .map(|record| self.assess(record, today))
            .collect::<Result<Vec<_>>>()?;

        let overdue = assessments
            .iter()
            .filter(|a| a.status == FilingStatus::Overdue)
            .count();
        let total: f64 = assessments.iter().map(|a| a.total_penalty).sum();
        info!(
            "Assessed {} filing periods as of {}: {} overdue, total penalty {:.0}",
            assessments.len(),
            today,
            overdue,
            total
        );

        Ok(assessments)
    }
}

fn accrues_penalties(due_dates: &DueDateInfo) -> bool {
    match due_dates.filing_frequency {
        FilingFrequency::Monthly => true,
        FilingFrequency::Quarterly => due_dates.is_quarter_end,
        FilingFrequency::Annual => false,
    }
}

pub fn assess_filing(record: &FilingRecord, today: NaiveDate) -> Result<FilingAssessment> {
    FilingAssessor::new(&ComplianceRules::default()).assess(record, today)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn monthly(period: &str) -> FilingRecord {
        FilingRecord {
            period: period.parse().unwrap(),
            frequency: FilingFrequency::Monthly,
            turnover: None,
            gstr1_filed_date: None,
            gstr3b_filed_date: None,
            is_nil_return: false,
            tax_payable: 0.0,
            tax_paid_date: None,
        }
    }

    #[test]
    fn test_on_time_filing_has_no_penalty() {
        let record = FilingRecord {
            gstr1_filed_date: Some(date(2024, 6, 10)),
            gstr3b_filed_date: Some(date(2024, 6, 20)),
            tax_payable: 25_000.0,
            tax_paid_date: Some(date(2024, 6, 20)),
            ..monthly("2024-05")
        };

        let assessment = assess_filing(&record, date(2024, 7, 1)).unwrap();
        assert_eq!(assessment.status, FilingStatus::Filed);
        assert_eq!(assessment.total_penalty, 0.0);
    }

    #[test]
    fn test_late_returns_accrue_independently() {
        let record = FilingRecord {
            // GSTR-1 due 2024-06-11, filed 4 days late.
            gstr1_filed_date: Some(date(2024, 6, 15)),
            // GSTR-3B due 2024-06-20, filed 10 days late.
            gstr3b_filed_date: Some(date(2024, 6, 30)),
            tax_payable: 100_000.0,
            tax_paid_date: Some(date(2024, 7, 20)),
            ..monthly("2024-05")
        };

        let assessment = assess_filing(&record, date(2024, 8, 1)).unwrap();
        assert_eq!(assessment.status, FilingStatus::Late);
        assert_eq!(assessment.gstr1_late_fee, 200.0);
        assert_eq!(assessment.gstr3b_late_fee, 500.0);
        // 100000 * 0.18 / 365 * 30
        assert_eq!(assessment.interest, 1_479.0);
        assert_eq!(assessment.total_penalty, 2_179.0);
    }

    #[test]
    fn test_unfiled_accrues_until_today() {
        let record = FilingRecord {
            is_nil_return: true,
            ..monthly("2024-05")
        };

        let assessment = assess_filing(&record, date(2024, 6, 25)).unwrap();
        assert_eq!(assessment.status, FilingStatus::Overdue);
        assert_eq!(assessment.gstr1_late_fee, 280.0);
        assert_eq!(assessment.gstr3b_late_fee, 100.0);
        assert_eq!(assessment.interest, 0.0);
    }

    #[test]
    fn test_unfiled_before_due_is_pending() {
        let assessment = assess_filing(&monthly("2024-05"), date(2024, 6, 5)).unwrap();
        assert_eq!(assessment.status, FilingStatus::Pending);
        assert_eq!(assessment.total_penalty, 0.0);
    }

    #[test]
    fn test_interim_quarterly_month_accrues_nothing() {
        let record = FilingRecord {
            frequency: FilingFrequency::Quarterly,
            tax_payable: 50_000.0,
            ..monthly("2024-04")
        };

        let assessment = assess_filing(&record, date(2024, 9, 1)).unwrap();
        assert!(assessment.due_dates.gstr3b_advisory);
        assert_eq!(assessment.status, FilingStatus::Overdue);
        assert_eq!(assessment.total_penalty, 0.0);
    }

    #[test]
    fn test_quarter_end_uses_turnover_tier() {
        let record = FilingRecord {
            frequency: FilingFrequency::Quarterly,
            turnover: Some(80_000_000.0),
            gstr1_filed_date: Some(date(2024, 7, 13)),
            gstr3b_filed_date: Some(date(2024, 7, 24)),
            ..monthly("2024-06")
        };

        let assessment = assess_filing(&record, date(2024, 8, 1)).unwrap();
        // Large taxpayer tier is due on the 22nd.
        assert_eq!(assessment.status, FilingStatus::Late);
        assert_eq!(assessment.gstr1_late_fee, 0.0);
        assert_eq!(assessment.gstr3b_late_fee, 100.0);
    }

    #[test]
    fn test_assess_all() {
        let records = vec![monthly("2024-04"), monthly("2024-05"), monthly("2024-06")];
        let rules = ComplianceRules::default();
        let assessments = FilingAssessor::new(&rules)
            .assess_all(&records, date(2024, 6, 21))
            .unwrap();

        let statuses: Vec<FilingStatus> = assessments.iter().map(|a| a.status).collect();
        assert_eq!(
            statuses,
            vec![
                FilingStatus::Overdue,
                FilingStatus::Overdue,
                FilingStatus::Pending
            ]
        );
    }

    #[test]
    fn test_record_deserializes_with_defaults() {
        let record: FilingRecord =
            serde_json::from_str(r#"{ "period": "2024-05", "frequency": "monthly" }"#).unwrap();
        assert_eq!(record, monthly("2024-05"));
    }
}
