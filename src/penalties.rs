use crate::rules::ComplianceRules;
use crate::utils::days_late;
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Amount a penalty accrues on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case", tag = "kind", content = "amount")]
pub enum AmountBasis {
    /// Late fee on a return; `nil` returns accrue at the reduced daily rate.
    LateFee { nil: bool },
    /// Interest on unpaid tax.
    Interest(f64),
}

/// A single penalty computation as supplied by the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PenaltyInput {
    pub due_date: NaiveDate,
    #[schemars(description = "Filing date for late fees, payment date for interest")]
    pub event_date: NaiveDate,
    pub amount_basis: AmountBasis,
}

pub struct PenaltyCalculator<'a> {
    rules: &'a ComplianceRules,
}

impl<'a> PenaltyCalculator<'a> {
    pub fn new(rules: &'a ComplianceRules) -> Self {
        Self { rules }
    }

    /// Late fee for one return type in one period, capped per return.
    pub fn late_fee(&self, due_date: NaiveDate, filed_date: NaiveDate, is_nil_return: bool) -> f64 {
        let days = days_late(due_date, filed_date);
        if days == 0 {
            return 0.0;
        }

        let fee_per_day = if is_nil_return {
            self.rules.nil_late_fee_per_day
        } else {
            self.rules.late_fee_per_day
        };

        (days as f64 * fee_per_day).min(self.rules.late_fee_cap)
    }

    /// Simple interest on `tax_amount`, rounded to whole currency units. Uncapped.
    pub fn interest(&self, tax_amount: f64, due_date: NaiveDate, paid_date: NaiveDate) -> f64 {
        let days = days_late(due_date, paid_date);
        if days == 0 {
            return 0.0;
        }

        let daily_rate = self.rules.annual_interest_rate / f64::from(self.rules.interest_day_count);
        (tax_amount * daily_rate * days as f64).round()
    }

    pub fn evaluate(&self, input: &PenaltyInput) -> f64 {
        match input.amount_basis {
            AmountBasis::LateFee { nil } => self.late_fee(input.due_date, input.event_date, nil),
            AmountBasis::Interest(tax_amount) => {
                self.interest(tax_amount, input.due_date, input.event_date)
            }
        }
    }
}

pub fn calculate_late_fee(due_date: NaiveDate, filed_date: NaiveDate, is_nil_return: bool) -> f64 {
    PenaltyCalculator::new(&ComplianceRules::default()).late_fee(due_date, filed_date, is_nil_return)
}

pub fn calculate_interest(tax_amount: f64, due_date: NaiveDate, paid_date: NaiveDate) -> f64 {
    PenaltyCalculator::new(&ComplianceRules::default()).interest(tax_amount, due_date, paid_date)
}
