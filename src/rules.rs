use crate::error::{ComplianceError, Result};
use log::warn;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Statutory constants used by the calculators.
///
/// `Default` carries the values in force under the CGST Act. Deployments only
/// override them when a notification changes a rate or a date, so every field
/// falls back to the default when absent from the JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ComplianceRules {
    #[schemars(description = "Late fee per day for a return with outward supplies or tax liability")]
    pub late_fee_per_day: f64,

    #[schemars(description = "Late fee per day for a nil return")]
    pub nil_late_fee_per_day: f64,

    #[schemars(description = "Maximum late fee per return type per period")]
    pub late_fee_cap: f64,

    #[schemars(description = "Annual interest rate on unpaid tax, as a fraction (0.18 = 18%)")]
    pub annual_interest_rate: f64,

    #[schemars(description = "Days in the interest year")]
    pub interest_day_count: u32,

    #[schemars(
        description = "Aggregate turnover up to which a quarterly filer gets the later GSTR-3B day"
    )]
    pub quarterly_turnover_threshold: f64,

    pub monthly_gstr1_day: u32,
    pub monthly_gstr3b_day: u32,
    pub quarterly_gstr1_day: u32,

    #[schemars(description = "Quarter-end GSTR-3B day when turnover is at or below the threshold")]
    pub quarterly_gstr3b_day_small: u32,

    #[schemars(description = "Quarter-end GSTR-3B day when turnover exceeds the threshold")]
    pub quarterly_gstr3b_day_large: u32,

    #[schemars(description = "Placeholder GSTR-3B day for interim QRMP months")]
    pub interim_gstr3b_day: u32,

    #[schemars(description = "Days before the GSTR-3B due date to send a reminder")]
    pub reminder_lead_days: u32,

    #[schemars(description = "Absolute ITC difference treated as reconciled")]
    pub reconciliation_tolerance: f64,
}

impl Default for ComplianceRules {
    fn default() -> Self {
        Self {
            late_fee_per_day: 50.0,
            nil_late_fee_per_day: 20.0,
            late_fee_cap: 10_000.0,
            annual_interest_rate: 0.18,
            interest_day_count: 365,
            quarterly_turnover_threshold: 50_000_000.0,
            monthly_gstr1_day: 11,
            monthly_gstr3b_day: 20,
            quarterly_gstr1_day: 13,
            quarterly_gstr3b_day_small: 24,
            quarterly_gstr3b_day_large: 22,
            interim_gstr3b_day: 25,
            reminder_lead_days: 5,
            reconciliation_tolerance: 0.01,
        }
    }
}

impl ComplianceRules {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let rules: Self = serde_json::from_str(json)?;
        rules.validate()?;
        rules.warn_on_overrides();
        Ok(rules)
    }

    pub fn validate(&self) -> Result<()> {
        let amounts = [
            ("late_fee_per_day", self.late_fee_per_day),
            ("nil_late_fee_per_day", self.nil_late_fee_per_day),
            ("late_fee_cap", self.late_fee_cap),
            ("annual_interest_rate", self.annual_interest_rate),
            ("quarterly_turnover_threshold", self.quarterly_turnover_threshold),
            ("reconciliation_tolerance", self.reconciliation_tolerance),
        ];
        for (field, value) in amounts {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(field, format!("must be a non-negative number, got {}", value)));
            }
        }

        // Day 28 is the latest day present in every month.
        let days = [
            ("monthly_gstr1_day", self.monthly_gstr1_day),
            ("monthly_gstr3b_day", self.monthly_gstr3b_day),
            ("quarterly_gstr1_day", self.quarterly_gstr1_day),
            ("quarterly_gstr3b_day_small", self.quarterly_gstr3b_day_small),
            ("quarterly_gstr3b_day_large", self.quarterly_gstr3b_day_large),
            ("interim_gstr3b_day", self.interim_gstr3b_day),
        ];
        for (field, day) in days {
            if !(1..=28).contains(&day) {
                return Err(invalid(field, format!("must be between 1 and 28, got {}", day)));
            }
        }

        if self.interest_day_count == 0 {
            return Err(invalid("interest_day_count", "must be greater than zero".to_string()));
        }

        Ok(())
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = schemars::schema_for!(ComplianceRules);
        serde_json::to_string_pretty(&schema)
    }

    fn warn_on_overrides(&self) {
        let statutory = Self::default();
        if self.late_fee_cap != statutory.late_fee_cap {
            warn!(
                "Late fee cap overridden: {} (statutory {})",
                self.late_fee_cap, statutory.late_fee_cap
            );
        }
        if self.annual_interest_rate != statutory.annual_interest_rate {
            warn!(
                "Interest rate overridden: {} (statutory {})",
                self.annual_interest_rate, statutory.annual_interest_rate
            );
        }
        if self.quarterly_turnover_threshold != statutory.quarterly_turnover_threshold {
            warn!(
                "Quarterly turnover threshold overridden: {} (statutory {})",
                self.quarterly_turnover_threshold, statutory.quarterly_turnover_threshold
            );
        }
    }
}

fn invalid(field: &str, details: String) -> ComplianceError {
    ComplianceError::InvalidRules {
        field: field.to_string(),
        details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(ComplianceRules::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let rules = ComplianceRules::from_json_str(r#"{ "late_fee_cap": 5000.0 }"#).unwrap();
        assert_eq!(rules.late_fee_cap, 5000.0);
        assert_eq!(rules.late_fee_per_day, 50.0);
        assert_eq!(rules.reminder_lead_days, 5);
    }

    #[test]
    fn test_rejects_negative_fee() {
        let result = ComplianceRules::from_json_str(r#"{ "late_fee_per_day": -1.0 }"#);
        assert!(matches!(
            result,
            Err(ComplianceError::InvalidRules { ref field, .. }) if field == "late_fee_per_day"
        ));
    }

    #[test]
    fn test_rejects_day_past_28() {
        let rules = ComplianceRules {
            monthly_gstr3b_day: 31,
            ..ComplianceRules::default()
        };
        assert!(rules.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_day_count() {
        let rules = ComplianceRules {
            interest_day_count: 0,
            ..ComplianceRules::default()
        };
        assert!(rules.validate().is_err());
    }

    #[test]
    fn test_malformed_json() {
        let result = ComplianceRules::from_json_str("{ not json");
        assert!(matches!(result, Err(ComplianceError::SerializationError(_))));
    }

    #[test]
    fn test_schema_generation() {
        let schema_json = ComplianceRules::schema_as_json().unwrap();
        assert!(schema_json.contains("late_fee_cap"));
        assert!(schema_json.contains("reminder_lead_days"));
    }
}
