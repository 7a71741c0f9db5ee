//! # GST Compliance Engine
//!
//! Deterministic rules for tracking Indian GST compliance across client
//! businesses. Everything here is a pure function of its inputs; storage,
//! HTTP and notification delivery live in the calling service.
//!
//! ## Core Concepts
//!
//! - **Identifiers**: GSTIN, PAN and ARN validation, including the GSTIN
//!   mod-36 checksum. Problems are accumulated, never thrown
//! - **Due Dates**: GSTR-1, GSTR-3B and GSTR-9 deadlines from a `YYYY-MM`
//!   period and the client's filing frequency (monthly, QRMP quarterly, annual)
//! - **Penalties**: per-return late fees with a cap, and uncapped interest on
//!   unpaid tax
//! - **Filing Status**: `pending`, `filed`, `late` or `overdue`, derived from
//!   filed flags and dates against an injected "today"
//! - **ITC Reconciliation**: claimed versus portal-available input tax credit,
//!   with a 0.01 tolerance
//!
//! ## Example
//!
//! ```rust,ignore
//! use gst_compliance_engine::*;
//! use chrono::NaiveDate;
//!
//! let gstin = validate_gstin("27AAPFU0939F1ZV");
//! assert!(gstin.is_valid);
//!
//! let period: FilingPeriod = "2024-03".parse()?;
//! let due = calculate_due_dates(period, FilingFrequency::Quarterly, Some(40_000_000.0))?;
//! assert_eq!(due.gstr3b_due_date, NaiveDate::from_ymd_opt(2024, 4, 24).unwrap());
//!
//! let fee = calculate_late_fee(due.gstr3b_due_date, NaiveDate::from_ymd_opt(2024, 5, 4).unwrap(), false);
//! assert_eq!(fee, 500.0);
//!
//! let today = SystemClock.today();
//! let status = get_filing_status(&FilingSnapshot::default(), today);
//! ```

pub mod assessment;
pub mod calendar;
pub mod due_dates;
pub mod error;
pub mod identifiers;
pub mod penalties;
pub mod reconciliation;
pub mod rules;
pub mod schema;
pub mod states;
pub mod status;
pub mod utils;

pub use assessment::{assess_filing, FilingAssessment, FilingAssessor, FilingRecord};
pub use calendar::{compliance_calendar, compliance_calendar_with_rules, upcoming_reminders};
pub use due_dates::{annual_return_due_date, calculate_due_dates, DueDateCalculator};
pub use error::{ComplianceError, Result};
pub use identifiers::{
    calculate_gstin_checksum, normalize_identifier, validate_arn, validate_gstin, validate_pan,
    Gstin, Pan, PanHolderType,
};
pub use penalties::{
    calculate_interest, calculate_late_fee, AmountBasis, PenaltyCalculator, PenaltyInput,
};
pub use reconciliation::{
    classify, has_discrepancy, reconcile_entries, DiscrepancyClassifier, ItcEntry,
    ReconciledEntry, ReconciliationSummary,
};
pub use rules::ComplianceRules;
pub use schema::*;
pub use states::{is_valid_state_code, state_name};
pub use status::{
    get_filing_status, is_month_overdue, Clock, FilingSnapshot, FixedClock, StatusResolver,
    SystemClock,
};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_end_to_end_quarterly_client() {
        let gstin = Gstin::new("29AAGCB7383J1Z4").unwrap();
        assert_eq!(gstin.state_name(), Some("Karnataka"));

        let period: FilingPeriod = "2024-03".parse().unwrap();
        let due = calculate_due_dates(period, FilingFrequency::Quarterly, Some(40_000_000.0)).unwrap();
        assert!(due.is_quarter_end);
        assert_eq!(due.gstr3b_due_date, NaiveDate::from_ymd_opt(2024, 4, 24).unwrap());

        let snapshot = FilingSnapshot {
            gstr1_filed: true,
            gstr3b_filed: true,
            gstr1_due_date: Some(due.gstr1_due_date),
            gstr3b_due_date: Some(due.gstr3b_due_date),
            gstr1_filed_date: Some(NaiveDate::from_ymd_opt(2024, 4, 12).unwrap()),
            gstr3b_filed_date: Some(NaiveDate::from_ymd_opt(2024, 4, 30).unwrap()),
        };
        let resolver = StatusResolver::new(FixedClock(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()));
        assert_eq!(resolver.status(&snapshot), FilingStatus::Late);

        let fee = calculate_late_fee(
            due.gstr3b_due_date,
            snapshot.gstr3b_filed_date.unwrap(),
            false,
        );
        assert_eq!(fee, 300.0);
    }
}
