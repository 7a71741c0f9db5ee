use crate::error::{ComplianceError, Result};
use crate::utils::{financial_year_end_year, following_month, parse_period_string};
use chrono::NaiveDate;
use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A calendar month a return is filed for, written `YYYY-MM`.
///
/// Always a single calendar month, whatever the client's filing frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FilingPeriod {
    year: i32,
    month: u32,
}

impl FilingPeriod {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(ComplianceError::InvalidPeriod(format!(
                "{:04}-{:02}",
                year, month
            )));
        }
        Ok(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Calendar month, 1-12.
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn next(&self) -> Self {
        let (year, month) = following_month(self.year, self.month);
        Self { year, month }
    }

    /// Calendar quarter (1-4) the month belongs to.
    pub fn quarter(&self) -> u32 {
        (self.month - 1) / 3 + 1
    }

    pub fn is_quarter_end(&self) -> bool {
        matches!(self.month, 3 | 6 | 9 | 12)
    }

    /// Calendar year in which this month's April-March financial year ends.
    pub fn financial_year_end_year(&self) -> i32 {
        financial_year_end_year(self.year, self.month)
    }

    /// Financial year label such as `2024-25`.
    pub fn financial_year_label(&self) -> String {
        let end = self.financial_year_end_year();
        format!("{}-{:02}", end - 1, end.rem_euclid(100))
    }
}

impl fmt::Display for FilingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for FilingPeriod {
    type Err = ComplianceError;

    fn from_str(s: &str) -> Result<Self> {
        let (year, month) = parse_period_string(s)?;
        Self::new(year, month)
    }
}

impl TryFrom<String> for FilingPeriod {
    type Error = ComplianceError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<FilingPeriod> for String {
    fn from(period: FilingPeriod) -> Self {
        period.to_string()
    }
}

impl JsonSchema for FilingPeriod {
    fn schema_name() -> String {
        "FilingPeriod".to_string()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        String::json_schema(generator)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FilingFrequency {
    #[schemars(description = "GSTR-1 and GSTR-3B every month")]
    Monthly,

    #[schemars(
        description = "QRMP scheme: returns at quarter end, optional IFF in the interim months"
    )]
    Quarterly,

    #[schemars(description = "GSTR-9 annual return is the primary filing")]
    Annual,
}

impl fmt::Display for FilingFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FilingFrequency::Monthly => "monthly",
            FilingFrequency::Quarterly => "quarterly",
            FilingFrequency::Annual => "annual",
        };
        f.write_str(label)
    }
}

impl FromStr for FilingFrequency {
    type Err = ComplianceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" => Ok(FilingFrequency::Monthly),
            "quarterly" => Ok(FilingFrequency::Quarterly),
            "annual" => Ok(FilingFrequency::Annual),
            _ => Err(ComplianceError::InvalidFrequency(s.to_string())),
        }
    }
}

/// Derived compliance state of a period. Never set directly.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FilingStatus {
    Pending,
    Filed,
    Late,
    Overdue,
}

impl fmt::Display for FilingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FilingStatus::Pending => "pending",
            FilingStatus::Filed => "filed",
            FilingStatus::Late => "late",
            FilingStatus::Overdue => "overdue",
        };
        f.write_str(label)
    }
}

/// Outcome of validating a GSTIN, PAN or ARN.
///
/// `errors` are rejection reasons. `warnings` are advisory and never block
/// acceptance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn from_findings(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        Self::from_findings(vec![error.into()], Vec::new())
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid {
            f.write_str("valid")
        } else {
            f.write_str(&self.errors.join("; "))
        }
    }
}

/// Statutory due dates for one filing period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DueDateInfo {
    pub month: FilingPeriod,

    pub filing_frequency: FilingFrequency,

    #[schemars(description = "GSTR-1 due date (YYYY-MM-DD). IFF date for interim quarterly months.")]
    pub gstr1_due_date: NaiveDate,

    #[schemars(description = "GSTR-3B due date (YYYY-MM-DD)")]
    pub gstr3b_due_date: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "GSTR-9 annual return due date, annual filers only")]
    pub gstr9_due_date: Option<NaiveDate>,

    pub is_quarter_end: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quarter_end_month: Option<FilingPeriod>,

    #[schemars(description = "GSTR-3B due date minus the reminder lead time")]
    pub reminder_date: NaiveDate,

    #[serde(default)]
    #[schemars(
        description = "True when gstr3bDueDate is a placeholder for an interim QRMP month rather than a statutory deadline"
    )]
    pub gstr3b_advisory: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DiscrepancyReason {
    ExcessClaimed,
    Unclaimed,
    Reconciled,
    /// Supplier invoice rejected on the GST portal.
    GstRejected,
    /// Supplier invoice awaiting acceptance on the GST portal.
    PendingAcceptance,
}

impl fmt::Display for DiscrepancyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DiscrepancyReason::ExcessClaimed => "excess_claimed",
            DiscrepancyReason::Unclaimed => "unclaimed",
            DiscrepancyReason::Reconciled => "reconciled",
            DiscrepancyReason::GstRejected => "gst_rejected",
            DiscrepancyReason::PendingAcceptance => "pending_acceptance",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiscrepancyClassification {
    #[schemars(description = "Claimed ITC minus portal-available ITC")]
    pub discrepancy: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Discrepancy as a percentage of available ITC; absent when nothing is available")]
    pub discrepancy_percentage: Option<f64>,

    pub reason: DiscrepancyReason,
}

impl DiscrepancyClassification {
    /// Replaces the computed reason with a portal-specific one.
    pub fn with_reason(mut self, reason: DiscrepancyReason) -> Self {
        self.reason = reason;
        self
    }

    pub fn is_reconciled(&self) -> bool {
        self.reason == DiscrepancyReason::Reconciled
    }
}
