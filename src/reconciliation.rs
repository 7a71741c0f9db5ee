use crate::identifiers::Gstin;
use crate::rules::ComplianceRules;
use crate::schema::{DiscrepancyClassification, DiscrepancyReason};
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub struct DiscrepancyClassifier {
    tolerance: f64,
}

impl DiscrepancyClassifier {
    pub fn new(rules: &ComplianceRules) -> Self {
        Self {
            tolerance: rules.reconciliation_tolerance,
        }
    }

    /// Compares claimed ITC against what the portal reports as available.
    ///
    /// Differences within the tolerance are `reconciled` whatever their sign.
    pub fn classify(&self, claimed_itc: f64, available_itc: f64) -> DiscrepancyClassification {
        let discrepancy = claimed_itc - available_itc;

        let discrepancy_percentage = if available_itc > 0.0 {
            Some(discrepancy / available_itc * 100.0)
        } else {
            None
        };

        let reason = if !self.has_discrepancy(claimed_itc, available_itc) {
            DiscrepancyReason::Reconciled
        } else if discrepancy > 0.0 {
            DiscrepancyReason::ExcessClaimed
        } else {
            DiscrepancyReason::Unclaimed
        };

        DiscrepancyClassification {
            discrepancy,
            discrepancy_percentage,
            reason,
        }
    }

    /// Amounts are compared in whole paise, so a difference of exactly the
    /// tolerance is still reconciled.
    pub fn has_discrepancy(&self, claimed_itc: f64, available_itc: f64) -> bool {
        round_to_paise((claimed_itc - available_itc).abs()) > self.tolerance
    }
}

fn round_to_paise(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

pub fn classify(claimed_itc: f64, available_itc: f64) -> DiscrepancyClassification {
    DiscrepancyClassifier::new(&ComplianceRules::default()).classify(claimed_itc, available_itc)
}

pub fn has_discrepancy(claimed_itc: f64, available_itc: f64) -> bool {
    DiscrepancyClassifier::new(&ComplianceRules::default()).has_discrepancy(claimed_itc, available_itc)
}

/// ITC claimed against one supplier for a period, next to the portal figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItcEntry {
    #[schemars(with = "String")]
    pub supplier_gstin: Gstin,
    pub claimed_itc: f64,
    pub available_itc: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Reason reported by the GST portal; overrides the computed one")]
    pub portal_reason: Option<DiscrepancyReason>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReconciledEntry {
    #[schemars(with = "String")]
    pub supplier_gstin: Gstin,
    pub classification: DiscrepancyClassification,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationSummary {
    pub total_claimed: f64,
    pub total_available: f64,
    pub net_discrepancy: f64,
    /// Classification of the period totals.
    pub overall: DiscrepancyClassification,
    pub entries: Vec<ReconciledEntry>,
    /// Entry count per reason, keyed by the reason's wire name.
    pub reason_counts: BTreeMap<String, usize>,
}

impl ReconciliationSummary {
    pub fn mismatched(&self) -> impl Iterator<Item = &ReconciledEntry> {
        self.entries
            .iter()
            .filter(|entry| !entry.classification.is_reconciled())
    }

    pub fn is_fully_reconciled(&self) -> bool {
        self.mismatched().next().is_none()
    }
}

impl DiscrepancyClassifier {
    pub fn reconcile_entries(&self, entries: &[ItcEntry]) -> ReconciliationSummary {
        let mut reconciled = Vec::with_capacity(entries.len());
        let mut reason_counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut total_claimed = 0.0;
        let mut total_available = 0.0;

        for entry in entries {
            let mut classification = self.classify(entry.claimed_itc, entry.available_itc);
            if let Some(reason) = &entry.portal_reason {
                classification = classification.with_reason(reason.clone());
            }

            if !classification.is_reconciled() {
                debug!(
                    "ITC mismatch for supplier {}: claimed {:.2}, available {:.2} ({})",
                    entry.supplier_gstin,
                    entry.claimed_itc,
                    entry.available_itc,
                    classification.reason
                );
            }

            *reason_counts
                .entry(classification.reason.to_string())
                .or_default() += 1;
            total_claimed += entry.claimed_itc;
            total_available += entry.available_itc;

            reconciled.push(ReconciledEntry {
                supplier_gstin: entry.supplier_gstin.clone(),
                classification,
            });
        }

        let overall = self.classify(total_claimed, total_available);

        info!(
            "Reconciled {} ITC entries: claimed {:.2}, available {:.2}, overall {}",
            entries.len(),
            total_claimed,
            total_available,
            overall.reason
        );

        ReconciliationSummary {
            total_claimed,
            total_available,
            net_discrepancy: overall.discrepancy,
            overall,
            entries: reconciled,
            reason_counts,
        }
    }
}

pub fn reconcile_entries(entries: &[ItcEntry]) -> ReconciliationSummary {
    DiscrepancyClassifier::new(&ComplianceRules::default()).reconcile_entries(entries)
}
