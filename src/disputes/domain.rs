use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::cases::domain::{ContractRef, PartyRole};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisputeId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisputeNumber(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisputeType {
    OwnerClaim,
    TenantClaim,
    MutualAgreement,
}

impl DisputeType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::OwnerClaim => "Owner Claim",
            Self::TenantClaim => "Tenant Claim",
            Self::MutualAgreement => "Mutual Agreement",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DisputeStatus {
    Open,
    Pending,
    InProgress,
    Resolved,
    Cancelled,
}

impl DisputeStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Resolved => "Resolved",
            Self::Cancelled => "Cancelled",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Resolved | Self::Cancelled)
    }
}

/// Orthogonal mediation sub-state; completing mediation does not by itself
/// close the dispute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediationStatus {
    Available,
    InProgress,
    Completed,
}

impl MediationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionOption {
    Negotiation,
    LegalMediation,
    AdminIntervention,
    Arbitration,
    MaintenanceDeduction,
    PartialRefund,
    ProfessionalCleaning,
    FullRefund,
    DepositAdjustment,
    ConditionImprovement,
}

impl ResolutionOption {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Negotiation => "Direct Negotiation",
            Self::LegalMediation => "Legal Mediation",
            Self::AdminIntervention => "Administrative Intervention",
            Self::Arbitration => "Arbitration",
            Self::MaintenanceDeduction => "Maintenance Deduction",
            Self::PartialRefund => "Partial Refund",
            Self::ProfessionalCleaning => "Professional Cleaning",
            Self::FullRefund => "Full Refund",
            Self::DepositAdjustment => "Deposit Adjustment",
            Self::ConditionImprovement => "Condition Improvement",
        }
    }
}

/// Allow-list of resolution kinds for a dispute, fixed at creation from the
/// dispute type. A `resolve` call outside this list is rejected.
pub fn resolution_options_for(dispute_type: DisputeType) -> Vec<ResolutionOption> {
    use ResolutionOption::*;
    match dispute_type {
        DisputeType::OwnerClaim => vec![
            MaintenanceDeduction,
            ProfessionalCleaning,
            DepositAdjustment,
            PartialRefund,
        ],
        DisputeType::TenantClaim => vec![PartialRefund, FullRefund, ConditionImprovement],
        DisputeType::MutualAgreement => vec![
            Negotiation,
            LegalMediation,
            AdminIntervention,
            Arbitration,
            PartialRefund,
            FullRefund,
        ],
    }
}

/// Non-judicial disagreement (deposit refunds and the like) resolved through
/// mediation rather than court process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dispute {
    pub id: DisputeId,
    pub dispute_number: DisputeNumber,
    pub dispute_type: DisputeType,
    pub status: DisputeStatus,
    pub mediation_status: MediationStatus,
    pub amount: i64,
    pub description: String,
    pub initiated_by: PartyRole,
    pub contract: ContractRef,
    pub resolution_options: Vec<ResolutionOption>,
    pub resolution: Option<String>,
    pub resolved_by: Option<String>,
    pub resolved_on: Option<NaiveDate>,
    pub assigned_to: Option<String>,
    pub mediation_plan: Option<String>,
    pub opened_on: NaiveDate,
    pub updated_on: NaiveDate,
    pub version: u64,
}

impl Dispute {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn days_open(&self, today: NaiveDate) -> i64 {
        (today - self.opened_on).num_days().max(0)
    }
}
