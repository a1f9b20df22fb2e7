use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for persisted legal cases.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaseId(pub String);

/// Human-readable case number, unique and assigned at creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaseNumber(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseType {
    NonPayment,
    PropertyDamage,
    BreachOfContract,
    IllegalOccupation,
    RentIncreaseDispute,
    SecurityDepositDispute,
    UtilityPaymentDispute,
    Other,
}

impl CaseType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NonPayment => "Eviction / Non-Payment",
            Self::PropertyDamage => "Damage Claim",
            Self::BreachOfContract => "Breach of Contract",
            Self::IllegalOccupation => "Illegal Occupation",
            Self::RentIncreaseDispute => "Rent Increase Dispute",
            Self::SecurityDepositDispute => "Security Deposit Dispute",
            Self::UtilityPaymentDispute => "Utility Payment Dispute",
            Self::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    PreJudicial,
    ExtrajudicialNotice,
    WaitingResponse,
    DemandPreparation,
    DemandFiled,
    CourtProcess,
    HearingScheduled,
    JudgmentPending,
    JudgmentIssued,
    EvictionOrdered,
    EvictionCompleted,
    PaymentCollection,
    CaseClosed,
    SettlementReached,
    Dismissed,
}

impl CaseStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::PreJudicial => "Pre-Judicial",
            Self::ExtrajudicialNotice => "Extrajudicial Notice",
            Self::WaitingResponse => "Waiting Response",
            Self::DemandPreparation => "Demand Preparation",
            Self::DemandFiled => "Demand Filed",
            Self::CourtProcess => "Court Process",
            Self::HearingScheduled => "Hearing Scheduled",
            Self::JudgmentPending => "Judgment Pending",
            Self::JudgmentIssued => "Judgment Issued",
            Self::EvictionOrdered => "Eviction Ordered",
            Self::EvictionCompleted => "Eviction Completed",
            Self::PaymentCollection => "Payment Collection",
            Self::CaseClosed => "Case Closed",
            Self::SettlementReached => "Settlement Reached",
            Self::Dismissed => "Dismissed",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::CaseClosed | Self::SettlementReached | Self::Dismissed
        )
    }
}

/// Procedural phase derived from the current status; never set directly.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CasePhase {
    PreJudicial,
    Judicial,
    Execution,
    Closed,
}

impl CasePhase {
    pub const fn label(self) -> &'static str {
        match self {
            Self::PreJudicial => "Pre-Judicial",
            Self::Judicial => "Judicial",
            Self::Execution => "Execution",
            Self::Closed => "Closed",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CasePriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl CasePriority {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Urgent => "Urgent",
        }
    }

    pub const fn escalated(self) -> Self {
        match self {
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High | Self::Urgent => Self::Urgent,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }

    pub const fn escalated(self) -> Self {
        match self {
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High | Self::Critical => Self::Critical,
        }
    }
}

/// Money is carried as integer minor units of the contract currency.
/// Rounding happens at the smallest unit, round-half-up, inside the accrual
/// engine; no floating point touches these fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseFinancials {
    pub total_debt: i64,
    pub accumulated_interest: i64,
    pub legal_fees: i64,
    pub court_fees: i64,
    pub total_amount: i64,
}

impl CaseFinancials {
    pub fn opening(total_debt: i64) -> Self {
        Self {
            total_debt,
            accumulated_interest: 0,
            legal_fees: 0,
            court_fees: 0,
            total_amount: total_debt,
        }
    }

    /// Invariant: total_amount is always the sum of the other four fields.
    pub fn is_consistent(&self) -> bool {
        self.total_amount
            == self.total_debt + self.accumulated_interest + self.legal_fees + self.court_fees
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyRole {
    Tenant,
    Owner,
    Broker,
    Lawyer,
    Admin,
}

impl PartyRole {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Tenant => "Tenant",
            Self::Owner => "Owner",
            Self::Broker => "Broker",
            Self::Lawyer => "Lawyer",
            Self::Admin => "Admin",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: PartyRole,
}

/// Snapshot of the rental contract a case was opened against, carried so the
/// engine can address notifications without re-joining the contract tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractRef {
    pub contract_id: String,
    pub contract_number: String,
    pub property_title: String,
    pub property_address: String,
    pub tenant: Party,
    pub owner: Party,
    pub broker: Option<Party>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeMethod {
    CertifiedMail,
    Notary,
    Email,
    PersonalService,
}

/// Extrajudicial notice sent to the tenant before any demand is filed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtrajudicialNotice {
    pub sent_on: NaiveDate,
    pub method: NoticeMethod,
    pub response_due: NaiveDate,
    pub responded: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Demand,
    Evidence,
    Contract,
    CourtOrder,
    Receipt,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalDocument {
    pub name: String,
    pub kind: DocumentKind,
    pub storage_key: String,
    pub added_on: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourtProceeding {
    pub court: String,
    pub description: String,
    pub scheduled_for: NaiveDate,
}

/// Append-only audit record; status changes carry both endpoints so the
/// precondition checks can replay the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub recorded_on: NaiveDate,
    pub actor: String,
    pub action: String,
    pub from_status: Option<CaseStatus>,
    pub to_status: Option<CaseStatus>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseResolution {
    Settlement,
    Judgment,
    Dismissed,
    Withdrawn,
    Other,
}

impl CaseResolution {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Settlement => "Settlement",
            Self::Judgment => "Judgment",
            Self::Dismissed => "Dismissed",
            Self::Withdrawn => "Withdrawn",
            Self::Other => "Other",
        }
    }
}

/// Everything the caller supplies when a contract enters default or a
/// damage/breach event is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseIntake {
    pub case_type: CaseType,
    pub contract: ContractRef,
    pub total_debt: i64,
    pub first_default_date: NaiveDate,
    pub notes: Option<String>,
    pub assigned_lawyer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegalCase {
    pub id: CaseId,
    pub case_number: CaseNumber,
    pub case_type: CaseType,
    pub status: CaseStatus,
    pub current_phase: CasePhase,
    pub priority: CasePriority,
    pub risk_level: RiskLevel,
    pub financials: CaseFinancials,
    pub settlement_offer: Option<i64>,
    pub first_default_date: NaiveDate,
    pub opened_on: NaiveDate,
    pub updated_on: NaiveDate,
    pub next_deadline: Option<NaiveDate>,
    pub court_date: Option<NaiveDate>,
    pub contract: ContractRef,
    pub notices: Vec<ExtrajudicialNotice>,
    pub documents: Vec<LegalDocument>,
    pub proceedings: Vec<CourtProceeding>,
    pub audit_trail: Vec<AuditEntry>,
    pub assigned_lawyer: Option<String>,
    pub phases_entered: BTreeSet<CasePhase>,
    pub missed_deadlines: u32,
    pub last_escalated_deadline: Option<NaiveDate>,
    pub archived: bool,
    pub version: u64,
}

impl LegalCase {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn days_open(&self, today: NaiveDate) -> i64 {
        (today - self.opened_on).num_days().max(0)
    }

    pub fn has_document(&self, kind: DocumentKind) -> bool {
        self.documents.iter().any(|document| document.kind == kind)
    }

    /// Whether the case ever sat in `status`, current state included.
    pub fn has_reached(&self, status: CaseStatus) -> bool {
        self.status == status
            || self
                .audit_trail
                .iter()
                .any(|entry| entry.to_status == Some(status) || entry.from_status == Some(status))
    }

    pub fn record_audit(
        &mut self,
        recorded_on: NaiveDate,
        actor: &str,
        action: &str,
        from_status: Option<CaseStatus>,
        to_status: Option<CaseStatus>,
        notes: Option<String>,
    ) {
        self.audit_trail.push(AuditEntry {
            recorded_on,
            actor: actor.to_owned(),
            action: action.to_owned(),
            from_status,
            to_status,
            notes,
        });
    }
}
