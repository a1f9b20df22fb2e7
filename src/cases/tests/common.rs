use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

use chrono::NaiveDate;

use crate::cases::domain::{
    CaseFinancials, CaseId, CaseIntake, CaseNumber, CasePhase, CasePriority, CaseStatus, CaseType,
    ContractRef, LegalCase, Party, PartyRole, RiskLevel,
};
use crate::cases::repository::{CaseRepository, RepositoryError};
use crate::cases::transitions;

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn party(id: &str, name: &str, role: PartyRole) -> Party {
    Party {
        id: id.to_string(),
        name: name.to_string(),
        email: format!("{id}@example.com"),
        role,
    }
}

pub(super) fn contract() -> ContractRef {
    ContractRef {
        contract_id: "cnt-001".to_string(),
        contract_number: "CNT-001".to_string(),
        property_title: "Downtown Apartment 4B".to_string(),
        property_address: "Alameda 123".to_string(),
        tenant: party("tenant-1", "Maria Gonzalez", PartyRole::Tenant),
        owner: party("owner-1", "Carlos Rodriguez", PartyRole::Owner),
        broker: Some(party("broker-1", "Ana Lopez", PartyRole::Broker)),
    }
}

pub(super) fn intake(total_debt: i64, first_default: NaiveDate) -> CaseIntake {
    CaseIntake {
        case_type: CaseType::NonPayment,
        contract: contract(),
        total_debt,
        first_default_date: first_default,
        notes: Some("three months of unpaid rent".to_string()),
        assigned_lawyer: None,
    }
}

/// Directly constructed case for unit tests that bypass the service.
pub(super) fn case_in(status: CaseStatus, total_debt: i64) -> LegalCase {
    let opened = date(2025, 1, 10);
    LegalCase {
        id: CaseId("case-test-1".to_string()),
        case_number: CaseNumber("LC-TEST-1".to_string()),
        case_type: CaseType::NonPayment,
        status,
        current_phase: transitions::phase_for(status),
        priority: CasePriority::Low,
        risk_level: RiskLevel::Low,
        financials: CaseFinancials::opening(total_debt),
        settlement_offer: None,
        first_default_date: date(2025, 1, 1),
        opened_on: opened,
        updated_on: opened,
        next_deadline: None,
        court_date: None,
        contract: contract(),
        notices: Vec::new(),
        documents: Vec::new(),
        proceedings: Vec::new(),
        audit_trail: Vec::new(),
        assigned_lawyer: None,
        phases_entered: BTreeSet::from([CasePhase::PreJudicial]),
        missed_deadlines: 0,
        last_escalated_deadline: None,
        archived: false,
        version: 1,
    }
}

#[derive(Default)]
pub(super) struct MemoryCaseRepository {
    cases: Mutex<HashMap<String, LegalCase>>,
}

impl CaseRepository for MemoryCaseRepository {
    fn insert(&self, case: LegalCase) -> Result<LegalCase, RepositoryError> {
        let mut cases = self.cases.lock().expect("case store poisoned");
        if cases.contains_key(&case.id.0) {
            return Err(RepositoryError::Conflict);
        }
        cases.insert(case.id.0.clone(), case.clone());
        Ok(case)
    }

    fn load(&self, id: &CaseId) -> Result<Option<LegalCase>, RepositoryError> {
        let cases = self.cases.lock().expect("case store poisoned");
        Ok(cases.get(&id.0).cloned())
    }

    fn save(&self, case: LegalCase, expected_version: u64) -> Result<(), RepositoryError> {
        let mut cases = self.cases.lock().expect("case store poisoned");
        let stored = cases.get(&case.id.0).ok_or(RepositoryError::NotFound)?;
        if stored.version != expected_version {
            return Err(RepositoryError::StaleVersion {
                expected: expected_version,
                stored: stored.version,
            });
        }
        cases.insert(case.id.0.clone(), case);
        Ok(())
    }

    fn list_active(&self) -> Result<Vec<LegalCase>, RepositoryError> {
        let cases = self.cases.lock().expect("case store poisoned");
        Ok(cases
            .values()
            .filter(|case| !case.is_terminal() && !case.archived)
            .cloned()
            .collect())
    }
}
