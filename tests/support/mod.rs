#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Barrier, Mutex};

use chrono::NaiveDate;
use rental_legal::cases::{
    CaseId, CaseIntake, CaseRepository, CaseType, ContractRef, LegalCase, NotificationRequest,
    Notifier, NotifyError, Party, PartyRole, RepositoryError,
};
use rental_legal::disputes::{Dispute, DisputeId, DisputeRepository};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub fn contract() -> ContractRef {
    ContractRef {
        contract_id: "cnt-100".to_string(),
        contract_number: "CNT-100".to_string(),
        property_title: "Central Apartment".to_string(),
        property_address: "Libertador 1200".to_string(),
        tenant: Party {
            id: "tenant-100".to_string(),
            name: "Maria Gonzalez".to_string(),
            email: "maria@example.com".to_string(),
            role: PartyRole::Tenant,
        },
        owner: Party {
            id: "owner-100".to_string(),
            name: "Carlos Rodriguez".to_string(),
            email: "carlos@example.com".to_string(),
            role: PartyRole::Owner,
        },
        broker: Some(Party {
            id: "broker-100".to_string(),
            name: "Ana Lopez".to_string(),
            email: "ana@example.com".to_string(),
            role: PartyRole::Broker,
        }),
    }
}

pub fn intake(total_debt: i64, first_default_date: NaiveDate) -> CaseIntake {
    CaseIntake {
        case_type: CaseType::NonPayment,
        contract: contract(),
        total_debt,
        first_default_date,
        notes: Some("three months of unpaid rent".to_string()),
        assigned_lawyer: Some("lawyer@example.com".to_string()),
    }
}

#[derive(Default)]
pub struct MemoryCaseRepository {
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
        let stored = cases
            .get(&case.id.0)
            .ok_or(RepositoryError::NotFound)?;
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

#[derive(Default)]
pub struct MemoryDisputeRepository {
    disputes: Mutex<HashMap<String, Dispute>>,
}

impl DisputeRepository for MemoryDisputeRepository {
    fn insert(&self, dispute: Dispute) -> Result<Dispute, RepositoryError> {
        let mut disputes = self.disputes.lock().expect("dispute store poisoned");
        if disputes.contains_key(&dispute.id.0) {
            return Err(RepositoryError::Conflict);
        }
        disputes.insert(dispute.id.0.clone(), dispute.clone());
        Ok(dispute)
    }

    fn load(&self, id: &DisputeId) -> Result<Option<Dispute>, RepositoryError> {
        let disputes = self.disputes.lock().expect("dispute store poisoned");
        Ok(disputes.get(&id.0).cloned())
    }

    fn save(&self, dispute: Dispute, expected_version: u64) -> Result<(), RepositoryError> {
        let mut disputes = self.disputes.lock().expect("dispute store poisoned");
        let stored = disputes
            .get(&dispute.id.0)
            .ok_or(RepositoryError::NotFound)?;
        if stored.version != expected_version {
            return Err(RepositoryError::StaleVersion {
                expected: expected_version,
                stored: stored.version,
            });
        }
        disputes.insert(dispute.id.0.clone(), dispute);
        Ok(())
    }

    fn list_open(&self) -> Result<Vec<Dispute>, RepositoryError> {
        let disputes = self.disputes.lock().expect("dispute store poisoned");
        Ok(disputes
            .values()
            .filter(|dispute| !dispute.is_terminal())
            .cloned()
            .collect())
    }
}

/// Notifier that records every request and can be switched into a failing
/// mode to exercise the retry path.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<NotificationRequest>>,
    pub failure: Mutex<Option<NotifyError>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, request: &NotificationRequest) -> Result<(), NotifyError> {
        if let Some(error) = self.failure.lock().expect("failure flag poisoned").clone() {
            return Err(error);
        }
        self.sent
            .lock()
            .expect("sent log poisoned")
            .push(request.clone());
        Ok(())
    }
}

/// Repository wrapper that parks every `load` on a barrier, so two
/// concurrent service calls are guaranteed to read the same version before
/// either writes it back.
pub struct BarrierRepository {
    pub inner: MemoryCaseRepository,
    pub barrier: Barrier,
}

impl BarrierRepository {
    pub fn new(parties: usize) -> Self {
        Self {
            inner: MemoryCaseRepository::default(),
            barrier: Barrier::new(parties),
        }
    }
}

impl CaseRepository for BarrierRepository {
    fn insert(&self, case: LegalCase) -> Result<LegalCase, RepositoryError> {
        self.inner.insert(case)
    }

    fn load(&self, id: &CaseId) -> Result<Option<LegalCase>, RepositoryError> {
        let loaded = self.inner.load(id);
        self.barrier.wait();
        loaded
    }

    fn save(&self, case: LegalCase, expected_version: u64) -> Result<(), RepositoryError> {
        self.inner.save(case, expected_version)
    }

    fn list_active(&self) -> Result<Vec<LegalCase>, RepositoryError> {
        self.inner.list_active()
    }
}
