use oso::PolarClass;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::eligibility::Verdict;
use crate::entities::RegistrySnapshot;
use crate::error::{invalid_state_error, validation_error, Error};

/// A carrier registration attempt: verify against the registry, hold for
/// operator confirmation, then persist. Modeled as an explicit state machine
/// so the confirmation gate is a reproducible transition rather than UI
/// state.
#[derive(Clone, Debug, Serialize, Deserialize, PolarClass)]
pub struct Registration {
    #[polar(attribute)]
    pub id: Uuid,
    #[polar(attribute)]
    pub organization_id: Uuid,
    pub dot_number: Option<String>,
    pub mc_number: Option<String>,
    pub status: Status,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Status {
    Idle,
    Verifying,
    AwaitingConfirmation {
        snapshot: RegistrySnapshot,
        verdict: Verdict,
    },
    Persisting,
    Failed {
        reason: String,
    },
    Done {
        carrier_id: Uuid,
    },
}

impl Status {
    pub fn name(&self) -> String {
        match self {
            Self::Idle => "idle".into(),
            Self::Verifying => "verifying".into(),
            Self::AwaitingConfirmation {
                snapshot: _,
                verdict: _,
            } => "awaiting_confirmation".into(),
            Self::Persisting => "persisting".into(),
            Self::Failed { reason: _ } => "failed".into(),
            Self::Done { carrier_id: _ } => "done".into(),
        }
    }
}

/// Operator-submitted identifiers for a registration attempt.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub dot_number: Option<String>,
    pub mc_number: Option<String>,
}

impl RegistrationRequest {
    /// Normalizes both identifiers and requires at least one to survive
    /// normalization.
    pub fn normalized(&self) -> Result<Self, Error> {
        let dot_number = self.dot_number.as_deref().and_then(normalize_dot);
        let mc_number = self.mc_number.as_deref().and_then(normalize_docket);

        if dot_number.is_none() && mc_number.is_none() {
            return Err(validation_error("a DOT number or MC number is required"));
        }

        Ok(Self {
            dot_number,
            mc_number,
        })
    }
}

/// Lookup key for an MC number: whitespace and any leading "MC"/"MC-"
/// prefix are stripped, leaving the bare docket digits.
pub fn normalize_docket(input: &str) -> Option<String> {
    let compact: String = input.split_whitespace().collect();
    let upper = compact.to_uppercase();
    let rest = upper.strip_prefix("MC").unwrap_or(&upper);
    let rest = rest.strip_prefix('-').unwrap_or(rest);

    let digits: String = rest.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.is_empty() {
        None
    } else {
        Some(digits)
    }
}

pub fn normalize_dot(input: &str) -> Option<String> {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.is_empty() {
        None
    } else {
        Some(digits)
    }
}

impl Registration {
    pub fn new(organization_id: Uuid, request: &RegistrationRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            organization_id,
            dot_number: request.dot_number.clone(),
            mc_number: request.mc_number.clone(),
            status: Status::Idle,
        }
    }

    pub fn request(&self) -> RegistrationRequest {
        RegistrationRequest {
            dot_number: self.dot_number.clone(),
            mc_number: self.mc_number.clone(),
        }
    }

    pub fn begin_verification(&mut self) -> Result<(), Error> {
        match self.status {
            Status::Idle => {
                self.status = Status::Verifying;
                Ok(())
            }
            _ => Err(invalid_state_error()),
        }
    }

    pub fn verified(&mut self, snapshot: RegistrySnapshot, verdict: Verdict) -> Result<(), Error> {
        match self.status {
            Status::Verifying => {
                self.status = Status::AwaitingConfirmation { snapshot, verdict };
                Ok(())
            }
            _ => Err(invalid_state_error()),
        }
    }

    pub fn failed(&mut self, reason: String) -> Result<(), Error> {
        match self.status {
            Status::Verifying | Status::Persisting => {
                self.status = Status::Failed { reason };
                Ok(())
            }
            _ => Err(invalid_state_error()),
        }
    }

    /// The operator approves the registry-derived data. Hands back the held
    /// snapshot and verdict for assembly.
    pub fn confirm(&mut self) -> Result<(RegistrySnapshot, Verdict), Error> {
        match std::mem::replace(&mut self.status, Status::Persisting) {
            Status::AwaitingConfirmation { snapshot, verdict } => Ok((snapshot, verdict)),
            other => {
                self.status = other;
                Err(invalid_state_error())
            }
        }
    }

    pub fn completed(&mut self, carrier_id: Uuid) -> Result<(), Error> {
        match self.status {
            Status::Persisting => {
                self.status = Status::Done { carrier_id };
                Ok(())
            }
            _ => Err(invalid_state_error()),
        }
    }
}

#[test]
fn docket_normalization_resolves_to_one_lookup_key() {
    assert_eq!(normalize_docket("MC-123456").unwrap(), "123456");
    assert_eq!(normalize_docket("MC123456").unwrap(), "123456");
    assert_eq!(normalize_docket("123456").unwrap(), "123456");
    assert_eq!(normalize_docket("  mc 123456 ").unwrap(), "123456");
    assert_eq!(normalize_docket("MC-"), None);
    assert_eq!(normalize_docket(""), None);
}

#[test]
fn request_requires_at_least_one_identifier() {
    let request = RegistrationRequest {
        dot_number: Some("  ".into()),
        mc_number: Some("MC-".into()),
    };

    assert!(request.normalized().is_err());

    let request = RegistrationRequest {
        dot_number: Some(" 12345 ".into()),
        mc_number: None,
    };

    let normalized = request.normalized().unwrap();
    assert_eq!(normalized.dot_number.unwrap(), "12345");
    assert_eq!(normalized.mc_number, None);
}

#[cfg(test)]
fn fixture() -> (Registration, RegistrySnapshot, Verdict) {
    use crate::eligibility::classify;
    use crate::entities::{AuthorityStatus, OperationCode};
    use chrono::Utc;

    let request = RegistrationRequest {
        dot_number: Some("12345".into()),
        mc_number: None,
    };

    let snapshot = RegistrySnapshot {
        legal_name: None,
        physical_address: None,
        phone: None,
        dot_number: Some("12345".into()),
        mc_number: None,
        common_authority: AuthorityStatus::Active,
        contract_authority: AuthorityStatus::Inactive,
        broker_authority: AuthorityStatus::Inactive,
        allowed_to_operate: Some(true),
        operation_code: OperationCode::Interstate,
        active_status: true,
        vehicle_oos_rate: 0.0,
        vehicle_oos_national_average: 0.0,
        driver_oos_rate: 0.0,
        driver_oos_national_average: 0.0,
        raw: serde_json::json!({}),
        fetched_at: Utc::now(),
    };

    let verdict = classify(&snapshot);

    (Registration::new(Uuid::new_v4(), &request), snapshot, verdict)
}

#[test]
fn registration_walks_the_full_machine() {
    let (mut registration, snapshot, verdict) = fixture();

    registration.begin_verification().unwrap();
    registration.verified(snapshot, verdict).unwrap();

    let (snapshot, verdict) = registration.confirm().unwrap();
    assert_eq!(snapshot.dot_number.as_deref(), Some("12345"));
    assert_eq!(verdict.reason, "Authorized to Operate");

    let carrier_id = Uuid::new_v4();
    registration.completed(carrier_id).unwrap();

    match registration.status {
        Status::Done { carrier_id: done } => assert_eq!(done, carrier_id),
        _ => panic!("expected done"),
    }
}

#[test]
fn confirm_requires_a_verified_registration() {
    let (mut registration, _, _) = fixture();

    assert!(registration.confirm().is_err());
    assert!(matches!(registration.status, Status::Idle));

    registration.begin_verification().unwrap();
    assert!(registration.confirm().is_err());
    assert!(matches!(registration.status, Status::Verifying));
}

#[test]
fn failed_verification_cannot_be_confirmed() {
    let (mut registration, _, _) = fixture();

    registration.begin_verification().unwrap();
    registration.failed("registry unavailable".into()).unwrap();

    assert!(registration.confirm().is_err());
    assert!(registration.completed(Uuid::new_v4()).is_err());
}

#[test]
fn completion_requires_the_persisting_state() {
    let (mut registration, snapshot, verdict) = fixture();

    registration.begin_verification().unwrap();
    registration.verified(snapshot, verdict).unwrap();

    assert!(registration.completed(Uuid::new_v4()).is_err());
}
