use chrono::NaiveDate;
use oso::PolarClass;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::eligibility::Verdict;
use crate::entities::registration::RegistrationRequest;
use crate::entities::RegistrySnapshot;

#[derive(Clone, Debug, Serialize, Deserialize, PolarClass)]
pub struct Carrier {
    #[polar(attribute)]
    pub id: Uuid,
    #[polar(attribute)]
    pub organization_id: Uuid,
    pub name: String,
    pub dot_number: Option<String>,
    pub mc_number: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub equipment: Vec<EquipmentType>,
    pub insurance_expires_at: Option<NaiveDate>,
    pub status: Status,
    pub status_reason: String,
    pub deleted: bool,
    pub snapshot: Option<RegistrySnapshot>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Approved,
    Pending,
    Suspended,
}

impl Status {
    pub fn name(&self) -> String {
        match self {
            Self::Approved => "approved".into(),
            Self::Pending => "pending".into(),
            Self::Suspended => "suspended".into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentType {
    DryVan,
    Reefer,
    Flatbed,
    StepDeck,
    PowerOnly,
}

/// Operator-entered carrier fields. Used both at registration confirmation
/// and for later edits; registry identifiers and lifecycle status are never
/// taken from here.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CarrierForm {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub equipment: Vec<EquipmentType>,
    pub insurance_expires_at: Option<NaiveDate>,
}

impl Carrier {
    /// Merges operator input, the registry snapshot, and the classifier's
    /// verdict into a persistable record.
    ///
    /// The operator-entered name is authoritative; the registry legal name
    /// stays inside the snapshot for display. The operator phone wins when
    /// non-blank. Identifiers are canonicalized from the registry (the
    /// source that confirmed them), falling back to the normalized operator
    /// input. An explicit registry denial forces suspension regardless of
    /// the verdict.
    pub fn assemble(
        organization_id: Uuid,
        form: CarrierForm,
        request: &RegistrationRequest,
        snapshot: RegistrySnapshot,
        verdict: &Verdict,
    ) -> Self {
        let phone = non_blank(form.phone).or_else(|| snapshot.phone.clone());

        let dot_number = snapshot
            .dot_number
            .clone()
            .or_else(|| request.dot_number.clone());
        let mc_number = snapshot
            .mc_number
            .clone()
            .or_else(|| request.mc_number.clone());

        let (status, status_reason) = if snapshot.allowed_to_operate == Some(false) {
            (Status::Suspended, "Not Authorized to Operate".into())
        } else {
            (verdict.status, verdict.reason.clone())
        };

        Self {
            id: Uuid::new_v4(),
            organization_id,
            name: form.name,
            dot_number,
            mc_number,
            email: non_blank(form.email),
            phone,
            equipment: form.equipment,
            insurance_expires_at: form.insurance_expires_at,
            status,
            status_reason,
            deleted: false,
            snapshot: Some(snapshot),
        }
    }

    /// Applies an operator edit. Identifiers, status, and the snapshot are
    /// not touched here.
    pub fn apply(&mut self, form: CarrierForm) {
        self.name = form.name;
        self.email = non_blank(form.email);
        if let Some(phone) = non_blank(form.phone) {
            self.phone = Some(phone);
        }
        self.equipment = form.equipment;
        self.insurance_expires_at = form.insurance_expires_at;
    }

    pub fn remove(&mut self) {
        self.deleted = true;
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[cfg(test)]
fn assembled(form: CarrierForm) -> Carrier {
    use crate::eligibility::classify;
    use crate::entities::{AuthorityStatus, OperationCode};
    use chrono::Utc;

    let snapshot = RegistrySnapshot {
        legal_name: Some("ACME FREIGHT LLC".into()),
        physical_address: Some("100 MAIN ST, SPRINGFIELD, IL".into()),
        phone: Some("(555) 010-2000".into()),
        dot_number: Some("12345".into()),
        mc_number: Some("123456".into()),
        common_authority: AuthorityStatus::Active,
        contract_authority: AuthorityStatus::Inactive,
        broker_authority: AuthorityStatus::Inactive,
        allowed_to_operate: Some(true),
        operation_code: OperationCode::Interstate,
        active_status: true,
        vehicle_oos_rate: 2.0,
        vehicle_oos_national_average: 5.0,
        driver_oos_rate: 1.0,
        driver_oos_national_average: 3.0,
        raw: serde_json::json!({}),
        fetched_at: Utc::now(),
    };

    let request = RegistrationRequest {
        dot_number: Some("12345".into()),
        mc_number: None,
    };

    let verdict = classify(&snapshot);

    Carrier::assemble(Uuid::new_v4(), form, &request, snapshot, &verdict)
}

#[cfg(test)]
fn form() -> CarrierForm {
    CarrierForm {
        name: "Acme".into(),
        email: Some("dispatch@acme.test".into()),
        phone: None,
        equipment: vec![EquipmentType::DryVan, EquipmentType::Reefer],
        insurance_expires_at: None,
    }
}

#[test]
fn operator_name_is_never_overwritten_by_legal_name() {
    let carrier = assembled(form());

    assert_eq!(carrier.name, "Acme");
    assert_eq!(
        carrier.snapshot.unwrap().legal_name.unwrap(),
        "ACME FREIGHT LLC"
    );
}

#[test]
fn registry_phone_fills_in_when_operator_phone_is_blank() {
    let mut blank = form();
    blank.phone = Some("   ".into());
    let carrier = assembled(blank);
    assert_eq!(carrier.phone.unwrap(), "(555) 010-2000");

    let mut entered = form();
    entered.phone = Some("(555) 999-0000".into());
    let carrier = assembled(entered);
    assert_eq!(carrier.phone.unwrap(), "(555) 999-0000");
}

#[test]
fn identifiers_are_canonicalized_from_the_registry() {
    let carrier = assembled(form());

    assert_eq!(carrier.dot_number.unwrap(), "12345");
    assert_eq!(carrier.mc_number.unwrap(), "123456");
}

#[test]
fn assembled_carrier_carries_the_verdict() {
    let carrier = assembled(form());

    assert_eq!(carrier.status, Status::Approved);
    assert_eq!(carrier.status_reason, "Authorized to Operate");
    assert!(!carrier.deleted);
}

#[test]
fn explicit_denial_forces_suspension_over_the_verdict() {
    let mut carrier = assembled(form());
    let mut snapshot = carrier.snapshot.take().unwrap();
    snapshot.allowed_to_operate = Some(false);

    let request = RegistrationRequest {
        dot_number: Some("12345".into()),
        mc_number: None,
    };

    // hand the assembler a verdict that disagrees with the denial
    let verdict = Verdict {
        status: Status::Approved,
        reason: "Authorized to Operate".into(),
    };

    let rebuilt = Carrier::assemble(carrier.organization_id, form(), &request, snapshot, &verdict);

    assert_eq!(rebuilt.status, Status::Suspended);
    assert_eq!(rebuilt.status_reason, "Not Authorized to Operate");
}

#[test]
fn apply_keeps_identifiers_and_status() {
    let mut carrier = assembled(form());

    carrier.apply(CarrierForm {
        name: "Acme Freight".into(),
        email: None,
        phone: None,
        equipment: vec![EquipmentType::Flatbed],
        insurance_expires_at: None,
    });

    assert_eq!(carrier.name, "Acme Freight");
    assert_eq!(carrier.equipment, vec![EquipmentType::Flatbed]);
    assert_eq!(carrier.dot_number.unwrap(), "12345");
    assert_eq!(carrier.status, Status::Approved);
}
