use serde::{Deserialize, Serialize};

use crate::entities::carrier::Status;
use crate::entities::{OperationCode, RegistrySnapshot};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Verdict {
    pub status: Status,
    pub reason: String,
}

/// Classifies a carrier's operational status from its registry snapshot.
/// Pure and deterministic; first matching rule wins:
///
/// 1. explicit denial of operating authorization -> suspended
/// 2. no active authority, no interstate/intrastate operation, and an
///    inactive overall record -> suspended
/// 3. out-of-service rate above the national average on either the vehicle
///    or driver axis -> pending safety review
/// 4. otherwise -> approved
pub fn classify(snapshot: &RegistrySnapshot) -> Verdict {
    if snapshot.allowed_to_operate == Some(false) {
        return Verdict {
            status: Status::Suspended,
            reason: "Not Authorized to Operate".into(),
        };
    }

    let has_authority = snapshot.common_authority.is_active()
        || snapshot.contract_authority.is_active()
        || snapshot.broker_authority.is_active();

    let has_operation = match snapshot.operation_code {
        OperationCode::Interstate | OperationCode::Intrastate => true,
        OperationCode::Unspecified => false,
    };

    if !has_authority && !has_operation && !snapshot.active_status {
        return Verdict {
            status: Status::Suspended,
            reason: "No Active Operating Authority".into(),
        };
    }

    let vehicle_flagged = exceeds_benchmark(
        snapshot.vehicle_oos_rate,
        snapshot.vehicle_oos_national_average,
    );
    let driver_flagged = exceeds_benchmark(
        snapshot.driver_oos_rate,
        snapshot.driver_oos_national_average,
    );

    if vehicle_flagged || driver_flagged {
        return Verdict {
            status: Status::Pending,
            reason: "Safety Review Required (High OOS Rate)".into(),
        };
    }

    Verdict {
        status: Status::Approved,
        reason: "Authorized to Operate".into(),
    }
}

// A zero benchmark means no national average was published for the axis; the
// comparison is skipped rather than treated as exceeded.
fn exceeds_benchmark(rate: f64, benchmark: f64) -> bool {
    benchmark > 0.0 && rate > benchmark
}

#[cfg(test)]
fn authorized_snapshot() -> RegistrySnapshot {
    use crate::entities::{AuthorityStatus, OperationCode};
    use chrono::Utc;

    RegistrySnapshot {
        legal_name: Some("ACME FREIGHT LLC".into()),
        physical_address: Some("100 MAIN ST, SPRINGFIELD, IL".into()),
        phone: Some("(555) 010-2000".into()),
        dot_number: Some("12345".into()),
        mc_number: Some("123456".into()),
        common_authority: AuthorityStatus::Active,
        contract_authority: AuthorityStatus::Active,
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
    }
}

#[test]
fn authorized_carrier_is_approved() {
    let verdict = classify(&authorized_snapshot());

    assert_eq!(verdict.status, Status::Approved);
    assert_eq!(verdict.reason, "Authorized to Operate");
}

#[test]
fn explicit_denial_is_suspended_regardless_of_other_fields() {
    let mut snapshot = authorized_snapshot();
    snapshot.allowed_to_operate = Some(false);

    // even with clean OOS rates and active authority
    let verdict = classify(&snapshot);

    assert_eq!(verdict.status, Status::Suspended);
    assert_eq!(verdict.reason, "Not Authorized to Operate");

    snapshot.vehicle_oos_rate = 0.0;
    snapshot.driver_oos_rate = 0.0;
    let verdict = classify(&snapshot);

    assert_eq!(verdict.status, Status::Suspended);
    assert_eq!(verdict.reason, "Not Authorized to Operate");
}

#[test]
fn no_active_signals_is_suspended() {
    use crate::entities::{AuthorityStatus, OperationCode};

    let mut snapshot = authorized_snapshot();
    snapshot.allowed_to_operate = None;
    snapshot.common_authority = AuthorityStatus::Inactive;
    snapshot.contract_authority = AuthorityStatus::Inactive;
    snapshot.broker_authority = AuthorityStatus::Inactive;
    snapshot.operation_code = OperationCode::Unspecified;
    snapshot.active_status = false;

    let verdict = classify(&snapshot);

    assert_eq!(verdict.status, Status::Suspended);
    assert_eq!(verdict.reason, "No Active Operating Authority");
}

#[test]
fn any_single_active_signal_passes_the_authority_gate() {
    use crate::entities::{AuthorityStatus, OperationCode};

    let mut base = authorized_snapshot();
    base.common_authority = AuthorityStatus::Inactive;
    base.contract_authority = AuthorityStatus::Inactive;
    base.broker_authority = AuthorityStatus::Inactive;
    base.operation_code = OperationCode::Unspecified;
    base.active_status = false;

    let mut with_broker = base.clone();
    with_broker.broker_authority = AuthorityStatus::Active;
    assert_eq!(classify(&with_broker).status, Status::Approved);

    let mut with_intrastate = base.clone();
    with_intrastate.operation_code = OperationCode::Intrastate;
    assert_eq!(classify(&with_intrastate).status, Status::Approved);

    let mut with_active_record = base.clone();
    with_active_record.active_status = true;
    assert_eq!(classify(&with_active_record).status, Status::Approved);
}

#[test]
fn high_vehicle_oos_rate_is_pending_even_with_full_authority() {
    let mut snapshot = authorized_snapshot();
    snapshot.vehicle_oos_rate = 30.0;
    snapshot.vehicle_oos_national_average = 20.72;

    let verdict = classify(&snapshot);

    assert_eq!(verdict.status, Status::Pending);
    assert_eq!(verdict.reason, "Safety Review Required (High OOS Rate)");
}

#[test]
fn high_driver_oos_rate_is_pending() {
    let mut snapshot = authorized_snapshot();
    snapshot.driver_oos_rate = 9.5;
    snapshot.driver_oos_national_average = 5.51;

    let verdict = classify(&snapshot);

    assert_eq!(verdict.status, Status::Pending);
    assert_eq!(verdict.reason, "Safety Review Required (High OOS Rate)");
}

#[test]
fn zero_benchmark_never_triggers_the_safety_flag() {
    let mut snapshot = authorized_snapshot();
    snapshot.vehicle_oos_rate = 99.0;
    snapshot.vehicle_oos_national_average = 0.0;
    snapshot.driver_oos_rate = 99.0;
    snapshot.driver_oos_national_average = 0.0;

    let verdict = classify(&snapshot);

    assert_eq!(verdict.status, Status::Approved);
    assert_eq!(verdict.reason, "Authorized to Operate");
}

#[test]
fn rates_at_the_benchmark_are_not_flagged() {
    let mut snapshot = authorized_snapshot();
    snapshot.vehicle_oos_rate = 5.0;
    snapshot.vehicle_oos_national_average = 5.0;
    snapshot.driver_oos_rate = 3.0;
    snapshot.driver_oos_national_average = 3.0;

    assert_eq!(classify(&snapshot).status, Status::Approved);
}
