use oso::{Oso, PolarClass};

use crate::auth::{Organization, User};
use crate::entities::{Carrier, Registration, Rfp};

pub fn new() -> Oso {
    let mut o = Oso::new();

    o.register_class(User::get_polar_class()).unwrap();
    o.register_class(Organization::get_polar_class()).unwrap();
    o.register_class(Carrier::get_polar_class()).unwrap();
    o.register_class(Registration::get_polar_class()).unwrap();
    o.register_class(Rfp::get_polar_class()).unwrap();

    o.load_str(include_str!("rules.polar")).unwrap();

    o
}

#[cfg(test)]
fn carrier_in(organization_id: uuid::Uuid) -> Carrier {
    use crate::entities::carrier::Status;
    use uuid::Uuid;

    Carrier {
        id: Uuid::new_v4(),
        organization_id,
        name: "Acme".into(),
        dot_number: Some("12345".into()),
        mc_number: None,
        email: None,
        phone: None,
        equipment: vec![],
        insurance_expires_at: None,
        status: Status::Approved,
        status_reason: "Authorized to Operate".into(),
        deleted: false,
        snapshot: None,
    }
}

#[test]
fn members_act_within_their_own_organization() {
    use uuid::Uuid;

    let authorizor = new();

    let org_id = Uuid::new_v4();
    let member = User::member(org_id);
    let carrier = carrier_in(org_id);

    let result = authorizor.is_allowed(member.clone(), "read", carrier.clone());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(member.clone(), "update", carrier.clone());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(
        member.clone(),
        "register_carrier",
        Organization::new(org_id),
    );
    assert_eq!(result.unwrap(), true);
}

#[test]
fn cross_organization_access_is_denied() {
    use uuid::Uuid;

    let authorizor = new();

    let outsider = User::admin(Uuid::new_v4());
    let carrier = carrier_in(Uuid::new_v4());

    let result = authorizor.is_allowed(outsider.clone(), "read", carrier.clone());
    assert_eq!(result.unwrap(), false);

    let result = authorizor.is_allowed(outsider.clone(), "remove", carrier.clone());
    assert_eq!(result.unwrap(), false);

    let result = authorizor.is_allowed(
        outsider.clone(),
        "create_rfp",
        Organization::new(carrier.organization_id),
    );
    assert_eq!(result.unwrap(), false);
}

#[test]
fn carrier_removal_requires_the_admin_role() {
    use uuid::Uuid;

    let authorizor = new();

    let org_id = Uuid::new_v4();
    let member = User::member(org_id);
    let admin = User::admin(org_id);
    let carrier = carrier_in(org_id);

    let result = authorizor.is_allowed(member.clone(), "remove", carrier.clone());
    assert_eq!(result.unwrap(), false);

    let result = authorizor.is_allowed(admin.clone(), "remove", carrier.clone());
    assert_eq!(result.unwrap(), true);
}

#[test]
fn bid_decisions_require_the_admin_role() {
    use crate::entities::TransportMode;
    use uuid::Uuid;

    let authorizor = new();

    let org_id = Uuid::new_v4();
    let member = User::member(org_id);
    let admin = User::admin(org_id);

    let rfp = Rfp::new(
        org_id,
        "Q3 Midwest dry van".into(),
        TransportMode::FullTruckload,
        None,
        None,
    );

    let result = authorizor.is_allowed(member.clone(), "read", rfp.clone());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(member.clone(), "decide_bids", rfp.clone());
    assert_eq!(result.unwrap(), false);

    let result = authorizor.is_allowed(admin.clone(), "decide_bids", rfp.clone());
    assert_eq!(result.unwrap(), true);
}
