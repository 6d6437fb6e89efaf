use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{invalid_operation_error, Error};

const ACCESS_TOKEN_LENGTH: usize = 32;

/// Authorizes one carrier to bid on one RFP. The access token is the sole
/// credential for the public bidding surface, so it is drawn from a CSPRNG.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Invite {
    pub id: Uuid,
    pub rfp_id: Uuid,
    pub carrier_id: Uuid,
    pub access_token: String,
    pub status: Status,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Invited,
    Opened,
    Submitted,
}

impl Status {
    pub fn name(&self) -> String {
        match self {
            Self::Invited => "invited".into(),
            Self::Opened => "opened".into(),
            Self::Submitted => "submitted".into(),
        }
    }
}

impl Invite {
    pub fn new(rfp_id: Uuid, carrier_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            rfp_id,
            carrier_id,
            access_token: access_token(),
            status: Status::Invited,
        }
    }

    /// First open moves the invite along; later opens are no-ops so the
    /// carrier can revisit the link.
    pub fn mark_opened(&mut self) {
        if self.status == Status::Invited {
            self.status = Status::Opened;
        }
    }

    /// One submission per invite.
    pub fn submit(&mut self) -> Result<(), Error> {
        match self.status {
            Status::Invited | Status::Opened => {
                self.status = Status::Submitted;
                Ok(())
            }
            Status::Submitted => Err(invalid_operation_error(
                "bids have already been submitted for this invite",
            )),
        }
    }
}

fn access_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ACCESS_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

#[test]
fn access_tokens_are_long_alphanumeric_and_distinct() {
    let a = Invite::new(Uuid::new_v4(), Uuid::new_v4());
    let b = Invite::new(Uuid::new_v4(), Uuid::new_v4());

    assert_eq!(a.access_token.len(), ACCESS_TOKEN_LENGTH);
    assert!(a.access_token.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_ne!(a.access_token, b.access_token);
}

#[test]
fn opening_is_idempotent() {
    let mut invite = Invite::new(Uuid::new_v4(), Uuid::new_v4());

    invite.mark_opened();
    assert_eq!(invite.status, Status::Opened);

    invite.mark_opened();
    assert_eq!(invite.status, Status::Opened);

    invite.submit().unwrap();
    invite.mark_opened();
    assert_eq!(invite.status, Status::Submitted);
}

#[test]
fn a_second_submission_is_rejected() {
    let mut invite = Invite::new(Uuid::new_v4(), Uuid::new_v4());

    invite.submit().unwrap();
    assert!(invite.submit().is_err());
}
