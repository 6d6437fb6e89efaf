use chrono::{DateTime, Utc};
use oso::PolarClass;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{invalid_state_error, Error};

#[derive(Clone, Debug, Serialize, Deserialize, PolarClass)]
pub struct Rfp {
    #[polar(attribute)]
    pub id: Uuid,
    #[polar(attribute)]
    pub organization_id: Uuid,
    pub title: String,
    pub mode: TransportMode,
    pub deadline: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub status: Status,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    FullTruckload,
    Ltl,
    Intermodal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Draft,
    Active,
    Closed,
}

impl Status {
    pub fn name(&self) -> String {
        match self {
            Self::Draft => "draft".into(),
            Self::Active => "active".into(),
            Self::Closed => "closed".into(),
        }
    }
}

impl Rfp {
    pub fn new(
        organization_id: Uuid,
        title: String,
        mode: TransportMode,
        deadline: Option<DateTime<Utc>>,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            organization_id,
            title,
            mode,
            deadline,
            notes,
            status: Status::Draft,
        }
    }

    pub fn is_draft(&self) -> bool {
        self.status == Status::Draft
    }

    pub fn is_active(&self) -> bool {
        self.status == Status::Active
    }

    pub fn publish(&mut self) -> Result<(), Error> {
        match self.status {
            Status::Draft => {
                self.status = Status::Active;
                Ok(())
            }
            _ => Err(invalid_state_error()),
        }
    }

    pub fn close(&mut self) -> Result<(), Error> {
        match self.status {
            Status::Active => {
                self.status = Status::Closed;
                Ok(())
            }
            _ => Err(invalid_state_error()),
        }
    }

    /// Reopening leaves existing bids and invites exactly as they were; the
    /// caller is expected to log this.
    pub fn reopen(&mut self) -> Result<(), Error> {
        match self.status {
            Status::Closed => {
                self.status = Status::Draft;
                Ok(())
            }
            _ => Err(invalid_state_error()),
        }
    }
}

#[cfg(test)]
fn rfp() -> Rfp {
    Rfp::new(
        Uuid::new_v4(),
        "Q3 Midwest dry van".into(),
        TransportMode::FullTruckload,
        None,
        None,
    )
}

#[test]
fn lifecycle_walks_draft_active_closed_and_back() {
    let mut rfp = rfp();
    assert!(rfp.is_draft());

    rfp.publish().unwrap();
    assert!(rfp.is_active());

    rfp.close().unwrap();
    assert_eq!(rfp.status, Status::Closed);

    rfp.reopen().unwrap();
    assert!(rfp.is_draft());
}

#[test]
fn out_of_order_transitions_are_rejected() {
    let mut rfp = rfp();

    assert!(rfp.close().is_err());
    assert!(rfp.reopen().is_err());

    rfp.publish().unwrap();
    assert!(rfp.publish().is_err());
    assert!(rfp.reopen().is_err());

    rfp.close().unwrap();
    assert!(rfp.close().is_err());
    assert!(rfp.publish().is_err());
}
