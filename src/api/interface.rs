use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::User;
use crate::entities::{
    invite, Bid, BidRow, Carrier, CarrierForm, Invite, Lane, LaneRow, Registration,
    RegistrationRequest, Rfp, TransportMode,
};
use crate::error::Error;
use crate::external::mailer::DeliveryOutcome;

#[async_trait]
pub trait RegistrationAPI {
    async fn start_registration(
        &self,
        user: User,
        request: RegistrationRequest,
    ) -> Result<Registration, Error>;
    async fn confirm_registration(
        &self,
        user: User,
        id: Uuid,
        form: CarrierForm,
    ) -> Result<Carrier, Error>;
    async fn find_registration(&self, user: User, id: Uuid) -> Result<Registration, Error>;
}

#[async_trait]
pub trait CarrierAPI {
    async fn find_carrier(&self, user: User, id: Uuid) -> Result<Carrier, Error>;
    async fn list_carriers(&self, user: User) -> Result<Vec<Carrier>, Error>;
    async fn update_carrier(&self, user: User, id: Uuid, form: CarrierForm)
        -> Result<Carrier, Error>;
    async fn remove_carrier(&self, user: User, id: Uuid) -> Result<(), Error>;
}

#[async_trait]
pub trait RfpAPI {
    async fn create_rfp(
        &self,
        user: User,
        title: String,
        mode: TransportMode,
        deadline: Option<DateTime<Utc>>,
        notes: Option<String>,
    ) -> Result<Rfp, Error>;
    async fn find_rfp(&self, user: User, id: Uuid) -> Result<Rfp, Error>;
    async fn list_rfps(&self, user: User) -> Result<Vec<Rfp>, Error>;
    async fn publish_rfp(&self, user: User, id: Uuid) -> Result<Rfp, Error>;
    async fn close_rfp(&self, user: User, id: Uuid) -> Result<Rfp, Error>;
    async fn reopen_rfp(&self, user: User, id: Uuid) -> Result<Rfp, Error>;
    async fn add_lanes(&self, user: User, rfp_id: Uuid, rows: Vec<LaneRow>)
        -> Result<Vec<Lane>, Error>;
    async fn list_lanes(&self, user: User, rfp_id: Uuid) -> Result<Vec<Lane>, Error>;
}

#[async_trait]
pub trait InviteAPI {
    async fn create_invites(
        &self,
        user: User,
        rfp_id: Uuid,
        carrier_ids: Vec<Uuid>,
    ) -> Result<InviteBatch, Error>;
    async fn list_invites(&self, user: User, rfp_id: Uuid) -> Result<Vec<Invite>, Error>;
}

#[async_trait]
pub trait TenderAPI {
    async fn open_tender(&self, access_token: String) -> Result<Tender, Error>;
    async fn submit_tender(&self, access_token: String, rows: Vec<BidRow>)
        -> Result<Vec<Bid>, Error>;
}

#[async_trait]
pub trait BidAPI {
    async fn list_bids(&self, user: User, rfp_id: Uuid) -> Result<Vec<Bid>, Error>;
    async fn accept_bid(&self, user: User, id: Uuid) -> Result<Bid, Error>;
    async fn accept_carrier_bids(
        &self,
        user: User,
        rfp_id: Uuid,
        carrier_id: Uuid,
    ) -> Result<Vec<Bid>, Error>;
}

pub trait API: RegistrationAPI + CarrierAPI + RfpAPI + InviteAPI + TenderAPI + BidAPI {}

pub type DynAPI = Arc<dyn API + Send + Sync>;

/// Invites created in one call plus the outcome of each notification email.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InviteBatch {
    pub invites: Vec<Invite>,
    pub delivery: Vec<DeliveryOutcome>,
}

/// What an invited carrier sees when opening its bidding link.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tender {
    pub rfp: Rfp,
    pub lanes: Vec<Lane>,
    pub carrier_id: Uuid,
    pub status: invite::Status,
}
