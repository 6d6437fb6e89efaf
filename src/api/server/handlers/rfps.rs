use axum::extract::{Extension, Json, Path};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    api::interface::{DynAPI, InviteBatch},
    auth::User,
    entities::{Invite, Lane, LaneRow, Rfp, TransportMode},
    error::Error,
};

#[derive(Serialize, Deserialize)]
pub struct CreateParams {
    title: String,
    mode: TransportMode,
    deadline: Option<DateTime<Utc>>,
    notes: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct CreateInvitesParams {
    carrier_ids: Vec<Uuid>,
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    user: User,
    Json(params): Json<CreateParams>,
) -> Result<Json<Rfp>, Error> {
    let rfp = api
        .create_rfp(
            user,
            params.title,
            params.mode,
            params.deadline,
            params.notes,
        )
        .await?;

    Ok(rfp.into())
}

pub async fn list(Extension(api): Extension<DynAPI>, user: User) -> Result<Json<Vec<Rfp>>, Error> {
    let rfps = api.list_rfps(user).await?;

    Ok(rfps.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
) -> Result<Json<Rfp>, Error> {
    let rfp = api.find_rfp(user, id).await?;

    Ok(rfp.into())
}

pub async fn publish(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
) -> Result<Json<Rfp>, Error> {
    let rfp = api.publish_rfp(user, id).await?;

    Ok(rfp.into())
}

pub async fn close(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
) -> Result<Json<Rfp>, Error> {
    let rfp = api.close_rfp(user, id).await?;

    Ok(rfp.into())
}

pub async fn reopen(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
) -> Result<Json<Rfp>, Error> {
    let rfp = api.reopen_rfp(user, id).await?;

    Ok(rfp.into())
}

pub async fn add_lanes(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
    Json(rows): Json<Vec<LaneRow>>,
) -> Result<Json<Vec<Lane>>, Error> {
    let lanes = api.add_lanes(user, id, rows).await?;

    Ok(lanes.into())
}

pub async fn list_lanes(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Lane>>, Error> {
    let lanes = api.list_lanes(user, id).await?;

    Ok(lanes.into())
}

pub async fn create_invites(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
    Json(params): Json<CreateInvitesParams>,
) -> Result<Json<InviteBatch>, Error> {
    let batch = api.create_invites(user, id, params.carrier_ids).await?;

    Ok(batch.into())
}

pub async fn list_invites(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Invite>>, Error> {
    let invites = api.list_invites(user, id).await?;

    Ok(invites.into())
}
