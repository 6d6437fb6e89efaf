use super::Database;

use sqlx::{types::Json, Executor, Row, Transaction};
use uuid::Uuid;

use crate::{
    entities::{Bid, Carrier, Invite, Registration, Rfp},
    error::{bid_not_found_error, invalid_input_error, unauthorized_error, Error},
};

#[tracing::instrument(skip(tx))]
pub async fn fetch_registration_for_update(
    tx: &mut Transaction<'_, Database>,
    id: &Uuid,
) -> Result<Registration, Error> {
    let Json(registration): Json<Registration> = tx
        .fetch_optional(
            sqlx::query("SELECT data FROM registrations WHERE id = $1 FOR UPDATE").bind(id),
        )
        .await?
        .ok_or_else(|| invalid_input_error())?
        .try_get("data")?;

    Ok(registration)
}

#[tracing::instrument(skip(tx))]
pub async fn fetch_carrier_for_update(
    tx: &mut Transaction<'_, Database>,
    id: &Uuid,
) -> Result<Carrier, Error> {
    let Json(carrier): Json<Carrier> = tx
        .fetch_optional(sqlx::query("SELECT data FROM carriers WHERE id = $1 FOR UPDATE").bind(id))
        .await?
        .ok_or_else(|| invalid_input_error())?
        .try_get("data")?;

    Ok(carrier)
}

#[tracing::instrument(skip(tx))]
pub async fn fetch_rfp_for_update(
    tx: &mut Transaction<'_, Database>,
    id: &Uuid,
) -> Result<Rfp, Error> {
    let Json(rfp): Json<Rfp> = tx
        .fetch_optional(sqlx::query("SELECT data FROM rfps WHERE id = $1 FOR UPDATE").bind(id))
        .await?
        .ok_or_else(|| invalid_input_error())?
        .try_get("data")?;

    Ok(rfp)
}

#[tracing::instrument(skip(tx))]
pub async fn fetch_rfp(tx: &mut Transaction<'_, Database>, id: &Uuid) -> Result<Rfp, Error> {
    let Json(rfp): Json<Rfp> = tx
        .fetch_optional(sqlx::query("SELECT data FROM rfps WHERE id = $1").bind(id))
        .await?
        .ok_or_else(|| invalid_input_error())?
        .try_get("data")?;

    Ok(rfp)
}

// The access token is the caller's credential; an unknown token is reported
// as unauthorized rather than not-found.
#[tracing::instrument(skip(tx, access_token))]
pub async fn fetch_invite_by_token_for_update(
    tx: &mut Transaction<'_, Database>,
    access_token: &str,
) -> Result<Invite, Error> {
    let Json(invite): Json<Invite> = tx
        .fetch_optional(
            sqlx::query("SELECT data FROM invites WHERE access_token = $1 FOR UPDATE")
                .bind(access_token),
        )
        .await?
        .ok_or_else(|| unauthorized_error())?
        .try_get("data")?;

    Ok(invite)
}

#[tracing::instrument(skip(tx))]
pub async fn fetch_bid_lane(
    tx: &mut Transaction<'_, Database>,
    id: &Uuid,
) -> Result<Uuid, Error> {
    let lane_id: Uuid = tx
        .fetch_optional(sqlx::query("SELECT lane_id FROM bids WHERE id = $1").bind(id))
        .await?
        .ok_or_else(|| bid_not_found_error())?
        .try_get("lane_id")?;

    Ok(lane_id)
}

#[tracing::instrument(skip(tx, registration))]
pub async fn update_registration(
    tx: &mut Transaction<'_, Database>,
    registration: &Registration,
) -> Result<(), Error> {
    tx.execute(
        sqlx::query("UPDATE registrations SET status = $2, data = $3 WHERE id = $1")
            .bind(&registration.id)
            .bind(registration.status.name())
            .bind(Json(registration)),
    )
    .await?;

    Ok(())
}

#[tracing::instrument(skip(tx, carrier))]
pub async fn update_carrier(
    tx: &mut Transaction<'_, Database>,
    carrier: &Carrier,
) -> Result<(), Error> {
    tx.execute(
        sqlx::query("UPDATE carriers SET status = $2, dot_number = $3, mc_number = $4, deleted = $5, data = $6 WHERE id = $1")
            .bind(&carrier.id)
            .bind(carrier.status.name())
            .bind(&carrier.dot_number)
            .bind(&carrier.mc_number)
            .bind(&carrier.deleted)
            .bind(Json(carrier)),
    )
    .await?;

    Ok(())
}

#[tracing::instrument(skip(tx, rfp))]
pub async fn update_rfp(tx: &mut Transaction<'_, Database>, rfp: &Rfp) -> Result<(), Error> {
    tx.execute(
        sqlx::query("UPDATE rfps SET status = $2, data = $3 WHERE id = $1")
            .bind(&rfp.id)
            .bind(rfp.status.name())
            .bind(Json(rfp)),
    )
    .await?;

    Ok(())
}

#[tracing::instrument(skip(tx, invite))]
pub async fn update_invite(
    tx: &mut Transaction<'_, Database>,
    invite: &Invite,
) -> Result<(), Error> {
    tx.execute(
        sqlx::query("UPDATE invites SET status = $2, data = $3 WHERE id = $1")
            .bind(&invite.id)
            .bind(invite.status.name())
            .bind(Json(invite)),
    )
    .await?;

    Ok(())
}

#[tracing::instrument(skip(tx, bid))]
pub async fn update_bid(tx: &mut Transaction<'_, Database>, bid: &Bid) -> Result<(), Error> {
    tx.execute(
        sqlx::query("UPDATE bids SET decision = $2, data = $3 WHERE id = $1")
            .bind(&bid.id)
            .bind(bid.decision.name())
            .bind(Json(bid)),
    )
    .await?;

    Ok(())
}
