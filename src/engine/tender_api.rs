use super::helpers::{fetch_invite_by_token_for_update, fetch_rfp, update_invite};
use super::Engine;

use async_trait::async_trait;
use sqlx::{types::Json, Acquire, Executor, Row};
use std::collections::HashSet;
use uuid::Uuid;

use crate::{
    api::{Tender, TenderAPI},
    entities::{parse_rate, Bid, BidRow, Lane},
    error::{invalid_operation_error, Error},
};

// The public bidding surface. No session here; the invite's access token is
// the sole credential.
#[async_trait]
impl TenderAPI for Engine {
    #[tracing::instrument(skip(self, access_token))]
    async fn open_tender(&self, access_token: String) -> Result<Tender, Error> {
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        let mut invite = fetch_invite_by_token_for_update(&mut tx, &access_token).await?;

        let rfp = fetch_rfp(&mut tx, &invite.rfp_id).await?;

        if !rfp.is_active() {
            return Err(invalid_operation_error("bidding is closed for this RFP"));
        }

        invite.mark_opened();
        update_invite(&mut tx, &invite).await?;

        let rows = tx
            .fetch_all(sqlx::query("SELECT data FROM lanes WHERE rfp_id = $1").bind(&invite.rfp_id))
            .await?;

        let mut lanes = Vec::with_capacity(rows.len());

        for row in rows.iter() {
            let Json(lane): Json<Lane> = row.try_get("data")?;
            lanes.push(lane);
        }

        tx.commit().await?;

        Ok(Tender {
            rfp,
            lanes,
            carrier_id: invite.carrier_id,
            status: invite.status,
        })
    }

    #[tracing::instrument(skip(self, access_token, rows))]
    async fn submit_tender(&self, access_token: String, rows: Vec<BidRow>) -> Result<Vec<Bid>, Error> {
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        let mut invite = fetch_invite_by_token_for_update(&mut tx, &access_token).await?;

        let rfp = fetch_rfp(&mut tx, &invite.rfp_id).await?;

        if !rfp.is_active() {
            return Err(invalid_operation_error("bidding is closed for this RFP"));
        }

        invite.submit()?;

        let lane_rows = tx
            .fetch_all(sqlx::query("SELECT id FROM lanes WHERE rfp_id = $1").bind(&invite.rfp_id))
            .await?;

        let mut open_lanes = HashSet::with_capacity(lane_rows.len());

        for row in lane_rows.iter() {
            let lane_id: Uuid = row.try_get("id")?;
            open_lanes.insert(lane_id);
        }

        let submitted = rows.len();
        let mut bids = Vec::new();

        // entries with a blank or non-numeric rate, an unknown lane, or a
        // lane already covered earlier in the submission are dropped
        for row in rows {
            let rate = match parse_rate(&row.rate) {
                Some(rate) => rate,
                None => continue,
            };

            if !open_lanes.remove(&row.lane_id) {
                continue;
            }

            let bid = Bid::new(
                rfp.id,
                row.lane_id,
                invite.carrier_id,
                rate,
                row.transit_time,
                row.notes,
            );

            tx.execute(
                sqlx::query(
                    "INSERT INTO bids (id, rfp_id, lane_id, carrier_id, decision, data) VALUES ($1, $2, $3, $4, $5, $6)",
                )
                .bind(&bid.id)
                .bind(&bid.rfp_id)
                .bind(&bid.lane_id)
                .bind(&bid.carrier_id)
                .bind(bid.decision.name())
                .bind(Json(&bid)),
            )
            .await?;

            bids.push(bid);
        }

        update_invite(&mut tx, &invite).await?;

        tx.commit().await?;

        tracing::info!(
            persisted = bids.len(),
            dropped = submitted - bids.len(),
            "tender submission recorded"
        );

        Ok(bids)
    }
}
