use super::helpers::{fetch_bid_lane, fetch_rfp, update_bid};
use super::Engine;

use async_trait::async_trait;
use sqlx::{types::Json, Acquire, Executor, Row};
use uuid::Uuid;

use crate::{
    api::{BidAPI, RfpAPI},
    auth::User,
    entities::Bid,
    error::{bid_not_found_error, Error},
};

#[async_trait]
impl BidAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn list_bids(&self, user: User, rfp_id: Uuid) -> Result<Vec<Bid>, Error> {
        self.find_rfp(user.clone(), rfp_id).await?;

        let mut conn = self.pool.acquire().await?;

        let rows = conn
            .fetch_all(sqlx::query("SELECT data FROM bids WHERE rfp_id = $1").bind(&rfp_id))
            .await?;

        let mut bids = Vec::with_capacity(rows.len());

        for row in rows.iter() {
            let Json(bid): Json<Bid> = row.try_get("data")?;
            bids.push(bid);
        }

        Ok(bids)
    }

    #[tracing::instrument(skip(self))]
    async fn accept_bid(&self, user: User, id: Uuid) -> Result<Bid, Error> {
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        // learn the lane first, then take every bid on it in one ordered
        // lock set so concurrent acceptances serialize instead of deadlocking
        let lane_id = fetch_bid_lane(&mut tx, &id).await?;

        let rows = tx
            .fetch_all(
                sqlx::query("SELECT data FROM bids WHERE lane_id = $1 ORDER BY id FOR UPDATE")
                    .bind(&lane_id),
            )
            .await?;

        let mut lane_bids = Vec::with_capacity(rows.len());

        for row in rows.iter() {
            let Json(bid): Json<Bid> = row.try_get("data")?;
            lane_bids.push(bid);
        }

        let accepted = lane_bids
            .iter()
            .find(|bid| bid.id == id)
            .cloned()
            .ok_or_else(|| bid_not_found_error())?;

        let rfp = fetch_rfp(&mut tx, &accepted.rfp_id).await?;

        self.authorize(user.clone(), "decide_bids", rfp.clone())?;

        let mut winner = accepted;

        for mut bid in lane_bids {
            if bid.id == winner.id {
                continue;
            }

            bid.reject();
            update_bid(&mut tx, &bid).await?;
        }

        winner.accept();
        update_bid(&mut tx, &winner).await?;

        tx.commit().await?;

        tracing::info!(lane_id = %winner.lane_id, "bid accepted, competing bids rejected");

        Ok(winner)
    }

    #[tracing::instrument(skip(self))]
    async fn accept_carrier_bids(
        &self,
        user: User,
        rfp_id: Uuid,
        carrier_id: Uuid,
    ) -> Result<Vec<Bid>, Error> {
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        let rfp = fetch_rfp(&mut tx, &rfp_id).await?;

        self.authorize(user.clone(), "decide_bids", rfp.clone())?;

        let lane_rows = tx
            .fetch_all(
                sqlx::query(
                    "SELECT DISTINCT lane_id FROM bids WHERE rfp_id = $1 AND carrier_id = $2",
                )
                .bind(&rfp_id)
                .bind(&carrier_id),
            )
            .await?;

        let mut lane_ids = Vec::with_capacity(lane_rows.len());

        for row in lane_rows.iter() {
            let lane_id: Uuid = row.try_get("lane_id")?;
            lane_ids.push(lane_id);
        }

        if lane_ids.is_empty() {
            return Err(bid_not_found_error());
        }

        let rows = tx
            .fetch_all(
                sqlx::query(
                    "SELECT data FROM bids WHERE rfp_id = $1 AND lane_id = ANY($2) ORDER BY id FOR UPDATE",
                )
                .bind(&rfp_id)
                .bind(&lane_ids),
            )
            .await?;

        let mut accepted = Vec::with_capacity(lane_ids.len());

        // one transaction over the whole lane set: either every lane ends up
        // with this carrier as its winner or nothing changes
        for row in rows.iter() {
            let Json(mut bid): Json<Bid> = row.try_get("data")?;

            if bid.carrier_id == carrier_id {
                bid.accept();
                accepted.push(bid.clone());
            } else {
                bid.reject();
            }

            update_bid(&mut tx, &bid).await?;
        }

        tx.commit().await?;

        tracing::info!(
            lanes = lane_ids.len(),
            "carrier's bids accepted across all lanes with competitors rejected"
        );

        Ok(accepted)
    }
}
