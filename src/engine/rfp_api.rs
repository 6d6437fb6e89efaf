use super::helpers::{fetch_rfp_for_update, update_rfp};
use super::Engine;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{types::Json, Acquire, Executor, Row};
use uuid::Uuid;

use crate::{
    api::RfpAPI,
    auth::{Organization, User},
    entities::{Lane, LaneRow, Rfp, TransportMode},
    error::{invalid_input_error, invalid_operation_error, validation_error, Error},
};

#[async_trait]
impl RfpAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn create_rfp(
        &self,
        user: User,
        title: String,
        mode: TransportMode,
        deadline: Option<DateTime<Utc>>,
        notes: Option<String>,
    ) -> Result<Rfp, Error> {
        self.authorize(
            user.clone(),
            "create_rfp",
            Organization::new(user.organization_id),
        )?;

        let title = title.trim().to_string();

        if title.is_empty() {
            return Err(validation_error("an RFP title is required"));
        }

        let rfp = Rfp::new(user.organization_id, title, mode, deadline, notes);

        let mut conn = self.pool.acquire().await?;

        conn.execute(
            sqlx::query(
                "INSERT INTO rfps (id, organization_id, status, data) VALUES ($1, $2, $3, $4)",
            )
            .bind(&rfp.id)
            .bind(&rfp.organization_id)
            .bind(rfp.status.name())
            .bind(Json(&rfp)),
        )
        .await?;

        Ok(rfp)
    }

    #[tracing::instrument(skip(self))]
    async fn find_rfp(&self, user: User, id: Uuid) -> Result<Rfp, Error> {
        let mut conn = self.pool.acquire().await?;

        let Json(rfp): Json<Rfp> = conn
            .fetch_optional(sqlx::query("SELECT data FROM rfps WHERE id = $1").bind(&id))
            .await?
            .ok_or_else(|| invalid_input_error())?
            .try_get("data")?;

        self.authorize(user.clone(), "read", rfp.clone())?;

        Ok(rfp)
    }

    #[tracing::instrument(skip(self))]
    async fn list_rfps(&self, user: User) -> Result<Vec<Rfp>, Error> {
        let mut conn = self.pool.acquire().await?;

        let rows = conn
            .fetch_all(
                sqlx::query(
                    "SELECT data FROM rfps WHERE organization_id = $1 ORDER BY data->>'title'",
                )
                .bind(&user.organization_id),
            )
            .await?;

        let mut rfps = Vec::with_capacity(rows.len());

        for row in rows.iter() {
            let Json(rfp): Json<Rfp> = row.try_get("data")?;
            rfps.push(rfp);
        }

        Ok(rfps)
    }

    #[tracing::instrument(skip(self))]
    async fn publish_rfp(&self, user: User, id: Uuid) -> Result<Rfp, Error> {
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        let mut rfp = fetch_rfp_for_update(&mut tx, &id).await?;

        self.authorize(user.clone(), "update", rfp.clone())?;

        rfp.publish()?;

        update_rfp(&mut tx, &rfp).await?;

        tx.commit().await?;

        Ok(rfp)
    }

    #[tracing::instrument(skip(self))]
    async fn close_rfp(&self, user: User, id: Uuid) -> Result<Rfp, Error> {
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        let mut rfp = fetch_rfp_for_update(&mut tx, &id).await?;

        self.authorize(user.clone(), "update", rfp.clone())?;

        rfp.close()?;

        update_rfp(&mut tx, &rfp).await?;

        tx.commit().await?;

        Ok(rfp)
    }

    #[tracing::instrument(skip(self))]
    async fn reopen_rfp(&self, user: User, id: Uuid) -> Result<Rfp, Error> {
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        let mut rfp = fetch_rfp_for_update(&mut tx, &id).await?;

        self.authorize(user.clone(), "update", rfp.clone())?;

        rfp.reopen()?;

        update_rfp(&mut tx, &rfp).await?;

        tx.commit().await?;

        tracing::warn!("RFP reopened; existing bid decisions and invites are left standing");

        Ok(rfp)
    }

    #[tracing::instrument(skip(self, rows))]
    async fn add_lanes(&self, user: User, rfp_id: Uuid, rows: Vec<LaneRow>) -> Result<Vec<Lane>, Error> {
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        let rfp = fetch_rfp_for_update(&mut tx, &rfp_id).await?;

        self.authorize(user.clone(), "update", rfp.clone())?;

        if !rfp.is_draft() {
            return Err(invalid_operation_error(
                "lanes can only be added while the RFP is a draft",
            ));
        }

        let mut lanes = Vec::with_capacity(rows.len());

        // one bad row fails the whole upload; a half-ingested lane set is
        // worse than an error the operator can fix and resubmit
        for row in rows {
            lanes.push(Lane::from_row(rfp_id, row)?);
        }

        for lane in lanes.iter() {
            tx.execute(
                sqlx::query("INSERT INTO lanes (id, rfp_id, data) VALUES ($1, $2, $3)")
                    .bind(&lane.id)
                    .bind(&lane.rfp_id)
                    .bind(Json(lane)),
            )
            .await?;
        }

        tx.commit().await?;

        tracing::info!(count = lanes.len(), "lanes ingested");

        Ok(lanes)
    }

    #[tracing::instrument(skip(self))]
    async fn list_lanes(&self, user: User, rfp_id: Uuid) -> Result<Vec<Lane>, Error> {
        self.find_rfp(user.clone(), rfp_id).await?;

        let mut conn = self.pool.acquire().await?;

        let rows = conn
            .fetch_all(sqlx::query("SELECT data FROM lanes WHERE rfp_id = $1").bind(&rfp_id))
            .await?;

        let mut lanes = Vec::with_capacity(rows.len());

        for row in rows.iter() {
            let Json(lane): Json<Lane> = row.try_get("data")?;
            lanes.push(lane);
        }

        Ok(lanes)
    }
}
