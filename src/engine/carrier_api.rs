use super::helpers::{fetch_carrier_for_update, update_carrier};
use super::Engine;

use async_trait::async_trait;
use sqlx::{types::Json, Acquire, Executor, Row};
use uuid::Uuid;

use crate::{
    api::CarrierAPI,
    auth::User,
    entities::{Carrier, CarrierForm},
    error::{invalid_input_error, Error},
};

#[async_trait]
impl CarrierAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn find_carrier(&self, user: User, id: Uuid) -> Result<Carrier, Error> {
        let mut conn = self.pool.acquire().await?;

        let Json(carrier): Json<Carrier> = conn
            .fetch_optional(sqlx::query("SELECT data FROM carriers WHERE id = $1").bind(&id))
            .await?
            .ok_or_else(|| invalid_input_error())?
            .try_get("data")?;

        if carrier.deleted {
            return Err(invalid_input_error());
        }

        self.authorize(user.clone(), "read", carrier.clone())?;

        Ok(carrier)
    }

    #[tracing::instrument(skip(self))]
    async fn list_carriers(&self, user: User) -> Result<Vec<Carrier>, Error> {
        let mut conn = self.pool.acquire().await?;

        let rows = conn
            .fetch_all(
                sqlx::query(
                    "SELECT data FROM carriers WHERE organization_id = $1 AND deleted = FALSE ORDER BY data->>'name'",
                )
                .bind(&user.organization_id),
            )
            .await?;

        let mut carriers = Vec::with_capacity(rows.len());

        for row in rows.iter() {
            let Json(carrier): Json<Carrier> = row.try_get("data")?;
            carriers.push(carrier);
        }

        Ok(carriers)
    }

    #[tracing::instrument(skip(self, form))]
    async fn update_carrier(&self, user: User, id: Uuid, form: CarrierForm) -> Result<Carrier, Error> {
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        let mut carrier = fetch_carrier_for_update(&mut tx, &id).await?;

        if carrier.deleted {
            return Err(invalid_input_error());
        }

        self.authorize(user.clone(), "update", carrier.clone())?;

        carrier.apply(form);

        update_carrier(&mut tx, &carrier).await?;

        tx.commit().await?;

        Ok(carrier)
    }

    #[tracing::instrument(skip(self))]
    async fn remove_carrier(&self, user: User, id: Uuid) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        let mut carrier = fetch_carrier_for_update(&mut tx, &id).await?;

        self.authorize(user.clone(), "remove", carrier.clone())?;

        carrier.remove();

        update_carrier(&mut tx, &carrier).await?;

        tx.commit().await?;

        tracing::info!("carrier soft-deleted");

        Ok(())
    }
}
