use super::helpers::{fetch_registration_for_update, update_registration};
use super::{Database, Engine};

use async_trait::async_trait;
use sqlx::{pool::PoolConnection, types::Json, Acquire, Executor, Row};
use uuid::Uuid;

use crate::{
    api::RegistrationAPI,
    auth::{Organization, User},
    eligibility,
    entities::{Carrier, CarrierForm, Registration, RegistrationRequest, RegistrySnapshot},
    error::{invalid_input_error, Error},
    external::fmcsa,
};

#[async_trait]
impl RegistrationAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn start_registration(
        &self,
        user: User,
        request: RegistrationRequest,
    ) -> Result<Registration, Error> {
        self.authorize(
            user.clone(),
            "register_carrier",
            Organization::new(user.organization_id),
        )?;

        let request = request.normalized()?;

        let mut registration = Registration::new(user.organization_id, &request);
        registration.begin_verification()?;

        let mut conn = self.pool.acquire().await?;

        conn.execute(
            sqlx::query(
                "INSERT INTO registrations (id, organization_id, status, data) VALUES ($1, $2, $3, $4)",
            )
            .bind(&registration.id)
            .bind(&registration.organization_id)
            .bind(registration.status.name())
            .bind(Json(&registration)),
        )
        .await?;

        let failure = match self.lookup_snapshot(&user, &request, &mut conn).await {
            Ok(snapshot) => {
                let verdict = eligibility::classify(&snapshot);

                tracing::info!(
                    status = %verdict.status.name(),
                    reason = %verdict.reason,
                    "verification complete, awaiting operator confirmation"
                );

                registration.verified(snapshot, verdict)?;
                None
            }
            Err(err) => {
                tracing::warn!(code = err.code, "verification failed");

                registration.failed(err.message.clone())?;
                Some(err)
            }
        };

        conn.execute(
            sqlx::query("UPDATE registrations SET status = $2, data = $3 WHERE id = $1")
                .bind(&registration.id)
                .bind(registration.status.name())
                .bind(Json(&registration)),
        )
        .await?;

        // verification failures are terminal for this attempt; the operator
        // resubmits rather than the service retrying
        match failure {
            Some(err) => Err(err),
            None => Ok(registration),
        }
    }

    #[tracing::instrument(skip(self, form))]
    async fn confirm_registration(
        &self,
        user: User,
        id: Uuid,
        form: CarrierForm,
    ) -> Result<Carrier, Error> {
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        let mut registration = fetch_registration_for_update(&mut tx, &id).await?;

        self.authorize(user.clone(), "confirm", registration.clone())?;

        let (snapshot, verdict) = registration.confirm()?;
        let request = registration.request();

        let carrier = Carrier::assemble(
            registration.organization_id,
            form,
            &request,
            snapshot,
            &verdict,
        );

        tx.execute(
            sqlx::query(
                "INSERT INTO carriers (id, organization_id, status, dot_number, mc_number, deleted, data) VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(&carrier.id)
            .bind(&carrier.organization_id)
            .bind(carrier.status.name())
            .bind(&carrier.dot_number)
            .bind(&carrier.mc_number)
            .bind(&carrier.deleted)
            .bind(Json(&carrier)),
        )
        .await?;

        registration.completed(carrier.id)?;
        update_registration(&mut tx, &registration).await?;

        // a failed insert rolls the whole confirmation back, so a carrier is
        // never persisted without its completed registration or vice versa
        tx.commit().await?;

        tracing::info!(carrier_id = %carrier.id, status = %carrier.status.name(), "carrier registered");

        Ok(carrier)
    }

    #[tracing::instrument(skip(self))]
    async fn find_registration(&self, user: User, id: Uuid) -> Result<Registration, Error> {
        let mut conn = self.pool.acquire().await?;

        let Json(registration): Json<Registration> = conn
            .fetch_optional(sqlx::query("SELECT data FROM registrations WHERE id = $1").bind(&id))
            .await?
            .ok_or_else(|| invalid_input_error())?
            .try_get("data")?;

        self.authorize(user.clone(), "read", registration.clone())?;

        Ok(registration)
    }
}

impl Engine {
    // Cache-first lookup: a previously verified carrier with the same
    // identifier short-circuits the live registry call.
    #[tracing::instrument(skip(self, conn))]
    async fn lookup_snapshot(
        &self,
        user: &User,
        request: &RegistrationRequest,
        conn: &mut PoolConnection<Database>,
    ) -> Result<RegistrySnapshot, Error> {
        let maybe_row = conn
            .fetch_optional(
                sqlx::query(
                    "SELECT data FROM carriers WHERE organization_id = $1 AND deleted = FALSE AND (dot_number = $2 OR mc_number = $3) LIMIT 1",
                )
                .bind(&user.organization_id)
                .bind(&request.dot_number)
                .bind(&request.mc_number),
            )
            .await?;

        if let Some(row) = maybe_row {
            let Json(carrier): Json<Carrier> = row.try_get("data")?;

            if let Some(snapshot) = carrier.snapshot {
                tracing::info!("reusing previously fetched registry snapshot");
                return Ok(snapshot);
            }
        }

        match (&request.dot_number, &request.mc_number) {
            (Some(dot_number), _) => {
                tracing::info!("querying registry by DOT number");
                fmcsa::find_by_dot(dot_number).await
            }
            (None, Some(docket)) => {
                tracing::info!("querying registry by MC docket number");
                fmcsa::find_by_docket(docket).await
            }
            (None, None) => Err(invalid_input_error()),
        }
    }
}
