mod bid_api;
mod carrier_api;
mod helpers;
mod invite_api;
mod registration_api;
mod rfp_api;
mod tender_api;

use oso::Oso;
use sqlx::{Executor, Pool, Postgres};

use crate::{
    api::API,
    auth::authorizor,
    error::{unauthorized_error, Error},
};

type Database = Postgres;

pub struct Engine {
    pool: Pool<Database>,
    authorizor: Oso,
}

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub async fn new(pool: Pool<Database>) -> Result<Self, Error> {
        // TODO: move this to migrations
        pool.execute("CREATE TABLE IF NOT EXISTS carriers (id UUID PRIMARY KEY, organization_id UUID NOT NULL, status VARCHAR NOT NULL, dot_number VARCHAR, mc_number VARCHAR, deleted BOOLEAN NOT NULL, data JSONB NOT NULL)")
            .await?;

        pool.execute("CREATE TABLE IF NOT EXISTS registrations (id UUID PRIMARY KEY, organization_id UUID NOT NULL, status VARCHAR NOT NULL, data JSONB NOT NULL)")
            .await?;

        pool.execute("CREATE TABLE IF NOT EXISTS rfps (id UUID PRIMARY KEY, organization_id UUID NOT NULL, status VARCHAR NOT NULL, data JSONB NOT NULL)")
            .await?;

        pool.execute("CREATE TABLE IF NOT EXISTS lanes (id UUID PRIMARY KEY, rfp_id UUID NOT NULL REFERENCES rfps(id), data JSONB NOT NULL)")
            .await?;

        pool.execute("CREATE TABLE IF NOT EXISTS invites (id UUID PRIMARY KEY, rfp_id UUID NOT NULL REFERENCES rfps(id), carrier_id UUID NOT NULL REFERENCES carriers(id), access_token VARCHAR NOT NULL UNIQUE, status VARCHAR NOT NULL, data JSONB NOT NULL)")
            .await?;

        pool.execute("CREATE TABLE IF NOT EXISTS bids (id UUID PRIMARY KEY, rfp_id UUID NOT NULL REFERENCES rfps(id), lane_id UUID NOT NULL REFERENCES lanes(id), carrier_id UUID NOT NULL REFERENCES carriers(id), decision VARCHAR NOT NULL, data JSONB NOT NULL)")
            .await?;

        // storage-layer backstop for the one-accepted-bid-per-lane invariant
        pool.execute("CREATE UNIQUE INDEX IF NOT EXISTS bids_one_accepted_per_lane ON bids (lane_id) WHERE decision = 'accepted'")
            .await?;

        Ok(Self {
            pool,
            authorizor: authorizor::new(),
        })
    }
}

impl Engine {
    pub fn authorize<Actor, Action, Resource>(
        &self,
        actor: Actor,
        action: Action,
        resource: Resource,
    ) -> Result<(), Error>
    where
        Actor: oso::ToPolar,
        Action: oso::ToPolar,
        Resource: oso::ToPolar,
    {
        if self.authorizor.is_allowed(actor, action, resource)? {
            return Ok(());
        }

        Err(unauthorized_error())
    }
}

impl API for Engine {}
