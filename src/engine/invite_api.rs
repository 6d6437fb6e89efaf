use super::Engine;

use async_trait::async_trait;
use sqlx::{types::Json, Acquire, Executor, Row};
use std::env;
use uuid::Uuid;

use crate::{
    api::{InviteAPI, InviteBatch, RfpAPI},
    auth::User,
    entities::{Carrier, Invite, Rfp},
    error::{invalid_input_error, invalid_operation_error, Error},
    external::mailer,
};

#[async_trait]
impl InviteAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn create_invites(
        &self,
        user: User,
        rfp_id: Uuid,
        carrier_ids: Vec<Uuid>,
    ) -> Result<InviteBatch, Error> {
        // read config up front so a misconfigured mailer cannot strand
        // freshly created invites without notifications
        let link_base = env::var("PUBLIC_LINK_BASE")?;

        let rfp = self.rfp_for_invites(&user, &rfp_id).await?;

        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        let mut invites = Vec::with_capacity(carrier_ids.len());
        let mut messages = Vec::new();

        for carrier_id in carrier_ids.iter() {
            let Json(carrier): Json<Carrier> = tx
                .fetch_optional(
                    sqlx::query(
                        "SELECT data FROM carriers WHERE id = $1 AND organization_id = $2 AND deleted = FALSE",
                    )
                    .bind(carrier_id)
                    .bind(&user.organization_id),
                )
                .await?
                .ok_or_else(|| invalid_input_error())?
                .try_get("data")?;

            let invite = Invite::new(rfp.id, carrier.id);

            tx.execute(
                sqlx::query(
                    "INSERT INTO invites (id, rfp_id, carrier_id, access_token, status, data) VALUES ($1, $2, $3, $4, $5, $6)",
                )
                .bind(&invite.id)
                .bind(&invite.rfp_id)
                .bind(&invite.carrier_id)
                .bind(&invite.access_token)
                .bind(invite.status.name())
                .bind(Json(&invite)),
            )
            .await?;

            if let Some(email) = carrier.email.clone() {
                messages.push(bidding_message(&rfp, &carrier, &invite, &link_base));
            } else {
                tracing::warn!(carrier_id = %carrier.id, "carrier has no email, skipping notification");
            }

            invites.push(invite);
        }

        tx.commit().await?;

        // invites exist either way; a failed batch only costs notifications
        let delivery = match mailer::deliver_batch(messages).await {
            Ok(outcomes) => outcomes,
            Err(err) => {
                tracing::warn!(code = err.code, "mail batch was not dispatched");
                vec![]
            }
        };

        tracing::info!(
            invites = invites.len(),
            notified = delivery.iter().filter(|o| o.accepted).count(),
            "invites created"
        );

        Ok(InviteBatch { invites, delivery })
    }

    #[tracing::instrument(skip(self))]
    async fn list_invites(&self, user: User, rfp_id: Uuid) -> Result<Vec<Invite>, Error> {
        self.find_rfp(user.clone(), rfp_id).await?;

        let mut conn = self.pool.acquire().await?;

        let rows = conn
            .fetch_all(sqlx::query("SELECT data FROM invites WHERE rfp_id = $1").bind(&rfp_id))
            .await?;

        let mut invites = Vec::with_capacity(rows.len());

        for row in rows.iter() {
            let Json(invite): Json<Invite> = row.try_get("data")?;
            invites.push(invite);
        }

        Ok(invites)
    }
}

impl Engine {
    async fn rfp_for_invites(&self, user: &User, rfp_id: &Uuid) -> Result<Rfp, Error> {
        let rfp = self.find_rfp(user.clone(), *rfp_id).await?;

        self.authorize(user.clone(), "invite", rfp.clone())?;

        if !rfp.is_active() {
            return Err(invalid_operation_error(
                "carriers can only be invited to an active RFP",
            ));
        }

        Ok(rfp)
    }
}

fn bidding_message(
    rfp: &Rfp,
    carrier: &Carrier,
    invite: &Invite,
    link_base: &str,
) -> mailer::Message {
    let link = format!("https://{}/tender/{}", link_base, invite.access_token);

    mailer::Message {
        recipient: carrier.email.clone().unwrap_or_default(),
        subject: format!("Invitation to bid: {}", rfp.title),
        html_body: format!(
            "<p>Hello {},</p>\
             <p>You have been invited to bid on <strong>{}</strong>.</p>\
             <p><a href=\"{}\">Review lanes and submit your rates</a></p>",
            carrier.name, rfp.title, link
        ),
    }
}
