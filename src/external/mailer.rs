use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::env;

use crate::error::Error;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    pub recipient: String,
    pub subject: String,
    pub html_body: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeliveryOutcome {
    pub recipient: String,
    pub accepted: bool,
}

/// Dispatches a batch of transactional emails. A rejected message is a
/// per-item outcome, not an error; only missing configuration fails the
/// whole batch.
#[tracing::instrument(skip(messages))]
pub async fn deliver_batch(messages: Vec<Message>) -> Result<Vec<DeliveryOutcome>, Error> {
    let api_base = env::var("MAILER_API_BASE")?;
    let api_key = env::var("MAILER_API_KEY")?;

    let client = reqwest::Client::new();

    let sends = messages.into_iter().map(|message| {
        let client = client.clone();
        let url = format!("https://{}/messages", api_base);
        let api_key = api_key.clone();

        async move {
            let recipient = message.recipient.clone();

            let accepted = match client
                .post(url)
                .bearer_auth(api_key)
                .json(&message)
                .send()
                .await
            {
                Ok(res) => res.status().is_success(),
                Err(_) => false,
            };

            if !accepted {
                tracing::warn!(%recipient, "mail delivery rejected");
            }

            DeliveryOutcome {
                recipient,
                accepted,
            }
        }
    });

    Ok(join_all(sends).await)
}
