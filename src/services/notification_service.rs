use reqwest::Client;
use serde_json::json;
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::{Error, Result};
use crate::models::application::Application;
use crate::models::interview::Interview;
use crate::models::notification::{
    NotificationOutbox, CHANNEL_EMAIL, CHANNEL_WHATSAPP, DELIVERY_FAILED, DELIVERY_PENDING,
    DELIVERY_SENT, DELIVERY_SKIPPED,
};
use crate::models::position::Position;
use crate::utils::messages::{self, NotificationKind};
use crate::utils::phone;

const OUTBOX_COLUMNS: &str =
    "id, application_id, channel, recipient, subject, body, payload, status, attempts, \
     max_attempts, last_error, next_retry_at, created_at, updated_at";

/// A claimed row stays invisible to other claims for this long. A worker
/// that dies mid-delivery loses the claim and the row is re-delivered.
const CLAIM_VISIBILITY_SECS: i64 = 60;

/// Retry delay after the n-th failed attempt: 30s doubling per attempt,
/// capped at an hour.
pub fn backoff_seconds(attempts: i32) -> i64 {
    let exp = attempts.saturating_sub(1).clamp(0, 7) as u32;
    (30_i64 << exp).min(3600)
}

/// Builds the candidate-facing text for one notification kind. The interview
/// invite needs the schedule; the caller must have it on hand.
pub fn compose_message(
    kind: NotificationKind,
    application: &Application,
    position: &Position,
    interview: Option<&Interview>,
) -> Result<String> {
    match kind {
        NotificationKind::Interview => {
            let interview = interview.ok_or_else(|| {
                Error::Internal("interview invite requested without a schedule".to_string())
            })?;
            Ok(messages::interview_invite(
                &application.full_name,
                &position.title,
                interview.scheduled_date,
                &interview.location,
                interview.notes.as_deref(),
            ))
        }
        NotificationKind::Accepted => Ok(messages::acceptance_message(
            &application.full_name,
            &position.title,
        )),
        NotificationKind::Rejected => Ok(messages::rejection_message(
            &application.full_name,
            &position.title,
        )),
    }
}

#[derive(Clone)]
pub struct NotificationService {
    pool: PgPool,
    client: Client,
}

impl NotificationService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            client: Client::new(),
        }
    }

    /// Records one WhatsApp and one email outbox row for the given kind,
    /// inside the caller's transaction. Commit makes the status change and
    /// its notifications visible together; the worker picks them up later.
    pub async fn enqueue_for_kind(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        application: &Application,
        position: &Position,
        interview: Option<&Interview>,
        kind: NotificationKind,
    ) -> Result<()> {
        let body = compose_message(kind, application, position, interview)?;
        let payload = json!({
            "applicationId": application.id,
            "kind": kind.as_str(),
            "positionTitle": position.title,
        });

        let wa_recipient = phone::format_wa_number(&application.whatsapp);
        sqlx::query(
            "INSERT INTO notification_outbox (application_id, channel, recipient, body, payload)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(application.id)
        .bind(CHANNEL_WHATSAPP)
        .bind(&wa_recipient)
        .bind(&body)
        .bind(&payload)
        .execute(&mut **tx)
        .await?;

        sqlx::query(
            "INSERT INTO notification_outbox (application_id, channel, recipient, subject, body, payload)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(application.id)
        .bind(CHANNEL_EMAIL)
        .bind(&application.email)
        .bind(kind.email_subject(&position.title))
        .bind(&body)
        .bind(&payload)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Claims the oldest due pending row. The claim bumps `attempts` and
    /// parks `next_retry_at` past the visibility window, so a concurrent
    /// worker skips the row while this one talks to the gateway.
    async fn claim_next(&self) -> Result<Option<NotificationOutbox>> {
        let sql = format!(
            "UPDATE notification_outbox
             SET attempts = attempts + 1,
                 next_retry_at = NOW() + make_interval(secs => {CLAIM_VISIBILITY_SECS}),
                 updated_at = NOW()
             WHERE id = (
                 SELECT id FROM notification_outbox
                 WHERE status = '{DELIVERY_PENDING}'
                   AND (next_retry_at IS NULL OR next_retry_at <= NOW())
                 ORDER BY created_at ASC
                 FOR UPDATE SKIP LOCKED
                 LIMIT 1
             )
             RETURNING {OUTBOX_COLUMNS}"
        );
        let row = sqlx::query_as::<_, NotificationOutbox>(&sql)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    fn gateway_for(&self, channel: &str) -> Option<(String, Option<String>)> {
        let config = crate::config::get_config();
        let (url, token) = match channel {
            CHANNEL_WHATSAPP => (
                config.whatsapp_api_url.clone(),
                config.whatsapp_api_token.clone(),
            ),
            CHANNEL_EMAIL => (config.email_api_url.clone(), config.email_api_token.clone()),
            _ => (None, None),
        };
        match url {
            Some(url) if !url.trim().is_empty() => Some((url, token)),
            _ => None,
        }
    }

    async fn deliver(
        &self,
        row: &NotificationOutbox,
        url: &str,
        token: Option<&str>,
    ) -> std::result::Result<(), String> {
        let mut payload = json!({
            "target": row.recipient,
            "message": row.body,
        });
        if let Some(subject) = &row.subject {
            payload["subject"] = json!(subject);
        }

        let mut request = self.client.post(url).json(&payload);
        if let Some(token) = token {
            request = request.header(reqwest::header::AUTHORIZATION, token.to_string());
        }

        match request.send().await {
            Ok(resp) if resp.status().is_success() => Ok(()),
            Ok(resp) => Err(format!("gateway responded {}", resp.status())),
            Err(err) => Err(format!("gateway request failed: {err}")),
        }
    }

    /// One poll step for the worker loop. Returns false when nothing was
    /// due, so the loop can sleep.
    pub async fn run_once(&self) -> Result<bool> {
        let Some(row) = self.claim_next().await? else {
            return Ok(false);
        };

        let Some((url, token)) = self.gateway_for(&row.channel) else {
            sqlx::query(
                "UPDATE notification_outbox
                 SET status = $1, last_error = 'channel not configured',
                     next_retry_at = NULL, updated_at = NOW()
                 WHERE id = $2",
            )
            .bind(DELIVERY_SKIPPED)
            .bind(row.id)
            .execute(&self.pool)
            .await?;
            tracing::info!(id = %row.id, channel = %row.channel, "outbox row skipped, channel has no gateway");
            return Ok(true);
        };

        match self.deliver(&row, &url, token.as_deref()).await {
            Ok(()) => {
                sqlx::query(
                    "UPDATE notification_outbox
                     SET status = $1, last_error = NULL, next_retry_at = NULL, updated_at = NOW()
                     WHERE id = $2",
                )
                .bind(DELIVERY_SENT)
                .bind(row.id)
                .execute(&self.pool)
                .await?;
                tracing::info!(id = %row.id, channel = %row.channel, "notification delivered");
            }
            Err(reason) => {
                // attempts already counts the claim we are holding
                if row.attempts >= row.max_attempts {
                    sqlx::query(
                        "UPDATE notification_outbox
                         SET status = $1, last_error = $2, next_retry_at = NULL, updated_at = NOW()
                         WHERE id = $3",
                    )
                    .bind(DELIVERY_FAILED)
                    .bind(&reason)
                    .bind(row.id)
                    .execute(&self.pool)
                    .await?;
                    tracing::error!(
                        id = %row.id,
                        channel = %row.channel,
                        attempts = row.attempts,
                        error = %reason,
                        "notification failed permanently"
                    );
                } else {
                    sqlx::query(
                        "UPDATE notification_outbox
                         SET last_error = $1,
                             next_retry_at = NOW() + make_interval(secs => $2),
                             updated_at = NOW()
                         WHERE id = $3",
                    )
                    .bind(&reason)
                    .bind(backoff_seconds(row.attempts) as f64)
                    .bind(row.id)
                    .execute(&self.pool)
                    .await?;
                    tracing::warn!(
                        id = %row.id,
                        channel = %row.channel,
                        attempts = row.attempts,
                        error = %reason,
                        "notification delivery failed, will retry"
                    );
                }
            }
        }

        Ok(true)
    }
}
