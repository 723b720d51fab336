use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::application::{Application, ApplicationStatus};
use crate::models::interview::Interview;
use crate::models::position::Position;
use crate::services::application_service::APPLICATION_COLUMNS;
use crate::services::notification_service::NotificationService;
use crate::utils::messages::NotificationKind;

const INTERVIEW_COLUMNS: &str =
    "id, application_id, scheduled_date, location, notes, created_at, updated_at";

pub struct ScheduleInput {
    pub application_id: Uuid,
    pub scheduled_date: DateTime<Utc>,
    pub location: String,
    pub notes: Option<String>,
}

#[derive(Clone)]
pub struct InterviewService {
    pool: PgPool,
}

impl InterviewService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_by_application(&self, application_id: Uuid) -> Result<Option<Interview>> {
        let sql = format!("SELECT {INTERVIEW_COLUMNS} FROM interviews WHERE application_id = $1");
        let interview = sqlx::query_as::<_, Interview>(&sql)
            .bind(application_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(interview)
    }

    /// Creates or overwrites the application's single interview, forces the
    /// status to INTERVIEW_SCHEDULED and enqueues the invite notifications.
    /// One transaction end to end: a failure leaves no half-scheduled state.
    pub async fn schedule(
        &self,
        input: ScheduleInput,
        notifier: &NotificationService,
    ) -> Result<Interview> {
        let mut tx = self.pool.begin().await?;

        let sql = format!("SELECT {APPLICATION_COLUMNS} FROM applications WHERE id = $1 FOR UPDATE");
        let current = sqlx::query_as::<_, Application>(&sql)
            .bind(input.application_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| Error::NotFound("Lamaran tidak ditemukan".to_string()))?;

        if !current
            .status
            .can_transition_to(ApplicationStatus::InterviewScheduled)
        {
            return Err(Error::BadRequest(format!(
                "Status tidak dapat diubah dari {} ke {}",
                current.status,
                ApplicationStatus::InterviewScheduled
            )));
        }

        let sql = format!(
            "INSERT INTO interviews (application_id, scheduled_date, location, notes)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (application_id) DO UPDATE
             SET scheduled_date = EXCLUDED.scheduled_date,
                 location = EXCLUDED.location,
                 notes = EXCLUDED.notes,
                 updated_at = NOW()
             RETURNING {INTERVIEW_COLUMNS}"
        );
        let interview = sqlx::query_as::<_, Interview>(&sql)
            .bind(input.application_id)
            .bind(input.scheduled_date)
            .bind(&input.location)
            .bind(&input.notes)
            .fetch_one(&mut *tx)
            .await?;

        let sql = format!(
            "UPDATE applications SET status = $1 WHERE id = $2 RETURNING {APPLICATION_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Application>(&sql)
            .bind(ApplicationStatus::InterviewScheduled)
            .bind(input.application_id)
            .fetch_one(&mut *tx)
            .await?;

        let position = sqlx::query_as::<_, Position>(
            "SELECT id, title, description, requirements, location, employment_type, is_open, \
                    created_at, updated_at
             FROM positions WHERE id = $1",
        )
        .bind(updated.position_id)
        .fetch_one(&mut *tx)
        .await?;

        notifier
            .enqueue_for_kind(
                &mut tx,
                &updated,
                &position,
                Some(&interview),
                NotificationKind::Interview,
            )
            .await?;

        tx.commit().await?;
        Ok(interview)
    }
}
