use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::application_dto::ApplicationListItem;
use crate::error::{Error, Result};
use crate::models::application::{Application, ApplicationStatus};
use crate::models::interview::Interview;
use crate::models::position::Position;
use crate::services::notification_service::NotificationService;
use crate::utils::messages::NotificationKind;

pub(crate) const APPLICATION_COLUMNS: &str =
    "id, nik, full_name, email, phone, whatsapp, address, education, cv_url, photo3x4_url, \
     ktp_url, ktp_verified, status, position_id, created_at";

const POSITION_COLUMNS: &str =
    "id, title, description, requirements, location, employment_type, is_open, \
     created_at, updated_at";

/// Intake data with validation and file staging already behind it; the URLs
/// point at the final upload paths the promote step will create.
pub struct NewApplication {
    pub nik: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub whatsapp: String,
    pub address: String,
    pub education: String,
    pub cv_url: String,
    pub photo3x4_url: String,
    pub ktp_url: String,
    pub position_id: Uuid,
}

/// Flat projection of the three-way dashboard join. Position columns are
/// aliased `p_*`, interview columns `iv_*` and nullable.
#[derive(sqlx::FromRow)]
struct ApplicationJoinRow {
    id: Uuid,
    nik: String,
    full_name: String,
    email: String,
    phone: String,
    whatsapp: String,
    address: String,
    education: String,
    cv_url: String,
    photo3x4_url: String,
    ktp_url: String,
    ktp_verified: bool,
    status: ApplicationStatus,
    position_id: Uuid,
    created_at: DateTime<Utc>,
    p_title: String,
    p_description: String,
    p_requirements: String,
    p_location: String,
    p_employment_type: String,
    p_is_open: bool,
    p_created_at: DateTime<Utc>,
    p_updated_at: DateTime<Utc>,
    iv_id: Option<Uuid>,
    iv_scheduled_date: Option<DateTime<Utc>>,
    iv_location: Option<String>,
    iv_notes: Option<String>,
    iv_created_at: Option<DateTime<Utc>>,
    iv_updated_at: Option<DateTime<Utc>>,
}

impl From<ApplicationJoinRow> for ApplicationListItem {
    fn from(row: ApplicationJoinRow) -> Self {
        let interview_schedule = match (
            row.iv_id,
            row.iv_scheduled_date,
            row.iv_location,
            row.iv_created_at,
            row.iv_updated_at,
        ) {
            (Some(id), Some(scheduled_date), Some(location), Some(created_at), Some(updated_at)) => {
                Some(Interview {
                    id,
                    application_id: row.id,
                    scheduled_date,
                    location,
                    notes: row.iv_notes,
                    created_at,
                    updated_at,
                })
            }
            _ => None,
        };

        Self {
            application: Application {
                id: row.id,
                nik: row.nik,
                full_name: row.full_name,
                email: row.email,
                phone: row.phone,
                whatsapp: row.whatsapp,
                address: row.address,
                education: row.education,
                cv_url: row.cv_url,
                photo3x4_url: row.photo3x4_url,
                ktp_url: row.ktp_url,
                ktp_verified: row.ktp_verified,
                status: row.status,
                position_id: row.position_id,
                created_at: row.created_at,
            },
            position: Position {
                id: row.position_id,
                title: row.p_title,
                description: row.p_description,
                requirements: row.p_requirements,
                location: row.p_location,
                employment_type: row.p_employment_type,
                is_open: row.p_is_open,
                created_at: row.p_created_at,
                updated_at: row.p_updated_at,
            },
            interview_schedule,
        }
    }
}

#[derive(Clone)]
pub struct ApplicationService {
    pool: PgPool,
}

impl ApplicationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Most recent application for this NIK that still counts against it
    /// (anything but REJECTED), with the position title for the rejection
    /// message. Read-then-insert, so two simultaneous submissions can both
    /// pass; the duplicate gate is deliberately best-effort.
    pub async fn find_active_by_nik(&self, nik: &str) -> Result<Option<(Application, String)>> {
        let sql = format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications
             WHERE nik = $1 AND status <> 'REJECTED'
             ORDER BY created_at DESC
             LIMIT 1"
        );
        let Some(application) = sqlx::query_as::<_, Application>(&sql)
            .bind(nik)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let title = sqlx::query_scalar::<_, String>("SELECT title FROM positions WHERE id = $1")
            .bind(application.position_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(Some((application, title)))
    }

    pub async fn create(&self, new: NewApplication) -> Result<Application> {
        let sql = format!(
            "INSERT INTO applications (
                 nik, full_name, email, phone, whatsapp, address, education,
                 cv_url, photo3x4_url, ktp_url, ktp_verified, status, position_id
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, TRUE, $11, $12)
             RETURNING {APPLICATION_COLUMNS}"
        );
        let application = sqlx::query_as::<_, Application>(&sql)
            .bind(new.nik)
            .bind(new.full_name)
            .bind(new.email)
            .bind(new.phone)
            .bind(new.whatsapp)
            .bind(new.address)
            .bind(new.education)
            .bind(new.cv_url)
            .bind(new.photo3x4_url)
            .bind(new.ktp_url)
            .bind(ApplicationStatus::Pending)
            .bind(new.position_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(application)
    }

    pub async fn get_with_position(&self, id: Uuid) -> Result<(Application, Position)> {
        let sql = format!("SELECT {APPLICATION_COLUMNS} FROM applications WHERE id = $1");
        let application = sqlx::query_as::<_, Application>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Lamaran tidak ditemukan".to_string()))?;

        let sql = format!("SELECT {POSITION_COLUMNS} FROM positions WHERE id = $1");
        let position = sqlx::query_as::<_, Position>(&sql)
            .bind(application.position_id)
            .fetch_one(&self.pool)
            .await?;

        Ok((application, position))
    }

    /// Dashboard listing, newest first, optionally narrowed to one status.
    pub async fn list(
        &self,
        status_filter: Option<ApplicationStatus>,
    ) -> Result<Vec<ApplicationListItem>> {
        let base = "SELECT a.id, a.nik, a.full_name, a.email, a.phone, a.whatsapp, a.address, \
                           a.education, a.cv_url, a.photo3x4_url, a.ktp_url, a.ktp_verified, \
                           a.status, a.position_id, a.created_at, \
                           p.title AS p_title, p.description AS p_description, \
                           p.requirements AS p_requirements, p.location AS p_location, \
                           p.employment_type AS p_employment_type, p.is_open AS p_is_open, \
                           p.created_at AS p_created_at, p.updated_at AS p_updated_at, \
                           i.id AS iv_id, i.scheduled_date AS iv_scheduled_date, \
                           i.location AS iv_location, i.notes AS iv_notes, \
                           i.created_at AS iv_created_at, i.updated_at AS iv_updated_at
                    FROM applications a
                    JOIN positions p ON p.id = a.position_id
                    LEFT JOIN interviews i ON i.application_id = a.id";

        let rows = match status_filter {
            Some(status) => {
                let sql = format!("{base} WHERE a.status = $1 ORDER BY a.created_at DESC");
                sqlx::query_as::<_, ApplicationJoinRow>(&sql)
                    .bind(status)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!("{base} ORDER BY a.created_at DESC");
                sqlx::query_as::<_, ApplicationJoinRow>(&sql)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Applies one workflow transition. The row is locked for the duration,
    /// the target is checked against the transition table, and a terminal
    /// outcome enqueues its notifications before the same commit.
    pub async fn update_status(
        &self,
        id: Uuid,
        target: ApplicationStatus,
        notifier: &NotificationService,
    ) -> Result<(Application, Position)> {
        let mut tx = self.pool.begin().await?;

        let sql = format!("SELECT {APPLICATION_COLUMNS} FROM applications WHERE id = $1 FOR UPDATE");
        let current = sqlx::query_as::<_, Application>(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| Error::NotFound("Lamaran tidak ditemukan".to_string()))?;

        if !current.status.can_transition_to(target) {
            return Err(Error::BadRequest(format!(
                "Status tidak dapat diubah dari {} ke {}",
                current.status, target
            )));
        }

        let sql = format!(
            "UPDATE applications SET status = $1 WHERE id = $2 RETURNING {APPLICATION_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Application>(&sql)
            .bind(target)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        let sql = format!("SELECT {POSITION_COLUMNS} FROM positions WHERE id = $1");
        let position = sqlx::query_as::<_, Position>(&sql)
            .bind(updated.position_id)
            .fetch_one(&mut *tx)
            .await?;

        match target {
            ApplicationStatus::Accepted => {
                notifier
                    .enqueue_for_kind(&mut tx, &updated, &position, None, NotificationKind::Accepted)
                    .await?;
            }
            ApplicationStatus::Rejected => {
                notifier
                    .enqueue_for_kind(&mut tx, &updated, &position, None, NotificationKind::Rejected)
                    .await?;
            }
            _ => {}
        }

        tx.commit().await?;
        Ok((updated, position))
    }
}
