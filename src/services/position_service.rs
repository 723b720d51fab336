use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::position_dto::{PositionWithCount, UpdatePositionPayload};
use crate::error::{Error, Result};
use crate::models::position::Position;

const POSITION_COLUMNS: &str =
    "id, title, description, requirements, location, employment_type, is_open, \
     created_at, updated_at";

/// Everything resolved and required; the handler has already turned the
/// optional payload fields into the portal's 400 responses.
pub struct NewPosition {
    pub title: String,
    pub description: String,
    pub requirements: String,
    pub location: String,
    pub employment_type: String,
    pub is_open: bool,
}

#[derive(sqlx::FromRow)]
struct PositionCountRow {
    #[sqlx(flatten)]
    position: Position,
    application_count: i64,
}

#[derive(Clone)]
pub struct PositionService {
    pool: PgPool,
}

impl PositionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: NewPosition) -> Result<Position> {
        let sql = format!(
            "INSERT INTO positions (title, description, requirements, location, employment_type, is_open)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {POSITION_COLUMNS}"
        );
        let position = sqlx::query_as::<_, Position>(&sql)
            .bind(new.title)
            .bind(new.description)
            .bind(new.requirements)
            .bind(new.location)
            .bind(new.employment_type)
            .bind(new.is_open)
            .fetch_one(&self.pool)
            .await?;

        Ok(position)
    }

    pub async fn update(&self, id: Uuid, payload: UpdatePositionPayload) -> Result<Position> {
        let sql = format!(
            "UPDATE positions
             SET
                 title = COALESCE($2, title),
                 description = COALESCE($3, description),
                 requirements = COALESCE($4, requirements),
                 location = COALESCE($5, location),
                 employment_type = COALESCE($6, employment_type),
                 is_open = COALESCE($7, is_open),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {POSITION_COLUMNS}"
        );
        let position = sqlx::query_as::<_, Position>(&sql)
            .bind(id)
            .bind(payload.title)
            .bind(payload.description)
            .bind(payload.requirements)
            .bind(payload.location)
            .bind(payload.employment_type)
            .bind(payload.is_open)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Posisi tidak ditemukan".to_string()))?;

        Ok(position)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Position> {
        let sql = format!("SELECT {POSITION_COLUMNS} FROM positions WHERE id = $1");
        sqlx::query_as::<_, Position>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Posisi tidak ditemukan".to_string()))
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let res = sqlx::query("DELETE FROM positions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound("Posisi tidak ditemukan".to_string()));
        }
        Ok(())
    }

    /// Admin listing, newest first, with the number of applications each
    /// position has received.
    pub async fn list_with_counts(&self) -> Result<Vec<PositionWithCount>> {
        let sql = "SELECT p.id, p.title, p.description, p.requirements, p.location, \
                          p.employment_type, p.is_open, p.created_at, p.updated_at, \
                          COUNT(a.id) AS application_count
                   FROM positions p
                   LEFT JOIN applications a ON a.position_id = p.id
                   GROUP BY p.id
                   ORDER BY p.created_at DESC";
        let rows = sqlx::query_as::<_, PositionCountRow>(sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| PositionWithCount {
                position: row.position,
                application_count: row.application_count,
            })
            .collect())
    }

    /// Public listing: open positions only, newest first.
    pub async fn list_open(&self) -> Result<Vec<Position>> {
        let sql = format!(
            "SELECT {POSITION_COLUMNS} FROM positions WHERE is_open = TRUE ORDER BY created_at DESC"
        );
        let positions = sqlx::query_as::<_, Position>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(positions)
    }
}
