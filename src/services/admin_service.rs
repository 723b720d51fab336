use sqlx::PgPool;

use crate::error::{Error, Result};
use crate::models::admin::Admin;
use crate::utils::crypto;

const ADMIN_COLUMNS: &str = "id, email, password_hash, name, created_at, updated_at";

#[derive(Clone)]
pub struct AdminService {
    pool: PgPool,
}

impl AdminService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Admin>> {
        let sql = format!("SELECT {ADMIN_COLUMNS} FROM admins WHERE email = $1");
        let admin = sqlx::query_as::<_, Admin>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(admin)
    }

    /// Verifies credentials. Unknown email and wrong password are reported
    /// identically so the response does not leak which admins exist.
    pub async fn login(&self, email: &str, password: &str) -> Result<Admin> {
        let admin = self
            .find_by_email(email)
            .await?
            .ok_or_else(|| Error::Unauthorized("Email atau password salah".to_string()))?;

        if !crypto::verify_password(password, &admin.password_hash) {
            return Err(Error::Unauthorized("Email atau password salah".to_string()));
        }

        Ok(admin)
    }

    pub async fn change_password(
        &self,
        email: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<()> {
        let admin = self
            .find_by_email(email)
            .await?
            .ok_or_else(|| Error::NotFound("Email tidak terdaftar".to_string()))?;

        if !crypto::verify_password(old_password, &admin.password_hash) {
            return Err(Error::BadRequest("Password lama salah".to_string()));
        }

        let hashed = crypto::hash_password(new_password)?;
        sqlx::query("UPDATE admins SET password_hash = $1, updated_at = NOW() WHERE id = $2")
            .bind(hashed)
            .bind(admin.id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Creates the bootstrap admin from SEED_ADMIN_* env vars when the email
    /// is not taken yet. A no-op when the vars are unset, so production
    /// restarts never overwrite a rotated password.
    pub async fn ensure_seed_admin(&self) -> Result<()> {
        let config = crate::config::get_config();
        let (Some(email), Some(password)) = (
            config.seed_admin_email.as_deref(),
            config.seed_admin_password.as_deref(),
        ) else {
            return Ok(());
        };

        let name = config.seed_admin_name.as_deref().unwrap_or("Admin");
        let hashed = crypto::hash_password(password)?;
        let res = sqlx::query(
            "INSERT INTO admins (email, password_hash, name)
             VALUES ($1, $2, $3)
             ON CONFLICT (email) DO NOTHING",
        )
        .bind(email)
        .bind(hashed)
        .bind(name)
        .execute(&self.pool)
        .await?;

        if res.rows_affected() > 0 {
            tracing::info!(email, "seeded admin account");
        }

        Ok(())
    }
}
