use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Closed application workflow states, backed by the `application_status`
/// Postgres enum. The wire format is the SCREAMING_SNAKE spelling
/// (`"INTERVIEW_SCHEDULED"` etc).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "application_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Pending,
    InterviewScheduled,
    Interviewed,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "PENDING",
            ApplicationStatus::InterviewScheduled => "INTERVIEW_SCHEDULED",
            ApplicationStatus::Interviewed => "INTERVIEWED",
            ApplicationStatus::Accepted => "ACCEPTED",
            ApplicationStatus::Rejected => "REJECTED",
        }
    }

    /// Allowed predecessor states per target. PENDING is the initial state
    /// and can never be re-entered through the workflow endpoint.
    pub fn allowed_predecessors(target: ApplicationStatus) -> &'static [ApplicationStatus] {
        use ApplicationStatus::*;
        match target {
            Pending => &[],
            InterviewScheduled => &[Pending, InterviewScheduled, Interviewed],
            Interviewed => &[InterviewScheduled],
            Accepted => &[Pending, InterviewScheduled, Interviewed],
            Rejected => &[Pending, InterviewScheduled, Interviewed],
        }
    }

    pub fn can_transition_to(self, target: ApplicationStatus) -> bool {
        Self::allowed_predecessors(target).contains(&self)
    }

    /// An application still counts against its NIK unless it ended in
    /// rejection.
    pub fn is_active(self) -> bool {
        !matches!(self, ApplicationStatus::Rejected)
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Accepted | ApplicationStatus::Rejected
        )
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(ApplicationStatus::Pending),
            "INTERVIEW_SCHEDULED" => Ok(ApplicationStatus::InterviewScheduled),
            "INTERVIEWED" => Ok(ApplicationStatus::Interviewed),
            "ACCEPTED" => Ok(ApplicationStatus::Accepted),
            "REJECTED" => Ok(ApplicationStatus::Rejected),
            other => Err(format!("Status tidak valid: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: Uuid,
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
    pub ktp_verified: bool,
    pub status: ApplicationStatus,
    pub position_id: Uuid,
    pub created_at: DateTime<Utc>,
}
