use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::admin::Admin;

// Login field checks return the portal's Indonesian messages, so fields stay
// optional here and the handler does the presence check itself.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginPayload {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// The admin as exposed to clients. The password hash never leaves the model
/// layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminProfile {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

impl From<Admin> for AdminProfile {
    fn from(value: Admin) -> Self {
        Self {
            id: value.id,
            email: value.email,
            name: value.name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub admin: AdminProfile,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordPayload {
    pub email: Option<String>,
    pub old_password: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordResponse {
    pub success: bool,
    pub message: String,
}
