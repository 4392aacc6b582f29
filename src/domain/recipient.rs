use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A platform account that can receive notifications: a client contact,
/// a talent, or an internal admin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipient {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub role: RecipientRole,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipientRole {
    Client,
    Talent,
    Admin,
}

impl RecipientRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecipientRole::Client => "client",
            RecipientRole::Talent => "talent",
            RecipientRole::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "client" => Some(RecipientRole::Client),
            "talent" => Some(RecipientRole::Talent),
            "admin" => Some(RecipientRole::Admin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRecipientRequest {
    pub full_name: String,
    pub email: String,
    pub role: RecipientRole,
}
