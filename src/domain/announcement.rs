use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub announcement_type: AnnouncementType,
    pub audience: Audience,
    pub status: AnnouncementStatus,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub published_at: Option<DateTime<Utc>>,
    pub archived_at: Option<DateTime<Utc>>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnouncementType {
    #[default]
    General,
    Maintenance,
    NewFeature,
    Urgent,
    Event,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    #[default]
    All,
    Clients,
    Talents,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnouncementStatus {
    Draft,
    Scheduled,
    Published,
    Archived,
}

impl AnnouncementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnouncementType::General => "general",
            AnnouncementType::Maintenance => "maintenance",
            AnnouncementType::NewFeature => "new_feature",
            AnnouncementType::Urgent => "urgent",
            AnnouncementType::Event => "event",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "general" => Some(AnnouncementType::General),
            "maintenance" => Some(AnnouncementType::Maintenance),
            "new_feature" => Some(AnnouncementType::NewFeature),
            "urgent" => Some(AnnouncementType::Urgent),
            "event" => Some(AnnouncementType::Event),
            _ => None,
        }
    }
}

impl Audience {
    pub fn as_str(&self) -> &'static str {
        match self {
            Audience::All => "all",
            Audience::Clients => "clients",
            Audience::Talents => "talents",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "all" => Some(Audience::All),
            "clients" => Some(Audience::Clients),
            "talents" => Some(Audience::Talents),
            _ => None,
        }
    }
}

impl AnnouncementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnouncementStatus::Draft => "draft",
            AnnouncementStatus::Scheduled => "scheduled",
            AnnouncementStatus::Published => "published",
            AnnouncementStatus::Archived => "archived",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(AnnouncementStatus::Draft),
            "scheduled" => Some(AnnouncementStatus::Scheduled),
            "published" => Some(AnnouncementStatus::Published),
            "archived" => Some(AnnouncementStatus::Archived),
            _ => None,
        }
    }

    /// Whether the record can still be edited. Published and archived
    /// announcements are read-only.
    pub fn is_editable(&self) -> bool {
        matches!(self, AnnouncementStatus::Draft | AnnouncementStatus::Scheduled)
    }
}
