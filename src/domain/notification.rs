use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length cap for the message column; longer announcement bodies are
/// summarized before dispatch.
pub const MESSAGE_SUMMARY_CHARS: usize = 160;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub entity: Option<EntityRef>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Deep-link back to the record that triggered the notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub entity_type: String,
    pub entity_id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    Inquiry,
    Talent,
    Invoice,
    Client,
    Placement,
    System,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::Inquiry => "inquiry",
            NotificationType::Talent => "talent",
            NotificationType::Invoice => "invoice",
            NotificationType::Client => "client",
            NotificationType::Placement => "placement",
            NotificationType::System => "system",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "inquiry" => Some(NotificationType::Inquiry),
            "talent" => Some(NotificationType::Talent),
            "invoice" => Some(NotificationType::Invoice),
            "client" => Some(NotificationType::Client),
            "placement" => Some(NotificationType::Placement),
            "system" => Some(NotificationType::System),
            _ => None,
        }
    }
}

/// Truncates announcement content to a feed-sized summary, cutting on a
/// char boundary so multi-byte text stays valid.
pub fn summarize(content: &str) -> String {
    let mut chars = content.char_indices();
    match chars.nth(MESSAGE_SUMMARY_CHARS) {
        Some((idx, _)) => {
            let mut summary = content[..idx].trim_end().to_string();
            summary.push('…');
            summary
        }
        None => content.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_content_passes_through() {
        assert_eq!(summarize("hello"), "hello");
    }

    #[test]
    fn long_content_is_truncated_with_ellipsis() {
        let content = "x".repeat(500);
        let summary = summarize(&content);
        assert_eq!(summary.chars().count(), MESSAGE_SUMMARY_CHARS + 1);
        assert!(summary.ends_with('…'));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let content = "é".repeat(300);
        let summary = summarize(&content);
        assert!(summary.ends_with('…'));
        assert_eq!(summary.chars().count(), MESSAGE_SUMMARY_CHARS + 1);
    }

    #[test]
    fn exact_length_content_is_not_truncated() {
        let content = "y".repeat(MESSAGE_SUMMARY_CHARS);
        assert_eq!(summarize(&content), content);
    }
}
