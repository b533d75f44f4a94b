use serde::Deserialize;
use tracing::info;

/// Mini App host webhook events.
///
/// The host posts these when a user adds/removes the app or toggles
/// notifications. We only log them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEvent {
    FrameAdded,
    FrameRemoved,
    FrameClick,
    NotificationsEnabled,
    NotificationsDisabled,
    Other(String),
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type", alias = "event", default)]
    kind: Option<String>,
}

impl WebhookEvent {
    pub fn from_type(kind: &str) -> Self {
        match kind {
            "frame_added" => Self::FrameAdded,
            "frame_removed" => Self::FrameRemoved,
            "frame_click" => Self::FrameClick,
            "notifications_enabled" => Self::NotificationsEnabled,
            "notifications_disabled" => Self::NotificationsDisabled,
            other => Self::Other(other.to_string()),
        }
    }

    /// Decode the event kind from a raw webhook payload
    pub fn parse(payload: &serde_json::Value) -> Self {
        let kind = Envelope::deserialize(payload)
            .ok()
            .and_then(|e| e.kind)
            .unwrap_or_default();
        Self::from_type(&kind)
    }

    pub fn log(&self, payload: &serde_json::Value) {
        match self {
            Self::Other(kind) => info!("📬 Unknown webhook event '{}': {}", kind, payload),
            known => info!("📬 Webhook {:?}: {}", known, payload),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_known_events() {
        assert_eq!(WebhookEvent::parse(&json!({"type": "frame_added"})), WebhookEvent::FrameAdded);
        assert_eq!(
            WebhookEvent::parse(&json!({"event": "notifications_disabled", "fid": 3})),
            WebhookEvent::NotificationsDisabled
        );
    }

    #[test]
    fn test_unknown_or_missing_type() {
        assert_eq!(
            WebhookEvent::parse(&json!({"type": "cast_liked"})),
            WebhookEvent::Other("cast_liked".to_string())
        );
        assert_eq!(WebhookEvent::parse(&json!({"fid": 1})), WebhookEvent::Other(String::new()));
        assert_eq!(WebhookEvent::parse(&json!([1, 2])), WebhookEvent::Other(String::new()));
    }
}
