//! # Notifications
//!
//! Transient user-facing messages ("2 Boat Headphones added to the cart.").
//!
//! The core only produces them. Displaying them (a toast on the next
//! rendered page, an SSE push) belongs to the presentation layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Severity of a notification, used to pick the toast style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Info,
    Error,
}

/// A message shown once to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Notification {
            level,
            message: message.into(),
            created_at: Utc::now(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Notification::new(NotificationLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Notification::new(NotificationLevel::Info, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notification::new(NotificationLevel::Error, message)
    }

    /// The confirmation shown after an add-to-cart.
    pub fn added_to_cart(quantity: i64, product_name: &str) -> Self {
        Notification::success(format!("{} {} added to the cart.", quantity, product_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_added_to_cart_message() {
        let n = Notification::added_to_cart(3, "Boat Headphones");
        assert_eq!(n.level, NotificationLevel::Success);
        assert_eq!(n.message, "3 Boat Headphones added to the cart.");
    }

    #[test]
    fn test_level_serializes_snake_case() {
        let json = serde_json::to_value(Notification::error("boom")).unwrap();
        assert_eq!(json["level"], "error");
        assert_eq!(json["message"], "boom");
        assert!(json["createdAt"].is_string());
    }
}
