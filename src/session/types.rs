use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Role {
    User,
    Bot,
}

impl Role {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Bot => "bot",
        }
    }
}

/// One message in a session. Never modified after it is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Turn {
    pub(crate) role: Role,
    pub(crate) message: String,
    /// ISO-8601, stored verbatim
    pub(crate) timestamp: String,
}

impl Turn {
    pub(crate) fn at(role: Role, message: &str, at: DateTime<Local>) -> Self {
        Self {
            role,
            message: message.to_string(),
            timestamp: at.to_rfc3339(),
        }
    }
}

/// On-disk shape: `{"history": [turn, ...]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Session {
    #[serde(default)]
    pub(crate) history: Vec<Turn>,
}

impl Session {
    pub(crate) fn push(&mut self, turn: Turn) {
        self.history.push(turn);
    }

    pub(crate) fn len(&self) -> usize {
        self.history.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn session_serializes_to_history_object() {
        let at = Local.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
        let mut session = Session::default();
        session.push(Turn::at(Role::User, "hi", at));
        session.push(Turn::at(Role::Bot, "Hello!", at));

        let value = serde_json::to_value(&session).unwrap();
        let history = value["history"].as_array().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0]["role"], "user");
        assert_eq!(history[0]["message"], "hi");
        assert_eq!(history[1]["role"], "bot");
        assert!(
            history[0]["timestamp"]
                .as_str()
                .unwrap()
                .starts_with("2026-03-01T09:30:00")
        );
    }

    #[test]
    fn missing_history_key_is_empty() {
        let session: Session = serde_json::from_str("{}").unwrap();
        assert!(session.is_empty());
    }

    #[test]
    fn unknown_role_is_rejected() {
        let raw = r#"{"history":[{"role":"system","message":"x","timestamp":"t"}]}"#;
        assert!(serde_json::from_str::<Session>(raw).is_err());
    }
}
