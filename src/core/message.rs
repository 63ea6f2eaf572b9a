use serde::{Deserialize, Serialize};

use crate::utils::direction::{detect_direction, TextDirection};

/// Transcript roles. `User` and `Assistant` travel to the backend as
/// conversation history; `App` messages are client-authored notices
/// (command feedback, status) rendered in the transcript but never
/// transmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    App,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::App => "app",
        }
    }

    /// The role string used on the wire, or `None` for transcript-only roles.
    pub fn to_api_role(self) -> Option<&'static str> {
        match self {
            Role::User => Some("user"),
            Role::Assistant => Some("assistant"),
            Role::App => None,
        }
    }

    pub fn is_user(self) -> bool {
        self == Role::User
    }

    pub fn is_assistant(self) -> bool {
        self == Role::Assistant
    }
}

impl TryFrom<&str> for Role {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            "app" => Ok(Role::App),
            _ => Err(format!("invalid transcript role: {value}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn notice(content: impl Into<String>) -> Self {
        Self::new(Role::App, content)
    }

    pub fn is_user(&self) -> bool {
        self.role.is_user()
    }

    pub fn is_assistant(&self) -> bool {
        self.role.is_assistant()
    }

    /// Display direction for this message's bubble, re-evaluated from the
    /// content on every call so mixed-language transcripts render correctly.
    pub fn direction(&self) -> TextDirection {
        detect_direction(&self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notices_have_no_api_role() {
        assert_eq!(Role::App.to_api_role(), None);
        assert_eq!(Role::User.to_api_role(), Some("user"));
        assert_eq!(Role::Assistant.to_api_role(), Some("assistant"));
    }

    #[test]
    fn invalid_role_strings_are_rejected() {
        assert!(Role::try_from("system").is_err());
        assert_eq!(Role::try_from("assistant"), Ok(Role::Assistant));
    }

    #[test]
    fn message_direction_follows_content() {
        assert_eq!(Message::user("hello").direction(), TextDirection::Ltr);
        assert_eq!(Message::assistant("سلام").direction(), TextDirection::Rtl);
    }
}
