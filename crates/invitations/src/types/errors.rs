//! Error types for the invitation engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::{Gender, GenderRestriction, RsvpStatus};

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// A guest or invitation whose gender conflicts with the event's restriction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyViolation {
    /// Guest id or invitation id, depending on what was checked
    pub subject_id: String,
    pub display_name: String,
    pub phone: String,
    pub gender: Gender,
}

/// Main error type for the invitation engine
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid phone number: {raw:?}")]
    InvalidPhone { raw: String },

    #[error("Contact {contact_id} has no phone number")]
    ContactWithoutPhone { contact_id: String },

    #[error("Phone number already on the list: {phone}")]
    DuplicatePhone { phone: String },

    #[error("Co-host limit of {limit} reached")]
    LimitExceeded { limit: usize },

    #[error("{} entries conflict with the {restriction} policy", .violations.len())]
    GenderPolicyViolation {
        restriction: GenderRestriction,
        violations: Vec<PolicyViolation>,
    },

    #[error("Event not found: {id}")]
    EventNotFound { id: String },

    #[error("Invitation not found: {id}")]
    InvitationNotFound { id: String },

    #[error("Session not found: {id}")]
    SessionNotFound { id: String },

    #[error("Invalid RSVP transition to {target}")]
    InvalidTransition { target: RsvpStatus },

    #[error("Plus-ones {requested} exceed the maximum of {max}")]
    InvalidPlusOnes { requested: u32, max: u32 },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Persistence error: {message}")]
    Persistence { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl EngineError {
    pub fn invalid_phone(raw: impl Into<String>) -> Self {
        Self::InvalidPhone { raw: raw.into() }
    }

    pub fn duplicate_phone(phone: impl Into<String>) -> Self {
        Self::DuplicatePhone {
            phone: phone.into(),
        }
    }

    /// Create a not found error for events
    pub fn event_not_found(id: impl Into<String>) -> Self {
        Self::EventNotFound { id: id.into() }
    }

    /// Create a not found error for invitations
    pub fn invitation_not_found(id: impl Into<String>) -> Self {
        Self::InvitationNotFound { id: id.into() }
    }

    /// Not found by link token. The token itself stays out of the message.
    pub fn token_not_found() -> Self {
        Self::InvitationNotFound {
            id: "<token>".to_string(),
        }
    }

    /// Create a not found error for sessions
    pub fn session_not_found(id: impl Into<String>) -> Self {
        Self::SessionNotFound { id: id.into() }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// True for any of the missing-entity variants.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::EventNotFound { .. } | Self::InvitationNotFound { .. } | Self::SessionNotFound { .. }
        )
    }

    /// True for rejections produced while composing guest or co-host lists.
    pub fn is_list_rejection(&self) -> bool {
        matches!(
            self,
            Self::InvalidPhone { .. }
                | Self::ContactWithoutPhone { .. }
                | Self::DuplicatePhone { .. }
                | Self::LimitExceeded { .. }
        )
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Persistence {
            message: format!("JSON serialization error: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(EngineError::event_not_found("evt").is_not_found());
        assert!(EngineError::invitation_not_found("inv").is_not_found());
        assert!(!EngineError::duplicate_phone("+9745550001").is_not_found());
        assert!(EngineError::token_not_found().is_not_found());

        assert!(EngineError::invalid_phone("abc").is_list_rejection());
        assert!(EngineError::LimitExceeded { limit: 3 }.is_list_rejection());
        assert!(!EngineError::InvalidTransition {
            target: RsvpStatus::Pending
        }
        .is_list_rejection());
    }

    #[test]
    fn test_error_messages() {
        let error = EngineError::GenderPolicyViolation {
            restriction: GenderRestriction::MaleOnly,
            violations: vec![PolicyViolation {
                subject_id: "g1".to_string(),
                display_name: "Sara".to_string(),
                phone: "+97455512345".to_string(),
                gender: Gender::Female,
            }],
        };
        assert_eq!(error.to_string(), "1 entries conflict with the MALE_ONLY policy");

        let error = EngineError::InvalidTransition {
            target: RsvpStatus::Pending,
        };
        assert_eq!(error.to_string(), "Invalid RSVP transition to PENDING");

        assert_eq!(
            EngineError::token_not_found().to_string(),
            "Invitation not found: <token>"
        );
    }
}
