use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::guest::{Gender, Guest};
use crate::types::{EngineError, EngineResult};
use crate::utils::HasPhone;

/// Represents one guest's invitation to one event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invitation {
    pub id: String,
    /// Opaque string the recipient uses to reach this invitation
    pub token: String,
    /// Event this invitation is for; looked up by id, never embedded
    pub event_id: String,
    pub invitee_display_name: String,
    pub invitee_phone: String,
    pub invitee_gender: Gender,
    pub channel: Channel,
    pub rsvp_status: RsvpStatus,
    /// Set on every response; `None` while pending
    pub rsvp_at: Option<DateTime<Utc>>,
    pub plus_ones: u32,
    pub invited_by_user_id: String,
    pub created_at: DateTime<Utc>,
}

/// Delivery channel recorded on the invitation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Channel {
    Sms,
    Whatsapp,
    InApp,
}

impl FromStr for Channel {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "sms" => Ok(Channel::Sms),
            "whatsapp" => Ok(Channel::Whatsapp),
            "in_app" | "inapp" => Ok(Channel::InApp),
            other => Err(EngineError::validation(format!(
                "unknown invitation channel: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Channel::Sms => "SMS",
            Channel::Whatsapp => "WHATSAPP",
            Channel::InApp => "IN_APP",
        })
    }
}

/// RSVP status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RsvpStatus {
    Pending,
    Accepted,
    Declined,
    Maybe,
}

impl RsvpStatus {
    /// Get all possible statuses
    pub fn all() -> [RsvpStatus; 4] {
        [
            RsvpStatus::Pending,
            RsvpStatus::Accepted,
            RsvpStatus::Declined,
            RsvpStatus::Maybe,
        ]
    }

    /// Statuses a guest may choose. `Pending` is only ever initial.
    pub fn is_response(self) -> bool {
        !matches!(self, RsvpStatus::Pending)
    }

    /// Whether plus-ones are kept for this status
    pub fn counts_plus_ones(self) -> bool {
        matches!(self, RsvpStatus::Accepted | RsvpStatus::Maybe)
    }

    pub fn can_transition_to(self, target: RsvpStatus) -> bool {
        target.is_response()
    }
}

impl FromStr for RsvpStatus {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PENDING" => Ok(RsvpStatus::Pending),
            "ACCEPTED" => Ok(RsvpStatus::Accepted),
            "DECLINED" => Ok(RsvpStatus::Declined),
            "MAYBE" => Ok(RsvpStatus::Maybe),
            other => Err(EngineError::validation(format!(
                "unknown RSVP status: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for RsvpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RsvpStatus::Pending => "PENDING",
            RsvpStatus::Accepted => "ACCEPTED",
            RsvpStatus::Declined => "DECLINED",
            RsvpStatus::Maybe => "MAYBE",
        })
    }
}

impl Invitation {
    /// Create a pending invitation from a draft guest
    pub fn from_guest(
        event_id: impl Into<String>,
        guest: &Guest,
        channel: Channel,
        invited_by_user_id: impl Into<String>,
        token: String,
    ) -> Self {
        Self {
            id: cuid2::cuid(),
            token,
            event_id: event_id.into(),
            invitee_display_name: guest.display_name.clone(),
            invitee_phone: guest.normalized_phone.clone(),
            invitee_gender: guest.gender,
            channel,
            rsvp_status: RsvpStatus::Pending,
            rsvp_at: None,
            plus_ones: 0,
            invited_by_user_id: invited_by_user_id.into(),
            created_at: Utc::now(),
        }
    }

    /// Record a response. Any response may replace any other; declining
    /// drops plus-ones.
    pub fn respond(
        &mut self,
        status: RsvpStatus,
        plus_ones: u32,
        at: DateTime<Utc>,
    ) -> EngineResult<()> {
        if !self.rsvp_status.can_transition_to(status) {
            return Err(EngineError::InvalidTransition { target: status });
        }

        self.rsvp_status = status;
        self.plus_ones = if status.counts_plus_ones() { plus_ones } else { 0 };
        self.rsvp_at = Some(at);
        Ok(())
    }

    pub fn is_pending(&self) -> bool {
        self.rsvp_status == RsvpStatus::Pending
    }

    /// Plus-ones that count toward attendance
    pub fn counted_plus_ones(&self) -> u32 {
        if self.rsvp_status.counts_plus_ones() {
            self.plus_ones
        } else {
            0
        }
    }
}

impl HasPhone for Invitation {
    fn phone(&self) -> &str {
        &self.invitee_phone
    }
}
