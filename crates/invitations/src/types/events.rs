//! Domain events emitted by the engine for notification dispatch.

use serde::{Deserialize, Serialize};

use crate::entities::{Channel, EventStats, RsvpStatus};

/// Someone who should hear about an RSVP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Recipient {
    Host { user_id: String },
    CoHost { co_host_id: String, phone: String },
}

/// Main engine event type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum EngineEvent {
    /// An invitation was created for a guest
    InvitationIssued {
        event_id: String,
        invitation_id: String,
        channel: Channel,
        invitee_phone: String,
    },

    /// A guest answered (or changed their answer)
    RsvpReceived {
        event_id: String,
        invitation_id: String,
        status: RsvpStatus,
        plus_ones: u32,
        notify: Vec<Recipient>,
    },

    /// The host rescinded an invitation
    InvitationRevoked {
        event_id: String,
        invitation_id: String,
    },

    /// Fresh statistics after a ledger mutation
    StatsUpdated { event_id: String, stats: EventStats },
}

impl EngineEvent {
    /// Get the event ID associated with this engine event
    pub fn event_id(&self) -> &str {
        match self {
            EngineEvent::InvitationIssued { event_id, .. }
            | EngineEvent::RsvpReceived { event_id, .. }
            | EngineEvent::InvitationRevoked { event_id, .. }
            | EngineEvent::StatsUpdated { event_id, .. } => event_id,
        }
    }

    pub fn invitation_id(&self) -> Option<&str> {
        match self {
            EngineEvent::InvitationIssued { invitation_id, .. }
            | EngineEvent::RsvpReceived { invitation_id, .. }
            | EngineEvent::InvitationRevoked { invitation_id, .. } => Some(invitation_id),
            EngineEvent::StatsUpdated { .. } => None,
        }
    }

    /// Signal name handed to the delivery collaborator
    pub fn event_type_name(&self) -> &'static str {
        match self {
            EngineEvent::InvitationIssued { .. } => "INVITATION_ISSUED",
            EngineEvent::RsvpReceived { .. } => "RSVP_RECEIVED",
            EngineEvent::InvitationRevoked { .. } => "INVITATION_REVOKED",
            EngineEvent::StatsUpdated { .. } => "STATS_UPDATED",
        }
    }

    /// Whether a person should be told about this event, as opposed to a
    /// dashboard refresh.
    pub fn is_notification(&self) -> bool {
        !matches!(self, EngineEvent::StatsUpdated { .. })
    }
}
