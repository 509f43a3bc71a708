//! RSVP handling.
//!
//! Each `respond` call is one authoritative write. Statistics are recounted
//! from the ledger after the write instead of being adjusted, so duplicate
//! taps or retried requests settle on whatever was applied last.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::notifications::NotificationDispatcher;
use crate::entities::{Event, EventStats, Invitation, RsvpStatus};
use crate::repositories::{EventRepository, InvitationRepository};
use crate::types::{EngineError, EngineEvent, EngineResult, Recipient};

pub struct RsvpService {
    events: Arc<dyn EventRepository>,
    invitations: Arc<dyn InvitationRepository>,
    dispatcher: Arc<dyn NotificationDispatcher>,
    max_plus_ones: u32,
}

impl RsvpService {
    pub fn new(
        events: Arc<dyn EventRepository>,
        invitations: Arc<dyn InvitationRepository>,
        dispatcher: Arc<dyn NotificationDispatcher>,
        max_plus_ones: u32,
    ) -> Self {
        Self {
            events,
            invitations,
            dispatcher,
            max_plus_ones,
        }
    }

    /// Record a guest's answer.
    ///
    /// `Pending` is rejected as a target. Plus-ones are ignored (and reset)
    /// when declining.
    pub fn respond(
        &self,
        invitation_id: &str,
        status: RsvpStatus,
        plus_ones: u32,
    ) -> EngineResult<Invitation> {
        if !status.is_response() {
            return Err(EngineError::InvalidTransition { target: status });
        }

        if status.counts_plus_ones() && plus_ones > self.max_plus_ones {
            return Err(EngineError::InvalidPlusOnes {
                requested: plus_ones,
                max: self.max_plus_ones,
            });
        }

        let mut invitation = self
            .invitations
            .find_by_id(invitation_id)?
            .ok_or_else(|| EngineError::invitation_not_found(invitation_id))?;
        let event = self
            .events
            .find_by_id(&invitation.event_id)?
            .ok_or_else(|| EngineError::event_not_found(&invitation.event_id))?;

        let previous = invitation.rsvp_status;
        invitation.respond(status, plus_ones, Utc::now())?;
        self.invitations.update(&invitation)?;

        info!(
            invitation_id = %invitation.id,
            event_id = %event.id,
            from = %previous,
            to = %invitation.rsvp_status,
            plus_ones = invitation.plus_ones,
            "recorded RSVP"
        );

        let stats = EventStats::tally(&self.invitations.find_by_event(&event.id)?);

        self.dispatcher.dispatch(&EngineEvent::RsvpReceived {
            event_id: event.id.clone(),
            invitation_id: invitation.id.clone(),
            status: invitation.rsvp_status,
            plus_ones: invitation.plus_ones,
            notify: recipients(&event),
        });
        self.dispatcher.dispatch(&EngineEvent::StatsUpdated {
            event_id: event.id.clone(),
            stats,
        });

        Ok(invitation)
    }

    /// Look up by token and respond, for recipients following a link
    pub fn respond_by_token(
        &self,
        token: &str,
        status: RsvpStatus,
        plus_ones: u32,
    ) -> EngineResult<Invitation> {
        let invitation = self
            .invitations
            .find_by_token(token)?
            .ok_or_else(EngineError::token_not_found)?;
        self.respond(&invitation.id, status, plus_ones)
    }
}

/// Host first, then co-hosts in registry order
fn recipients(event: &Event) -> Vec<Recipient> {
    std::iter::once(Recipient::Host {
        user_id: event.host_id.clone(),
    })
    .chain(event.co_hosts.iter().map(|co_host| Recipient::CoHost {
        co_host_id: co_host.id.clone(),
        phone: co_host.normalized_phone.clone(),
    }))
    .collect()
}
