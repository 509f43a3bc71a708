//! The authoritative set of invitations per event.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::guest_list::validate_against_gender_restriction;
use super::notifications::NotificationDispatcher;
use crate::entities::{Channel, Event, EventStats, Guest, Invitation};
use crate::repositories::{EventRepository, InvitationRepository};
use crate::types::{EngineError, EngineEvent, EngineResult};
use crate::utils::generate_token;

/// Service issuing and revoking invitations
pub struct InvitationLedger {
    events: Arc<dyn EventRepository>,
    invitations: Arc<dyn InvitationRepository>,
    dispatcher: Arc<dyn NotificationDispatcher>,
    token_length: usize,
}

impl InvitationLedger {
    pub fn new(
        events: Arc<dyn EventRepository>,
        invitations: Arc<dyn InvitationRepository>,
        dispatcher: Arc<dyn NotificationDispatcher>,
        token_length: usize,
    ) -> Self {
        Self {
            events,
            invitations,
            dispatcher,
            token_length,
        }
    }

    /// Issue one pending invitation per guest.
    ///
    /// Guests whose phone already holds an invitation for this event are
    /// skipped, so retrying with an overlapping guest set never creates
    /// duplicates. The whole call is rejected if any guest conflicts with
    /// the event's gender restriction. Returns only the new invitations.
    ///
    /// Each stored invitation is signalled as soon as it is written. If a
    /// write fails part way, the error is returned after the stats for the
    /// invitations already stored have been published.
    pub fn issue(
        &self,
        event_id: &str,
        guests: &[Guest],
        channel: Channel,
        invited_by_user_id: &str,
    ) -> EngineResult<Vec<Invitation>> {
        let event = self.require_event(event_id)?;
        validate_against_gender_restriction(guests, event.gender_restriction)?;

        let mut seen = HashSet::new();
        let mut issued = Vec::new();

        for guest in guests {
            if !seen.insert(guest.normalized_phone.as_str()) {
                debug!(guest_id = %guest.id, "phone repeated within issue request");
                continue;
            }

            let invitation = Invitation::from_guest(
                &event.id,
                guest,
                channel,
                invited_by_user_id,
                generate_token(self.token_length),
            );

            match self.invitations.insert_if_absent(&invitation) {
                Ok(true) => {
                    info!(
                        invitation_id = %invitation.id,
                        event_id = %event.id,
                        %channel,
                        invited_by = invited_by_user_id,
                        "issued invitation"
                    );
                    self.dispatcher.dispatch(&EngineEvent::InvitationIssued {
                        event_id: event.id.clone(),
                        invitation_id: invitation.id.clone(),
                        channel: invitation.channel,
                        invitee_phone: invitation.invitee_phone.clone(),
                    });
                    issued.push(invitation);
                }
                Ok(false) => {
                    debug!(guest_id = %guest.id, event_id = %event.id, "guest already invited");
                }
                Err(error) => {
                    // Invitations stored before the failure stay on the ledger
                    warn!(
                        event_id = %event.id,
                        stored = issued.len(),
                        %error,
                        "issue interrupted by persistence failure"
                    );
                    if !issued.is_empty() {
                        if let Err(stats_error) = self.publish_stats(&event.id) {
                            warn!(event_id = %event.id, error = %stats_error, "stats not published");
                        }
                    }
                    return Err(error);
                }
            }
        }

        if !issued.is_empty() {
            self.publish_stats(&event.id)?;
        }

        Ok(issued)
    }

    /// Remove an invitation entirely, whatever its RSVP state
    pub fn revoke(&self, invitation_id: &str) -> EngineResult<Invitation> {
        let invitation = self
            .invitations
            .find_by_id(invitation_id)?
            .ok_or_else(|| EngineError::invitation_not_found(invitation_id))?;
        self.require_event(&invitation.event_id)?;

        let removed = self
            .invitations
            .remove(invitation_id)?
            .ok_or_else(|| EngineError::invitation_not_found(invitation_id))?;

        info!(
            invitation_id = %removed.id,
            event_id = %removed.event_id,
            status = %removed.rsvp_status,
            "revoked invitation"
        );

        self.dispatcher.dispatch(&EngineEvent::InvitationRevoked {
            event_id: removed.event_id.clone(),
            invitation_id: removed.id.clone(),
        });
        self.publish_stats(&removed.event_id)?;

        Ok(removed)
    }

    /// All current invitations for an event
    pub fn get(&self, event_id: &str) -> EngineResult<Vec<Invitation>> {
        self.invitations.find_by_event(event_id)
    }

    pub fn get_by_id(&self, invitation_id: &str) -> EngineResult<Invitation> {
        self.invitations
            .find_by_id(invitation_id)?
            .ok_or_else(|| EngineError::invitation_not_found(invitation_id))
    }

    pub fn get_by_token(&self, token: &str) -> EngineResult<Invitation> {
        self.invitations
            .find_by_token(token)?
            .ok_or_else(EngineError::token_not_found)
    }

    fn require_event(&self, event_id: &str) -> EngineResult<Event> {
        self.events
            .find_by_id(event_id)?
            .ok_or_else(|| EngineError::event_not_found(event_id))
    }

    fn publish_stats(&self, event_id: &str) -> EngineResult<()> {
        let stats = EventStats::tally(&self.invitations.find_by_event(event_id)?);
        self.dispatcher.dispatch(&EngineEvent::StatsUpdated {
            event_id: event_id.to_string(),
            stats,
        });
        Ok(())
    }
}
