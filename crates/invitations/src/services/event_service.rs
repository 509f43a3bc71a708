use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::co_host_registry::CoHostRegistry;
use crate::entities::{
    CoHost, CreateEventRequest, CreateSessionRequest, Event, GenderRestriction, Invitation, Session,
};
use crate::repositories::{EventRepository, InvitationRepository};
use crate::types::{EngineError, EngineResult, PolicyViolation, SessionId};

/// Outstanding conflicts between an event's gender restriction and what
/// has already been issued or scheduled under it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenderPolicyReport {
    pub restriction: GenderRestriction,
    /// Invitations whose invitee the restriction no longer admits
    pub violations: Vec<PolicyViolation>,
    pub conflicting_sessions: Vec<SessionId>,
}

impl GenderPolicyReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty() && self.conflicting_sessions.is_empty()
    }
}

/// Event lifecycle: creation, sessions, co-hosts and restriction changes
pub struct EventService {
    events: Arc<dyn EventRepository>,
    invitations: Arc<dyn InvitationRepository>,
    co_hosts: CoHostRegistry,
}

impl EventService {
    pub fn new(
        events: Arc<dyn EventRepository>,
        invitations: Arc<dyn InvitationRepository>,
        co_hosts: CoHostRegistry,
    ) -> Self {
        Self {
            events,
            invitations,
            co_hosts,
        }
    }

    pub fn create_event(&self, request: CreateEventRequest) -> EngineResult<Event> {
        request.validate().map_err(EngineError::validation)?;

        let event = Event::new(request);
        self.events.save(&event)?;

        info!(
            event_id = %event.id,
            host_id = %event.host_id,
            restriction = %event.gender_restriction,
            "created event"
        );
        Ok(event)
    }

    pub fn get_event(&self, event_id: &str) -> EngineResult<Event> {
        self.events
            .find_by_id(event_id)?
            .ok_or_else(|| EngineError::event_not_found(event_id))
    }

    /// Add a session. A segment the event's restriction excludes is refused.
    pub fn add_session(&self, event_id: &str, request: CreateSessionRequest) -> EngineResult<Session> {
        let mut event = self.get_event(event_id)?;
        request
            .validate(event.gender_restriction)
            .map_err(EngineError::validation)?;

        let session = request.into_session();
        event.sessions.push(session.clone());
        event.touch();
        self.events.save(&event)?;

        info!(event_id, session_id = %session.id, "added session");
        Ok(session)
    }

    pub fn remove_session(&self, event_id: &str, session_id: &str) -> EngineResult<Session> {
        let mut event = self.get_event(event_id)?;
        let index = event
            .sessions
            .iter()
            .position(|s| s.id == session_id)
            .ok_or_else(|| EngineError::session_not_found(session_id))?;

        let session = event.sessions.remove(index);
        event.touch();
        self.events.save(&event)?;

        info!(event_id, session_id, "removed session");
        Ok(session)
    }

    /// Replace the event's co-host list after checking the registry rules
    pub fn set_co_hosts(&self, event_id: &str, co_hosts: Vec<CoHost>) -> EngineResult<Event> {
        self.co_hosts.validate(&co_hosts)?;

        let mut event = self.get_event(event_id)?;
        event.co_hosts = co_hosts;
        event.touch();
        self.events.save(&event)?;

        info!(event_id, co_hosts = event.co_hosts.len(), "updated co-hosts");
        Ok(event)
    }

    /// Store a new restriction and report what it conflicts with.
    ///
    /// Nothing is revoked or removed here. The host resolves every reported
    /// conflict explicitly, through the ledger or `remove_session`.
    pub fn change_gender_restriction(
        &self,
        event_id: &str,
        restriction: GenderRestriction,
    ) -> EngineResult<GenderPolicyReport> {
        let mut event = self.get_event(event_id)?;
        let previous = event.gender_restriction;

        if previous != restriction {
            event.gender_restriction = restriction;
            event.touch();
            self.events.save(&event)?;
        }

        let report = self.report_for(&event)?;
        if report.is_clean() {
            info!(event_id, from = %previous, to = %restriction, "changed gender restriction");
        } else {
            warn!(
                event_id,
                from = %previous,
                to = %restriction,
                violations = report.violations.len(),
                sessions = report.conflicting_sessions.len(),
                "gender restriction changed with outstanding conflicts"
            );
        }
        Ok(report)
    }

    /// Report conflicts under the event's current restriction
    pub fn audit_gender_policy(&self, event_id: &str) -> EngineResult<GenderPolicyReport> {
        let event = self.get_event(event_id)?;
        self.report_for(&event)
    }

    fn report_for(&self, event: &Event) -> EngineResult<GenderPolicyReport> {
        let restriction = event.gender_restriction;
        let violations = self
            .invitations
            .find_by_event(&event.id)?
            .iter()
            .filter(|i| !restriction.admits(i.invitee_gender))
            .map(violation)
            .collect();

        Ok(GenderPolicyReport {
            restriction,
            violations,
            conflicting_sessions: event
                .conflicting_sessions()
                .into_iter()
                .map(|s| s.id.clone())
                .collect(),
        })
    }
}

fn violation(invitation: &Invitation) -> PolicyViolation {
    PolicyViolation {
        subject_id: invitation.id.clone(),
        display_name: invitation.invitee_display_name.clone(),
        phone: invitation.invitee_phone.clone(),
        gender: invitation.invitee_gender,
    }
}
