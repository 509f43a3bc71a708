//! In-process repository implementations.

use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;
use tracing::debug;

use super::{EventRepository, InvitationRepository};
use crate::entities::{Event, Invitation};
use crate::types::{EngineError, EngineResult};

/// Event store keyed by id
#[derive(Default)]
pub struct InMemoryEventRepository {
    events: RwLock<HashMap<String, Event>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }
}

impl EventRepository for InMemoryEventRepository {
    fn find_by_id(&self, event_id: &str) -> EngineResult<Option<Event>> {
        Ok(self.events.read().get(event_id).cloned())
    }

    fn save(&self, event: &Event) -> EngineResult<()> {
        self.events.write().insert(event.id.clone(), event.clone());
        Ok(())
    }
}

#[derive(Default)]
struct LedgerState {
    next_seq: u64,
    /// Insertion sequence → invitation, so reads come back in issue order
    by_seq: BTreeMap<u64, Invitation>,
    id_index: HashMap<String, u64>,
    token_index: HashMap<String, u64>,
    /// (event id, normalized phone) → sequence
    phone_index: HashMap<(String, String), u64>,
}

/// Invitation store guarded by a single lock, which makes
/// `insert_if_absent` atomic and serializes updates in arrival order.
#[derive(Default)]
pub struct InMemoryInvitationRepository {
    state: RwLock<LedgerState>,
}

impl InMemoryInvitationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.state.read().by_seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().by_seq.is_empty()
    }
}

impl InvitationRepository for InMemoryInvitationRepository {
    fn find_by_event(&self, event_id: &str) -> EngineResult<Vec<Invitation>> {
        let state = self.state.read();
        Ok(state
            .by_seq
            .values()
            .filter(|invitation| invitation.event_id == event_id)
            .cloned()
            .collect())
    }

    fn find_by_id(&self, invitation_id: &str) -> EngineResult<Option<Invitation>> {
        let state = self.state.read();
        Ok(state
            .id_index
            .get(invitation_id)
            .and_then(|seq| state.by_seq.get(seq))
            .cloned())
    }

    fn find_by_token(&self, token: &str) -> EngineResult<Option<Invitation>> {
        let state = self.state.read();
        Ok(state
            .token_index
            .get(token)
            .and_then(|seq| state.by_seq.get(seq))
            .cloned())
    }

    fn insert_if_absent(&self, invitation: &Invitation) -> EngineResult<bool> {
        let mut state = self.state.write();
        let phone_key = (invitation.event_id.clone(), invitation.invitee_phone.clone());

        if state.phone_index.contains_key(&phone_key) {
            debug!(
                event_id = %invitation.event_id,
                phone = %invitation.invitee_phone,
                "invitation already exists for phone"
            );
            return Ok(false);
        }

        if state.id_index.contains_key(&invitation.id)
            || state.token_index.contains_key(&invitation.token)
        {
            return Err(EngineError::persistence(format!(
                "invitation id or token collision for {}",
                invitation.id
            )));
        }

        let seq = state.next_seq;
        state.next_seq += 1;
        state.id_index.insert(invitation.id.clone(), seq);
        state.token_index.insert(invitation.token.clone(), seq);
        state.phone_index.insert(phone_key, seq);
        state.by_seq.insert(seq, invitation.clone());
        Ok(true)
    }

    fn update(&self, invitation: &Invitation) -> EngineResult<()> {
        let mut state = self.state.write();
        let seq = *state
            .id_index
            .get(&invitation.id)
            .ok_or_else(|| EngineError::invitation_not_found(&invitation.id))?;

        let stored = state
            .by_seq
            .get_mut(&seq)
            .ok_or_else(|| EngineError::invitation_not_found(&invitation.id))?;

        if stored.event_id != invitation.event_id
            || stored.invitee_phone != invitation.invitee_phone
            || stored.token != invitation.token
        {
            return Err(EngineError::persistence(format!(
                "identity fields of invitation {} cannot change",
                invitation.id
            )));
        }

        *stored = invitation.clone();
        Ok(())
    }

    fn remove(&self, invitation_id: &str) -> EngineResult<Option<Invitation>> {
        let mut state = self.state.write();
        let Some(seq) = state.id_index.remove(invitation_id) else {
            return Ok(None);
        };

        let removed = state.by_seq.remove(&seq);
        if let Some(ref invitation) = removed {
            state.token_index.remove(&invitation.token);
            state
                .phone_index
                .remove(&(invitation.event_id.clone(), invitation.invitee_phone.clone()));
        }
        Ok(removed)
    }
}
