//! Per-event attendance statistics, always derived from the ledger.

use std::collections::HashMap;
use std::sync::Arc;

use crate::entities::{EventStats, Gender};
use crate::repositories::InvitationRepository;
use crate::types::EngineResult;

#[derive(Clone)]
pub struct StatsAggregator {
    invitations: Arc<dyn InvitationRepository>,
}

impl StatsAggregator {
    pub fn new(invitations: Arc<dyn InvitationRepository>) -> Self {
        Self { invitations }
    }

    /// Recount the event's current invitations
    pub fn compute(&self, event_id: &str) -> EngineResult<EventStats> {
        let invitations = self.invitations.find_by_event(event_id)?;
        Ok(EventStats::tally(&invitations))
    }

    /// Same counts, split by gender segment. Both segments are always present.
    pub fn compute_by_gender(&self, event_id: &str) -> EngineResult<HashMap<Gender, EventStats>> {
        let invitations = self.invitations.find_by_event(event_id)?;
        Ok(Gender::all()
            .into_iter()
            .map(|gender| {
                let stats = EventStats::tally(
                    invitations.iter().filter(|i| i.invitee_gender == gender),
                );
                (gender, stats)
            })
            .collect())
    }
}
