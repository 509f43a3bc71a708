//! Persistence contracts for the invitation engine.
//!
//! Services only talk to these traits. Durable storage belongs to an
//! adapter outside this crate; the in-memory implementations here back
//! tests, the CLI and any host that keeps state in process.

pub mod memory;

pub use memory::{InMemoryEventRepository, InMemoryInvitationRepository};

use crate::entities::{Event, Invitation};
use crate::types::EngineResult;

#[cfg_attr(test, mockall::automock)]
pub trait EventRepository: Send + Sync {
    fn find_by_id(&self, event_id: &str) -> EngineResult<Option<Event>>;

    /// Insert or replace by id
    fn save(&self, event: &Event) -> EngineResult<()>;
}

#[cfg_attr(test, mockall::automock)]
pub trait InvitationRepository: Send + Sync {
    /// All current invitations for an event, in issue order
    fn find_by_event(&self, event_id: &str) -> EngineResult<Vec<Invitation>>;

    fn find_by_id(&self, invitation_id: &str) -> EngineResult<Option<Invitation>>;

    fn find_by_token(&self, token: &str) -> EngineResult<Option<Invitation>>;

    /// Store the invitation unless its event already has one for the same
    /// phone. Returns whether it was stored. Must be atomic with respect to
    /// concurrent callers so retried issuance cannot create duplicates.
    fn insert_if_absent(&self, invitation: &Invitation) -> EngineResult<bool>;

    /// Replace an existing invitation; `InvitationNotFound` if it was removed.
    fn update(&self, invitation: &Invitation) -> EngineResult<()>;

    fn remove(&self, invitation_id: &str) -> EngineResult<Option<Invitation>>;
}
