//! Domain entities for the invitation engine.
//!
//! These are plain data records plus the small amount of behaviour that
//! belongs to a single record (for example an invitation's RSVP transition).
//! Anything spanning several records lives in the services.

pub mod contact;
pub mod event;
pub mod guest;
pub mod invitation;
pub mod stats;

// Re-export all entity types
pub use contact::{NormalizedContact, RawContact};
pub use event::{
    CreateEventRequest, CreateSessionRequest, Event, EventType, GenderRestriction, Session,
};
pub use guest::{CoHost, Gender, Guest};
pub use invitation::{Channel, Invitation, RsvpStatus};
pub use stats::EventStats;
