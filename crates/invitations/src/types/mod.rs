//! Shared types for the invitation engine.
//!
//! This module contains the error definitions, identifier aliases and the
//! domain events emitted by the services.

pub mod errors;
pub mod events;

pub use errors::{EngineError, EngineResult, PolicyViolation};
pub use events::{EngineEvent, Recipient};

// Common type aliases
pub type EventId = String;
pub type SessionId = String;
pub type GuestId = String;
pub type CoHostId = String;
pub type InvitationId = String;
pub type ContactId = String;
pub type UserId = String;
