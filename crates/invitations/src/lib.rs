//! # Daawa Invitations Crate
//!
//! This crate provides the invitation and RSVP lifecycle engine for Daawa
//! events. It turns device contacts and manual entries into a de-duplicated,
//! gender-segmented guest list, manages co-hosts, issues invitations and
//! tracks RSVP responses into attendance statistics.
//!
//! ## Architecture
//!
//! - **Entities**: Domain models (Event, Guest, CoHost, Invitation, EventStats)
//! - **Services**: Business rules (guest list builder, ledger, RSVP, stats)
//! - **Repositories**: Persistence contracts plus in-memory implementations
//! - **Types**: Errors, identifiers and domain events
//! - **Utils**: Phone normalization and token generation
//!
//! ## Usage
//!
//! ```rust
//! use daawa_config::AppConfig;
//! use daawa_invitations::{CreateEventRequest, Engine, EventType, Gender, GenderRestriction, RsvpStatus};
//!
//! let engine = Engine::in_memory(&AppConfig::default()).unwrap();
//! let event = engine.events().create_event(CreateEventRequest {
//!     title: "Sara's graduation".to_string(),
//!     event_type: EventType::Graduation,
//!     gender_restriction: GenderRestriction::Mixed,
//!     host_id: "host-1".to_string(),
//! }).unwrap();
//!
//! let mut guests = Vec::new();
//! engine.guest_lists().add_manual(&mut guests, "Sara", "+97455512345", Gender::Female).unwrap();
//!
//! let issued = engine.ledger().issue(&event.id, &guests, engine.default_channel(), "host-1").unwrap();
//! engine.rsvp().respond(&issued[0].id, RsvpStatus::Accepted, 1).unwrap();
//!
//! let stats = engine.stats().compute(&event.id).unwrap();
//! assert_eq!(stats.accepted, 1);
//! assert_eq!(stats.total_plus_ones, 1);
//! ```

pub mod engine;
pub mod entities;
pub mod repositories;
pub mod services;
pub mod types;
pub mod utils;

pub use engine::Engine;
pub use entities::{
    Channel, CoHost, CreateEventRequest, CreateSessionRequest, Event, EventStats, EventType,
    Gender, GenderRestriction, Guest, Invitation, NormalizedContact, RawContact, RsvpStatus,
    Session,
};
pub use repositories::{
    EventRepository, InMemoryEventRepository, InMemoryInvitationRepository, InvitationRepository,
};
pub use services::{
    CoHostRegistry, ContactNormalizer, EventService, GenderPolicyReport, GuestListBuilder,
    InvitationLedger, LoggingDispatcher, NoopDispatcher, NotificationDispatcher,
    RecordingDispatcher, RsvpService, StatsAggregator,
};
pub use types::{EngineError, EngineEvent, EngineResult, PolicyViolation, Recipient};
