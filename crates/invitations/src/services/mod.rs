//! Business logic for the invitation engine.

pub mod co_host_registry;
pub mod contact_normalizer;
pub mod event_service;
pub mod guest_list;
pub mod invitation_ledger;
pub mod notifications;
pub mod rsvp_service;
pub mod stats_aggregator;

pub use co_host_registry::CoHostRegistry;
pub use contact_normalizer::ContactNormalizer;
pub use event_service::{EventService, GenderPolicyReport};
pub use guest_list::{segment, validate_against_gender_restriction, GuestListBuilder};
pub use invitation_ledger::InvitationLedger;
pub use notifications::{
    LoggingDispatcher, NoopDispatcher, NotificationDispatcher, RecordingDispatcher,
};
pub use rsvp_service::RsvpService;
pub use stats_aggregator::StatsAggregator;
