//! Wires the services together from configuration.

use std::str::FromStr;
use std::sync::Arc;

use daawa_config::AppConfig;
use tracing::info;

use crate::entities::Channel;
use crate::repositories::{
    EventRepository, InMemoryEventRepository, InMemoryInvitationRepository, InvitationRepository,
};
use crate::services::{
    CoHostRegistry, ContactNormalizer, EventService, GuestListBuilder, InvitationLedger,
    NoopDispatcher, NotificationDispatcher, RsvpService, StatsAggregator,
};
use crate::types::{EngineError, EngineResult};
use crate::utils::PhoneNormalizer;

/// All engine services sharing one pair of repositories and one dispatcher
pub struct Engine {
    events: EventService,
    guest_lists: GuestListBuilder,
    co_hosts: CoHostRegistry,
    ledger: InvitationLedger,
    rsvp: RsvpService,
    stats: StatsAggregator,
    default_channel: Channel,
}

impl Engine {
    pub fn new(
        config: &AppConfig,
        events: Arc<dyn EventRepository>,
        invitations: Arc<dyn InvitationRepository>,
        dispatcher: Arc<dyn NotificationDispatcher>,
    ) -> EngineResult<Self> {
        let default_channel = Channel::from_str(&config.invitations.default_channel)
            .map_err(|error| EngineError::configuration(error.to_string()))?;
        let normalizer = ContactNormalizer::new(PhoneNormalizer::from_config(&config.contacts));
        let co_hosts = CoHostRegistry::new(normalizer.clone(), config.co_hosts.max_co_hosts);

        info!(
            country_code = %config.contacts.default_country_code,
            max_co_hosts = config.co_hosts.max_co_hosts,
            max_plus_ones = config.invitations.max_plus_ones,
            %default_channel,
            "invitation engine ready"
        );

        Ok(Self {
            events: EventService::new(events.clone(), invitations.clone(), co_hosts.clone()),
            guest_lists: GuestListBuilder::new(normalizer),
            co_hosts,
            ledger: InvitationLedger::new(
                events.clone(),
                invitations.clone(),
                dispatcher.clone(),
                config.invitations.token_length,
            ),
            rsvp: RsvpService::new(
                events,
                invitations.clone(),
                dispatcher,
                config.invitations.max_plus_ones,
            ),
            stats: StatsAggregator::new(invitations),
            default_channel,
        })
    }

    /// In-process repositories and no notification delivery
    pub fn in_memory(config: &AppConfig) -> EngineResult<Self> {
        Self::with_dispatcher(config, Arc::new(NoopDispatcher))
    }

    /// In-process repositories with the given dispatcher
    pub fn with_dispatcher(
        config: &AppConfig,
        dispatcher: Arc<dyn NotificationDispatcher>,
    ) -> EngineResult<Self> {
        Self::new(
            config,
            Arc::new(InMemoryEventRepository::new()),
            Arc::new(InMemoryInvitationRepository::new()),
            dispatcher,
        )
    }

    pub fn events(&self) -> &EventService {
        &self.events
    }

    pub fn guest_lists(&self) -> &GuestListBuilder {
        &self.guest_lists
    }

    pub fn co_hosts(&self) -> &CoHostRegistry {
        &self.co_hosts
    }

    pub fn ledger(&self) -> &InvitationLedger {
        &self.ledger
    }

    pub fn rsvp(&self) -> &RsvpService {
        &self.rsvp
    }

    pub fn stats(&self) -> &StatsAggregator {
        &self.stats
    }

    pub fn default_channel(&self) -> Channel {
        self.default_channel
    }
}
