//! Scripted runs of the engine from a JSON description.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use daawa_config::AppConfig;
use daawa_invitations::utils::PhoneNormalizer;
use daawa_invitations::{
    Channel, CreateEventRequest, Engine, EngineEvent, EventStats, Gender, Invitation,
    LoggingDispatcher, NotificationDispatcher, RawContact, RecordingDispatcher, RsvpStatus,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Deserialize)]
pub struct Scenario {
    pub event: CreateEventRequest,
    #[serde(default)]
    pub contacts: Vec<RawContact>,
    /// Contact ids to add as guests, grouped by segment
    #[serde(default)]
    pub selections: Vec<Selection>,
    #[serde(default)]
    pub manual_guests: Vec<ManualGuest>,
    #[serde(default)]
    pub co_hosts: Vec<ManualCoHost>,
    /// Overrides the configured default channel
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub responses: Vec<Response>,
    /// Phones whose invitations are revoked after all responses
    #[serde(default)]
    pub revoke: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct Selection {
    pub gender: Gender,
    pub contact_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ManualGuest {
    pub name: String,
    pub phone: String,
    pub gender: Gender,
}

#[derive(Debug, Deserialize)]
pub struct ManualCoHost {
    pub name: String,
    pub phone: String,
}

#[derive(Debug, Deserialize)]
pub struct Response {
    pub phone: String,
    pub status: RsvpStatus,
    #[serde(default)]
    pub plus_ones: u32,
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub event_id: String,
    pub invitations: Vec<Invitation>,
    pub stats: EventStats,
    pub by_gender: HashMap<Gender, EventStats>,
    /// Per-step failures that did not abort the run
    pub rejections: Vec<String>,
    pub signals: Vec<EngineEvent>,
}

/// Records every event and also writes it to the log
struct CliDispatcher {
    recording: RecordingDispatcher,
    logging: LoggingDispatcher,
}

impl NotificationDispatcher for CliDispatcher {
    fn dispatch(&self, event: &EngineEvent) {
        self.logging.dispatch(event);
        self.recording.dispatch(event);
    }
}

pub fn load(path: &Path) -> Result<Scenario> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse scenario {}", path.display()))
}

pub fn run(config: &AppConfig, scenario: Scenario) -> Result<Report> {
    let dispatcher = Arc::new(CliDispatcher {
        recording: RecordingDispatcher::new(),
        logging: LoggingDispatcher,
    });
    let engine = Engine::with_dispatcher(config, dispatcher.clone())?;
    let phones = PhoneNormalizer::from_config(&config.contacts);
    let mut rejections = Vec::new();

    let event = engine.events().create_event(scenario.event)?;

    let mut co_hosts = Vec::new();
    for co_host in &scenario.co_hosts {
        if let Err(error) = engine
            .co_hosts()
            .add_manual(&mut co_hosts, &co_host.name, &co_host.phone)
        {
            warn!(phone = %co_host.phone, %error, "co-host rejected");
            rejections.push(format!("co-host {}: {}", co_host.phone, error));
        }
    }
    if !co_hosts.is_empty() {
        engine.events().set_co_hosts(&event.id, co_hosts)?;
    }

    let mut guests = Vec::new();
    for selection in &scenario.selections {
        let selected: HashSet<String> = selection.contact_ids.iter().cloned().collect();
        engine.guest_lists().add_from_contacts(
            &mut guests,
            &scenario.contacts,
            &selected,
            selection.gender,
        );
    }
    for guest in &scenario.manual_guests {
        if let Err(error) =
            engine
                .guest_lists()
                .add_manual(&mut guests, &guest.name, &guest.phone, guest.gender)
        {
            warn!(phone = %guest.phone, %error, "guest rejected");
            rejections.push(format!("guest {}: {}", guest.phone, error));
        }
    }

    let channel = match &scenario.channel {
        Some(channel) => Channel::from_str(channel)?,
        None => engine.default_channel(),
    };
    engine
        .ledger()
        .issue(&event.id, &guests, channel, &event.host_id)?;

    for response in &scenario.responses {
        let outcome = find_by_phone(&engine, &phones, &event.id, &response.phone).and_then(|id| {
            Ok(engine
                .rsvp()
                .respond(&id, response.status, response.plus_ones)?)
        });
        if let Err(error) = outcome {
            warn!(phone = %response.phone, %error, "response rejected");
            rejections.push(format!("response {}: {}", response.phone, error));
        }
    }

    for phone in &scenario.revoke {
        let outcome = find_by_phone(&engine, &phones, &event.id, phone)
            .and_then(|id| Ok(engine.ledger().revoke(&id)?));
        if let Err(error) = outcome {
            rejections.push(format!("revoke {}: {}", phone, error));
        }
    }

    Ok(Report {
        invitations: engine.ledger().get(&event.id)?,
        stats: engine.stats().compute(&event.id)?,
        by_gender: engine.stats().compute_by_gender(&event.id)?,
        event_id: event.id,
        rejections,
        signals: dispatcher.recording.take(),
    })
}

fn find_by_phone(
    engine: &Engine,
    phones: &PhoneNormalizer,
    event_id: &str,
    raw_phone: &str,
) -> Result<String> {
    let phone = phones.normalize(raw_phone)?;
    engine
        .ledger()
        .get(event_id)?
        .into_iter()
        .find(|i| i.invitee_phone == phone)
        .map(|i| i.id)
        .with_context(|| format!("no invitation for {}", phone))
}
