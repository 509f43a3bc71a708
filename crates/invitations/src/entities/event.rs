use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::guest::{CoHost, Gender};

/// Represents a hosted gathering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub event_type: EventType,
    pub gender_restriction: GenderRestriction,
    /// User ID of the host who owns the event
    pub host_id: String,
    #[serde(default)]
    pub sessions: Vec<Session>,
    #[serde(default)]
    pub co_hosts: Vec<CoHost>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Wedding,
    Birthday,
    Graduation,
    BabyShower,
    Engagement,
    EidGathering,
    PrivateParty,
    Condolence,
    Other,
}

impl From<&str> for EventType {
    fn from(s: &str) -> Self {
        match s.to_uppercase().replace('-', "_").as_str() {
            "WEDDING" => EventType::Wedding,
            "BIRTHDAY" => EventType::Birthday,
            "GRADUATION" => EventType::Graduation,
            "BABY_SHOWER" => EventType::BabyShower,
            "ENGAGEMENT" => EventType::Engagement,
            "EID_GATHERING" => EventType::EidGathering,
            "PRIVATE_PARTY" => EventType::PrivateParty,
            "CONDOLENCE" => EventType::Condolence,
            _ => EventType::Other,
        }
    }
}

/// Which gender segments an event admits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GenderRestriction {
    #[default]
    Mixed,
    MaleOnly,
    FemaleOnly,
}

impl GenderRestriction {
    pub fn admits(self, gender: Gender) -> bool {
        match self {
            GenderRestriction::Mixed => true,
            GenderRestriction::MaleOnly => gender == Gender::Male,
            GenderRestriction::FemaleOnly => gender == Gender::Female,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GenderRestriction::Mixed => "MIXED",
            GenderRestriction::MaleOnly => "MALE_ONLY",
            GenderRestriction::FemaleOnly => "FEMALE_ONLY",
        }
    }
}

impl fmt::Display for GenderRestriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A timed part of an event, optionally reserved for one gender segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub title: String,
    /// `None` means the session is open to every admitted guest
    pub segment: Option<Gender>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
}

/// Request to create a new event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub event_type: EventType,
    #[serde(default)]
    pub gender_restriction: GenderRestriction,
    pub host_id: String,
}

/// Request to add a session to an event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub title: String,
    #[serde(default)]
    pub segment: Option<Gender>,
    pub starts_at: DateTime<Utc>,
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location: Option<String>,
}

impl Event {
    /// Create a new event instance owned by `request.host_id`
    pub fn new(request: CreateEventRequest) -> Self {
        let now = Utc::now();
        Self {
            id: cuid2::cuid(),
            title: request.title.trim().to_string(),
            event_type: request.event_type,
            gender_restriction: request.gender_restriction,
            host_id: request.host_id,
            sessions: Vec::new(),
            co_hosts: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn session(&self, session_id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == session_id)
    }

    /// Sessions reserved for a segment the current restriction no longer admits.
    pub fn conflicting_sessions(&self) -> Vec<&Session> {
        self.sessions
            .iter()
            .filter(|s| matches!(s.segment, Some(g) if !self.gender_restriction.admits(g)))
            .collect()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl CreateEventRequest {
    /// Validate the create request
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Event title cannot be empty".to_string());
        }

        if self.title.len() > 200 {
            return Err("Event title too long (max 200 characters)".to_string());
        }

        if self.host_id.trim().is_empty() {
            return Err("Host ID cannot be empty".to_string());
        }

        Ok(())
    }
}

impl CreateSessionRequest {
    /// Validate the request against the owning event's restriction
    pub fn validate(&self, restriction: GenderRestriction) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Session title cannot be empty".to_string());
        }

        if let Some(ends_at) = self.ends_at {
            if ends_at < self.starts_at {
                return Err("Session cannot end before it starts".to_string());
            }
        }

        if let Some(segment) = self.segment {
            if !restriction.admits(segment) {
                return Err(format!(
                    "A {} session is not allowed under the {} policy",
                    segment, restriction
                ));
            }
        }

        Ok(())
    }

    pub fn into_session(self) -> Session {
        Session {
            id: cuid2::cuid(),
            title: self.title.trim().to_string(),
            segment: self.segment,
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            location: self.location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn request(restriction: GenderRestriction) -> CreateEventRequest {
        CreateEventRequest {
            title: "  Eid majlis ".to_string(),
            event_type: EventType::EidGathering,
            gender_restriction: restriction,
            host_id: "host-1".to_string(),
        }
    }

    #[test]
    fn test_event_creation() {
        let event = Event::new(request(GenderRestriction::Mixed));

        assert!(!event.id.is_empty());
        assert_eq!(event.title, "Eid majlis");
        assert_eq!(event.event_type, EventType::EidGathering);
        assert!(event.sessions.is_empty());
        assert!(event.co_hosts.is_empty());
        assert_eq!(event.created_at, event.updated_at);
    }

    #[test]
    fn test_restriction_admits() {
        assert!(GenderRestriction::Mixed.admits(Gender::Male));
        assert!(GenderRestriction::Mixed.admits(Gender::Female));
        assert!(GenderRestriction::MaleOnly.admits(Gender::Male));
        assert!(!GenderRestriction::MaleOnly.admits(Gender::Female));
        assert!(GenderRestriction::FemaleOnly.admits(Gender::Female));
        assert!(!GenderRestriction::FemaleOnly.admits(Gender::Male));
    }

    #[test]
    fn test_event_type_conversion() {
        assert_eq!(EventType::from("wedding"), EventType::Wedding);
        assert_eq!(EventType::from("baby-shower"), EventType::BabyShower);
        assert_eq!(EventType::from("EID_GATHERING"), EventType::EidGathering);
        assert_eq!(EventType::from("picnic"), EventType::Other);
    }

    #[test]
    fn test_restriction_serialization() {
        let json = serde_json::to_string(&GenderRestriction::FemaleOnly).unwrap();
        assert_eq!(json, "\"FEMALE_ONLY\"");
        assert_eq!(GenderRestriction::MaleOnly.to_string(), "MALE_ONLY");
    }

    #[test]
    fn test_create_event_request_validation() {
        assert!(request(GenderRestriction::Mixed).validate().is_ok());

        let mut blank = request(GenderRestriction::Mixed);
        blank.title = "   ".to_string();
        assert!(blank.validate().is_err());

        let mut no_host = request(GenderRestriction::Mixed);
        no_host.host_id = String::new();
        assert!(no_host.validate().is_err());
    }

    #[test]
    fn test_session_request_validation() {
        let starts_at = Utc::now();
        let mut session = CreateSessionRequest {
            title: "Ladies' hall".to_string(),
            segment: Some(Gender::Female),
            starts_at,
            ends_at: Some(starts_at + Duration::hours(3)),
            location: None,
        };

        assert!(session.validate(GenderRestriction::Mixed).is_ok());
        assert!(session.validate(GenderRestriction::FemaleOnly).is_ok());
        assert!(session.validate(GenderRestriction::MaleOnly).is_err());

        session.ends_at = Some(starts_at - Duration::minutes(1));
        assert!(session.validate(GenderRestriction::Mixed).is_err());
    }

    #[test]
    fn test_conflicting_sessions() {
        let mut event = Event::new(request(GenderRestriction::Mixed));
        let starts_at = Utc::now();
        event.sessions.push(
            CreateSessionRequest {
                title: "Men's majlis".to_string(),
                segment: Some(Gender::Male),
                starts_at,
                ends_at: None,
                location: None,
            }
            .into_session(),
        );
        event.sessions.push(
            CreateSessionRequest {
                title: "Dinner".to_string(),
                segment: None,
                starts_at,
                ends_at: None,
                location: None,
            }
            .into_session(),
        );

        assert!(event.conflicting_sessions().is_empty());

        event.gender_restriction = GenderRestriction::FemaleOnly;
        let conflicts = event.conflicting_sessions();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].title, "Men's majlis");
    }
}
