//! Co-host registry.
//!
//! Co-hosts live in their own namespace: a phone may belong to a guest and
//! a co-host at once, but never to two co-hosts.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use super::contact_normalizer::{display_name_or_phone, ContactNormalizer};
use crate::entities::{CoHost, RawContact};
use crate::types::{EngineError, EngineResult};
use crate::utils::contains_phone;

#[derive(Debug, Clone)]
pub struct CoHostRegistry {
    normalizer: ContactNormalizer,
    max_co_hosts: usize,
}

impl CoHostRegistry {
    pub fn new(normalizer: ContactNormalizer, max_co_hosts: usize) -> Self {
        Self {
            normalizer,
            max_co_hosts,
        }
    }

    pub fn max_co_hosts(&self) -> usize {
        self.max_co_hosts
    }

    /// Add the selected contacts as co-hosts.
    ///
    /// Already-registered phones are skipped. If the remaining new co-hosts
    /// would push the list past the cap, nothing is added.
    pub fn add_from_contacts(
        &self,
        co_hosts: &mut Vec<CoHost>,
        contacts: &[RawContact],
        selected: &HashSet<String>,
    ) -> EngineResult<Vec<CoHost>> {
        let mut fresh: Vec<CoHost> = Vec::new();

        for candidate in self.normalizer.candidates(contacts, selected) {
            if contains_phone(co_hosts, &candidate.phone) || contains_phone(&fresh, &candidate.phone) {
                debug!(contact_id = %candidate.contact_id, "contact already a co-host");
                continue;
            }
            fresh.push(CoHost::new(
                candidate.contact_id,
                candidate.display_name,
                candidate.phone,
            ));
        }

        if co_hosts.len() + fresh.len() > self.max_co_hosts {
            warn!(
                current = co_hosts.len(),
                requested = fresh.len(),
                limit = self.max_co_hosts,
                "co-host batch rejected"
            );
            return Err(EngineError::LimitExceeded {
                limit: self.max_co_hosts,
            });
        }

        co_hosts.extend(fresh.iter().cloned());
        info!(added = fresh.len(), total = co_hosts.len(), "added co-hosts from contacts");
        Ok(fresh)
    }

    pub fn add_manual(
        &self,
        co_hosts: &mut Vec<CoHost>,
        display_name: &str,
        raw_phone: &str,
    ) -> EngineResult<CoHost> {
        let phone = self.normalizer.phones().normalize(raw_phone)?;

        if contains_phone(co_hosts, &phone) {
            return Err(EngineError::duplicate_phone(phone));
        }

        if co_hosts.len() >= self.max_co_hosts {
            return Err(EngineError::LimitExceeded {
                limit: self.max_co_hosts,
            });
        }

        let co_host = CoHost::new(
            cuid2::cuid(),
            display_name_or_phone(display_name, &phone),
            phone,
        );
        co_hosts.push(co_host.clone());

        info!(co_host_id = %co_host.id, "added manual co-host");
        Ok(co_host)
    }

    /// Remove by id. Unknown ids are ignored.
    pub fn remove(&self, co_hosts: &mut Vec<CoHost>, co_host_id: &str) -> Option<CoHost> {
        let index = co_hosts.iter().position(|c| c.id == co_host_id)?;
        Some(co_hosts.remove(index))
    }

    /// Check a complete list before it is stored on an event
    pub fn validate(&self, co_hosts: &[CoHost]) -> EngineResult<()> {
        if co_hosts.len() > self.max_co_hosts {
            return Err(EngineError::LimitExceeded {
                limit: self.max_co_hosts,
            });
        }

        let mut seen = HashSet::new();
        for co_host in co_hosts {
            if !self.normalizer.phones().validate(&co_host.normalized_phone) {
                return Err(EngineError::invalid_phone(&co_host.normalized_phone));
            }
            if !seen.insert(co_host.normalized_phone.as_str()) {
                return Err(EngineError::duplicate_phone(&co_host.normalized_phone));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Gender, Guest};
    use crate::services::GuestListBuilder;

    fn registry(limit: usize) -> CoHostRegistry {
        CoHostRegistry::new(ContactNormalizer::default(), limit)
    }

    fn contacts() -> Vec<RawContact> {
        vec![
            RawContact::new("c1", "Khalid", vec!["+9745550001".into()]),
            RawContact::new("c2", "Fatima", vec!["5550002".into()]),
            RawContact::new("c3", "Hamad", vec!["5550003".into()]),
            RawContact::new("c4", "Khalid again", vec!["05550001".into()]),
        ]
    }

    fn select(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_add_from_contacts_dedups() {
        let registry = registry(5);
        let mut co_hosts = Vec::new();

        let added = registry
            .add_from_contacts(&mut co_hosts, &contacts(), &select(&["c1", "c4"]))
            .unwrap();
        assert_eq!(added.len(), 1);

        let again = registry
            .add_from_contacts(&mut co_hosts, &contacts(), &select(&["c1"]))
            .unwrap();
        assert!(again.is_empty());
        assert_eq!(co_hosts.len(), 1);
    }

    #[test]
    fn test_add_from_contacts_rejects_whole_batch_over_limit() {
        let registry = registry(2);
        let mut co_hosts = Vec::new();
        registry.add_manual(&mut co_hosts, "Khalid", "5550001").unwrap();

        let result = registry.add_from_contacts(&mut co_hosts, &contacts(), &select(&["c2", "c3"]));
        assert!(matches!(result, Err(EngineError::LimitExceeded { limit: 2 })));
        assert_eq!(co_hosts.len(), 1);

        // Re-selecting an existing co-host does not count against the cap
        let added = registry
            .add_from_contacts(&mut co_hosts, &contacts(), &select(&["c1", "c2"]))
            .unwrap();
        assert_eq!(added.len(), 1);
        assert_eq!(co_hosts.len(), 2);
    }

    #[test]
    fn test_add_manual_limit_and_duplicates() {
        let registry = registry(1);
        let mut co_hosts = Vec::new();

        registry.add_manual(&mut co_hosts, "Khalid", "+9745550001").unwrap();
        assert!(matches!(
            registry.add_manual(&mut co_hosts, "Khalid", "5550001"),
            Err(EngineError::DuplicatePhone { .. })
        ));
        assert!(matches!(
            registry.add_manual(&mut co_hosts, "Fatima", "5550002"),
            Err(EngineError::LimitExceeded { limit: 1 })
        ));
        assert!(matches!(
            registry.add_manual(&mut Vec::new(), "Nobody", "abc"),
            Err(EngineError::InvalidPhone { .. })
        ));
    }

    #[test]
    fn test_co_hosts_and_guests_are_separate_namespaces() {
        let registry = registry(3);
        let builder = GuestListBuilder::default();
        let mut co_hosts = Vec::new();
        let mut guests: Vec<Guest> = Vec::new();

        builder.add_manual(&mut guests, "Khalid", "5550001", Gender::Male).unwrap();
        let co_host = registry.add_manual(&mut co_hosts, "Khalid", "5550001").unwrap();

        assert_eq!(co_host.normalized_phone, guests[0].normalized_phone);
        assert_eq!(co_hosts.len(), 1);
        assert_eq!(guests.len(), 1);
    }

    #[test]
    fn test_remove_and_validate() {
        let registry = registry(2);
        let mut co_hosts = vec![
            CoHost::new("h1", "Khalid", "+9745550001"),
            CoHost::new("h2", "Fatima", "+9745550002"),
        ];
        assert!(registry.validate(&co_hosts).is_ok());

        co_hosts.push(CoHost::new("h3", "Hamad", "+9745550003"));
        assert!(matches!(
            registry.validate(&co_hosts),
            Err(EngineError::LimitExceeded { .. })
        ));

        assert!(registry.remove(&mut co_hosts, "h3").is_some());
        assert!(registry.remove(&mut co_hosts, "h3").is_none());

        co_hosts[1].normalized_phone = "+9745550001".to_string();
        assert!(matches!(
            registry.validate(&co_hosts),
            Err(EngineError::DuplicatePhone { .. })
        ));
    }
}
