//! Turns device contacts into canonical `(display name, phone)` pairs.

use std::collections::HashSet;

use tracing::warn;

use crate::entities::{NormalizedContact, RawContact};
use crate::types::{EngineError, EngineResult};
use crate::utils::PhoneNormalizer;

#[derive(Debug, Clone, Default)]
pub struct ContactNormalizer {
    phones: PhoneNormalizer,
}

impl ContactNormalizer {
    pub fn new(phones: PhoneNormalizer) -> Self {
        Self { phones }
    }

    pub fn phones(&self) -> &PhoneNormalizer {
        &self.phones
    }

    /// Normalize one contact using its first phone number
    pub fn normalize(&self, contact: &RawContact) -> EngineResult<NormalizedContact> {
        let raw_phone = contact
            .primary_phone()
            .ok_or_else(|| EngineError::ContactWithoutPhone {
                contact_id: contact.id.clone(),
            })?;

        let phone = self.phones.normalize(raw_phone)?;

        Ok(NormalizedContact {
            contact_id: contact.id.clone(),
            display_name: display_name_or_phone(&contact.name, &phone),
            phone,
        })
    }

    /// Normalize the selected contacts, in provider order, dropping the ones
    /// that cannot be reached.
    pub fn candidates(
        &self,
        contacts: &[RawContact],
        selected: &HashSet<String>,
    ) -> Vec<NormalizedContact> {
        contacts
            .iter()
            .filter(|contact| selected.contains(&contact.id))
            .filter_map(|contact| match self.normalize(contact) {
                Ok(normalized) => Some(normalized),
                Err(error) => {
                    warn!(contact_id = %contact.id, %error, "skipping unreachable contact");
                    None
                }
            })
            .collect()
    }
}

pub(crate) fn display_name_or_phone(name: &str, phone: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        phone.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contacts() -> Vec<RawContact> {
        vec![
            RawContact::new("1", " Sara ", vec!["+974 5551 2345".into(), "4444 0000".into()]),
            RawContact::new("2", "No Phone", vec![]),
            RawContact::new("3", "", vec!["5550001".into()]),
            RawContact::new("4", "Garbage", vec!["n/a".into()]),
        ]
    }

    #[test]
    fn test_normalize_uses_first_number() {
        let normalizer = ContactNormalizer::default();
        let normalized = normalizer.normalize(&contacts()[0]).unwrap();

        assert_eq!(normalized.contact_id, "1");
        assert_eq!(normalized.display_name, "Sara");
        assert_eq!(normalized.phone, "+97455512345");
    }

    #[test]
    fn test_normalize_rejects_contact_without_phone() {
        let normalizer = ContactNormalizer::default();
        assert!(matches!(
            normalizer.normalize(&contacts()[1]),
            Err(EngineError::ContactWithoutPhone { .. })
        ));
    }

    #[test]
    fn test_blank_name_falls_back_to_phone() {
        let normalizer = ContactNormalizer::default();
        let normalized = normalizer.normalize(&contacts()[2]).unwrap();
        assert_eq!(normalized.display_name, "+9745550001");
    }

    #[test]
    fn test_candidates_filters_selection_and_unreachable() {
        let normalizer = ContactNormalizer::default();
        let selected: HashSet<String> = ["1", "2", "4", "99"].iter().map(|s| s.to_string()).collect();

        let candidates = normalizer.candidates(&contacts(), &selected);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].contact_id, "1");
    }
}
