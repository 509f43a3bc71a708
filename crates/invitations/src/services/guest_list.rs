//! Guest list composition.
//!
//! A guest list is a plain `Vec<Guest>` owned by the composing host. The
//! builder enforces the one rule that matters while composing: no two
//! guests share a normalized phone, whatever their gender segment.

use std::collections::HashSet;

use tracing::{debug, info};

use super::contact_normalizer::{display_name_or_phone, ContactNormalizer};
use crate::entities::{Gender, GenderRestriction, Guest, RawContact};
use crate::types::{EngineError, EngineResult, PolicyViolation};
use crate::utils::contains_phone;

#[derive(Debug, Clone, Default)]
pub struct GuestListBuilder {
    normalizer: ContactNormalizer,
}

impl GuestListBuilder {
    pub fn new(normalizer: ContactNormalizer) -> Self {
        Self { normalizer }
    }

    /// Add the selected contacts under `gender`.
    ///
    /// Contacts whose phone is already on the list are skipped without
    /// error, so re-selecting a contact is a no-op. Returns the guests that
    /// were actually added.
    pub fn add_from_contacts(
        &self,
        guests: &mut Vec<Guest>,
        contacts: &[RawContact],
        selected: &HashSet<String>,
        gender: Gender,
    ) -> Vec<Guest> {
        let mut added = Vec::new();

        for candidate in self.normalizer.candidates(contacts, selected) {
            if contains_phone(guests, &candidate.phone) {
                debug!(contact_id = %candidate.contact_id, "contact already on guest list");
                continue;
            }

            let guest = Guest::new(
                candidate.contact_id,
                candidate.display_name,
                candidate.phone,
                gender,
            );
            guests.push(guest.clone());
            added.push(guest);
        }

        info!(added = added.len(), total = guests.len(), %gender, "added guests from contacts");
        added
    }

    /// Add a hand-typed guest.
    pub fn add_manual(
        &self,
        guests: &mut Vec<Guest>,
        display_name: &str,
        raw_phone: &str,
        gender: Gender,
    ) -> EngineResult<Guest> {
        let phone = self.normalizer.phones().normalize(raw_phone)?;

        if contains_phone(guests, &phone) {
            return Err(EngineError::duplicate_phone(phone));
        }

        let guest = Guest::new(
            cuid2::cuid(),
            display_name_or_phone(display_name, &phone),
            phone,
            gender,
        );
        guests.push(guest.clone());

        info!(guest_id = %guest.id, %gender, "added manual guest");
        Ok(guest)
    }

    /// Remove by id. Unknown ids are ignored.
    pub fn remove(&self, guests: &mut Vec<Guest>, guest_id: &str) -> Option<Guest> {
        let index = guests.iter().position(|g| g.id == guest_id)?;
        Some(guests.remove(index))
    }
}

/// Guests of one gender segment
pub fn segment(guests: &[Guest], gender: Gender) -> Vec<&Guest> {
    guests.iter().filter(|g| g.gender == gender).collect()
}

/// Check every guest against the event's restriction.
///
/// Mismatching guests are all reported, never dropped; the caller has to
/// resolve them before issuing invitations.
pub fn validate_against_gender_restriction(
    guests: &[Guest],
    restriction: GenderRestriction,
) -> EngineResult<&[Guest]> {
    let violations: Vec<PolicyViolation> = guests
        .iter()
        .filter(|guest| !restriction.admits(guest.gender))
        .map(|guest| PolicyViolation {
            subject_id: guest.id.clone(),
            display_name: guest.display_name.clone(),
            phone: guest.normalized_phone.clone(),
            gender: guest.gender,
        })
        .collect();

    if violations.is_empty() {
        Ok(guests)
    } else {
        Err(EngineError::GenderPolicyViolation {
            restriction,
            violations,
        })
    }
}
