use serde::{Deserialize, Serialize};

use super::invitation::{Invitation, RsvpStatus};

/// Attendance figures derived from an event's current invitations.
///
/// Always rebuilt from the ledger with [`EventStats::tally`]; nothing
/// increments these fields in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventStats {
    pub accepted: u32,
    pub declined: u32,
    pub maybe: u32,
    pub pending: u32,
    pub total_invited: u32,
    pub total_plus_ones: u32,
}

impl EventStats {
    pub fn tally<'a, I>(invitations: I) -> Self
    where
        I: IntoIterator<Item = &'a Invitation>,
    {
        invitations
            .into_iter()
            .fold(EventStats::default(), |mut stats, invitation| {
                match invitation.rsvp_status {
                    RsvpStatus::Accepted => stats.accepted += 1,
                    RsvpStatus::Declined => stats.declined += 1,
                    RsvpStatus::Maybe => stats.maybe += 1,
                    RsvpStatus::Pending => stats.pending += 1,
                }
                stats.total_invited += 1;
                stats.total_plus_ones = stats
                    .total_plus_ones
                    .saturating_add(invitation.counted_plus_ones());
                stats
            })
    }

    pub fn responded(&self) -> u32 {
        self.accepted + self.declined + self.maybe
    }

    /// Upper bound of people who may show up
    pub fn expected_headcount(&self) -> u32 {
        self.accepted
            .saturating_add(self.maybe)
            .saturating_add(self.total_plus_ones)
    }

    /// Share of invitations that have been answered, 0.0 when none were sent
    pub fn response_rate(&self) -> f64 {
        if self.total_invited == 0 {
            0.0
        } else {
            f64::from(self.responded()) / f64::from(self.total_invited)
        }
    }

    /// The counts-add-up invariant
    pub fn is_consistent(&self) -> bool {
        self.responded() + self.pending == self.total_invited
    }
}
