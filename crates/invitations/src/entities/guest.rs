use std::fmt;

use serde::{Deserialize, Serialize};

use crate::utils::HasPhone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn all() -> [Gender; 2] {
        [Gender::Male, Gender::Female]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A guest-list draft entry, not yet turned into an invitation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guest {
    /// Contact id when picked from contacts, generated otherwise
    pub id: String,
    pub display_name: String,
    pub normalized_phone: String,
    pub gender: Gender,
}

impl Guest {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        normalized_phone: impl Into<String>,
        gender: Gender,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            normalized_phone: normalized_phone.into(),
            gender,
        }
    }
}

impl HasPhone for Guest {
    fn phone(&self) -> &str {
        &self.normalized_phone
    }
}

/// A delegated host. Shares no identity with guests even when the phone matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoHost {
    pub id: String,
    pub display_name: String,
    pub normalized_phone: String,
}

impl CoHost {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        normalized_phone: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            normalized_phone: normalized_phone.into(),
        }
    }
}

impl HasPhone for CoHost {
    fn phone(&self) -> &str {
        &self.normalized_phone
    }
}
