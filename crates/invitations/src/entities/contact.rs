use serde::{Deserialize, Serialize};

/// A contact record as supplied by the device contacts provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawContact {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub phone_numbers: Vec<String>,
}

impl RawContact {
    pub fn new(id: impl Into<String>, name: impl Into<String>, phone_numbers: Vec<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            phone_numbers,
        }
    }

    /// The number used for identity; later numbers are ignored.
    pub fn primary_phone(&self) -> Option<&str> {
        self.phone_numbers.first().map(String::as_str)
    }
}

/// Canonical `(display name, phone)` pair derived from a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedContact {
    pub contact_id: String,
    pub display_name: String,
    pub phone: String,
}
