//! Internal utilities for the invitation engine.

pub mod phone;
pub mod tokens;

// Re-export utilities
pub use phone::{contains_phone, HasPhone, PhoneNormalizer};
pub use tokens::generate_token;
