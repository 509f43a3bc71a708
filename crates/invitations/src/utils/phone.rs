//! Phone number normalization.
//!
//! Every phone that enters the engine passes through [`PhoneNormalizer`]
//! first. Two inputs that normalize to the same string are the same person
//! everywhere else.

use daawa_config::ContactsConfig;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{EngineError, EngineResult};

/// E.164 caps a number at 15 digits.
const MAX_DIGITS: usize = 15;

static NORMALIZED_PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[1-9][0-9]*$").expect("phone pattern compiles"));

/// Anything identified by a normalized phone number.
pub trait HasPhone {
    fn phone(&self) -> &str;
}

pub fn contains_phone<T: HasPhone>(items: &[T], phone: &str) -> bool {
    items.iter().any(|item| item.phone() == phone)
}

#[derive(Debug, Clone)]
pub struct PhoneNormalizer {
    default_country_code: String,
    min_digits: usize,
}

impl Default for PhoneNormalizer {
    fn default() -> Self {
        Self::from_config(&ContactsConfig::default())
    }
}

impl PhoneNormalizer {
    pub fn new(default_country_code: impl Into<String>, min_digits: usize) -> Self {
        let default_country_code: String = default_country_code
            .into()
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        Self {
            default_country_code,
            min_digits: min_digits.clamp(1, MAX_DIGITS),
        }
    }

    pub fn from_config(config: &ContactsConfig) -> Self {
        Self::new(config.default_country_code.clone(), config.min_digits)
    }

    /// Normalize a raw phone string.
    ///
    /// Strips everything except digits and a leading `+`, rewrites an
    /// international `00` prefix to `+`, and prefixes the default country
    /// code to numbers that carry none.
    pub fn normalize(&self, raw: &str) -> EngineResult<String> {
        let leading_plus = raw
            .chars()
            .find(|c| c.is_ascii_digit() || *c == '+')
            .map_or(false, |c| c == '+');
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

        if digits.is_empty() {
            return Err(EngineError::invalid_phone(raw));
        }

        let normalized = if leading_plus {
            format!("+{}", digits)
        } else if let Some(international) = digits.strip_prefix("00") {
            format!("+{}", international)
        } else if self.carries_country_code(&digits) {
            format!("+{}", digits)
        } else if !self.default_country_code.is_empty() {
            let national = digits.strip_prefix('0').unwrap_or(&digits);
            format!("+{}{}", self.default_country_code, national)
        } else {
            digits
        };

        self.validate(&normalized)
            .then_some(normalized)
            .ok_or_else(|| EngineError::invalid_phone(raw))
    }

    /// Digits that already start with the default code and leave a full
    /// subscriber number after it, written without the `+`.
    fn carries_country_code(&self, digits: &str) -> bool {
        !self.default_country_code.is_empty()
            && digits
                .strip_prefix(self.default_country_code.as_str())
                .map_or(false, |rest| rest.len() >= self.min_digits)
    }

    /// Whether an already-normalized number is well formed
    pub fn validate(&self, normalized: &str) -> bool {
        let digit_count = normalized.trim_start_matches('+').len();
        NORMALIZED_PHONE.is_match(normalized)
            && (self.min_digits..=MAX_DIGITS).contains(&digit_count)
    }
}
