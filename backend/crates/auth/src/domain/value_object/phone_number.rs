//! Phone Number Value Object

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

const MIN_DIGITS: usize = 7;
const MAX_DIGITS: usize = 15;

/// Phone number in canonical form: an optional leading `+` followed by
/// digits only. Separators (space, `-`, parentheses) are accepted on input
/// and stripped, so differently formatted copies of one number compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn new(raw: impl AsRef<str>) -> AppResult<Self> {
        let phone = raw.as_ref().trim();

        if phone.is_empty() {
            return Err(AppError::bad_request("Phone number cannot be empty"));
        }

        let (prefix, body) = match phone.strip_prefix('+') {
            Some(rest) => ("+", rest),
            None => ("", phone),
        };

        let mut digits = String::with_capacity(body.len());
        for ch in body.chars() {
            match ch {
                '0'..='9' => digits.push(ch),
                ' ' | '-' | '(' | ')' => {}
                _ => return Err(AppError::bad_request("Invalid phone number format")),
            }
        }

        if !(MIN_DIGITS..=MAX_DIGITS).contains(&digits.len()) {
            return Err(AppError::bad_request(format!(
                "Phone number must contain {MIN_DIGITS} to {MAX_DIGITS} digits"
            )));
        }

        Ok(Self(format!("{prefix}{digits}")))
    }

    pub fn from_db(phone: impl Into<String>) -> Self {
        Self(phone.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_db(self) -> String {
        self.0
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_valid() {
        assert_eq!(PhoneNumber::new(" +254 712 345678 ").unwrap().as_str(), "+254712345678");
        assert_eq!(PhoneNumber::new("(020) 555-0100").unwrap().as_str(), "0205550100");
        assert_eq!(PhoneNumber::new("0712345678").unwrap().as_str(), "0712345678");
    }

    #[test]
    fn test_phone_formats_compare_equal() {
        let plain = PhoneNumber::new("0712345678").unwrap();
        assert_eq!(PhoneNumber::new("0712 345 678").unwrap(), plain);
        assert_eq!(PhoneNumber::new("0712-345-678").unwrap(), plain);
        assert_ne!(PhoneNumber::new("+0712345678").unwrap(), plain);
    }

    #[test]
    fn test_phone_invalid() {
        assert!(PhoneNumber::new("").is_err());
        assert!(PhoneNumber::new("12345").is_err());
        assert!(PhoneNumber::new("0712abc678").is_err());
        assert!(PhoneNumber::new("++254712345678").is_err());
        assert!(PhoneNumber::new("1234567890123456").is_err());
    }
}
