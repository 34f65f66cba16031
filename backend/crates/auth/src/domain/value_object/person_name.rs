//! Person Name Value Object (first or last name)

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

const NAME_MAX_LENGTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonName(String);

impl PersonName {
    /// `field` names the input in error messages ("First name", "Last name")
    pub fn new(raw: impl AsRef<str>, field: &str) -> AppResult<Self> {
        let name = raw.as_ref().trim();

        if name.is_empty() {
            return Err(AppError::bad_request(format!("{field} cannot be empty")));
        }

        if name.chars().count() > NAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "{field} must be at most {NAME_MAX_LENGTH} characters"
            )));
        }

        if name.chars().any(char::is_control) {
            return Err(AppError::bad_request(format!(
                "{field} contains invalid characters"
            )));
        }

        Ok(Self(name.to_string()))
    }

    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_db(self) -> String {
        self.0
    }
}
