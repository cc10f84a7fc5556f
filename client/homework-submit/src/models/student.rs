use validator::Validate;

use crate::error::ValidationError;

/// Student as typed into the form. Not checked against any roster here;
/// the scorer answers `ERR|INVALID_NAME` for unknown names.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct StudentIdentity {
    #[validate(length(min = 1))]
    first_name: String,
    #[validate(length(min = 1))]
    last_name: String,
}

impl StudentIdentity {
    pub fn new(first_name: &str, last_name: &str) -> Result<Self, ValidationError> {
        let identity = Self {
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
        };
        identity
            .validate()
            .map_err(|_| ValidationError::BlankName)?;
        Ok(identity)
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }
}
