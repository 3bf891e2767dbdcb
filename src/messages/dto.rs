use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::messages::repo::Message;
use crate::validate::is_valid_email;

/// Contact-form submission.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessageRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

impl NewMessageRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.first_name.trim().is_empty()
            || self.last_name.trim().is_empty()
            || self.email.trim().is_empty()
            || self.message.trim().is_empty()
        {
            return Err(ApiError::Validation("All fields are required".into()));
        }
        if !is_valid_email(self.email.trim()) {
            return Err(ApiError::Validation(
                "Please provide a valid email address".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct MessageCreated {
    pub message: String,
    pub data: Message,
}
