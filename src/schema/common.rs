use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::core::error::AppError;

#[derive(Object, Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }

    /// Logs the full error and hides it behind a generic message.
    pub fn internal(location: &str, err: &AppError) -> Self {
        tracing::error!("{}: {:?}", location, err);
        Self::new("Internal server error")
    }
}

#[derive(Object, Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}
