use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type Id = String;

/// Identifier of a funding step; assigned once at creation and never reused.
pub type StepId = String;

pub fn generate_id() -> Id {
    Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T> ListResponse<T> {
    pub fn new(items: Vec<T>) -> Self {
        let total = items.len();
        Self { items, total }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}
