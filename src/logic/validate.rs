use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

use crate::model::{generate_id, FundingStep, NewFundingStep};

/// Rejected input on a single field. Reported inline against that field;
/// other fields stay editable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("Invalid {field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Parse a budget amount typed into a form field.
pub fn parse_amount(field: &str, raw: &str) -> Result<f64, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(field, "amount is required"));
    }

    let amount: f64 = trimmed
        .parse()
        .map_err(|_| ValidationError::new(field, format!("'{}' is not a number", trimmed)))?;

    check_amount(field, amount)
}

/// Same rules as [`parse_amount`] for amounts arriving as JSON, which may be
/// numbers or numeric strings.
pub fn parse_amount_value(field: &str, value: &Value) -> Result<f64, ValidationError> {
    match value {
        Value::Number(n) => match n.as_f64() {
            Some(amount) => check_amount(field, amount),
            None => Err(ValidationError::new(field, "amount is out of range")),
        },
        Value::String(s) => parse_amount(field, s),
        Value::Null => Err(ValidationError::new(field, "amount is required")),
        other => Err(ValidationError::new(
            field,
            format!("expected a number, got {}", other),
        )),
    }
}

fn check_amount(field: &str, amount: f64) -> Result<f64, ValidationError> {
    if !amount.is_finite() {
        return Err(ValidationError::new(field, "amount must be finite"));
    }
    if amount < 0.0 {
        return Err(ValidationError::new(field, "amount must not be negative"));
    }
    Ok(amount)
}

/// Validate a full replacement ledger. Steps keep their ids when given;
/// steps without one get a fresh id. Duplicate ids are rejected.
pub fn validate_steps(steps: Vec<NewFundingStep>) -> Result<Vec<FundingStep>, ValidationError> {
    let mut seen = HashSet::new();
    let mut validated = Vec::with_capacity(steps.len());

    for (index, step) in steps.into_iter().enumerate() {
        let planned = parse_amount_value(&format!("steps[{}].planned", index), &step.planned)?;
        let spent = parse_amount_value(&format!("steps[{}].spent", index), &step.spent)?;

        let id = step.id.unwrap_or_else(generate_id);
        if !seen.insert(id.clone()) {
            return Err(ValidationError::new(
                &format!("steps[{}].id", index),
                format!("duplicate step id '{}'", id),
            ));
        }

        validated.push(FundingStep {
            id,
            name: step.name,
            status: step.status,
            planned,
            spent,
            notes: step.notes,
        });
    }

    Ok(validated)
}
