use crate::model::{generate_id, StepId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepStatus {
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Pending,
}

impl Default for StepStatus {
    fn default() -> Self {
        StepStatus::NotStarted
    }
}

/// One line item in a patent's budget sub-ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingStep {
    pub id: StepId,
    pub name: String,
    pub status: StepStatus,
    pub planned: f64,
    pub spent: f64,
    pub notes: String,
}

impl FundingStep {
    /// Blank step appended by the editor.
    pub fn new_default() -> Self {
        Self {
            id: generate_id(),
            name: "New Step".to_string(),
            status: StepStatus::NotStarted,
            planned: 0.0,
            spent: 0.0,
            notes: String::new(),
        }
    }

    pub fn new(name: &str, status: StepStatus, planned: f64, spent: f64, notes: &str) -> Self {
        Self {
            id: generate_id(),
            name: name.to_string(),
            status,
            planned,
            spent,
            notes: notes.to_string(),
        }
    }

    pub fn is_over_budget(&self) -> bool {
        self.spent > self.planned
    }
}

/// Incoming step for a full ledger replacement. Steps without an id are
/// treated as new and receive one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFundingStep {
    #[serde(default)]
    pub id: Option<StepId>,
    pub name: String,
    #[serde(default)]
    pub status: StepStatus,
    pub planned: serde_json::Value,
    pub spent: serde_json::Value,
    #[serde(default)]
    pub notes: String,
}

/// A single-field edit to a step in the working copy. Amounts arrive as the
/// raw text typed by the user and are validated before they are applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum StepField {
    Name(String),
    Status(StepStatus),
    Planned(String),
    Spent(String),
    Notes(String),
}

impl StepField {
    pub fn name(&self) -> &'static str {
        match self {
            StepField::Name(_) => "name",
            StepField::Status(_) => "status",
            StepField::Planned(_) => "planned",
            StepField::Spent(_) => "spent",
            StepField::Notes(_) => "notes",
        }
    }
}

/// Totals derived from a step list. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub total_budget: f64,
    pub amount_spent: f64,
    pub remaining: f64,
    pub percentage: u8,
    pub over_budget: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundingLedger {
    pub patent_id: String,
    pub steps: Vec<FundingStep>,
    pub aggregate: Aggregate,
}
