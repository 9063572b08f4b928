use log::debug;
use serde::Serialize;

use crate::error::CatalogError;
use crate::logic::aggregate::compute_aggregate;
use crate::logic::validate::parse_amount;
use crate::model::{Actor, Aggregate, FundingStep, Id, StepField, StepId};

/// Reject an actor whose role may not mutate state. Runs before any change
/// is made.
pub fn authorize(actor: &Actor, action: &'static str) -> Result<(), CatalogError> {
    if actor.can_edit() {
        Ok(())
    } else {
        Err(CatalogError::Authorization {
            actor: actor.name.clone(),
            role: actor.role,
            action,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorMode {
    Viewing,
    Editing,
}

#[derive(Debug, Clone)]
enum EditorState {
    Viewing,
    Editing {
        editor: Actor,
        working: Vec<FundingStep>,
    },
}

/// Editor for one patent's funding ledger.
///
/// Starts in `Viewing` over a copy of the committed steps. Entering edit mode
/// snapshots them into a working copy; `done` makes the working copy the new
/// committed list and `discard` throws it away.
#[derive(Debug, Clone)]
pub struct LedgerEditor {
    patent_id: Id,
    committed: Vec<FundingStep>,
    state: EditorState,
}

impl LedgerEditor {
    pub fn open(patent_id: &str, steps: &[FundingStep]) -> Self {
        Self {
            patent_id: patent_id.to_string(),
            committed: steps.to_vec(),
            state: EditorState::Viewing,
        }
    }

    pub fn patent_id(&self) -> &Id {
        &self.patent_id
    }

    pub fn mode(&self) -> EditorMode {
        match self.state {
            EditorState::Viewing => EditorMode::Viewing,
            EditorState::Editing { .. } => EditorMode::Editing,
        }
    }

    pub fn editor(&self) -> Option<&Actor> {
        match &self.state {
            EditorState::Viewing => None,
            EditorState::Editing { editor, .. } => Some(editor),
        }
    }

    /// Steps currently on display: the working copy while editing, the
    /// committed list otherwise.
    pub fn steps(&self) -> &[FundingStep] {
        match &self.state {
            EditorState::Viewing => &self.committed,
            EditorState::Editing { working, .. } => working,
        }
    }

    pub fn committed(&self) -> &[FundingStep] {
        &self.committed
    }

    pub fn aggregate(&self) -> Aggregate {
        compute_aggregate(self.steps())
    }

    /// Switch to `Editing`. A no-op if already editing, so an in-flight
    /// working copy is never reset.
    pub fn enter_edit_mode(&mut self, actor: &Actor) -> Result<(), CatalogError> {
        authorize(actor, "edit funding steps")?;

        if let EditorState::Viewing = self.state {
            debug!(
                "{} started editing funding for patent {}",
                actor.name, self.patent_id
            );
            self.state = EditorState::Editing {
                editor: actor.clone(),
                working: self.committed.clone(),
            };
        }
        Ok(())
    }

    /// Only the actor who entered edit mode may touch the working copy.
    fn ensure_holder(&self, actor: &Actor) -> Result<(), CatalogError> {
        match &self.state {
            EditorState::Editing { editor, .. } if editor.name == actor.name => Ok(()),
            EditorState::Editing { editor, .. } => Err(CatalogError::SessionLocked {
                patent_id: self.patent_id.clone(),
                holder: editor.name.clone(),
            }),
            EditorState::Viewing => Err(CatalogError::NotEditing(self.patent_id.clone())),
        }
    }

    fn working_mut(&mut self, actor: &Actor) -> Result<&mut Vec<FundingStep>, CatalogError> {
        authorize(actor, "edit funding steps")?;
        self.ensure_holder(actor)?;
        match &mut self.state {
            EditorState::Editing { working, .. } => Ok(working),
            EditorState::Viewing => Err(CatalogError::NotEditing(self.patent_id.clone())),
        }
    }

    /// Replace one field of one step. Invalid amounts are rejected and leave
    /// the working copy unchanged.
    pub fn update_step(
        &mut self,
        actor: &Actor,
        step_id: &StepId,
        field: StepField,
    ) -> Result<&FundingStep, CatalogError> {
        let working = self.working_mut(actor)?;
        let step = working
            .iter_mut()
            .find(|s| &s.id == step_id)
            .ok_or_else(|| CatalogError::not_found("Funding step", step_id))?;

        match field {
            StepField::Name(name) => step.name = name,
            StepField::Status(status) => step.status = status,
            StepField::Planned(raw) => step.planned = parse_amount("planned", &raw)?,
            StepField::Spent(raw) => step.spent = parse_amount("spent", &raw)?,
            StepField::Notes(notes) => step.notes = notes,
        }

        Ok(step)
    }

    /// Append a blank step and return it.
    pub fn add_step(&mut self, actor: &Actor) -> Result<&FundingStep, CatalogError> {
        let working = self.working_mut(actor)?;
        working.push(FundingStep::new_default());
        // Just pushed; the list cannot be empty.
        Ok(&working[working.len() - 1])
    }

    pub fn delete_step(
        &mut self,
        actor: &Actor,
        step_id: &StepId,
    ) -> Result<FundingStep, CatalogError> {
        let working = self.working_mut(actor)?;
        let index = working
            .iter()
            .position(|s| &s.id == step_id)
            .ok_or_else(|| CatalogError::not_found("Funding step", step_id))?;
        Ok(working.remove(index))
    }

    /// Commit the working copy and return to `Viewing`.
    pub fn done(&mut self, actor: &Actor) -> Result<Vec<FundingStep>, CatalogError> {
        authorize(actor, "save funding steps")?;
        self.ensure_holder(actor)?;

        match std::mem::replace(&mut self.state, EditorState::Viewing) {
            EditorState::Editing { working, .. } => {
                self.committed = working;
                Ok(self.committed.clone())
            }
            EditorState::Viewing => Err(CatalogError::NotEditing(self.patent_id.clone())),
        }
    }

    /// Close without saving. The committed list is untouched.
    pub fn discard(&mut self, actor: &Actor) -> Result<(), CatalogError> {
        authorize(actor, "discard funding edits")?;
        if let EditorState::Editing { .. } = self.state {
            self.ensure_holder(actor)?;
            debug!(
                "{} discarded funding edits for patent {}",
                actor.name, self.patent_id
            );
        }
        self.state = EditorState::Viewing;
        Ok(())
    }
}
