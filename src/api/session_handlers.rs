use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use log::info;
use serde::Serialize;

use crate::api::handlers::{ledger, ApiError, ApiResult, AppState, SharedState};
use crate::error::CatalogError;
use crate::logic::{authorize, EditorMode, LedgerEditor};
use crate::model::{Actor, Aggregate, FundingLedger, FundingStep, Id, StepField, StepId};
use crate::store::Store;

/// Snapshot of an edit session as shown to the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: Id,
    pub patent_id: Id,
    pub mode: EditorMode,
    pub editor: Option<Actor>,
    pub steps: Vec<FundingStep>,
    pub aggregate: Aggregate,
}

impl SessionView {
    fn new(session_id: &Id, editor: &LedgerEditor) -> Self {
        Self {
            session_id: session_id.clone(),
            patent_id: editor.patent_id().clone(),
            mode: editor.mode(),
            editor: editor.editor().cloned(),
            steps: editor.steps().to_vec(),
            aggregate: editor.aggregate(),
        }
    }
}

/// Run an editor operation inside a session, mapping a missing or expired
/// session to not-found.
async fn in_session<S, R, F>(
    state: &AppState<S>,
    session_id: &Id,
    f: F,
) -> Result<R, CatalogError>
where
    F: FnOnce(&mut LedgerEditor) -> Result<R, CatalogError>,
{
    state
        .sessions
        .with_session(session_id, f)
        .await
        .unwrap_or_else(|| Err(CatalogError::not_found("Edit session", session_id)))
}

/// Enter edit mode on a patent's ledger. Reopening by the same actor returns
/// the session already in progress; anyone else is locked out until it ends.
pub async fn open_session<S: Store>(
    State(state): State<SharedState<S>>,
    Path(patent_id): Path<Id>,
    actor: Actor,
) -> Result<(StatusCode, Json<SessionView>), ApiError> {
    authorize(&actor, "edit funding steps")?;

    let steps = state
        .store
        .get_funding(&patent_id)
        .await
        .map_err(CatalogError::from)?
        .ok_or_else(|| CatalogError::not_found("Patent", &patent_id))?;

    let mut editor = LedgerEditor::open(&patent_id, &steps);
    editor.enter_edit_mode(&actor)?;
    let opened = state.sessions.open_or_resume(&actor, editor).await?;

    let status = if opened.created {
        info!(
            "{} opened funding edit session {} for patent {}",
            actor.name, opened.session_id, patent_id
        );
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(SessionView::new(&opened.session_id, &opened.editor)),
    ))
}

pub async fn get_session<S: Store>(
    State(state): State<SharedState<S>>,
    Path(session_id): Path<Id>,
) -> ApiResult<SessionView> {
    let view = in_session(&*state, &session_id, |editor| {
        Ok(SessionView::new(&session_id, editor))
    })
    .await?;
    Ok(Json(view))
}

pub async fn add_step<S: Store>(
    State(state): State<SharedState<S>>,
    Path(session_id): Path<Id>,
    actor: Actor,
) -> ApiResult<SessionView> {
    let view = in_session(&*state, &session_id, |editor| {
        editor.add_step(&actor)?;
        Ok(SessionView::new(&session_id, editor))
    })
    .await?;
    Ok(Json(view))
}

pub async fn update_step<S: Store>(
    State(state): State<SharedState<S>>,
    Path((session_id, step_id)): Path<(Id, StepId)>,
    actor: Actor,
    Json(field): Json<StepField>,
) -> ApiResult<SessionView> {
    let view = in_session(&*state, &session_id, |editor| {
        editor.update_step(&actor, &step_id, field)?;
        Ok(SessionView::new(&session_id, editor))
    })
    .await?;
    Ok(Json(view))
}

pub async fn delete_step<S: Store>(
    State(state): State<SharedState<S>>,
    Path((session_id, step_id)): Path<(Id, StepId)>,
    actor: Actor,
) -> ApiResult<SessionView> {
    let view = in_session(&*state, &session_id, |editor| {
        editor.delete_step(&actor, &step_id)?;
        Ok(SessionView::new(&session_id, editor))
    })
    .await?;
    Ok(Json(view))
}

/// "Done": the working copy replaces the patent's committed ledger and the
/// session ends.
pub async fn commit_session<S: Store>(
    State(state): State<SharedState<S>>,
    Path(session_id): Path<Id>,
    actor: Actor,
) -> ApiResult<FundingLedger> {
    let (patent_id, steps) = in_session(&*state, &session_id, |editor| {
        let steps = editor.done(&actor)?;
        Ok((editor.patent_id().clone(), steps))
    })
    .await?;

    state.sessions.remove(&session_id).await;

    let replaced = state
        .store
        .replace_funding(&patent_id, steps.clone())
        .await
        .map_err(CatalogError::from)?;
    if !replaced {
        return Err(CatalogError::not_found("Patent", &patent_id).into());
    }

    info!(
        "{} committed funding session {} for patent {}",
        actor.name, session_id, patent_id
    );
    Ok(Json(ledger(&patent_id, steps)))
}

/// Close without saving. The committed ledger is left as it was.
pub async fn discard_session<S: Store>(
    State(state): State<SharedState<S>>,
    Path(session_id): Path<Id>,
    actor: Actor,
) -> ApiResult<SessionView> {
    let view = in_session(&*state, &session_id, |editor| {
        editor.discard(&actor)?;
        Ok(SessionView::new(&session_id, editor))
    })
    .await?;
    state.sessions.remove(&session_id).await;

    info!("{} discarded funding session {}", actor.name, session_id);
    Ok(Json(view))
}
