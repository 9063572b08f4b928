use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use log::info;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::CatalogError;
use crate::logic::{
    authorize, compute_aggregate, filter_grants, filter_patents, grant_stats, patent_stats,
    validate_steps, GrantStats, PatentStats, ValidationError,
};
use crate::model::{
    Actor, ErrorResponse, FundingLedger, FundingStep, Grant, GrantFilter, Id, ListResponse,
    NewFundingStep, Patent, PatentFilter, PatentUpdate, StatusFilter,
};
use crate::store::{EditSessionCache, Store};

pub struct AppState<S> {
    pub store: Arc<S>,
    pub sessions: Arc<EditSessionCache>,
    pub reporting_year: i32,
}

impl<S> AppState<S> {
    pub fn new(store: Arc<S>, sessions: EditSessionCache, reporting_year: i32) -> Self {
        Self {
            store,
            sessions: Arc::new(sessions),
            reporting_year,
        }
    }
}

pub type SharedState<S> = Arc<AppState<S>>;

pub type ApiError = (StatusCode, Json<ErrorResponse>);
pub type ApiResult<T> = Result<Json<T>, ApiError>;

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct PatentQuery {
    pub q: Option<String>,
    pub status: Option<String>,
}

impl PatentQuery {
    pub fn into_filter(self) -> Result<PatentFilter, CatalogError> {
        let status = StatusFilter::parse(self.status.as_deref())
            .map_err(|message| ValidationError::new("status", message))?;
        Ok(PatentFilter::new(self.q.as_deref().unwrap_or(""), status))
    }
}

#[derive(Debug, Deserialize)]
pub struct ReplaceFundingRequest {
    pub steps: Vec<NewFundingStep>,
}

pub(crate) fn ledger(patent_id: &Id, steps: Vec<FundingStep>) -> FundingLedger {
    FundingLedger {
        patent_id: patent_id.clone(),
        aggregate: compute_aggregate(&steps),
        steps,
    }
}

pub async fn list_patents<S: Store>(
    State(state): State<SharedState<S>>,
    Query(query): Query<PatentQuery>,
) -> ApiResult<ListResponse<Patent>> {
    let filter = query.into_filter()?;
    let patents = state
        .store
        .list_patents()
        .await
        .map_err(CatalogError::from)?;

    Ok(Json(ListResponse::new(filter_patents(&patents, &filter))))
}

pub async fn get_patent_stats<S: Store>(
    State(state): State<SharedState<S>>,
) -> ApiResult<PatentStats> {
    let patents = state
        .store
        .list_patents()
        .await
        .map_err(CatalogError::from)?;

    Ok(Json(patent_stats(&patents, state.reporting_year)))
}

pub async fn get_patent<S: Store>(
    State(state): State<SharedState<S>>,
    Path(patent_id): Path<Id>,
) -> ApiResult<Patent> {
    match state.store.get_patent_detail(&patent_id, Utc::now()).await {
        Ok(Some(patent)) => Ok(Json(patent)),
        Ok(None) => Err(CatalogError::not_found("Patent", &patent_id).into()),
        Err(e) => Err(CatalogError::from(e).into()),
    }
}

pub async fn update_patent<S: Store>(
    State(state): State<SharedState<S>>,
    Path(patent_id): Path<Id>,
    actor: Actor,
    Json(update): Json<PatentUpdate>,
) -> ApiResult<Patent> {
    authorize(&actor, "update patents")?;

    if update.is_empty() {
        return Err(CatalogError::from(ValidationError::new(
            "update",
            "no fields to update",
        ))
        .into());
    }

    match state
        .store
        .update_patent(&patent_id, &update, Utc::now())
        .await
    {
        Ok(Some(patent)) => {
            info!("{} updated patent {}", actor.name, patent_id);
            Ok(Json(patent))
        }
        Ok(None) => Err(CatalogError::not_found("Patent", &patent_id).into()),
        Err(e) => Err(CatalogError::from(e).into()),
    }
}

pub async fn get_funding<S: Store>(
    State(state): State<SharedState<S>>,
    Path(patent_id): Path<Id>,
) -> ApiResult<FundingLedger> {
    match state.store.get_funding(&patent_id).await {
        Ok(Some(steps)) => Ok(Json(ledger(&patent_id, steps))),
        Ok(None) => Err(CatalogError::not_found("Patent", &patent_id).into()),
        Err(e) => Err(CatalogError::from(e).into()),
    }
}

/// Replace a patent's whole ledger in one step and return the recomputed
/// aggregate with it.
pub async fn replace_funding<S: Store>(
    State(state): State<SharedState<S>>,
    Path(patent_id): Path<Id>,
    actor: Actor,
    Json(request): Json<ReplaceFundingRequest>,
) -> ApiResult<FundingLedger> {
    authorize(&actor, "replace funding steps")?;
    let steps = validate_steps(request.steps).map_err(CatalogError::from)?;

    match state
        .store
        .replace_funding(&patent_id, steps.clone())
        .await
    {
        Ok(true) => {
            info!(
                "{} replaced funding for patent {} ({} steps)",
                actor.name,
                patent_id,
                steps.len()
            );
            Ok(Json(ledger(&patent_id, steps)))
        }
        Ok(false) => Err(CatalogError::not_found("Patent", &patent_id).into()),
        Err(e) => Err(CatalogError::from(e).into()),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct GrantQuery {
    pub q: Option<String>,
}

pub async fn list_grants<S: Store>(
    State(state): State<SharedState<S>>,
    Query(query): Query<GrantQuery>,
) -> ApiResult<ListResponse<Grant>> {
    let filter = GrantFilter {
        q: query.q.unwrap_or_default(),
    };
    let grants = state
        .store
        .list_grants()
        .await
        .map_err(CatalogError::from)?;

    Ok(Json(ListResponse::new(filter_grants(&grants, &filter))))
}

pub async fn get_grant_stats<S: Store>(
    State(state): State<SharedState<S>>,
) -> ApiResult<GrantStats> {
    let grants = state
        .store
        .list_grants()
        .await
        .map_err(CatalogError::from)?;

    Ok(Json(grant_stats(&grants)))
}
