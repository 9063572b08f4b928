use crate::model::{ExtendedDetail, FundingStep, Grant, Id, Patent, PatentUpdate};
use anyhow::Result;
use chrono::{DateTime, Utc};

#[async_trait::async_trait]
pub trait PatentStore: Send + Sync {
    /// All patents in catalog order.
    async fn list_patents(&self) -> Result<Vec<Patent>>;
    async fn get_patent(&self, id: &Id) -> Result<Option<Patent>>;
    /// Insert or replace, keeping the position of an existing record.
    async fn upsert_patent(&self, patent: Patent) -> Result<()>;
    /// Register the extended detail to attach on first detailed view.
    async fn stage_extended_detail(&self, id: &Id, detail: ExtendedDetail) -> Result<()>;
    /// Get a patent with its extended detail attached. Attaching happens at
    /// most once per record.
    async fn get_patent_detail(&self, id: &Id, now: DateTime<Utc>) -> Result<Option<Patent>>;
    /// Apply a partial update, attaching extended detail first if the update
    /// touches it.
    async fn update_patent(
        &self,
        id: &Id,
        update: &PatentUpdate,
        now: DateTime<Utc>,
    ) -> Result<Option<Patent>>;
}

#[async_trait::async_trait]
pub trait FundingStore: Send + Sync {
    /// Ledger for a patent; `None` when the patent does not exist.
    async fn get_funding(&self, patent_id: &Id) -> Result<Option<Vec<FundingStep>>>;
    /// Swap the whole ledger in one step. Returns `false` for an unknown patent.
    async fn replace_funding(&self, patent_id: &Id, steps: Vec<FundingStep>) -> Result<bool>;
}

#[async_trait::async_trait]
pub trait GrantStore: Send + Sync {
    async fn list_grants(&self) -> Result<Vec<Grant>>;
    async fn upsert_grant(&self, grant: Grant) -> Result<()>;
}

pub trait Store: PatentStore + FundingStore + GrantStore + Send + Sync {}
impl<T: PatentStore + FundingStore + GrantStore + Send + Sync> Store for T {}
