use crate::model::{Audit, ExtendedDetail, FundingStep, Grant, Id, Patent, PatentUpdate};
use crate::store::traits::{FundingStore, GrantStore, PatentStore};
use anyhow::Result;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Debug, Default)]
struct Catalog {
    /// Master list in insertion order.
    patents: Vec<Patent>,
    staged_details: HashMap<Id, ExtendedDetail>,
    funding: HashMap<Id, Vec<FundingStep>>,
    grants: Vec<Grant>,
}

impl Catalog {
    fn patent_mut(&mut self, id: &Id) -> Option<&mut Patent> {
        self.patents.iter_mut().find(|p| &p.id == id)
    }

    /// Attach the staged detail, or an empty one stamped `now`, if the
    /// patent is not extended yet.
    fn ensure_extended(&mut self, id: &Id, now: DateTime<Utc>) -> Option<&mut Patent> {
        let staged = self.staged_details.remove(id);
        let patent = self.patents.iter_mut().find(|p| &p.id == id)?;
        if !patent.is_extended() {
            let detail = staged.unwrap_or_else(|| ExtendedDetail {
                problem_statement: String::new(),
                novelty: String::new(),
                audit: Audit {
                    created_by: "system".to_string(),
                    created_at: now,
                    updated_at: now,
                },
            });
            patent.attach_extended_detail(detail);
        }
        Some(patent)
    }
}

/// Process-local store. Locks are never held across an await point.
#[derive(Debug, Default)]
pub struct MemoryStore {
    catalog: RwLock<Catalog>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl PatentStore for MemoryStore {
    async fn list_patents(&self) -> Result<Vec<Patent>> {
        Ok(self.catalog.read().patents.clone())
    }

    async fn get_patent(&self, id: &Id) -> Result<Option<Patent>> {
        Ok(self
            .catalog
            .read()
            .patents
            .iter()
            .find(|p| &p.id == id)
            .cloned())
    }

    async fn upsert_patent(&self, patent: Patent) -> Result<()> {
        let mut catalog = self.catalog.write();
        catalog.funding.entry(patent.id.clone()).or_default();
        match catalog.patent_mut(&patent.id) {
            Some(existing) => *existing = patent,
            None => catalog.patents.push(patent),
        }
        Ok(())
    }

    async fn stage_extended_detail(&self, id: &Id, detail: ExtendedDetail) -> Result<()> {
        self.catalog.write().staged_details.insert(id.clone(), detail);
        Ok(())
    }

    async fn get_patent_detail(&self, id: &Id, now: DateTime<Utc>) -> Result<Option<Patent>> {
        let mut catalog = self.catalog.write();
        Ok(catalog.ensure_extended(id, now).cloned())
    }

    async fn update_patent(
        &self,
        id: &Id,
        update: &PatentUpdate,
        now: DateTime<Utc>,
    ) -> Result<Option<Patent>> {
        let mut catalog = self.catalog.write();
        let patent = if update.touches_extended() {
            catalog.ensure_extended(id, now)
        } else {
            catalog.patent_mut(id)
        };

        Ok(patent.map(|p| {
            p.apply_update(update);
            p.clone()
        }))
    }
}

#[async_trait::async_trait]
impl FundingStore for MemoryStore {
    async fn get_funding(&self, patent_id: &Id) -> Result<Option<Vec<FundingStep>>> {
        Ok(self.catalog.read().funding.get(patent_id).cloned())
    }

    async fn replace_funding(&self, patent_id: &Id, steps: Vec<FundingStep>) -> Result<bool> {
        let mut catalog = self.catalog.write();
        match catalog.funding.get_mut(patent_id) {
            Some(ledger) => {
                *ledger = steps;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait::async_trait]
impl GrantStore for MemoryStore {
    async fn list_grants(&self) -> Result<Vec<Grant>> {
        Ok(self.catalog.read().grants.clone())
    }

    async fn upsert_grant(&self, grant: Grant) -> Result<()> {
        let mut catalog = self.catalog.write();
        match catalog.grants.iter_mut().find(|g| g.id == grant.id) {
            Some(existing) => *existing = grant,
            None => catalog.grants.push(grant),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{detail, patent};
    use crate::model::{PatentStatus, StepStatus};

    #[tokio::test]
    async fn test_upsert_preserves_catalog_order() {
        let store = MemoryStore::new();
        store.upsert_patent(patent("p1", "A", PatentStatus::Filed)).await.unwrap();
        store.upsert_patent(patent("p2", "B", PatentStatus::Filed)).await.unwrap();
        store.upsert_patent(patent("p1", "A2", PatentStatus::Granted)).await.unwrap();

        let patents = store.list_patents().await.unwrap();
        assert_eq!(patents.len(), 2);
        assert_eq!(patents[0].title, "A2");
        assert_eq!(patents[1].id, "p2");
    }

    #[tokio::test]
    async fn test_detail_attaches_once() {
        let store = MemoryStore::new();
        let id = "p1".to_string();
        store.upsert_patent(patent("p1", "A", PatentStatus::Filed)).await.unwrap();
        store.stage_extended_detail(&id, detail("staged")).await.unwrap();

        let first = store.get_patent_detail(&id, Utc::now()).await.unwrap().unwrap();
        assert_eq!(first.extended.as_ref().unwrap().problem_statement, "staged");

        let update = PatentUpdate {
            problem_statement: Some("edited".to_string()),
            ..Default::default()
        };
        store.update_patent(&id, &update, Utc::now()).await.unwrap();

        // Re-staging must not clobber the edit.
        store.stage_extended_detail(&id, detail("staged")).await.unwrap();
        let second = store.get_patent_detail(&id, Utc::now()).await.unwrap().unwrap();
        assert_eq!(second.extended.unwrap().problem_statement, "edited");
    }

    #[tokio::test]
    async fn test_unknown_patent_detail_is_none() {
        let store = MemoryStore::new();
        let missing = "nope".to_string();
        assert!(store.get_patent_detail(&missing, Utc::now()).await.unwrap().is_none());
        assert!(store
            .update_patent(&missing, &PatentUpdate::default(), Utc::now())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_replace_funding_swaps_whole_ledger() {
        let store = MemoryStore::new();
        let id = "p1".to_string();
        store.upsert_patent(patent("p1", "A", PatentStatus::Filed)).await.unwrap();
        assert_eq!(store.get_funding(&id).await.unwrap(), Some(vec![]));

        let steps = vec![FundingStep::new("Filing", StepStatus::Pending, 10.0, 0.0, "")];
        assert!(store.replace_funding(&id, steps.clone()).await.unwrap());
        assert_eq!(store.get_funding(&id).await.unwrap(), Some(steps));

        assert!(!store.replace_funding(&"p9".to_string(), vec![]).await.unwrap());
    }
}
