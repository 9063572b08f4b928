use crate::error::CatalogError;
use crate::logic::LedgerEditor;
use crate::model::{generate_id, Actor, Id};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Cache entry for an open ledger editor
#[derive(Debug)]
struct SessionEntry {
    editor: LedgerEditor,
    last_accessed: Instant,
}

/// Result of `open_or_resume`: the session's ID and a snapshot of its editor.
#[derive(Debug, Clone)]
pub struct OpenedSession {
    pub session_id: Id,
    pub editor: LedgerEditor,
    /// `false` when an existing session was resumed
    pub created: bool,
}

/// Open funding edit sessions, one per patent, evicted after a period of
/// inactivity. An evicted session is a discard: the committed ledger is
/// never touched by the cache.
#[derive(Debug)]
pub struct EditSessionCache {
    /// Sessions keyed by session ID
    entries: Arc<RwLock<HashMap<Id, SessionEntry>>>,
    /// Session ID currently editing each patent
    active_by_patent: Arc<RwLock<HashMap<Id, Id>>>,
    ttl: Duration,
}

impl EditSessionCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            active_by_patent: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Register `editor` as the patent's session unless one is live already.
    ///
    /// A live session held by `actor` is resumed as is. One held by anyone
    /// else is `SessionLocked`. Lookup and insert happen under one write lock
    /// and a live session is never evicted.
    pub async fn open_or_resume(
        &self,
        actor: &Actor,
        editor: LedgerEditor,
    ) -> Result<OpenedSession, CatalogError> {
        let patent_id = editor.patent_id().clone();

        let mut entries = self.entries.write().await;
        let mut active_by_patent = self.active_by_patent.write().await;

        if let Some(session_id) = active_by_patent.get(&patent_id).cloned() {
            match entries.get_mut(&session_id) {
                Some(entry) if entry.last_accessed.elapsed() <= self.ttl => {
                    return match entry.editor.editor() {
                        Some(holder) if holder.name != actor.name => {
                            Err(CatalogError::SessionLocked {
                                patent_id,
                                holder: holder.name.clone(),
                            })
                        }
                        _ => {
                            entry.last_accessed = Instant::now();
                            Ok(OpenedSession {
                                session_id,
                                editor: entry.editor.clone(),
                                created: false,
                            })
                        }
                    };
                }
                // Expired: the idle session counts as discarded.
                _ => {
                    entries.remove(&session_id);
                    active_by_patent.remove(&patent_id);
                }
            }
        }

        let session_id = generate_id();
        active_by_patent.insert(patent_id, session_id.clone());
        entries.insert(
            session_id.clone(),
            SessionEntry {
                editor: editor.clone(),
                last_accessed: Instant::now(),
            },
        );
        Ok(OpenedSession {
            session_id,
            editor,
            created: true,
        })
    }

    /// The live session for a patent, if any.
    pub async fn active_for_patent(&self, patent_id: &Id) -> Option<Id> {
        let session_id = self.active_by_patent.read().await.get(patent_id).cloned()?;
        let entries = self.entries.read().await;
        match entries.get(&session_id) {
            Some(entry) if entry.last_accessed.elapsed() <= self.ttl => Some(session_id),
            _ => None,
        }
    }

    /// Run `f` against a session's editor, refreshing its access time.
    /// Returns `None` for unknown or expired sessions.
    pub async fn with_session<F, R>(&self, session_id: &Id, f: F) -> Option<R>
    where
        F: FnOnce(&mut LedgerEditor) -> R,
    {
        let mut entries = self.entries.write().await;

        let expired = match entries.get(session_id) {
            Some(entry) => entry.last_accessed.elapsed() > self.ttl,
            None => return None,
        };
        if expired {
            drop(entries);
            self.remove(session_id).await;
            return None;
        }

        let entry = entries.get_mut(session_id)?;
        entry.last_accessed = Instant::now();
        Some(f(&mut entry.editor))
    }

    /// Drop a session and return its editor.
    pub async fn remove(&self, session_id: &Id) -> Option<LedgerEditor> {
        let mut entries = self.entries.write().await;
        let entry = entries.remove(session_id)?;

        let mut active_by_patent = self.active_by_patent.write().await;
        let patent_id = entry.editor.patent_id();
        // Only unlink if this is still the patent's active session
        if active_by_patent.get(patent_id) == Some(session_id) {
            active_by_patent.remove(patent_id);
        }
        Some(entry.editor)
    }

    /// Evict expired sessions, returning how many were dropped.
    pub async fn clear_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let mut active_by_patent = self.active_by_patent.write().await;

        let now = Instant::now();
        let ttl = self.ttl;

        let expired_ids: Vec<Id> = entries
            .iter()
            .filter(|(_, entry)| now.duration_since(entry.last_accessed) > ttl)
            .map(|(id, _)| id.clone())
            .collect();

        for id in &expired_ids {
            if let Some(entry) = entries.remove(id) {
                let patent_id = entry.editor.patent_id();
                if active_by_patent.get(patent_id) == Some(id) {
                    active_by_patent.remove(patent_id);
                }
            }
        }
        expired_ids.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

impl Default for EditSessionCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(1800))
    }
}
