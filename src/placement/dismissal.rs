// src/placement/dismissal.rs

use std::collections::HashSet;
use std::fs;
use std::io;
use std::sync::{Arc, Mutex};

use tracing::warn;

use crate::error::EngineError;
use crate::model::ads::AdRecord;

/// Durable storage for the permanently-dismissed id set. The session
/// set never goes through here; it dies with the store instance.
pub trait DismissalRepository: Send + Sync {
    /// Missing or corrupt storage degrades to an empty set.
    fn load(&self) -> HashSet<String>;
    fn save(&self, ids: &HashSet<String>) -> io::Result<()>;
}

/// JSON-file-backed repository, one file per logical user.
pub struct FileDismissalRepository {
    pub path: String,
}

impl FileDismissalRepository {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
        }
    }
}

impl DismissalRepository for FileDismissalRepository {
    fn load(&self) -> HashSet<String> {
        let content = fs::read_to_string(&self.path).unwrap_or_else(|_| "[]".to_string());
        serde_json::from_str(&content).unwrap_or_default()
    }

    fn save(&self, ids: &HashSet<String>) -> io::Result<()> {
        let payload = serde_json::to_string_pretty(ids)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        fs::write(&self.path, payload)
    }
}

/// In-memory repository for demo runs and tests. Sharing the same
/// instance across stores models a user returning in a new session.
#[derive(Default)]
pub struct MemoryDismissalRepository {
    ids: Mutex<HashSet<String>>,
}

impl DismissalRepository for MemoryDismissalRepository {
    fn load(&self) -> HashSet<String> {
        self.ids.lock().unwrap().clone()
    }

    fn save(&self, ids: &HashSet<String>) -> io::Result<()> {
        *self.ids.lock().unwrap() = ids.clone();
        Ok(())
    }
}

/// Per-user dismissal state: a durable permanent set plus a session
/// set that lives only as long as this store instance.
pub struct DismissalStore {
    permanent: HashSet<String>,
    session: HashSet<String>,
    repository: Arc<dyn DismissalRepository>,
}

impl DismissalStore {
    pub fn new(repository: Arc<dyn DismissalRepository>) -> Self {
        let permanent = repository.load();
        Self {
            permanent,
            session: HashSet::new(),
            repository,
        }
    }

    /// Records a dismissal. Dismissing twice is idempotent; dismissing
    /// a non-dismissible ad is an error.
    pub fn dismiss(&mut self, ad: &AdRecord, permanent: bool) -> Result<(), EngineError> {
        if !ad.dismissible {
            return Err(EngineError::NotDismissible(ad.id.clone()));
        }
        if permanent {
            if self.permanent.insert(ad.id.clone()) {
                self.persist();
            }
        } else {
            self.session.insert(ad.id.clone());
        }
        Ok(())
    }

    pub fn is_dismissed(&self, id: &str) -> bool {
        self.permanent.contains(id) || self.session.contains(id)
    }

    /// Administrative reset: empties both sets, including the durable one.
    pub fn clear_all(&mut self) {
        self.permanent.clear();
        self.session.clear();
        self.persist();
    }

    pub fn dismissed_count(&self) -> usize {
        self.permanent.union(&self.session).count()
    }

    fn persist(&self) {
        if let Err(e) = self.repository.save(&self.permanent) {
            warn!("failed to persist dismissal state: {}", e);
        }
    }
}
