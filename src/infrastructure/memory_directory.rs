use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::application::SubjectDirectory;
use crate::domain::{Subject, SubjectKey};

/// Subjects currently online, held in memory.
#[derive(Clone, Default)]
pub struct InMemoryDirectory {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    online: HashMap<SubjectKey, Subject>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the subject was already online.
    pub fn join(&self, subject: Subject) -> bool {
        self.lock().online.insert(subject.key, subject).is_none()
    }

    pub fn leave(&self, key: &SubjectKey) -> Option<Subject> {
        self.lock().online.remove(key)
    }

    /// Online subjects sorted by name.
    pub fn list(&self) -> Vec<Subject> {
        let mut out: Vec<Subject> = self.lock().online.values().cloned().collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SubjectDirectory for InMemoryDirectory {
    fn find(&self, key: &SubjectKey) -> Option<Subject> {
        self.lock().online.get(key).cloned()
    }
}
