#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use calmdown::application::{AppError, AppResult, Cooldown, CooldownStrategy, Notifier};
use calmdown::domain::{Notice, SubjectKey};

/// Records every subject it is invoked for.
#[derive(Clone, Default)]
pub struct RecordingStrategy {
    seen: Arc<Mutex<Vec<SubjectKey>>>,
}

impl RecordingStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seen(&self) -> Vec<SubjectKey> {
        self.seen.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn count_for(&self, subject: &SubjectKey) -> usize {
        self.seen.lock().unwrap().iter().filter(|s| *s == subject).count()
    }

    pub fn reset(&self) {
        self.seen.lock().unwrap().clear();
    }
}

#[async_trait]
impl CooldownStrategy for RecordingStrategy {
    async fn accept(&self, subject: SubjectKey, _cooldown: &Cooldown) -> AppResult<()> {
        self.seen.lock().unwrap().push(subject);
        Ok(())
    }
}

/// Fails for one subject, records the rest.
#[derive(Clone)]
pub struct FailingFor {
    pub subject: SubjectKey,
    pub inner: RecordingStrategy,
}

#[async_trait]
impl CooldownStrategy for FailingFor {
    async fn accept(&self, subject: SubjectKey, cooldown: &Cooldown) -> AppResult<()> {
        if subject == self.subject {
            return Err(AppError::Strategy(format!("refusing {subject}")));
        }
        self.inner.accept(subject, cooldown).await
    }
}

/// Panics for one subject, records the rest.
#[derive(Clone)]
pub struct PanickingFor {
    pub subject: SubjectKey,
    pub inner: RecordingStrategy,
}

#[async_trait]
impl CooldownStrategy for PanickingFor {
    async fn accept(&self, subject: SubjectKey, cooldown: &Cooldown) -> AppResult<()> {
        if subject == self.subject {
            panic!("strategy blew up for {subject}");
        }
        self.inner.accept(subject, cooldown).await
    }
}

#[derive(Clone, Default)]
pub struct RecordingNotifier {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texts(&self) -> Vec<String> {
        self.notices
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.text.clone())
            .collect()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notice: &Notice) -> AppResult<()> {
        self.notices.lock().unwrap().push(notice.clone());
        Ok(())
    }
}
