//! In-memory result store keyed by session id

use crate::AnalysisReport;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct Inner {
    runs: HashMap<String, Vec<Arc<AnalysisReport>>>,
    /// Session ids in first-insert order
    order: Vec<String>,
}

/// Thread-safe holder of analysis results.
///
/// Each session keeps every run inserted under it; `latest` returns the most
/// recent one. Reports are shared as `Arc` handles so readers never copy.
#[derive(Default)]
pub struct ResultStore {
    inner: Mutex<Inner>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panic while holding the lock cannot leave Inner half-updated
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a run under `session` and return the shared handle
    pub fn insert(&self, session: &str, report: AnalysisReport) -> Arc<AnalysisReport> {
        let report = Arc::new(report);
        let mut inner = self.lock();
        if !inner.runs.contains_key(session) {
            inner.order.push(session.to_string());
        }
        inner
            .runs
            .entry(session.to_string())
            .or_default()
            .push(Arc::clone(&report));
        report
    }

    /// Most recent run for the session
    pub fn latest(&self, session: &str) -> Option<Arc<AnalysisReport>> {
        self.lock()
            .runs
            .get(session)
            .and_then(|runs| runs.last().cloned())
    }

    /// Every run for the session, oldest first
    pub fn runs(&self, session: &str) -> Vec<Arc<AnalysisReport>> {
        self.lock().runs.get(session).cloned().unwrap_or_default()
    }

    /// Session ids in the order they were first used
    pub fn sessions(&self) -> Vec<String> {
        self.lock().order.clone()
    }

    /// Latest run of every session, in session order
    pub fn latest_all(&self) -> Vec<Arc<AnalysisReport>> {
        let inner = self.lock();
        inner
            .order
            .iter()
            .filter_map(|s| inner.runs.get(s).and_then(|runs| runs.last().cloned()))
            .collect()
    }

    /// Drop a session; returns its runs
    pub fn remove(&self, session: &str) -> Vec<Arc<AnalysisReport>> {
        let mut inner = self.lock();
        inner.order.retain(|s| s != session);
        inner.runs.remove(session).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.lock().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
