//! Test doubles for the sync machinery

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use tokio::sync::Semaphore;

use crate::error::{Error, Result};
use crate::models::Quote;
use crate::notify::{NotificationSink, Severity};
use crate::remote::RemoteSource;

/// Scripted remote that records every call
#[derive(Debug, Default)]
pub struct MockRemote {
    batch: Vec<Quote>,
    fail_fetch: AtomicBool,
    fail_push: AtomicBool,
    fetch_calls: AtomicUsize,
    gate: Option<Semaphore>,
    since_seen: Mutex<Vec<i64>>,
    pushed: Mutex<Vec<Vec<Quote>>>,
}

impl MockRemote {
    pub fn returning(batch: Vec<Quote>) -> Self {
        Self {
            batch,
            ..Self::default()
        }
    }

    /// Fetches wait for a [`MockRemote::release`] permit each
    pub fn gated(batch: Vec<Quote>) -> Self {
        Self {
            batch,
            gate: Some(Semaphore::new(0)),
            ..Self::default()
        }
    }

    pub fn release(&self, fetches: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(fetches);
        }
    }

    pub fn failing_fetch() -> Self {
        let remote = Self::default();
        remote.set_fetch_failure(true);
        remote
    }

    pub fn failing_push(batch: Vec<Quote>) -> Self {
        let remote = Self::returning(batch);
        remote.fail_push.store(true, Ordering::SeqCst);
        remote
    }

    pub fn set_fetch_failure(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn since_seen(&self) -> Vec<i64> {
        self.since_seen.lock().unwrap().clone()
    }

    pub fn pushed(&self) -> Vec<Vec<Quote>> {
        self.pushed.lock().unwrap().clone()
    }
}

impl RemoteSource for MockRemote {
    async fn fetch_since(&self, since: i64) -> Result<Vec<Quote>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.since_seen.lock().unwrap().push(since);
        match &self.gate {
            Some(gate) => gate.acquire().await.unwrap().forget(),
            None => tokio::task::yield_now().await,
        }
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(Error::Network("fetch failed: HTTP 503".to_string()));
        }
        Ok(self.batch.clone())
    }

    async fn push(&self, quotes: &[Quote]) -> Result<()> {
        if self.fail_push.load(Ordering::SeqCst) {
            return Err(Error::Network("push failed: HTTP 500".to_string()));
        }
        self.pushed.lock().unwrap().push(quotes.to_vec());
        Ok(())
    }
}

/// Notification sink that keeps every message
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(String, Severity)>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<(String, Severity)> {
        self.messages.lock().unwrap().clone()
    }
}

impl NotificationSink for RecordingNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        self.messages
            .lock()
            .unwrap()
            .push((message.to_string(), severity));
    }
}
