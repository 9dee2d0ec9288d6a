//! Update sinks receiving run snapshots.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::Result;
use crate::types::RunResult;

/// Receives a full snapshot after every committed change and once at run end.
///
/// `notify` is awaited inside the event loop before the next stream event is
/// read, so a slow sink slows the run. Snapshots are whole-state replacements:
/// consumers must not treat them as deltas.
#[async_trait]
pub trait UpdateSink: Send + Sync {
    async fn notify(&self, snapshot: &RunResult) -> Result<()>;
}

#[async_trait]
impl<T: UpdateSink + ?Sized> UpdateSink for Arc<T> {
    async fn notify(&self, snapshot: &RunResult) -> Result<()> {
        (**self).notify(snapshot).await
    }
}

type SnapshotHandler =
    dyn Fn(RunResult) -> Pin<Box<dyn Future<Output = Result<()>> + Send>> + Send + Sync;

/// Sink backed by an async closure.
pub struct FnUpdateSink {
    handler: Box<SnapshotHandler>,
}

impl FnUpdateSink {
    pub fn new<F, Fut>(handler: F) -> Self
    where
        F: Fn(RunResult) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        Self {
            handler: Box::new(move |snapshot| Box::pin(handler(snapshot))),
        }
    }
}

#[async_trait]
impl UpdateSink for FnUpdateSink {
    async fn notify(&self, snapshot: &RunResult) -> Result<()> {
        (self.handler)(snapshot.clone()).await
    }
}

/// Sink that keeps every snapshot it receives.
#[derive(Debug, Default)]
pub struct RecordingSink {
    snapshots: Mutex<Vec<RunResult>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshots(&self) -> Vec<RunResult> {
        self.snapshots
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.snapshots.lock().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn last(&self) -> Option<RunResult> {
        self.snapshots
            .lock()
            .ok()
            .and_then(|guard| guard.last().cloned())
    }
}

#[async_trait]
impl UpdateSink for RecordingSink {
    async fn notify(&self, snapshot: &RunResult) -> Result<()> {
        if let Ok(mut guard) = self.snapshots.lock() {
            guard.push(snapshot.clone());
        }
        Ok(())
    }
}
