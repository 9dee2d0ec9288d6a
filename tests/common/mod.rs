//! Shared test helpers: scripted model stream, counting tool runtime, fixtures.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use agentrun::error::{AgentRunError, Result};
use agentrun::provider::{EventStream, ModelStream, StreamRequest};
use agentrun::tools::{Tool, ToolRegistry, ToolRegistryEntry, ToolRuntime};
use agentrun::types::StreamEvent;

/// One scripted stream item.
#[derive(Clone, Debug)]
pub enum Scripted {
    Event(StreamEvent),
    /// Transport-level failure surfaced as an `Err` item.
    Transport(String),
    /// Never yields; the stream stays open.
    Hang,
}

/// A model stream that replays a fixed script and records what it was asked.
pub struct ScriptedModel {
    script: Vec<Scripted>,
    open_error: Option<String>,
    delay: Option<Duration>,
    requests: Mutex<Vec<StreamRequest>>,
    /// "yield N" entries as items are handed out.
    pub log: Arc<Mutex<Vec<String>>>,
}

impl ScriptedModel {
    pub fn new(script: Vec<Scripted>) -> Self {
        Self {
            script,
            open_error: None,
            delay: None,
            requests: Mutex::new(Vec::new()),
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn events(events: Vec<StreamEvent>) -> Self {
        Self::new(events.into_iter().map(Scripted::Event).collect())
    }

    /// Fail when the stream is opened.
    pub fn failing_to_open(message: &str) -> Self {
        let mut model = Self::new(Vec::new());
        model.open_error = Some(message.to_string());
        model
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_log(mut self, log: Arc<Mutex<Vec<String>>>) -> Self {
        self.log = log;
        self
    }

    pub fn last_request(&self) -> Option<StreamRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ModelStream for ScriptedModel {
    async fn stream(&self, request: StreamRequest) -> Result<EventStream> {
        self.requests.lock().unwrap().push(request);
        if let Some(message) = &self.open_error {
            return Err(AgentRunError::Stream(message.clone()));
        }

        let script = self.script.clone();
        let delay = self.delay;
        let log = self.log.clone();
        let stream = async_stream::stream! {
            for (index, item) in script.into_iter().enumerate() {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                match item {
                    Scripted::Event(event) => {
                        log.lock().unwrap().push(format!("yield {index}"));
                        yield Ok(event);
                    }
                    Scripted::Transport(message) => {
                        log.lock().unwrap().push(format!("yield {index}"));
                        yield Err(AgentRunError::Stream(message));
                    }
                    Scripted::Hang => {
                        futures::future::pending::<()>().await;
                    }
                }
            }
        };
        Ok(Box::pin(stream))
    }
}

/// Tool runtime that counts opens and closes.
#[derive(Default)]
pub struct CountingRuntime {
    pub tools: Vec<Arc<dyn Tool>>,
    pub opened: AtomicUsize,
    pub closed: AtomicUsize,
}

impl CountingRuntime {
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ToolRuntime for CountingRuntime {
    async fn open(&self) -> Result<Vec<Arc<dyn Tool>>> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(self.tools.clone())
    }

    fn close(&self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn catalog() -> Vec<ToolRegistryEntry> {
    vec![
        ToolRegistryEntry::piece("search", "@pieces/web", "1.2.0", "search_web"),
        ToolRegistryEntry::piece("gmail_send", "@pieces/gmail", "0.3.1", "send_email"),
        ToolRegistryEntry::flow("triage", Some("flow_1".into()), Some("Triage inbox".into())),
    ]
}

/// Registry over [`catalog`] backed by a fresh counting runtime.
pub fn counting_registry() -> (ToolRegistry, Arc<CountingRuntime>) {
    let runtime = Arc::new(CountingRuntime::default());
    (ToolRegistry::new(catalog(), runtime.clone()), runtime)
}
