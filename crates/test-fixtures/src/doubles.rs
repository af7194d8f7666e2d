use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use switchyard_core::errors::{CompletionError, EmbeddingError, SwitchyardResult};
use switchyard_core::models::VectorHit;
use switchyard_core::traits::{CompletionRequest, ICompletionService, IEmbeddingProvider, IVectorStore};

/// One scripted completion outcome.
#[derive(Debug, Clone)]
pub enum Scripted {
    Reply(String),
    Fail(String),
    /// Sleep for the given duration, then reply.
    Delayed(Duration, String),
}

/// Completion service replaying a queue of outcomes. An exhausted queue
/// fails like a transport error.
#[derive(Debug)]
pub struct ScriptedCompletion {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<CompletionRequest>>,
    calls: AtomicUsize,
    available: bool,
}

impl ScriptedCompletion {
    pub fn new(script: Vec<Scripted>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            available: true,
        }
    }

    pub fn replying(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|r| Scripted::Reply(r.to_string())).collect())
    }

    /// A service that reports itself unconfigured.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new(Vec::new())
        }
    }

    /// Number of `complete` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ICompletionService for ScriptedCompletion {
    async fn complete(&self, request: &CompletionRequest) -> SwitchyardResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut log) = self.requests.lock() {
            log.push(request.clone());
        }
        if !self.available {
            return Err(CompletionError::Disabled {
                reason: "scripted service unavailable".into(),
            }
            .into());
        }
        let next = self.script.lock().ok().and_then(|mut q| q.pop_front());
        match next {
            Some(Scripted::Reply(text)) => Ok(text),
            Some(Scripted::Fail(reason)) => Err(CompletionError::Transport { reason }.into()),
            Some(Scripted::Delayed(delay, text)) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
            None => Err(CompletionError::Transport {
                reason: "script exhausted".into(),
            }
            .into()),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn is_available(&self) -> bool {
        self.available
    }
}

/// Embedding provider whose every call fails.
#[derive(Debug, Default)]
pub struct FailingEmbedder;

#[async_trait]
impl IEmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _text: &str) -> SwitchyardResult<Vec<f32>> {
        Err(EmbeddingError::Transport {
            reason: "connection refused".into(),
        }
        .into())
    }

    fn dimensions(&self) -> usize {
        0
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Vector store returning the same ids for every query, truncated to the
/// requested limit.
#[derive(Debug, Clone)]
pub struct FixedVectorStore {
    ids: Vec<i64>,
}

impl FixedVectorStore {
    pub fn new(ids: &[i64]) -> Self {
        Self { ids: ids.to_vec() }
    }
}

#[async_trait]
impl IVectorStore for FixedVectorStore {
    async fn nearest(
        &self,
        _collection: &str,
        _query: &[f32],
        limit: usize,
    ) -> SwitchyardResult<Vec<VectorHit>> {
        Ok(self
            .ids
            .iter()
            .take(limit)
            .enumerate()
            .map(|(rank, id)| VectorHit {
                id: *id,
                distance: rank as f64,
            })
            .collect())
    }
}
