//! Shared test helpers for orchestrator and component tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use voyager_core::error::ProviderError;
use voyager_core::provider::{
    ChunkReceiver, Provider, ProviderRequest, ProviderResponse, StreamChunk, Usage,
};

/// One scripted backend reaction.
#[derive(Debug, Clone)]
enum Step {
    Reply(String),
    Fail(String),
    Stream(Vec<String>),
    /// Some fragments, then a mid-stream error
    BrokenStream(Vec<String>, String),
    /// Some fragments, then the channel closes with no final chunk
    CutStream(Vec<String>),
}

/// A provider that plays back a fixed script, one step per call.
///
/// `complete` and `stream` share the queue, so a script reads in call
/// order: classify, generate, verify. A `Stream` step consumed by
/// `complete` is joined into one reply. Every request is recorded.
#[derive(Default)]
pub struct ScriptedProvider {
    steps: Mutex<VecDeque<Step>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: &str) -> Self {
        self.push(Step::Reply(text.into()))
    }

    pub fn fail(self, message: &str) -> Self {
        self.push(Step::Fail(message.into()))
    }

    pub fn stream(self, fragments: &[&str]) -> Self {
        self.push(Step::Stream(fragments.iter().map(|s| s.to_string()).collect()))
    }

    pub fn broken_stream(self, fragments: &[&str], error: &str) -> Self {
        self.push(Step::BrokenStream(
            fragments.iter().map(|s| s.to_string()).collect(),
            error.into(),
        ))
    }

    pub fn cut_stream(self, fragments: &[&str]) -> Self {
        self.push(Step::CutStream(
            fragments.iter().map(|s| s.to_string()).collect(),
        ))
    }

    fn push(self, step: Step) -> Self {
        self.steps.lock().unwrap().push_back(step);
        self
    }

    fn next(&self, request: ProviderRequest) -> Result<Step, ProviderError> {
        self.requests.lock().unwrap().push(request);
        self.steps
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ProviderError::NotConfigured("script exhausted".into()))
    }

    /// Requests seen so far, in call order.
    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

fn response(text: String) -> ProviderResponse {
    ProviderResponse {
        content: text,
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
        model: "mock-model".into(),
    }
}

/// How a scripted stream ends.
enum Ending {
    Done,
    Error(String),
    Close,
}

fn content(text: String) -> Result<StreamChunk, ProviderError> {
    Ok(StreamChunk {
        content: Some(text),
        done: false,
        usage: None,
    })
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        match self.next(request)? {
            Step::Reply(text) => Ok(response(text)),
            Step::Stream(fragments) | Step::CutStream(fragments) => {
                Ok(response(fragments.concat()))
            }
            Step::Fail(message) | Step::BrokenStream(_, message) => {
                Err(ProviderError::Network(message))
            }
        }
    }

    async fn stream(&self, request: ProviderRequest) -> Result<ChunkReceiver, ProviderError> {
        let step = self.next(request)?;
        let (tx, rx) = tokio::sync::mpsc::channel(64);

        let (fragments, ending) = match step {
            Step::Fail(message) => return Err(ProviderError::Network(message)),
            Step::Reply(text) => (vec![text], Ending::Done),
            Step::Stream(fragments) => (fragments, Ending::Done),
            Step::BrokenStream(fragments, message) => (fragments, Ending::Error(message)),
            Step::CutStream(fragments) => (fragments, Ending::Close),
        };

        tokio::spawn(async move {
            for fragment in fragments {
                if tx.send(content(fragment)).await.is_err() {
                    return;
                }
            }
            let last = match ending {
                Ending::Done => Ok(StreamChunk {
                    content: None,
                    done: true,
                    usage: None,
                }),
                Ending::Error(message) => Err(ProviderError::StreamInterrupted(message)),
                Ending::Close => return,
            };
            let _ = tx.send(last).await;
        });

        Ok(rx)
    }
}
