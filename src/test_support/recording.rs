//! In-process transport that records requests and replays canned responses.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::transport::{RawResponse, Transport, TransportError, TransportRequest};

pub struct RecordingTransport {
    requests: Mutex<Vec<TransportRequest>>,
    scripted: Mutex<VecDeque<Result<RawResponse, TransportError>>>,
    fallback: RawResponse,
    close_calls: AtomicUsize,
}

impl RecordingTransport {
    /// Answers every request with `200 {"status": true}` unless scripted otherwise.
    pub fn new() -> Self {
        Self::answering(RawResponse::new(200, r#"{"status": true}"#))
    }

    pub fn answering(fallback: RawResponse) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            scripted: Mutex::new(VecDeque::new()),
            fallback,
            close_calls: AtomicUsize::new(0),
        }
    }

    /// Queues a one-shot outcome consumed before the fallback.
    pub fn push(&self, outcome: Result<RawResponse, TransportError>) {
        self.scripted.lock().unwrap().push_back(outcome);
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// The most recent request; panics when nothing was sent.
    pub fn last(&self) -> TransportRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request recorded")
    }

    pub fn close_calls(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn execute(&self, request: TransportRequest) -> Result<RawResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        let scripted = self.scripted.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| Ok(self.fallback.clone()))
    }

    async fn close(&self) {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
    }
}
