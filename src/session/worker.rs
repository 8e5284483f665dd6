use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crate::core::ChatError;
use crate::generation::{GenerationParams, InferenceAdapter};

/// One prompt dispatched to the inference thread.
#[derive(Debug)]
pub struct GenerationRequest {
    pub prompt: String,
    pub params: GenerationParams,
}

/// UI-side handle to the inference worker.
///
/// Exactly one reply arrives per request, in request order. Dropping the
/// handle closes the request channel, lets the thread finish its current
/// call and joins it.
pub struct WorkerHandle {
    requests: Option<Sender<GenerationRequest>>,
    replies: Receiver<anyhow::Result<String>>,
    thread: Option<JoinHandle<()>>,
}

/// Move the adapter onto its own thread and return the channel pair.
pub fn spawn(mut adapter: Box<dyn InferenceAdapter>) -> WorkerHandle {
    let (request_tx, request_rx) = mpsc::channel::<GenerationRequest>();
    let (reply_tx, reply_rx) = mpsc::channel();

    let thread = thread::spawn(move || {
        while let Ok(request) = request_rx.recv() {
            let started = Instant::now();
            tracing::debug!(prompt_chars = request.prompt.len(), "generation dispatched");
            let result = adapter.generate(&request.prompt, &request.params);
            match &result {
                Ok(reply) => tracing::debug!(
                    reply_chars = reply.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "generation finished"
                ),
                Err(err) => tracing::warn!(%err, "generation failed"),
            }
            if reply_tx.send(result).is_err() {
                // Handle dropped mid-flight; nobody is listening anymore.
                break;
            }
        }
    });

    WorkerHandle {
        requests: Some(request_tx),
        replies: reply_rx,
        thread: Some(thread),
    }
}

impl WorkerHandle {
    /// Hand one request to the worker without waiting for the reply.
    pub fn dispatch(&self, request: GenerationRequest) -> Result<(), ChatError> {
        self.requests
            .as_ref()
            .ok_or_else(|| ChatError::Generation("inference worker is gone".to_string()))?
            .send(request)
            .map_err(|_| ChatError::Generation("inference worker is gone".to_string()))
    }

    /// Fetch a finished reply if one is ready.
    pub fn try_reply(&self) -> Option<anyhow::Result<String>> {
        match self.replies.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                Some(Err(anyhow::anyhow!("inference worker is gone")))
            }
        }
    }

    /// Block until the next reply arrives.
    pub fn wait_reply(&self) -> anyhow::Result<String> {
        self.replies
            .recv()
            .unwrap_or_else(|_| Err(anyhow::anyhow!("inference worker is gone")))
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        // Closing the request channel first unblocks the worker's recv loop.
        self.requests.take();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
