//! Inference gate: serialized access to the shared transcription engine.
//!
//! The engine instance is loaded once at process start and is not assumed
//! safe for concurrent invocation (it may hold an accelerator exclusively).
//! A dedicated worker task owns the engine and serves requests from a
//! bounded queue one at a time, so at most one buffer is being transcribed
//! process-wide at any instant. Queue order is submission order, which
//! gives FIFO service across sessions; within a session, `submit` blocks
//! until its turn completes, so a session never has two calls outstanding.

use crate::defaults;
use crate::error::{Result, ScribedError};
use crate::stt::transcriber::{SegmentSpan, Transcriber};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

struct InferenceRequest {
    samples: Vec<i16>,
    reply: oneshot::Sender<Result<Vec<SegmentSpan>>>,
}

/// Cloneable handle for submitting buffers to the engine worker.
#[derive(Clone)]
pub struct InferenceHandle {
    tx: mpsc::Sender<InferenceRequest>,
}

/// Spawns the engine worker task and returns a handle to it.
///
/// The worker runs until every handle is dropped.
pub fn spawn<T: Transcriber + 'static>(engine: T) -> InferenceHandle {
    let (tx, rx) = mpsc::channel(defaults::INFERENCE_QUEUE_CAPACITY);
    tokio::spawn(worker(Arc::new(engine), rx));
    InferenceHandle { tx }
}

/// Serves queued requests strictly one at a time, in arrival order.
async fn worker<T: Transcriber + 'static>(
    engine: Arc<T>,
    mut rx: mpsc::Receiver<InferenceRequest>,
) {
    while let Some(request) = rx.recv().await {
        let engine = engine.clone();
        let samples = request.samples;

        // Inference is CPU/GPU-bound; run it on the blocking pool and wait
        // for completion before taking the next request.
        let result = tokio::task::spawn_blocking(move || engine.transcribe(&samples))
            .await
            .map_err(|e| ScribedError::TranscriptionInferenceFailed {
                message: format!("Inference task panicked: {}", e),
            })
            .and_then(|r| r);

        if let Err(ref e) = result {
            tracing::warn!(error = %e, "inference failed");
        }

        // The session may have disconnected while waiting; the in-flight
        // inference is never cancelled, its result is simply dropped.
        let _ = request.reply.send(result);
    }
}

impl InferenceHandle {
    /// Submits a buffer and waits for the engine's segments.
    ///
    /// Blocks (suspends) the calling session until every earlier request
    /// has been served and this one completes. An engine failure is scoped
    /// to this buffer; the handle stays usable.
    pub async fn submit(&self, samples: Vec<i16>) -> Result<Vec<SegmentSpan>> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(InferenceRequest {
                samples,
                reply: reply_tx,
            })
            .await
            .map_err(|_| ScribedError::EngineUnavailable {
                message: "engine worker stopped".to_string(),
            })?;

        reply_rx.await.map_err(|_| ScribedError::EngineUnavailable {
            message: "engine worker dropped the request".to_string(),
        })?
    }

    /// Warms the engine with silence so the first real request does not pay
    /// model initialization latency.
    pub async fn warmup(&self, sample_rate: u32, secs: u32) -> Result<()> {
        tracing::info!(secs, "warming up the model");
        let silence = vec![0i16; (sample_rate * secs) as usize];
        self.submit(silence).await?;
        tracing::info!("model warmup completed");
        Ok(())
    }
}
