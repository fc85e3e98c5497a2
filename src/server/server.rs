//! Async TCP server: one session pipeline per connection.
//!
//! Each connection gets a reader task feeding the session's input channel
//! and a writer task draining responses, so transcription results stream
//! back while audio keeps arriving. The engine handle is shared; everything
//! else is per-connection.

use crate::audio::vad::SpeechDetector;
use crate::defaults;
use crate::error::{Result, ScribedError};
use crate::server::protocol::{Request, Response, decode_audio};
use crate::session::driver::{SessionConfig, SessionEvent, SessionInput, SessionPipeline};
use crate::stt::gate::InferenceHandle;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

/// Streaming transcription server.
///
/// Generic over the detector factory so tests can inject scripted
/// classifiers; production uses an [`EnergyVad`](crate::audio::EnergyVad)
/// per session.
pub struct TranscribeServer<F> {
    session_config: SessionConfig,
    engine: InferenceHandle,
    make_detector: F,
}

impl<D, F> TranscribeServer<F>
where
    D: SpeechDetector + 'static,
    F: Fn() -> D + Send + Sync + Clone + 'static,
{
    pub fn new(session_config: SessionConfig, engine: InferenceHandle, make_detector: F) -> Self {
        Self {
            session_config,
            engine,
            make_detector,
        }
    }

    /// Accepts connections until the listener fails.
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server started");

        loop {
            let (stream, peer) = listener
                .accept()
                .await
                .map_err(|e| ScribedError::Connection {
                    message: format!("Failed to accept connection: {}", e),
                })?;

            tracing::info!(%peer, "transcription stream opened");
            let session_config = self.session_config;
            let engine = self.engine.clone();
            let detector = (self.make_detector)();

            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, session_config, detector, engine).await {
                    tracing::warn!(%peer, error = %e, "connection ended with error");
                }
                tracing::info!(%peer, "transcription stream closed");
            });
        }
    }
}

/// Binds a listener on the given address.
pub async fn bind_listener(addr: &str) -> Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .map_err(|e| ScribedError::ServerSocket {
            message: format!("Failed to bind {}: {}", addr, e),
        })
}

/// Drives one connection: reader → session pipeline → writer.
async fn handle_connection<D: SpeechDetector + 'static>(
    stream: TcpStream,
    session_config: SessionConfig,
    detector: D,
    engine: InferenceHandle,
) -> Result<()> {
    let (read_half, write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    let (response_tx, response_rx) = mpsc::channel::<Response>(64);
    let writer_task = tokio::spawn(write_responses(write_half, response_rx));

    let (input_tx, input_rx) = mpsc::channel(defaults::CHUNK_CHANNEL_CAPACITY);
    let (event_tx, event_rx) = mpsc::channel(64);
    let pipeline = SessionPipeline::new(session_config, detector, engine);
    let session_task = tokio::spawn(pipeline.run(input_rx, event_tx));
    let forward_task = tokio::spawn(forward_events(event_rx, response_tx.clone()));

    // Reader loop runs on this task; it owns the session's input side.
    let mut graceful_end = false;
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match Request::from_json(line) {
            Ok(Request::Audio { data }) => match decode_audio(&data) {
                Ok(pcm) => {
                    if input_tx.send(SessionInput::Audio(pcm)).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    // Local data-shape issue: report, keep the stream alive
                    let _ = response_tx
                        .send(Response::Error {
                            message: e.to_string(),
                        })
                        .await;
                }
            },
            Ok(Request::End) => {
                let _ = input_tx.send(SessionInput::End).await;
                graceful_end = true;
                break;
            }
            Ok(Request::Health) => {
                let _ = response_tx
                    .send(Response::Health {
                        status_code: defaults::HEALTH_STATUS_CODE,
                    })
                    .await;
            }
            Err(e) => {
                let _ = response_tx
                    .send(Response::Error {
                        message: e.to_string(),
                    })
                    .await;
            }
        }
    }

    // EOF without an End marker is a disconnect: the pipeline discards its
    // partial run once the input channel closes.
    drop(input_tx);
    let _ = session_task.await;
    let _ = forward_task.await;

    if graceful_end {
        let _ = response_tx.send(Response::End).await;
    }
    drop(response_tx);
    let _ = writer_task.await;
    Ok(())
}

/// Maps session events onto wire responses.
async fn forward_events(mut events: mpsc::Receiver<SessionEvent>, responses: mpsc::Sender<Response>) {
    while let Some(event) = events.recv().await {
        let response = match event {
            SessionEvent::Segment(segment) => Response::segment(&segment),
            SessionEvent::BufferError { message } => Response::Error { message },
        };
        if responses.send(response).await.is_err() {
            return;
        }
    }
}

/// Serializes responses as JSON lines onto the socket.
async fn write_responses(
    mut writer: tokio::net::tcp::OwnedWriteHalf,
    mut responses: mpsc::Receiver<Response>,
) {
    while let Some(response) = responses.recv().await {
        let json = match response.to_json() {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize response");
                continue;
            }
        };
        if writer.write_all(json.as_bytes()).await.is_err()
            || writer.write_all(b"\n").await.is_err()
            || writer.flush().await.is_err()
        {
            return;
        }
    }
}
