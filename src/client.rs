//! Streaming client for a running scribed server.
//!
//! Streams a WAV file chunk by chunk, printing transcript segments as the
//! server returns them, plus a health-probe helper.

use crate::audio::wav::WavAudio;
use crate::error::{Result, ScribedError};
use crate::server::protocol::{Request, Response};
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

/// Transport chunk size in samples (100ms at the target rate).
fn chunk_samples(sample_rate: u32) -> usize {
    (sample_rate / 10) as usize
}

async fn connect(addr: &str) -> Result<TcpStream> {
    TcpStream::connect(addr)
        .await
        .map_err(|e| ScribedError::Connection {
            message: format!("Failed to connect to {}: {}", addr, e),
        })
}

/// Streams a WAV file to the server and prints segments until the server
/// signals the end of the result stream.
///
/// With `realtime` set, chunks are paced at playback speed to mimic a live
/// microphone; otherwise they are sent as fast as the server accepts them.
pub async fn stream_wav(addr: &str, path: &Path, sample_rate: u32, realtime: bool) -> Result<()> {
    let audio = WavAudio::from_path(path, sample_rate)?;
    let stream = connect(addr).await?;
    let (read_half, mut write_half) = stream.into_split();

    let stream_start = Instant::now();
    let printer = tokio::spawn(async move {
        let mut lines = BufReader::new(read_half).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            match Response::from_json(line.trim()) {
                Ok(Response::Segment {
                    text,
                    start_time,
                    end_time,
                }) => {
                    println!("Transcription: {}", text);
                    println!("Chunk duration: {:.2} s", end_time - start_time);
                    println!(
                        "Time since start: {:.2} s",
                        stream_start.elapsed().as_secs_f64()
                    );
                    println!("---");
                }
                Ok(Response::End) => {
                    println!("Server finished sending transcript segments.");
                    return;
                }
                Ok(Response::Error { message }) => {
                    eprintln!("scribed: server reported: {}", message);
                }
                Ok(other) => {
                    eprintln!("scribed: unexpected response: {:?}", other);
                }
                Err(e) => {
                    eprintln!("scribed: bad response line: {}", e);
                }
            }
        }
    });

    let chunk_duration = Duration::from_millis(100);
    for chunk in audio.pcm_chunks(chunk_samples(sample_rate)) {
        let json = Request::audio(&chunk).to_json()?;
        write_half
            .write_all(json.as_bytes())
            .await
            .map_err(|e| ScribedError::Connection {
                message: format!("Failed to write audio chunk: {}", e),
            })?;
        write_half
            .write_all(b"\n")
            .await
            .map_err(|e| ScribedError::Connection {
                message: format!("Failed to write newline: {}", e),
            })?;
        if realtime {
            tokio::time::sleep(chunk_duration).await;
        }
    }

    let json = Request::End.to_json()?;
    write_half
        .write_all(json.as_bytes())
        .await
        .map_err(|e| ScribedError::Connection {
            message: format!("Failed to write end marker: {}", e),
        })?;
    write_half
        .write_all(b"\n")
        .await
        .map_err(|e| ScribedError::Connection {
            message: format!("Failed to write newline: {}", e),
        })?;
    write_half.flush().await.map_err(|e| ScribedError::Connection {
        message: format!("Failed to flush stream: {}", e),
    })?;

    printer.await.map_err(|e| ScribedError::Other(format!(
        "result printer task failed: {}",
        e
    )))?;
    Ok(())
}

/// Probes the server's health endpoint and returns its status code.
pub async fn health_check(addr: &str) -> Result<u32> {
    let stream = connect(addr).await?;
    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    let json = Request::Health.to_json()?;
    write_half
        .write_all(json.as_bytes())
        .await
        .map_err(|e| ScribedError::Connection {
            message: format!("Failed to write health request: {}", e),
        })?;
    write_half
        .write_all(b"\n")
        .await
        .map_err(|e| ScribedError::Connection {
            message: format!("Failed to write newline: {}", e),
        })?;

    let line = lines
        .next_line()
        .await
        .map_err(|e| ScribedError::Connection {
            message: format!("Failed to read health response: {}", e),
        })?
        .ok_or_else(|| ScribedError::Connection {
            message: "server closed the stream before answering".to_string(),
        })?;

    match Response::from_json(line.trim())? {
        Response::Health { status_code } => Ok(status_code),
        other => Err(ScribedError::Protocol {
            message: format!("expected health response, got {:?}", other),
        }),
    }
}
