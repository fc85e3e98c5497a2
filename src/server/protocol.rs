//! JSON line protocol spoken between streaming clients and the server.
//!
//! Each line is one message. Audio payloads are base64-encoded little-endian
//! 16-bit PCM so they survive the text framing.

use crate::error::{Result, ScribedError};
use crate::session::frame::Segment;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

/// Requests sent by a client to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    /// One chunk of base64-encoded PCM audio
    Audio { data: String },
    /// End of audio input; flush and finish the stream
    End,
    /// Liveness probe
    Health,
}

/// Responses sent by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    /// One transcribed segment
    Segment {
        text: String,
        start_time: f64,
        end_time: f64,
    },
    /// All input processed; no further segments will follow
    End,
    /// Liveness probe answer
    Health { status_code: u32 },
    /// Error scoped to one buffer or one malformed request
    Error { message: String },
}

impl Request {
    /// Builds an audio request from raw PCM bytes.
    pub fn audio(pcm: &[u8]) -> Self {
        Request::Audio {
            data: BASE64.encode(pcm),
        }
    }

    /// Serialize request to JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| ScribedError::Protocol {
            message: format!("Failed to serialize request: {}", e),
        })
    }

    /// Deserialize request from JSON string.
    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| ScribedError::Protocol {
            message: format!("Failed to deserialize request: {}", e),
        })
    }
}

impl Response {
    pub fn segment(segment: &Segment) -> Self {
        Response::Segment {
            text: segment.text.clone(),
            start_time: segment.start_time,
            end_time: segment.end_time,
        }
    }

    /// Serialize response to JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| ScribedError::Protocol {
            message: format!("Failed to serialize response: {}", e),
        })
    }

    /// Deserialize response from JSON string.
    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| ScribedError::Protocol {
            message: format!("Failed to deserialize response: {}", e),
        })
    }
}

/// Decodes an audio payload back to PCM bytes.
pub fn decode_audio(data: &str) -> Result<Vec<u8>> {
    BASE64.decode(data).map_err(|e| ScribedError::MalformedAudio {
        message: format!("payload is not valid base64: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_audio_roundtrip() {
        let pcm = vec![0x01u8, 0x02, 0x03, 0x04];
        let request = Request::audio(&pcm);

        let json = request.to_json().expect("serialize");
        let decoded = Request::from_json(&json).expect("deserialize");
        assert_eq!(request, decoded);

        match decoded {
            Request::Audio { data } => {
                assert_eq!(decode_audio(&data).expect("decode"), pcm);
            }
            other => panic!("expected audio request, got {:?}", other),
        }
    }

    #[test]
    fn test_request_all_variants_roundtrip() {
        let requests = vec![Request::audio(&[0u8; 8]), Request::End, Request::Health];

        for request in requests {
            let json = request.to_json().expect("serialize");
            let decoded = Request::from_json(&json).expect("deserialize");
            assert_eq!(request, decoded, "roundtrip failed for {:?}", request);
        }
    }

    #[test]
    fn test_json_format_is_snake_case() {
        let json = Request::Health.to_json().expect("serialize");
        assert!(
            json.contains("\"type\":\"health\""),
            "JSON should use snake_case. Got: {}",
            json
        );

        let json = Request::End.to_json().expect("serialize");
        assert!(
            json.contains("\"type\":\"end\""),
            "JSON should use snake_case. Got: {}",
            json
        );
    }

    #[test]
    fn test_response_segment_roundtrip() {
        let response = Response::Segment {
            text: "hello world".to_string(),
            start_time: 1700000000.25,
            end_time: 1700000002.5,
        };

        let json = response.to_json().expect("serialize");
        let decoded = Response::from_json(&json).expect("deserialize");
        assert_eq!(response, decoded);
    }

    #[test]
    fn test_response_from_segment() {
        let segment = Segment {
            text: "hi".to_string(),
            start_time: 10.0,
            end_time: 12.0,
        };
        let response = Response::segment(&segment);
        assert_eq!(
            response,
            Response::Segment {
                text: "hi".to_string(),
                start_time: 10.0,
                end_time: 12.0,
            }
        );
    }

    #[test]
    fn test_response_health_carries_status_code() {
        let response = Response::Health { status_code: 12 };
        let json = response.to_json().expect("serialize");
        assert!(json.contains("\"status_code\":12"));
    }

    #[test]
    fn test_response_all_variants_roundtrip() {
        let responses = vec![
            Response::Segment {
                text: "x".to_string(),
                start_time: 0.0,
                end_time: 1.0,
            },
            Response::End,
            Response::Health { status_code: 12 },
            Response::Error {
                message: "oops".to_string(),
            },
        ];

        for response in responses {
            let json = response.to_json().expect("serialize");
            let decoded = Response::from_json(&json).expect("deserialize");
            assert_eq!(response, decoded);
        }
    }

    #[test]
    fn test_decode_audio_rejects_garbage() {
        let result = decode_audio("not base64 at all!!!");
        assert!(matches!(
            result,
            Err(ScribedError::MalformedAudio { .. })
        ));
    }

    #[test]
    fn test_from_json_rejects_unknown_type() {
        assert!(Request::from_json("{\"type\":\"bogus\"}").is_err());
        assert!(Request::from_json("not json").is_err());
    }
}
