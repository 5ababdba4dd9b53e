//! # Yt Parser
//!
//! Turns user supplied video references into video ids and pulls the caption
//! metadata and timed text out of YouTube responses.

use std::{ops::Deref, sync::LazyLock};

use regex::Regex;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;

use crate::{error::Error, types::TranscriptSegment};

static VIDEO_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:https?://)?(?:www\.|m\.)?(?:youtube\.com/watch\?(?:[^#\s]*?&)??v=|youtu\.be/)([A-Za-z0-9_-]{11})",
    )
    .unwrap()
});

static YT_PLAYER_RESPONSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)(?:var\s+)?ytInitialPlayerResponse\s*=\s*(\{.*?\});\s*(?:var\s|</script>)",
    )
    .unwrap()
});

/// Extracts the 11 character video id from a `youtube.com/watch?v=` or
/// `youtu.be/` URL.
///
/// Anything that is not a recognized URL is returned unchanged and treated as
/// a bare id; it is not validated here; the transcript source rejects it later
/// if it does not exist.
pub fn extract_video_id(input: &str) -> String {
    VIDEO_ID_RE
        .captures(input)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| input.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionTrack {
    pub base_url: String,
    pub language_code: String,
    #[serde(default)]
    pub kind: Option<String>,
}

impl CaptionTrack {
    /// Auto-generated (speech recognition) tracks are tagged `kind: "asr"`
    pub fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Playability {
    Ok,
    /// The video does not exist or was removed
    Error { reason: String },
    /// Exists but cannot be played anonymously (age gate, private, members only...)
    Restricted { status: String, reason: String },
}

/// Reads `playabilityStatus` from the player response.
pub fn parse_playability(json: &Value) -> Playability {
    let status = &json["playabilityStatus"];
    let reason = status["reason"]
        .as_str()
        .unwrap_or("no reason given")
        .to_string();

    match status["status"].as_str() {
        // no status at all: let the caption lookup decide
        Some("OK") | None => Playability::Ok,
        Some("ERROR") => Playability::Error { reason },
        Some(other) => Playability::Restricted {
            status: other.to_string(),
            reason,
        },
    }
}

/// Parses the caption tracks listed in the player response.
///
/// # Returns
/// * `Ok(vec![])` if the video has no captions at all.
/// * `Err(Error::ParseError)` if the track list exists but is malformed.
#[tracing::instrument(skip(json))]
pub fn parse_caption_tracks(json: &Value) -> Result<Vec<CaptionTrack>, Error> {
    let tracks = &json["captions"]["playerCaptionsTracklistRenderer"]["captionTracks"];
    if tracks.is_null() {
        return Ok(Vec::new());
    }

    serde_json::from_value::<Vec<CaptionTrack>>(tracks.clone()).map_err(|e| {
        tracing::error!(error = %e, "Unexpected captionTracks structure");
        Error::ParseError("Failed to parse ['captions']['playerCaptionsTracklistRenderer']['captionTracks']")
    })
}

#[derive(Debug, Deserialize)]
struct TimedText {
    #[serde(default)]
    events: Vec<TimedTextEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimedTextEvent {
    #[serde(default)]
    t_start_ms: u64,
    #[serde(default)]
    d_duration_ms: u64,
    segs: Option<Vec<TimedTextSeg>>,
}

#[derive(Debug, Deserialize)]
struct TimedTextSeg {
    #[serde(default)]
    utf8: String,
}

/// Decodes a `fmt=json3` timed text document into segments, in document order.
pub fn parse_timed_text(body: &str) -> Result<Vec<TranscriptSegment>, Error> {
    let timed_text = serde_json::from_str::<TimedText>(body)
        .map_err(|_| Error::ParseError("Failed to decode json3 timed text"))?;

    let segments = timed_text
        .events
        .into_iter()
        .filter_map(|event| {
            let text = event
                .segs?
                .iter()
                .map(|seg| seg.utf8.as_str())
                .collect::<String>()
                .replace('\n', " ");
            let text = text.trim();

            // window/style events carry no text
            (!text.is_empty()).then(|| TranscriptSegment {
                text: text.to_string(),
                start: event.t_start_ms as f64 / 1000.0,
                duration: event.d_duration_ms as f64 / 1000.0,
            })
        })
        .collect();

    Ok(segments)
}

pub struct YtHtmlDocument(String);

impl Deref for YtHtmlDocument {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl YtHtmlDocument {
    /// Extracts the `ytInitialPlayerResponse` object embedded in a watch page
    pub fn to_json<T>(&self) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        YT_PLAYER_RESPONSE_RE
            .captures(self)
            .and_then(|cap| cap.get(1))
            .and_then(|m| serde_json::from_str(m.as_str()).ok())
            .ok_or(Error::ParseError(
                "Failed to extract ytInitialPlayerResponse from the page's script tag",
            ))
    }
}

impl From<String> for YtHtmlDocument {
    fn from(value: String) -> Self {
        YtHtmlDocument(value)
    }
}
