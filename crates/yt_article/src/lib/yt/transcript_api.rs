use std::ops::Deref;

use itertools::Itertools;
use serde_json::Value;

use crate::{
    error::Error,
    parser::{
        parse_caption_tracks, parse_playability, parse_timed_text, CaptionTrack, Playability,
        YtHtmlDocument,
    },
    yt::{TranscriptLookup, TranscriptSource},
};

#[derive(Debug, thiserror::Error)]
pub enum YoutubeError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Video {video_id} is unavailable: {reason}")]
    VideoUnavailable { video_id: String, reason: String },
    #[error("Video {video_id} cannot be played ({status}): {reason}")]
    VideoRestricted {
        video_id: String,
        status: String,
        reason: String,
    },
    #[error("Transcripts are disabled for video {video_id}")]
    TranscriptsDisabled { video_id: String },
    #[error("Failed to read YouTube response for video {video_id}: {source}")]
    Parse {
        video_id: String,
        #[source]
        source: Error,
    },
}

impl From<YoutubeError> for Error {
    fn from(value: YoutubeError) -> Self {
        match value {
            YoutubeError::VideoUnavailable { video_id, reason } => {
                Error::InvalidReference { video_id, reason }
            }
            YoutubeError::VideoRestricted { ref video_id, .. }
            | YoutubeError::TranscriptsDisabled { ref video_id }
            | YoutubeError::Parse { ref video_id, .. } => Error::unavailable(video_id, &value),
            YoutubeError::Request(ref e) => Error::unavailable(&requested_video_id(e), &value),
        }
    }
}

/// Both the watch page and the timed text URLs carry the id in `v`
fn requested_video_id(e: &reqwest::Error) -> String {
    e.url()
        .and_then(|url| {
            url.query_pairs()
                .find(|(k, _)| k == "v")
                .map(|(_, v)| v.into_owned())
        })
        .unwrap_or_default()
}

/// Transcript source backed by the captions listed on a video's watch page
#[derive(Debug, Clone, Default)]
pub struct YoutubeTranscriptSource(pub reqwest::Client);

impl Deref for YoutubeTranscriptSource {
    type Target = reqwest::Client;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl YoutubeTranscriptSource {
    const WATCH_URL: &'static str = "https://www.youtube.com/watch";

    pub fn new(client: reqwest::Client) -> Self {
        Self(client)
    }

    /// Loads the watch page and returns its caption tracks, manual tracks first
    #[tracing::instrument(skip(self))]
    async fn caption_tracks(&self, video_id: &str) -> Result<Vec<CaptionTrack>, YoutubeError> {
        let html = self
            .get(Self::WATCH_URL)
            .query(&[("v", video_id)])
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let parse_err = |source| YoutubeError::Parse {
            video_id: video_id.to_string(),
            source,
        };

        let player_response = YtHtmlDocument::from(html)
            .to_json::<Value>()
            .map_err(parse_err)?;

        match parse_playability(&player_response) {
            Playability::Ok => {}
            Playability::Error { reason } => {
                return Err(YoutubeError::VideoUnavailable {
                    video_id: video_id.to_string(),
                    reason,
                })
            }
            Playability::Restricted { status, reason } => {
                return Err(YoutubeError::VideoRestricted {
                    video_id: video_id.to_string(),
                    status,
                    reason,
                })
            }
        }

        let tracks = parse_caption_tracks(&player_response).map_err(parse_err)?;
        if tracks.is_empty() {
            return Err(YoutubeError::TranscriptsDisabled {
                video_id: video_id.to_string(),
            });
        }

        // stable sort keeps page order within each group
        Ok(tracks
            .into_iter()
            .sorted_by_key(CaptionTrack::is_generated)
            .collect())
    }

    #[tracing::instrument(skip(self, track), fields(language = %track.language_code))]
    async fn download_track(
        &self,
        video_id: &str,
        track: &CaptionTrack,
    ) -> Result<TranscriptLookup, YoutubeError> {
        let body = self
            .get(format!("{}&fmt=json3", track.base_url))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let segments = parse_timed_text(&body).map_err(|source| YoutubeError::Parse {
            video_id: video_id.to_string(),
            source,
        })?;

        Ok(TranscriptLookup::Found(segments))
    }
}

/// Picks the first track matching the preference order; tracks are expected to
/// be sorted manual first, so a manual track wins over a generated one.
fn select_track<'a>(tracks: &'a [CaptionTrack], languages: &[String]) -> Option<&'a CaptionTrack> {
    if languages.is_empty() {
        return tracks.first();
    }

    languages
        .iter()
        .find_map(|lang| tracks.iter().find(|t| &t.language_code == lang))
}

impl TranscriptSource for YoutubeTranscriptSource {
    type Error = YoutubeError;

    async fn fetch(
        &self,
        video_id: &str,
        languages: &[String],
    ) -> Result<TranscriptLookup, Self::Error> {
        let tracks = self.caption_tracks(video_id).await?;

        match select_track(&tracks, languages) {
            Some(track) => self.download_track(video_id, track).await,
            None => {
                tracing::debug!(?languages, "No caption track in requested languages");
                Ok(TranscriptLookup::NotInLanguages)
            }
        }
    }

    async fn list_languages(&self, video_id: &str) -> Result<Vec<String>, Self::Error> {
        let tracks = self.caption_tracks(video_id).await?;

        Ok(tracks
            .into_iter()
            .map(|t| t.language_code)
            .unique()
            .collect())
    }
}
