#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The reference resolved to an id the transcript source rejected
    #[error("Invalid video reference '{video_id}': {reason}")]
    InvalidReference { video_id: String, reason: String },

    #[error("No transcript available for video '{video_id}': {reason}")]
    TranscriptUnavailable { video_id: String, reason: String },

    #[error("Failed to generate article: {0}")]
    GenerationFailed(String),

    #[error("Parse error: {0}")]
    ParseError(&'static str),
}

impl Error {
    pub(crate) fn unavailable(video_id: &str, reason: impl ToString) -> Self {
        Error::TranscriptUnavailable {
            video_id: video_id.to_string(),
            reason: reason.to_string(),
        }
    }
}
