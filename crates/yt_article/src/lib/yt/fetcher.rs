use crate::{
    error::Error,
    yt::{TranscriptLookup, TranscriptSource},
};

/// Retrieves transcripts with a preferred language, falling back to whatever
/// languages the video actually has.
#[derive(Debug, Clone)]
pub struct TranscriptFetcher<S> {
    source: S,
}

impl<S> TranscriptFetcher<S>
where
    S: TranscriptSource + Send + Sync,
{
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Returns the transcript text, segments joined with single spaces.
    ///
    /// With `target_lang` unset the source picks its default transcript. If the
    /// requested language does not exist, the available languages are listed
    /// and the fetch is retried with all of them, in the source's order. Any
    /// other source error ends the lookup immediately.
    #[tracing::instrument(skip(self))]
    pub async fn get_transcript(
        &self,
        video_id: &str,
        target_lang: Option<&str>,
    ) -> Result<String, Error> {
        let preferred = target_lang.map(|l| vec![l.to_string()]).unwrap_or_default();

        let lookup = self
            .source
            .fetch(video_id, &preferred)
            .await
            .map_err(Into::<Error>::into)?;

        let segments = match lookup {
            TranscriptLookup::Found(segments) => segments,
            TranscriptLookup::NotInLanguages => {
                let available = self
                    .source
                    .list_languages(video_id)
                    .await
                    .map_err(Into::<Error>::into)?;

                tracing::info!(
                    ?preferred,
                    ?available,
                    "Transcript not found in requested language, falling back"
                );

                if available.is_empty() {
                    return Err(Error::unavailable(video_id, "no transcript languages listed"));
                }

                let fallback = self
                    .source
                    .fetch(video_id, &available)
                    .await
                    .map_err(Into::<Error>::into)?;

                match fallback {
                    TranscriptLookup::Found(segments) => segments,
                    TranscriptLookup::NotInLanguages => {
                        return Err(Error::unavailable(
                            video_id,
                            format!("none of the listed languages {available:?} could be fetched"),
                        ))
                    }
                }
            }
        };

        tracing::debug!(segments = segments.len(), "Transcript fetched");

        Ok(segments
            .iter()
            .map(|segment| segment.text.as_str())
            .collect::<Vec<_>>()
            .join(" "))
    }
}
