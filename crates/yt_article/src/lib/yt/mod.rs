pub mod fetcher;
pub mod transcript_api;

use std::future::Future;

use crate::{error::Error, types::TranscriptSegment};

/// Result of asking a [`TranscriptSource`] for a transcript in a set of languages
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptLookup {
    Found(Vec<TranscriptSegment>),
    /// The video has transcripts, just none in the requested languages
    NotInLanguages,
}

pub trait TranscriptSource {
    /// Anything the source reports as an error ends the lookup for that request
    type Error: Into<Error> + std::fmt::Display + Send;

    /// Fetches the transcript for the first available language in `languages`.
    /// An empty list leaves the choice to the source.
    fn fetch(
        &self,
        video_id: &str,
        languages: &[String],
    ) -> impl Future<Output = Result<TranscriptLookup, Self::Error>> + Send;

    fn list_languages(
        &self,
        video_id: &str,
    ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send;
}

impl<T: TranscriptSource + Send + Sync> TranscriptSource for &T {
    type Error = T::Error;

    async fn fetch(
        &self,
        video_id: &str,
        languages: &[String],
    ) -> Result<TranscriptLookup, Self::Error> {
        (**self).fetch(video_id, languages).await
    }

    async fn list_languages(&self, video_id: &str) -> Result<Vec<String>, Self::Error> {
        (**self).list_languages(video_id).await
    }
}
