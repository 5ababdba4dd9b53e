use std::sync::{Arc, Mutex};
use yt_article::{Error, TranscriptLookup, TranscriptSegment, TranscriptSource};

/// Serves canned transcripts per language, in the order given
#[derive(Clone)]
pub struct MockTranscriptSource {
    pub transcripts: Vec<(String, Vec<TranscriptSegment>)>,
    pub fetch_calls: Arc<Mutex<Vec<(String, Vec<String>)>>>,
    pub list_calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<fn(&str) -> Error>,
    /// Listed by `list_languages` but never served by `fetch`
    pub listed_only: Vec<String>,
    pub list_fails_with: Option<fn(&str) -> Error>,
}

pub fn segments(texts: &[&str]) -> Vec<TranscriptSegment> {
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| TranscriptSegment {
            text: text.to_string(),
            start: i as f64 * 2.0,
            duration: 2.0,
        })
        .collect()
}

impl MockTranscriptSource {
    pub fn new() -> Self {
        Self {
            transcripts: Vec::new(),
            fetch_calls: Arc::new(Mutex::new(Vec::new())),
            list_calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
            listed_only: Vec::new(),
            list_fails_with: None,
        }
    }

    /// Adds a transcript; languages are listed in insertion order
    pub fn with_language(mut self, lang: &str, texts: &[&str]) -> Self {
        self.transcripts.push((lang.to_string(), segments(texts)));
        self
    }

    /// Advertises a language without having a transcript for it
    pub fn with_listed_only(mut self, lang: &str) -> Self {
        self.listed_only.push(lang.to_string());
        self
    }

    /// Fetches behave normally, listing languages fails
    pub fn with_failing_listing(mut self) -> Self {
        self.list_fails_with = Some(|video_id| Error::TranscriptUnavailable {
            video_id: video_id.to_string(),
            reason: "Could not load the caption list".to_string(),
        });
        self
    }

    /// Every call fails with `TranscriptUnavailable`
    pub fn unavailable() -> Self {
        Self {
            fail_with: Some(|video_id| Error::TranscriptUnavailable {
                video_id: video_id.to_string(),
                reason: "Transcripts are disabled for this video".to_string(),
            }),
            ..Self::new()
        }
    }

    /// Every call fails as if the id did not exist
    pub fn invalid_reference() -> Self {
        Self {
            fail_with: Some(|video_id| Error::InvalidReference {
                video_id: video_id.to_string(),
                reason: "Video unavailable".to_string(),
            }),
            ..Self::new()
        }
    }
}

impl TranscriptSource for MockTranscriptSource {
    type Error = Error;

    async fn fetch(
        &self,
        video_id: &str,
        languages: &[String],
    ) -> Result<TranscriptLookup, Self::Error> {
        self.fetch_calls
            .lock()
            .unwrap()
            .push((video_id.to_string(), languages.to_vec()));
        if let Some(fail) = self.fail_with {
            return Err(fail(video_id));
        }

        let found = if languages.is_empty() {
            self.transcripts.first()
        } else {
            languages
                .iter()
                .find_map(|lang| self.transcripts.iter().find(|(l, _)| l == lang))
        };

        Ok(match found {
            Some((_, segments)) => TranscriptLookup::Found(segments.clone()),
            None => TranscriptLookup::NotInLanguages,
        })
    }

    async fn list_languages(&self, video_id: &str) -> Result<Vec<String>, Self::Error> {
        self.list_calls.lock().unwrap().push(video_id.to_string());
        if let Some(fail) = self.fail_with.or(self.list_fails_with) {
            return Err(fail(video_id));
        }
        Ok(self
            .transcripts
            .iter()
            .map(|(lang, _)| lang.clone())
            .chain(self.listed_only.iter().cloned())
            .collect())
    }
}
