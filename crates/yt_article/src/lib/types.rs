use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    #[default]
    Summary,
    Detailed,
}

/// Per-request knobs for article generation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationOptions {
    pub detail_level: DetailLevel,
    /// Free-text language name, e.g. "German". `None` lets the model follow the transcript.
    pub target_language: Option<String>,
}

impl GenerationOptions {
    pub fn new(detail_level: DetailLevel, target_language: Option<String>) -> Self {
        let target_language = target_language
            .map(|lang| lang.trim().to_string())
            .filter(|lang| !lang.is_empty());

        Self {
            detail_level,
            target_language,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

/// Outcome of a pipeline run. Serializes to `{"article": ..}` or `{"error": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArticleResult {
    Article { article: String },
    Error { error: String },
}

impl ArticleResult {
    pub fn article(&self) -> Option<&str> {
        match self {
            ArticleResult::Article { article } => Some(article),
            ArticleResult::Error { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ArticleResult::Article { .. } => None,
            ArticleResult::Error { error } => Some(error),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ArticleResult::Error { .. })
    }
}

/// Inbound request body, as accepted by the HTTP surface
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArticleRequest {
    /// Bare id or a youtube.com / youtu.be URL
    pub video_id: String,
    #[serde(default)]
    pub detail_level: DetailLevel,
    #[serde(default)]
    pub target_lang: Option<String>,
}

impl ArticleRequest {
    pub fn options(&self) -> GenerationOptions {
        GenerationOptions::new(self.detail_level, self.target_lang.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_article_result_wire_shape() {
        let ok = ArticleResult::Article {
            article: "text".into(),
        };
        let err = ArticleResult::Error {
            error: "boom".into(),
        };

        assert_eq!(serde_json::to_value(&ok).unwrap(), json!({"article": "text"}));
        assert_eq!(serde_json::to_value(&err).unwrap(), json!({"error": "boom"}));
        assert_eq!(ok.article(), Some("text"));
        assert!(err.is_error());
        assert_eq!(err.article(), None);
    }

    #[test]
    fn test_request_defaults() {
        let req: ArticleRequest =
            serde_json::from_value(json!({"video_id": "dQw4w9WgXcQ"})).unwrap();

        assert_eq!(req.detail_level, DetailLevel::Summary);
        assert_eq!(req.options(), GenerationOptions::default());
    }

    #[test]
    fn test_request_with_all_fields() {
        let req: ArticleRequest = serde_json::from_value(json!({
            "video_id": "https://youtu.be/dQw4w9WgXcQ",
            "detail_level": "detailed",
            "target_lang": "German"
        }))
        .unwrap();

        let options = req.options();
        assert_eq!(options.detail_level, DetailLevel::Detailed);
        assert_eq!(options.target_language.as_deref(), Some("German"));
    }

    #[test]
    fn test_blank_language_is_unset() {
        let options = GenerationOptions::new(DetailLevel::Summary, Some("   ".into()));
        assert_eq!(options.target_language, None);
    }

    #[test]
    fn test_unknown_detail_level_is_rejected() {
        let result = serde_json::from_value::<ArticleRequest>(json!({
            "video_id": "dQw4w9WgXcQ",
            "detail_level": "epic"
        }));
        assert!(result.is_err());
    }
}
