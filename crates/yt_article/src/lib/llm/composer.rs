use crate::{
    error::Error,
    llm::generator::TextGenerator,
    types::{DetailLevel, GenerationOptions},
};

const DETAILED_INSTRUCTION: &str =
    "Write a detailed professional article based on the following YouTube video transcript.";
const SUMMARY_INSTRUCTION: &str =
    "Write a brief summary of the following YouTube video transcript.";

/// Builds the generation prompt for a transcript.
///
/// The instruction comes first, framed by the detail level, optionally
/// followed by the output language. The transcript follows verbatim after a
/// blank line.
pub fn build_prompt(transcript: &str, options: &GenerationOptions) -> String {
    let mut prompt = String::from(match options.detail_level {
        DetailLevel::Detailed => DETAILED_INSTRUCTION,
        DetailLevel::Summary => SUMMARY_INSTRUCTION,
    });

    if let Some(lang) = &options.target_language {
        prompt.push_str(&format!(" Write the output in {lang}."));
    }

    prompt.push_str("\n\n");
    prompt.push_str(transcript);
    prompt
}

/// Turns transcripts into articles with a [`TextGenerator`]
#[derive(Debug, Clone)]
pub struct ArticleComposer<G> {
    generator: G,
}

impl<G> ArticleComposer<G>
where
    G: TextGenerator + Send + Sync,
{
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    /// Sends the prompt in a single call; no retries and no chunking, the
    /// transcript goes out whole.
    #[tracing::instrument(skip(self, transcript), fields(model = %self.generator.model(), transcript_len = transcript.len()))]
    pub async fn generate_article(
        &self,
        transcript: &str,
        options: &GenerationOptions,
    ) -> Result<String, Error> {
        let prompt = build_prompt(transcript, options);

        let article = self
            .generator
            .complete(&prompt)
            .await
            .map_err(|e| Error::GenerationFailed(e.to_string()))?;

        Ok(article.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instruction(prompt: &str) -> &str {
        prompt.split_once("\n\n").map(|(head, _)| head).unwrap()
    }

    #[test]
    fn test_summary_prompt_without_language() {
        let prompt = build_prompt("hello world", &GenerationOptions::default());

        assert!(prompt.contains("brief summary"));
        assert!(!prompt.contains("detailed professional article"));
        assert!(!prompt.contains("Write the output in"));
        assert_eq!(instruction(&prompt), SUMMARY_INSTRUCTION);
    }

    #[test]
    fn test_detailed_prompt() {
        let options = GenerationOptions::new(DetailLevel::Detailed, None);
        let prompt = build_prompt("hello world", &options);

        assert!(prompt.starts_with(DETAILED_INSTRUCTION));
        assert!(!prompt.contains("brief summary"));
    }

    #[test]
    fn test_language_instruction_ends_the_instruction() {
        let options = GenerationOptions::new(DetailLevel::Summary, Some("French".into()));
        let prompt = build_prompt("bonjour", &options);

        assert!(instruction(&prompt).ends_with("Write the output in French."));
    }

    #[test]
    fn test_transcript_is_embedded_verbatim() {
        let transcript = "line one\n\nline two  with  spaces";
        let prompt = build_prompt(transcript, &GenerationOptions::default());

        assert!(prompt.ends_with(&format!("\n\n{transcript}")));
    }
}
