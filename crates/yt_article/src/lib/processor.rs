pub mod builder;

use std::time::Duration;

use crate::{
    error::Error,
    llm::{composer::ArticleComposer, generator::TextGenerator},
    parser::extract_video_id,
    types::{ArticleRequest, ArticleResult, GenerationOptions},
    yt::{fetcher::TranscriptFetcher, TranscriptSource},
};

/// Video reference in, article out: id extraction, transcript retrieval and
/// generation, with every failure reported as an [`ArticleResult::Error`].
///
/// Holds no per-request state, so one pipeline can serve concurrent requests.
#[derive(Debug)]
pub struct ArticlePipeline<S, G>
where
    S: TranscriptSource + Send + Sync + 'static,
    G: TextGenerator + Send + Sync + 'static,
{
    fetcher: TranscriptFetcher<S>,
    composer: ArticleComposer<G>,
}

impl<S, G> ArticlePipeline<S, G>
where
    S: TranscriptSource + Send + Sync + 'static,
    G: TextGenerator + Send + Sync + 'static,
{
    pub fn new(source: S, generator: G) -> Self {
        ArticlePipeline {
            fetcher: TranscriptFetcher::new(source),
            composer: ArticleComposer::new(generator),
        }
    }

    async fn try_run(&self, video_id: &str, options: &GenerationOptions) -> Result<String, Error> {
        let transcript = self
            .fetcher
            .get_transcript(video_id, options.target_language.as_deref())
            .await?;

        self.composer.generate_article(&transcript, options).await
    }

    /// Never fails: errors from any stage come back as `{ error }`, success as
    /// `{ article }`.
    #[tracing::instrument(skip(self))]
    pub async fn run(&self, video_reference: &str, options: &GenerationOptions) -> ArticleResult {
        let video_id = extract_video_id(video_reference);

        match self.try_run(&video_id, options).await {
            Ok(article) => {
                tracing::info!(%video_id, article_len = article.len(), "Article generated");
                ArticleResult::Article { article }
            }
            Err(e) => {
                tracing::error!(%video_id, error = %e, "Failed to generate article");
                ArticleResult::Error {
                    error: e.to_string(),
                }
            }
        }
    }

    /// [`run`](Self::run) bounded by `timeout`; an elapsed run comes back as
    /// `{ error }` as well.
    pub async fn run_with_timeout(
        &self,
        video_reference: &str,
        options: &GenerationOptions,
        timeout: Duration,
    ) -> ArticleResult {
        let run = self.run(video_reference, options);

        tokio::time::timeout(timeout, run).await.unwrap_or_else(|_| {
            tracing::warn!(video_reference, timeout_secs = timeout.as_secs(), "Request timed out");
            ArticleResult::Error {
                error: format!("Request timed out after {}s", timeout.as_secs()),
            }
        })
    }

    pub async fn run_request(&self, request: &ArticleRequest) -> ArticleResult {
        self.run(&request.video_id, &request.options()).await
    }
}
