use crate::{llm::generator::TextGenerator, yt::TranscriptSource, ArticlePipeline};

pub struct ArticlePipelineBuilder<S = (), G = ()> {
    transcript_source: S,
    generator: G,
}

impl ArticlePipelineBuilder {
    pub fn new() -> Self {
        Self {
            transcript_source: (),
            generator: (),
        }
    }
}

impl Default for ArticlePipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, G> ArticlePipelineBuilder<S, G> {
    pub fn transcript_source<S2: TranscriptSource + Send + Sync + 'static>(
        self,
        transcript_source: S2,
    ) -> ArticlePipelineBuilder<S2, G> {
        ArticlePipelineBuilder {
            transcript_source,
            generator: self.generator,
        }
    }

    pub fn generator<G2: TextGenerator + Send + Sync + 'static>(
        self,
        generator: G2,
    ) -> ArticlePipelineBuilder<S, G2> {
        ArticlePipelineBuilder {
            transcript_source: self.transcript_source,
            generator,
        }
    }
}

impl<S, G> ArticlePipelineBuilder<S, G>
where
    S: TranscriptSource + Send + Sync + 'static,
    G: TextGenerator + Send + Sync + 'static,
{
    pub fn build(self) -> ArticlePipeline<S, G> {
        ArticlePipeline::new(self.transcript_source, self.generator)
    }
}
