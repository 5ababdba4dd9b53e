//! Turns YouTube videos into articles: transcript retrieval with language
//! fallback, prompt construction and a single text generation call, served
//! over HTTP or an MQTT request topic.

pub mod config;
mod error;
mod llm;
pub mod mqtt;
pub mod parser;
mod processor;
pub mod server;
pub mod tracing;
pub mod types;
pub mod yt;

pub use config::{Config, MqttConfig};
pub use error::Error;
pub use llm::{
    composer::{build_prompt, ArticleComposer},
    generator::TextGenerator,
    openai,
};
pub use parser::extract_video_id;
pub use processor::{builder::ArticlePipelineBuilder, ArticlePipeline};
pub use types::{ArticleRequest, ArticleResult, DetailLevel, GenerationOptions, TranscriptSegment};
pub use yt::{fetcher::TranscriptFetcher, TranscriptLookup, TranscriptSource};
