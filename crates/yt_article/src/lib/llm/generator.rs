use std::{fmt::Display, future::Future};

/// A text completion backend: one prompt in, generated text out
pub trait TextGenerator {
    type Error: Display + Send;

    /// Model identifier, used for logging
    fn model(&self) -> &str;

    fn complete(&self, prompt: &str) -> impl Future<Output = Result<String, Self::Error>> + Send;
}
