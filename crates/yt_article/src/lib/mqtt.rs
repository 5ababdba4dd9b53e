//! # Message bus bridge
//!
//! Subscribes to a request topic and answers every message with a pipeline
//! run. Articles go to the article topic, and a `{video_url, article}` or
//! `{error}` summary of the latest run goes to the last-message topic. A
//! retained `online`/`offline` flag (with a last will) tracks availability.

use std::{future::Future, sync::Arc, time::Duration};

use rumqttc::{AsyncClient, ClientError, Event, MqttOptions, Outgoing, Packet, QoS};
use serde_json::json;

use crate::{
    config::MqttConfig, llm::generator::TextGenerator, types::ArticleRequest,
    yt::TranscriptSource, ArticlePipeline, ArticleResult,
};

pub const ONLINE: &str = "online";
pub const OFFLINE: &str = "offline";

const RECONNECT_DELAY: Duration = Duration::from_secs(5);
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum MqttError {
    #[error("MQTT client error: {0}")]
    Client(#[from] ClientError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topics {
    pub request: String,
    pub article: String,
    pub last_message: String,
    pub availability: String,
}

pub trait MessagePublisher {
    type Error: std::fmt::Display + Send;

    fn publish(
        &self,
        topic: &str,
        payload: Vec<u8>,
        retain: bool,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

impl MessagePublisher for AsyncClient {
    type Error = ClientError;

    async fn publish(&self, topic: &str, payload: Vec<u8>, retain: bool) -> Result<(), Self::Error> {
        AsyncClient::publish(self, topic, QoS::AtLeastOnce, retain, payload).await
    }
}

fn error_payload(error: impl std::fmt::Display) -> Vec<u8> {
    json!({ "error": format!("Error processing message: {error}") })
        .to_string()
        .into_bytes()
}

/// Runs the pipeline for one inbound message and publishes the outcome.
///
/// Payloads that are not a valid request and failed or timed out runs are
/// reported on the last-message topic only. Only publish failures are
/// returned.
#[tracing::instrument(skip_all, fields(topic = %topics.request))]
pub async fn handle_message<S, G, P>(
    pipeline: &ArticlePipeline<S, G>,
    publisher: &P,
    topics: &Topics,
    payload: &[u8],
    request_timeout: Duration,
) -> Result<(), P::Error>
where
    S: TranscriptSource + Send + Sync + 'static,
    G: TextGenerator + Send + Sync + 'static,
    P: MessagePublisher + Sync,
{
    let request = match serde_json::from_slice::<ArticleRequest>(payload) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected malformed request message");
            return publisher
                .publish(&topics.last_message, error_payload(e), false)
                .await;
        }
    };

    let result = pipeline
        .run_with_timeout(&request.video_id, &request.options(), request_timeout)
        .await;

    match result {
        ArticleResult::Article { article } => {
            publisher
                .publish(&topics.article, article.clone().into_bytes(), false)
                .await?;

            let last_message = json!({ "video_url": request.video_id, "article": article });
            publisher
                .publish(&topics.last_message, last_message.to_string().into_bytes(), false)
                .await
        }
        ArticleResult::Error { error } => {
            publisher
                .publish(&topics.last_message, error_payload(error), false)
                .await
        }
    }
}

pub struct MqttBridge<S, G>
where
    S: TranscriptSource + Send + Sync + 'static,
    G: TextGenerator + Send + Sync + 'static,
{
    pipeline: Arc<ArticlePipeline<S, G>>,
    topics: Arc<Topics>,
    options: MqttOptions,
    request_timeout: Duration,
}

impl<S, G> MqttBridge<S, G>
where
    S: TranscriptSource + Send + Sync + 'static,
    G: TextGenerator + Send + Sync + 'static,
{
    pub fn new(
        pipeline: ArticlePipeline<S, G>,
        config: &MqttConfig,
        request_timeout: Duration,
    ) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            topics: Arc::new(config.topics()),
            options: config.mqtt_options(),
            request_timeout,
        }
    }

    /// Drives the connection until `shutdown` resolves, then marks the
    /// service offline and disconnects. Messages are handled concurrently.
    pub async fn run(self, shutdown: impl Future<Output = ()>) -> Result<(), MqttError> {
        let (client, mut eventloop) = AsyncClient::new(self.options, 16);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                event = eventloop.poll() => match event {
                    // also runs after every reconnect
                    Ok(Event::Incoming(Packet::ConnAck(_))) => {
                        tracing::info!(subscribe = %self.topics.request, "Connected to MQTT broker");
                        client
                            .subscribe(self.topics.request.as_str(), QoS::AtLeastOnce)
                            .await?;
                        client
                            .publish(self.topics.availability.as_str(), QoS::AtLeastOnce, true, ONLINE)
                            .await?;
                    }
                    Ok(Event::Incoming(Packet::Publish(message))) => {
                        let pipeline = Arc::clone(&self.pipeline);
                        let topics = Arc::clone(&self.topics);
                        let client = client.clone();
                        let request_timeout = self.request_timeout;

                        tokio::spawn(async move {
                            if let Err(e) = handle_message(
                                &pipeline,
                                &client,
                                &topics,
                                &message.payload,
                                request_timeout,
                            )
                            .await
                            {
                                tracing::error!(error = %e, "Failed to publish result");
                            }
                        });
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(error = %e, "MQTT connection error, reconnecting");
                        tokio::time::sleep(RECONNECT_DELAY).await;
                    }
                },
            }
        }

        tracing::info!("Disconnecting from MQTT broker");
        client
            .publish(self.topics.availability.as_str(), QoS::AtLeastOnce, true, OFFLINE)
            .await?;
        client.disconnect().await?;

        let drain = async {
            loop {
                match eventloop.poll().await {
                    Ok(Event::Outgoing(Outgoing::Disconnect)) | Err(_) => break,
                    Ok(_) => {}
                }
            }
        };
        if tokio::time::timeout(DRAIN_TIMEOUT, drain).await.is_err() {
            tracing::warn!("Timed out flushing the offline status");
        }

        Ok(())
    }
}
