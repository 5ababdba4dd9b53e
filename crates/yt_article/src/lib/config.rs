use std::{net::SocketAddr, time::Duration};

use clap::Args;
use rumqttc::{LastWill, MqttOptions, QoS};

use crate::{
    llm::openai::OpenAIClient,
    mqtt::{Topics, OFFLINE},
    yt::transcript_api::YoutubeTranscriptSource,
    ArticlePipeline, ArticlePipelineBuilder,
};

/// Service configuration, from flags or the environment
#[derive(Debug, Clone, Args)]
pub struct Config {
    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_key: String,

    /// Base URL of an OpenAI compatible chat completions API
    #[arg(long, env = "OPENAI_BASE_URL", default_value = OpenAIClient::DEFAULT_BASE_URL)]
    pub openai_base_url: String,

    /// Model used for article generation
    #[arg(long, env = "OPENAI_MODEL", default_value = OpenAIClient::DEFAULT_MODEL)]
    pub model: String,

    /// Address the HTTP server binds to
    #[arg(long, env = "BIND_ADDRESS", default_value = "0.0.0.0:5000")]
    pub bind_address: SocketAddr,

    /// Upper bound for a whole request, transcript and generation included
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "300")]
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn openai_client(&self) -> OpenAIClient {
        OpenAIClient::new(&self.openai_key)
            .with_base_url(&self.openai_base_url)
            .with_model(&self.model)
    }

    /// Wires the production transcript source and generator
    pub fn pipeline(&self) -> ArticlePipeline<YoutubeTranscriptSource, OpenAIClient> {
        ArticlePipelineBuilder::new()
            .transcript_source(YoutubeTranscriptSource::default())
            .generator(self.openai_client())
            .build()
    }
}

/// Broker connection and topics for the `mqtt` subcommand
#[derive(Debug, Clone, Args)]
pub struct MqttConfig {
    #[arg(long, env = "MQTT_BROKER", default_value = "localhost")]
    pub mqtt_broker: String,

    #[arg(long, env = "MQTT_PORT", default_value = "1883")]
    pub mqtt_port: u16,

    #[arg(long, env = "MQTT_CLIENT_ID", default_value = "yt_article")]
    pub mqtt_client_id: String,

    #[arg(long, env = "MQTT_USERNAME")]
    pub mqtt_username: Option<String>,

    #[arg(long, env = "MQTT_PASSWORD", hide_env_values = true)]
    pub mqtt_password: Option<String>,

    /// Topic article requests arrive on
    #[arg(long, env = "MQTT_TOPIC_SUB", default_value = "yt_article/request")]
    pub request_topic: String,

    /// Topic generated articles are published to
    #[arg(long, env = "MQTT_TOPIC_PUB", default_value = "yt_article/article")]
    pub article_topic: String,

    #[arg(long, env = "LAST_MESSAGE_TOPIC", default_value = "yt_article/last_message")]
    pub last_message_topic: String,

    #[arg(long, env = "AVAILABILITY_TOPIC", default_value = "yt_article/availability")]
    pub availability_topic: String,
}

impl MqttConfig {
    pub fn topics(&self) -> Topics {
        Topics {
            request: self.request_topic.clone(),
            article: self.article_topic.clone(),
            last_message: self.last_message_topic.clone(),
            availability: self.availability_topic.clone(),
        }
    }

    pub fn mqtt_options(&self) -> MqttOptions {
        let mut options = MqttOptions::new(&self.mqtt_client_id, &self.mqtt_broker, self.mqtt_port);
        options.set_keep_alive(Duration::from_secs(60));
        options.set_last_will(LastWill::new(
            &self.availability_topic,
            OFFLINE,
            QoS::AtLeastOnce,
            true,
        ));

        // credentials only apply as a pair
        if let (Some(username), Some(password)) = (&self.mqtt_username, &self.mqtt_password) {
            options.set_credentials(username, password);
        }

        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        config: Config,
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = TestCli::try_parse_from([
            "yt-article",
            "--openai-key",
            "sk-test",
            "--model",
            "gpt-test",
            "--bind-address",
            "127.0.0.1:8080",
            "--request-timeout-secs",
            "30",
        ])
        .unwrap();

        assert_eq!(cli.config.openai_key, "sk-test");
        assert_eq!(cli.config.model, "gpt-test");
        assert_eq!(cli.config.bind_address.port(), 8080);
        assert_eq!(cli.config.request_timeout(), Duration::from_secs(30));
    }

    #[derive(Parser)]
    struct MqttCli {
        #[command(flatten)]
        mqtt: MqttConfig,
    }

    #[test]
    fn test_mqtt_topics_and_broker() {
        let cli = MqttCli::try_parse_from([
            "yt-article",
            "--mqtt-broker",
            "broker.local",
            "--mqtt-port",
            "8883",
            "--request-topic",
            "home/yt/in",
        ])
        .unwrap();

        let topics = cli.mqtt.topics();
        assert_eq!(topics.request, "home/yt/in");
        assert_eq!(topics.article, "yt_article/article");
        assert_eq!(topics.availability, "yt_article/availability");

        let options = cli.mqtt.mqtt_options();
        assert_eq!(options.broker_address(), ("broker.local".to_string(), 8883));
        assert_eq!(options.client_id(), "yt_article");
        assert!(options.credentials().is_none(), "Username without password is ignored");
    }
}
