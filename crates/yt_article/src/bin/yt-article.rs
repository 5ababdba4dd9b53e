use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use yt_article::{
    mqtt::MqttBridge,
    server::{build_router, AppState},
    tracing::init_tracing_subscriber,
    Config, DetailLevel, GenerationOptions, MqttConfig,
};

#[derive(Parser)]
#[command(name = "yt-article", about = "Generates articles from YouTube video transcripts")]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP API
    Serve,
    /// Answer article requests arriving on an MQTT topic
    Mqtt(MqttConfig),
    /// Generate a single article and print the result as JSON
    Generate {
        /// Video id or youtube.com / youtu.be URL
        video: String,

        #[arg(long, value_enum, default_value_t = DetailLevel::Summary)]
        detail_level: DetailLevel,

        /// Language to write the article in, e.g. "German"
        #[arg(long)]
        lang: Option<String>,
    },
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let state = AppState::new(config.pipeline(), config.request_timeout());
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;
    tracing::info!(address = %config.bind_address, model = %config.model, "Listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Ctrl-C received, shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let _ = dotenvy::dotenv();

    let _guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    ));

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    match cli.command {
        Command::Serve => serve(cli.config).await?,
        Command::Mqtt(mqtt) => {
            tracing::info!(broker = %mqtt.mqtt_broker, model = %cli.config.model, "Starting MQTT bridge");
            MqttBridge::new(cli.config.pipeline(), &mqtt, cli.config.request_timeout())
                .run(shutdown_signal())
                .await?
        }
        Command::Generate {
            video,
            detail_level,
            lang,
        } => {
            let options = GenerationOptions::new(detail_level, lang);
            let result = cli
                .config
                .pipeline()
                .run_with_timeout(&video, &options, cli.config.request_timeout())
                .await;

            println!("{}", serde_json::to_string_pretty(&result)?);
            // process::exit would skip the sentry guard's flush
            if result.is_error() {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
