use anyhow::{Context, Result};
use clap::Parser;
use scribed::audio::vad::EnergyVad;
use scribed::cli::{Cli, Commands};
use scribed::config::Config;
use scribed::defaults;
use scribed::server::server::{TranscribeServer, bind_listener};
use scribed::session::driver::SessionConfig;
use scribed::stt::gate;
use scribed::stt::transcriber::{Transcriber, TranscriberConfig};
use scribed::stt::whisper::WhisperTranscriber;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli)?;
    config.validate()?;

    match cli.command {
        None | Some(Commands::Serve) => serve(config).await,
        Some(Commands::Stream {
            file,
            addr,
            realtime,
        }) => {
            let addr = addr.unwrap_or_else(|| config.server.listen.clone());
            scribed::client::stream_wav(&addr, &file, config.audio.sample_rate, realtime)
                .await
                .context("streaming failed")
        }
        Some(Commands::Health { addr }) => {
            let addr = addr.unwrap_or_else(|| config.server.listen.clone());
            let status = scribed::client::health_check(&addr)
                .await
                .context("health check failed")?;
            println!("status_code: {}", status);
            Ok(())
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "scribed=info",
        1 => "scribed=debug",
        _ => "scribed=trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let path = cli
        .config
        .clone()
        .unwrap_or_else(Config::default_path);
    let mut config = Config::load_or_default(&path)
        .with_context(|| format!("loading {}", path.display()))?
        .with_env_overrides();

    if let Some(listen) = &cli.listen {
        config.server.listen = listen.clone();
    }
    if let Some(model) = &cli.model {
        config.stt.model_path = model.clone();
    }
    if let Some(language) = &cli.language {
        config.stt.language = language.clone();
    }
    Ok(config)
}

/// Loads the engine, warms it up, then starts accepting streams.
///
/// Capability failure before the listener binds is fatal; the process must
/// not serve until the engine is ready.
async fn serve(config: Config) -> Result<()> {
    let transcriber = WhisperTranscriber::new(TranscriberConfig {
        model_path: config.stt.model_path.clone(),
        language: config.stt.language.clone(),
        threads: config.stt.threads,
    })
    .context("failed to initialize the transcription engine")?;
    tracing::info!(model = transcriber.model_name(), "loaded Whisper model");

    let engine = gate::spawn(transcriber);
    engine
        .warmup(config.audio.sample_rate, defaults::WARMUP_SECS)
        .await
        .context("engine warmup failed")?;

    let listener = bind_listener(&config.server.listen).await?;
    let vad_mode = config.audio.vad_mode;
    let server = TranscribeServer::new(SessionConfig::from_config(&config), engine, move || {
        EnergyVad::new(vad_mode)
    });
    server.serve(listener).await?;
    Ok(())
}
