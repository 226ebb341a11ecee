use anyhow::{Context, Result};
use clap::Parser;
use livecast::services::{
    FileRecordingStore, FsObjectStore, JobDispatcher, LogJobDispatcher, NatsJobDispatcher,
    Services, TracingNotifier, TranscriptionWatcher,
};
use livecast::{create_router, AppState, Config};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "livecast", about = "Live session host for event streams")]
struct Args {
    /// Path to the configuration file (without extension)
    #[arg(long, default_value = "config/livecast")]
    config: String,

    /// Override the configured HTTP port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("{} v0.1.0", cfg.service.name);

    let objects = Arc::new(FsObjectStore::new(
        &cfg.storage.media_root,
        &cfg.storage.public_base_url,
    ));
    let recordings = Arc::new(FileRecordingStore::new(&cfg.storage.recordings_root));

    let jobs: Arc<dyn JobDispatcher> = if cfg.jobs.enabled {
        let dispatcher =
            NatsJobDispatcher::connect(&cfg.jobs.nats_url, cfg.jobs.subject_prefix.clone())
                .await
                .context("Failed to connect job dispatcher")?;

        // Result messages flip recordings out of `processing`
        let watcher = TranscriptionWatcher::connect(
            &cfg.jobs.nats_url,
            cfg.jobs.subject_prefix.clone(),
            recordings.clone(),
        )
        .await
        .context("Failed to connect transcription watcher")?;
        // Detached; the watch task lives for the process lifetime
        let _ = watcher.spawn().await?;

        Arc::new(dispatcher)
    } else {
        info!("Job dispatch disabled, transcription requests will be logged only");
        Arc::new(LogJobDispatcher::new())
    };

    let services = Arc::new(Services {
        objects,
        recordings,
        jobs,
        notifier: Arc::new(TracingNotifier),
    });

    let state = AppState::new(services, cfg.session_defaults());
    let router = create_router(state, PathBuf::from(&cfg.storage.media_root));

    let port = args.port.unwrap_or(cfg.service.http.port);
    let addr = format!("{}:{}", cfg.service.http.bind, port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .context("HTTP server failed")?;

    Ok(())
}
