use mc_alpha_client::{Client, ClientConfig, ClientEvent, Termination};
use tracing::{debug, info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "client.toml".into());
    let config = match ClientConfig::load(&path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load {path}: {e}");
            std::process::exit(1);
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let info = config.connection_info();
    info!(
        "mc-alpha client v{} connecting to {}:{} as {}",
        env!("CARGO_PKG_VERSION"),
        info.host,
        info.port,
        info.username
    );

    let (client, mut events, worker) = match Client::spawn(config.session_settings()) {
        Ok(spawned) => spawned,
        Err(e) => {
            eprintln!("Failed to start session worker: {e}");
            std::process::exit(1);
        }
    };
    client.connect(info);

    let mut chunks = 0usize;
    let mut exit_code = 0;
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(ClientEvent::StateChanged(state)) => info!("State: {state:?}"),
                Some(ClientEvent::ChunkUpdated(chunk)) => {
                    chunks += 1;
                    debug!(
                        "Chunk at {} size {} ({chunks} received)",
                        chunk.origin(),
                        chunk.size()
                    );
                }
                Some(ClientEvent::Terminated(termination)) => {
                    match termination {
                        Termination::Closed => info!("Disconnected"),
                        Termination::Kicked(reason) => info!("Kicked: {reason}"),
                        Termination::Failed(e) => {
                            warn!("Session failed: {e}");
                            exit_code = 1;
                        }
                    }
                    break;
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                client.disconnect();
            }
        }
    }

    if tokio::task::spawn_blocking(move || worker.join()).await.is_err() {
        warn!("Session worker join task failed");
    }
    info!("Received {chunks} chunks in total");
    std::process::exit(exit_code);
}
