use std::{net::SocketAddr, sync::Arc, time::Duration};

use favereel::{AppState, app, config::Config, db, ratelimit::RateGate, seed, store::EntryStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,favereel=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Config::from_env()?;

    let database = db::connect_with_retry(&config).await;
    let store = EntryStore::new(database);

    // Non-fatal: the API still serves an empty catalog if seeding fails.
    if let Err(err) = seed::auto_seed(&store).await {
        tracing::error!(error = %err, "seeding failed");
    }

    let grace = config.shutdown_grace_secs;
    let state = Arc::new(AppState { config, store, rate: RateGate::new() });
    let router = app(state.clone());

    let listener = tokio::net::TcpListener::bind(state.config.addr).await?;
    tracing::info!(addr = %state.config.addr, env = %state.config.environment, "listening");
    axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal(grace))
        .await?;

    state.store.db().clone().close().await?;
    tracing::info!("shutdown complete");
    Ok(())
}

/// Resolves on SIGINT, SIGTERM, or a panic reported through the process
/// hook, then arms a timer that force-exits if teardown overruns the grace
/// period.
async fn shutdown_signal(grace_secs: u64) {
    let (panic_tx, mut panic_rx) = tokio::sync::watch::channel(());
    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        previous_hook(info);
        let _ = panic_tx.send(());
    }));

    let terminate = async {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};
            match signal(SignalKind::terminate()) {
                Ok(mut sig) => {
                    sig.recv().await;
                }
                Err(_) => std::future::pending().await,
            }
        }
        #[cfg(not(unix))]
        std::future::pending::<()>().await
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => tracing::info!("SIGINT received, starting graceful shutdown"),
        _ = terminate => tracing::info!("SIGTERM received, starting graceful shutdown"),
        _ = panic_rx.changed() => tracing::error!("panic reported, starting graceful shutdown"),
    }

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(grace_secs)).await;
        tracing::error!("could not shut down within grace period, forcing exit");
        std::process::exit(1);
    });
}
