use anyhow::{anyhow, Context, Result};
use split_aggr::config::AppConfig;
use split_aggr::router::{create_api_router, ApiState, Router};
use split_aggr::state::{load_venue_set, start_venue_reload, MarketState};
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing().context("initialize tracing subscriber")?;

    if let Err(err) = run().await {
        tracing::error!(error = ?err, "fatal aggregator error");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<()> {
    let config = AppConfig::load().context("load configuration from environment")?;

    let venues = load_venue_set(&config.venues_file)?;
    for (index, venue) in venues.iter().enumerate() {
        info!(index, name = venue.name(), kind = venue.kind(), "venue registered");
    }
    if venues.is_empty() {
        warn!(path = %config.venues_file.display(), "venue set is empty; every quote will fail with no liquidity");
    }

    let market = MarketState::new(venues, 16);
    let router = Router::new(config.max_parts).context("initialize quote router")?;

    let app = App {
        config: Arc::new(config),
        market,
        router,
    };

    app.run().await
}

struct App {
    config: Arc<AppConfig>,
    market: MarketState,
    router: Router,
}

impl App {
    async fn run(self) -> Result<()> {
        let _reload_handle = self.config.reload_interval().map(|every| {
            info!(every_secs = every.as_secs(), "venue reload enabled");
            start_venue_reload(self.market.clone(), self.config.venues_file.clone(), every)
        });

        let mut updates = self.market.subscribe();
        let state = Arc::new(ApiState {
            router: self.router.clone(),
            market: self.market.clone(),
        });
        let api_router = create_api_router(state);

        let listener = tokio::net::TcpListener::bind(self.config.listen_addr)
            .await
            .with_context(|| format!("bind API server address {}", self.config.listen_addr))?;
        info!(
            address = %self.config.listen_addr,
            max_parts = self.router.max_parts(),
            "split aggregator online"
        );

        let mut server = tokio::spawn(async move {
            axum::serve(listener, api_router)
                .with_graceful_shutdown(shutdown_signal())
                .await
        });

        let mut ticker = tokio::time::interval(self.config.heartbeat());
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let venues = self.market.snapshot().await;
                    info!(
                        venues = venues.len(),
                        version = self.market.version(),
                        "split aggregator heartbeat"
                    );
                }
                Ok(update) = updates.recv() => {
                    debug!(version = update.version, venues = update.venues, "venue snapshot updated");
                }
                res = &mut server => {
                    res.map_err(|e| anyhow!("API server task: {e}"))?
                        .context("API server error")?;
                    info!("API server stopped, exiting");
                    break;
                }
            }
        }
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "ctrl_c listener error");
    }
    info!("Shutdown signal received, draining connections");
}

fn init_tracing() -> Result<()> {
    let env_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info,hyper=warn,tower_http=info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(env_filter))
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("tracing subscriber init: {err}"))
}
